//! Test: Dojo lesson - shared repository, two levels deep

use crate::helpers::*;
use kata_scaffold::core::Mode;
use std::sync::Arc;

const SSH_CLONE: &str = "git clone git@github.com:kata-dojo/dojo.git .";
const HTTPS_CLONE: &str = "git clone https://github.com/kata-dojo/dojo.git .";

#[tokio::test]
async fn test_lesson_falls_back_to_https_clone() {
    let origin = tempfile::tempdir().unwrap();
    let shell = Arc::new(MockShell::new().failing("git clone git@"));

    let (result, ctx, _) =
        run_scaffold(origin.path(), shell.clone(), Mode::Lesson, "kata-ts", "week 1").await;
    let outcome = result.unwrap();

    let dojo = origin.path().join("dojo");
    let code = dojo.join("week 1").join("code");
    let calls = shell.calls();

    // SSH attempted first, then HTTPS, both in the container folder
    assert_eq!(calls[0], (dojo.clone(), SSH_CLONE.to_string()));
    assert_eq!(calls[1], (dojo.clone(), HTTPS_CLONE.to_string()));

    // Branch named after the folder, created from inside the lesson's code folder
    assert_eq!(calls[2], (code.clone(), "git checkout -b week_1".to_string()));

    // Commit adds only the lesson folder, from the repository root
    let n = calls.len();
    assert_eq!(calls[n - 3], (dojo.clone(), "git add 'week 1'".to_string()));
    assert_eq!(calls[n - 2], (dojo.clone(), "git diff --cached --quiet".to_string()));
    assert_eq!(
        calls[n - 1],
        (dojo.clone(), "git commit -m 'Start lesson week 1'".to_string())
    );

    assert!(dojo.join("week 1/theory/NOTES.md").is_file());
    assert!(!code.join("NOTES.md").exists());
    assert_eq!(read_json(&code.join("package.json"))["name"], "kata-ts");

    assert_eq!(outcome.install_path, dojo.join("week 1"));
    assert_eq!(ctx.workspace.depth(), 0);
    assert_eq!(ctx.workspace.current(), origin.path());
}

#[tokio::test]
async fn test_lesson_reuses_existing_repository() {
    let origin = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(origin.path().join("dojo/.git")).unwrap();
    let shell = Arc::new(MockShell::new().failing("git checkout -b"));

    let (result, _, _) =
        run_scaffold(origin.path(), shell.clone(), Mode::Lesson, "kata-ts", "week 2").await;
    result.unwrap();

    let commands = shell.commands();
    assert!(!commands.iter().any(|c| c.starts_with("git clone")));

    // Branch already exists from an earlier run: switch to it instead
    assert!(position(&commands, "git checkout -b week_2") < position(&commands, "git checkout week_2"));
}
