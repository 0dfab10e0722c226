//! Test: Failure handling - the first failing step stops the run

use crate::helpers::*;
use kata_scaffold::core::Mode;
use kata_scaffold::scaffold::ScaffoldError;
use std::sync::Arc;

#[tokio::test]
async fn test_failed_install_aborts_remaining_steps() {
    let origin = tempfile::tempdir().unwrap();
    let shell = Arc::new(MockShell::new().failing("npm install --save-dev jest"));

    let (result, ctx, events) =
        run_scaffold(origin.path(), shell.clone(), Mode::Standalone, "kata-ts", "kata-ts").await;

    let err = result.unwrap_err();
    assert_eq!(err.exit_code(), 1);
    match &err {
        ScaffoldError::Pipeline(e) => assert_eq!(e.step, "Installing Jest"),
        other => panic!("unexpected error: {:?}", other),
    }

    // Nothing after the failing step ran
    let commands = shell.commands();
    assert!(!commands.contains(&"npm run compile".to_string()));
    assert!(!commands.iter().any(|c| c.starts_with("git commit")));
    assert!(!origin.path().join("kata-ts/README.md").exists());

    // No restoration after a failure
    assert_eq!(ctx.workspace.depth(), 1);

    let n = events.len();
    assert_eq!(events[n - 2], "fail Installing Jest");
    assert_eq!(events[n - 1], "end Failed");
}

#[tokio::test]
async fn test_both_clone_transports_failing_aborts() {
    let origin = tempfile::tempdir().unwrap();
    let shell = Arc::new(MockShell::new().failing("git clone"));

    let (result, _, _) =
        run_scaffold(origin.path(), shell.clone(), Mode::Lesson, "kata-ts", "week 1").await;

    match result.unwrap_err() {
        ScaffoldError::Pipeline(e) => assert_eq!(e.step, "Fetching the Dojo repository"),
        other => panic!("unexpected error: {:?}", other),
    }
    assert_eq!(shell.commands().len(), 2);
    assert!(!origin.path().join("dojo/week 1").exists());
}

#[tokio::test]
async fn test_malformed_package_json_is_left_unchanged() {
    let origin = tempfile::tempdir().unwrap();
    let project = origin.path().join("kata-ts");
    std::fs::create_dir_all(&project).unwrap();
    std::fs::write(project.join("package.json"), "{ not json").unwrap();
    let shell = Arc::new(MockShell::new());

    let (result, _, _) =
        run_scaffold(origin.path(), shell, Mode::Standalone, "kata-ts", "kata-ts").await;

    match result.unwrap_err() {
        ScaffoldError::Pipeline(e) => assert_eq!(e.step, "Updating package.json"),
        other => panic!("unexpected error: {:?}", other),
    }
    assert_eq!(
        std::fs::read_to_string(project.join("package.json")).unwrap(),
        "{ not json"
    );
}
