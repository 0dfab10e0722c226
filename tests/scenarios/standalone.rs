//! Test: Standalone project - own repository, one level deep

use crate::helpers::*;
use kata_scaffold::core::Mode;
use std::sync::Arc;

#[tokio::test]
async fn test_standalone_end_to_end() {
    let origin = tempfile::tempdir().unwrap();
    let shell = Arc::new(MockShell::new());

    let (result, ctx, events) =
        run_scaffold(origin.path(), shell.clone(), Mode::Standalone, "kata-ts", "kata-ts").await;
    let outcome = result.unwrap();
    let project = origin.path().join("kata-ts");

    // Commands ran in order, all inside the project folder
    let commands = shell.commands();
    let expected = [
        "git init -b main",
        "npm init -y",
        "tsc --version",
        "npm install --save-dev typescript",
        "npx tsc --init",
        "npm install --save-dev jest ts-jest @types/jest",
        "npm run compile",
        "npm test",
        "git add .",
        "git diff --cached --quiet",
        "git commit -m 'Initial commit'",
    ];
    let positions: Vec<usize> = expected.iter().map(|c| position(&commands, c)).collect();
    assert!(
        positions.windows(2).all(|w| w[0] < w[1]),
        "commands out of order: {:?}",
        commands
    );
    assert!(shell.calls().iter().all(|(cwd, _)| *cwd == project));

    // Files written
    for file in [
        ".gitignore",
        ".eslintrc.json",
        ".prettierrc",
        ".vscode/settings.json",
        "src/main.ts",
        "tests/main.test.ts",
        "jest.config.js",
        "README.md",
        "TECHDEBT.md",
        "NOTES.md",
    ] {
        assert!(project.join(file).is_file(), "{} missing", file);
    }

    // Package metadata patched, unrelated keys kept
    let package = read_json(&project.join("package.json"));
    assert_eq!(package["name"], "kata-ts");
    assert_eq!(package["version"], "1.0.0");
    assert_eq!(package["main"], "dist/src/main.js");
    assert_eq!(package["scripts"]["test"], "jest");
    assert!(package["scripts"].get("build").is_none());

    // Compiler config stripped of comments and replaced shallowly
    let tsconfig = read_json(&project.join("tsconfig.json"));
    assert_eq!(tsconfig["compilerOptions"]["target"], "es2020");
    assert_eq!(tsconfig["compilerOptions"]["outDir"], "dist");
    assert_eq!(tsconfig["include"][0], "src/**/*");

    // Back where we started
    assert_eq!(outcome.install_path, project);
    assert_eq!(ctx.workspace.depth(), 0);
    assert_eq!(ctx.workspace.current(), origin.path());

    assert_eq!(events.first().map(String::as_str), Some("start Creating folder kata-ts"));
    assert_eq!(events.last().map(String::as_str), Some("end Completed"));
}

#[tokio::test]
async fn test_standalone_rerun_is_idempotent() {
    let origin = tempfile::tempdir().unwrap();
    let project = origin.path().join("kata-ts");

    let first = Arc::new(MockShell::new());
    let (result, _, _) =
        run_scaffold(origin.path(), first, Mode::Standalone, "kata-ts", "kata-ts").await;
    result.unwrap();
    let package = std::fs::read_to_string(project.join("package.json")).unwrap();
    let tsconfig = std::fs::read_to_string(project.join("tsconfig.json")).unwrap();

    // Everything the second run writes is identical, so git has nothing staged
    let second = Arc::new(MockShell::new().nothing_staged());
    let (result, _, _) =
        run_scaffold(origin.path(), second.clone(), Mode::Standalone, "kata-ts", "kata-ts").await;
    let outcome = result.unwrap();
    // Commit is the step before the final restore
    let commit_status = &outcome.report.statuses[outcome.report.statuses.len() - 2];
    assert_eq!(commit_status, "Nothing new to commit");

    // Repository and generated files already exist, so their tools are not rerun
    let commands = second.commands();
    assert!(!commands.iter().any(|c| c.starts_with("git init")));
    assert!(!commands.contains(&"npm init -y".to_string()));
    assert!(!commands.contains(&"npx tsc --init".to_string()));
    assert!(!commands.iter().any(|c| c.starts_with("git commit")));

    assert_eq!(std::fs::read_to_string(project.join("package.json")).unwrap(), package);
    assert_eq!(std::fs::read_to_string(project.join("tsconfig.json")).unwrap(), tsconfig);
}

#[tokio::test]
async fn test_missing_global_tsc_is_installed() {
    let origin = tempfile::tempdir().unwrap();
    let shell = Arc::new(MockShell::new().failing("tsc --version"));

    let (result, _, _) =
        run_scaffold(origin.path(), shell.clone(), Mode::Standalone, "kata-ts", "kata-ts").await;
    result.unwrap();

    let commands = shell.commands();
    assert!(position(&commands, "tsc --version") < position(&commands, "npm install -g typescript"));
}
