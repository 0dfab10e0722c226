//! Turns the operator's answers into a concrete step sequence

use crate::core::{Answers, InvalidAnswer, Mode, ScaffoldSettings, Step};
use crate::execution::shell_escape;
use crate::scaffold::steps::{FileDrop, ScaffoldStep};
use crate::workspace::CommentPolicy;
use serde_json::{json, Value};
use std::path::{Path, PathBuf};

/// A planned run: the steps plus the values derived while planning
#[derive(Debug, Clone, PartialEq)]
pub struct ScaffoldPlan {
    pub mode: Mode,
    pub steps: Vec<ScaffoldStep>,

    /// Number of descents the plan makes, undone by its final step
    pub restore_depth: usize,

    /// Project location relative to the starting folder
    pub install_dir: PathBuf,
}

impl ScaffoldPlan {
    pub fn titles(&self) -> Vec<String> {
        self.steps.iter().map(|s| s.title()).collect()
    }

    /// Absolute install path for a run started in `origin`
    pub fn install_path(&self, origin: &Path) -> PathBuf {
        origin.join(&self.install_dir)
    }
}

/// Builds the step list for either mode
pub struct ScaffoldPlanner {
    settings: ScaffoldSettings,
}

impl ScaffoldPlanner {
    pub fn new(settings: ScaffoldSettings) -> Self {
        Self { settings }
    }

    /// Validate the raw answers and plan. Nothing touches the disk here.
    pub fn plan(
        &self,
        mode: Mode,
        project_name: &str,
        folder_name: &str,
    ) -> Result<ScaffoldPlan, InvalidAnswer> {
        let answers = Answers::new(mode, project_name, folder_name)?;
        Ok(self.plan_for(&answers))
    }

    pub fn plan_for(&self, answers: &Answers) -> ScaffoldPlan {
        let folder = answers.folder_name();

        let (mut steps, head) = match answers.mode() {
            Mode::Lesson => self.lesson_head(answers),
            Mode::Standalone => self.standalone_head(folder),
        };

        steps.extend(self.common_tail(answers.project_name(), &head.notes_path));
        steps.push(ScaffoldStep::Commit {
            add_target: head.add_target,
            message: head.commit_message,
        });
        steps.push(ScaffoldStep::Restore {
            depth: head.restore_depth,
        });

        ScaffoldPlan {
            mode: answers.mode(),
            steps,
            restore_depth: head.restore_depth,
            install_dir: head.install_dir,
        }
    }

    fn lesson_head(&self, answers: &Answers) -> (Vec<ScaffoldStep>, ModeHead) {
        let folder = answers.folder_name();
        let dojo = PathBuf::from(&self.settings.dojo_dir);
        let code = Path::new(folder).join("code");

        let steps = vec![
            ScaffoldStep::EnsureDir { path: dojo.clone() },
            ScaffoldStep::Descend { path: dojo.clone() },
            ScaffoldStep::CloneIfMissing {
                primary: format!("git clone {} .", shell_escape(&self.settings.dojo_ssh_url)),
                fallback: format!("git clone {} .", shell_escape(&self.settings.dojo_https_url)),
            },
            ScaffoldStep::EnsureDir { path: code.clone() },
            ScaffoldStep::EnsureDir {
                path: Path::new(folder).join("theory"),
            },
            ScaffoldStep::Descend { path: code },
            ScaffoldStep::CheckoutBranch {
                branch: answers.branch_name(),
            },
        ];

        let head = ModeHead {
            notes_path: PathBuf::from("../theory/NOTES.md"),
            add_target: PathBuf::from(folder),
            commit_message: self.settings.lesson_commit_message_for(folder),
            restore_depth: 2,
            install_dir: dojo.join(folder),
        };
        (steps, head)
    }

    fn standalone_head(&self, folder: &str) -> (Vec<ScaffoldStep>, ModeHead) {
        let steps = vec![
            ScaffoldStep::EnsureDir {
                path: PathBuf::from(folder),
            },
            ScaffoldStep::Descend {
                path: PathBuf::from(folder),
            },
            ScaffoldStep::InitRepository {
                branch: self.settings.default_branch.clone(),
            },
            ScaffoldStep::WriteFiles {
                title: "Writing .gitignore".to_string(),
                files: vec![FileDrop::new(".gitignore", ".gitignore")],
            },
        ];

        let head = ModeHead {
            notes_path: PathBuf::from("NOTES.md"),
            add_target: PathBuf::from("."),
            commit_message: self.settings.initial_commit_message.clone(),
            restore_depth: 1,
            install_dir: PathBuf::from(folder),
        };
        (steps, head)
    }

    fn common_tail(&self, project_name: &str, notes_path: &Path) -> Vec<ScaffoldStep> {
        let mut steps = vec![
            ScaffoldStep::Bootstrap {
                title: "Initialising npm package".to_string(),
                command: "npm init -y".to_string(),
                creates: PathBuf::from("package.json"),
            },
            ScaffoldStep::PatchConfig {
                path: PathBuf::from("package.json"),
                updates: package_updates(project_name),
                comments: CommentPolicy::Strict,
            },
            ScaffoldStep::EnsureGlobalTool {
                tool: "tsc".to_string(),
                check: "tsc --version".to_string(),
                install: "npm install -g typescript".to_string(),
            },
            ScaffoldStep::Shell {
                title: "Installing TypeScript".to_string(),
                commands: vec!["npm install --save-dev typescript".to_string()],
            },
            ScaffoldStep::Bootstrap {
                title: "Initialising TypeScript".to_string(),
                command: "npx tsc --init".to_string(),
                creates: PathBuf::from("tsconfig.json"),
            },
            // tsc emits its config with comments
            ScaffoldStep::PatchConfig {
                path: PathBuf::from("tsconfig.json"),
                updates: tsconfig_updates(),
                comments: CommentPolicy::StripComments,
            },
            ScaffoldStep::WriteFiles {
                title: "Writing lint and format settings".to_string(),
                files: vec![
                    FileDrop::new(".eslintrc.json", ".eslintrc.json"),
                    FileDrop::new(".prettierrc", ".prettierrc"),
                ],
            },
            ScaffoldStep::Shell {
                title: "Installing ESLint and Prettier".to_string(),
                commands: vec![concat!(
                    "npm install --save-dev eslint@8 prettier ",
                    "@typescript-eslint/parser@7 @typescript-eslint/eslint-plugin@7 ",
                    "eslint-config-prettier"
                )
                .to_string()],
            },
            ScaffoldStep::WriteFiles {
                title: "Writing editor settings".to_string(),
                files: vec![FileDrop::new(".vscode/settings.json", "settings.json")],
            },
            ScaffoldStep::WriteFiles {
                title: "Writing source and test files".to_string(),
                files: vec![
                    FileDrop::new("src/main.ts", "main.ts"),
                    FileDrop::new("tests/main.test.ts", "main.test.ts"),
                    FileDrop::new("jest.config.js", "jest.config.js"),
                ],
            },
            ScaffoldStep::Shell {
                title: "Installing Jest".to_string(),
                commands: vec!["npm install --save-dev jest ts-jest @types/jest".to_string()],
            },
        ];

        if self.settings.verify {
            steps.push(ScaffoldStep::Shell {
                title: "Verifying the project builds and tests pass".to_string(),
                commands: vec!["npm run compile".to_string(), "npm test".to_string()],
            });
        }

        steps.push(ScaffoldStep::WriteFiles {
            title: "Writing docs".to_string(),
            files: vec![
                FileDrop::new("README.md", "README.md"),
                FileDrop::new("TECHDEBT.md", "TECHDEBT.md"),
                FileDrop::new(notes_path, "NOTES.md"),
            ],
        });

        steps
    }
}

/// What differs between the two modes after the head steps
struct ModeHead {
    notes_path: PathBuf,
    add_target: PathBuf,
    commit_message: String,
    restore_depth: usize,
    install_dir: PathBuf,
}

fn package_updates(project_name: &str) -> Vec<(String, Value)> {
    vec![
        ("name".to_string(), json!(project_name)),
        ("main".to_string(), json!("dist/src/main.js")),
        (
            "scripts".to_string(),
            json!({
                "help": "npm run",
                "test": "jest",
                "coverage": "jest --coverage",
                "compile": "tsc",
                "kata": "node dist/src/main.js",
                "update-kata": "npm run compile && npm run kata"
            }),
        ),
    ]
}

fn tsconfig_updates() -> Vec<(String, Value)> {
    vec![
        (
            "compilerOptions".to_string(),
            json!({
                "target": "es2020",
                "module": "commonjs",
                "rootDir": ".",
                "outDir": "dist",
                "strict": true,
                "esModuleInterop": true,
                "skipLibCheck": true,
                "forceConsistentCasingInFileNames": true
            }),
        ),
        ("include".to_string(), json!(["src/**/*", "tests/**/*"])),
    ]
}
