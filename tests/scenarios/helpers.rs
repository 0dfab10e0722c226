//! Test utilities for scaffolding scenarios

use async_trait::async_trait;
use kata_scaffold::core::{Answers, Mode, ScaffoldContext, ScaffoldSettings};
use kata_scaffold::execution::{CommandRunner, ExecError, PipelineEvent, StepPipeline};
use kata_scaffold::scaffold::{run_plan, ScaffoldError, ScaffoldOutcome, ScaffoldPlanner};
use kata_scaffold::workspace::WorkspaceNavigator;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// What `npx tsc --init` writes: comments and a trailing comma
pub const GENERATED_TSCONFIG: &str = r#"{
  /* Visit https://aka.ms/tsconfig to read more about this file */
  "compilerOptions": {
    /* Language and Environment */
    "target": "es2016",                                  /* Set the JavaScript language version. */
    // "lib": [],
    "module": "commonjs",                                /* Specify what module code is generated. */
    "esModuleInterop": true,
    "strict": true,
    "skipLibCheck": true,
  }
}
"#;

/// Mock shell that records every command and fakes the tools' side effects
#[derive(Default)]
pub struct MockShell {
    failing: Vec<String>,
    nothing_staged: bool,
    calls: Mutex<Vec<(PathBuf, String)>>,
}

impl MockShell {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail every command starting with `prefix`
    pub fn failing(mut self, prefix: &str) -> Self {
        self.failing.push(prefix.to_string());
        self
    }

    /// Report a clean index, as after an earlier run already committed everything
    pub fn nothing_staged(mut self) -> Self {
        self.nothing_staged = true;
        self
    }

    pub fn calls(&self) -> Vec<(PathBuf, String)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn commands(&self) -> Vec<String> {
        self.calls().into_iter().map(|(_, c)| c).collect()
    }
}

#[async_trait]
impl CommandRunner for MockShell {
    async fn run(&self, cwd: &Path, command: &str) -> Result<String, ExecError> {
        self.calls
            .lock()
            .unwrap()
            .push((cwd.to_path_buf(), command.to_string()));

        if self.failing.iter().any(|p| command.starts_with(p.as_str())) {
            return Err(ExecError::Failed {
                command: command.to_string(),
                code: 1,
                output: format!("mock failure: {}", command),
            });
        }

        if command == "git diff --cached --quiet" && !self.nothing_staged {
            return Err(ExecError::Failed {
                command: command.to_string(),
                code: 1,
                output: String::new(),
            });
        }

        if command == "npm init -y" {
            let name = cwd.file_name().unwrap().to_string_lossy().to_string();
            let package = serde_json::json!({
                "name": name,
                "version": "1.0.0",
                "main": "index.js",
                "scripts": { "test": "echo \"Error: no test specified\" && exit 1" },
                "license": "ISC"
            });
            std::fs::write(
                cwd.join("package.json"),
                serde_json::to_string_pretty(&package).unwrap(),
            )
            .unwrap();
        } else if command == "npx tsc --init" {
            std::fs::write(cwd.join("tsconfig.json"), GENERATED_TSCONFIG).unwrap();
        } else if command.starts_with("git init") || command.starts_with("git clone") {
            std::fs::create_dir_all(cwd.join(".git")).unwrap();
        }

        Ok(format!("ok: {}", command))
    }
}

/// Plan and run a scaffold in `origin` against `shell`, collecting event lines
pub async fn run_scaffold(
    origin: &Path,
    shell: Arc<MockShell>,
    mode: Mode,
    project: &str,
    folder: &str,
) -> (Result<ScaffoldOutcome, ScaffoldError>, ScaffoldContext, Vec<String>) {
    let settings = ScaffoldSettings::default();
    let answers = Answers::new(mode, project, folder).unwrap();
    let plan = ScaffoldPlanner::new(settings.clone()).plan_for(&answers);

    let mut ctx = ScaffoldContext::new(answers, settings, WorkspaceNavigator::new(origin), shell);

    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = events.clone();
    let mut pipeline = StepPipeline::new();
    pipeline.add_event_handler(move |event| {
        let line = match event {
            PipelineEvent::StepStarted { title, .. } => format!("start {}", title),
            PipelineEvent::StepFailed { title, .. } => format!("fail {}", title),
            PipelineEvent::PipelineFinished { status, .. } => format!("end {:?}", status),
            _ => return,
        };
        sink.lock().unwrap().push(line);
    });

    let result = run_plan(&plan, &pipeline, &mut ctx).await;
    let events = events.lock().unwrap().clone();
    (result, ctx, events)
}

/// Position of the first command equal to `command`
pub fn position(commands: &[String], command: &str) -> usize {
    commands
        .iter()
        .position(|c| c == command)
        .unwrap_or_else(|| panic!("`{}` was not run; ran {:?}", command, commands))
}

pub fn read_json(path: &Path) -> serde_json::Value {
    serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}
