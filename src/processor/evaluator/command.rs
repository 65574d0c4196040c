//! Snippet evaluation through an external interpreter
//!
//! The snippet is written to the interpreter's stdin; whatever it prints on
//! stdout is the output markup. This is how snippets in languages other than
//! JavaScript run, e.g. `python3 tools/run_snippet.py`, where the runner
//! script provides the component library and prints the value of `_result`.

use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread;

use super::{Evaluator, ExecError};

/// Runs each snippet in a new interpreter process
#[derive(Debug, Clone)]
pub struct CommandEvaluator {
    program: String,
    args: Vec<String>,
    working_dir: PathBuf,
}

impl CommandEvaluator {
    pub fn new(program: &str, args: &[String], working_dir: &Path) -> Self {
        Self {
            program: program.to_string(),
            args: args.to_vec(),
            working_dir: working_dir.to_path_buf(),
        }
    }
}

impl Evaluator for CommandEvaluator {
    fn name(&self) -> &'static str {
        "command"
    }

    fn evaluate(&self, code: &str) -> Result<Option<String>, ExecError> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .current_dir(&self.working_dir)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| ExecError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        // Feed stdin from another thread so a chatty child cannot deadlock us
        let writer = child.stdin.take().map(|mut stdin| {
            let code = code.to_string();
            thread::spawn(move || stdin.write_all(code.as_bytes()))
        });

        let output = child.wait_with_output()?;

        if let Some(writer) = writer {
            match writer.join() {
                Ok(Ok(())) => {}
                // The child may legitimately exit without reading its input
                Ok(Err(e)) if e.kind() == ErrorKind::BrokenPipe => {}
                Ok(Err(e)) => return Err(ExecError::Io(e)),
                Err(_) => return Err(ExecError::Engine("stdin writer panicked".to_string())),
            }
        }

        if !output.status.success() {
            return Err(ExecError::Exited {
                program: self.program.clone(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let markup = stdout.trim_end_matches(['\n', '\r']);
        if markup.is_empty() {
            Ok(None)
        } else {
            Ok(Some(markup.to_string()))
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn sh(script: &str) -> CommandEvaluator {
        CommandEvaluator::new("sh", &["-c".to_string(), script.to_string()], Path::new("."))
    }

    #[test]
    fn test_stdout_is_output() {
        let out = sh("cat").evaluate("<p>from stdin</p>\n").unwrap();
        assert_eq!(out.as_deref(), Some("<p>from stdin</p>"));
    }

    #[test]
    fn test_empty_stdout_is_no_output() {
        assert_eq!(sh("cat > /dev/null").evaluate("ignored").unwrap(), None);
    }

    #[test]
    fn test_failure_carries_stderr() {
        let err = sh("echo boom >&2; exit 3").evaluate("").unwrap_err();
        match err {
            ExecError::Exited { stderr, status, .. } => {
                assert_eq!(stderr, "boom");
                assert!(status.contains('3'), "{status}");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_program() {
        let evaluator = CommandEvaluator::new("definitely-not-a-real-interpreter", &[], Path::new("."));
        assert!(matches!(
            evaluator.evaluate("x"),
            Err(ExecError::Spawn { .. })
        ));
    }

    /// The bundled Python runner, if an interpreter is installed
    fn python_runner() -> Option<CommandEvaluator> {
        let available = Command::new("python3")
            .arg("--version")
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false);
        available.then(|| {
            CommandEvaluator::new(
                "python3",
                &["tools/run_snippet.py".to_string()],
                Path::new(env!("CARGO_MANIFEST_DIR")),
            )
        })
    }

    #[test]
    fn test_python_runner_components() {
        let Some(python) = python_runner() else {
            return;
        };
        let out = python.evaluate("_result = P(\"hi\", cls=\"big\")\n").unwrap();
        assert_eq!(out.as_deref(), Some(r#"<p class="big">hi</p>"#));

        let out = python
            .evaluate("def greet(name):\n    return Card(H3(name), cls='mt-4')\n_result = greet('<you>')\n")
            .unwrap();
        assert_eq!(
            out.as_deref(),
            Some(r#"<div class="uk-card uk-card-default uk-card-body mt-4"><h3>&lt;you&gt;</h3></div>"#)
        );
        assert_eq!(python.evaluate("x = 1\n").unwrap(), None);
    }

    #[test]
    fn test_python_runner_errors() {
        let Some(python) = python_runner() else {
            return;
        };
        match python.evaluate("raise ValueError('bad')\n").unwrap_err() {
            ExecError::Exited { stderr, .. } => assert_eq!(stderr, "ValueError: bad"),
            other => panic!("unexpected error: {other}"),
        }
        assert!(python.evaluate("_result = {'a': 1}\n").is_err());
    }
}
