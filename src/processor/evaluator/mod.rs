//! Snippet evaluators
//!
//! An [`Evaluator`] runs one snippet in a fresh scope and returns the markup
//! the snippet handed over with `set_output(...)` (or by assigning
//! `_result`). Which engine does the work is a deployment choice: the
//! in-process QuickJS engine, an external interpreter, or nothing at all.

mod command;
mod quickjs;

use std::path::Path;
use std::sync::Arc;

pub use command::CommandEvaluator;
pub use quickjs::QuickJsEvaluator;

use crate::config::{ExecBackend, ExecConfig};

/// Why a snippet produced no output
#[derive(Debug, thiserror::Error)]
pub enum ExecError {
    /// The snippet raised (or failed to parse)
    #[error("{0}")]
    Script(String),

    /// The snippet's output value has no markup representation
    #[error("cannot render output as markup: {0}")]
    Serialization(String),

    #[error("failed to start `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{program}` failed ({status}): {stderr}")]
    Exited {
        program: String,
        status: String,
        stderr: String,
    },

    #[error("I/O error while running snippet: {0}")]
    Io(#[from] std::io::Error),

    #[error("live code execution is disabled")]
    Disabled,

    /// The engine itself misbehaved
    #[error("script engine error: {0}")]
    Engine(String),
}

/// Runs snippets and captures their output markup.
///
/// Implementations must give every call its own scope: names defined by one
/// snippet are never visible to the next. `Ok(None)` means the snippet ran
/// but produced no output.
pub trait Evaluator: Send + Sync {
    /// Short backend name for logs
    fn name(&self) -> &'static str;

    /// Language the snippets actually run as, used to label listings.
    /// `None` means the directive's own language.
    fn listing_language(&self) -> Option<&str> {
        None
    }

    /// Run `code` and return its output markup
    fn evaluate(&self, code: &str) -> Result<Option<String>, ExecError>;
}

/// Evaluator that refuses to run anything
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledEvaluator;

impl Evaluator for DisabledEvaluator {
    fn name(&self) -> &'static str {
        "disabled"
    }

    fn evaluate(&self, _code: &str) -> Result<Option<String>, ExecError> {
        Err(ExecError::Disabled)
    }
}

/// Build the evaluator selected in the configuration.
///
/// External commands run with `base_dir` as their working directory.
pub fn from_config(config: &ExecConfig, base_dir: &Path) -> Arc<dyn Evaluator> {
    match config.backend {
        ExecBackend::Quickjs => Arc::new(QuickJsEvaluator::new()),
        ExecBackend::Command => Arc::new(CommandEvaluator::new(
            &config.command,
            &config.args,
            base_dir,
        )),
        ExecBackend::Disabled => Arc::new(DisabledEvaluator),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_evaluator() {
        let err = DisabledEvaluator.evaluate("_result = 1").unwrap_err();
        assert_eq!(err.to_string(), "live code execution is disabled");
    }

    #[test]
    fn test_from_config_selects_backend() {
        let mut config = ExecConfig::default();
        assert_eq!(from_config(&config, Path::new(".")).name(), "quickjs");

        config.backend = ExecBackend::Command;
        assert_eq!(from_config(&config, Path::new(".")).name(), "command");

        config.backend = ExecBackend::Disabled;
        assert_eq!(from_config(&config, Path::new(".")).name(), "disabled");
    }

    #[test]
    fn test_listing_language_per_backend() {
        assert_eq!(QuickJsEvaluator::new().listing_language(), Some("javascript"));
        assert_eq!(DisabledEvaluator.listing_language(), None);
        let command = CommandEvaluator::new("python3", &[], Path::new("."));
        assert_eq!(command.listing_language(), None);
    }
}
