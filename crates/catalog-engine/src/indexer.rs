//! Index-side engine binding: run the external index command to completion.

use std::path::{Path, PathBuf};
use std::process::Command;

use catalog_types::IndexerSettings;
use tracing::info;

use crate::error::EngineError;

/// Runs the engine's index command and waits for it to finish.
///
/// The command is run in incremental mode by default; `rebuild` appends the
/// engine's from-scratch flag. Completion is signaled by process exit, and a
/// non-zero status is a failure.
#[derive(Debug, Clone)]
pub struct CommandIndexer {
    command: String,
    args: Vec<String>,
    rebuild_flag: String,
    confdir: Option<PathBuf>,
}

impl CommandIndexer {
    pub fn new(settings: &IndexerSettings, confdir: Option<&Path>) -> Self {
        Self {
            command: settings.command.clone(),
            args: settings.args.clone(),
            rebuild_flag: settings.rebuild_flag.clone(),
            confdir: confdir.map(Path::to_path_buf),
        }
    }

    /// Run the index command and wait for its exit status.
    pub fn run(&self, rebuild: bool) -> Result<(), EngineError> {
        let mut cmd = Command::new(&self.command);
        if let Some(dir) = &self.confdir {
            cmd.arg("-c").arg(dir);
        }
        cmd.args(&self.args);
        if rebuild {
            cmd.arg(&self.rebuild_flag);
        }

        info!(command = %self.command, rebuild, "running index command");
        let status = cmd.status().map_err(|source| EngineError::Spawn {
            command: self.command.clone(),
            source,
        })?;
        if !status.success() {
            return Err(EngineError::Indexer(status.to_string()));
        }
        info!(command = %self.command, "index command finished");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(command: &str, args: &[&str]) -> IndexerSettings {
        IndexerSettings {
            command: command.to_string(),
            args: args.iter().map(|s| s.to_string()).collect(),
            rebuild_flag: "-z".to_string(),
        }
    }

    #[test]
    fn test_successful_run() {
        let indexer = CommandIndexer::new(&settings("true", &[]), None);
        assert!(indexer.run(false).is_ok());
    }

    #[test]
    fn test_nonzero_exit_is_indexer_error() {
        let indexer = CommandIndexer::new(&settings("false", &[]), None);
        assert!(matches!(indexer.run(false), Err(EngineError::Indexer(_))));
    }

    #[test]
    fn test_missing_command_is_spawn_error() {
        let indexer = CommandIndexer::new(&settings("/no/such/binary", &[]), None);
        assert!(matches!(indexer.run(false), Err(EngineError::Spawn { .. })));
    }

    #[test]
    fn test_rebuild_flag_appended() {
        // The script fails unless the rebuild flag is its last argument.
        let script = settings("sh", &["-c", r#"test "$1" = "-z""#, "check"]);
        let indexer = CommandIndexer::new(&script, None);
        assert!(indexer.run(false).is_err());
        assert!(indexer.run(true).is_ok());
    }
}
