//! Query-side engine binding.
//!
//! The engine runs out of process. `EngineClient` is the seam the rest of the
//! workspace programs against; `CommandEngineClient` is the shipping adapter,
//! driving a configured command that prints one JSON document per line.

use std::process::Command;

use catalog_search::MATCH_ALL;
use catalog_types::{Document, EngineSettings};
use tracing::{debug, warn};

use crate::error::EngineError;

/// Read access to the external index.
pub trait EngineClient: Send + Sync {
    /// Fetch every document in the index.
    fn all_documents(&self) -> Result<Vec<Document>, EngineError>;

    /// Run a query already translated into the engine's syntax.
    fn search(&self, query: &str) -> Result<Vec<Document>, EngineError>;
}

/// Engine adapter running a query subprocess per request.
///
/// The configured command gets the query string appended as its last
/// argument and must write one JSON document per stdout line.
#[derive(Debug, Clone)]
pub struct CommandEngineClient {
    command: Vec<String>,
}

impl CommandEngineClient {
    pub fn new(settings: &EngineSettings) -> Result<Self, EngineError> {
        if settings.query_command.is_empty() {
            return Err(EngineError::Config(
                "engine.query_command is not set".to_string(),
            ));
        }
        Ok(Self {
            command: settings.query_command.clone(),
        })
    }

    fn run(&self, query: &str) -> Result<Vec<Document>, EngineError> {
        debug!(command = %self.command[0], query, "running engine query");
        let output = Command::new(&self.command[0])
            .args(&self.command[1..])
            .arg(query)
            .output()
            .map_err(|source| EngineError::Spawn {
                command: self.command[0].clone(),
                source,
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(EngineError::Query(format!(
                "{}: {}",
                output.status,
                stderr.trim()
            )));
        }
        Ok(parse_documents(&output.stdout))
    }
}

impl EngineClient for CommandEngineClient {
    fn all_documents(&self) -> Result<Vec<Document>, EngineError> {
        self.run(MATCH_ALL)
    }

    fn search(&self, query: &str) -> Result<Vec<Document>, EngineError> {
        self.run(query)
    }
}

/// Decode a JSON-lines document stream. Undecodable lines are dropped with a
/// warning so one bad record cannot lose a whole result set.
pub fn parse_documents(bytes: &[u8]) -> Vec<Document> {
    let text = String::from_utf8_lossy(bytes);
    let mut docs = Vec::new();
    for (lineno, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match serde_json::from_str::<Document>(line) {
            Ok(doc) => docs.push(doc),
            Err(err) => {
                warn!(line = lineno + 1, %err, "skipping undecodable engine record");
            }
        }
    }
    docs
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sh(script: &str) -> CommandEngineClient {
        CommandEngineClient::new(&EngineSettings {
            query_command: vec!["sh".to_string(), "-c".to_string(), script.to_string()],
        })
        .unwrap()
    }

    #[test]
    fn test_empty_command_is_config_error() {
        let err = CommandEngineClient::new(&EngineSettings::default()).unwrap_err();
        assert!(matches!(err, EngineError::Config(_)));
    }

    #[test]
    fn test_parse_documents_skips_bad_lines() {
        let stream = concat!(
            r#"{"url":"file:///m/a.mp3","mimetype":"audio/mpeg"}"#,
            "\n",
            "not json\n",
            "\n",
            r#"{"url":"file:///m/b.flac","mimetype":"audio/flac"}"#,
            "\n",
        );
        let docs = parse_documents(stream.as_bytes());
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].url, "file:///m/a.mp3");
        assert_eq!(docs[1].mimetype, "audio/flac");
    }

    #[test]
    fn test_search_runs_command() {
        // The query lands in $0 of the script, which the script ignores.
        let client = sh(r#"printf '%s\n' '{"url":"file:///m/a.mp3","mimetype":"audio/mpeg"}'"#);
        let docs = client.search("title:a").unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].url, "file:///m/a.mp3");
    }

    #[test]
    fn test_failing_command_is_query_error() {
        let client = sh("echo boom >&2; exit 3");
        let err = client.search("title:a").unwrap_err();
        match err {
            EngineError::Query(msg) => assert!(msg.contains("boom")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_binary_is_spawn_error() {
        let client = CommandEngineClient::new(&EngineSettings {
            query_command: vec!["/no/such/binary".to_string()],
        })
        .unwrap();
        assert!(matches!(
            client.all_documents(),
            Err(EngineError::Spawn { .. })
        ));
    }
}
