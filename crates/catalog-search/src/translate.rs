//! The query transducer: token stream in, engine query tokens out.
//!
//! Single linear pass. Parentheses and OR are forwarded; AND is dropped
//! because the engine ANDs by juxtaposition; relExp triples become field
//! clauses. Operator precedence differs between the protocol and the engine,
//! so correctness of un-parenthesized mixed AND/OR input is the caller's
//! problem, as it is for the engine itself.

use tracing::{debug, warn};

use crate::error::SearchError;
use crate::fields::engine_field;
use crate::lexer::{lex, split_value_tokens, Token};

/// The engine's match-everything query.
pub const MATCH_ALL: &str = "mime:*";

/// Operator marker for triples the engine cannot express (`exists`).
const IGNORE: &str = "I";

/// Translates protocol search strings into engine query strings.
#[derive(Debug, Clone, Default)]
pub struct SearchTranslator;

impl SearchTranslator {
    pub fn new() -> Self {
        Self
    }

    /// Translate one query string.
    ///
    /// Returns `Ok(None)` when the input cannot be translated meaningfully
    /// (the caller returns an empty result). The only error is wildcard
    /// misuse, which is caller misbehavior rather than a data problem.
    pub fn translate(&self, input: &str) -> Result<Option<String>, SearchError> {
        let Some(tokens) = lex(input) else {
            warn!(query = input, "unterminated quote in search string, ignoring search");
            return Ok(None);
        };

        if tokens.contains(&Token::Star) {
            if tokens.len() == 1 {
                return Ok(Some(MATCH_ALL.to_string()));
            }
            return Err(SearchError::WildcardMisuse(input.to_string()));
        }

        let mut out: Vec<String> = Vec::new();
        let mut field = String::new();
        let mut oper = String::new();
        let mut neg = false;

        for token in tokens {
            match token {
                Token::Open => out.push("(".to_string()),
                Token::Close => out.push(")".to_string()),
                Token::Compare(c) => oper.push(c),
                Token::Word(w) => match w.to_lowercase().as_str() {
                    "contains" => oper = ":".to_string(),
                    "doesnotcontain" => {
                        neg = true;
                        oper = ":".to_string();
                    }
                    "derivedfrom" => oper = ":".to_string(),
                    // No unary existence test in the engine.
                    "exists" => oper = IGNORE.to_string(),
                    "true" | "false" => {}
                    // The engine ANDs by juxtaposition.
                    "and" => {}
                    "or" => out.push("OR".to_string()),
                    other => field = engine_field(other),
                },
                Token::Quoted(content) => {
                    // Values are always quoted, so a quoted token closes the
                    // current triple.
                    let values = split_value_tokens(&content);
                    emit_clauses(&mut out, values, &field, &oper, neg);
                    field.clear();
                    oper.clear();
                    neg = false;
                }
                // Filtered out above.
                Token::Star => {}
            }
        }

        if out.is_empty() {
            debug!(query = input, "search string translated to nothing");
            return Ok(None);
        }
        Ok(Some(out.join(" ")))
    }
}

/// Emit the field clause(s) for one relExp triple.
fn emit_clauses(out: &mut Vec<String>, mut values: Vec<String>, field: &str, oper: &str, neg: bool) {
    if oper == IGNORE {
        return;
    }
    let mut neg = neg;

    // A class test against a single value is rewritten into a directory
    // mimetype test: container classes match directories, item classes match
    // everything but.
    if (oper == ":" || oper == "=") && values.len() == 1 {
        if values[0].starts_with("object.container") {
            values[0] = "inode/directory".to_string();
        } else if values[0].starts_with("object.item") {
            neg = true;
            values[0] = "inode/directory".to_string();
        }
    }

    // Single words OR together as one comma-separated value; multi-word
    // tokens stay phrases, quoted individually.
    let mut words: Vec<&str> = Vec::new();
    let mut phrases: Vec<&str> = Vec::new();
    for value in &values {
        if value.split_whitespace().count() > 1 {
            phrases.push(value);
        } else {
            words.push(value);
        }
    }
    let words = words.join(",");

    // Structural entries only carry a filename, so title tests widen to
    // match it as well.
    let targets: &[&str] = if field == "title" {
        &["title", "filename"]
    } else {
        &[field]
    };

    let sign = if neg { "-" } else { "" };
    if targets.len() > 1 {
        out.push("(".to_string());
    }
    for (i, target) in targets.iter().enumerate() {
        out.push("(".to_string());
        if !words.is_empty() {
            out.push(format!("{sign}{target}{oper}{words}"));
        }
        for phrase in &phrases {
            out.push(format!("{sign}{target}{oper}\"{phrase}\""));
        }
        out.push(")".to_string());
        if targets.len() == 2 && i == 0 {
            // A negated title test must miss on both title and filename.
            out.push(if neg { "AND" } else { "OR" }.to_string());
        }
    }
    if targets.len() > 1 {
        out.push(")".to_string());
    }
}
