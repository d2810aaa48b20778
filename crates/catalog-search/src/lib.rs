//! # catalog-search
//!
//! Translation of the protocol's constrained boolean query language into the
//! external indexing engine's native query syntax.
//!
//! Queries are field/operator/value triples joined by AND/OR and grouped by
//! parentheses; values are always double-quoted, possibly with
//! backslash-escaped inner quotes. The translation is a best effort: it
//! forwards the boolean structure and rewrites triples into engine field
//! clauses, relying on the engine to handle operator precedence. Structural
//! correctness of the result is not validated here; a malformed input can
//! yield a malformed engine query, which then fails at submission time.

pub mod error;
pub mod fields;
pub mod lexer;
pub mod translate;

pub use error::SearchError;
pub use fields::engine_field;
pub use lexer::{lex, split_value_tokens, Token};
pub use translate::{SearchTranslator, MATCH_ALL};
