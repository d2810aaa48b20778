//! Tokenizer for the protocol query language.
//!
//! The language has no unary operators and all non-reserved values are
//! quoted, so a flat token stream is enough for the translator; no parse
//! tree is built.

/// One lexical token of the query string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Open,
    Close,
    /// One of `>`, `<`, `=`. Runs accumulate into a relational operator.
    Compare(char),
    /// Content of a double-quoted value, inner escapes resolved.
    Quoted(String),
    /// Unquoted word: keyword, boolean connector, or field name.
    Word(String),
    /// The match-everything wildcard.
    Star,
}

/// Tokenize a query string. Returns `None` on an unterminated quoted value
/// (the caller degrades to an empty result).
pub fn lex(input: &str) -> Option<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            c if c.is_whitespace() => {}
            '(' => tokens.push(Token::Open),
            ')' => tokens.push(Token::Close),
            '>' | '<' | '=' => tokens.push(Token::Compare(c)),
            '*' => tokens.push(Token::Star),
            '"' => {
                let mut content = String::new();
                let mut escape = false;
                let mut closed = false;
                for c in chars.by_ref() {
                    if escape {
                        content.push(c);
                        escape = false;
                    } else if c == '\\' {
                        escape = true;
                    } else if c == '"' {
                        closed = true;
                        break;
                    } else {
                        content.push(c);
                    }
                }
                if !closed {
                    return None;
                }
                tokens.push(Token::Quoted(content));
            }
            c => {
                let mut word = String::new();
                word.push(c);
                while let Some(&next) = chars.peek() {
                    if next.is_whitespace() || matches!(next, '(' | ')' | '"' | '>' | '<' | '=') {
                        break;
                    }
                    word.push(next);
                    chars.next();
                }
                tokens.push(Token::Word(word));
            }
        }
    }
    Some(tokens)
}

/// Split a quoted value into its word and phrase tokens: whitespace
/// separates words, inner double-quoted runs group phrases, backslash
/// escapes the next character.
pub fn split_value_tokens(value: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_quote = false;
    let mut escape = false;

    for c in value.chars() {
        if escape {
            current.push(c);
            escape = false;
        } else if c == '\\' {
            escape = true;
        } else if in_quote {
            if c == '"' {
                in_quote = false;
                tokens.push(std::mem::take(&mut current));
            } else {
                current.push(c);
            }
        } else if c == '"' {
            if !current.is_empty() {
                tokens.push(std::mem::take(&mut current));
            }
            in_quote = true;
        } else if c.is_whitespace() {
            if !current.is_empty() {
                tokens.push(std::mem::take(&mut current));
            }
        } else {
            current.push(c);
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}
