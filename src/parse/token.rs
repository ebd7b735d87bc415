use logos::Logos;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Default, Error)]
pub enum LexerError {
    #[default]
    #[error("unrecognised input")]
    Unrecognised,
}

/// Coarse lexemes used only to find the pipe separators of a line.
///
/// Quoted runs are matched whole (closing quote optional) so a `|` inside
/// them is never mistaken for a separator.
#[derive(Debug, PartialEq, Logos)]
#[logos(error = LexerError)]
pub enum Token {
    #[token("|")]
    Pipe,
    #[regex(r"'[^']*'?")]
    SingleQuoted,
    #[regex(r#""([^"\\]|\\.)*"?"#)]
    DoubleQuoted,
    #[regex(r"\\.?")]
    Escaped,
    #[regex(r#"[^|'"\\]+"#)]
    Bare,
}

/// Splits a raw line on unquoted, unescaped `|` into ordered segments.
///
/// The segments keep their original text; quoting is resolved later by
/// [`tokenize`](super::tokenize::tokenize).
pub fn split_pipeline(line: &str) -> Vec<String> {
    let mut lexer = Token::lexer(line);
    let mut segments = Vec::new();
    let mut current = String::new();

    while let Some(token) = lexer.next() {
        match token {
            Ok(Token::Pipe) => segments.push(std::mem::take(&mut current)),
            Ok(_) => current.push_str(lexer.slice()),
            Err(err) => {
                trace!(%err, slice = lexer.slice(), "keeping unlexed input verbatim");
                current.push_str(lexer.slice());
            }
        }
    }

    segments.push(current);
    segments
}
