use thiserror::Error;

#[derive(Debug, Error, PartialEq, Clone)]
#[allow(clippy::enum_variant_names)]
pub enum Error {
    #[error("[line {line:?}] unexpected character {ch:?}")]
    UnexpectedCharacter { ch: char, line: usize },

    #[error("[line {line:?}] unterminated string")]
    UnterminatedString { line: usize },

    #[error("[line {line:?}] unterminated block comment")]
    UnterminatedBlockComment { line: usize },
}

impl Error {
    pub fn line(&self) -> usize {
        match self {
            Error::UnexpectedCharacter { line, .. } => *line,
            Error::UnterminatedString { line } => *line,
            Error::UnterminatedBlockComment { line } => *line,
        }
    }
}
