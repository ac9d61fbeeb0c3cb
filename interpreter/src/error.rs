use quill_core::Token;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum Error {
    #[error("[line {line:?}] scan error: {msg:?}")]
    ScanError { line: usize, msg: String },

    #[error("[line {line:?}] parse error: {msg:?}")]
    ParseError {
        token: Token,

        // line is copied from token, this is required because thiserror doesn't support field
        // access, e.g {token.line:?}, in error strings
        line: usize,
        msg: String,
    },

    #[error("duplicate definition of {name:?} in the same scope")]
    DuplicateDefinition { name: String },

    #[error("use of undefined variable {name:?}")]
    UndefinedVariable { name: String },

    #[error("cannot reassign constant {name:?}")]
    ConstReassignment { name: String },

    #[error("[line {line:?}] invalid assignment target")]
    NotAssignable { line: usize },

    #[error("{name:?} expected {expected:?} arguments but got {got:?}")]
    Arity {
        name: String,
        expected: usize,
        got: usize,
    },

    #[error("[line {line:?}] type error: {msg:?}")]
    TypeError { line: usize, msg: String },
}

impl Error {
    pub(crate) fn parse_error(token: &Token, msg: &str) -> Self {
        Error::ParseError {
            token: token.clone(),
            line: token.line,
            msg: String::from(msg),
        }
    }

    pub(crate) fn duplicate_definition(name: &str) -> Self {
        Error::DuplicateDefinition {
            name: String::from(name),
        }
    }

    pub(crate) fn undefined_variable(name: &str) -> Self {
        Error::UndefinedVariable {
            name: String::from(name),
        }
    }

    pub(crate) fn const_reassignment(name: &str) -> Self {
        Error::ConstReassignment {
            name: String::from(name),
        }
    }

    pub(crate) fn arity(name: &str, expected: usize, got: usize) -> Self {
        Error::Arity {
            name: String::from(name),
            expected,
            got,
        }
    }

    pub(crate) fn type_error(line: usize, msg: &str) -> Self {
        Error::TypeError {
            line,
            msg: String::from(msg),
        }
    }
}

impl From<quill_core::Error> for Error {
    fn from(err: quill_core::Error) -> Self {
        Error::ScanError {
            line: err.line(),
            msg: err.to_string(),
        }
    }
}
