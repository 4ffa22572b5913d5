use thiserror::Error;

/// Failure while parsing a textual type reference.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypeParseError {
    #[error("type reference is empty")]
    Empty,
    #[error("unexpected end of input, expected {expected}")]
    UnexpectedEnd { expected: &'static str },
    #[error("unexpected character '{found}' at position {position}, expected {expected}")]
    UnexpectedChar {
        position: usize,
        found: char,
        expected: &'static str,
    },
    #[error("trailing input at position {position}")]
    TrailingInput { position: usize },
}

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("invalid type reference '{input}': {source}")]
    InvalidType {
        input: String,
        #[source]
        source: TypeParseError,
    },
    #[error("unknown retention policy: {0}")]
    UnknownPolicy(String),
    #[error("unknown identification strategy: {0}")]
    UnknownStrategy(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;
