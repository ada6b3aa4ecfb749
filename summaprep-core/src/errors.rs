use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Missing or non-string field `{0}` in example")]
    MissingField(&'static str),

    #[error("Invalid record on line {line}: {message}")]
    InvalidRecord { line: usize, message: String },

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type CoreResult<T> = std::result::Result<T, CoreError>;
