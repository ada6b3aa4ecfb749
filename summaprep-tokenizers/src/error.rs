use std::path::PathBuf;

use thiserror::Error;

use summaprep_core::CoreError;

use super::config::TokenizerConfigError;

#[derive(Error, Debug)]
pub enum TokenizerError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Config(#[from] TokenizerConfigError),
    #[error(transparent)]
    Example(#[from] CoreError),
    #[error("Could not resolve pretrained resource `{identifier}`: {message}")]
    Resolution { identifier: String, message: String },
    #[error("Failed to load tokenizer from {path:?}: {message}")]
    Load { path: PathBuf, message: String },
    #[error("Special token `{0}` is not in the tokenizer vocabulary")]
    InvalidSpecialTokenConfig(String),
    #[error("Failed to encode text: {0}")]
    Encode(String),
    #[error("Failed to decode ids: {0}")]
    Decode(String),
    #[error("Invalid model config: {0}")]
    ModelConfig(#[from] serde_json::Error),
    #[error("Model vocabulary ({model}) is smaller than the tokenizer vocabulary ({tokenizer})")]
    VocabMismatch { model: usize, tokenizer: usize },
    #[error("Cannot collate an empty batch")]
    EmptyBatch,
}

pub type TokenizerResult<T> = std::result::Result<T, TokenizerError>;
