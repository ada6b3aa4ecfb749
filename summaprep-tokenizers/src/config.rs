use std::fs::read_to_string;
use std::path::{Path, PathBuf};

use thiserror::Error;

use serde::{Deserialize, Serialize};

use summaprep_core::consts::IGNORE_INDEX;

use crate::consts::{
    DEFAULT_EOS_TOKEN, DEFAULT_MAX_INPUT_LENGTH, DEFAULT_MAX_TARGET_LENGTH, DEFAULT_MODEL_NAME,
    DEFAULT_PAD_TOKEN, DEFAULT_PREFIX,
};
use crate::utils::special_tokens::SpecialTokens;

///
/// Fixed settings of a [crate::Preprocessor]. Every field has a default, so a config
/// file only needs to name what it overrides.
///
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct PreprocessorConfig {
    pub model_name: String,
    pub prefix: String,
    pub max_input_length: usize,
    pub max_target_length: usize,
    pub pad_token: String,
    pub eos_token: String,
    pub label_pad_token_id: i64,
}

impl Default for PreprocessorConfig {
    fn default() -> Self {
        PreprocessorConfig {
            model_name: DEFAULT_MODEL_NAME.to_string(),
            prefix: DEFAULT_PREFIX.to_string(),
            max_input_length: DEFAULT_MAX_INPUT_LENGTH,
            max_target_length: DEFAULT_MAX_TARGET_LENGTH,
            pad_token: DEFAULT_PAD_TOKEN.to_string(),
            eos_token: DEFAULT_EOS_TOKEN.to_string(),
            label_pad_token_id: IGNORE_INDEX,
        }
    }
}

#[derive(Error, Debug)]
pub enum TokenizerConfigError {
    #[error("`{0}` must be greater than zero")]
    InvalidLength(&'static str),
    #[error("`label_pad_token_id` must be negative so it never collides with a token id, got {0}")]
    InvalidLabelPadTokenId(i64),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Toml(#[from] toml::de::Error),
}

pub type TokenizerConfigResult<T> = std::result::Result<T, TokenizerConfigError>;

impl PreprocessorConfig {
    pub fn validate(&self) -> TokenizerConfigResult<()> {
        if self.max_input_length == 0 {
            return Err(TokenizerConfigError::InvalidLength("max_input_length"));
        }
        if self.max_target_length == 0 {
            return Err(TokenizerConfigError::InvalidLength("max_target_length"));
        }
        if self.label_pad_token_id >= 0 {
            return Err(TokenizerConfigError::InvalidLabelPadTokenId(
                self.label_pad_token_id,
            ));
        }
        Ok(())
    }

    pub fn special_tokens(&self) -> SpecialTokens {
        SpecialTokens {
            pad: self.pad_token.clone(),
            eos: self.eos_token.clone(),
        }
    }
}

impl TryFrom<&Path> for PreprocessorConfig {
    type Error = TokenizerConfigError;

    fn try_from(path: &Path) -> Result<Self, Self::Error> {
        let toml_str = read_to_string(path)?;
        let config: PreprocessorConfig = toml::from_str(&toml_str)?;
        config.validate()?;
        Ok(config)
    }
}

///
/// Where a pretrained identifier points to.
///
#[derive(Debug, Clone, PartialEq)]
pub enum PretrainedSource {
    /// A local directory holding `tokenizer.json` / `config.json`.
    Directory(PathBuf),
    /// A local file used as-is.
    File(PathBuf),
    /// A model repository on the HuggingFace hub.
    Hub(String),
}

impl PretrainedSource {
    ///
    /// Determine the source of a pretrained identifier. Existing local paths win over
    /// hub repositories, so a checkout named like a hub model shadows it.
    ///
    /// # Arguments
    /// * `identifier` - a local path or a hub model id like `t5-small`
    ///
    pub fn from_identifier(identifier: &str) -> Self {
        let path = Path::new(identifier);
        if path.is_dir() {
            PretrainedSource::Directory(path.to_path_buf())
        } else if path.is_file() {
            PretrainedSource::File(path.to_path_buf())
        } else {
            PretrainedSource::Hub(identifier.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use std::path::PathBuf;

    #[rstest]
    fn test_defaults() {
        let config = PreprocessorConfig::default();
        assert_eq!(config.model_name, "t5-small");
        assert_eq!(config.prefix, "summarize: ");
        assert_eq!(config.max_input_length, 512);
        assert_eq!(config.max_target_length, 128);
        assert_eq!(config.label_pad_token_id, -100);
        assert_eq!(config.validate().is_ok(), true);
    }

    #[rstest]
    fn test_try_from_toml() {
        let path = PathBuf::from("../tests/data/summarize/preprocessor.toml");
        let config = PreprocessorConfig::try_from(path.as_path()).unwrap();
        assert_eq!(config.max_input_length, 16);
        assert_eq!(config.max_target_length, 8);
        // untouched fields keep their defaults
        assert_eq!(config.prefix, "summarize: ");
        assert_eq!(config.pad_token, "<pad>");
    }

    #[rstest]
    fn test_try_from_toml_zero_length() {
        let path = PathBuf::from("../tests/data/summarize/preprocessor_bad_length.toml");
        let result = PreprocessorConfig::try_from(path.as_path());
        assert_eq!(
            matches!(
                result,
                Err(TokenizerConfigError::InvalidLength("max_input_length"))
            ),
            true
        );
    }

    #[rstest]
    #[case(0)]
    #[case(7)]
    fn test_non_negative_label_pad_rejected(#[case] id: i64) {
        let config = PreprocessorConfig {
            label_pad_token_id: id,
            ..Default::default()
        };
        assert_eq!(config.validate().is_err(), true);
    }

    #[rstest]
    #[case("../tests/data/summarize/pretrained", PretrainedSource::Directory(PathBuf::from("../tests/data/summarize/pretrained")))]
    #[case("../tests/data/summarize/tokenizer.json", PretrainedSource::File(PathBuf::from("../tests/data/summarize/tokenizer.json")))]
    #[case("t5-small", PretrainedSource::Hub("t5-small".to_string()))]
    fn test_pretrained_source(#[case] identifier: &str, #[case] expected: PretrainedSource) {
        assert_eq!(PretrainedSource::from_identifier(identifier), expected);
    }
}
