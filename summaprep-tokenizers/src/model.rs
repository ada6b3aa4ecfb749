use std::fs::read_to_string;
use std::path::Path;

use log::info;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::consts::MODEL_CONFIG_FILENAME;

use super::error::TokenizerResult;
use super::utils::resolve_pretrained_file;

///
/// What the collator needs to know about the model it feeds.
///
pub trait Seq2SeqModel: Send + Sync {
    fn decoder_start_token_id(&self) -> u32;

    fn pad_token_id(&self) -> u32;

    /// Size of the embedding table, when known.
    fn vocab_size(&self) -> Option<usize> {
        None
    }

    ///
    /// Build decoder inputs for teacher forcing by shifting the labels one step to
    /// the right. Override for models that do not follow the T5 convention.
    ///
    fn prepare_decoder_input_ids_from_labels(
        &self,
        labels: &Array2<i64>,
        label_pad_token_id: i64,
    ) -> Array2<i64> {
        shift_tokens_right(
            labels,
            self.pad_token_id() as i64,
            self.decoder_start_token_id() as i64,
            label_pad_token_id,
        )
    }
}

///
/// Shift every row of `labels` right by one, put `decoder_start_token_id` in front
/// and turn label padding back into real pad ids.
///
/// # Arguments:
/// - labels: a `batch x length` label array
/// - pad_token_id: the id that replaces `label_pad_token_id`
/// - decoder_start_token_id: the id placed at position 0
/// - label_pad_token_id: the sentinel the labels were padded with, usually `-100`
///
pub fn shift_tokens_right(
    labels: &Array2<i64>,
    pad_token_id: i64,
    decoder_start_token_id: i64,
    label_pad_token_id: i64,
) -> Array2<i64> {
    let (rows, cols) = labels.dim();
    let mut shifted = Array2::from_elem((rows, cols), pad_token_id);
    if cols == 0 {
        return shifted;
    }

    for i in 0..rows {
        shifted[[i, 0]] = decoder_start_token_id;
        for j in 1..cols {
            let label = labels[[i, j - 1]];
            shifted[[i, j]] = if label == label_pad_token_id {
                pad_token_id
            } else {
                label
            };
        }
    }

    shifted
}

///
/// The subset of a HuggingFace `config.json` the collator cares about.
///
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Seq2SeqModelConfig {
    #[serde(default)]
    pub model_type: Option<String>,
    #[serde(default)]
    pub decoder_start_token_id: u32,
    #[serde(default)]
    pub pad_token_id: u32,
    #[serde(default = "default_eos_token_id")]
    pub eos_token_id: u32,
    #[serde(default)]
    pub vocab_size: Option<usize>,
}

fn default_eos_token_id() -> u32 {
    1
}

impl Default for Seq2SeqModelConfig {
    fn default() -> Self {
        Seq2SeqModelConfig {
            model_type: Some("t5".to_string()),
            decoder_start_token_id: 0,
            pad_token_id: 0,
            eos_token_id: default_eos_token_id(),
            vocab_size: None,
        }
    }
}

impl Seq2SeqModelConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> TokenizerResult<Self> {
        let json = read_to_string(path.as_ref())?;
        let config = serde_json::from_str(&json)?;
        Ok(config)
    }

    ///
    /// Load `config.json` of a pretrained model from a local directory, a local file
    /// or the HuggingFace hub.
    ///
    pub fn from_pretrained(identifier: &str) -> TokenizerResult<Self> {
        let path = resolve_pretrained_file(identifier, MODEL_CONFIG_FILENAME)?;
        info!("Loading model config for {} from {:?}", identifier, path);
        Self::from_file(path)
    }
}

impl Seq2SeqModel for Seq2SeqModelConfig {
    fn decoder_start_token_id(&self) -> u32 {
        self.decoder_start_token_id
    }

    fn pad_token_id(&self) -> u32 {
        self.pad_token_id
    }

    fn vocab_size(&self) -> Option<usize> {
        self.vocab_size
    }
}
