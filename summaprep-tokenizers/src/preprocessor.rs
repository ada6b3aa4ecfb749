use std::path::Path;
use std::sync::Arc;

use log::{debug, info};
use rayon::prelude::*;
use serde_json::Value;

use summaprep_core::{ProcessedExample, RawExample};

use super::collator::DataCollatorForSeq2Seq;
use super::config::PreprocessorConfig;
use super::error::TokenizerResult;
use super::model::Seq2SeqModel;
use super::tokenizer::{HfTokenizer, TextTokenizer, shared_tokenizer};
use super::utils::mask_pad_tokens;

///
/// Converts raw summarization examples into fixed-length token records.
///
/// The tokenizer is shared: every clone of the `Arc` handed to [Preprocessor::new]
/// (and every collator built from this preprocessor) uses the same instance.
///
pub struct Preprocessor {
    tokenizer: Arc<dyn TextTokenizer>,
    config: PreprocessorConfig,
}

impl Preprocessor {
    pub fn new(
        tokenizer: Arc<dyn TextTokenizer>,
        config: PreprocessorConfig,
    ) -> TokenizerResult<Self> {
        config.validate()?;
        Ok(Preprocessor { tokenizer, config })
    }

    ///
    /// Preprocessor with the default settings over the process-wide shared tokenizer.
    ///
    pub fn shared() -> TokenizerResult<Self> {
        Self::new(shared_tokenizer()?, PreprocessorConfig::default())
    }

    ///
    /// Load the tokenizer named by `config.model_name` and build a preprocessor
    /// around it.
    ///
    pub fn from_pretrained(config: PreprocessorConfig) -> TokenizerResult<Self> {
        config.validate()?;
        let tokenizer =
            HfTokenizer::from_pretrained_with_special_tokens(&config.model_name, config.special_tokens())?;
        Self::new(Arc::new(tokenizer), config)
    }

    ///
    /// Create a preprocessor from a TOML config file. A `model_name` that names a
    /// path relative to the config file is resolved against the config's directory.
    ///
    pub fn from_config<P: AsRef<Path>>(cfg_path: P) -> TokenizerResult<Self> {
        let mut config = PreprocessorConfig::try_from(cfg_path.as_ref())?;

        if let Some(config_dir) = cfg_path.as_ref().parent() {
            let candidate = config_dir.join(&config.model_name);
            if candidate.exists() {
                config.model_name = candidate.to_string_lossy().into_owned();
            }
        }

        info!("Building preprocessor for {}", config.model_name);
        Self::from_pretrained(config)
    }

    ///
    /// The tokenizer this preprocessor encodes with. Always the same instance.
    ///
    pub fn tokenizer(&self) -> &Arc<dyn TextTokenizer> {
        &self.tokenizer
    }

    pub fn config(&self) -> &PreprocessorConfig {
        &self.config
    }

    ///
    /// Source text fed to the encoder: the task prefix followed by the article.
    ///
    pub fn source_text(&self, example: &RawExample) -> String {
        format!("{}{}", self.config.prefix, example.article)
    }

    ///
    /// Convert one raw example. Text beyond the configured lengths is dropped
    /// silently; shorter text is padded. Label padding becomes
    /// `label_pad_token_id`.
    ///
    pub fn preprocess(&self, example: &RawExample) -> TokenizerResult<ProcessedExample> {
        let model_inputs = self
            .tokenizer
            .encode_to_length(&self.source_text(example), self.config.max_input_length)?;

        let labels = self
            .tokenizer
            .encode_to_length(&example.highlights, self.config.max_target_length)?
            .input_ids;
        let labels = mask_pad_tokens(
            &labels,
            self.tokenizer.pad_token_id(),
            self.config.label_pad_token_id,
        );

        Ok(ProcessedExample {
            input_ids: model_inputs.input_ids,
            attention_mask: model_inputs.attention_mask,
            labels,
        })
    }

    ///
    /// Convert a loosely typed record, failing if `article` or `highlights` is
    /// missing.
    ///
    pub fn preprocess_value(&self, value: &Value) -> TokenizerResult<ProcessedExample> {
        let example = RawExample::try_from(value)?;
        self.preprocess(&example)
    }

    ///
    /// Convert many examples in parallel. Output order matches input order; the
    /// first failure is returned.
    ///
    pub fn preprocess_batch(&self, examples: &[RawExample]) -> TokenizerResult<Vec<ProcessedExample>> {
        debug!("Preprocessing {} examples", examples.len());
        examples
            .par_iter()
            .map(|example| self.preprocess(example))
            .collect()
    }

    ///
    /// Turn a label row back into text, dropping ignored positions and special tokens.
    ///
    pub fn decode_labels(&self, labels: &[i64]) -> TokenizerResult<String> {
        let ids = labels
            .iter()
            .filter(|&&label| label >= 0)
            .map(|&label| label as u32)
            .collect::<Vec<u32>>();
        self.tokenizer.decode(&ids, true)
    }

    ///
    /// Build a batch collator bound to this preprocessor's tokenizer and `model`.
    /// Fails when the model's vocabulary cannot hold every tokenizer id.
    ///
    pub fn data_collator(
        &self,
        model: Arc<dyn Seq2SeqModel>,
    ) -> TokenizerResult<DataCollatorForSeq2Seq> {
        DataCollatorForSeq2Seq::new(Arc::clone(&self.tokenizer))
            .with_label_pad_token_id(self.config.label_pad_token_id)?
            .with_model(model)
    }
}
