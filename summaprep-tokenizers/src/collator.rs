use std::sync::Arc;

use log::debug;
use ndarray::Array2;

use summaprep_core::ProcessedExample;
use summaprep_core::consts::IGNORE_INDEX;

use super::config::TokenizerConfigError;
use super::error::{TokenizerError, TokenizerResult};
use super::model::Seq2SeqModel;
use super::tokenizer::TextTokenizer;
use super::utils::{round_up_to_multiple, stack_padded};

///
/// One padded batch, `batch_size x length` per array.
///
#[derive(Debug, Clone, PartialEq)]
pub struct Seq2SeqBatch {
    pub input_ids: Array2<i64>,
    pub attention_mask: Array2<i64>,
    pub labels: Array2<i64>,
    pub decoder_input_ids: Option<Array2<i64>>,
}

impl Seq2SeqBatch {
    pub fn batch_size(&self) -> usize {
        self.input_ids.nrows()
    }
}

///
/// Collates [ProcessedExample]s into a [Seq2SeqBatch]. Inputs are padded with the
/// tokenizer's pad id, masks with `0` and labels with `label_pad_token_id`, each to
/// the longest row in the batch. With a model bound, the batch also carries the
/// model's decoder inputs.
///
pub struct DataCollatorForSeq2Seq {
    tokenizer: Arc<dyn TextTokenizer>,
    model: Option<Arc<dyn Seq2SeqModel>>,
    label_pad_token_id: i64,
    pad_to_multiple_of: Option<usize>,
}

impl DataCollatorForSeq2Seq {
    pub fn new(tokenizer: Arc<dyn TextTokenizer>) -> Self {
        Self {
            tokenizer,
            model: None,
            label_pad_token_id: IGNORE_INDEX,
            pad_to_multiple_of: None,
        }
    }

    ///
    /// Bind the model whose decoder inputs every batch should carry. Fails when the
    /// model declares fewer embeddings than the tokenizer can produce ids for.
    ///
    pub fn with_model(mut self, model: Arc<dyn Seq2SeqModel>) -> TokenizerResult<Self> {
        if let Some(model_vocab) = model.vocab_size() {
            let tokenizer_vocab = self.tokenizer.vocab_size();
            if model_vocab < tokenizer_vocab {
                return Err(TokenizerError::VocabMismatch {
                    model: model_vocab,
                    tokenizer: tokenizer_vocab,
                });
            }
        }
        self.model = Some(model);
        Ok(self)
    }

    ///
    /// Pad labels with `label_pad_token_id` instead of `-100`. The sentinel must be
    /// negative so label padding never looks like a token id.
    ///
    pub fn with_label_pad_token_id(mut self, label_pad_token_id: i64) -> TokenizerResult<Self> {
        if label_pad_token_id >= 0 {
            return Err(TokenizerConfigError::InvalidLabelPadTokenId(label_pad_token_id).into());
        }
        self.label_pad_token_id = label_pad_token_id;
        Ok(self)
    }

    pub fn with_pad_to_multiple_of(mut self, multiple: usize) -> Self {
        self.pad_to_multiple_of = Some(multiple);
        self
    }

    pub fn tokenizer(&self) -> &Arc<dyn TextTokenizer> {
        &self.tokenizer
    }

    pub fn model(&self) -> Option<&Arc<dyn Seq2SeqModel>> {
        self.model.as_ref()
    }

    pub fn label_pad_token_id(&self) -> i64 {
        self.label_pad_token_id
    }

    fn padded_length<I: Iterator<Item = usize>>(&self, lengths: I) -> usize {
        round_up_to_multiple(lengths.max().unwrap_or(0), self.pad_to_multiple_of)
    }

    pub fn collate(&self, features: &[ProcessedExample]) -> TokenizerResult<Seq2SeqBatch> {
        if features.is_empty() {
            return Err(TokenizerError::EmptyBatch);
        }

        let input_length = self.padded_length(features.iter().map(|f| f.input_ids.len()));
        let label_length = self.padded_length(features.iter().map(|f| f.labels.len()));
        debug!(
            "Collating {} examples (input length {}, label length {})",
            features.len(),
            input_length,
            label_length
        );

        let input_ids = features
            .iter()
            .map(|f| f.input_ids.iter().map(|&id| id as i64).collect())
            .collect::<Vec<Vec<i64>>>();
        let attention_mask = features
            .iter()
            .map(|f| f.attention_mask.iter().map(|&m| m as i64).collect())
            .collect::<Vec<Vec<i64>>>();
        let labels = features
            .iter()
            .map(|f| f.labels.clone())
            .collect::<Vec<Vec<i64>>>();

        let pad_token_id = self.tokenizer.pad_token_id() as i64;
        let labels = stack_padded(&labels, label_length, self.label_pad_token_id);
        let decoder_input_ids = self
            .model
            .as_ref()
            .map(|model| model.prepare_decoder_input_ids_from_labels(&labels, self.label_pad_token_id));

        Ok(Seq2SeqBatch {
            input_ids: stack_padded(&input_ids, input_length, pad_token_id),
            attention_mask: stack_padded(&attention_mask, input_length, 0),
            labels,
            decoder_input_ids,
        })
    }
}
