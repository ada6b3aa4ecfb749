use serde::{Deserialize, Serialize};

use crate::consts::IGNORE_INDEX;

///
/// A model-ready record. `input_ids` and `attention_mask` describe the encoder input;
/// `labels` are the target ids with padding replaced by the ignore-index sentinel.
///
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessedExample {
    pub input_ids: Vec<u32>,
    pub attention_mask: Vec<u32>,
    pub labels: Vec<i64>,
}

impl ProcessedExample {
    ///
    /// Number of label positions that contribute to the loss.
    ///
    pub fn num_target_tokens(&self) -> usize {
        self.labels.iter().filter(|&&l| l != IGNORE_INDEX).count()
    }

    ///
    /// Number of real (non-padding) encoder input tokens.
    ///
    pub fn num_input_tokens(&self) -> usize {
        self.attention_mask.iter().filter(|&&m| m != 0).count()
    }
}
