//! # summaprep-tokenizers
//!
//! Turns raw summarization examples into token-id records for fine-tuning a
//! sequence-to-sequence model (T5 family), and collates those records into batches.
//!
//! ## Main Components
//!
//! - **`TextTokenizer`**: the shared, read-only tokenizer capability. `HfTokenizer`
//!   backs it with a HuggingFace `tokenizer.json`.
//! - **`Preprocessor`**: prefixes the article with `"summarize: "`, encodes source and
//!   target to fixed lengths and masks label padding with `-100`.
//! - **`DataCollatorForSeq2Seq`**: stacks processed examples into padded batches,
//!   optionally deriving `decoder_input_ids` from a bound `Seq2SeqModel`.
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use summaprep_core::RawExample;
//! use summaprep_tokenizers::{HfTokenizer, Preprocessor, PreprocessorConfig};
//!
//! let tokenizer = HfTokenizer::from_file("../tests/data/summarize/tokenizer.json").unwrap();
//! let preprocessor = Preprocessor::new(Arc::new(tokenizer), PreprocessorConfig::default()).unwrap();
//!
//! let example = RawExample::new("the cat sat on the mat .", "cat sits .");
//! let processed = preprocessor.preprocess(&example).unwrap();
//!
//! assert_eq!(processed.input_ids.len(), 512);
//! assert_eq!(processed.labels.len(), 128);
//! ```
//!
pub mod collator;
pub mod config;
pub mod encoding;
pub mod error;
pub mod model;
pub mod preprocessor;
pub mod tokenizer;
pub mod utils;

#[cfg(test)]
mod test_utils;

// re-export things
pub use collator::*;
pub use config::*;
pub use encoding::*;
pub use error::*;
pub use model::*;
pub use preprocessor::*;
pub use tokenizer::*;

pub mod consts {
    pub const DEFAULT_MODEL_NAME: &str = "t5-small";
    pub const DEFAULT_PREFIX: &str = "summarize: ";
    pub const DEFAULT_MAX_INPUT_LENGTH: usize = 512;
    pub const DEFAULT_MAX_TARGET_LENGTH: usize = 128;
    pub const DEFAULT_PAD_TOKEN: &str = "<pad>";
    pub const DEFAULT_EOS_TOKEN: &str = "</s>";

    pub const TOKENIZER_FILENAME: &str = "tokenizer.json";
    pub const MODEL_CONFIG_FILENAME: &str = "config.json";
}
