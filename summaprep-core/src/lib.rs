//! # summaprep-core
//!
//! Data model shared by every summaprep crate.
//!
//! A summarization dataset is a stream of [RawExample] records, each carrying the
//! source document (`article`) and its reference summary (`highlights`). Preprocessing
//! turns them into [ProcessedExample] records (`input_ids`, `attention_mask`, `labels`)
//! that a training loop can batch and feed to a sequence-to-sequence model.
//!
//! The field names on both sides are the interchange format with dataset sources and
//! training drivers, so they are fixed here and nowhere else.
//!
//! ## Example
//!
//! ```rust
//! use summaprep_core::RawExample;
//!
//! let value = serde_json::json!({
//!     "article": "The cat sat on the mat.",
//!     "highlights": "Cat sits.",
//! });
//! let example = RawExample::try_from(&value).unwrap();
//! assert_eq!(example.highlights, "Cat sits.");
//! ```
//!
pub mod errors;
pub mod models;
pub mod utils;

pub use errors::*;
pub use models::*;
pub use utils::{read_processed_examples, read_raw_examples, write_processed_examples};

pub mod consts {
    /// Label value that tells the loss to skip a position.
    pub const IGNORE_INDEX: i64 = -100;

    pub const ARTICLE_FIELD: &str = "article";
    pub const HIGHLIGHTS_FIELD: &str = "highlights";
}
