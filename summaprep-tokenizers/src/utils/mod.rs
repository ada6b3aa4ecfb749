//!
//! Utility functions shared by the tokenizer, preprocessor and collator: resolving
//! pretrained files, label masking and padded stacking.
//!
use std::path::PathBuf;

use ndarray::Array2;

#[cfg(feature = "huggingface")]
use hf_hub::api::sync::Api;
use log::info;

use super::config::PretrainedSource;
use super::error::{TokenizerError, TokenizerResult};

pub mod special_tokens;

///
/// Resolve one file of a pretrained model to a local path, downloading it from the
/// HuggingFace hub when the identifier is not a local path.
///
/// # Arguments:
/// - identifier: a local directory, a local file, or a hub model id
/// - filename: the file to look for inside a directory or hub repository
///
pub fn resolve_pretrained_file(identifier: &str, filename: &str) -> TokenizerResult<PathBuf> {
    match PretrainedSource::from_identifier(identifier) {
        PretrainedSource::File(path) => Ok(path),
        PretrainedSource::Directory(dir) => {
            let path = dir.join(filename);
            if path.is_file() {
                Ok(path)
            } else {
                Err(TokenizerError::Resolution {
                    identifier: identifier.to_string(),
                    message: format!("{} not found in {:?}", filename, dir),
                })
            }
        }
        PretrainedSource::Hub(model_id) => fetch_from_hub(&model_id, filename),
    }
}

#[cfg(feature = "huggingface")]
fn fetch_from_hub(model_id: &str, filename: &str) -> TokenizerResult<PathBuf> {
    let resolution_error = |e: hf_hub::api::sync::ApiError| TokenizerError::Resolution {
        identifier: model_id.to_string(),
        message: e.to_string(),
    };

    info!("Fetching {} for {} from the HuggingFace hub", filename, model_id);
    let api = Api::new().map_err(resolution_error)?;
    let repo = api.model(model_id.to_string());
    repo.get(filename).map_err(resolution_error)
}

#[cfg(not(feature = "huggingface"))]
fn fetch_from_hub(model_id: &str, filename: &str) -> TokenizerResult<PathBuf> {
    info!("Cannot fetch {} for {}: hub access is disabled", filename, model_id);
    Err(TokenizerError::Resolution {
        identifier: model_id.to_string(),
        message: "not a local path and the `huggingface` feature is disabled".to_string(),
    })
}

///
/// Replace every occurrence of the pad id with the label pad sentinel so the loss
/// skips those positions. Only exact pad-id matches are replaced.
///
/// # Arguments:
/// - ids: encoded target ids
/// - pad_token_id: the tokenizer's pad id
/// - label_pad_token_id: the sentinel, usually `-100`
///
pub fn mask_pad_tokens(ids: &[u32], pad_token_id: u32, label_pad_token_id: i64) -> Vec<i64> {
    ids.iter()
        .map(|&id| {
            if id == pad_token_id {
                label_pad_token_id
            } else {
                id as i64
            }
        })
        .collect()
}

///
/// Round `length` up to the next multiple of `multiple` (no-op for `None` or `0`).
///
pub fn round_up_to_multiple(length: usize, multiple: Option<usize>) -> usize {
    match multiple {
        Some(m) if m > 0 => length.div_ceil(m) * m,
        _ => length,
    }
}

///
/// Stack variable-length rows into a `rows x width` array, right-padding each row
/// with `pad_value`. Rows longer than `width` are cut.
///
pub fn stack_padded(rows: &[Vec<i64>], width: usize, pad_value: i64) -> Array2<i64> {
    let mut batch = Array2::from_elem((rows.len(), width), pad_value);
    for (i, row) in rows.iter().enumerate() {
        for (j, &value) in row.iter().take(width).enumerate() {
            batch[[i, j]] = value;
        }
    }
    batch
}
