//!
//! In-memory tokenizer for unit tests. Mirrors the vocabulary of
//! `tests/data/summarize/tokenizer.json` without touching the filesystem.
//!
use std::collections::HashMap;

use super::encoding::Encoding;
use super::error::TokenizerResult;
use super::tokenizer::TextTokenizer;

const WORDS: [&str; 21] = [
    "<pad>", "</s>", "<unk>", "summarize", ":", "the", "cat", "sat", "on", "mat", "a", "dog",
    "ran", "home", ".", ",", "sits", "runs", "and", "was", "happy",
];

const PAD_ID: u32 = 0;
const EOS_ID: u32 = 1;
const UNK_ID: u32 = 2;

pub struct WordTokenizer {
    vocab: HashMap<String, u32>,
}

impl Default for WordTokenizer {
    fn default() -> Self {
        let vocab = WORDS
            .iter()
            .enumerate()
            .map(|(id, word)| (word.to_string(), id as u32))
            .collect();
        Self { vocab }
    }
}

impl WordTokenizer {
    fn pieces(text: &str) -> Vec<String> {
        let mut pieces = Vec::new();
        for word in text.split_whitespace() {
            let mut current = String::new();
            for c in word.chars() {
                if c.is_alphanumeric() {
                    current.push(c);
                } else {
                    if !current.is_empty() {
                        pieces.push(std::mem::take(&mut current));
                    }
                    pieces.push(c.to_string());
                }
            }
            if !current.is_empty() {
                pieces.push(current);
            }
        }
        pieces
    }

    fn content_ids(&self, text: &str) -> Vec<u32> {
        Self::pieces(text)
            .iter()
            .map(|piece| *self.vocab.get(piece).unwrap_or(&UNK_ID))
            .collect()
    }
}

impl TextTokenizer for WordTokenizer {
    fn encode(&self, text: &str) -> TokenizerResult<Vec<u32>> {
        let mut ids = self.content_ids(text);
        ids.push(EOS_ID);
        Ok(ids)
    }

    fn encode_to_length(&self, text: &str, max_length: usize) -> TokenizerResult<Encoding> {
        let mut ids = self.content_ids(text);
        ids.truncate(max_length.saturating_sub(1));
        ids.push(EOS_ID);
        ids.truncate(max_length);

        let mut attention_mask = vec![1; ids.len()];
        ids.resize(max_length, PAD_ID);
        attention_mask.resize(max_length, 0);

        Ok(Encoding {
            input_ids: ids,
            attention_mask,
        })
    }

    fn decode(&self, ids: &[u32], skip_special_tokens: bool) -> TokenizerResult<String> {
        let words = ids
            .iter()
            .filter(|&&id| !(skip_special_tokens && id <= UNK_ID))
            .map(|&id| WORDS.get(id as usize).copied().unwrap_or("<unk>"))
            .collect::<Vec<&str>>();
        Ok(words.join(" "))
    }

    fn pad_token(&self) -> &str {
        WORDS[PAD_ID as usize]
    }

    fn pad_token_id(&self) -> u32 {
        PAD_ID
    }

    fn vocab_size(&self) -> usize {
        self.vocab.len()
    }
}
