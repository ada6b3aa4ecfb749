use std::path::Path;
use std::sync::Arc;

use log::info;
use once_cell::sync::OnceCell;
use tokenizers::{PaddingDirection, PostProcessor, Tokenizer, TruncationDirection};

use crate::consts::{DEFAULT_MODEL_NAME, TOKENIZER_FILENAME};

use super::encoding::Encoding;
use super::error::{TokenizerError, TokenizerResult};
use super::utils::resolve_pretrained_file;
use super::utils::special_tokens::SpecialTokens;

///
/// The shared tokenizer capability. Implementations are read-only after
/// construction so one instance can serve every preprocessing call, from any thread.
///
pub trait TextTokenizer: Send + Sync {
    ///
    /// Encode `text` with the model's special tokens, without truncation or padding.
    ///
    fn encode(&self, text: &str) -> TokenizerResult<Vec<u32>>;

    ///
    /// Encode `text` to exactly `max_length` tokens: overflow is dropped (keeping
    /// room for the special tokens) and short sequences are right-padded with the
    /// pad id.
    ///
    fn encode_to_length(&self, text: &str, max_length: usize) -> TokenizerResult<Encoding>;

    fn decode(&self, ids: &[u32], skip_special_tokens: bool) -> TokenizerResult<String>;

    fn pad_token(&self) -> &str;

    fn pad_token_id(&self) -> u32;

    fn vocab_size(&self) -> usize;
}

///
/// [TextTokenizer] backed by a HuggingFace `tokenizer.json`.
///
pub struct HfTokenizer {
    inner: Tokenizer,
    special_tokens: SpecialTokens,
    pad_token_id: u32,
}

impl HfTokenizer {
    ///
    /// Wrap a loaded tokenizer. Any truncation or padding stored in the tokenizer file
    /// is cleared; lengths are decided per call.
    ///
    pub fn new(mut inner: Tokenizer, special_tokens: SpecialTokens) -> TokenizerResult<Self> {
        for token in Vec::<String>::from(&special_tokens) {
            if inner.token_to_id(&token).is_none() {
                return Err(TokenizerError::InvalidSpecialTokenConfig(token));
            }
        }
        let pad_token_id = inner
            .token_to_id(&special_tokens.pad)
            .ok_or_else(|| TokenizerError::InvalidSpecialTokenConfig(special_tokens.pad.clone()))?;

        inner
            .with_truncation(None)
            .map_err(|e| TokenizerError::Encode(e.to_string()))?;
        inner.with_padding(None);

        Ok(HfTokenizer {
            inner,
            special_tokens,
            pad_token_id,
        })
    }

    ///
    /// Load a tokenizer from a local `tokenizer.json`
    ///
    pub fn from_file<P: AsRef<Path>>(path: P) -> TokenizerResult<Self> {
        Self::from_file_with_special_tokens(path, SpecialTokens::default())
    }

    pub fn from_file_with_special_tokens<P: AsRef<Path>>(
        path: P,
        special_tokens: SpecialTokens,
    ) -> TokenizerResult<Self> {
        let inner = Tokenizer::from_file(path.as_ref()).map_err(|e| TokenizerError::Load {
            path: path.as_ref().to_path_buf(),
            message: e.to_string(),
        })?;
        Self::new(inner, special_tokens)
    }

    ///
    /// Load the tokenizer of a pretrained model: a local directory, a local
    /// `tokenizer.json`, or a model id on the HuggingFace hub.
    ///
    pub fn from_pretrained(identifier: &str) -> TokenizerResult<Self> {
        Self::from_pretrained_with_special_tokens(identifier, SpecialTokens::default())
    }

    pub fn from_pretrained_with_special_tokens(
        identifier: &str,
        special_tokens: SpecialTokens,
    ) -> TokenizerResult<Self> {
        let path = resolve_pretrained_file(identifier, TOKENIZER_FILENAME)?;
        info!("Loading tokenizer for {} from {:?}", identifier, path);
        Self::from_file_with_special_tokens(path, special_tokens)
    }

    pub fn inner(&self) -> &Tokenizer {
        &self.inner
    }

    pub fn get_special_tokens(&self) -> &SpecialTokens {
        &self.special_tokens
    }

    fn num_special_tokens_to_add(&self) -> usize {
        self.inner
            .get_post_processor()
            .map(|processor| processor.added_tokens(false))
            .unwrap_or(0)
    }
}

impl TextTokenizer for HfTokenizer {
    fn encode(&self, text: &str) -> TokenizerResult<Vec<u32>> {
        let encoding = self
            .inner
            .encode(text, true)
            .map_err(|e| TokenizerError::Encode(e.to_string()))?;
        Ok(encoding.get_ids().to_vec())
    }

    fn encode_to_length(&self, text: &str, max_length: usize) -> TokenizerResult<Encoding> {
        let mut encoding = self
            .inner
            .encode(text, false)
            .map_err(|e| TokenizerError::Encode(e.to_string()))?;

        let content_length = max_length.saturating_sub(self.num_special_tokens_to_add());
        encoding.truncate(content_length, 0, TruncationDirection::Right);

        let mut encoding = self
            .inner
            .post_process(encoding, None, true)
            .map_err(|e| TokenizerError::Encode(e.to_string()))?;

        // only hit when max_length cannot even hold the special tokens
        if encoding.len() > max_length {
            encoding.truncate(max_length, 0, TruncationDirection::Right);
        }
        encoding.pad(
            max_length,
            self.pad_token_id,
            0,
            &self.special_tokens.pad,
            PaddingDirection::Right,
        );

        Ok(Encoding {
            input_ids: encoding.get_ids().to_vec(),
            attention_mask: encoding.get_attention_mask().to_vec(),
        })
    }

    fn decode(&self, ids: &[u32], skip_special_tokens: bool) -> TokenizerResult<String> {
        self.inner
            .decode(ids, skip_special_tokens)
            .map_err(|e| TokenizerError::Decode(e.to_string()))
    }

    fn pad_token(&self) -> &str {
        &self.special_tokens.pad
    }

    fn pad_token_id(&self) -> u32 {
        self.pad_token_id
    }

    fn vocab_size(&self) -> usize {
        self.inner.get_vocab(true).len()
    }
}

///
/// A slot holding one tokenizer for the lifetime of its owner. The first successful
/// initialization wins; a failed one is not cached, so the next call retries.
///
pub struct TokenizerCell {
    cell: OnceCell<Arc<dyn TextTokenizer>>,
}

impl TokenizerCell {
    pub const fn new() -> Self {
        Self {
            cell: OnceCell::new(),
        }
    }

    pub fn get(&self) -> Option<Arc<dyn TextTokenizer>> {
        self.cell.get().map(Arc::clone)
    }

    pub fn get_or_try_init<F>(&self, init: F) -> TokenizerResult<Arc<dyn TextTokenizer>>
    where
        F: FnOnce() -> TokenizerResult<Arc<dyn TextTokenizer>>,
    {
        self.cell.get_or_try_init(init).map(Arc::clone)
    }
}

impl Default for TokenizerCell {
    fn default() -> Self {
        Self::new()
    }
}

static SHARED_TOKENIZER: TokenizerCell = TokenizerCell::new();

///
/// The process-wide tokenizer of the default model (`t5-small`). Loaded on first
/// call; every later call returns the same instance.
///
pub fn shared_tokenizer() -> TokenizerResult<Arc<dyn TextTokenizer>> {
    SHARED_TOKENIZER.get_or_try_init(|| {
        info!("Initializing shared tokenizer for {}", DEFAULT_MODEL_NAME);
        let tokenizer: Arc<dyn TextTokenizer> =
            Arc::new(HfTokenizer::from_pretrained(DEFAULT_MODEL_NAME)?);
        Ok(tokenizer)
    })
}

#[cfg(test)]
mod tokenizer_tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::*;

    #[fixture]
    fn tokenizer_path() -> &'static str {
        "../tests/data/summarize/tokenizer.json"
    }

    fn load_shared(path: &str) -> TokenizerResult<Arc<dyn TextTokenizer>> {
        let tokenizer: Arc<dyn TextTokenizer> = Arc::new(HfTokenizer::from_file(path)?);
        Ok(tokenizer)
    }

    #[fixture]
    fn tokenizer(tokenizer_path: &str) -> HfTokenizer {
        HfTokenizer::from_file(tokenizer_path).expect("Failed to load the test tokenizer")
    }

    #[rstest]
    fn test_tokenizer_creation_from_file(tokenizer: HfTokenizer) {
        assert_eq!(tokenizer.vocab_size(), 21);
        assert_eq!(tokenizer.pad_token(), "<pad>");
        assert_eq!(tokenizer.pad_token_id(), 0);
        assert_eq!(tokenizer.get_special_tokens().eos, "</s>");
        assert_eq!(tokenizer.inner().token_to_id("</s>"), Some(1));
    }

    #[rstest]
    fn test_tokenizer_creation_from_pretrained_directory() {
        let tokenizer = HfTokenizer::from_pretrained("../tests/data/summarize/pretrained")
            .expect("Failed to load the test tokenizer");
        assert_eq!(tokenizer.vocab_size(), 21);
    }

    #[rstest]
    fn test_tokenizer_missing_file() {
        let result = HfTokenizer::from_file("../tests/data/summarize/nope.json");
        assert_eq!(matches!(result, Err(TokenizerError::Load { .. })), true);
    }

    #[rstest]
    fn test_tokenizer_unknown_pad_token(tokenizer_path: &str) {
        let special_tokens = SpecialTokens {
            pad: "[PAD]".to_string(),
            ..Default::default()
        };
        let result = HfTokenizer::from_file_with_special_tokens(tokenizer_path, special_tokens);
        assert_eq!(
            matches!(result, Err(TokenizerError::InvalidSpecialTokenConfig(ref t)) if t == "[PAD]"),
            true
        );
    }

    #[rstest]
    fn test_encode_appends_eos(tokenizer: HfTokenizer) {
        let ids = tokenizer.encode("the cat sat").unwrap();
        assert_eq!(ids, vec![5, 6, 7, 1]);
    }

    #[rstest]
    fn test_encode_unknown_word(tokenizer: HfTokenizer) {
        let ids = tokenizer.encode("the zebra").unwrap();
        assert_eq!(ids, vec![5, 2, 1]);
    }

    #[rstest]
    fn test_encode_to_length_pads(tokenizer: HfTokenizer) {
        let encoding = tokenizer.encode_to_length("the cat sat", 6).unwrap();
        assert_eq!(encoding.input_ids, vec![5, 6, 7, 1, 0, 0]);
        assert_eq!(encoding.attention_mask, vec![1, 1, 1, 1, 0, 0]);
    }

    #[rstest]
    fn test_encode_to_length_truncates_keeping_eos(tokenizer: HfTokenizer) {
        let encoding = tokenizer
            .encode_to_length("the cat sat on the mat", 4)
            .unwrap();
        assert_eq!(encoding.input_ids, vec![5, 6, 7, 1]);
        assert_eq!(encoding.attention_mask, vec![1, 1, 1, 1]);
    }

    #[rstest]
    #[case(1)]
    #[case(2)]
    fn test_encode_to_tiny_length(tokenizer: HfTokenizer, #[case] max_length: usize) {
        let encoding = tokenizer.encode_to_length("the cat sat", max_length).unwrap();
        assert_eq!(encoding.len(), max_length);
    }

    #[rstest]
    fn test_encode_empty_text(tokenizer: HfTokenizer) {
        let encoding = tokenizer.encode_to_length("", 3).unwrap();
        assert_eq!(encoding.input_ids, vec![1, 0, 0]);
    }

    #[rstest]
    fn test_decode_skips_special_tokens(tokenizer: HfTokenizer) {
        let text = tokenizer.decode(&[5, 6, 7, 1, 0, 0], true).unwrap();
        assert_eq!(text, "the cat sat");
    }

    #[rstest]
    fn test_cell_returns_same_instance(tokenizer_path: &str) {
        let cell = TokenizerCell::new();
        assert_eq!(cell.get().is_none(), true);

        let first = cell
            .get_or_try_init(|| load_shared(tokenizer_path))
            .unwrap();
        let second = cell
            .get_or_try_init(|| panic!("initializer must only run once"))
            .unwrap();

        assert_eq!(Arc::ptr_eq(&first, &second), true);
    }

    #[rstest]
    fn test_cell_does_not_cache_failure(tokenizer_path: &str) {
        let cell = TokenizerCell::new();

        let failed = cell.get_or_try_init(|| load_shared("../tests/data/summarize/nope.json"));
        assert_eq!(failed.is_err(), true);

        let loaded = cell.get_or_try_init(|| load_shared(tokenizer_path));
        assert_eq!(loaded.is_ok(), true);
    }

    #[rstest]
    #[ignore = "downloads t5-small from the HuggingFace hub"]
    fn test_shared_tokenizer_is_shared() {
        let first = shared_tokenizer().unwrap();
        let second = shared_tokenizer().unwrap();
        assert_eq!(Arc::ptr_eq(&first, &second), true);
        assert_eq!(first.pad_token_id(), 0);
    }
}
