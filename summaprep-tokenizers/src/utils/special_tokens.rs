use crate::consts::{DEFAULT_EOS_TOKEN, DEFAULT_PAD_TOKEN};

///
/// The special tokens the preprocessor relies on. T5 uses `<pad>` both for
/// padding and as the decoder start token, and closes every sequence with `</s>`.
///
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SpecialTokens {
    pub pad: String,
    pub eos: String,
}

impl Default for SpecialTokens {
    fn default() -> Self {
        SpecialTokens {
            pad: DEFAULT_PAD_TOKEN.to_string(),
            eos: DEFAULT_EOS_TOKEN.to_string(),
        }
    }
}

impl From<&SpecialTokens> for Vec<String> {
    fn from(val: &SpecialTokens) -> Self {
        vec![val.pad.clone(), val.eos.clone()]
    }
}
