#[cfg(feature = "core")]
#[doc(inline)]
pub use summaprep_core as core;

#[cfg(feature = "tokenizers")]
#[doc(inline)]
pub use summaprep_tokenizers as tokenizers;
