use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::consts::{ARTICLE_FIELD, HIGHLIGHTS_FIELD};
use crate::errors::CoreError;

///
/// One dataset record before tokenization: a source document and the summary
/// the model should learn to produce for it.
///
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RawExample {
    pub article: String,
    pub highlights: String,
}

impl RawExample {
    pub fn new(article: impl Into<String>, highlights: impl Into<String>) -> Self {
        Self {
            article: article.into(),
            highlights: highlights.into(),
        }
    }
}

///
/// Pull the two text fields out of a loosely typed record. Extra fields (like
/// the `id` column of CNN/DailyMail) are ignored.
///
impl TryFrom<&Value> for RawExample {
    type Error = CoreError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        let field = |name: &'static str| {
            value
                .get(name)
                .and_then(Value::as_str)
                .map(str::to_owned)
                .ok_or(CoreError::MissingField(name))
        };

        Ok(RawExample {
            article: field(ARTICLE_FIELD)?,
            highlights: field(HIGHLIGHTS_FIELD)?,
        })
    }
}
