use serde::{Deserialize, Serialize};

/// One atomic key phrase of one review, as written to the key-phrase export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExplodedPhraseRow {
    #[serde(rename = "ReviewID")]
    pub review_id: String,
    #[serde(rename = "Sentiment")]
    pub sentiment: String,
    #[serde(rename = "KeyPhrases")]
    pub key_phrase: String,
}
