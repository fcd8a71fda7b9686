//! Review records: raw input rows, NLP-enriched reviews, and the loosely-typed
//! row shape read back from the table store.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

// ═══════════════════════════════════════════
// Sentiment
// ═══════════════════════════════════════════

/// Sentiment label assigned by the NLP service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
    Mixed,
}

impl Sentiment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Positive => "POSITIVE",
            Self::Negative => "NEGATIVE",
            Self::Neutral => "NEUTRAL",
            Self::Mixed => "MIXED",
        }
    }

    /// Map a stored or service-provided label to a sentiment.
    /// Unknown labels are bucketed as `Neutral`.
    pub fn from_label(label: &str) -> Self {
        match label.trim() {
            "POSITIVE" => Self::Positive,
            "NEGATIVE" => Self::Negative,
            "MIXED" => Self::Mixed,
            _ => Self::Neutral,
        }
    }

    pub fn all() -> &'static [Sentiment] {
        &[Self::Positive, Self::Negative, Self::Neutral, Self::Mixed]
    }
}

impl Default for Sentiment {
    fn default() -> Self {
        Self::Neutral
    }
}

impl std::fmt::Display for Sentiment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-label confidence scores. Nominally sums to 1.0; not enforced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SentimentScore {
    pub positive: f64,
    pub negative: f64,
    pub neutral: f64,
    pub mixed: f64,
}

/// Decimal text form used for stored scores ("0.5", "1.0", "0.0213").
pub fn format_score(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        value.to_string()
    }
}

// ═══════════════════════════════════════════
// Raw input row
// ═══════════════════════════════════════════

/// One row of the uploaded review CSV.
///
/// Input headers arrive in mixed case (`reviewerName`, `day_diff`, ...);
/// serialization always uses the PascalCase attribute names. Missing columns
/// deserialize to the empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawReviewRow {
    #[serde(rename = "ReviewID")]
    pub review_id: String,
    #[serde(rename = "ProductID")]
    pub product_id: String,
    #[serde(rename(serialize = "ReviewerName", deserialize = "reviewerName"), alias = "ReviewerName")]
    pub reviewer_name: String,
    #[serde(rename(serialize = "Helpful", deserialize = "helpful"), alias = "Helpful")]
    pub helpful: String,
    #[serde(rename = "ReviewText")]
    pub review_text: String,
    #[serde(rename = "Rating")]
    pub rating: String,
    #[serde(rename(serialize = "Summary", deserialize = "summary"), alias = "Summary")]
    pub summary: String,
    #[serde(rename(serialize = "ReviewTime", deserialize = "reviewTime"), alias = "ReviewTime")]
    pub review_time: String,
    #[serde(rename(serialize = "UnixReviewTime", deserialize = "unixReviewTime"), alias = "UnixReviewTime")]
    pub unix_review_time: String,
    #[serde(rename(serialize = "DayDiff", deserialize = "day_diff"), alias = "DayDiff")]
    pub day_diff: String,
    #[serde(rename(serialize = "HelpfulYes", deserialize = "helpful_yes"), alias = "HelpfulYes")]
    pub helpful_yes: String,
    #[serde(rename(serialize = "TotalVote", deserialize = "total_vote"), alias = "TotalVote")]
    pub total_vote: String,
}

// ═══════════════════════════════════════════
// Enriched review
// ═══════════════════════════════════════════

/// A raw row plus its aligned NLP results. Primary key is `ReviewID`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnrichedReview {
    pub review: RawReviewRow,
    pub sentiment: Sentiment,
    pub scores: SentimentScore,
    pub key_phrases: Vec<String>,
    pub entities: Vec<String>,
}

impl EnrichedReview {
    pub fn review_id(&self) -> &str {
        &self.review.review_id
    }

    /// Attribute map as persisted: PascalCase names, scores as decimal
    /// text, phrase and entity lists as string arrays.
    pub fn to_item(&self) -> Map<String, Value> {
        let r = &self.review;
        let mut item = Map::new();
        let text = |s: &str| Value::String(s.to_string());
        let list = |v: &[String]| Value::Array(v.iter().cloned().map(Value::String).collect());

        item.insert("ReviewID".into(), text(&r.review_id));
        item.insert("ProductID".into(), text(&r.product_id));
        item.insert("ReviewerName".into(), text(&r.reviewer_name));
        item.insert("Helpful".into(), text(&r.helpful));
        item.insert("ReviewText".into(), text(&r.review_text));
        item.insert("Rating".into(), text(&r.rating));
        item.insert("Summary".into(), text(&r.summary));
        item.insert("ReviewTime".into(), text(&r.review_time));
        item.insert("UnixReviewTime".into(), text(&r.unix_review_time));
        item.insert("DayDiff".into(), text(&r.day_diff));
        item.insert("HelpfulYes".into(), text(&r.helpful_yes));
        item.insert("TotalVote".into(), text(&r.total_vote));
        item.insert("Sentiment".into(), text(self.sentiment.as_str()));
        item.insert("SentimentScore_Positive".into(), Value::String(format_score(self.scores.positive)));
        item.insert("SentimentScore_Negative".into(), Value::String(format_score(self.scores.negative)));
        item.insert("SentimentScore_Neutral".into(), Value::String(format_score(self.scores.neutral)));
        item.insert("SentimentScore_Mixed".into(), Value::String(format_score(self.scores.mixed)));
        item.insert("KeyPhrases".into(), list(&self.key_phrases));
        item.insert("Entities".into(), list(&self.entities));
        item
    }
}

// ═══════════════════════════════════════════
// Stored row (read side)
// ═══════════════════════════════════════════

/// A single record that cannot be turned into an `EnrichedReview`.
/// Callers skip the record and keep going.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RecordError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Invalid value for {field}: {reason}")]
    InvalidField { field: &'static str, reason: String },
}

/// Review row as read back from the table store. Every attribute is optional
/// and lists are still in their serialized form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoredReview {
    pub review_id: Option<String>,
    pub product_id: Option<String>,
    pub reviewer_name: Option<String>,
    pub helpful: Option<String>,
    pub review_text: Option<String>,
    pub rating: Option<String>,
    pub summary: Option<String>,
    pub review_time: Option<String>,
    pub unix_review_time: Option<String>,
    pub day_diff: Option<String>,
    pub helpful_yes: Option<String>,
    pub total_vote: Option<String>,
    pub sentiment: Option<String>,
    pub score_positive: Option<String>,
    pub score_negative: Option<String>,
    pub score_neutral: Option<String>,
    pub score_mixed: Option<String>,
    pub key_phrases: Option<String>,
    pub entities: Option<String>,
}

impl StoredReview {
    /// Decode into a typed review. Absent text attributes become empty
    /// strings, absent scores 0.0, absent lists empty, and a missing or
    /// unknown sentiment `NEUTRAL`.
    pub fn decode(self) -> Result<EnrichedReview, RecordError> {
        let review_id = self
            .review_id
            .filter(|id| !id.is_empty())
            .ok_or(RecordError::MissingField("ReviewID"))?;

        Ok(EnrichedReview {
            review: RawReviewRow {
                review_id,
                product_id: self.product_id.unwrap_or_default(),
                reviewer_name: self.reviewer_name.unwrap_or_default(),
                helpful: self.helpful.unwrap_or_default(),
                review_text: self.review_text.unwrap_or_default(),
                rating: self.rating.unwrap_or_default(),
                summary: self.summary.unwrap_or_default(),
                review_time: self.review_time.unwrap_or_default(),
                unix_review_time: self.unix_review_time.unwrap_or_default(),
                day_diff: self.day_diff.unwrap_or_default(),
                helpful_yes: self.helpful_yes.unwrap_or_default(),
                total_vote: self.total_vote.unwrap_or_default(),
            },
            sentiment: self
                .sentiment
                .as_deref()
                .map(Sentiment::from_label)
                .unwrap_or_default(),
            scores: SentimentScore {
                positive: parse_score("SentimentScore_Positive", self.score_positive)?,
                negative: parse_score("SentimentScore_Negative", self.score_negative)?,
                neutral: parse_score("SentimentScore_Neutral", self.score_neutral)?,
                mixed: parse_score("SentimentScore_Mixed", self.score_mixed)?,
            },
            key_phrases: parse_string_list("KeyPhrases", self.key_phrases)?,
            entities: parse_string_list("Entities", self.entities)?,
        })
    }
}

fn parse_score(field: &'static str, raw: Option<String>) -> Result<f64, RecordError> {
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(0.0),
        Some(text) => text.parse::<f64>().map_err(|e| RecordError::InvalidField {
            field,
            reason: e.to_string(),
        }),
    }
}

fn parse_string_list(field: &'static str, raw: Option<String>) -> Result<Vec<String>, RecordError> {
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(Vec::new()),
        Some(json) => serde_json::from_str::<Vec<String>>(json).map_err(|e| {
            RecordError::InvalidField {
                field,
                reason: e.to_string(),
            }
        }),
    }
}
