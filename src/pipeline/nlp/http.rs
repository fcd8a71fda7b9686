use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::{Indexed, NlpError, SentimentDetection, TextAnalyzer};
use crate::models::{Sentiment, SentimentScore};

/// HTTP client for a Comprehend-style batch text-analysis service.
///
/// Each operation is `POST {base_url}/<operation>` with
/// `{"TextList": [...], "LanguageCode": "en"}`; responses carry a
/// `ResultList` of index-tagged results and an `ErrorList`.
pub struct HttpTextAnalyzer {
    base_url: String,
    client: reqwest::blocking::Client,
    timeout: Option<Duration>,
}

impl HttpTextAnalyzer {
    /// Client without a request timeout; the caller waits for the service.
    pub fn new(base_url: &str) -> Result<Self, NlpError> {
        Self::with_timeout(base_url, None)
    }

    /// `None` disables reqwest's 30s default for blocking clients.
    pub fn with_timeout(base_url: &str, timeout: Option<Duration>) -> Result<Self, NlpError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| NlpError::HttpClient(e.to_string()))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            timeout,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    fn post_batch<T>(&self, operation: &str, texts: &[String], language: &str) -> Result<Vec<T>, NlpError>
    where
        T: for<'de> Deserialize<'de>,
    {
        let url = format!("{}/{operation}", self.base_url);
        let body = BatchRequest {
            text_list: texts,
            language_code: language,
        };

        let response = self.client.post(&url).json(&body).send().map_err(|e| {
            if e.is_connect() {
                NlpError::Connection(self.base_url.clone())
            } else if e.is_timeout() {
                NlpError::HttpClient(format!("Request timed out after {:?}", self.timeout))
            } else {
                NlpError::HttpClient(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(NlpError::Service {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: BatchResponse<T> = response
            .json()
            .map_err(|e| NlpError::ResponseParsing(e.to_string()))?;

        parsed.into_results()
    }
}

/// Request body shared by all three batch operations.
#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct BatchRequest<'a> {
    text_list: &'a [String],
    language_code: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct BatchResponse<T> {
    #[serde(default = "Vec::new")]
    result_list: Vec<T>,
    #[serde(default)]
    error_list: Vec<BatchItemError>,
}

impl<T> BatchResponse<T> {
    /// Any per-item error fails the whole batch.
    fn into_results(self) -> Result<Vec<T>, NlpError> {
        if let Some(first) = self.error_list.first() {
            return Err(NlpError::ItemErrors {
                count: self.error_list.len(),
                index: first.index,
                message: format!("{}: {}", first.error_code, first.error_message),
            });
        }
        Ok(self.result_list)
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct BatchItemError {
    index: usize,
    #[serde(default)]
    error_code: String,
    #[serde(default)]
    error_message: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct SentimentItem {
    index: usize,
    sentiment: String,
    #[serde(default)]
    sentiment_score: SentimentScore,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct TextSpan {
    text: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct KeyPhrasesItem {
    index: usize,
    #[serde(default)]
    key_phrases: Vec<TextSpan>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct EntitiesItem {
    index: usize,
    #[serde(default)]
    entities: Vec<TextSpan>,
}

impl From<SentimentItem> for Indexed<SentimentDetection> {
    fn from(item: SentimentItem) -> Self {
        Indexed::new(
            item.index,
            SentimentDetection {
                sentiment: Sentiment::from_label(&item.sentiment),
                scores: item.sentiment_score,
            },
        )
    }
}

fn span_texts(spans: Vec<TextSpan>) -> Vec<String> {
    spans.into_iter().map(|s| s.text).collect()
}

impl TextAnalyzer for HttpTextAnalyzer {
    fn detect_sentiment(
        &self,
        texts: &[String],
        language: &str,
    ) -> Result<Vec<Indexed<SentimentDetection>>, NlpError> {
        let items: Vec<SentimentItem> = self.post_batch("batch-detect-sentiment", texts, language)?;
        Ok(items.into_iter().map(Indexed::from).collect())
    }

    fn detect_key_phrases(
        &self,
        texts: &[String],
        language: &str,
    ) -> Result<Vec<Indexed<Vec<String>>>, NlpError> {
        let items: Vec<KeyPhrasesItem> =
            self.post_batch("batch-detect-key-phrases", texts, language)?;
        Ok(items
            .into_iter()
            .map(|item| Indexed::new(item.index, span_texts(item.key_phrases)))
            .collect())
    }

    fn detect_entities(
        &self,
        texts: &[String],
        language: &str,
    ) -> Result<Vec<Indexed<Vec<String>>>, NlpError> {
        let items: Vec<EntitiesItem> = self.post_batch("batch-detect-entities", texts, language)?;
        Ok(items
            .into_iter()
            .map(|item| Indexed::new(item.index, span_texts(item.entities)))
            .collect())
    }
}
