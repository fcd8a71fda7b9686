//! Deterministic in-process analyzer for tests.

use std::sync::Mutex;

use super::{Indexed, NlpError, SentimentDetection, TextAnalyzer};
use crate::models::{Sentiment, SentimentScore};

#[derive(Debug, Clone)]
struct Call {
    operation: &'static str,
    size: usize,
    language: String,
}

/// Mock analyzer. Results are a pure function of each text:
/// - sentiment: "but" → MIXED, "great"/"love" → POSITIVE,
///   "bad"/"broke" → NEGATIVE, otherwise NEUTRAL
/// - key phrases: lowercase words longer than three characters
/// - entities: capitalized words
pub struct MockTextAnalyzer {
    calls: Mutex<Vec<Call>>,
    reversed_operations: Vec<&'static str>,
    fail_on_call: Option<usize>,
}

impl MockTextAnalyzer {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            reversed_operations: Vec::new(),
            fail_on_call: None,
        }
    }

    /// Return each batch's results in reverse order.
    pub fn reversed(mut self) -> Self {
        self.reversed_operations = vec!["sentiment", "key_phrases", "entities"];
        self
    }

    /// Reverse result order for `operation` only; other operations keep
    /// input order.
    pub fn reversed_for(mut self, operation: &'static str) -> Self {
        self.reversed_operations.push(operation);
        self
    }

    /// Fail the n-th call (1-based, counted across all operations).
    pub fn failing_on_call(mut self, n: usize) -> Self {
        self.fail_on_call = Some(n);
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().map(|c| c.len()).unwrap_or(0)
    }

    pub fn chunk_sizes(&self, operation: &str) -> Vec<usize> {
        self.calls
            .lock()
            .map(|c| {
                c.iter()
                    .filter(|call| call.operation == operation)
                    .map(|call| call.size)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Distinct language codes seen, in first-use order.
    pub fn languages(&self) -> Vec<String> {
        let mut seen = Vec::new();
        if let Ok(calls) = self.calls.lock() {
            for call in calls.iter() {
                if !seen.contains(&call.language) {
                    seen.push(call.language.clone());
                }
            }
        }
        seen
    }

    pub fn sentiment_for(text: &str) -> Sentiment {
        let words = words(text);
        let has = |w: &str| words.iter().any(|x| x.eq_ignore_ascii_case(w));
        if has("but") {
            Sentiment::Mixed
        } else if has("great") || has("love") {
            Sentiment::Positive
        } else if has("bad") || has("broke") {
            Sentiment::Negative
        } else {
            Sentiment::Neutral
        }
    }

    pub fn phrases_for(text: &str) -> Vec<String> {
        words(text)
            .into_iter()
            .filter(|w| w.chars().count() > 3)
            .map(|w| w.to_lowercase())
            .collect()
    }

    pub fn entities_for(text: &str) -> Vec<String> {
        words(text)
            .into_iter()
            .filter(|w| w.chars().next().is_some_and(char::is_uppercase))
            .map(str::to_string)
            .collect()
    }

    fn record<T>(
        &self,
        operation: &'static str,
        texts: &[String],
        language: &str,
        compute: impl Fn(&str) -> T,
    ) -> Result<Vec<Indexed<T>>, NlpError> {
        let call_no = {
            let mut calls = self
                .calls
                .lock()
                .map_err(|_| NlpError::HttpClient("mock call log poisoned".into()))?;
            calls.push(Call {
                operation,
                size: texts.len(),
                language: language.to_string(),
            });
            calls.len()
        };

        if self.fail_on_call == Some(call_no) {
            return Err(NlpError::Service {
                status: 500,
                body: format!("mock failure on call {call_no}"),
            });
        }

        let mut results: Vec<Indexed<T>> = texts
            .iter()
            .enumerate()
            .map(|(i, t)| Indexed::new(i, compute(t)))
            .collect();
        if self.reversed_operations.contains(&operation) {
            results.reverse();
        }
        Ok(results)
    }
}

impl Default for MockTextAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

fn words(text: &str) -> Vec<&str> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect()
}

fn scores_for(sentiment: Sentiment) -> SentimentScore {
    let mut scores = SentimentScore {
        positive: 0.05,
        negative: 0.05,
        neutral: 0.05,
        mixed: 0.05,
    };
    match sentiment {
        Sentiment::Positive => scores.positive = 0.85,
        Sentiment::Negative => scores.negative = 0.85,
        Sentiment::Neutral => scores.neutral = 0.85,
        Sentiment::Mixed => scores.mixed = 0.85,
    }
    scores
}

impl TextAnalyzer for MockTextAnalyzer {
    fn detect_sentiment(
        &self,
        texts: &[String],
        language: &str,
    ) -> Result<Vec<Indexed<SentimentDetection>>, NlpError> {
        self.record("sentiment", texts, language, |t| {
            let sentiment = Self::sentiment_for(t);
            SentimentDetection {
                sentiment,
                scores: scores_for(sentiment),
            }
        })
    }

    fn detect_key_phrases(
        &self,
        texts: &[String],
        language: &str,
    ) -> Result<Vec<Indexed<Vec<String>>>, NlpError> {
        self.record("key_phrases", texts, language, Self::phrases_for)
    }

    fn detect_entities(
        &self,
        texts: &[String],
        language: &str,
    ) -> Result<Vec<Indexed<Vec<String>>>, NlpError> {
        self.record("entities", texts, language, Self::entities_for)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mock_sentiment_rules() {
        assert_eq!(MockTextAnalyzer::sentiment_for("Great product"), Sentiment::Positive);
        assert_eq!(MockTextAnalyzer::sentiment_for("it broke"), Sentiment::Negative);
        assert_eq!(MockTextAnalyzer::sentiment_for("great but broke"), Sentiment::Mixed);
        assert_eq!(MockTextAnalyzer::sentiment_for(" "), Sentiment::Neutral);
    }

    #[test]
    fn mock_fails_requested_call() {
        let analyzer = MockTextAnalyzer::new().failing_on_call(2);
        let texts = vec!["a".to_string()];
        assert!(analyzer.detect_sentiment(&texts, "en").is_ok());
        assert!(analyzer.detect_sentiment(&texts, "en").is_err());
        assert_eq!(analyzer.call_count(), 2);
    }
}
