/// Columns of the cleaned BI export, in output order.
pub const EXPORT_COLUMNS: [&str; 15] = [
    "HelpfulYes",
    "ProductID",
    "Rating",
    "ReviewID",
    "ReviewText",
    "ReviewTime",
    "ReviewerName",
    "Sentiment",
    "SentimentScore_Mixed",
    "SentimentScore_Negative",
    "SentimentScore_Neutral",
    "SentimentScore_Positive",
    "Summary",
    "TotalVote",
    "UnixReviewTime",
];

/// Free-text columns passed through `clean_text`.
pub const SANITIZED_COLUMNS: [&str; 3] = ["ReviewText", "ReviewerName", "Summary"];

pub fn is_sanitized(column: &str) -> bool {
    SANITIZED_COLUMNS.contains(&column)
}

/// Strip quotes, drop every `", "`, then turn remaining commas into spaces.
/// The steps run in this order; the result contains no quotes or commas.
pub fn clean_text(text: &str) -> String {
    text.replace(['"', '\''], "")
        .replace(", ", "")
        .replace(',', " ")
}
