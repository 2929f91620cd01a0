//! Extraction of structured recommendations from model responses, which
//! often wrap the JSON payload in prose or markdown fences.

use crate::error::FinSageError;
use crate::models::anomaly::{Recommendation, Severity};
use serde::Deserialize;

/// Wire shape of one recommendation as the model is asked to emit it.
#[derive(Debug, Deserialize)]
struct RawRecommendation {
    category: String,
    message: String,
    #[serde(rename = "type")]
    severity: Severity,
}

/// Parse a JSON array of recommendations out of a model response.
///
/// The array is located by bracket scanning so leading/trailing prose and
/// markdown fences are tolerated. An empty array is rejected: the caller
/// guarantees at least one recommendation, so nothing useful came back.
pub fn parse_recommendations(response: &str) -> Result<Vec<Recommendation>, FinSageError> {
    let response = response.trim();

    let start = response.find('[');
    let end = response.rfind(']');

    let json_str = match (start, end) {
        (Some(s), Some(e)) if s < e => &response[s..=e],
        _ => {
            return Err(FinSageError::MalformedInsightResponse(format!(
                "No JSON array found in response | Raw: {}",
                truncate(response)
            )));
        }
    };

    let raw: Vec<RawRecommendation> = serde_json::from_str(json_str).map_err(|e| {
        FinSageError::MalformedInsightResponse(format!(
            "Invalid JSON from insight service: {} | Raw: {}",
            e,
            truncate(json_str)
        ))
    })?;

    if raw.is_empty() {
        return Err(FinSageError::MalformedInsightResponse(
            "Insight service returned an empty recommendation list".into(),
        ));
    }

    Ok(raw
        .into_iter()
        .map(|r| Recommendation {
            category: r.category,
            message: r.message,
            severity: r.severity,
        })
        .collect())
}

fn truncate(text: &str) -> String {
    // Cut on a char boundary; byte indexing would panic mid-codepoint.
    match text.char_indices().nth(200) {
        Some((i, _)) => format!("{}...", &text[..i]),
        None => text.to_string(),
    }
}
