use serde::Serialize;

use mvjudge_core::types::{ReviewResult, DIMENSIONS};

/// Format a single review as JSON.
pub fn format_report(result: &ReviewResult, compact: bool) -> String {
    to_json(result, compact)
}

/// One dimension's score alongside its registry metadata.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DimensionBreakdown {
    pub key: &'static str,
    pub label: &'static str,
    pub weight: f64,
    pub score: f64,
    pub weighted: f64,
}

/// Wrapper that adds the per-dimension breakdown to a review.
#[derive(Debug, Serialize)]
pub struct DetailedReport<'a> {
    #[serde(flatten)]
    pub result: &'a ReviewResult,
    pub breakdown: Vec<DimensionBreakdown>,
}

/// Format a review plus its weighted breakdown as JSON.
pub fn format_detailed(result: &ReviewResult, compact: bool) -> String {
    let breakdown = DIMENSIONS
        .iter()
        .map(|d| {
            let score = result.scores.get(d.key);
            DimensionBreakdown {
                key: d.key.key(),
                label: d.label,
                weight: d.weight,
                score,
                weighted: score * d.weight,
            }
        })
        .collect();
    to_json(&DetailedReport { result, breakdown }, compact)
}

/// Format the whole history as a JSON array.
pub fn format_history(records: &[ReviewResult], compact: bool) -> String {
    to_json(&records, compact)
}

fn to_json<T: Serialize>(value: &T, compact: bool) -> String {
    if compact {
        serde_json::to_string(value).expect("review output should be serializable")
    } else {
        serde_json::to_string_pretty(value).expect("review output should be serializable")
    }
}
