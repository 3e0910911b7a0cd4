use chrono::Utc;
use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;

use crate::error::ReviewError;
use crate::scoring::calculate_total;
use crate::types::{AnalysisOutput, Dimension, ReviewDetails, ReviewResult, ReviewScores};

/// Source of record timestamps.
pub trait Clock {
    /// Current time in milliseconds since the Unix epoch.
    fn now_millis(&self) -> i64;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

/// A clock frozen at a fixed instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub i64);

impl Clock for FixedClock {
    fn now_millis(&self) -> i64 {
        self.0
    }
}

// Every field required, unlike `ReviewScores`.
#[derive(Deserialize)]
pub(crate) struct StrictScores {
    music: f64,
    tech: f64,
    fusion: f64,
    creative: f64,
}

impl From<StrictScores> for ReviewScores {
    fn from(s: StrictScores) -> Self {
        ReviewScores::new(s.music, s.tech, s.fusion, s.creative)
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StrictDescriptions {
    music_desc: String,
    tech_desc: String,
    fusion_desc: String,
    creative_desc: String,
    overall_suggestion: String,
}

/// Validate raw analyzer output.
///
/// Every score and description field must be present; scores must be finite
/// numbers in [0, 100].
pub fn parse_analysis(raw: &Value) -> Result<AnalysisOutput, ReviewError> {
    let obj = raw.as_object().ok_or_else(|| {
        ReviewError::MalformedAnalysisResult("analysis result is not a JSON object".to_string())
    })?;

    let scores_value = obj
        .get("scores")
        .ok_or_else(|| ReviewError::MalformedAnalysisResult("missing 'scores'".to_string()))?;
    let descriptions_value = obj.get("descriptions").ok_or_else(|| {
        ReviewError::MalformedAnalysisResult("missing 'descriptions'".to_string())
    })?;

    let strict_scores = StrictScores::deserialize(scores_value)
        .map_err(|e| ReviewError::MalformedAnalysisResult(format!("invalid scores: {e}")))?;
    let strict_desc = StrictDescriptions::deserialize(descriptions_value)
        .map_err(|e| ReviewError::MalformedAnalysisResult(format!("invalid descriptions: {e}")))?;

    let scores = ReviewScores::from(strict_scores);
    for dim in Dimension::ALL {
        let score = scores.get(dim);
        if !score.is_finite() || !(0.0..=100.0).contains(&score) {
            return Err(ReviewError::MalformedAnalysisResult(format!(
                "score for '{dim}' is {score}, expected a number in [0, 100]"
            )));
        }
    }

    Ok(AnalysisOutput {
        scores,
        descriptions: ReviewDetails {
            music_desc: strict_desc.music_desc,
            tech_desc: strict_desc.tech_desc,
            fusion_desc: strict_desc.fusion_desc,
            creative_desc: strict_desc.creative_desc,
            overall_suggestion: strict_desc.overall_suggestion,
        },
    })
}

/// Build a history record from raw analyzer output.
pub fn build_record(
    raw: &Value,
    file_name: &str,
    clock: &dyn Clock,
) -> Result<ReviewResult, ReviewError> {
    let analysis = parse_analysis(raw)?;
    Ok(build_from_analysis(analysis, file_name, clock))
}

/// Build a record from already-validated analysis output.
pub fn build_from_analysis(
    analysis: AnalysisOutput,
    file_name: &str,
    clock: &dyn Clock,
) -> ReviewResult {
    ReviewResult {
        id: Uuid::new_v4().to_string(),
        file_name: file_name.to_string(),
        total_score: calculate_total(&analysis.scores),
        scores: analysis.scores,
        details: analysis.descriptions,
        timestamp: clock.now_millis(),
    }
}
