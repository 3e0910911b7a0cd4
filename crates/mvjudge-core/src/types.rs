use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};

/// One of the four fixed scoring axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dimension {
    Music,
    Tech,
    Fusion,
    Creative,
}

impl Dimension {
    /// All dimensions in registry order.
    pub const ALL: [Dimension; 4] = [
        Dimension::Music,
        Dimension::Tech,
        Dimension::Fusion,
        Dimension::Creative,
    ];

    /// Key used in analyzer payloads and persisted records.
    pub fn key(&self) -> &'static str {
        match self {
            Dimension::Music => "music",
            Dimension::Tech => "tech",
            Dimension::Fusion => "fusion",
            Dimension::Creative => "creative",
        }
    }

    /// Key of this dimension's description field (e.g. `musicDesc`).
    pub fn desc_key(&self) -> &'static str {
        match self {
            Dimension::Music => "musicDesc",
            Dimension::Tech => "techDesc",
            Dimension::Fusion => "fusionDesc",
            Dimension::Creative => "creativeDesc",
        }
    }

    /// Registry entry for this dimension.
    pub fn spec(&self) -> &'static DimensionSpec {
        match self {
            Dimension::Music => &DIMENSIONS[0],
            Dimension::Tech => &DIMENSIONS[1],
            Dimension::Fusion => &DIMENSIONS[2],
            Dimension::Creative => &DIMENSIONS[3],
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

impl FromStr for Dimension {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "music" => Ok(Dimension::Music),
            "tech" => Ok(Dimension::Tech),
            "fusion" => Ok(Dimension::Fusion),
            "creative" => Ok(Dimension::Creative),
            _ => anyhow::bail!(
                "unknown dimension '{s}', expected one of: music, tech, fusion, creative"
            ),
        }
    }
}

/// Static configuration of a scoring dimension.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DimensionSpec {
    pub key: Dimension,
    pub label: &'static str,
    /// Column label used in exported reports.
    pub short_label: &'static str,
    pub weight: f64,
    pub color: &'static str,
    pub icon: &'static str,
}

/// The dimension registry. Weights sum to 1.0.
pub const DIMENSIONS: [DimensionSpec; 4] = [
    DimensionSpec {
        key: Dimension::Music,
        label: "音乐与文本创作",
        short_label: "音乐创作",
        weight: 0.3,
        color: "#3b82f6",
        icon: "fa-music",
    },
    DimensionSpec {
        key: Dimension::Tech,
        label: "AIGC 视觉技术",
        short_label: "视觉技术",
        weight: 0.3,
        color: "#8b5cf6",
        icon: "fa-microchip",
    },
    DimensionSpec {
        key: Dimension::Fusion,
        label: "视听融合深度",
        short_label: "视听融合",
        weight: 0.2,
        color: "#10b981",
        icon: "fa-wave-square",
    },
    DimensionSpec {
        key: Dimension::Creative,
        label: "叙事、创意与过程",
        short_label: "创意叙事",
        weight: 0.2,
        color: "#f59e0b",
        icon: "fa-lightbulb",
    },
];

/// Raw per-dimension scores, each expected in [0, 100].
///
/// Keys absent from a deserialized payload default to 0; strict validation
/// happens when a record is built from analyzer output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReviewScores {
    pub music: f64,
    pub tech: f64,
    pub fusion: f64,
    pub creative: f64,
}

impl ReviewScores {
    pub fn new(music: f64, tech: f64, fusion: f64, creative: f64) -> Self {
        Self {
            music,
            tech,
            fusion,
            creative,
        }
    }

    /// Same score on every dimension.
    pub fn uniform(score: f64) -> Self {
        Self::new(score, score, score, score)
    }

    pub fn get(&self, dimension: Dimension) -> f64 {
        match dimension {
            Dimension::Music => self.music,
            Dimension::Tech => self.tech,
            Dimension::Fusion => self.fusion,
            Dimension::Creative => self.creative,
        }
    }
}

/// Free-text evaluation per dimension plus an overall suggestion.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewDetails {
    pub music_desc: String,
    pub tech_desc: String,
    pub fusion_desc: String,
    pub creative_desc: String,
    pub overall_suggestion: String,
}

impl ReviewDetails {
    pub fn description(&self, dimension: Dimension) -> &str {
        match dimension {
            Dimension::Music => &self.music_desc,
            Dimension::Tech => &self.tech_desc,
            Dimension::Fusion => &self.fusion_desc,
            Dimension::Creative => &self.creative_desc,
        }
    }
}

/// Analyzer output in the shape the remote service returns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisOutput {
    pub scores: ReviewScores,
    pub descriptions: ReviewDetails,
}

/// A completed evaluation, the unit stored in history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewResult {
    pub id: String,
    pub file_name: String,
    pub scores: ReviewScores,
    pub total_score: f64,
    pub details: ReviewDetails,
    /// Creation time in milliseconds since the Unix epoch.
    pub timestamp: i64,
}

impl ReviewResult {
    pub fn recorded_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.timestamp)
    }
}
