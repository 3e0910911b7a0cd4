use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde_json::Value;

use crate::upload::VideoUpload;

/// Trait each analysis backend must implement.
///
/// The returned JSON is expected in the shape
/// `{ scores: { music, tech, fusion, creative }, descriptions: { musicDesc, .. } }`
/// and is validated by the record builder, not here.
pub trait Analyzer {
    /// Backend name (e.g., "gemini", "replay")
    fn name(&self) -> &'static str;

    /// Analyze `upload` against the review rubric.
    fn analyze(&self, upload: &VideoUpload) -> Result<Value>;
}

/// Returns a previously captured analyzer response read from disk.
#[derive(Debug, Clone)]
pub struct ReplayAnalyzer {
    path: PathBuf,
}

impl ReplayAnalyzer {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Analyzer for ReplayAnalyzer {
    fn name(&self) -> &'static str {
        "replay"
    }

    fn analyze(&self, _upload: &VideoUpload) -> Result<Value> {
        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read response file '{}'", self.path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("failed to parse response file '{}'", self.path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replay_reads_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("response.json");
        std::fs::write(&path, r#"{"scores": {"music": 1}}"#).unwrap();

        let analyzer = ReplayAnalyzer::new(&path);
        let value = analyzer
            .analyze(&VideoUpload::from_bytes("a.mp4", vec![]))
            .unwrap();
        assert_eq!(value["scores"]["music"], 1);
        assert_eq!(analyzer.name(), "replay");
    }

    #[test]
    fn test_replay_invalid_json_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("response.json");
        std::fs::write(&path, "not json").unwrap();

        let err = ReplayAnalyzer::new(&path)
            .analyze(&VideoUpload::from_bytes("a.mp4", vec![]))
            .unwrap_err();
        assert!(format!("{err:#}").contains("failed to parse response file"));
    }
}
