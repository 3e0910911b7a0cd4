pub mod analyzer;
pub mod config;
pub mod error;
pub mod history;
pub mod radar;
pub mod record;
pub mod review;
pub mod rubric;
pub mod scoring;
pub mod storage;
pub mod types;
pub mod upload;

pub use analyzer::{Analyzer, ReplayAnalyzer};
pub use config::Config;
pub use error::ReviewError;
pub use history::HistoryStore;
pub use radar::RadarGeometry;
pub use review::{ReviewOutcome, ReviewSession};
pub use storage::{FileStore, KeyValueStore, MemoryStore};
pub use types::*;
