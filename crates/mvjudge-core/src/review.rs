use serde_json::Value;
use tracing::{debug, info, warn};

use crate::analyzer::Analyzer;
use crate::error::ReviewError;
use crate::history::HistoryStore;
use crate::record::{build_record, Clock, SystemClock};
use crate::storage::KeyValueStore;
use crate::types::ReviewResult;
use crate::upload::VideoUpload;

/// A finished review and whether it reached storage.
#[derive(Debug)]
pub struct ReviewOutcome {
    pub record: ReviewResult,
    /// Set when the record is held in memory only.
    pub persistence_error: Option<ReviewError>,
}

impl ReviewOutcome {
    pub fn is_persisted(&self) -> bool {
        self.persistence_error.is_none()
    }
}

/// Orchestrates review submissions against a history.
///
/// At most one analysis runs at a time: [`ReviewSession::begin`] closes the
/// gate and [`ReviewSession::complete`] reopens it. Either a complete record
/// is added to history or nothing is.
pub struct ReviewSession<S: KeyValueStore, C: Clock = SystemClock> {
    history: HistoryStore<S>,
    clock: C,
    analyzing: bool,
    current: Option<String>,
}

impl<S: KeyValueStore> ReviewSession<S, SystemClock> {
    pub fn new(history: HistoryStore<S>) -> Self {
        Self::with_clock(history, SystemClock)
    }
}

impl<S: KeyValueStore, C: Clock> ReviewSession<S, C> {
    pub fn with_clock(history: HistoryStore<S>, clock: C) -> Self {
        Self {
            history,
            clock,
            analyzing: false,
            current: None,
        }
    }

    pub fn history(&self) -> &HistoryStore<S> {
        &self.history
    }

    pub fn is_analyzing(&self) -> bool {
        self.analyzing
    }

    /// The record currently on display, if any.
    pub fn current(&self) -> Option<&ReviewResult> {
        self.current.as_deref().and_then(|id| self.history.get(id))
    }

    /// Put the record with `id` on display.
    pub fn view(&mut self, id: &str) -> Option<&ReviewResult> {
        if self.history.get(id).is_some() {
            self.current = Some(id.to_string());
        }
        self.current()
    }

    /// Mark an analysis as in flight.
    pub fn begin(&mut self) -> Result<(), ReviewError> {
        if self.analyzing {
            return Err(ReviewError::AnalysisInProgress);
        }
        self.analyzing = true;
        self.current = None;
        Ok(())
    }

    /// Finish the in-flight analysis with the analyzer's outcome.
    ///
    /// A persistence failure after the record is built does not fail the
    /// review: the record stays in the in-memory history and the failure is
    /// reported in [`ReviewOutcome::persistence_error`].
    pub fn complete(
        &mut self,
        file_name: &str,
        outcome: anyhow::Result<Value>,
    ) -> Result<ReviewOutcome, ReviewError> {
        self.analyzing = false;

        let raw = outcome.map_err(|e| {
            warn!(file = file_name, error = %format!("{e:#}"), "analysis request failed");
            ReviewError::AnalysisRequestFailure(format!("{e:#}"))
        })?;
        let record = build_record(&raw, file_name, &self.clock).inspect_err(|e| {
            warn!(file = file_name, error = %e, "analyzer returned malformed result");
        })?;

        let persistence_error = match self.history.add(record.clone()) {
            Ok(()) => None,
            Err(e @ ReviewError::PersistenceError(_)) => {
                warn!(id = %record.id, error = %e, "review kept in memory only");
                Some(e)
            }
            Err(e) => return Err(e),
        };

        info!(id = %record.id, file = file_name, total = record.total_score, "review completed");
        self.current = Some(record.id.clone());
        Ok(ReviewOutcome {
            record,
            persistence_error,
        })
    }

    /// Run `analyzer` on `upload` and record the result.
    pub fn submit(
        &mut self,
        analyzer: &dyn Analyzer,
        upload: &VideoUpload,
    ) -> Result<ReviewOutcome, ReviewError> {
        self.begin()?;
        debug!(
            analyzer = analyzer.name(),
            file = %upload.file_name,
            bytes = upload.size(),
            "submitting upload for analysis"
        );
        let outcome = analyzer.analyze(upload);
        self.complete(&upload.file_name, outcome)
    }

    /// Delete a record; clears the current view if it showed that record.
    pub fn delete(&mut self, id: &str) -> Result<bool, ReviewError> {
        if self.current.as_deref() == Some(id) {
            self.current = None;
        }
        self.history.delete_by_id(id)
    }

    pub fn clear(&mut self) -> Result<(), ReviewError> {
        self.current = None;
        self.history.clear()
    }
}
