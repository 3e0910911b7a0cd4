use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate, TimeZone};
use csv::{QuoteStyle, Terminator, WriterBuilder};

use mvjudge_core::types::{Dimension, ReviewResult};

/// Column headers, in order.
pub const CSV_HEADERS: [&str; 8] = [
    "作品名",
    "总分",
    "音乐创作",
    "视觉技术",
    "视听融合",
    "创意叙事",
    "评审建议",
    "时间",
];

/// UTF-8 byte-order mark, so spreadsheet tools detect the encoding.
pub const BOM: &str = "\u{feff}";

/// A rendered CSV document and the name it should be saved under.
#[derive(Debug, Clone, PartialEq)]
pub struct CsvExport {
    pub file_name: String,
    pub content: String,
}

impl CsvExport {
    /// Write the document into `dir`, returning the full path.
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf> {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create {}", dir.display()))?;
        let path = dir.join(&self.file_name);
        std::fs::write(&path, &self.content)
            .with_context(|| format!("failed to write {}", path.display()))?;
        Ok(path)
    }
}

/// Export file name for `date`.
pub fn export_file_name(date: NaiveDate) -> String {
    format!("AIGC_MV_Assistant_History_{}.csv", date.format("%Y-%m-%d"))
}

/// Render a record timestamp in local time.
pub fn format_timestamp(millis: i64) -> String {
    match Local.timestamp_millis_opt(millis).single() {
        Some(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => millis.to_string(),
    }
}

/// Export `records` in their given order, named after today's local date.
///
/// Returns `None` when there is nothing to export.
pub fn export_history(records: &[ReviewResult]) -> Result<Option<CsvExport>> {
    export_history_on(records, Local::now().date_naive())
}

/// Export `records`, naming the file after `date`.
pub fn export_history_on(records: &[ReviewResult], date: NaiveDate) -> Result<Option<CsvExport>> {
    if records.is_empty() {
        return Ok(None);
    }
    Ok(Some(CsvExport {
        file_name: export_file_name(date),
        content: format_csv(records)?,
    }))
}

/// Render `records` as CSV with a leading BOM.
pub fn format_csv(records: &[ReviewResult]) -> Result<String> {
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Necessary)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer
        .write_record(CSV_HEADERS)
        .context("failed to write CSV header")?;

    for record in records {
        let mut row = Vec::with_capacity(CSV_HEADERS.len());
        row.push(record.file_name.clone());
        row.push(record.total_score.to_string());
        for dim in Dimension::ALL {
            row.push(record.scores.get(dim).to_string());
        }
        row.push(record.details.overall_suggestion.clone());
        row.push(format_timestamp(record.timestamp));
        writer
            .write_record(&row)
            .with_context(|| format!("failed to write CSV row for record {}", record.id))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("failed to flush CSV output: {e}"))?;
    let body = String::from_utf8(bytes).context("CSV output is not valid UTF-8")?;
    Ok(format!("{BOM}{body}"))
}
