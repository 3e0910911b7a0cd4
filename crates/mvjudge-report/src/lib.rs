pub mod csv_export;
pub mod json;
pub mod markdown;
pub mod svg;
pub mod text;

pub use csv_export::{export_history, CsvExport};
