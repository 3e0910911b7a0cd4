use std::path::Path;

use tracing::debug;

use crate::error::ReviewError;

/// Largest accepted upload: 100 MiB.
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 100 * 1024 * 1024;

/// A video file read into memory and ready for analysis.
#[derive(Debug, Clone)]
pub struct VideoUpload {
    pub file_name: String,
    pub mime_type: String,
    pub data: Vec<u8>,
}

impl VideoUpload {
    /// Read `path`, rejecting files larger than `max_bytes` before reading.
    pub fn read(path: &Path, max_bytes: u64) -> Result<Self, ReviewError> {
        let read_err = |source| ReviewError::UploadReadFailure {
            path: path.to_path_buf(),
            source,
        };

        let size = std::fs::metadata(path).map_err(read_err)?.len();
        if size > max_bytes {
            return Err(ReviewError::UploadSizeExceeded {
                size,
                limit: max_bytes,
            });
        }

        let data = std::fs::read(path).map_err(read_err)?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());
        debug!(file = %file_name, bytes = data.len(), "read upload");

        Ok(Self {
            mime_type: guess_mime_type(path).to_string(),
            file_name,
            data,
        })
    }

    pub fn from_bytes(file_name: impl Into<String>, data: Vec<u8>) -> Self {
        let file_name = file_name.into();
        Self {
            mime_type: guess_mime_type(Path::new(&file_name)).to_string(),
            file_name,
            data,
        }
    }

    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }
}

/// MIME type for common video extensions, `application/octet-stream` otherwise.
pub fn guess_mime_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "mp4" | "m4v" => "video/mp4",
        "mov" => "video/quicktime",
        "webm" => "video/webm",
        "mkv" => "video/x-matroska",
        "avi" => "video/x-msvideo",
        "mpeg" | "mpg" => "video/mpeg",
        "3gp" => "video/3gpp",
        "flv" => "video/x-flv",
        "wmv" => "video/x-ms-wmv",
        _ => "application/octet-stream",
    }
}
