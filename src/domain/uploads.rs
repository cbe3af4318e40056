// src/domain/uploads.rs

use crate::errors::ServerError;
use base64::Engine;
use rand::rngs::OsRng;
use rand::RngCore;
use std::path::{Path, PathBuf};

/// Hard cap on a single evidence file.
pub const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

/// Declared content types we accept: images, PDF, and Office documents.
pub const ALLOWED_TYPES: [&str; 8] = [
    "image/jpeg",
    "image/png",
    "image/gif",
    "application/pdf",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    "application/vnd.ms-excel",
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
];

/// Where complaint evidence lands on disk and what we let in.
pub struct UploadPolicy {
    pub dir: PathBuf,
    pub max_bytes: usize,
}

impl UploadPolicy {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        UploadPolicy {
            dir: dir.into(),
            max_bytes: MAX_UPLOAD_BYTES,
        }
    }

    /// Checks the declared content type and size before anything touches
    /// disk. Returns the parsed mime so callers can store its essence.
    pub fn validate(&self, content_type: &str, size: usize) -> Result<mime::Mime, ServerError> {
        let parsed: mime::Mime = content_type.parse().map_err(|_| {
            ServerError::BadRequest(format!("unrecognized content type: {content_type}"))
        })?;

        if !ALLOWED_TYPES.contains(&parsed.essence_str()) {
            return Err(ServerError::BadRequest(
                "Only images, PDF and Office documents are accepted".to_string(),
            ));
        }

        if size > self.max_bytes {
            return Err(ServerError::BadRequest(
                "File exceeds the 5MB upload limit".to_string(),
            ));
        }

        Ok(parsed)
    }

    /// Random on-disk name that keeps only the original extension.
    /// The uploaded filename itself never reaches the filesystem.
    pub fn storage_name<R: RngCore>(
        &self,
        rng: &mut R,
        complaint_id: i64,
        original_name: &str,
    ) -> String {
        let ext = Path::new(original_name)
            .extension()
            .and_then(|e| e.to_str())
            .filter(|e| e.chars().all(|c| c.is_ascii_alphanumeric()))
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_else(|| "bin".to_string());

        let mut buf = [0u8; 9];
        rng.fill_bytes(&mut buf);
        let token = base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(buf);

        format!("complaint_{complaint_id}_{token}.{ext}")
    }

    /// Same, using the OS RNG. This is what the upload route calls.
    pub fn storage_name_default(&self, complaint_id: i64, original_name: &str) -> String {
        let mut rng = OsRng;
        self.storage_name(&mut rng, complaint_id, original_name)
    }

    pub fn storage_path(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }
}
