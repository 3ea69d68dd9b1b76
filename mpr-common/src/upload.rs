//! Photo upload directory
//!
//! Stored files are named `{YYYYMMDDHHMMSS}_{originalFilename}`. There is no
//! random component: two uploads of the same name within one second land on
//! the same path and the later one wins.

use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDateTime};
use tracing::{error, info};

use crate::{Error, Result};

const TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

/// Mount name used when the directory path has no final component
const DEFAULT_MOUNT: &str = "uploads";

/// A photo written to the upload directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredUpload {
    /// `{timestamp}_{originalFilename}`
    pub file_name: String,
    /// Filesystem path of the written file
    pub path: PathBuf,
    /// Relative URL stored in the record (`uploads/{file_name}`)
    pub url: String,
}

#[derive(Debug, Clone)]
pub struct UploadDir {
    root: PathBuf,
}

impl UploadDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// URL segment the directory is served under (its final path component)
    pub fn mount_name(&self) -> String {
        self.root
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| DEFAULT_MOUNT.to_string())
    }

    /// Create the directory if it does not exist yet
    ///
    /// Returns `true` when the directory was created by this call.
    pub fn ensure_exists(&self) -> Result<bool> {
        if self.root.is_dir() {
            return Ok(false);
        }
        std::fs::create_dir_all(&self.root)?;
        info!("Upload directory created: {}", self.root.display());
        Ok(true)
    }

    /// Destination name for `original` uploaded at `now`
    pub fn stored_name(now: NaiveDateTime, original: &str) -> Result<String> {
        let base = client_file_name(original)
            .ok_or_else(|| Error::Validation("empty upload filename".to_string()))?;
        Ok(format!("{}_{}", now.format(TIMESTAMP_FORMAT), base))
    }

    /// Relative URL for a stored file name
    pub fn url_for(&self, file_name: &str) -> String {
        format!("{}/{}", self.mount_name(), file_name)
    }

    /// Write `bytes` using the local clock for the name prefix
    pub fn store(&self, original: &str, bytes: &[u8]) -> Result<StoredUpload> {
        self.store_at(Local::now().naive_local(), original, bytes)
    }

    /// Write `bytes` using `now` for the name prefix
    ///
    /// Overwrites an existing file of the same name.
    pub fn store_at(&self, now: NaiveDateTime, original: &str, bytes: &[u8]) -> Result<StoredUpload> {
        let file_name = Self::stored_name(now, original)?;
        let path = self.root.join(&file_name);

        if let Err(e) = std::fs::write(&path, bytes) {
            error!("Failed to save upload {}: {}", path.display(), e);
            return Err(Error::Storage(e.to_string()));
        }

        info!("Stored upload {} ({} bytes)", path.display(), bytes.len());
        Ok(StoredUpload {
            url: self.url_for(&file_name),
            file_name,
            path,
        })
    }
}

/// Final component of a client-supplied filename
///
/// Browsers on Windows may send full paths; both separators are stripped so
/// a name can never leave the upload directory.
fn client_file_name(original: &str) -> Option<&str> {
    let base = original.rsplit(['/', '\\']).next().unwrap_or(original).trim();
    match base {
        "" | "." | ".." => None,
        name => Some(name),
    }
}
