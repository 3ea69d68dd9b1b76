//! # MPR Common Library
//!
//! Shared code for the missing-person registry service:
//! - Record model (`MissingPersonRecord`, `RecordStatus`)
//! - Record store over a file-backed or in-memory JSON document
//! - Upload directory handling for submitted photos
//! - Configuration loading (CLI → ENV → TOML → defaults)

pub mod config;
pub mod error;
pub mod models;
pub mod store;
pub mod upload;

pub use error::{Error, Result};
pub use models::{DisappearanceLocation, MissingPersonRecord, RecordStatus};
pub use store::{FileBackend, MemoryBackend, RecordBackend, RecordStore};
pub use upload::{StoredUpload, UploadDir};
