//! Storage for uploaded PDFs, category icons, and derived preview images.
//!
//! Paths handed to a [`MediaStore`] are always relative to the configured
//! media root and are what the API exposes under `/media/`. The dated
//! layout (`worksheets/pdf/2026/08/...`) keeps directories from growing
//! without bound as the catalog accumulates uploads.

use std::fs;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use chrono::{DateTime, Datelike, Utc};

/// Abstraction over the media root so the catalog service can be exercised
/// without touching the filesystem.
pub trait MediaStore: Send + Sync {
    fn store(&self, path: &str, bytes: &[u8]) -> Result<(), MediaError>;
    fn read(&self, path: &str) -> Result<Vec<u8>, MediaError>;
    fn remove(&self, path: &str) -> Result<(), MediaError>;
    fn exists(&self, path: &str) -> Result<bool, MediaError>;
}

#[derive(Debug, thiserror::Error)]
pub enum MediaError {
    #[error("invalid media path '{0}'")]
    InvalidPath(String),
    #[error("media object not found: {0}")]
    NotFound(String),
    #[error("media io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Filesystem-backed store rooted at the configured media directory.
pub struct FsMediaStore {
    root: PathBuf,
}

impl FsMediaStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Maps a relative media path onto the root, rejecting anything that
    /// would escape it.
    fn resolve(&self, path: &str) -> Result<PathBuf, MediaError> {
        if path.trim().is_empty() {
            return Err(MediaError::InvalidPath(path.to_string()));
        }
        let relative = Path::new(path);
        for component in relative.components() {
            match component {
                Component::Normal(_) => {}
                _ => return Err(MediaError::InvalidPath(path.to_string())),
            }
        }
        Ok(self.root.join(relative))
    }
}

impl MediaStore for FsMediaStore {
    fn store(&self, path: &str, bytes: &[u8]) -> Result<(), MediaError> {
        let target = self.resolve(path)?;
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }

        // Write-then-rename so readers never observe a half-written file.
        let file_name = target
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| MediaError::InvalidPath(path.to_string()))?;
        let staged = target.with_file_name(format!("{file_name}.tmp"));
        fs::write(&staged, bytes)?;
        fs::rename(&staged, &target)?;
        Ok(())
    }

    fn read(&self, path: &str) -> Result<Vec<u8>, MediaError> {
        let target = self.resolve(path)?;
        match fs::read(&target) {
            Ok(bytes) => Ok(bytes),
            Err(err) if err.kind() == ErrorKind::NotFound => {
                Err(MediaError::NotFound(path.to_string()))
            }
            Err(err) => Err(MediaError::Io(err)),
        }
    }

    fn remove(&self, path: &str) -> Result<(), MediaError> {
        let target = self.resolve(path)?;
        match fs::remove_file(&target) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => {
                Err(MediaError::NotFound(path.to_string()))
            }
            Err(err) => Err(MediaError::Io(err)),
        }
    }

    fn exists(&self, path: &str) -> Result<bool, MediaError> {
        Ok(self.resolve(path)?.exists())
    }
}

/// Public URL for a stored media path.
pub fn media_url(path: &str) -> String {
    format!("/media/{path}")
}

pub fn pdf_path(slug: &str, when: DateTime<Utc>) -> String {
    format!(
        "worksheets/pdf/{}/{:02}/{slug}.pdf",
        when.year(),
        when.month()
    )
}

pub fn thumbnail_path(slug: &str, when: DateTime<Utc>) -> String {
    format!(
        "worksheets/thumbnails/{}/{:02}/{slug}_thumb.png",
        when.year(),
        when.month()
    )
}

pub fn preview_path(slug: &str, when: DateTime<Utc>) -> String {
    format!(
        "worksheets/previews/{}/{:02}/{slug}_preview.png",
        when.year(),
        when.month()
    )
}

pub fn icon_path(slug: &str, extension: &str) -> String {
    format!("categories/icons/{slug}.{extension}")
}
