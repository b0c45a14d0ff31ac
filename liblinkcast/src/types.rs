//! Core types for Linkcast

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::error::{PublishError, Result};

/// Image MIME types LinkedIn accepts for feed posts
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ImageMimeType {
    Jpeg,
    Png,
    Gif,
}

impl ImageMimeType {
    /// Detect MIME type from a file extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "png" => Some(Self::Png),
            "gif" => Some(Self::Gif),
            _ => None,
        }
    }

    /// Get the MIME type string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::Gif => "image/gif",
        }
    }
}

impl std::fmt::Display for ImageMimeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A local image file staged for upload.
///
/// Probing reads the file once to capture its size and content hash, and
/// rejects missing or empty files so a publication attempt fails before
/// any network call is made. The file itself is owned by the caller and
/// is never modified or deleted by the publication sequence.
#[derive(Debug, Clone)]
pub struct ImageAsset {
    /// Absolute or relative path to the image file on disk
    pub path: PathBuf,
    /// File size in bytes
    pub size: u64,
    /// MIME type detected from the file extension, if recognized
    pub mime_type: Option<ImageMimeType>,
    /// SHA-256 hash of the file content (hex encoded)
    pub sha256: String,
}

impl ImageAsset {
    /// Probe an image file on disk.
    ///
    /// # Errors
    ///
    /// Returns `PublishError::Asset` if the file does not exist, cannot
    /// be read, or is empty.
    pub fn probe(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| PublishError::Asset(format!(
            "Failed to read image file {}: {}",
            path.display(),
            e
        )))?;

        if bytes.is_empty() {
            return Err(PublishError::Asset(format!(
                "Image file {} is empty",
                path.display()
            ))
            .into());
        }

        let mime_type = path
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(ImageMimeType::from_extension);

        let sha256 = {
            let mut hasher = Sha256::new();
            hasher.update(&bytes);
            format!("{:x}", hasher.finalize())
        };

        Ok(Self {
            path: path.to_path_buf(),
            size: bytes.len() as u64,
            mime_type,
            sha256,
        })
    }
}

/// LinkedIn's opaque identifier for an uploaded binary resource.
///
/// Deliberately not `Clone`: an asset URN is valid for exactly one post
/// creation, so the type is consumed by value when it is attached.
#[derive(Debug, PartialEq, Eq)]
pub struct AssetUrn(String);

impl AssetUrn {
    pub fn new(urn: impl Into<String>) -> Self {
        Self(urn.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::fmt::Display for AssetUrn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The short-lived upload target returned by upload initiation.
///
/// Valid for exactly one binary transfer. Not `Clone` and consumed by
/// value by the transfer step, which hands back the contained
/// [`AssetUrn`] for the post-creation step. A failed transfer therefore
/// requires a fresh session; there is no way to retry with a stale one.
#[derive(Debug)]
pub struct UploadSession {
    /// Pre-authorized URL accepting the raw image bytes
    pub upload_url: String,
    /// Identifier the uploaded asset will be known by
    pub asset_urn: AssetUrn,
}

/// Outcome of a successful publication.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostReceipt {
    /// The caption text that was published
    pub caption: String,
    /// The asset URN the post references
    pub asset_urn: String,
    /// LinkedIn's identifier for the created post. `None` when the API
    /// returned 201 without either identifier header; the post exists
    /// but its id is unknown.
    pub post_id: Option<String>,
}

/// A composed-but-unpublished post: generated text plus a staged image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Draft {
    pub id: String,
    pub topic: String,
    /// Search context the text was generated from
    pub context: String,
    /// Normalized post text
    pub content: String,
    /// Remote URL the image was fetched from, when the generator exposes one
    pub image_url: Option<String>,
    /// Staged image file; the caller decides when to discard it
    pub image_path: PathBuf,
    pub created_at: i64,
}

impl Draft {
    pub fn new(
        topic: String,
        context: String,
        content: String,
        image_url: Option<String>,
        image_path: PathBuf,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            topic,
            context,
            content,
            image_url,
            image_path,
            created_at: chrono::Utc::now().timestamp(),
        }
    }
}

/// A headline suggestion from the news provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsSuggestion {
    pub title: String,
    pub description: Option<String>,
    pub url: String,
    pub source: Option<String>,
}
