//! Image attachment storage.
//!
//! # Responsibility
//! - Validate uploaded image bytes before anything touches disk.
//! - Store accepted images under collision-free names and hand back a
//!   stable public URL for embedding in entry content.
//!
//! # Invariants
//! - Only `image/*` content types up to 5 MiB are accepted.
//! - Generated names are unique even before an entry id exists
//!   (epoch millis plus a random suffix).

use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs;
use std::io;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Upload size ceiling in bytes.
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

const FALLBACK_EXTENSION: &str = "bin";
const MAX_EXTENSION_CHARS: usize = 8;

/// Failure while validating or storing one image upload.
#[derive(Debug)]
pub enum ImageStoreError {
    /// Content type is not an image type.
    NotAnImage { content_type: String },
    /// Payload exceeds the size ceiling.
    TooLarge { size: usize, max: usize },
    /// Filesystem failure while persisting the payload.
    Io(io::Error),
}

impl Display for ImageStoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotAnImage { content_type } => {
                write!(f, "only image uploads are accepted, got `{content_type}`")
            }
            Self::TooLarge { size, max } => {
                write!(f, "image of {size} bytes exceeds the {max} byte limit")
            }
            Self::Io(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ImageStoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for ImageStoreError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

/// Stored upload handle: public URL plus the store-relative path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredImage {
    pub url: String,
    pub path: String,
}

/// Storage interface for image attachments.
pub trait ImageStore {
    /// Validates and stores one upload, returning its public URL.
    fn upload(
        &self,
        bytes: &[u8],
        content_type: &str,
        extension: &str,
    ) -> Result<StoredImage, ImageStoreError>;
}

/// Filesystem-backed image store serving files from a base URL.
pub struct FsImageStore {
    root: PathBuf,
    base_url: String,
}

impl FsImageStore {
    /// Creates a store writing under `root`, served below `base_url`.
    pub fn new(root: impl Into<PathBuf>, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            root: root.into(),
            base_url,
        }
    }
}

impl ImageStore for FsImageStore {
    fn upload(
        &self,
        bytes: &[u8],
        content_type: &str,
        extension: &str,
    ) -> Result<StoredImage, ImageStoreError> {
        validate_image_upload(bytes, content_type)?;

        let file_name = unique_file_name(extension);
        fs::create_dir_all(&self.root)?;
        fs::write(self.root.join(&file_name), bytes)?;

        info!(
            "event=image_upload module=media status=ok size={} file={file_name}",
            bytes.len()
        );

        Ok(StoredImage {
            url: format!("{}/{file_name}", self.base_url),
            path: file_name,
        })
    }
}

/// Checks one upload against the acceptance policy.
///
/// # Errors
/// - `NotAnImage` when the content type is outside `image/*`.
/// - `TooLarge` when the payload exceeds [`MAX_IMAGE_BYTES`].
pub fn validate_image_upload(bytes: &[u8], content_type: &str) -> Result<(), ImageStoreError> {
    let normalized = content_type.trim().to_ascii_lowercase();
    if !normalized.starts_with("image/") {
        warn!("event=image_upload module=media status=rejected reason=content_type value={normalized}");
        return Err(ImageStoreError::NotAnImage {
            content_type: content_type.to_string(),
        });
    }

    if bytes.len() > MAX_IMAGE_BYTES {
        warn!(
            "event=image_upload module=media status=rejected reason=size size={}",
            bytes.len()
        );
        return Err(ImageStoreError::TooLarge {
            size: bytes.len(),
            max: MAX_IMAGE_BYTES,
        });
    }

    Ok(())
}

fn unique_file_name(extension: &str) -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis())
        .unwrap_or(0);
    format!(
        "{millis}-{}.{}",
        Uuid::new_v4().simple(),
        sanitize_extension(extension)
    )
}

fn sanitize_extension(extension: &str) -> String {
    let trimmed = extension.trim().trim_start_matches('.');
    let normalized = trimmed.to_ascii_lowercase();
    let acceptable = !normalized.is_empty()
        && normalized.chars().count() <= MAX_EXTENSION_CHARS
        && normalized.chars().all(|ch| ch.is_ascii_alphanumeric());
    if acceptable {
        normalized
    } else {
        FALLBACK_EXTENSION.to_string()
    }
}
