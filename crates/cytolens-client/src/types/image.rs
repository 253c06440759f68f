//! Image payloads crossing the data-image endpoints.

use bytes::Bytes;
use mime::Mime;
use serde::{Deserialize, Serialize};

/// Wire record returned by the data-image endpoints.
///
/// `image` is server-relative on the wire; [`ScopedClient`] rewrites it to
/// absolute form before the record leaves the provider.
///
/// [`ScopedClient`]: crate::ScopedClient
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRecord {
    /// Server-assigned image identifier.
    pub id: String,
    /// Image locator.
    pub image: String,
}

/// A local file handle queued for upload.
#[derive(Debug, Clone)]
pub struct ImageFile {
    /// File name sent as the multipart part name.
    pub file_name: String,
    /// Content type of the image data.
    pub content_type: Mime,
    /// Raw image bytes.
    pub bytes: Bytes,
}

impl ImageFile {
    /// Creates a new file handle from in-memory image data.
    pub fn new(
        file_name: impl Into<String>,
        content_type: Mime,
        bytes: impl Into<Bytes>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type,
            bytes: bytes.into(),
        }
    }

    /// Creates a PNG file handle.
    pub fn png(file_name: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self::new(file_name, mime::IMAGE_PNG, bytes)
    }

    /// Creates a JPEG file handle.
    pub fn jpeg(file_name: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self::new(file_name, mime::IMAGE_JPEG, bytes)
    }

    /// Size of the image data in bytes.
    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}
