//! # Attachment Sources
//!
//! Where the raw bytes of a selected file come from.

use std::io;
use std::path::{Path, PathBuf};

use futures_util::future::{self, FutureExt, LocalBoxFuture};

/// A user-selected file awaiting conversion.
///
/// Reads resolve on the caller's thread; no `Send` bound is required.
pub trait AttachmentSource {
    /// Display name, used for MIME guessing and error reports
    fn name(&self) -> &str;

    /// MIME type when the caller already knows it
    fn content_type(&self) -> Option<&str> {
        None
    }

    /// Size in bytes when it can be known without reading the contents.
    ///
    /// Used to reject oversized files before they are loaded into memory.
    fn byte_len(&self) -> LocalBoxFuture<'_, io::Result<Option<u64>>> {
        future::ready(Ok(None)).boxed_local()
    }

    /// Read the full contents
    fn read(&self) -> LocalBoxFuture<'_, io::Result<Vec<u8>>>;
}

/// File on the local filesystem
#[derive(Debug, Clone)]
pub struct PathSource {
    path: PathBuf,
    name: String,
}

impl PathSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self { path, name }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl AttachmentSource for PathSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn byte_len(&self) -> LocalBoxFuture<'_, io::Result<Option<u64>>> {
        async move {
            let metadata = tokio::fs::metadata(&self.path).await?;
            Ok(Some(metadata.len()))
        }
        .boxed_local()
    }

    fn read(&self) -> LocalBoxFuture<'_, io::Result<Vec<u8>>> {
        tokio::fs::read(&self.path).boxed_local()
    }
}

/// In-memory blob, e.g. handed over by a UI layer
#[derive(Debug, Clone)]
pub struct BytesSource {
    name: String,
    content_type: Option<String>,
    bytes: Vec<u8>,
}

impl BytesSource {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            content_type: None,
            bytes: bytes.into(),
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }
}

impl AttachmentSource for BytesSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    fn byte_len(&self) -> LocalBoxFuture<'_, io::Result<Option<u64>>> {
        future::ready(Ok(Some(self.bytes.len() as u64))).boxed_local()
    }

    fn read(&self) -> LocalBoxFuture<'_, io::Result<Vec<u8>>> {
        let bytes = self.bytes.clone();
        async move { Ok(bytes) }.boxed_local()
    }
}
