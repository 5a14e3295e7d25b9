//! Media Uploads and Previews
//!
//! A [`MediaUpload`] is an image or PDF queued for `/api/verify-media`.
//! Images also get a [`PreviewHandle`]: a temporary file holding the image
//! that a terminal or browser can open while the upload is pending. The
//! handle removes its file when dropped, so a preview is released exactly
//! once however the selection ends (submitted, cleared, replaced, or the
//! session torn down).

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::NamedTempFile;
use thiserror::Error;

/// A file selected for verification
#[derive(Debug, Clone, PartialEq)]
pub struct MediaUpload {
    pub file_name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl MediaUpload {
    /// Create an upload, checking the media type is one the API accepts
    pub fn new(
        file_name: impl Into<String>,
        mime: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Result<Self, MediaError> {
        let mime = mime.into().trim().to_lowercase();
        if !is_accepted_mime(&mime) {
            return Err(MediaError::UnsupportedType(mime));
        }
        if bytes.is_empty() {
            return Err(MediaError::Empty);
        }

        Ok(Self {
            file_name: file_name.into(),
            mime,
            bytes,
        })
    }

    /// Read an upload from disk, inferring the media type from the extension
    pub async fn from_path(path: &Path) -> Result<Self, MediaError> {
        let mime = mime_for_path(path).ok_or_else(|| {
            MediaError::UnsupportedType(
                path.extension()
                    .map(|e| e.to_string_lossy().to_string())
                    .unwrap_or_else(|| "(no extension)".to_string()),
            )
        })?;

        let bytes = tokio::fs::read(path).await.map_err(|e| MediaError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "upload".to_string());

        Self::new(file_name, mime, bytes)
    }

    pub fn is_image(&self) -> bool {
        self.mime.starts_with("image/")
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}

/// Media types accepted by the verification endpoint
pub fn is_accepted_mime(mime: &str) -> bool {
    mime.starts_with("image/") || mime == "application/pdf"
}

/// Guess a media type from a file extension
pub fn mime_for_path(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_lowercase();
    let mime = match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "heic" => "image/heic",
        "pdf" => "application/pdf",
        _ => return None,
    };
    Some(mime)
}

fn extension_for_mime(mime: &str) -> &'static str {
    match mime {
        "image/png" => ".png",
        "image/jpeg" => ".jpg",
        "image/gif" => ".gif",
        "image/webp" => ".webp",
        "image/bmp" => ".bmp",
        _ => ".img",
    }
}

/// Creates image previews and keeps count of the live ones
#[derive(Debug, Clone, Default)]
pub struct PreviewCache {
    dir: Option<PathBuf>,
    live: Arc<AtomicUsize>,
    released: Arc<AtomicUsize>,
}

impl PreviewCache {
    /// Previews in the system temp directory
    pub fn new() -> Self {
        Self::default()
    }

    /// Previews in a specific directory
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: Some(dir.into()),
            ..Self::default()
        }
    }

    /// Write a preview for an image upload. Returns `None` for non-images.
    pub fn create(&self, upload: &MediaUpload) -> Result<Option<PreviewHandle>, MediaError> {
        if !upload.is_image() {
            return Ok(None);
        }

        let mut builder = tempfile::Builder::new();
        builder
            .prefix("fairgpt-preview-")
            .suffix(extension_for_mime(&upload.mime));
        let created = match &self.dir {
            Some(dir) => builder.tempfile_in(dir),
            None => builder.tempfile(),
        };

        let io_err = |path: PathBuf, e: std::io::Error| MediaError::Io {
            path,
            error: e.to_string(),
        };
        let mut file = created.map_err(|e| {
            io_err(self.dir.clone().unwrap_or_else(std::env::temp_dir), e)
        })?;
        file.write_all(&upload.bytes)
            .and_then(|_| file.flush())
            .map_err(|e| io_err(file.path().to_path_buf(), e))?;

        self.live.fetch_add(1, Ordering::SeqCst);
        tracing::debug!(path = %file.path().display(), "Created media preview");

        Ok(Some(PreviewHandle {
            file,
            live: Arc::clone(&self.live),
            released: Arc::clone(&self.released),
        }))
    }

    /// Previews created and not yet released
    pub fn live(&self) -> usize {
        self.live.load(Ordering::SeqCst)
    }

    /// Previews released over the cache's lifetime
    pub fn released(&self) -> usize {
        self.released.load(Ordering::SeqCst)
    }
}

/// A live image preview. Dropping it deletes the file.
#[derive(Debug)]
pub struct PreviewHandle {
    file: NamedTempFile,
    live: Arc<AtomicUsize>,
    released: Arc<AtomicUsize>,
}

impl PreviewHandle {
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// `file://` URL for the preview
    pub fn url(&self) -> String {
        format!("file://{}", self.file.path().display())
    }

    /// Release the preview now
    pub fn release(self) {}
}

impl Drop for PreviewHandle {
    fn drop(&mut self) {
        self.live.fetch_sub(1, Ordering::SeqCst);
        self.released.fetch_add(1, Ordering::SeqCst);
        tracing::debug!(path = %self.file.path().display(), "Released media preview");
    }
}

/// Errors raised while preparing media
#[derive(Error, Debug)]
pub enum MediaError {
    #[error("Failed to access {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Unsupported media type: {0} (expected an image or PDF)")]
    UnsupportedType(String),

    #[error("Media file is empty")]
    Empty,
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn png() -> MediaUpload {
        MediaUpload::new("shot.png", "image/png", vec![0x89, b'P', b'N', b'G']).unwrap()
    }

    #[test]
    fn test_accepts_images_and_pdf() {
        assert!(MediaUpload::new("a.pdf", "application/pdf", vec![1]).is_ok());
        assert!(MediaUpload::new("a.jpg", "IMAGE/JPEG", vec![1]).unwrap().is_image());
        assert!(matches!(
            MediaUpload::new("a.txt", "text/plain", vec![1]),
            Err(MediaError::UnsupportedType(_))
        ));
        assert!(matches!(
            MediaUpload::new("a.png", "image/png", vec![]),
            Err(MediaError::Empty)
        ));
    }

    #[test]
    fn test_mime_for_path() {
        assert_eq!(mime_for_path(Path::new("x/Shot.PNG")), Some("image/png"));
        assert_eq!(mime_for_path(Path::new("doc.pdf")), Some("application/pdf"));
        assert_eq!(mime_for_path(Path::new("notes.txt")), None);
        assert_eq!(mime_for_path(Path::new("README")), None);
    }

    #[tokio::test]
    async fn test_from_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("claim.jpeg");
        std::fs::write(&path, b"jpegdata").unwrap();

        let upload = MediaUpload::from_path(&path).await.unwrap();
        assert_eq!(upload.file_name, "claim.jpeg");
        assert_eq!(upload.mime, "image/jpeg");
        assert_eq!(upload.size(), 8);

        let missing = MediaUpload::from_path(&dir.path().join("gone.png")).await;
        assert!(matches!(missing, Err(MediaError::Io { .. })));
    }

    #[test]
    fn test_preview_lifecycle() {
        let dir = tempdir().unwrap();
        let cache = PreviewCache::in_dir(dir.path());

        let preview = cache.create(&png()).unwrap().unwrap();
        let path = preview.path().to_path_buf();
        assert!(path.exists());
        assert!(preview.url().starts_with("file://"));
        assert_eq!(std::fs::read(&path).unwrap(), png().bytes);
        assert_eq!(cache.live(), 1);

        preview.release();
        assert!(!path.exists());
        assert_eq!(cache.live(), 0);
        assert_eq!(cache.released(), 1);
    }

    #[test]
    fn test_no_preview_for_pdf() {
        let cache = PreviewCache::new();
        let pdf = MediaUpload::new("doc.pdf", "application/pdf", vec![1, 2]).unwrap();
        assert!(cache.create(&pdf).unwrap().is_none());
        assert_eq!(cache.live(), 0);
    }
}
