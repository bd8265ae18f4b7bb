//! Attachments registered on a builder.

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::message::AttachmentPart;

/// A file to attach, optionally under a different name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    path: PathBuf,
    filename: Option<String>,
}

impl Attachment {
    pub(crate) const fn new(path: PathBuf, filename: Option<String>) -> Self {
        Self { path, filename }
    }

    /// Path the file is read from at send time.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Filename override, if one was given.
    #[must_use]
    pub fn filename(&self) -> Option<&str> {
        self.filename.as_deref()
    }

    /// Name shown to the recipient: the override, else the path's file name.
    #[must_use]
    pub fn display_name(&self) -> String {
        self.filename.clone().unwrap_or_else(|| {
            self.path
                .file_name()
                .map_or_else(|| "attachment".to_string(), |n| n.to_string_lossy().into_owned())
        })
    }

    /// Reads the file into a sendable part.
    pub(crate) async fn load(&self) -> Result<AttachmentPart> {
        let data = tokio::fs::read(&self.path)
            .await
            .map_err(|source| Error::AttachmentRead {
                path: self.path.clone(),
                source,
            })?;

        let filename = self.display_name();
        let content_type = content_type_for(&filename);

        Ok(AttachmentPart {
            filename,
            content_type,
            data,
        })
    }
}

/// Guesses a MIME type from a filename's extension.
///
/// Unknown or missing extensions fall back to `application/octet-stream`.
#[must_use]
pub fn content_type_for(filename: &str) -> String {
    mime_guess::from_path(filename)
        .first_or_octet_stream()
        .to_string()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_prefers_override() {
        let attachment = Attachment::new("/tmp/asdkjh.txt".into(), Some("data.txt".into()));
        assert_eq!(attachment.display_name(), "data.txt");

        let attachment = Attachment::new("/var/reports/q3.pdf".into(), None);
        assert_eq!(attachment.display_name(), "q3.pdf");
    }

    #[test]
    fn test_content_type_for() {
        assert_eq!(content_type_for("report.PDF"), "application/pdf");
        assert_eq!(content_type_for("photo.jpeg"), "image/jpeg");
        assert_eq!(content_type_for("notes.txt"), "text/plain");
        assert_eq!(content_type_for("blob"), "application/octet-stream");
        assert_eq!(content_type_for("song.mp3"), "audio/mpeg");
        assert_eq!(content_type_for("image.webp"), "image/webp");
        assert_eq!(
            content_type_for("letter.odt"),
            "application/vnd.oasis.opendocument.text"
        );
    }

    #[test]
    fn test_load_renames_and_types() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/report.txt");
        let attachment = Attachment::new(path.into(), Some("q3.csv".into()));

        let part = tokio_test::block_on(attachment.load()).unwrap();
        assert_eq!(part.filename, "q3.csv");
        assert_eq!(part.content_type, "text/csv");
        assert!(part.data.starts_with(b"Quarterly numbers"));
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let attachment = Attachment::new("/definitely/not/here.bin".into(), None);
        let err = attachment.load().await.unwrap_err();
        assert!(matches!(err, Error::AttachmentRead { ref path, .. } if path.ends_with("here.bin")));
    }
}
