use std::path::Path;

use crate::error::{ApiError, ApiResult};

use super::MediaKind;

/// A local media file about to be sent to the backend.
#[derive(Debug, Clone)]
pub struct MediaUpload {
    pub file_name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl MediaUpload {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let mime = mime_guess::from_path(&file_name)
            .first_or_octet_stream()
            .essence_str()
            .to_string();
        Self {
            file_name,
            mime,
            bytes,
        }
    }

    pub async fn from_path(path: &Path) -> ApiResult<Self> {
        let bytes = tokio::fs::read(path).await.map_err(|source| ApiError::Media {
            path: path.to_path_buf(),
            source,
        })?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        Ok(Self::new(file_name, bytes))
    }

    pub fn kind(&self) -> MediaKind {
        if self.mime.starts_with("video/") {
            MediaKind::Video
        } else {
            MediaKind::Image
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guesses_kind_from_extension() {
        let clip = MediaUpload::new("beach.mp4", vec![]);
        assert_eq!(clip.mime, "video/mp4");
        assert_eq!(clip.kind(), MediaKind::Video);

        let photo = MediaUpload::new("sunset.JPG", vec![]);
        assert_eq!(photo.kind(), MediaKind::Image);

        let unknown = MediaUpload::new("notes", vec![]);
        assert_eq!(unknown.mime, "application/octet-stream");
        assert_eq!(unknown.kind(), MediaKind::Image);
    }

    #[tokio::test]
    async fn missing_file_reports_path() {
        let err = MediaUpload::from_path(Path::new("/nonexistent/clip.mp4"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("/nonexistent/clip.mp4"));
    }
}
