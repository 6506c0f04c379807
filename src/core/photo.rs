use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

/// Fallback when the bytes match no known signature.
const DEFAULT_MIME: &str = "image/png";

#[derive(Debug, thiserror::Error)]
pub enum PhotoError {
    #[error("photo is empty")]
    Empty,
    #[error("not a base64 data URI")]
    NotDataUri,
    #[error("invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("failed to read photo at {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// An encoded image ready to be sent to the vision model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Photo {
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl Photo {
    /// Wrap raw image bytes, sniffing the MIME type from the file signature.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, PhotoError> {
        if bytes.is_empty() {
            return Err(PhotoError::Empty);
        }
        Ok(Self {
            mime_type: sniff_mime(&bytes).to_string(),
            bytes,
        })
    }

    /// Parse a `data:<mime>;base64,<payload>` URI as produced by browser
    /// canvas capture. A missing MIME type falls back to sniffing.
    pub fn from_data_uri(uri: &str) -> Result<Self, PhotoError> {
        let rest = uri.trim().strip_prefix("data:").ok_or(PhotoError::NotDataUri)?;
        let (header, payload) = rest.split_once(',').ok_or(PhotoError::NotDataUri)?;
        let mime = header
            .strip_suffix(";base64")
            .ok_or(PhotoError::NotDataUri)?
            .trim();

        let bytes = STANDARD.decode(payload.trim())?;
        if bytes.is_empty() {
            return Err(PhotoError::Empty);
        }

        let mime_type = if mime.is_empty() {
            sniff_mime(&bytes).to_string()
        } else {
            mime.to_string()
        };
        Ok(Self { mime_type, bytes })
    }

    pub async fn load(path: &Path) -> Result<Self, PhotoError> {
        let bytes = tokio::fs::read(path).await.map_err(|source| PhotoError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_bytes(bytes)
    }

    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.bytes)
    }

    pub fn to_data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.to_base64())
    }
}

fn sniff_mime(data: &[u8]) -> &'static str {
    if data.starts_with(&[0x89, b'P', b'N', b'G']) {
        "image/png"
    } else if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
        "image/jpeg"
    } else if data.starts_with(b"RIFF") && data.get(8..12) == Some(b"WEBP".as_slice()) {
        "image/webp"
    } else if data.starts_with(b"GIF87a") || data.starts_with(b"GIF89a") {
        "image/gif"
    } else {
        DEFAULT_MIME
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sniffs_common_signatures() {
        assert_eq!(sniff_mime(&[0x89, 0x50, 0x4E, 0x47, 0x0D]), "image/png");
        assert_eq!(sniff_mime(&[0xFF, 0xD8, 0xFF, 0xE0]), "image/jpeg");
        assert_eq!(sniff_mime(b"GIF89a...."), "image/gif");
        assert_eq!(sniff_mime(b"RIFF\0\0\0\0WEBPVP8 "), "image/webp");
        assert_eq!(sniff_mime(b"RIFF\0\0\0\0WAVE"), "image/png");
        assert_eq!(sniff_mime(b"plain text"), "image/png");
    }

    #[test]
    fn empty_bytes_are_rejected() {
        assert!(matches!(Photo::from_bytes(Vec::new()), Err(PhotoError::Empty)));
    }

    #[test]
    fn data_uri_round_trips() {
        let photo = Photo::from_bytes(vec![0xFF, 0xD8, 0xFF, 0xE0, 1, 2, 3]).unwrap();
        let uri = photo.to_data_uri();
        assert!(uri.starts_with("data:image/jpeg;base64,"));
        assert_eq!(Photo::from_data_uri(&uri).unwrap(), photo);
    }

    #[test]
    fn data_uri_keeps_declared_mime() {
        let photo = Photo::from_data_uri("data:image/webp;base64,AAEC").unwrap();
        assert_eq!(photo.mime_type, "image/webp");
        assert_eq!(photo.bytes, vec![0, 1, 2]);
    }

    #[test]
    fn malformed_data_uris_fail() {
        assert!(matches!(
            Photo::from_data_uri("image/png;base64,AAEC"),
            Err(PhotoError::NotDataUri)
        ));
        assert!(matches!(
            Photo::from_data_uri("data:image/png,AAEC"),
            Err(PhotoError::NotDataUri)
        ));
        assert!(matches!(
            Photo::from_data_uri("data:image/png;base64,!!!"),
            Err(PhotoError::Base64(_))
        ));
        assert!(matches!(
            Photo::from_data_uri("data:image/png;base64,"),
            Err(PhotoError::Empty)
        ));
    }

    #[tokio::test]
    async fn load_reads_file_from_disk() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("cat.gif");
        std::fs::write(&path, b"GIF87a\x01\x00").unwrap();

        let photo = Photo::load(&path).await.unwrap();
        assert_eq!(photo.mime_type, "image/gif");

        let missing = Photo::load(&dir.path().join("nope.png")).await;
        assert!(matches!(missing, Err(PhotoError::Read { .. })));
    }
}
