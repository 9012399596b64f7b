//! Seal image upload boundary: media-type allow-list, size limit, inline encoding.

use std::fmt;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};

/// Largest accepted seal image unless configured otherwise (5 MiB).
pub const DEFAULT_MAX_SEAL_IMAGE_BYTES: usize = 5 * 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageMediaType {
    Jpeg,
    Png,
    Gif,
    Webp,
}

impl ImageMediaType {
    pub const ALL: [ImageMediaType; 4] = [
        ImageMediaType::Jpeg,
        ImageMediaType::Png,
        ImageMediaType::Gif,
        ImageMediaType::Webp,
    ];

    pub const fn mime(self) -> &'static str {
        match self {
            ImageMediaType::Jpeg => "image/jpeg",
            ImageMediaType::Png => "image/png",
            ImageMediaType::Gif => "image/gif",
            ImageMediaType::Webp => "image/webp",
        }
    }

    /// Match a `Content-Type` value, ignoring parameters and case.
    pub fn from_content_type(content_type: &str) -> Option<Self> {
        let essence = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        Self::ALL.into_iter().find(|media| media.mime() == essence)
    }
}

/// Rejections raised before image data may reach the store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UploadRejected {
    #[error("印影画像はJPEG、PNG、GIF、WebP形式でアップロードしてください")]
    UnsupportedMediaType { content_type: Option<String> },
    #[error("印影画像のサイズは{}以下にしてください", limit_label(.limit))]
    TooLarge { size: usize, limit: usize },
}

const MIB: usize = 1024 * 1024;

/// `5MB` for whole mebibytes, otherwise the exact byte count.
fn limit_label(limit: &usize) -> String {
    let limit = *limit;
    if limit >= MIB && limit % MIB == 0 {
        format!("{}MB", limit / MIB)
    } else {
        format!("{limit}バイト")
    }
}

/// Uploaded seal impression, carried inline as a `data:` URL on the wire.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct SealImage {
    media_type: ImageMediaType,
    bytes: Vec<u8>,
}

impl SealImage {
    pub fn new(media_type: ImageMediaType, bytes: Vec<u8>) -> Self {
        Self { media_type, bytes }
    }

    /// Screen an uploaded file. An empty payload means nothing was uploaded.
    pub fn from_upload(
        content_type: Option<&str>,
        bytes: Vec<u8>,
        limit: usize,
    ) -> Result<Option<Self>, UploadRejected> {
        if bytes.is_empty() {
            return Ok(None);
        }

        let media_type = content_type
            .and_then(ImageMediaType::from_content_type)
            .ok_or_else(|| UploadRejected::UnsupportedMediaType {
                content_type: content_type.map(str::to_string),
            })?;

        if bytes.len() > limit {
            return Err(UploadRejected::TooLarge {
                size: bytes.len(),
                limit,
            });
        }

        Ok(Some(Self::new(media_type, bytes)))
    }

    pub fn media_type(&self) -> ImageMediaType {
        self.media_type
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn to_data_url(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.media_type.mime(),
            STANDARD.encode(&self.bytes)
        )
    }
}

impl fmt::Debug for SealImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SealImage")
            .field("media_type", &self.media_type.mime())
            .field("len", &self.bytes.len())
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DataUrlError {
    #[error("seal image must be a base64 data URL")]
    Malformed,
    #[error("unsupported seal image media type '{0}'")]
    MediaType(String),
    #[error("seal image payload is not valid base64")]
    Payload(#[from] base64::DecodeError),
}

impl TryFrom<String> for SealImage {
    type Error = DataUrlError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        let rest = value.strip_prefix("data:").ok_or(DataUrlError::Malformed)?;
        let (media, payload) = rest
            .split_once(";base64,")
            .ok_or(DataUrlError::Malformed)?;
        let media_type = ImageMediaType::from_content_type(media)
            .ok_or_else(|| DataUrlError::MediaType(media.to_string()))?;
        let bytes = STANDARD.decode(payload)?;
        Ok(Self::new(media_type, bytes))
    }
}

impl From<SealImage> for String {
    fn from(image: SealImage) -> Self {
        image.to_data_url()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_HEADER: &[u8] = &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];

    #[test]
    fn accepts_allow_listed_media_types() {
        let image = SealImage::from_upload(
            Some("image/PNG; charset=binary"),
            PNG_HEADER.to_vec(),
            DEFAULT_MAX_SEAL_IMAGE_BYTES,
        )
        .expect("png accepted")
        .expect("image present");
        assert_eq!(image.media_type(), ImageMediaType::Png);
        assert!(image.to_data_url().starts_with("data:image/png;base64,"));
    }

    #[test]
    fn empty_uploads_are_treated_as_absent() {
        let image = SealImage::from_upload(Some("application/pdf"), Vec::new(), 10)
            .expect("empty payload is not screened");
        assert!(image.is_none());
    }

    #[test]
    fn rejects_other_media_types() {
        let err = SealImage::from_upload(Some("image/svg+xml"), b"<svg/>".to_vec(), 1024)
            .expect_err("svg rejected");
        assert!(matches!(err, UploadRejected::UnsupportedMediaType { .. }));

        let err = SealImage::from_upload(None, b"raw".to_vec(), 1024).expect_err("missing type");
        assert_eq!(
            err.to_string(),
            "印影画像はJPEG、PNG、GIF、WebP形式でアップロードしてください"
        );
    }

    #[test]
    fn enforces_the_size_limit_inclusively() {
        let limit = DEFAULT_MAX_SEAL_IMAGE_BYTES;
        assert!(SealImage::from_upload(Some("image/jpeg"), vec![0; limit], limit).is_ok());

        let err = SealImage::from_upload(Some("image/jpeg"), vec![0; limit + 1], limit)
            .expect_err("oversized");
        assert_eq!(
            err,
            UploadRejected::TooLarge {
                size: limit + 1,
                limit
            }
        );
        assert_eq!(err.to_string(), "印影画像のサイズは5MB以下にしてください");
    }

    #[test]
    fn size_message_never_understates_the_limit() {
        let small = UploadRejected::TooLarge {
            size: 65,
            limit: 64,
        };
        assert_eq!(small.to_string(), "印影画像のサイズは64バイト以下にしてください");

        let uneven = UploadRejected::TooLarge {
            size: 3 * MIB,
            limit: 2 * MIB + 512,
        };
        assert_eq!(
            uneven.to_string(),
            "印影画像のサイズは2097664バイト以下にしてください"
        );
    }

    #[test]
    fn data_urls_survive_json() {
        let image = SealImage::new(ImageMediaType::Gif, b"GIF89a".to_vec());
        let json = serde_json::to_string(&image).expect("serializes");
        assert_eq!(json, "\"data:image/gif;base64,R0lGODlh\"");
        let parsed: SealImage = serde_json::from_str(&json).expect("deserializes");
        assert_eq!(parsed, image);

        assert!(serde_json::from_str::<SealImage>("\"not a data url\"").is_err());
    }
}
