//! Fridge photo intake and validation.
//!
//! Photos arrive either as raw bytes (CLI file paths) or as `data:` URIs
//! (browser-style uploads). Both paths end in the same place: sniffed,
//! size-checked bytes packaged as base64 for the AI request.

use std::io::Cursor;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use image::{ImageFormat, ImageReader};

use crate::ai::ImageData;
use crate::error::PhotoError;

/// Allowed image formats for fridge photos.
pub const ALLOWED_FORMATS: &[ImageFormat] = &[
    ImageFormat::Jpeg,
    ImageFormat::Png,
    ImageFormat::Gif,
    ImageFormat::WebP,
];

/// Maximum file size for photos (10MB).
pub const MAX_PHOTO_BYTES: usize = 10 * 1024 * 1024;

/// Decode a `data:` URI into a validated photo attachment.
///
/// The declared MIME type in the header is not trusted; the sniffed format
/// of the decoded bytes decides the media type.
pub fn photo_from_data_uri(uri: &str) -> Result<ImageData, PhotoError> {
    let rest = uri.strip_prefix("data:").ok_or(PhotoError::MalformedDataUri)?;

    let (header, payload) = rest.split_once(',').ok_or(PhotoError::MalformedDataUri)?;

    if !header.ends_with(";base64") {
        return Err(PhotoError::NotBase64Encoded);
    }

    let bytes = BASE64.decode(payload.trim())?;
    photo_from_bytes(&bytes)
}

/// Validate raw photo bytes and package them for an AI request.
pub fn photo_from_bytes(bytes: &[u8]) -> Result<ImageData, PhotoError> {
    if bytes.len() > MAX_PHOTO_BYTES {
        return Err(PhotoError::TooLarge {
            size: bytes.len(),
            max: MAX_PHOTO_BYTES,
        });
    }

    let media_type = validate_photo(bytes)?;

    Ok(ImageData::new(media_type, BASE64.encode(bytes)))
}

/// Validate photo data: check the format is allowed and detect the MIME type.
///
/// Returns the content type on success (e.g., "image/jpeg").
pub fn validate_photo(bytes: &[u8]) -> Result<String, PhotoError> {
    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|_| PhotoError::UnknownFormat)?;

    let format = reader.format().ok_or(PhotoError::UnknownFormat)?;

    if !ALLOWED_FORMATS.contains(&format) {
        return Err(PhotoError::UnsupportedFormat(format!("{:?}", format)));
    }

    Ok(format.to_mime_type().to_string())
}
