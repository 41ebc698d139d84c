use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::error::ValidationError;

const DATA_IMAGE_PREFIX: &str = "data:image/";

/// An uploaded image in data-URI form, validated once per request.
///
/// OpenAI-style providers take the whole URI, while Anthropic and Gemini
/// want the MIME type and the bare base64 payload separately.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageData {
    uri: String,
    mime_type: String,
    base64: String,
}

impl ImageData {
    /// Validate a `data:image/...` URI.
    pub fn parse(data: &str) -> Result<Self, ValidationError> {
        let data = data.trim();
        if data.is_empty() {
            return Err(ValidationError::MissingImage);
        }
        if !data.starts_with(DATA_IMAGE_PREFIX) {
            return Err(ValidationError::InvalidFormat);
        }

        let (header, payload) = data
            .split_once(',')
            .ok_or(ValidationError::InvalidFormat)?;
        if payload.is_empty() {
            return Err(ValidationError::EmptyPayload);
        }

        // header looks like "data:image/png;base64"
        let mut params = header["data:".len()..].split(';');
        let mime_type = params.next().unwrap_or_default().to_string();
        let is_base64 = params.any(|p| p.eq_ignore_ascii_case("base64"));

        let base64 = if is_base64 {
            payload.to_string()
        } else {
            STANDARD.encode(payload.as_bytes())
        };

        Ok(ImageData {
            uri: data.to_string(),
            mime_type,
            base64,
        })
    }

    /// Full data URI as uploaded
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// e.g. `image/jpeg`
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// Base64 payload without the `data:` header
    pub fn base64(&self) -> &str {
        &self.base64
    }
}
