//! Captured or uploaded face images in transport form.

use crate::error::{Result, SkinError};

/// A base64-encoded image ready to be sent to the analyzer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePayload {
    base64: String,
    mime_type: Option<String>,
}

impl ImagePayload {
    /// Wraps raw base64 data. A `data:<mime>;base64,` prefix is stripped.
    pub fn from_base64(data: impl AsRef<str>) -> Result<Self> {
        Self::from_data_url(data.as_ref())
    }

    /// Parses a data URL or bare base64 string.
    pub fn from_data_url(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        let mime_type = mime_of_data_url(trimmed);
        let base64 = strip_data_url_prefix(trimmed).trim();
        if base64.is_empty() {
            return Err(SkinError::invalid_input("image data is empty"));
        }
        Ok(Self {
            base64: base64.to_string(),
            mime_type,
        })
    }

    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }

    pub fn as_base64(&self) -> &str {
        &self.base64
    }

    pub fn mime_type(&self) -> Option<&str> {
        self.mime_type.as_deref()
    }
}

/// Returns the payload part of a `data:<mime>;base64,<payload>` URL, or the
/// input unchanged when it has no such prefix.
pub fn strip_data_url_prefix(input: &str) -> &str {
    if !input.starts_with("data:") {
        return input;
    }
    match input.find(";base64,") {
        Some(pos) => &input[pos + ";base64,".len()..],
        None => input,
    }
}

fn mime_of_data_url(input: &str) -> Option<String> {
    let rest = input.strip_prefix("data:")?;
    let end = rest.find(';')?;
    let mime = &rest[..end];
    (!mime.is_empty()).then(|| mime.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_prefix() {
        assert_eq!(strip_data_url_prefix("data:image/png;base64,iVBORw0"), "iVBORw0");
        assert_eq!(strip_data_url_prefix("iVBORw0"), "iVBORw0");
        // Not base64-encoded: left alone.
        assert_eq!(strip_data_url_prefix("data:text/plain,hello"), "data:text/plain,hello");
    }

    #[test]
    fn test_payload_keeps_mime_type() {
        let payload = ImagePayload::from_data_url("data:image/jpeg;base64,/9j/4AAQ").unwrap();
        assert_eq!(payload.as_base64(), "/9j/4AAQ");
        assert_eq!(payload.mime_type(), Some("image/jpeg"));

        let bare = ImagePayload::from_base64("/9j/4AAQ").unwrap();
        assert_eq!(bare.mime_type(), None);
    }

    #[test]
    fn test_empty_payload_rejected() {
        let err = ImagePayload::from_data_url("data:image/png;base64,").unwrap_err();
        assert!(err.is_invalid_input());
    }
}
