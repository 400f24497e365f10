//! Decoding of `data:` URIs carrying the exported image.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use percent_encoding::percent_decode_str;

use crate::{RenderError, Result};

/// MIME type implied by a data URI without an explicit media type.
pub const DEFAULT_MIME_TYPE: &str = "text/plain";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUri {
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

/// Decodes `data:[<mediatype>][;base64],<data>`.
pub fn decode(uri: &str) -> Result<DataUri> {
    let uri = uri.trim();
    let rest = strip_scheme(uri).ok_or_else(|| {
        RenderError::decode(format!(
            "expected a data URI, got '{}'",
            preview(uri)
        ))
    })?;
    let (meta, payload) = rest
        .split_once(',')
        .ok_or_else(|| RenderError::decode("data URI has no ',' separating metadata and payload"))?;

    let mut params = meta.split(';');
    let mime_type = params
        .next()
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .unwrap_or(DEFAULT_MIME_TYPE)
        .to_ascii_lowercase();
    let is_base64 = params.any(|p| p.trim().eq_ignore_ascii_case("base64"));

    let bytes = if is_base64 {
        let compact: String = payload.chars().filter(|c| !c.is_ascii_whitespace()).collect();
        let compact = percent_decode_str(&compact)
            .decode_utf8()
            .map_err(|e| RenderError::decode(format!("invalid percent-encoding: {e}")))?;
        STANDARD
            .decode(compact.as_bytes())
            .map_err(|e| RenderError::decode(format!("invalid base64 payload: {e}")))?
    } else {
        percent_decode_str(payload).collect()
    };

    if bytes.is_empty() {
        return Err(RenderError::decode("data URI payload is empty"));
    }

    Ok(DataUri { mime_type, bytes })
}

fn strip_scheme(uri: &str) -> Option<&str> {
    let (scheme, rest) = uri.split_once(':')?;
    scheme.eq_ignore_ascii_case("data").then_some(rest)
}

fn preview(value: &str) -> String {
    const MAX: usize = 48;
    match value.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}…", &value[..idx]),
        None => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_base64_payload() {
        let uri = format!("data:image/png;base64,{}", STANDARD.encode(b"\x89PNG\r\n\x1a\nrest"));
        let decoded = decode(&uri).unwrap();
        assert_eq!(decoded.mime_type, "image/png");
        assert_eq!(decoded.bytes, b"\x89PNG\r\n\x1a\nrest");
    }

    #[test]
    fn tolerates_whitespace_and_escaped_padding() {
        let decoded = decode("data:application/pdf;base64,JVBE\n Ri0xLg%3D%3D").unwrap();
        assert_eq!(decoded.mime_type, "application/pdf");
        assert_eq!(decoded.bytes, b"%PDF-1.");
    }

    #[test]
    fn decodes_percent_encoded_payload_with_default_mime() {
        let decoded = decode("data:,hello%20world").unwrap();
        assert_eq!(decoded.mime_type, DEFAULT_MIME_TYPE);
        assert_eq!(decoded.bytes, b"hello world");
    }

    #[test]
    fn mime_type_is_lowercased_and_params_ignored() {
        let decoded = decode("DATA:Image/PNG;charset=binary;base64,AAEC").unwrap();
        assert_eq!(decoded.mime_type, "image/png");
        assert_eq!(decoded.bytes, vec![0, 1, 2]);
    }

    #[test]
    fn rejects_non_data_uri() {
        let err = decode("https://structurizr.com/static/img/logo.png").unwrap_err();
        assert!(matches!(err, RenderError::ExportDecode(_)));
        assert!(err.to_string().contains("expected a data URI"));
    }

    #[test]
    fn rejects_missing_comma() {
        assert!(matches!(
            decode("data:image/png;base64"),
            Err(RenderError::ExportDecode(_))
        ));
    }

    #[test]
    fn rejects_corrupt_base64() {
        assert!(matches!(
            decode("data:image/png;base64,!!!notbase64"),
            Err(RenderError::ExportDecode(_))
        ));
    }

    #[test]
    fn rejects_empty_payload() {
        let err = decode("data:image/png;base64,").unwrap_err();
        assert!(err.to_string().contains("empty"));
    }
}
