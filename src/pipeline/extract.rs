use super::PipelineOptions;
use crate::browser::{scripts, wait_until, EditorPage};
use crate::data_uri;
use crate::narrator::Narrator;
use crate::output::{ExportFormat, ExportedImage};
use crate::{RenderError, Result};

/// Reads the data URI off the export page and decodes it.
pub(crate) async fn extract_image<P: EditorPage>(
    page: &P,
    format: ExportFormat,
    options: &PipelineOptions,
    narrator: &Narrator,
) -> Result<ExportedImage> {
    let export = options.profile.export(format);
    let ready = export.output_ready();
    narrator.step("waiting for the exported image");
    wait_until(page, &ready, options.timeouts.image, options.timeouts.poll_interval)
        .await
        .map_err(|timed_out| RenderError::ExportTimeout {
            what: timed_out.describe(&ready),
            timeout: options.timeouts.image,
        })?;

    narrator.step("decoding image");
    let read = scripts::read_attribute(&export.output_selector, &export.output_attribute)?;
    let value = page.evaluate(&read).await?;
    let uri = value.as_str().ok_or_else(|| {
        RenderError::decode(format!(
            "`{}` has no `{}` attribute",
            export.output_selector, export.output_attribute
        ))
    })?;
    image_from_data_uri(uri, format)
}

pub(crate) fn image_from_data_uri(uri: &str, format: ExportFormat) -> Result<ExportedImage> {
    let decoded = data_uri::decode(uri)?;
    if decoded.mime_type != format.mime_type() {
        return Err(RenderError::decode(format!(
            "expected {} but the editor exported {}",
            format.mime_type(),
            decoded.mime_type
        )));
    }
    if !format.matches_signature(&decoded.bytes) {
        return Err(RenderError::decode(format!(
            "payload declared as {} does not start with a {} signature",
            decoded.mime_type, format
        )));
    }
    Ok(ExportedImage {
        format,
        mime_type: decoded.mime_type,
        bytes: decoded.bytes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine as _;

    const PNG: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR";

    #[test]
    fn accepts_matching_png() {
        let uri = format!("data:image/png;base64,{}", STANDARD.encode(PNG));
        let image = image_from_data_uri(&uri, ExportFormat::Png).unwrap();
        assert_eq!(image.bytes, PNG);
        assert_eq!(image.mime_type, "image/png");
    }

    #[test]
    fn rejects_mime_mismatch() {
        let uri = format!("data:image/jpeg;base64,{}", STANDARD.encode(PNG));
        let err = image_from_data_uri(&uri, ExportFormat::Png).unwrap_err();
        assert!(err.to_string().contains("expected image/png"));
    }

    #[test]
    fn rejects_bytes_without_signature() {
        let uri = format!("data:application/pdf;base64,{}", STANDARD.encode(PNG));
        let err = image_from_data_uri(&uri, ExportFormat::Pdf).unwrap_err();
        assert!(matches!(err, RenderError::ExportDecode(_)));
        assert!(err.to_string().contains("signature"));
    }
}
