use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Export mode requested from the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Raster image.
    #[default]
    Png,
    /// Paginated document.
    Pdf,
}

impl ExportFormat {
    pub fn mime_type(self) -> &'static str {
        match self {
            ExportFormat::Png => "image/png",
            ExportFormat::Pdf => "application/pdf",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Png => "png",
            ExportFormat::Pdf => "pdf",
        }
    }

    /// Checks the leading bytes for the format's file signature.
    pub fn matches_signature(self, bytes: &[u8]) -> bool {
        match self {
            ExportFormat::Png => {
                matches!(image::guess_format(bytes), Ok(image::ImageFormat::Png))
            }
            ExportFormat::Pdf => bytes.starts_with(b"%PDF-"),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "png" => Ok(ExportFormat::Png),
            "pdf" => Ok(ExportFormat::Pdf),
            other => Err(format!("unsupported export format '{other}' (expected png or pdf)")),
        }
    }
}

/// A fully decoded export. Never holds a partial buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedImage {
    pub format: ExportFormat,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl ExportedImage {
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}
