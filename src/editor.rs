//! Where the editor lives and how to talk to it.
//!
//! The defaults target Structurizr Express. Every interaction point the
//! pipeline relies on is listed in [`EditorProfile`] so a changed editor
//! build can be followed from the config file alone.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::browser::ReadinessPredicate;
use crate::output::ExportFormat;
use crate::{RenderError, Result};

pub const DEFAULT_EDITOR_URL: &str = "https://structurizr.com/express?autoLayout=false";

/// Navigation target: the hosted editor or a local static copy of it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorTarget {
    Remote(String),
    LocalAsset(PathBuf),
}

impl Default for EditorTarget {
    fn default() -> Self {
        EditorTarget::Remote(DEFAULT_EDITOR_URL.to_string())
    }
}

impl EditorTarget {
    pub fn to_url(&self) -> Result<Url> {
        match self {
            EditorTarget::Remote(raw) => {
                let url = Url::parse(raw)
                    .map_err(|e| RenderError::Config(format!("Invalid editor URL '{raw}': {e}")))?;
                match url.scheme() {
                    "http" | "https" => Ok(url),
                    other => Err(RenderError::Config(format!(
                        "Editor URL must use http or https, got '{other}'"
                    ))),
                }
            }
            EditorTarget::LocalAsset(path) => {
                let absolute = path.canonicalize().map_err(|e| {
                    RenderError::Config(format!(
                        "Local editor asset not found: {} ({e})",
                        path.display()
                    ))
                })?;
                Url::from_file_path(&absolute).map_err(|_| {
                    RenderError::Config(format!(
                        "Local editor asset path cannot be expressed as a URL: {}",
                        absolute.display()
                    ))
                })
            }
        }
    }
}

/// How a given export format is triggered and where its result appears.
///
/// A table overriding one format in the config must name all three fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportProfile {
    /// Dotted path from `window` to the editor's export function.
    pub function: String,
    /// Element on the secondary page holding the data URI.
    pub output_selector: String,
    pub output_attribute: String,
}

impl ExportProfile {
    fn png() -> Self {
        Self {
            function: "structurizr.scripting.exportCurrentDiagramToPNG".to_string(),
            output_selector: "img".to_string(),
            output_attribute: "src".to_string(),
        }
    }

    fn pdf() -> Self {
        Self {
            function: "structurizr.scripting.exportCurrentDiagramToPDF".to_string(),
            output_selector: "embed".to_string(),
            output_attribute: "src".to_string(),
        }
    }

    pub fn output_ready(&self) -> ReadinessPredicate {
        ReadinessPredicate::attribute(&self.output_selector, &self.output_attribute)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorProfile {
    /// Rendering surface whose presence means the editor is interactive.
    pub surface_selector: String,
    /// Introductory overlays hidden before anything else happens.
    pub overlay_selectors: Vec<String>,
    /// Tab that reveals the definition editor; re-rendering depends on it being active.
    pub definition_tab_selector: Option<String>,
    pub definition_input_selector: String,
    /// Dotted path to the editor's re-render entry point.
    pub render_function: String,
    /// Dotted path to a predicate reporting whether the last render had errors.
    pub has_errors_function: String,
    /// Elements holding individual validation messages.
    pub error_selector: String,
    /// How long the document must stay unchanged after the re-render
    /// before errors are queried.
    #[serde(with = "humantime_serde")]
    pub settle_quiet: Duration,
    /// Extra condition that must hold before errors are queried.
    pub settled_expression: Option<String>,
    pub png: ExportProfile,
    pub pdf: ExportProfile,
}

impl Default for EditorProfile {
    fn default() -> Self {
        Self {
            surface_selector: "svg".to_string(),
            overlay_selectors: vec![
                "#introductionModal".to_string(),
                ".modal-backdrop".to_string(),
            ],
            definition_tab_selector: Some("a[href=\"#yaml\"]".to_string()),
            definition_input_selector: "#yamlDefinition".to_string(),
            render_function: "structurizr.scripting.renderExpressDefinition".to_string(),
            has_errors_function: "structurizr.scripting.hasErrors".to_string(),
            error_selector: "#expressErrors li".to_string(),
            settle_quiet: Duration::from_millis(250),
            settled_expression: None,
            png: ExportProfile::png(),
            pdf: ExportProfile::pdf(),
        }
    }
}

impl EditorProfile {
    pub fn export(&self, format: ExportFormat) -> &ExportProfile {
        match format {
            ExportFormat::Png => &self.png,
            ExportFormat::Pdf => &self.pdf,
        }
    }

    /// Holds once the editor page is interactive.
    pub fn loaded(&self) -> ReadinessPredicate {
        ReadinessPredicate::element(&self.surface_selector)
    }

    /// Holds once the re-render started by the injector has settled and
    /// errors can be queried. Unlike [`EditorProfile::loaded`] it cannot
    /// hold before the definition has been injected.
    pub fn settled(&self) -> ReadinessPredicate {
        let quiet_ms = u64::try_from(self.settle_quiet.as_millis()).unwrap_or(u64::MAX);
        let mut parts = vec![
            ReadinessPredicate::DocumentComplete,
            ReadinessPredicate::RenderSettled { quiet_ms },
        ];
        if let Some(expr) = &self.settled_expression {
            parts.push(ReadinessPredicate::Expression(expr.clone()));
        }
        ReadinessPredicate::AllOf(parts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_target_is_structurizr_express() {
        let url = EditorTarget::default().to_url().unwrap();
        assert_eq!(url.host_str(), Some("structurizr.com"));
        assert_eq!(url.path(), "/express");
        assert_eq!(url.query(), Some("autoLayout=false"));
    }

    #[test]
    fn remote_target_rejects_other_schemes() {
        let err = EditorTarget::Remote("ftp://example.com/express".to_string())
            .to_url()
            .unwrap_err();
        assert!(matches!(err, RenderError::Config(_)));
    }

    #[test]
    fn local_asset_becomes_file_url() {
        let dir = tempfile::tempdir().unwrap();
        let asset = dir.path().join("express.html");
        std::fs::write(&asset, "<html><body><svg></svg></body></html>").unwrap();
        let url = EditorTarget::LocalAsset(asset).to_url().unwrap();
        assert_eq!(url.scheme(), "file");
        assert!(url.path().ends_with("/express.html"));
    }

    #[test]
    fn missing_local_asset_is_a_config_error() {
        let err = EditorTarget::LocalAsset(PathBuf::from("/definitely/not/here.html"))
            .to_url()
            .unwrap_err();
        assert!(err.to_string().contains("Local editor asset not found"));
    }

    #[test]
    fn export_profile_follows_format() {
        let profile = EditorProfile::default();
        assert_eq!(profile.export(ExportFormat::Png).output_selector, "img");
        assert_eq!(profile.export(ExportFormat::Pdf).output_selector, "embed");
        assert!(profile
            .export(ExportFormat::Pdf)
            .function
            .ends_with("exportCurrentDiagramToPDF"));
    }

    #[test]
    fn settled_predicate_appends_custom_expression() {
        let profile = EditorProfile {
            settled_expression: Some("!window.rendering".to_string()),
            ..EditorProfile::default()
        };
        match profile.settled() {
            ReadinessPredicate::AllOf(parts) => {
                assert_eq!(parts.len(), 3);
                assert_eq!(
                    parts[2],
                    ReadinessPredicate::Expression("!window.rendering".to_string())
                );
            }
            other => panic!("expected conjunction, got {other:?}"),
        }
    }

    #[test]
    fn settled_predicate_waits_for_the_rerender() {
        let profile = EditorProfile::default();
        let settled = profile.settled();
        assert_ne!(settled, profile.loaded());
        match settled {
            ReadinessPredicate::AllOf(parts) => {
                assert!(parts.contains(&ReadinessPredicate::RenderSettled { quiet_ms: 250 }));
                assert!(!parts.contains(&profile.loaded()));
            }
            other => panic!("expected conjunction, got {other:?}"),
        }
    }

    #[test]
    fn profile_deserializes_partial_tables() {
        let profile: EditorProfile = toml::from_str(
            r##"
            surface_selector = "#diagram svg"
            settle_quiet = "500ms"
            [pdf]
            function = "editor.exportPdf"
            output_selector = "iframe"
            output_attribute = "src"
            "##,
        )
        .unwrap();
        assert_eq!(profile.surface_selector, "#diagram svg");
        assert_eq!(profile.settle_quiet, Duration::from_millis(500));
        assert_eq!(profile.pdf.function, "editor.exportPdf");
        assert_eq!(profile.pdf.output_selector, "iframe");
        assert_eq!(profile.png, EditorProfile::default().png);
        assert_eq!(profile.render_function, EditorProfile::default().render_function);
    }
}
