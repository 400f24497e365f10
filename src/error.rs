use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Input error: {0}")]
    Input(String),

    #[error("Failed to write output to {target}: {source}")]
    Output {
        target: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Browser launch failed: {0}")]
    Launch(String),

    #[error("Browser error while {stage}: {message}")]
    Browser { stage: String, message: String },

    #[error("Timed out after {timeout:?} waiting for {predicate}")]
    NavigationTimeout { predicate: String, timeout: Duration },

    #[error("Diagram definition is invalid ({} error(s) reported by the editor)", errors.len())]
    ValidationFailed { errors: Vec<String> },

    #[error("Export timed out after {timeout:?} waiting for {what}")]
    ExportTimeout { what: String, timeout: Duration },

    #[error("Could not decode exported image: {0}")]
    ExportDecode(String),

    #[error("Overall deadline of {0:?} exceeded")]
    DeadlineExceeded(Duration),
}

impl RenderError {
    pub fn browser(stage: impl Into<String>, message: impl ToString) -> Self {
        RenderError::Browser {
            stage: stage.into(),
            message: message.to_string(),
        }
    }

    pub fn output(target: impl Into<String>, source: std::io::Error) -> Self {
        RenderError::Output {
            target: target.into(),
            source,
        }
    }

    pub fn decode(message: impl Into<String>) -> Self {
        RenderError::ExportDecode(message.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            RenderError::Input(_) => ErrorKind::InputError,
            RenderError::Output { .. } => ErrorKind::OutputError,
            RenderError::Config(_) => ErrorKind::ConfigError,
            RenderError::Io(_) | RenderError::Launch(_) | RenderError::Browser { .. } => {
                ErrorKind::InfrastructureError
            }
            RenderError::NavigationTimeout { .. } => ErrorKind::NavigationTimeoutError,
            RenderError::ValidationFailed { .. } => ErrorKind::ValidationFailed,
            RenderError::ExportTimeout { .. } => ErrorKind::ExportTimeoutError,
            RenderError::ExportDecode(_) => ErrorKind::ExportDecodeError,
            RenderError::DeadlineExceeded(_) => ErrorKind::DeadlineExceeded,
        }
    }

    /// Validation failures describe the caller's input; everything else is fatal.
    pub fn is_reportable(&self) -> bool {
        matches!(self, RenderError::ValidationFailed { .. })
    }

    pub fn to_payload(&self) -> ErrorPayload {
        let errors = match self {
            RenderError::ValidationFailed { errors } => errors.clone(),
            _ => Vec::new(),
        };
        let remediation = match self {
            RenderError::Input(_) => {
                "Pipe a diagram definition on stdin (or pass --input PATH)."
            }
            RenderError::Output { .. } => {
                "Check that the --output path is writable, or that stdout is still being read."
            }
            RenderError::Io(_) => "Re-run with --verbose for details.",
            RenderError::Config(_) => {
                "Check the config file and flags (e.g., --config PATH, --nav-timeout SECONDS)."
            }
            RenderError::Launch(msg) if msg.to_ascii_lowercase().contains("executable") => {
                "Install Chromium or Google Chrome, or point --chromium-path at an existing binary."
            }
            RenderError::Launch(_) => {
                "Verify that Chromium can start in this environment; run with --verbose for details."
            }
            RenderError::Browser { .. } => {
                "The editor page misbehaved; re-run with --verbose or --debug to inspect it."
            }
            RenderError::NavigationTimeout { .. } => {
                "Check connectivity to the editor, or raise --nav-timeout if it loads slowly."
            }
            RenderError::ValidationFailed { .. } => {
                "Fix the listed problems in the diagram definition and try again."
            }
            RenderError::ExportTimeout { .. } => {
                "The editor did not produce an export; raise --export-timeout or run with --debug."
            }
            RenderError::ExportDecode(_) => {
                "The editor produced an unexpected export payload; check the configured --format."
            }
            RenderError::DeadlineExceeded(_) => {
                "Raise --deadline or the individual timeouts if the editor is slow."
            }
        };
        ErrorPayload {
            kind: self.kind(),
            message: self.to_string(),
            errors,
            remediation: Some(remediation.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, RenderError>;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ErrorKind {
    InputError,
    OutputError,
    ConfigError,
    InfrastructureError,
    NavigationTimeoutError,
    ValidationFailed,
    ExportTimeoutError,
    ExportDecodeError,
    DeadlineExceeded,
}

/// Single-line machine-readable failure description.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorPayload {
    pub kind: ErrorKind,
    pub message: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remediation: Option<String>,
}
