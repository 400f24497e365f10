//! xrender Library
//!
//! Renders Structurizr Express diagram definitions to images by driving the
//! hosted editor in a headless Chromium: the definition is injected into the
//! editor, validated by it, exported, and the exported image is decoded from
//! the page the editor opens for it.
//!
//! # Module Overview
//!
//! - [`definition`] - Definition normalization
//! - [`browser`] - Browser traits, the Chromium implementation and page scripts
//! - [`pipeline`] - The export state machine and its stages
//! - [`editor`] - Editor location and interaction points
//! - [`config`] - Configuration file support
//! - [`data_uri`] / [`output`] - Decoding and typing of the exported image
//! - [`narrator`] - Step narration on stderr
//!
//! # Example
//!
//! ```no_run
//! use xrender_lib::{ChromiumLauncher, DiagramDefinition, Narrator, Pipeline, PipelineOptions};
//!
//! # async fn example() -> xrender_lib::Result<()> {
//! let definition = DiagramDefinition::new("type: System Landscape\nelements: []\n")?;
//! let pipeline = Pipeline::new(
//!     ChromiumLauncher::default(),
//!     PipelineOptions::default(),
//!     Narrator::silent(),
//! );
//! let image = pipeline.render(&definition).await?;
//! std::fs::write("diagram.png", &image.bytes)?;
//! # Ok(())
//! # }
//! ```

pub mod browser;
pub mod config;
pub mod data_uri;
pub mod definition;
pub mod editor;
pub mod error;
pub mod narrator;
pub mod output;
pub mod pipeline;
pub mod window;

pub use browser::{
    BrowserLauncher, BrowserSession, ChromiumLauncher, ChromiumSession, EditorPage,
    LaunchOptions, ReadinessPredicate, Script,
};
pub use config::{Config, Timeouts};
pub use definition::{normalize, DiagramDefinition, DOCUMENT_SEPARATOR};
pub use editor::{EditorProfile, EditorTarget, ExportProfile, DEFAULT_EDITOR_URL};
pub use error::{ErrorKind, ErrorPayload, RenderError, Result};
pub use narrator::{Narrator, ProgressCallback, Verbosity};
pub use output::{ExportFormat, ExportedImage};
pub use pipeline::{
    Pipeline, PipelineOptions, PipelineRun, PipelineState, StateTrace, ValidationOutcome,
};
pub use window::WindowSize;
