//! Export trigger and secondary-page capture.
//!
//! The editor opens the export in a new page, and that page can appear
//! before or after the export call returns. The listener is therefore always
//! registered before the export script runs; looking the page up afterwards
//! by position in the page list would race against it.

use tokio::time::timeout;

use super::PipelineOptions;
use crate::browser::{scripts, BrowserSession, EditorPage};
use crate::narrator::Narrator;
use crate::output::ExportFormat;
use crate::{RenderError, Result};

/// Subscribes to new pages, then triggers the export.
pub(crate) async fn trigger_export<S: BrowserSession>(
    session: &mut S,
    page: &S::Page,
    format: ExportFormat,
    options: &PipelineOptions,
    narrator: &Narrator,
) -> Result<S::NewPageWatch> {
    let watch = session.subscribe_new_page().await?;
    narrator.step("calling export function");
    let script = scripts::export_diagram(options.profile.export(format))?;
    let returned = page.evaluate(&script).await?;
    log::debug!("export script returned {returned}");
    Ok(watch)
}

/// Awaits the page the export opened.
pub(crate) async fn capture_secondary_page<S: BrowserSession>(
    session: &mut S,
    watch: S::NewPageWatch,
    options: &PipelineOptions,
    narrator: &Narrator,
) -> Result<S::Page> {
    narrator.step("waiting for the export page");
    let deadline = options.timeouts.export;
    match timeout(deadline, session.await_new_page(watch)).await {
        Ok(page) => page,
        Err(_) => Err(RenderError::ExportTimeout {
            what: "the editor to open the export page".to_string(),
            timeout: deadline,
        }),
    }
}
