use tokio::time::{timeout, Instant};
use url::Url;

use super::PipelineOptions;
use crate::browser::{wait_until, BrowserSession};
use crate::narrator::Narrator;
use crate::{RenderError, Result};

/// Opens the editor and blocks until its rendering surface exists.
///
/// One navigation budget covers both opening the page and the readiness wait.
pub(crate) async fn load_editor<S: BrowserSession>(
    session: &mut S,
    url: &Url,
    options: &PipelineOptions,
    narrator: &Narrator,
) -> Result<S::Page> {
    narrator.step(&format!("loading editor from {url}"));
    let budget = options.timeouts.navigation;
    let started = Instant::now();

    let page = match timeout(budget, session.open_page(url.as_str())).await {
        Ok(page) => page?,
        Err(_) => {
            return Err(RenderError::NavigationTimeout {
                predicate: format!("navigation to {url}"),
                timeout: budget,
            })
        }
    };

    let ready = options.profile.loaded();
    narrator.step(&format!("waiting for {ready}"));
    let remaining = budget.saturating_sub(started.elapsed());
    wait_until(&page, &ready, remaining, options.timeouts.poll_interval)
        .await
        .map_err(|timed_out| RenderError::NavigationTimeout {
            predicate: timed_out.describe(&ready),
            timeout: budget,
        })?;
    Ok(page)
}
