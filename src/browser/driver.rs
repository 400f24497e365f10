//! Seams between the pipeline and whatever actually drives the browser.

use serde_json::Value;

use super::launch::LaunchOptions;
use super::script::Script;
use crate::Result;

/// A page the pipeline can evaluate scripts in.
#[allow(async_fn_in_trait)]
pub trait EditorPage {
    /// Evaluates `script`, awaiting any returned promise, and returns its value.
    async fn evaluate(&self, script: &Script) -> Result<Value>;
}

/// One browser process/connection, exclusively owned by one pipeline run.
#[allow(async_fn_in_trait)]
pub trait BrowserSession {
    type Page: EditorPage;
    /// Registration for the next page the browser opens.
    type NewPageWatch;

    /// Opens a new page on `url` and returns once the initial navigation commits.
    async fn open_page(&mut self, url: &str) -> Result<Self::Page>;

    /// Starts listening for new pages. Pages created after this call returns
    /// are delivered to [`BrowserSession::await_new_page`].
    async fn subscribe_new_page(&mut self) -> Result<Self::NewPageWatch>;

    /// Resolves with the first page created after `watch` was registered.
    /// Unbounded; callers apply their own deadline.
    async fn await_new_page(&mut self, watch: Self::NewPageWatch) -> Result<Self::Page>;

    async fn close(&mut self) -> Result<()>;

    /// Blocks until the browser exits on its own (debug mode).
    async fn wait_closed(&mut self) -> Result<()>;
}

#[allow(async_fn_in_trait)]
pub trait BrowserLauncher {
    type Session: BrowserSession;

    async fn launch(&self, options: &LaunchOptions) -> Result<Self::Session>;
}
