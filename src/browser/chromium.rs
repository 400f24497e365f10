//! Chromium over the DevTools protocol, via chromiumoxide.

use std::time::Duration;

use chromiumoxide::cdp::browser_protocol::target::{EventTargetCreated, TargetId};
use chromiumoxide::cdp::js_protocol::runtime::EvaluateParams;
use chromiumoxide::listeners::EventStream;
use chromiumoxide::{Browser, BrowserConfig, Page};
use futures::StreamExt;
use serde_json::Value;
use tokio::task::JoinHandle;

use super::driver::{BrowserLauncher, BrowserSession, EditorPage};
use super::launch::{Executable, LaunchOptions, LAUNCH_ARGS};
use super::script::Script;
use super::wait::DEFAULT_POLL_INTERVAL;
use crate::{RenderError, Result};

#[derive(Debug, Clone)]
pub struct ChromiumLauncher {
    poll_interval: Duration,
}

impl ChromiumLauncher {
    pub fn new(poll_interval: Duration) -> Self {
        Self { poll_interval }
    }
}

impl Default for ChromiumLauncher {
    fn default() -> Self {
        Self::new(DEFAULT_POLL_INTERVAL)
    }
}

impl BrowserLauncher for ChromiumLauncher {
    type Session = ChromiumSession;

    async fn launch(&self, options: &LaunchOptions) -> Result<ChromiumSession> {
        let mut builder = BrowserConfig::builder()
            .args(LAUNCH_ARGS.iter().copied())
            .window_size(options.window.width, options.window.height);
        if !options.headless {
            builder = builder.with_head();
        }
        match options.resolve_executable()? {
            Executable::Path(path) => {
                log::debug!("launching chromium from {}", path.display());
                builder = builder.chrome_executable(path);
            }
            Executable::Provisioned => {
                log::debug!("no known chromium installation found; using library discovery");
            }
        }
        let config = builder.build().map_err(RenderError::Launch)?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| RenderError::Launch(e.to_string()))?;
        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(err) = event {
                    log::debug!("devtools connection ended: {err}");
                    break;
                }
            }
        });

        Ok(ChromiumSession {
            browser,
            handler,
            pages: Vec::new(),
            poll_interval: self.poll_interval,
        })
    }
}

pub struct ChromiumSession {
    browser: Browser,
    handler: JoinHandle<()>,
    /// Pages this session opened or adopted.
    pages: Vec<TargetId>,
    poll_interval: Duration,
}

impl ChromiumSession {
    /// Waits until the browser has attached `target_id` as a page.
    async fn attached_page(&self, target_id: &TargetId) -> Result<Page> {
        loop {
            let pages = self
                .browser
                .pages()
                .await
                .map_err(|e| RenderError::browser("listing pages", e))?;
            if let Some(page) = pages.into_iter().find(|p| p.target_id() == target_id) {
                return Ok(page);
            }
            tokio::time::sleep(self.poll_interval).await;
        }
    }
}

impl BrowserSession for ChromiumSession {
    type Page = ChromiumPage;
    type NewPageWatch = EventStream<EventTargetCreated>;

    async fn open_page(&mut self, url: &str) -> Result<ChromiumPage> {
        let page = self
            .browser
            .new_page(url)
            .await
            .map_err(|e| RenderError::browser(format!("opening {url}"), e))?;
        self.pages.push(page.target_id().clone());
        Ok(ChromiumPage { page })
    }

    async fn subscribe_new_page(&mut self) -> Result<Self::NewPageWatch> {
        self.browser
            .event_listener::<EventTargetCreated>()
            .await
            .map_err(|e| RenderError::browser("subscribing to new pages", e))
    }

    async fn await_new_page(&mut self, mut watch: Self::NewPageWatch) -> Result<ChromiumPage> {
        let target_id = loop {
            let event = watch.next().await.ok_or_else(|| {
                RenderError::browser("awaiting the export page", "browser event stream ended")
            })?;
            let info = &event.target_info;
            if info.r#type == "page" && !self.pages.contains(&info.target_id) {
                break info.target_id.clone();
            }
        };
        log::debug!("export page created: {target_id:?}");
        let page = self.attached_page(&target_id).await?;
        self.pages.push(target_id);
        Ok(ChromiumPage { page })
    }

    async fn close(&mut self) -> Result<()> {
        let closed = self
            .browser
            .close()
            .await
            .map(|_| ())
            .map_err(|e| RenderError::browser("closing browser", e));
        if let Err(err) = self.browser.wait().await {
            log::debug!("waiting for chromium to exit failed: {err}");
        }
        self.handler.abort();
        closed
    }

    async fn wait_closed(&mut self) -> Result<()> {
        self.browser
            .wait()
            .await
            .map_err(|e| RenderError::browser("waiting for the browser to exit", e))?;
        self.handler.abort();
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct ChromiumPage {
    page: Page,
}

impl EditorPage for ChromiumPage {
    async fn evaluate(&self, script: &Script) -> Result<Value> {
        let params = EvaluateParams::builder()
            .expression(script.source())
            .await_promise(true)
            .return_by_value(true)
            .build()
            .map_err(|e| RenderError::browser(format!("preparing {}", script.name()), e))?;
        let result = self
            .page
            .evaluate_expression(params)
            .await
            .map_err(|e| RenderError::browser(format!("evaluating {}", script.name()), e))?;
        Ok(result.value().cloned().unwrap_or(Value::Null))
    }
}
