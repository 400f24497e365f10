//! The diagram export pipeline.
//!
//! A run walks an explicit state machine (see [`PipelineState`]):
//!
//! ```text
//! Idle -> Launching -> Navigating -> Injecting -> { Invalid | RenderOk }
//!      -> Exporting -> AwaitingSecondaryPage -> ExtractingImage -> Done
//! any working state -> Cleanup -> Failed
//! ```
//!
//! The session is closed exactly once on every terminal path. In debug mode
//! it is never closed: it is handed back in [`PipelineRun::lingering`] so an
//! operator can inspect the live browser, and the caller is expected to wait
//! for it to exit.

mod export;
mod extract;
mod inject;
mod navigate;
mod state;

use tokio::time::timeout;
use url::Url;

use crate::browser::{BrowserLauncher, BrowserSession, LaunchOptions};
use crate::config::{Config, Timeouts};
use crate::definition::DiagramDefinition;
use crate::editor::{EditorProfile, EditorTarget};
use crate::narrator::Narrator;
use crate::output::{ExportFormat, ExportedImage};
use crate::{RenderError, Result};

pub use inject::ValidationOutcome;
pub use state::{PipelineState, StateTrace};

#[derive(Debug, Clone)]
pub struct PipelineOptions {
    pub format: ExportFormat,
    pub target: EditorTarget,
    pub profile: EditorProfile,
    pub launch: LaunchOptions,
    pub timeouts: Timeouts,
    /// Visible browser that is left open after the run.
    pub debug: bool,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            format: ExportFormat::default(),
            target: EditorTarget::default(),
            profile: EditorProfile::default(),
            launch: LaunchOptions::default(),
            timeouts: Timeouts::default(),
            debug: false,
        }
    }
}

impl PipelineOptions {
    pub fn from_config(config: &Config, debug: bool) -> Result<Self> {
        Ok(Self {
            format: config.format,
            target: config.editor.target()?,
            profile: config.editor.interaction.clone(),
            launch: LaunchOptions {
                executable: config.browser.executable.clone(),
                candidates: config.browser.candidates.clone(),
                headless: !debug,
                window: config.browser.window,
            },
            timeouts: config.timeouts,
            debug,
        })
    }
}

/// Outcome of one pipeline run.
#[derive(Debug)]
pub struct PipelineRun<S> {
    pub result: Result<ExportedImage>,
    pub trace: StateTrace,
    /// The still-open session when running in debug mode.
    pub lingering: Option<S>,
}

impl<S> PipelineRun<S> {
    pub fn terminal(&self) -> Option<PipelineState> {
        self.trace.terminal()
    }
}

pub struct Pipeline<L> {
    launcher: L,
    options: PipelineOptions,
    narrator: Narrator,
}

impl<L: BrowserLauncher> Pipeline<L> {
    pub fn new(launcher: L, options: PipelineOptions, narrator: Narrator) -> Self {
        Self {
            launcher,
            options,
            narrator,
        }
    }

    pub fn options(&self) -> &PipelineOptions {
        &self.options
    }

    /// Renders `definition`, reaching exactly one terminal state.
    pub async fn run(&self, definition: &DiagramDefinition) -> PipelineRun<L::Session> {
        let mut trace = StateTrace::new();
        trace.enter(PipelineState::Launching);

        let launched = match self.options.target.to_url() {
            Ok(url) => self.launch().await.map(|session| (url, session)),
            Err(err) => Err(err),
        };
        let (url, mut session) = match launched {
            Ok(launched) => launched,
            Err(err) => {
                // No session exists, so cleanup has nothing to release.
                trace.enter(PipelineState::Cleanup);
                trace.enter(PipelineState::Failed);
                self.narrator.finish();
                return PipelineRun {
                    result: Err(err),
                    trace,
                    lingering: None,
                };
            }
        };

        let driven = self.drive(&mut session, &url, definition, &mut trace);
        let result = match self.options.timeouts.overall_deadline() {
            Some(deadline) => match timeout(deadline, driven).await {
                Ok(result) => result,
                Err(_) => Err(RenderError::DeadlineExceeded(deadline)),
            },
            None => driven.await,
        };

        let lingering = match &result {
            Ok(_) => {
                let lingering = self.release(session).await;
                trace.enter(PipelineState::Done);
                lingering
            }
            Err(RenderError::ValidationFailed { .. }) => {
                let lingering = self.release(session).await;
                trace.enter(PipelineState::Invalid);
                lingering
            }
            Err(err) => {
                log::debug!("pipeline failed in {}: {err}", trace.current());
                trace.enter(PipelineState::Cleanup);
                let lingering = self.release(session).await;
                trace.enter(PipelineState::Failed);
                lingering
            }
        };
        self.narrator.finish();

        PipelineRun {
            result,
            trace,
            lingering,
        }
    }

    /// Convenience wrapper discarding the trace. In debug mode the browser
    /// is left running.
    pub async fn render(&self, definition: &DiagramDefinition) -> Result<ExportedImage> {
        self.run(definition).await.result
    }

    async fn launch(&self) -> Result<L::Session> {
        self.narrator.step("launching browser");
        let launch = LaunchOptions {
            headless: !self.options.debug,
            ..self.options.launch.clone()
        };
        self.launcher.launch(&launch).await
    }

    async fn drive(
        &self,
        session: &mut L::Session,
        url: &Url,
        definition: &DiagramDefinition,
        trace: &mut StateTrace,
    ) -> Result<ExportedImage> {
        let options = &self.options;
        let narrator = &self.narrator;

        trace.enter(PipelineState::Navigating);
        let editor = navigate::load_editor(session, url, options, narrator).await?;

        trace.enter(PipelineState::Injecting);
        match inject::inject_definition(&editor, definition, options, narrator).await? {
            ValidationOutcome::Invalid(errors) => {
                return Err(RenderError::ValidationFailed { errors })
            }
            ValidationOutcome::Clean => trace.enter(PipelineState::RenderOk),
        }

        trace.enter(PipelineState::Exporting);
        let watch =
            export::trigger_export(session, &editor, options.format, options, narrator).await?;

        trace.enter(PipelineState::AwaitingSecondaryPage);
        let export_page =
            export::capture_secondary_page(session, watch, options, narrator).await?;

        trace.enter(PipelineState::ExtractingImage);
        extract::extract_image(&export_page, options.format, options, narrator).await
    }

    /// Closes the session, or hands it back untouched in debug mode.
    async fn release(&self, mut session: L::Session) -> Option<L::Session> {
        if self.options.debug {
            self.narrator.notice(
                "DEBUG MODE: leaving browser open; process may be blocked until the browser quits.",
            );
            return Some(session);
        }
        self.narrator.step("closing browser");
        match timeout(self.options.timeouts.close, session.close()).await {
            Ok(Ok(())) => {}
            Ok(Err(err)) => log::warn!("closing browser failed: {err}"),
            Err(_) => log::warn!(
                "browser did not close within {:?}",
                self.options.timeouts.close
            ),
        }
        None
    }
}
