//! Browser launch configuration and executable discovery.

use std::path::{Path, PathBuf};

use crate::window::WindowSize;
use crate::{RenderError, Result};

/// Fixed launch flags. Sandboxing is disabled because the renderer usually
/// runs as root inside containers, and `/dev/shm` there is typically too
/// small for Chromium's shared memory.
pub const LAUNCH_ARGS: &[&str] = &["--no-sandbox", "--disable-dev-shm-usage"];

/// Known installation paths, checked in order.
pub const DEFAULT_EXECUTABLE_CANDIDATES: &[&str] = &[
    "/Applications/Chromium.app/Contents/MacOS/Chromium",
    "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
    "/usr/bin/chromium",
    "/usr/bin/chromium-browser",
    "/usr/bin/google-chrome",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchOptions {
    /// Explicit executable; must exist when set.
    pub executable: Option<PathBuf>,
    pub candidates: Vec<PathBuf>,
    pub headless: bool,
    pub window: WindowSize,
}

impl Default for LaunchOptions {
    fn default() -> Self {
        Self {
            executable: None,
            candidates: default_candidates(),
            headless: true,
            window: WindowSize::default(),
        }
    }
}

pub fn default_candidates() -> Vec<PathBuf> {
    DEFAULT_EXECUTABLE_CANDIDATES
        .iter()
        .map(PathBuf::from)
        .collect()
}

/// Which browser binary to start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Executable {
    Path(PathBuf),
    /// None of the candidates exist; the automation library locates or
    /// provisions a browser itself.
    Provisioned,
}

impl LaunchOptions {
    pub fn resolve_executable(&self) -> Result<Executable> {
        if let Some(explicit) = &self.executable {
            if explicit.exists() {
                return Ok(Executable::Path(explicit.clone()));
            }
            return Err(RenderError::Launch(format!(
                "configured chromium executable does not exist: {}",
                explicit.display()
            )));
        }
        Ok(first_existing(&self.candidates)
            .map(|path| Executable::Path(path.to_path_buf()))
            .unwrap_or(Executable::Provisioned))
    }
}

fn first_existing(candidates: &[PathBuf]) -> Option<&Path> {
    candidates
        .iter()
        .map(PathBuf::as_path)
        .find(|path| path.exists())
}
