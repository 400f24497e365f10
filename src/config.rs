use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::browser::{default_candidates, DEFAULT_POLL_INTERVAL};
use crate::editor::{EditorProfile, EditorTarget, DEFAULT_EDITOR_URL};
use crate::output::ExportFormat;
use crate::window::WindowSize;
use crate::{RenderError, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub format: ExportFormat,
    pub timeouts: Timeouts,
    pub editor: EditorConfig,
    pub browser: BrowserSettings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            format: ExportFormat::Png,
            timeouts: Timeouts::default(),
            editor: EditorConfig::default(),
            browser: BrowserSettings::default(),
        }
    }
}

/// Every bounded wait in the pipeline has exactly one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Timeouts {
    /// Opening the editor until its rendering surface exists.
    #[serde(with = "humantime_serde")]
    pub navigation: Duration,
    /// Re-render after injection until errors can be queried.
    #[serde(with = "humantime_serde")]
    pub settle: Duration,
    /// Export call until the secondary page exists.
    #[serde(with = "humantime_serde")]
    pub export: Duration,
    /// Secondary page until its image element carries data.
    #[serde(with = "humantime_serde")]
    pub image: Duration,
    #[serde(with = "humantime_serde")]
    pub close: Duration,
    /// Whole run after launch; `0s` disables it.
    #[serde(with = "humantime_serde")]
    pub overall: Option<Duration>,
    #[serde(with = "humantime_serde")]
    pub poll_interval: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            navigation: Duration::from_secs(30),
            settle: Duration::from_secs(10),
            export: Duration::from_secs(20),
            image: Duration::from_secs(20),
            close: Duration::from_secs(10),
            overall: Some(Duration::from_secs(120)),
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

impl Timeouts {
    pub fn overall_deadline(&self) -> Option<Duration> {
        self.overall.filter(|d| !d.is_zero())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct EditorConfig {
    /// Hosted editor URL; defaults to Structurizr Express.
    pub url: Option<String>,
    /// Local static copy of the editor, used instead of `url`.
    pub local_asset: Option<PathBuf>,
    pub interaction: EditorProfile,
}

impl EditorConfig {
    pub fn target(&self) -> Result<EditorTarget> {
        match (&self.url, &self.local_asset) {
            (Some(_), Some(_)) => Err(RenderError::Config(
                "Set either editor.url or editor.local_asset, not both".to_string(),
            )),
            (Some(url), None) => Ok(EditorTarget::Remote(url.clone())),
            (None, Some(path)) => Ok(EditorTarget::LocalAsset(path.clone())),
            (None, None) => Ok(EditorTarget::Remote(DEFAULT_EDITOR_URL.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserSettings {
    pub executable: Option<PathBuf>,
    pub candidates: Vec<PathBuf>,
    pub window: WindowSize,
}

impl Default for BrowserSettings {
    fn default() -> Self {
        Self {
            executable: None,
            candidates: default_candidates(),
            window: WindowSize::default(),
        }
    }
}

impl Config {
    /// `~/.config/xrender/config.toml` (platform equivalent).
    pub fn central_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("xrender").join("config.toml"))
    }

    /// Loads `path`, else the central config when it exists, else defaults.
    pub fn load(path: Option<&Path>) -> Result<Config> {
        let source = match path {
            Some(explicit) => Some(explicit.to_path_buf()),
            None => Self::central_config_path().filter(|p| p.is_file()),
        };
        match source {
            Some(file) => Self::from_file(&file),
            None => Ok(Config::default()),
        }
    }

    pub fn from_file(path: &Path) -> Result<Config> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            RenderError::Config(format!("Failed to read config {}: {e}", path.display()))
        })?;
        Self::from_toml(&raw)
            .map_err(|e| RenderError::Config(format!("Invalid config {}: {e}", path.display())))
    }

    pub fn from_toml(raw: &str) -> std::result::Result<Config, toml::de::Error> {
        toml::from_str(raw)
    }

    pub fn validate(&self) -> Result<()> {
        let t = &self.timeouts;
        for (name, value) in [
            ("navigation", t.navigation),
            ("settle", t.settle),
            ("export", t.export),
            ("image", t.image),
            ("close", t.close),
            ("poll_interval", t.poll_interval),
        ] {
            if value.is_zero() {
                return Err(RenderError::Config(format!(
                    "timeouts.{name} must be greater than zero"
                )));
            }
        }
        self.editor.target()?.to_url()?;
        if self.editor.interaction.definition_input_selector.trim().is_empty() {
            return Err(RenderError::Config(
                "editor.interaction.definition_input_selector must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
