use std::path::Path;
use std::time::Duration;

use xrender_lib::{Config, RenderError};

use crate::cli::Cli;

/// Tracks which CLI flags were explicitly provided vs. defaulted.
#[derive(Debug, Default)]
pub struct FlagSources {
    pub format: bool,
    pub nav_timeout: bool,
    pub export_timeout: bool,
    pub deadline: bool,
}

impl FlagSources {
    pub fn from_args(args: &[String]) -> Self {
        Self {
            format: flag_present(args, "--format"),
            nav_timeout: flag_present(args, "--nav-timeout"),
            export_timeout: flag_present(args, "--export-timeout"),
            deadline: flag_present(args, "--deadline"),
        }
    }
}

/// Checks if a flag was present in the command-line arguments.
pub fn flag_present(args: &[String], flag: &str) -> bool {
    args.iter()
        .any(|arg| arg == flag || arg.starts_with(&format!("{flag}=")))
}

/// Merge CLI arguments into the loaded config, preferring CLI when flags are present.
pub fn apply_cli_overrides(mut config: Config, cli: &Cli, flags: &FlagSources) -> Config {
    if flags.format {
        config.format = cli.format.into();
    }
    if flags.nav_timeout {
        config.timeouts.navigation = Duration::from_secs(cli.nav_timeout);
    }
    if flags.export_timeout {
        config.timeouts.export = Duration::from_secs(cli.export_timeout);
    }
    if flags.deadline {
        config.timeouts.overall = Some(Duration::from_secs(cli.deadline));
    }
    if let Some(url) = &cli.editor_url {
        config.editor.url = Some(url.clone());
        config.editor.local_asset = None;
    }
    if let Some(asset) = &cli.editor_asset {
        config.editor.local_asset = Some(asset.clone());
        config.editor.url = None;
    }
    if let Some(path) = &cli.chromium_path {
        config.browser.executable = Some(path.clone());
    }
    config
}

/// Load config from a TOML file, central config, or return defaults.
/// Priority: explicit path > ~/.config/xrender/config.toml > defaults
pub fn load_config(path: Option<&Path>) -> Result<Config, RenderError> {
    Config::load(path)
}

/// Validates the merged config, naming its source on failure.
pub fn validate_config(config: &Config, path: Option<&Path>) -> Result<(), RenderError> {
    config.validate().map_err(|e| {
        let detail = match e {
            RenderError::Config(msg) => msg,
            other => other.to_string(),
        };
        let prefix = path
            .map(|p| format!("Invalid config ({}): {}", p.display(), detail))
            .unwrap_or_else(|| format!("Invalid config: {}", detail));
        RenderError::Config(prefix)
    })
}

/// Format effective config as a single-line string.
pub fn format_effective_config(config: &Config, config_source: Option<&Path>) -> String {
    let source = config_source
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "defaults".to_string());
    let editor = config
        .editor
        .target()
        .map(|target| match target.to_url() {
            Ok(url) => url.to_string(),
            Err(_) => format!("{target:?}"),
        })
        .unwrap_or_else(|e| e.to_string());
    let overall = config
        .timeouts
        .overall_deadline()
        .map(|d| format!("{}s", d.as_secs()))
        .unwrap_or_else(|| "off".to_string());
    let executable = config
        .browser
        .executable
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "auto".to_string());
    format!(
        "Effective config [{source}]: format={}, editor={}, browser={}, window={}, timeouts: nav={}s, settle={}s, export={}s, image={}s, deadline={}",
        config.format,
        editor,
        executable,
        config.browser.window,
        config.timeouts.navigation.as_secs(),
        config.timeouts.settle.as_secs(),
        config.timeouts.export.as_secs(),
        config.timeouts.image.as_secs(),
        overall,
    )
}
