use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use xrender_lib::ExportFormat;

#[derive(Parser, Debug)]
#[command(name = "xrender")]
#[command(
    version,
    about = "Render a Structurizr Express diagram definition to an image",
    long_about = "xrender\n\nReads a diagram definition (YAML) on stdin, loads it into the Structurizr Express editor in a headless Chromium, and writes the exported image to stdout.\n\nExit status: 0 on success, 1 when the editor rejects the definition, 2 for any other failure."
)]
pub struct Cli {
    #[arg(long, help = "Print each step instead of progress dots")]
    pub verbose: bool,

    #[arg(long, help = "Print nothing but errors")]
    pub quiet: bool,

    #[arg(
        long,
        help = "Show the browser window and leave it open after the run (the process waits until the browser quits)"
    )]
    pub debug: bool,

    #[arg(
        long,
        value_name = "PATH",
        help = "Optional config file (TOML) for timeouts, editor and browser settings; CLI flags override config"
    )]
    pub config: Option<PathBuf>,

    #[arg(long, value_enum, default_value = "png", help = "Export format")]
    pub format: FormatArg,

    #[arg(
        long,
        value_name = "PATH",
        help = "Read the definition from a file instead of stdin"
    )]
    pub input: Option<PathBuf>,

    #[arg(
        long,
        value_name = "PATH",
        help = "Write the image to a file instead of stdout"
    )]
    pub output: Option<PathBuf>,

    #[arg(
        long,
        value_name = "URL",
        conflicts_with = "editor_asset",
        help = "Editor URL (default: https://structurizr.com/express?autoLayout=false)"
    )]
    pub editor_url: Option<String>,

    #[arg(
        long,
        value_name = "PATH",
        help = "Local static copy of the editor to load instead of the hosted one"
    )]
    pub editor_asset: Option<PathBuf>,

    #[arg(
        long,
        value_name = "PATH",
        help = "Chromium/Chrome executable (default: first installed of the usual locations)"
    )]
    pub chromium_path: Option<PathBuf>,

    #[arg(
        long,
        value_name = "SECONDS",
        default_value = "30",
        help = "Navigation timeout in seconds (editor load until the diagram surface exists)"
    )]
    pub nav_timeout: u64,

    #[arg(
        long,
        value_name = "SECONDS",
        default_value = "20",
        help = "Export timeout in seconds (export call until the exported page exists)"
    )]
    pub export_timeout: u64,

    #[arg(
        long,
        value_name = "SECONDS",
        default_value = "120",
        help = "Overall deadline for the run in seconds (0 disables it)"
    )]
    pub deadline: u64,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    Png,
    Pdf,
}

impl From<FormatArg> for ExportFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Png => ExportFormat::Png,
            FormatArg::Pdf => ExportFormat::Pdf,
        }
    }
}

pub fn parse() -> Cli {
    Cli::parse()
}

#[cfg(test)]
mod tests {
    use super::{Cli, FormatArg};
    use clap::Parser;
    use std::path::PathBuf;

    #[test]
    fn defaults_read_stdin_and_write_png_to_stdout() {
        let cli = Cli::parse_from(["xrender"]);

        assert!(!cli.verbose);
        assert!(!cli.quiet);
        assert!(!cli.debug);
        assert!(cli.config.is_none());
        assert!(cli.input.is_none());
        assert!(cli.output.is_none());
        assert_eq!(cli.format, FormatArg::Png);
        assert_eq!(cli.nav_timeout, 30);
        assert_eq!(cli.export_timeout, 20);
        assert_eq!(cli.deadline, 120);
    }

    #[test]
    fn accepts_all_overrides() {
        let cli = Cli::parse_from([
            "xrender",
            "--verbose",
            "--debug",
            "--format",
            "pdf",
            "--input",
            "diagram.yaml",
            "--output",
            "diagram.pdf",
            "--editor-url",
            "http://localhost:8080/express",
            "--chromium-path",
            "/opt/chromium/chrome",
            "--nav-timeout",
            "5",
            "--export-timeout",
            "7",
            "--deadline",
            "0",
        ]);

        assert!(cli.verbose);
        assert!(cli.debug);
        assert_eq!(cli.format, FormatArg::Pdf);
        assert_eq!(cli.input, Some(PathBuf::from("diagram.yaml")));
        assert_eq!(cli.output, Some(PathBuf::from("diagram.pdf")));
        assert_eq!(
            cli.editor_url.as_deref(),
            Some("http://localhost:8080/express")
        );
        assert_eq!(cli.chromium_path, Some(PathBuf::from("/opt/chromium/chrome")));
        assert_eq!(cli.nav_timeout, 5);
        assert_eq!(cli.export_timeout, 7);
        assert_eq!(cli.deadline, 0);
    }

    #[test]
    fn editor_url_and_asset_conflict() {
        let result = Cli::try_parse_from([
            "xrender",
            "--editor-url",
            "https://example.com",
            "--editor-asset",
            "express.html",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn rejects_unknown_format() {
        assert!(Cli::try_parse_from(["xrender", "--format", "svg"]).is_err());
    }
}
