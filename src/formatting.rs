use std::fmt::Write as FmtWrite;
use std::io::{self, IsTerminal, Write};
use std::path::Path;
use std::process::ExitCode;

use xrender_lib::{ExportedImage, RenderError};

/// Write the exported bytes to `output`, or stdout when absent.
pub fn write_image(image: &ExportedImage, output: Option<&Path>) -> Result<(), RenderError> {
    match output {
        Some(path) => std::fs::write(path, &image.bytes)
            .map_err(|e| RenderError::output(path.display().to_string(), e)),
        None => write_bytes(&mut io::stdout().lock(), &image.bytes)
            .map_err(|e| RenderError::output("stdout", e)),
    }
}

fn write_bytes(out: &mut impl Write, bytes: &[u8]) -> io::Result<()> {
    out.write_all(bytes)?;
    out.flush()
}

/// Render an error on stderr and return the appropriate exit code.
///
/// The human-readable report comes first, followed by exactly one line of
/// JSON so scripts can pick up the last line of stderr.
pub fn render_error(err: &RenderError) -> ExitCode {
    let colorize = io::stderr().is_terminal();
    let human = format_human(err, colorize);
    let payload = serde_json::to_string(&err.to_payload())
        .unwrap_or_else(|_| "{\"kind\":\"InfrastructureError\"}".into());

    let mut stderr = io::stderr().lock();
    let _ = writeln!(stderr, "{human}");
    let _ = writeln!(stderr, "{payload}");

    exit_code_for(err)
}

/// Validation failures exit 1; every other failure exits 2.
pub fn exit_code_for(err: &RenderError) -> ExitCode {
    if err.is_reportable() {
        ExitCode::from(1)
    } else {
        ExitCode::from(2)
    }
}

/// Format an error for human consumption in a terminal.
pub fn format_human(err: &RenderError, colorize: bool) -> String {
    let payload = err.to_payload();
    let mut out = String::new();
    let heading = if err.is_reportable() {
        color("Diagram definition rejected", "33", colorize)
    } else {
        color("Render failed", "31", colorize)
    };
    let _ = writeln!(out, "{heading} ({:?})", payload.kind);
    let _ = writeln!(out, "  {}", payload.message);
    if !payload.errors.is_empty() {
        let _ = writeln!(out, "Errors:");
        for error in &payload.errors {
            let _ = writeln!(out, "  - {error}");
        }
    }
    if let Some(hint) = &payload.remediation {
        let _ = write!(out, "Hint: {hint}");
    }
    out.trim_end().to_string()
}

/// Apply ANSI color codes when enabled.
fn color(text: &str, code: &str, colorize: bool) -> String {
    if colorize {
        format!("\x1b[{}m{}\x1b[0m", code, text)
    } else {
        text.to_string()
    }
}
