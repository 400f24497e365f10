mod cli;
mod formatting;
mod settings;

use std::io::Read;
use std::path::Path;
use std::process::ExitCode;

use xrender_lib::{
    BrowserSession, ChromiumLauncher, ChromiumSession, Config, DiagramDefinition, Narrator,
    Pipeline, PipelineOptions, RenderError, Result, Verbosity,
};

use cli::Cli;
use formatting::{render_error, write_image};
use settings::{apply_cli_overrides, format_effective_config, load_config, validate_config, FlagSources};

#[tokio::main]
async fn main() -> ExitCode {
    run().await
}

async fn run() -> ExitCode {
    let raw_args: Vec<String> = std::env::args().collect();
    let args = cli::parse();
    init_logging(&args);

    let config = match resolve_config(&args, &raw_args) {
        Ok(config) => config,
        Err(err) => return render_error(&err),
    };
    if args.verbose {
        eprintln!("{}", format_effective_config(&config, args.config.as_deref()));
    }

    // Input problems are reported before any browser is started.
    let definition = match read_definition(args.input.as_deref()) {
        Ok(definition) => definition,
        Err(err) => return render_error(&err),
    };
    let options = match PipelineOptions::from_config(&config, args.debug) {
        Ok(options) => options,
        Err(err) => return render_error(&err),
    };

    let narrator = Narrator::stderr(Verbosity::from_flags(args.verbose, args.quiet));
    let launcher = ChromiumLauncher::new(config.timeouts.poll_interval);
    let pipeline = Pipeline::new(launcher, options, narrator);
    let run = pipeline.run(&definition).await;
    log::debug!("pipeline states: {:?}", run.trace.states());

    let code = match run.result {
        Ok(image) => match write_image(&image, args.output.as_deref()) {
            Ok(()) => {
                log::info!("wrote {} bytes of {}", image.len(), image.mime_type);
                ExitCode::SUCCESS
            }
            Err(err) => render_error(&err),
        },
        Err(err) => render_error(&err),
    };

    if let Some(session) = run.lingering {
        wait_for_browser_exit(session).await;
    }
    code
}

fn init_logging(args: &Cli) {
    let default_filter = if args.quiet {
        "error"
    } else if args.verbose {
        "info"
    } else {
        "warn"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .target(env_logger::Target::Stderr)
        .init();
}

fn resolve_config(args: &Cli, raw_args: &[String]) -> Result<Config> {
    let loaded = load_config(args.config.as_deref())?;
    let config = apply_cli_overrides(loaded, args, &FlagSources::from_args(raw_args));
    validate_config(&config, args.config.as_deref())?;
    Ok(config)
}

fn read_definition(input: Option<&Path>) -> Result<DiagramDefinition> {
    let raw = match input {
        Some(path) => std::fs::read_to_string(path).map_err(|e| {
            RenderError::Input(format!("Failed to read {}: {e}", path.display()))
        })?,
        None => {
            let mut raw = String::new();
            std::io::stdin()
                .read_to_string(&mut raw)
                .map_err(|e| RenderError::Input(format!("Failed to read stdin: {e}")))?;
            raw
        }
    };
    DiagramDefinition::new(raw)
}

async fn wait_for_browser_exit(mut session: ChromiumSession) {
    if let Err(err) = session.wait_closed().await {
        log::warn!("browser exited abnormally: {err}");
    }
}
