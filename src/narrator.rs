//! Step narration on stderr.
//!
//! stdout carries the rendered image, so every human-facing message goes
//! through a [`Narrator`] built once from the command-line flags and handed
//! to the pipeline and each of its stages.

use std::io::Write;
use std::sync::Arc;

/// Receives already-formatted narration fragments.
pub type ProgressCallback = Arc<dyn Fn(&str) + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// Nothing is narrated.
    Quiet,
    /// One dot per step, newline when finished.
    #[default]
    Normal,
    /// One line per step.
    Verbose,
}

impl Verbosity {
    /// `--quiet` wins over `--verbose` when both are given.
    pub fn from_flags(verbose: bool, quiet: bool) -> Self {
        if quiet {
            Verbosity::Quiet
        } else if verbose {
            Verbosity::Verbose
        } else {
            Verbosity::Normal
        }
    }
}

#[derive(Clone)]
pub struct Narrator {
    verbosity: Verbosity,
    sink: ProgressCallback,
}

impl std::fmt::Debug for Narrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Narrator")
            .field("verbosity", &self.verbosity)
            .finish_non_exhaustive()
    }
}

impl Narrator {
    pub fn new(verbosity: Verbosity, sink: ProgressCallback) -> Self {
        Self { verbosity, sink }
    }

    pub fn stderr(verbosity: Verbosity) -> Self {
        Self::new(
            verbosity,
            Arc::new(|fragment: &str| {
                let mut err = std::io::stderr().lock();
                let _ = err.write_all(fragment.as_bytes());
                let _ = err.flush();
            }),
        )
    }

    pub fn silent() -> Self {
        Self::new(Verbosity::Quiet, Arc::new(|_: &str| {}))
    }

    pub fn verbosity(&self) -> Verbosity {
        self.verbosity
    }

    pub fn step(&self, step: &str) {
        log::debug!("step: {step}");
        match self.verbosity {
            Verbosity::Quiet => {}
            Verbosity::Normal => (self.sink)("."),
            Verbosity::Verbose => (self.sink)(&format!("{step}...\n")),
        }
    }

    /// Full-line message shown in every mode except quiet.
    pub fn notice(&self, message: &str) {
        log::info!("{message}");
        match self.verbosity {
            Verbosity::Quiet => {}
            Verbosity::Normal => (self.sink)(&format!("\n{message}\n")),
            Verbosity::Verbose => (self.sink)(&format!("{message}\n")),
        }
    }

    /// Terminates the dot line in normal mode.
    pub fn finish(&self) {
        if self.verbosity == Verbosity::Normal {
            (self.sink)("\n");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    fn capture(verbosity: Verbosity) -> (Narrator, Arc<Mutex<String>>) {
        let buf = Arc::new(Mutex::new(String::new()));
        let sink_buf = buf.clone();
        let narrator = Narrator::new(
            verbosity,
            Arc::new(move |fragment: &str| sink_buf.lock().unwrap().push_str(fragment)),
        );
        (narrator, buf)
    }

    #[test]
    fn normal_mode_prints_dots() {
        let (narrator, buf) = capture(Verbosity::Normal);
        narrator.step("launching browser");
        narrator.step("loading editor");
        narrator.finish();
        assert_eq!(buf.lock().unwrap().as_str(), "..\n");
    }

    #[test]
    fn verbose_mode_prints_each_step() {
        let (narrator, buf) = capture(Verbosity::Verbose);
        narrator.step("launching browser");
        narrator.finish();
        assert_eq!(buf.lock().unwrap().as_str(), "launching browser...\n");
    }

    #[test]
    fn quiet_mode_prints_nothing() {
        let (narrator, buf) = capture(Verbosity::Quiet);
        narrator.step("launching browser");
        narrator.notice("DEBUG MODE");
        narrator.finish();
        assert!(buf.lock().unwrap().is_empty());
    }

    #[test]
    fn quiet_flag_overrides_verbose() {
        assert_eq!(Verbosity::from_flags(true, true), Verbosity::Quiet);
        assert_eq!(Verbosity::from_flags(true, false), Verbosity::Verbose);
        assert_eq!(Verbosity::from_flags(false, false), Verbosity::Normal);
    }
}
