//! Browser session management.
//!
//! The pipeline only talks to the traits in [`driver`]; the Chromium
//! implementation lives in [`chromium`]. Everything evaluated inside a page
//! is a [`Script`]: source text plus JSON-encoded arguments.
//!
//! # Module Structure
//!
//! - [`driver`] - launcher, session and page traits
//! - [`chromium`] - chromiumoxide-backed implementation
//! - [`launch`] - fixed launch flags and executable discovery
//! - [`predicate`] / [`wait`] - readiness predicates and bounded polling
//! - [`scripts`] - the editor-driving page scripts

pub mod chromium;
pub mod driver;
pub mod launch;
pub mod predicate;
mod script;
pub mod scripts;
pub mod wait;

pub use chromium::{ChromiumLauncher, ChromiumPage, ChromiumSession};
pub use driver::{BrowserLauncher, BrowserSession, EditorPage};
pub use launch::{
    default_candidates, Executable, LaunchOptions, DEFAULT_EXECUTABLE_CANDIDATES, LAUNCH_ARGS,
};
pub use predicate::ReadinessPredicate;
pub use script::Script;
pub use wait::{wait_until, WaitTimedOut, DEFAULT_POLL_INTERVAL};
