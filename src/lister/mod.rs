//! Sources of raw package listings.
//!
//! The [`PackageLister`] trait is the seam between the list sanitizer and the
//! external package manager. [`PipLister`] runs the real `pip list`; tests
//! substitute canned output.

mod pip;

pub use pip::PipLister;

use crate::error::ListError;
use crate::exit_codes;
use async_trait::async_trait;

/// Output format requested from the package manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListMode {
    /// Structured output (`--format=json`)
    Json,
    /// The package manager's default columnar text
    Text,
}

impl ListMode {
    /// Arguments passed to the interpreter for this mode.
    pub fn args(&self) -> &'static [&'static str] {
        match self {
            ListMode::Json => &["-m", "pip", "list", "--format=json"],
            ListMode::Text => &["-m", "pip", "list"],
        }
    }
}

/// Captured result of one listing invocation.
///
/// Streams are kept as raw bytes so they can be relayed exactly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code, or `None` if the process was killed by a signal.
    pub code: Option<i32>,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// Exit code to relay to our own caller.
    ///
    /// Signals and codes that do not fit a process exit status become
    /// [`exit_codes::ERROR`].
    pub fn exit_code(&self) -> u8 {
        self.code
            .and_then(|code| u8::try_from(code).ok())
            .unwrap_or(exit_codes::ERROR)
    }
}

impl From<std::process::Output> for CommandOutput {
    fn from(output: std::process::Output) -> Self {
        Self {
            code: output.status.code(),
            stdout: output.stdout,
            stderr: output.stderr,
        }
    }
}

/// Something that can produce a package listing.
///
/// # Example
///
/// ```no_run
/// use pipfix::lister::{ListMode, PackageLister, PipLister};
///
/// #[tokio::main]
/// async fn main() -> anyhow::Result<()> {
///     let lister = PipLister::new("python3");
///     let output = lister.list(ListMode::Json).await?;
///     if output.success() {
///         println!("{}", String::from_utf8_lossy(&output.stdout));
///     }
///     Ok(())
/// }
/// ```
#[async_trait]
pub trait PackageLister: Send + Sync {
    /// Returns a human-readable name for logs.
    fn name(&self) -> &'static str;

    /// Runs the listing once in the given mode.
    ///
    /// A non-zero exit is not an error here; it is reported through
    /// [`CommandOutput::code`].
    ///
    /// # Errors
    ///
    /// Returns an error if the command cannot be started at all.
    async fn list(&self, mode: ListMode) -> Result<CommandOutput, ListError>;
}
