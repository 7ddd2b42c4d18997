use crate::error::ListError;
use async_trait::async_trait;
use std::process::Command;
use tracing::debug;

use super::{CommandOutput, ListMode, PackageLister};

/// Runs `<python> -m pip list` and captures its output.
pub struct PipLister {
    python: String,
}

impl PipLister {
    pub fn new(python: impl Into<String>) -> Self {
        Self {
            python: python.into(),
        }
    }

    pub fn python(&self) -> &str {
        &self.python
    }
}

#[async_trait]
impl PackageLister for PipLister {
    fn name(&self) -> &'static str {
        "pip list"
    }

    async fn list(&self, mode: ListMode) -> Result<CommandOutput, ListError> {
        debug!(python = %self.python, args = ?mode.args(), "running package listing");

        let output = Command::new(&self.python)
            .args(mode.args())
            .output()
            .map_err(|source| ListError::Spawn {
                program: self.python.clone(),
                source,
            })?;

        let output = CommandOutput::from(output);
        debug!(code = ?output.code, bytes = output.stdout.len(), "package listing finished");
        Ok(output)
    }
}
