use thiserror::Error;

use crate::version::Pep440Error;

#[derive(Debug, Error)]
pub enum PatchError {
    #[error("self-check failed: {probe:?} parsed as {actual:?}, expected {expected:?}")]
    SelfCheck {
        probe: &'static str,
        expected: &'static str,
        actual: String,
    },

    #[error("could not parse version {version:?}: {source}")]
    Parse {
        version: String,
        #[source]
        source: Pep440Error,
    },
}

#[derive(Debug, Error)]
pub enum ListError {
    #[error("failed to execute {program}. Is Python installed? ({source})")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("package listing is a JSON {0}, not a list")]
    NotAList(&'static str),

    #[error("failed to serialize package list: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to write output: {0}")]
    Io(#[from] std::io::Error),
}
