use std::str::FromStr;

use pep508_rs::pep440_rs::Version;

use super::VersionParser;

/// Error returned when a string is not a valid PEP 440 version.
pub type Pep440Error = <Version as FromStr>::Err;

/// Strict PEP 440 parsing, the same rules pip applies to installed versions.
#[derive(Debug, Clone, Copy, Default)]
pub struct Pep440Parser;

impl VersionParser for Pep440Parser {
    type Version = Version;
    type Error = Pep440Error;

    fn parse(&self, raw: &str) -> Result<Version, Pep440Error> {
        Version::from_str(raw)
    }
}
