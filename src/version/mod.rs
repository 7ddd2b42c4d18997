//! Version parsing with vendor-suffix sanitization.
//!
//! Strict parsers implement [`VersionParser`]. [`SanitizingParser`] wraps any
//! of them and strips distribution suffixes such as `-ubuntu4-zorin1` before
//! handing the string to the strict parser. Callers that need lenient parsing
//! take the sanitizing parser as a dependency; nothing is patched globally.
//!
//! # Example
//!
//! ```
//! use pipfix::version::{install, VendorMarkers, VersionParser};
//!
//! let parser = install(VendorMarkers::default()).unwrap();
//! let version = parser.parse("2.4.0-ubuntu4-zorin1").unwrap();
//! assert_eq!(version.to_string(), "2.4.0");
//! ```

mod patcher;
mod pep440;

pub use patcher::{install, SanitizingParser, FALLBACK_VERSION, SELF_CHECK_PROBE};
pub use pep440::{Pep440Error, Pep440Parser};

/// A parser that turns a version string into a typed version.
pub trait VersionParser {
    type Version;
    type Error: std::error::Error;

    /// Parses `raw`, failing if it is not a valid version for this parser.
    fn parse(&self, raw: &str) -> Result<Self::Version, Self::Error>;
}

/// Case-insensitive substrings that identify a vendor-suffixed version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VendorMarkers(Vec<String>);

impl VendorMarkers {
    /// Builds a marker set. Markers are lowercased and empty entries dropped.
    pub fn new<I, S>(markers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self(
            markers
                .into_iter()
                .map(|m| m.as_ref().trim().to_lowercase())
                .filter(|m| !m.is_empty())
                .collect(),
        )
    }

    /// Returns true if `version` contains any marker, ignoring case.
    pub fn matches(&self, version: &str) -> bool {
        let lower = version.to_lowercase();
        self.0.iter().any(|marker| lower.contains(marker.as_str()))
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

impl Default for VendorMarkers {
    fn default() -> Self {
        Self::new(["ubuntu", "zorin"])
    }
}

impl std::fmt::Display for VendorMarkers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.join(", "))
    }
}
