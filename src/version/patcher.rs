use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use super::{Pep440Parser, VendorMarkers, VersionParser};
use crate::error::PatchError;

/// Version used when a string has no numeric prefix at all.
pub const FALLBACK_VERSION: &str = "0.0.0";

/// Vendor-suffixed version that a freshly installed parser must accept.
pub const SELF_CHECK_PROBE: &str = "2.4.0-ubuntu4-zorin1";

const SELF_CHECK_EXPECTED: &str = "2.4.0";

/// `major.minor.patch` at the start of a vendor-suffixed string.
static RELEASE_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+\.\d+\.\d+)").expect("release prefix pattern"));

/// Longest leading run of dot-separated digits.
static NUMERIC_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+(?:\.\d+)*)").expect("numeric prefix pattern"));

/// Wraps a strict [`VersionParser`] and retries with progressively shorter
/// candidates when the strict parser rejects the input.
///
/// Parsing goes through three tiers:
///
/// 1. A string containing a vendor marker is cut down to its leading
///    `major.minor.patch`, if it has one.
/// 2. If the strict parser still rejects it, the longest leading run of
///    dot-separated digits is tried.
/// 3. With no numeric prefix at all, [`FALLBACK_VERSION`] is parsed instead.
#[derive(Debug, Clone)]
pub struct SanitizingParser<P> {
    inner: P,
    markers: VendorMarkers,
}

impl<P: VersionParser> SanitizingParser<P> {
    pub fn new(inner: P, markers: VendorMarkers) -> Self {
        Self { inner, markers }
    }

    pub fn markers(&self) -> &VendorMarkers {
        &self.markers
    }

    pub fn inner(&self) -> &P {
        &self.inner
    }

    fn strip_vendor_suffix<'a>(&self, raw: &'a str) -> &'a str {
        if !self.markers.matches(raw) {
            return raw;
        }
        RELEASE_PREFIX.find(raw).map_or(raw, |m| m.as_str())
    }
}

impl<P: VersionParser> VersionParser for SanitizingParser<P> {
    type Version = P::Version;
    type Error = P::Error;

    fn parse(&self, raw: &str) -> Result<P::Version, P::Error> {
        let candidate = self.strip_vendor_suffix(raw);
        if candidate != raw {
            debug!(raw, candidate, "stripped vendor suffix");
        }

        match self.inner.parse(candidate) {
            Ok(version) => Ok(version),
            Err(err) => {
                debug!(candidate, error = %err, "strict parse failed, trying numeric prefix");
                match NUMERIC_PREFIX.find(candidate) {
                    Some(prefix) => self.inner.parse(prefix.as_str()),
                    None => self.inner.parse(FALLBACK_VERSION),
                }
            }
        }
    }
}

impl SanitizingParser<Pep440Parser> {
    /// Parses `raw` and renders the result in normalized PEP 440 form.
    pub fn normalize(&self, raw: &str) -> Result<String, PatchError> {
        self.parse(raw)
            .map(|version| version.to_string())
            .map_err(|source| PatchError::Parse {
                version: raw.to_string(),
                source,
            })
    }
}

/// Builds the sanitizing PEP 440 parser and verifies it against
/// [`SELF_CHECK_PROBE`].
///
/// # Errors
///
/// Returns an error if the probe does not come out as `2.4.0`.
pub fn install(markers: VendorMarkers) -> Result<SanitizingParser<Pep440Parser>, PatchError> {
    let parser = SanitizingParser::new(Pep440Parser, markers);

    let actual = parser.normalize(SELF_CHECK_PROBE)?;
    if actual != SELF_CHECK_EXPECTED {
        return Err(PatchError::SelfCheck {
            probe: SELF_CHECK_PROBE,
            expected: SELF_CHECK_EXPECTED,
            actual,
        });
    }

    debug!(markers = %parser.markers(), "sanitizing version parser installed");
    Ok(parser)
}
