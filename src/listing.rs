//! Sanitized `pip list` output.
//!
//! [`run_listing`] asks a [`PackageLister`] for JSON, rewrites vendor-suffixed
//! versions and re-serializes the list. When the structured listing is not
//! available it relays whatever the package manager produced instead.
//!
//! ```text
//! json list ──ok──> parse ──ok──> sanitize each ──> Sanitized (exit 0)
//!     │               ├──err──> Relayed raw stdout (exit 0)
//!     │               └──scalar──> error (exit 1)
//!     └──fail──> text list ──ok──> Relayed stdout (exit 0)
//!                    └──fail──> Failed, stderr relayed (child's exit code)
//! ```

use std::io::Write;
use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::ListError;
use crate::exit_codes;
use crate::lister::{ListMode, PackageLister};
use crate::model::PackageRecord;
use crate::version::VendorMarkers;

/// Any character pip's own version grammar would not produce.
static NONSTANDARD_CHAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^0-9a-zA-Z._+-]").expect("nonstandard char pattern"));

/// Three-component release at the start of the version.
static RELEASE_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+\.\d+\.\d+)").expect("release prefix pattern"));

/// Rewrites version fields of package records.
///
/// Unlike [`SanitizingParser`](crate::version::SanitizingParser) there is no
/// numeric fallback: a version without a `major.minor.patch` prefix is left
/// as it is.
#[derive(Debug, Clone, Default)]
pub struct ListSanitizer {
    markers: VendorMarkers,
}

impl ListSanitizer {
    pub fn new(markers: VendorMarkers) -> Self {
        Self { markers }
    }

    /// Returns true if `version` carries nonstandard characters or a vendor
    /// marker.
    pub fn needs_sanitizing(&self, version: &str) -> bool {
        NONSTANDARD_CHAR.is_match(version) || self.markers.matches(version)
    }

    /// Returns the leading `major.minor.patch`, or `version` unchanged.
    pub fn sanitize_version<'a>(&self, version: &'a str) -> &'a str {
        RELEASE_PREFIX.find(version).map_or(version, |m| m.as_str())
    }

    /// Sanitizes the version of a single record in place.
    ///
    /// Returns true if the version was changed.
    pub fn sanitize_record(&self, record: &mut PackageRecord) -> bool {
        let Some(version) = record.version.as_deref() else {
            return false;
        };
        if !self.needs_sanitizing(version) {
            return false;
        }

        let sanitized = self.sanitize_version(version);
        if sanitized == version {
            return false;
        }

        info!(package = %record.name, from = version, to = sanitized, "sanitized version");
        record.version = Some(sanitized.to_string());
        true
    }

    /// Decodes and sanitizes every entry of a listing.
    ///
    /// Entries that are not well-formed package records are dropped.
    pub fn sanitize_records(&self, values: Vec<Value>) -> Vec<PackageRecord> {
        values
            .into_iter()
            .enumerate()
            .filter_map(|(index, value)| match serde_json::from_value::<PackageRecord>(value) {
                Ok(mut record) => {
                    self.sanitize_record(&mut record);
                    Some(record)
                }
                Err(err) => {
                    debug!(index, error = %err, "dropping malformed package record");
                    None
                }
            })
            .collect()
    }
}

/// Final state of a listing run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListOutcome {
    /// Sanitized JSON, indented by two spaces.
    Sanitized { json: String },
    /// Raw package manager stdout, passed through byte for byte.
    Relayed { stdout: Vec<u8>, code: u8 },
    /// Both listing attempts failed; the last stderr is passed through.
    Failed { stderr: Vec<u8>, code: u8 },
}

impl ListOutcome {
    pub fn exit_code(&self) -> u8 {
        match self {
            ListOutcome::Sanitized { .. } => exit_codes::SUCCESS,
            ListOutcome::Relayed { code, .. } | ListOutcome::Failed { code, .. } => *code,
        }
    }

    /// Writes the outcome to the given streams and returns the exit code.
    pub fn emit(&self, out: &mut impl Write, err: &mut impl Write) -> Result<u8, ListError> {
        match self {
            ListOutcome::Sanitized { json } => writeln!(out, "{json}")?,
            ListOutcome::Relayed { stdout, .. } => out.write_all(stdout)?,
            ListOutcome::Failed { stderr, .. } => err.write_all(stderr)?,
        }
        out.flush()?;
        err.flush()?;
        Ok(self.exit_code())
    }
}

/// Splits a decoded listing into candidate records.
///
/// An object yields its keys and a string yields its characters. Neither is
/// a record, so both end up dropped and the listing comes out empty. Other
/// scalars cannot be walked at all.
fn listing_entries(payload: Value) -> Result<Vec<Value>, ListError> {
    match payload {
        Value::Array(values) => Ok(values),
        Value::Object(map) => Ok(map.into_iter().map(|(key, _)| Value::String(key)).collect()),
        Value::String(text) => Ok(text.chars().map(|c| Value::String(c.to_string())).collect()),
        Value::Number(_) => Err(ListError::NotAList("number")),
        Value::Bool(_) => Err(ListError::NotAList("boolean")),
        Value::Null => Err(ListError::NotAList("null")),
    }
}

/// Runs the listing and produces the sanitized (or relayed) result.
///
/// # Errors
///
/// Returns an error if the lister cannot run at all, the listing decodes to
/// a number, boolean or `null`, or the sanitized list cannot be serialized.
/// Non-zero exits and undecodable output are not errors; they are reflected
/// in the returned [`ListOutcome`].
pub async fn run_listing(
    lister: &dyn PackageLister,
    sanitizer: &ListSanitizer,
) -> Result<ListOutcome, ListError> {
    let output = lister.list(ListMode::Json).await?;

    if !output.success() {
        warn!(
            lister = lister.name(),
            code = ?output.code,
            "structured listing failed, retrying in text mode"
        );
        let fallback = lister.list(ListMode::Text).await?;
        if fallback.success() {
            return Ok(ListOutcome::Relayed {
                stdout: fallback.stdout,
                code: exit_codes::SUCCESS,
            });
        }
        return Ok(ListOutcome::Failed {
            code: fallback.exit_code(),
            stderr: fallback.stderr,
        });
    }

    let payload: Value = match serde_json::from_slice(&output.stdout) {
        Ok(payload) => payload,
        Err(err) => {
            warn!(error = %err, "listing is not valid JSON, relaying raw output");
            return Ok(ListOutcome::Relayed {
                stdout: output.stdout,
                code: exit_codes::SUCCESS,
            });
        }
    };

    let values = listing_entries(payload)?;
    let total = values.len();
    let records = sanitizer.sanitize_records(values);
    debug!(total, kept = records.len(), "sanitized package listing");

    let json = serde_json::to_string_pretty(&records)?;
    Ok(ListOutcome::Sanitized { json })
}
