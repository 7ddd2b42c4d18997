pub mod config;
pub mod error;
pub mod exit_codes;
pub mod lister;
pub mod listing;
pub mod logging;
pub mod model;
pub mod version;

pub use config::Config;
pub use error::{ListError, PatchError};
pub use lister::{CommandOutput, ListMode, PackageLister, PipLister};
pub use listing::{run_listing, ListOutcome, ListSanitizer};
pub use model::PackageRecord;
pub use version::{install, Pep440Parser, SanitizingParser, VendorMarkers, VersionParser};
