//! Core data types for package listings.
//!
//! - [`PackageRecord`] - One package entry as reported by `pip list`
//!
//! # Example
//!
//! ```
//! use pipfix::PackageRecord;
//!
//! let record = PackageRecord::new("python-apt", "2.4.0-ubuntu4-zorin1");
//! assert_eq!(record.name, "python-apt");
//! ```

mod package;

pub use package::*;
