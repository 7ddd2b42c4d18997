//! Process exit codes.
//!
//! Child exit codes relayed from `pip list` pass through unchanged; these
//! are the codes pipfix produces itself.

pub const SUCCESS: u8 = 0;
pub const ERROR: u8 = 1;
