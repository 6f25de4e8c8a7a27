//! Bill records: identifier codec, date-range filter, and record types.
//!
//! This module handles:
//! - Converting UUID text to and from the 16-byte stored form
//! - Turning `start` / `end` query parameters into a half-open interval
//! - Bill request and response shapes

pub mod codec;
pub mod range;
pub mod types;

pub use range::{parse_range, DateRange};
pub use types::{to_stored_precision, Bill, BillId, BillUpdate, NewBill};
