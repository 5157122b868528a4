//! Application layer containing the library workflows.
//!
//! [`Library`] is the entry point. Its operations are split by concern:
//! catalog entry and search, borrowing and returning, late-fee payments, and
//! patron reporting. Payment operations take the gateway as an argument so
//! callers can route each request to the processor of their choice.

pub mod catalog;
pub mod circulation;
#[cfg(test)]
mod fixtures;
pub mod library;
pub mod payments;
pub mod reports;

pub use library::Library;
