//! Foundation types for Pit.
//!
//! Every other Pit crate depends on `pit-types`.
//!
//! # Key Types
//!
//! - [`ObjectId`] — Content-addressed identifier (160-bit BLAKE3 digest)
//! - [`Timestamp`] — Whole seconds since the UNIX epoch

pub mod error;
pub mod object;
pub mod temporal;

pub use error::TypeError;
pub use object::ObjectId;
pub use temporal::Timestamp;
