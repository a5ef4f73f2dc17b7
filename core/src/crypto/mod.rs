//! crypto/mod.rs
//! Digest engine used for content addressing.

pub mod types;
pub mod sha1;

pub use types::*;
pub use sha1::*;
