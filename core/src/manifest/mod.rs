//! manifest/mod.rs
//! Legacy backup index (`Manifest.mbdb`) decoding.
//!
//! Notes:
//! - Big-endian throughout; strings are `u16` length-prefixed with `0xFFFF` as "absent".
//! - `decode` reads exactly one record; `stream` owns the signature and the record loop.

pub mod types;
pub mod decode;
pub mod stream;

pub use types::*;
pub use decode::*;
pub use stream::*;
