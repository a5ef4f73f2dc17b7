//! resolver/mod.rs
//! Map logical `(domain, path)` pairs to on-disk backup file names.

pub mod address;
pub mod backup_dir;

pub use address::*;
pub use backup_dir::*;
