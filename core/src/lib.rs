//! mbdb-core
//!
//! Legacy iOS backup support: SHA-1 content addressing and
//! `Manifest.mbdb` index decoding. Pure Rust, synchronous, read-only.

#![forbid(unsafe_code)]

// Shared and top level
pub mod constants;
pub mod types;
pub mod utils;
pub mod io;

pub mod crypto;
pub mod resolver;
pub mod manifest;
pub mod telemetry;

// -----------------------------------------------------------------------------
// Prelude (Rust users)
// -----------------------------------------------------------------------------
pub mod prelude {
    pub use crate::constants::well_known;
    pub use crate::crypto::{sha1, Digest, Sha1};
    pub use crate::manifest::{
        read_manifest, EntryKind, ManifestError, ManifestRecord, ManifestStream, MbdbString, Property,
    };
    pub use crate::resolver::{resolve, BackupDir, ContentAddress};
    pub use crate::types::BackupError;
}
