use std::io;
use thiserror::Error;

use crate::manifest::ManifestError;

/// Crate-level error covering byte-source setup and index decoding.
/// - `From<T>` impls let `?` cross from the I/O layer into the decoder.
/// - Digest and resolver operations are total and never produce one.
#[derive(Debug, Error)]
pub enum BackupError {
    /// Opening a file or other byte source failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The index could not be decoded.
    #[error("manifest error: {0}")]
    Manifest(#[from] ManifestError),
}
