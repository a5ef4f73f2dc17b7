//! resolver/address.rs
//! Content addresses: where a backup stores an item's bytes.
//!
//! Early backup generations name every stored file by
//! `hex(SHA-1(domain || "-" || relative_path))`, lowercase, no extension.
//! Nothing in the bundle maps names back, so a wrong byte here is just
//! "file not found".

use std::fmt;
use serde::{Serialize, Serializer};

use crate::constants::KEY_SEPARATOR;
use crate::crypto::{Digest, Sha1};

/// 40 lowercase hex digits naming one stored file.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContentAddress {
    digest: Digest,
    name: String,
}

impl ContentAddress {
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.name
    }

    pub fn into_string(self) -> String {
        self.name
    }

    /// Digest this address was rendered from.
    #[inline]
    pub fn digest(&self) -> Digest {
        self.digest
    }
}

impl From<Digest> for ContentAddress {
    fn from(digest: Digest) -> Self {
        Self { digest, name: digest.to_hex() }
    }
}

impl Serialize for ContentAddress {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.name)
    }
}

impl AsRef<str> for ContentAddress {
    fn as_ref(&self) -> &str {
        &self.name
    }
}

impl AsRef<std::path::Path> for ContentAddress {
    fn as_ref(&self) -> &std::path::Path {
        std::path::Path::new(&self.name)
    }
}

impl fmt::Display for ContentAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl fmt::Debug for ContentAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentAddress({})", self.name)
    }
}

/// Digest of the content-address key `domain || "-" || name`.
///
/// The key is hashed as its exact bytes: no normalization, no case folding,
/// no extra separators. Empty parts are fine.
pub fn content_digest(domain: impl AsRef<[u8]>, name: impl AsRef<[u8]>) -> Digest {
    let mut h = Sha1::new();
    h.update(domain.as_ref());
    h.update(KEY_SEPARATOR);
    h.update(name.as_ref());
    h.finalize()
}

/// Storage file name for `(domain, name)`.
#[inline]
pub fn resolve(domain: impl AsRef<[u8]>, name: impl AsRef<[u8]>) -> ContentAddress {
    ContentAddress::from(content_digest(domain, name))
}
