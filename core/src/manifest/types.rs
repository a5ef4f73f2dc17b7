//! manifest/types.rs
//! Decoded record types and the manifest error taxonomy.
//!
//! Notes:
//! - Strings are captured verbatim; the index makes no encoding promise.
//! - Optional wire strings (`0xFFFF` length) surface as `None`, never as an
//!   empty value, so "absent" and "present but empty" stay distinct.
//! - A `ManifestRecord` only exists fully decoded.

use std::borrow::Cow;
use std::fmt;
use std::io;

use chrono::{DateTime, Utc};
use num_enum::TryFromPrimitive;
use serde::{Serialize, Serializer};
use thiserror::Error;

use crate::constants::{mode_bits, DIGEST_LEN, MBDB_MAGIC};
use crate::crypto::Digest;
use crate::resolver::{resolve, ContentAddress};
use crate::utils::{enum_name_or_hex, fmt_bytes, fmt_optional};

/// Byte string exactly as stored in the index.
#[derive(Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MbdbString(Vec<u8>);

impl MbdbString {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// `Some` when the bytes are valid UTF-8.
    pub fn to_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.0).ok()
    }

    pub fn to_string_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.0)
    }
}

impl From<&str> for MbdbString {
    fn from(s: &str) -> Self {
        Self(s.as_bytes().to_vec())
    }
}

impl From<String> for MbdbString {
    fn from(s: String) -> Self {
        Self(s.into_bytes())
    }
}

impl From<Vec<u8>> for MbdbString {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for MbdbString {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl PartialEq<str> for MbdbString {
    fn eq(&self, other: &str) -> bool {
        self.0 == other.as_bytes()
    }
}

impl PartialEq<&str> for MbdbString {
    fn eq(&self, other: &&str) -> bool {
        self.0 == other.as_bytes()
    }
}

impl fmt::Display for MbdbString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_string_lossy())
    }
}

impl fmt::Debug for MbdbString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.to_string_lossy(), f)
    }
}

impl Serialize for MbdbString {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string_lossy())
    }
}

/// File type from the high bits of `mode`.
#[repr(u16)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, TryFromPrimitive, Serialize)]
pub enum EntryKind {
    Fifo        = mode_bits::FIFO,
    CharDevice  = mode_bits::CHAR_DEVICE,
    Directory   = mode_bits::DIRECTORY,
    BlockDevice = mode_bits::BLOCK_DEVICE,
    Regular     = mode_bits::REGULAR,
    Symlink     = mode_bits::SYMLINK,
    Socket      = mode_bits::SOCKET,
}

impl EntryKind {
    pub fn from_mode(mode: u16) -> Option<Self> {
        Self::try_from_primitive(mode & mode_bits::TYPE_MASK).ok()
    }
}

/// One extended attribute attached to a record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Property {
    pub name: Option<MbdbString>,
    pub value: Option<MbdbString>,
}

/// Which of domain/path carried the absent marker instead of a string.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AbsentKey {
    pub domain: bool,
    pub path: bool,
}

impl AbsentKey {
    pub fn any(&self) -> bool {
        self.domain || self.path
    }
}

/// One entry of `Manifest.mbdb`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ManifestRecord {
    pub domain: MbdbString,
    pub path: MbdbString,
    /// Set when `domain` or `path` was absent on the wire; both read as empty then.
    pub absent_key: AbsentKey,
    pub link_target: Option<MbdbString>,
    /// Raw digest bytes recorded by the device (20 when present).
    #[serde(serialize_with = "serialize_hex_opt")]
    pub data_hash: Option<Vec<u8>>,
    pub encryption_key: Option<MbdbString>,
    pub mode: u16,
    pub inode: u32,
    pub uid: u32,
    pub gid: u32,
    pub mtime: u32,
    pub atime: u32,
    pub ctime: u32,
    pub length: u64,
    pub protection_class: u8,
    pub properties: Vec<Property>,
}

impl ManifestRecord {
    pub fn kind(&self) -> Option<EntryKind> {
        EntryKind::from_mode(self.mode)
    }

    pub fn is_directory(&self) -> bool {
        self.kind() == Some(EntryKind::Directory)
    }

    pub fn is_symlink(&self) -> bool {
        self.kind() == Some(EntryKind::Symlink)
    }

    pub fn is_regular(&self) -> bool {
        self.kind() == Some(EntryKind::Regular)
    }

    /// Permission bits (`mode & 0o7777`).
    pub fn permissions(&self) -> u16 {
        self.mode & mode_bits::PERMISSION_MASK
    }

    pub fn modified_at(&self) -> DateTime<Utc> {
        timestamp(self.mtime)
    }

    pub fn accessed_at(&self) -> DateTime<Utc> {
        timestamp(self.atime)
    }

    pub fn changed_at(&self) -> DateTime<Utc> {
        timestamp(self.ctime)
    }

    /// Data hash as a `Digest`, only when it has the expected 20 bytes.
    pub fn data_digest(&self) -> Option<Digest> {
        let bytes = self.data_hash.as_deref()?;
        let arr: [u8; DIGEST_LEN] = bytes.try_into().ok()?;
        Some(Digest::from(arr))
    }

    pub fn data_hash_hex(&self) -> Option<String> {
        self.data_hash.as_ref().map(hex::encode)
    }

    /// Storage file name of this item inside the backup directory.
    ///
    /// `None` when domain or path was absent: there is no key to hash.
    pub fn content_address(&self) -> Option<ContentAddress> {
        if self.absent_key.any() {
            return None;
        }
        Some(resolve(&self.domain, &self.path))
    }

    /// First property value with the given name.
    pub fn property(&self, name: &str) -> Option<&MbdbString> {
        self.properties
            .iter()
            .find(|p| p.name.as_ref().is_some_and(|n| n == name))
            .and_then(|p| p.value.as_ref())
    }

    /// One-line description for listings.
    pub fn summary(&self) -> String {
        let hash = self.data_hash_hex();
        format!(
            "ITEM: domain='{}', path='{}', kind={}, link={}, hash={}, key={}, mtime={}, len={}",
            self.domain,
            self.path,
            enum_name_or_hex::<EntryKind>(self.mode & mode_bits::TYPE_MASK),
            fmt_optional(self.link_target.as_ref()),
            fmt_optional(hash.as_ref()),
            fmt_optional(self.encryption_key.as_ref()),
            self.mtime,
            self.length,
        )
    }
}

fn timestamp(secs: u32) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(i64::from(secs), 0).unwrap_or_default()
}

fn serialize_hex_opt<S: Serializer>(v: &Option<Vec<u8>>, serializer: S) -> Result<S::Ok, S::Error> {
    match v {
        Some(bytes) => serializer.serialize_some(&hex::encode(bytes)),
        None => serializer.serialize_none(),
    }
}

/// Position inside a record, in wire order.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Field {
    Domain,
    Path,
    LinkTarget,
    DataHash,
    EncryptionKey,
    Mode,
    Inode,
    Reserved,
    Uid,
    Gid,
    Mtime,
    Atime,
    Ctime,
    Length,
    ProtectionClass,
    PropertyCount,
    PropertyName(u8),
    PropertyValue(u8),
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Domain          => f.write_str("domain"),
            Field::Path            => f.write_str("path"),
            Field::LinkTarget      => f.write_str("link target"),
            Field::DataHash        => f.write_str("data hash"),
            Field::EncryptionKey   => f.write_str("encryption key"),
            Field::Mode            => f.write_str("mode"),
            Field::Inode           => f.write_str("inode"),
            Field::Reserved        => f.write_str("reserved"),
            Field::Uid             => f.write_str("uid"),
            Field::Gid             => f.write_str("gid"),
            Field::Mtime           => f.write_str("mtime"),
            Field::Atime           => f.write_str("atime"),
            Field::Ctime           => f.write_str("ctime"),
            Field::Length          => f.write_str("length"),
            Field::ProtectionClass => f.write_str("protection class"),
            Field::PropertyCount   => f.write_str("property count"),
            Field::PropertyName(i) => write!(f, "property {} name", i),
            Field::PropertyValue(i) => write!(f, "property {} value", i),
        }
    }
}

#[derive(Debug, Error)]
pub enum ManifestError {
    /// Leading signature missing, short, or wrong. Raised once, at open.
    #[error("not a Manifest.mbdb: expected signature {}, got {}", fmt_bytes(&MBDB_MAGIC), fmt_bytes(.have))]
    InvalidSignature { have: Vec<u8> },

    /// The stream ended inside a record. Nothing after this point can be trusted.
    #[error("manifest is corrupt: record {record}, {field} at offset {offset}: wanted {wanted} bytes, got {got}")]
    Corrupt {
        record: u64,
        field: Field,
        offset: u64,
        wanted: usize,
        got: usize,
    },

    /// The byte source itself failed.
    #[error("I/O error reading manifest: {0}")]
    Io(#[from] io::Error),

    /// `next_record` called after a terminal error.
    #[error("manifest stream used after a terminal error")]
    Poisoned,
}

impl ManifestError {
    pub fn is_corrupt(&self) -> bool {
        matches!(self, ManifestError::Corrupt { .. })
    }
}
