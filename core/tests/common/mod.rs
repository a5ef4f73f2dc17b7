// Shared fixtures: hand-encode records in the Manifest.mbdb wire layout.
#![allow(dead_code)]

use std::io::{self, Read};

use mbdb_core::constants::{mode_bits, MBDB_MAGIC};
use mbdb_core::manifest::{AbsentKey, ManifestRecord, MbdbString, Property};

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn put_str(out: &mut Vec<u8>, s: Option<&[u8]>) {
    match s {
        Some(bytes) => {
            out.extend_from_slice(&(bytes.len() as u16).to_be_bytes());
            out.extend_from_slice(bytes);
        }
        None => out.extend_from_slice(&0xFFFFu16.to_be_bytes()),
    }
}

fn opt(s: &Option<MbdbString>) -> Option<&[u8]> {
    s.as_ref().map(|v| v.as_bytes())
}

/// Encode one record; the reserved word after `inode` is written as `reserved`.
pub fn encode_record_with_reserved(r: &ManifestRecord, reserved: u32) -> Vec<u8> {
    let mut out = Vec::new();
    put_str(&mut out, (!r.absent_key.domain).then(|| r.domain.as_bytes()));
    put_str(&mut out, (!r.absent_key.path).then(|| r.path.as_bytes()));
    put_str(&mut out, opt(&r.link_target));
    put_str(&mut out, r.data_hash.as_deref());
    put_str(&mut out, opt(&r.encryption_key));
    out.extend_from_slice(&r.mode.to_be_bytes());
    out.extend_from_slice(&r.inode.to_be_bytes());
    out.extend_from_slice(&reserved.to_be_bytes());
    out.extend_from_slice(&r.uid.to_be_bytes());
    out.extend_from_slice(&r.gid.to_be_bytes());
    out.extend_from_slice(&r.mtime.to_be_bytes());
    out.extend_from_slice(&r.atime.to_be_bytes());
    out.extend_from_slice(&r.ctime.to_be_bytes());
    out.extend_from_slice(&r.length.to_be_bytes());
    out.push(r.protection_class);
    out.push(r.properties.len() as u8);
    for p in &r.properties {
        put_str(&mut out, opt(&p.name));
        put_str(&mut out, opt(&p.value));
    }
    out
}

pub fn encode_record(r: &ManifestRecord) -> Vec<u8> {
    encode_record_with_reserved(r, 0)
}

pub fn manifest_bytes(records: &[ManifestRecord]) -> Vec<u8> {
    let mut out = MBDB_MAGIC.to_vec();
    for r in records {
        out.extend_from_slice(&encode_record(r));
    }
    out
}

/// Regular file with every field populated and distinct.
pub fn sample_file() -> ManifestRecord {
    ManifestRecord {
        domain: "HomeDomain".into(),
        path: "Library/SMS/sms.db".into(),
        absent_key: AbsentKey::default(),
        link_target: None,
        data_hash: Some((1u8..=20).collect()),
        encryption_key: Some(MbdbString::default()),
        mode: mode_bits::REGULAR | 0o644,
        inode: 0x0102_0304,
        uid: 501,
        gid: 20,
        mtime: 1_300_000_000,
        atime: 1_300_000_100,
        ctime: 1_300_000_200,
        length: 0x0000_0001_0000_0002,
        protection_class: 3,
        properties: Vec::new(),
    }
}

pub fn sample_dir() -> ManifestRecord {
    ManifestRecord {
        domain: "HomeDomain".into(),
        path: "Library/SMS".into(),
        mode: mode_bits::DIRECTORY | 0o755,
        uid: 501,
        gid: 501,
        ..Default::default()
    }
}

pub fn sample_symlink() -> ManifestRecord {
    ManifestRecord {
        domain: "MediaDomain".into(),
        path: "Media/Recordings".into(),
        link_target: Some("/var/mobile/Media/Recordings".into()),
        mode: mode_bits::SYMLINK | 0o777,
        properties: vec![Property {
            name: Some("com.apple.backup.excluded".into()),
            value: Some("1".into()),
        }],
        ..Default::default()
    }
}

/// Hands out at most `chunk` bytes per `read` call.
pub struct Trickle<R> {
    pub inner: R,
    pub chunk: usize,
}

impl<R: Read> Read for Trickle<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = buf.len().min(self.chunk);
        self.inner.read(&mut buf[..n])
    }
}

/// Serves `data`, then fails with `kind` instead of reporting EOF.
pub struct FailAfter {
    pub data: io::Cursor<Vec<u8>>,
    pub kind: io::ErrorKind,
}

impl Read for FailAfter {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.data.read(buf)?;
        if n == 0 && !buf.is_empty() {
            return Err(io::Error::new(self.kind, "injected failure"));
        }
        Ok(n)
    }
}

/// Returns `Interrupted` on every other call.
pub struct Flaky<R> {
    pub inner: R,
    pub tick: bool,
}

impl<R: Read> Read for Flaky<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.tick = !self.tick;
        if self.tick {
            return Err(io::Error::new(io::ErrorKind::Interrupted, "interrupted"));
        }
        self.inner.read(buf)
    }
}
