//! manifest/decode.rs
//!
//! Decoding of a single `Manifest.mbdb` record.
//!
//! Wire layout (all integers big-endian):
//!
//! ```text
//! domain          string
//! path            string
//! link_target     string   (0xFFFF = absent)
//! data_hash       string   (0xFFFF = absent, 20 raw bytes otherwise)
//! encryption_key  string   (0xFFFF = absent)
//! mode            u16
//! inode           u32
//! reserved        u32      (ignored)
//! uid             u32
//! gid             u32
//! mtime           u32
//! atime           u32
//! ctime           u32
//! length          u64
//! protection      u8
//! property_count  u8
//! property_count x (name string, value string)
//!
//! string := len:u16 || len bytes
//! ```
//!
//! Records carry no length or count of their own; the only way to find the
//! next one is to decode every field of this one.

use std::io::{self, Read};

use byteorder::{BigEndian, ByteOrder};

use crate::constants::ABSENT_LEN;
use crate::io::CountingReader;
use crate::manifest::types::{AbsentKey, Field, ManifestRecord, MbdbString, Property};

/// Why a record could not be decoded.
#[derive(Debug)]
pub enum DecodeFailure {
    /// Input ended before `field` was complete.
    Short {
        field: Field,
        offset: u64,
        wanted: usize,
        got: usize,
    },
    /// The byte source reported an error while reading `field`.
    Io {
        field: Field,
        offset: u64,
        source: io::Error,
    },
}

impl DecodeFailure {
    pub fn field(&self) -> Field {
        match self {
            DecodeFailure::Short { field, .. } | DecodeFailure::Io { field, .. } => *field,
        }
    }

    /// Input ran out while still inside the record's first field.
    pub fn is_end_before_record(&self) -> bool {
        matches!(self, DecodeFailure::Short { field: Field::Domain, .. })
    }
}

/// Field-by-field reader for one record.
pub struct RecordDecoder<'a, R> {
    src: &'a mut CountingReader<R>,
    field: Field,
}

impl<'a, R: Read> RecordDecoder<'a, R> {
    pub fn new(src: &'a mut CountingReader<R>) -> Self {
        Self { src, field: Field::Domain }
    }

    /// Field currently being read (or last read, once done).
    pub fn field(&self) -> Field {
        self.field
    }

    /// Decode the complete record. On failure nothing is returned; the
    /// partially read values are dropped with the decoder.
    pub fn decode(mut self) -> Result<ManifestRecord, DecodeFailure> {
        let (domain, domain_absent) = self.required_string(Field::Domain)?;
        let (path, path_absent) = self.required_string(Field::Path)?;
        let link_target = self.optional_string(Field::LinkTarget)?.map(MbdbString::from);
        let data_hash = self.optional_string(Field::DataHash)?;
        let encryption_key = self.optional_string(Field::EncryptionKey)?.map(MbdbString::from);

        let mode = self.read_u16(Field::Mode)?;
        let inode = self.read_u32(Field::Inode)?;
        let _reserved = self.read_u32(Field::Reserved)?;
        let uid = self.read_u32(Field::Uid)?;
        let gid = self.read_u32(Field::Gid)?;
        let mtime = self.read_u32(Field::Mtime)?;
        let atime = self.read_u32(Field::Atime)?;
        let ctime = self.read_u32(Field::Ctime)?;
        let length = self.read_u64(Field::Length)?;
        let protection_class = self.read_u8(Field::ProtectionClass)?;
        let property_count = self.read_u8(Field::PropertyCount)?;

        let mut properties = Vec::with_capacity(property_count as usize);
        for i in 0..property_count {
            let name = self.optional_string(Field::PropertyName(i))?.map(MbdbString::from);
            let value = self.optional_string(Field::PropertyValue(i))?.map(MbdbString::from);
            properties.push(Property { name, value });
        }

        Ok(ManifestRecord {
            domain,
            path,
            absent_key: AbsentKey { domain: domain_absent, path: path_absent },
            link_target,
            data_hash,
            encryption_key,
            mode,
            inode,
            uid,
            gid,
            mtime,
            atime,
            ctime,
            length,
            protection_class,
            properties,
        })
    }

    // ---------------------------------------------------------------------
    // Primitive reads
    // ---------------------------------------------------------------------

    fn fill(&mut self, buf: &mut [u8]) -> Result<(), DecodeFailure> {
        let offset = self.src.position();
        match self.src.read_exact_or_eof(buf) {
            Ok(n) if n == buf.len() => Ok(()),
            Ok(got) => Err(DecodeFailure::Short {
                field: self.field,
                offset,
                wanted: buf.len(),
                got,
            }),
            Err(source) => Err(DecodeFailure::Io { field: self.field, offset, source }),
        }
    }

    fn read_u8(&mut self, field: Field) -> Result<u8, DecodeFailure> {
        self.field = field;
        let mut b = [0u8; 1];
        self.fill(&mut b)?;
        Ok(b[0])
    }

    fn read_u16(&mut self, field: Field) -> Result<u16, DecodeFailure> {
        self.field = field;
        let mut b = [0u8; 2];
        self.fill(&mut b)?;
        Ok(BigEndian::read_u16(&b))
    }

    fn read_u32(&mut self, field: Field) -> Result<u32, DecodeFailure> {
        self.field = field;
        let mut b = [0u8; 4];
        self.fill(&mut b)?;
        Ok(BigEndian::read_u32(&b))
    }

    fn read_u64(&mut self, field: Field) -> Result<u64, DecodeFailure> {
        self.field = field;
        let mut b = [0u8; 8];
        self.fill(&mut b)?;
        Ok(BigEndian::read_u64(&b))
    }

    /// Length-prefixed bytes; `None` for the absent marker.
    fn optional_string(&mut self, field: Field) -> Result<Option<Vec<u8>>, DecodeFailure> {
        let len = self.read_u16(field)?;
        if len == ABSENT_LEN {
            return Ok(None);
        }
        let mut buf = vec![0u8; len as usize];
        self.fill(&mut buf)?;
        Ok(Some(buf))
    }

    /// Domain and path: the absent marker reads as empty and is reported
    /// through the returned flag.
    fn required_string(&mut self, field: Field) -> Result<(MbdbString, bool), DecodeFailure> {
        match self.optional_string(field)? {
            Some(bytes) => Ok((MbdbString::from(bytes), false)),
            None => {
                tracing::warn!(%field, offset = self.src.position(), "absent marker on required field");
                Ok((MbdbString::default(), true))
            }
        }
    }
}

/// Decode one record from `src`.
#[inline]
pub fn decode_record<R: Read>(src: &mut CountingReader<R>) -> Result<ManifestRecord, DecodeFailure> {
    RecordDecoder::new(src).decode()
}
