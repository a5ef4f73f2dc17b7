//! manifest/stream.rs
//!
//! Signature check and record loop over a whole `Manifest.mbdb`.
//!
//! - The index has no record count; it ends when input runs out at a record
//!   boundary. Running out inside the first field of a record is also taken
//!   as the end, matching how devices' own readers behave.
//! - Running out anywhere later in a record is corruption. The stream is
//!   poisoned afterwards: later field boundaries cannot be located.

use std::io::Read;
use std::iter::FusedIterator;

use tracing::{debug, trace, warn};

use crate::constants::MBDB_MAGIC;
use crate::io::CountingReader;
use crate::manifest::decode::{decode_record, DecodeFailure};
use crate::manifest::types::{ManifestError, ManifestRecord};
use crate::telemetry::{DecodeCounters, Stage, TelemetrySnapshot, TelemetryTimer};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum StreamState {
    Open,
    Exhausted,
    Failed,
}

/// Sequential reader of manifest records.
pub struct ManifestStream<R> {
    src: CountingReader<R>,
    state: StreamState,
    counters: DecodeCounters,
    timer: TelemetryTimer,
}

impl<R: Read> ManifestStream<R> {
    /// Consume and validate the signature.
    pub fn open(reader: R) -> Result<Self, ManifestError> {
        let mut timer = TelemetryTimer::new();
        let mut src = CountingReader::new(reader);

        let mut sig = [0u8; MBDB_MAGIC.len()];
        let n = timer.time(Stage::Signature, || src.read_exact_or_eof(&mut sig))?;
        if n != sig.len() || sig != MBDB_MAGIC {
            warn!(got = n, "manifest signature mismatch");
            return Err(ManifestError::InvalidSignature { have: sig[..n].to_vec() });
        }
        debug!("manifest signature accepted");

        let mut counters = DecodeCounters::default();
        counters.add_signature(n);

        Ok(Self {
            src,
            state: StreamState::Open,
            counters,
            timer,
        })
    }

    /// Next record, `Ok(None)` at the end of the index.
    ///
    /// After an error every further call returns `ManifestError::Poisoned`
    /// without reading.
    pub fn next_record(&mut self) -> Result<Option<ManifestRecord>, ManifestError> {
        match self.state {
            StreamState::Open => {}
            StreamState::Exhausted => return Ok(None),
            StreamState::Failed => return Err(ManifestError::Poisoned),
        }

        let start = self.src.position();
        let src = &mut self.src;
        let outcome = self.timer.time(Stage::Decode, || decode_record(src));

        match outcome {
            Ok(record) => {
                let wire_len = self.src.position() - start;
                trace!(
                    index = self.counters.records,
                    offset = start,
                    domain = %record.domain,
                    path = %record.path,
                    "decoded manifest record"
                );
                self.counters.add_record(&record, wire_len);
                Ok(Some(record))
            }
            Err(failure) if failure.is_end_before_record() => {
                self.state = StreamState::Exhausted;
                let trailing = self.src.position() - start;
                if trailing > 0 {
                    debug!(offset = start, trailing, "partial first field at end of manifest");
                }
                debug!(records = self.counters.records, "end of manifest");
                Ok(None)
            }
            Err(DecodeFailure::Short { field, offset, wanted, got }) => {
                self.state = StreamState::Failed;
                warn!(record = self.counters.records, %field, offset, wanted, got, "manifest truncated mid-record");
                Err(ManifestError::Corrupt {
                    record: self.counters.records,
                    field,
                    offset,
                    wanted,
                    got,
                })
            }
            Err(DecodeFailure::Io { field, offset, source }) => {
                self.state = StreamState::Failed;
                warn!(record = self.counters.records, %field, offset, error = %source, "manifest read failed");
                Err(ManifestError::Io(source))
            }
        }
    }

    /// Records decoded so far.
    pub fn records_read(&self) -> u64 {
        self.counters.records
    }

    /// Bytes consumed from the source, signature included.
    pub fn position(&self) -> u64 {
        self.src.position()
    }

    pub fn is_finished(&self) -> bool {
        self.state != StreamState::Open
    }

    pub fn counters(&self) -> &DecodeCounters {
        &self.counters
    }

    pub fn snapshot(&self) -> TelemetrySnapshot {
        TelemetrySnapshot::from(&self.counters, &self.timer)
    }

    pub fn into_inner(self) -> R {
        self.src.into_inner()
    }
}

impl<R: Read> Iterator for ManifestStream<R> {
    type Item = Result<ManifestRecord, ManifestError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.next_record() {
            Ok(Some(record)) => Some(Ok(record)),
            Ok(None) | Err(ManifestError::Poisoned) => None,
            Err(e) => Some(Err(e)),
        }
    }
}

impl<R: Read> FusedIterator for ManifestStream<R> {}

/// Decode a whole index into memory, stopping at the first error.
pub fn read_manifest<R: Read>(reader: R) -> Result<Vec<ManifestRecord>, ManifestError> {
    ManifestStream::open(reader)?.collect()
}
