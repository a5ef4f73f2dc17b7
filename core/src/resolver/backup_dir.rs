use std::path::{Path, PathBuf};

use tracing::debug;

use crate::constants::MANIFEST_FILE_NAME;
use crate::io::{open_input, InputSource};
use crate::manifest::ManifestStream;
use crate::resolver::address::{resolve, ContentAddress};
use crate::types::BackupError;

/// Root of one legacy backup (the directory holding `Manifest.mbdb`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupDir {
    root: PathBuf,
}

impl BackupDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path where the backup stores `(domain, name)`. Does not check that it exists.
    pub fn item_path(&self, domain: impl AsRef<[u8]>, name: impl AsRef<[u8]>) -> PathBuf {
        self.address_path(&resolve(domain, name))
    }

    pub fn address_path(&self, address: &ContentAddress) -> PathBuf {
        self.root.join(address.as_str())
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.root.join(MANIFEST_FILE_NAME)
    }

    /// Open `Manifest.mbdb` and validate its signature.
    pub fn open_manifest(&self) -> Result<ManifestStream<Box<dyn std::io::Read + Send>>, BackupError> {
        let path = self.manifest_path();
        debug!(path = %path.display(), "opening manifest");
        let reader = open_input(InputSource::File(path))?;
        Ok(ManifestStream::open(reader)?)
    }
}
