/// Signature at offset 0 of every `Manifest.mbdb`.
/// "mbdb" + format version 5.0
pub const MBDB_MAGIC: [u8; 6] = *b"mbdb\x05\x00";

/// File name of the legacy index inside a backup directory.
pub const MANIFEST_FILE_NAME: &str = "Manifest.mbdb";

/// Length prefix that marks an optional string as absent.
pub const ABSENT_LEN: u16 = 0xFFFF;

/// SHA-1 output size in bytes.
pub const DIGEST_LEN: usize = 20;

/// SHA-1 block size in bytes.
pub const BLOCK_LEN: usize = 64;

/// Hex-encoded content address length.
pub const CONTENT_ADDRESS_LEN: usize = DIGEST_LEN * 2;

/// Separator between domain and relative path in the content-address key.
pub const KEY_SEPARATOR: &[u8] = b"-";

/// POSIX file type bits (`st_mode & S_IFMT`).
pub mod mode_bits {
    pub const TYPE_MASK: u16   = 0o170000;
    pub const FIFO: u16        = 0o010000;
    pub const CHAR_DEVICE: u16 = 0o020000;
    pub const DIRECTORY: u16   = 0o040000;
    pub const BLOCK_DEVICE: u16 = 0o060000;
    pub const REGULAR: u16     = 0o100000;
    pub const SYMLINK: u16     = 0o120000;
    pub const SOCKET: u16      = 0o140000;

    pub const PERMISSION_MASK: u16 = 0o7777;
}

/// Items looked up without consulting the index.
pub mod well_known {
    /// Messages database: `(domain, relative path)`.
    pub const SMS_DATABASE: (&str, &str) = ("HomeDomain", "Library/SMS/sms.db");
}
