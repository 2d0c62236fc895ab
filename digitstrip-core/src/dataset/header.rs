//! IDX header parsing and size validation.

use std::io::Read;
use std::path::Path;

use crate::error::DatasetError;

/// Magic number opening a labels file.
pub const LABELS_MAGIC: u32 = 2_049;
/// Magic number opening an images file.
pub const IMAGES_MAGIC: u32 = 2_051;

/// Bytes in the shared `(magic, count)` prefix.
pub(crate) const PREFIX_LEN: u64 = 8;
/// Bytes in an images header: the prefix plus width and height.
pub(crate) const IMAGES_HEADER_LEN: u64 = PREFIX_LEN + 8;

/// The `(magic, count)` prefix shared by both file kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct RecordPrefix {
    pub(crate) magic: u32,
    pub(crate) count: u32,
}

impl RecordPrefix {
    pub(crate) fn read_from<R: Read>(reader: &mut R, path: &Path) -> Result<Self, DatasetError> {
        let magic = read_u32_be(reader, path)?;
        let count = read_u32_be(reader, path)?;
        Ok(Self { magic, count })
    }

    /// Fails with [`DatasetError::BadMagic`] unless the magic is `expected`.
    pub(crate) fn expect_magic(self, expected: u32, path: &Path) -> Result<Self, DatasetError> {
        if self.magic != expected {
            return Err(DatasetError::BadMagic {
                path: path.to_path_buf(),
                expected,
                found: self.magic,
            });
        }
        Ok(self)
    }
}

pub(crate) fn read_u32_be<R: Read>(reader: &mut R, path: &Path) -> Result<u32, DatasetError> {
    let mut bytes = [0_u8; 4];
    reader
        .read_exact(&mut bytes)
        .map_err(|source| DatasetError::io(path, source))?;
    Ok(bytes
        .iter()
        .fold(0_u32, |acc, byte| (acc << 8) | u32::from(*byte)))
}

/// Fails with [`DatasetError::SizeMismatch`] unless `actual == expected`.
pub(crate) fn verify_size(path: &Path, expected: u64, actual: u64) -> Result<(), DatasetError> {
    if expected != actual {
        return Err(DatasetError::SizeMismatch {
            path: path.to_path_buf(),
            expected,
            actual,
        });
    }
    Ok(())
}

/// Fails with [`DatasetError::SizeMismatch`] when a file cannot even hold
/// its header.
pub(crate) fn require_header(
    path: &Path,
    header_len: u64,
    actual: u64,
) -> Result<(), DatasetError> {
    if actual < header_len {
        return Err(DatasetError::SizeMismatch {
            path: path.to_path_buf(),
            expected: header_len,
            actual,
        });
    }
    Ok(())
}
