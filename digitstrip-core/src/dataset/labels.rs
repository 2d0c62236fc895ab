//! Label file scanning and per-digit position lookup.

use std::fs::File;
use std::io::{BufReader, ErrorKind, Read};
use std::path::{Path, PathBuf};

use rand::Rng;
use rand::seq::SliceRandom;
use tracing::{Span, field, instrument};

use super::header::{LABELS_MAGIC, PREFIX_LEN, RecordPrefix, require_header, verify_size};
use crate::error::DatasetError;

/// Number of digit classes.
pub const DIGIT_CLASSES: usize = 10;
const SCAN_CHUNK: usize = 64 * 1024;

/// Record positions grouped by label.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LabelIndex {
    positions: [Vec<usize>; DIGIT_CLASSES],
    len: usize,
}

impl LabelIndex {
    /// Builds an index from raw label bytes.
    ///
    /// # Errors
    /// Returns [`DatasetError::InvalidLabel`] for any byte above 9.
    pub fn from_labels(labels: &[u8]) -> Result<Self, DatasetError> {
        let mut index = Self::default();
        index.extend(labels)?;
        Ok(index)
    }

    fn extend(&mut self, labels: &[u8]) -> Result<(), DatasetError> {
        for &label in labels {
            let position = self.len;
            let bucket = self
                .positions
                .get_mut(usize::from(label))
                .ok_or(DatasetError::InvalidLabel { position, label })?;
            bucket.push(position);
            self.len += 1;
        }
        Ok(())
    }

    /// Positions of every record labelled `digit`, ascending.
    #[must_use]
    pub fn positions(&self, digit: u8) -> &[usize] {
        self.positions
            .get(usize::from(digit))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Number of records indexed.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether no records were indexed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// A validated labels file, indexed by digit.
///
/// The file handle is released as soon as the index is built.
#[derive(Clone, Debug)]
pub struct LabelStore {
    path: PathBuf,
    index: LabelIndex,
}

impl LabelStore {
    /// Opens and indexes the labels file at `path`.
    ///
    /// # Errors
    /// - [`DatasetError::BadMagic`] when the file is not a labels file.
    /// - [`DatasetError::SizeMismatch`] when the size disagrees with the header.
    /// - [`DatasetError::InvalidLabel`] when a label is not a digit.
    /// - [`DatasetError::TruncatedRecords`] when the scan comes up short.
    #[instrument(
        name = "dataset.labels.open",
        err,
        fields(path = %path.display(), records = field::Empty),
    )]
    pub fn open(path: &Path) -> Result<Self, DatasetError> {
        let file = File::open(path).map_err(|source| DatasetError::io(path, source))?;
        let actual = file
            .metadata()
            .map_err(|source| DatasetError::io(path, source))?
            .len();
        require_header(path, PREFIX_LEN, actual)?;

        let mut reader = BufReader::with_capacity(SCAN_CHUNK, file);
        let prefix = RecordPrefix::read_from(&mut reader, path)?.expect_magic(LABELS_MAGIC, path)?;
        verify_size(path, PREFIX_LEN + u64::from(prefix.count), actual)?;

        let index = scan(reader, path, u64::from(prefix.count))?;
        Span::current().record("records", index.len());
        Ok(Self {
            path: path.to_path_buf(),
            index,
        })
    }

    /// Picks a uniformly random record labelled `digit`.
    ///
    /// # Errors
    /// Returns [`DatasetError::UnknownDigit`] when no record carries `digit`.
    pub fn pick<R: Rng + ?Sized>(&self, digit: u8, rng: &mut R) -> Result<usize, DatasetError> {
        self.index
            .positions(digit)
            .choose(rng)
            .copied()
            .ok_or(DatasetError::UnknownDigit { digit })
    }

    /// Positions of every record labelled `digit`.
    #[must_use]
    pub fn positions(&self, digit: u8) -> &[usize] {
        self.index.positions(digit)
    }

    /// Number of records in the file.
    #[must_use]
    pub fn record_count(&self) -> usize {
        self.index.len()
    }

    /// The per-digit index.
    #[must_use]
    pub fn index(&self) -> &LabelIndex {
        &self.index
    }

    /// Path the store was opened from.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Indexes every label `reader` yields and checks there were `expected`.
fn scan<R: Read>(mut reader: R, path: &Path, expected: u64) -> Result<LabelIndex, DatasetError> {
    let mut index = LabelIndex::default();
    let mut buffer = vec![0_u8; SCAN_CHUNK];
    loop {
        let read = match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(read) => read,
            Err(error) if error.kind() == ErrorKind::Interrupted => continue,
            Err(source) => return Err(DatasetError::io(path, source)),
        };
        index.extend(buffer.get(..read).unwrap_or_default())?;
    }
    let read = index.len() as u64;
    if read != expected {
        return Err(DatasetError::TruncatedRecords {
            path: path.to_path_buf(),
            expected,
            read,
        });
    }
    Ok(index)
}
