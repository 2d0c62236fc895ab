//! Random access to image records by position.

use std::fs::File;
use std::io::{BufReader, ErrorKind, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use tracing::{debug, instrument};

use super::header::{
    IMAGES_HEADER_LEN, IMAGES_MAGIC, RecordPrefix, read_u32_be, require_header, verify_size,
};
use crate::error::DatasetError;
use crate::grid::{DigitImage, Grid};

/// Largest raw intensity in a record.
pub const MAX_INTENSITY: u8 = 255;

/// Dimensions of every record in an images file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ImageShape {
    /// Columns per image.
    pub width: usize,
    /// Rows per image.
    pub height: usize,
}

impl ImageShape {
    /// Bytes in one record.
    #[must_use]
    pub const fn record_len(&self) -> usize {
        self.width * self.height
    }
}

/// An open images file.
///
/// Holds a buffered reader until [`ImageStore::close`] is called.
#[derive(Debug)]
pub struct ImageStore {
    path: PathBuf,
    shape: ImageShape,
    record_count: u32,
    reader: Option<BufReader<File>>,
}

impl ImageStore {
    /// Opens the images file at `path` after validating its header and size.
    ///
    /// # Errors
    /// - [`DatasetError::BadMagic`] when the file is not an images file.
    /// - [`DatasetError::SizeMismatch`] when the size disagrees with the header.
    /// - [`DatasetError::Overflow`] when the header describes an unaddressable payload.
    #[instrument(name = "dataset.images.open", err, fields(path = %path.display()))]
    pub fn open(path: &Path) -> Result<Self, DatasetError> {
        let file = File::open(path).map_err(|source| DatasetError::io(path, source))?;
        let actual = file
            .metadata()
            .map_err(|source| DatasetError::io(path, source))?
            .len();
        require_header(path, IMAGES_HEADER_LEN, actual)?;

        let mut reader = BufReader::new(file);
        let prefix = RecordPrefix::read_from(&mut reader, path)?.expect_magic(IMAGES_MAGIC, path)?;
        let width = read_u32_be(&mut reader, path)?;
        let height = read_u32_be(&mut reader, path)?;

        let overflow = || DatasetError::Overflow {
            path: path.to_path_buf(),
        };
        let shape = ImageShape {
            width: usize::try_from(width).map_err(|_| overflow())?,
            height: usize::try_from(height).map_err(|_| overflow())?,
        };
        let expected = u64::from(width)
            .checked_mul(u64::from(height))
            .and_then(|record| record.checked_mul(u64::from(prefix.count)))
            .and_then(|payload| payload.checked_add(IMAGES_HEADER_LEN))
            .ok_or_else(overflow)?;
        verify_size(path, expected, actual)?;
        shape.width.checked_mul(shape.height).ok_or_else(overflow)?;

        debug!(width, height, records = prefix.count, "images file validated");
        Ok(Self {
            path: path.to_path_buf(),
            shape,
            record_count: prefix.count,
            reader: Some(reader),
        })
    }

    /// Reads the record at `position`.
    ///
    /// # Errors
    /// - [`DatasetError::Closed`] after [`Self::close`].
    /// - [`DatasetError::ShortRead`] when fewer than one record's bytes remain.
    pub fn read_record(&mut self, position: usize) -> Result<DigitImage, DatasetError> {
        let reader = self.reader.as_mut().ok_or(DatasetError::Closed)?;
        let expected = self.shape.record_len();
        let offset = (position as u64)
            .checked_mul(expected as u64)
            .and_then(|start| start.checked_add(IMAGES_HEADER_LEN))
            .ok_or_else(|| DatasetError::Overflow {
                path: self.path.clone(),
            })?;
        reader
            .seek(SeekFrom::Start(offset))
            .map_err(|source| DatasetError::io(&self.path, source))?;

        let mut buffer = vec![0_u8; expected];
        let read = read_full(reader, &mut buffer)
            .map_err(|source| DatasetError::io(&self.path, source))?;
        let short_read = DatasetError::ShortRead {
            offset,
            expected,
            read,
        };
        if read < expected {
            return Err(short_read);
        }
        Grid::from_vec(self.shape.width, self.shape.height, buffer).map_err(|_| short_read)
    }

    /// Releases the file handle. Further reads fail with
    /// [`DatasetError::Closed`]. Closing twice is a no-op.
    pub fn close(&mut self) {
        if self.reader.take().is_some() {
            debug!(path = %self.path.display(), "images file closed");
        }
    }

    /// Whether the file handle is still held.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.reader.is_some()
    }

    /// Dimensions of every record.
    #[must_use]
    pub fn shape(&self) -> ImageShape {
        self.shape
    }

    /// Number of records declared by the header.
    #[must_use]
    pub fn record_count(&self) -> u32 {
        self.record_count
    }
}

fn read_full<R: Read>(reader: &mut R, buffer: &mut [u8]) -> std::io::Result<usize> {
    let mut filled = 0;
    while let Some(rest) = buffer.get_mut(filled..).filter(|rest| !rest.is_empty()) {
        match reader.read(rest) {
            Ok(0) => break,
            Ok(read) => filled += read,
            Err(error) if error.kind() == ErrorKind::Interrupted => {}
            Err(error) => return Err(error),
        }
    }
    Ok(filled)
}
