//! Synthetic IDX datasets and compressed payloads for tests.
//!
//! Record `i` of a [`SyntheticDataset`] carries label `i % 10`, and its image
//! is blank except for the first pixel, which holds the label value. A test
//! can therefore check that a loaded image belongs to the requested digit by
//! summing its pixels.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use flate2::Compression;
use flate2::write::{DeflateEncoder, GzEncoder, ZlibEncoder};

/// Magic number opening a labels file.
pub const LABELS_MAGIC: u32 = 2049;
/// Magic number opening an images file.
pub const IMAGES_MAGIC: u32 = 2051;
/// File name of the training labels.
pub const LABELS_FILE: &str = "train-labels-idx1-ubyte";
/// File name of the training images.
pub const IMAGES_FILE: &str = "train-images-idx3-ubyte";

/// Shape and size of a generated dataset.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SyntheticDataset {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// Number of records.
    pub count: u32,
}

/// Locations written by [`SyntheticDataset::write_to`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DatasetPaths {
    pub labels: PathBuf,
    pub images: PathBuf,
}

impl SyntheticDataset {
    /// A dataset of `count` records of 28x28 images.
    #[must_use]
    pub const fn new(count: u32) -> Self {
        Self {
            width: 28,
            height: 28,
            count,
        }
    }

    /// Replaces the image shape.
    #[must_use]
    pub const fn with_shape(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Label of record `index`.
    #[must_use]
    pub const fn label(index: u32) -> u8 {
        (index % 10) as u8
    }

    /// Complete labels file contents.
    #[must_use]
    pub fn labels_bytes(&self) -> Vec<u8> {
        let mut bytes = header(LABELS_MAGIC, self.count);
        bytes.extend((0..self.count).map(Self::label));
        bytes
    }

    /// Complete images file contents.
    #[must_use]
    pub fn images_bytes(&self) -> Vec<u8> {
        let mut bytes = self.images_header();
        let record_len = self.record_len();
        for index in 0..self.count {
            let start = bytes.len();
            bytes.resize(start + record_len, 0);
            if let Some(first) = bytes.get_mut(start).filter(|_| record_len > 0) {
                *first = Self::label(index);
            }
        }
        bytes
    }

    /// Images header with no payload, used to build truncated files.
    #[must_use]
    pub fn images_header(&self) -> Vec<u8> {
        let mut bytes = header(IMAGES_MAGIC, self.count);
        bytes.extend_from_slice(&self.width.to_be_bytes());
        bytes.extend_from_slice(&self.height.to_be_bytes());
        bytes
    }

    /// Bytes per image record.
    #[must_use]
    pub fn record_len(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Writes both files under `dir` using the standard training names.
    ///
    /// # Errors
    /// Returns any I/O error raised while creating the directory or files.
    pub fn write_to(&self, dir: &Path) -> io::Result<DatasetPaths> {
        fs::create_dir_all(dir)?;
        let paths = DatasetPaths {
            labels: dir.join(LABELS_FILE),
            images: dir.join(IMAGES_FILE),
        };
        fs::write(&paths.labels, self.labels_bytes())?;
        fs::write(&paths.images, self.images_bytes())?;
        Ok(paths)
    }
}

fn header(magic: u32, count: u32) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(16);
    bytes.extend_from_slice(&magic.to_be_bytes());
    bytes.extend_from_slice(&count.to_be_bytes());
    bytes
}

/// Compresses `data` as a gzip member.
#[must_use]
pub fn gzip_bytes(data: &[u8]) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).expect("write to vec");
    encoder.finish().expect("finish gzip")
}

/// Compresses `data` as a zlib stream.
#[must_use]
pub fn zlib_bytes(data: &[u8]) -> Vec<u8> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).expect("write to vec");
    encoder.finish().expect("finish zlib")
}

/// Compresses `data` as a raw deflate stream.
#[must_use]
pub fn deflate_bytes(data: &[u8]) -> Vec<u8> {
    let mut encoder = DeflateEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).expect("write to vec");
    encoder.finish().expect("finish deflate")
}
