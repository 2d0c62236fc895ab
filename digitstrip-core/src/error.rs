//! Error types for the digitstrip core library.
//!
//! Each concern (fetching, dataset access, layout, composition) has its own
//! enum. Every enum exposes a stable machine-readable code so callers can
//! log or match failures without parsing messages.

use std::{fmt, io, path::PathBuf};

use thiserror::Error;

use crate::grid::ShapeError;

macro_rules! define_error_codes {
    (
        $(#[$enum_meta:meta])*
        enum $CodeTy:ident for $ErrTy:ident {
            $(
                $(#[$variant_meta:meta])*
                $CodeVariant:ident => $ErrVariant:ident
                    $( { $($fields:tt)* } )? $( ( $($tuple:tt)* ) )? => $code:expr
            ),+ $(,)?
        }
    ) => {
        $(#[$enum_meta])*
        #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
        #[non_exhaustive]
        pub enum $CodeTy {
            $(
                $(#[$variant_meta])*
                $CodeVariant,
            )+
        }

        impl $CodeTy {
            /// Return the stable machine-readable representation of this error code.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$CodeVariant => $code,)+
                }
            }
        }

        impl fmt::Display for $CodeTy {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl $ErrTy {
            #[doc = concat!(
                "Retrieve the stable [`",
                stringify!($CodeTy),
                "`] for this error."
            )]
            #[must_use]
            pub const fn code(&self) -> $CodeTy {
                match self {
                    $(
                        Self::$ErrVariant $( { $($fields)* } )? $( ( $($tuple)* ) )?
                            => $CodeTy::$CodeVariant,
                    )+
                }
            }
        }
    };
}

/// Failure while obtaining a dataset file from its remote location.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum FetchError {
    /// The remote request could not be issued or was rejected.
    #[error("request for `{url}` failed: {message}")]
    Request {
        /// URL that was requested.
        url: String,
        /// Human-readable failure reported by the transport.
        message: String,
    },
    /// The response did not declare a usable payload length.
    #[error("response for `{url}` did not declare a content length")]
    MissingLength {
        /// URL whose response lacked the length.
        url: String,
    },
    /// Fewer or more compressed bytes arrived than the response declared.
    #[error("transfer of `{name}` incomplete: received {received} of {declared} bytes")]
    TransferIncomplete {
        /// Remote file name.
        name: String,
        /// Length declared by the response metadata.
        declared: u64,
        /// Compressed bytes actually consumed.
        received: u64,
    },
    /// The compressed stream could not be decoded.
    #[error("failed to decompress `{name}`: {source}")]
    Decompress {
        /// Remote file name.
        name: String,
        /// Decoder failure.
        #[source]
        source: io::Error,
    },
    /// Reading the remote body or writing the local file failed.
    #[error("i/o failure while fetching into `{path}`: {source}")]
    Io {
        /// Local path being written.
        path: PathBuf,
        /// Underlying operating system error.
        #[source]
        source: io::Error,
    },
}

define_error_codes! {
    /// Stable codes describing [`FetchError`] variants.
    enum FetchErrorCode for FetchError {
        /// The remote request could not be issued or was rejected.
        Request => Request { .. } => "FETCH_REQUEST_FAILED",
        /// The response did not declare a usable payload length.
        MissingLength => MissingLength { .. } => "FETCH_MISSING_LENGTH",
        /// Fewer or more compressed bytes arrived than declared.
        TransferIncomplete => TransferIncomplete { .. } => "FETCH_TRANSFER_INCOMPLETE",
        /// The compressed stream could not be decoded.
        Decompress => Decompress { .. } => "FETCH_DECOMPRESS_FAILED",
        /// Reading the remote body or writing the local file failed.
        Io => Io { .. } => "FETCH_IO",
    }
}

/// Failure while opening or reading a dataset file.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum DatasetError {
    /// The file started with the wrong magic number.
    #[error("`{path}` has magic number {found}, expected {expected}")]
    BadMagic {
        /// Offending file.
        path: PathBuf,
        /// Magic number required for this file kind.
        expected: u32,
        /// Magic number actually read.
        found: u32,
    },
    /// The file size disagrees with the size implied by its header.
    #[error("`{path}` is {actual} bytes but its header implies {expected}")]
    SizeMismatch {
        /// Offending file.
        path: PathBuf,
        /// Size computed from the header.
        expected: u64,
        /// Size reported by the filesystem.
        actual: u64,
    },
    /// A sequential scan read a different number of records than declared.
    #[error("`{path}` yielded {read} records but its header declares {expected}")]
    TruncatedRecords {
        /// Offending file.
        path: PathBuf,
        /// Record count declared by the header.
        expected: u64,
        /// Records actually read.
        read: u64,
    },
    /// A label byte fell outside the digit range.
    #[error("record {position} carries label {label}, expected a digit 0-9")]
    InvalidLabel {
        /// Zero-based record position.
        position: usize,
        /// Raw label byte.
        label: u8,
    },
    /// No record carries the requested digit.
    #[error("no images are indexed for digit {digit}")]
    UnknownDigit {
        /// Requested digit.
        digit: u8,
    },
    /// A random-access read returned fewer bytes than one record.
    #[error("short read at offset {offset}: got {read} of {expected} bytes")]
    ShortRead {
        /// Byte offset of the record.
        offset: u64,
        /// Bytes in one record.
        expected: usize,
        /// Bytes actually read.
        read: usize,
    },
    /// The store was closed before the read.
    #[error("dataset store is closed")]
    Closed,
    /// Header values overflow addressable sizes.
    #[error("header of `{path}` describes a payload too large to address")]
    Overflow {
        /// Offending file.
        path: PathBuf,
    },
    /// Opening, seeking, or reading the file failed.
    #[error("i/o failure on `{path}`: {source}")]
    Io {
        /// File being accessed.
        path: PathBuf,
        /// Underlying operating system error.
        #[source]
        source: io::Error,
    },
    /// The backing file could not be fetched.
    #[error(transparent)]
    Fetch(#[from] FetchError),
}

define_error_codes! {
    /// Stable codes describing [`DatasetError`] variants.
    enum DatasetErrorCode for DatasetError {
        /// The file started with the wrong magic number.
        BadMagic => BadMagic { .. } => "DATASET_BAD_MAGIC",
        /// The file size disagrees with its header.
        SizeMismatch => SizeMismatch { .. } => "DATASET_CORRUPT",
        /// A scan read a different number of records than declared.
        TruncatedRecords => TruncatedRecords { .. } => "DATASET_TRUNCATED",
        /// A label byte fell outside the digit range.
        InvalidLabel => InvalidLabel { .. } => "DATASET_INVALID_LABEL",
        /// No record carries the requested digit.
        UnknownDigit => UnknownDigit { .. } => "DATASET_UNKNOWN_DIGIT",
        /// A random-access read came up short.
        ShortRead => ShortRead { .. } => "DATASET_SHORT_READ",
        /// The store was closed before the read.
        Closed => Closed => "DATASET_CLOSED",
        /// Header values overflow addressable sizes.
        Overflow => Overflow { .. } => "DATASET_OVERFLOW",
        /// Opening, seeking, or reading the file failed.
        Io => Io { .. } => "DATASET_IO",
        /// The backing file could not be fetched.
        Fetch => Fetch(_) => "DATASET_FETCH_FAILED",
    }
}

impl DatasetError {
    /// Retrieve the inner [`FetchErrorCode`] when the failure happened while fetching.
    #[must_use]
    pub const fn fetch_code(&self) -> Option<FetchErrorCode> {
        match self {
            Self::Fetch(error) => Some(error.code()),
            _ => None,
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Failure while planning slot and gap widths.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum LayoutError {
    /// `total` cannot be split into `count` values of `base` or `base + 1`.
    #[error("cannot split {total} into {count} values of {base} or one more")]
    Undistributable {
        /// Number of values requested.
        count: usize,
        /// Smallest allowed value.
        base: usize,
        /// Required sum.
        total: usize,
    },
    /// The total width cannot hold the minimum spacing.
    #[error("total width {total_width} cannot hold {gaps} gaps of at least {min_spacing} pixels")]
    WidthTooSmall {
        /// Requested canvas width.
        total_width: usize,
        /// Number of gaps.
        gaps: usize,
        /// Minimum gap width.
        min_spacing: usize,
    },
}

define_error_codes! {
    /// Stable codes describing [`LayoutError`] variants.
    enum LayoutErrorCode for LayoutError {
        /// The remainder cannot be distributed.
        Undistributable => Undistributable { .. } => "LAYOUT_UNDISTRIBUTABLE",
        /// The total width cannot hold the minimum spacing.
        WidthTooSmall => WidthTooSmall { .. } => "LAYOUT_WIDTH_TOO_SMALL",
    }
}

/// Failure while composing a digit sequence.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ComposeError {
    /// One or more generation parameters were invalid.
    #[error("{}", violations.join("; "))]
    Configuration {
        /// Every violation found, in detection order.
        violations: Vec<String>,
    },
    /// Fetching a digit image failed.
    #[error(transparent)]
    Dataset(#[from] DatasetError),
    /// Planning the layout failed.
    #[error(transparent)]
    Layout(#[from] LayoutError),
    /// Concatenating a block onto the canvas failed.
    #[error(transparent)]
    Shape(#[from] ShapeError),
}

define_error_codes! {
    /// Stable codes describing [`ComposeError`] variants.
    enum ComposeErrorCode for ComposeError {
        /// One or more generation parameters were invalid.
        Configuration => Configuration { .. } => "COMPOSE_INVALID_CONFIGURATION",
        /// Fetching a digit image failed.
        Dataset => Dataset(_) => "COMPOSE_DATASET_FAILURE",
        /// Planning the layout failed.
        Layout => Layout(_) => "COMPOSE_LAYOUT_FAILURE",
        /// Concatenating a block onto the canvas failed.
        Shape => Shape(_) => "COMPOSE_SHAPE_MISMATCH",
    }
}

impl ComposeError {
    /// Retrieve the inner [`DatasetErrorCode`] when a dataset access failed.
    #[must_use]
    pub const fn dataset_code(&self) -> Option<DatasetErrorCode> {
        match self {
            Self::Dataset(error) => Some(error.code()),
            _ => None,
        }
    }
}
