//! Downloading compressed dataset files into the local cache.
//!
//! Files are published as `<name>.gz`. [`Fetcher::ensure_local`] streams the
//! archive in fixed-size chunks through a decoder into `<cache>/<name>.part`,
//! counting the compressed bytes consumed. Only a transfer whose count
//! matches the declared length and whose stream decodes completely is
//! renamed to `<cache>/<name>`; anything else removes the `.part` file. An
//! interrupted process therefore never leaves a file at the final path.

mod decode;
mod http;

pub use http::HttpSource;

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{BufWriter, ErrorKind, Read};
use std::path::{Path, PathBuf};

use tracing::{Span, debug, field, info, instrument, warn};

use self::decode::{Framing, StreamDecoder};
use crate::error::FetchError;

/// Suffix of the published archives.
pub const ARCHIVE_SUFFIX: &str = ".gz";
const CHUNK_SIZE: usize = 64 * 1024;
/// Bytes needed to tell the archive framings apart.
const FRAMING_HEAD_LEN: usize = 2;
const PARTIAL_SUFFIX: &str = ".part";

/// An open remote body together with its declared compressed length.
pub struct RemoteStream {
    /// Where the body comes from, used in error messages.
    pub location: String,
    /// Payload length announced by the response metadata.
    pub declared_len: u64,
    /// The compressed payload.
    pub body: Box<dyn Read>,
}

/// Where archives are downloaded from.
pub trait RemoteSource {
    /// Opens the archive called `name`.
    ///
    /// # Errors
    /// Returns [`FetchError::Request`] when the request fails and
    /// [`FetchError::MissingLength`] when no length is declared.
    fn open(&self, name: &str) -> Result<RemoteStream, FetchError>;
}

/// Observer of transfer progress, measured in compressed bytes.
pub trait FetchProgress {
    /// A transfer of `declared_len` bytes is starting.
    fn start(&mut self, name: &str, declared_len: u64);
    /// `bytes` more bytes were consumed.
    fn advance(&mut self, bytes: u64);
    /// The transfer ended, successfully or not.
    fn finish(&mut self);
}

/// Progress observer that ignores every update.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoProgress;

impl FetchProgress for NoProgress {
    fn start(&mut self, _name: &str, _declared_len: u64) {}
    fn advance(&mut self, _bytes: u64) {}
    fn finish(&mut self) {}
}

/// Populates a cache directory from a [`RemoteSource`].
pub struct Fetcher<'a> {
    source: &'a dyn RemoteSource,
}

impl<'a> Fetcher<'a> {
    /// Creates a fetcher reading from `source`.
    #[must_use]
    pub fn new(source: &'a dyn RemoteSource) -> Self {
        Self { source }
    }

    /// Returns `cache_dir/name`, downloading and decompressing
    /// `name.gz` first when the file is absent.
    ///
    /// An existing file is trusted as is and no request is made.
    ///
    /// # Errors
    /// - [`FetchError::Request`] or [`FetchError::MissingLength`] from the source.
    /// - [`FetchError::TransferIncomplete`] when the consumed byte count
    ///   differs from the declared length.
    /// - [`FetchError::Decompress`] when the payload is not a valid stream.
    /// - [`FetchError::Io`] when the cache cannot be written.
    ///
    /// No file is left at the destination after an error, and the
    /// destination only appears once the whole archive has been verified.
    #[instrument(
        name = "fetch.ensure_local",
        err,
        skip(self, cache_dir, progress),
        fields(received = field::Empty),
    )]
    pub fn ensure_local(
        &self,
        name: &str,
        cache_dir: &Path,
        progress: &mut dyn FetchProgress,
    ) -> Result<PathBuf, FetchError> {
        let path = cache_dir.join(name);
        if path.exists() {
            debug!(path = %path.display(), "dataset file already cached");
            return Ok(path);
        }
        fs::create_dir_all(cache_dir).map_err(|source| FetchError::Io {
            path: cache_dir.to_path_buf(),
            source,
        })?;

        let partial = partial_path(&path);
        let outcome = self.download(name, &partial, progress).and_then(|received| {
            fs::rename(&partial, &path).map_err(|source| FetchError::Io {
                path: path.clone(),
                source,
            })?;
            Ok(received)
        });
        match outcome {
            Ok(received) => {
                Span::current().record("received", received);
                info!(path = %path.display(), received, "dataset file downloaded");
                Ok(path)
            }
            Err(error) => {
                remove_partial(&partial);
                Err(error)
            }
        }
    }

    fn download(
        &self,
        name: &str,
        path: &Path,
        progress: &mut dyn FetchProgress,
    ) -> Result<u64, FetchError> {
        let remote_name = format!("{name}{ARCHIVE_SUFFIX}");
        let RemoteStream {
            location,
            declared_len,
            mut body,
        } = self.source.open(&remote_name)?;
        debug!(%location, declared_len, "streaming archive");

        progress.start(&remote_name, declared_len);
        let result = stream_into(
            &remote_name,
            &location,
            body.as_mut(),
            path,
            declared_len,
            progress,
        );
        progress.finish();
        result
    }
}

fn stream_into(
    remote_name: &str,
    location: &str,
    body: &mut dyn Read,
    path: &Path,
    declared_len: u64,
    progress: &mut dyn FetchProgress,
) -> Result<u64, FetchError> {
    let io_error = |source| FetchError::Io {
        path: path.to_path_buf(),
        source,
    };
    let decompress_error = |source| FetchError::Decompress {
        name: remote_name.to_owned(),
        source,
    };
    let mut read_chunk = |buffer: &mut [u8]| loop {
        match body.read(buffer) {
            Ok(read) => return Ok(read),
            Err(error) if error.kind() == ErrorKind::Interrupted => {}
            Err(error) => {
                return Err(FetchError::Request {
                    url: location.to_owned(),
                    message: error.to_string(),
                });
            }
        }
    };

    let sink = BufWriter::new(File::create(path).map_err(io_error)?);
    let mut buffer = vec![0_u8; CHUNK_SIZE];
    let mut read = 0;
    while read < FRAMING_HEAD_LEN {
        let more = read_chunk(buffer.get_mut(read..).unwrap_or_default())?;
        if more == 0 {
            break;
        }
        read += more;
    }
    let framing = Framing::detect(buffer.get(..read).unwrap_or_default());
    debug!(?framing, "archive framing detected");
    let mut decoder = StreamDecoder::new(framing, sink);

    let mut received = 0_u64;
    while read > 0 {
        received += read as u64;
        progress.advance(read as u64);
        decoder
            .write_chunk(buffer.get(..read).unwrap_or_default())
            .map_err(decompress_error)?;
        read = read_chunk(&mut buffer)?;
    }

    if received != declared_len {
        return Err(FetchError::TransferIncomplete {
            name: remote_name.to_owned(),
            declared: declared_len,
            received,
        });
    }
    let sink = decoder.finish().map_err(decompress_error)?;
    let file = sink
        .into_inner()
        .map_err(|error| io_error(error.into_error()))?;
    file.sync_all().map_err(io_error)?;
    Ok(received)
}

/// `<path>.part`, the file a download streams into before it is verified.
fn partial_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(PARTIAL_SUFFIX);
    PathBuf::from(name)
}

fn remove_partial(path: &Path) {
    if !path.exists() {
        return;
    }
    match fs::remove_file(path) {
        Ok(()) => warn!(path = %path.display(), "removed partial dataset file"),
        Err(error) => warn!(
            path = %path.display(),
            error = %error,
            "failed to remove partial dataset file"
        ),
    }
}
