//! Push-style decompression with the framing detected from the first bytes.

use std::io::{self, Write};

use flate2::write::{DeflateDecoder, GzDecoder, ZlibDecoder};

/// Container around a deflate stream.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Framing {
    Gzip,
    Zlib,
    Raw,
}

impl Framing {
    /// Chooses a framing from the leading bytes of a payload.
    pub(crate) fn detect(head: &[u8]) -> Self {
        match head {
            [0x1f, 0x8b, ..] => Self::Gzip,
            [cmf, flg, ..]
                if cmf & 0x0f == 8 && (u16::from(*cmf) << 8 | u16::from(*flg)) % 31 == 0 =>
            {
                Self::Zlib
            }
            _ => Self::Raw,
        }
    }
}

/// A decoder writing decompressed bytes into `W`.
pub(crate) enum StreamDecoder<W: Write> {
    Gzip(GzDecoder<W>),
    Zlib(ZlibDecoder<W>),
    Raw(DeflateDecoder<W>),
}

impl<W: Write> StreamDecoder<W> {
    pub(crate) fn new(framing: Framing, sink: W) -> Self {
        match framing {
            Framing::Gzip => Self::Gzip(GzDecoder::new(sink)),
            Framing::Zlib => Self::Zlib(ZlibDecoder::new(sink)),
            Framing::Raw => Self::Raw(DeflateDecoder::new(sink)),
        }
    }

    pub(crate) fn write_chunk(&mut self, chunk: &[u8]) -> io::Result<()> {
        match self {
            Self::Gzip(decoder) => decoder.write_all(chunk),
            Self::Zlib(decoder) => decoder.write_all(chunk),
            Self::Raw(decoder) => decoder.write_all(chunk),
        }
    }

    /// Flushes the trailing output and returns the sink.
    pub(crate) fn finish(self) -> io::Result<W> {
        match self {
            Self::Gzip(decoder) => decoder.finish(),
            Self::Zlib(decoder) => decoder.finish(),
            Self::Raw(decoder) => decoder.finish(),
        }
    }
}
