//! Writing canvases as 8-bit grayscale PNG files.

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use digitstrip_core::Canvas;
use image::{GrayImage, ImageFormat};
use thiserror::Error;
use tracing::debug;

/// Attempts made to find an unused timestamped name.
pub const MAX_NAME_ATTEMPTS: u64 = 1_000;

/// Errors raised while writing the image file.
#[derive(Debug, Error)]
pub enum OutputError {
    /// The canvas is larger than a PNG can describe.
    #[error("canvas of {width}x{height} pixels cannot be encoded")]
    Dimensions {
        /// Canvas width.
        width: usize,
        /// Canvas height.
        height: usize,
    },
    /// Every candidate name was already taken.
    #[error("no unused file name found next to `{path}`")]
    NameExhausted {
        /// Requested path.
        path: PathBuf,
    },
    /// Encoding or writing the file failed.
    #[error("failed to write `{path}`: {source}")]
    Encode {
        /// Path being written.
        path: PathBuf,
        /// Error raised by the encoder.
        #[source]
        source: image::ImageError,
    },
}

/// Maps unit-scale intensities to bytes as `floor(255 * v)` after clamping
/// to `[0, 1]`.
#[must_use]
pub fn to_luma(canvas: &Canvas) -> Vec<u8> {
    canvas
        .as_slice()
        .iter()
        .map(|value| (value.clamp(0.0, 1.0) * 255.0) as u8)
        .collect()
}

/// Returns `requested` if nothing exists there, otherwise the first free
/// `"<stem> (<seconds>)<ext>"` sibling.
///
/// # Errors
/// Returns [`OutputError::NameExhausted`] when every candidate exists.
pub fn unused_path(requested: &Path) -> Result<PathBuf, OutputError> {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or_default();
    unused_path_at(requested, now)
}

/// [`unused_path`] with the clock reading supplied by the caller.
///
/// Candidates count upward from `seconds`, one per attempt.
///
/// # Errors
/// Returns [`OutputError::NameExhausted`] when every candidate exists.
pub fn unused_path_at(requested: &Path, seconds: u64) -> Result<PathBuf, OutputError> {
    if !requested.exists() {
        return Ok(requested.to_path_buf());
    }
    let stem = requested
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    let extension = requested
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_default();
    (0..MAX_NAME_ATTEMPTS)
        .map(|attempt| {
            requested.with_file_name(format!(
                "{stem} ({}){extension}",
                seconds.saturating_add(attempt)
            ))
        })
        .find(|candidate| !candidate.exists())
        .ok_or_else(|| OutputError::NameExhausted {
            path: requested.to_path_buf(),
        })
}

/// Writes `canvas` as a PNG at `requested`, or next to it when that path is
/// taken, and returns the path written.
///
/// # Errors
/// Returns [`OutputError`] when no name is free or encoding fails.
pub fn write_png(canvas: &Canvas, requested: &Path) -> Result<PathBuf, OutputError> {
    let dimensions = OutputError::Dimensions {
        width: canvas.width(),
        height: canvas.height(),
    };
    let (Ok(width), Ok(height)) = (u32::try_from(canvas.width()), u32::try_from(canvas.height()))
    else {
        return Err(dimensions);
    };
    let image = GrayImage::from_raw(width, height, to_luma(canvas)).ok_or(dimensions)?;

    let path = unused_path(requested)?;
    if path != requested {
        debug!(
            requested = %requested.display(),
            chosen = %path.display(),
            "output exists; writing alongside"
        );
    }
    image
        .save_with_format(&path, ImageFormat::Png)
        .map_err(|source| OutputError::Encode {
            path: path.clone(),
            source,
        })?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    use digitstrip_core::Grid;
    use rstest::rstest;

    #[rstest]
    #[case::black(0.0, 0)]
    #[case::white(1.0, 255)]
    #[case::floors(0.5, 127)]
    #[case::clamps_low(-0.3, 0)]
    #[case::clamps_high(1.7, 255)]
    fn luma_floors_clamped_values(#[case] value: f32, #[case] expected: u8) {
        let canvas = Grid::filled(1, 1, value);
        assert_eq!(to_luma(&canvas), vec![expected]);
    }

    #[test]
    fn free_path_is_kept() {
        let dir = tempfile::tempdir().expect("tempdir");
        let requested = dir.path().join("digits.png");
        assert_eq!(unused_path_at(&requested, 5).expect("path is free"), requested);
    }

    #[test]
    fn taken_path_gets_timestamped_sibling() {
        let dir = tempfile::tempdir().expect("tempdir");
        let requested = dir.path().join("digits.png");
        std::fs::write(&requested, b"x").expect("occupy path");
        std::fs::write(dir.path().join("digits (100).png"), b"x").expect("occupy first candidate");

        let chosen = unused_path_at(&requested, 100).expect("a candidate is free");
        assert_eq!(chosen, dir.path().join("digits (101).png"));
    }

    #[test]
    fn written_png_round_trips() {
        let dir = tempfile::tempdir().expect("tempdir");
        let canvas = Grid::from_vec(2, 1, vec![0.0_f32, 1.0]).expect("shape is valid");
        let path = write_png(&canvas, &dir.path().join("out.png")).expect("png is written");
        let bytes = std::fs::read(path).expect("read png");
        assert_eq!(&bytes[1..4], b"PNG");
    }
}
