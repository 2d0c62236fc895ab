//! Argument parsing and the generation pipeline behind the CLI.

use std::io::{self, Write};
use std::path::PathBuf;
use std::str::FromStr;

use clap::{Parser, ValueEnum};
use digitstrip_core::{
    Blur, ComposeError, DEFAULT_BASE_URL, DatasetConfig, DatasetError, DigitStore, Distort,
    GenerationRequest, HttpSource, SequenceComposer, SpacingPolicy,
};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;
use tracing::{Span, field, info, instrument};

use crate::output::{self, OutputError};
use crate::progress::DownloadProgress;

/// Output file written when `--output` is not given.
pub const DEFAULT_OUTPUT: &str = "digit_sequence.png";
const BLUR_SIGMA: f32 = 1.0;
const DISTORT_ALPHA: u32 = 18;

/// Top-level CLI options parsed by [`clap`].
#[derive(Debug, Parser, Clone)]
#[command(
    name = "digitstrip",
    about = "Render a sequence of handwritten MNIST digits as a PNG image."
)]
pub struct Cli {
    /// Digits to draw, for example `498127864687234`.
    pub digits: Digits,

    /// Name of the PNG file to write. An existing file is never overwritten.
    #[arg(short, long, default_value = DEFAULT_OUTPUT)]
    pub output: PathBuf,

    /// Directory caching the dataset files.
    #[arg(short = 'd', long = "data-dir")]
    pub data_dir: Option<PathBuf>,

    /// Width of the image in pixels. Derived from the digit count if omitted.
    #[arg(short = 'w', long = "image-width", allow_negative_numbers = true)]
    pub image_width: Option<i64>,

    /// Gap range as `min,max`; a single value `n` means `n,n`.
    #[arg(short, long, value_name = "MIN,MAX", allow_hyphen_values = true)]
    pub spacing: Option<SpacingArg>,

    /// Space digits evenly instead of drawing gaps at random.
    #[arg(short, long)]
    pub evenly: bool,

    /// Extra filters applied in order, as a comma-separated list.
    #[arg(short, long, value_enum, value_delimiter = ',')]
    pub filters: Vec<FilterKind>,

    /// Seed for image selection, gap widths, and distortion.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Mirror hosting the gzip-compressed dataset files.
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Hide the download progress bar.
    #[arg(short, long)]
    pub quiet: bool,
}

/// A string of decimal digits.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Digits(pub Vec<u8>);

impl Digits {
    /// Number of digits.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no digits were given.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromStr for Digits {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        raw.chars()
            .map(|ch| {
                ch.to_digit(10)
                    .and_then(|digit| u8::try_from(digit).ok())
                    .ok_or_else(|| format!("`{ch}` is not a decimal digit"))
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }
}

/// A `min,max` gap range as typed on the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SpacingArg {
    /// Smallest gap as typed.
    pub min: i64,
    /// Largest gap as typed.
    pub max: i64,
}

impl FromStr for SpacingArg {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let parse = |part: &str| {
            part.trim()
                .parse::<i64>()
                .map_err(|error| format!("invalid spacing `{part}`: {error}"))
        };
        match raw.split_once(',') {
            Some((min, max)) => Ok(Self {
                min: parse(min)?,
                max: parse(max)?,
            }),
            None => {
                let value = parse(raw)?;
                Ok(Self {
                    min: value,
                    max: value,
                })
            }
        }
    }
}

/// Filters selectable with `--filters`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FilterKind {
    /// Slight Gaussian blur.
    Blur,
    /// Random horizontal shift of every row.
    Distort,
}

/// Errors surfaced while executing the CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// The dataset could not be opened or fetched.
    #[error(transparent)]
    Dataset(#[from] DatasetError),
    /// Composition failed.
    #[error(transparent)]
    Compose(#[from] ComposeError),
    /// The PNG could not be written.
    #[error(transparent)]
    Output(#[from] OutputError),
}

impl CliError {
    /// Stable code of the underlying library error, when it has one.
    #[must_use]
    pub fn code(&self) -> Option<&'static str> {
        match self {
            Self::Dataset(error) => Some(error.code().as_str()),
            Self::Compose(error) => Some(error.code().as_str()),
            Self::Output(_) => None,
        }
    }

    /// Stable code of the innermost dataset or fetch failure.
    #[must_use]
    pub fn cause_code(&self) -> Option<&'static str> {
        let dataset = match self {
            Self::Dataset(error) => error,
            Self::Compose(ComposeError::Dataset(error)) => error,
            _ => return None,
        };
        dataset
            .fetch_code()
            .map(|code| code.as_str())
            .or_else(|| Some(dataset.code().as_str()))
    }
}

/// What a successful run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationSummary {
    /// File actually written.
    pub output: PathBuf,
    /// Image width in pixels.
    pub width: usize,
    /// Image height in pixels.
    pub height: usize,
}

impl Cli {
    pub(super) fn dataset_config(&self) -> DatasetConfig {
        let config = DatasetConfig::default().with_base_url(self.base_url.clone());
        match &self.data_dir {
            Some(dir) => config.with_cache_dir(dir),
            None => config,
        }
    }

    pub(super) fn generation_request(&self) -> GenerationRequest {
        GenerationRequest {
            digits: self.digits.0.clone(),
            spacing: self.spacing.map(|spacing| (spacing.min, spacing.max)),
            image_width: self.image_width,
            policy: if self.evenly {
                SpacingPolicy::Evenly
            } else {
                SpacingPolicy::Random
            },
        }
    }
}

/// Renders the digits described by `cli` into a PNG file.
///
/// # Errors
/// Returns [`CliError`] when the dataset cannot be opened, the parameters
/// are invalid, or the image cannot be written.
#[instrument(
    name = "cli.run",
    err,
    skip(cli),
    fields(digits = cli.digits.len(), output = field::Empty),
)]
pub fn run_cli(cli: Cli) -> Result<GenerationSummary, CliError> {
    let config = cli.dataset_config();
    let source = HttpSource::from_config(&config);
    let mut progress = if cli.quiet {
        DownloadProgress::hidden()
    } else {
        DownloadProgress::new()
    };
    let store = DigitStore::open_with(&config, &source, &mut progress)?;

    let mut rng = match cli.seed {
        Some(seed) => SmallRng::seed_from_u64(seed),
        None => SmallRng::from_entropy(),
    };
    let distort_seed: u64 = rng.r#gen();
    let mut composer = SequenceComposer::new(store, rng);
    for filter in &cli.filters {
        composer = match filter {
            FilterKind::Blur => composer.with_transform(Blur { sigma: BLUR_SIGMA }),
            FilterKind::Distort => composer.with_transform(Distort {
                alpha: DISTORT_ALPHA,
                rng: SmallRng::seed_from_u64(distort_seed),
            }),
        };
    }

    let canvas = composer.compose(&cli.generation_request())?;
    composer.into_source().close();

    let written = output::write_png(&canvas, &cli.output)?;
    Span::current().record("output", field::display(written.display()));
    info!(
        output = %written.display(),
        width = canvas.width(),
        height = canvas.height(),
        "image written"
    );
    Ok(GenerationSummary {
        output: written,
        width: canvas.width(),
        height: canvas.height(),
    })
}

/// Renders `summary` to `writer` as `key: value` lines.
///
/// # Errors
/// Returns [`io::Error`] if writing to the supplied writer fails.
///
/// # Examples
/// ```
/// # use std::io::Cursor;
/// # use std::path::PathBuf;
/// # use digitstrip_cli::cli::{GenerationSummary, render_summary};
/// let summary = GenerationSummary {
///     output: PathBuf::from("digits.png"),
///     width: 56,
///     height: 28,
/// };
/// let mut buffer = Cursor::new(Vec::new());
/// render_summary(&summary, &mut buffer)?;
/// assert_eq!(buffer.into_inner(), b"output: digits.png\nwidth: 56\nheight: 28\n");
/// # Ok::<(), std::io::Error>(())
/// ```
pub fn render_summary(summary: &GenerationSummary, mut writer: impl Write) -> io::Result<()> {
    writeln!(writer, "output: {}", summary.output.display())?;
    writeln!(writer, "width: {}", summary.width)?;
    writeln!(writer, "height: {}", summary.height)?;
    Ok(())
}
