//! Local access to the handwritten-digit training set.
//!
//! A [`DigitStore`] pairs a [`LabelStore`], which indexes record positions by
//! digit, with an [`ImageStore`], which reads single records by position.
//! Both files are validated against their headers when opened, and fetched
//! into the cache directory first when [`DigitStore::open`] finds them
//! missing.

mod header;
mod images;
mod labels;

pub use header::{IMAGES_MAGIC, LABELS_MAGIC};
pub use images::{ImageShape, ImageStore, MAX_INTENSITY};
pub use labels::{DIGIT_CLASSES, LabelIndex, LabelStore};

use std::path::Path;

use rand::RngCore;
use tracing::{debug, instrument};

use crate::config::DatasetConfig;
use crate::error::DatasetError;
use crate::fetch::{FetchProgress, Fetcher, HttpSource, NoProgress, RemoteSource};
use crate::grid::DigitImage;

/// File name of the training labels.
pub const LABELS_FILE: &str = "train-labels-idx1-ubyte";
/// File name of the training images.
pub const IMAGES_FILE: &str = "train-images-idx3-ubyte";

/// Anything that can hand out an image of a requested digit.
///
/// The composer depends on this trait rather than on [`DigitStore`] so tests
/// can supply images without touching the filesystem.
pub trait DigitSource {
    /// Columns in every image.
    fn digit_width(&self) -> usize;

    /// Rows in every image.
    fn digit_height(&self) -> usize;

    /// Largest raw intensity, used for inversion and normalization.
    fn max_intensity(&self) -> u8 {
        MAX_INTENSITY
    }

    /// Returns a randomly chosen image of `digit`.
    ///
    /// # Errors
    /// Returns a [`DatasetError`] when no image of `digit` exists or the
    /// backing storage fails.
    fn digit_image(&mut self, digit: u8, rng: &mut dyn RngCore) -> Result<DigitImage, DatasetError>;
}

/// The labels and images files opened together.
///
/// # Examples
/// ```no_run
/// use digitstrip_core::{DatasetConfig, DigitSource, DigitStore};
/// use rand::SeedableRng;
///
/// let mut store = DigitStore::open(&DatasetConfig::default())?;
/// let mut rng = rand::rngs::SmallRng::seed_from_u64(7);
/// let seven = store.digit_image(7, &mut rng)?;
/// assert_eq!(seven.width(), store.digit_width());
/// store.close();
/// # Ok::<(), digitstrip_core::DatasetError>(())
/// ```
#[derive(Debug)]
pub struct DigitStore {
    labels: LabelStore,
    images: ImageStore,
}

impl DigitStore {
    /// Opens the store from `config.cache_dir`, downloading missing files
    /// from `config.base_url` first.
    ///
    /// # Errors
    /// Returns [`DatasetError::Fetch`] when a download fails, or any error of
    /// [`LabelStore::open`] and [`ImageStore::open`].
    pub fn open(config: &DatasetConfig) -> Result<Self, DatasetError> {
        let source = HttpSource::from_config(config);
        Self::open_with(config, &source, &mut NoProgress)
    }

    /// Like [`Self::open`], fetching through `source` and reporting transfer
    /// progress to `progress`.
    ///
    /// # Errors
    /// As [`Self::open`].
    #[instrument(
        name = "dataset.open",
        err,
        skip(config, source, progress),
        fields(cache_dir = %config.cache_dir.display()),
    )]
    pub fn open_with(
        config: &DatasetConfig,
        source: &dyn RemoteSource,
        progress: &mut dyn FetchProgress,
    ) -> Result<Self, DatasetError> {
        let fetcher = Fetcher::new(source);
        let labels = fetcher.ensure_local(LABELS_FILE, &config.cache_dir, progress)?;
        let images = fetcher.ensure_local(IMAGES_FILE, &config.cache_dir, progress)?;
        Self::open_files(&labels, &images)
    }

    /// Opens the training files already present in `dir` without any
    /// network access.
    ///
    /// # Errors
    /// As [`LabelStore::open`] and [`ImageStore::open`].
    pub fn open_local(dir: &Path) -> Result<Self, DatasetError> {
        Self::open_files(&dir.join(LABELS_FILE), &dir.join(IMAGES_FILE))
    }

    /// Opens an explicit labels and images file pair.
    ///
    /// # Errors
    /// As [`LabelStore::open`] and [`ImageStore::open`].
    pub fn open_files(labels: &Path, images: &Path) -> Result<Self, DatasetError> {
        let labels = LabelStore::open(labels)?;
        let images = ImageStore::open(images)?;
        debug!(
            labels = labels.index().len(),
            images = images.record_count(),
            "digit store ready"
        );
        Ok(Self { labels, images })
    }

    /// Releases the images file handle. Idempotent.
    pub fn close(&mut self) {
        self.images.close();
    }

    /// The label index.
    #[must_use]
    pub fn labels(&self) -> &LabelStore {
        &self.labels
    }

    /// The images file.
    #[must_use]
    pub fn images(&self) -> &ImageStore {
        &self.images
    }
}

impl DigitSource for DigitStore {
    fn digit_width(&self) -> usize {
        self.images.shape().width
    }

    fn digit_height(&self) -> usize {
        self.images.shape().height
    }

    fn digit_image(
        &mut self,
        digit: u8,
        rng: &mut dyn RngCore,
    ) -> Result<DigitImage, DatasetError> {
        if !self.images.is_open() {
            return Err(DatasetError::Closed);
        }
        let position = self.labels.pick(digit, rng)?;
        self.images.read_record(position)
    }
}
