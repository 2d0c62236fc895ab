//! Assembling a digit sequence onto one canvas.
//!
//! [`SequenceComposer::compose`] validates a [`GenerationRequest`], plans the
//! layout, then for every digit fetches an image, inverts and normalizes it,
//! resizes it to its slot, and appends it together with the following gap.
//! Caller transforms run per digit under [`SpacingPolicy::Evenly`] and over
//! the finished canvas under [`SpacingPolicy::Random`], where the canvas is
//! finally resized to the requested width.

mod params;

pub use params::{GenerationParams, GenerationRequest, MIN_DIGIT_WIDTH};

use rand::RngCore;
use tracing::{Span, debug, field, info, instrument};

use crate::dataset::DigitSource;
use crate::error::ComposeError;
use crate::grid::Canvas;
use crate::layout::{LayoutRequest, SpacingPolicy, plan_layout};
use crate::transform::{Transform, invert, normalize, resize_width};

/// Intensity of the blank gap columns.
const BLANK: f32 = 1.0;

/// Draws digit sequences from a [`DigitSource`].
///
/// One random generator drives both image selection and gap sampling, so a
/// seeded generator reproduces a canvas exactly.
///
/// # Examples
/// ```no_run
/// use digitstrip_core::{DatasetConfig, DigitStore, GenerationRequest, SequenceComposer};
/// use rand::SeedableRng;
///
/// let store = DigitStore::open(&DatasetConfig::default())?;
/// let mut composer = SequenceComposer::new(store, rand::rngs::SmallRng::seed_from_u64(3));
/// let canvas = composer.compose(&GenerationRequest {
///     digits: vec![4, 2],
///     ..GenerationRequest::default()
/// })?;
/// assert_eq!(canvas.width(), 56);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct SequenceComposer<S, R> {
    source: S,
    rng: R,
    transforms: Vec<Box<dyn Transform>>,
}

impl<S: DigitSource, R: RngCore> SequenceComposer<S, R> {
    /// Creates a composer with no caller transforms.
    #[must_use]
    pub fn new(source: S, rng: R) -> Self {
        Self {
            source,
            rng,
            transforms: Vec::new(),
        }
    }

    /// Appends a caller transform. Transforms run in insertion order.
    #[must_use]
    pub fn with_transform(mut self, transform: impl Transform + 'static) -> Self {
        self.transforms.push(Box::new(transform));
        self
    }

    /// The underlying digit source.
    #[must_use]
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Gives back the digit source, for example to close it.
    #[must_use]
    pub fn into_source(self) -> S {
        self.source
    }

    /// Composes the canvas described by `request`.
    ///
    /// Nothing is fetched unless the request validates.
    ///
    /// # Errors
    /// - [`ComposeError::Configuration`] listing every invalid parameter.
    /// - [`ComposeError::Layout`] when the width cannot be partitioned.
    /// - [`ComposeError::Dataset`] when an image cannot be fetched.
    /// - [`ComposeError::Shape`] when a transform changes the image height.
    #[instrument(
        name = "compose.sequence",
        err,
        skip(self, request),
        fields(
            digits = request.digits.len(),
            policy = ?request.policy,
            width = field::Empty,
        ),
    )]
    pub fn compose(&mut self, request: &GenerationRequest) -> Result<Canvas, ComposeError> {
        let digit_width = self.source.digit_width();
        let height = self.source.digit_height();
        let max = self.source.max_intensity();
        let params = request.validate(digit_width)?;

        let plan = plan_layout(
            &LayoutRequest {
                digit_width,
                digit_count: params.digits.len(),
                total_width: params.image_width,
                spacing: params.spacing,
                policy: params.policy,
            },
            &mut self.rng,
        )?;
        let (mut slots, mut gaps) = plan.into_cursors();

        let mut canvas = Canvas::empty(height);
        for &digit in &params.digits {
            let raw = self.source.digit_image(digit, &mut self.rng)?;
            let mut image = normalize(&invert(&raw, max), max);
            if params.policy == SpacingPolicy::Evenly {
                image = self.run_transforms(image);
            }
            let slot = slots.next_or(digit_width);
            canvas.hconcat(&resize_width(&image, slot))?;

            let gap = gaps.next_or(0);
            if gap > 0 {
                canvas.hconcat(&Canvas::filled(gap, height, BLANK))?;
            }
            debug!(digit, slot, gap, "digit placed");
        }

        if params.policy == SpacingPolicy::Random {
            canvas = self.run_transforms(canvas);
            canvas = resize_width(&canvas, params.image_width);
        }

        Span::current().record("width", canvas.width());
        info!(
            width = canvas.width(),
            height = canvas.height(),
            "sequence composed"
        );
        Ok(canvas)
    }

    fn run_transforms(&mut self, image: Canvas) -> Canvas {
        self.transforms
            .iter_mut()
            .fold(image, |image, transform| transform.apply(image))
    }
}
