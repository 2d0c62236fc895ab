//! Partitioning a canvas width into digit slots and the gaps between them.
//!
//! Two policies are supported:
//!
//! - [`SpacingPolicy::Random`] keeps every slot at the native digit width and
//!   draws each gap uniformly from the spacing range. The composer corrects
//!   the total width with one final resize of the whole canvas.
//! - [`SpacingPolicy::Evenly`] computes slot and gap widths whose sum equals
//!   the requested total exactly, so no final resize is needed.
//!
//! Plans are computed eagerly and consumed one value per digit through a
//! [`WidthCursor`].

mod cursor;
mod distribute;

pub use cursor::WidthCursor;
pub use distribute::distribute_remainder;

use rand::Rng;
use tracing::debug;

use crate::error::LayoutError;

/// How gap widths are chosen.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SpacingPolicy {
    /// Independent uniform draws from the spacing range.
    #[default]
    Random,
    /// Deterministic widths summing exactly to the requested total.
    Evenly,
}

/// An inclusive `[min, max]` range of gap widths, always ordered.
///
/// # Examples
/// ```
/// use digitstrip_core::SpacingRange;
///
/// let range = SpacingRange::new(10, 3);
/// assert_eq!((range.min(), range.max()), (3, 10));
/// assert!(SpacingRange::fixed(4).is_fixed());
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SpacingRange {
    min: usize,
    max: usize,
}

impl SpacingRange {
    /// Creates a range from two bounds given in either order.
    #[must_use]
    pub fn new(a: usize, b: usize) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// A range admitting a single width.
    #[must_use]
    pub const fn fixed(width: usize) -> Self {
        Self {
            min: width,
            max: width,
        }
    }

    /// Smallest admissible gap.
    #[must_use]
    pub const fn min(&self) -> usize {
        self.min
    }

    /// Largest admissible gap.
    #[must_use]
    pub const fn max(&self) -> usize {
        self.max
    }

    /// Whether the range holds exactly one width.
    #[must_use]
    pub const fn is_fixed(&self) -> bool {
        self.min == self.max
    }
}

/// Inputs to [`plan_layout`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LayoutRequest {
    /// Width of one dataset image.
    pub digit_width: usize,
    /// Number of digits to place.
    pub digit_count: usize,
    /// Requested canvas width.
    pub total_width: usize,
    /// Admissible gap widths.
    pub spacing: SpacingRange,
    /// Gap selection policy.
    pub policy: SpacingPolicy,
}

/// Slot widths (one per digit) and gap widths (one fewer).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LayoutPlan {
    slots: Vec<usize>,
    gaps: Vec<usize>,
}

impl LayoutPlan {
    /// Width allotted to each digit, left to right.
    #[must_use]
    pub fn slots(&self) -> &[usize] {
        &self.slots
    }

    /// Blank width after each digit except the last.
    #[must_use]
    pub fn gaps(&self) -> &[usize] {
        &self.gaps
    }

    /// Sum of every slot and gap.
    #[must_use]
    pub fn total_width(&self) -> usize {
        self.slots.iter().sum::<usize>() + self.gaps.iter().sum::<usize>()
    }

    /// Splits the plan into `(slots, gaps)` cursors.
    #[must_use]
    pub fn into_cursors(self) -> (WidthCursor, WidthCursor) {
        (WidthCursor::new(self.slots), WidthCursor::new(self.gaps))
    }
}

/// Plans slot and gap widths for `request` under its spacing policy.
///
/// `rng` is only consulted by [`SpacingPolicy::Random`].
///
/// # Errors
/// Returns [`LayoutError::WidthTooSmall`] when an evenly spaced canvas cannot
/// hold the minimum spacing.
///
/// # Examples
/// ```
/// use digitstrip_core::{LayoutRequest, SpacingPolicy, SpacingRange, plan_layout};
/// use rand::SeedableRng;
///
/// let mut rng = rand::rngs::SmallRng::seed_from_u64(1);
/// let plan = plan_layout(
///     &LayoutRequest {
///         digit_width: 28,
///         digit_count: 10,
///         total_width: 316,
///         spacing: SpacingRange::new(3, 10),
///         policy: SpacingPolicy::Evenly,
///     },
///     &mut rng,
/// )
/// .expect("width is large enough");
/// assert_eq!(plan.slots(), &[28; 10]);
/// assert_eq!(plan.gaps(), &[4; 9]);
/// ```
pub fn plan_layout<R: Rng + ?Sized>(
    request: &LayoutRequest,
    rng: &mut R,
) -> Result<LayoutPlan, LayoutError> {
    let plan = match request.policy {
        SpacingPolicy::Random => plan_random(request, rng),
        SpacingPolicy::Evenly => plan_evenly(request)?,
    };
    debug!(
        policy = ?request.policy,
        slots = ?plan.slots,
        gaps = ?plan.gaps,
        "layout planned"
    );
    Ok(plan)
}

/// Native-width slots with gaps drawn uniformly from the spacing range.
pub fn plan_random<R: Rng + ?Sized>(request: &LayoutRequest, rng: &mut R) -> LayoutPlan {
    let gap_count = request.digit_count.saturating_sub(1);
    let SpacingRange { min, max } = request.spacing;
    LayoutPlan {
        slots: vec![request.digit_width; request.digit_count],
        gaps: (0..gap_count).map(|_| rng.gen_range(min..=max)).collect(),
    }
}

/// Slots and gaps whose widths sum exactly to `request.total_width`.
///
/// With a fixed spacing every gap takes that width and the slots share the
/// rest. Otherwise every slot takes one representative width (the native
/// width clamped between the slot widths implied by the smallest and largest
/// total spacing) and the gaps absorb the remainder.
///
/// # Errors
/// Returns [`LayoutError::WidthTooSmall`] when `total_width` is below the
/// minimum total spacing.
pub fn plan_evenly(request: &LayoutRequest) -> Result<LayoutPlan, LayoutError> {
    let count = request.digit_count;
    if count == 0 {
        return Ok(LayoutPlan::default());
    }
    let gap_count = count - 1;
    let SpacingRange { min, max } = request.spacing;
    let too_small = LayoutError::WidthTooSmall {
        total_width: request.total_width,
        gaps: gap_count,
        min_spacing: min,
    };
    let rest = gap_count
        .checked_mul(min)
        .and_then(|spacing| request.total_width.checked_sub(spacing))
        .ok_or(too_small)?;

    if min == max {
        let slots = distribute_remainder(count, rest / count, rest)?;
        return Ok(LayoutPlan {
            slots,
            gaps: vec![min; gap_count],
        });
    }

    let widest = rest / count;
    let narrowest = request
        .total_width
        .saturating_sub(gap_count.saturating_mul(max - 1))
        / count;
    let slot = request.digit_width.max(narrowest).min(widest);
    let leftover = request.total_width - slot * count;
    let gaps = distribute_remainder(
        gap_count,
        leftover.checked_div(gap_count).unwrap_or(0),
        leftover,
    )?;
    Ok(LayoutPlan {
        slots: vec![slot; count],
        gaps,
    })
}

#[cfg(test)]
mod tests;
