//! Spreading a width budget across slots whose sizes differ by at most one.

use crate::error::LayoutError;

/// Splits `total` into `count` values of `base` or `base + 1`.
///
/// The `total - count * base` surplus pixels are spread along the sequence
/// with an error-diffusion decision per slot, so the wider values are
/// interleaved rather than bunched at one end. A running budget tracks what
/// is still owed and is reduced by every emitted value.
///
/// # Errors
/// Returns [`LayoutError::Undistributable`] unless
/// `count * base <= total <= count * (base + 1)`.
///
/// # Examples
/// ```
/// use digitstrip_core::distribute_remainder;
///
/// let widths = distribute_remainder(4, 2, 10).expect("10 fits four slots of 2 or 3");
/// assert_eq!(widths, vec![2, 3, 2, 3]);
/// ```
pub fn distribute_remainder(
    count: usize,
    base: usize,
    total: usize,
) -> Result<Vec<usize>, LayoutError> {
    let undistributable = LayoutError::Undistributable { count, base, total };
    let floor = count.checked_mul(base).ok_or_else(|| undistributable.clone())?;
    let surplus = total.checked_sub(floor).ok_or_else(|| undistributable.clone())?;
    if surplus > count {
        return Err(undistributable);
    }

    let mut budget = total;
    let mut error = 0_usize;
    let mut values = Vec::with_capacity(count);
    for remaining in (1..=count).rev() {
        let owed = budget - remaining * base;
        error += surplus;
        let value = if owed >= remaining || (owed > 0 && error >= count) {
            error = error.saturating_sub(count);
            base + 1
        } else {
            base
        };
        budget -= value;
        values.push(value);
    }
    debug_assert_eq!(budget, 0, "distribution must consume the whole budget");
    Ok(values)
}
