//! One-value-per-digit consumption of a precomputed width sequence.

/// Hands out the widths of a [`super::LayoutPlan`] one at a time.
///
/// Exhaustion is explicit: [`Self::next_width`] returns `None` and
/// [`Self::is_exhausted`] reports `true` once every value has been taken.
///
/// # Examples
/// ```
/// use digitstrip_core::WidthCursor;
///
/// let mut cursor = WidthCursor::new(vec![3, 4]);
/// assert_eq!(cursor.next_or(28), 3);
/// assert_eq!(cursor.next_or(28), 4);
/// assert!(cursor.is_exhausted());
/// assert_eq!(cursor.next_or(28), 28);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WidthCursor {
    values: Vec<usize>,
    position: usize,
}

impl WidthCursor {
    /// Creates a cursor positioned at the first value.
    #[must_use]
    pub fn new(values: Vec<usize>) -> Self {
        Self {
            values,
            position: 0,
        }
    }

    /// Takes the next width, or `None` once the sequence is exhausted.
    pub fn next_width(&mut self) -> Option<usize> {
        let value = self.values.get(self.position).copied()?;
        self.position += 1;
        Some(value)
    }

    /// Takes the next width, returning `fallback` once exhausted.
    pub fn next_or(&mut self, fallback: usize) -> usize {
        self.next_width().unwrap_or(fallback)
    }

    /// Whether every value has been handed out.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.position >= self.values.len()
    }

    /// Number of values not yet handed out.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.values.len().saturating_sub(self.position)
    }
}
