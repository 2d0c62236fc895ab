//! Defaulting and validation of generation parameters.

use crate::error::ComposeError;
use crate::layout::{SpacingPolicy, SpacingRange};

/// Narrowest digit slot, in pixels, that keeps a digit legible.
pub const MIN_DIGIT_WIDTH: usize = 10;

/// Caller-facing parameters of one generation.
///
/// Spacing and width are signed and optional so that every invalid
/// combination can be reported instead of being unrepresentable.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GenerationRequest {
    /// Digits to draw, left to right. Values above 9 are taken modulo 10.
    pub digits: Vec<u8>,
    /// Gap range `(min, max)`. `None` or `(0, 0)` means no gaps.
    pub spacing: Option<(i64, i64)>,
    /// Canvas width. `None` or `0` derives it from the digit count.
    pub image_width: Option<i64>,
    /// Gap selection policy.
    pub policy: SpacingPolicy,
}

/// Parameters that passed validation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GenerationParams {
    /// Digits in `0..=9`.
    pub digits: Vec<u8>,
    /// Ordered, non-negative gap range.
    pub spacing: SpacingRange,
    /// Positive canvas width.
    pub image_width: usize,
    /// Gap selection policy.
    pub policy: SpacingPolicy,
}

impl GenerationRequest {
    /// Fills in defaults and checks every constraint for images of
    /// `digit_width` columns.
    ///
    /// # Errors
    /// Returns [`ComposeError::Configuration`] listing every violation when
    /// any constraint fails.
    ///
    /// # Examples
    /// ```
    /// use digitstrip_core::{ComposeError, GenerationRequest};
    ///
    /// let request = GenerationRequest {
    ///     digits: vec![1, 2, 3],
    ///     spacing: Some((5, 0)),
    ///     image_width: Some(20),
    ///     ..GenerationRequest::default()
    /// };
    /// let Err(ComposeError::Configuration { violations }) = request.validate(28) else {
    ///     panic!("request is invalid");
    /// };
    /// assert_eq!(violations.len(), 2);
    /// ```
    pub fn validate(&self, digit_width: usize) -> Result<GenerationParams, ComposeError> {
        let count = i64::try_from(self.digits.len()).unwrap_or(i64::MAX);
        let native = i64::try_from(digit_width).unwrap_or(i64::MAX);
        let (first, second) = match self.spacing {
            None | Some((0, 0)) => (0, 0),
            Some(range) => range,
        };
        let width = match self.image_width {
            None | Some(0) => count
                .saturating_mul(native)
                .saturating_add(count.saturating_sub(1).saturating_mul(first)),
            Some(width) => width,
        };

        let mut violations = Vec::new();
        if count == 0 {
            violations.push("nothing to generate: the digit sequence is empty".to_owned());
        }
        let (min, max) = if first > second {
            violations.push(format!(
                "spacing range ({first}, {second}) is out of order: \
                 minimum {first} exceeds maximum {second}"
            ));
            (second, first)
        } else {
            (first, second)
        };
        if min < 0 {
            violations.push(format!("spacing range ({first}, {second}) has negative values"));
        }
        if count > 0 {
            if width <= 0 {
                violations.push(format!("image width {width} must be positive"));
            } else {
                let spacing = count.saturating_sub(1).saturating_mul(min);
                let per_digit = width.saturating_sub(spacing) / count;
                if !usize::try_from(per_digit).is_ok_and(|pixels| pixels >= MIN_DIGIT_WIDTH) {
                    violations.push(format!(
                        "image width {width} with spacing range ({first}, {second}) leaves \
                         {per_digit} pixels per digit, below the minimum of {MIN_DIGIT_WIDTH}"
                    ));
                }
            }
        }

        let (Some(min), Some(max), Some(image_width)) = (
            usize::try_from(min).ok(),
            usize::try_from(max).ok(),
            usize::try_from(width).ok(),
        ) else {
            return Err(ComposeError::Configuration { violations });
        };
        if !violations.is_empty() {
            return Err(ComposeError::Configuration { violations });
        }
        Ok(GenerationParams {
            digits: self.digits.iter().map(|digit| digit % 10).collect(),
            spacing: SpacingRange::new(min, max),
            image_width,
            policy: self.policy,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn request(
        digits: usize,
        spacing: Option<(i64, i64)>,
        image_width: Option<i64>,
    ) -> GenerationRequest {
        GenerationRequest {
            digits: (0..digits).map(|d| (d % 10) as u8).collect(),
            spacing,
            image_width,
            policy: SpacingPolicy::Random,
        }
    }

    fn violations(request: &GenerationRequest) -> Vec<String> {
        match request.validate(28) {
            Err(ComposeError::Configuration { violations }) => violations,
            other => panic!("expected a configuration error, got {other:?}"),
        }
    }

    #[rstest]
    #[case::no_spacing(None, 3 * 28)]
    #[case::zero_spacing(Some((0, 0)), 3 * 28)]
    #[case::fixed_spacing(Some((4, 4)), 3 * 28 + 2 * 4)]
    #[case::range_uses_minimum(Some((2, 9)), 3 * 28 + 2 * 2)]
    fn width_defaults_from_digits_and_minimum_spacing(
        #[case] spacing: Option<(i64, i64)>,
        #[case] expected: usize,
    ) {
        let params = request(3, spacing, None).validate(28).expect("request is valid");
        assert_eq!(params.image_width, expected);
        let params = request(3, spacing, Some(0)).validate(28).expect("request is valid");
        assert_eq!(params.image_width, expected);
    }

    #[test]
    fn digits_are_reduced_modulo_ten() {
        let params = GenerationRequest {
            digits: vec![13, 9, 250],
            ..GenerationRequest::default()
        }
        .validate(28)
        .expect("request is valid");
        assert_eq!(params.digits, vec![3, 9, 0]);
    }

    #[test]
    fn empty_sequence_has_nothing_to_generate() {
        let found = violations(&request(0, None, None));
        assert_eq!(found.len(), 1);
        assert!(found[0].contains("nothing to generate"));
    }

    #[test]
    fn inverted_range_and_narrow_digits_are_both_reported() {
        let found = violations(&request(3, Some((5, 0)), Some(20)));
        assert_eq!(found.len(), 2);
        assert!(found[0].contains("out of order"));
        assert!(found[1].contains("below the minimum of 10"));
    }

    #[test]
    fn inverted_range_alone_is_still_a_violation() {
        let found = violations(&request(2, Some((9, 3)), Some(200)));
        assert_eq!(found.len(), 1);
        assert!(found[0].contains("out of order"));
    }

    #[rstest]
    #[case::negative_minimum(Some((-2, 4)))]
    #[case::both_negative(Some((-3, -1)))]
    fn negative_spacing_is_rejected(#[case] spacing: Option<(i64, i64)>) {
        let found = violations(&request(2, spacing, Some(100)));
        assert!(found.iter().any(|v| v.contains("negative values")));
    }

    #[rstest]
    #[case::negative(-5)]
    #[case::minus_one(-1)]
    fn non_positive_width_is_rejected(#[case] width: i64) {
        let found = violations(&request(2, None, Some(width)));
        assert_eq!(found, vec![format!("image width {width} must be positive")]);
    }

    #[test]
    fn minimum_digit_width_is_inclusive() {
        let params = request(3, Some((5, 5)), Some(40)).validate(28).expect("10 pixels suffice");
        assert_eq!(params.image_width, 40);
        let found = violations(&request(3, Some((5, 5)), Some(39)));
        assert!(found[0].contains("leaves 9 pixels per digit"));
    }

    #[test]
    fn spacing_wider_than_the_image_leaves_negative_room() {
        let found = violations(&request(3, Some((10, 10)), Some(5)));
        assert_eq!(found.len(), 1);
        assert!(found[0].contains("leaves -5 pixels per digit"));
    }
}
