//! Unit and property tests for layout planning.

use super::*;

use digitstrip_test_support::property::case_count;
use proptest::prelude::*;
use proptest::test_runner::Config as ProptestConfig;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use rstest::rstest;

fn request(
    digit_count: usize,
    total_width: usize,
    spacing: SpacingRange,
    policy: SpacingPolicy,
) -> LayoutRequest {
    LayoutRequest {
        digit_width: 28,
        digit_count,
        total_width,
        spacing,
        policy,
    }
}

#[rstest]
#[case::tight(307, 3)]
#[case::roomy(316, 4)]
fn evenly_keeps_native_slots_and_widens_gaps(#[case] total_width: usize, #[case] gap: usize) {
    let plan = plan_evenly(&request(
        10,
        total_width,
        SpacingRange::new(3, 10),
        SpacingPolicy::Evenly,
    ))
    .expect("width is large enough");
    assert_eq!(plan.slots(), &[28; 10]);
    assert_eq!(plan.gaps(), vec![gap; 9].as_slice());
    assert_eq!(plan.total_width(), total_width);
}

#[test]
fn evenly_fixed_spacing_spreads_rest_over_slots() {
    let plan = plan_evenly(&request(4, 130, SpacingRange::fixed(2), SpacingPolicy::Evenly))
        .expect("width is large enough");
    assert_eq!(plan.gaps(), &[2, 2, 2]);
    assert_eq!(plan.slots().iter().sum::<usize>(), 124);
    assert!(plan.slots().iter().all(|w| *w == 31));
}

#[test]
fn evenly_fixed_spacing_with_remainder() {
    let plan = plan_evenly(&request(3, 100, SpacingRange::fixed(5), SpacingPolicy::Evenly))
        .expect("width is large enough");
    assert_eq!(plan.gaps(), &[5, 5]);
    assert_eq!(plan.slots(), &[30, 30, 30]);

    let plan = plan_evenly(&request(3, 101, SpacingRange::fixed(5), SpacingPolicy::Evenly))
        .expect("width is large enough");
    assert_eq!(plan.total_width(), 101);
    assert_eq!(plan.slots().iter().filter(|w| **w == 31).count(), 1);
}

#[test]
fn evenly_shrinks_slots_when_minimum_spacing_leaves_no_room() {
    let plan = plan_evenly(&request(5, 100, SpacingRange::new(10, 20), SpacingPolicy::Evenly))
        .expect("width is large enough");
    assert_eq!(plan.slots(), &[12; 5]);
    assert_eq!(plan.total_width(), 100);
    assert!(plan.gaps().iter().all(|g| (10..=20).contains(g)));
}

#[test]
fn evenly_grows_slots_when_maximum_spacing_leaves_slack() {
    let plan = plan_evenly(&request(3, 200, SpacingRange::new(0, 5), SpacingPolicy::Evenly))
        .expect("width is large enough");
    assert_eq!(plan.slots(), &[64; 3]);
    assert_eq!(plan.gaps(), &[4, 4]);
}

#[test]
fn single_digit_has_no_gaps() {
    for spacing in [SpacingRange::fixed(4), SpacingRange::new(1, 9)] {
        let plan = plan_evenly(&request(1, 40, spacing, SpacingPolicy::Evenly))
            .expect("width is large enough");
        assert_eq!(plan.slots(), &[40]);
        assert!(plan.gaps().is_empty());
    }
}

#[test]
fn zero_digits_plan_nothing() {
    let plan = plan_evenly(&request(0, 40, SpacingRange::fixed(0), SpacingPolicy::Evenly))
        .expect("empty plans are valid");
    assert_eq!(plan, LayoutPlan::default());
}

#[test]
fn evenly_rejects_width_below_minimum_spacing() {
    let err = plan_evenly(&request(4, 8, SpacingRange::new(3, 5), SpacingPolicy::Evenly))
        .expect_err("three gaps of 3 do not fit in 8");
    assert_eq!(
        err,
        LayoutError::WidthTooSmall {
            total_width: 8,
            gaps: 3,
            min_spacing: 3,
        }
    );
}

#[test]
fn random_keeps_native_slots() {
    let mut rng = SmallRng::seed_from_u64(3);
    let plan = plan_random(
        &request(6, 0, SpacingRange::new(2, 9), SpacingPolicy::Random),
        &mut rng,
    );
    assert_eq!(plan.slots(), &[28; 6]);
    assert_eq!(plan.gaps().len(), 5);
}

#[test]
fn random_is_reproducible_under_a_fixed_seed() {
    let layout = request(8, 0, SpacingRange::new(0, 50), SpacingPolicy::Random);
    let first =
        plan_layout(&layout, &mut SmallRng::seed_from_u64(11)).expect("random plans succeed");
    let second =
        plan_layout(&layout, &mut SmallRng::seed_from_u64(11)).expect("random plans succeed");
    assert_eq!(first, second);
}

#[test]
fn cursors_fall_back_after_exhaustion() {
    let plan = plan_evenly(&request(2, 60, SpacingRange::fixed(4), SpacingPolicy::Evenly))
        .expect("width is large enough");
    let (mut slots, mut gaps) = plan.into_cursors();
    assert_eq!(slots.next_or(28), 28);
    assert_eq!(slots.next_or(28), 28);
    assert_eq!(slots.next_or(28), 28);
    assert!(slots.is_exhausted());
    assert_eq!(gaps.next_width(), Some(4));
    assert_eq!(gaps.next_width(), None);
}

fn evenly_request() -> impl Strategy<Value = LayoutRequest> {
    (1_usize..40, 1_usize..60, 0_usize..20, 0_usize..20, 0_usize..2_000).prop_map(
        |(digit_count, digit_width, min, span, extra)| LayoutRequest {
            digit_width,
            digit_count,
            total_width: (digit_count - 1) * min + extra,
            spacing: SpacingRange::new(min, min + span),
            policy: SpacingPolicy::Evenly,
        },
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(case_count(256)))]

    #[test]
    fn evenly_widths_sum_to_requested_total(layout in evenly_request()) {
        let plan = plan_evenly(&layout).expect("total covers the minimum spacing");
        prop_assert_eq!(plan.total_width(), layout.total_width);
        prop_assert_eq!(plan.slots().len(), layout.digit_count);
        prop_assert_eq!(plan.gaps().len(), layout.digit_count - 1);
    }

    #[test]
    fn evenly_gaps_stay_within_spacing_range(layout in evenly_request()) {
        let plan = plan_evenly(&layout).expect("total covers the minimum spacing");
        let (min, max) = (layout.spacing.min(), layout.spacing.max());
        prop_assert!(plan.gaps().iter().all(|g| (min..=max).contains(g)));
    }

    #[test]
    fn random_gaps_stay_within_spacing_range(
        digit_count in 0_usize..60,
        min in 0_usize..30,
        span in 0_usize..30,
        seed in any::<u64>(),
    ) {
        let layout = LayoutRequest {
            digit_width: 28,
            digit_count,
            total_width: 0,
            spacing: SpacingRange::new(min, min + span),
            policy: SpacingPolicy::Random,
        };
        let plan = plan_layout(&layout, &mut SmallRng::seed_from_u64(seed))
            .expect("random plans succeed");
        prop_assert_eq!(plan.gaps().len(), digit_count.saturating_sub(1));
        prop_assert!(plan.gaps().iter().all(|g| (min..=min + span).contains(g)));
        prop_assert!(plan.slots().iter().all(|w| *w == 28));
    }
}
