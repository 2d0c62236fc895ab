//! Unit tests for pixel transforms.

use super::*;

use rand::SeedableRng;
use rand::rngs::SmallRng;
use rstest::rstest;

fn ramp(width: usize, height: usize) -> Canvas {
    let cells = width * height;
    let data = (0..cells).map(|v| v as f32 / cells as f32).collect();
    Grid::from_vec(width, height, data).expect("ramp shape is valid")
}

#[test]
fn invert_maps_ink_to_high_values() {
    let image = Grid::from_vec(3, 1, vec![0_u8, 55, 255]).expect("shape is valid");
    let inverted = invert(&image, 255);
    assert_eq!(inverted.as_slice(), &[255, 200, 0]);
}

#[test]
fn normalize_scales_to_unit_interval() {
    let image = Grid::from_vec(3, 1, vec![0_u8, 51, 255]).expect("shape is valid");
    let normalized = normalize(&image, 255);
    assert_eq!(normalized.as_slice(), &[0.0, 0.2, 1.0]);
}

#[test]
fn normalize_with_zero_max_yields_zeros() {
    let image = Grid::filled(2, 2, 7_u8);
    assert!(normalize(&image, 0).as_slice().iter().all(|v| *v == 0.0));
}

#[rstest]
#[case::shrink(28, 20)]
#[case::grow(28, 40)]
#[case::same(28, 28)]
#[case::to_one(5, 1)]
fn resize_width_changes_only_columns(#[case] from: usize, #[case] to: usize) {
    let image = ramp(from, 3);
    let resized = resize_width(&image, to);
    assert_eq!(resized.width(), to);
    assert_eq!(resized.height(), 3);
}

#[test]
fn resize_width_keeps_values_within_source_range() {
    let image = ramp(10, 1);
    let resized = resize_width(&image, 23);
    assert!(resized.as_slice().iter().all(|v| (0.0..=0.9 + 1e-6).contains(v)));
    let row = resized.row(0).expect("row exists");
    assert!(row.windows(2).all(|pair| pair[0] <= pair[1]));
}

#[test]
fn resize_width_to_zero_is_empty() {
    let resized = resize_width(&ramp(4, 2), 0);
    assert_eq!(resized.width(), 0);
    assert!(resized.as_slice().is_empty());
}

#[test]
fn blur_preserves_constant_images() {
    let image = Grid::filled(6, 5, 0.75_f32);
    let blurred = Blur { sigma: 1.0 }.apply(image);
    assert!(blurred.as_slice().iter().all(|v| (v - 0.75).abs() < 1e-4));
}

#[test]
fn blur_spreads_a_single_point() {
    let mut image = Grid::filled(9, 9, 0.0_f32);
    if let Some(row) = image.row_mut(4) {
        row[4] = 1.0;
    }
    let blurred = Blur { sigma: 1.0 }.apply(image);
    let centre = blurred.get(4, 4).expect("centre exists");
    let neighbour = blurred.get(5, 4).expect("neighbour exists");
    assert!(centre < 1.0);
    assert!(neighbour > 0.0);
    let total: f32 = blurred.as_slice().iter().sum();
    assert!((total - 1.0).abs() < 1e-3);
}

#[test]
fn blur_with_zero_sigma_is_identity() {
    let image = ramp(5, 4);
    let blurred = Blur { sigma: 0.0 }.apply(image.clone());
    assert_eq!(blurred, image);
}

#[test]
fn resize_shrinks_a_step_edge_smoothly() {
    let mut data = vec![0.0_f32; 8];
    data.iter_mut().skip(4).for_each(|v| *v = 1.0);
    let image = Grid::from_vec(8, 1, data).expect("shape is valid");
    let resized = resize_width(&image, 4);
    let row = resized.row(0).expect("row exists");
    assert!(row.first().is_some_and(|v| *v < 0.5));
    assert!(row.last().is_some_and(|v| *v > 0.5));
    assert!(row.windows(2).all(|pair| pair[0] <= pair[1]));
}

#[test]
fn distort_rolls_rows_without_losing_pixels() {
    let image = ramp(8, 28);
    let mut distort = Distort {
        alpha: 18,
        rng: SmallRng::seed_from_u64(7),
    };
    let distorted = distort.apply(image.clone());
    for y in 0..image.height() {
        let mut original = image.row(y).expect("row exists").to_vec();
        let mut shifted = distorted.row(y).expect("row exists").to_vec();
        original.sort_by(f32::total_cmp);
        shifted.sort_by(f32::total_cmp);
        assert_eq!(original, shifted);
    }
}

#[test]
fn closures_are_transforms() {
    let mut double = |image: Canvas| image.map(|v| v * 2.0);
    let result = double.apply(Grid::filled(1, 1, 0.25));
    assert_eq!(result.as_slice(), &[0.5]);
}
