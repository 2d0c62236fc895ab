//! End-to-end composition over a synthetic dataset on disk.

use digitstrip_core::{
    Blur, ComposeError, DigitStore, GenerationRequest, SequenceComposer, SpacingPolicy,
};
use digitstrip_test_support::fixtures::SyntheticDataset;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use rstest::{fixture, rstest};
use tempfile::TempDir;

struct Workspace {
    _dir: TempDir,
    store: DigitStore,
}

#[fixture]
fn workspace() -> Workspace {
    let dir = tempfile::tempdir().expect("tempdir");
    SyntheticDataset::new(50)
        .write_to(dir.path())
        .expect("write dataset");
    let store = DigitStore::open_local(dir.path()).expect("dataset is valid");
    Workspace { _dir: dir, store }
}

#[rstest]
#[case::tight(307, 3)]
#[case::roomy(316, 4)]
fn evenly_sequence_places_digits_and_gaps(
    workspace: Workspace,
    #[case] width: i64,
    #[case] gap: usize,
) {
    let mut composer = SequenceComposer::new(workspace.store, SmallRng::seed_from_u64(9));
    let canvas = composer
        .compose(&GenerationRequest {
            digits: (0..10).collect(),
            spacing: Some((3, 10)),
            image_width: Some(width),
            policy: SpacingPolicy::Evenly,
        })
        .expect("request is valid");

    assert_eq!(canvas.width() as i64, width);
    assert_eq!(canvas.height(), 28);
    // Column 0 of each slot carries the digit's only ink pixel in row 0.
    let row = canvas.row(0).expect("row exists");
    for digit in 0..10_usize {
        let start = digit * (28 + gap);
        let expected = 1.0 - digit as f32 / 255.0;
        assert!((row[start] - expected).abs() < 1e-6, "digit {digit}");
    }
}

#[rstest]
fn random_sequence_with_blur_matches_requested_width(workspace: Workspace) {
    let mut composer = SequenceComposer::new(workspace.store, SmallRng::seed_from_u64(9))
        .with_transform(Blur { sigma: 1.0 });
    let canvas = composer
        .compose(&GenerationRequest {
            digits: vec![2, 0, 2, 6],
            spacing: Some((0, 15)),
            image_width: Some(180),
            policy: SpacingPolicy::Random,
        })
        .expect("request is valid");
    assert_eq!(canvas.width(), 180);
    assert!(canvas.as_slice().iter().all(|v| (0.0..=1.0 + 1e-5).contains(v)));
}

#[rstest]
fn closed_store_fails_composition(workspace: Workspace) {
    let mut store = workspace.store;
    store.close();
    let mut composer = SequenceComposer::new(store, SmallRng::seed_from_u64(9));
    let err = composer
        .compose(&GenerationRequest {
            digits: vec![1],
            ..GenerationRequest::default()
        })
        .expect_err("store is closed");
    assert!(matches!(err, ComposeError::Dataset(_)));
}
