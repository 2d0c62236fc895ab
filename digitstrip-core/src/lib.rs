//! Digitstrip core library.
//!
//! Composes images of handwritten digit sequences from the MNIST training
//! set: fetching and caching the dataset, indexed random access by digit,
//! slot and gap layout, and canvas assembly.
#![cfg_attr(docsrs, feature(doc_cfg))]

mod compose;
mod config;
mod dataset;
mod error;
mod fetch;
mod grid;
mod layout;
mod transform;

pub use crate::{
    compose::{GenerationParams, GenerationRequest, MIN_DIGIT_WIDTH, SequenceComposer},
    config::{DATA_DIR_ENV, DEFAULT_BASE_URL, DEFAULT_TIMEOUT, DatasetConfig, default_cache_dir},
    dataset::{
        DIGIT_CLASSES, DigitSource, DigitStore, IMAGES_FILE, IMAGES_MAGIC, ImageShape, ImageStore,
        LABELS_FILE, LABELS_MAGIC, LabelIndex, LabelStore, MAX_INTENSITY,
    },
    error::{
        ComposeError, ComposeErrorCode, DatasetError, DatasetErrorCode, FetchError, FetchErrorCode,
        LayoutError, LayoutErrorCode,
    },
    fetch::{
        ARCHIVE_SUFFIX, FetchProgress, Fetcher, HttpSource, NoProgress, RemoteSource, RemoteStream,
    },
    grid::{Canvas, DigitImage, Grid, ShapeError},
    layout::{
        LayoutPlan, LayoutRequest, SpacingPolicy, SpacingRange, WidthCursor, distribute_remainder,
        plan_evenly, plan_layout, plan_random,
    },
    transform::{Blur, Distort, Transform, invert, normalize, resize_width},
};
