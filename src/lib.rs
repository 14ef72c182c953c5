//! Per-voxel semantic classification of 3-D volumes with a stack of 3-D convolutions.
//!
//! A [`VolumeClassifier`](classifier::VolumeClassifier) is built from a
//! [`VolumeClassifierConfig`](classifier::VolumeClassifierConfig), trained one minibatch at a time
//! with `fit` and measured with `evaluate`.

pub mod classifier;
pub mod error;
pub mod schedule;
pub mod utils;
pub mod volume;

pub mod prelude {
    pub use crate::classifier::*;
    pub use crate::error::{ClassifierError, ConfigError};
    pub use crate::schedule::{LayerSchedule, Transition};
    pub use crate::volume::{one_hot_voxels, uniform_labels};
}
