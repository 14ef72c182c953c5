use thiserror::Error;

/// Rejected [`VolumeClassifierConfig`](crate::classifier::VolumeClassifierConfig) values.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{0} must be positive")]
    ZeroDimension(&'static str),
    #[error("{kind} layer {index} has zero width")]
    ZeroLayerWidth { kind: &'static str, index: usize },
    #[error("dropout keep probability must be in (0, 1], got {0}")]
    KeepProbability(f64),
    #[error("learning rate must be positive and finite, got {0}")]
    LearningRate(f64),
    #[error("l2 coefficient must be non-negative and finite, got {0}")]
    L2Coefficient(f64),
    #[error("weight stddev must be positive and finite, got {0}")]
    WeightStddev(f64),
}

/// Rejected [`LayerSchedule`](crate::schedule::LayerSchedule) lists.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleError {
    #[error("schedule has {channels} channel entries but {kernels} kernel entries")]
    LengthMismatch { channels: usize, kernels: usize },
    #[error("schedule needs an input and an output entry, got {0} entries")]
    TooShort(usize),
    #[error("schedule entry {0} has zero channels")]
    ZeroChannels(usize),
    #[error("schedule entry {index} has kernel edge {kernel}, expected an odd edge")]
    EvenKernel { index: usize, kernel: usize },
}

#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("volume tensor has shape {actual:?}, expected {expected:?}")]
    VolumeShape {
        expected: [usize; 5],
        actual: [usize; 5],
    },
    #[error("label tensor has shape {actual:?}, expected {expected:?}")]
    LabelShape {
        expected: [usize; 5],
        actual: [usize; 5],
    },
    #[error("class {class} is out of range for {num_classes} classes")]
    ClassOutOfRange { class: usize, num_classes: usize },
}
