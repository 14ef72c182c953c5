use crate::error::ConfigError;
use crate::schedule::LayerSchedule;
use burn::prelude::*;

/// Hyperparameters of a [`VolumeClassifier`](super::VolumeClassifier).
///
/// Every field has a default, so `VolumeClassifierConfig::new()` is a valid configuration.
#[derive(Config, Debug)]
pub struct VolumeClassifierConfig {
    /// Volume depth (`D`).
    #[config(default = 16)]
    pub depth: usize,
    /// Volume height (`H`).
    #[config(default = 256)]
    pub height: usize,
    /// Volume width (`W`).
    #[config(default = 256)]
    pub width: usize,
    /// Input channels per voxel (`C`).
    #[config(default = 1)]
    pub channels: usize,

    #[config(default = 10)]
    pub minibatch_size: usize,
    #[config(default = 2)]
    pub num_classes: usize,

    /// Widths of the 3×3×3 convolution layers.
    #[config(default = "vec![100, 100, 100]")]
    pub conv_layers: Vec<usize>,
    /// Widths of the per-voxel layers, implemented as 1×1×1 convolutions.
    #[config(default = "vec![50, 50]")]
    pub fc_layers: Vec<usize>,

    #[config(default = 1e-4)]
    pub learning_rate: f64,
    #[config(default = 1e-6)]
    pub l2_reg: f64,
    /// Dropout keep probability.
    #[config(default = 0.9)]
    pub dropout: f64,

    /// Adds `2 * l2_reg * Σ weight²` to the optimized loss.
    ///
    /// When unset, the penalty is only tracked and the loss is the plain cross-entropy.
    #[config(default = false)]
    pub regularize: bool,
    /// Keeps dropout active during [`evaluate`](super::VolumeClassifier::evaluate).
    #[config(default = false)]
    pub evaluate_with_dropout: bool,

    /// Standard deviation of the truncated-normal weight initialization.
    #[config(default = 0.1)]
    pub weight_stddev: f64,
    /// Constant bias initialization.
    #[config(default = 0.1)]
    pub bias_init: f64,
    /// Adam epsilon.
    #[config(default = 1e-8)]
    pub epsilon: f32,
    /// Seeds the backend random generator at construction.
    #[config(default = "None")]
    pub seed: Option<u64>,
}

impl VolumeClassifierConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let dims = [
            ("depth", self.depth),
            ("height", self.height),
            ("width", self.width),
            ("channels", self.channels),
            ("minibatch_size", self.minibatch_size),
            ("num_classes", self.num_classes),
        ];
        if let Some((name, _)) = dims.iter().find(|(_, v)| *v == 0) {
            return Err(ConfigError::ZeroDimension(*name));
        }

        for (kind, layers) in [("conv", &self.conv_layers), ("fc", &self.fc_layers)] {
            if let Some(index) = layers.iter().position(|w| *w == 0) {
                return Err(ConfigError::ZeroLayerWidth { kind, index });
            }
        }

        if !(self.dropout > 0.0 && self.dropout <= 1.0) {
            return Err(ConfigError::KeepProbability(self.dropout));
        }
        if !(self.learning_rate.is_finite() && self.learning_rate > 0.0) {
            return Err(ConfigError::LearningRate(self.learning_rate));
        }
        if !(self.l2_reg.is_finite() && self.l2_reg >= 0.0) {
            return Err(ConfigError::L2Coefficient(self.l2_reg));
        }
        if !(self.weight_stddev.is_finite() && self.weight_stddev > 0.0) {
            return Err(ConfigError::WeightStddev(self.weight_stddev));
        }
        Ok(())
    }

    pub fn schedule(&self) -> LayerSchedule {
        LayerSchedule::new(
            self.channels,
            &self.conv_layers,
            &self.fc_layers,
            self.num_classes,
        )
    }

    /// Number of voxels in one volume.
    pub fn voxels(&self) -> usize {
        self.depth * self.height * self.width
    }

    /// `[minibatch_size, depth, height, width, channels]`
    pub fn volume_shape(&self) -> [usize; 5] {
        [
            self.minibatch_size,
            self.depth,
            self.height,
            self.width,
            self.channels,
        ]
    }

    /// `[minibatch_size, depth, height, width, num_classes]`
    pub fn label_shape(&self) -> [usize; 5] {
        [
            self.minibatch_size,
            self.depth,
            self.height,
            self.width,
            self.num_classes,
        ]
    }

    /// `[minibatch_size * depth * height * width, num_classes]`
    pub fn flat_logits_shape(&self) -> [usize; 2] {
        [self.minibatch_size * self.voxels(), self.num_classes]
    }

    /// Keep probability used by [`evaluate`](super::VolumeClassifier::evaluate).
    pub fn evaluate_keep_prob(&self) -> f64 {
        if self.evaluate_with_dropout {
            self.dropout
        } else {
            1.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = VolumeClassifierConfig::new();
        assert_eq!(config.volume_shape(), [10, 16, 256, 256, 1]);
        assert_eq!(config.label_shape(), [10, 16, 256, 256, 2]);
        assert_eq!(config.conv_layers, vec![100, 100, 100]);
        assert_eq!(config.fc_layers, vec![50, 50]);
        assert_eq!(config.learning_rate, 1e-4);
        assert_eq!(config.l2_reg, 1e-6);
        assert_eq!(config.dropout, 0.9);
        assert!(!config.regularize);
        assert_eq!(config.seed, None);
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn builders_override_only_named_fields() {
        let config = VolumeClassifierConfig::new()
            .with_num_classes(10)
            .with_minibatch_size(1)
            .with_height(32)
            .with_width(32);
        assert_eq!(config.volume_shape(), [1, 16, 32, 32, 1]);
        assert_eq!(config.flat_logits_shape(), [16 * 32 * 32, 10]);
        assert_eq!(config.dropout, 0.9);
    }

    #[test]
    fn rejects_invalid_values() {
        let config = VolumeClassifierConfig::new();
        assert_eq!(
            config.clone().with_depth(0).validate(),
            Err(ConfigError::ZeroDimension("depth"))
        );
        assert_eq!(
            config.clone().with_num_classes(0).validate(),
            Err(ConfigError::ZeroDimension("num_classes"))
        );
        assert_eq!(
            config.clone().with_fc_layers(vec![4, 0]).validate(),
            Err(ConfigError::ZeroLayerWidth {
                kind: "fc",
                index: 1
            })
        );
        assert_eq!(
            config.clone().with_dropout(0.0).validate(),
            Err(ConfigError::KeepProbability(0.0))
        );
        assert_eq!(
            config.clone().with_dropout(1.5).validate(),
            Err(ConfigError::KeepProbability(1.5))
        );
        assert!(matches!(
            config.clone().with_learning_rate(f64::NAN).validate(),
            Err(ConfigError::LearningRate(_))
        ));
        assert_eq!(
            config.clone().with_l2_reg(-1.0).validate(),
            Err(ConfigError::L2Coefficient(-1.0))
        );
        assert_eq!(
            config.with_weight_stddev(0.0).validate(),
            Err(ConfigError::WeightStddev(0.0))
        );
    }

    #[test]
    fn evaluate_keep_prob_follows_flag() {
        let config = VolumeClassifierConfig::new().with_dropout(0.5);
        assert_eq!(config.evaluate_keep_prob(), 1.0);
        assert_eq!(
            config.with_evaluate_with_dropout(true).evaluate_keep_prob(),
            0.5
        );
    }

    #[test]
    fn json_round_trip() {
        let dir = temp_dir::TempDir::new().unwrap();
        let path = dir.path().join("classifier.json");
        let config = VolumeClassifierConfig::new()
            .with_conv_layers(vec![8, 8])
            .with_fc_layers(vec![])
            .with_seed(Some(7));
        config.save(&path).unwrap();

        let loaded = VolumeClassifierConfig::load(&path).unwrap();
        assert_eq!(loaded.conv_layers, vec![8, 8]);
        assert!(loaded.fc_layers.is_empty());
        assert_eq!(loaded.seed, Some(7));
        assert_eq!(loaded.volume_shape(), config.volume_shape());
    }
}
