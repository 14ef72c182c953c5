use crate::classifier::{VolumeClassifierConfig, VoxelNetwork, VoxelNetworkConfig};
use crate::error::ClassifierError;
use crate::schedule::LayerSchedule;
use crate::utils::flatten_voxels;
use crate::utils::loss::SoftmaxCrossEntropyLoss;
use crate::utils::metrics::voxel_accuracy;
use burn::module::AutodiffModule;
use burn::optim::{Adam, AdamConfig, GradientsParams, Optimizer, adaptor::OptimizerAdaptor};
use burn::prelude::*;
use burn::tensor::ElementConversion;
use burn::tensor::backend::AutodiffBackend;

/// Loss and accuracy of a minibatch, measured after the update of a [`VolumeClassifier::fit`] step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitOutput {
    pub loss: f32,
    pub accuracy: f32,
}

/// Per-voxel classifier over `[minibatch, depth, height, width, channels]` volumes.
///
/// Owns its configuration, device, weights and optimizer state. Training takes `&mut self`,
/// so concurrent training of one instance must be serialized by the caller.
pub struct VolumeClassifier<B: AutodiffBackend> {
    config: VolumeClassifierConfig,
    schedule: LayerSchedule,
    device: B::Device,
    network: VoxelNetwork<B>,
    optim: OptimizerAdaptor<Adam, VoxelNetwork<B>, B>,
    loss: SoftmaxCrossEntropyLoss,
    steps: usize,
}

impl VolumeClassifierConfig {
    /// Returns the initialized classifier.
    pub fn init<B: AutodiffBackend>(
        &self,
        device: &B::Device,
    ) -> Result<VolumeClassifier<B>, ClassifierError> {
        VolumeClassifier::new(self.clone(), device)
    }
}

impl<B: AutodiffBackend> VolumeClassifier<B> {
    /// Fails with [`ClassifierError::Config`] if the configuration does not validate.
    pub fn new(config: VolumeClassifierConfig, device: &B::Device) -> Result<Self, ClassifierError> {
        config.validate()?;
        if let Some(seed) = config.seed {
            B::seed(seed);
        }

        let schedule = config.schedule();
        log::info!("volume shape: {:?}", config.volume_shape());
        log::info!("label shape: {:?}", config.label_shape());

        let network = VoxelNetworkConfig::new(schedule.clone())
            .with_weight_stddev(config.weight_stddev)
            .with_bias_init(config.bias_init)
            .init(device);
        log::info!("flattened logits shape: {:?}", config.flat_logits_shape());

        let optim = AdamConfig::new()
            .with_epsilon(config.epsilon)
            .init::<B, VoxelNetwork<B>>();

        Ok(Self {
            config,
            schedule,
            device: device.clone(),
            network,
            optim,
            loss: SoftmaxCrossEntropyLoss::new(),
            steps: 0,
        })
    }

    /// Runs one optimizer step on the minibatch, then measures loss and accuracy with the updated weights.
    ///
    /// Dropout is active in both passes.
    ///
    /// # Shapes
    ///   - x [minibatch_size, depth, height, width, channels]
    ///   - y [minibatch_size, depth, height, width, num_classes]
    pub fn fit(&mut self, x: Tensor<B, 5>, y: Tensor<B, 5>) -> Result<FitOutput, ClassifierError> {
        self.check_shapes(x.dims(), y.dims())?;
        let keep_prob = self.config.dropout;

        let logits = self.network.forward_flat(x.clone(), keep_prob);
        let targets = flatten_voxels(y.clone());
        let mut loss = self.loss.forward(logits, targets);
        if self.config.regularize {
            loss = loss + self.network.l2_penalty(self.config.l2_reg);
        }

        let grads = GradientsParams::from_grads(loss.backward(), &self.network);
        self.network = self
            .optim
            .step(self.config.learning_rate, self.network.clone(), grads);
        self.steps += 1;

        let output = self.measure(x.inner(), y.inner(), keep_prob);
        log::debug!(
            "step {}: loss = {:.6}, accuracy = {:.4}",
            self.steps,
            output.loss,
            output.accuracy
        );
        Ok(output)
    }

    /// Accuracy on the minibatch, without updating any weight.
    ///
    /// Dropout only applies if [`VolumeClassifierConfig::evaluate_with_dropout`] is set.
    pub fn evaluate(&self, x: Tensor<B, 5>, y: Tensor<B, 5>) -> Result<f32, ClassifierError> {
        self.check_shapes(x.dims(), y.dims())?;
        let network = self.network.valid();
        let logits = network.forward_flat(x.inner(), self.config.evaluate_keep_prob());
        Ok(voxel_accuracy(logits, flatten_voxels(y.inner())))
    }

    /// Current `2 * l2_reg * Σ weight²`, whether or not it takes part in the optimized loss.
    pub fn l2_penalty(&self) -> f32 {
        self.network
            .valid()
            .l2_penalty(self.config.l2_reg)
            .into_scalar()
            .elem::<f32>()
    }

    pub fn config(&self) -> &VolumeClassifierConfig {
        &self.config
    }

    pub fn schedule(&self) -> &LayerSchedule {
        &self.schedule
    }

    pub fn network(&self) -> &VoxelNetwork<B> {
        &self.network
    }

    pub fn device(&self) -> &B::Device {
        &self.device
    }

    /// Number of completed [`Self::fit`] steps.
    pub fn steps(&self) -> usize {
        self.steps
    }

    fn measure(
        &self,
        x: Tensor<B::InnerBackend, 5>,
        y: Tensor<B::InnerBackend, 5>,
        keep_prob: f64,
    ) -> FitOutput {
        let network = self.network.valid();
        let logits = network.forward_flat(x, keep_prob);
        let targets = flatten_voxels(y);

        let mut loss = self.loss.forward(logits.clone(), targets.clone());
        if self.config.regularize {
            loss = loss + network.l2_penalty(self.config.l2_reg);
        }

        FitOutput {
            loss: loss.into_scalar().elem::<f32>(),
            accuracy: voxel_accuracy(logits, targets),
        }
    }

    fn check_shapes(&self, x: [usize; 5], y: [usize; 5]) -> Result<(), ClassifierError> {
        let expected = self.config.volume_shape();
        if x != expected {
            return Err(ClassifierError::VolumeShape {
                expected,
                actual: x,
            });
        }
        let expected = self.config.label_shape();
        if y != expected {
            return Err(ClassifierError::LabelShape {
                expected,
                actual: y,
            });
        }
        Ok(())
    }
}
