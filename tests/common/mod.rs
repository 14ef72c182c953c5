#![allow(dead_code)]

use burn::backend::{Autodiff, NdArray};
use burn::prelude::*;
use burn::tensor::Distribution;
use burn_voxel::prelude::*;

pub type TestBackend = Autodiff<NdArray<f32>>;

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn device() -> <TestBackend as Backend>::Device {
    Default::default()
}

/// Intensities drawn uniformly from `[0, scale)`.
pub fn random_volume(shape: [usize; 5], scale: f64) -> Tensor<TestBackend, 5> {
    Tensor::<TestBackend, 5>::random(shape, Distribution::Default, &device()).mul_scalar(scale)
}

/// Labels where every voxel of the minibatch has `class`.
pub fn constant_labels(config: &VolumeClassifierConfig, class: usize) -> Tensor<TestBackend, 5> {
    let [batch, depth, height, width, num_classes] = config.label_shape();
    uniform_labels([batch, depth, height, width], class, num_classes, &device()).unwrap()
}

/// Narrow layers and a fast learning rate, so that tests converge quickly on the CPU.
pub fn small_config() -> VolumeClassifierConfig {
    VolumeClassifierConfig::new()
        .with_depth(4)
        .with_height(6)
        .with_width(6)
        .with_minibatch_size(2)
        .with_num_classes(3)
        .with_conv_layers(vec![8, 8])
        .with_fc_layers(vec![8])
        .with_learning_rate(1e-2)
}

pub fn weights(network: &VoxelNetwork<TestBackend>) -> Vec<Vec<f32>> {
    network
        .layers
        .iter()
        .flat_map(|layer| {
            [
                layer.weight.val().into_data().to_vec::<f32>().unwrap(),
                layer.bias.val().into_data().to_vec::<f32>().unwrap(),
            ]
        })
        .collect()
}
