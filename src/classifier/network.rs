use crate::classifier::layer::{VoxelConv, VoxelConvConfig};
use crate::schedule::LayerSchedule;
use crate::utils::dropout::dropout;
use crate::utils::flatten_voxels;
use burn::prelude::*;
use burn::tensor::activation::relu;

#[derive(Config, Debug)]
pub struct VoxelNetworkConfig {
    pub schedule: LayerSchedule,

    #[config(default = 0.1)]
    pub weight_stddev: f64,

    #[config(default = 0.1)]
    pub bias_init: f64,
}

impl VoxelNetworkConfig {
    /// Returns the initialized model.
    pub fn init<B: Backend>(&self, device: &B::Device) -> VoxelNetwork<B> {
        let mut layers = Vec::with_capacity(self.schedule.num_layers());
        for t in self.schedule.transitions() {
            let layer = VoxelConvConfig::new([t.in_channels, t.out_channels], t.kernel_size)
                .with_weight_stddev(self.weight_stddev)
                .with_bias_init(self.bias_init)
                .init(device);
            log::info!(
                "layer {}: {} -> {} channels, {k}x{k}x{k} kernel{}",
                t.index,
                t.in_channels,
                t.out_channels,
                if t.is_last { ", logits" } else { "" },
                k = t.kernel_size,
            );
            layers.push(layer);
        }
        VoxelNetwork { layers }
    }
}

/// Stack of [`VoxelConv`] layers, with ReLU and dropout between them, producing per-voxel logits.
#[derive(Module, Debug)]
pub struct VoxelNetwork<B: Backend> {
    pub layers: Vec<VoxelConv<B>>,
}

impl<B: Backend> VoxelNetwork<B> {
    /// Dropout with `keep_prob` is applied after every ReLU; the last layer has neither.
    ///
    /// # Shapes
    ///   - Input [batch, depth, height, width, channels]
    ///   - Output [batch, depth, height, width, num_classes]
    pub fn forward(&self, x: Tensor<B, 5>, keep_prob: f64) -> Tensor<B, 5> {
        let [batch, depth, height, width, channels] = x.dims();
        debug_assert_eq!(channels, self.input_channels());

        // channels-last to burn's channels-first layout
        let mut z = x.permute([0, 4, 1, 2, 3]);
        let last = self.layers.len() - 1;
        for (i, layer) in self.layers.iter().enumerate() {
            let h = layer.forward(z);
            z = if i == last {
                h
            } else {
                dropout(relu(h), keep_prob)
            };
        }

        let logits = z.permute([0, 2, 3, 4, 1]);
        debug_assert_eq!(
            [batch, depth, height, width, self.num_classes()],
            logits.dims()
        );
        logits
    }

    /// See also [`Self::forward`].
    ///
    /// # Shapes
    ///   - Input [batch, depth, height, width, channels]
    ///   - Output [batch * depth * height * width, num_classes]
    pub fn forward_flat(&self, x: Tensor<B, 5>, keep_prob: f64) -> Tensor<B, 2> {
        flatten_voxels(self.forward(x, keep_prob))
    }

    pub fn input_channels(&self) -> usize {
        self.layers[0].c_in()
    }

    pub fn num_classes(&self) -> usize {
        self.layers[self.layers.len() - 1].c_out()
    }

    /// `2 * l2_reg * Σ weight²` over every layer, as a `[1]` tensor.
    pub fn l2_penalty(&self, l2_reg: f64) -> Tensor<B, 1> {
        let device = self.layers[0].weight.device();
        self.layers
            .iter()
            .map(|layer| layer.weight_square_sum())
            .fold(Tensor::<B, 1>::zeros([1], &device), |acc, s| acc + s)
            .mul_scalar(2.0 * l2_reg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;
    use burn::tensor::{Distribution, ElementConversion};

    type B = NdArray<f32>;

    fn network(schedule: LayerSchedule) -> VoxelNetwork<B> {
        VoxelNetworkConfig::new(schedule).init(&Default::default())
    }

    #[test]
    fn one_layer_per_transition() {
        let net = network(LayerSchedule::new(2, &[6, 5], &[4], 3));
        let shapes: Vec<_> = net.layers.iter().map(|l| l.weight.dims()).collect();
        assert_eq!(
            shapes,
            vec![
                [6, 2, 3, 3, 3],
                [5, 6, 3, 3, 3],
                [4, 5, 1, 1, 1],
                [3, 4, 1, 1, 1],
            ]
        );
        assert_eq!(net.input_channels(), 2);
        assert_eq!(net.num_classes(), 3);
    }

    #[test]
    fn logits_keep_the_volume() {
        let net = network(LayerSchedule::new(2, &[4], &[4], 3));
        let x = Tensor::<B, 5>::random([2, 3, 4, 5, 2], Distribution::Default, &Default::default());
        assert_eq!([2, 3, 4, 5, 3], net.forward(x.clone(), 0.5).dims());
        assert_eq!([2 * 3 * 4 * 5, 3], net.forward_flat(x, 1.0).dims());
    }

    #[test]
    fn forward_is_deterministic_without_dropout() {
        let net = network(LayerSchedule::new(1, &[4], &[], 2));
        let x = Tensor::<B, 5>::random([1, 2, 2, 2, 1], Distribution::Default, &Default::default());
        let a = net.forward(x.clone(), 1.0).into_data();
        let b = net.forward(x, 1.0).into_data();
        a.assert_eq(&b, true);
    }

    #[test]
    fn l2_penalty_sums_squared_weights() {
        let net = network(LayerSchedule::new(1, &[2], &[], 2));
        let manual: f32 = net
            .layers
            .iter()
            .flat_map(|l| l.weight.val().into_data().to_vec::<f32>().unwrap())
            .map(|w| w * w)
            .sum();
        let penalty = net.l2_penalty(0.5).into_scalar().elem::<f32>();
        assert!((penalty - manual).abs() < 1e-4, "{penalty} != {manual}");
    }

    #[test]
    fn config_files_with_broken_schedules_are_rejected() {
        let dir = temp_dir::TempDir::new().unwrap();

        let good = dir.child("good.json");
        let config = VoxelNetworkConfig::new(LayerSchedule::new(1, &[4], &[2], 3));
        config.save(&good).unwrap();
        assert_eq!(VoxelNetworkConfig::load(&good).unwrap().schedule, config.schedule);

        for (name, schedule) in [
            ("mismatch.json", r#"{"channels":[1,4,2],"kernels":[3]}"#),
            ("empty.json", r#"{"channels":[],"kernels":[]}"#),
        ] {
            let path = dir.child(name);
            let json = format!(r#"{{"schedule":{schedule},"weight_stddev":0.1,"bias_init":0.1}}"#);
            std::fs::write(&path, json).unwrap();
            assert!(VoxelNetworkConfig::load(&path).is_err(), "{name} was accepted");
        }
    }
}
