use crate::utils::truncated_normal::truncated_normal;
use burn::module::{Content, DisplaySettings, ModuleDisplay, Param};
use burn::nn::Initializer;
use burn::prelude::*;
use burn::tensor::module::conv3d;
use burn::tensor::ops::ConvOptions;

/// Configuration to create a [VoxelConv](VoxelConv) layer.
#[derive(Config, Debug)]
pub struct VoxelConvConfig {
    /// Input and output channels.
    pub channels: [usize; 2],

    /// Edge of the cubic kernel. Must be odd so that SAME padding is symmetric.
    pub kernel_size: usize,

    /// Standard deviation of the truncated-normal weight initialization.
    #[config(default = 0.1)]
    pub weight_stddev: f64,

    /// Constant bias initialization.
    #[config(default = 0.1)]
    pub bias_init: f64,
}

impl VoxelConvConfig {
    /// Initialize a new [VoxelConv](VoxelConv) module.
    pub fn init<B: Backend>(&self, device: &B::Device) -> VoxelConv<B> {
        let [c_in, c_out] = self.channels;
        let k = self.kernel_size;
        debug_assert_eq!(k % 2, 1, "kernel_size must be odd");

        let weight: Tensor<B, 5> =
            truncated_normal([c_out, c_in, k, k, k], self.weight_stddev, device);
        let bias = Initializer::Constant {
            value: self.bias_init,
        }
        .init([c_out], device);

        VoxelConv {
            weight: Param::from_tensor(weight),
            bias,
        }
    }
}

/// A 3-D convolution with unit stride and SAME padding, plus bias.
///
/// Should be created using the [VoxelConvConfig](VoxelConvConfig) configuration.
#[derive(Module, Debug)]
#[module(custom_display)]
pub struct VoxelConv<B: Backend> {
    /// # Shape
    /// [c_out, c_in, kernel_size, kernel_size, kernel_size]
    pub weight: Param<Tensor<B, 5>>,
    /// # Shape
    /// [c_out]
    pub bias: Param<Tensor<B, 1>>,
}

impl<B: Backend> VoxelConv<B> {
    /// # Shapes
    ///   - Input [batch, c_in, depth, height, width]
    ///   - Output [batch, c_out, depth, height, width]
    pub fn forward(&self, x: Tensor<B, 5>) -> Tensor<B, 5> {
        let [batch, _c_in, depth, height, width] = x.dims();
        let [c_out, _, k, _, _] = self.weight.dims();
        let padding = (k - 1) / 2;

        let options = ConvOptions::new([1, 1, 1], [padding; 3], [1, 1, 1], 1);
        let y = conv3d(x, self.weight.val(), Some(self.bias.val()), options);
        debug_assert_eq!([batch, c_out, depth, height, width], y.dims());

        y
    }

    pub fn c_in(&self) -> usize {
        self.weight.dims()[1]
    }

    pub fn c_out(&self) -> usize {
        self.weight.dims()[0]
    }

    pub fn kernel_size(&self) -> usize {
        self.weight.dims()[2]
    }

    /// Σ weight², as a `[1]` tensor.
    pub fn weight_square_sum(&self) -> Tensor<B, 1> {
        self.weight.val().powi_scalar(2).sum()
    }
}

impl<B: Backend> ModuleDisplay for VoxelConv<B> {
    fn custom_settings(&self) -> Option<DisplaySettings> {
        DisplaySettings::new()
            .with_new_line_after_attribute(false)
            .optional()
    }

    fn custom_content(&self, content: Content) -> Option<Content> {
        let [c_out, c_in, k, _, _] = self.weight.dims();
        content
            .add("c_in", &c_in)
            .add("c_out", &c_out)
            .add("kernel_size", &k)
            .optional()
    }
}
