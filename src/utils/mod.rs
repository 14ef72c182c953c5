use burn::prelude::*;

pub mod dropout;
pub mod loss;
pub mod metrics;
pub mod truncated_normal;

/// Turns every voxel into an independent classification row.
///
/// # Shapes
///   - Input [batch, depth, height, width, classes]
///   - Output [batch * depth * height * width, classes]
pub fn flatten_voxels<B: Backend>(t: Tensor<B, 5>) -> Tensor<B, 2> {
    let [batch, depth, height, width, classes] = t.dims();
    t.reshape([batch * depth * height * width, classes])
}
