//! Helpers to build label volumes.

use crate::error::ClassifierError;
use burn::prelude::*;

/// One-hot encodes a per-voxel class index volume.
///
/// # Shapes
///   - Input [batch, depth, height, width]
///   - Output [batch, depth, height, width, num_classes]
///
/// Indices outside `0..num_classes` produce an all-zero row.
pub fn one_hot_voxels<B: Backend>(classes: Tensor<B, 4, Int>, num_classes: usize) -> Tensor<B, 5> {
    let [batch, depth, height, width] = classes.dims();
    let n = batch * depth * height * width;
    let device = classes.device();

    let classes: Tensor<B, 2, Int> = classes
        .reshape([n, 1])
        .expand(Shape::new([n, num_classes]));
    let range: Tensor<B, 2, Int> = Tensor::<B, 1, Int>::arange(0..num_classes as i64, &device)
        .reshape([1, num_classes])
        .expand(Shape::new([n, num_classes]));

    classes
        .equal(range)
        .float()
        .reshape([batch, depth, height, width, num_classes])
}

/// Label volume where every voxel belongs to `class`.
///
/// Fails with [`ClassifierError::ClassOutOfRange`] unless `class < num_classes`.
pub fn uniform_labels<B: Backend>(
    shape: [usize; 4],
    class: usize,
    num_classes: usize,
    device: &B::Device,
) -> Result<Tensor<B, 5>, ClassifierError> {
    if class >= num_classes {
        return Err(ClassifierError::ClassOutOfRange { class, num_classes });
    }
    let classes = Tensor::<B, 4, Int>::full(shape, class as i64, device);
    Ok(one_hot_voxels(classes, num_classes))
}
