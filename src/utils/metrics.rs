use burn::prelude::*;
use burn::tensor::ElementConversion;

/// Fraction of rows whose highest logit matches the highest target entry.
///
/// # Shapes
///   - logits [rows, num_classes]
///   - targets [rows, num_classes]
pub fn voxel_accuracy<B: Backend>(logits: Tensor<B, 2>, targets: Tensor<B, 2>) -> f32 {
    debug_assert_eq!(logits.dims(), targets.dims());
    let predicted = logits.argmax(1);
    let expected = targets.argmax(1);
    predicted
        .equal(expected)
        .float()
        .mean()
        .into_scalar()
        .elem::<f32>()
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;
    use burn::tensor::TensorData;

    type B = NdArray<f32>;

    #[test]
    fn counts_matching_rows() {
        let device = Default::default();
        let logits = Tensor::<B, 2>::from_data(
            TensorData::from([[0.9f32, 0.1], [0.2, 0.8], [0.7, 0.3], [0.4, 0.6]]),
            &device,
        );
        let targets = Tensor::<B, 2>::from_data(
            TensorData::from([[1.0f32, 0.0], [0.0, 1.0], [0.0, 1.0], [1.0, 0.0]]),
            &device,
        );
        assert_eq!(voxel_accuracy(logits, targets), 0.5);
    }
}
