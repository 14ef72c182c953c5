use burn::module::Module;
use burn::tensor::activation::log_softmax;
use burn::tensor::{Tensor, backend::Backend};

/// Calculate the softmax cross-entropy between logits and target distributions.
///
/// Targets are probability rows (usually one-hot), so a soft label is also accepted.
#[derive(Module, Clone, Debug)]
pub struct SoftmaxCrossEntropyLoss;

impl Default for SoftmaxCrossEntropyLoss {
    fn default() -> Self {
        Self::new()
    }
}

impl SoftmaxCrossEntropyLoss {
    /// Create the criterion.
    pub fn new() -> Self {
        Self
    }

    /// Compute the mean criterion over the rows.
    ///
    /// # Shapes
    ///
    /// - logits: `[rows, num_classes]`
    /// - targets: `[rows, num_classes]`
    /// - output: `[1]`
    pub fn forward<B: Backend>(&self, logits: Tensor<B, 2>, targets: Tensor<B, 2>) -> Tensor<B, 1> {
        self.forward_no_reduction(logits, targets).mean()
    }

    /// Compute the criterion for each row.
    ///
    /// # Shapes
    ///
    /// - logits: `[rows, num_classes]`
    /// - targets: `[rows, num_classes]`
    /// - output: `[rows]`
    pub fn forward_no_reduction<B: Backend>(
        &self,
        logits: Tensor<B, 2>,
        targets: Tensor<B, 2>,
    ) -> Tensor<B, 1> {
        let [rows, _num_classes] = logits.dims();
        debug_assert_eq!(logits.dims(), targets.dims());

        // -Σ_c target_c * log(softmax(logits)_c)
        let log_probs = log_softmax(logits, 1);
        (targets * log_probs).sum_dim(1).neg().reshape([rows])
    }
}
