use burn::prelude::*;
use burn::tensor::Distribution;

/// Zeroes each element with probability `1 - keep_prob` and rescales the survivors by `1 / keep_prob`.
///
/// Unlike [`burn::nn::Dropout`], this is active on every backend, including non-autodiff ones,
/// and the probability is given per call. A `keep_prob` of `1` or more returns the input unchanged,
/// a `keep_prob` of `0` or less (or NaN) drops everything.
pub fn dropout<B: Backend, const D: usize>(x: Tensor<B, D>, keep_prob: f64) -> Tensor<B, D> {
    if keep_prob >= 1.0 {
        return x;
    }
    if keep_prob.is_nan() || keep_prob <= 0.0 {
        return x.zeros_like();
    }

    let mask: Tensor<B, D> =
        Tensor::random(x.shape(), Distribution::Bernoulli(keep_prob), &x.device());
    (x * mask).div_scalar(keep_prob)
}
