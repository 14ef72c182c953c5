use burn::prelude::*;
use burn::tensor::{Distribution, ElementConversion};

/// Values further than this many standard deviations from the mean are redrawn.
pub const TRUNCATION: f64 = 2.0;

/// Redraw rounds before the remaining outliers are clamped.
const MAX_REDRAWS: usize = 16;

/// Samples a zero-mean normal distribution truncated at [`TRUNCATION`] standard deviations.
///
/// Out-of-range values are redrawn, which keeps the in-range shape of the normal distribution.
/// The probability of a value surviving every redraw is about `0.0455^16`; such values are clamped.
pub fn truncated_normal<B: Backend, const D: usize>(
    shape: [usize; D],
    std: f64,
    device: &B::Device,
) -> Tensor<B, D> {
    let bound = TRUNCATION * std;
    let mut t: Tensor<B, D> = Tensor::random(shape, Distribution::Normal(0.0, std), device);

    for _ in 0..MAX_REDRAWS {
        let outside = t.clone().abs().greater_elem(bound);
        let n_outside = outside.clone().int().sum().into_scalar().elem::<i64>();
        if n_outside == 0 {
            break;
        }
        let redraw: Tensor<B, D> =
            Tensor::random(shape, Distribution::Normal(0.0, std), device);
        t = t.mask_where(outside, redraw);
    }

    t.clamp(-bound, bound)
}
