#![allow(dead_code)]

pub mod cli;

#[cfg(not(feature = "_dev-has-backend"))]
std::compile_error!("No demo backend selected, enable `dev-ndarray` or `dev-wgpu`.");

/// Autodiff backend the demos train on, picked by the `dev-*` feature.
#[cfg(not(feature = "dev-wgpu"))]
pub type DemoBackend = burn::backend::Autodiff<burn::backend::NdArray<f32, i32>>;
#[cfg(feature = "dev-wgpu")]
pub type DemoBackend = burn::backend::Autodiff<burn::backend::wgpu::Wgpu<f32, i32>>;
