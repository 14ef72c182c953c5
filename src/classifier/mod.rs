mod config;
mod layer;
mod network;
mod volume_classifier;

pub use config::VolumeClassifierConfig;
pub use layer::{VoxelConv, VoxelConvConfig};
pub use network::{VoxelNetwork, VoxelNetworkConfig};
pub use volume_classifier::{FitOutput, VolumeClassifier};
