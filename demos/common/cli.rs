use burn::prelude::*;
use burn_voxel::classifier::VolumeClassifierConfig;
use std::path::{Path, PathBuf};

pub const HELP: &str = "\
Burn Voxel Overfit Demo

Trains a volume classifier on a single synthetic minibatch and logs loss and accuracy.
Set RUST_LOG=info (or debug, for every step) to see the progress.

USAGE:
    overfit [OPTIONS]

FLAGS:
    -h, --help                  Show this help message and exit

OPTIONS:
    -n, --iterations <N>        Number of fit steps [default: 100]
    -l, --log-every <N>         Log every N steps [default: 20]
    -k, --class <K>             Class assigned to every voxel, or random per voxel if absent
    -c, --config <PATH>         Load the classifier configuration from this JSON file
                                Defaults to a 16x32x32 volume with 10 classes and a minibatch of 1
    -s, --save-config <PATH>    Save the configuration in use to this JSON file
";

#[derive(Debug)]
pub struct AppArgs {
    pub iterations: usize,
    pub log_every: usize,
    pub class: Option<usize>,
    pub config: Option<PathBuf>,
    pub save_config: Option<PathBuf>,
}

impl AppArgs {
    pub fn parse() -> Result<Self, pico_args::Error> {
        let mut pargs = pico_args::Arguments::from_env();

        // Help has a higher priority and should be handled separately.
        if pargs.contains(["-h", "--help"]) {
            println!("{}", HELP);
            std::process::exit(0);
        }

        let args = AppArgs {
            iterations: pargs
                .opt_value_from_str(["-n", "--iterations"])?
                .unwrap_or(100),
            log_every: pargs
                .opt_value_from_str(["-l", "--log-every"])?
                .unwrap_or(20),
            class: pargs.opt_value_from_str(["-k", "--class"])?,
            config: pargs.opt_value_from_os_str(["-c", "--config"], parse_path)?,
            save_config: pargs.opt_value_from_os_str(["-s", "--save-config"], parse_path)?,
        };

        let remaining = pargs.finish();
        if !remaining.is_empty() {
            panic!("unused arguments: {remaining:?}");
        }

        Ok(args)
    }

    pub fn load_or_default_config(&self) -> VolumeClassifierConfig {
        let config = self
            .config
            .as_ref()
            .map(|path| load_config(path))
            .unwrap_or_else(default_config);
        if let Some(path) = &self.save_config {
            save_config(path, &config);
        }
        config
    }
}

fn parse_path(s: &std::ffi::OsStr) -> Result<std::path::PathBuf, &'static str> {
    Ok(s.into())
}

/// A 16x32x32 volume with 10 classes, and layers narrow enough for a CPU.
pub fn default_config() -> VolumeClassifierConfig {
    VolumeClassifierConfig::new()
        .with_num_classes(10)
        .with_minibatch_size(1)
        .with_depth(16)
        .with_height(32)
        .with_width(32)
        .with_conv_layers(vec![16, 16])
        .with_fc_layers(vec![16])
        .with_learning_rate(1e-2)
        .with_dropout(1.0)
}

pub fn save_config(path: &Path, config: &VolumeClassifierConfig) {
    log::info!("Saving classifier config into {path:?}");
    config
        .save(path)
        .expect("Failed to save the classifier config");
}

pub fn load_config(path: &Path) -> VolumeClassifierConfig {
    log::info!("Loading classifier config from {path:?}");
    VolumeClassifierConfig::load(path).expect("Failed to load the classifier config")
}
