use burn::prelude::*;
use burn::tensor::Distribution;
use burn::tensor::backend::AutodiffBackend;
use burn_voxel::prelude::*;

#[path = "../common/mod.rs"]
pub mod common;

use common::DemoBackend;
use common::cli::AppArgs;

pub fn launch<AutoB: AutodiffBackend>(app_args: &AppArgs) -> Result<(), ClassifierError> {
    let config = app_args.load_or_default_config();
    let device = AutoB::Device::default();
    let mut classifier: VolumeClassifier<AutoB> = config.init(&device)?;

    let [batch, depth, height, width, num_classes] = config.label_shape();
    let x = Tensor::<AutoB, 5>::random(config.volume_shape(), Distribution::Default, &device);
    let y = match app_args.class {
        Some(class) => {
            uniform_labels([batch, depth, height, width], class, num_classes, &device)?
        }
        None => {
            let classes = Tensor::<AutoB, 4, Int>::random(
                [batch, depth, height, width],
                Distribution::Uniform(0.0, num_classes as f64),
                &device,
            );
            one_hot_voxels(classes, num_classes)
        }
    };

    let log_every = app_args.log_every.max(1);
    for i in 0..app_args.iterations {
        let output = classifier.fit(x.clone(), y.clone())?;
        if i % log_every == 0 {
            log::info!(
                "step {i}: loss = {:.6}, accuracy = {:.4}",
                output.loss,
                output.accuracy
            );
        }
    }

    let accuracy = classifier.evaluate(x, y)?;
    log::info!(
        "after {} steps: accuracy = {accuracy:.4}, l2 penalty = {:.6}",
        classifier.steps(),
        classifier.l2_penalty()
    );
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let app_args = AppArgs::parse().unwrap();
    if let Err(err) = launch::<DemoBackend>(&app_args) {
        log::error!("{err}");
        std::process::exit(1);
    }
}
