use std::env;

use anyhow::Result;
use num_format::ToFormattedString;
use rand::rngs::StdRng;
use rand::SeedableRng;

use catcher_game::catcher_environment::CatcherEnvironment;
use catcher_game::random_agent::RandomAgent;
use ql_experiment::experiment::parameter::Parameter;
use ql_experiment::experiment::runner::Experiment;
use ql_experiment::frame::resize::ResizeMethod;
use ql_experiment::log::init_logging;
use ql_experiment::prelude::Environment;
use ql_experiment::util::format::number_format;

const DEFAULT_SEED: u64 = 42;

fn seed() -> u64 {
    env::var("CATCHER_SEED")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_SEED)
}

fn main() -> Result<()> {
    init_logging();

    let seed = seed();
    log::info!("seed: {}", seed);

    let environment = CatcherEnvironment::new(seed);
    let agent = RandomAgent::new(environment.legal_actions().len(), StdRng::seed_from_u64(seed.wrapping_add(1)));
    let param = Parameter {
        resize_method: ResizeMethod::Crop,
        num_epochs: 3,
        epoch_length: 5_000,
        test_length: 2_000,
        max_steps_per_episode: 2_000,
        ..Parameter::default()
    };

    let mut experiment = Experiment::new(environment, agent, param, StdRng::seed_from_u64(seed.wrapping_add(2)))?;
    let summaries = experiment.run()?;

    let number_format = number_format();
    for summary in summaries {
        let testing = summary
            .testing
            .map(|t| format!("{:.2}", t.mean_episode_reward()))
            .unwrap_or_else(|| "-".to_string());
        log::info!(
            "epoch {}: training steps {}, training mean reward {:.2}, testing mean reward {}",
            summary.epoch,
            summary.training.steps.to_formatted_string(&number_format),
            summary.training.mean_episode_reward(),
            testing
        );
    }
    Ok(())
}
