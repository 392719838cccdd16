use std::fmt::{Display, Formatter};

use anyhow::Result;
use itertools::Itertools;
use num_format::ToFormattedString;
use rand::Rng;
use rustc_hash::FxHashMap;

use crate::experiment::episode::{EpisodeDriver, EpisodeOutcome};
use crate::experiment::parameter::Parameter;
use crate::frame::pipeline::FramePipeline;
use crate::frame::resize::FrameResizer;
use crate::prelude::{Action, Agent, Environment};
use crate::util::format;
use crate::util::immutable::Immutable;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Training,
    Testing,
}

impl Display for Phase {
    fn fmt(
        &self,
        f: &mut Formatter<'_>,
    ) -> std::fmt::Result {
        match self {
            Phase::Training => f.write_str("training"),
            Phase::Testing => f.write_str("testing"),
        }
    }
}

struct EpochState {
    epoch: usize,
    steps_left: usize,
    phase: Phase,
}

/// What happened during one block of episodes
#[derive(Debug, Clone)]
pub struct BlockSummary<A: Action> {
    pub phase: Phase,
    pub epoch: usize,
    pub episodes: usize,
    pub steps: usize,
    pub total_reward: f32,
    pub action_counts: FxHashMap<A, usize>,
}

impl<A: Action> BlockSummary<A> {
    fn new(
        phase: Phase,
        epoch: usize,
    ) -> Self {
        Self {
            phase,
            epoch,
            episodes: 0,
            steps: 0,
            total_reward: 0.0,
            action_counts: FxHashMap::default(),
        }
    }

    fn add_episode(
        &mut self,
        outcome: EpisodeOutcome<A>,
    ) {
        self.episodes += 1;
        self.steps += outcome.steps;
        self.total_reward += outcome.reward;
        for (action, count) in outcome.action_counts {
            *self.action_counts.entry(action).or_insert(0) += count;
        }
    }

    pub fn mean_episode_reward(&self) -> f32 {
        match self.episodes {
            0 => 0.0,
            n => self.total_reward / n as f32,
        }
    }

    fn log(&self) {
        let number_format = format::number_format();
        let total_actions: usize = self.action_counts.values().sum();
        let action_distribution_line = self
            .action_counts
            .iter()
            .sorted_by_key(|(action, _)| action.to_string())
            .map(|(action, &count)| {
                let ratio = 100.0 * count as f32 / total_actions as f32;
                format!("{} {:.1}%", action, ratio)
            })
            .join(", ");

        log::info!(
            "\n\
    {} epoch {} finished: episodes: {}, steps: {}, reward: {{total: {:.1}, mean: {:.2}}}\n\
    action_distribution: {}",
            self.phase,
            self.epoch,
            self.episodes.to_formatted_string(&number_format),
            self.steps.to_formatted_string(&number_format),
            self.total_reward,
            self.mean_episode_reward(),
            action_distribution_line
        );
    }
}

#[derive(Debug, Clone)]
pub struct EpochSummary<A: Action> {
    pub epoch: usize,
    pub training: BlockSummary<A>,
    pub testing: Option<BlockSummary<A>>,
}

/// Drives an agent through an environment: epochs of training blocks, each optionally followed by a testing block.
pub struct Experiment<E, G, R>
where
    E: Environment,
    G: Agent,
    R: Rng,
{
    environment: E,
    agent: G,
    rng: R,
    param: Immutable<Parameter>,
    driver: EpisodeDriver<E::A>,
}

impl<E, G, R> Experiment<E, G, R>
where
    E: Environment,
    G: Agent,
    R: Rng,
{
    pub fn new(
        environment: E,
        agent: G,
        param: Parameter,
        rng: R,
    ) -> Result<Self> {
        param.validate()?;

        let screen_dims = environment.screen_dims();
        let resizer = FrameResizer::new(screen_dims, (param.resized_width, param.resized_height), param.resize_method)?;
        log::info!(
            "screen {}x{} => observation {}x{} ({})",
            screen_dims.0,
            screen_dims.1,
            param.resized_width,
            param.resized_height,
            param.resize_method
        );

        let pipeline = FramePipeline::new(screen_dims, resizer);
        let driver = EpisodeDriver::new(pipeline, environment.legal_actions(), &param)?;

        Ok(Self {
            environment,
            agent,
            rng,
            param: Immutable::new(param),
            driver,
        })
    }

    pub fn param(&self) -> &Parameter { &self.param }

    pub fn environment(&self) -> &E { &self.environment }

    pub fn agent(&self) -> &G { &self.agent }

    pub fn into_parts(self) -> (E, G) { (self.environment, self.agent) }

    /// Runs all configured epochs; a testing block follows each training block if `test_length > 0`
    pub fn run(&mut self) -> Result<Vec<EpochSummary<E::A>>> {
        let mut summaries = Vec::with_capacity(self.param.num_epochs);

        for epoch in 1..=self.param.num_epochs {
            let training = self.run_epoch(epoch, self.param.epoch_length, Phase::Training)?;
            self.agent.finish_epoch(epoch)?;

            let testing = if self.param.test_length > 0 {
                self.agent.start_testing()?;
                self.environment.set_display_screen(true);
                let testing = self.run_epoch(epoch, self.param.test_length, Phase::Testing)?;
                self.environment.set_display_screen(false);
                self.agent.finish_testing(epoch)?;
                Some(testing)
            } else {
                None
            };

            summaries.push(EpochSummary { epoch, training, testing });
        }
        Ok(summaries)
    }

    /// Runs episodes until at least `num_steps` steps were taken.
    /// The last episode is never cut to fit the budget, so the block may take more steps than requested.
    pub fn run_epoch(
        &mut self,
        epoch: usize,
        num_steps: usize,
        phase: Phase,
    ) -> Result<BlockSummary<E::A>> {
        // each block starts with a reset
        self.driver.reset_life_loss();

        let number_format = format::number_format();
        let mut state = EpochState {
            epoch,
            steps_left: num_steps,
            phase,
        };
        let mut summary = BlockSummary::new(phase, epoch);

        while state.steps_left > 0 {
            log::info!(
                "{} epoch: {} steps_left: {}",
                state.phase,
                state.epoch,
                state.steps_left.to_formatted_string(&number_format)
            );
            let outcome = self.run_episode(state.phase == Phase::Testing)?;
            state.steps_left = state.steps_left.saturating_sub(outcome.steps);
            summary.add_episode(outcome);
        }

        summary.log();
        Ok(summary)
    }

    pub fn run_episode(
        &mut self,
        testing: bool,
    ) -> Result<EpisodeOutcome<E::A>> {
        self.driver.run_episode(
            &mut self.environment,
            &mut self.agent,
            &mut self.rng,
            self.param.max_steps_per_episode,
            testing,
        )
    }
}
