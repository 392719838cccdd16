use anyhow::Result;
use num_format::ToFormattedString;
use rand::Rng;
use rustc_hash::FxHashMap;

use crate::error::ExperimentError;
use crate::experiment::parameter::Parameter;
use crate::frame::pipeline::FramePipeline;
use crate::prelude::{Action, ActionIndex, Agent, Environment};
use crate::util::format;

/// Result of one episode
#[derive(Debug, Clone)]
pub struct EpisodeOutcome<A: Action> {
    /// Episode ended because the game ended or a life was lost (and not by the step limit)
    pub terminal: bool,
    pub steps: usize,
    /// Sum of all rewards earned during the episode
    pub reward: f32,
    pub action_counts: FxHashMap<A, usize>,
}

/// Plays single episodes: prepares the environment, feeds observations to the agent
/// and performs the chosen actions until the episode is over.
pub struct EpisodeDriver<A: Action> {
    pipeline: FramePipeline,
    legal_actions: Vec<A>,
    frame_skip: usize,
    death_ends_episode: bool,
    max_start_nullops: usize,
    /// Most recent episode ended on a loss of life, while the game went on
    terminal_on_life_loss: bool,
}

impl<A: Action> EpisodeDriver<A> {
    pub fn new(
        pipeline: FramePipeline,
        legal_actions: Vec<A>,
        param: &Parameter,
    ) -> Result<Self, ExperimentError> {
        if legal_actions.is_empty() {
            return Err(ExperimentError::configuration("environment offers no legal actions"));
        }
        Ok(Self {
            pipeline,
            legal_actions,
            frame_skip: param.frame_skip,
            death_ends_episode: param.death_ends_episode,
            max_start_nullops: param.max_start_nullops,
            terminal_on_life_loss: false,
        })
    }

    pub fn pipeline(&self) -> &FramePipeline { &self.pipeline }

    pub fn legal_actions(&self) -> &[A] { &self.legal_actions }

    pub fn terminal_on_life_loss(&self) -> bool { self.terminal_on_life_loss }

    /// Forces the next episode to start with a full environment reset
    pub fn reset_life_loss(&mut self) { self.terminal_on_life_loss = false; }

    /// Resets the game if needed, optionally performs a random number of null actions to randomize the start state,
    /// and finally performs the null actions needed to fill the frame buffer.
    fn init_episode<E, R>(
        &mut self,
        environment: &mut E,
        rng: &mut R,
    ) -> Result<()>
    where
        E: Environment<A = A>,
        R: Rng,
    {
        let no_action = environment.no_action();

        if !self.terminal_on_life_loss || environment.game_over() {
            environment.reset()?;

            if self.max_start_nullops > 0 {
                let random_actions = rng.gen_range(0..=self.max_start_nullops);
                log::debug!("reset environment, performing {} random null actions", random_actions);
                for _ in 0..random_actions {
                    self.pipeline.act(environment, no_action)?;
                }
            } else {
                log::debug!("reset environment");
            }
        } else {
            log::debug!("continuing after life loss with {} lives", environment.lives());
        }

        // fill the frame buffer
        self.pipeline.act(environment, no_action)?;
        self.pipeline.act(environment, no_action)?;
        Ok(())
    }

    fn legal_action(
        &self,
        index: ActionIndex,
    ) -> Result<A, ExperimentError> {
        self.legal_actions
            .get(index)
            .copied()
            .ok_or(ExperimentError::IllegalActionIndex {
                index,
                legal: self.legal_actions.len(),
            })
    }

    /// Runs a single episode.
    ///
    /// The episode ends when the game is over, on a life loss (if configured and not `testing`),
    /// or after `max_steps` steps at the latest.
    /// The terminal flag of the outcome is the same value the agent receives in [Agent::end_episode].
    pub fn run_episode<E, G, R>(
        &mut self,
        environment: &mut E,
        agent: &mut G,
        rng: &mut R,
        max_steps: usize,
        testing: bool,
    ) -> Result<EpisodeOutcome<A>>
    where
        E: Environment<A = A>,
        G: Agent,
        R: Rng,
    {
        debug_assert!(max_steps > 0);
        self.init_episode(environment, rng)?;

        let start_lives = environment.lives();
        let mut action_counts = FxHashMap::<A, usize>::default();
        let mut episode_reward = 0.0;
        let mut num_steps = 0;

        let mut action = self.legal_action(agent.start_episode(self.pipeline.observation()?)?)?;
        loop {
            let reward = self.pipeline.step(environment, action, self.frame_skip)?;
            *action_counts.entry(action).or_insert(0) += 1;
            episode_reward += reward;
            self.terminal_on_life_loss = self.death_ends_episode && !testing && environment.lives() < start_lives;
            let terminal = environment.game_over() || self.terminal_on_life_loss;
            num_steps += 1;
            log::trace!("step {} with action {} resulted in reward: {:.2}, terminal: {}", num_steps, action, reward, terminal);

            if num_steps % 1000 == 0 {
                log::trace!("episode steps: {}", num_steps.to_formatted_string(&format::number_format()));
            }

            if terminal || num_steps >= max_steps {
                agent.end_episode(reward, terminal)?;
                log::debug!(
                    "episode finished after {} steps, terminal: {}, reward: {:.2}",
                    num_steps,
                    terminal,
                    episode_reward
                );
                return Ok(EpisodeOutcome {
                    terminal,
                    steps: num_steps,
                    reward: episode_reward,
                    action_counts,
                });
            }

            action = self.legal_action(agent.step(reward, self.pipeline.observation()?)?)?;
        }
    }
}
