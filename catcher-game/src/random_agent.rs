use anyhow::Result;
use rand::Rng;

use ql_experiment::prelude::{ActionIndex, Agent, Observation};

/// Picks a uniformly random action on every decision and keeps track of the rewards it collected.
pub struct RandomAgent<R: Rng> {
    rng: R,
    num_actions: usize,
    testing: bool,
    episode_reward: f32,
    finished_episode_rewards: Vec<f32>,
}

impl<R: Rng> RandomAgent<R> {
    pub fn new(
        num_actions: usize,
        rng: R,
    ) -> Self {
        assert!(num_actions > 0);
        Self {
            rng,
            num_actions,
            testing: false,
            episode_reward: 0.0,
            finished_episode_rewards: vec![],
        }
    }

    /// Rewards of the episodes finished since the last epoch or testing boundary
    pub fn finished_episode_rewards(&self) -> &[f32] { &self.finished_episode_rewards }

    pub fn is_testing(&self) -> bool { self.testing }

    fn random_action(&mut self) -> ActionIndex { self.rng.gen_range(0..self.num_actions) }

    fn mean_episode_reward(&self) -> f32 {
        match self.finished_episode_rewards.len() {
            0 => 0.0,
            n => self.finished_episode_rewards.iter().sum::<f32>() / n as f32,
        }
    }
}

impl<R: Rng> Agent for RandomAgent<R> {
    fn start_episode(
        &mut self,
        _observation: Observation,
    ) -> Result<ActionIndex> {
        self.episode_reward = 0.0;
        Ok(self.random_action())
    }

    fn step(
        &mut self,
        reward: f32,
        _observation: Observation,
    ) -> Result<ActionIndex> {
        self.episode_reward += reward;
        Ok(self.random_action())
    }

    fn end_episode(
        &mut self,
        reward: f32,
        _terminal: bool,
    ) -> Result<()> {
        self.episode_reward += reward;
        self.finished_episode_rewards.push(self.episode_reward);
        Ok(())
    }

    fn start_testing(&mut self) -> Result<()> {
        self.testing = true;
        self.finished_episode_rewards.clear();
        Ok(())
    }

    fn finish_testing(
        &mut self,
        epoch: usize,
    ) -> Result<()> {
        log::info!(
            "random agent, testing after epoch {}: {} episodes, mean reward {:.2}",
            epoch,
            self.finished_episode_rewards.len(),
            self.mean_episode_reward()
        );
        self.testing = false;
        self.finished_episode_rewards.clear();
        Ok(())
    }

    fn finish_epoch(
        &mut self,
        epoch: usize,
    ) -> Result<()> {
        log::info!(
            "random agent, training epoch {}: {} episodes, mean reward {:.2}",
            epoch,
            self.finished_episode_rewards.len(),
            self.mean_episode_reward()
        );
        self.finished_episode_rewards.clear();
        Ok(())
    }
}
