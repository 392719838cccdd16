#![allow(dead_code)]

use std::fmt::{Display, Formatter};

use anyhow::Result;
use log::LevelFilter;
use ql_experiment::experiment::parameter::Parameter;
use ql_experiment::prelude::{Action, ActionIndex, Agent, Environment, Observation};

#[ctor::ctor]
fn init() {
    let _ = env_logger::builder()
        .format_timestamp_secs()
        .filter_level(LevelFilter::Debug)
        .parse_default_env()
        .is_test(true)
        .try_init();
}

/// Parameters for quick runs: no random start, one frame per step, no testing
pub fn quick_param() -> Parameter {
    Parameter {
        num_epochs: 1,
        epoch_length: 100,
        test_length: 0,
        frame_skip: 1,
        max_start_nullops: 0,
        ..Parameter::default()
    }
}

#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub struct Hold;

impl Display for Hold {
    fn fmt(
        &self,
        f: &mut Formatter<'_>,
    ) -> std::fmt::Result {
        f.write_str("hold")
    }
}

impl Action for Hold {}

/// Shows the same picture on every frame; the game ends after `frames_per_game` frames.
pub struct StillImageEnvironment {
    width: u32,
    height: u32,
    /// row-major pixel generator input
    rows: Vec<u8>,
    frames_per_game: usize,
    frames_since_reset: usize,
}

impl StillImageEnvironment {
    /// `row_value(y)` is the gray value of every pixel in row `y`
    pub fn with_rows(
        width: u32,
        height: u32,
        row_value: impl Fn(u32) -> u8,
        frames_per_game: usize,
    ) -> Self {
        Self {
            width,
            height,
            rows: (0..height).map(row_value).collect(),
            frames_per_game,
            frames_since_reset: 0,
        }
    }
}

impl Environment for StillImageEnvironment {
    type A = Hold;

    fn reset(&mut self) -> Result<()> {
        self.frames_since_reset = 0;
        Ok(())
    }

    fn no_action(&self) -> Self::A { Hold }

    fn act(
        &mut self,
        _action: Self::A,
    ) -> Result<f32> {
        self.frames_since_reset += 1;
        Ok(1.0)
    }

    fn game_over(&self) -> bool { self.frames_since_reset >= self.frames_per_game }

    fn lives(&self) -> i32 { 1 }

    fn screen_dims(&self) -> (u32, u32) { (self.width, self.height) }

    fn grayscale_screen(&self) -> Result<Vec<u8>> {
        let mut screen = Vec::with_capacity(self.width as usize * self.height as usize);
        for _x in 0..self.width {
            screen.extend_from_slice(&self.rows);
        }
        Ok(screen)
    }

    fn legal_actions(&self) -> Vec<Self::A> { vec![Hold] }

    fn set_display_screen(
        &mut self,
        _display: bool,
    ) {
    }
}

/// Keeps every observation it receives
#[derive(Default)]
pub struct CapturingAgent {
    pub observations: Vec<Observation>,
    pub episode_ends: Vec<(f32, bool)>,
}

impl Agent for CapturingAgent {
    fn start_episode(
        &mut self,
        observation: Observation,
    ) -> Result<ActionIndex> {
        self.observations.push(observation);
        Ok(0)
    }

    fn step(
        &mut self,
        _reward: f32,
        observation: Observation,
    ) -> Result<ActionIndex> {
        self.observations.push(observation);
        Ok(0)
    }

    fn end_episode(
        &mut self,
        reward: f32,
        terminal: bool,
    ) -> Result<()> {
        self.episode_ends.push((reward, terminal));
        Ok(())
    }

    fn start_testing(&mut self) -> Result<()> { Ok(()) }

    fn finish_testing(
        &mut self,
        _epoch: usize,
    ) -> Result<()> {
        Ok(())
    }

    fn finish_epoch(
        &mut self,
        _epoch: usize,
    ) -> Result<()> {
        Ok(())
    }
}
