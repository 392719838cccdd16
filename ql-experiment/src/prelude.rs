use std::fmt::{Debug, Display};
use std::hash::Hash;

use anyhow::Result;

pub use crate::error::ExperimentError;
pub use crate::frame::{GrayFrame, Observation};

/// Position of an action within [Environment::legal_actions].
/// This is what an [Agent] decides on.
pub type ActionIndex = usize;

pub trait Action: Display + Debug + Sized + Clone + Copy + Hash + PartialEq + Eq {}

/// Game environment, driven forward one frame per [Environment::act].
///
/// Design goal: the experiment loop shall work with any frame-producing game (emulator, simulation, test double),
/// so the environment only needs to report its raw screen; buffering and preprocessing happen on the driver side.
pub trait Environment {
    type A: Action;

    /// Resets the game to a fresh start (all lives restored)
    fn reset(&mut self) -> Result<()>;

    /// The Action-variant which has no effect on the game
    fn no_action(&self) -> Self::A;

    /// Performs one frame with the given action and returns the immediate reward of that frame
    fn act(
        &mut self,
        action: Self::A,
    ) -> Result<f32>;

    fn game_over(&self) -> bool;

    /// Lives left in the current game
    fn lives(&self) -> i32;

    /// Screen size `(width, height)` in pixels; expected to be constant over the environment's lifetime
    fn screen_dims(&self) -> (u32, u32);

    /// Current screen as 8-bit gray values in x-major order,
    /// i.e. the value of pixel `(x, y)` is found at index `x * height + y`.
    fn grayscale_screen(&self) -> Result<Vec<u8>>;

    /// Ordered set of actions an agent may choose from
    fn legal_actions(&self) -> Vec<Self::A>;

    /// Switches visual rendering of the game on or off
    fn set_display_screen(
        &mut self,
        display: bool,
    );
}

/// A learning agent as seen from the experiment loop.
///
/// Each call which hands over an [Observation] asks for the [ActionIndex] to perform next.
pub trait Agent {
    fn start_episode(
        &mut self,
        observation: Observation,
    ) -> Result<ActionIndex>;

    fn step(
        &mut self,
        reward: f32,
        observation: Observation,
    ) -> Result<ActionIndex>;

    /// Last call of an episode.
    /// `terminal` is false when the episode was cut by the step limit.
    fn end_episode(
        &mut self,
        reward: f32,
        terminal: bool,
    ) -> Result<()>;

    fn start_testing(&mut self) -> Result<()>;

    fn finish_testing(
        &mut self,
        epoch: usize,
    ) -> Result<()>;

    fn finish_epoch(
        &mut self,
        epoch: usize,
    ) -> Result<()>;
}
