use anyhow::Result;

use crate::error::ExperimentError;
use crate::frame::resize::FrameResizer;
use crate::frame::ring_buffer::FrameRingBuffer;
use crate::frame::{max_merge, transpose_screen, Observation};
use crate::prelude::Environment;

/// Number of raw frames merged into one observation
pub const SCREEN_BUFFER_LEN: usize = 2;

pub type ScreenBuffer = FrameRingBuffer<SCREEN_BUFFER_LEN>;

/// Captures every environment frame and turns the two most recent ones into an [Observation].
pub struct FramePipeline {
    screen_width: u32,
    screen_height: u32,
    screen_buffer: ScreenBuffer,
    resizer: FrameResizer,
}

impl FramePipeline {
    pub fn new(
        (screen_width, screen_height): (u32, u32),
        resizer: FrameResizer,
    ) -> Self {
        Self {
            screen_width,
            screen_height,
            screen_buffer: ScreenBuffer::new(screen_width, screen_height),
            resizer,
        }
    }

    pub fn resizer(&self) -> &FrameResizer { &self.resizer }

    /// Number of frames captured since construction
    pub fn frame_count(&self) -> usize { self.screen_buffer.write_count() }

    /// Stores the current environment screen as the most recent frame
    pub fn capture<E: Environment>(
        &mut self,
        environment: &E,
    ) -> Result<()> {
        let raw = environment.grayscale_screen()?;
        let frame = transpose_screen(&raw, self.screen_width, self.screen_height)?;
        self.screen_buffer.add(frame);
        Ok(())
    }

    /// Performs the action for a single frame, returns the reward of that frame and captures the resulting screen
    pub fn act<E: Environment>(
        &mut self,
        environment: &mut E,
        action: E::A,
    ) -> Result<f32> {
        let reward = environment.act(action)?;
        self.capture(environment)?;
        Ok(reward)
    }

    /// Repeats one action `frame_skip` times and returns the summed reward
    pub fn step<E: Environment>(
        &mut self,
        environment: &mut E,
        action: E::A,
        frame_skip: usize,
    ) -> Result<f32> {
        let mut reward = 0.0;
        for _ in 0..frame_skip {
            reward += self.act(environment, action)?;
        }
        Ok(reward)
    }

    /// Merges the two most recent frames and resizes the result.
    /// Requires at least [SCREEN_BUFFER_LEN] captured frames.
    pub fn observation(&self) -> Result<Observation, ExperimentError> {
        if self.screen_buffer.write_count() < SCREEN_BUFFER_LEN {
            return Err(ExperimentError::precondition(format!(
                "an observation needs {} captured frames, got {}",
                SCREEN_BUFFER_LEN,
                self.screen_buffer.write_count()
            )));
        }
        let latest = self.screen_buffer.get(0)?;
        let previous = self.screen_buffer.get(1)?;
        Ok(self.resizer.resize(&max_merge(latest, previous)))
    }
}
