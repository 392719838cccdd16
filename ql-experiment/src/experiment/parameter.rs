use crate::error::ExperimentError;
use crate::frame::resize::ResizeMethod;

pub struct Parameter {
    /// Observation width handed to the agent
    pub resized_width: u32,
    /// Observation height handed to the agent
    pub resized_height: u32,
    pub resize_method: ResizeMethod,
    pub num_epochs: usize,
    /// Training steps per epoch
    pub epoch_length: usize,
    /// Testing steps per epoch; 0 disables testing
    pub test_length: usize,
    /// Number of frames each chosen action is repeated
    pub frame_skip: usize,
    /// Losing a life ends the episode (during training only); the game itself continues
    pub death_ends_episode: bool,
    /// Upper bound (inclusive) of random null actions performed after a reset
    pub max_start_nullops: usize,
    /// Hard step limit of a single episode
    pub max_steps_per_episode: usize,
}

impl Parameter {
    pub fn validate(&self) -> Result<(), ExperimentError> {
        let positive = [
            ("resized_width", self.resized_width as usize),
            ("resized_height", self.resized_height as usize),
            ("num_epochs", self.num_epochs),
            ("frame_skip", self.frame_skip),
            ("max_steps_per_episode", self.max_steps_per_episode),
        ];
        match positive.iter().find(|(_, value)| *value == 0) {
            Some((name, _)) => Err(ExperimentError::configuration(format!("{} must be positive", name))),
            None => Ok(()),
        }
    }
}

impl Default for Parameter {
    fn default() -> Self {
        Self {
            resized_width: 84,
            resized_height: 84,
            resize_method: ResizeMethod::Crop,
            num_epochs: 200,
            epoch_length: 250_000,
            test_length: 125_000,
            frame_skip: 4,
            death_ends_episode: true,
            max_start_nullops: 30,
            max_steps_per_episode: 10_000,
        }
    }
}
