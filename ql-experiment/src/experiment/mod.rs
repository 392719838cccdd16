//! The experiment loop: epochs made of training and testing blocks, blocks made of episodes.

pub mod episode;
pub mod parameter;
pub mod runner;
