//! Frame preprocessing: from raw environment screens to agent observations.
//!
//! Axis convention: environments report screens x-major (`[width][height]`),
//! while [GrayFrame] stores pixels row-major (`[height][width]`) and is addressed by `(x, y)`.
//! [transpose_screen] is the single place where one is converted into the other.

use image::{ImageBuffer, Luma};

use crate::error::ExperimentError;

pub mod pipeline;
pub mod resize;
pub mod ring_buffer;

/// Gray-scaled image
pub type GrayFrame = ImageBuffer<Luma<u8>, Vec<u8>>;

/// Preprocessed frame of the configured observation size, as handed to the agent
pub type Observation = GrayFrame;

/// Transposes an x-major raw screen (`index = x * height + y`) into a [GrayFrame]
pub fn transpose_screen(
    raw: &[u8],
    width: u32,
    height: u32,
) -> Result<GrayFrame, ExperimentError> {
    let expected = width as usize * height as usize;
    if raw.len() != expected {
        return Err(ExperimentError::ScreenSize {
            expected,
            actual: raw.len(),
        });
    }
    Ok(GrayFrame::from_fn(width, height, |x, y| {
        Luma([raw[x as usize * height as usize + y as usize]])
    }))
}

/// Per-pixel maximum of two equally sized frames.
/// Removes the flicker of sprites which are only drawn on every other frame.
pub fn max_merge(
    a: &GrayFrame,
    b: &GrayFrame,
) -> GrayFrame {
    debug_assert_eq!(a.dimensions(), b.dimensions());
    GrayFrame::from_fn(a.width(), a.height(), |x, y| {
        Luma([a.get_pixel(x, y)[0].max(b.get_pixel(x, y)[0])])
    })
}
