use crate::error::ExperimentError;
use crate::frame::GrayFrame;

/// Ring of the `NUM_FRAMES` most recently captured frames.
///
/// Write number `i` (counted from 0) lands in slot `i % NUM_FRAMES`.
/// `write_count` grows monotonically, so `(write_count - 1) % NUM_FRAMES` is always the slot of the most recent frame
/// and `(write_count - 2) % NUM_FRAMES` the one before it, regardless of wrap-around.
#[derive(Clone, Debug)]
pub struct FrameRingBuffer<const NUM_FRAMES: usize> {
    buffer: [GrayFrame; NUM_FRAMES],
    write_count: usize,
}

impl<const NUM_FRAMES: usize> FrameRingBuffer<NUM_FRAMES> {
    pub fn new(
        frame_size_x: u32,
        frame_size_y: u32,
    ) -> Self {
        Self {
            buffer: std::array::from_fn(|_| GrayFrame::new(frame_size_x, frame_size_y)),
            write_count: 0,
        }
    }

    pub fn add(
        &mut self,
        element: GrayFrame,
    ) {
        self.buffer[self.write_count % NUM_FRAMES] = element;
        self.write_count += 1;
    }

    /// Total number of frames written so far
    pub fn write_count(&self) -> usize { self.write_count }

    /// Frame captured `steps_into_history` writes ago (0 = most recent)
    pub fn get(
        &self,
        steps_into_history: usize,
    ) -> Result<&GrayFrame, ExperimentError> {
        if steps_into_history >= NUM_FRAMES {
            return Err(ExperimentError::precondition(format!(
                "available steps into history: 0..{}, requested: {}",
                NUM_FRAMES, steps_into_history
            )));
        }
        if steps_into_history >= self.write_count {
            return Err(ExperimentError::precondition(format!(
                "frame {} steps back requested, but only {} frames captured so far",
                steps_into_history, self.write_count
            )));
        }
        let slot = (self.write_count - 1 - steps_into_history) % NUM_FRAMES;
        Ok(&self.buffer[slot])
    }
}
