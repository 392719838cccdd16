use std::fmt::{Display, Formatter};
use std::str::FromStr;

use image::imageops;
use image::imageops::FilterType;

use crate::error::ExperimentError;
use crate::frame::GrayFrame;

/// Rows kept free below the crop window.
/// Biases the window towards the lower screen part, where the game play of most Atari-style games happens.
pub const CROP_OFFSET: u32 = 8;

/// How a merged screen frame is brought to observation size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeMethod {
    /// Scale to observation width keeping the aspect ratio, then cut a window of observation height
    Crop,
    /// Scale to observation size ignoring the aspect ratio
    Scale,
}

impl FromStr for ResizeMethod {
    type Err = ExperimentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "crop" => Ok(ResizeMethod::Crop),
            "scale" => Ok(ResizeMethod::Scale),
            _ => Err(ExperimentError::configuration(format!("unrecognized image resize method: '{}'", s))),
        }
    }
}

impl Display for ResizeMethod {
    fn fmt(
        &self,
        f: &mut Formatter<'_>,
    ) -> std::fmt::Result {
        match self {
            ResizeMethod::Crop => f.write_str("crop"),
            ResizeMethod::Scale => f.write_str("scale"),
        }
    }
}

/// Resizes screen-sized frames to observation size; all geometry is computed once at construction.
#[derive(Debug, Clone)]
pub struct FrameResizer {
    screen_width: u32,
    resized_width: u32,
    resized_height: u32,
    method: ResizeMethod,
    /// height after aspect-preserving scaling (crop method only)
    scaled_height: u32,
    /// first row of the crop window, if cropping is needed at all
    crop_y: Option<u32>,
}

impl FrameResizer {
    pub fn new(
        (screen_width, screen_height): (u32, u32),
        (resized_width, resized_height): (u32, u32),
        method: ResizeMethod,
    ) -> Result<Self, ExperimentError> {
        if screen_width == 0 || screen_height == 0 {
            return Err(ExperimentError::configuration(format!(
                "screen dimensions must be positive, got {}x{}",
                screen_width, screen_height
            )));
        }
        if resized_width == 0 || resized_height == 0 {
            return Err(ExperimentError::configuration(format!(
                "observation dimensions must be positive, got {}x{}",
                resized_width, resized_height
            )));
        }

        let scaled_height = (screen_height as f64 * resized_width as f64 / screen_width as f64).round() as u32;

        let crop_y = match method {
            ResizeMethod::Crop if scaled_height != resized_height => {
                let crop_y = scaled_height as i64 - CROP_OFFSET as i64 - resized_height as i64;
                if crop_y < 0 {
                    return Err(ExperimentError::configuration(format!(
                        "crop window of height {} does not fit into the scaled screen height {} (offset {}); consider resize method '{}'",
                        resized_height,
                        scaled_height,
                        CROP_OFFSET,
                        ResizeMethod::Scale
                    )));
                }
                Some(crop_y as u32)
            }
            _ => None,
        };

        Ok(Self {
            screen_width,
            resized_width,
            resized_height,
            method,
            scaled_height,
            crop_y,
        })
    }

    pub fn method(&self) -> ResizeMethod { self.method }

    pub fn output_dims(&self) -> (u32, u32) { (self.resized_width, self.resized_height) }

    /// First row of the crop window within the scaled frame; `None` if no cropping takes place
    pub fn crop_y(&self) -> Option<u32> { self.crop_y }

    pub fn resize(
        &self,
        frame: &GrayFrame,
    ) -> GrayFrame {
        // screen already delivered in observation size
        if frame.dimensions() == (self.screen_width, self.resized_height) && self.screen_width == self.resized_width {
            return frame.clone();
        }

        match self.method {
            ResizeMethod::Crop => {
                let scaled = imageops::resize(frame, self.resized_width, self.scaled_height, FilterType::Triangle);
                match self.crop_y {
                    None => scaled,
                    Some(y) => imageops::crop_imm(&scaled, 0, y, self.resized_width, self.resized_height).to_image(),
                }
            }
            ResizeMethod::Scale => imageops::resize(frame, self.resized_width, self.resized_height, FilterType::Triangle),
        }
    }
}
