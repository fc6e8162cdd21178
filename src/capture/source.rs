//! Frame source abstraction.
//!
//! This module provides a trait-based abstraction over video input,
//! allowing for both real camera input and mock implementations for testing.
//! Real capture hardware is an external collaborator; the core only ever
//! asks a source for the next frame.

use super::{CaptureConfig, Frame};
use thiserror::Error;

/// Errors that can occur while acquiring frames.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The requested device could not be found.
    #[error("frame source not found: {0}")]
    DeviceNotFound(String),
    /// The source could not be opened.
    #[error("failed to open frame source: {0}")]
    OpenFailed(String),
    /// The source rejected the requested configuration.
    #[error("failed to configure frame source: {0}")]
    ConfigFailed(String),
    /// A frame could not be produced.
    #[error("failed to capture frame: {0}")]
    CaptureFailed(String),
    /// The source was used before `open`.
    #[error("frame source not initialized")]
    NotInitialized,
}

/// Trait for frame source implementations.
///
/// This abstraction allows swapping between real camera hardware
/// and mock implementations for testing.
pub trait FrameSource {
    /// Opens and initializes the source with the given configuration.
    fn open(&mut self, config: &CaptureConfig) -> Result<(), SourceError>;

    /// Captures a single frame.
    fn capture(&mut self) -> Result<Frame, SourceError>;

    /// Checks if the source is currently open.
    fn is_open(&self) -> bool;

    /// Closes the source and releases resources.
    fn close(&mut self);
}

/// Mock camera generating synthetic color frames.
///
/// Each frame shows a colored square drifting over a flat background, so
/// interactive capture commands have something to learn from. The pattern
/// is deterministic in the sequence number.
#[derive(Debug, Default)]
pub struct MockCamera {
    config: Option<CaptureConfig>,
    sequence: u64,
}

impl MockCamera {
    /// Creates a closed mock camera.
    pub fn new() -> Self {
        Self::default()
    }
}

/// Background color of synthetic frames.
const MOCK_BACKGROUND: [u8; 3] = [40, 110, 40];
/// Color of the drifting square.
const MOCK_OBJECT: [u8; 3] = [200, 60, 30];
/// Side length of the drifting square in pixels.
const MOCK_OBJECT_SIZE: u32 = 80;

impl FrameSource for MockCamera {
    fn open(&mut self, config: &CaptureConfig) -> Result<(), SourceError> {
        config
            .validate()
            .map_err(|e| SourceError::ConfigFailed(e.to_string()))?;
        self.config = Some(config.clone());
        self.sequence = 0;
        tracing::info!("MockCamera opened with config: {:?}", config);
        Ok(())
    }

    fn capture(&mut self) -> Result<Frame, SourceError> {
        let config = self.config.as_ref().ok_or(SourceError::NotInitialized)?;

        let (width, height) = (config.width, config.height);
        let pixel_count = (width as usize) * (height as usize);
        let mut pixels = Vec::with_capacity(pixel_count * 3);
        for _ in 0..pixel_count {
            pixels.extend_from_slice(&MOCK_BACKGROUND);
        }

        // Drift the square one pixel per frame, wrapping inside the frame
        let span_x = width.saturating_sub(MOCK_OBJECT_SIZE).max(1) as u64;
        let span_y = height.saturating_sub(MOCK_OBJECT_SIZE).max(1) as u64;
        let x0 = (self.sequence % span_x) as u32;
        let y0 = ((self.sequence / 2) % span_y) as u32;

        for y in y0..(y0 + MOCK_OBJECT_SIZE).min(height) {
            for x in x0..(x0 + MOCK_OBJECT_SIZE).min(width) {
                let idx = ((y as usize) * (width as usize) + (x as usize)) * 3;
                pixels[idx..idx + 3].copy_from_slice(&MOCK_OBJECT);
            }
        }

        self.sequence += 1;
        Ok(Frame::new(pixels, width, height, self.sequence))
    }

    fn is_open(&self) -> bool {
        self.config.is_some()
    }

    fn close(&mut self) {
        self.config = None;
        tracing::info!("MockCamera closed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_camera_lifecycle() {
        let mut camera = MockCamera::new();
        let config = CaptureConfig::default();

        assert!(!camera.is_open());

        camera.open(&config).unwrap();
        assert!(camera.is_open());

        let frame = camera.capture().unwrap();
        assert!(frame.is_valid());
        assert_eq!(frame.sequence(), 1);

        let frame2 = camera.capture().unwrap();
        assert_eq!(frame2.sequence(), 2);

        camera.close();
        assert!(!camera.is_open());
    }

    #[test]
    fn test_capture_without_open() {
        let mut camera = MockCamera::new();
        assert!(matches!(camera.capture(), Err(SourceError::NotInitialized)));
    }

    #[test]
    fn test_mock_frames_contain_two_colors() {
        let mut camera = MockCamera::new();
        camera.open(&CaptureConfig::default()).unwrap();

        let frame = camera.capture().unwrap();
        let has_background = (0..frame.height())
            .any(|y| (0..frame.width()).any(|x| frame.pixel(x, y) == MOCK_BACKGROUND));
        let has_object = (0..frame.height())
            .any(|y| (0..frame.width()).any(|x| frame.pixel(x, y) == MOCK_OBJECT));

        assert!(has_background);
        assert!(has_object);
    }
}
