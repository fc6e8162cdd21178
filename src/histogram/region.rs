//! Rectangular frame regions and histogram sampling.

use super::ColorHistogram;
use crate::capture::Frame;

/// An axis-aligned pixel rectangle, half-open on the right and bottom.
///
/// `(x, y)` is the top-left corner; the region covers
/// `[x, x + width) x [y, y + height)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    /// Left edge in pixels.
    pub x: u32,
    /// Top edge in pixels.
    pub y: u32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Region {
    /// Creates a region from its top-left corner and dimensions.
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Creates a `size` x `size` square centered in a frame of the given
    /// dimensions. This is the fixed target rectangle used by the capture
    /// commands.
    pub fn centered(frame_width: u32, frame_height: u32, size: u32) -> Self {
        Self {
            x: frame_width / 2 - size / 2,
            y: frame_height / 2 - size / 2,
            width: size,
            height: size,
        }
    }

    /// Returns the left half of a frame of the given dimensions.
    pub fn left_half(frame_width: u32, frame_height: u32) -> Self {
        Self::new(0, 0, frame_width / 2, frame_height)
    }

    /// Returns the right half of a frame of the given dimensions.
    pub fn right_half(frame_width: u32, frame_height: u32) -> Self {
        Self::new(frame_width / 2, 0, frame_width - frame_width / 2, frame_height)
    }

    /// Returns the number of pixels covered.
    #[inline]
    pub fn area(&self) -> u64 {
        (self.width as u64) * (self.height as u64)
    }

    /// Returns true if the region lies fully inside a frame of the given
    /// dimensions.
    pub fn fits(&self, frame_width: u32, frame_height: u32) -> bool {
        self.x + self.width <= frame_width && self.y + self.height <= frame_height
    }
}

impl ColorHistogram {
    /// Samples a region of a frame into a normalized histogram.
    ///
    /// Iterates every pixel of the half-open rectangle, accumulates it, and
    /// normalizes the result.
    ///
    /// # Panics
    ///
    /// Panics if the region is empty or extends outside the frame. Both are
    /// caller errors, not runtime conditions.
    pub fn from_region(frame: &Frame, region: Region) -> Self {
        assert!(region.area() > 0, "cannot sample an empty region");
        assert!(
            region.fits(frame.width(), frame.height()),
            "region {:?} outside {}x{} frame",
            region,
            frame.width(),
            frame.height()
        );

        let mut hist = Self::new();
        for y in region.y..region.y + region.height {
            for x in region.x..region.x + region.width {
                hist.add(frame.pixel(x, y));
            }
        }
        hist.normalize();
        hist
    }
}
