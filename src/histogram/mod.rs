//! Quantized color distributions and region sampling.
//!
//! This module holds the leaf representation the whole classifier is built
//! on: a fixed-resolution 3D histogram over RGB space, with accumulate,
//! normalize and distance operations, plus the sampler that builds one from
//! a rectangular frame region.

mod region;

pub use region::Region;

/// Number of bins per color channel.
pub const BINS_PER_CHANNEL: usize = 8;

/// Total number of histogram cells (8 x 8 x 8).
pub const CELL_COUNT: usize = BINS_PER_CHANNEL * BINS_PER_CHANNEL * BINS_PER_CHANNEL;

/// Width of one bin in 8-bit channel values (256 / 8).
const BIN_WIDTH: u8 = 32;

/// A quantized color distribution over RGB space.
///
/// Each 8-bit channel is divided by 32 to yield a bin index in 0..8, giving
/// 512 cells. Before [`normalize`](Self::normalize) the cells hold raw
/// sample counts; afterwards they form a probability mass function over the
/// color bins and the histogram is treated as immutable.
#[derive(Clone)]
pub struct ColorHistogram {
    /// Cell values, flat in (r, g, b) bin order.
    cells: [f32; CELL_COUNT],
    /// Number of samples accumulated.
    nb: u32,
    /// Set once by `normalize`; guards against further mutation.
    normalized: bool,
}

impl ColorHistogram {
    /// Creates an empty histogram.
    pub fn new() -> Self {
        Self {
            cells: [0.0; CELL_COUNT],
            nb: 0,
            normalized: false,
        }
    }

    /// Zeroes all cells and the sample count, making the histogram
    /// accumulable again.
    pub fn reset(&mut self) {
        self.cells = [0.0; CELL_COUNT];
        self.nb = 0;
        self.normalized = false;
    }

    /// Returns the flat cell index for an RGB sample.
    #[inline]
    fn cell_index(color: [u8; 3]) -> usize {
        let r = (color[0] / BIN_WIDTH) as usize;
        let g = (color[1] / BIN_WIDTH) as usize;
        let b = (color[2] / BIN_WIDTH) as usize;
        (r * BINS_PER_CHANNEL + g) * BINS_PER_CHANNEL + b
    }

    /// Adds one RGB sample to the histogram.
    ///
    /// # Panics
    ///
    /// Panics (in debug builds) if called after [`normalize`](Self::normalize);
    /// a normalized histogram is immutable.
    #[inline]
    pub fn add(&mut self, color: [u8; 3]) {
        debug_assert!(!self.normalized, "add called on a normalized histogram");
        self.cells[Self::cell_index(color)] += 1.0;
        self.nb += 1;
    }

    /// Divides every cell by the sample count, turning the histogram into a
    /// probability mass function. Call exactly once, after all samples have
    /// been added.
    ///
    /// # Panics
    ///
    /// Panics if the histogram is empty or already normalized. Sampling a
    /// zero-pixel region is a programming error, not a runtime condition.
    pub fn normalize(&mut self) {
        assert!(self.nb > 0, "cannot normalize an empty histogram");
        assert!(!self.normalized, "histogram already normalized");
        let n = self.nb as f32;
        for cell in &mut self.cells {
            *cell /= n;
        }
        self.normalized = true;
    }

    /// Returns the L1 distance to another histogram: the sum of absolute
    /// per-cell differences.
    ///
    /// For two normalized histograms this is the total-variation distance
    /// doubled, bounded by 2.0. It is symmetric, zero exactly for identical
    /// histograms, and satisfies the triangle inequality.
    pub fn distance(&self, other: &ColorHistogram) -> f32 {
        self.cells
            .iter()
            .zip(other.cells.iter())
            .map(|(a, b)| (a - b).abs())
            .sum()
    }

    /// Returns the value of the cell at the given bin indices.
    #[inline]
    pub fn cell(&self, r_bin: usize, g_bin: usize, b_bin: usize) -> f32 {
        self.cells[(r_bin * BINS_PER_CHANNEL + g_bin) * BINS_PER_CHANNEL + b_bin]
    }

    /// Returns the number of samples accumulated.
    #[inline]
    pub fn sample_count(&self) -> u32 {
        self.nb
    }

    /// Returns true once `normalize` has run.
    #[inline]
    pub fn is_normalized(&self) -> bool {
        self.normalized
    }
}

impl Default for ColorHistogram {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ColorHistogram {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let populated = self.cells.iter().filter(|&&c| c > 0.0).count();
        f.debug_struct("ColorHistogram")
            .field("samples", &self.nb)
            .field("populated_cells", &populated)
            .field("normalized", &self.normalized)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    /// Builds a normalized histogram from a non-empty list of colors.
    fn histogram_of(colors: &[[u8; 3]]) -> ColorHistogram {
        let mut h = ColorHistogram::new();
        for &c in colors {
            h.add(c);
        }
        h.normalize();
        h
    }

    #[test]
    fn test_bin_indices_follow_channel_division() {
        let mut h = ColorHistogram::new();
        h.add([255, 0, 64]);
        h.normalize();

        // 255/32 = 7, 0/32 = 0, 64/32 = 2
        assert_eq!(h.cell(7, 0, 2), 1.0);
    }

    #[test]
    fn test_counts_sum_to_sample_count_before_normalize() {
        let mut h = ColorHistogram::new();
        for v in 0u8..=255 {
            h.add([v, v, v]);
        }

        let total: f32 = (0..BINS_PER_CHANNEL)
            .map(|i| h.cell(i, i, i))
            .sum();
        assert_eq!(total, 256.0);
        assert_eq!(h.sample_count(), 256);
    }

    #[test]
    fn test_normalized_cells_sum_to_one() {
        let h = histogram_of(&[[0, 0, 0], [255, 255, 255], [128, 128, 128]]);

        let mut total = 0.0f32;
        for r in 0..BINS_PER_CHANNEL {
            for g in 0..BINS_PER_CHANNEL {
                for b in 0..BINS_PER_CHANNEL {
                    total += h.cell(r, g, b);
                }
            }
        }
        assert!((total - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_self_distance_is_zero() {
        let h = histogram_of(&[[10, 200, 30], [10, 200, 30], [90, 90, 90]]);
        assert_eq!(h.distance(&h), 0.0);
    }

    #[test]
    fn test_disjoint_histograms_at_maximum_distance() {
        let black = histogram_of(&[[0, 0, 0]]);
        let white = histogram_of(&[[255, 255, 255]]);

        // All mass in different cells: L1 distance is exactly 2
        assert!((black.distance(&white) - 2.0).abs() < 1e-6);
    }

    #[test]
    #[should_panic(expected = "cannot normalize an empty histogram")]
    fn test_normalize_empty_panics() {
        ColorHistogram::new().normalize();
    }

    #[test]
    #[should_panic(expected = "already normalized")]
    fn test_double_normalize_panics() {
        let mut h = ColorHistogram::new();
        h.add([1, 2, 3]);
        h.normalize();
        h.normalize();
    }

    #[test]
    fn test_reset_clears_normalized_state() {
        let mut h = ColorHistogram::new();
        h.add([1, 2, 3]);
        h.normalize();

        h.reset();
        assert_eq!(h.sample_count(), 0);
        assert!(!h.is_normalized());

        // Accumulation works again after reset
        h.add([1, 2, 3]);
        h.normalize();
        assert_eq!(h.cell(0, 0, 0), 1.0);
    }

    proptest! {
        #[test]
        fn prop_distance_symmetric_and_bounded(
            a in proptest::collection::vec(any::<[u8; 3]>(), 1..64),
            b in proptest::collection::vec(any::<[u8; 3]>(), 1..64),
        ) {
            let ha = histogram_of(&a);
            let hb = histogram_of(&b);

            let d_ab = ha.distance(&hb);
            let d_ba = hb.distance(&ha);

            prop_assert!((d_ab - d_ba).abs() < 1e-6);
            prop_assert!(d_ab >= 0.0);
            prop_assert!(d_ab <= 2.0 + 1e-5);
        }

        #[test]
        fn prop_self_distance_zero(
            a in proptest::collection::vec(any::<[u8; 3]>(), 1..64),
        ) {
            let ha = histogram_of(&a);
            prop_assert_eq!(ha.distance(&ha), 0.0);
        }
    }
}
