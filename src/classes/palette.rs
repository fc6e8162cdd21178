//! Display-color generation for class overlays.
//!
//! New classes get a random RGB display color, rejection-sampled so that
//! every color on screen stays visually separable from the others.

use rand_chacha::ChaCha20Rng;
use rand_core::{RngCore, SeedableRng};

/// An 8-bit RGB display color.
pub type Rgb = [u8; 3];

/// Euclidean distance between two RGB colors.
pub fn color_distance(a: Rgb, b: Rgb) -> f64 {
    let dr = a[0] as f64 - b[0] as f64;
    let dg = a[1] as f64 - b[1] as f64;
    let db = a[2] as f64 - b[2] as f64;
    (dr * dr + dg * dg + db * db).sqrt()
}

/// Generates display colors for new classes.
///
/// Candidates are drawn uniformly from RGB space and redrawn while any
/// existing color is closer than `min_distance`. The loop terminates almost
/// surely rather than deterministically; the 16.7M-color space dwarfs any
/// realistic class count, so no iteration cap is applied.
#[derive(Debug)]
pub struct Palette {
    rng: ChaCha20Rng,
    min_distance: f64,
}

/// Default minimum Euclidean distance between display colors.
pub const DEFAULT_MIN_COLOR_DISTANCE: f64 = 50.0;

impl Palette {
    /// Creates a palette seeded from the OS entropy source.
    pub fn new(min_distance: f64) -> Self {
        let mut seed = [0u8; 32];
        rand_core::OsRng.fill_bytes(&mut seed);
        Self::from_seed(seed, min_distance)
    }

    /// Creates a palette from a fixed seed, for deterministic tests.
    pub fn from_seed(seed: [u8; 32], min_distance: f64) -> Self {
        Self {
            rng: ChaCha20Rng::from_seed(seed),
            min_distance,
        }
    }

    /// Draws one uniform random RGB candidate.
    fn draw(&mut self) -> Rgb {
        let bits = self.rng.next_u32();
        [bits as u8, (bits >> 8) as u8, (bits >> 16) as u8]
    }

    /// Generates a color at least `min_distance` away from every color in
    /// `used`.
    pub fn generate(&mut self, used: &[Rgb]) -> Rgb {
        loop {
            let candidate = self.draw();
            let separable = used
                .iter()
                .all(|&c| color_distance(candidate, c) >= self.min_distance);
            if separable {
                return candidate;
            }
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_COLOR_DISTANCE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_distance_axes() {
        assert_eq!(color_distance([0, 0, 0], [0, 0, 0]), 0.0);
        assert_eq!(color_distance([255, 0, 0], [0, 0, 0]), 255.0);
        assert!((color_distance([3, 4, 0], [0, 0, 0]) - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_generated_color_respects_separation() {
        let mut palette = Palette::from_seed([7u8; 32], 50.0);
        let used = vec![[0, 0, 0], [255, 0, 0]];

        for _ in 0..100 {
            let color = palette.generate(&used);
            for &c in &used {
                assert!(color_distance(color, c) >= 50.0);
            }
        }
    }

    #[test]
    fn test_palette_stress_pairwise_separation() {
        // 1000 colors, every pair at distance >= threshold. A 50.0 threshold
        // cannot pack 1000 colors into the RGB cube, so the stress run uses a
        // tighter spacing; the production default is exercised above.
        let mut palette = Palette::from_seed([42u8; 32], 12.0);
        let mut used: Vec<Rgb> = vec![[0, 0, 0], [255, 0, 0]];

        for _ in 0..1000 {
            let color = palette.generate(&used);
            used.push(color);
        }

        for i in 0..used.len() {
            for j in (i + 1)..used.len() {
                assert!(
                    color_distance(used[i], used[j]) >= 12.0,
                    "colors {:?} and {:?} too close",
                    used[i],
                    used[j]
                );
            }
        }
    }

    #[test]
    fn test_deterministic_for_fixed_seed() {
        let mut a = Palette::from_seed([9u8; 32], 50.0);
        let mut b = Palette::from_seed([9u8; 32], 50.0);
        let used = [[0, 0, 0]];

        assert_eq!(a.generate(&used), b.generate(&used));
    }
}
