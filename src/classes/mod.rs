//! Class prototype store.
//!
//! Holds everything the classifier has learned: an ordered sequence of
//! classes, each an append-only set of normalized histogram prototypes with
//! one display color. Class 0 is the background, class 1 the primary
//! tracked object; further classes are added interactively.

mod palette;

pub use palette::{color_distance, Palette, Rgb, DEFAULT_MIN_COLOR_DISTANCE};

use crate::histogram::ColorHistogram;

/// Display color of the background class.
pub const BACKGROUND_COLOR: Rgb = [0, 0, 0];
/// Display color of the primary object class.
pub const PRIMARY_OBJECT_COLOR: Rgb = [255, 0, 0];

/// Index of the background class.
pub const BACKGROUND_CLASS: usize = 0;
/// Index of the primary object class.
pub const PRIMARY_OBJECT_CLASS: usize = 1;

/// One semantic label: a growable set of prototype histograms and the
/// display color its blocks are painted with.
#[derive(Debug, Clone)]
pub struct Class {
    prototypes: Vec<ColorHistogram>,
    color: Rgb,
}

impl Class {
    fn empty(color: Rgb) -> Self {
        Self {
            prototypes: Vec::new(),
            color,
        }
    }

    /// Returns the stored prototypes.
    #[inline]
    pub fn prototypes(&self) -> &[ColorHistogram] {
        &self.prototypes
    }

    /// Returns the display color.
    #[inline]
    pub fn color(&self) -> Rgb {
        self.color
    }

    /// Returns the minimum distance from `hist` to any prototype of this
    /// class, or `None` if the class has no prototypes yet.
    pub fn min_distance(&self, hist: &ColorHistogram) -> Option<f32> {
        self.prototypes
            .iter()
            .map(|p| hist.distance(p))
            .fold(None, |best, d| match best {
                Some(b) if b <= d => Some(b),
                _ => Some(d),
            })
    }
}

/// Result of a nearest-class query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NearestMatch {
    /// Index of the winning class.
    pub class_index: usize,
    /// Distance to the winning prototype.
    pub distance: f32,
}

/// Ordered collection of classes with their display colors.
///
/// The store always contains at least the background class (index 0) and
/// the primary object class (index 1), both initially empty. All mutation
/// happens between classification passes; the classifier only reads.
#[derive(Debug)]
pub struct ClassStore {
    classes: Vec<Class>,
    palette: Palette,
}

impl ClassStore {
    /// Creates a store in the initial two-class state with an OS-seeded
    /// palette.
    pub fn new() -> Self {
        Self::with_palette(Palette::default())
    }

    /// Creates a store with a caller-supplied palette (fixed seeds make
    /// class colors deterministic in tests).
    pub fn with_palette(palette: Palette) -> Self {
        Self {
            classes: Self::initial_classes(),
            palette,
        }
    }

    fn initial_classes() -> Vec<Class> {
        vec![
            Class::empty(BACKGROUND_COLOR),
            Class::empty(PRIMARY_OBJECT_COLOR),
        ]
    }

    /// Returns the number of classes, populated or not.
    #[inline]
    pub fn class_count(&self) -> usize {
        self.classes.len()
    }

    /// Returns the class at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    #[inline]
    pub fn class(&self, index: usize) -> &Class {
        &self.classes[index]
    }

    /// Returns the display color of the class at `index`.
    #[inline]
    pub fn color(&self, index: usize) -> Rgb {
        self.classes[index].color
    }

    /// Returns true if any class has at least one prototype.
    pub fn has_prototypes(&self) -> bool {
        self.classes.iter().any(|c| !c.prototypes.is_empty())
    }

    /// Appends a prototype to an existing class.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range or the histogram is not normalized.
    pub fn add_prototype(&mut self, index: usize, hist: ColorHistogram) {
        assert!(hist.is_normalized(), "prototypes must be normalized");
        self.classes[index].prototypes.push(hist);
    }

    /// Replaces all prototypes of an existing class with a single one.
    ///
    /// This is the capture-object semantics: the current object slot is
    /// overwritten, not appended to.
    pub fn replace_prototypes(&mut self, index: usize, hist: ColorHistogram) {
        assert!(hist.is_normalized(), "prototypes must be normalized");
        let class = &mut self.classes[index];
        class.prototypes.clear();
        class.prototypes.push(hist);
    }

    /// Removes all prototypes of an existing class, leaving it empty.
    pub fn clear_prototypes(&mut self, index: usize) {
        self.classes[index].prototypes.clear();
    }

    /// Appends a new class seeded with one prototype and a freshly
    /// generated display color. Returns the new class index.
    pub fn add_class(&mut self, seed: ColorHistogram) -> usize {
        assert!(seed.is_normalized(), "prototypes must be normalized");
        let used: Vec<Rgb> = self.classes.iter().map(|c| c.color).collect();
        let color = self.palette.generate(&used);

        self.classes.push(Class {
            prototypes: vec![seed],
            color,
        });
        let index = self.classes.len() - 1;
        tracing::info!(class = index, color = ?color, "new class added");
        index
    }

    /// Restores the initial two-class state: background (black) and primary
    /// object (red), both without prototypes.
    pub fn reset(&mut self) {
        self.classes = Self::initial_classes();
        tracing::info!("class store reset");
    }

    /// Finds the class owning the globally nearest prototype to `hist`.
    ///
    /// Scans every prototype of every class and keeps the minimum distance.
    /// Classes without prototypes contribute no candidate; ties go to the
    /// lowest class index. Returns `None` when no class has any prototype.
    pub fn nearest_class(&self, hist: &ColorHistogram) -> Option<NearestMatch> {
        let mut best: Option<NearestMatch> = None;
        for (index, class) in self.classes.iter().enumerate() {
            if let Some(distance) = class.min_distance(hist) {
                let improves = match best {
                    Some(b) => distance < b.distance,
                    None => true,
                };
                if improves {
                    best = Some(NearestMatch {
                        class_index: index,
                        distance,
                    });
                }
            }
        }
        best
    }
}

impl Default for ClassStore {
    fn default() -> Self {
        Self::new()
    }
}
