//! Block classification sweep.
//!
//! Partitions a frame into a regular grid of fixed-size blocks, samples a
//! histogram per block and assigns each block the class of its globally
//! nearest prototype. The output is a per-block class-index grid; painting
//! it (class colors alpha-blended over a grayscale base) belongs to the
//! presentation boundary.

mod grouped;

pub use grouped::classify_grouped;

use crate::capture::Frame;
use crate::classes::ClassStore;
use crate::histogram::{ColorHistogram, Region};

/// Per-block classification result.
///
/// Cell `(col, row)` covers the pixel block starting at
/// `(col * block_size, row * block_size)`. `None` means unassigned: the
/// store had no populated class when the sweep ran. A trailing partial
/// row or column of the frame is not part of the grid.
#[derive(Debug, Clone)]
pub struct LabelGrid {
    cols: u32,
    rows: u32,
    block_size: u32,
    labels: Vec<Option<usize>>,
}

impl LabelGrid {
    fn new(cols: u32, rows: u32, block_size: u32) -> Self {
        Self {
            cols,
            rows,
            block_size,
            labels: vec![None; (cols as usize) * (rows as usize)],
        }
    }

    /// Returns the number of grid columns.
    #[inline]
    pub fn cols(&self) -> u32 {
        self.cols
    }

    /// Returns the number of grid rows.
    #[inline]
    pub fn rows(&self) -> u32 {
        self.rows
    }

    /// Returns the side length in pixels of the blocks this grid labels.
    #[inline]
    pub fn block_size(&self) -> u32 {
        self.block_size
    }

    /// Returns the class index assigned to cell `(col, row)`, or `None` if
    /// the cell is unassigned.
    ///
    /// # Panics
    ///
    /// Panics if the cell is outside the grid.
    #[inline]
    pub fn label(&self, col: u32, row: u32) -> Option<usize> {
        assert!(col < self.cols && row < self.rows, "cell outside grid");
        self.labels[(row as usize) * (self.cols as usize) + (col as usize)]
    }

    #[inline]
    fn set(&mut self, col: u32, row: u32, label: Option<usize>) {
        self.labels[(row as usize) * (self.cols as usize) + (col as usize)] = label;
    }

    /// Returns the pixel region covered by cell `(col, row)`.
    pub fn cell_region(&self, col: u32, row: u32) -> Region {
        Region::new(
            col * self.block_size,
            row * self.block_size,
            self.block_size,
            self.block_size,
        )
    }

    /// Returns the number of cells holding a class index.
    pub fn assigned_count(&self) -> usize {
        self.labels.iter().filter(|l| l.is_some()).count()
    }

    /// Iterates over `(col, row, label)` triples in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, u32, Option<usize>)> + '_ {
        let cols = self.cols;
        self.labels
            .iter()
            .enumerate()
            .map(move |(i, &label)| (i as u32 % cols, i as u32 / cols, label))
    }
}

/// Classifies every full `block_size` x `block_size` block of a frame.
///
/// Blocks tile the frame from `(0, 0)`; a trailing partial row or column is
/// left out of the grid rather than classified. Each block's histogram is
/// matched against every prototype in the store; with no populated class
/// every cell stays unassigned.
///
/// # Panics
///
/// Panics if `block_size` is zero or exceeds either frame dimension.
pub fn classify(frame: &Frame, block_size: u32, store: &ClassStore) -> LabelGrid {
    assert!(
        block_size > 0 && block_size <= frame.width() && block_size <= frame.height(),
        "block size {} does not fit {}x{} frame",
        block_size,
        frame.width(),
        frame.height()
    );

    let cols = frame.width() / block_size;
    let rows = frame.height() / block_size;
    let mut grid = LabelGrid::new(cols, rows, block_size);

    if !store.has_prototypes() {
        tracing::debug!("classification skipped: no populated classes");
        return grid;
    }

    for row in 0..rows {
        for col in 0..cols {
            let hist = ColorHistogram::from_region(frame, grid.cell_region(col, row));
            let label = store.nearest_class(&hist).map(|m| m.class_index);
            grid.set(col, row, label);
        }
    }

    tracing::debug!(
        cols,
        rows,
        assigned = grid.assigned_count(),
        "block classification pass complete"
    );
    grid
}
