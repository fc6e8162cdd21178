//! Macro-block grouped classification.
//!
//! A coarse/fast alternative to the per-block sweep: blocks are grouped
//! into 4x4 macro-regions and each macro-region gets a single label, so a
//! unit of area costs four times fewer nearest-class queries.

use super::LabelGrid;
use crate::capture::Frame;
use crate::classes::ClassStore;
use crate::histogram::{ColorHistogram, Region};

/// Blocks per macro-region side.
const GROUP: u32 = 4;

/// Classifies a frame at 4x4-block macro-region granularity.
///
/// For each macro-region the histograms of all 16 constituent sub-blocks
/// are computed, but only the top-left sub-block's histogram drives the
/// classification decision. This is not a majority vote: the remaining 15
/// histograms do not influence the label. The behavior is a preserved
/// contract of the coarse mode and must not be replaced with voting.
///
/// The returned grid has `block_size * 4` cell granularity; trailing
/// regions where a full macro-block does not fit are left out.
///
/// # Panics
///
/// Panics if a whole macro-block (`block_size * 4`) does not fit the frame.
pub fn classify_grouped(frame: &Frame, block_size: u32, store: &ClassStore) -> LabelGrid {
    let macro_size = block_size * GROUP;
    assert!(
        block_size > 0 && macro_size <= frame.width() && macro_size <= frame.height(),
        "macro-block size {} does not fit {}x{} frame",
        macro_size,
        frame.width(),
        frame.height()
    );

    let cols = frame.width() / macro_size;
    let rows = frame.height() / macro_size;
    let mut grid = LabelGrid::new(cols, rows, macro_size);

    if !store.has_prototypes() {
        tracing::debug!("grouped classification skipped: no populated classes");
        return grid;
    }

    for row in 0..rows {
        for col in 0..cols {
            let x = col * macro_size;
            let y = row * macro_size;

            let mut group_hists = Vec::with_capacity((GROUP * GROUP) as usize);
            for dy in 0..GROUP {
                for dx in 0..GROUP {
                    let sub = Region::new(
                        x + dx * block_size,
                        y + dy * block_size,
                        block_size,
                        block_size,
                    );
                    group_hists.push(ColorHistogram::from_region(frame, sub));
                }
            }

            // Only the top-left sub-block decides the label
            let label = store.nearest_class(&group_hists[0]).map(|m| m.class_index);
            grid.set(col, row, label);
        }
    }

    tracing::debug!(
        cols,
        rows,
        assigned = grid.assigned_count(),
        "grouped classification pass complete"
    );
    grid
}
