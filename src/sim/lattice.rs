//! Peg lattice geometry
//!
//! Board-normalized coordinates:
//! - x: horizontal, 0 at the board center, board spans one unit
//! - y: vertical, 0 at the hopper outlet, negative downward
//!
//! Row `r` (0-indexed) holds `r + 1` pegs. Pegs are stored row-major, so the
//! first `n(n+1)/2` entries of a lattice built for the maximum row count are
//! exactly the pegs of an `n`-row board.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::MAX_ROWS;

/// Board width in model units
pub const BOARD_WIDTH: f32 = 1.0;
/// Row height / peg spacing (equilateral lattice)
pub const ROW_HEIGHT_RATIO: f32 = 0.866_025_4;
/// Peg radius / peg spacing
pub const PEG_RADIUS_RATIO: f32 = 0.12;
/// Ball radius / peg spacing
pub const BALL_RADIUS_RATIO: f32 = 0.25;
/// Depth of the bins below the last row
pub const BIN_DEPTH: f32 = 0.6;

/// Horizontal distance between neighbouring pegs in a row
#[inline]
pub fn peg_spacing(row_count: u32) -> f32 {
    BOARD_WIDTH / (row_count + 1) as f32
}

/// Vertical distance between rows
#[inline]
pub fn row_height(row_count: u32) -> f32 {
    peg_spacing(row_count) * ROW_HEIGHT_RATIO
}

#[inline]
pub fn peg_radius(row_count: u32) -> f32 {
    peg_spacing(row_count) * PEG_RADIUS_RATIO
}

#[inline]
pub fn ball_radius(row_count: u32) -> f32 {
    peg_spacing(row_count) * BALL_RADIUS_RATIO
}

/// Center of peg `col` in `row`
#[inline]
pub fn peg_position(row: u32, col: u32, row_count: u32) -> Vec2 {
    let s = peg_spacing(row_count);
    Vec2::new(
        (col as f32 - row as f32 / 2.0) * s,
        -((row + 1) as f32) * row_height(row_count),
    )
}

/// Horizontal center of a bin
#[inline]
pub fn bin_center_x(bin: usize, row_count: u32) -> f32 {
    (bin as f32 - row_count as f32 / 2.0) * peg_spacing(row_count)
}

/// Height at which a ball leaves the lattice (one row below the last pegs)
#[inline]
pub fn exit_y(row_count: u32) -> f32 {
    -((row_count + 1) as f32) * row_height(row_count)
}

/// Bottom of the bins
#[inline]
pub fn bin_floor_y(row_count: u32) -> f32 {
    exit_y(row_count) - BIN_DEPTH
}

/// How many balls fit in a bin before the visible stack stops growing
pub fn stack_capacity(row_count: u32) -> u32 {
    let diameter = 2.0 * ball_radius(row_count);
    ((BIN_DEPTH - diameter) / diameter).floor().max(0.0) as u32
}

/// Number of pegs on a board with `row_count` rows
#[inline]
pub fn peg_count(row_count: u32) -> usize {
    let n = row_count as usize;
    n * (n + 1) / 2
}

/// Whether peg `index` of a max-size lattice is part of a `row_count` board
#[inline]
pub fn is_peg_visible(index: usize, row_count: u32) -> bool {
    index < peg_count(row_count)
}

/// A single peg
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Peg {
    pub row: u32,
    pub col: u32,
    pub pos: Vec2,
}

/// Pegs of a `row_count` board, row-major
pub fn peg_positions_for(row_count: u32) -> Vec<Peg> {
    let mut pegs = Vec::with_capacity(peg_count(row_count));
    for row in 0..row_count {
        for col in 0..=row {
            pegs.push(Peg {
                row,
                col,
                pos: peg_position(row, col, row_count),
            });
        }
    }
    pegs
}

/// Lattice pre-built at the maximum row count and masked down to the active one
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PegLattice {
    row_count: u32,
    /// Every peg of the largest board, positioned for `row_count`
    pegs: Vec<Peg>,
}

impl PegLattice {
    pub fn new(row_count: u32) -> Self {
        let mut lattice = Self {
            row_count,
            pegs: Vec::with_capacity(peg_count(MAX_ROWS)),
        };
        for row in 0..MAX_ROWS {
            for col in 0..=row {
                lattice.pegs.push(Peg {
                    row,
                    col,
                    pos: Vec2::ZERO,
                });
            }
        }
        lattice.set_row_count(row_count);
        lattice
    }

    /// Reposition every peg for a new row count
    pub fn set_row_count(&mut self, row_count: u32) {
        self.row_count = row_count;
        for peg in &mut self.pegs {
            peg.pos = peg_position(peg.row, peg.col, row_count);
        }
    }

    pub fn row_count(&self) -> u32 {
        self.row_count
    }

    /// All pegs, including masked ones
    pub fn pegs(&self) -> &[Peg] {
        &self.pegs
    }

    pub fn is_visible(&self, index: usize) -> bool {
        is_peg_visible(index, self.row_count)
    }

    pub fn visible_pegs(&self) -> &[Peg] {
        &self.pegs[..peg_count(self.row_count).min(self.pegs.len())]
    }

    pub fn spacing(&self) -> f32 {
        peg_spacing(self.row_count)
    }

    pub fn ball_radius(&self) -> f32 {
        ball_radius(self.row_count)
    }

    pub fn bin_count(&self) -> usize {
        self.row_count as usize + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_sizes() {
        let pegs = peg_positions_for(6);
        assert_eq!(pegs.len(), 21);
        for row in 0..6 {
            assert_eq!(pegs.iter().filter(|p| p.row == row).count(), row as usize + 1);
        }
    }

    #[test]
    fn test_lattice_is_symmetric() {
        let pegs = peg_positions_for(9);
        for peg in &pegs {
            let mirror = pegs
                .iter()
                .find(|p| p.row == peg.row && p.col == peg.row - peg.col)
                .unwrap();
            assert!((peg.pos.x + mirror.pos.x).abs() < 1e-6);
            assert_eq!(peg.pos.y, mirror.pos.y);
        }
    }

    #[test]
    fn test_spacing_shrinks_with_rows() {
        assert!(peg_spacing(20) < peg_spacing(10));
        let p0 = peg_position(3, 0, 10);
        let p1 = peg_position(3, 1, 10);
        assert!((p1.x - p0.x - peg_spacing(10)).abs() < 1e-6);
    }

    #[test]
    fn test_masking() {
        let mut lattice = PegLattice::new(26);
        assert_eq!(lattice.pegs().len(), peg_count(MAX_ROWS));
        assert_eq!(lattice.visible_pegs().len(), 351);

        lattice.set_row_count(5);
        assert_eq!(lattice.visible_pegs().len(), 15);
        assert!(lattice.is_visible(14));
        assert!(!lattice.is_visible(15));

        // Visible pegs match the standalone layout
        assert_eq!(lattice.visible_pegs(), peg_positions_for(5).as_slice());
    }

    #[test]
    fn test_bins_line_up_under_last_row() {
        let rows = 8;
        let last = peg_position(rows - 1, 0, rows);
        assert!((bin_center_x(0, rows) - (last.x - peg_spacing(rows) / 2.0)).abs() < 1e-6);
        assert!((bin_center_x(rows as usize, rows) + bin_center_x(0, rows)).abs() < 1e-6);
        assert!(exit_y(rows) < last.y);
        assert!(bin_floor_y(rows) < exit_y(rows));
    }

    #[test]
    fn test_stack_fits_in_bin() {
        for rows in 5..=26 {
            let r = ball_radius(rows);
            let top = bin_floor_y(rows) + r + 2.0 * r * stack_capacity(rows) as f32;
            assert!(top + r <= exit_y(rows) + 1e-5, "rows {}", rows);
        }
    }
}
