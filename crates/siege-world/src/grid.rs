//! The toroidal grid targets move on.
//!
//! Several occupants may share a cell. Placement prefers an empty cell and
//! falls back to any cell once the grid is full. Movement picks uniformly
//! among the Moore neighbours of the current cell, wrapping at the edges.

use std::collections::BTreeSet;

use rand::Rng;
use rand::seq::IndexedRandom;
use siege_types::Cell;

use crate::error::WorldError;

/// Relative offsets of the eight Moore neighbours.
const MOORE_OFFSETS: [(i64, i64); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Random draws tried before falling back to a scan for a free cell.
const PLACEMENT_ATTEMPTS: u32 = 64;

/// Random draws are used while at least `1 / SPARSE_FRACTION` of the grid is free.
const SPARSE_FRACTION: u64 = 16;

/// The capability contract the core relies on for anything placed on the
/// grid: it can report its cell and it can be relocated.
pub trait Occupant {
    /// The cell currently occupied.
    fn cell(&self) -> Cell;

    /// Move to another cell.
    fn relocate(&mut self, to: Cell);
}

/// A toroidal grid of `width` x `height` cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grid {
    width: u32,
    height: u32,
}

impl Grid {
    /// Create a grid.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::EmptyGrid`] if either dimension is zero.
    pub const fn new(width: u32, height: u32) -> Result<Self, WorldError> {
        if width == 0 || height == 0 {
            return Err(WorldError::EmptyGrid { width, height });
        }
        Ok(Self { width, height })
    }

    /// Number of columns.
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Number of rows.
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Total number of cells.
    pub fn cell_count(&self) -> u64 {
        u64::from(self.width).saturating_mul(u64::from(self.height))
    }

    /// Whether the cell lies on this grid.
    pub const fn contains(&self, cell: Cell) -> bool {
        cell.x < self.width && cell.y < self.height
    }

    /// Iterate over every cell, row by row.
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        (0..self.height).flat_map(move |y| (0..self.width).map(move |x| Cell::new(x, y)))
    }

    /// The distinct Moore neighbours of `cell`, excluding `cell` itself.
    ///
    /// On grids narrower than three cells the wrapped offsets collapse onto
    /// each other, so the result may hold fewer than eight cells.
    pub fn neighborhood(&self, cell: Cell) -> Vec<Cell> {
        let neighbours: BTreeSet<Cell> = MOORE_OFFSETS
            .iter()
            .map(|&(dx, dy)| {
                Cell::new(
                    wrap(cell.x, dx, self.width),
                    wrap(cell.y, dy, self.height),
                )
            })
            .filter(|c| *c != cell)
            .collect();
        neighbours.into_iter().collect()
    }

    /// A uniformly random cell.
    pub fn random_cell<R: Rng + ?Sized>(&self, rng: &mut R) -> Cell {
        Cell::new(rng.random_range(0..self.width), rng.random_range(0..self.height))
    }

    /// A random cell not in `occupied`, or `None` if every cell is taken.
    ///
    /// Sparse grids are sampled by rejection so the cost does not depend on
    /// the grid size. Crowded grids are scanned lazily without allocating.
    pub fn find_empty<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        occupied: &BTreeSet<Cell>,
    ) -> Option<Cell> {
        let taken = occupied.iter().filter(|c| self.contains(**c)).count();
        let free = self
            .cell_count()
            .saturating_sub(u64::try_from(taken).unwrap_or(u64::MAX));
        if free == 0 {
            return None;
        }
        if free.saturating_mul(SPARSE_FRACTION) >= self.cell_count() {
            for _ in 0..PLACEMENT_ATTEMPTS {
                let cell = self.random_cell(rng);
                if !occupied.contains(&cell) {
                    return Some(cell);
                }
            }
        }
        // Crowded grid, or every draw collided: take the k-th free cell.
        let pick = usize::try_from(rng.random_range(0..free)).ok()?;
        self.cells().filter(|c| !occupied.contains(c)).nth(pick)
    }

    /// Pick a cell for a newcomer: an empty one if possible, otherwise any.
    pub fn place<R: Rng + ?Sized>(&self, rng: &mut R, occupied: &BTreeSet<Cell>) -> Cell {
        self.find_empty(rng, occupied)
            .unwrap_or_else(|| self.random_cell(rng))
    }

    /// Move an occupant to a random neighbouring cell.
    ///
    /// Returns the new cell. On a 1x1 grid there is nowhere to go and the
    /// occupant stays put.
    pub fn random_step<R: Rng + ?Sized, O: Occupant + ?Sized>(
        &self,
        rng: &mut R,
        occupant: &mut O,
    ) -> Cell {
        let from = occupant.cell();
        if let Some(&to) = self.neighborhood(from).choose(rng) {
            occupant.relocate(to);
            to
        } else {
            from
        }
    }
}

/// Offset a coordinate by `delta`, wrapping around `size`.
fn wrap(coord: u32, delta: i64, size: u32) -> u32 {
    let shifted = i64::from(coord).saturating_add(delta);
    let wrapped = shifted.checked_rem_euclid(i64::from(size)).unwrap_or(0);
    u32::try_from(wrapped).unwrap_or(0)
}
