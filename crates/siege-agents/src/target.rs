//! Targets: the population the guards try to keep under control.
//!
//! A target only wanders. Each round it moves to a uniformly random cell of
//! its Moore neighbourhood on the torus. It never sends or receives messages.

use rand::Rng;
use siege_types::{ActorId, Cell, TargetId};
use siege_world::{Grid, Occupant};

/// A wandering target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    id: TargetId,
    cell: Cell,
}

impl Target {
    /// Create a target at `cell`.
    pub fn new(cell: Cell) -> Self {
        Self {
            id: TargetId::new(),
            cell,
        }
    }

    /// The target's ID.
    pub const fn id(&self) -> TargetId {
        self.id
    }

    /// The target's message address.
    pub const fn actor_id(&self) -> ActorId {
        ActorId::Target(self.id)
    }

    /// Take one random step on `grid`. Returns the new cell.
    pub fn step<R: Rng + ?Sized>(&mut self, grid: &Grid, rng: &mut R) -> Cell {
        grid.random_step(rng, self)
    }
}

impl Occupant for Target {
    fn cell(&self) -> Cell {
        self.cell
    }

    fn relocate(&mut self, to: Cell) {
        self.cell = to;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;

    #[test]
    fn step_moves_to_a_neighbour() {
        let grid = Grid::new(10, 10).unwrap();
        let mut rng = SmallRng::seed_from_u64(11);
        let mut target = Target::new(Cell::new(0, 0));
        for _ in 0..50 {
            let from = target.cell();
            let to = target.step(&grid, &mut rng);
            assert_eq!(target.cell(), to);
            assert!(grid.neighborhood(from).contains(&to));
        }
    }

    #[test]
    fn step_on_single_cell_grid_stays_put() {
        let grid = Grid::new(1, 1).unwrap();
        let mut rng = SmallRng::seed_from_u64(3);
        let mut target = Target::new(Cell::new(0, 0));
        assert_eq!(target.step(&grid, &mut rng), Cell::new(0, 0));
    }
}
