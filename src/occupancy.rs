// Time-aware occupancy
//
// A body cell stops blocking once every segment behind it has moved on.
// Ticks are counted from "now": the mover's first step arrives at tick 1.

use crate::types::Coord;
use crate::world::{Actor, WorldModel};

impl WorldModel {
    /// Earliest tick at which `cell` is guaranteed to be free for `mover`
    ///
    /// # Arguments
    /// * `cell` - Cell to query, must be on the board
    /// * `mover` - Actor that wants to enter the cell
    /// * `foods_assumed_eaten` - Food the mover is assumed to eat on the way; its own body
    ///   stays one tick longer per food
    ///
    /// # Returns
    /// * `usize` - 0 for empty or food cells
    pub fn vacate_tick(&self, cell: &Coord, mover: &Actor, foods_assumed_eaten: usize) -> usize {
        if self.is_open(cell) {
            return 0;
        }

        self.actors()
            .filter(|owner| owner.body.contains(cell))
            .map(|owner| {
                let mut ticks = owner.growth_pending();
                if owner.id == mover.id {
                    ticks += foods_assumed_eaten;
                }
                let mut previous: Option<Coord> = None;
                for segment in owner.body.iter().rev() {
                    if previous == Some(*segment) {
                        continue;
                    }
                    previous = Some(*segment);
                    ticks += 1;
                    if segment == cell {
                        break;
                    }
                }
                ticks
            })
            .max()
            .unwrap_or(0)
    }

    /// Whether `mover` may stand on `cell` at `arrival_tick`
    pub fn is_passable(
        &self,
        cell: &Coord,
        mover: &Actor,
        arrival_tick: usize,
        foods_assumed_eaten: usize,
    ) -> bool {
        self.in_bounds(cell) && self.vacate_tick(cell, mover, foods_assumed_eaten) <= arrival_tick
    }

    /// Orthogonal neighbours of `cell` that are passable at `arrival_tick`,
    /// in the order right, left, up, down
    pub fn passable_neighbours(
        &self,
        cell: &Coord,
        mover: &Actor,
        arrival_tick: usize,
        foods_assumed_eaten: usize,
    ) -> Vec<Coord> {
        cell.neighbours()
            .into_iter()
            .filter(|next| self.is_passable(next, mover, arrival_tick, foods_assumed_eaten))
            .collect()
    }
}
