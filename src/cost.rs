// Traversal cost of a single cell for the informed search

use crate::config::CostConfig;
use crate::types::{Coord, Direction};
use crate::world::{Actor, WorldModel};

/// First moves rejected earlier in the same tick
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Blacklist {
    moves: Vec<Direction>,
}

impl Blacklist {
    pub fn new() -> Self {
        Blacklist { moves: Vec::new() }
    }

    pub fn push(&mut self, direction: Direction) {
        if !self.moves.contains(&direction) {
            self.moves.push(direction);
        }
    }

    pub fn contains(&self, direction: Direction) -> bool {
        self.moves.contains(&direction)
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Direction> {
        self.moves.iter()
    }
}

/// Cost function bound to one world and one blacklist
pub struct CostModel<'a> {
    world: &'a WorldModel,
    config: &'a CostConfig,
    blacklist: &'a Blacklist,
}

impl<'a> CostModel<'a> {
    pub fn new(world: &'a WorldModel, config: &'a CostConfig, blacklist: &'a Blacklist) -> Self {
        CostModel {
            world,
            config,
            blacklist,
        }
    }

    /// Cost for `mover` to step onto `cell` at `arrival_tick`, never below 1
    pub fn cost(
        &self,
        cell: &Coord,
        mover: &Actor,
        arrival_tick: usize,
        _foods_assumed_eaten: usize,
    ) -> u32 {
        let mut cost = self.config.base.max(1);

        if self.world.is_edge(cell) {
            cost = cost.saturating_add(self.config.edge_penalty);
        }
        if self.world.is_corner(cell) {
            cost = cost.saturating_add(self.config.corner_penalty);
        }

        if arrival_tick <= self.config.threat_horizon {
            cost = cost.saturating_add(self.threat_penalty(cell, mover));
        }

        if self.is_blacklisted_step(cell, mover, arrival_tick) {
            cost = cost.saturating_add(self.config.blacklist_penalty);
        }

        cost
    }

    // Opponents at least as long as the mover are the ones that win a collision
    fn threat_penalty(&self, cell: &Coord, mover: &Actor) -> u32 {
        let mut penalty: u32 = 0;
        for other in self
            .world
            .actors()
            .filter(|other| other.id != mover.id && other.length() >= mover.length())
        {
            let head = other.head();
            let reach = self.world.passable_neighbours(&head, other, 1, 0);
            if reach.contains(cell) {
                penalty = penalty.saturating_add(self.config.head_threat_penalty);
            } else if (head.x - cell.x).abs() == 1 && (head.y - cell.y).abs() == 1 {
                penalty = penalty.saturating_add(self.config.diagonal_threat_penalty);
            }
        }
        penalty
    }

    fn is_blacklisted_step(&self, cell: &Coord, mover: &Actor, arrival_tick: usize) -> bool {
        if arrival_tick != 1 || mover.id != self.world.controlled().id {
            return false;
        }
        let head = mover.head();
        self.blacklist
            .iter()
            .any(|direction| direction.apply(&head) == *cell)
    }
}
