// Tactic detectors
//
// Each detector looks for a move that kills or boxes in a specific opponent
// and names that opponent as the objective's target.

use crate::config::Config;
use crate::cost::{Blacklist, CostModel};
use crate::objective::{Label, Objective};
use crate::pathfinding::{reachable, search};
use crate::simulator::Simulator;
use crate::types::{Coord, Direction};
use crate::world::{Actor, WorldModel};

/// A cell the cornered opponent must pass, and the tick it arrives there
struct Exit {
    cell: Coord,
    tick: usize,
}

pub struct Tactics<'a> {
    world: &'a WorldModel,
    costs: CostModel<'a>,
    simulator: Simulator<'a>,
}

impl<'a> Tactics<'a> {
    pub fn new(world: &'a WorldModel, config: &'a Config, blacklist: &'a Blacklist) -> Self {
        Tactics {
            world,
            costs: CostModel::new(world, &config.costs, blacklist),
            simulator: Simulator::new(&config.game_rules),
        }
    }

    /// Tries every detector in priority order
    pub fn detect(&self) -> Option<Objective> {
        crate::profile!("tactics", {
            self.cornering()
                .or_else(|| self.trapping())
                .or_else(|| self.walling_off())
        })
    }

    /// An opponent crawling down a one-wide tunnel dies if we plug its way out first
    pub fn cornering(&self) -> Option<Objective> {
        let me = self.world.controlled();

        for opponent in self.world.opponents() {
            let Some(exits) = self.tunnel_exits(opponent) else {
                continue;
            };

            for exit in exits {
                let Some(route) = search(
                    self.world,
                    &self.costs,
                    me.head(),
                    exit.cell,
                    me,
                    None,
                ) else {
                    continue;
                };
                let Some(direction) = route.first_step() else {
                    continue;
                };

                let ours = route.steps();
                if ours < exit.tick || (ours == exit.tick && me.length() > opponent.length()) {
                    log::debug!(
                        "cornering {} at ({}, {}): we need {} ticks, they need {}",
                        opponent.id,
                        exit.cell.x,
                        exit.cell.y,
                        ours,
                        exit.tick
                    );
                    return Some(Objective::targeting(Label::Cornering, direction, &opponent.id));
                }
            }
        }

        None
    }

    /// The forced cells an opponent with a single way forward must take, ending at
    /// the first cell with a choice. Returns the last forced cell before that point
    /// (when there is one) followed by the branch point itself.
    fn tunnel_exits(&self, opponent: &Actor) -> Option<Vec<Exit>> {
        let head = opponent.head();
        let first = self.world.passable_neighbours(&head, opponent, 1, 0);
        if first.len() != 1 {
            return None;
        }

        let limit = (self.world.width() * self.world.height()) as usize;
        let mut tunnel = vec![head, first[0]];

        loop {
            let tick = tunnel.len() - 1;
            let current = tunnel[tick];
            let onward: Vec<Coord> = self
                .world
                .passable_neighbours(&current, opponent, tick + 1, 0)
                .into_iter()
                .filter(|next| !tunnel.contains(next))
                .collect();

            match onward.len() {
                // Dead end: the opponent is finished without our help
                0 => return None,
                1 if tunnel.len() <= limit => tunnel.push(onward[0]),
                1 => return None,
                _ => break,
            }
        }

        let branch_tick = tunnel.len() - 1;
        let mut exits = Vec::with_capacity(2);
        if branch_tick >= 2 {
            exits.push(Exit {
                cell: tunnel[branch_tick - 1],
                tick: branch_tick - 1,
            });
        }
        exits.push(Exit {
            cell: tunnel[branch_tick],
            tick: branch_tick,
        });
        Some(exits)
    }

    /// Pin an opponent that runs along a wall by cutting across its path
    pub fn trapping(&self) -> Option<Objective> {
        let me = self.world.controlled();
        let my_head = me.head();
        let my_heading = me.heading()?;

        for opponent in self.world.opponents() {
            let Some(forward) = opponent.heading() else {
                continue;
            };
            let head = opponent.head();
            let at_least_as_long = me.length() >= opponent.length();

            for outward in self.world.outward_directions(&head) {
                // Only an opponent moving parallel to the wall can be pinned against it
                if forward == outward || forward == outward.opposite() {
                    continue;
                }
                if my_heading != forward && my_heading != outward {
                    continue;
                }

                let inward = outward.opposite();
                let beside = inward.apply(&head);

                let proposal = if my_head == beside {
                    Some(forward)
                } else if my_head == inward.apply(&beside) && at_least_as_long {
                    Some(outward)
                } else if my_head == forward.opposite().apply(&beside) && at_least_as_long {
                    Some(forward)
                } else if my_head == forward.apply(&beside) && self.escape_count(opponent) <= 1 {
                    Some(forward)
                } else {
                    None
                };

                if let Some(direction) = proposal {
                    if self.is_safe_step(direction) {
                        log::debug!("trapping {} against the wall", opponent.id);
                        return Some(Objective::targeting(Label::Trapping, direction, &opponent.id));
                    }
                }
            }
        }

        None
    }

    fn escape_count(&self, opponent: &Actor) -> usize {
        self.world
            .passable_neighbours(&opponent.head(), opponent, 1, 0)
            .len()
    }

    fn is_safe_step(&self, direction: Direction) -> bool {
        let me = self.world.controlled();
        self.world
            .is_passable(&direction.apply(&me.head()), me, 1, 0)
    }

    /// A straight run that seals an opponent off from its own tail
    pub fn walling_off(&self) -> Option<Objective> {
        let me = self.world.controlled();
        if self.world.opponent_count() == 0 {
            return None;
        }

        let head = me.head();
        let mut best: Option<(usize, Objective)> = None;

        for first in self.world.passable_neighbours(&head, me, 1, 0) {
            let Some(direction) = Direction::between(&head, &first) else {
                continue;
            };
            let path = self.straight_run(direction);

            let Ok(walled) = self.simulator.apply_path(self.world, &path) else {
                continue;
            };

            for opponent in self.world.opponents() {
                if best.as_ref().is_some_and(|(len, _)| *len <= path.len()) {
                    break;
                }
                if self.walls_off(&walled, &path, opponent) {
                    best = Some((
                        path.len(),
                        Objective::targeting(Label::WallingOff, direction, &opponent.id),
                    ));
                }
            }
        }

        best.map(|(_, objective)| objective)
    }

    /// Cells from our head in a straight line for as long as each one is free on arrival
    fn straight_run(&self, direction: Direction) -> Vec<Coord> {
        let me = self.world.controlled();
        let limit = (self.world.width() * self.world.height()) as usize;
        let mut path = vec![me.head()];
        let mut foods = 0;

        while path.len() <= limit {
            let next = direction.apply(&path[path.len() - 1]);
            // Entering path[k] happens at tick k
            if !self.world.is_passable(&next, me, path.len(), foods) {
                break;
            }
            if self.world.has_food(&next) {
                foods += 1;
            }
            path.push(next);
        }

        path
    }

    fn walls_off(&self, walled: &WorldModel, path: &[Coord], opponent: &Actor) -> bool {
        let Some(after) = walled.actor(&opponent.id) else {
            return false;
        };
        if reachable(walled, after.head(), after.tail(), after) {
            return false;
        }
        if !reachable(self.world, opponent.head(), opponent.tail(), opponent) {
            return false;
        }

        let me = self.world.controlled();
        path[1..].iter().all(|cell| {
            let ours = me.head().manhattan(cell);
            let theirs = opponent.head().manhattan(cell);
            ours < theirs || (ours == theirs && me.length() > opponent.length())
        })
    }
}
