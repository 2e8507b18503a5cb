// Objective ladder
//
// Tactics first (only on the opening attempt of a tick), then a fixed ladder
// whose order depends on whether we need food, then the stall search, and
// finally a forced default move. Nothing here calls back into the adversarial
// checker.

use std::cmp::Reverse;

use crate::config::Config;
use crate::cost::{Blacklist, CostModel};
use crate::objective::{Label, Objective};
use crate::pathfinding::{distance, longest_frontier_walk, reachable, reachable_area, search};
use crate::simulator::Simulator;
use crate::tactics::Tactics;
use crate::types::{Coord, Direction};
use crate::world::{Actor, WorldModel};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Attack,
    SafeFood,
    RiskyFood,
    TailChase,
}

const HUNGRY_LADDER: [Step; 3] = [Step::SafeFood, Step::RiskyFood, Step::TailChase];
const FED_LADDER: [Step; 4] = [Step::Attack, Step::TailChase, Step::SafeFood, Step::RiskyFood];

pub struct Policy<'a> {
    config: &'a Config,
}

impl<'a> Policy<'a> {
    pub fn new(config: &'a Config) -> Self {
        Policy { config }
    }

    /// Picks an objective for the controlled actor of `world`
    ///
    /// # Arguments
    /// * `attempt` - 0 on the first try of a tick; tactics are only considered then
    /// * `blacklist` - First moves already rejected this tick
    ///
    /// # Returns
    /// * `Objective` - Always a legal move unless the label is `NoSafeMove`
    pub fn decide_from(&self, world: &WorldModel, attempt: usize, blacklist: &Blacklist) -> Objective {
        let me = world.controlled();
        let opponents = world.opponent_count();

        if opponents > 0 && attempt == 0 {
            if let Some(objective) = Tactics::new(world, self.config, blacklist).detect() {
                return objective;
            }
        }

        let costs = CostModel::new(world, &self.config.costs, blacklist);
        let hungry = me.health <= self.config.low_health_threshold(opponents)
            || !world.is_controlled_largest(self.config.policy.size_buffer);
        let ladder: &[Step] = if hungry { &HUNGRY_LADDER } else { &FED_LADDER };

        log::debug!(
            "attempt {}: hungry={}, blacklist={:?}",
            attempt,
            hungry,
            blacklist.iter().collect::<Vec<_>>()
        );

        for step in ladder {
            let found = match step {
                Step::Attack => self.attack(world, &costs),
                Step::SafeFood => self.food(world, &costs, Label::SafeFood),
                Step::RiskyFood => self.food(world, &costs, Label::RiskyFood),
                Step::TailChase => self.tail_chase(world, &costs),
            };
            if let Some(objective) = found {
                return objective;
            }
        }

        self.stall(world, blacklist)
            .unwrap_or_else(|| Objective::forced_death(self.config.policy.default_move))
    }

    /// Tactics only, no ladder and no stall. Used to predict what an opponent would do
    /// to us once it is relabelled as the controlled actor.
    pub fn tactics_only(&self, world: &WorldModel) -> Option<Objective> {
        if world.opponent_count() == 0 {
            return None;
        }
        let blacklist = Blacklist::new();
        Tactics::new(world, self.config, &blacklist).detect()
    }

    /// Head for the cell each opponent is most likely to move into next
    fn attack(&self, world: &WorldModel, costs: &CostModel) -> Option<Objective> {
        let me = world.controlled();
        let mut aims: Vec<(i32, Coord)> = world
            .opponents()
            .filter_map(|opponent| predicted_step(world, opponent))
            .map(|cell| (me.head().manhattan(&cell), cell))
            .collect();
        aims.sort();

        aims.into_iter().find_map(|(_, cell)| {
            let route = search(
                world,
                costs,
                me.head(),
                cell,
                me,
                Some(self.config.policy.attack_cost_limit),
            )?;
            route
                .first_step()
                .map(|direction| Objective::new(Label::Attacking, direction))
        })
    }

    /// Nearest worthwhile food, preferring food we are closer to than anyone else
    fn food(&self, world: &WorldModel, costs: &CostModel, label: Label) -> Option<Objective> {
        let me = world.controlled();
        let divisor = match label {
            Label::SafeFood => self.config.policy.safe_food_cost_divisor,
            _ => self.config.policy.risky_food_cost_divisor,
        }
        .max(1);
        let cost_limit = (world.width() + world.height()) as u32 / divisor;
        let simulator = Simulator::new(&self.config.game_rules);

        let mut ranked: Vec<(i32, i32, Coord)> = world
            .food()
            .map(|food| {
                let ours = me.head().manhattan(food);
                let key = match world.opponents().map(|o| o.head().manhattan(food)).min() {
                    Some(theirs) => ours - theirs,
                    None => ours,
                };
                (key, ours, *food)
            })
            .collect();
        ranked.sort();

        for (_, _, food) in ranked {
            let Some(route) = search(world, costs, me.head(), food, me, Some(cost_limit)) else {
                continue;
            };
            let Some(direction) = route.first_step() else {
                continue;
            };
            let steps = route.steps();

            // Starving on the way there
            if steps as i32 > me.health {
                continue;
            }
            if label == Label::SafeFood && self.is_contested(world, food, steps, me) {
                continue;
            }

            let Ok(fed) = simulator.apply_path(world, &route.path) else {
                continue;
            };
            let after = fed.controlled();
            if !reachable(&fed, after.head(), after.tail(), after) {
                log::debug!("food at ({}, {}) is a dead end", food.x, food.y);
                continue;
            }

            return Some(Objective::new(label, direction));
        }

        None
    }

    fn is_contested(&self, world: &WorldModel, food: Coord, ours: usize, me: &Actor) -> bool {
        world.opponents().any(|opponent| {
            match distance(world, opponent.head(), food, opponent) {
                Some(theirs) => {
                    theirs < ours || (theirs == ours && opponent.length() >= me.length())
                }
                None => false,
            }
        })
    }

    /// Follow our own tail, swinging through the middle of the board first when far out
    fn tail_chase(&self, world: &WorldModel, costs: &CostModel) -> Option<Objective> {
        let me = world.controlled();
        let center = world.center();
        let halfway = (world.width() - 1) / 2;

        if me.head().manhattan(&center) > halfway / 2 {
            let simulator = Simulator::new(&self.config.game_rules);
            let via_center = search(world, costs, me.head(), center, me, None).and_then(|route| {
                let direction = route.first_step()?;
                let there = simulator.apply_path(world, &route.path).ok()?;
                let after = there.controlled();
                reachable(&there, after.head(), after.tail(), after)
                    .then(|| Objective::new(Label::GoingToCenter, direction))
            });
            if via_center.is_some() {
                return via_center;
            }
        }

        let route = search(world, costs, me.head(), me.tail(), me, None)?;
        route
            .first_step()
            .map(|direction| Objective::new(Label::GoingToTail, direction))
    }

    /// Most room to live in, with blacklisted moves only as a last resort
    fn stall(&self, world: &WorldModel, blacklist: &Blacklist) -> Option<Objective> {
        let me = world.controlled();
        let head = me.head();
        let simulator = Simulator::new(&self.config.game_rules);

        let mut options: Vec<(bool, Reverse<usize>, Reverse<usize>, usize, Direction)> = world
            .passable_neighbours(&head, me, 1, 0)
            .into_iter()
            .enumerate()
            .filter_map(|(order, next)| {
                let direction = Direction::between(&head, &next)?;
                let (area, walk) = match simulator.apply(world, direction) {
                    Ok(after) => {
                        let mover = after.controlled();
                        (
                            reachable_area(&after, mover.head(), mover, 0),
                            longest_frontier_walk(&after, mover.head(), mover),
                        )
                    }
                    Err(_) => (0, 0),
                };
                Some((
                    blacklist.contains(direction),
                    Reverse(area),
                    Reverse(walk),
                    order,
                    direction,
                ))
            })
            .collect();
        options.sort();

        options.first().map(|(_, area, walk, _, direction)| {
            log::debug!(
                "stalling {} with {} cells of room, walk of {}",
                direction.as_str(),
                area.0,
                walk.0
            );
            Objective::new(Label::Stalling, *direction)
        })
    }
}

/// Cell an opponent will most likely enter next: straight ahead if free, otherwise
/// its first free neighbour
fn predicted_step(world: &WorldModel, opponent: &Actor) -> Option<Coord> {
    let head = opponent.head();
    let free = world.passable_neighbours(&head, opponent, 1, 0);
    opponent
        .heading()
        .map(|heading| heading.apply(&head))
        .filter(|ahead| free.contains(ahead))
        .or_else(|| free.first().copied())
}
