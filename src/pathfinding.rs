// Time-aware path search
//
// Every search expands a cell at tick `depth + 1` so that bodies which vacate
// while we travel open up behind us.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashSet, VecDeque};

use crate::cost::CostModel;
use crate::types::{Coord, Direction};
use crate::world::{Actor, WorldModel};

/// A path from a start cell (inclusive) to a target cell (inclusive)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub cost: u32,
    pub path: Vec<Coord>,
}

impl Route {
    /// Number of moves along the path
    pub fn steps(&self) -> usize {
        self.path.len().saturating_sub(1)
    }

    pub fn first_step(&self) -> Option<Direction> {
        match self.path.as_slice() {
            [from, to, ..] => Direction::between(from, to),
            _ => None,
        }
    }

    pub fn destination(&self) -> Option<Coord> {
        self.path.last().copied()
    }
}

struct Node {
    cell: Coord,
    parent: Option<usize>,
    // Tick at which this cell is entered
    depth: usize,
    foods: usize,
    cost: u32,
}

fn food_at(world: &WorldModel, cell: &Coord) -> usize {
    usize::from(world.has_food(cell))
}

/// Cheapest route for `mover` from `start` to `target`
///
/// # Arguments
/// * `cost_limit` - Give up once the cheapest open node exceeds this total
///
/// # Returns
/// * `Option<Route>` - None when the target is unreachable or over the limit
pub fn search(
    world: &WorldModel,
    costs: &CostModel,
    start: Coord,
    target: Coord,
    mover: &Actor,
    cost_limit: Option<u32>,
) -> Option<Route> {
    crate::profile!("search", {
        let mut nodes = vec![Node {
            cell: start,
            parent: None,
            depth: 0,
            foods: food_at(world, &start),
            cost: 0,
        }];
        // Node index doubles as insertion order, so equal estimates pop first-in first-out
        let mut open = BinaryHeap::new();
        open.push(Reverse((start.manhattan(&target) as u32, 0usize)));
        let mut closed: HashSet<Coord> = HashSet::new();

        while let Some(Reverse((estimate, index))) = open.pop() {
            if cost_limit.is_some_and(|limit| estimate > limit) {
                return None;
            }

            let cell = nodes[index].cell;
            if !closed.insert(cell) {
                continue;
            }

            if cell == target {
                return Some(Route {
                    cost: nodes[index].cost,
                    path: unwind(&nodes, index),
                });
            }

            let arrival = nodes[index].depth + 1;
            let foods = nodes[index].foods;
            let cost_so_far = nodes[index].cost;

            for next in world.passable_neighbours(&cell, mover, arrival, foods) {
                if closed.contains(&next) {
                    continue;
                }
                let cost = cost_so_far.saturating_add(costs.cost(&next, mover, arrival, foods));
                nodes.push(Node {
                    cell: next,
                    parent: Some(index),
                    depth: arrival,
                    foods: foods + food_at(world, &next),
                    cost,
                });
                let heuristic = next.manhattan(&target) as u32;
                open.push(Reverse((cost.saturating_add(heuristic), nodes.len() - 1)));
            }
        }

        None
    })
}

fn unwind(nodes: &[Node], mut index: usize) -> Vec<Coord> {
    let mut path = vec![nodes[index].cell];
    while let Some(parent) = nodes[index].parent {
        path.push(nodes[parent].cell);
        index = parent;
    }
    path.reverse();
    path
}

/// Whether `mover` can get to `target`, or right next to it, from `start`
pub fn reachable(world: &WorldModel, start: Coord, target: Coord, mover: &Actor) -> bool {
    crate::profile!("reachability", {
        if start == target {
            return true;
        }

        let mut visited: HashSet<Coord> = HashSet::from([start]);
        let mut queue = VecDeque::from([(start, 0usize, food_at(world, &start))]);

        while let Some((cell, depth, foods)) = queue.pop_front() {
            if cell == target || cell.is_adjacent(&target) {
                return true;
            }
            for next in world.passable_neighbours(&cell, mover, depth + 1, foods) {
                if visited.insert(next) {
                    queue.push_back((next, depth + 1, foods + food_at(world, &next)));
                }
            }
        }

        false
    })
}

/// Fewest moves for `mover` to enter `target`
pub fn distance(world: &WorldModel, start: Coord, target: Coord, mover: &Actor) -> Option<usize> {
    crate::profile!("reachability", {
        let mut visited: HashSet<Coord> = HashSet::from([start]);
        let mut queue = VecDeque::from([(start, 0usize, food_at(world, &start))]);

        while let Some((cell, depth, foods)) = queue.pop_front() {
            if cell == target {
                return Some(depth);
            }
            for next in world.passable_neighbours(&cell, mover, depth + 1, foods) {
                if visited.insert(next) {
                    queue.push_back((next, depth + 1, foods + food_at(world, &next)));
                }
            }
        }

        None
    })
}

/// Number of cells `mover` can still enter from `start`, start excluded
pub fn reachable_area(world: &WorldModel, start: Coord, mover: &Actor, start_tick: usize) -> usize {
    crate::profile!("reachability", {
        let mut visited: HashSet<Coord> = HashSet::from([start]);
        let mut queue = VecDeque::from([(start, start_tick, food_at(world, &start))]);

        while let Some((cell, tick, foods)) = queue.pop_front() {
            for next in world.passable_neighbours(&cell, mover, tick + 1, foods) {
                if visited.insert(next) {
                    queue.push_back((next, tick + 1, foods + food_at(world, &next)));
                }
            }
        }

        visited.len() - 1
    })
}

/// Length of a greedy walk that always steps to the neighbour with the most onward options
pub fn longest_frontier_walk(world: &WorldModel, start: Coord, mover: &Actor) -> usize {
    let limit = (world.width() * world.height()) as usize;
    let mut walked: HashSet<Coord> = HashSet::from([start]);
    let mut cell = start;
    let mut foods = food_at(world, &start);
    let mut steps = 0;

    while steps < limit {
        let tick = steps + 1;
        let options: Vec<Coord> = world
            .passable_neighbours(&cell, mover, tick, foods)
            .into_iter()
            .filter(|next| !walked.contains(next))
            .collect();

        let best = options
            .iter()
            .enumerate()
            .max_by_key(|(index, next)| {
                let onward = world
                    .passable_neighbours(next, mover, tick + 1, foods + food_at(world, next))
                    .into_iter()
                    .filter(|after| !walked.contains(after))
                    .count();
                // max_by_key keeps the last of equal keys, so rank earlier options higher
                (onward, Reverse(*index))
            })
            .map(|(_, next)| *next);

        match best {
            Some(next) => {
                walked.insert(next);
                foods += food_at(world, &next);
                cell = next;
                steps += 1;
            }
            None => break,
        }
    }

    steps
}
