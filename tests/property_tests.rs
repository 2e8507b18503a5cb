//! Randomized invariant checks
//!
//! Boards are generated from a fixed seed so failures reproduce.

mod common;

use std::collections::HashSet;

use common::{board, config, flat_config, snake, world};
use paranoid_snake::bot::Bot;
use paranoid_snake::cost::{Blacklist, CostModel};
use paranoid_snake::objective::Label;
use paranoid_snake::pathfinding::search;
use paranoid_snake::policy::Policy;
use paranoid_snake::types::{Board, Coord, Direction};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const ROUNDS: usize = 300;

/// Self-avoiding random walk of `length` cells that stays clear of `taken`
fn random_body(
    rng: &mut StdRng,
    size: i32,
    taken: &mut HashSet<(i32, i32)>,
    length: usize,
) -> Option<Vec<(i32, i32)>> {
    for _ in 0..50 {
        let start = (rng.random_range(0..size), rng.random_range(0..size));
        if taken.contains(&start) {
            continue;
        }

        let mut body = vec![start];
        while body.len() < length {
            let (x, y) = body[body.len() - 1];
            let options: Vec<(i32, i32)> = [(x + 1, y), (x - 1, y), (x, y + 1), (x, y - 1)]
                .into_iter()
                .filter(|&(nx, ny)| nx >= 0 && ny >= 0 && nx < size && ny < size)
                .filter(|cell| !taken.contains(cell) && !body.contains(cell))
                .collect();
            if options.is_empty() {
                break;
            }
            body.push(options[rng.random_range(0..options.len())]);
        }

        if body.len() == length {
            taken.extend(body.iter().copied());
            return Some(body);
        }
    }
    None
}

/// A board with "s0" plus up to two more snakes and a few food pellets
fn random_board(rng: &mut StdRng) -> Option<Board> {
    let size = [5, 7, 11][rng.random_range(0..3usize)];
    let mut taken = HashSet::new();
    let mut snakes = Vec::new();

    let count = rng.random_range(1..=3);
    for index in 0..count {
        let length = rng.random_range(1..=8);
        if let Some(body) = random_body(rng, size, &mut taken, length) {
            let health = rng.random_range(1..=100);
            snakes.push(snake(&format!("s{}", index), &body, health));
        } else if index == 0 {
            return None;
        }
    }

    let mut food = Vec::new();
    for _ in 0..rng.random_range(0..=3) {
        let cell = (rng.random_range(0..size), rng.random_range(0..size));
        if !taken.contains(&cell) && !food.contains(&cell) {
            food.push(cell);
        }
    }

    Some(board(size, size, &food, snakes))
}

#[test]
fn test_open_board_routes_have_manhattan_length() {
    let mut rng = StdRng::seed_from_u64(0x5EED_0001);
    let config = flat_config();
    let blacklist = Blacklist::new();

    for _ in 0..ROUNDS {
        let width = rng.random_range(2..=11);
        let height = rng.random_range(2..=11);
        let start = (rng.random_range(0..width), rng.random_range(0..height));
        let target = Coord::new(rng.random_range(0..width), rng.random_range(0..height));

        let board = board(width, height, &[], vec![snake("me", &[start], 100)]);
        let world = world(&board, "me");
        let me = world.controlled();
        let costs = CostModel::new(&world, &config.costs, &blacklist);

        let route = search(&world, &costs, me.head(), target, me, None)
            .expect("every cell of an open board is reachable");
        assert_eq!(
            route.steps(),
            me.head().manhattan(&target) as usize,
            "route {:?} on {}x{}",
            route.path,
            width,
            height
        );
    }
}

#[test]
fn test_passability_never_reverts() {
    let mut rng = StdRng::seed_from_u64(0x5EED_0002);

    for _ in 0..ROUNDS {
        let Some(board) = random_board(&mut rng) else {
            continue;
        };
        let world = world(&board, "s0");
        let horizon = (board.width * board.height) as usize;

        for mover in world.actors() {
            for owner in world.actors() {
                for cell in &owner.body {
                    for foods in 0..2 {
                        let mut passable = false;
                        for tick in 0..=horizon {
                            let now = world.is_passable(cell, mover, tick, foods);
                            assert!(
                                now || !passable,
                                "({}, {}) closed again at tick {}",
                                cell.x,
                                cell.y,
                                tick
                            );
                            passable = now;
                        }
                        assert!(passable, "every body cell frees up eventually");
                    }
                }
            }
        }
    }
}

#[test]
fn test_no_safe_move_only_when_boxed_in() {
    let mut rng = StdRng::seed_from_u64(0x5EED_0003);
    let bot = Bot::new(config());

    for _ in 0..ROUNDS {
        let Some(board) = random_board(&mut rng) else {
            continue;
        };
        let world = world(&board, "s0");
        let me = world.controlled();
        let free = world.passable_neighbours(&me.head(), me, 1, 0);

        let decision = bot.decide_world(&world);
        if free.is_empty() {
            assert_eq!(decision.label, Label::NoSafeMove);
        } else {
            assert_ne!(decision.label, Label::NoSafeMove, "board:\n{}", world);
            assert!(
                free.contains(&decision.direction.apply(&me.head())),
                "{} leaves the safe cells, board:\n{}",
                decision.direction.as_str(),
                world
            );
        }
    }
}

#[test]
fn test_stalling_still_moves_with_everything_blacklisted() {
    let mut rng = StdRng::seed_from_u64(0x5EED_0004);
    let config = config();
    let policy = Policy::new(&config);

    let mut blacklist = Blacklist::new();
    for direction in Direction::all() {
        blacklist.push(direction);
    }

    for _ in 0..ROUNDS {
        let Some(board) = random_board(&mut rng) else {
            continue;
        };
        let world = world(&board, "s0");
        let me = world.controlled();
        let free = world.passable_neighbours(&me.head(), me, 1, 0);

        let objective = policy.decide_from(&world, 1, &blacklist);
        assert_eq!(objective.is_forced_death(), free.is_empty());
    }
}

#[test]
fn test_decisions_are_deterministic() {
    let mut rng = StdRng::seed_from_u64(0x5EED_0005);
    let bot = Bot::new(config());

    for _ in 0..ROUNDS / 3 {
        let Some(board) = random_board(&mut rng) else {
            continue;
        };
        let first = bot.decide(&board, "s0").unwrap();
        let second = bot.decide(&board, "s0").unwrap();
        assert_eq!(first, second);
    }
}
