// Board builders shared by the integration tests
#![allow(dead_code)]

use std::collections::HashMap;

use paranoid_snake::config::Config;
use paranoid_snake::types::{Battlesnake, Board, Coord, Game};
use paranoid_snake::world::WorldModel;

pub fn snake(id: &str, cells: &[(i32, i32)], health: i32) -> Battlesnake {
    let body: Vec<Coord> = cells.iter().map(|&(x, y)| Coord::new(x, y)).collect();
    Battlesnake {
        id: id.to_string(),
        name: id.to_string(),
        health,
        head: body[0],
        length: body.len() as i32,
        body,
        latency: "0".to_string(),
        shout: None,
    }
}

pub fn board(width: i32, height: i32, food: &[(i32, i32)], snakes: Vec<Battlesnake>) -> Board {
    Board {
        width,
        height,
        food: food.iter().map(|&(x, y)| Coord::new(x, y)).collect(),
        snakes,
        hazards: Vec::new(),
    }
}

pub fn world(board: &Board, controlled_id: &str) -> WorldModel {
    WorldModel::from_board(board, controlled_id).expect("board should be valid")
}

pub fn game() -> Game {
    Game {
        id: "test-game".to_string(),
        ruleset: HashMap::new(),
        timeout: 500,
    }
}

pub fn config() -> Config {
    Config::default_hardcoded()
}

/// Costs without edge or corner surcharges, so every step costs the same
pub fn flat_config() -> Config {
    let mut config = Config::default_hardcoded();
    config.costs.edge_penalty = 0;
    config.costs.corner_penalty = 0;
    config
}
