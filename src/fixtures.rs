// Board builders shared by the unit tests

use crate::config::Config;
use crate::types::{Battlesnake, Board, Coord};
use crate::world::WorldModel;

pub fn snake(id: &str, cells: &[(i32, i32)], health: i32) -> Battlesnake {
    let body: Vec<Coord> = cells.iter().map(|&(x, y)| Coord::new(x, y)).collect();
    Battlesnake {
        id: id.to_string(),
        name: id.to_string(),
        health,
        head: body.first().copied().unwrap_or(Coord::new(0, 0)),
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
    WorldModel::from_board(board, controlled_id).expect("fixture board should be valid")
}

pub fn config() -> Config {
    Config::default_hardcoded()
}
