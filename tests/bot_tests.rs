//! Tests for the async `/move` path of the Bot

mod common;

use common::{board, config, game, snake};
use paranoid_snake::bot::Bot;

#[tokio::test]
async fn test_get_move_answers_with_move_and_shout() {
    let bot = Bot::new(config());
    let you = snake("me", &[(5, 5), (4, 5), (3, 5)], 50);
    let board = board(11, 11, &[(5, 0)], vec![you.clone()]);

    let response = bot.get_move(&game(), &12, &board, &you).await;
    assert_eq!(response["move"], "down");
    assert_eq!(response["shout"], "Risky food");
}

#[tokio::test]
async fn test_get_move_survives_a_malformed_snapshot() {
    let config = config();
    let default_move = config.policy.default_move;
    let bot = Bot::new(config);

    // Body runs off the board
    let you = snake("me", &[(0, 0), (-1, 0)], 50);
    let board = board(7, 7, &[], vec![you.clone()]);

    let response = bot.get_move(&game(), &3, &board, &you).await;
    assert_eq!(response["move"], default_move.as_str());
    assert_eq!(response["shout"], "No safe move");
}

#[tokio::test]
async fn test_exhausted_budget_still_answers() {
    let mut config = config();
    config.timing.response_time_budget_ms = 0;
    config.timing.network_overhead_ms = 0;
    let bot = Bot::new(config);

    let you = snake("me", &[(5, 5), (4, 5), (3, 5)], 50);
    let board = board(11, 11, &[(5, 0)], vec![you.clone()]);

    let response = bot.get_move(&game(), &1, &board, &you).await;
    let answer = response["move"].as_str().unwrap();
    assert!(["up", "down", "left", "right"].contains(&answer));
}

#[test]
fn test_info_reports_api_version() {
    let bot = Bot::new(config());
    let info = bot.info();
    assert_eq!(info["apiversion"], "1");
}
