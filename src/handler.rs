// Rocket routes for the four Battlesnake endpoints
//
// Rocket deserializes the request body into a `GameState`; the managed Bot
// does all the work.

use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::State;
use serde_json::Value;

use paranoid_snake::bot::Bot;
use paranoid_snake::types::GameState;

/// GET /: appearance and API version
#[get("/")]
pub fn index(bot: &State<Bot>) -> Json<Value> {
    Json(bot.info())
}

#[post("/start", format = "json", data = "<req>")]
pub fn start(bot: &State<Bot>, req: Json<GameState>) -> Status {
    let GameState {
        game,
        turn,
        board,
        you,
    } = req.into_inner();
    bot.start(&game, &turn, &board, &you);
    Status::Ok
}

/// POST /move: answers within the configured budget, always with a move
#[post("/move", format = "json", data = "<req>")]
pub async fn get_move(bot: &State<Bot>, req: Json<GameState>) -> Json<Value> {
    let GameState {
        game,
        turn,
        board,
        you,
    } = req.into_inner();
    Json(bot.get_move(&game, &turn, &board, &you).await)
}

#[post("/end", format = "json", data = "<req>")]
pub fn end(bot: &State<Bot>, req: Json<GameState>) -> Status {
    let GameState {
        game,
        turn,
        board,
        you,
    } = req.into_inner();
    bot.end(&game, &turn, &board, &you);
    Status::Ok
}
