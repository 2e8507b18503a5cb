// Decision engine entry point
//
// `decide` turns one board snapshot into a labelled move: the policy proposes,
// the adversarial checker vetoes, and rejected first moves are blacklisted for
// the next attempt. `get_move` runs that on the blocking pool under the
// configured time budget.

use log::{debug, error, info, warn};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::config::Config;
use crate::cost::Blacklist;
use crate::debug_logger::DebugLogger;
use crate::objective::{Label, Objective};
use crate::paranoia::{AdversarialChecker, Threat, Verdict};
use crate::policy::Policy;
use crate::types::{Battlesnake, Board, Direction, Game};
use crate::world::{WorldError, WorldModel};

/// Final answer for one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    pub label: Label,
    pub direction: Direction,
}

impl From<&Objective> for Decision {
    fn from(objective: &Objective) -> Self {
        Decision {
            label: objective.label,
            direction: objective.direction,
        }
    }
}

/// Lock-free shared state between the async responder and the decision engine.
/// Holds the best answer known so far, so a timeout still has something to send.
/// `cancelled` is raised by the responder once it has answered; the engine stops at
/// the next attempt boundary.
#[derive(Debug)]
struct SharedDecision {
    direction: AtomicU8,
    label: AtomicU8,
    complete: AtomicBool,
    cancelled: AtomicBool,
}

impl SharedDecision {
    fn new(fallback: Direction) -> Self {
        let shared = SharedDecision {
            direction: AtomicU8::new(0),
            label: AtomicU8::new(0),
            complete: AtomicBool::new(false),
            cancelled: AtomicBool::new(false),
        };
        shared.publish(&Decision {
            label: Label::NoSafeMove,
            direction: fallback,
        });
        shared
    }

    fn publish(&self, decision: &Decision) {
        let direction = Direction::all()
            .iter()
            .position(|d| *d == decision.direction)
            .unwrap_or(0);
        let label = Label::ALL
            .iter()
            .position(|l| *l == decision.label)
            .unwrap_or(0);
        self.direction.store(direction as u8, Ordering::Release);
        self.label.store(label as u8, Ordering::Release);
    }

    fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    fn read(&self) -> Decision {
        let direction = Direction::all()
            .get(self.direction.load(Ordering::Acquire) as usize)
            .copied()
            .unwrap_or(Direction::Up);
        let label = Label::ALL
            .get(self.label.load(Ordering::Acquire) as usize)
            .copied()
            .unwrap_or(Label::NoSafeMove);
        Decision { label, direction }
    }
}

/// Battlesnake Bot with OOP-style API
/// Takes static configuration dependencies and exposes methods corresponding to API endpoints
pub struct Bot {
    config: Arc<Config>,
    logger: DebugLogger,
}

impl Bot {
    /// Creates a new Bot instance with the given configuration
    ///
    /// # Arguments
    /// * `config` - Static configuration that does not change during the bot's lifetime
    pub fn new(config: Config) -> Self {
        Bot {
            config: Arc::new(config),
            logger: DebugLogger::disabled(),
        }
    }

    /// Same as `new`, additionally recording every answered move
    pub fn with_debug_logger(config: Config, logger: DebugLogger) -> Self {
        Bot {
            config: Arc::new(config),
            logger,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns bot metadata and appearance
    /// Corresponds to GET / endpoint
    pub fn info(&self) -> Value {
        info!("INFO");

        json!({
            "apiversion": "1",
            "author": "paranoid-snake",
            "color": "#8B0000",
            "head": "default",
            "tail": "default",
        })
    }

    /// Called when a game starts
    /// Corresponds to POST /start endpoint
    pub fn start(&self, game: &Game, _turn: &i32, board: &Board, you: &Battlesnake) {
        info!(
            "GAME START {} ({}x{}, {} snakes) as {}",
            game.id,
            board.width,
            board.height,
            board.snakes.len(),
            you.id
        );
    }

    /// Called when a game ends
    /// Corresponds to POST /end endpoint
    pub fn end(&self, game: &Game, turn: &i32, _board: &Board, _you: &Battlesnake) {
        info!("GAME OVER {} after {} turns", game.id, turn);
    }

    /// Computes and returns the next move
    /// Corresponds to POST /move endpoint
    ///
    /// The decision runs on tokio's blocking pool. If it overruns the effective budget
    /// the best answer published so far is sent instead.
    ///
    /// # Returns
    /// * `Value` - JSON response with the chosen move and its label as the shout
    pub async fn get_move(
        &self,
        _game: &Game,
        turn: &i32,
        board: &Board,
        you: &Battlesnake,
    ) -> Value {
        let start_time = Instant::now();

        let shared = Arc::new(SharedDecision::new(self.config.policy.default_move));
        let shared_clone = shared.clone();
        let config = self.config.clone();
        let snapshot = board.clone();
        let you_id = you.id.clone();

        let handle = tokio::task::spawn_blocking(move || -> Result<Decision, WorldError> {
            let world = WorldModel::from_board(&snapshot, &you_id)?;
            let decision = Bot::run(&config, &world, &shared_clone);
            shared_clone.complete.store(true, Ordering::Release);
            Ok(decision)
        });

        let budget = Duration::from_millis(self.config.timing.effective_budget_ms());
        let decision = match tokio::time::timeout(budget, handle).await {
            Ok(Ok(Ok(decision))) => decision,
            Ok(Ok(Err(e))) => {
                warn!("Turn {}: unusable snapshot: {}", turn, e);
                Decision {
                    label: Label::NoSafeMove,
                    direction: self.config.policy.default_move,
                }
            }
            Ok(Err(e)) => {
                error!("Turn {}: decision task failed: {}", turn, e);
                shared.read()
            }
            Err(_) => {
                // The blocking task cannot be aborted, only told to stop
                shared.cancel();
                warn!(
                    "Turn {}: budget of {}ms exhausted, sending provisional move",
                    turn,
                    budget.as_millis()
                );
                shared.read()
            }
        };

        info!(
            "Turn {}: Chose {} ({}, complete: {}, time: {}ms)",
            turn,
            decision.direction.as_str(),
            decision.label,
            shared.complete.load(Ordering::Acquire),
            start_time.elapsed().as_millis()
        );

        self.logger
            .log_move(*turn, board, &you.id, decision.direction, decision.label);

        json!({
            "move": decision.direction.as_str(),
            "shout": decision.label.as_str(),
        })
    }

    /// Decides synchronously, without a time budget
    ///
    /// # Arguments
    /// * `board` - Snapshot as received from the game server
    /// * `controlled_id` - Id of the snake to move
    pub fn decide(&self, board: &Board, controlled_id: &str) -> Result<Decision, WorldError> {
        let world = WorldModel::from_board(board, controlled_id)?;
        Ok(self.decide_world(&world))
    }

    pub fn decide_world(&self, world: &WorldModel) -> Decision {
        let shared = SharedDecision::new(self.config.policy.default_move);
        Bot::run(&self.config, world, &shared)
    }

    /// Propose, verify, blacklist, repeat
    fn run(config: &Config, world: &WorldModel, shared: &SharedDecision) -> Decision {
        let policy = Policy::new(config);
        let checker = AdversarialChecker::new(config);
        let mut blacklist = Blacklist::new();
        let mut rejected: Vec<(Objective, Threat)> = Vec::new();

        for attempt in 0..config.paranoia.max_attempts.max(1) {
            if shared.is_cancelled() {
                debug!("attempt {}: answer already sent, stopping", attempt);
                return shared.read();
            }
            let objective = policy.decide_from(world, attempt, &blacklist);
            if objective.is_forced_death() {
                debug!("attempt {}: no legal move left", attempt);
                break;
            }
            if attempt == 0 {
                shared.publish(&Decision::from(&objective));
            }

            if !config.paranoia.enabled {
                return Decision::from(&objective);
            }
            if blacklist.contains(objective.direction) {
                debug!(
                    "attempt {}: policy can only repeat rejected move {}",
                    attempt,
                    objective.direction.as_str()
                );
                break;
            }

            match checker.check(world, &objective) {
                Verdict::Safe => {
                    let decision = Decision::from(&objective);
                    shared.publish(&decision);
                    return decision;
                }
                Verdict::Unsafe(threat) => {
                    info!(
                        "attempt {}: {} {} rejected, {} threatens {:?}",
                        attempt,
                        objective.label,
                        objective.direction.as_str(),
                        threat.opponent_id,
                        threat.kind
                    );
                    blacklist.push(objective.direction);
                    rejected.push((objective, threat));
                    if let Some(decision) = least_bad(&rejected) {
                        shared.publish(&decision);
                    }
                }
            }
        }

        least_bad(&rejected).unwrap_or(Decision {
            label: Label::NoSafeMove,
            direction: config.policy.default_move,
        })
    }
}

/// Among rejected objectives, the one whose threat is mildest and furthest away.
/// Earlier attempts win ties.
fn least_bad(rejected: &[(Objective, Threat)]) -> Option<Decision> {
    rejected
        .iter()
        .min_by_key(|(_, threat)| (threat.severity(), std::cmp::Reverse(threat.distance)))
        .map(|(objective, _)| Decision::from(objective))
}
