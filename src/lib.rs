// Library exports for the decision engine
// The server binary, the replay tool and the integration tests all build on these

pub mod bot;
pub mod config;
pub mod cost;
pub mod debug_logger;
pub mod objective;
pub mod occupancy;
pub mod paranoia;
pub mod pathfinding;
pub mod policy;
pub mod replay;
pub mod simple_profiler;
pub mod simulator;
pub mod tactics;
pub mod types;
pub mod world;

#[cfg(test)]
pub(crate) mod fixtures;
