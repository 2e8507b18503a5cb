// Configuration module for reading Snake.toml
// Every tunable constant of the decision engine lives here so it can be adjusted without a rebuild

use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::types::Direction;

/// Main configuration structure containing all tunable parameters
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub timing: TimingConfig,
    pub policy: PolicyConfig,
    pub costs: CostConfig,
    pub paranoia: ParanoiaConfig,
    pub game_rules: GameRulesConfig,
    pub debug: DebugConfig,
}

/// Per-tick wall-clock budget, owned by the HTTP layer
#[derive(Debug, Deserialize, Clone)]
pub struct TimingConfig {
    pub response_time_budget_ms: u64,
    pub network_overhead_ms: u64,
}

impl TimingConfig {
    /// Computes the effective computation budget
    pub fn effective_budget_ms(&self) -> u64 {
        self.response_time_budget_ms.saturating_sub(self.network_overhead_ms)
    }
}

/// Objective ladder thresholds
#[derive(Debug, Deserialize, Clone)]
pub struct PolicyConfig {
    /// Food becomes the priority at or below this health when no opponents remain
    pub low_health_solo: i32,
    /// Food becomes the priority at or below this health when opponents remain
    pub low_health_multi: i32,
    /// We only count as the largest snake when longer than every opponent by more than this
    pub size_buffer: usize,
    pub attack_cost_limit: u32,
    pub safe_food_cost_divisor: u32,
    pub risky_food_cost_divisor: u32,
    /// Answer used when nothing else can be computed
    pub default_move: Direction,
}

/// Traversal cost constants used by the informed search
#[derive(Debug, Deserialize, Clone)]
pub struct CostConfig {
    pub base: u32,
    pub edge_penalty: u32,
    pub corner_penalty: u32,
    pub head_threat_penalty: u32,
    pub diagonal_threat_penalty: u32,
    pub threat_horizon: usize,
    pub blacklist_penalty: u32,
}

/// Adversarial verification of our own chosen move
#[derive(Debug, Deserialize, Clone)]
pub struct ParanoiaConfig {
    pub enabled: bool,
    pub max_attempts: usize,
    pub max_opponents: usize,
}

/// Game rules constants
#[derive(Debug, Deserialize, Clone)]
pub struct GameRulesConfig {
    pub health_on_food: i32,
    pub health_loss_per_turn: i32,
    pub max_health: i32,
}

/// Debug configuration
#[derive(Debug, Deserialize, Clone)]
pub struct DebugConfig {
    pub enabled: bool,
    pub log_file_path: String,
}

impl Config {
    /// Loads configuration from a TOML file
    ///
    /// # Arguments
    /// * `path` - Path to the Snake.toml configuration file
    ///
    /// # Returns
    /// * `Result<Config, String>` - Parsed configuration or error message
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let contents = fs::read_to_string(path.as_ref())
            .map_err(|e| format!("Failed to read config file: {}", e))?;

        toml::from_str(&contents)
            .map_err(|e| format!("Failed to parse config file: {}", e))
    }

    /// Loads default configuration from Snake.toml in the project root
    pub fn load_default() -> Result<Self, String> {
        Self::from_file("Snake.toml")
    }

    /// Creates a configuration with hardcoded default values as fallback
    /// This should match the constants defined in Snake.toml
    pub fn default_hardcoded() -> Self {
        Config {
            timing: TimingConfig {
                response_time_budget_ms: 400,
                network_overhead_ms: 50,
            },
            policy: PolicyConfig {
                low_health_solo: 70,
                low_health_multi: 40,
                size_buffer: 1,
                attack_cost_limit: 5,
                safe_food_cost_divisor: 6,
                risky_food_cost_divisor: 1,
                default_move: Direction::Left,
            },
            costs: CostConfig {
                base: 1,
                edge_penalty: 1,
                corner_penalty: 1,
                head_threat_penalty: 10,
                diagonal_threat_penalty: 3,
                threat_horizon: 2,
                blacklist_penalty: 100_000,
            },
            paranoia: ParanoiaConfig {
                enabled: true,
                max_attempts: 4,
                max_opponents: 3,
            },
            game_rules: GameRulesConfig {
                health_on_food: 100,
                health_loss_per_turn: 1,
                max_health: 100,
            },
            debug: DebugConfig {
                enabled: false,
                log_file_path: "snake_debug.jsonl".to_string(),
            },
        }
    }

    /// Attempts to load from file, falls back to hardcoded defaults on error
    pub fn load_or_default() -> Self {
        Self::load_default()
            .unwrap_or_else(|e| {
                log::warn!("Could not load Snake.toml ({}), using hardcoded defaults", e);
                Self::default_hardcoded()
            })
    }

    /// Health at or below which the ladder switches into food-first mode
    pub fn low_health_threshold(&self, num_opponents: usize) -> i32 {
        if num_opponents == 0 {
            self.policy.low_health_solo
        } else {
            self.policy.low_health_multi
        }
    }
}
