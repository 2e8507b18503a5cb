// Replay module for re-running the decision engine on logged turns
//
// Reads the JSONL written by the debug logger, decides every logged board
// again, and reports where the move or its label changed.

use log::{info, warn};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::time::Instant;

use crate::bot::{Bot, Decision};
use crate::config::Config;
use crate::objective::Label;
use crate::types::{Board, Direction};

/// One line of the debug log
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LogEntry {
    pub turn: i32,
    /// Snake that answered; older logs leave it out and put that snake first
    #[serde(default)]
    pub you_id: Option<String>,
    pub chosen_move: String,
    #[serde(default)]
    pub objective: Option<String>,
    pub board: Board,
    pub timestamp: String,
}

impl LogEntry {
    fn controlled_id(&self) -> Result<&str, String> {
        if let Some(id) = &self.you_id {
            return Ok(id.as_str());
        }
        self.board
            .snakes
            .first()
            .map(|snake| snake.id.as_str())
            .ok_or_else(|| format!("Turn {}: no snakes on the logged board", self.turn))
    }

    fn logged_label(&self) -> Option<Label> {
        self.objective.as_deref().and_then(Label::parse)
    }
}

/// Logged answer next to the one the current engine gives
#[derive(Debug, Clone)]
pub struct ReplayResult {
    pub turn: i32,
    pub original_move: Direction,
    pub replayed_move: Direction,
    pub original_objective: Option<Label>,
    pub replayed_objective: Label,
    pub matches: bool,
    pub computation_time_ms: u128,
}

impl ReplayResult {
    /// Same move for a different reason
    pub fn label_changed(&self) -> bool {
        self.matches
            && self
                .original_objective
                .is_some_and(|label| label != self.replayed_objective)
    }
}

#[derive(Debug, Default)]
pub struct ReplayStats {
    pub total_turns: usize,
    pub matches: usize,
    pub mismatches: usize,
    pub match_rate: f64,
    pub label_changes: usize,
}

pub struct ReplayEngine {
    bot: Bot,
    verbose: bool,
}

/// Parses JSONL log lines, skipping blank ones
pub fn parse_log<R: BufRead>(reader: R) -> Result<Vec<LogEntry>, String> {
    let mut entries = Vec::new();

    for (index, line) in reader.lines().enumerate() {
        let line_no = index + 1;
        let line = line.map_err(|e| format!("Failed to read line {}: {}", line_no, e))?;
        if line.trim().is_empty() {
            continue;
        }

        let entry = serde_json::from_str::<LogEntry>(&line)
            .map_err(|e| format!("Failed to parse JSON on line {}: {}", line_no, e))?;
        entries.push(entry);
    }

    Ok(entries)
}

impl ReplayEngine {
    pub fn new(config: Config, verbose: bool) -> Self {
        ReplayEngine {
            bot: Bot::new(config),
            verbose,
        }
    }

    /// Loads all log entries from a JSONL file
    pub fn load_log_file<P: AsRef<Path>>(&self, log_path: P) -> Result<Vec<LogEntry>, String> {
        let path = log_path.as_ref();
        let file = File::open(path)
            .map_err(|e| format!("Failed to open log file {}: {}", path.display(), e))?;
        let entries = parse_log(BufReader::new(file))?;

        info!("Loaded {} log entries from {}", entries.len(), path.display());
        Ok(entries)
    }

    /// Decides one logged board again
    pub fn replay_entry(&self, entry: &LogEntry) -> Result<ReplayResult, String> {
        let original_move = Direction::parse(&entry.chosen_move)?;
        let controlled_id = entry.controlled_id()?;

        let started = Instant::now();
        let Decision { label, direction } = self
            .bot
            .decide(&entry.board, controlled_id)
            .map_err(|e| format!("Turn {}: {}", entry.turn, e))?;
        let elapsed = started.elapsed().as_millis();

        let result = ReplayResult {
            turn: entry.turn,
            original_move,
            replayed_move: direction,
            original_objective: entry.logged_label(),
            replayed_objective: label,
            matches: original_move == direction,
            computation_time_ms: elapsed,
        };

        if self.verbose {
            if result.matches {
                info!(
                    "Turn {}: ✓ {} ({}, {}ms)",
                    result.turn,
                    direction.as_str(),
                    label,
                    elapsed
                );
            } else {
                warn!(
                    "Turn {}: ✗ logged {}, now {} ({}, {}ms)",
                    result.turn,
                    original_move.as_str(),
                    direction.as_str(),
                    label,
                    elapsed
                );
            }
        }

        Ok(result)
    }

    /// Replays every entry on the rayon pool. Results keep log order; turns that
    /// cannot be replayed are logged and left out.
    pub fn replay_all(&self, entries: &[LogEntry]) -> Vec<ReplayResult> {
        entries
            .par_iter()
            .map(|entry| (entry.turn, self.replay_entry(entry)))
            .collect::<Vec<_>>()
            .into_iter()
            .filter_map(|(turn, result)| {
                result
                    .map_err(|e| warn!("Failed to replay turn {}: {}", turn, e))
                    .ok()
            })
            .collect()
    }

    /// Replays the listed turns; a turn missing from the log is an error
    pub fn replay_turns(
        &self,
        entries: &[LogEntry],
        turn_numbers: &[i32],
    ) -> Result<Vec<ReplayResult>, String> {
        let selected = turn_numbers
            .iter()
            .map(|turn| {
                entries
                    .iter()
                    .find(|e| e.turn == *turn)
                    .cloned()
                    .ok_or_else(|| format!("Turn {} not found in log file", turn))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(self.replay_all(&selected))
    }

    pub fn generate_stats(&self, results: &[ReplayResult]) -> ReplayStats {
        let total_turns = results.len();
        let matches = results.iter().filter(|r| r.matches).count();
        let match_rate = if total_turns == 0 {
            0.0
        } else {
            100.0 * matches as f64 / total_turns as f64
        };

        ReplayStats {
            total_turns,
            matches,
            mismatches: total_turns - matches,
            match_rate,
            label_changes: results.iter().filter(|r| r.label_changed()).count(),
        }
    }

    /// How often each objective won the turn, most frequent first
    pub fn label_histogram(&self, results: &[ReplayResult]) -> Vec<(Label, usize)> {
        let mut counts: Vec<(Label, usize)> = Label::ALL
            .iter()
            .map(|label| {
                let count = results
                    .iter()
                    .filter(|r| r.replayed_objective == *label)
                    .count();
                (*label, count)
            })
            .filter(|(_, count)| *count > 0)
            .collect();
        counts.sort_by(|a, b| b.1.cmp(&a.1));
        counts
    }

    pub fn print_report(&self, results: &[ReplayResult]) {
        let stats = self.generate_stats(results);
        let rule = "═══════════════════════════════════════════════════════════";

        println!("\n{}", rule);
        println!("                    REPLAY REPORT");
        println!("{}", rule);
        println!("Total Turns:    {}", stats.total_turns);
        println!("Matches:        {} ({:.1}%)", stats.matches, stats.match_rate);
        println!("Mismatches:     {}", stats.mismatches);
        println!("Label changes:  {}", stats.label_changes);
        if let Some(slowest) = results.iter().max_by_key(|r| r.computation_time_ms) {
            println!(
                "Slowest turn:   {} ({}ms)",
                slowest.turn, slowest.computation_time_ms
            );
        }
        println!("{}\n", rule);

        let histogram = self.label_histogram(results);
        if !histogram.is_empty() {
            println!("Objectives:");
            for (label, count) in histogram {
                println!("  {:<18} {}", label.as_str(), count);
            }
            println!();
        }

        let changed: Vec<&ReplayResult> = results
            .iter()
            .filter(|r| !r.matches || r.label_changed())
            .collect();
        if changed.is_empty() {
            return;
        }

        println!("{}", rule);
        println!("                  CHANGED DECISIONS");
        println!("{}", rule);
        for result in changed {
            let was = result.original_objective.map_or("?", |label| label.as_str());
            println!(
                "Turn {}: {} ({}) → {} ({}){}",
                result.turn,
                result.original_move.as_str(),
                was,
                result.replayed_move.as_str(),
                result.replayed_objective,
                if result.matches { ", same move" } else { "" }
            );
        }
        println!();
    }

    /// Checks logged moves (not replayed ones) against a list of acceptable moves per turn
    pub fn validate_expected_moves(
        &self,
        entries: &[LogEntry],
        expected_moves: &[(i32, Vec<Direction>)],
    ) -> Result<(), String> {
        for (turn, acceptable) in expected_moves {
            let entry = entries
                .iter()
                .find(|e| e.turn == *turn)
                .ok_or_else(|| format!("Turn {} not found in log", turn))?;

            let logged = Direction::parse(&entry.chosen_move)?;
            if !acceptable.contains(&logged) {
                let names: Vec<&str> = acceptable.iter().map(|d| d.as_str()).collect();
                return Err(format!(
                    "Turn {}: Expected one of {:?}, but got {}",
                    turn,
                    names,
                    logged.as_str()
                ));
            }
        }

        Ok(())
    }
}
