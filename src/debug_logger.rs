// Debug logging module for asynchronous game state logging
//
// Every answered turn becomes one JSON line that the replay tool reads back.
// Writes happen on a spawned tokio task so the move response never waits on disk.

use log::error;
use serde::Serialize;
use std::sync::Arc;
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use crate::objective::Label;
use crate::types::{Board, Direction};

#[derive(Debug, Serialize)]
struct DebugLogEntry<'a> {
    turn: i32,
    you_id: &'a str,
    chosen_move: &'static str,
    objective: &'static str,
    board: &'a Board,
    timestamp: String,
}

/// Appends decisions to a JSONL file; a disabled logger has no sink and drops everything
#[derive(Clone)]
pub struct DebugLogger {
    sink: Option<Arc<Mutex<File>>>,
}

impl DebugLogger {
    /// Opens (and truncates) the log file when `enabled`. A file that cannot be
    /// created leaves the logger disabled.
    pub async fn new(enabled: bool, log_file_path: &str) -> Self {
        if !enabled {
            return Self::disabled();
        }

        let opened = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(log_file_path)
            .await;

        match opened {
            Ok(file) => {
                log::info!("Debug logging enabled: {}", log_file_path);
                DebugLogger {
                    sink: Some(Arc::new(Mutex::new(file))),
                }
            }
            Err(e) => {
                error!("Failed to create debug log file '{}': {}", log_file_path, e);
                Self::disabled()
            }
        }
    }

    pub fn disabled() -> Self {
        DebugLogger { sink: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.sink.is_some()
    }

    /// Queues one decision for writing. Must be called from inside a tokio runtime.
    pub fn log_move(
        &self,
        turn: i32,
        board: &Board,
        you_id: &str,
        chosen_move: Direction,
        objective: Label,
    ) {
        let Some(sink) = self.sink.clone() else {
            return;
        };

        let entry = DebugLogEntry {
            turn,
            you_id,
            chosen_move: chosen_move.as_str(),
            objective: objective.as_str(),
            board,
            timestamp: chrono::Utc::now().to_rfc3339(),
        };

        // Serialized up front so the task owns nothing but the line
        let line = match serde_json::to_string(&entry) {
            Ok(json) => json + "\n",
            Err(e) => {
                error!("Failed to serialize debug log entry for turn {}: {}", turn, e);
                return;
            }
        };

        tokio::spawn(async move {
            let mut file = sink.lock().await;
            if let Err(e) = file.write_all(line.as_bytes()).await {
                error!("Failed to write debug log entry: {}", e);
            } else if let Err(e) = file.flush().await {
                error!("Failed to flush debug log: {}", e);
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{board, snake};
    use crate::replay::parse_log;

    #[tokio::test]
    async fn test_logged_line_reads_back_as_replay_entry() {
        let path = std::env::temp_dir()
            .join(format!("paranoid_snake_log_{}.jsonl", std::process::id()));
        let path_str = path.to_string_lossy().to_string();

        let logger = DebugLogger::new(true, &path_str).await;
        assert!(logger.is_enabled());

        let board = board(7, 7, &[(1, 1)], vec![snake("me", &[(3, 3), (3, 2)], 80)]);
        logger.log_move(9, &board, "me", Direction::Up, Label::GoingToTail);

        // The write happens on a spawned task
        let mut entries = Vec::new();
        for _ in 0..50 {
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
            let text = tokio::fs::read_to_string(&path).await.unwrap_or_default();
            if text.ends_with('\n') {
                entries = parse_log(text.as_bytes()).unwrap();
                break;
            }
        }
        let _ = tokio::fs::remove_file(&path).await;

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].turn, 9);
        assert_eq!(entries[0].you_id.as_deref(), Some("me"));
        assert_eq!(entries[0].chosen_move, "up");
        assert_eq!(entries[0].objective.as_deref(), Some("Going to my tail"));
    }

    #[test]
    fn test_disabled_logger_ignores_moves() {
        let logger = DebugLogger::disabled();
        assert!(!logger.is_enabled());
        // No runtime here: a disabled logger must not try to spawn
        let board = board(7, 7, &[], vec![snake("me", &[(3, 3)], 80)]);
        logger.log_move(1, &board, "me", Direction::Up, Label::Stalling);
    }
}
