use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::logger::LogLevel;
use crate::tictactoe::{Difficulty, GameMode};
use super::Validate;

pub const MAX_COMPUTER_MOVE_DELAY_MS: u64 = 10_000;

#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct GameConfig {
    pub mode: GameMode,
    pub difficulty: Difficulty,
    /// Pause before the computer answers, so the human move shows first.
    pub computer_move_delay_ms: u64,
    /// Fixed RNG seed; a random one is drawn when absent.
    pub seed: Option<u64>,
    pub log_level: LogLevel,
}

impl GameConfig {
    pub fn computer_move_delay(&self) -> Duration {
        Duration::from_millis(self.computer_move_delay_ms)
    }
}

impl Validate for GameConfig {
    fn validate(&self) -> Result<(), String> {
        if self.computer_move_delay_ms > MAX_COMPUTER_MOVE_DELAY_MS {
            return Err(format!(
                "computer_move_delay_ms must not exceed {} (got {})",
                MAX_COMPUTER_MOVE_DELAY_MS, self.computer_move_delay_ms
            ));
        }
        Ok(())
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            mode: GameMode::ComputerOpponent,
            difficulty: Difficulty::Hard,
            computer_move_delay_ms: 500,
            seed: None,
            log_level: LogLevel::Info,
        }
    }
}
