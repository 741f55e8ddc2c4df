use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::board::Board;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Mark {
    #[default]
    Empty,
    X,
    O,
}

impl Mark {
    pub fn symbol(self) -> char {
        match self {
            Mark::Empty => '.',
            Mark::X => 'X',
            Mark::O => 'O',
        }
    }
}

impl From<Player> for Mark {
    fn from(player: Player) -> Self {
        match player {
            Player::X => Mark::X,
            Player::O => Mark::O,
        }
    }
}

/// A side of the game. X always moves first and is the minimizer in search,
/// O is the maximizer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Player {
    X,
    O,
}

impl Player {
    pub fn opponent(self) -> Player {
        match self {
            Player::X => Player::O,
            Player::O => Player::X,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Player::X => write!(f, "X"),
            Player::O => write!(f, "O"),
        }
    }
}

/// The side played by search in `GameMode::ComputerOpponent`.
pub const COMPUTER_PLAYER: Player = Player::O;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameMode {
    ComputerOpponent,
    TwoPlayer,
}

impl FromStr for GameMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ai" | "computer" | "computer_opponent" => Ok(GameMode::ComputerOpponent),
            "pvp" | "multiplayer" | "two_player" => Ok(GameMode::TwoPlayer),
            other => Err(format!("Unknown game mode '{}' (expected ai or pvp)", other)),
        }
    }
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameMode::ComputerOpponent => write!(f, "ai"),
            GameMode::TwoPlayer => write!(f, "pvp"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(format!(
                "Unknown difficulty '{}' (expected easy, medium or hard)",
                other
            )),
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Difficulty::Easy => write!(f, "easy"),
            Difficulty::Medium => write!(f, "medium"),
            Difficulty::Hard => write!(f, "hard"),
        }
    }
}

/// Three board indices that win when held by one player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct WinningLine(pub [usize; 3]);

impl WinningLine {
    pub fn cells(&self) -> [usize; 3] {
        self.0
    }

    pub fn contains(&self, index: usize) -> bool {
        self.0.contains(&index)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Win { player: Player, line: WinningLine },
    Draw,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    Active,
    Finished(Outcome),
}

impl GameStatus {
    pub fn is_active(&self) -> bool {
        matches!(self, GameStatus::Active)
    }

    pub fn outcome(&self) -> Option<Outcome> {
        match self {
            GameStatus::Active => None,
            GameStatus::Finished(outcome) => Some(*outcome),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TurnState {
    pub current_player: Player,
    pub status: GameStatus,
}

/// Read-only view handed to renderers and transports after every change.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameSnapshot {
    pub board: Board,
    pub current_player: Player,
    pub status: GameStatus,
    pub mode: GameMode,
    pub difficulty: Difficulty,
    pub last_move: Option<(Player, usize)>,
}

impl GameSnapshot {
    pub fn winning_line(&self) -> Option<WinningLine> {
        match self.status {
            GameStatus::Finished(Outcome::Win { line, .. }) => Some(line),
            _ => None,
        }
    }

    pub fn is_finished(&self) -> bool {
        !self.status.is_active()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TurnViolation {
    GameFinished,
    ComputerToMove,
    WrongPlayer { expected: Player },
}

impl fmt::Display for TurnViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TurnViolation::GameFinished => write!(f, "game is already over"),
            TurnViolation::ComputerToMove => write!(f, "waiting for the computer to move"),
            TurnViolation::WrongPlayer { expected } => write!(f, "it is {}'s turn", expected),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum MoveError {
    #[error("cell index {0} is outside the board")]
    InvalidIndex(usize),
    #[error("cell {0} is already marked")]
    CellOccupied(usize),
    #[error("invalid turn: {0}")]
    InvalidTurn(TurnViolation),
}
