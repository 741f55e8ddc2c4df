use crate::config::GameConfig;
use crate::{SessionRng, log, log_debug, log_warn};
use super::game_state::TicTacToeGameState;
use super::types::{Difficulty, GameMode, GameSnapshot, MoveError, Outcome, Player};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MoveResult {
    pub accepted: bool,
    pub error: Option<MoveError>,
    /// Cell the computer answered with, when the move handed it the turn.
    pub computer_move: Option<usize>,
    pub state: GameSnapshot,
}

/// Synchronous game session: one board, one RNG, computer replies applied
/// immediately.
pub struct GameSession {
    state: TicTacToeGameState,
    rng: SessionRng,
}

impl GameSession {
    pub fn new(mode: GameMode, difficulty: Difficulty, rng: SessionRng) -> Self {
        Self {
            state: TicTacToeGameState::new(mode, difficulty),
            rng,
        }
    }

    pub fn from_config(config: &GameConfig) -> Self {
        Self::new(
            config.mode,
            config.difficulty,
            SessionRng::from_seed_or_random(config.seed),
        )
    }

    pub fn submit_move(&mut self, index: usize) -> MoveResult {
        let player = self.state.current_player();
        let result = self.state.submit_move(index);
        self.complete_submission(player, index, result)
    }

    pub fn submit_move_as(&mut self, player: Player, index: usize) -> MoveResult {
        let result = self.state.submit_move_as(player, index);
        self.complete_submission(player, index, result)
    }

    pub fn current_state(&self) -> GameSnapshot {
        self.state.snapshot()
    }

    pub fn reset(&mut self) -> GameSnapshot {
        self.state.reset();
        self.state.snapshot()
    }

    pub fn set_mode(&mut self, mode: GameMode) -> GameSnapshot {
        self.state.reconfigure(mode, self.state.difficulty());
        self.state.snapshot()
    }

    pub fn set_difficulty(&mut self, difficulty: Difficulty) -> GameSnapshot {
        self.state.reconfigure(self.state.mode(), difficulty);
        self.state.snapshot()
    }

    fn complete_submission(
        &mut self,
        player: Player,
        index: usize,
        result: Result<(), MoveError>,
    ) -> MoveResult {
        if let Err(e) = result {
            log_debug!("Rejected move by {} at {}: {}", player, index, e);
            return MoveResult {
                accepted: false,
                error: Some(e),
                computer_move: None,
                state: self.state.snapshot(),
            };
        }

        let mut computer_move = None;
        if self.state.is_computer_turn() {
            match self.state.play_computer_turn(&mut self.rng) {
                Ok(bot_move) => {
                    log_debug!("Computer played {} ({:?})", bot_move.index, bot_move.strategy);
                    computer_move = Some(bot_move.index);
                }
                Err(e) => {
                    log_warn!("Computer failed to move: {}", e);
                }
            }
        }

        if let Some(outcome) = self.state.status().outcome() {
            log_outcome(&outcome);
        }

        MoveResult {
            accepted: true,
            error: None,
            computer_move,
            state: self.state.snapshot(),
        }
    }
}

pub(crate) fn log_outcome(outcome: &Outcome) {
    match outcome {
        Outcome::Win { player, line } => log!("{} wins on {:?}", player, line.cells()),
        Outcome::Draw => log!("Game drawn"),
    }
}
