use crate::SessionRng;
use super::board::Board;
use super::bot_controller::{BotInput, BotMove, calculate_move};
use super::types::{
    COMPUTER_PLAYER, Difficulty, GameMode, GameSnapshot, GameStatus, MoveError, Outcome, Player,
    TurnState, TurnViolation,
};
use super::win_detector::winning_line;

/// Turn order and outcome for one game.
///
/// Moves only ever fill empty cells. `reset` and `reconfigure` replace every
/// field at once.
#[derive(Clone, Debug)]
pub struct TicTacToeGameState {
    board: Board,
    current_player: Player,
    status: GameStatus,
    mode: GameMode,
    difficulty: Difficulty,
    last_move: Option<(Player, usize)>,
}

impl TicTacToeGameState {
    pub fn new(mode: GameMode, difficulty: Difficulty) -> Self {
        Self {
            board: Board::new(),
            current_player: Player::X,
            status: GameStatus::Active,
            mode,
            difficulty,
            last_move: None,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn current_player(&self) -> Player {
        self.current_player
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn last_move(&self) -> Option<(Player, usize)> {
        self.last_move
    }

    pub fn is_finished(&self) -> bool {
        !self.status.is_active()
    }

    pub fn is_computer_turn(&self) -> bool {
        self.mode == GameMode::ComputerOpponent
            && self.status.is_active()
            && self.current_player == COMPUTER_PLAYER
    }

    /// A move from local input on behalf of whoever is to move.
    ///
    /// Against the computer only X's moves are accepted here.
    pub fn submit_move(&mut self, index: usize) -> Result<(), MoveError> {
        self.ensure_active()?;
        if self.is_computer_turn() {
            return Err(MoveError::InvalidTurn(TurnViolation::ComputerToMove));
        }
        self.place_mark(self.current_player, index)
    }

    /// A move from a named seat, e.g. one relayed from a remote peer.
    pub fn submit_move_as(&mut self, player: Player, index: usize) -> Result<(), MoveError> {
        self.ensure_active()?;
        if self.mode == GameMode::ComputerOpponent && player == COMPUTER_PLAYER {
            return Err(MoveError::InvalidTurn(TurnViolation::WrongPlayer {
                expected: COMPUTER_PLAYER.opponent(),
            }));
        }
        if player != self.current_player {
            return Err(MoveError::InvalidTurn(TurnViolation::WrongPlayer {
                expected: self.current_player,
            }));
        }
        self.place_mark(player, index)
    }

    pub fn play_computer_turn(&mut self, rng: &mut SessionRng) -> Result<BotMove, MoveError> {
        self.ensure_active()?;
        if !self.is_computer_turn() {
            return Err(MoveError::InvalidTurn(TurnViolation::WrongPlayer {
                expected: self.current_player,
            }));
        }

        let input = BotInput::from_game_state(self);
        let Some(bot_move) = calculate_move(&input, rng) else {
            return Err(MoveError::InvalidTurn(TurnViolation::GameFinished));
        };

        self.place_mark(COMPUTER_PLAYER, bot_move.index)?;
        Ok(bot_move)
    }

    pub fn reset(&mut self) {
        *self = Self::new(self.mode, self.difficulty);
    }

    pub fn reconfigure(&mut self, mode: GameMode, difficulty: Difficulty) {
        *self = Self::new(mode, difficulty);
    }

    pub fn turn_state(&self) -> TurnState {
        TurnState {
            current_player: self.current_player,
            status: self.status,
        }
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            board: self.board,
            current_player: self.current_player,
            status: self.status,
            mode: self.mode,
            difficulty: self.difficulty,
            last_move: self.last_move,
        }
    }

    fn ensure_active(&self) -> Result<(), MoveError> {
        if self.is_finished() {
            return Err(MoveError::InvalidTurn(TurnViolation::GameFinished));
        }
        Ok(())
    }

    fn place_mark(&mut self, player: Player, index: usize) -> Result<(), MoveError> {
        self.board.place(index, player)?;
        self.last_move = Some((player, index));

        self.check_game_over(player);

        if self.status.is_active() {
            self.current_player = player.opponent();
        }
        Ok(())
    }

    // Only the player who just moved can have completed a line.
    fn check_game_over(&mut self, player: Player) {
        if let Some(line) = winning_line(&self.board, player) {
            self.status = GameStatus::Finished(Outcome::Win { player, line });
            return;
        }

        if self.board.is_full() {
            self.status = GameStatus::Finished(Outcome::Draw);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tictactoe::types::{Mark, WinningLine};
    use crate::tictactoe::win_detector::has_win;

    fn two_player() -> TicTacToeGameState {
        TicTacToeGameState::new(GameMode::TwoPlayer, Difficulty::Hard)
    }

    fn play(state: &mut TicTacToeGameState, moves: &[usize]) {
        for &index in moves {
            state.submit_move(index).unwrap();
        }
    }

    #[test]
    fn test_initial_state() {
        let state = two_player();

        assert_eq!(state.current_player(), Player::X);
        assert_eq!(state.status(), GameStatus::Active);
        assert_eq!(*state.board(), Board::new());
        assert_eq!(state.last_move(), None);
    }

    #[test]
    fn test_turns_alternate() {
        let mut state = two_player();

        state.submit_move(0).unwrap();
        assert_eq!(state.current_player(), Player::O);
        state.submit_move(4).unwrap();
        assert_eq!(state.current_player(), Player::X);
        assert_eq!(state.last_move(), Some((Player::O, 4)));
    }

    #[test]
    fn test_win_finishes_game() {
        let mut state = two_player();

        play(&mut state, &[0, 3, 1, 4, 2]);

        assert_eq!(
            state.status(),
            GameStatus::Finished(Outcome::Win {
                player: Player::X,
                line: WinningLine([0, 1, 2]),
            })
        );
        // The winner stays current; the turn does not pass after a win.
        assert_eq!(state.current_player(), Player::X);
    }

    #[test]
    fn test_full_board_without_line_is_draw() {
        let mut state = two_player();

        play(&mut state, &[0, 1, 2, 4, 3, 5, 7, 6, 8]);

        assert!(state.board().is_full());
        assert!(!has_win(state.board(), Player::X));
        assert!(!has_win(state.board(), Player::O));
        assert_eq!(state.status(), GameStatus::Finished(Outcome::Draw));
    }

    #[test]
    fn test_win_on_last_cell_is_not_draw() {
        let mut state = two_player();

        // X completes 2-4-6 with the ninth mark.
        play(&mut state, &[0, 1, 2, 3, 4, 5, 7, 8, 6]);

        assert!(state.board().is_full());
        assert!(matches!(
            state.status(),
            GameStatus::Finished(Outcome::Win { player: Player::X, .. })
        ));
    }

    #[test]
    fn test_finished_game_rejects_every_move() {
        let mut state = two_player();
        play(&mut state, &[0, 3, 1, 4, 2]);
        let board_before = *state.board();
        let turn_before = state.turn_state();

        for index in 0..12 {
            assert_eq!(
                state.submit_move(index),
                Err(MoveError::InvalidTurn(TurnViolation::GameFinished))
            );
            assert_eq!(
                state.submit_move_as(Player::O, index),
                Err(MoveError::InvalidTurn(TurnViolation::GameFinished))
            );
        }

        assert_eq!(*state.board(), board_before);
        assert_eq!(state.turn_state(), turn_before);
    }

    #[test]
    fn test_occupied_cell_rejected_for_every_index() {
        for index in 0..9 {
            let mut state = two_player();
            state.submit_move(index).unwrap();
            let before = state.snapshot();

            assert_eq!(state.submit_move(index), Err(MoveError::CellOccupied(index)));
            assert_eq!(state.snapshot(), before);
        }
    }

    #[test]
    fn test_out_of_range_index_rejected() {
        let mut state = two_player();

        assert_eq!(state.submit_move(9), Err(MoveError::InvalidIndex(9)));
        assert_eq!(state.current_player(), Player::X);
    }

    #[test]
    fn test_computer_mode_rejects_human_move_on_o_turn() {
        let mut state = TicTacToeGameState::new(GameMode::ComputerOpponent, Difficulty::Hard);
        state.submit_move(4).unwrap();

        assert!(state.is_computer_turn());
        assert_eq!(
            state.submit_move(0),
            Err(MoveError::InvalidTurn(TurnViolation::ComputerToMove))
        );
        assert_eq!(
            state.submit_move_as(Player::O, 0),
            Err(MoveError::InvalidTurn(TurnViolation::WrongPlayer {
                expected: Player::X,
            }))
        );
    }

    #[test]
    fn test_submit_as_wrong_player() {
        let mut state = two_player();

        assert_eq!(
            state.submit_move_as(Player::O, 0),
            Err(MoveError::InvalidTurn(TurnViolation::WrongPlayer {
                expected: Player::X,
            }))
        );
        state.submit_move_as(Player::X, 0).unwrap();
        state.submit_move_as(Player::O, 1).unwrap();
    }

    #[test]
    fn test_computer_turn_plays_o() {
        let mut state = TicTacToeGameState::new(GameMode::ComputerOpponent, Difficulty::Hard);
        let mut rng = SessionRng::new(1);
        state.submit_move(4).unwrap();

        let bot_move = state.play_computer_turn(&mut rng).unwrap();

        assert!([0, 2, 6, 8].contains(&bot_move.index));
        assert_eq!(state.current_player(), Player::X);
        assert_eq!(state.last_move(), Some((Player::O, bot_move.index)));
    }

    #[test]
    fn test_computer_turn_refused_on_human_turn() {
        let mut state = TicTacToeGameState::new(GameMode::ComputerOpponent, Difficulty::Hard);
        let mut rng = SessionRng::new(1);

        assert!(state.play_computer_turn(&mut rng).is_err());

        let mut pvp = two_player();
        pvp.submit_move(0).unwrap();
        assert!(pvp.play_computer_turn(&mut rng).is_err());
    }

    #[test]
    fn test_reset_and_reconfigure() {
        let mut state = two_player();
        play(&mut state, &[0, 3, 1, 4, 2]);

        state.reset();
        assert_eq!(state.snapshot(), two_player().snapshot());

        state.submit_move(8).unwrap();
        state.reconfigure(GameMode::ComputerOpponent, Difficulty::Easy);
        assert_eq!(*state.board(), Board::new());
        assert_eq!(state.current_player(), Player::X);
        assert_eq!(state.mode(), GameMode::ComputerOpponent);
        assert_eq!(state.difficulty(), Difficulty::Easy);
        assert!(state.status().is_active());
    }

    #[test]
    fn test_random_games_never_have_two_winners() {
        for seed in 0..200 {
            let mut rng = SessionRng::new(seed);
            let mut state = two_player();

            while !state.is_finished() {
                let moves = state.board().empty_indices();
                let index = *rng.choose(&moves).unwrap();
                let empty_before = state.board().count(Mark::Empty);

                state.submit_move(index).unwrap();

                assert_eq!(state.board().count(Mark::Empty), empty_before - 1);
                assert!(!(has_win(state.board(), Player::X) && has_win(state.board(), Player::O)));
            }
        }
    }
}
