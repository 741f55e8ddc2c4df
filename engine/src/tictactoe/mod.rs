mod board;
mod bot_controller;
mod game_state;
mod session;
mod shared_session;
mod types;
mod win_detector;

pub use board::{BOARD_SIDE, Board, CELL_COUNT};
pub use bot_controller::{
    BotInput, BotMove, DRAW_SCORE, LOSS_SCORE, MEDIUM_SEARCH_PROBABILITY, MoveStrategy,
    SearchResult, WIN_SCORE, calculate_move, find_best_move,
};
pub use game_state::TicTacToeGameState;
pub use session::{GameSession, MoveResult};
pub use shared_session::{GameBroadcaster, SharedGameSession};
pub use types::{
    COMPUTER_PLAYER, Difficulty, GameMode, GameSnapshot, GameStatus, Mark, MoveError, Outcome,
    Player, TurnState, TurnViolation, WinningLine,
};
pub use win_detector::{WINNING_LINES, check_win, has_win, winning_line};
