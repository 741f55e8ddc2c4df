use tictactoe_engine::tictactoe::{
    BOARD_SIDE, GameBroadcaster, GameMode, GameSnapshot, GameStatus, Mark, Outcome, Player,
};

/// Prints every state change to stdout.
#[derive(Clone, Default)]
pub struct ConsoleBroadcaster;

impl GameBroadcaster for ConsoleBroadcaster {
    async fn broadcast_state(&self, snapshot: GameSnapshot) {
        println!("\n{}\n{}", render_board(&snapshot), status_line(&snapshot));
    }

    async fn broadcast_game_over(&self, _outcome: Outcome, _snapshot: GameSnapshot) {
        println!("Type 'reset' to play again.");
    }
}

/// Empty cells show their 1-9 number; winning cells are wrapped in `*`.
pub fn render_board(snapshot: &GameSnapshot) -> String {
    let winning_line = snapshot.winning_line();
    let cells = snapshot.board.cells();

    let rows: Vec<String> = (0..BOARD_SIDE)
        .map(|row| {
            (0..BOARD_SIDE)
                .map(|col| {
                    let index = row * BOARD_SIDE + col;
                    let symbol = match cells[index] {
                        Mark::Empty => (index + 1).to_string(),
                        mark => mark.symbol().to_string(),
                    };
                    if winning_line.is_some_and(|line| line.contains(index)) {
                        format!("*{}*", symbol)
                    } else {
                        format!(" {} ", symbol)
                    }
                })
                .collect::<Vec<_>>()
                .join("|")
        })
        .collect();

    rows.join("\n---+---+---\n")
}

pub fn status_line(snapshot: &GameSnapshot) -> String {
    match snapshot.status {
        GameStatus::Finished(Outcome::Win { player, .. }) => format!("{} wins!", player),
        GameStatus::Finished(Outcome::Draw) => "It's a draw!".to_string(),
        GameStatus::Active => match (snapshot.mode, snapshot.current_player) {
            (GameMode::ComputerOpponent, Player::O) => {
                format!("Computer ({}) is thinking...", snapshot.difficulty)
            }
            (GameMode::ComputerOpponent, Player::X) => "Your move (X).".to_string(),
            (GameMode::TwoPlayer, player) => format!("Player {} to move.", player),
        },
    }
}
