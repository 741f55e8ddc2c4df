use super::board::Board;
use super::types::{Mark, Player, WinningLine};

/// Rows, then columns, then diagonals. The order decides which line is
/// reported when a board holds more than one.
pub const WINNING_LINES: [WinningLine; 8] = [
    WinningLine([0, 1, 2]),
    WinningLine([3, 4, 5]),
    WinningLine([6, 7, 8]),
    WinningLine([0, 3, 6]),
    WinningLine([1, 4, 7]),
    WinningLine([2, 5, 8]),
    WinningLine([0, 4, 8]),
    WinningLine([2, 4, 6]),
];

pub fn winning_line(board: &Board, player: Player) -> Option<WinningLine> {
    let mark = Mark::from(player);
    let cells = board.cells();
    WINNING_LINES
        .iter()
        .find(|line| line.cells().iter().all(|&index| cells[index] == mark))
        .copied()
}

pub fn has_win(board: &Board, player: Player) -> bool {
    winning_line(board, player).is_some()
}

pub fn check_win(board: &Board) -> Option<(Player, WinningLine)> {
    [Player::X, Player::O]
        .into_iter()
        .find_map(|player| winning_line(board, player).map(|line| (player, line)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_board_has_no_win() {
        let board = Board::new();

        assert!(!has_win(&board, Player::X));
        assert!(!has_win(&board, Player::O));
        assert_eq!(check_win(&board), None);
    }

    #[test]
    fn test_every_line_is_detected() {
        for line in WINNING_LINES {
            let mut board = Board::new();
            for index in line.cells() {
                board.place(index, Player::O).unwrap();
            }

            assert_eq!(winning_line(&board, Player::O), Some(line));
            assert!(!has_win(&board, Player::X));
        }
    }

    #[test]
    fn test_first_line_in_order_wins() {
        // Row 0 and column 0 both belong to X.
        let board: Board = "XXX|XO.|XOO".parse().unwrap();

        assert_eq!(winning_line(&board, Player::X), Some(WinningLine([0, 1, 2])));
    }

    #[test]
    fn test_diagonal() {
        let board: Board = "O.X|.X.|XO.".parse().unwrap();

        assert_eq!(check_win(&board), Some((Player::X, WinningLine([2, 4, 6]))));
    }

    #[test]
    fn test_full_board_without_line() {
        let board: Board = "XOX|XOO|OXX".parse().unwrap();

        assert!(board.is_full());
        assert!(!has_win(&board, Player::X));
        assert!(!has_win(&board, Player::O));
    }
}
