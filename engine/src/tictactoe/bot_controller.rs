use crate::SessionRng;
use super::board::Board;
use super::game_state::TicTacToeGameState;
use super::types::{Difficulty, Mark, Player};
use super::win_detector::{check_win, has_win};

pub const WIN_SCORE: i32 = 10;
pub const DRAW_SCORE: i32 = 0;
pub const LOSS_SCORE: i32 = -WIN_SCORE;

/// Chance that a medium bot plays the searched move instead of a random one.
pub const MEDIUM_SEARCH_PROBABILITY: f64 = 0.5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SearchResult {
    pub index: usize,
    /// +10 if O can force a win, -10 if X can, 0 for a draw.
    pub score: i32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveStrategy {
    Search,
    Random,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BotMove {
    pub index: usize,
    pub strategy: MoveStrategy,
}

pub struct BotInput {
    pub board: Board,
    pub player: Player,
    pub difficulty: Difficulty,
}

impl BotInput {
    pub fn from_game_state(state: &TicTacToeGameState) -> Self {
        Self {
            board: *state.board(),
            player: state.current_player(),
            difficulty: state.difficulty(),
        }
    }
}

/// Picks the move a bot of the given difficulty plays.
///
/// The searched move (Hard, and Medium when its coin says so) takes an
/// immediate win first, then blocks an immediate loss, and only otherwise
/// asks `find_best_move`. Among moves with the same minimax score this can
/// pick a different cell than `find_best_move(..).index`: on `XX.|OO.|...`
/// search alone keeps 2, while this plays 5. The score is never worse.
///
/// Returns `None` once the position is already decided.
pub fn calculate_move(input: &BotInput, rng: &mut SessionRng) -> Option<BotMove> {
    if check_win(&input.board).is_some() || input.board.is_full() {
        return None;
    }

    match input.difficulty {
        Difficulty::Hard => Some(search_move(&input.board, input.player)),
        Difficulty::Medium => {
            if rng.chance(MEDIUM_SEARCH_PROBABILITY) {
                Some(search_move(&input.board, input.player))
            } else {
                calculate_random_move(&input.board, rng)
            }
        }
        Difficulty::Easy => calculate_random_move(&input.board, rng),
    }
}

fn calculate_random_move(board: &Board, rng: &mut SessionRng) -> Option<BotMove> {
    let available_moves = board.empty_indices();
    rng.choose(&available_moves).map(|&index| BotMove {
        index,
        strategy: MoveStrategy::Random,
    })
}

fn search_move(board: &Board, player: Player) -> BotMove {
    BotMove {
        index: search_index(board, player),
        strategy: MoveStrategy::Search,
    }
}

// An immediate win is played before anything else, then an immediate block.
// Full search only runs when neither exists.
fn search_index(board: &Board, player: Player) -> usize {
    let mut board = *board;
    let available_moves = board.empty_indices();

    if let Some(index) = find_winning_move(&mut board, player, &available_moves) {
        return index;
    }

    if let Some(index) = find_winning_move(&mut board, player.opponent(), &available_moves) {
        return index;
    }

    find_best_move(&board, player).index
}

fn find_winning_move(board: &mut Board, player: Player, moves: &[usize]) -> Option<usize> {
    for &index in moves {
        board.set_unchecked(index, player.into());
        let wins = has_win(board, player);
        board.set_unchecked(index, Mark::Empty);

        if wins {
            return Some(index);
        }
    }
    None
}

/// Full-depth minimax for `player` on `board`.
///
/// # Panics
///
/// If the position is already won or the board is full. Callers run the
/// terminal checks before searching.
pub fn find_best_move(board: &Board, player: Player) -> SearchResult {
    assert!(
        terminal_score(board).is_none(),
        "move search called on a finished position:\n{}",
        board
    );

    let mut board = *board;
    let (best, score) = minimax(&mut board, player);
    match best {
        Some(index) => SearchResult { index, score },
        None => unreachable!("non-terminal board has an empty cell"),
    }
}

// X winning is checked before O, and both before the full-board draw, since a
// full board can also hold a line.
fn terminal_score(board: &Board) -> Option<i32> {
    if has_win(board, Player::X) {
        Some(LOSS_SCORE)
    } else if has_win(board, Player::O) {
        Some(WIN_SCORE)
    } else if board.is_full() {
        Some(DRAW_SCORE)
    } else {
        None
    }
}

fn minimax(board: &mut Board, player: Player) -> (Option<usize>, i32) {
    if let Some(score) = terminal_score(board) {
        return (None, score);
    }

    let mut best: Option<(usize, i32)> = None;

    for index in board.empty_indices() {
        board.set_unchecked(index, player.into());
        let (_, score) = minimax(board, player.opponent());
        board.set_unchecked(index, Mark::Empty);

        // Strict comparison keeps the lowest index among equal scores.
        let improves = match best {
            None => true,
            Some((_, best_score)) => match player {
                Player::O => score > best_score,
                Player::X => score < best_score,
            },
        };
        if improves {
            best = Some((index, score));
        }
    }

    match best {
        Some((index, score)) => (Some(index), score),
        None => (None, DRAW_SCORE),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(cells: &str) -> Board {
        cells.parse().unwrap()
    }

    fn input(board: Board, player: Player, difficulty: Difficulty) -> BotInput {
        BotInput {
            board,
            player,
            difficulty,
        }
    }

    #[test]
    fn test_o_answers_center_with_corner() {
        let position = board("....X....");

        let result = find_best_move(&position, Player::O);

        assert!([0, 2, 6, 8].contains(&result.index));
        assert_eq!(result.score, DRAW_SCORE);
    }

    #[test]
    fn test_hard_o_takes_immediate_win_over_block() {
        let position = board("XX.|OO.|...");
        let mut rng = SessionRng::new(0);

        let chosen = calculate_move(&input(position, Player::O, Difficulty::Hard), &mut rng);

        assert_eq!(
            chosen,
            Some(BotMove {
                index: 5,
                strategy: MoveStrategy::Search,
            })
        );
    }

    #[test]
    fn test_raw_search_keeps_first_of_equal_scores() {
        // Index 2 also forces a win for O (it opens the 2-4-6 diagonal), and
        // it comes before 5.
        let position = board("XX.|OO.|...");

        assert_eq!(
            find_best_move(&position, Player::O),
            SearchResult {
                index: 2,
                score: WIN_SCORE,
            }
        );
    }

    #[test]
    fn test_hard_and_raw_search_differ_only_among_equal_scores() {
        // X threatens both 6 and 8; every reply loses.
        let position = board("XOX|OX.|...");
        let mut rng = SessionRng::new(0);

        let raw = find_best_move(&position, Player::O);
        let hard = calculate_move(&input(position, Player::O, Difficulty::Hard), &mut rng).unwrap();

        assert_eq!(raw, SearchResult { index: 5, score: LOSS_SCORE });
        assert_eq!(hard.index, 6);
        let mut after_hard = position;
        after_hard.place(hard.index, Player::O).unwrap();
        assert_eq!(find_best_move(&after_hard, Player::X).score, raw.score);
    }

    #[test]
    fn test_hard_blocks_opponent_line() {
        let position = board("XX.|.O.|...");
        let mut rng = SessionRng::new(0);

        let chosen = calculate_move(&input(position, Player::O, Difficulty::Hard), &mut rng);

        assert_eq!(chosen.map(|m| m.index), Some(2));
    }

    #[test]
    fn test_x_minimizes() {
        // X to move can win at 2.
        let position = board("XX.|OO.|O..");

        let result = find_best_move(&position, Player::X);

        assert_eq!(result, SearchResult { index: 2, score: LOSS_SCORE });
    }

    #[test]
    fn test_lost_position_scores_loss() {
        // O cannot stop both X threats (2 and 6).
        let position = board("XX.|XO.|.O.");

        let result = find_best_move(&position, Player::O);

        assert_eq!(result.score, LOSS_SCORE);
    }

    #[test]
    fn test_search_does_not_touch_caller_board() {
        let position = board("X...O...X");
        let before = position;

        find_best_move(&position, Player::O);
        let mut rng = SessionRng::new(5);
        calculate_move(&input(position, Player::O, Difficulty::Hard), &mut rng);

        assert_eq!(position, before);
    }

    #[test]
    #[should_panic(expected = "finished position")]
    fn test_search_on_won_board_panics() {
        find_best_move(&board("XXX|OO.|..."), Player::O);
    }

    #[test]
    #[should_panic(expected = "finished position")]
    fn test_search_on_full_board_panics() {
        find_best_move(&board("XOX|XOO|OXX"), Player::X);
    }

    #[test]
    fn test_calculate_move_on_finished_board_is_none() {
        let mut rng = SessionRng::new(0);

        assert!(calculate_move(&input(board("XXX|OO.|..."), Player::O, Difficulty::Hard), &mut rng).is_none());
        assert!(calculate_move(&input(board("XOX|XOO|OXX"), Player::O, Difficulty::Easy), &mut rng).is_none());
    }

    #[test]
    fn test_hard_self_play_draws() {
        let mut position = Board::new();
        let mut player = Player::X;
        let mut rng = SessionRng::new(11);

        while let Some(chosen) = calculate_move(&input(position, player, Difficulty::Hard), &mut rng) {
            position.place(chosen.index, player).unwrap();
            player = player.opponent();
        }

        assert!(position.is_full());
        assert_eq!(check_win(&position), None);
    }

    #[test]
    fn test_hard_o_never_loses_to_random_x() {
        for seed in 0..20 {
            let mut rng = SessionRng::new(seed);
            let mut position = Board::new();
            let mut player = Player::X;

            loop {
                let difficulty = match player {
                    Player::X => Difficulty::Easy,
                    Player::O => Difficulty::Hard,
                };
                let Some(chosen) = calculate_move(&input(position, player, difficulty), &mut rng) else {
                    break;
                };
                position.place(chosen.index, player).unwrap();
                player = player.opponent();
            }

            assert!(!has_win(&position, Player::X), "seed {} lost:\n{}", seed, position);
        }
    }

    #[test]
    fn test_easy_is_uniform_over_empty_cells() {
        let mut rng = SessionRng::new(2024);
        let position = Board::new();
        let trials = 9000;
        let mut counts = [0usize; 9];

        for _ in 0..trials {
            let chosen = calculate_move(&input(position, Player::O, Difficulty::Easy), &mut rng).unwrap();
            assert_eq!(chosen.strategy, MoveStrategy::Random);
            counts[chosen.index] += 1;
        }

        for (index, &count) in counts.iter().enumerate() {
            assert!((800..=1200).contains(&count), "cell {} picked {} times", index, count);
        }
    }

    #[test]
    fn test_easy_only_picks_empty_cells() {
        let mut rng = SessionRng::new(8);
        let position = board("XOX|.O.|X..");

        for _ in 0..200 {
            let chosen = calculate_move(&input(position, Player::O, Difficulty::Easy), &mut rng).unwrap();
            assert!(position.empty_indices().contains(&chosen.index));
        }
    }

    #[test]
    fn test_medium_searches_about_half_the_time() {
        let mut rng = SessionRng::new(77);
        let position = board("XOX|XOO|...");
        let trials = 4000;

        let searched = (0..trials)
            .filter_map(|_| calculate_move(&input(position, Player::X, Difficulty::Medium), &mut rng))
            .filter(|chosen| chosen.strategy == MoveStrategy::Search)
            .count();

        let ratio = searched as f64 / trials as f64;
        assert!((0.45..=0.55).contains(&ratio), "search ratio {}", ratio);
    }

    #[test]
    fn test_medium_search_move_matches_hard() {
        let mut rng = SessionRng::new(3);
        let position = board("XOX|XOO|...");
        let mut hard_rng = SessionRng::new(0);
        let hard = calculate_move(&input(position, Player::X, Difficulty::Hard), &mut hard_rng).unwrap();

        for _ in 0..100 {
            let chosen = calculate_move(&input(position, Player::X, Difficulty::Medium), &mut rng).unwrap();
            if chosen.strategy == MoveStrategy::Search {
                assert_eq!(chosen.index, hard.index);
            }
        }
    }
}
