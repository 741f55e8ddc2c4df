use std::fmt;
use std::str::FromStr;

use super::types::{Mark, MoveError, Player};

pub const BOARD_SIDE: usize = 3;
pub const CELL_COUNT: usize = BOARD_SIDE * BOARD_SIDE;

/// 3x3 grid, row-major, indices 0-8.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Board {
    cells: [Mark; CELL_COUNT],
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cells(&self) -> &[Mark; CELL_COUNT] {
        &self.cells
    }

    pub fn cell_at(&self, index: usize) -> Result<Mark, MoveError> {
        self.cells
            .get(index)
            .copied()
            .ok_or(MoveError::InvalidIndex(index))
    }

    pub fn place(&mut self, index: usize, player: Player) -> Result<(), MoveError> {
        if self.cell_at(index)? != Mark::Empty {
            return Err(MoveError::CellOccupied(index));
        }
        self.cells[index] = player.into();
        Ok(())
    }

    // Search simulates and undoes placements on indices it has already
    // checked, so these skip validation.
    pub(crate) fn set_unchecked(&mut self, index: usize, mark: Mark) {
        self.cells[index] = mark;
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|&cell| cell != Mark::Empty)
    }

    pub fn empty_indices(&self) -> Vec<usize> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| **cell == Mark::Empty)
            .map(|(index, _)| index)
            .collect()
    }

    pub fn count(&self, mark: Mark) -> usize {
        self.cells.iter().filter(|&&cell| cell == mark).count()
    }
}

/// Parses nine cells from `X`, `O` and `.`/`_`/`-` for empty. Whitespace and
/// `|` are ignored, so `"XX.|OO.|..."` works.
impl FromStr for Board {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut cells = [Mark::Empty; CELL_COUNT];
        let mut count = 0;

        for ch in s.chars().filter(|c| !c.is_whitespace() && *c != '|') {
            let mark = match ch {
                'X' | 'x' => Mark::X,
                'O' | 'o' => Mark::O,
                '.' | '_' | '-' => Mark::Empty,
                other => return Err(format!("Unexpected board character '{}'", other)),
            };
            if count == CELL_COUNT {
                return Err(format!("Board has more than {} cells", CELL_COUNT));
            }
            cells[count] = mark;
            count += 1;
        }

        if count != CELL_COUNT {
            return Err(format!("Board needs {} cells, got {}", CELL_COUNT, count));
        }
        Ok(Self { cells })
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..BOARD_SIDE {
            let start = row * BOARD_SIDE;
            let line: Vec<String> = self.cells[start..start + BOARD_SIDE]
                .iter()
                .map(|cell| cell.symbol().to_string())
                .collect();
            write!(f, "{}", line.join("|"))?;
            if row + 1 < BOARD_SIDE {
                write!(f, "\n-+-+-\n")?;
            }
        }
        Ok(())
    }
}
