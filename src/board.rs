use im::Vector;
use serde::{Deserialize, Serialize};

use crate::types::{Cell, Player, Position};

pub const DEFAULT_BOARD_SIZE: usize = 8;
/// Orthogonal neighbours only; diagonals never count as adjacent.
const DIRECTIONS: [(i32, i32); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    #[error("board size {0} is zero or too large")]
    InvalidSize(usize),

    #[error("position {0} is outside the board")]
    OutOfBounds(Position),

    #[error("cell {0} is already claimed")]
    CellOccupied(Position),

    #[error("row {row} has {len} cells, expected {size}")]
    RaggedRow { row: usize, len: usize, size: usize },
}

/// Square grid of cell ownership.
///
/// Cells live in a persistent vector, so `with_cell_set` shares every untouched cell with the
/// board it was derived from. Archived snapshots therefore cost one path copy per move instead
/// of a full grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<Cell>>", into = "Vec<Vec<Cell>>")]
pub struct Board {
    size: usize,
    cells: Vector<Cell>,
}

impl Board {
    /// Creates an all-empty `size`×`size` board.
    ///
    /// Fails for zero, for sizes whose cell count overflows `usize`, and for sizes whose
    /// coordinates do not fit a [`Position`].
    pub fn new_empty(size: usize) -> Result<Self, BoardError> {
        let cell_count = size
            .checked_mul(size)
            .filter(|_| size > 0 && i32::try_from(size).is_ok())
            .ok_or(BoardError::InvalidSize(size))?;
        Ok(Self::with_cell_count(size, cell_count))
    }

    /// The standard 8×8 board.
    pub fn standard() -> Self {
        Self::with_cell_count(DEFAULT_BOARD_SIZE, DEFAULT_BOARD_SIZE * DEFAULT_BOARD_SIZE)
    }

    fn with_cell_count(size: usize, cell_count: usize) -> Self {
        Self {
            size,
            cells: Vector::from(vec![None; cell_count]),
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Row-major index of `pos`, or `None` when it lies off the board.
    pub fn index_of(&self, pos: Position) -> Option<usize> {
        let x = usize::try_from(pos.x).ok()?;
        let y = usize::try_from(pos.y).ok()?;
        (x < self.size && y < self.size).then(|| y * self.size + x)
    }

    pub fn contains(&self, pos: Position) -> bool {
        self.index_of(pos).is_some()
    }

    pub fn cell_at(&self, pos: Position) -> Result<Cell, BoardError> {
        let idx = self.index_of(pos).ok_or(BoardError::OutOfBounds(pos))?;
        Ok(self.cells[idx])
    }

    /// Returns a copy with `pos` claimed by `player`.
    ///
    /// Only occupancy is checked here; placement rules belong to [`crate::rules`].
    pub fn with_cell_set(&self, pos: Position, player: Player) -> Result<Self, BoardError> {
        let idx = self.index_of(pos).ok_or(BoardError::OutOfBounds(pos))?;
        if self.cells[idx].is_some() {
            return Err(BoardError::CellOccupied(pos));
        }
        Ok(Self {
            size: self.size,
            cells: self.cells.update(idx, Some(player)),
        })
    }

    /// Number of claimed cells.
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_some()).count()
    }

    pub fn empty_count(&self) -> usize {
        self.cells.len() - self.occupied_count()
    }

    /// Cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        self.cells.iter().copied()
    }

    /// Every position in row-major order.
    pub fn positions(&self) -> impl Iterator<Item = Position> + use<> {
        let size = self.size as i32;
        (0..size).flat_map(move |y| (0..size).map(move |x| Position::new(x, y)))
    }

    /// On-board orthogonal neighbours of `pos`.
    pub fn neighbors(&self, pos: Position) -> impl Iterator<Item = Position> + '_ {
        DIRECTIONS
            .iter()
            .map(move |&(dx, dy)| Position::new(pos.x + dx, pos.y + dy))
            .filter(|&n| self.contains(n))
    }

    /// Converts to rows of markers where 0=empty, 1=player 1, 2=player 2.
    pub fn to_marker_rows(&self) -> Vec<Vec<u8>> {
        self.rows()
            .into_iter()
            .map(|row| row.into_iter().map(|c| c.map_or(0, Player::marker)).collect())
            .collect()
    }

    fn rows(&self) -> Vec<Vec<Cell>> {
        self.cells
            .iter()
            .copied()
            .collect::<Vec<_>>()
            .chunks(self.size)
            .map(<[Cell]>::to_vec)
            .collect()
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::standard()
    }
}

impl TryFrom<Vec<Vec<Cell>>> for Board {
    type Error = BoardError;

    fn try_from(rows: Vec<Vec<Cell>>) -> Result<Self, Self::Error> {
        let size = rows.len();
        if size == 0 {
            return Err(BoardError::InvalidSize(size));
        }
        if let Some((row, cells)) = rows.iter().enumerate().find(|(_, r)| r.len() != size) {
            return Err(BoardError::RaggedRow {
                row,
                len: cells.len(),
                size,
            });
        }
        Ok(Self {
            size,
            cells: rows.into_iter().flatten().collect(),
        })
    }
}

impl From<Board> for Vec<Vec<Cell>> {
    fn from(board: Board) -> Self {
        board.rows()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(x: i32, y: i32) -> Position {
        Position::new(x, y)
    }

    #[test]
    fn new_empty_rejects_zero_size() {
        assert_eq!(Board::new_empty(0), Err(BoardError::InvalidSize(0)));
    }

    #[test]
    fn new_empty_rejects_sizes_whose_cell_count_overflows() {
        assert_eq!(
            Board::new_empty(usize::MAX),
            Err(BoardError::InvalidSize(usize::MAX))
        );
        let too_wide = 1usize << (usize::BITS / 2);
        assert_eq!(
            Board::new_empty(too_wide),
            Err(BoardError::InvalidSize(too_wide))
        );
    }

    #[test]
    fn standard_board_is_eight_by_eight_and_empty() {
        let board = Board::standard();

        assert_eq!(board.size(), 8);
        assert_eq!(board.occupied_count(), 0);
        assert_eq!(board.empty_count(), 64);
        assert_eq!(board.positions().count(), 64);
    }

    #[test]
    fn cell_at_rejects_out_of_bounds_positions() {
        let board = Board::standard();

        assert_eq!(board.cell_at(pos(0, 0)), Ok(None));
        assert_eq!(board.cell_at(pos(7, 7)), Ok(None));
        for bad in [pos(-1, 0), pos(0, -1), pos(8, 0), pos(0, 8)] {
            assert_eq!(board.cell_at(bad), Err(BoardError::OutOfBounds(bad)));
        }
    }

    #[test]
    fn with_cell_set_copies_and_leaves_original_untouched() {
        let board = Board::standard();
        let next = board.with_cell_set(pos(2, 5), Player::P1).unwrap();

        assert_eq!(board.cell_at(pos(2, 5)), Ok(None));
        assert_eq!(next.cell_at(pos(2, 5)), Ok(Some(Player::P1)));
        assert_eq!(next.occupied_count(), 1);
        assert_eq!(next.to_marker_rows()[5][2], 1);
    }

    #[test]
    fn with_cell_set_refuses_occupied_and_off_board_cells() {
        let board = Board::standard()
            .with_cell_set(pos(1, 1), Player::P2)
            .unwrap();

        assert_eq!(
            board.with_cell_set(pos(1, 1), Player::P1),
            Err(BoardError::CellOccupied(pos(1, 1)))
        );
        assert_eq!(
            board.with_cell_set(pos(8, 1), Player::P1),
            Err(BoardError::OutOfBounds(pos(8, 1)))
        );
    }

    #[test]
    fn neighbors_are_orthogonal_and_clipped_to_the_board() {
        let board = Board::standard();

        let corner: Vec<_> = board.neighbors(pos(0, 0)).collect();
        assert_eq!(corner, vec![pos(1, 0), pos(0, 1)]);

        let centre: Vec<_> = board.neighbors(pos(3, 3)).collect();
        assert_eq!(centre.len(), 4);
        assert!(!centre.contains(&pos(4, 4)));
    }

    #[test]
    fn serde_uses_rows_and_rejects_ragged_boards() {
        let board = Board::new_empty(2)
            .unwrap()
            .with_cell_set(pos(1, 0), Player::P2)
            .unwrap();

        let json = serde_json::to_string(&board).unwrap();
        assert_eq!(json, "[[null,2],[null,null]]");
        assert_eq!(serde_json::from_str::<Board>(&json).unwrap(), board);

        assert!(serde_json::from_str::<Board>("[[null,2],[null]]").is_err());
        assert!(serde_json::from_str::<Board>("[]").is_err());
        assert!(serde_json::from_str::<Board>("[[3]]").is_err());
    }
}
