use alloc::format;
use core::num::Saturating;
use core::ops::Index;
use ndarray::{Array2, s};
use serde::{Deserialize, Serialize};

use crate::types::grid_index;
use crate::*;

/// Square minefield with its per-cell revealed state.
///
/// Cell kinds are fixed when the board is parsed; the only mutation afterwards
/// is flipping `revealed` from false to true through [`Board::touch`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Board {
    config: BoardConfig,
    cells: Array2<Cell>,
    mine_count: CellCount,
    revealed_count: Saturating<CellCount>,
}

impl Board {
    /// Reads `side * side` tokens row by row. Whitespace between tokens is optional and any
    /// characters after the last needed token are ignored.
    pub fn parse(config: BoardConfig, source: &str) -> Result<Self> {
        let total = usize::from(config.total_cells());
        let mut tokens = source.chars().filter(|c| !c.is_whitespace());
        let mut cells: Array2<Cell> = Array2::default(grid_index(config.size()));
        let mut mine_count = 0;

        for (index, cell) in cells.iter_mut().enumerate() {
            let Some(token) = tokens.next() else {
                return Err(GameError::MalformedBoardData {
                    reason: format!("expected {total} cells, found {index}"),
                });
            };
            let kind = CellKind::from_token(token).ok_or_else(|| GameError::MalformedBoardData {
                reason: format!("invalid cell {token:?} at position {}", index + 1),
            })?;
            if kind == CellKind::Mine {
                mine_count += 1;
            }
            *cell = Cell::new(kind);
        }

        if tokens.next().is_some() {
            log::debug!("Ignoring board data past the first {total} cells");
        }

        Ok(Self {
            config,
            cells,
            mine_count,
            revealed_count: Saturating(0),
        })
    }

    /// Builds a board from explicit zero-based mine positions.
    pub fn from_mine_coords(config: BoardConfig, mine_coords: &[Coord2]) -> Result<Self> {
        let mut cells: Array2<Cell> = Array2::default(grid_index(config.size()));

        for &coords in mine_coords {
            if coords.0 >= config.side || coords.1 >= config.side {
                return Err(GameError::MalformedBoardData {
                    reason: format!("mine {coords:?} outside {0}x{0} board", config.side),
                });
            }
            cells[grid_index(coords)] = Cell::new(CellKind::Mine);
        }

        let mine_count = cells
            .iter()
            .filter(|cell| cell.is_mine())
            .count()
            .try_into()
            .unwrap_or(CellCount::MAX);

        Ok(Self {
            config,
            cells,
            mine_count,
            revealed_count: Saturating(0),
        })
    }

    pub fn config(&self) -> BoardConfig {
        self.config
    }

    pub fn side(&self) -> Coord {
        self.config.side
    }

    pub fn mine_count(&self) -> CellCount {
        self.mine_count
    }

    /// Number of safe cells that must be revealed to win.
    pub fn safe_cell_count(&self) -> CellCount {
        self.config.total_cells() - self.mine_count
    }

    /// Every revealed cell, mines included.
    pub fn revealed_count(&self) -> CellCount {
        self.revealed_count.0
    }

    /// 1-based lookup, `None` when out of range.
    pub fn cell(&self, x: i64, y: i64) -> Option<Cell> {
        from_one_based(x, y, self.side()).map(|coords| self[coords])
    }

    /// 1-based; callers range-check first, out-of-range positions report `false`.
    pub fn is_mine(&self, x: i64, y: i64) -> bool {
        self.cell(x, y).is_some_and(Cell::is_mine)
    }

    /// 1-based count of mines among the up to eight surrounding cells.
    pub fn adjacent_mine_count(&self, x: i64, y: i64) -> u8 {
        from_one_based(x, y, self.side())
            .map(|coords| self.adjacent_mines_at(coords))
            .unwrap_or(0)
    }

    pub(crate) fn adjacent_mines_at(&self, coords: Coord2) -> u8 {
        let (rows, cols) = neighborhood(coords, self.side());
        let block = self.cells.slice(s![rows, cols]);
        let mines = block.iter().filter(|cell| cell.is_mine()).count();
        let own = usize::from(self[coords].is_mine());
        // at most eight neighbours
        (mines - own) as u8
    }

    /// Reveals the cell at 1-based `(x, y)`. Out-of-range positions are ignored.
    pub fn touch(&mut self, x: i64, y: i64) -> TouchOutcome {
        let Some(coords) = from_one_based(x, y, self.side()) else {
            return TouchOutcome::OutOfRange;
        };

        let cell = &mut self.cells[grid_index(coords)];
        if cell.revealed {
            return TouchOutcome::AlreadyRevealed;
        }

        cell.revealed = true;
        self.revealed_count += 1;
        if cell.is_mine() {
            TouchOutcome::RevealedMine
        } else {
            TouchOutcome::RevealedSafe
        }
    }

    /// Rows of cells in display order.
    pub fn rows(&self) -> impl Iterator<Item = impl Iterator<Item = (Coord2, Cell)> + '_> + '_ {
        self.cells.outer_iter().enumerate().map(|(row, cells)| {
            cells
                .into_iter()
                .enumerate()
                .map(move |(col, &cell)| ((row as Coord, col as Coord), cell))
        })
    }
}

impl Index<Coord2> for Board {
    type Output = Cell;

    fn index(&self, coords: Coord2) -> &Self::Output {
        &self.cells[grid_index(coords)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::String;

    fn board(mines: &[Coord2]) -> Board {
        Board::from_mine_coords(BoardConfig::CLASSIC, mines).unwrap()
    }

    fn layout_with_mines(mines: &[Coord2]) -> String {
        let mut text = String::new();
        for row in 0..9 {
            for col in 0..9 {
                text.push(if mines.contains(&(row, col)) { '*' } else { '.' });
                text.push(' ');
            }
            text.push('\n');
        }
        text
    }

    #[test]
    fn parse_reads_row_major_tokens() {
        let parsed = Board::parse(BoardConfig::CLASSIC, &layout_with_mines(&[(0, 0), (3, 7)])).unwrap();

        assert_eq!(parsed.mine_count(), 2);
        assert_eq!(parsed.safe_cell_count(), 79);
        assert!(parsed.is_mine(1, 1));
        assert!(parsed.is_mine(4, 8));
        assert!(!parsed.is_mine(8, 4));
        assert_eq!(parsed, board(&[(0, 0), (3, 7)]));
    }

    #[test]
    fn parse_accepts_packed_rows() {
        let text = "*........\n".repeat(9);
        let parsed = Board::parse(BoardConfig::CLASSIC, &text).unwrap();
        assert_eq!(parsed.mine_count(), 9);
    }

    #[test]
    fn parse_rejects_short_input() {
        let err = Board::parse(BoardConfig::CLASSIC, ". . *").unwrap_err();
        assert!(matches!(err, GameError::MalformedBoardData { .. }));
    }

    #[test]
    fn parse_rejects_unknown_token() {
        let mut text = layout_with_mines(&[]);
        text.replace_range(0..1, "x");
        let err = Board::parse(BoardConfig::CLASSIC, &text).unwrap_err();
        assert_eq!(
            err,
            GameError::MalformedBoardData {
                reason: "invalid cell 'x' at position 1".into()
            }
        );
    }

    #[test]
    fn adjacent_count_clamps_to_edges() {
        let b = board(&[(0, 0), (0, 1), (1, 0), (2, 2)]);

        assert_eq!(b.adjacent_mine_count(2, 2), 4);
        assert_eq!(b.adjacent_mine_count(1, 1), 2);
        assert_eq!(b.adjacent_mine_count(9, 9), 0);
        assert_eq!(b.adjacent_mine_count(3, 1), 1);
    }

    #[test]
    fn adjacent_count_reaches_eight() {
        let ring = [(3, 3), (3, 4), (3, 5), (4, 3), (4, 5), (5, 3), (5, 4), (5, 5)];
        assert_eq!(board(&ring).adjacent_mine_count(5, 5), 8);
    }

    #[test]
    fn adjacent_count_skips_the_cell_itself() {
        let b = board(&[(0, 0), (1, 1), (8, 8)]);

        assert_eq!(b.adjacent_mine_count(2, 2), 1);
        assert_eq!(b.adjacent_mine_count(1, 1), 1);
        assert_eq!(b.adjacent_mine_count(9, 9), 0);
        assert_eq!(b.adjacent_mine_count(0, 3), 0);
    }

    #[test]
    fn cell_lookup_is_one_based() {
        let mut b = board(&[(2, 4)]);
        b.touch(1, 1);

        assert_eq!(b.config(), BoardConfig::CLASSIC);
        assert_eq!(b.cell(3, 5), Some(Cell::new(CellKind::Mine)));
        assert_eq!(
            b.cell(1, 1),
            Some(Cell {
                kind: CellKind::Empty,
                revealed: true
            })
        );
        assert_eq!(b.cell(0, 1), None);
        assert_eq!(b.cell(1, 10), None);
    }

    #[test]
    fn touch_out_of_range_changes_nothing() {
        let mut b = board(&[(0, 0)]);
        let before = b.clone();

        assert_eq!(b.touch(0, 5), TouchOutcome::OutOfRange);
        assert_eq!(b.touch(10, 10), TouchOutcome::OutOfRange);
        assert_eq!(b, before);
    }

    #[test]
    fn touch_is_idempotent() {
        let mut b = board(&[(0, 0)]);

        assert_eq!(b.touch(2, 2), TouchOutcome::RevealedSafe);
        assert_eq!(b.touch(2, 2), TouchOutcome::AlreadyRevealed);
        assert_eq!(b.revealed_count(), 1);
        assert_eq!(b.touch(1, 1), TouchOutcome::RevealedMine);
        assert_eq!(b.revealed_count(), 2);
    }

    #[test]
    fn touch_uses_x_as_row() {
        let mut b = board(&[]);
        b.touch(2, 7);
        assert!(b[(1, 6)].revealed);
        assert!(!b[(6, 1)].revealed);
    }
}
