use core::fmt;

use crate::*;

pub const GAME_OVER_BANNER: [&str; 3] = ["Game Over", "~~~~~~~~~", "Final Board"];

/// Character shown for one cell.
pub fn cell_glyph(board: &Board, coords: Coord2, game_over: bool) -> char {
    let cell = board[coords];
    match (cell.revealed, cell.kind) {
        (false, CellKind::Empty) => '.',
        (false, CellKind::Mine) if game_over => '@',
        (false, CellKind::Mine) => '.',
        (true, CellKind::Mine) => '*',
        (true, CellKind::Empty) => {
            char::from_digit(board.adjacent_mines_at(coords).into(), 10).unwrap_or('?')
        }
    }
}

/// Writes the board block: optional banner, one line per row, a blank line and, once the
/// game is over, the number of revealed cells.
pub fn render<W: fmt::Write>(board: &Board, game_over: bool, out: &mut W) -> fmt::Result {
    if game_over {
        for line in GAME_OVER_BANNER {
            writeln!(out, "{line}")?;
        }
    }

    for row in board.rows() {
        for (coords, _) in row {
            out.write_char(cell_glyph(board, coords, game_over))?;
        }
        writeln!(out)?;
    }
    writeln!(out)?;

    if game_over {
        writeln!(out, "Spaces touched: {}", board.revealed_count())?;
    }
    Ok(())
}

/// [`fmt::Display`] adapter over [`render`].
#[derive(Copy, Clone, Debug)]
pub struct Rendered<'a> {
    pub board: &'a Board,
    pub game_over: bool,
}

impl fmt::Display for Rendered<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        render(self.board, self.game_over, f)
    }
}
