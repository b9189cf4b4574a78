use core::ops::Range;

/// Single coordinate axis used for the board side and positions.
pub type Coord = u8;

/// Count type used for mine counts and revealed-cell counts.
pub type CellCount = u16;

/// Zero-based grid position `(row, column)`.
pub type Coord2 = (Coord, Coord);

/// ndarray index of a grid position.
pub(crate) fn grid_index((row, col): Coord2) -> [usize; 2] {
    [row.into(), col.into()]
}

/// Converts 1-based command coordinates into a grid position, `None` when either
/// axis falls outside `[1, side]`.
pub fn from_one_based(x: i64, y: i64, side: Coord) -> Option<Coord2> {
    let axis = |v: i64| Coord::try_from(v.checked_sub(1)?).ok().filter(|&v| v < side);
    Some((axis(x)?, axis(y)?))
}

/// Row and column ranges of the 3x3 block centred on `coords`, clipped to the board.
pub fn neighborhood((row, col): Coord2, side: Coord) -> (Range<usize>, Range<usize>) {
    let span = |v: Coord| {
        let start = usize::from(v.saturating_sub(1));
        let end = (usize::from(v) + 2).min(usize::from(side));
        start..end
    };
    (span(row), span(col))
}
