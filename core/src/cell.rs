use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellKind {
    Mine,
    Empty,
}

impl CellKind {
    pub const fn from_token(token: char) -> Option<Self> {
        match token {
            '*' => Some(Self::Mine),
            '.' => Some(Self::Empty),
            _ => None,
        }
    }
}

impl Default for CellKind {
    fn default() -> Self {
        Self::Empty
    }
}

/// One grid position: its fixed kind plus whether it has been touched.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub kind: CellKind,
    pub revealed: bool,
}

impl Cell {
    pub const fn new(kind: CellKind) -> Self {
        Self {
            kind,
            revealed: false,
        }
    }

    pub const fn is_mine(self) -> bool {
        matches!(self.kind, CellKind::Mine)
    }
}
