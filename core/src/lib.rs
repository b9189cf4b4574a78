#![no_std]

//! Deterministic replay of scripted Minesweeper sessions.
//!
//! A session reads `LOAD`, `DISPLAY` and `TOUCH` commands one line at a time,
//! mutates a fixed-size [`Board`] and appends a text transcript to any
//! [`core::fmt::Write`] sink. File access is left to the caller through
//! [`BoardLoader`].

extern crate alloc;

use serde::{Deserialize, Serialize};

pub use board::*;
pub use cell::*;
pub use command::*;
pub use error::*;
pub use render::*;
pub use session::*;
pub use types::*;

mod board;
mod cell;
mod command;
mod error;
mod render;
mod session;
mod types;

/// Shape of the square board every `LOAD` produces.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardConfig {
    pub side: Coord,
}

impl BoardConfig {
    /// The historical 9x9 board.
    pub const CLASSIC: Self = Self { side: 9 };

    pub const fn size(&self) -> Coord2 {
        (self.side, self.side)
    }

    pub const fn total_cells(&self) -> CellCount {
        let side = self.side as CellCount;
        side * side
    }
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self::CLASSIC
    }
}

/// What to do with a recognised command whose arguments do not parse.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MalformedCommandPolicy {
    /// Log a warning and carry on with the next line.
    #[default]
    Skip,
    /// Abort the session with [`GameError::MalformedCommand`].
    Fail,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    pub board: BoardConfig,
    pub malformed_commands: MalformedCommandPolicy,
}

impl SessionConfig {
    pub const fn strict(mut self) -> Self {
        self.malformed_commands = MalformedCommandPolicy::Fail;
        self
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TouchOutcome {
    OutOfRange,
    AlreadyRevealed,
    RevealedSafe,
    RevealedMine,
}
