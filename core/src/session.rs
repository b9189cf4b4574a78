use alloc::collections::BTreeMap;
use alloc::string::String;
use core::fmt;
use serde::{Deserialize, Serialize};

use crate::*;

/// Source of board definitions named by `LOAD` commands.
pub trait BoardLoader {
    /// Returns the full text of the board at `path`, or [`GameError::MissingInputFile`].
    fn load(&mut self, path: &str) -> Result<String>;
}

/// In-memory loader keyed by the exact path string used in `LOAD`.
#[derive(Clone, Debug, Default)]
pub struct MapLoader {
    boards: BTreeMap<String, String>,
}

impl MapLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, path: impl Into<String>, board: impl Into<String>) -> Self {
        self.insert(path, board);
        self
    }

    pub fn insert(&mut self, path: impl Into<String>, board: impl Into<String>) {
        self.boards.insert(path.into(), board.into());
    }
}

impl BoardLoader for MapLoader {
    fn load(&mut self, path: &str) -> Result<String> {
        self.boards
            .get(path)
            .cloned()
            .ok_or_else(|| GameError::MissingInputFile { path: path.into() })
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Ending {
    Won,
    Lost,
    /// Commands ran out before the game was decided.
    Exhausted,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    Active,
    Over(Ending),
}

impl SessionState {
    pub const fn is_over(self) -> bool {
        matches!(self, Self::Over(_))
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::Active
    }
}

/// Whether the command loop should keep feeding lines.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Stop,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionOutcome {
    pub ending: Ending,
    /// Distinct safe cells revealed on the last loaded board.
    pub revealed_safe: CellCount,
    /// All revealed cells, as reported by the final render.
    pub revealed_total: CellCount,
    /// Recognised commands echoed to the transcript.
    pub commands: usize,
}

/// One replay of a command script against the boards it loads.
#[derive(Clone, Debug)]
pub struct GameSession {
    config: SessionConfig,
    board: Option<Board>,
    state: SessionState,
    revealed_safe: CellCount,
    commands: usize,
}

impl GameSession {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            config,
            board: None,
            state: Default::default(),
            revealed_safe: 0,
            commands: 0,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_over(&self) -> bool {
        self.state.is_over()
    }

    pub fn board(&self) -> Option<&Board> {
        self.board.as_ref()
    }

    pub fn revealed_safe(&self) -> CellCount {
        self.revealed_safe
    }

    /// Replays `lines` until the game ends or the lines run out, then emits the final board.
    pub fn run<I, S, L, W>(&mut self, lines: I, loader: &mut L, out: &mut W) -> Result<SessionOutcome>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
        L: BoardLoader + ?Sized,
        W: fmt::Write,
    {
        for line in lines {
            if self.apply(line.as_ref(), loader, out)? == Flow::Stop {
                break;
            }
        }
        self.finish(out)
    }

    /// Processes one script line. Unrecognised lines are skipped without an echo.
    pub fn apply<L, W>(&mut self, line: &str, loader: &mut L, out: &mut W) -> Result<Flow>
    where
        L: BoardLoader + ?Sized,
        W: fmt::Write,
    {
        if self.is_over() {
            return Ok(Flow::Stop);
        }

        let Some(command) = Command::parse(line).transpose() else {
            log::trace!("Ignoring line {line:?}");
            return Ok(Flow::Continue);
        };

        writeln!(out, "Command: {line}")?;
        self.commands += 1;

        match command {
            Ok(command) => self.execute(command, loader, out),
            Err(err) => match self.config.malformed_commands {
                MalformedCommandPolicy::Skip => {
                    log::warn!("Skipping command: {err}");
                    Ok(Flow::Continue)
                }
                MalformedCommandPolicy::Fail => Err(err),
            },
        }
    }

    /// Ends the session if still active, rendering the final board once.
    pub fn finish<W: fmt::Write>(&mut self, out: &mut W) -> Result<SessionOutcome> {
        let ending = match self.state {
            SessionState::Over(ending) => ending,
            SessionState::Active => {
                match &self.board {
                    Some(board) => render(board, true, out)?,
                    None => log::warn!("Command stream ended without a board, nothing to render"),
                }
                self.state = SessionState::Over(Ending::Exhausted);
                Ending::Exhausted
            }
        };

        Ok(SessionOutcome {
            ending,
            revealed_safe: self.revealed_safe,
            revealed_total: self.board.as_ref().map_or(0, Board::revealed_count),
            commands: self.commands,
        })
    }

    fn execute<L, W>(&mut self, command: Command, loader: &mut L, out: &mut W) -> Result<Flow>
    where
        L: BoardLoader + ?Sized,
        W: fmt::Write,
    {
        match command {
            Command::Load(path) => {
                let text = loader.load(&path)?;
                let board = Board::parse(self.config.board, &text)?;
                log::debug!(
                    "Loaded {path:?}: {} mines, {} safe cells to win",
                    board.mine_count(),
                    board.safe_cell_count()
                );
                self.board = Some(board);
                self.revealed_safe = 0;
                self.state = SessionState::Active;
                Ok(Flow::Continue)
            }
            Command::Display => {
                let board = self.board.as_ref().ok_or(GameError::NoBoardLoaded)?;
                render(board, self.state.is_over(), out)?;
                Ok(Flow::Continue)
            }
            Command::Touch(x, y) => {
                let board = self.board.as_mut().ok_or(GameError::NoBoardLoaded)?;
                let outcome = board.touch(x, y);
                log::debug!("Touch ({x}, {y}): {outcome:?}");

                let ending = match outcome {
                    TouchOutcome::OutOfRange | TouchOutcome::AlreadyRevealed => None,
                    TouchOutcome::RevealedMine => Some(Ending::Lost),
                    TouchOutcome::RevealedSafe => {
                        self.revealed_safe += 1;
                        (self.revealed_safe == board.safe_cell_count()).then_some(Ending::Won)
                    }
                };

                match ending {
                    Some(ending) => {
                        self.state = SessionState::Over(ending);
                        render(board, true, out)?;
                        Ok(Flow::Stop)
                    }
                    None => Ok(Flow::Continue),
                }
            }
        }
    }
}
