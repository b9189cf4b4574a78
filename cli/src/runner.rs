use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use sweepscript_core::{BoardLoader, GameError, GameSession, SessionConfig, SessionOutcome};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RunError {
    #[error("Cannot open input file {}", path.display())]
    MissingInputFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Cannot write transcript to {}", path.display())]
    WriteOutput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid manifest {}", path.display())]
    Manifest {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error(transparent)]
    Session(#[from] GameError),
}

pub type Result<T> = std::result::Result<T, RunError>;

/// Reads `LOAD` targets from disk.
///
/// Relative paths resolve against `base`; the default base is empty, which leaves
/// them relative to the process working directory.
#[derive(Clone, Debug, Default)]
pub struct FsBoardLoader {
    base: PathBuf,
}

impl FsBoardLoader {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    pub fn resolve(&self, path: &str) -> PathBuf {
        self.base.join(path)
    }
}

impl BoardLoader for FsBoardLoader {
    fn load(&mut self, path: &str) -> sweepscript_core::Result<String> {
        let full = self.resolve(path);
        fs::read_to_string(&full).map_err(|err| {
            log::error!("Cannot read board {}: {err}", full.display());
            GameError::MissingInputFile { path: path.into() }
        })
    }
}

/// Replays one command file into one transcript file, reading boards relative to the
/// working directory.
pub fn run_session(commands: &Path, output: &Path, config: SessionConfig) -> Result<SessionOutcome> {
    run_session_with(commands, output, config, &mut FsBoardLoader::default())
}

/// Like [`run_session`] with an explicit board source.
///
/// The transcript written so far is flushed to `output` even when the session
/// aborts, so a failing run still leaves the echoes that led up to the error.
pub fn run_session_with<L>(
    commands: &Path,
    output: &Path,
    config: SessionConfig,
    loader: &mut L,
) -> Result<SessionOutcome>
where
    L: BoardLoader + ?Sized,
{
    let script = fs::read_to_string(commands).map_err(|source| RunError::MissingInputFile {
        path: commands.to_path_buf(),
        source,
    })?;
    log::info!("Replaying {} into {}", commands.display(), output.display());

    let mut transcript = String::new();
    let result = GameSession::new(config).run(script.lines(), loader, &mut transcript);

    fs::write(output, &transcript).map_err(|source| RunError::WriteOutput {
        path: output.to_path_buf(),
        source,
    })?;

    let outcome = result?;
    log::info!(
        "{}: {:?} after {} commands, {} cells touched",
        commands.display(),
        outcome.ending,
        outcome.commands,
        outcome.revealed_total
    );
    Ok(outcome)
}

/// Result of one pair in a batch run.
#[derive(Debug, Serialize)]
pub struct SessionReport {
    pub commands: PathBuf,
    pub output: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<SessionOutcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SessionReport {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}
