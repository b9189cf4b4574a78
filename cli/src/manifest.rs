use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use sweepscript_core::SessionConfig;

use crate::*;

/// One (command file, output file) pair.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct SessionPair {
    pub commands: PathBuf,
    pub output: PathBuf,
}

/// Batch configuration, read from TOML:
///
/// ```toml
/// strict = false
/// board_dir = "boards"
///
/// [[session]]
/// commands = "test1commands.txt"
/// output = "test1_output.txt"
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    #[serde(default)]
    pub strict: bool,
    /// Base for relative `LOAD` paths; the working directory when unset.
    #[serde(default)]
    pub board_dir: Option<PathBuf>,
    #[serde(default, rename = "session")]
    pub sessions: Vec<SessionPair>,
}

impl Manifest {
    /// Reads the manifest and makes its own relative paths relative to its directory.
    /// `LOAD` paths inside the command files are left to `board_dir`.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| RunError::MissingInputFile {
            path: path.to_path_buf(),
            source,
        })?;
        let mut manifest: Self = toml::from_str(&text).map_err(|source| RunError::Manifest {
            path: path.to_path_buf(),
            source,
        })?;

        let base = path.parent().unwrap_or(Path::new(""));
        for pair in &mut manifest.sessions {
            pair.commands = base.join(&pair.commands);
            pair.output = base.join(&pair.output);
        }
        if let Some(dir) = &mut manifest.board_dir {
            *dir = base.join(&*dir);
        }
        Ok(manifest)
    }

    pub fn session_config(&self) -> SessionConfig {
        let config = SessionConfig::default();
        if self.strict { config.strict() } else { config }
    }

    /// Runs every pair in order. A failing pair is recorded and does not stop the rest.
    pub fn run(&self, config: SessionConfig) -> Vec<SessionReport> {
        let mut loader = self.board_dir.clone().map(FsBoardLoader::new).unwrap_or_default();
        self.sessions
            .iter()
            .map(|pair| {
                let result = run_session_with(&pair.commands, &pair.output, config, &mut loader);
                if let Err(err) = &result {
                    log::error!("{}: {err}", pair.commands.display());
                }
                SessionReport {
                    commands: pair.commands.clone(),
                    output: pair.output.clone(),
                    outcome: result.as_ref().ok().copied(),
                    error: result.err().map(|err| error_chain(&err)),
                }
            })
            .collect()
    }
}

fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_session_tables() {
        let manifest: Manifest = toml::from_str(
            r#"
            strict = true

            [[session]]
            commands = "a.txt"
            output = "a.out"

            [[session]]
            commands = "b.txt"
            output = "b.out"
            "#,
        )
        .unwrap();

        assert!(manifest.strict);
        assert_eq!(manifest.board_dir, None);
        assert_eq!(manifest.sessions.len(), 2);
        assert_eq!(manifest.sessions[1].output, PathBuf::from("b.out"));
        assert_eq!(manifest.session_config(), SessionConfig::default().strict());
    }

    #[test]
    fn board_dir_is_relative_to_manifest() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("batch.toml");
        fs::write(&path, "board_dir = \"boards\"\n").unwrap();

        let manifest = Manifest::load(&path).unwrap();

        assert_eq!(manifest.board_dir, Some(dir.path().join("boards")));
    }

    #[test]
    fn empty_manifest_is_valid() {
        let manifest: Manifest = toml::from_str("").unwrap();
        assert_eq!(manifest, Manifest::default());
    }

    #[test]
    fn rejects_unknown_keys() {
        assert!(toml::from_str::<Manifest>("size = 16").is_err());
    }
}
