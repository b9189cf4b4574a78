use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use sweepscript::{FsBoardLoader, Manifest, run_session_with};
use sweepscript_core::SessionConfig;

#[derive(Parser, Debug)]
#[command(version, about = "Replay scripted Minesweeper sessions", long_about = None)]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Replay one command file into one transcript
    Run {
        commands: PathBuf,
        output: PathBuf,
        /// Abort on TOUCH lines whose coordinates do not parse
        #[arg(long)]
        strict: bool,
        /// Resolve relative LOAD paths against this directory instead of the working directory
        #[arg(long)]
        board_dir: Option<PathBuf>,
    },
    /// Replay every pair listed in a TOML manifest
    Batch {
        manifest: PathBuf,
        /// Abort sessions on malformed commands, overriding the manifest
        #[arg(long)]
        strict: bool,
        /// Print the per-session report as JSON
        #[arg(long)]
        json: bool,
        /// Resolve relative LOAD paths against this directory, overriding the manifest
        #[arg(long)]
        board_dir: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    env_logger::Builder::new()
        .filter_level(args.verbose.log_level_filter())
        .init();

    match args.command {
        Command::Run {
            commands,
            output,
            strict,
            board_dir,
        } => {
            let config = if strict {
                SessionConfig::default().strict()
            } else {
                SessionConfig::default()
            };
            let mut loader = board_dir.map(FsBoardLoader::new).unwrap_or_default();
            let outcome = run_session_with(&commands, &output, config, &mut loader)
                .with_context(|| format!("Session {} failed", commands.display()))?;
            log::debug!("{outcome:?}");
        }
        Command::Batch {
            manifest,
            strict,
            json,
            board_dir,
        } => {
            let mut manifest = Manifest::load(&manifest)?;
            if board_dir.is_some() {
                manifest.board_dir = board_dir;
            }
            let mut config = manifest.session_config();
            if strict {
                config = config.strict();
            }

            let reports = manifest.run(config);
            if json {
                println!("{}", serde_json::to_string_pretty(&reports)?);
            } else {
                for report in &reports {
                    match (&report.outcome, &report.error) {
                        (Some(outcome), _) => println!(
                            "{} -> {}: {:?}, {} cells touched",
                            report.commands.display(),
                            report.output.display(),
                            outcome.ending,
                            outcome.revealed_total
                        ),
                        (None, error) => println!(
                            "{}: failed: {}",
                            report.commands.display(),
                            error.as_deref().unwrap_or("unknown error")
                        ),
                    }
                }
            }

            let failed = reports.iter().filter(|report| !report.is_ok()).count();
            if failed > 0 {
                bail!("{failed} of {} sessions failed", reports.len());
            }
        }
    }

    Ok(())
}
