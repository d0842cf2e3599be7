//! `tac` binary entrypoint.

use std::io;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use tac_cli::cli::{Cli, Commands};
use tac_cli::commands::{CheckConfigCommand, InitConfigCommand, ReplayCommand};
use tac_cli::output::OutputFormat;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let format = OutputFormat::new(cli.format);
    let mut stdout = io::stdout().lock();

    match cli.command {
        Commands::InitConfig { output, force } => {
            InitConfigCommand::new(output, force).execute(&mut stdout)?;
        }
        Commands::CheckConfig { path } => {
            CheckConfigCommand::new(&path)
                .execute(&mut stdout, &format)
                .with_context(|| format!("checking {}", path.display()))?;
        }
        Commands::Replay(args) => {
            let script = args.script.clone();
            ReplayCommand::new(args.script, args.config)
                .execute(&mut stdout, &format)
                .with_context(|| format!("replaying {}", script.display()))?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tac_cli::cli::Format;

    #[test]
    fn cli_parses_init_config() {
        let cli = Cli::parse_from(["tac", "init-config", "-o", "tac.toml"]);
        match cli.command {
            Commands::InitConfig { output, force } => {
                assert_eq!(output, Some(PathBuf::from("tac.toml")));
                assert!(!force);
            }
            _ => panic!("expected init-config"),
        }
    }

    #[test]
    fn cli_parses_replay_with_config() {
        let cli = Cli::parse_from(["tac", "replay", "game.json", "-c", "tac.toml", "--format", "json"]);
        assert_eq!(cli.format, Format::Json);
        match cli.command {
            Commands::Replay(args) => {
                assert_eq!(args.script, PathBuf::from("game.json"));
                assert_eq!(args.config, Some(PathBuf::from("tac.toml")));
            }
            _ => panic!("expected replay"),
        }
    }

    #[test]
    fn format_defaults_to_table() {
        let cli = Cli::parse_from(["tac", "check-config", "tac.toml"]);
        assert_eq!(cli.format, Format::Table);
    }

    #[test]
    fn run_fails_on_missing_script() {
        let cli = Cli::parse_from(["tac", "replay", "/nonexistent/game.json"]);
        assert!(run(cli).is_err());
    }
}
