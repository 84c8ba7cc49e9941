//! # Cardtable CLI Library
//!
//! Command-line host for the deterministic card table: deal games, inspect
//! the shared generator, simulate automated games into JSONL records, and
//! replay or verify those records against the rules.
//!
//! ## Example Usage
//!
//! ```no_run
//! use std::io;
//! let args = vec!["cardtable", "sim", "--games", "10", "--output", "data/games.jsonl"];
//! let code = cardtable_cli::run(args, &mut io::stdout(), &mut io::stderr());
//! assert_eq!(code, 0);
//! ```
//!
//! ## Available Subcommands
//!
//! - `deal`: Deal a spades game, optionally as one player sees it
//! - `rng`: Print draws from the seeded generator
//! - `sim`: Play automated games and record them
//! - `replay`: Rebuild recorded games and print them trick by trick
//! - `verify`: Re-run recorded games through the rules
//! - `cfg`: Display the resolved configuration

use clap::Parser;
use std::io::Write;

mod macros;

pub mod cli;
mod commands;
pub mod config;
mod error;
pub mod exit_code;
pub mod io_utils;
pub mod ui;

use cli::{CardtableCli, Commands};
use commands::{
    handle_cfg_command, handle_deal_command, handle_replay_command, handle_rng_command,
    handle_sim_command, handle_verify_command,
};

pub use error::{BatchValidationError, CliError};

const COMMANDS: &[&str] = &["deal", "rng", "sim", "replay", "verify", "cfg"];

/// Main entry point for the CLI application.
///
/// Parses `args` (program name first) and dispatches to the subcommand.
///
/// # Returns
///
/// Exit code: `0` for success, `2` for errors
///
/// # Example
///
/// ```
/// use std::io;
/// let args = vec!["cardtable", "rng", "--seed", "42"];
/// let code = cardtable_cli::run(args, &mut io::stdout(), &mut io::stderr());
/// assert_eq!(code, 0);
/// ```
pub fn run<I, S>(args: I, out: &mut dyn Write, err: &mut dyn Write) -> i32
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let argv: Vec<String> = args.into_iter().map(|s| s.as_ref().to_string()).collect();

    let cli = match CardtableCli::try_parse_from(&argv) {
        Ok(cli) => cli,
        Err(e) => {
            use clap::error::ErrorKind;

            // Help and version should print to stdout and exit 0
            if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) {
                if write!(out, "{}", e).is_err() {
                    return exit_code::ERROR;
                }
                return exit_code::SUCCESS;
            }
            write_or_exit!(err, "{}", e);
            write_or_exit!(err, "Cardtable CLI");
            write_or_exit!(err, "Usage: cardtable <command> [options]\n");
            write_or_exit!(err, "Commands:");
            for c in COMMANDS {
                write_or_exit!(err, "  {}", c);
            }
            write_or_exit!(err, "\nFor full help, run: cardtable --help");
            return exit_code::ERROR;
        }
    };

    let command = cli.cmd.name();
    let result = match cli.cmd {
        Commands::Deal { seed, viewer } => handle_deal_command(seed, viewer, out, err),
        Commands::Rng { seed, count } => handle_rng_command(seed, count, out),
        Commands::Sim {
            games,
            seed,
            output,
            ai,
        } => handle_sim_command(games, seed, output, ai, out, err),
        Commands::Replay { input } => handle_replay_command(input, out, err),
        Commands::Verify { input } => {
            let Some(path) = input else {
                let _ = ui::write_error(err, "input required");
                return exit_code::ERROR;
            };
            handle_verify_command(path, out, err)
        }
        Commands::Cfg => handle_cfg_command(out, err),
    };

    match result {
        Ok(()) => exit_code::SUCCESS,
        Err(e) => {
            tracing::debug!(command, error = %e, "command failed");
            write_or_exit!(err, "Error: {}", e);
            exit_code::ERROR
        }
    }
}
