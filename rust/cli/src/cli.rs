//! Command-line argument definitions.

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "cardtable",
    version,
    about = "Deterministic card table: deal, simulate, replay and verify games"
)]
pub struct CardtableCli {
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Deal a spades game and print every hand
    Deal {
        #[arg(long)]
        seed: Option<u32>,
        /// Print the table as this player sees it
        #[arg(long)]
        viewer: Option<String>,
    },
    /// Print draws from the seeded generator
    Rng {
        #[arg(long)]
        seed: Option<u32>,
        #[arg(long, default_value_t = 5)]
        count: usize,
    },
    /// Play automated games and record them as JSONL
    Sim {
        #[arg(long)]
        games: Option<u32>,
        #[arg(long)]
        seed: Option<u32>,
        #[arg(long)]
        output: Option<String>,
        /// Automated player for every seat (spades, random)
        #[arg(long)]
        ai: Option<String>,
    },
    /// Rebuild recorded games and print them trick by trick
    Replay {
        #[arg(long)]
        input: String,
    },
    /// Re-run recorded games through the rules
    Verify {
        #[arg(long)]
        input: Option<String>,
    },
    /// Show the resolved configuration and where each value came from
    Cfg,
}

impl Commands {
    pub fn name(&self) -> &'static str {
        match self {
            Commands::Deal { .. } => "deal",
            Commands::Rng { .. } => "rng",
            Commands::Sim { .. } => "sim",
            Commands::Replay { .. } => "replay",
            Commands::Verify { .. } => "verify",
            Commands::Cfg => "cfg",
        }
    }
}
