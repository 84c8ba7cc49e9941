//! Command handlers, one module per subcommand.
//!
//! Every handler takes its output streams as `&mut dyn Write` and reports
//! failures as [`CliError`](crate::error::CliError); `run` maps those to exit
//! codes.

pub mod cfg;
pub mod deal;
pub mod replay;
pub mod rng;
pub mod sim;
pub mod verify;

pub use cfg::handle_cfg_command;
pub use deal::handle_deal_command;
pub use replay::handle_replay_command;
pub use rng::handle_rng_command;
pub use sim::handle_sim_command;
pub use verify::handle_verify_command;
