//! Generator inspection command.
//!
//! Prints the first draws of the seeded generator every peer shares, so a
//! seed can be checked by hand against another implementation.

use crate::error::CliError;
use cardtable_engine::rng::{Seed, SeededRng};
use std::io::Write;

/// Handle the rng command: print `count` draws for `seed` (random if `None`).
pub fn handle_rng_command(
    seed: Option<Seed>,
    count: usize,
    out: &mut dyn Write,
) -> Result<(), CliError> {
    if count == 0 {
        return Err(CliError::InvalidInput("count must be >= 1".to_string()));
    }
    let s = seed.unwrap_or_else(rand::random);
    let mut rng = SeededRng::new(s);
    let vals: Vec<f64> = (0..count).map(|_| rng.next_f64()).collect();
    writeln!(out, "Seed: {}", s)?;
    writeln!(out, "RNG sample: {:?}", vals)?;
    Ok(())
}
