//! Replay command: rebuild every recorded game from its seed and action log
//! and print it bid by bid and trick by trick.

use crate::error::CliError;
use crate::io_utils::{jsonl_lines, read_text};
use crate::{parse_json_or_continue, ui};
use cardtable_engine::logger::GameRecord;
use cardtable_engine::rules::{trick_counts, TRICKS_PER_GAME};
use cardtable_engine::spades::{SpadesGame, SpadesReducer};
use std::io::Write;

/// Handle the replay command.
///
/// Records that fail to parse or rebuild are reported on `err` and skipped;
/// the command then fails once every other record has been shown.
pub fn handle_replay_command(
    input: String,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<(), CliError> {
    let content = read_text(&input).map_err(|e| {
        let _ = ui::write_error(err, &format!("Failed to read {}: {}", input, e));
        e
    })?;

    let rules = SpadesReducer::new();
    let mut total = 0usize;
    let mut shown = 0usize;
    for (line_no, line) in jsonl_lines(&content) {
        total += 1;
        let record: GameRecord = parse_json_or_continue!(line, err, format!("line {}", line_no));
        let state = match record.rebuild(&rules) {
            Ok(s) => s,
            Err(e) => {
                ui::write_error(
                    err,
                    &format!("Game {} cannot be replayed: {}", record.record_id, e),
                )?;
                continue;
            }
        };
        print_game(&record, &state, out)?;
        shown += 1;
    }

    if total == 0 {
        writeln!(out, "No games found in file.")?;
        return Ok(());
    }
    writeln!(out, "Replayed: {} of {} games", shown, total)?;
    if shown < total {
        return Err(CliError::InvalidInput(format!(
            "{} of {} games could not be replayed",
            total - shown,
            total
        )));
    }
    Ok(())
}

fn print_game(record: &GameRecord, state: &SpadesGame, out: &mut dyn Write) -> Result<(), CliError> {
    writeln!(
        out,
        "Game {} ({}, seed {})",
        record.record_id, state.game_id, state.seed
    )?;

    let bids: Vec<String> = state
        .players
        .iter()
        .filter_map(|p| state.payload.bids.get(p.id()).map(|b| format!("{}={}", p.id(), b)))
        .collect();
    writeln!(out, "Bids: {}", bids.join(" "))?;

    for (n, trick) in state.payload.tricks.iter().enumerate() {
        let plays: Vec<String> = trick
            .plays
            .iter()
            .map(|p| format!("{} {}", p.player_id, p.card.short()))
            .collect();
        writeln!(out, "Trick {}: {} -> {}", n + 1, plays.join(", "), trick.winner)?;
    }

    let counts: Vec<String> = trick_counts(&state.players, &state.payload.tricks)
        .into_iter()
        .map(|(id, won)| format!("{}={}", id, won))
        .collect();
    writeln!(out, "Tricks: {}", counts.join(" "))?;

    match &state.winner {
        Some(w) => writeln!(out, "Winner: {}", w)?,
        None => writeln!(
            out,
            "Incomplete: {} of {} tricks played",
            state.payload.tricks.len(),
            TRICKS_PER_GAME
        )?,
    }
    Ok(())
}
