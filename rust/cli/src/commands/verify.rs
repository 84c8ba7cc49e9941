//! Verify command handler module.
//!
//! Re-runs every recorded game through the rules and checks:
//!
//! - the players fit the rule-set
//! - every recorded action is legal when it is applied
//! - rebuilding from the log equals the step-by-step result
//! - the game reached its end
//! - the recorded winner and trick counts match the rebuilt state
//!
//! Errors are collected per record with [`BatchValidationError`].

use crate::error::{BatchValidationError, CliError};
use crate::io_utils::{jsonl_lines, read_text};
use crate::ui;
use cardtable_engine::logger::GameRecord;
use cardtable_engine::player::PlayerId;
use cardtable_engine::reducer::{Reducer, ReducerExt};
use cardtable_engine::rules::{trick_counts, TRICKS_PER_GAME};
use cardtable_engine::spades::SpadesReducer;
use std::collections::HashSet;
use std::io::Write;

/// The `usize` context is the record's line number.
type VerifyError = BatchValidationError<usize>;

/// Handle the verify command - validate recorded games.
///
/// # Returns
///
/// `Ok(())` when every record passes, otherwise an `Err` that maps to exit
/// code `2` after all problems have been listed on `err`.
pub fn handle_verify_command(
    input: String,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<(), CliError> {
    let content = read_text(&input).map_err(|e| {
        let _ = ui::write_error(err, &format!("Failed to read {}: {}", input, e));
        e
    })?;

    let rules = SpadesReducer::new();
    let mut errors: Vec<VerifyError> = Vec::new();
    let mut games = 0usize;
    for (line_no, line) in jsonl_lines(&content) {
        games += 1;
        let record: GameRecord = match serde_json::from_str(line) {
            Ok(r) => r,
            Err(_) => {
                errors.push(VerifyError {
                    item_context: line_no,
                    message: "Invalid JSON record".to_string(),
                });
                continue;
            }
        };
        errors.extend(
            verify_record(&rules, &record)
                .into_iter()
                .map(|message| VerifyError {
                    item_context: line_no,
                    message,
                }),
        );
    }

    if errors.is_empty() {
        writeln!(out, "Verify: OK (games={})", games)?;
        return Ok(());
    }

    writeln!(out, "Verify: FAIL (games={})", games)?;
    writeln!(err)?;
    writeln!(err, "Errors found:")?;
    for error in &errors {
        writeln!(err, "  Line {}", error)?;
    }
    let invalid: HashSet<usize> = errors.iter().map(|e| e.item_context).collect();
    writeln!(err)?;
    writeln!(err, "Invalid games: {} of {}", invalid.len(), games)?;
    Err(CliError::InvalidInput(format!(
        "{} of {} games failed verification",
        invalid.len(),
        games
    )))
}

/// Problems found in one record; empty when it checks out.
fn verify_record(rules: &SpadesReducer, record: &GameRecord) -> Vec<String> {
    let mut problems = Vec::new();
    if record.game_type != rules.game_type() {
        problems.push(format!("Unsupported game type {}", record.game_type));
        return problems;
    }

    let mut state = match rules.initial_state(record.seed, &record.players) {
        Ok(s) => s,
        Err(e) => {
            problems.push(format!("Cannot set up game: {}", e));
            return problems;
        }
    };
    for (index, action) in record.actions.iter().enumerate() {
        match rules.reduce(&state, action) {
            Ok(next) => state = next,
            Err(e) => {
                problems.push(format!("Action {} rejected: {}", index, e));
                return problems;
            }
        }
    }

    match rules.rebuild(record.seed, &record.players, &record.actions) {
        Ok(rebuilt) if rebuilt == state => {}
        Ok(_) => problems.push("Rebuilt state differs from step-by-step replay".to_string()),
        Err(e) => problems.push(format!("Rebuild failed: {}", e)),
    }

    if !state.is_game_over {
        problems.push(format!(
            "Game is incomplete: {} of {} tricks played",
            state.payload.tricks.len(),
            TRICKS_PER_GAME
        ));
    }
    if record.winner != state.winner {
        problems.push(format!(
            "Recorded winner {} but the rules give {}",
            show(&record.winner),
            show(&state.winner)
        ));
    }
    if !record.tricks_won.is_empty()
        && record.tricks_won != trick_counts(&state.players, &state.payload.tricks)
    {
        problems.push("Recorded trick counts do not match the rebuilt game".to_string());
    }
    problems
}

fn show(player: &Option<PlayerId>) -> String {
    player
        .as_ref()
        .map_or_else(|| "none".to_string(), |p| p.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cardtable_ai::{baseline::SpadesAI, play_out};
    use cardtable_engine::action::{Action, ActionKind};
    use cardtable_engine::player::Player;
    use std::io::Write as _;

    fn finished_record(seed: u32) -> GameRecord {
        let players: Vec<Player> = (1..=4)
            .map(|i| Player::ai(format!("p{i}"), format!("P{i}")))
            .collect();
        let rules = SpadesReducer::new();
        let ai = SpadesAI::new();
        let seats = vec![&ai, &ai, &ai, &ai];
        let done = play_out(&rules, rules.initial_state(seed, &players).unwrap(), &seats).unwrap();
        GameRecord::from_spades(format!("20250101-{:06}", seed), &done)
    }

    fn run_verify(records: &[GameRecord]) -> (Result<(), CliError>, String, String) {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        for r in records {
            writeln!(file, "{}", serde_json::to_string(r).unwrap()).unwrap();
        }
        let mut out = Vec::new();
        let mut err = Vec::new();
        let result = handle_verify_command(
            file.path().to_string_lossy().into_owned(),
            &mut out,
            &mut err,
        );
        (
            result,
            String::from_utf8(out).unwrap(),
            String::from_utf8(err).unwrap(),
        )
    }

    #[test]
    fn recorded_games_verify() {
        let (result, out, err) = run_verify(&[finished_record(1), finished_record(2)]);
        assert!(result.is_ok(), "{}", err);
        assert!(out.contains("Verify: OK (games=2)"));
    }

    #[test]
    fn wrong_winner_is_reported() {
        let mut record = finished_record(9);
        let actual = record.winner.clone().unwrap();
        let other = record
            .players
            .iter()
            .map(|p| p.id().clone())
            .find(|id| *id != actual)
            .unwrap();
        record.winner = Some(other);
        record.tricks_won.clear();

        let (result, out, err) = run_verify(&[finished_record(8), record]);
        assert!(result.is_err());
        assert!(out.contains("Verify: FAIL (games=2)"));
        assert!(err.contains("Line 2: Recorded winner"));
        assert!(err.contains("Invalid games: 1 of 2"));
    }

    #[test]
    fn illegal_action_is_reported_with_its_index() {
        let mut record = finished_record(11);
        // The first seat bids again where the second seat should.
        let first = record.actions[0].clone();
        record.actions[1] = Action::new(first.kind.clone(), first.player_id, first.game_id);

        let (result, _, err) = run_verify(&[record]);
        assert!(result.is_err());
        assert!(err.contains("Action 1 rejected"), "{}", err);
    }

    #[test]
    fn unfinished_game_is_reported() {
        let mut record = finished_record(12);
        record.actions.truncate(4);
        record.winner = None;
        record.tricks_won.clear();

        let (result, _, err) = run_verify(&[record]);
        assert!(result.is_err());
        assert!(err.contains("Game is incomplete: 0 of 13 tricks played"));
    }

    #[test]
    fn wrong_player_count_is_reported() {
        let mut record = finished_record(13);
        record.players.pop();
        let (result, _, err) = run_verify(&[record]);
        assert!(result.is_err());
        assert!(err.contains("Cannot set up game"));
    }

    #[test]
    fn invalid_json_is_reported() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "not json").unwrap();
        let mut err = Vec::new();
        let result = handle_verify_command(
            file.path().to_string_lossy().into_owned(),
            &mut Vec::new(),
            &mut err,
        );
        assert!(result.is_err());
        assert!(String::from_utf8(err).unwrap().contains("Line 1: Invalid JSON record"));
    }

    #[test]
    fn bid_out_of_range_is_rejected() {
        let mut record = finished_record(14);
        let first = record.actions[0].clone();
        record.actions[0] = Action::new(
            ActionKind::PlaceBid { bid: 14 },
            first.player_id,
            first.game_id,
        );
        let (result, _, err) = run_verify(&[record]);
        assert!(result.is_err());
        assert!(err.contains("Action 0 rejected"));
    }
}
