//! Deal command: seat the configured players, deal a spades game and print
//! the hands, optionally as one player would see them.

use crate::config;
use crate::error::CliError;
use crate::ui;
use cardtable_engine::player::{Player, PlayerId};
use cardtable_engine::reducer::Reducer;
use cardtable_engine::rng::Seed;
use cardtable_engine::spades::SpadesReducer;
use std::io::Write;

/// Handle the deal command.
///
/// The seed comes from `--seed`, then the configuration, then a random draw.
/// With `viewer`, every hand but the viewer's prints as `??`; a viewer
/// without a seat sees no cards at all.
///
/// ```ignore
/// let mut out = Vec::new();
/// handle_deal_command(Some(42), None, &mut out, &mut std::io::sink()).unwrap();
/// ```
pub fn handle_deal_command(
    seed: Option<Seed>,
    viewer: Option<String>,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<(), CliError> {
    let cfg = config::load()?;
    let seed = seed.or(cfg.seed).unwrap_or_else(rand::random);
    let players: Vec<Player> = cfg
        .players
        .iter()
        .map(|p| Player::human(p.clone(), p.clone()))
        .collect();

    let rules = SpadesReducer::new();
    let state = rules.initial_state(seed, &players)?;
    let shown = match viewer {
        Some(v) => {
            let id = PlayerId::new(v);
            if state.seat_of(&id).is_none() {
                ui::display_warning(err, &format!("{} has no seat; showing spectator view", id))?;
            }
            rules.player_view(&state, &id)
        }
        None => state,
    };

    writeln!(out, "Seed: {}", seed)?;
    writeln!(out, "Game: {}", shown.game_id)?;
    for (player, hand) in shown.players.iter().zip(&shown.payload.hands) {
        writeln!(out, "{}: {}", player.id(), ui::format_hand(hand))?;
    }
    writeln!(out, "Turn: {}", shown.current_turn)?;
    Ok(())
}
