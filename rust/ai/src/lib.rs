//! # cardtable-ai: Automated Players
//!
//! Automated players choose among the legal moves a rule-set offers them.
//! They never see more than a filtered view, and they never build an action
//! themselves: [`AIOpponent::select`] returns a reference into the legal
//! slice, and [`get_action`] is the only way to turn that choice into an
//! [`Action`].
//!
//! ## Core Components
//!
//! - [`AIOpponent`] - Selection interface implemented by every player type
//! - [`baseline`] - Heuristic spades player
//! - [`random`] - Seeded uniform player, usable with any rule-set
//! - [`create_ai`] - Factory by name
//! - [`take_turn`] / [`play_out`] - Drive one move or a whole game
//!
//! ## Quick Start
//!
//! ```rust
//! use cardtable_ai::{create_ai, play_out};
//! use cardtable_engine::player::Player;
//! use cardtable_engine::reducer::Reducer;
//! use cardtable_engine::spades::SpadesReducer;
//!
//! let players: Vec<Player> = (1..=4)
//!     .map(|i| Player::ai(format!("p{i}"), format!("Bot {i}")))
//!     .collect();
//! let rules = SpadesReducer::new();
//! let seats: Vec<_> = (0..4).map(|i| create_ai("spades", i).unwrap()).collect();
//!
//! let start = rules.initial_state(42, &players).unwrap();
//! let done = play_out(&rules, start, &seats).unwrap();
//! assert!(done.is_game_over);
//! assert!(done.winner.is_some());
//! ```

use thiserror::Error;

use cardtable_engine::action::Action;
use cardtable_engine::errors::EngineError;
use cardtable_engine::game::GameState;
use cardtable_engine::player::PlayerId;
use cardtable_engine::reducer::{Reducer, ReducerExt};
use cardtable_engine::rng::Seed;
use cardtable_engine::spades::SpadesReducer;

pub mod baseline;
pub mod random;

/// Names accepted by [`create_ai`].
pub const AI_NAMES: [&str; 2] = ["spades", "random"];

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AiError {
    /// The player was asked to move but the rule-set offers nothing.
    #[error("no legal actions for player {0}")]
    NoLegalActions(PlayerId),
    #[error("{ai} made no choice among {offered} legal actions for player {player_id}")]
    NoSelection {
        ai: String,
        player_id: PlayerId,
        offered: usize,
    },
    #[error("no automated player seated for {0}")]
    MissingSeat(PlayerId),
    #[error("unknown AI type: {0}")]
    UnknownAi(String),
    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// Interface for automated players of rule-set `R`.
///
/// Implementors pick one element of `legal`, which is always the result of
/// `valid_actions(view, player_id)` for the filtered `view`.
///
/// # Example Implementation
///
/// ```rust
/// use cardtable_ai::AIOpponent;
/// use cardtable_engine::action::Action;
/// use cardtable_engine::game::GameState;
/// use cardtable_engine::player::PlayerId;
/// use cardtable_engine::spades::{SpadesReducer, SpadesState};
///
/// struct LastMove;
///
/// impl AIOpponent<SpadesReducer> for LastMove {
///     fn select<'a>(
///         &self,
///         _view: &GameState<SpadesState>,
///         _player_id: &PlayerId,
///         legal: &'a [Action],
///     ) -> Option<&'a Action> {
///         legal.last()
///     }
///
///     fn name(&self) -> &str {
///         "LastMove"
///     }
/// }
/// ```
pub trait AIOpponent<R: Reducer>: Send + Sync {
    /// Chooses one of `legal`; `None` means the player declined.
    fn select<'a>(
        &self,
        view: &GameState<R::Payload>,
        player_id: &PlayerId,
        legal: &'a [Action],
    ) -> Option<&'a Action>;

    fn name(&self) -> &str;
}

/// Asks `ai` for its move in `view`.
///
/// The legal set is queried from `reducer` here, so the returned action is
/// always an unmodified member of `valid_actions(view, player_id)`.
///
/// # Errors
///
/// - [`AiError::NoLegalActions`] when the player has nothing to do
/// - [`AiError::NoSelection`] when the player declines every option
pub fn get_action<R, A>(
    ai: &A,
    reducer: &R,
    view: &GameState<R::Payload>,
    player_id: &PlayerId,
) -> Result<Action, AiError>
where
    R: Reducer,
    A: AIOpponent<R> + ?Sized,
{
    let legal = reducer.valid_actions(view, player_id);
    if legal.is_empty() {
        return Err(AiError::NoLegalActions(player_id.clone()));
    }
    ai.select(view, player_id, &legal)
        .cloned()
        .ok_or_else(|| AiError::NoSelection {
            ai: ai.name().to_string(),
            player_id: player_id.clone(),
            offered: legal.len(),
        })
}

/// Plays one move for `player_id`: filter, select, then validated reduce.
pub fn take_turn<R, A>(
    reducer: &R,
    ai: &A,
    state: &GameState<R::Payload>,
    player_id: &PlayerId,
) -> Result<GameState<R::Payload>, AiError>
where
    R: Reducer,
    A: AIOpponent<R> + ?Sized,
{
    let view = reducer.player_view(state, player_id);
    let action = get_action(ai, reducer, &view, player_id)?;
    tracing::debug!(
        game_id = %state.game_id,
        player_id = %player_id,
        ai = ai.name(),
        action_kind = %action.kind,
        "automated player moved"
    );
    Ok(reducer.reduce(state, &action)?)
}

/// Drives `state` to its terminal state, `seats[i]` playing for seat `i`.
///
/// # Errors
///
/// [`AiError::MissingSeat`] when the player on turn has no entry in
/// `seats`; otherwise whatever [`take_turn`] reports.
pub fn play_out<R, A>(
    reducer: &R,
    mut state: GameState<R::Payload>,
    seats: &[A],
) -> Result<GameState<R::Payload>, AiError>
where
    R: Reducer,
    A: std::ops::Deref,
    A::Target: AIOpponent<R>,
{
    while !reducer.is_game_over(&state) {
        let turn = state.current_turn.clone();
        let ai = state
            .seat_of(&turn)
            .and_then(|seat| seats.get(seat))
            .ok_or_else(|| AiError::MissingSeat(turn.clone()))?;
        state = take_turn(reducer, &**ai, &state, &turn)?;
    }
    Ok(state)
}

/// Creates an automated spades player by name.
///
/// `seed` only matters for players that draw random numbers.
///
/// # Example
///
/// ```rust
/// use cardtable_ai::create_ai;
///
/// let ai = create_ai("spades", 0).unwrap();
/// assert_eq!(ai.name(), "SpadesAI");
/// assert!(create_ai("bridge", 0).is_err());
/// ```
pub fn create_ai(name: &str, seed: Seed) -> Result<Box<dyn AIOpponent<SpadesReducer>>, AiError> {
    match name {
        "spades" => Ok(Box::new(baseline::SpadesAI::new())),
        "random" => Ok(Box::new(random::RandomAI::new(seed))),
        other => Err(AiError::UnknownAi(other.to_string())),
    }
}
