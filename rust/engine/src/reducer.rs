//! The state-machine contract every rule-set implements.
//!
//! A rule-set supplies the game-specific pieces through [`Reducer`]; the
//! validated transition ([`ReducerExt::reduce`]) and replay
//! ([`ReducerExt::rebuild`]) are provided once for all rule-sets by a blanket
//! implementation and cannot be overridden.

use std::fmt::Debug;

use crate::action::{contains_move, Action};
use crate::errors::EngineError;
use crate::game::{GameState, GameType};
use crate::player::{Player, PlayerId};
use crate::rng::Seed;

/// Game rules as a set of pure functions over [`GameState`].
pub trait Reducer {
    /// Rule-set specific part of the state.
    type Payload: Clone + Debug + PartialEq;

    fn game_type(&self) -> GameType;

    /// Deals and seats a new game.
    ///
    /// # Errors
    ///
    /// [`EngineError::Setup`] when `players` does not fit the rule-set.
    fn initial_state(
        &self,
        seed: Seed,
        players: &[Player],
    ) -> Result<GameState<Self::Payload>, EngineError>;

    /// Legal moves for `player_id`, in a deterministic order.
    ///
    /// Empty when it is not that player's turn or nothing is left to do.
    fn valid_actions(&self, state: &GameState<Self::Payload>, player_id: &PlayerId) -> Vec<Action>;

    /// Applies an action assumed to be legal, producing a new state.
    ///
    /// History and terminal flags are left to the caller.
    ///
    /// # Errors
    ///
    /// [`EngineError::Malformed`] when the action cannot be applied at all,
    /// e.g. it names an unknown player or a card not in hand.
    fn apply_action(
        &self,
        state: &GameState<Self::Payload>,
        action: &Action,
    ) -> Result<GameState<Self::Payload>, EngineError>;

    fn is_game_over(&self, state: &GameState<Self::Payload>) -> bool;

    /// Winner, only once the game is over.
    fn winner(&self, state: &GameState<Self::Payload>) -> Option<PlayerId>;

    /// Copy of `state` as `viewer` may see it, hidden information concealed.
    fn player_view(
        &self,
        state: &GameState<Self::Payload>,
        viewer: &PlayerId,
    ) -> GameState<Self::Payload>;
}

/// Orchestration shared by every rule-set.
pub trait ReducerExt: Reducer {
    /// Validates `action` against the legal set, then applies it.
    ///
    /// # Errors
    ///
    /// [`EngineError::InvalidAction`] when the action is not one of
    /// `valid_actions(state, action.player_id)`. `state` is never modified.
    fn reduce(
        &self,
        state: &GameState<Self::Payload>,
        action: &Action,
    ) -> Result<GameState<Self::Payload>, EngineError> {
        let legal = self.valid_actions(state, &action.player_id);
        if !contains_move(&legal, action) {
            tracing::warn!(
                game_id = %state.game_id,
                player_id = %action.player_id,
                action_kind = %action.kind,
                "rejected illegal action"
            );
            return Err(EngineError::InvalidAction {
                kind: action.kind.name().to_string(),
                player_id: action.player_id.clone(),
            });
        }

        let mut next = self.apply_action(state, action)?;
        next.action_history = state.action_history.clone();
        next.action_history.push(action.clone());
        next.is_game_over = self.is_game_over(&next);
        next.winner = self.winner(&next);

        tracing::debug!(
            game_id = %next.game_id,
            player_id = %action.player_id,
            action_kind = %action.kind,
            history_len = next.action_history.len(),
            "applied action"
        );
        Ok(next)
    }

    /// Reconstructs state from a trusted log without re-validating it.
    ///
    /// # Errors
    ///
    /// Setup errors from `initial_state`, and
    /// [`EngineError::CorruptHistory`] naming the first entry that cannot be
    /// applied.
    fn rebuild(
        &self,
        seed: Seed,
        players: &[Player],
        actions: &[Action],
    ) -> Result<GameState<Self::Payload>, EngineError> {
        let mut state = self.initial_state(seed, players)?;
        for (index, action) in actions.iter().enumerate() {
            state = self
                .apply_action(&state, action)
                .map_err(|e| EngineError::CorruptHistory {
                    index,
                    reason: e.to_string(),
                })?;
        }
        state.action_history = actions.to_vec();
        state.is_game_over = self.is_game_over(&state);
        state.winner = self.winner(&state);

        tracing::debug!(
            game_id = %state.game_id,
            seed,
            actions = actions.len(),
            "rebuilt state from history"
        );
        Ok(state)
    }
}

impl<R: Reducer + ?Sized> ReducerExt for R {}
