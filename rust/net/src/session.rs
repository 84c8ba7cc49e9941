use cardtable_engine::action::{contains_move, Action};
use cardtable_engine::game::{GameId, GameState};
use cardtable_engine::history::ActionLog;
use cardtable_engine::player::{Player, PlayerId};
use cardtable_engine::reducer::{Reducer, ReducerExt};
use cardtable_engine::rng::Seed;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::errors::SessionError;

/// Everything a peer must hold to reconstruct a game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub game_id: GameId,
    /// Player on whose behalf this peer acts
    pub player_id: PlayerId,
    pub seed: Seed,
    pub players: Vec<Player>,
    pub action_history: ActionLog,
    /// Milliseconds since the Unix epoch
    pub created_at: i64,
}

impl Session {
    /// New session with a fresh game id, created now.
    pub fn new(player_id: PlayerId, seed: Seed, players: Vec<Player>) -> Self {
        Self::for_game(
            GameId::new(Uuid::new_v4().to_string()),
            player_id,
            seed,
            players,
            Utc::now().timestamp_millis(),
        )
    }

    /// Session joining an existing game.
    pub fn for_game(
        game_id: GameId,
        player_id: PlayerId,
        seed: Seed,
        players: Vec<Player>,
        created_at: i64,
    ) -> Self {
        Self {
            game_id,
            player_id,
            seed,
            players,
            action_history: ActionLog::new(),
            created_at,
        }
    }
}

/// Result of feeding a sequenced remote action to a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ingest {
    Applied,
    /// Already in the log; nothing changed
    Duplicate,
}

/// Owns one session and recomputes its state from the log on demand.
///
/// State is never cached: every query rebuilds from
/// (seed, players, history), so two managers holding the same log always
/// agree.
#[derive(Debug, Clone)]
pub struct SessionManager<R> {
    session: Session,
    reducer: R,
    presence: BTreeMap<PlayerId, bool>,
}

impl<R: Reducer> SessionManager<R> {
    pub fn new(session: Session, reducer: R) -> Self {
        let presence = session
            .players
            .iter()
            .map(|p| (p.id().clone(), p.is_connected()))
            .collect();
        Self {
            session,
            reducer,
            presence,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn reducer(&self) -> &R {
        &self.reducer
    }

    pub fn local_player(&self) -> &PlayerId {
        &self.session.player_id
    }

    pub fn log(&self) -> &ActionLog {
        &self.session.action_history
    }

    /// Current state, rebuilt from the log and stamped with this session's
    /// identity.
    pub fn current_state(&self) -> Result<GameState<R::Payload>, SessionError> {
        self.rebuild_with(&self.session.action_history)
    }

    fn rebuild_with(&self, log: &ActionLog) -> Result<GameState<R::Payload>, SessionError> {
        let state = self
            .reducer
            .rebuild(self.session.seed, &self.session.players, log.as_slice())?;
        Ok(state.with_identity(self.session.game_id.clone(), self.session.created_at))
    }

    /// Current state as `viewer` may see it.
    pub fn view_for(&self, viewer: &PlayerId) -> Result<GameState<R::Payload>, SessionError> {
        let state = self.current_state()?;
        Ok(self.reducer.player_view(&state, viewer))
    }

    /// Whether `action` is one of its player's legal moves right now.
    pub fn validate_incoming_action(&self, action: &Action) -> Result<bool, SessionError> {
        let state = self.current_state()?;
        let legal = self.reducer.valid_actions(&state, &action.player_id);
        Ok(contains_move(&legal, action))
    }

    /// Appends `new_actions` and rebuilds from the full log.
    ///
    /// The stored log only changes when the rebuild succeeds.
    pub fn handle_reconnection(
        &mut self,
        new_actions: &[Action],
    ) -> Result<GameState<R::Payload>, SessionError> {
        let merged = self.session.action_history.appended(new_actions);
        let state = self.rebuild_with(&merged)?;
        self.session.action_history = merged;

        tracing::info!(
            game_id = %self.session.game_id,
            appended = new_actions.len(),
            history_len = self.session.action_history.len(),
            "merged actions after reconnection"
        );
        Ok(state)
    }

    /// Appends an action this peer already accepted, unchanged.
    pub fn add_action(&mut self, action: Action) {
        self.session.action_history.push(action);
    }

    /// Host path: validates `action`, stamps it with the next sequence
    /// number and appends it.
    ///
    /// Returns the stamped action, ready to broadcast.
    ///
    /// # Errors
    ///
    /// [`SessionError::WrongGame`] for another game's action, and
    /// `InvalidAction` (wrapped) when the move is not legal.
    pub fn submit(&mut self, action: Action) -> Result<Action, SessionError> {
        self.check_game(&action)?;
        let state = self.current_state()?;
        self.reducer.reduce(&state, &action)?;

        let seq_num = self.session.action_history.len() as u64;
        let stamped = action.with_seq_num(seq_num);
        self.session.action_history.push(stamped.clone());

        tracing::debug!(
            game_id = %self.session.game_id,
            player_id = %stamped.player_id,
            action_kind = %stamped.kind,
            seq_num,
            "sequenced action"
        );
        Ok(stamped)
    }

    /// Peer path: applies an action the host already sequenced.
    ///
    /// # Errors
    ///
    /// - [`SessionError::Unsequenced`] without a sequence number
    /// - [`SessionError::Conflict`] when a different move holds that slot
    /// - [`SessionError::Gap`] when earlier actions are missing; the caller
    ///   should request a sync
    pub fn ingest_remote(&mut self, action: Action) -> Result<Ingest, SessionError> {
        self.check_game(&action)?;
        let seq_num = action.seq_num.ok_or(SessionError::Unsequenced)?;
        let expected = self.session.action_history.len() as u64;

        if seq_num < expected {
            let known = self.session.action_history.get(seq_num as usize);
            return match known {
                Some(existing) if existing.same_move(&action) => Ok(Ingest::Duplicate),
                _ => {
                    tracing::warn!(
                        game_id = %self.session.game_id,
                        seq_num,
                        "remote action conflicts with log"
                    );
                    Err(SessionError::Conflict { seq_num })
                }
            };
        }
        if seq_num > expected {
            return Err(SessionError::Gap {
                expected,
                received: seq_num,
            });
        }

        let state = self.current_state()?;
        self.reducer.reduce(&state, &action)?;
        self.session.action_history.push(action);
        Ok(Ingest::Applied)
    }

    /// Merges a sync response: known entries are checked and skipped, the
    /// rest is appended through [`handle_reconnection`](Self::handle_reconnection).
    ///
    /// Returns the number of actions appended.
    pub fn merge_sync(&mut self, actions: &[Action]) -> Result<usize, SessionError> {
        let known = self.session.action_history.len();
        let mut fresh: Vec<Action> = Vec::new();

        for action in actions {
            self.check_game(action)?;
            let Some(seq_num) = action.seq_num else {
                fresh.push(action.clone());
                continue;
            };
            let next = (known + fresh.len()) as u64;
            if seq_num < known as u64 {
                match self.session.action_history.get(seq_num as usize) {
                    Some(existing) if existing.same_move(action) => continue,
                    _ => return Err(SessionError::Conflict { seq_num }),
                }
            } else if seq_num < next {
                if !fresh[(seq_num - known as u64) as usize].same_move(action) {
                    return Err(SessionError::Conflict { seq_num });
                }
            } else if seq_num == next {
                fresh.push(action.clone());
            } else {
                return Err(SessionError::Gap {
                    expected: next,
                    received: seq_num,
                });
            }
        }

        if !fresh.is_empty() {
            self.handle_reconnection(&fresh)?;
        }
        Ok(fresh.len())
    }

    /// Actions after `last_known_action_index`; the whole log for `None`.
    /// An index past the end of the log yields nothing.
    pub fn sync_since(&self, last_known_action_index: Option<u64>) -> &[Action] {
        let start = last_known_action_index.map_or(0, |i| {
            i.checked_add(1)
                .and_then(|n| usize::try_from(n).ok())
                .unwrap_or(usize::MAX)
        });
        self.session.action_history.since(start)
    }

    /// Index of the last action this peer holds.
    pub fn last_known_action_index(&self) -> Option<u64> {
        (self.session.action_history.len() as u64).checked_sub(1)
    }

    /// Records whether `player` is reachable. Presence is not game state and
    /// never enters a rebuilt state.
    pub fn mark_connected(&mut self, player: &PlayerId, connected: bool) -> bool {
        match self.presence.get_mut(player) {
            Some(slot) => {
                *slot = connected;
                true
            }
            None => false,
        }
    }

    pub fn is_connected(&self, player: &PlayerId) -> bool {
        self.presence.get(player).copied().unwrap_or(false)
    }

    fn check_game(&self, action: &Action) -> Result<(), SessionError> {
        if action.game_id != self.session.game_id {
            return Err(SessionError::WrongGame {
                expected: self.session.game_id.clone(),
                actual: action.game_id.clone(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cardtable_engine::errors::EngineError;
    use cardtable_engine::spades::SpadesReducer;

    fn players() -> Vec<Player> {
        (1..=4)
            .map(|i| Player::remote(format!("p{}", i), format!("Player {}", i)))
            .collect()
    }

    fn manager(local: &str) -> SessionManager<SpadesReducer> {
        let session = Session::for_game(
            GameId::new("table-1"),
            PlayerId::new(local),
            42,
            players(),
            1_700_000_000_000,
        );
        SessionManager::new(session, SpadesReducer::new())
    }

    fn bid(p: &str, b: u8) -> Action {
        Action::bid(PlayerId::new(p), GameId::new("table-1"), b)
    }

    #[test]
    fn new_session_gets_unique_id() {
        let a = Session::new("p1".into(), 1, players());
        let b = Session::new("p1".into(), 1, players());
        assert_ne!(a.game_id, b.game_id);
        assert!(a.action_history.is_empty());
    }

    #[test]
    fn current_state_carries_session_identity() {
        let m = manager("p1");
        let state = m.current_state().unwrap();
        assert_eq!(state.game_id.as_str(), "table-1");
        assert_eq!(state.created_at, 1_700_000_000_000);
        assert!(state.action_history.is_empty());
    }

    #[test]
    fn validate_incoming_action_checks_turn() {
        let m = manager("p1");
        assert!(m.validate_incoming_action(&bid("p1", 4)).unwrap());
        assert!(!m.validate_incoming_action(&bid("p2", 4)).unwrap());
    }

    #[test]
    fn submit_stamps_sequence_numbers() {
        let mut m = manager("p1");
        let a = m.submit(bid("p1", 2)).unwrap();
        let b = m.submit(bid("p2", 3)).unwrap();
        assert_eq!(a.seq_num, Some(0));
        assert_eq!(b.seq_num, Some(1));
        assert_eq!(m.log().len(), 2);
        assert_eq!(m.last_known_action_index(), Some(1));
    }

    #[test]
    fn submit_rejects_illegal_and_foreign_actions() {
        let mut m = manager("p1");
        let err = m.submit(bid("p3", 2)).unwrap_err();
        assert!(matches!(
            err,
            SessionError::Engine(EngineError::InvalidAction { .. })
        ));
        let foreign = Action::bid("p1".into(), GameId::new("other"), 1);
        assert!(matches!(
            m.submit(foreign),
            Err(SessionError::WrongGame { .. })
        ));
        assert!(m.log().is_empty());
    }

    #[test]
    fn ingest_classifies_duplicates_conflicts_and_gaps() {
        let mut host = manager("p1");
        let first = host.submit(bid("p1", 2)).unwrap();
        let second = host.submit(bid("p2", 5)).unwrap();

        let mut guest = manager("p3");
        assert_eq!(guest.ingest_remote(first.clone()).unwrap(), Ingest::Applied);
        assert_eq!(guest.ingest_remote(first).unwrap(), Ingest::Duplicate);
        assert_eq!(
            guest.ingest_remote(bid("p1", 9).with_seq_num(0)),
            Err(SessionError::Conflict { seq_num: 0 })
        );
        assert_eq!(
            guest.ingest_remote(bid("p3", 1).with_seq_num(2)),
            Err(SessionError::Gap {
                expected: 1,
                received: 2
            })
        );
        assert_eq!(guest.ingest_remote(bid("p2", 5)), Err(SessionError::Unsequenced));
        assert_eq!(guest.ingest_remote(second).unwrap(), Ingest::Applied);
        assert_eq!(guest.current_state().unwrap(), host.current_state().unwrap());
    }

    #[test]
    fn reconnection_converges_and_is_atomic() {
        let mut host = manager("p1");
        for (p, b) in [("p1", 1), ("p2", 2), ("p3", 3)] {
            host.submit(bid(p, b)).unwrap();
        }

        let mut late = manager("p4");
        let state = late.handle_reconnection(host.sync_since(None)).unwrap();
        assert_eq!(state, host.current_state().unwrap());

        let before = late.log().clone();
        let bogus = [bid("p1", 7)];
        assert!(matches!(
            late.handle_reconnection(&bogus),
            Err(SessionError::Engine(EngineError::CorruptHistory { index: 3, .. }))
        ));
        assert_eq!(late.log(), &before);
    }

    #[test]
    fn merge_sync_skips_known_prefix() {
        let mut host = manager("p1");
        for (p, b) in [("p1", 1), ("p2", 2), ("p3", 3)] {
            host.submit(bid(p, b)).unwrap();
        }
        let mut guest = manager("p2");
        guest.ingest_remote(host.log().as_slice()[0].clone()).unwrap();

        let appended = guest.merge_sync(host.sync_since(None)).unwrap();
        assert_eq!(appended, 2);
        assert_eq!(guest.log(), host.log());
        assert_eq!(guest.merge_sync(host.sync_since(None)).unwrap(), 0);
    }

    #[test]
    fn sync_since_returns_suffix() {
        let mut host = manager("p1");
        host.submit(bid("p1", 1)).unwrap();
        host.submit(bid("p2", 1)).unwrap();
        assert_eq!(host.sync_since(None).len(), 2);
        assert_eq!(host.sync_since(Some(0)).len(), 1);
        assert!(host.sync_since(Some(1)).is_empty());
        assert!(host.sync_since(Some(10)).is_empty());
    }

    #[test]
    fn sync_since_max_index_is_empty() {
        let mut host = manager("p1");
        host.submit(bid("p1", 1)).unwrap();
        assert!(host.sync_since(Some(u64::MAX)).is_empty());
        assert!(host.sync_since(Some(u64::MAX - 1)).is_empty());
    }

    #[test]
    fn view_for_conceals_other_hands() {
        let m = manager("p2");
        let view = m.view_for(&"p2".into()).unwrap();
        let state = m.current_state().unwrap();
        assert_eq!(view.payload.hands[1], state.payload.hands[1]);
        assert_ne!(view.payload.hands[0], state.payload.hands[0]);
    }

    #[test]
    fn presence_is_tracked_outside_state() {
        let mut m = manager("p1");
        let p3 = PlayerId::new("p3");
        assert!(m.is_connected(&p3));
        assert!(m.mark_connected(&p3, false));
        assert!(!m.is_connected(&p3));
        assert!(!m.mark_connected(&"ghost".into(), true));
        assert_eq!(m.current_state().unwrap().players, players());
    }
}
