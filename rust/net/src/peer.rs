//! One participant of a networked table.
//!
//! A peer couples a [`SessionManager`] with an [`ActionBroadcaster`]. The
//! host is the single sequencing authority: it validates every proposed
//! move, stamps it with the next sequence number and rebroadcasts it. Guests
//! propose unsequenced moves and apply only what the host sequenced.

use cardtable_ai::{get_action, AIOpponent};
use cardtable_engine::action::Action;
use cardtable_engine::errors::EngineError;
use cardtable_engine::player::PlayerId;
use cardtable_engine::reducer::Reducer;

use crate::broadcaster::ActionBroadcaster;
use crate::envelope::{MessageBody, NetworkMessage};
use crate::errors::{PeerError, SessionError};
use crate::session::{Ingest, SessionManager};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Assigns sequence numbers
    Host,
    Guest,
}

/// What handling one incoming message did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PeerEvent {
    /// Own echo, another game, or not for this role
    Ignored,
    /// Host accepted a proposal and broadcast it with this sequence number
    Sequenced(Action),
    /// A sequenced action was appended
    Applied(Action),
    Duplicate,
    /// Actions were missing; a sync request went out
    SyncRequested { last_known_action_index: Option<u64> },
    SyncAnswered { sent: usize },
    Synced { appended: usize },
    Acknowledged { seq_num: u64 },
    Reconnected(PlayerId),
}

pub struct Peer<R, B> {
    manager: SessionManager<R>,
    broadcaster: B,
    role: Role,
}

impl<R, B> Peer<R, B>
where
    R: Reducer,
    B: ActionBroadcaster,
{
    pub fn new(manager: SessionManager<R>, broadcaster: B, role: Role) -> Self {
        Self {
            manager,
            broadcaster,
            role,
        }
    }

    pub fn manager(&self) -> &SessionManager<R> {
        &self.manager
    }

    pub fn broadcaster(&self) -> &B {
        &self.broadcaster
    }

    pub fn role(&self) -> Role {
        self.role
    }

    fn envelope(&self, body: MessageBody) -> NetworkMessage {
        NetworkMessage::new(
            self.manager.session().game_id.clone(),
            self.manager.local_player().clone(),
            body,
        )
    }

    async fn publish(&self, body: MessageBody) -> Result<(), PeerError> {
        let message = self.envelope(body);
        self.broadcaster.send(message).await?;
        Ok(())
    }

    /// Plays a local move.
    ///
    /// The host sequences and broadcasts it. A guest checks it against its
    /// own copy of the state and sends it unsequenced for the host to
    /// order; it enters the guest's log when the host's copy comes back.
    pub async fn play(&mut self, action: Action) -> Result<Action, PeerError> {
        match self.role {
            Role::Host => {
                let stamped = self.manager.submit(action)?;
                self.publish(MessageBody::Action(stamped.clone())).await?;
                Ok(stamped)
            }
            Role::Guest => {
                if !self.manager.validate_incoming_action(&action)? {
                    tracing::warn!(
                        game_id = %self.manager.session().game_id,
                        player_id = %action.player_id,
                        action_kind = %action.kind,
                        "refusing to propose illegal action"
                    );
                    return Err(EngineError::InvalidAction {
                        kind: action.kind.name().to_string(),
                        player_id: action.player_id.clone(),
                    }
                    .into());
                }
                self.publish(MessageBody::Action(action.clone())).await?;
                Ok(action)
            }
        }
    }

    /// Lets `ai` move for the local player when it is their turn.
    ///
    /// Returns `None` when it is someone else's turn.
    pub async fn play_automated<A>(&mut self, ai: &A) -> Result<Option<Action>, PeerError>
    where
        A: AIOpponent<R> + ?Sized,
    {
        let local = self.manager.local_player().clone();
        let state = self.manager.current_state()?;
        if self.manager.reducer().is_game_over(&state) || state.current_turn != local {
            return Ok(None);
        }
        let view = self.manager.reducer().player_view(&state, &local);
        let action = get_action(ai, self.manager.reducer(), &view, &local)?;
        self.play(action).await.map(Some)
    }

    /// Announces this peer after a (re)connect and asks for what it missed.
    pub async fn announce(&mut self) -> Result<(), PeerError> {
        let player_id = self.manager.local_player().clone();
        self.publish(MessageBody::Reconnect { player_id }).await?;
        self.request_sync().await
    }

    pub async fn request_sync(&self) -> Result<(), PeerError> {
        let last_known_action_index = self.manager.last_known_action_index();
        self.publish(MessageBody::SyncRequest {
            last_known_action_index,
        })
        .await
    }

    /// Reacts to one incoming message.
    pub async fn handle_message(&mut self, message: NetworkMessage) -> Result<PeerEvent, PeerError> {
        if message.game_id != self.manager.session().game_id
            || message.from_player_id == *self.manager.local_player()
        {
            return Ok(PeerEvent::Ignored);
        }
        tracing::trace!(
            game_id = %message.game_id,
            from_player_id = %message.from_player_id,
            kind = message.body.kind(),
            "handling message"
        );

        match message.body {
            MessageBody::Action(action) => self.handle_action(action).await,
            MessageBody::SyncRequest {
                last_known_action_index,
            } => {
                let actions = self.manager.sync_since(last_known_action_index).to_vec();
                let sent = actions.len();
                self.publish(MessageBody::SyncResponse { actions }).await?;
                Ok(PeerEvent::SyncAnswered { sent })
            }
            MessageBody::SyncResponse { actions } => {
                let appended = self.manager.merge_sync(&actions)?;
                Ok(PeerEvent::Synced { appended })
            }
            MessageBody::Ack { seq_num } => Ok(PeerEvent::Acknowledged { seq_num }),
            MessageBody::Reconnect { player_id } => {
                self.manager.mark_connected(&player_id, true);
                tracing::info!(
                    game_id = %message.game_id,
                    player_id = %player_id,
                    "player reconnected"
                );
                Ok(PeerEvent::Reconnected(player_id))
            }
        }
    }

    async fn handle_action(&mut self, action: Action) -> Result<PeerEvent, PeerError> {
        if action.seq_num.is_none() {
            if self.role == Role::Guest {
                return Ok(PeerEvent::Ignored);
            }
            let stamped = self.manager.submit(action)?;
            self.publish(MessageBody::Action(stamped.clone())).await?;
            return Ok(PeerEvent::Sequenced(stamped));
        }

        match self.manager.ingest_remote(action.clone()) {
            Ok(Ingest::Applied) => {
                if let Some(seq_num) = action.seq_num {
                    self.publish(MessageBody::Ack { seq_num }).await?;
                }
                Ok(PeerEvent::Applied(action))
            }
            Ok(Ingest::Duplicate) => Ok(PeerEvent::Duplicate),
            Err(SessionError::Gap { expected, received }) => {
                tracing::debug!(
                    game_id = %self.manager.session().game_id,
                    expected,
                    received,
                    "sequence gap, requesting sync"
                );
                self.request_sync().await?;
                Ok(PeerEvent::SyncRequested {
                    last_known_action_index: self.manager.last_known_action_index(),
                })
            }
            Err(err) => Err(err.into()),
        }
    }
}
