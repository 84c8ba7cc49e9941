//! Transport boundary for network messages.
//!
//! [`ActionBroadcaster`] is what a transport implements; [`LocalHub`] is an
//! in-process implementation used by tests and same-machine tables.

use cardtable_engine::game::GameId;
use std::collections::HashMap;
use std::fmt;
use std::future::{ready, Future};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, RwLock};
use tokio::sync::mpsc;

use crate::envelope::NetworkMessage;
use crate::errors::BroadcastError;

// Bounded per subscriber; a subscriber that falls this far behind is dropped.
const MESSAGE_CHANNEL_BUFFER: usize = 256;

pub type MessageSender = mpsc::Sender<NetworkMessage>;
pub type MessageReceiver = mpsc::Receiver<NetworkMessage>;

/// Sends and receives [`NetworkMessage`]s for one or more games.
///
/// Delivery is best effort: no ordering, acknowledgment or retry is
/// promised. Ordering comes from sequence numbers, recovery from sync
/// requests.
pub trait ActionBroadcaster: Send + Sync {
    fn send(
        &self,
        message: NetworkMessage,
    ) -> impl Future<Output = Result<(), BroadcastError>> + Send;

    /// Receives every message later sent for `game_id`.
    fn subscribe(&self, game_id: &GameId) -> Result<Subscription, BroadcastError>;

    /// Stops delivery; later sends fail with [`BroadcastError::Disconnected`].
    fn disconnect(&self) -> impl Future<Output = ()> + Send;
}

/// Incoming side of a subscription. Dropping it unsubscribes.
pub struct Subscription {
    receiver: MessageReceiver,
    release: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl Subscription {
    pub fn new(receiver: MessageReceiver, release: impl FnOnce() + Send + Sync + 'static) -> Self {
        Self {
            receiver,
            release: Some(Box::new(release)),
        }
    }

    /// Next message; `None` once the broadcaster dropped this subscriber.
    pub async fn recv(&mut self) -> Option<NetworkMessage> {
        self.receiver.recv().await
    }

    pub fn try_recv(&mut self) -> Option<NetworkMessage> {
        self.receiver.try_recv().ok()
    }

    /// Everything already queued, without waiting.
    pub fn drain(&mut self) -> Vec<NetworkMessage> {
        std::iter::from_fn(|| self.try_recv()).collect()
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").finish_non_exhaustive()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

/// In-memory broadcaster: every subscriber of a game receives every message
/// sent for it, the sender included.
///
/// Meant for tests and tables sharing one process. The hub keeps every
/// accepted message for [`LocalHub::sent`] and never trims that list, so
/// memory grows with the length of the session.
#[derive(Debug, Clone, Default)]
pub struct LocalHub {
    inner: Arc<HubInner>,
}

#[derive(Debug, Default)]
struct HubInner {
    subscribers: RwLock<HashMap<GameId, Vec<(usize, MessageSender)>>>,
    next_id: AtomicUsize,
    sent: Mutex<Vec<NetworkMessage>>,
    closed: AtomicBool,
}

impl LocalHub {
    pub fn new() -> Self {
        Self::default()
    }

    fn publish(&self, message: NetworkMessage) -> Result<(), BroadcastError> {
        if self.inner.closed.load(Ordering::Acquire) {
            return Err(BroadcastError::Disconnected);
        }
        tracing::debug!(
            game_id = %message.game_id,
            from_player_id = %message.from_player_id,
            kind = message.body.kind(),
            seq_num = ?message.seq_num,
            "broadcasting message"
        );

        self.inner
            .sent
            .lock()
            .map_err(|_| BroadcastError::StoragePoisoned)?
            .push(message.clone());

        let subscribers = {
            let guard = self
                .inner
                .subscribers
                .read()
                .map_err(|_| BroadcastError::StoragePoisoned)?;
            guard.get(&message.game_id).cloned()
        };
        let Some(list) = subscribers else {
            tracing::debug!(game_id = %message.game_id, "no subscribers for game");
            return Ok(());
        };

        tracing::trace!(
            game_id = %message.game_id,
            subscriber_count = list.len(),
            "sending message to subscribers"
        );
        let mut failed = Vec::new();
        for (id, sender) in list {
            if let Err(e) = sender.try_send(message.clone()) {
                tracing::warn!(
                    game_id = %message.game_id,
                    subscriber_id = id,
                    error = %e,
                    "dropping subscriber"
                );
                failed.push(id);
            }
        }
        if !failed.is_empty() {
            self.remove_subscribers(&message.game_id, &failed);
        }
        Ok(())
    }

    /// Every message accepted so far, in send order.
    pub fn sent(&self) -> Vec<NetworkMessage> {
        self.inner
            .sent
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner
            .subscribers
            .read()
            .map(|guard| guard.values().map(Vec::len).sum())
            .unwrap_or(0)
    }

    pub fn is_connected(&self) -> bool {
        !self.inner.closed.load(Ordering::Acquire)
    }

    fn remove_subscribers(&self, game_id: &GameId, ids: &[usize]) {
        let Ok(mut guard) = self.inner.subscribers.write() else {
            return;
        };
        if let Some(list) = guard.get_mut(game_id) {
            list.retain(|(id, _)| !ids.contains(id));
            if list.is_empty() {
                guard.remove(game_id);
            }
        }
    }
}

impl ActionBroadcaster for LocalHub {
    fn send(
        &self,
        message: NetworkMessage,
    ) -> impl Future<Output = Result<(), BroadcastError>> + Send {
        ready(self.publish(message))
    }

    fn subscribe(&self, game_id: &GameId) -> Result<Subscription, BroadcastError> {
        if !self.is_connected() {
            return Err(BroadcastError::Disconnected);
        }
        let (tx, rx) = mpsc::channel(MESSAGE_CHANNEL_BUFFER);
        let id = self.inner.next_id.fetch_add(1, Ordering::AcqRel);
        self.inner
            .subscribers
            .write()
            .map_err(|_| BroadcastError::StoragePoisoned)?
            .entry(game_id.clone())
            .or_default()
            .push((id, tx));

        tracing::info!(game_id = %game_id, subscriber_id = id, "peer subscribed to game");

        let hub = self.clone();
        let game_id = game_id.clone();
        Ok(Subscription::new(rx, move || {
            hub.remove_subscribers(&game_id, &[id])
        }))
    }

    fn disconnect(&self) -> impl Future<Output = ()> + Send {
        self.inner.closed.store(true, Ordering::Release);
        if let Ok(mut guard) = self.inner.subscribers.write() {
            guard.clear();
        }
        tracing::info!("broadcaster disconnected");
        ready(())
    }
}
