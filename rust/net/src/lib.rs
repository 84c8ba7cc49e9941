//! # cardtable_net: Sessions and Peer Synchronization
//!
//! Keeps a game consistent across peers. Each peer holds the same
//! (seed, players, action log) and recomputes state from it; a single host
//! orders the log by assigning sequence numbers, and late or reconnecting
//! peers catch up with sync requests.
//!
//! - [`session`] - Session data and the replay-based [`SessionManager`]
//! - [`envelope`] - The [`NetworkMessage`] wire format
//! - [`broadcaster`] - Transport boundary and the in-memory [`LocalHub`]
//! - [`peer`] - Message handling for host and guest peers
//! - [`logging`] - Subscriber setup and a capturing layer for tests

pub mod broadcaster;
pub mod envelope;
pub mod errors;
pub mod logging;
pub mod peer;
pub mod session;

pub use broadcaster::{ActionBroadcaster, LocalHub, Subscription};
pub use envelope::{MessageBody, NetworkMessage};
pub use errors::{BroadcastError, PeerError, SessionError};
pub use logging::{init_logging, init_test_logging, LogEntry, LogFormat, TestLogSubscriber};
pub use peer::{Peer, PeerEvent, Role};
pub use session::{Ingest, Session, SessionManager};
