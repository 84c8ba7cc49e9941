//! # cardtable-engine: Deterministic Card Game Engine Core
//!
//! A turn-based card-game engine in which every participant (human, AI or a
//! reconnecting peer) reconstructs identical game state from a seed and an
//! ordered action log. Rules are pure state-transition functions; nothing
//! outside (seed, players, action history) influences state.
//!
//! ## Core Modules
//!
//! - [`rng`] - Seeded 31-bit LCG shared by all peers
//! - [`cards`] - Card representation (Suit, Rank, Card) and deck construction
//! - [`deck`] - Dealing from a seeded shuffle
//! - [`player`] - Player identity records
//! - [`action`] - Actions as a tagged union with semantic equality
//! - [`history`] - Append-only action log
//! - [`game`] - Game state, game types and house rules
//! - [`reducer`] - The rule-set contract plus validated transition and replay
//! - [`spades`] - Four-player trick-taking rule-set
//! - [`rules`] - Trick resolution and tallies
//! - [`view`] - Hidden-information filter helpers
//! - [`logger`] - GameRecord serialization to JSONL
//! - [`errors`] - Error types for game operations
//!
//! ## Quick Start
//!
//! ```rust
//! use cardtable_engine::player::Player;
//! use cardtable_engine::reducer::{Reducer, ReducerExt};
//! use cardtable_engine::spades::SpadesReducer;
//!
//! let players: Vec<Player> = (1..=4)
//!     .map(|i| Player::human(format!("p{i}"), format!("Player {i}")))
//!     .collect();
//! let rules = SpadesReducer::new();
//! let state = rules.initial_state(42, &players).unwrap();
//!
//! // The first seat bids; any of 0..=13 is legal.
//! let bid = rules.valid_actions(&state, players[0].id())[3].clone();
//! let state = rules.reduce(&state, &bid).unwrap();
//! assert_eq!(state.payload.bids[players[0].id()], 3);
//! ```
//!
//! ## Deterministic Replay
//!
//! ```rust
//! use cardtable_engine::player::Player;
//! use cardtable_engine::reducer::{Reducer, ReducerExt};
//! use cardtable_engine::spades::SpadesReducer;
//!
//! let players: Vec<Player> = (1..=4)
//!     .map(|i| Player::human(format!("p{i}"), format!("Player {i}")))
//!     .collect();
//! let rules = SpadesReducer::new();
//! let mut live = rules.initial_state(7, &players).unwrap();
//! for p in &players {
//!     let a = rules.valid_actions(&live, p.id())[1].clone();
//!     live = rules.reduce(&live, &a).unwrap();
//! }
//! let replayed = rules.rebuild(7, &players, &live.action_history).unwrap();
//! assert_eq!(live, replayed);
//! ```

pub mod action;
pub mod cards;
pub mod deck;
pub mod errors;
pub mod game;
pub mod history;
pub mod logger;
pub mod player;
pub mod reducer;
pub mod rng;
pub mod rules;
pub mod spades;
pub mod view;
