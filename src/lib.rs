//! # Hold'em Engine
//!
//! A single-hand Texas Hold'em engine: betting rules, pot accounting, hand
//! evaluation, and a canonical hand-history format.
//!
//! The unit of play is one [`Hand`]: fixed seats, fixed stacks, one shuffle.
//! The engine drives the hand from blinds through showdown, enforces action
//! legality, layers side pots from all-in contributions, and settles every
//! chip back out with a zero-sum guarantee. Anything between hands (seating,
//! button movement, bankrolls) belongs to the caller.
//!
//! ## Core Modules
//!
//! - [`game`]: entities, betting, evaluation, pots, and the hand itself
//! - [`engine`]: the hand store and external call surface
//!
//! ## Example
//!
//! ```
//! use holdem_engine::{ActionKind, Engine, PlayerAction};
//! use std::collections::BTreeMap;
//!
//! let mut engine = Engine::default();
//! let stacks: BTreeMap<u8, u32> = [(1, 1000), (2, 1000), (3, 1000)].into_iter().collect();
//! let (hand_id, view) = engine.start_hand(&stacks, 1, 42).unwrap();
//! assert_eq!(view.pot, 60); // blinds are in
//!
//! // Seat 1 is first to act three-handed; fold it.
//! let view = engine
//!     .submit_action(hand_id, 1, PlayerAction::new(ActionKind::Fold))
//!     .unwrap();
//! assert_eq!(view.to_act, Some(2));
//! ```

/// Hand store and call surface.
pub mod engine;
pub use engine::{Engine, HandSink, MemorySink};

/// Core game logic and entities.
pub mod game;
pub use game::{
    ActionKind, ActionOption, ActionRecord, Card, Chips, EngineError, Hand, HandId, HandRecord,
    HandResult, HandView, PlayerAction, PlayerView, Pot, PotPayout, SeatId, Street, Suit,
    constants::{self, BIG_BLIND, MAX_PLAYERS, SMALL_BLIND},
    functional,
    history::{self, HistoryError},
};
