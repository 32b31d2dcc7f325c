//! Hold'em hand engine core - entities, betting, and settlement.
//!
//! This module provides the single-hand implementation:
//! - Card, deck, player, and action entities
//! - Seven-card hand evaluation
//! - Pot ledger with main/side pot partitioning
//! - Per-street betting legality and turn order
//! - The hand orchestrator and the five-line history format

pub mod betting;
pub mod constants;
pub mod entities;
pub mod errors;
pub mod functional;
pub mod hand;
pub mod history;
pub mod ledger;

pub use entities::{
    ActionKind, ActionOption, ActionRecord, Card, Chips, Deck, Player, PlayerAction, SeatId,
    Street, Suit, Value,
};
pub use errors::EngineError;
pub use hand::{Hand, HandId, HandRecord, HandResult, HandView, PlayerView, PotPayout};
pub use ledger::{Ledger, Pot};
