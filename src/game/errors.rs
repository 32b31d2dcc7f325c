//! Engine error taxonomy.
//!
//! Everything except [`EngineError::DeckExhausted`] and
//! [`EngineError::Invariant`] is a recoverable, caller-facing rejection: the
//! offending request is refused and hand state is left untouched. The two
//! exceptions indicate a logic defect inside the engine itself and halt the
//! hand.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::entities::SeatId;

/// Errors produced by the hand engine.
#[derive(Clone, Debug, Deserialize, Eq, Error, PartialEq, Serialize)]
pub enum EngineError {
    /// The deck ran out of cards. Cannot occur in a correct 6-max hand,
    /// which draws at most 17 cards.
    #[error("deck exhausted")]
    DeckExhausted,
    /// The action violates the betting legality rules.
    #[error("illegal action: {reason}")]
    IllegalAction { reason: String },
    /// The seat is not the seat currently due to act.
    #[error("not your turn")]
    OutOfTurn,
    /// The seat is not part of this hand.
    #[error("unknown seat {seat}")]
    UnknownSeat { seat: SeatId },
    /// The hand could not be started with the given stacks and positions.
    #[error("invalid configuration: {reason}")]
    InvalidConfiguration { reason: String },
    /// No hand with the given identifier is in play.
    #[error("hand not found")]
    HandNotFound,
    /// A numeric invariant (chip conservation, non-negative stacks) broke.
    /// The hand is unrecoverable.
    #[error("internal invariant violated: {0}")]
    Invariant(String),
}

impl EngineError {
    pub(crate) fn illegal(reason: impl Into<String>) -> Self {
        Self::IllegalAction {
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            reason: reason.into(),
        }
    }
}
