use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::errors::EngineError;

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum Suit {
    Club,
    Diamond,
    Heart,
    Spade,
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Club, Suit::Diamond, Suit::Heart, Suit::Spade];
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let repr = match self {
            Self::Club => "c",
            Self::Diamond => "d",
            Self::Heart => "h",
            Self::Spade => "s",
        };
        write!(f, "{repr}")
    }
}

/// Placeholder for card values. Deuce is 2, ace is always 14.
pub type Value = u8;

/// A card is a tuple of a uInt8 value (deuce=2u8 ... ace=14u8) and a suit.
/// 52 distinct values, no identity, immutable once constructed.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct Card(pub Value, pub Suit);

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let value = match self.0 {
            14 => 'A',
            13 => 'K',
            12 => 'Q',
            11 => 'J',
            10 => 'T',
            v => char::from(b'0' + v),
        };
        write!(f, "{value}{}", self.1)
    }
}

/// A shuffled 52-card deck with a cursor over already-drawn cards.
/// Instantiated once per hand, never reused across hands.
#[derive(Debug)]
pub struct Deck {
    cards: [Card; 52],
    idx: usize,
}

impl Deck {
    /// Build a deck as a uniformly random permutation of all 52 cards.
    pub fn shuffled<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut cards = [Card(2, Suit::Club); 52];
        for (i, value) in (2..=14u8).enumerate() {
            for (j, suit) in Suit::ALL.into_iter().enumerate() {
                cards[4 * i + j] = Card(value, suit);
            }
        }
        cards.shuffle(rng);
        Self { cards, idx: 0 }
    }

    pub fn draw(&mut self) -> Result<Card, EngineError> {
        let card = self
            .cards
            .get(self.idx)
            .copied()
            .ok_or(EngineError::DeckExhausted)?;
        self.idx += 1;
        Ok(card)
    }

    #[must_use]
    pub fn remaining(&self) -> usize {
        self.cards.len() - self.idx
    }
}

/// Type alias for whole chips. All bets and stacks are whole chips.
pub type Chips = u32;

/// Type alias for seat positions, `1..=6`, fixed for the hand.
pub type SeatId = u8;

/// The four betting rounds plus the two terminal phases of a hand.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum Street {
    Preflop,
    Flop,
    Turn,
    River,
    Showdown,
    Complete,
}

impl Street {
    /// Community cards dealt on entry to this street.
    #[must_use]
    pub fn cards_dealt(self) -> usize {
        match self {
            Self::Flop => 3,
            Self::Turn | Self::River => 1,
            _ => 0,
        }
    }

    /// Ordinal of the betting round, preflop first.
    #[must_use]
    pub fn ordinal(self) -> usize {
        match self {
            Self::Preflop => 0,
            Self::Flop => 1,
            Self::Turn => 2,
            Self::River => 3,
            Self::Showdown => 4,
            Self::Complete => 5,
        }
    }
}

impl fmt::Display for Street {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let repr = match self {
            Self::Preflop => "preflop",
            Self::Flop => "flop",
            Self::Turn => "turn",
            Self::River => "river",
            Self::Showdown => "showdown",
            Self::Complete => "complete",
        };
        write!(f, "{repr}")
    }
}

/// What a player chose to do on their turn.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum ActionKind {
    Fold,
    Check,
    Call,
    Bet,
    Raise,
    AllIn,
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let repr = match self {
            Self::Fold => "fold",
            Self::Check => "check",
            Self::Call => "call",
            Self::Bet => "bet",
            Self::Raise => "raise",
            Self::AllIn => "all-in",
        };
        write!(f, "{repr}")
    }
}

/// A single submitted decision. `amount` is the chips wagered for a bet and
/// the raise-to total for a raise; it is ignored for every other kind.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct PlayerAction {
    pub kind: ActionKind,
    pub amount: Option<Chips>,
}

impl PlayerAction {
    #[must_use]
    pub fn new(kind: ActionKind) -> Self {
        Self { kind, amount: None }
    }

    #[must_use]
    pub fn with_amount(kind: ActionKind, amount: Chips) -> Self {
        Self {
            kind,
            amount: Some(amount),
        }
    }
}

impl fmt::Display for PlayerAction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.amount {
            Some(amount) => write!(f, "{} {amount}", self.kind),
            None => self.kind.fmt(f),
        }
    }
}

/// One committed action, append-only and chronological. This sequence is the
/// ground truth for both the live log and the hand-history encoding. Blinds
/// are forced and therefore not recorded here.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct ActionRecord {
    pub seat: SeatId,
    pub street: Street,
    pub kind: ActionKind,
    pub amount: Option<Chips>,
}

/// A legal action for the seat due to act, with amount bounds where sizing
/// is up to the player.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum ActionOption {
    Fold,
    Check,
    /// Chips required to match the bet to call (capped by stack).
    Call(Chips),
    /// Opening bet; `min` is one big blind unless the stack is shorter.
    Bet { min: Chips, max: Chips },
    /// Raise-to bounds; `min` enforces the last full raise increment.
    Raise { min: Chips, max: Chips },
    /// The player's entire remaining stack.
    AllIn(Chips),
}

impl fmt::Display for ActionOption {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let repr = match self {
            Self::Fold => "fold".to_string(),
            Self::Check => "check".to_string(),
            Self::Call(amount) => format!("call (== {amount})"),
            Self::Bet { min, max } => format!("bet ({min}..={max})"),
            Self::Raise { min, max } => format!("raise to ({min}..={max})"),
            Self::AllIn(amount) => format!("all-in (== {amount})"),
        };
        write!(f, "{repr}")
    }
}

/// A seated player's state for the current hand.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Player {
    pub seat: SeatId,
    pub name: String,
    pub starting_stack: Chips,
    /// Chips wagered in the current street. Reset to 0 each street.
    pub street_bet: Chips,
    /// Cumulative chips put into the ledger this hand. Never decreases.
    pub contributed: Chips,
    pub hole_cards: Option<[Card; 2]>,
    pub folded: bool,
    pub all_in: bool,
    pub is_dealer: bool,
    pub is_small_blind: bool,
    pub is_big_blind: bool,
}

impl Player {
    #[must_use]
    pub fn new(seat: SeatId, name: String, starting_stack: Chips) -> Self {
        Self {
            seat,
            name,
            starting_stack,
            street_bet: 0,
            contributed: 0,
            hole_cards: None,
            folded: false,
            all_in: false,
            is_dealer: false,
            is_small_blind: false,
            is_big_blind: false,
        }
    }

    /// Chips behind: `starting_stack - contributed`, never negative.
    #[must_use]
    pub fn remaining(&self) -> Chips {
        self.starting_stack - self.contributed
    }

    /// A folded or all-in player never acts again this hand.
    #[must_use]
    pub fn can_act(&self) -> bool {
        !self.folded && !self.all_in
    }
}
