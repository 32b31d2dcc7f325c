//! The external call surface.
//!
//! An [`Engine`] owns every hand currently in play, keyed by hand id, and a
//! persistence collaborator. Callers start hands with explicit stacks, a
//! dealer seat, and a shuffle seed; the engine routes actions to the right
//! hand and, on completion, emits exactly one [`HandRecord`] to the sink
//! and drops the hand from the store.

use rand::SeedableRng;
use rand::rngs::StdRng;
use std::collections::{BTreeMap, HashMap};

use crate::game::entities::{ActionOption, Chips, PlayerAction, SeatId};
use crate::game::errors::EngineError;
use crate::game::hand::{Hand, HandId, HandRecord, HandView};

/// Receives the terminal record of each completed hand. Implementations
/// persist, forward, or discard it; the engine does not care which.
pub trait HandSink {
    fn hand_complete(&mut self, record: HandRecord);
}

/// Keeps every completed record in memory. The default sink, and what the
/// tests read back.
#[derive(Debug, Default)]
pub struct MemorySink {
    pub records: Vec<HandRecord>,
}

impl HandSink for MemorySink {
    fn hand_complete(&mut self, record: HandRecord) {
        self.records.push(record);
    }
}

/// Hand store plus sink. Multiple hands may be in flight at once; they
/// share nothing.
#[derive(Debug)]
pub struct Engine<S = MemorySink> {
    hands: HashMap<HandId, Hand>,
    sink: S,
}

impl Default for Engine<MemorySink> {
    fn default() -> Self {
        Self::new(MemorySink::default())
    }
}

impl<S: HandSink> Engine<S> {
    #[must_use]
    pub fn new(sink: S) -> Self {
        Self {
            hands: HashMap::new(),
            sink,
        }
    }

    #[must_use]
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Deal a new hand. The seed fully determines the shuffle, so the same
    /// stacks, dealer, and seed replay the same cards.
    pub fn start_hand(
        &mut self,
        stacks: &BTreeMap<SeatId, Chips>,
        dealer: SeatId,
        seed: u64,
    ) -> Result<(HandId, HandView), EngineError> {
        let mut rng = StdRng::seed_from_u64(seed);
        let hand = Hand::start(stacks, dealer, &mut rng)?;
        let id = hand.id();
        let view = hand.view();
        // Blinds alone can end a hand only if every seat is all-in from the
        // forced posts; even then the hand settles before it is stored.
        if hand.is_complete() {
            if let Some(record) = hand.record() {
                self.sink.hand_complete(record);
            }
        } else {
            self.hands.insert(id, hand);
        }
        Ok((id, view))
    }

    /// Route one action to a hand. When the action completes the hand, the
    /// record goes to the sink and the hand leaves the store; the returned
    /// view still carries the result.
    pub fn submit_action(
        &mut self,
        hand_id: HandId,
        seat: SeatId,
        action: PlayerAction,
    ) -> Result<HandView, EngineError> {
        let hand = self
            .hands
            .get_mut(&hand_id)
            .ok_or(EngineError::HandNotFound)?;
        hand.submit(seat, action)?;
        let view = hand.view();
        if hand.is_complete() {
            if let Some(hand) = self.hands.remove(&hand_id)
                && let Some(record) = hand.record()
            {
                self.sink.hand_complete(record);
            }
        }
        Ok(view)
    }

    /// Legal actions for a seat in a hand. Empty when it is not the seat's
    /// turn.
    pub fn valid_actions(
        &self,
        hand_id: HandId,
        seat: SeatId,
    ) -> Result<Vec<ActionOption>, EngineError> {
        self.hands
            .get(&hand_id)
            .ok_or(EngineError::HandNotFound)?
            .valid_actions(seat)
    }

    /// Snapshot a hand. Side-effect free; two consecutive calls return the
    /// same view.
    pub fn state(&self, hand_id: HandId) -> Result<HandView, EngineError> {
        self.hands
            .get(&hand_id)
            .map(Hand::view)
            .ok_or(EngineError::HandNotFound)
    }

    /// Hands currently in flight.
    #[must_use]
    pub fn active_hands(&self) -> usize {
        self.hands.len()
    }
}
