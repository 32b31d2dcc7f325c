//! Per-hand orchestrator.
//!
//! A [`Hand`] owns everything for exactly one deal: the players, the deck,
//! the board, the pot ledger, and the current betting round. It drives the
//! street progression, posts blinds, settles pots, and emits a terminal
//! [`HandResult`]. Once complete, a hand never mutates again.

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

use super::betting::BettingRound;
use super::constants::{BIG_BLIND, BOARD_SIZE, MAX_CARDS_PER_HAND, MAX_PLAYERS, SMALL_BLIND};
use super::entities::{
    ActionKind, ActionOption, ActionRecord, Card, Chips, Deck, Player, PlayerAction, SeatId,
    Street,
};
use super::errors::EngineError;
use super::functional::{HandRank, argmax, eval};
use super::history;
use super::ledger::{Ledger, Pot};

/// Unique identifier of a hand.
pub type HandId = Uuid;

/// One pot's settlement: the pot itself and what each winning seat took
/// from it. Split pots divide evenly; odd chips go one apiece to the
/// winners closest clockwise to the dealer's left.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct PotPayout {
    pub pot: Pot,
    pub winners: BTreeMap<SeatId, Chips>,
}

/// Terminal outcome of a hand. `net` covers every seat dealt in and always
/// sums to zero.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct HandResult {
    pub hand_id: HandId,
    pub pots: Vec<PotPayout>,
    pub net: BTreeMap<SeatId, i64>,
}

/// The artifact handed to persistence when a hand completes: the result,
/// the chronological action sequence, and the rendered five-line history.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct HandRecord {
    pub result: HandResult,
    pub actions: Vec<ActionRecord>,
    pub history: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl HandRecord {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// A player's state as exposed to callers. Hole cards are included; hiding
/// them from opponents is the caller's concern.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct PlayerView {
    pub seat: SeatId,
    pub name: String,
    /// Chips behind.
    pub stack: Chips,
    pub street_bet: Chips,
    pub contributed: Chips,
    pub hole_cards: Option<[Card; 2]>,
    pub folded: bool,
    pub all_in: bool,
    pub is_dealer: bool,
    pub is_small_blind: bool,
    pub is_big_blind: bool,
}

/// Read-only snapshot of a hand. Building one has no side effects.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct HandView {
    pub hand_id: HandId,
    pub street: Street,
    pub board: Vec<Card>,
    pub pot: Chips,
    pub bet_to_call: Chips,
    pub to_act: Option<SeatId>,
    pub players: Vec<PlayerView>,
    pub result: Option<HandResult>,
}

/// A single hand in play, from shuffle to settlement.
#[derive(Debug)]
pub struct Hand {
    id: HandId,
    /// Ascending seat order; indices below are into this vec.
    pub(crate) players: Vec<Player>,
    dealer_idx: usize,
    deck: Deck,
    pub(crate) board: Vec<Card>,
    street: Street,
    betting: BettingRound,
    to_act: Option<usize>,
    ledger: Ledger,
    pub(crate) actions: Vec<ActionRecord>,
    started_at: DateTime<Utc>,
    result: Option<HandResult>,
    finished_at: Option<DateTime<Utc>>,
}

impl Hand {
    /// Deal a new hand: validate the table, shuffle, deal hole cards two
    /// passes from the small blind, post blinds, and hand the action to the
    /// first seat after the big blind. Heads-up, the dealer posts the small
    /// blind and acts first preflop.
    pub fn start<R: Rng + ?Sized>(
        stacks: &BTreeMap<SeatId, Chips>,
        dealer: SeatId,
        rng: &mut R,
    ) -> Result<Self, EngineError> {
        if stacks.len() < 2 {
            return Err(EngineError::invalid_config("at least two seats are required"));
        }
        if stacks.len() > MAX_PLAYERS {
            return Err(EngineError::invalid_config(format!(
                "at most {MAX_PLAYERS} seats are supported"
            )));
        }
        for (&seat, &stack) in stacks {
            if seat == 0 || seat as usize > MAX_PLAYERS {
                return Err(EngineError::invalid_config(format!("seat {seat} is out of range")));
            }
            if stack == 0 {
                return Err(EngineError::invalid_config(format!("seat {seat} has no chips")));
            }
        }
        if !stacks.contains_key(&dealer) {
            return Err(EngineError::invalid_config(format!(
                "dealer seat {dealer} is not in the hand"
            )));
        }

        let mut players: Vec<Player> = stacks
            .iter()
            .map(|(&seat, &stack)| Player::new(seat, format!("Player {seat}"), stack))
            .collect();
        let n = players.len();
        // The whole deal fits in one deck, so draw() cannot exhaust it.
        debug_assert!(2 * n + BOARD_SIZE <= MAX_CARDS_PER_HAND);
        let dealer_idx = players
            .iter()
            .position(|p| p.seat == dealer)
            .ok_or_else(|| EngineError::invalid_config("dealer seat missing"))?;
        let sb_idx = if n == 2 { dealer_idx } else { (dealer_idx + 1) % n };
        let bb_idx = (sb_idx + 1) % n;
        players[dealer_idx].is_dealer = true;
        players[sb_idx].is_small_blind = true;
        players[bb_idx].is_big_blind = true;

        let mut hand = Self {
            id: Uuid::new_v4(),
            players,
            dealer_idx,
            deck: Deck::shuffled(rng),
            board: Vec::with_capacity(BOARD_SIZE),
            street: Street::Preflop,
            betting: BettingRound::preflop(),
            to_act: None,
            ledger: Ledger::default(),
            actions: Vec::new(),
            started_at: Utc::now(),
            result: None,
            finished_at: None,
        };
        hand.deal_hole_cards(sb_idx)?;
        hand.post_blind(sb_idx, SMALL_BLIND);
        hand.post_blind(bb_idx, BIG_BLIND);
        log::info!(
            "hand {}: started with {n} players, dealer seat {dealer}",
            hand.id
        );
        hand.advance_from(bb_idx)?;
        Ok(hand)
    }

    #[must_use]
    pub fn id(&self) -> HandId {
        self.id
    }

    #[must_use]
    pub fn street(&self) -> Street {
        self.street
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.result.is_some()
    }

    #[must_use]
    pub fn result(&self) -> Option<&HandResult> {
        self.result.as_ref()
    }

    /// Submit an action for a seat. Validation happens before any mutation,
    /// so a rejected action leaves the hand exactly as it was.
    pub fn submit(&mut self, seat: SeatId, action: PlayerAction) -> Result<(), EngineError> {
        if self.result.is_some() {
            return Err(EngineError::illegal("hand is complete"));
        }
        let idx = self
            .seat_index(seat)
            .ok_or(EngineError::UnknownSeat { seat })?;
        if self.to_act != Some(idx) {
            return Err(EngineError::OutOfTurn);
        }
        let vetted = self.betting.vet(&self.players[idx], action)?;

        let player = &mut self.players[idx];
        player.street_bet += vetted.wagered;
        player.contributed += vetted.wagered;
        if vetted.all_in {
            player.all_in = true;
        }
        if vetted.kind == ActionKind::Fold {
            player.folded = true;
        }
        let street_bet = player.street_bet;
        self.ledger.record(seat, vetted.wagered);
        self.betting.apply(seat, &vetted, street_bet);
        let amount = match action.kind {
            ActionKind::Bet | ActionKind::Raise => Some(street_bet),
            _ => None,
        };
        self.actions.push(ActionRecord {
            seat,
            street: self.street,
            kind: action.kind,
            amount,
        });
        log::debug!("hand {}: seat {seat} {action} on the {}", self.id, self.street);
        self.advance_from(idx)
    }

    /// Legal actions for the seat, with sizing bounds. Empty when it is not
    /// the seat's turn or the hand is over.
    pub fn valid_actions(&self, seat: SeatId) -> Result<Vec<ActionOption>, EngineError> {
        let idx = self
            .seat_index(seat)
            .ok_or(EngineError::UnknownSeat { seat })?;
        if self.to_act != Some(idx) {
            return Ok(Vec::new());
        }
        Ok(self.betting.options(&self.players[idx]))
    }

    #[must_use]
    pub fn view(&self) -> HandView {
        HandView {
            hand_id: self.id,
            street: self.street,
            board: self.board.clone(),
            pot: self.ledger.total(),
            bet_to_call: self.betting.bet_to_call,
            to_act: self.to_act.map(|idx| self.players[idx].seat),
            players: self
                .players
                .iter()
                .map(|p| PlayerView {
                    seat: p.seat,
                    name: p.name.clone(),
                    stack: p.remaining(),
                    street_bet: p.street_bet,
                    contributed: p.contributed,
                    hole_cards: p.hole_cards,
                    folded: p.folded,
                    all_in: p.all_in,
                    is_dealer: p.is_dealer,
                    is_small_blind: p.is_small_blind,
                    is_big_blind: p.is_big_blind,
                })
                .collect(),
            result: self.result.clone(),
        }
    }

    /// The persistence artifact. `None` until the hand completes.
    #[must_use]
    pub fn record(&self) -> Option<HandRecord> {
        let result = self.result.clone()?;
        let finished_at = self.finished_at?;
        Some(HandRecord {
            result,
            actions: self.actions.clone(),
            history: history::render(self),
            started_at: self.started_at,
            finished_at,
        })
    }

    fn seat_index(&self, seat: SeatId) -> Option<usize> {
        self.players.iter().position(|p| p.seat == seat)
    }

    fn next_can_act_after(&self, idx: usize) -> Option<usize> {
        let n = self.players.len();
        (1..=n)
            .map(|k| (idx + k) % n)
            .find(|&j| self.players[j].can_act())
    }

    fn deal_hole_cards(&mut self, sb_idx: usize) -> Result<(), EngineError> {
        let n = self.players.len();
        let mut first_pass = vec![None; n];
        for k in 0..n {
            let idx = (sb_idx + k) % n;
            first_pass[idx] = Some(self.deck.draw()?);
        }
        for k in 0..n {
            let idx = (sb_idx + k) % n;
            if let Some(first) = first_pass[idx].take() {
                let second = self.deck.draw()?;
                self.players[idx].hole_cards = Some([first, second]);
            }
        }
        Ok(())
    }

    /// Post a forced blind. A stack shorter than the blind goes all-in for
    /// what it has.
    fn post_blind(&mut self, idx: usize, blind: Chips) {
        let player = &mut self.players[idx];
        let wagered = blind.min(player.remaining());
        player.street_bet += wagered;
        player.contributed += wagered;
        if player.remaining() == 0 {
            player.all_in = true;
        }
        let seat = player.seat;
        self.ledger.record(seat, wagered);
    }

    /// Move the hand forward after the player at `idx` acted (or after the
    /// blinds posted). Ends the hand if only one player remains, otherwise
    /// passes the action along or closes the street.
    fn advance_from(&mut self, idx: usize) -> Result<(), EngineError> {
        self.check_conservation()?;
        if self.players.iter().filter(|p| !p.folded).count() == 1 {
            return self.settle_uncontested();
        }
        if !self.betting.is_complete(&self.players) {
            self.to_act = self.next_can_act_after(idx);
            return Ok(());
        }
        self.next_street()
    }

    /// Close the current street and open the next one. Streets where at
    /// most one player can still act have no betting, so the board runs
    /// out to the river automatically.
    fn next_street(&mut self) -> Result<(), EngineError> {
        loop {
            let next = match self.street {
                Street::Preflop => Street::Flop,
                Street::Flop => Street::Turn,
                Street::Turn => Street::River,
                Street::River => return self.settle_showdown(),
                Street::Showdown | Street::Complete => {
                    return Err(EngineError::Invariant(
                        "street advanced past the river".into(),
                    ));
                }
            };
            self.street = next;
            for _ in 0..next.cards_dealt() {
                let card = self.deck.draw()?;
                self.board.push(card);
            }
            for player in &mut self.players {
                player.street_bet = 0;
            }
            self.betting = BettingRound::new();
            log::debug!(
                "hand {}: {next}, board {}",
                self.id,
                self.board.iter().map(ToString::to_string).collect::<String>()
            );
            if self.players.iter().filter(|p| p.can_act()).count() > 1 {
                self.to_act = self.next_can_act_after(self.dealer_idx);
                return Ok(());
            }
        }
    }

    /// Everyone else folded: the last player standing takes every pot with
    /// no evaluation and no card reveal.
    fn settle_uncontested(&mut self) -> Result<(), EngineError> {
        let winner = self
            .players
            .iter()
            .find(|p| !p.folded)
            .map(|p| p.seat)
            .ok_or_else(|| EngineError::Invariant("no contender left".into()))?;
        let payouts = self
            .ledger
            .partition(&self.players)
            .into_iter()
            .map(|pot| {
                let winners = BTreeMap::from([(winner, pot.amount)]);
                PotPayout { pot, winners }
            })
            .collect();
        self.finish(payouts)
    }

    /// Rank every contender's best five of seven and award each pot to its
    /// eligible argmax set.
    fn settle_showdown(&mut self) -> Result<(), EngineError> {
        self.street = Street::Showdown;
        let mut ranks: BTreeMap<SeatId, HandRank> = BTreeMap::new();
        for player in self.players.iter().filter(|p| !p.folded) {
            let hole = player.hole_cards.ok_or_else(|| {
                EngineError::Invariant(format!("seat {} has no hole cards", player.seat))
            })?;
            let mut cards = self.board.clone();
            cards.extend(hole);
            ranks.insert(player.seat, eval(&cards));
        }

        let pots = self.ledger.partition(&self.players);
        let mut payouts = Vec::with_capacity(pots.len());
        for pot in pots {
            let contenders: Vec<SeatId> = pot.eligible.iter().copied().collect();
            let mut pot_ranks = Vec::with_capacity(contenders.len());
            for seat in &contenders {
                let rank = ranks.get(seat).cloned().ok_or_else(|| {
                    EngineError::Invariant(format!("seat {seat} unranked at showdown"))
                })?;
                pot_ranks.push(rank);
            }
            let mut winners_in_order: Vec<SeatId> = argmax(&pot_ranks)
                .into_iter()
                .map(|i| contenders[i])
                .collect();
            winners_in_order.sort_by_key(|&seat| self.clockwise_from_dealer(seat));

            let count = winners_in_order.len() as Chips;
            let share = pot.amount / count;
            let remainder = pot.amount % count;
            let mut winners = BTreeMap::new();
            for (i, &seat) in winners_in_order.iter().enumerate() {
                let odd = u32::from((i as Chips) < remainder);
                winners.insert(seat, share + odd);
            }
            payouts.push(PotPayout { pot, winners });
        }
        self.finish(payouts)
    }

    /// Clockwise distance from the seat immediately after the dealer.
    /// Orders odd-chip distribution.
    fn clockwise_from_dealer(&self, seat: SeatId) -> usize {
        let n = self.players.len();
        self.seat_index(seat)
            .map_or(usize::MAX, |idx| (idx + n - self.dealer_idx - 1) % n)
    }

    fn finish(&mut self, pots: Vec<PotPayout>) -> Result<(), EngineError> {
        let mut net: BTreeMap<SeatId, i64> = self
            .players
            .iter()
            .map(|p| (p.seat, -i64::from(p.contributed)))
            .collect();
        for payout in &pots {
            for (&seat, &amount) in &payout.winners {
                *net.entry(seat).or_default() += i64::from(amount);
            }
        }
        let sum: i64 = net.values().sum();
        if sum != 0 {
            log::error!("hand {}: settlement out of balance by {sum}", self.id);
            return Err(EngineError::Invariant(format!(
                "settlement out of balance by {sum}"
            )));
        }
        self.result = Some(HandResult {
            hand_id: self.id,
            pots,
            net,
        });
        self.street = Street::Complete;
        self.to_act = None;
        self.finished_at = Some(Utc::now());
        log::info!(
            "hand {}: complete, {} chips settled",
            self.id,
            self.ledger.total()
        );
        Ok(())
    }

    /// Every wagered chip must be in the ledger and no stack may go
    /// negative. Checked after every mutation.
    fn check_conservation(&self) -> Result<(), EngineError> {
        let mut total: Chips = 0;
        for player in &self.players {
            if player.contributed > player.starting_stack {
                log::error!("hand {}: seat {} overcommitted", self.id, player.seat);
                return Err(EngineError::Invariant(format!(
                    "seat {} wagered more than its stack",
                    player.seat
                )));
            }
            if self.ledger.contributed(player.seat) != player.contributed {
                return Err(EngineError::Invariant(format!(
                    "seat {} out of sync with the ledger",
                    player.seat
                )));
            }
            total += player.contributed;
        }
        if total != self.ledger.total() {
            return Err(EngineError::Invariant("ledger total drifted".into()));
        }
        Ok(())
    }
}
