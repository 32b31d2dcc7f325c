//! Betting round state machine for a single street.
//!
//! The round tracks the bet to call, the last full raise increment, and the
//! set of seats that have acted since the last full raise. Action legality
//! is vetted before any state mutates, so a rejected action leaves the hand
//! untouched.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::constants::BIG_BLIND;
use super::entities::{ActionKind, ActionOption, Chips, Player, PlayerAction, SeatId};
use super::errors::EngineError;

/// The vetted outcome of a legal action, applied atomically by the hand.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Vetted {
    /// Canonical kind after all-in reclassification.
    pub kind: ActionKind,
    /// Chips that leave the player's stack for this action.
    pub wagered: Chips,
    pub all_in: bool,
    /// Whether this was a full bet/raise that re-opens action for players
    /// who already matched the previous price.
    pub reopens: bool,
}

/// Mutable state of the current street's betting.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct BettingRound {
    /// Highest street bet among non-folded players.
    pub bet_to_call: Chips,
    /// Size of the last full bet/raise, for minimum-raise enforcement.
    pub last_raise: Chips,
    /// Whether a bet has occurred this street. The blinds open the preflop
    /// betting, so preflop starts opened.
    pub opened: bool,
    /// Seats that have acted since the last full bet/raise.
    acted: BTreeSet<SeatId>,
    /// Seats that had already acted when a short all-in bumped the price.
    /// They may fold or call the new price but not raise it, until a full
    /// raise re-opens the action.
    capped: BTreeSet<SeatId>,
}

impl BettingRound {
    /// Preflop round: the big blind is the opening bet and the initial
    /// raise increment.
    #[must_use]
    pub fn preflop() -> Self {
        Self {
            bet_to_call: BIG_BLIND,
            last_raise: BIG_BLIND,
            opened: true,
            acted: BTreeSet::new(),
            capped: BTreeSet::new(),
        }
    }

    /// Postflop round: nothing owed, minimum opening bet is one big blind.
    #[must_use]
    pub fn new() -> Self {
        Self {
            bet_to_call: 0,
            last_raise: BIG_BLIND,
            opened: false,
            acted: BTreeSet::new(),
            capped: BTreeSet::new(),
        }
    }

    /// Chips the player must add to match the bet to call.
    #[must_use]
    pub fn to_call(&self, player: &Player) -> Chips {
        self.bet_to_call.saturating_sub(player.street_bet)
    }

    /// Check an action against the legality rules without mutating
    /// anything. Returns the chip movement to apply on success.
    pub fn vet(&self, player: &Player, action: PlayerAction) -> Result<Vetted, EngineError> {
        let to_call = self.to_call(player);
        let remaining = player.remaining();
        match action.kind {
            ActionKind::Fold => Ok(Vetted {
                kind: ActionKind::Fold,
                wagered: 0,
                all_in: false,
                reopens: false,
            }),
            ActionKind::Check => {
                if to_call != 0 {
                    return Err(EngineError::illegal("cannot check facing a bet"));
                }
                Ok(Vetted {
                    kind: ActionKind::Check,
                    wagered: 0,
                    all_in: false,
                    reopens: false,
                })
            }
            ActionKind::Call => {
                if to_call == 0 {
                    return Err(EngineError::illegal("no bet to call"));
                }
                let wagered = to_call.min(remaining);
                Ok(Vetted {
                    kind: ActionKind::Call,
                    wagered,
                    all_in: wagered == remaining,
                    reopens: false,
                })
            }
            ActionKind::Bet => {
                if to_call != 0 || self.opened {
                    return Err(EngineError::illegal("betting is not open"));
                }
                let amount = action
                    .amount
                    .ok_or_else(|| EngineError::illegal("bet requires an amount"))?;
                if amount == 0 || amount > remaining {
                    return Err(EngineError::illegal("bet must fit within the stack"));
                }
                // An all-in below the minimum is the one permitted exception.
                if amount < BIG_BLIND && amount < remaining {
                    return Err(EngineError::illegal("bet below the big blind"));
                }
                Ok(Vetted {
                    kind: ActionKind::Bet,
                    wagered: amount,
                    all_in: amount == remaining,
                    reopens: true,
                })
            }
            ActionKind::Raise => {
                if to_call == 0 {
                    return Err(EngineError::illegal("no bet to raise"));
                }
                if self.capped.contains(&player.seat) {
                    return Err(EngineError::illegal(
                        "a short all-in does not re-open the action",
                    ));
                }
                if remaining <= to_call {
                    return Err(EngineError::illegal("stack covers at most a call"));
                }
                let raise_to = action
                    .amount
                    .ok_or_else(|| EngineError::illegal("raise requires a raise-to amount"))?;
                if raise_to <= self.bet_to_call {
                    return Err(EngineError::illegal("raise must exceed the bet to call"));
                }
                let wagered = raise_to - player.street_bet;
                if wagered > remaining {
                    return Err(EngineError::illegal("raise exceeds the stack"));
                }
                let all_in = wagered == remaining;
                let full = raise_to >= self.bet_to_call + self.last_raise;
                if !full && !all_in {
                    return Err(EngineError::illegal("raise below the minimum increment"));
                }
                Ok(Vetted {
                    kind: ActionKind::Raise,
                    wagered,
                    all_in,
                    reopens: full,
                })
            }
            ActionKind::AllIn => {
                if remaining == 0 {
                    return Err(EngineError::illegal("no chips behind"));
                }
                let raise_to = player.street_bet + remaining;
                let kind = if raise_to <= self.bet_to_call {
                    ActionKind::Call
                } else if self.opened {
                    ActionKind::Raise
                } else {
                    ActionKind::Bet
                };
                if kind == ActionKind::Raise && self.capped.contains(&player.seat) {
                    return Err(EngineError::illegal(
                        "a short all-in does not re-open the action",
                    ));
                }
                let reopens = match kind {
                    ActionKind::Call => false,
                    ActionKind::Bet => true,
                    _ => raise_to >= self.bet_to_call + self.last_raise,
                };
                Ok(Vetted {
                    kind,
                    wagered: remaining,
                    all_in: true,
                    reopens,
                })
            }
        }
    }

    /// Fold the action's effect into the round. `street_bet` is the actor's
    /// street bet after the wager landed. A short all-in raise bumps the
    /// price without clearing the acted set, so it never re-opens action.
    pub fn apply(&mut self, seat: SeatId, vetted: &Vetted, street_bet: Chips) {
        if vetted.reopens {
            self.acted.clear();
            self.capped.clear();
            self.last_raise = street_bet - self.bet_to_call;
            self.opened = true;
        } else if street_bet > self.bet_to_call {
            // Short all-in raise: seats that already matched the old price
            // lose the right to raise the new one.
            self.capped.extend(self.acted.iter().copied());
        }
        if street_bet > self.bet_to_call {
            self.bet_to_call = street_bet;
        }
        self.acted.insert(seat);
    }

    /// A street is complete when every player who can still act has acted
    /// since the last full raise and owes nothing more.
    #[must_use]
    pub fn is_complete(&self, players: &[Player]) -> bool {
        players
            .iter()
            .filter(|p| p.can_act())
            .all(|p| self.acted.contains(&p.seat) && p.street_bet == self.bet_to_call)
    }

    /// Legal actions for the player, assuming it is their turn.
    #[must_use]
    pub fn options(&self, player: &Player) -> Vec<ActionOption> {
        if !player.can_act() {
            return Vec::new();
        }
        let to_call = self.to_call(player);
        let remaining = player.remaining();
        let capped = self.capped.contains(&player.seat);
        let mut options = vec![ActionOption::Fold];
        if to_call == 0 {
            options.push(ActionOption::Check);
            if !self.opened {
                options.push(ActionOption::Bet {
                    min: BIG_BLIND.min(remaining),
                    max: remaining,
                });
            }
        } else {
            options.push(ActionOption::Call(to_call.min(remaining)));
            if remaining > to_call && !capped {
                let min = self.bet_to_call + self.last_raise;
                let max = player.street_bet + remaining;
                if max >= min {
                    options.push(ActionOption::Raise { min, max });
                }
            }
        }
        // A capped seat's jam would be a raise, which it no longer has.
        if !capped || remaining <= to_call {
            options.push(ActionOption::AllIn(remaining));
        }
        options
    }
}

impl Default for BettingRound {
    fn default() -> Self {
        Self::new()
    }
}
