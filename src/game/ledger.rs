//! Pot accounting for a hand.
//!
//! Every chip a player wagers lands in the [`Ledger`] the moment it leaves
//! their stack. Partitioning into a main pot and side pots happens exactly
//! once, at resolution, never incrementally; the layer thresholds are the
//! total contributions of non-folded all-in players.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use super::entities::{Chips, Player, SeatId};

/// A resolved pot: its chips and the seats still eligible to win it.
/// Folded players fund pots but never appear in `eligible`.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Pot {
    pub amount: Chips,
    pub eligible: BTreeSet<SeatId>,
}

impl fmt::Display for Pot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} eligible)", self.amount, self.eligible.len())
    }
}

/// Cumulative per-seat contributions across the whole hand.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct Ledger {
    contributions: BTreeMap<SeatId, Chips>,
}

impl Ledger {
    /// Move `amount` chips from the seat's stack into the ledger.
    pub fn record(&mut self, seat: SeatId, amount: Chips) {
        *self.contributions.entry(seat).or_default() += amount;
    }

    #[must_use]
    pub fn contributed(&self, seat: SeatId) -> Chips {
        self.contributions.get(&seat).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn total(&self) -> Chips {
        self.contributions.values().sum()
    }

    /// Split the ledger into a main pot and zero or more side pots, ordered
    /// from smallest all-in threshold to largest.
    ///
    /// Each threshold closes a layer: the layer collects, from every
    /// contributor (folded included), the slice of their contribution that
    /// falls between the previous threshold and this one, and is eligible
    /// to the non-folded players who contributed at least up to it. The top
    /// threshold is the largest non-folded contribution, so every chip ends
    /// up in exactly one pot: a fold is only legal while facing a bet at or
    /// above the folder's own total, so no folded contribution can exceed
    /// the top threshold.
    #[must_use]
    pub fn partition(&self, players: &[Player]) -> Vec<Pot> {
        let mut levels: BTreeSet<Chips> = players
            .iter()
            .filter(|p| !p.folded && p.all_in)
            .map(|p| self.contributed(p.seat))
            .filter(|&c| c > 0)
            .collect();
        let top = players
            .iter()
            .filter(|p| !p.folded)
            .map(|p| self.contributed(p.seat))
            .max()
            .unwrap_or(0);
        if top > 0 {
            levels.insert(top);
        }

        let mut pots = Vec::with_capacity(levels.len());
        let mut floor = 0;
        for &level in levels.iter().filter(|&&level| level <= top) {
            let amount = self
                .contributions
                .values()
                .map(|&c| c.min(level) - c.min(floor))
                .sum();
            let eligible = players
                .iter()
                .filter(|p| !p.folded && self.contributed(p.seat) >= level)
                .map(|p| p.seat)
                .collect();
            pots.push(Pot { amount, eligible });
            floor = level;
        }

        debug_assert_eq!(
            pots.iter().map(|pot| pot.amount).sum::<Chips>(),
            self.total(),
        );
        pots
    }
}
