//! Hand evaluation over a card pool.
//!
//! [`eval`] reduces a pool of 5 to 7 cards (two hole cards plus the board)
//! to the best 5-card hand, encoded as a [`HandRank`] that orders correctly
//! against any other pool by deriving `Ord` on the category first and the
//! kicker sequence second. [`argmax`] picks every tied-best hand out of a
//! slice, which is how split pots are detected.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use super::entities::{Card, Suit, Value};

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum Rank {
    HighCard,
    OnePair,
    TwoPair,
    ThreeOfAKind,
    Straight,
    Flush,
    FullHouse,
    FourOfAKind,
    StraightFlush,
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::HighCard => "hi",
            Self::OnePair => "1p",
            Self::TwoPair => "2p",
            Self::ThreeOfAKind => "3k",
            Self::Straight => "s8",
            Self::Flush => "fs",
            Self::FullHouse => "fh",
            Self::FourOfAKind => "4k",
            Self::StraightFlush => "sf",
        };
        write!(f, "{repr}")
    }
}

/// The best 5-card hand of a pool: category plus the tie-breaking value
/// sequence within it, highest-significance first. Two equal `HandRank`s
/// denote an exact tie (split pot share).
#[derive(Clone, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct HandRank {
    pub rank: Rank,
    pub values: Vec<Value>,
}

/// Highest straight top card within a set of distinct values, if any.
/// An ace counts both high and low, so A-2-3-4-5 yields a 5-high straight.
fn straight_high(values: &BTreeSet<Value>) -> Option<Value> {
    let mut present = values.clone();
    if present.contains(&14) {
        present.insert(1);
    }
    for high in (5..=14u8).rev() {
        if (high - 4..=high).all(|v| present.contains(&v)) {
            return Some(high);
        }
    }
    None
}

/// Evaluate the best 5-card hand in `cards`. Pure and total for any set of
/// distinct, well-formed cards; 7 cards in normal play.
#[must_use]
pub fn eval(cards: &[Card]) -> HandRank {
    // Value multiplicities and per-suit values.
    let mut counts: BTreeMap<Value, u8> = BTreeMap::new();
    let mut suits: BTreeMap<Suit, BTreeSet<Value>> = BTreeMap::new();
    for &Card(value, suit) in cards {
        *counts.entry(value).or_default() += 1;
        suits.entry(suit).or_default().insert(value);
    }

    let flush = suits.values().find(|values| values.len() >= 5);

    if let Some(values) = flush
        && let Some(high) = straight_high(values)
    {
        return HandRank {
            rank: Rank::StraightFlush,
            values: vec![high],
        };
    }

    // Groups ordered by multiplicity first, then value, both descending.
    let mut groups: Vec<(u8, Value)> = counts.iter().map(|(&v, &n)| (n, v)).collect();
    groups.sort_unstable_by(|a, b| b.cmp(a));

    let kickers = |exclude: &[Value], take: usize| -> Vec<Value> {
        counts
            .keys()
            .rev()
            .filter(|v| !exclude.contains(v))
            .take(take)
            .copied()
            .collect()
    };

    if let Some(&(4, quad)) = groups.first() {
        let mut values = vec![quad];
        values.extend(kickers(&[quad], 1));
        return HandRank {
            rank: Rank::FourOfAKind,
            values,
        };
    }

    if let Some(&(3, trips)) = groups.first()
        && let Some(&(pair_count, pair)) = groups.get(1)
        && pair_count >= 2
    {
        return HandRank {
            rank: Rank::FullHouse,
            values: vec![trips, pair],
        };
    }

    if let Some(values) = flush {
        return HandRank {
            rank: Rank::Flush,
            values: values.iter().rev().take(5).copied().collect(),
        };
    }

    let distinct: BTreeSet<Value> = counts.keys().copied().collect();
    if let Some(high) = straight_high(&distinct) {
        return HandRank {
            rank: Rank::Straight,
            values: vec![high],
        };
    }

    match groups.first() {
        Some(&(3, trips)) => {
            let mut values = vec![trips];
            values.extend(kickers(&[trips], 2));
            HandRank {
                rank: Rank::ThreeOfAKind,
                values,
            }
        }
        Some(&(2, high_pair)) => match groups.get(1) {
            Some(&(2, low_pair)) => {
                let mut values = vec![high_pair, low_pair];
                values.extend(kickers(&[high_pair, low_pair], 1));
                HandRank {
                    rank: Rank::TwoPair,
                    values,
                }
            }
            _ => {
                let mut values = vec![high_pair];
                values.extend(kickers(&[high_pair], 3));
                HandRank {
                    rank: Rank::OnePair,
                    values,
                }
            }
        },
        _ => HandRank {
            rank: Rank::HighCard,
            values: kickers(&[], 5),
        },
    }
}

/// Indices of every hand tied for best, sorted ascending. Empty input
/// yields an empty result.
#[must_use]
pub fn argmax(ranks: &[HandRank]) -> Vec<usize> {
    let Some(best) = ranks.iter().max() else {
        return Vec::new();
    };
    ranks
        .iter()
        .enumerate()
        .filter(|(_, rank)| *rank == best)
        .map(|(i, _)| i)
        .collect()
}
