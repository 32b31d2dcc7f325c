/// Property-based tests for hand evaluation using proptest
///
/// These tests verify that the hand evaluation logic is correct
/// across a wide range of randomly generated card combinations.
use holdem_engine::{
    Card, Suit,
    functional::{HandRank, Rank, argmax, eval},
};
use proptest::prelude::*;
use std::collections::BTreeSet;

// Strategy to generate a valid card (values 2-14, aces are value 14)
fn card_strategy() -> impl Strategy<Value = Card> {
    (2u8..=14, 0u8..=3).prop_map(|(value, suit_idx)| {
        let suit = match suit_idx {
            0 => Suit::Club,
            1 => Suit::Diamond,
            2 => Suit::Heart,
            _ => Suit::Spade,
        };
        Card(value, suit)
    })
}

// Strategy to generate a vec of unique cards (no duplicates)
fn unique_cards_strategy(min: usize, max: usize) -> impl Strategy<Value = Vec<Card>> {
    prop::collection::vec(card_strategy(), min..=max).prop_filter("Cards must be unique", |cards| {
        let set: BTreeSet<_> = cards.iter().collect();
        set.len() == cards.len()
    })
}

fn five_card_hand_strategy() -> impl Strategy<Value = Vec<Card>> {
    unique_cards_strategy(5, 5)
}

// 7 unique cards, as in Texas Hold'em: 2 hole + 5 board
fn seven_card_hand_strategy() -> impl Strategy<Value = Vec<Card>> {
    unique_cards_strategy(7, 7)
}

// Every 5-card subset of a 7-card pool
fn five_card_subsets(cards: &[Card]) -> Vec<Vec<Card>> {
    let mut subsets = Vec::new();
    for skip_a in 0..cards.len() {
        for skip_b in (skip_a + 1)..cards.len() {
            let subset: Vec<Card> = cards
                .iter()
                .enumerate()
                .filter(|&(i, _)| i != skip_a && i != skip_b)
                .map(|(_, &c)| c)
                .collect();
            subsets.push(subset);
        }
    }
    subsets
}

proptest! {
    #[test]
    fn test_eval_deterministic(cards in seven_card_hand_strategy()) {
        prop_assert_eq!(eval(&cards), eval(&cards));
    }

    #[test]
    fn test_eval_order_independent(cards in seven_card_hand_strategy()) {
        let mut reversed = cards.clone();
        reversed.reverse();
        prop_assert_eq!(eval(&cards), eval(&reversed));
    }

    #[test]
    fn test_eval_matches_best_five_card_subset(cards in seven_card_hand_strategy()) {
        // The 7-card rank must equal the best rank over all 21 subsets.
        let pool_rank = eval(&cards);
        let best_subset = five_card_subsets(&cards)
            .iter()
            .map(|subset| eval(subset))
            .max()
            .unwrap();
        prop_assert_eq!(pool_rank, best_subset);
    }

    #[test]
    fn test_extra_cards_never_weaken_a_hand(cards in seven_card_hand_strategy()) {
        let five = eval(&cards[..5]);
        let six = eval(&cards[..6]);
        let seven = eval(&cards);
        prop_assert!(six >= five);
        prop_assert!(seven >= six);
    }

    #[test]
    fn test_values_are_bounded(cards in seven_card_hand_strategy()) {
        let rank = eval(&cards);
        prop_assert!(!rank.values.is_empty());
        prop_assert!(rank.values.len() <= 5);
        prop_assert!(rank.values.iter().all(|&v| (2..=14).contains(&v)));
    }

    #[test]
    fn test_straights_carry_a_single_top_card(cards in seven_card_hand_strategy()) {
        let rank = eval(&cards);
        if matches!(rank.rank, Rank::Straight | Rank::StraightFlush) {
            prop_assert_eq!(rank.values.len(), 1);
            prop_assert!((5..=14).contains(&rank.values[0]));
        }
    }

    #[test]
    fn test_argmax_single_hand_returns_zero(cards in five_card_hand_strategy()) {
        prop_assert_eq!(argmax(&[eval(&cards)]), vec![0]);
    }

    #[test]
    fn test_argmax_contains_the_maximum(
        pools in prop::collection::vec(seven_card_hand_strategy(), 2..=6)
    ) {
        let ranks: Vec<HandRank> = pools.iter().map(|pool| eval(pool)).collect();
        let winners = argmax(&ranks);
        prop_assert!(!winners.is_empty());
        let best = ranks.iter().max().unwrap();
        for (i, rank) in ranks.iter().enumerate() {
            prop_assert_eq!(winners.contains(&i), rank == best);
        }
    }

    #[test]
    fn test_identical_pools_tie(cards in seven_card_hand_strategy()) {
        let ranks = vec![eval(&cards), eval(&cards)];
        prop_assert_eq!(argmax(&ranks), vec![0, 1]);
    }
}
