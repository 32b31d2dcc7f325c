use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use holdem_engine::{
    ActionKind, Card, Chips, Engine, PlayerAction, SeatId, Suit,
    functional::{argmax, eval},
};
use std::collections::BTreeMap;
use std::hint::black_box;

fn six_handed() -> BTreeMap<SeatId, Chips> {
    (1..=6).map(|seat| (seat, 1000)).collect()
}

/// Benchmark hand evaluation with 7 cards (hole cards + full board)
fn bench_hand_eval_7_cards(c: &mut Criterion) {
    let cards = vec![
        Card(14, Suit::Spade),
        Card(13, Suit::Spade),
        Card(12, Suit::Spade),
        Card(11, Suit::Spade),
        Card(10, Suit::Spade),
        Card(2, Suit::Heart),
        Card(3, Suit::Diamond),
    ];

    c.bench_function("hand_eval_7_cards", |b| {
        b.iter(|| eval(black_box(&cards)));
    });
}

/// Benchmark winner selection across a full table of ranked hands
fn bench_argmax_6_hands(c: &mut Criterion) {
    let pools = [
        vec![
            Card(14, Suit::Spade),
            Card(14, Suit::Heart),
            Card(9, Suit::Club),
            Card(7, Suit::Diamond),
            Card(2, Suit::Spade),
            Card(5, Suit::Heart),
            Card(13, Suit::Club),
        ],
        vec![
            Card(10, Suit::Club),
            Card(10, Suit::Diamond),
            Card(10, Suit::Heart),
            Card(4, Suit::Spade),
            Card(4, Suit::Club),
            Card(8, Suit::Diamond),
            Card(3, Suit::Heart),
        ],
        vec![
            Card(6, Suit::Heart),
            Card(7, Suit::Heart),
            Card(8, Suit::Heart),
            Card(9, Suit::Heart),
            Card(10, Suit::Heart),
            Card(2, Suit::Club),
            Card(13, Suit::Diamond),
        ],
        vec![
            Card(12, Suit::Club),
            Card(11, Suit::Diamond),
            Card(9, Suit::Spade),
            Card(5, Suit::Club),
            Card(3, Suit::Spade),
            Card(2, Suit::Diamond),
            Card(14, Suit::Club),
        ],
        vec![
            Card(13, Suit::Heart),
            Card(13, Suit::Spade),
            Card(12, Suit::Diamond),
            Card(12, Suit::Spade),
            Card(7, Suit::Club),
            Card(6, Suit::Spade),
            Card(4, Suit::Diamond),
        ],
        vec![
            Card(5, Suit::Diamond),
            Card(5, Suit::Spade),
            Card(5, Suit::Club),
            Card(9, Suit::Diamond),
            Card(11, Suit::Heart),
            Card(3, Suit::Club),
            Card(2, Suit::Heart),
        ],
    ];
    let ranks: Vec<_> = pools.iter().map(|pool| eval(pool)).collect();

    c.bench_function("argmax_6_hands", |b| {
        b.iter(|| argmax(black_box(&ranks)));
    });
}

/// Benchmark a complete hand where everyone folds to the big blind
fn bench_fold_around(c: &mut Criterion) {
    let stacks = six_handed();
    c.bench_function("hand_fold_around", |b| {
        b.iter(|| {
            let mut engine = Engine::default();
            let (id, _) = engine.start_hand(&stacks, 1, 42).unwrap();
            for seat in [4, 5, 6, 1, 2] {
                engine
                    .submit_action(id, seat, PlayerAction::new(ActionKind::Fold))
                    .unwrap();
            }
        });
    });
}

/// Benchmark a complete all-in hand that runs out the board and settles
/// at showdown, for tables of different sizes
fn bench_all_in_showdown(c: &mut Criterion) {
    let mut group = c.benchmark_group("hand_all_in_showdown");
    for n_players in [2usize, 4, 6] {
        let stacks: BTreeMap<SeatId, Chips> =
            (1..=n_players as SeatId).map(|seat| (seat, 1000)).collect();
        group.bench_with_input(
            BenchmarkId::from_parameter(n_players),
            &stacks,
            |b, stacks| {
                b.iter(|| {
                    let mut engine = Engine::default();
                    let (id, mut view) = engine.start_hand(stacks, 1, 42).unwrap();
                    while let Some(seat) = view.to_act {
                        view = engine
                            .submit_action(id, seat, PlayerAction::new(ActionKind::AllIn))
                            .unwrap();
                    }
                    view
                });
            },
        );
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_hand_eval_7_cards,
    bench_argmax_6_hands,
    bench_fold_around,
    bench_all_in_showdown,
);
criterion_main!(benches);
