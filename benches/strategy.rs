use criterion::{black_box, criterion_group, criterion_main, Criterion};
use mtg_odds::deck::{CardType, DeckConfig, SimCardSpec, SimDeck};
use mtg_odds::prob::multivariate::joint_at_least;
use mtg_odds::simulation::discover::{simulate_discover_chain, MAX_CHAIN_DEPTH};
use mtg_odds::strategy::mulligan::{compute_strategy, MulliganParams};

fn two_type_deck() -> DeckConfig {
    DeckConfig::new(
        99,
        vec![
            CardType { name: "Lands".into(), count: 36, required: 2, by_turn: 3 },
            CardType { name: "Ramp".into(), count: 10, required: 1, by_turn: 3 },
        ],
    )
    .expect("valid deck")
}

fn discover_deck() -> SimDeck {
    SimDeck::from_specs(&[
        SimCardSpec {
            name: "Forest".into(),
            count: 24,
            cmc: 0,
            land: true,
            permanent: true,
            discover: false,
            tags: vec![],
        },
        SimCardSpec {
            name: "Discoverer".into(),
            count: 8,
            cmc: 3,
            land: false,
            permanent: true,
            discover: true,
            tags: vec![],
        },
        SimCardSpec {
            name: "Spell".into(),
            count: 28,
            cmc: 2,
            land: false,
            permanent: false,
            discover: false,
            tags: vec![],
        },
    ])
    .expect("valid deck")
}

fn benchmark_compute_strategy(c: &mut Criterion) {
    let deck = two_type_deck();
    let params = MulliganParams::default();

    c.bench_function("compute_strategy_two_types", |b| {
        b.iter(|| compute_strategy(black_box(&deck), black_box(&params)))
    });
}

fn benchmark_joint_at_least(c: &mut Criterion) {
    c.bench_function("joint_at_least_four_types", |b| {
        b.iter(|| {
            joint_at_least(
                black_box(99),
                black_box(&[36, 10, 8, 6]),
                black_box(10),
                black_box(&[2, 1, 1, 0]),
            )
        })
    });
}

fn benchmark_discover_chain(c: &mut Criterion) {
    let deck = discover_deck();

    c.bench_function("discover_chain_1000_trials", |b| {
        b.iter(|| {
            simulate_discover_chain(
                black_box(&deck),
                black_box(3),
                black_box(MAX_CHAIN_DEPTH),
                black_box(1_000),
                black_box(42),
            )
        })
    });
}

criterion_group!(
    benches,
    benchmark_compute_strategy,
    benchmark_joint_at_least,
    benchmark_discover_chain
);
criterion_main!(benches);
