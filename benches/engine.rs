use criterion::{black_box, criterion_group, criterion_main, Criterion};

use duelcore::cards::{CardDefinition, CardRegistry, DefId};
use duelcore::core::{Command, EngineConfig, Seat, SeatMap};
use duelcore::engine::Engine;

fn bench_engine() -> (Engine, duelcore::GameState) {
    let registry = CardRegistry::from_definitions(vec![
        CardDefinition::creature("grunt", "Gravel Grunt", 3, 1200, 900),
        CardDefinition::creature("wall", "Stone Wall", 4, 400, 1800),
        CardDefinition::creature("tyrant", "Ash Tyrant", 6, 2400, 1900),
    ]);
    let engine = Engine::new(registry, EngineConfig::default());

    let names = ["grunt", "wall", "tyrant", "grunt", "wall", "grunt", "wall", "tyrant"];
    let decks = SeatMap::with_value(names.iter().map(|&n| DefId::new(n)).collect());
    let state = engine.create_initial_state(decks, None, Some(42));
    (engine, state)
}

fn decide_benchmark(c: &mut Criterion) {
    let (engine, state) = bench_engine();

    c.bench_function("decide_end_turn", |b| {
        b.iter(|| engine.decide(black_box(&state), Seat::Host, &Command::EndTurn))
    });
}

fn evolve_benchmark(c: &mut Criterion) {
    let (engine, state) = bench_engine();
    let events = engine.decide(&state, Seat::Host, &Command::EndTurn);

    c.bench_function("evolve_end_turn", |b| {
        b.iter(|| engine.evolve(black_box(&state), black_box(&events)))
    });
}

fn legal_moves_benchmark(c: &mut Criterion) {
    let (engine, state) = bench_engine();
    // Main phase offers the widest command surface.
    let (state, _) = engine.apply(&state, Seat::Host, &Command::AdvancePhase);
    let (state, _) = engine.apply(&state, Seat::Host, &Command::AdvancePhase);

    c.bench_function("legal_moves_main_phase", |b| {
        b.iter(|| engine.legal_moves(black_box(&state), Seat::Host))
    });
}

criterion_group!(
    benches,
    decide_benchmark,
    evolve_benchmark,
    legal_moves_benchmark
);
criterion_main!(benches);
