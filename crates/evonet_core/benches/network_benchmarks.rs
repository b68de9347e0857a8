use criterion::{black_box, criterion_group, criterion_main, Criterion};
use evonet_core::genome::{create_genome_random_with_rng, Encoding};
use evonet_core::organism::Organism;
use evonet_core::solver::Solver;
use evonet_data::Genome;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn genome() -> Genome {
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    create_genome_random_with_rng(1, 16, 4, 24, 0.3, &mut rng)
}

/// Benchmark one activation through the node graph.
fn bench_graph_activate(c: &mut Criterion) {
    let mut net = genome().genesis(1).unwrap();
    let inputs = [0.5; 16];

    c.bench_function("graph_activate", |b| {
        b.iter(|| {
            net.load_sensors(black_box(&inputs)).unwrap();
            net.activate().unwrap();
            let outputs = net.read_outputs();
            net.flush().unwrap();
            black_box(outputs)
        })
    });
}

/// Benchmark the same activation through a compiled solver.
fn bench_compiled_activate(c: &mut Criterion) {
    let mut solver = genome().genesis(1).unwrap().compile().unwrap();
    let inputs = [0.5; 16];

    c.bench_function("compiled_activate", |b| {
        b.iter(|| {
            solver.load_sensors(black_box(&inputs)).unwrap();
            solver.activate().unwrap();
            let outputs = solver.read_outputs();
            solver.flush().unwrap();
            black_box(outputs)
        })
    });
}

/// Benchmark solver compilation.
fn bench_compile(c: &mut Criterion) {
    let net = genome().genesis(1).unwrap();

    c.bench_function("compile", |b| b.iter(|| black_box(net.compile().unwrap())));
}

/// Benchmark a wire round trip.
fn bench_wire_round_trip(c: &mut Criterion) {
    let org: Organism<Genome> = Organism::new(0.5, genome(), 3).unwrap();

    c.bench_function("organism_wire_round_trip", |b| {
        b.iter(|| {
            let bytes = org.to_bytes().unwrap();
            let back: Organism<Genome> = Organism::from_bytes(black_box(&bytes)).unwrap();
            black_box(back)
        })
    });
}

criterion_group!(
    benches,
    bench_graph_activate,
    bench_compiled_activate,
    bench_compile,
    bench_wire_round_trip
);
criterion_main!(benches);
