use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use cube::{scramble, Action, Cube};
use rand::{rngs::StdRng, SeedableRng};

fn apply(c: &mut Criterion) {
    let (cube, _) = scramble(20, &mut StdRng::seed_from_u64(0));
    c.bench_function("apply quarter turn", |b| {
        b.iter_batched(
            || cube,
            |mut cube| cube.apply(black_box(Action::from_index(7))),
            BatchSize::SmallInput,
        )
    });
    c.bench_function("all successors", |b| b.iter(|| black_box(cube).successors()));
}

fn encode(c: &mut Criterion) {
    let (cube, _) = scramble(20, &mut StdRng::seed_from_u64(0));
    let mut buffer = vec![0.; cube::ONE_HOT_SIZE];
    c.bench_function("one-hot encoding", |b| b.iter(|| black_box(cube).write_one_hot(&mut buffer)));
    c.bench_function("is solved", |b| b.iter(|| black_box(Cube::solved()).is_solved()));
}

criterion_group!(benches, apply, encode);
criterion_main!(benches);
