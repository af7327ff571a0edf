use std::hint::black_box;

use criterion::{
  Criterion,
  criterion_group,
  criterion_main,
};
use treeq::{
  GeneratorConfig,
  SqliteStore,
  TreeQueryGenerator,
};

// The store accumulates rows across iterations, like one long benchmark run
// would; queries therefore run against an ever-growing table set.

pub fn bench_generate(c: &mut Criterion) {
  let mut store = SqliteStore::in_memory().expect("open store");
  let mut generator = TreeQueryGenerator::new(
    GeneratorConfig::new(3, 3),
    fastrand::Rng::with_seed(1),
  );

  c.bench_function("generate_depth3", |b| {
    b.iter(|| {
      black_box(generator.generate(&mut store).expect("generate"));
    });
  });
}

pub fn bench_check(c: &mut Criterion) {
  let mut store = SqliteStore::in_memory().expect("open store");
  let mut generator = TreeQueryGenerator::new(
    GeneratorConfig::new(3, 3),
    fastrand::Rng::with_seed(2),
  );
  let tree = generator.generate(&mut store).expect("generate");

  c.bench_function("check_depth3", |b| {
    b.iter(|| {
      tree.check(black_box(&store)).expect("exactly one row");
    });
  });
}

criterion_group!(benches, bench_generate, bench_check);
criterion_main!(benches);
