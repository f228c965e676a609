use criterion::{black_box, criterion_group, criterion_main, Criterion};
use lloyd::cluster::{Initialization, Kmeans};
use rand::prelude::*;

fn bench_kmeans(c: &mut Criterion) {
    let mut group = c.benchmark_group("kmeans");

    // Generate synthetic data
    let mut rng = StdRng::seed_from_u64(42);
    let n = 1000;
    let d = 16;
    let k = 10;

    let data: Vec<Vec<f32>> = (0..n)
        .map(|_| (0..d).map(|_| rng.random::<f32>()).collect())
        .collect();

    for init in [
        Initialization::Random,
        Initialization::Farthest,
        Initialization::KmeansPlusPlus,
    ] {
        group.bench_function(format!("initialize_{init}_n1000_d16_k10"), |b| {
            b.iter(|| {
                let mut model = Kmeans::new(k).with_initialization(init).with_seed(42);
                model.initialize(black_box(&data), None).unwrap();
            })
        });
    }

    group.bench_function("step_n1000_d16_k10", |b| {
        let mut model = Kmeans::new(k).with_seed(42);
        model.initialize(&data, None).unwrap();
        b.iter(|| {
            model.step(black_box(&data)).unwrap();
        })
    });

    group.bench_function("run_n1000_d16_k10", |b| {
        b.iter(|| {
            let mut model = Kmeans::new(k).with_max_iter(10).with_seed(42);
            model.run(black_box(&data)).unwrap();
        })
    });

    group.finish();
}

criterion_group!(benches, bench_kmeans);
criterion_main!(benches);
