use criterion::{criterion_group, criterion_main, Criterion};
use locus_index::geom::Point;
use locus_index::kdtree::KdTree;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn random_points(n: usize) -> Vec<Point<f64>> {
    let mut rng = StdRng::seed_from_u64(7);
    (0..n)
        .map(|_| Point::new(rng.gen_range(0.0..1000.0), rng.gen_range(0.0..1000.0)))
        .collect()
}

pub fn criterion_benchmark(c: &mut Criterion) {
    let points = random_points(50_000);

    c.bench_function("kdtree construction", |b| {
        b.iter(|| KdTree::new(points.clone()).unwrap())
    });

    let tree = KdTree::new(points.clone()).unwrap();
    let probe = Point::new(500.0, 500.0);
    c.bench_function("kdtree n_nearest(20)", |b| {
        b.iter(|| tree.n_nearest_indices(20, probe).unwrap())
    });

    c.bench_function("kdtree find_ball", |b| {
        b.iter(|| tree.find_ball_indices(probe, 25.0))
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
