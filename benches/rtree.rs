use criterion::{criterion_group, criterion_main, Criterion};
use locus_index::geom::{Point, Rect};
use locus_index::rtree::RTree;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn random_boxes(n: usize) -> Vec<Rect<f64>> {
    let mut rng = StdRng::seed_from_u64(42);
    (0..n)
        .map(|_| {
            let x = rng.gen_range(0.0..1000.0);
            let y = rng.gen_range(0.0..1000.0);
            let w = rng.gen_range(0.1..5.0);
            let h = rng.gen_range(0.1..5.0);
            Rect::new(x, y, x + w, y + h)
        })
        .collect()
}

pub fn criterion_benchmark(c: &mut Criterion) {
    let boxes = random_boxes(50_000);

    c.bench_function("rtree construction", |b| {
        b.iter(|| RTree::new(boxes.clone()).unwrap())
    });

    let tree = RTree::new(boxes.clone()).unwrap();
    let probe = Rect::new(400.0, 400.0, 420.0, 420.0);
    c.bench_function("rtree find_subsets", |b| {
        b.iter(|| tree.find_subsets_indices(&probe))
    });

    c.bench_function("rtree n_nearest(20)", |b| {
        b.iter(|| tree.n_nearest_indices(20, Point::new(500.0, 500.0)).unwrap())
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
