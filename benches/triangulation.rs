//! Benchmarks for incremental triangulation, constraint enforcement, and
//! dual-graph export.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use tessella::{Delaunay, Point2};

/// Generates uniformly distributed points with a deterministic xorshift.
fn generate_random_points(count: usize, seed: u64, scale: f64) -> Vec<Point2<f64>> {
    let mut points = Vec::with_capacity(count);
    let mut state = seed;

    for _ in 0..count {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        let x = (state as f64 / u64::MAX as f64) * scale;

        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        let y = (state as f64 / u64::MAX as f64) * scale;

        points.push(Point2::new(x, y));
    }

    points
}

fn bench_triangulate(c: &mut Criterion) {
    let mut group = c.benchmark_group("triangulate");

    for &size in &[1_000usize, 10_000, 100_000] {
        let points = generate_random_points(size, 314_159_265, 100_000.0);

        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &points, |b, points| {
            b.iter(|| {
                let mut mesh = Delaunay::new(black_box(points)).unwrap();
                mesh.triangulate();
                black_box(mesh.triangles().len())
            });
        });
    }

    group.finish();
}

fn bench_constrained_carve(c: &mut Criterion) {
    // Random interior points surrounded by a constrained square frame.
    let mut points = generate_random_points(5_000, 314_159_265, 90_000.0);
    for p in &mut points {
        p.x = p.x + 5_000.0;
        p.y = p.y + 5_000.0;
    }
    let frame = [
        Point2::new(0.0, 0.0),
        Point2::new(100_000.0, 0.0),
        Point2::new(100_000.0, 100_000.0),
        Point2::new(0.0, 100_000.0),
    ];
    points.extend_from_slice(&frame);

    c.bench_function("constrain_and_carve_5000", |b| {
        b.iter(|| {
            let mut mesh = Delaunay::new(black_box(&points)).unwrap();
            mesh.triangulate();
            for i in 0..4 {
                let u = mesh.find_vertex(frame[i]).unwrap();
                let v = mesh.find_vertex(frame[(i + 1) % 4]).unwrap();
                mesh.add_constraint(u, v).unwrap();
            }
            mesh.classify_regions();
            black_box(mesh.triangles().len())
        });
    });
}

fn bench_export_graph(c: &mut Criterion) {
    let points = generate_random_points(10_000, 314_159_265, 100_000.0);
    let mut mesh = Delaunay::new(&points).unwrap();
    mesh.triangulate();

    c.bench_function("export_graph_10000", |b| {
        b.iter(|| black_box(mesh.export_graph().len()));
    });
}

criterion_group!(
    benches,
    bench_triangulate,
    bench_constrained_carve,
    bench_export_graph
);
criterion_main!(benches);
