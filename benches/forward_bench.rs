use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use gravmag::{
    grid_coordinates, point_gravity, scatter_points, CoordinateSystem, GravityField, Region,
};

fn bench_point_gravity(c: &mut Criterion) {
    let region = Region::new(-10e3, 10e3, -10e3, 10e3).unwrap();
    let coordinates = grid_coordinates(&region, 200.0, 100.0).unwrap();

    let mut group = c.benchmark_group("point_gravity_g_z");
    for n_sources in [10, 100, 1000] {
        let sources = scatter_points(&region, n_sources, -2e3, 42).unwrap();
        let masses = vec![1e9; n_sources];
        for parallel in [false, true] {
            let label = if parallel { "parallel" } else { "serial" };
            group.bench_with_input(BenchmarkId::new(label, n_sources), &n_sources, |b, _| {
                b.iter(|| {
                    point_gravity(
                        black_box(&coordinates),
                        black_box(&sources),
                        black_box(&masses),
                        GravityField::GZ,
                        CoordinateSystem::Cartesian,
                        parallel,
                    )
                    .unwrap()
                })
            });
        }
    }
    group.finish();
}

criterion_group!(benches, bench_point_gravity);
criterion_main!(benches);
