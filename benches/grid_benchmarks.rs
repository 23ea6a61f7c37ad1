use criterion::{Criterion, black_box, criterion_group, criterion_main};
use fogmap::{ExplorationGrid, Point, Rect, projection};

fn build_explored_city(grid: &mut ExplorationGrid) {
    // A dense grid walk over ~2 km x 2 km
    for i in 0..60 {
        for j in 0..60 {
            let fix = Point::new(5.0 + i as f64 * 0.0005, 52.0 + j as f64 * 0.0003);
            grid.reveal_with_min_move(&fix, 0.0);
        }
    }
}

fn bench_reveal(c: &mut Criterion) {
    c.bench_function("reveal_moving_fix", |b| {
        let mut grid = ExplorationGrid::memory().unwrap();
        let mut i = 0u64;
        b.iter(|| {
            let fix = Point::new(5.0 + i as f64 * 0.0002, 52.0);
            i += 1;
            black_box(grid.reveal_with_min_move(&fix, 0.0))
        });
    });
}

fn bench_display_cells(c: &mut Criterion) {
    let mut grid = ExplorationGrid::memory().unwrap();
    build_explored_city(&mut grid);

    let (x, y) = projection::project(&Point::new(5.015, 52.009));
    let viewport = Rect::new((x - 2500.0, y - 2500.0), (x + 2500.0, y + 2500.0));

    let mut group = c.benchmark_group("display_cells");
    for mpp in [1.0, 20.0, 500.0] {
        group.bench_function(format!("mpp_{mpp}"), |b| {
            b.iter(|| black_box(grid.display_cells(black_box(&viewport), mpp, None)))
        });
    }
    group.finish();
}

fn bench_is_explored(c: &mut Criterion) {
    let mut grid = ExplorationGrid::memory().unwrap();
    build_explored_city(&mut grid);

    c.bench_function("is_explored", |b| {
        let inside = Point::new(5.01, 52.005);
        b.iter(|| black_box(grid.is_explored(black_box(&inside))))
    });
}

criterion_group!(benches, bench_reveal, bench_display_cells, bench_is_explored);
criterion_main!(benches);
