#[macro_use]
extern crate criterion;
extern crate chaosgame;

use chaosgame::{presets, Canvas, ChaosRenderer, Rect};
use criterion::Criterion;

fn sierpinski(threads: usize) -> ChaosRenderer {
    ChaosRenderer::new(Rect::new(0.0, 0.0, 1.0, 1.0).unwrap(), presets::sierpinski())
        .unwrap()
        .with_iterations(50)
        .with_threads(threads)
}

fn single_thread(c: &mut Criterion) {
    c.bench_function("sierpinski 1000 samples, 1 thread", |b| {
        let renderer = sierpinski(1);
        let canvas = Canvas::new(256, 256).unwrap();
        b.iter(|| renderer.render(&canvas, 1000, 1).unwrap())
    });
}

fn all_threads(c: &mut Criterion) {
    c.bench_function("sierpinski 1000 samples, every cpu", |b| {
        let renderer = sierpinski(0);
        let canvas = Canvas::new(256, 256).unwrap();
        b.iter(|| renderer.render(&canvas, 1000, 1).unwrap())
    });
}

fn symmetric(c: &mut Criterion) {
    c.bench_function("demo 1000 samples, symmetry 6", |b| {
        let renderer = ChaosRenderer::new(Rect::new(-2.0, -2.0, 4.0, 4.0).unwrap(), presets::demo())
            .unwrap()
            .with_symmetry(6)
            .unwrap()
            .with_threads(1);
        let canvas = Canvas::new(256, 256).unwrap();
        b.iter(|| renderer.render(&canvas, 1000, 1).unwrap())
    });
}

criterion_group!(benches, single_thread, all_threads, symmetric);
criterion_main!(benches);
