use criterion::{Criterion, criterion_group, criterion_main};
use julibrot::{
    escape::{Complex, EscapeMode},
    palette::Ramp,
    software::{Raster, compute_set},
    view::{Extent, ViewState},
};
use std::hint::black_box;

fn criterion_benchmark(c: &mut Criterion) {
    let ramp = Ramp::default();
    let mut raster = Raster::new(Extent::new(800, 800));

    let view = ViewState::default();
    c.bench_function("[SOFTWARE] mandelbrot", |b| {
        b.iter(|| {
            compute_set(
                black_box(&mut raster),
                black_box(&ramp),
                black_box(&view),
                black_box(512),
                black_box(0),
                EscapeMode::Mandelbrot,
            );
        })
    });

    let view = ViewState::new(Complex::new(-0.8, 0.156), 0.25);
    c.bench_function("[SOFTWARE] julia", |b| {
        b.iter(|| {
            compute_set(
                black_box(&mut raster),
                black_box(&ramp),
                black_box(&view),
                black_box(512),
                black_box(0),
                EscapeMode::Julia,
            );
        })
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
