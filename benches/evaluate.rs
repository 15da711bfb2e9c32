//! Benchmarks for function evaluation and record round-trips.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use stylefn::{
    AttrValue, Attributes, Colour, Function, FunctionOptions, InterpolationMode, StopTable,
    StyleValue,
};

fn camera_colour_ramp(stops: usize) -> StyleValue<Colour> {
    let table = StopTable::from_pairs((0..stops).map(|i| {
        let t = i as f32 / stops as f32;
        (i as f64, Colour::rgb(t, 1.0 - t, 0.5))
    }))
    .unwrap();
    StyleValue::function(
        Function::camera(
            InterpolationMode::Exponential,
            table,
            FunctionOptions::new().base(1.75),
        )
        .unwrap(),
    )
}

fn categorical_radius() -> StyleValue<f64> {
    let table = StopTable::from_pairs([
        ("park", 4.0),
        ("water", 2.0),
        ("building", 1.0),
        ("road", 3.0),
    ])
    .unwrap();
    StyleValue::function(
        Function::source(
            InterpolationMode::Categorical,
            "kind",
            table,
            FunctionOptions::new().default_value(1.5),
        )
        .unwrap(),
    )
}

fn composite_radius() -> StyleValue<f64> {
    let inner = |scale: f64| {
        StopTable::from_pairs([(0.0, 1.0 * scale), (100.0, 4.0 * scale)]).unwrap()
    };
    let outer = StopTable::from_pairs((0..20).map(|z| (z as f64, inner(1.0 + z as f64 / 10.0))))
        .unwrap();
    StyleValue::function(
        Function::composite(
            InterpolationMode::Exponential,
            "temp",
            outer,
            FunctionOptions::new().default_value(1.0),
        )
        .unwrap(),
    )
}

// -- Evaluation benchmarks --

fn bench_evaluate(c: &mut Criterion) {
    let mut group = c.benchmark_group("evaluate");

    let feature: Attributes = [
        ("kind".to_string(), AttrValue::from("water")),
        ("temp".to_string(), AttrValue::from(42.0)),
    ]
    .into_iter()
    .collect();
    let empty = Attributes::new();

    let small_ramp = camera_colour_ramp(4);
    group.bench_function("camera_exponential_small", |b| {
        b.iter(|| small_ramp.evaluate(black_box(2.5), &empty).unwrap())
    });

    let large_ramp = camera_colour_ramp(256);
    group.bench_function("camera_exponential_large", |b| {
        b.iter(|| large_ramp.evaluate(black_box(200.2), &empty).unwrap())
    });

    let categorical = categorical_radius();
    group.bench_function("source_categorical", |b| {
        b.iter(|| categorical.evaluate(black_box(12.0), &feature).unwrap())
    });

    let composite = composite_radius();
    group.bench_function("composite_exponential", |b| {
        b.iter(|| composite.evaluate(black_box(12.3), &feature).unwrap())
    });

    group.finish();
}

// -- Serialization benchmarks --

fn bench_records(c: &mut Criterion) {
    let mut group = c.benchmark_group("records");

    let composite = composite_radius();
    let record = composite.to_json();

    group.bench_function("encode_composite", |b| {
        b.iter(|| black_box(&composite).to_json())
    });

    group.bench_function("decode_composite", |b| {
        b.iter(|| StyleValue::<f64>::from_json(black_box(&record)).unwrap())
    });

    group.finish();
}

criterion_group!(benches, bench_evaluate, bench_records);
criterion_main!(benches);
