use criterion::{black_box, criterion_group, criterion_main, Criterion};
use feature_engine::{derive, FeatureSpaceProjector, FlightQuery, RawFlightRecord};

fn bench_apply(c: &mut Criterion) {
    let projector = FeatureSpaceProjector::default();
    let queries: Vec<FlightQuery> = (0..1000u32)
        .map(|i| {
            let airline = if i % 2 == 0 { "Grupo LATAM" } else { "Sky Airline" };
            let flight_type = if i % 3 == 0 { "I" } else { "N" };
            FlightQuery::new(airline, flight_type, i64::from(i % 12 + 1))
        })
        .collect();

    c.bench_function("apply_batch_1000", |b| {
        b.iter(|| {
            for query in &queries {
                black_box(projector.apply(black_box(query)));
            }
        })
    });
}

fn bench_derive(c: &mut Criterion) {
    let record = RawFlightRecord {
        scheduled: "2017-07-20 20:30:00".to_string(),
        actual: "2017-07-20 20:47:00".to_string(),
        airline: "Grupo LATAM".to_string(),
        flight_type: "I".to_string(),
        month: 7,
    };

    c.bench_function("derive_record", |b| b.iter(|| derive(black_box(&record))));
}

criterion_group!(benches, bench_apply, bench_derive);
criterion_main!(benches);
