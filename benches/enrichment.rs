use chrono::NaiveDate;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use paca_climate::dataset::artifact::write_csv;
use paca_climate::dataset::frames::records_to_frame;
use paca_climate::{enrich, DateRange, Location, ProcessedLazyFrame, RawObservation, TrendWindow};

fn decade() -> Vec<RawObservation> {
    let range = DateRange::new(
        NaiveDate::from_ymd_opt(2013, 1, 1).unwrap(),
        NaiveDate::from_ymd_opt(2023, 12, 31).unwrap(),
    )
    .unwrap();
    Location::paca_region()
        .iter()
        .flat_map(|location| {
            range.days().enumerate().map(move |(i, date)| {
                let seasonal = (i % 365) as f64 / 365.0 * 20.0;
                RawObservation {
                    location: location.name.clone(),
                    date,
                    temp_min: Some(2.0 + seasonal),
                    temp_max: (i % 97 != 0).then_some(12.0 + seasonal),
                    precipitation: Some((i % 13) as f64),
                    wind: Some(18.0),
                }
            })
        })
        .collect()
}

fn bench_enrichment(c: &mut Criterion) {
    let observations = decade();
    c.bench_function("enrich_paca_decade", |b| {
        b.iter(|| enrich(black_box(observations.clone()), TrendWindow::default()))
    });

    let records = enrich(observations, TrendWindow::default()).unwrap().records;
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("processed.csv");
    let runtime = tokio::runtime::Runtime::new().unwrap();
    c.bench_function("processed_artifact_round_trip", |b| {
        b.to_async(&runtime).iter(|| async {
            write_csv(records_to_frame(&records).unwrap(), &path)
                .await
                .unwrap();
            ProcessedLazyFrame::load(&path).await.unwrap()
        })
    });
}

criterion_group!(benches, bench_enrichment);
criterion_main!(benches);
