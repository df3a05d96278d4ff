//! Grid and event-index build benchmarks.
//!
//! Run with:
//! ```sh
//! cargo bench -p dashcal-core --bench grid
//! ```

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use dashcal_core::calendar::{CalendarDate, EventIndex, EventRecord, GridBuilder, MonthCursor};

const EVENT_COUNTS: [usize; 3] = [0, 100, 5_000];

fn synthetic_events(count: usize) -> Vec<EventRecord> {
    (0..count)
        .map(|i| {
            let day = i % 28 + 1;
            let month = (i / 28) % 12 + 1;
            let status = if i % 2 == 0 { "Issue Date" } else { "Returning Date" };
            EventRecord::new(format!("{day:02}/{month:02}/2025"), status, format!("req-{i}"))
        })
        .collect()
}

fn bench_index_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("events.index");

    for count in EVENT_COUNTS {
        let records = synthetic_events(count);
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &records, |b, records| {
            b.iter(|| {
                let (index, skipped) = EventIndex::build(black_box(records));
                black_box((index.len(), skipped.len()))
            });
        });
    }

    group.finish();
}

fn bench_grid_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("grid.build");
    let today = CalendarDate::new(2025, 6, 24).expect("valid date");
    let cursor = MonthCursor::containing(today);

    for count in EVENT_COUNTS {
        let records = synthetic_events(count);
        let (index, _) = EventIndex::build(&records);
        group.bench_with_input(BenchmarkId::from_parameter(count), &index, |b, index| {
            b.iter(|| {
                let grid = GridBuilder::new(black_box(cursor), today)
                    .selected(Some(today))
                    .min_selectable(Some(today))
                    .events(index)
                    .build();
                black_box(grid.cells.len())
            });
        });
    }

    group.finish();
}

fn bench_year_of_grids(c: &mut Criterion) {
    let start = MonthCursor::new(2025, 0).expect("january");
    let today = start.first_day();
    c.bench_function("grid.build.year", |b| {
        b.iter(|| {
            (0..12)
                .map(|step| GridBuilder::new(start.step(step), today).build().cells.len())
                .sum::<usize>()
        });
    });
}

criterion_group!(benches, bench_index_build, bench_grid_build, bench_year_of_grids);
criterion_main!(benches);
