//! Dispatch benchmarks
//!
//! Measures the cost of one message through console, default file and
//! category file, and of the rollover index scan.

use std::fs;
use std::hint::black_box;
use std::io;

use catlog::{next_rollover_index, rollover_path, Config, LogDispatcher, Severity};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use tempfile::TempDir;

fn quiet_dispatcher(temp_dir: &TempDir) -> LogDispatcher {
    let config = Config {
        include_location: false,
        max_file_size_bytes: 64 * 1024 * 1024,
        ..Default::default()
    };
    let dispatcher = LogDispatcher::with_config(config).with_console_writer(io::sink());
    dispatcher.init(temp_dir.path(), "app").unwrap();
    dispatcher
}

fn bench_handle_message(c: &mut Criterion) {
    let mut group = c.benchmark_group("handle_message");
    group.throughput(Throughput::Elements(1));

    for category in ["app", "net"] {
        let temp_dir = TempDir::new().unwrap();
        let dispatcher = quiet_dispatcher(&temp_dir);

        group.bench_with_input(BenchmarkId::from_parameter(category), category, |b, category| {
            b.iter(|| {
                dispatcher
                    .handle_message(Severity::Info, black_box(category), None, black_box("connection lost"))
                    .unwrap();
            });
        });
    }

    group.finish();
}

fn bench_disabled(c: &mut Criterion) {
    let temp_dir = TempDir::new().unwrap();
    let dispatcher = quiet_dispatcher(&temp_dir);
    dispatcher.set_use_logs(false);

    c.bench_function("handle_message_disabled", |b| {
        b.iter(|| dispatcher.warning(black_box("net"), black_box("dropped")).unwrap());
    });
}

fn bench_next_rollover_index(c: &mut Criterion) {
    let mut group = c.benchmark_group("next_rollover_index");

    for existing in [0u32, 10, 100] {
        let temp_dir = TempDir::new().unwrap();
        for index in 1..=existing {
            fs::write(rollover_path(temp_dir.path(), "net", index), "").unwrap();
        }

        group.bench_with_input(BenchmarkId::from_parameter(existing), &existing, |b, _| {
            b.iter(|| next_rollover_index(black_box(temp_dir.path()), "net", 1000));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_handle_message, bench_disabled, bench_next_rollover_index);
criterion_main!(benches);
