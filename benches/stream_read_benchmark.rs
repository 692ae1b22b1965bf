use criterion::{black_box, criterion_group, criterion_main, Criterion, BenchmarkId};
use pirstream::core::config::Config;
use pirstream::core::database::StreamDatabase;
use pirstream::core::types::StreamId;
use rand::{Rng, SeedableRng};
use rand::rngs::StdRng;
use std::fs;
use std::path::Path;

const STREAM_COUNT: u64 = 256;
const FILE_SIZE: usize = 16 * 1024;

// Every other stream is real, with random sizes up to FILE_SIZE
fn create_test_database(dir: &Path) {
    let mut rng = StdRng::seed_from_u64(0);
    for i in (0..STREAM_COUNT).step_by(2) {
        let len = rng.gen_range(1..=FILE_SIZE);
        let mut content = vec![0u8; len];
        rng.fill(&mut content[..]);
        fs::write(dir.join(i.to_string()), content).unwrap();
    }
}

fn bench_stream_reads(c: &mut Criterion) {
    let temp_dir = tempfile::tempdir().unwrap();
    create_test_database(temp_dir.path());
    let db = StreamDatabase::open(Config::new(temp_dir.path(), STREAM_COUNT)).unwrap();

    let mut group = c.benchmark_group("stream_read");

    group.bench_function("real", |b| {
        b.iter(|| {
            let data = db.read_stream_at(StreamId(0), 0, FILE_SIZE).unwrap();
            black_box(data);
        });
    });

    group.bench_function("fake", |b| {
        b.iter(|| {
            let data = db.read_stream_at(StreamId(1), 0, FILE_SIZE).unwrap();
            black_box(data);
        });
    });

    group.finish();
}

fn bench_aggregated_reads(c: &mut Criterion) {
    let temp_dir = tempfile::tempdir().unwrap();
    create_test_database(temp_dir.path());
    let db = StreamDatabase::open(Config::new(temp_dir.path(), STREAM_COUNT)).unwrap();

    let mut group = c.benchmark_group("aggregated_read");

    for alpha in [1u64, 4, 16] {
        let groups: Vec<u64> = (0..STREAM_COUNT.div_ceil(alpha)).collect();

        group.bench_with_input(BenchmarkId::new("sequential", alpha), &alpha, |b, &alpha| {
            b.iter(|| {
                for &g in &groups {
                    let data = db
                        .aggregated_reader()
                        .read_aggregated_stream_vec(g, alpha, 0, FILE_SIZE as u64)
                        .unwrap();
                    black_box(data);
                }
            });
        });

        group.bench_with_input(BenchmarkId::new("parallel", alpha), &alpha, |b, &alpha| {
            b.iter(|| {
                let data = db.read_groups(&groups, alpha, 0, FILE_SIZE as u64).unwrap();
                black_box(data);
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_stream_reads, bench_aggregated_reads);
criterion_main!(benches);
