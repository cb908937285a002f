use criterion::{black_box, criterion_group, criterion_main, Criterion};
use msgpack_bench::datasets;
use msgpack_codec::{packb, unpackb, Options};

fn bench_packb(c: &mut Criterion) {
    let options = Options::SERIALIZE_NUMPY | Options::SERIALIZE_PYDANTIC;
    let mut group = c.benchmark_group("packb");
    for (name, value) in datasets(0) {
        group.bench_function(name, |b| {
            b.iter(|| packb(black_box(&value), options).map(|bytes| bytes.len()))
        });
    }
    group.finish();
}

fn bench_unpackb(c: &mut Criterion) {
    let mut group = c.benchmark_group("unpackb");
    for (name, value) in datasets(0).into_iter().filter(|(name, _)| *name == "dict") {
        let Ok(bytes) = packb(&value, Options::empty()) else {
            continue;
        };
        group.bench_function(name, |b| {
            b.iter(|| unpackb(black_box(&bytes), Options::empty()).is_ok())
        });
    }
    group.finish();
}

criterion_group!(benches, bench_packb, bench_unpackb);
criterion_main!(benches);
