// Run:
//   cargo bench --bench profile_reader -- --profile-time=5
//
// Display the results with:
//   ~/go/bin/pprof -http "0.0.0.0:8081" ./target/criterion/profile_reader\ dns/profile/profile.pb

use criterion::{criterion_group, criterion_main, Criterion};
use pdml_parser::{ParserConfig, PdmlReader};
use pprof::criterion::{Output, PProfProfiler};
use std::fs;

fn do_reader_packets(bytes: &[u8]) {
    let mut reader = PdmlReader::new(65536, bytes).expect("could not create reader");
    let num_packets = reader
        .packets(ParserConfig::default())
        .map(|p| p.expect("valid packet"))
        .count();
    assert_eq!(num_packets, 3);
}

fn profile_reader(c: &mut Criterion) {
    let bytes = fs::read("assets/dns.pdml").unwrap();
    c.bench_function("profile_reader dns", |b| {
        b.iter(|| do_reader_packets(&bytes))
    });
}

fn profiled() -> Criterion {
    Criterion::default().with_profiler(PProfProfiler::new(100, Output::Protobuf))
}

criterion_group! {
    name = benches;
    config = profiled();
    targets = profile_reader
}
criterion_main!(benches);
