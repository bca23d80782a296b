use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use auditlog::{AuditParser, LineParser, ParserConfig, ParserRegistry};

const SAMPLE_LINES: [&str; 3] = [
    "type=SYSCALL msg=audit(1364481363.243:24287): arch=c000003e syscall=2 success=no exit=-13 a0=7fffd19c5592 a1=0 a2=7fffd19c4b50 a3=a items=1 ppid=2686 pid=3538 auid=500 uid=500",
    "type=USER_AUTH msg=audit(1364481363.243:24288): pid=3538 uid=0 auid=500 ses=1 msg='op=PAM:authentication acct=\"shadowman\" exe=\"/usr/bin/sudo\" res=success'",
    "type=PATH msg=audit(1364481363.243:24287): item=0 name=\"/etc/ssh/sshd_config\" inode=409248 dev=fd:00 mode=0100600 ouid=0 ogid=0 dev=system_u:object_r:etc_t:s0",
];

fn build_batch(size: usize) -> Vec<String> {
    SAMPLE_LINES
        .iter()
        .cycle()
        .take(size)
        .map(|line| line.to_string())
        .collect()
}

fn bench_tokenize_line(c: &mut Criterion) {
    let parser = AuditParser::new();
    let mut group = c.benchmark_group("tokenize_line");
    for (name, line) in ["syscall", "sub_message", "collision"].iter().zip(SAMPLE_LINES) {
        group.bench_function(*name, |b| {
            b.iter(|| black_box(parser.parse_line(black_box(line))));
        });
    }
    group.finish();
}

fn bench_batch_workers(c: &mut Criterion) {
    let batch = build_batch(10_000);
    let mut group = c.benchmark_group("batch_workers");
    group.throughput(Throughput::Elements(batch.len() as u64));

    for workers in [1usize, 2, 4, 8] {
        let parser = ParserRegistry::with_defaults()
            .create(&ParserConfig {
                parallelism: Some(workers),
                ..Default::default()
            })
            .unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(workers), &batch, |b, batch| {
            b.iter(|| black_box(parser.parse_with_stats(black_box(batch))));
        });
    }
    group.finish();
}

criterion_group!(batch_parse_benches, bench_tokenize_line, bench_batch_workers);
criterion_main!(batch_parse_benches);
