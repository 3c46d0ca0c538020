use criterion::{black_box, criterion_group, criterion_main, Criterion};
use nettool_subnet::{calculate, SubnetInput};

fn benchmark_calculate(c: &mut Criterion) {
    c.bench_function("subnet_calculate_text", |b| {
        b.iter(|| calculate(black_box("192.168.1.10"), black_box("24")))
    });

    let input: SubnetInput = "10.0.0.5/8".parse().expect("valid input");
    c.bench_function("subnet_calculate_parsed", |b| {
        b.iter(|| black_box(input).calculate())
    });
}

criterion_group!(benches, benchmark_calculate);
criterion_main!(benches);
