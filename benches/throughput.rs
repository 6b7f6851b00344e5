use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use tempfile::TempDir;

use calclog::{
    dispatch::Calculator,
    persist::Destination,
    types::Operand,
};

fn filled(n: i64) -> Calculator {
    let mut calc = Calculator::new();
    for i in 0..n {
        let _ = calc.execute_command("add", &[Operand::Int(i), Operand::Int(i + 1)]);
    }
    calc
}

fn bench_dispatch(c: &mut Criterion) {
    c.bench_function("dispatch_add_50k", |b| {
        b.iter(|| filled(50_000));
    });
}

fn bench_undo(c: &mut Criterion) {
    c.bench_function("dispatch_undo_10k", |b| {
        b.iter(|| {
            let mut calc = filled(10_000);
            for _ in 0..10_000 {
                let _ = calc.execute_command("undo", &[]);
            }
        });
    });
}

fn bench_save_load(c: &mut Criterion) {
    let mut group = c.benchmark_group("save_load");
    let tmp = TempDir::new().expect("tmp");
    let calc = filled(10_000);

    for dest in [
        Destination::json(tmp.path().join("bench.json")),
        Destination::sqlite(tmp.path().join("bench.db")),
    ] {
        group.bench_with_input(BenchmarkId::from_parameter(dest.format), &dest, |b, dest| {
            let mut history = calc.history().clone();
            b.iter(|| {
                history.save(dest).expect("save");
                history.load(dest).expect("load");
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_dispatch, bench_undo, bench_save_load);
criterion_main!(benches);
