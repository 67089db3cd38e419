//! Benchmarks for chain invocation and scheduler submission.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use flowlink::{connect, filter, map, sink_fn, source_iter, Scheduler, SchedulerConfig};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

fn bench_chain_push(c: &mut Criterion) {
    c.bench_function("push_through_filter_map_sink", |b| {
        let total = Arc::new(AtomicI64::new(0));
        let acc = Arc::clone(&total);
        let mut chain = connect(
            connect(filter(|i: &i64| i % 2 == 0), map(|i: i64| i * 3)).unwrap(),
            sink_fn(move |i: i64| {
                acc.fetch_add(i, Ordering::Relaxed);
            }),
        )
        .unwrap();

        let mut i = 0i64;
        b.iter(|| {
            i += 1;
            chain.push(black_box(i)).unwrap();
        });
        black_box(total.load(Ordering::Relaxed));
    });
}

fn bench_chain_pull_all(c: &mut Criterion) {
    c.bench_function("pull_1k_elements", |b| {
        b.iter_with_setup(
            || {
                let data: Vec<i64> = (0..1024).collect();
                connect(
                    connect(source_iter(data), map(|i: i64| i + 1)).unwrap(),
                    sink_fn(|i: i64| {
                        black_box(i);
                    }),
                )
                .unwrap()
            },
            |mut chain| {
                chain.pull_all().unwrap();
            },
        );
    });
}

fn bench_scheduler_submit(c: &mut Criterion) {
    c.bench_function("submit_and_drain_256_tasks", |b| {
        b.iter(|| {
            let mut sched = Scheduler::new(SchedulerConfig::with_workers(4));
            for i in 0..256u32 {
                sched
                    .add_task(move || {
                        black_box(i);
                    })
                    .unwrap();
            }
            sched.stop();
        });
    });
}

criterion_group!(
    benches,
    bench_chain_push,
    bench_chain_pull_all,
    bench_scheduler_submit
);
criterion_main!(benches);
