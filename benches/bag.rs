use criterion::{black_box, criterion_group, criterion_main, Criterion};
use nars::bag::{EvictionPolicy, PriorityBag};
use nars::budget::Budget;
use nars::stamp::OccurrenceTime;
use nars::task::Task;
use nars::term::TermFactory;
use nars::truth::Truth;

fn churn(c: &mut Criterion) {
    let factory = TermFactory::new();
    let tasks: Vec<Task> = (0..256)
        .map(|i| {
            Task::belief(
                factory.atom(&format!("t{}", i)),
                Truth::default_judgment(),
                OccurrenceTime::Eternal,
                0,
            )
            .with_budget(Budget::new((i % 100) as f32 / 100.0, 0.5, 0.5))
        })
        .collect();

    c.bench_function("bag_add_churn_64", |b| {
        b.iter(|| {
            let mut bag = PriorityBag::new(64, EvictionPolicy::Priority);
            for task in &tasks {
                bag.add(black_box(task.clone()));
            }
            black_box(bag.len())
        })
    });

    c.bench_function("bag_select_and_decay", |b| {
        let mut bag = PriorityBag::new(64, EvictionPolicy::Priority);
        for task in &tasks {
            bag.add(task.clone());
        }
        b.iter(|| {
            let top = bag.select();
            bag.apply_decay(0.01);
            black_box(top)
        })
    });
}

criterion_group!(benches, churn);
criterion_main!(benches);
