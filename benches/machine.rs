use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use vend_fsm::{Amount, Command, Item, ItemId, VendingMachine};

/// Generates command sequences for benchmarking.
///
/// Pattern per item (repeating):
/// 1. Collect the exact price
/// 2. Dispense, or cancel every `cancel_every`th sale
///
/// Cancelled items stay stocked, dispensed ones are gone.
pub struct CommandGenerator {
    next_item: ItemId,
    num_items: ItemId,
    cancel_every: u32,
    sales: u32,
    pending: Option<Command>,
}

impl CommandGenerator {
    pub fn new(num_items: ItemId, cancel_every: u32) -> Self {
        Self {
            next_item: 1,
            num_items,
            cancel_every,
            sales: 0,
            pending: None,
        }
    }
}

impl Iterator for CommandGenerator {
    type Item = Command;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(command) = self.pending.take() {
            return Some(command);
        }

        if self.next_item > self.num_items {
            return None;
        }

        let item = self.next_item;
        self.next_item += 1;
        self.sales += 1;

        self.pending = Some(
            if self.cancel_every > 0 && self.sales % self.cancel_every == 0 {
                Command::Cancel { item }
            } else {
                Command::Dispense { item }
            },
        );

        Some(Command::Collect {
            item,
            amount: price_of(item),
        })
    }
}

fn price_of(item: ItemId) -> Amount {
    Amount::from_cents(100 + (item % 50) as i64 * 25)
}

fn stocked(num_items: ItemId) -> VendingMachine {
    let mut machine = VendingMachine::new();
    for id in 1..=num_items {
        if let Ok(item) = Item::new(format!("item-{id}"), price_of(id)) {
            machine.stock(id, item);
        }
    }
    machine
}

fn bench_sales(c: &mut Criterion) {
    let mut group = c.benchmark_group("sales");

    for count in [10_000u32, 100_000, 1_000_000] {
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            b.iter_batched(
                || stocked(count),
                |mut machine| {
                    for command in CommandGenerator::new(count, 0) {
                        let _ = black_box(machine.apply(command));
                    }
                    machine
                },
                criterion::BatchSize::LargeInput,
            );
        });
    }

    group.finish();
}

fn bench_with_cancels(c: &mut Criterion) {
    let mut group = c.benchmark_group("with_cancels");

    // 100k sales, one in ten cancelled
    group.bench_function("100k_cancel_10pct", |b| {
        b.iter_batched(
            || stocked(100_000),
            |mut machine| {
                for command in CommandGenerator::new(100_000, 10) {
                    let _ = black_box(machine.apply(command));
                }
                machine
            },
            criterion::BatchSize::LargeInput,
        );
    });

    group.finish();
}

fn bench_rejections(c: &mut Criterion) {
    let mut group = c.benchmark_group("rejections");

    // Every command is rejected and the machine never leaves Ready
    group.bench_function("100k_dispense_before_payment", |b| {
        let mut machine = stocked(100);
        b.iter(|| {
            for item in 1..=100_000u32 {
                let _ = black_box(machine.apply(Command::Dispense {
                    item: item % 100 + 1,
                }));
            }
        });
    });

    group.finish();
}

criterion_group!(benches, bench_sales, bench_with_cancels, bench_rejections);
criterion_main!(benches);
