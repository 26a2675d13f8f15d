use core::hint::black_box;
use criterion::{BatchSize, Criterion, Throughput, criterion_group, criterion_main};
use partseq::{
    Allocator, AllocatorConfig, MemoryLog, MemoryStore, Partition, Record, SaveEvent, Variant,
    highest_sequence,
};

// Number of already-assigned records the scan walks through.
const EXISTING: usize = 10_000;
const SITES: usize = 20;

fn existing_ids() -> Vec<String> {
    (0..EXISTING)
        .map(|n| {
            let site = 1000 + n % SITES;
            let seq = n / SITES % 999 + 1;
            if n % 3 == 0 {
                format!("{site}-{seq:03}-NC")
            } else {
                format!("{site}-{seq:03}")
            }
        })
        .collect()
}

fn seeded_store(ids: &[String]) -> MemoryStore {
    let store = MemoryStore::new("record_id");
    for (n, id) in ids.iter().enumerate() {
        store.insert(Record::from_iter([
            ("record_id", n.to_string()),
            ("test", id[..4].to_owned()),
            ("patient_status_2", "1".to_owned()),
            ("unique_id_2", id.clone()),
        ]));
    }
    store.insert(Record::from_iter([
        ("record_id", "new"),
        ("test", "1007"),
        ("patient_status_2", "1"),
    ]));
    store
}

fn bench_scan(c: &mut Criterion) {
    let ids = existing_ids();
    let partition = Partition::new("1007", Variant::Primary);

    let mut group = c.benchmark_group("scan");
    group.throughput(Throughput::Elements(EXISTING as u64));
    group.bench_function(format!("elems/{EXISTING}"), |b| {
        b.iter(|| black_box(highest_sequence(ids.iter().map(String::as_str), &partition)));
    });
    group.finish();
}

fn bench_allocate(c: &mut Criterion) {
    let ids = existing_ids();

    let mut group = c.benchmark_group("allocate");
    group.throughput(Throughput::Elements(1));
    group.bench_function(format!("existing/{EXISTING}"), |b| {
        b.iter_batched(
            || seeded_store(&ids),
            |store| {
                let allocator = Allocator::new(&store, MemoryLog::new(), AllocatorConfig::default());
                black_box(allocator.try_allocate(&SaveEvent::new("new", "1")).unwrap());
            },
            BatchSize::LargeInput,
        );
    });
    group.finish();
}

criterion_group!(benches, bench_scan, bench_allocate);
criterion_main!(benches);
