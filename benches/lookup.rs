use criterion::{criterion_group, criterion_main, Criterion};
use rand::seq::IndexedRandom;
use static_table::{Config, StaticTable};

fn lookup_hit(c: &mut Criterion) {
    for item_count in [100, 1_000, 100_000] {
        let keys = (0..item_count)
            .map(|_| nanoid::nanoid!())
            .collect::<Vec<_>>();

        let table = keys
            .iter()
            .enumerate()
            .map(|(idx, key)| (key.as_str(), idx))
            .collect::<StaticTable<_, _>>();

        let mut rng = rand::rng();

        c.bench_function(&format!("lookup hit, {item_count} keys"), |b| {
            b.iter(|| {
                let key = keys.choose(&mut rng).unwrap();
                assert!(table.get(key.as_str()).is_some());
            });
        });
    }
}

fn lookup_miss(c: &mut Criterion) {
    let table = (0..100_000)
        .map(|idx| (nanoid::nanoid!(), idx))
        .collect::<StaticTable<_, _>>();

    c.bench_function("lookup miss, 100000 keys", |b| {
        b.iter(|| {
            let key = nanoid::nanoid!();
            assert!(table.get(key.as_str()).is_none());
        });
    });
}

fn lookup_collisions(c: &mut Criterion) {
    let keys = (0..10_000u64).collect::<Vec<_>>();

    for load_factor in [1.0, 4.0, 16.0] {
        let table = Config::new()
            .load_factor(load_factor)
            .min_load_factor(load_factor)
            .build(keys.iter().map(|&key| (key, key)))
            .unwrap();

        let mut rng = rand::rng();

        c.bench_function(
            &format!(
                "lookup hit, 10000 keys, {} slots per bucket",
                table.bucket_size()
            ),
            |b| {
                b.iter(|| {
                    let key = keys.choose(&mut rng).unwrap();
                    assert!(table.get(key).is_some());
                });
            },
        );
    }
}

criterion_group!(benches, lookup_hit, lookup_miss, lookup_collisions);
criterion_main!(benches);
