use avl_lsm::{Db, Options, OrderedMap};
use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use tempfile::tempdir;

fn shuffled_keys(n: i64) -> Vec<i64> {
    let mut keys: Vec<i64> = (0..n).collect();
    keys.shuffle(&mut StdRng::seed_from_u64(1));
    keys
}

fn ordered_map(c: &mut Criterion) {
    let keys = shuffled_keys(10_000);

    c.bench_function("ordered_map insert 10k", |b| {
        b.iter(|| {
            let mut map = OrderedMap::new();
            for &k in &keys {
                map.insert(k, k);
            }
            black_box(map.height())
        })
    });

    let mut map = OrderedMap::new();
    for &k in &keys {
        map.insert(k, k);
    }
    c.bench_function("ordered_map find 10k", |b| {
        b.iter(|| keys.iter().filter(|k| map.find(*k).is_some()).count())
    });
    c.bench_function("ordered_map iterate 10k", |b| b.iter(|| map.iter().count()));
}

fn engine(c: &mut Criterion) {
    let keys = shuffled_keys(2_000);

    c.bench_function("db insert 2k (max_height 6)", |b| {
        b.iter_batched(
            || {
                let dir = tempdir().unwrap();
                let db = Db::open(Options::new(dir.path()).max_height(6)).unwrap();
                (dir, db)
            },
            |(_dir, mut db)| {
                for &k in &keys {
                    db.insert(k, "value");
                }
                db.stats()
            },
            BatchSize::PerIteration,
        )
    });
}

criterion_group!(benches, ordered_map, engine);
criterion_main!(benches);
