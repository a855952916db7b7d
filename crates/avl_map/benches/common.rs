use std::hint::black_box;
use std::time::{Duration, Instant};

use avl_map::{AvlMap, OrderedMap, StdBTreeMap};
use bench::{apply_medium_runtime_config, apply_small_runtime_config, default_rng, distinct_keys};
use criterion::measurement::Measurement;
use criterion::{BenchmarkGroup, BenchmarkId};
use rand::Rng;

const SIZES: [usize; 4] = [1_000, 16_000, 64_000, 256_000];
const OPS_PER_ITER: usize = 200;
const GET_HIT_RATE_PERCENT: u64 = 80;
const KEY_BITS: u32 = 48;

enum Op {
    Get { key: u64 },
    LowerBound { key: u64 },
    Insert { key: u64, value: u64 },
    Remove { key: u64 },
}

fn populate<M: OrderedMap<Key = u64, Value = u64>>(keys: &[u64]) -> M {
    let mut map = M::new();
    for &k in keys {
        black_box(map.insert(k, k ^ 0xFF));
    }
    map
}

fn read_ops<R: Rng>(keys: &[u64], rng: &mut R) -> Vec<Op> {
    (0..OPS_PER_ITER)
        .map(|_| {
            let key = if rng.random_range(0..100) < GET_HIT_RATE_PERCENT {
                keys[rng.random_range(0..keys.len())]
            } else {
                rng.random()
            };
            if rng.random::<bool>() {
                Op::Get { key }
            } else {
                Op::LowerBound { key }
            }
        })
        .collect()
}

// Every inserted key is removed again within the batch, so the map size is stable.
fn update_ops<R: Rng>(rng: &mut R) -> Vec<Op> {
    let mut live = Vec::with_capacity(OPS_PER_ITER / 2);
    let mut ops = Vec::with_capacity(OPS_PER_ITER);
    for i in 0..OPS_PER_ITER {
        if i % 2 == 0 {
            // Top bit set keeps fresh keys disjoint from the populated ones.
            let key = rng.random::<u64>() | 1 << 63;
            live.push(key);
            ops.push(Op::Insert { key, value: key });
        } else {
            let key = live.swap_remove(rng.random_range(0..live.len()));
            ops.push(Op::Remove { key });
        }
    }
    ops
}

fn run_ops<M: OrderedMap<Key = u64, Value = u64>>(map: &mut M, ops: &[Op]) {
    for op in ops {
        match *op {
            Op::Get { key } => {
                black_box(map.get(&key).copied());
            }
            Op::LowerBound { key } => {
                black_box(map.lower_bound(&key).map(|(k, v)| (*k, *v)));
            }
            Op::Insert { key, value } => {
                black_box(map.insert(key, value));
            }
            Op::Remove { key } => {
                black_box(map.remove(&key));
            }
        }
    }
}

fn bench_ops<M, T>(
    group: &mut BenchmarkGroup<'_, T>,
    label: &str,
    make_ops: fn(&[u64], &mut rand::rngs::StdRng) -> Vec<Op>,
) where
    T: Measurement<Value = Duration>,
    M: OrderedMap<Key = u64, Value = u64>,
{
    for &size in &SIZES {
        apply_small_runtime_config(group);
        let mut rng = default_rng();
        let keys = distinct_keys(&mut rng, size, KEY_BITS);
        let mut map = populate::<M>(&keys);

        group.bench_function(BenchmarkId::new(label, size), |bencher| {
            bencher.iter_custom(|iters| {
                let mut total = Duration::ZERO;
                for _ in 0..iters {
                    let ops = make_ops(&keys, &mut rng);
                    let start = Instant::now();
                    run_ops(&mut map, &ops);
                    black_box(map.len());
                    total += start.elapsed();
                }
                total
            })
        });
    }
}

pub fn bench_all_read<T>(group: &mut BenchmarkGroup<'_, T>)
where
    T: Measurement<Value = Duration>,
{
    bench_ops::<StdBTreeMap<u64, u64>, _>(group, "std_btree", read_ops);
    bench_ops::<AvlMap<u64, u64>, _>(group, "avl", read_ops);
}

pub fn bench_all_update<T>(group: &mut BenchmarkGroup<'_, T>)
where
    T: Measurement<Value = Duration>,
{
    let ops = |_: &[u64], rng: &mut rand::rngs::StdRng| update_ops(rng);
    bench_ops::<StdBTreeMap<u64, u64>, _>(group, "std_btree", ops);
    bench_ops::<AvlMap<u64, u64>, _>(group, "avl", ops);
}

/// Sorted input: plain inserts against end-hinted inserts.
pub fn bench_build<T>(group: &mut BenchmarkGroup<'_, T>)
where
    T: Measurement<Value = Duration>,
{
    apply_medium_runtime_config(group);
    for &size in &SIZES {
        let mut keys = distinct_keys(&mut default_rng(), size, KEY_BITS);
        keys.sort_unstable();

        group.bench_function(BenchmarkId::new("insert", size), |bencher| {
            bencher.iter(|| {
                let mut map = AvlMap::new();
                for &k in &keys {
                    map.insert(k, k);
                }
                black_box(map.len())
            })
        });

        group.bench_function(BenchmarkId::new("insert_hint", size), |bencher| {
            bencher.iter(|| {
                let mut map = AvlMap::new();
                for &k in &keys {
                    let end = map.end();
                    map.insert_hint(end, k, k);
                }
                black_box(map.len())
            })
        });
    }
}

/// In-order walk: the borrowing iterator against stepping positions by hand.
pub fn bench_scan<T>(group: &mut BenchmarkGroup<'_, T>)
where
    T: Measurement<Value = Duration>,
{
    apply_small_runtime_config(group);
    for &size in &SIZES {
        let keys = distinct_keys(&mut default_rng(), size, KEY_BITS);
        let map: AvlMap<u64, u64> = keys.iter().map(|&k| (k, k)).collect();

        group.bench_function(BenchmarkId::new("iter", size), |bencher| {
            bencher.iter(|| black_box(map.values().fold(0_u64, |acc, v| acc.wrapping_add(*v))))
        });

        group.bench_function(BenchmarkId::new("positions", size), |bencher| {
            bencher.iter(|| {
                let mut acc = 0_u64;
                let mut pos = map.begin();
                while let Some((_, v)) = map.entry_at(pos) {
                    acc = acc.wrapping_add(*v);
                    pos = map.next_position(pos);
                }
                black_box(acc)
            })
        });
    }
}
