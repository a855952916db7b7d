use std::time::Duration;

use criterion::BenchmarkGroup;
use criterion::measurement::Measurement;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

const SMALL_RUNTIME_SAMPLE_SIZE: usize = 15;
const SMALL_RUNTIME_WARM_UP_MS: u64 = 100;
const SMALL_RUNTIME_MEASURE_MS: u64 = 200;
const MEDIUM_RUNTIME_SAMPLE_SIZE: usize = 15;
const MEDIUM_RUNTIME_WARM_UP_MS: u64 = 500;
const MEDIUM_RUNTIME_MEASURE_MS: u64 = 1000;
const RNG_SEED: u64 = 0x5EED_2026;

pub fn apply_small_runtime_config<M: Measurement>(group: &mut BenchmarkGroup<'_, M>) {
    group.sample_size(SMALL_RUNTIME_SAMPLE_SIZE);
    group.warm_up_time(Duration::from_millis(SMALL_RUNTIME_WARM_UP_MS));
    group.measurement_time(Duration::from_millis(SMALL_RUNTIME_MEASURE_MS));
}

/// For workloads that rebuild a whole map per iteration.
pub fn apply_medium_runtime_config<M: Measurement>(group: &mut BenchmarkGroup<'_, M>) {
    group.sample_size(MEDIUM_RUNTIME_SAMPLE_SIZE);
    group.warm_up_time(Duration::from_millis(MEDIUM_RUNTIME_WARM_UP_MS));
    group.measurement_time(Duration::from_millis(MEDIUM_RUNTIME_MEASURE_MS));
}

pub fn default_rng() -> StdRng {
    StdRng::seed_from_u64(RNG_SEED)
}

/// `n` distinct keys in random order, each with exactly `bits` significant bits.
///
/// # Panics
///
/// Panics if fewer than `n` values have exactly `bits` significant bits.
pub fn distinct_keys<R: Rng + ?Sized>(rng: &mut R, n: usize, bits: u32) -> Vec<u64> {
    let available = if bits == 0 {
        1
    } else {
        1_u128 << (bits.min(64) - 1)
    };
    assert!(
        n as u128 <= available,
        "only {available} distinct {bits}-bit keys, {n} requested"
    );
    let mut keys: Vec<u64> = (0..n).map(|_| random_with_bits(rng, bits)).collect();
    keys.sort_unstable();
    keys.dedup();
    while keys.len() < n {
        let extra = random_with_bits(rng, bits);
        if let Err(at) = keys.binary_search(&extra) {
            keys.insert(at, extra);
        }
    }
    keys.shuffle(rng);
    keys
}

pub fn random_with_bits<R: Rng + ?Sized>(rng: &mut R, bits: u32) -> u64 {
    if bits == 0 {
        return 0;
    }

    let high_bit = (bits - 1).min(63);
    let min = 1_u64 << high_bit;
    let max = if bits >= 64 {
        u64::MAX
    } else {
        (1_u64 << bits) - 1
    };
    rng.random_range(min..=max)
}
