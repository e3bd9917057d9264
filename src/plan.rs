// Copyright (c) 2024-present, fjall-rs
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

//! Table planning
//!
//! A plan decides the whole layout of a static table before any slot is allocated:
//!
//! 1. Every key is hashed once.
//! 2. Repeated keys are resolved according to the [`DuplicatePolicy`]. Two
//!    occurrences are only compared for equality if their hashes match.
//! 3. Starting at `live pairs / load_factor` buckets, the bucket count is grown
//!    one by one, tracking the largest bucket for each candidate. The search
//!    stops at the first collision-free bucket count, or when one more bucket
//!    would push the load factor below `min_load_factor`. Keys whose hashes
//!    are equal can never be separated, so their count is the best possible
//!    bucket size and the search stops once it is reached. The smallest
//!    maximum bucket size wins, ties go to the smaller bucket count.
//! 4. Every live pair is assigned to bucket `hash % bucket_count`.

use crate::{
    config::{Config, DuplicatePolicy},
    hash::{BytesHash, Fnv, KeyHash},
    HashMap,
};
use std::{marker::PhantomData, time::Instant};

/// Maps a key hash to its bucket.
#[expect(
    clippy::cast_possible_truncation,
    reason = "the remainder is smaller than bucket_count, which is a usize"
)]
pub(crate) fn bucket_position(hash: u64, bucket_count: usize) -> usize {
    (hash % bucket_count as u64) as usize
}

/// Precomputed layout of a static table
///
/// The hasher `H` is part of the type, so a plan can only be materialized
/// into a table that hashes lookups the same way.
pub struct Plan<H = Fnv> {
    /// Bucket of every input pair, `None` for duplicates
    assignments: Vec<Option<usize>>,

    bucket_count: usize,
    max_bucket_size: usize,
    element_count: usize,

    hasher: PhantomData<fn() -> H>,
}

impl<H: BytesHash> Plan<H> {
    /// Plans the layout for the given pairs.
    ///
    /// The order of `pairs` matters for duplicate resolution.
    ///
    /// # Errors
    ///
    /// Returns error if the config is invalid.
    pub fn new<K, V>(pairs: &[(K, V)], config: &Config) -> crate::Result<Self>
    where
        K: KeyHash + Eq,
    {
        config.validate()?;

        let start = Instant::now();

        let hashes = pairs
            .iter()
            .map(|(key, _)| key.key_hash::<H>())
            .collect::<Vec<_>>();

        let duplicates = find_duplicates(pairs, &hashes, config.duplicate_policy);

        let live_hashes = hashes
            .iter()
            .zip(&duplicates)
            .filter(|&(_, &duplicate)| !duplicate)
            .map(|(&hash, _)| hash)
            .collect::<Vec<_>>();

        let element_count = live_hashes.len();

        let (bucket_count, max_bucket_size) = search_bucket_count(&live_hashes, config);

        let assignments = hashes
            .iter()
            .zip(&duplicates)
            .map(|(&hash, &duplicate)| (!duplicate).then(|| bucket_position(hash, bucket_count)))
            .collect::<Vec<_>>();

        log::debug!(
            "Planned {element_count} live pairs ({} duplicates) into {bucket_count} buckets of {max_bucket_size} slots in {:?}",
            pairs.len() - element_count,
            start.elapsed(),
        );

        Ok(Self {
            assignments,
            bucket_count,
            max_bucket_size,
            element_count,
            hasher: PhantomData,
        })
    }
}

impl<H> Plan<H> {
    /// Returns the number of buckets.
    #[must_use]
    pub fn bucket_count(&self) -> usize {
        self.bucket_count
    }

    /// Returns the number of slots per bucket.
    #[must_use]
    pub fn max_bucket_size(&self) -> usize {
        self.max_bucket_size
    }

    /// Returns the number of live pairs, which is the number of distinct keys.
    #[must_use]
    pub fn element_count(&self) -> usize {
        self.element_count
    }

    /// Returns the number of planned input pairs, including duplicates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    /// Returns `true` if the plan was made for an empty input.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    /// Returns the number of input pairs that lost against another
    /// occurrence of their key.
    #[must_use]
    pub fn duplicate_count(&self) -> usize {
        self.len() - self.element_count
    }

    /// Returns `true` if the input pair at `idx` is a duplicate.
    #[must_use]
    pub fn is_duplicate(&self, idx: usize) -> bool {
        self.assignments.get(idx).is_some_and(Option::is_none)
    }

    /// Returns the bucket the input pair at `idx` is placed in,
    /// or `None` if it is a duplicate.
    #[must_use]
    pub fn bucket_index(&self, idx: usize) -> Option<usize> {
        self.assignments.get(idx).copied().flatten()
    }

    pub(crate) fn assignments(&self) -> &[Option<usize>] {
        &self.assignments
    }
}

impl<H> Clone for Plan<H> {
    fn clone(&self) -> Self {
        Self {
            assignments: self.assignments.clone(),
            bucket_count: self.bucket_count,
            max_bucket_size: self.max_bucket_size,
            element_count: self.element_count,
            hasher: PhantomData,
        }
    }
}

impl<H> PartialEq for Plan<H> {
    fn eq(&self, other: &Self) -> bool {
        self.bucket_count == other.bucket_count
            && self.max_bucket_size == other.max_bucket_size
            && self.element_count == other.element_count
            && self.assignments == other.assignments
    }
}

impl<H> Eq for Plan<H> {}

impl<H> std::fmt::Debug for Plan<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Plan")
            .field("bucket_count", &self.bucket_count)
            .field("max_bucket_size", &self.max_bucket_size)
            .field("element_count", &self.element_count)
            .field("assignments", &self.assignments)
            .finish()
    }
}

/// Marks every occurrence of a key except the one the policy keeps.
#[expect(
    clippy::indexing_slicing,
    reason = "all indexes come from enumerating `hashes`, which is as long as `pairs`"
)]
fn find_duplicates<K: Eq, V>(pairs: &[(K, V)], hashes: &[u64], policy: DuplicatePolicy) -> Vec<bool> {
    let mut duplicates = vec![false; pairs.len()];

    let mut groups: HashMap<u64, Vec<usize>> = HashMap::default();

    for (idx, &hash) in hashes.iter().enumerate() {
        groups.entry(hash).or_default().push(idx);
    }

    // NOTE: Keys can only be equal if their hashes are, so each group
    // is resolved on its own
    for indexes in groups.values().filter(|indexes| indexes.len() > 1) {
        let order = policy.scan_order(indexes);

        for (pos, &kept) in order.iter().enumerate() {
            if duplicates[kept] {
                continue;
            }

            for &other in &order[(pos + 1)..] {
                if !duplicates[other] && pairs[other].0 == pairs[kept].0 {
                    duplicates[other] = true;
                }
            }
        }
    }

    duplicates
}

/// Finds the bucket count with the smallest maximum bucket size.
///
/// Returns `(bucket_count, max_bucket_size)`.
#[expect(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "load factors are positive and pair counts are nowhere near 2^52"
)]
fn search_bucket_count(live_hashes: &[u64], config: &Config) -> (usize, usize) {
    let element_count = live_hashes.len();

    let mut bucket_count = ((element_count as f64 / config.load_factor) as usize).max(1);

    let mut best_bucket_count = bucket_count;
    let mut best_max_bucket_size = usize::MAX;

    // NOTE: Pairs sharing a hash share a bucket for every bucket count,
    // so no bucket can get smaller than the largest hash group
    let floor = largest_hash_group(live_hashes).max(1);

    let mut sizes = Vec::new();

    loop {
        let max_bucket_size = largest_bucket(live_hashes, bucket_count, &mut sizes);

        log::trace!("{bucket_count} buckets => largest bucket holds {max_bucket_size} pairs");

        if max_bucket_size < best_max_bucket_size {
            best_bucket_count = bucket_count;
            best_max_bucket_size = max_bucket_size;
        }

        if max_bucket_size <= floor {
            break;
        }

        bucket_count += 1;

        if (element_count as f64 / bucket_count as f64) < config.min_load_factor {
            log::trace!(
                "Load factor would drop below {}, accepting {best_max_bucket_size} pairs per bucket",
                config.min_load_factor,
            );
            break;
        }
    }

    // NOTE: Even an empty table has one (empty) slot
    (best_bucket_count, best_max_bucket_size.max(1))
}

fn largest_hash_group(live_hashes: &[u64]) -> usize {
    let mut groups: HashMap<u64, usize> = HashMap::default();

    for &hash in live_hashes {
        *groups.entry(hash).or_default() += 1;
    }

    groups.values().copied().max().unwrap_or_default()
}

fn largest_bucket(live_hashes: &[u64], bucket_count: usize, sizes: &mut Vec<usize>) -> usize {
    sizes.clear();
    sizes.resize(bucket_count, 0);

    for &hash in live_hashes {
        if let Some(size) = sizes.get_mut(bucket_position(hash, bucket_count)) {
            *size += 1;
        }
    }

    sizes.iter().copied().max().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Murmur, Xxh3};
    use test_log::test;

    /// Distinct keys that all share one hash
    #[derive(Debug, PartialEq, Eq)]
    struct Colliding(u32);

    impl KeyHash for Colliding {
        fn key_hash<H: BytesHash>(&self) -> u64 {
            7
        }
    }

    fn reference_pairs() -> Vec<(&'static str, i32)> {
        vec![
            ("bsd", 1),
            ("holy", 2),
            ("", 3),
            ("duplicate", 4),
            ("ac", 5),
            ("duplicate", 999),
            ("ab", 5),
        ]
    }

    #[test]
    fn plan_strings_collision_free() -> crate::Result<()> {
        let plan = Plan::<Fnv>::new(&reference_pairs(), &Config::default())?;

        assert_eq!(10, plan.bucket_count());
        assert_eq!(1, plan.max_bucket_size());
        assert_eq!(6, plan.element_count());
        assert_eq!(7, plan.len());
        assert_eq!(1, plan.duplicate_count());

        assert_eq!(Some(6), plan.bucket_index(0));
        assert_eq!(Some(3), plan.bucket_index(1));
        assert_eq!(Some(1), plan.bucket_index(2));
        assert_eq!(Some(9), plan.bucket_index(4));
        assert_eq!(Some(0), plan.bucket_index(6));

        Ok(())
    }

    #[test]
    fn plan_duplicate_last_wins() -> crate::Result<()> {
        let plan = Plan::<Fnv>::new(&reference_pairs(), &Config::default())?;

        assert!(plan.is_duplicate(3));
        assert!(!plan.is_duplicate(5));
        assert_eq!(None, plan.bucket_index(3));
        assert_eq!(Some(8), plan.bucket_index(5));

        Ok(())
    }

    #[test]
    fn plan_duplicate_first_wins() -> crate::Result<()> {
        let config = Config::new().duplicate_policy(DuplicatePolicy::FirstWins);
        let plan = Plan::<Fnv>::new(&reference_pairs(), &config)?;

        assert!(!plan.is_duplicate(3));
        assert!(plan.is_duplicate(5));
        assert_eq!(Some(8), plan.bucket_index(3));
        assert_eq!(None, plan.bucket_index(5));

        // NOTE: The policy only decides which value is kept, never the layout
        let last_wins = Plan::<Fnv>::new(&reference_pairs(), &Config::default())?;
        assert_eq!(last_wins.bucket_count(), plan.bucket_count());
        assert_eq!(last_wins.max_bucket_size(), plan.max_bucket_size());
        assert_eq!(last_wins.element_count(), plan.element_count());

        Ok(())
    }

    #[test]
    fn plan_repeated_key_many_times() -> crate::Result<()> {
        let pairs = [(1u32, 'a'), (1, 'b'), (2, 'c'), (1, 'd')];

        let plan = Plan::<Fnv>::new(&pairs, &Config::default())?;
        assert_eq!(2, plan.element_count());
        assert_eq!(
            [true, true, false, false],
            [0, 1, 2, 3].map(|idx| plan.is_duplicate(idx)),
        );

        let config = Config::new().duplicate_policy(DuplicatePolicy::FirstWins);
        let plan = Plan::<Fnv>::new(&pairs, &config)?;
        assert_eq!(2, plan.element_count());
        assert_eq!(
            [false, true, false, true],
            [0, 1, 2, 3].map(|idx| plan.is_duplicate(idx)),
        );

        Ok(())
    }

    #[test]
    fn plan_tuple_payloads() -> crate::Result<()> {
        let pairs = [
            ("Eeny", (1, 2, 3)),
            ("meeny", (2, 1, 3)),
            ("miny", (3, 2, 1)),
            ("moe", (1, 3, 2)),
        ];

        let plan = Plan::<Fnv>::new(&pairs, &Config::default())?;

        assert_eq!(5, plan.bucket_count());
        assert_eq!(1, plan.max_bucket_size());
        assert_eq!(4, plan.element_count());

        Ok(())
    }

    #[test]
    fn plan_min_load_factor_forces_collisions() -> crate::Result<()> {
        let pairs = [
            ("Catch", 'c'),
            ("a tiger", 'a'),
            ("by the toe", 'b'),
            ("If he hollers, let him go", 'i'),
        ];

        let config = Config::new().load_factor(4.0).min_load_factor(2.0);
        let plan = Plan::<Fnv>::new(&pairs, &config)?;

        assert_eq!(2, plan.bucket_count());
        assert_eq!(3, plan.max_bucket_size());
        assert_eq!(4, plan.element_count());

        Ok(())
    }

    #[test]
    fn plan_integer_keys() -> crate::Result<()> {
        let pairs = [(4_096, (1, 'q')), (2_048, (2, 'w')), (8_192, (3, 'e')), (1_024, (4, 'r'))];

        let plan = Plan::<Fnv>::new(&pairs, &Config::default())?;

        assert_eq!(5, plan.bucket_count());
        assert_eq!(1, plan.max_bucket_size());
        assert_eq!(
            [Some(1), Some(3), Some(2), Some(4)],
            [0, 1, 2, 3].map(|idx| plan.bucket_index(idx)),
        );

        Ok(())
    }

    #[test]
    fn plan_same_hash_is_not_duplicate() -> crate::Result<()> {
        let pairs = [(Colliding(1), ()), (Colliding(2), ()), (Colliding(3), ()), (Colliding(4), ())];

        let plan = Plan::<Fnv>::new(&pairs, &Config::default())?;

        assert_eq!(4, plan.element_count());
        assert_eq!(0, plan.duplicate_count());

        // NOTE: No bucket count can separate them, so the first one tried is kept
        assert_eq!(4, plan.bucket_count());
        assert_eq!(4, plan.max_bucket_size());

        Ok(())
    }

    #[test]
    fn plan_shared_hash_with_repeated_keys() -> crate::Result<()> {
        let pairs = [(Colliding(1), 'a'), (Colliding(2), 'b'), (Colliding(1), 'c')];

        let plan = Plan::<Fnv>::new(&pairs, &Config::default())?;
        assert_eq!(2, plan.element_count());
        assert_eq!(
            [true, false, false],
            [0, 1, 2].map(|idx| plan.is_duplicate(idx)),
        );
        assert_eq!(2, plan.bucket_count());
        assert_eq!(2, plan.max_bucket_size());

        let config = Config::new().duplicate_policy(DuplicatePolicy::FirstWins);
        let first_wins = Plan::<Fnv>::new(&pairs, &config)?;
        assert_eq!(
            [false, false, true],
            [0, 1, 2].map(|idx| first_wins.is_duplicate(idx)),
        );

        let table = crate::StaticTable::build(pairs.into(), &plan);
        assert_eq!(Some(&'c'), table.get(&Colliding(1)));
        assert_eq!(Some(&'b'), table.get(&Colliding(2)));
        assert_eq!(None, table.get(&Colliding(3)));

        Ok(())
    }

    #[test]
    fn plan_search_stops_at_shared_hash() -> crate::Result<()> {
        let pairs = (0..50).map(|x| (Colliding(x), ())).collect::<Vec<_>>();

        let config = Config::new().min_load_factor(Config::MIN_RATIO);
        let plan = Plan::<Fnv>::new(&pairs, &config)?;

        assert_eq!(50, plan.bucket_count());
        assert_eq!(50, plan.max_bucket_size());

        Ok(())
    }

    #[test]
    fn plan_rejects_tiny_load_factors() {
        let pairs = [(1u32, 1u32), (2, 2)];

        assert_eq!(
            Err(crate::Error::InvalidLoadFactor(1e-300)),
            Plan::<Fnv>::new(&pairs, &Config::new().load_factor(1e-300)),
        );
        assert_eq!(
            Err(crate::Error::InvalidLoadFactor(1e-12)),
            Plan::<Fnv>::new(&pairs, &Config::new().load_factor(1e-12)),
        );
        assert_eq!(
            Err(crate::Error::InvalidMinLoadFactor(1e-300)),
            Plan::<Fnv>::new(&pairs, &Config::new().min_load_factor(1e-300)),
        );
    }

    #[test]
    fn plan_smallest_ratio_is_bounded() -> crate::Result<()> {
        let pairs = (0..100u64).map(|x| (x, x)).collect::<Vec<_>>();

        let config = Config::new()
            .load_factor(Config::MIN_RATIO)
            .min_load_factor(Config::MIN_RATIO);
        let plan = Plan::<Fnv>::new(&pairs, &config)?;

        assert_eq!(6_400, plan.bucket_count());
        assert_eq!(1, plan.max_bucket_size());

        Ok(())
    }

    #[test]
    fn plan_empty_input() -> crate::Result<()> {
        let pairs: [(u32, u32); 0] = [];

        let plan = Plan::<Fnv>::new(&pairs, &Config::default())?;

        assert!(plan.is_empty());
        assert_eq!(1, plan.bucket_count());
        assert_eq!(1, plan.max_bucket_size());
        assert_eq!(0, plan.element_count());
        assert_eq!(None, plan.bucket_index(0));
        assert!(!plan.is_duplicate(0));

        Ok(())
    }

    #[test]
    fn plan_invalid_config() {
        let pairs = [(1u8, 1u8)];

        assert_eq!(
            Err(crate::Error::InvalidLoadFactor(0.0)),
            Plan::<Fnv>::new(&pairs, &Config::new().load_factor(0.0)),
        );
        assert_eq!(
            Err(crate::Error::InvalidMinLoadFactor(-1.0)),
            Plan::<Fnv>::new(&pairs, &Config::new().min_load_factor(-1.0)),
        );
    }

    #[test]
    fn plan_assignment_is_hash_modulo() -> crate::Result<()> {
        let keys = (0..500).map(|x| format!("key-{x}")).collect::<Vec<_>>();
        let pairs = keys.iter().map(|key| (key.as_str(), ())).collect::<Vec<_>>();

        let plan = Plan::<Murmur>::new(&pairs, &Config::default())?;

        for (idx, (key, ())) in pairs.iter().enumerate() {
            assert_eq!(
                Some(bucket_position(key.key_hash::<Murmur>(), plan.bucket_count())),
                plan.bucket_index(idx),
            );
        }

        Ok(())
    }

    #[test]
    fn plan_deterministic() -> crate::Result<()> {
        let keys = (0..1_000u64).map(|x| x * 31 + 7).collect::<Vec<_>>();
        let pairs = keys.iter().map(|&key| (key, key)).collect::<Vec<_>>();

        let config = Config::new().load_factor(0.8);

        assert_eq!(
            Plan::<Xxh3>::new(&pairs, &config)?,
            Plan::<Xxh3>::new(&pairs, &config)?,
        );

        Ok(())
    }
}
