// Copyright (c) 2025-present, fjall-rs
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

mod iter;


pub use iter::{Buckets, Iter, Slots};

use crate::{
    config::Config,
    hash::{BytesHash, Fnv, KeyHash},
    plan::{bucket_position, Plan},
    record::Record,
};
use std::{borrow::Borrow, marker::PhantomData, time::Instant};

/// A fixed, read-only hash table
///
/// The table is an array of `bucket_count` buckets, each holding exactly
/// `bucket_size` slots. Slots of a bucket are filled front to back in input
/// order, so all empty slots trail the occupied ones.
///
/// A lookup hashes the key once, and scans at most `bucket_size` slots of a
/// single bucket, stopping at the first empty slot.
///
/// String keys are usually stored as `&str` views: the table never copies
/// the bytes, so the backing storage has to outlive the table.
pub struct StaticTable<K, V, H = Fnv> {
    /// `bucket_count * bucket_size` slots, bucket after bucket
    slots: Box<[Option<(K, V)>]>,

    bucket_count: usize,
    bucket_size: usize,
    len: usize,

    hasher: PhantomData<fn() -> H>,
}

impl<K, V> StaticTable<K, V, Fnv>
where
    K: KeyHash + Eq,
{
    /// Plans and builds a table from the given records using the default [`Config`].
    ///
    /// ```
    /// use static_table::StaticTable;
    ///
    /// let table = StaticTable::from_records([(4_096, 1, 'q'), (2_048, 2, 'w')]);
    ///
    /// assert_eq!(Some(&(2, 'w')), table.get(&2_048));
    /// assert_eq!(None, table.get(&0));
    /// ```
    #[must_use]
    #[expect(clippy::expect_used, reason = "the default config is always valid")]
    pub fn from_records<R, I>(records: I) -> Self
    where
        R: Record<Key = K, Value = V>,
        I: IntoIterator<Item = R>,
    {
        Config::default()
            .build(records)
            .expect("default config should be valid")
    }
}

impl<K, V, H> StaticTable<K, V, H>
where
    K: KeyHash + Eq,
    H: BytesHash,
{
    /// Materializes a table from its plan.
    ///
    /// `pairs` must be the exact sequence the plan was made for.
    ///
    /// # Panics
    ///
    /// Panics if the plan was made for a different number of pairs.
    #[must_use]
    pub fn build(pairs: Vec<(K, V)>, plan: &Plan<H>) -> Self {
        assert_eq!(
            pairs.len(),
            plan.len(),
            "plan was made for a different number of pairs",
        );

        let start = Instant::now();

        let bucket_count = plan.bucket_count();
        let bucket_size = plan.max_bucket_size();

        let mut slots = std::iter::repeat_with(|| None)
            .take(bucket_count * bucket_size)
            .collect::<Box<[_]>>();

        let mut len = 0;

        for ((key, value), assignment) in pairs.into_iter().zip(plan.assignments()) {
            let Some(bucket_idx) = *assignment else {
                continue;
            };

            debug_assert_eq!(
                bucket_idx,
                bucket_position(key.key_hash::<H>(), bucket_count),
                "pair was planned into the wrong bucket",
            );

            let offset = bucket_idx * bucket_size;

            #[expect(
                clippy::expect_used,
                reason = "the plan never assigns more than bucket_size pairs to a bucket"
            )]
            let slot = slots
                .get_mut(offset..(offset + bucket_size))
                .and_then(|bucket| bucket.iter_mut().find(|slot| slot.is_none()))
                .expect("bucket should have a free slot");

            *slot = Some((key, value));
            len += 1;
        }

        debug_assert_eq!(plan.element_count(), len, "live pair count mismatch");

        log::debug!(
            "Built static table with {len} items in {bucket_count}x{bucket_size} slots in {:?}",
            start.elapsed(),
        );

        Self {
            slots,
            bucket_count,
            bucket_size,
            len,
            hasher: PhantomData,
        }
    }
}

impl<K, V, H: BytesHash> StaticTable<K, V, H> {
    /// Returns the key-value pair corresponding to the supplied key.
    #[must_use]
    pub fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: KeyHash + Eq + ?Sized,
    {
        let bucket_idx = bucket_position(key.key_hash::<H>(), self.bucket_count);

        self.bucket(bucket_idx)?
            .iter()
            .map_while(Option::as_ref)
            .find(|(k, _)| <K as Borrow<Q>>::borrow(k) == key)
            .map(|(k, v)| (k, v))
    }

    /// Returns a reference to the value corresponding to the key.
    #[must_use]
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: KeyHash + Eq + ?Sized,
    {
        self.get_key_value(key).map(|(_, v)| v)
    }

    /// Returns a copy of the value corresponding to the key,
    /// or the default value if the key is not contained.
    #[must_use]
    pub fn get_or_default<Q>(&self, key: &Q) -> V
    where
        K: Borrow<Q>,
        Q: KeyHash + Eq + ?Sized,
        V: Clone + Default,
    {
        self.get(key).cloned().unwrap_or_default()
    }

    /// Returns `true` if the table contains the key.
    #[must_use]
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: KeyHash + Eq + ?Sized,
    {
        self.get_key_value(key).is_some()
    }
}

impl<K, V, H> StaticTable<K, V, H> {
    /// Returns the number of items (distinct keys) in the table.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the table holds no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of buckets.
    #[must_use]
    pub fn bucket_count(&self) -> usize {
        self.bucket_count
    }

    /// Returns the number of slots in every bucket.
    ///
    /// This is the worst-case number of key comparisons for a lookup.
    #[must_use]
    pub fn bucket_size(&self) -> usize {
        self.bucket_size
    }

    /// Returns the total number of slots, occupied or not.
    #[must_use]
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Returns the number of items per bucket.
    #[must_use]
    #[expect(
        clippy::cast_precision_loss,
        reason = "tables are nowhere near 2^52 items"
    )]
    pub fn load_factor(&self) -> f64 {
        self.len as f64 / self.bucket_count as f64
    }

    /// Returns the slots of the bucket at `idx`.
    #[must_use]
    pub fn bucket(&self, idx: usize) -> Option<&[Option<(K, V)>]> {
        let offset = idx.checked_mul(self.bucket_size)?;
        self.slots.get(offset..(offset + self.bucket_size))
    }

    /// Iterates over all buckets in layout order.
    #[must_use]
    pub fn buckets(&self) -> Buckets<'_, K, V> {
        Buckets::new(&self.slots, self.bucket_size)
    }

    /// Iterates over every slot in layout order, yielding
    /// `(bucket index, slot index, entry)`.
    #[must_use]
    pub fn slots(&self) -> Slots<'_, K, V> {
        Slots::new(&self.slots, self.bucket_size)
    }

    /// Iterates over all items in layout order.
    #[must_use]
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(&self.slots, self.len)
    }

    /// Iterates over all keys in layout order.
    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.iter().map(|(k, _)| k)
    }

    /// Iterates over all values in layout order.
    pub fn values(&self) -> impl Iterator<Item = &V> + '_ {
        self.iter().map(|(_, v)| v)
    }
}

impl<K, V> FromIterator<(K, V)> for StaticTable<K, V, Fnv>
where
    K: KeyHash + Eq,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::from_records(iter)
    }
}

impl<'a, K, V, H> IntoIterator for &'a StaticTable<K, V, H> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K: Clone, V: Clone, H> Clone for StaticTable<K, V, H> {
    fn clone(&self) -> Self {
        Self {
            slots: self.slots.clone(),
            bucket_count: self.bucket_count,
            bucket_size: self.bucket_size,
            len: self.len,
            hasher: PhantomData,
        }
    }
}

impl<K: PartialEq, V: PartialEq, H> PartialEq for StaticTable<K, V, H> {
    fn eq(&self, other: &Self) -> bool {
        self.bucket_count == other.bucket_count
            && self.bucket_size == other.bucket_size
            && self.slots == other.slots
    }
}

impl<K: Eq, V: Eq, H> Eq for StaticTable<K, V, H> {}

impl<K: std::fmt::Debug, V: std::fmt::Debug, H> std::fmt::Debug for StaticTable<K, V, H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticTable")
            .field("len", &self.len)
            .field("bucket_count", &self.bucket_count)
            .field("bucket_size", &self.bucket_size)
            .field("buckets", &self.buckets().collect::<Vec<_>>())
            .finish()
    }
}
