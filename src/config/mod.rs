// Copyright (c) 2024-present, fjall-rs
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

mod duplicate_policy;

pub use duplicate_policy::DuplicatePolicy;

use crate::{
    hash::{BytesHash, Fnv, KeyHash},
    plan::Plan,
    record::{collect_pairs, Record},
    Error, StaticTable,
};

/// Table planning configuration
///
/// ```
/// use static_table::Config;
///
/// let table = Config::new()
///     .load_factor(4.0)
///     .min_load_factor(2.0)
///     .build([("Catch", 'c'), ("a tiger", 'a'), ("by the toe", 'b')])?;
///
/// assert_eq!(Some(&'a'), table.get("a tiger"));
/// # Ok::<(), static_table::Error>(())
/// ```
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Config {
    /// Live pairs per bucket the bucket count search starts from
    pub load_factor: f64,

    /// Load factor below which the bucket count search gives up
    /// and accepts collisions
    pub min_load_factor: f64,

    /// Which occurrence of a repeated key is kept
    pub duplicate_policy: DuplicatePolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            load_factor: 1.0,
            min_load_factor: 0.5,
            duplicate_policy: DuplicatePolicy::default(),
        }
    }
}

impl Config {
    /// Smallest accepted load factor
    ///
    /// Both load factors are bounded by it, so planning never considers
    /// more than 64 buckets per live pair.
    pub const MIN_RATIO: f64 = 1.0 / 64.0;

    /// Initializes a new config with default tuning.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the starting load factor.
    ///
    /// The initial bucket count is `live pairs / load_factor`.
    /// Lower values spend more memory on empty slots to avoid collisions.
    ///
    /// Defaults to 1.0.
    #[must_use]
    pub fn load_factor(mut self, ratio: f64) -> Self {
        self.load_factor = ratio;
        self
    }

    /// Sets the minimum load factor.
    ///
    /// The bucket count grows one by one until no two keys share a bucket,
    /// or until adding a bucket would push the load factor below this floor.
    ///
    /// Defaults to 0.5.
    #[must_use]
    pub fn min_load_factor(mut self, ratio: f64) -> Self {
        self.min_load_factor = ratio;
        self
    }

    /// Sets the duplicate policy.
    ///
    /// Defaults to [`DuplicatePolicy::LastWins`].
    #[must_use]
    pub fn duplicate_policy(mut self, policy: DuplicatePolicy) -> Self {
        self.duplicate_policy = policy;
        self
    }

    /// Checks the tuning parameters.
    ///
    /// # Errors
    ///
    /// Returns error if either load factor is not finite or below [`Config::MIN_RATIO`].
    pub fn validate(&self) -> crate::Result<()> {
        if !(self.load_factor.is_finite() && self.load_factor >= Self::MIN_RATIO) {
            return Err(Error::InvalidLoadFactor(self.load_factor));
        }

        if !(self.min_load_factor.is_finite() && self.min_load_factor >= Self::MIN_RATIO) {
            return Err(Error::InvalidMinLoadFactor(self.min_load_factor));
        }

        Ok(())
    }

    /// Plans the layout of a table holding the given pairs.
    ///
    /// # Errors
    ///
    /// Returns error if the config is invalid.
    pub fn plan<K, V, H>(&self, pairs: &[(K, V)]) -> crate::Result<Plan<H>>
    where
        K: KeyHash + Eq,
        H: BytesHash,
    {
        Plan::new(pairs, self)
    }

    /// Plans and builds a table from the given records, hashing strings with [`Fnv`].
    ///
    /// # Errors
    ///
    /// Returns error if the config is invalid.
    pub fn build<R, I>(&self, records: I) -> crate::Result<StaticTable<R::Key, R::Value, Fnv>>
    where
        R: Record,
        R::Key: KeyHash + Eq,
        I: IntoIterator<Item = R>,
    {
        self.build_with_hasher::<Fnv, R, I>(records)
    }

    /// Plans and builds a table from the given records, hashing strings with `H`.
    ///
    /// # Errors
    ///
    /// Returns error if the config is invalid.
    pub fn build_with_hasher<H, R, I>(
        &self,
        records: I,
    ) -> crate::Result<StaticTable<R::Key, R::Value, H>>
    where
        H: BytesHash,
        R: Record,
        R::Key: KeyHash + Eq,
        I: IntoIterator<Item = R>,
    {
        let pairs = collect_pairs(records);
        let plan = self.plan::<_, _, H>(&pairs)?;
        Ok(StaticTable::build(pairs, &plan))
    }
}
