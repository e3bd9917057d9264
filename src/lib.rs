// Copyright (c) 2024-present, fjall-rs
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

//! Fixed, read-only hash tables built from a key/value set known up front.
//!
//! ##### About
//!
//! A `StaticTable` is planned once from all of its pairs, and never changes afterwards.
//! Planning picks the bucket count that minimizes the largest bucket, so that every
//! bucket can be stored as a fixed-width array of slots:
//!
//! - no chaining, no tombstones, no resizing
//! - a lookup hashes the key once and compares it against at most `bucket_size` slots
//! - with the default load factor, most key sets end up with exactly one slot per bucket
//!
//! If a key appears more than once, only one occurrence is kept
//! (the last one, unless configured otherwise).
//!
//! ```
//! use static_table::StaticTable;
//!
//! let table = StaticTable::from_records([
//!     ("bsd", 1),
//!     ("holy", 2),
//!     ("duplicate", 4),
//!     ("duplicate", 999),
//! ]);
//!
//! assert_eq!(3, table.len());
//! assert_eq!(Some(&999), table.get("duplicate"));
//! assert_eq!(None, table.get("unknown"));
//! ```
//!
//! Planning and building can also be split, to inspect the plan first:
//!
//! ```
//! use static_table::{Config, Fnv, Plan, StaticTable};
//!
//! let pairs = vec![(4_096, 'q'), (2_048, 'w'), (8_192, 'e'), (1_024, 'r')];
//!
//! let plan = Plan::<Fnv>::new(&pairs, &Config::default())?;
//! assert_eq!(5, plan.bucket_count());
//! assert_eq!(1, plan.max_bucket_size());
//!
//! let table = StaticTable::build(pairs, &plan);
//! assert_eq!(Some(&'e'), table.get(&8_192));
//! # Ok::<(), static_table::Error>(())
//! ```

#![deny(clippy::all, missing_docs, clippy::cargo)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::indexing_slicing)]
#![warn(clippy::pedantic, clippy::nursery)]
#![warn(clippy::expect_used)]
#![allow(clippy::missing_const_for_fn)]
#![warn(clippy::multiple_crate_versions)]
#![allow(clippy::option_if_let_else)]
#![warn(clippy::redundant_feature_names)]
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub(crate) type HashMap<K, V> = std::collections::HashMap<K, V, rustc_hash::FxBuildHasher>;

/// Configuration
pub mod config;

mod error;

/// Key hashing
pub mod hash;

mod plan;
mod record;

/// Static table and its iterators
pub mod table;

pub use {
    config::{Config, DuplicatePolicy},
    error::{Error, Result},
    hash::{BytesHash, Fnv, Fnv64, KeyHash, Murmur, Murmur32, Xxh3},
    plan::Plan,
    record::Record,
    table::StaticTable,
};
