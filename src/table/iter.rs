// Copyright (c) 2025-present, fjall-rs
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

//! Layout-order iterators over a static table

use std::{iter::Enumerate, slice::ChunksExact};

type Slot<K, V> = Option<(K, V)>;

/// Iterator over the buckets of a static table
///
/// Every bucket is yielded as a slice of exactly `bucket_size` slots.
pub struct Buckets<'a, K, V>(ChunksExact<'a, Slot<K, V>>);

impl<'a, K, V> Buckets<'a, K, V> {
    pub(crate) fn new(slots: &'a [Slot<K, V>], bucket_size: usize) -> Self {
        Self(slots.chunks_exact(bucket_size))
    }
}

impl<'a, K, V> Iterator for Buckets<'a, K, V> {
    type Item = &'a [Slot<K, V>];

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Buckets<'_, K, V> {}

/// Iterator over every slot of a static table
///
/// Yields `(bucket index, slot index, entry)`, where `entry`
/// is `None` for an empty slot.
pub struct Slots<'a, K, V> {
    inner: Enumerate<std::slice::Iter<'a, Slot<K, V>>>,
    bucket_size: usize,
}

impl<'a, K, V> Slots<'a, K, V> {
    pub(crate) fn new(slots: &'a [Slot<K, V>], bucket_size: usize) -> Self {
        Self {
            inner: slots.iter().enumerate(),
            bucket_size,
        }
    }
}

impl<'a, K, V> Iterator for Slots<'a, K, V> {
    type Item = (usize, usize, Option<(&'a K, &'a V)>);

    fn next(&mut self) -> Option<Self::Item> {
        let (idx, slot) = self.inner.next()?;

        Some((
            idx / self.bucket_size,
            idx % self.bucket_size,
            slot.as_ref().map(|(k, v)| (k, v)),
        ))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Slots<'_, K, V> {}

/// Iterator over the items of a static table, in layout order
pub struct Iter<'a, K, V> {
    inner: std::slice::Iter<'a, Slot<K, V>>,
    remaining: usize,
}

impl<'a, K, V> Iter<'a, K, V> {
    pub(crate) fn new(slots: &'a [Slot<K, V>], len: usize) -> Self {
        Self {
            inner: slots.iter(),
            remaining: len,
        }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        let (k, v) = self.inner.by_ref().find_map(Option::as_ref)?;
        self.remaining -= 1;

        Some((k, v))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<K, V> std::iter::FusedIterator for Iter<'_, K, V> {}
