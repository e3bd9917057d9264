// Copyright (c) 2024-present, fjall-rs
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

/// An input record that is normalized into a key/value pair
///
/// The first component is the key. A record with a single payload component
/// uses it as the value directly, records with more components pack them
/// into a tuple value:
///
/// ```
/// use static_table::Record;
///
/// assert_eq!(("a", 1), ("a", 1).into_pair());
/// assert_eq!(("a", (1, 'q')), ("a", 1, 'q').into_pair());
/// ```
pub trait Record {
    /// Key type
    type Key;

    /// Value type
    type Value;

    /// Splits the record into its key and value.
    fn into_pair(self) -> (Self::Key, Self::Value);
}

impl<K, A> Record for (K, A) {
    type Key = K;
    type Value = A;

    fn into_pair(self) -> (K, A) {
        self
    }
}

impl<K, A, B> Record for (K, A, B) {
    type Key = K;
    type Value = (A, B);

    fn into_pair(self) -> (K, (A, B)) {
        let (key, a, b) = self;
        (key, (a, b))
    }
}

impl<K, A, B, C> Record for (K, A, B, C) {
    type Key = K;
    type Value = (A, B, C);

    fn into_pair(self) -> (K, (A, B, C)) {
        let (key, a, b, c) = self;
        (key, (a, b, c))
    }
}

impl<K, A, B, C, D> Record for (K, A, B, C, D) {
    type Key = K;
    type Value = (A, B, C, D);

    fn into_pair(self) -> (K, (A, B, C, D)) {
        let (key, a, b, c, d) = self;
        (key, (a, b, c, d))
    }
}

impl<K, A, B, C, D, E> Record for (K, A, B, C, D, E) {
    type Key = K;
    type Value = (A, B, C, D, E);

    fn into_pair(self) -> (K, (A, B, C, D, E)) {
        let (key, a, b, c, d, e) = self;
        (key, (a, b, c, d, e))
    }
}

/// Normalizes a sequence of records into key/value pairs, keeping input order.
pub(crate) fn collect_pairs<R, I>(records: I) -> Vec<(R::Key, R::Value)>
where
    R: Record,
    I: IntoIterator<Item = R>,
{
    records.into_iter().map(Record::into_pair).collect()
}
