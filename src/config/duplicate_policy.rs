// Copyright (c) 2024-present, fjall-rs
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

/// Decides which occurrence of a repeated key ends up in the table
///
/// Repeated keys never change the table layout, only which value is kept.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum DuplicatePolicy {
    /// The last occurrence in input order is kept
    #[default]
    LastWins,

    /// The first occurrence in input order is kept
    FirstWins,
}

impl DuplicatePolicy {
    /// Orders the indexes of equal keys so that the occurrence to keep comes first.
    pub(crate) fn scan_order(self, indexes: &[usize]) -> Vec<usize> {
        match self {
            Self::FirstWins => indexes.to_vec(),
            Self::LastWins => indexes.iter().rev().copied().collect(),
        }
    }
}
