// Copyright (c) 2024-present, fjall-rs
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

/// Represents errors that can occur while planning a static table
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Error {
    /// Load factor is not finite, or below `Config::MIN_RATIO`
    InvalidLoadFactor(f64),

    /// Minimum load factor is not finite, or below `Config::MIN_RATIO`
    InvalidMinLoadFactor(f64),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "StaticTableError: {self:?}")
    }
}

impl std::error::Error for Error {}

/// Planning result
pub type Result<T> = std::result::Result<T, Error>;
