// Copyright (c) 2024-present, fjall-rs
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

//! Key hashing
//!
//! Integer-like keys hash to their own value, so a handful of integer keys
//! can usually be spread without collisions by picking the right bucket count.
//!
//! String-like keys are hashed through a [`BytesHash`] implementation.

mod bytes;

pub use bytes::{BytesHash, Fnv, Fnv64, Murmur, Murmur32, Xxh3};

/// A key that can be hashed into a static table
///
/// If two keys are equal, their hashes must be equal, and a borrowed
/// form of a key (e.g. `str` for `String`) must hash like the key itself.
pub trait KeyHash {
    /// Hashes the key, using `H` for byte strings.
    fn key_hash<H: BytesHash>(&self) -> u64;
}

/// Widens an integer to 64 bits, sign-extending negative values.
#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "every input fits into 64 bits, we only reinterpret the sign"
)]
fn trivial_hash<T: Into<i128>>(value: T) -> u64 {
    value.into() as u64
}

impl KeyHash for u8 {
    fn key_hash<H: BytesHash>(&self) -> u64 {
        trivial_hash(*self)
    }
}

impl KeyHash for u16 {
    fn key_hash<H: BytesHash>(&self) -> u64 {
        trivial_hash(*self)
    }
}

impl KeyHash for u32 {
    fn key_hash<H: BytesHash>(&self) -> u64 {
        trivial_hash(*self)
    }
}

impl KeyHash for u64 {
    fn key_hash<H: BytesHash>(&self) -> u64 {
        *self
    }
}

impl KeyHash for usize {
    fn key_hash<H: BytesHash>(&self) -> u64 {
        *self as u64
    }
}

impl KeyHash for i8 {
    fn key_hash<H: BytesHash>(&self) -> u64 {
        trivial_hash(*self)
    }
}

impl KeyHash for i16 {
    fn key_hash<H: BytesHash>(&self) -> u64 {
        trivial_hash(*self)
    }
}

impl KeyHash for i32 {
    fn key_hash<H: BytesHash>(&self) -> u64 {
        trivial_hash(*self)
    }
}

impl KeyHash for i64 {
    fn key_hash<H: BytesHash>(&self) -> u64 {
        trivial_hash(*self)
    }
}

impl KeyHash for isize {
    #[expect(clippy::cast_sign_loss, reason = "negative keys are sign-extended")]
    fn key_hash<H: BytesHash>(&self) -> u64 {
        *self as u64
    }
}

impl KeyHash for bool {
    fn key_hash<H: BytesHash>(&self) -> u64 {
        trivial_hash(*self)
    }
}

impl KeyHash for char {
    fn key_hash<H: BytesHash>(&self) -> u64 {
        trivial_hash(u32::from(*self))
    }
}

impl KeyHash for str {
    fn key_hash<H: BytesHash>(&self) -> u64 {
        H::hash_bytes(self.as_bytes())
    }
}

impl KeyHash for String {
    fn key_hash<H: BytesHash>(&self) -> u64 {
        self.as_str().key_hash::<H>()
    }
}

impl KeyHash for [u8] {
    fn key_hash<H: BytesHash>(&self) -> u64 {
        H::hash_bytes(self)
    }
}

impl<const N: usize> KeyHash for [u8; N] {
    fn key_hash<H: BytesHash>(&self) -> u64 {
        H::hash_bytes(self)
    }
}

impl KeyHash for Vec<u8> {
    fn key_hash<H: BytesHash>(&self) -> u64 {
        self.as_slice().key_hash::<H>()
    }
}

impl<T: ?Sized> KeyHash for *const T {
    fn key_hash<H: BytesHash>(&self) -> u64 {
        self.addr() as u64
    }
}

impl<T: ?Sized> KeyHash for *mut T {
    fn key_hash<H: BytesHash>(&self) -> u64 {
        self.addr() as u64
    }
}

impl<T: KeyHash + ?Sized> KeyHash for &T {
    fn key_hash<H: BytesHash>(&self) -> u64 {
        (**self).key_hash::<H>()
    }
}
