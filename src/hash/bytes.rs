// Copyright (c) 2024-present, fjall-rs
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

/// A deterministic hash function over byte strings
///
/// Tables hash string-like keys through this trait, so the same
/// implementation has to be used for planning, building and lookups.
/// The table types carry it as a type parameter to enforce that.
pub trait BytesHash {
    /// Hashes the given bytes.
    fn hash_bytes(bytes: &[u8]) -> u64;
}

/// Widens a byte the way a signed `char` is widened, so bytes of
/// non-ASCII characters are sign-extended.
#[expect(
    clippy::cast_possible_wrap,
    clippy::cast_sign_loss,
    reason = "the byte is reinterpreted as signed, then sign-extended"
)]
fn widen_signed(byte: u8) -> u64 {
    i64::from(byte as i8) as u64
}

/// FNV-1a with the 32-bit offset basis and prime, accumulated in a 64-bit word
///
/// Bytes are sign-extended before they are mixed in, matching how a signed
/// `char` is widened. This is the default byte hash.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Fnv;

impl Fnv {
    const OFFSET_BASIS: u64 = 2_166_136_261;
    const PRIME: u64 = 16_777_619;
}

impl BytesHash for Fnv {
    fn hash_bytes(bytes: &[u8]) -> u64 {
        bytes.iter().fold(Self::OFFSET_BASIS, |hash, &byte| {
            (hash ^ widen_signed(byte)).wrapping_mul(Self::PRIME)
        })
    }
}

/// FNV-1a with the 64-bit prime
///
/// Starts from the same offset basis as [`Fnv`], and sign-extends bytes the same way.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Fnv64;

impl Fnv64 {
    const PRIME: u64 = 1_099_511_628_211;
}

impl BytesHash for Fnv64 {
    fn hash_bytes(bytes: &[u8]) -> u64 {
        bytes.iter().fold(Fnv::OFFSET_BASIS, |hash, &byte| {
            (hash ^ widen_signed(byte)).wrapping_mul(Self::PRIME)
        })
    }
}

/// 64-bit `MurmurHash2` variant, as used by `libstdc++`
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Murmur;

impl Murmur {
    const SEED: u64 = 0xc70f_6907;
    const MUL: u64 = 0xc6a4_a793_5bd1_e995;

    fn shift_mix(v: u64) -> u64 {
        v ^ (v >> 47)
    }
}

impl BytesHash for Murmur {
    fn hash_bytes(bytes: &[u8]) -> u64 {
        let mut hash = Self::SEED ^ (bytes.len() as u64).wrapping_mul(Self::MUL);

        let mut chunks = bytes.chunks_exact(8);

        for chunk in &mut chunks {
            let mut word = [0u8; 8];
            word.copy_from_slice(chunk);

            let data = Self::shift_mix(u64::from_le_bytes(word).wrapping_mul(Self::MUL))
                .wrapping_mul(Self::MUL);

            hash ^= data;
            hash = hash.wrapping_mul(Self::MUL);
        }

        let tail = chunks.remainder();

        if !tail.is_empty() {
            // NOTE: Little-endian load of the 1-7 trailing bytes
            let data = tail
                .iter()
                .rev()
                .fold(0u64, |acc, &byte| (acc << 8) | u64::from(byte));

            hash ^= data;
            hash = hash.wrapping_mul(Self::MUL);
        }

        hash = Self::shift_mix(hash).wrapping_mul(Self::MUL);
        Self::shift_mix(hash)
    }
}

/// 32-bit `MurmurHash2`, widened to 64 bits
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Murmur32;

impl Murmur32 {
    const SEED: u32 = 0xc70f_6907;
    const MUL: u32 = 0x5bd1_e995;
}

impl BytesHash for Murmur32 {
    #[expect(
        clippy::cast_possible_truncation,
        reason = "the length is mixed in modulo 2^32"
    )]
    fn hash_bytes(bytes: &[u8]) -> u64 {
        let mut hash = Self::SEED ^ (bytes.len() as u32);

        let mut chunks = bytes.chunks_exact(4);

        for chunk in &mut chunks {
            let mut word = [0u8; 4];
            word.copy_from_slice(chunk);

            let mut k = u32::from_le_bytes(word).wrapping_mul(Self::MUL);
            k ^= k >> 24;
            k = k.wrapping_mul(Self::MUL);

            hash = hash.wrapping_mul(Self::MUL);
            hash ^= k;
        }

        let tail = chunks.remainder();

        if !tail.is_empty() {
            hash ^= tail
                .iter()
                .rev()
                .fold(0u32, |acc, &byte| (acc << 8) | u32::from(byte));
            hash = hash.wrapping_mul(Self::MUL);
        }

        hash ^= hash >> 13;
        hash = hash.wrapping_mul(Self::MUL);
        hash ^= hash >> 15;

        u64::from(hash)
    }
}

/// 64-bit XXH3
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Xxh3;

impl BytesHash for Xxh3 {
    fn hash_bytes(bytes: &[u8]) -> u64 {
        xxhash_rust::xxh3::xxh3_64(bytes)
    }
}
