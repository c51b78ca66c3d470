//! Seeded deterministic randomness.
//!
//! Every client must derive the identical deck order, tile ids, vein
//! identities, roles and profiles from the shared session seed, so the
//! whole pipeline is fixed and documented:
//!
//! 1. the seed string is hashed with 64-bit FNV-1a,
//! 2. the hash seeds a PCG-32 generator (`Pcg32::seed_from_u64`),
//! 3. shuffles are a descending Fisher–Yates driven by
//!    `random_range(0..=i)`.
//!
//! Any deviation from this pipeline is a correctness bug, not an
//! implementation detail. `SmallRng` and the `rand` crate's own `shuffle`
//! are deliberately not used here: neither is guaranteed stable across
//! platforms or crate versions.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use uuid::Uuid;

const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// 64-bit FNV-1a over the seed string's UTF-8 bytes.
pub fn fnv1a_64(bytes: &[u8]) -> u64 {
    let mut hash = FNV_OFFSET_BASIS;
    for &byte in bytes {
        hash ^= u64::from(byte);
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}

/// The session-seeded generator behind every deterministic derivation.
///
/// Derivations each construct a fresh `SeededRng` from the session seed, so
/// every one of them is a pure function of the seed and consumes a known
/// prefix of the stream.
#[derive(Clone, Debug)]
pub struct SeededRng {
    rng: Pcg32,
}

impl SeededRng {
    pub fn new(seed: &str) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(fnv1a_64(seed.as_bytes())),
        }
    }

    /// In-place descending Fisher–Yates shuffle.
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        for i in (1..items.len()).rev() {
            let j = self.rng.random_range(0..=i);
            items.swap(i, j);
        }
    }

    /// Next UUIDv4 from the stream. Consumes exactly 16 bytes; the builder
    /// only overwrites the version and variant bits.
    pub fn uuid(&mut self) -> Uuid {
        let mut bytes = [0u8; 16];
        self.rng.fill(&mut bytes[..]);
        uuid::Builder::from_random_bytes(bytes).into_uuid()
    }
}
