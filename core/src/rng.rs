//! Deterministic random number generation.
//!
//! RULE: Nothing in the generator may call any platform RNG.
//! All randomness flows through one GalaxyRng constructed by the
//! pipeline from the run seed and threaded through every stage.
//!
//! The generator is Mulberry32: 32-bit state, 32-bit wrapping arithmetic
//! only, so a seed reproduces the same stream on every platform.
//!
//! Stages that need an independent stream (the cost-map noise layers)
//! draw a sub-seed from the shared stream with `next_seed()`.
//! The parent cursor advances by exactly one draw per sub-stream.

use rand::RngCore;

const MULBERRY_INCREMENT: u32 = 0x6D2B_79F5;
const FNV_OFFSET_BASIS: u32 = 0x811C_9DC5;
const FNV_PRIME: u32 = 0x0100_0193;
const TWO_POW_32: f64 = 4_294_967_296.0;

/// Reduce a seed string to the 32-bit integer the PRNG is built from.
///
/// FNV-1a over the UTF-8 bytes. This is the only place seed strings
/// enter the system.
pub fn hash_seed(seed: &str) -> u32 {
    seed.bytes().fold(FNV_OFFSET_BASIS, |hash, byte| {
        (hash ^ u32::from(byte)).wrapping_mul(FNV_PRIME)
    })
}

/// The run's deterministic random stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GalaxyRng {
    state: u32,
    draws: u64,
}

impl GalaxyRng {
    pub fn new(seed: u32) -> Self {
        Self { state: seed, draws: 0 }
    }

    pub fn from_seed_str(seed: &str) -> Self {
        Self::new(hash_seed(seed))
    }

    /// Next raw 32-bit output.
    pub fn next_raw(&mut self) -> u32 {
        self.state = self.state.wrapping_add(MULBERRY_INCREMENT);
        self.draws += 1;
        let mut t = self.state;
        t = (t ^ (t >> 15)).wrapping_mul(t | 1);
        t ^= t.wrapping_add((t ^ (t >> 7)).wrapping_mul(t | 61));
        t ^ (t >> 14)
    }

    /// Roll a float in [0.0, 1.0).
    pub fn random(&mut self) -> f64 {
        f64::from(self.next_raw()) / TWO_POW_32
    }

    /// Roll an integer in [min, max], both inclusive.
    pub fn randint(&mut self, min: i64, max: i64) -> i64 {
        assert!(min <= max, "randint: min {min} > max {max}");
        let span = (max - min + 1) as f64;
        min + (self.random() * span).floor() as i64
    }

    /// Bernoulli trial: returns true with probability p.
    pub fn chance(&mut self, p: f64) -> bool {
        self.random() < p
    }

    /// Seed for an independent sub-stream, consuming one draw.
    pub fn next_seed(&mut self) -> u32 {
        (self.random() * TWO_POW_32).floor() as u32
    }

    /// Number of values drawn so far. Diagnostics only.
    pub fn draws(&self) -> u64 {
        self.draws
    }
}

impl RngCore for GalaxyRng {
    fn next_u32(&mut self) -> u32 {
        self.next_raw()
    }

    fn next_u64(&mut self) -> u64 {
        let hi = u64::from(self.next_raw());
        let lo = u64::from(self.next_raw());
        (hi << 32) | lo
    }

    /// Little-endian, one raw draw per started 4-byte chunk.
    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(4) {
            let bytes = self.next_raw().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fnv1a_matches_reference_values() {
        assert_eq!(hash_seed(""), 0x811C_9DC5);
        assert_eq!(hash_seed("a"), 0xE40C_292C);
        assert_eq!(hash_seed("foobar"), 0xBF9C_F968);
    }

    #[test]
    fn seed_hash_is_order_dependent() {
        assert_ne!(hash_seed("ab"), hash_seed("ba"));
    }

    #[test]
    fn same_seed_same_stream() {
        let mut a = GalaxyRng::from_seed_str("alpha");
        let mut b = GalaxyRng::from_seed_str("alpha");
        for _ in 0..1000 {
            assert_eq!(a.next_raw(), b.next_raw());
        }
    }

    #[test]
    fn different_seeds_diverge() {
        let mut a = GalaxyRng::new(1);
        let mut b = GalaxyRng::new(2);
        let sa: Vec<u32> = (0..16).map(|_| a.next_raw()).collect();
        let sb: Vec<u32> = (0..16).map(|_| b.next_raw()).collect();
        assert_ne!(sa, sb);
    }

    #[test]
    fn random_stays_in_unit_interval() {
        let mut rng = GalaxyRng::new(42);
        for _ in 0..10_000 {
            let v = rng.random();
            assert!((0.0..1.0).contains(&v), "{v} outside [0, 1)");
        }
    }

    #[test]
    fn randint_is_inclusive_and_hits_both_ends() {
        let mut rng = GalaxyRng::new(7);
        let mut seen_min = false;
        let mut seen_max = false;
        for _ in 0..2000 {
            let v = rng.randint(-1, 1);
            assert!((-1..=1).contains(&v));
            seen_min |= v == -1;
            seen_max |= v == 1;
        }
        assert!(seen_min && seen_max);
    }

    #[test]
    fn mulberry32_known_answers() {
        let mut rng = GalaxyRng::new(1);
        assert_eq!(rng.random(), 0.6270739405881613);
        assert_eq!(rng.random(), 0.002735721180215478);
        assert_eq!(rng.next_raw(), 2_265_367_787);
    }

    #[test]
    fn sub_seed_consumes_exactly_one_draw() {
        let mut a = GalaxyRng::new(99);
        let mut b = GalaxyRng::new(99);
        let _ = a.next_seed();
        let _ = b.random();
        assert_eq!(a, b);
        assert_eq!(a.draws(), 1);
    }

    #[test]
    fn fill_bytes_uses_little_endian_raw_draws() {
        let mut a = GalaxyRng::new(5);
        let mut b = GalaxyRng::new(5);
        let mut bytes = [0u8; 6];
        a.fill_bytes(&mut bytes);
        let first = b.next_raw().to_le_bytes();
        let second = b.next_raw().to_le_bytes();
        assert_eq!(bytes[..4], first);
        assert_eq!(bytes[4..], second[..2]);
        assert_eq!(a.draws(), 2);
    }
}
