// Minimal PRNG (no external crates).
//
// This is NOT cryptographically secure.
// It only feeds session identifiers, which are routing keys, not secrets.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::clock;

static SEED_COUNTER: AtomicU64 = AtomicU64::new(0);

#[derive(Debug, Clone)]
pub struct Prng {
    state: u64,
}

impl Prng {
    pub fn new(seed: u64) -> Self {
        // Avoid a zero state.
        let seed = if seed == 0 { 0x9E3779B97F4A7C15 } else { seed };
        Self { state: seed }
    }

    /// Seed from the wall clock, mixed with a process-wide counter so two
    /// generators created in the same clock tick still diverge.
    pub fn from_clock() -> Self {
        let n = SEED_COUNTER.fetch_add(1, Ordering::Relaxed);
        let mut prng = Self::new(clock::unix_nanos() ^ n.wrapping_mul(0x9E3779B97F4A7C15));
        // Discard a few outputs; nearby seeds give correlated first draws.
        for _ in 0..4 {
            prng.next_u64();
        }
        prng
    }

    #[inline]
    fn next_u64(&mut self) -> u64 {
        // xorshift64*
        let mut x = self.state;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.state = x;
        x.wrapping_mul(0x2545F4914F6CDD1D)
    }

    #[inline]
    pub fn next_u32(&mut self) -> u32 {
        (self.next_u64() >> 32) as u32
    }

    #[inline]
    pub fn gen_range_usize(&mut self, low: usize, high: usize) -> usize {
        if high <= low {
            return low;
        }
        let span = (high - low) as u32;
        let v = self.next_u32() % span;
        low + v as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_sequence() {
        let mut a = Prng::new(42);
        let mut b = Prng::new(42);
        for _ in 0..16 {
            assert_eq!(a.next_u32(), b.next_u32());
        }
    }

    #[test]
    fn gen_range_stays_in_bounds() {
        let mut p = Prng::new(7);
        for _ in 0..1000 {
            let v = p.gen_range_usize(0, 36);
            assert!(v < 36);
        }
        assert_eq!(p.gen_range_usize(5, 5), 5);
    }

    #[test]
    fn zero_seed_is_not_stuck() {
        let mut p = Prng::new(0);
        p.next_u64();
        assert_ne!(p.state, 0);
    }
}
