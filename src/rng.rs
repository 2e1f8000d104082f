//! Deterministic random stream for world generation
//!
//! Every generation stage draws from one explicit `WorldRng` that is passed by
//! `&mut` reference. There is no process-wide random state: two streams built
//! from the same seed produce the same sequence forever.

use rand::RngCore;

/// Increment of the splitmix-style seeding sequence (golden ratio).
const SEED_INCREMENT: u32 = 0x9E37_79B9;

/// Scale mapping a `u32` onto `[0, 1)`.
const U32_SCALE: f64 = 1.0 / 4_294_967_296.0;

/// xorshift128 generator seeded through an avalanche mixer.
///
/// Period is 2^128 - 1. The four state words come from four consecutive
/// outputs of a bijective mixer over distinct inputs, so at most one of them
/// can be zero and the all-zero state is never reached.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WorldRng {
    state: [u32; 4],
}

impl WorldRng {
    /// Create a stream from a 32-bit seed.
    pub fn new(seed: u32) -> Self {
        let mut counter = seed;
        let state = [
            avalanche(&mut counter),
            avalanche(&mut counter),
            avalanche(&mut counter),
            avalanche(&mut counter),
        ];
        debug_assert!(state.iter().any(|&w| w != 0));
        Self { state }
    }

    /// Advance the generator and return the raw 32-bit output.
    fn step(&mut self) -> u32 {
        let [x, y, z, w] = self.state;
        let t = x ^ (x << 11);
        let next = w ^ (w >> 19) ^ (t ^ (t >> 8));
        self.state = [y, z, w, next];
        next
    }

    /// Next value uniformly distributed in `[0, 1)`.
    pub fn next_f64(&mut self) -> f64 {
        self.step() as f64 * U32_SCALE
    }

    /// Next value uniformly distributed in `[min, max)`.
    pub fn range(&mut self, min: f64, max: f64) -> f64 {
        min + self.next_f64() * (max - min)
    }
}

/// Splitmix32-style mixer: advances the counter and scrambles it.
fn avalanche(counter: &mut u32) -> u32 {
    *counter = counter.wrapping_add(SEED_INCREMENT);
    let mut z = *counter;
    z = (z ^ (z >> 16)).wrapping_mul(0x85EB_CA6B);
    z = (z ^ (z >> 13)).wrapping_mul(0xC2B2_AE35);
    z ^ (z >> 16)
}

/// Lets downstream consumers use `rand` distributions on the same stream.
impl RngCore for WorldRng {
    fn next_u32(&mut self) -> u32 {
        self.step()
    }

    fn next_u64(&mut self) -> u64 {
        let lo = self.step() as u64;
        let hi = self.step() as u64;
        (hi << 32) | lo
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(4) {
            let bytes = self.step().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}
