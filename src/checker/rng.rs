//! Deterministic test-case generator.
//!
//! A 128-bit permuted congruential generator with XSL-RR output. Every checker
//! run starts from the same seed, so every submission sees the same test cases.

use rand_core::{Error, RngCore, SeedableRng, impls, le};

/// PCG with 128-bit state and 64-bit output.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Pcg128 {
    state: u128,
    increment: u128,
}

impl Pcg128 {
    const MULTIPLIER: u128 = 0x2360_ed05_1fc6_5da4_4385_df64_9fcc_f645;

    /// Seed used by the checker.
    pub const DEFAULT_STATE: u128 = 0xcafe_f00d_d15e_a5e5;
    pub const DEFAULT_STREAM: u128 = 0x0a02_bdbf_7bb3_c0a7_ac28_fa16_a64a_bf96;

    /// Creates a generator; `stream` selects one of 2^127 sequences.
    pub fn new(state: u128, stream: u128) -> Self {
        Self {
            state,
            increment: (stream << 1) | 1,
        }
    }

    fn mix(state: u128) -> u64 {
        let rot = (state >> 122) as u32;
        let xsl = ((state >> 64) as u64) ^ (state as u64);
        xsl.rotate_right(rot)
    }

    fn step(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(Self::MULTIPLIER)
            .wrapping_add(self.increment);
        Self::mix(self.state)
    }
}

impl Default for Pcg128 {
    fn default() -> Self {
        Self::new(Self::DEFAULT_STATE, Self::DEFAULT_STREAM)
    }
}

impl RngCore for Pcg128 {
    fn next_u32(&mut self) -> u32 {
        self.step() as u32
    }

    fn next_u64(&mut self) -> u64 {
        self.step()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        impls::fill_bytes_via_next(self, dest)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl SeedableRng for Pcg128 {
    /// Little-endian state followed by little-endian stream.
    type Seed = [u8; 32];

    fn from_seed(seed: Self::Seed) -> Self {
        let mut words = [0u64; 4];
        le::read_u64_into(&seed, &mut words);
        let state = (u128::from(words[1]) << 64) | u128::from(words[0]);
        let stream = (u128::from(words[3]) << 64) | u128::from(words[2]);
        Self::new(state, stream)
    }
}

/// Signed draws for any generator.
pub trait SignedBits: RngCore {
    /// Draws a uniformly random `bits`-bit signed integer (`1..=64`).
    fn next_signed(&mut self, bits: u32) -> i64 {
        (self.next_u64() as i64) >> (64 - bits)
    }
}

impl<R: RngCore + ?Sized> SignedBits for R {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_sequence() {
        let mut rng = Pcg128::default();
        assert_eq!(rng.next_u64(), 0xd698_3987_e02c_8acb);
        assert_eq!(rng.next_u64(), 0xea09_7ef1_adf1_7d13);
        assert_eq!(rng.next_u64(), 0x303a_8967_6918_0a3f);
    }

    #[test]
    fn signed_draws_shift_arithmetically() {
        let mut rng = Pcg128::default();
        assert_eq!(rng.next_signed(60), -186_473_218_586_785_620);
        assert_eq!(rng.next_signed(60), -98_912_138_598_344_751);
    }

    #[test]
    fn signed_draws_stay_in_range() {
        let mut rng = Pcg128::new(1, 2);
        let bound = 1i64 << 59;
        for _ in 0..1000 {
            let value = rng.next_signed(60);
            assert!((-bound..bound).contains(&value));
        }
    }

    #[test]
    fn works_through_trait_objects() {
        let mut rng = Pcg128::default();
        let dynamic: &mut dyn RngCore = &mut rng;
        assert_eq!(dynamic.next_signed(64), 0xd698_3987_e02c_8acbu64 as i64);
    }

    #[test]
    fn seed_bytes_are_little_endian() {
        let mut seed = [0u8; 32];
        seed[..16].copy_from_slice(&Pcg128::DEFAULT_STATE.to_le_bytes());
        seed[16..].copy_from_slice(&Pcg128::DEFAULT_STREAM.to_le_bytes());
        assert_eq!(Pcg128::from_seed(seed), Pcg128::default());
    }

    #[test]
    fn fill_bytes_uses_output_words() {
        let mut bytes = [0u8; 8];
        Pcg128::default().fill_bytes(&mut bytes);
        assert_eq!(u64::from_le_bytes(bytes), 0xd698_3987_e02c_8acb);
    }
}
