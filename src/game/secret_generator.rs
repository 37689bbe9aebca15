use log::trace;
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};

use crate::model::{Code, CODE_LENGTH, MAX_DIGIT};

/// Draws digits until the code is full, rejecting repeats when duplicates are
/// not allowed.
pub fn generate_secret_code<R: Rng>(rng: &mut R, allow_duplicates: bool) -> Code {
    let mut code: Vec<u8> = Vec::with_capacity(CODE_LENGTH);
    while code.len() < CODE_LENGTH {
        let digit = rng.random_range(0..=MAX_DIGIT);
        if allow_duplicates || !code.contains(&digit) {
            code.push(digit);
        }
    }
    let mut secret = [0; CODE_LENGTH];
    secret.copy_from_slice(&code);
    secret
}

/// Owns the random source used for new secret codes.
pub struct SecretGenerator {
    seed: u64,
    rng: StdRng,
}

impl SecretGenerator {
    pub fn new(seed: Option<u64>) -> Self {
        let seed = seed.unwrap_or_else(|| rand::rng().next_u64());
        trace!(target: "game_state", "Secret generator seed: {}", seed);
        Self {
            seed,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn generate(&mut self, allow_duplicates: bool) -> Code {
        generate_secret_code(&mut self.rng, allow_duplicates)
    }
}

impl std::fmt::Debug for SecretGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SecretGenerator {{ seed: {} }}", self.seed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use itertools::Itertools;

    #[test]
    fn test_unique_digits_without_duplicates() {
        let mut generator = SecretGenerator::new(Some(1234));
        for _ in 0..1_000 {
            let code = generator.generate(false);
            assert!(code.iter().all(|d| *d <= MAX_DIGIT));
            assert_eq!(code.iter().unique().count(), CODE_LENGTH, "{:?}", code);
        }
    }

    #[test]
    fn test_duplicates_allowed_eventually_repeat() {
        let mut generator = SecretGenerator::new(Some(99));
        let codes: Vec<Code> = (0..1_000).map(|_| generator.generate(true)).collect();
        assert!(codes.iter().flatten().all(|d| *d <= MAX_DIGIT));
        assert!(codes
            .iter()
            .any(|code| code.iter().unique().count() < CODE_LENGTH));
    }

    #[test]
    fn test_same_seed_same_codes() {
        let mut a = SecretGenerator::new(Some(5));
        let mut b = SecretGenerator::new(Some(5));
        assert_eq!(a.seed(), 5);
        for _ in 0..20 {
            assert_eq!(a.generate(true), b.generate(true));
        }
    }
}
