use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

// Fixed random_state, sklearn-style
const RANDOM_SEED: u64 = 0;

pub fn new() -> impl Rng {
    Xoshiro256PlusPlus::seed_from_u64(RANDOM_SEED)
}
