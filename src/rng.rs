use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Seeded random number generator for reproducible simulations.
///
/// Every Monte Carlo entry point takes a base seed and derives one `SimRng`
/// per trial, so a fixed base seed reproduces the exact trial sequence no
/// matter how the trials are scheduled across threads.
#[derive(Clone)]
pub struct SimRng {
    rng: ChaCha8Rng,
    seed: u64,
}

impl SimRng {
    /// Create a new SimRng; a random seed is generated when `seed` is None.
    pub fn new(seed: Option<u64>) -> Self {
        let seed = seed.unwrap_or_else(|| rand::thread_rng().gen());
        SimRng {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// The seed this generator was constructed with.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Uniform random number in [0, 1).
    pub fn random(&mut self) -> f64 {
        self.rng.gen()
    }

    /// Uniform random integer in [0, max).
    pub fn random_range(&mut self, max: usize) -> usize {
        self.rng.gen_range(0..max)
    }

    /// Fisher-Yates shuffle of the whole slice.
    pub fn shuffle<T>(&mut self, cards: &mut [T]) {
        for i in (1..cards.len()).rev() {
            let j = self.random_range(i + 1);
            cards.swap(i, j);
        }
    }

    /// Shuffle only the first `k` positions, each drawn uniformly from the
    /// remaining tail. Equivalent to a full shuffle restricted to the prefix,
    /// in O(k) swaps; used when a trial only reveals the top of the library.
    pub fn partial_shuffle<T>(&mut self, cards: &mut [T], k: usize) {
        let len = cards.len();
        for i in 0..k.min(len.saturating_sub(1)) {
            let j = i + self.random_range(len - i);
            cards.swap(i, j);
        }
    }
}
