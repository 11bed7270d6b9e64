pub mod discover;
pub mod reveal;

pub use discover::{simulate_discover_chain, DiscoverResults, DEFAULT_DISCOVER_ITERATIONS, MAX_CHAIN_DEPTH};
pub use reveal::{
    simulate_permanent_streak, simulate_reveal_until, simulate_type_diversity, RevealResults,
    DEFAULT_REVEAL_ITERATIONS,
};
