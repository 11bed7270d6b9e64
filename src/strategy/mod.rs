pub mod marginal;
pub mod mulligan;

pub use marginal::{marginal_value_for, marginal_values, no_mulligan_success, MarginalValue};
pub use mulligan::{compute_strategy, HandOutcome, MulliganParams, Strategy, StrategyCache, HAND_SIZE};
