//! Marginal value of one extra copy of each tracked category.
//!
//! Answers "what is the 37th land worth": for each category, the whole
//! strategy is recomputed with one more copy of that category and one more
//! card in the deck, and the movement in the headline numbers is reported.

use crate::deck::DeckConfig;
use crate::strategy::mulligan::{compute_strategy, MulliganParams, Strategy};
use serde::Serialize;

/// Movement in the headline numbers from adding one copy of a category.
#[derive(Debug, Clone, Serialize)]
pub struct MarginalValue {
    pub type_name: String,
    /// Change in expected success under the keep/mulligan policy.
    pub expected_success_delta: f64,
    /// Change in the keep-everything baseline (success weighted over all
    /// hands, unconditional on the keep decision).
    pub no_mulligan_delta: f64,
}

/// Success probability if every hand were kept, mulligans ignored.
pub fn no_mulligan_success(strategy: &Strategy) -> f64 {
    strategy
        .hands
        .iter()
        .map(|h| h.hand_prob * h.success_prob)
        .sum()
}

/// Marginal value of one extra copy of the category at `type_index`.
///
/// Returns `None` when the base configuration is degenerate.
pub fn marginal_value_for(
    deck: &DeckConfig,
    params: &MulliganParams,
    type_index: usize,
) -> Option<MarginalValue> {
    assert!(
        type_index < deck.types.len(),
        "type_index {} out of range for {} types",
        type_index,
        deck.types.len()
    );
    let base = compute_strategy(deck, params)?;

    let mut grown = deck.clone();
    grown.deck_size += 1;
    grown.types[type_index].count += 1;
    let with_extra = compute_strategy(&grown, params)?;

    Some(MarginalValue {
        type_name: deck.types[type_index].name.clone(),
        expected_success_delta: with_extra.expected_success - base.expected_success,
        no_mulligan_delta: no_mulligan_success(&with_extra) - no_mulligan_success(&base),
    })
}

/// Marginal values for every tracked category.
pub fn marginal_values(deck: &DeckConfig, params: &MulliganParams) -> Option<Vec<MarginalValue>> {
    (0..deck.types.len())
        .map(|i| marginal_value_for(deck, params, i))
        .collect()
}
