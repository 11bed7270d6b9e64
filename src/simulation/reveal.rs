//! Shuffle-and-reveal Monte Carlo.
//!
//! Covers the scenarios with no pleasant closed form: how many cards come off
//! the top before some stopping card appears, and how many distinct tag
//! categories show up in a fixed-size reveal. Each trial shuffles an index
//! range over the deck and scans from the top.

use crate::deck::{SimCard, SimDeck};
use crate::rng::SimRng;
use rayon::prelude::*;

/// Default trial count. Monte Carlo standard error shrinks as 1/sqrt(trials),
/// so this trades runtime for roughly three decimal places of precision.
pub const DEFAULT_REVEAL_ITERATIONS: usize = 20_000;

/// Aggregated outcome of a reveal simulation.
#[derive(Debug, Clone)]
pub struct RevealResults {
    pub iterations: usize,
    /// Mean of the per-trial statistic.
    pub expected: f64,
    /// Frequency of each statistic value, indexed by value.
    pub distribution: Vec<f64>,
}

impl RevealResults {
    fn empty(iterations: usize) -> Self {
        RevealResults {
            iterations,
            expected: 0.0,
            distribution: Vec::new(),
        }
    }
}

/// Count how many cards are revealed before `stop` fires.
///
/// Each trial shuffles the full deck, then scans from the top; the statistic
/// is the streak length before the first stopping card (deck size if none
/// stops the scan). Trials derive their seeds from `base_seed`, so results
/// are reproducible regardless of rayon's scheduling.
pub fn simulate_reveal_until<F>(
    deck: &SimDeck,
    stop: F,
    iterations: usize,
    base_seed: u64,
) -> RevealResults
where
    F: Fn(&SimCard) -> bool + Sync,
{
    if deck.cards.is_empty() || iterations == 0 {
        return RevealResults::empty(iterations);
    }
    let deck_size = deck.cards.len();
    let streaks: Vec<usize> = (0..iterations)
        .into_par_iter()
        .map(|trial| {
            let mut rng = SimRng::new(Some(base_seed.wrapping_add(trial as u64)));
            let mut order: Vec<usize> = (0..deck_size).collect();
            rng.shuffle(&mut order);
            let mut streak = 0;
            for idx in order {
                if stop(&deck.cards[idx]) {
                    break;
                }
                streak += 1;
            }
            streak
        })
        .collect();
    aggregate(&streaks, deck_size, iterations)
}

/// Streak of permanents revealed before the first non-permanent.
pub fn simulate_permanent_streak(
    deck: &SimDeck,
    iterations: usize,
    base_seed: u64,
) -> RevealResults {
    simulate_reveal_until(deck, |card| !card.permanent, iterations, base_seed)
}

/// Distinct tag categories among the top `reveal_count` cards.
///
/// A card may carry several tags at once, so diversity is the popcount of
/// the OR of the revealed masks. Only the revealed prefix is shuffled.
pub fn simulate_type_diversity(
    deck: &SimDeck,
    reveal_count: usize,
    iterations: usize,
    base_seed: u64,
) -> RevealResults {
    if deck.cards.is_empty() || iterations == 0 {
        return RevealResults::empty(iterations);
    }
    let deck_size = deck.cards.len();
    let reveal_count = reveal_count.min(deck_size);
    let diversities: Vec<usize> = (0..iterations)
        .into_par_iter()
        .map(|trial| {
            let mut rng = SimRng::new(Some(base_seed.wrapping_add(trial as u64)));
            let mut order: Vec<usize> = (0..deck_size).collect();
            rng.partial_shuffle(&mut order, reveal_count);
            let mut seen = 0u32;
            for idx in &order[..reveal_count] {
                seen |= deck.cards[*idx].type_mask;
            }
            seen.count_ones() as usize
        })
        .collect();
    aggregate(&diversities, deck.tag_count(), iterations)
}

fn aggregate(values: &[usize], max_value: usize, iterations: usize) -> RevealResults {
    let mut freq = vec![0usize; max_value + 1];
    for &v in values {
        freq[v.min(max_value)] += 1;
    }
    let expected = values.iter().sum::<usize>() as f64 / iterations as f64;
    RevealResults {
        iterations,
        expected,
        distribution: freq
            .iter()
            .map(|f| *f as f64 / iterations as f64)
            .collect(),
    }
}
