//! Chained discover-trigger Monte Carlo.
//!
//! A discover trigger digs from the top of the library for the first nonland
//! card at or below a cost threshold and casts it. If the found card has a
//! discover trigger of its own, the dig continues past it at the found
//! card's cost. A lucky deck order can chain several casts off one trigger;
//! the closed form for that recursion is intractable, so it is simulated.

use crate::deck::SimDeck;
use crate::rng::SimRng;
use rayon::prelude::*;

/// Default trial count; see [`crate::simulation::reveal::DEFAULT_REVEAL_ITERATIONS`]
/// for the error/runtime tradeoff.
pub const DEFAULT_DISCOVER_ITERATIONS: usize = 15_000;

/// Cap on chain depth. An unbounded chain is theoretically possible with
/// favorable shuffles; ten links is a termination guarantee, not a rules
/// limit, and raising it would shift the tail statistics slightly.
pub const MAX_CHAIN_DEPTH: usize = 10;

/// Aggregated outcome of a discover-chain simulation.
#[derive(Debug, Clone)]
pub struct DiscoverResults {
    pub iterations: usize,
    /// Mean total mana value cast per trigger.
    pub mean_cost: f64,
    /// Mean cards cast per trigger.
    pub mean_cast: f64,
    /// Fraction of trials that chained (two or more casts).
    pub chain_rate: f64,
    /// Distinct names hittable by the initial trigger, for display.
    pub eligible: Vec<String>,
}

/// Simulate `iterations` discover triggers at `threshold`.
///
/// Each trial shuffles once and resolves one full chain; trial seeds derive
/// from `base_seed` for reproducibility. A trial that runs off the deck
/// without a hit casts nothing.
pub fn simulate_discover_chain(
    deck: &SimDeck,
    threshold: u32,
    max_depth: usize,
    iterations: usize,
    base_seed: u64,
) -> DiscoverResults {
    let mut eligible: Vec<String> = deck
        .cards
        .iter()
        .filter(|c| !c.land && c.cmc <= threshold)
        .map(|c| c.name.clone())
        .collect();
    eligible.sort();
    eligible.dedup();

    if deck.cards.is_empty() || iterations == 0 {
        return DiscoverResults {
            iterations,
            mean_cost: 0.0,
            mean_cast: 0.0,
            chain_rate: 0.0,
            eligible,
        };
    }

    let deck_size = deck.cards.len();
    let trials: Vec<(u64, usize)> = (0..iterations)
        .into_par_iter()
        .map(|trial| {
            let mut rng = SimRng::new(Some(base_seed.wrapping_add(trial as u64)));
            let mut order: Vec<usize> = (0..deck_size).collect();
            rng.shuffle(&mut order);
            chain_from(deck, &order, 0, threshold, 0, max_depth)
        })
        .collect();

    let total_cost: u64 = trials.iter().map(|(cost, _)| cost).sum();
    let total_cast: usize = trials.iter().map(|(_, cast)| cast).sum();
    let chained = trials.iter().filter(|(_, cast)| *cast >= 2).count();

    DiscoverResults {
        iterations,
        mean_cost: total_cost as f64 / iterations as f64,
        mean_cast: total_cast as f64 / iterations as f64,
        chain_rate: chained as f64 / iterations as f64,
        eligible,
    }
}

/// Resolve one trigger: scan from `offset` for the first nonland card at or
/// below `threshold`, cast it, and recurse past it if it discovers in turn.
fn chain_from(
    deck: &SimDeck,
    order: &[usize],
    offset: usize,
    threshold: u32,
    depth: usize,
    max_depth: usize,
) -> (u64, usize) {
    for (pos, idx) in order.iter().enumerate().skip(offset) {
        let card = &deck.cards[*idx];
        if card.land || card.cmc > threshold {
            continue;
        }
        let mut cost = card.cmc as u64;
        let mut cast = 1;
        if card.discover && depth + 1 < max_depth {
            let (chained_cost, chained_cast) =
                chain_from(deck, order, pos + 1, card.cmc, depth + 1, max_depth);
            cost += chained_cost;
            cast += chained_cast;
        }
        return (cost, cast);
    }
    (0, 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deck::SimCardSpec;

    fn spec(name: &str, count: u32, cmc: u32, land: bool, discover: bool) -> SimCardSpec {
        SimCardSpec {
            name: name.into(),
            count,
            cmc,
            land,
            permanent: true,
            discover,
            tags: vec![],
        }
    }

    #[test]
    fn test_all_lands_cast_nothing() {
        let deck = SimDeck::from_specs(&[spec("Forest", 40, 0, true, false)]).expect("valid deck");
        let results = simulate_discover_chain(&deck, 5, MAX_CHAIN_DEPTH, 500, 1);
        assert_eq!(results.mean_cast, 0.0);
        assert_eq!(results.mean_cost, 0.0);
        assert_eq!(results.chain_rate, 0.0);
        assert!(results.eligible.is_empty());
    }

    #[test]
    fn test_no_discover_casts_exactly_one() {
        let deck = SimDeck::from_specs(&[
            spec("Forest", 24, 0, true, false),
            spec("Bear", 36, 2, false, false),
        ])
        .expect("valid deck");
        let results = simulate_discover_chain(&deck, 3, MAX_CHAIN_DEPTH, 1_000, 2);
        assert_eq!(results.mean_cast, 1.0, "every trial finds a bear eventually");
        assert_eq!(results.mean_cost, 2.0);
        assert_eq!(results.chain_rate, 0.0, "no discover cards, no chains");
    }

    #[test]
    fn test_threshold_excludes_expensive_cards() {
        let deck = SimDeck::from_specs(&[
            spec("Dragon", 30, 5, false, false),
            spec("Bear", 10, 2, false, false),
        ])
        .expect("valid deck");
        let results = simulate_discover_chain(&deck, 3, MAX_CHAIN_DEPTH, 1_000, 3);
        assert_eq!(results.eligible, vec!["Bear".to_string()]);
        assert_eq!(results.mean_cost, 2.0, "only bears are castable");
    }

    #[test]
    fn test_chain_depth_cap_bounds_casts() {
        // Every card discovers at its own cost, so chains only end at the
        // depth cap or the deck floor
        let deck =
            SimDeck::from_specs(&[spec("Cascade", 60, 2, false, true)]).expect("valid deck");
        let results = simulate_discover_chain(&deck, 2, 3, 1_000, 4);
        assert_eq!(results.mean_cast, 3.0, "depth cap of 3 means exactly 3 casts");
        assert_eq!(results.mean_cost, 6.0);
        assert_eq!(results.chain_rate, 1.0);
    }

    #[test]
    fn test_chain_rate_counts_multicasts() {
        let deck = SimDeck::from_specs(&[
            spec("Forest", 20, 0, true, false),
            spec("Discoverer", 20, 3, false, true),
            spec("Bear", 20, 2, false, false),
        ])
        .expect("valid deck");
        let results = simulate_discover_chain(&deck, 3, MAX_CHAIN_DEPTH, 2_000, 5);
        assert!(results.mean_cast >= 1.0, "a nonland under threshold always exists");
        assert!(results.chain_rate > 0.0, "discoverers should chain sometimes");
        assert!(results.chain_rate < 1.0, "bears end chains sometimes");
    }

    #[test]
    fn test_same_seed_reproduces_results() {
        let deck = SimDeck::from_specs(&[
            spec("Forest", 24, 0, true, false),
            spec("Discoverer", 12, 4, false, true),
            spec("Bolt", 24, 1, false, false),
        ])
        .expect("valid deck");
        let a = simulate_discover_chain(&deck, 4, MAX_CHAIN_DEPTH, 1_000, 99);
        let b = simulate_discover_chain(&deck, 4, MAX_CHAIN_DEPTH, 1_000, 99);
        assert_eq!(a.mean_cost, b.mean_cost);
        assert_eq!(a.mean_cast, b.mean_cast);
        assert_eq!(a.chain_rate, b.chain_rate);
    }

    #[test]
    fn test_eligible_pool_is_deduped_and_sorted() {
        let deck = SimDeck::from_specs(&[
            spec("Zephyr", 4, 2, false, false),
            spec("Aardvark", 4, 1, false, false),
            spec("Dragon", 4, 7, false, false),
        ])
        .expect("valid deck");
        let results = simulate_discover_chain(&deck, 3, MAX_CHAIN_DEPTH, 10, 6);
        assert_eq!(results.eligible, vec!["Aardvark".to_string(), "Zephyr".to_string()]);
    }
}
