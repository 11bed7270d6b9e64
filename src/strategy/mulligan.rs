//! Keep-or-mulligan strategy for opening hands.
//!
//! Enumerates every reachable opening-hand composition over the tracked
//! categories, scores each hand's chance of meeting all per-category
//! requirements in time, and derives a keep threshold from the best
//! achievable hand. The mulligan expected value uses a one-level lookahead
//! (a fresh seven discounted once by the penalty), not the infinite-horizon
//! fixed point; that heuristic is the defined behavior, kept deliberately.

use crate::deck::DeckConfig;
use crate::prob::multivariate::{joint_at_least, joint_exact};
use serde::Serialize;
use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};

/// Opening hand size before any mulligans.
pub const HAND_SIZE: u32 = 7;

/// How many mulligan stages the expected-hand-size sum considers before
/// truncating; the leftover probability mass below `STAGE_MASS_CUTOFF` is
/// renormalized away.
const STAGE_LIMIT: usize = 10;
const STAGE_MASS_CUTOFF: f64 = 1e-4;

/// Tunable knobs for the keep/mulligan decision.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct MulliganParams {
    /// Fractional success cost of taking a mulligan, in [0, 1]. A hand is
    /// kept when its success chance is within this fraction of the best
    /// achievable hand's.
    pub penalty: f64,
    /// First mulligan is free (no penalty discount on its lookahead value).
    pub free_mulligan: bool,
    /// On the play the deciding turn grants one fewer draw.
    pub on_the_play: bool,
}

impl Default for MulliganParams {
    fn default() -> Self {
        MulliganParams {
            penalty: 0.2,
            free_mulligan: false,
            on_the_play: false,
        }
    }
}

/// One reachable opening-hand composition over the tracked categories.
#[derive(Debug, Clone, Serialize)]
pub struct HandOutcome {
    /// Copies of each tracked category in the opening seven, in declaration
    /// order; untracked cards fill the remainder.
    pub counts: Vec<u32>,
    /// Probability of drawing exactly this composition.
    pub hand_prob: f64,
    /// Probability of meeting every category requirement in time, starting
    /// from this hand.
    pub success_prob: f64,
    pub keep: bool,
}

/// The full keep/mulligan policy for one deck configuration.
#[derive(Debug, Clone, Serialize)]
pub struct Strategy {
    pub hands: Vec<HandOutcome>,
    /// Best success probability over all enumerable hands.
    pub best_keep_prob: f64,
    /// Keep cutoff: `best_keep_prob * (1 - penalty)`. Ties keep.
    pub threshold: f64,
    /// Probability that a fresh seven is kept.
    pub keep_prob: f64,
    /// Overall success probability under the policy, using the one-level
    /// mulligan lookahead.
    pub expected_success: f64,
    /// Mean mulligans taken before keeping (geometric).
    pub avg_mulligans: f64,
    /// Expected hand size at the moment of keeping.
    pub expected_cards: f64,
}

/// Compute the keep/mulligan strategy for a deck.
///
/// Returns `None` for degenerate configurations: a deck smaller than an
/// opening hand, no tracked categories, or all categories empty. Everything
/// else, including unreachable requirements, flows through the probability
/// math and simply scores 0.
pub fn compute_strategy(deck: &DeckConfig, params: &MulliganParams) -> Option<Strategy> {
    assert!(
        (0.0..=1.0).contains(&params.penalty),
        "penalty must lie in [0, 1], got {}",
        params.penalty
    );

    if deck.deck_size < HAND_SIZE
        || deck.types.is_empty()
        || deck.types.iter().all(|t| t.count == 0)
    {
        return None;
    }

    let totals = deck.type_counts();
    let mut hands: Vec<HandOutcome> = Vec::new();
    let mut counts = Vec::with_capacity(totals.len());
    enumerate_hands(deck, &totals, params, &mut counts, &mut hands);
    if hands.is_empty() {
        return None;
    }

    let best_keep_prob = hands
        .iter()
        .map(|h| h.success_prob)
        .fold(0.0, f64::max);
    let threshold = best_keep_prob * (1.0 - params.penalty);
    for hand in &mut hands {
        hand.keep = hand.success_prob >= threshold;
    }

    let keep_prob: f64 = hands.iter().filter(|h| h.keep).map(|h| h.hand_prob).sum();
    let kept_success: f64 = hands
        .iter()
        .filter(|h| h.keep)
        .map(|h| h.hand_prob * h.success_prob)
        .sum();
    let mulligan_prob = 1.0 - keep_prob;

    // One-level lookahead: a mulligan is worth a fresh seven's best outcome
    // already discounted once by the penalty.
    let penalized_outcome = best_keep_prob * (1.0 - params.penalty);
    let ev_penalized = kept_success + mulligan_prob * penalized_outcome;
    let expected_success = if params.free_mulligan {
        kept_success + mulligan_prob * ev_penalized
    } else {
        ev_penalized
    };

    let avg_mulligans = if keep_prob > 0.0 {
        (1.0 - keep_prob) / keep_prob
    } else {
        0.0
    };
    let expected_cards = expected_hand_size(keep_prob, params.free_mulligan);

    Some(Strategy {
        hands,
        best_keep_prob,
        threshold,
        keep_prob,
        expected_success,
        avg_mulligans,
        expected_cards,
    })
}

/// Recursively generate every count vector with `counts[i] <= min(total_i,
/// remaining)` summing to at most `HAND_SIZE`, scoring each as it completes.
fn enumerate_hands(
    deck: &DeckConfig,
    totals: &[u32],
    params: &MulliganParams,
    counts: &mut Vec<u32>,
    hands: &mut Vec<HandOutcome>,
) {
    let idx = counts.len();
    if idx == totals.len() {
        let hand_prob = joint_exact(deck.deck_size, totals, HAND_SIZE, counts);
        if hand_prob <= 0.0 {
            return;
        }
        let success_prob = success_from_hand(deck, counts, params.on_the_play);
        hands.push(HandOutcome {
            counts: counts.clone(),
            hand_prob,
            success_prob,
            keep: false,
        });
        return;
    }
    let used: u32 = counts.iter().sum();
    let hi = totals[idx].min(HAND_SIZE - used);
    for count in 0..=hi {
        counts.push(count);
        enumerate_hands(deck, totals, params, counts, hands);
        counts.pop();
    }
}

/// Probability that a hand holding `have[i]` copies of each category still
/// reaches every requirement by the deciding turn.
///
/// The deciding turn is the latest `by_turn` across categories; on the play
/// it grants one fewer draw. Already-satisfied hands succeed outright, and a
/// hand that needs cards with no draws left fails outright; only the
/// remaining cases pay for a probability computation against the leftover
/// library.
fn success_from_hand(deck: &DeckConfig, have: &[u32], on_the_play: bool) -> f64 {
    let max_turn = deck.types.iter().map(|t| t.by_turn).max().unwrap_or(1);
    let draws = if on_the_play {
        max_turn.saturating_sub(1)
    } else {
        max_turn
    };

    let needs: Vec<u32> = deck
        .types
        .iter()
        .zip(have)
        .map(|(t, h)| t.required.saturating_sub(*h))
        .collect();
    if needs.iter().all(|n| *n == 0) {
        return 1.0;
    }
    if draws == 0 {
        return 0.0;
    }

    let pools: Vec<u32> = deck
        .types
        .iter()
        .zip(have)
        .map(|(t, h)| t.count - h)
        .collect();
    joint_at_least(deck.deck_size - HAND_SIZE, &pools, draws, &needs)
}

/// Expected hand size at the moment of keeping, summed over mulligan stages.
///
/// Stage i keeps with probability `keep_prob * (1 - keep_prob)^i` at a hand
/// size one smaller per mulligan taken, except that a free first mulligan
/// redraws a full seven. Truncated at `STAGE_LIMIT` stages or once the
/// unresolved mass drops below `STAGE_MASS_CUTOFF`, then renormalized by the
/// mass actually accumulated.
fn expected_hand_size(keep_prob: f64, free_mulligan: bool) -> f64 {
    if keep_prob <= 0.0 {
        return 0.0;
    }
    let mut expected = 0.0;
    let mut mass = 0.0;
    let mut miss = 1.0;
    for stage in 0..STAGE_LIMIT {
        let mulligans_paid = if free_mulligan {
            stage.saturating_sub(1)
        } else {
            stage
        };
        let cards = (HAND_SIZE as usize).saturating_sub(mulligans_paid);
        let keep_here = miss * keep_prob;
        expected += keep_here * cards as f64;
        mass += keep_here;
        miss *= 1.0 - keep_prob;
        if miss < STAGE_MASS_CUTOFF {
            break;
        }
    }
    expected / mass
}

/// Caller-owned memo for repeated strategy queries.
///
/// Keyed by a canonical hash of the deck composition and every parameter, so
/// any change to either recomputes; a hit returns exactly what a miss would
/// compute. Owned by the caller rather than ambient, so concurrent
/// computations over different decks cannot interfere.
#[derive(Default)]
pub struct StrategyCache {
    entries: HashMap<u64, Strategy>,
}

impl StrategyCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch or compute the strategy for this deck and parameter set.
    pub fn strategy(&mut self, deck: &DeckConfig, params: &MulliganParams) -> Option<Strategy> {
        let key = cache_key(deck, params);
        if let Some(hit) = self.entries.get(&key) {
            return Some(hit.clone());
        }
        let computed = compute_strategy(deck, params)?;
        self.entries.insert(key, computed.clone());
        Some(computed)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

fn cache_key(deck: &DeckConfig, params: &MulliganParams) -> u64 {
    let mut hasher = DefaultHasher::new();
    deck.deck_size.hash(&mut hasher);
    for t in &deck.types {
        t.name.hash(&mut hasher);
        t.count.hash(&mut hasher);
        t.required.hash(&mut hasher);
        t.by_turn.hash(&mut hasher);
    }
    params.penalty.to_bits().hash(&mut hasher);
    params.free_mulligan.hash(&mut hasher);
    params.on_the_play.hash(&mut hasher);
    hasher.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deck::CardType;

    const TOL: f64 = 1e-9;

    fn lands_deck(deck_size: u32, lands: u32, required: u32, by_turn: u32) -> DeckConfig {
        DeckConfig::new(
            deck_size,
            vec![CardType {
                name: "Lands".into(),
                count: lands,
                required,
                by_turn,
            }],
        )
        .expect("valid deck")
    }

    #[test]
    fn test_hand_probs_partition() {
        let deck = lands_deck(99, 36, 2, 3);
        let strategy = compute_strategy(&deck, &MulliganParams::default()).expect("strategy");
        let total: f64 = strategy.hands.iter().map(|h| h.hand_prob).sum();
        assert!(
            (total - 1.0).abs() < TOL,
            "hand probabilities should partition the hand space, got {}",
            total
        );
    }

    #[test]
    fn test_probabilities_in_unit_interval() {
        let deck = DeckConfig::new(
            60,
            vec![
                CardType { name: "Lands".into(), count: 24, required: 2, by_turn: 2 },
                CardType { name: "Ramp".into(), count: 8, required: 1, by_turn: 3 },
            ],
        )
        .expect("valid deck");
        let strategy = compute_strategy(&deck, &MulliganParams::default()).expect("strategy");
        for hand in &strategy.hands {
            assert!((0.0..=1.0).contains(&hand.hand_prob));
            assert!(
                hand.success_prob >= -TOL && hand.success_prob <= 1.0 + TOL,
                "success out of range: {}",
                hand.success_prob
            );
        }
    }

    #[test]
    fn test_best_hand_is_always_kept() {
        let deck = lands_deck(99, 36, 2, 3);
        let strategy = compute_strategy(&deck, &MulliganParams::default()).expect("strategy");
        for hand in &strategy.hands {
            if hand.success_prob == strategy.best_keep_prob {
                assert!(hand.keep, "a best hand must be kept");
            }
        }
    }

    #[test]
    fn test_threshold_rule() {
        let deck = lands_deck(99, 36, 2, 3);
        let params = MulliganParams { penalty: 0.2, ..Default::default() };
        let strategy = compute_strategy(&deck, &params).expect("strategy");
        assert!(
            (strategy.threshold - strategy.best_keep_prob * 0.8).abs() < TOL,
            "threshold should be best * (1 - penalty)"
        );
        for hand in &strategy.hands {
            assert_eq!(hand.keep, hand.success_prob >= strategy.threshold);
        }
    }

    #[test]
    fn test_satisfied_hand_succeeds_outright() {
        // Hands already holding 2+ lands need nothing more
        let deck = lands_deck(99, 36, 2, 3);
        let strategy = compute_strategy(&deck, &MulliganParams::default()).expect("strategy");
        for hand in &strategy.hands {
            if hand.counts[0] >= 2 {
                assert!((hand.success_prob - 1.0).abs() < TOL);
            }
        }
    }

    #[test]
    fn test_no_draws_and_unmet_requirement_fails() {
        // On the play with by_turn 1 there are zero post-hand draws
        let deck = lands_deck(60, 24, 2, 1);
        let params = MulliganParams { on_the_play: true, ..Default::default() };
        let strategy = compute_strategy(&deck, &params).expect("strategy");
        for hand in &strategy.hands {
            if hand.counts[0] < 2 {
                assert_eq!(hand.success_prob, 0.0);
            } else {
                assert!((hand.success_prob - 1.0).abs() < TOL);
            }
        }
    }

    #[test]
    fn test_on_the_play_never_helps() {
        let deck = lands_deck(99, 36, 3, 4);
        let draw = compute_strategy(&deck, &MulliganParams::default()).expect("strategy");
        let play = compute_strategy(
            &deck,
            &MulliganParams { on_the_play: true, ..Default::default() },
        )
        .expect("strategy");
        assert!(
            play.best_keep_prob <= draw.best_keep_prob + TOL,
            "one fewer draw cannot raise the best hand's chances"
        );
        assert!(play.expected_success <= draw.expected_success + TOL);
    }

    #[test]
    fn test_more_copies_never_hurt_best_hand() {
        // Requiring 8 keeps even the best hand short of certainty, so the
        // extra copy moves a real number. Same deck size, one extra copy.
        let base = compute_strategy(&lands_deck(99, 36, 8, 5), &MulliganParams::default())
            .expect("strategy");
        let more = compute_strategy(&lands_deck(99, 37, 8, 5), &MulliganParams::default())
            .expect("strategy");
        assert!(base.best_keep_prob < 1.0, "requirement should not be hand-satisfiable");
        assert!(more.best_keep_prob >= base.best_keep_prob - TOL);

        // And the saturated case stays saturated
        let easy = compute_strategy(&lands_deck(99, 37, 2, 3), &MulliganParams::default())
            .expect("strategy");
        assert!((easy.best_keep_prob - 1.0).abs() < TOL);
    }

    #[test]
    fn test_keep_everything_when_penalty_is_total() {
        // penalty = 1 makes the threshold 0, so every hand keeps
        let deck = lands_deck(99, 36, 2, 3);
        let params = MulliganParams { penalty: 1.0, ..Default::default() };
        let strategy = compute_strategy(&deck, &params).expect("strategy");
        assert!(strategy.hands.iter().all(|h| h.keep));
        assert!((strategy.keep_prob - 1.0).abs() < TOL);
        assert!(strategy.avg_mulligans.abs() < TOL);
        assert!((strategy.expected_cards - 7.0).abs() < TOL);
    }

    #[test]
    fn test_free_mulligan_never_lowers_expected_success() {
        let deck = lands_deck(99, 36, 2, 3);
        let paid = compute_strategy(&deck, &MulliganParams::default()).expect("strategy");
        let free = compute_strategy(
            &deck,
            &MulliganParams { free_mulligan: true, ..Default::default() },
        )
        .expect("strategy");
        assert!(free.expected_success >= paid.expected_success - TOL);
    }

    #[test]
    fn test_avg_mulligans_is_geometric() {
        let deck = lands_deck(99, 36, 2, 3);
        let strategy = compute_strategy(&deck, &MulliganParams::default()).expect("strategy");
        let expected = (1.0 - strategy.keep_prob) / strategy.keep_prob;
        assert!((strategy.avg_mulligans - expected).abs() < TOL);
    }

    #[test]
    fn test_expected_cards_bounds() {
        let deck = lands_deck(99, 36, 2, 3);
        let strategy = compute_strategy(&deck, &MulliganParams::default()).expect("strategy");
        assert!(strategy.expected_cards <= 7.0 + TOL);
        assert!(strategy.expected_cards > 0.0);

        let free = compute_strategy(
            &deck,
            &MulliganParams { free_mulligan: true, ..Default::default() },
        )
        .expect("strategy");
        assert!(
            free.expected_cards >= strategy.expected_cards - TOL,
            "a free mulligan cannot shrink the expected kept hand"
        );
    }

    #[test]
    fn test_degenerate_configs_return_none() {
        let empty_types = DeckConfig::new(60, vec![]).expect("valid deck");
        assert!(compute_strategy(&empty_types, &MulliganParams::default()).is_none());

        let zero_counts = DeckConfig::new(
            60,
            vec![CardType { name: "Lands".into(), count: 0, required: 0, by_turn: 1 }],
        )
        .expect("valid deck");
        assert!(compute_strategy(&zero_counts, &MulliganParams::default()).is_none());

        let tiny = lands_deck(5, 2, 1, 1);
        assert!(compute_strategy(&tiny, &MulliganParams::default()).is_none());
    }

    #[test]
    fn test_unreachable_requirement_scores_zero_not_error() {
        // Requiring 5 copies of a 3-copy type can never succeed
        let deck = lands_deck(60, 3, 5, 2);
        let strategy = compute_strategy(&deck, &MulliganParams::default()).expect("strategy");
        assert_eq!(strategy.best_keep_prob, 0.0);
        assert_eq!(strategy.expected_success, 0.0);
    }

    #[test]
    #[should_panic(expected = "penalty must lie in [0, 1]")]
    fn test_out_of_range_penalty_panics() {
        let deck = lands_deck(60, 24, 2, 2);
        let _ = compute_strategy(&deck, &MulliganParams { penalty: 1.5, ..Default::default() });
    }

    #[test]
    fn test_cache_hit_equals_miss() {
        let deck = lands_deck(99, 36, 2, 3);
        let params = MulliganParams::default();
        let mut cache = StrategyCache::new();

        let miss = cache.strategy(&deck, &params).expect("strategy");
        assert_eq!(cache.len(), 1);
        let hit = cache.strategy(&deck, &params).expect("strategy");
        assert_eq!(cache.len(), 1);

        assert_eq!(miss.hands.len(), hit.hands.len());
        assert_eq!(miss.expected_success, hit.expected_success);
        assert_eq!(miss.threshold, hit.threshold);

        let direct = compute_strategy(&deck, &params).expect("strategy");
        assert_eq!(hit.expected_success, direct.expected_success);
    }

    #[test]
    fn test_cache_distinguishes_params() {
        let deck = lands_deck(99, 36, 2, 3);
        let mut cache = StrategyCache::new();
        assert!(cache.strategy(&deck, &MulliganParams::default()).is_some());
        assert!(cache
            .strategy(&deck, &MulliganParams { penalty: 0.1, ..Default::default() })
            .is_some());
        assert_eq!(cache.len(), 2, "different params must key separately");
    }
}
