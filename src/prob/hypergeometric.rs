//! Exact draw probabilities for 1, 2, and 3 labeled card types.
//!
//! All functions model drawing `draws` cards without replacement from a
//! `population`-card library that contains disjoint labeled subpopulations;
//! whatever is not labeled is the implicit "other" pool. Impossible
//! combinations are worth probability 0, never an error.

use crate::prob::combinatorics::choose;

/// Probability of drawing exactly `target` cards out of a `successes`-card
/// subpopulation in `draws` draws.
pub fn exactly(population: u32, successes: u32, draws: u32, target: u32) -> f64 {
    let (n, k, d, t) = (population as i64, successes as i64, draws as i64, target as i64);
    let total = choose(n, d);
    if total == 0.0 {
        return 0.0;
    }
    choose(k, t) * choose(n - k, d - t) / total
}

/// Probability of drawing at least `target` cards of the subpopulation.
pub fn at_least(population: u32, successes: u32, draws: u32, target: u32) -> f64 {
    let hi = successes.min(draws);
    let mut sum = 0.0;
    for i in target..=hi {
        sum += exactly(population, successes, draws, i);
    }
    sum
}

/// Probability of drawing exactly `drawn_a` of type A and `drawn_b` of type B
/// in `draws` draws, the rest coming from the unlabeled remainder.
pub fn exactly_two(
    population: u32,
    total_a: u32,
    total_b: u32,
    draws: u32,
    drawn_a: u32,
    drawn_b: u32,
) -> f64 {
    let (n, d) = (population as i64, draws as i64);
    let (ta, tb) = (total_a as i64, total_b as i64);
    let (a, b) = (drawn_a as i64, drawn_b as i64);
    let total = choose(n, d);
    if total == 0.0 {
        return 0.0;
    }
    let other_total = n - ta - tb;
    let other_drawn = d - a - b;
    choose(ta, a) * choose(tb, b) * choose(other_total, other_drawn) / total
}

/// Probability of drawing at least `min_a` of type A and `min_b` of type B
/// simultaneously. Sums the exact joint probability over every per-type count
/// combination at or above the minimums; branches whose implicit "other" draw
/// is infeasible are skipped.
pub fn at_least_two(
    population: u32,
    total_a: u32,
    total_b: u32,
    draws: u32,
    min_a: u32,
    min_b: u32,
) -> f64 {
    let other_total = population as i64 - total_a as i64 - total_b as i64;
    let mut sum = 0.0;
    for a in min_a..=total_a.min(draws) {
        for b in min_b..=total_b.min(draws - a) {
            let other_drawn = draws as i64 - a as i64 - b as i64;
            if other_drawn > other_total {
                continue;
            }
            sum += exactly_two(population, total_a, total_b, draws, a, b);
        }
    }
    sum
}

/// Three-type generalization of [`exactly_two`].
#[allow(clippy::too_many_arguments)]
pub fn exactly_three(
    population: u32,
    total_a: u32,
    total_b: u32,
    total_c: u32,
    draws: u32,
    drawn_a: u32,
    drawn_b: u32,
    drawn_c: u32,
) -> f64 {
    let (n, d) = (population as i64, draws as i64);
    let total = choose(n, d);
    if total == 0.0 {
        return 0.0;
    }
    let other_total = n - total_a as i64 - total_b as i64 - total_c as i64;
    let other_drawn = d - drawn_a as i64 - drawn_b as i64 - drawn_c as i64;
    choose(total_a as i64, drawn_a as i64)
        * choose(total_b as i64, drawn_b as i64)
        * choose(total_c as i64, drawn_c as i64)
        * choose(other_total, other_drawn)
        / total
}

/// Three-type generalization of [`at_least_two`].
#[allow(clippy::too_many_arguments)]
pub fn at_least_three(
    population: u32,
    total_a: u32,
    total_b: u32,
    total_c: u32,
    draws: u32,
    min_a: u32,
    min_b: u32,
    min_c: u32,
) -> f64 {
    let other_total =
        population as i64 - total_a as i64 - total_b as i64 - total_c as i64;
    let mut sum = 0.0;
    for a in min_a..=total_a.min(draws) {
        for b in min_b..=total_b.min(draws.saturating_sub(a)) {
            for c in min_c..=total_c.min(draws.saturating_sub(a + b)) {
                let other_drawn = draws as i64 - a as i64 - b as i64 - c as i64;
                if other_drawn > other_total {
                    continue;
                }
                sum += exactly_three(population, total_a, total_b, total_c, draws, a, b, c);
            }
        }
    }
    sum
}
