//! Joint draw probabilities for an arbitrary number of labeled card types.
//!
//! Generalizes the closed forms in [`crate::prob::hypergeometric`] past three
//! types via depth-first enumeration of per-type draw counts. Cost is
//! combinatorial in the number of types and the draw size; both stay small for
//! deck queries (a handful of tracked categories, draws under ~15).

use crate::prob::combinatorics::choose;
use crate::prob::hypergeometric::{at_least, at_least_three, at_least_two};

/// Probability of drawing exactly `type_drawn[i]` cards of each labeled type
/// in `draws` draws, the remainder coming from the unlabeled pool.
///
/// Impossible count vectors return 0. Mismatched slice lengths or labeled
/// totals exceeding the population are programmer errors and panic.
pub fn joint_exact(
    population: u32,
    type_totals: &[u32],
    draws: u32,
    type_drawn: &[u32],
) -> f64 {
    assert_eq!(
        type_totals.len(),
        type_drawn.len(),
        "type_totals and type_drawn must have the same length"
    );
    let labeled_total: u64 = type_totals.iter().map(|t| *t as u64).sum();
    assert!(
        labeled_total <= population as u64,
        "labeled card counts ({}) exceed population ({})",
        labeled_total,
        population
    );

    let drawn_total: u64 = type_drawn.iter().map(|d| *d as u64).sum();
    if drawn_total > draws as u64 {
        return 0.0;
    }
    let other_total = population as u64 - labeled_total;
    let other_drawn = draws as u64 - drawn_total;
    if other_drawn > other_total {
        return 0.0;
    }

    let total = choose(population as i64, draws as i64);
    if total == 0.0 {
        return 0.0;
    }
    let mut p = choose(other_total as i64, other_drawn as i64);
    for (total_i, drawn_i) in type_totals.iter().zip(type_drawn) {
        p *= choose(*total_i as i64, *drawn_i as i64);
        if p == 0.0 {
            return 0.0;
        }
    }
    p / total
}

/// Probability of drawing at least `min_drawn[i]` cards of every labeled type
/// simultaneously in `draws` draws.
///
/// Up to three types this delegates to the closed-form variants; beyond that
/// it walks the per-type count lattice depth first, bounding each count by
/// the type's pool and the remaining draw slots, and accumulates
/// [`joint_exact`] at every complete assignment.
pub fn joint_at_least(
    population: u32,
    type_totals: &[u32],
    draws: u32,
    min_drawn: &[u32],
) -> f64 {
    assert_eq!(
        type_totals.len(),
        min_drawn.len(),
        "type_totals and min_drawn must have the same length"
    );
    match type_totals.len() {
        0 => {
            if draws <= population {
                1.0
            } else {
                0.0
            }
        }
        1 => at_least(population, type_totals[0], draws, min_drawn[0]),
        2 => at_least_two(
            population,
            type_totals[0],
            type_totals[1],
            draws,
            min_drawn[0],
            min_drawn[1],
        ),
        3 => at_least_three(
            population,
            type_totals[0],
            type_totals[1],
            type_totals[2],
            draws,
            min_drawn[0],
            min_drawn[1],
            min_drawn[2],
        ),
        _ => {
            let mut assigned = Vec::with_capacity(type_totals.len());
            enumerate_at_least(population, type_totals, draws, min_drawn, &mut assigned, 0)
        }
    }
}

/// Depth-first walk over per-type counts; each leaf is one `joint_exact` call.
fn enumerate_at_least(
    population: u32,
    type_totals: &[u32],
    draws: u32,
    min_drawn: &[u32],
    assigned: &mut Vec<u32>,
    used: u32,
) -> f64 {
    let idx = assigned.len();
    if idx == type_totals.len() {
        return joint_exact(population, type_totals, draws, assigned);
    }
    let hi = type_totals[idx].min(draws - used);
    if min_drawn[idx] > hi {
        // This type can no longer meet its minimum; the whole branch is dead
        return 0.0;
    }
    let mut sum = 0.0;
    for count in min_drawn[idx]..=hi {
        assigned.push(count);
        sum += enumerate_at_least(population, type_totals, draws, min_drawn, assigned, used + count);
        assigned.pop();
    }
    sum
}
