/// Binomial coefficient "n choose k" as a float.
///
/// Out-of-range arguments (`k < 0`, `k > n`, `n < 0`) return 0 rather than
/// erroring: in the probability formulas built on top of this, an impossible
/// selection is a zero-probability event, not an exception.
///
/// Computed by iterative multiply-then-divide over `min(k, n-k)` factors,
/// which keeps intermediate magnitudes bounded for library-sized `n`.
/// Accurate to ~1e-9 relative error up to n = 300; beyond a few hundred,
/// precision degrades and results should be checked against reference values.
pub fn choose(n: i64, k: i64) -> f64 {
    if n < 0 || k < 0 || k > n {
        return 0.0;
    }
    if k == 0 || k == n {
        return 1.0;
    }
    let k = k.min(n - k);
    let mut result = 1.0;
    for i in 0..k {
        // Multiply before dividing: each prefix is itself a binomial
        // coefficient, so the division stays exact while values fit the
        // f64 mantissa
        result = result * (n - i) as f64 / (i + 1) as f64;
    }
    result
}

/// n! as a float. Overflows to infinity past n = 170.
pub fn factorial(n: u32) -> f64 {
    let mut result = 1.0;
    for i in 2..=n as u64 {
        result *= i as f64;
    }
    result
}
