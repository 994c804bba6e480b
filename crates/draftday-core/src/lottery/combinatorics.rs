// Binomial coefficients and lexicographic enumeration of ball combinations.

/// Number of ways to choose `k` items out of `n`.
///
/// Uses the multiplicative formula up to `min(k, n - k)`, dividing out the
/// common factor at every step so intermediate values never exceed the
/// result. Out-of-range `k` (negative or larger than `n`) yields 0, the same
/// convention scientific libraries use for `comb`. Saturates at `u128::MAX`
/// for results too large to represent.
pub fn combinations_count(n: i64, k: i64) -> u128 {
    checked_combinations_count(n, k).unwrap_or(u128::MAX)
}

/// Like [`combinations_count`], but returns `None` on overflow.
pub fn checked_combinations_count(n: i64, k: i64) -> Option<u128> {
    if n < 0 || k < 0 || k > n {
        return Some(0);
    }
    if k == 0 || k == n {
        return Some(1);
    }

    let n = n as u128;
    let k = (k as u128).min(n - k as u128);

    let mut total: u128 = 1;
    for i in 0..k {
        // total * (n - i) is always divisible by (i + 1); split the division
        // across both factors so the multiplication stays within the result.
        let numerator = n - i;
        let denominator = i + 1;
        let g = gcd(total, denominator);
        let reduced_total = total / g;
        let reduced_denominator = denominator / g;
        total = reduced_total.checked_mul(numerator / reduced_denominator)?;
    }
    Some(total)
}

fn gcd(mut a: u128, mut b: u128) -> u128 {
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a
}

/// All `k`-element sorted combinations of `0..n`, in lexicographic order.
///
/// The position of a combination in this list equals [`combination_rank`].
pub fn enumerate_combinations(n: usize, k: usize) -> Vec<Vec<usize>> {
    let mut out = Vec::new();
    if k > n {
        return out;
    }

    let mut current: Vec<usize> = (0..k).collect();
    loop {
        out.push(current.clone());

        // Find the rightmost slot that can still be advanced.
        let Some(i) = (0..k).rev().find(|&i| current[i] < n - k + i) else {
            break;
        };
        current[i] += 1;
        for j in i + 1..k {
            current[j] = current[j - 1] + 1;
        }
    }
    out
}

/// Lexicographic rank of a sorted combination of `0..n`.
///
/// `combo` must be strictly increasing with every element `< n`.
pub fn combination_rank(n: usize, combo: &[usize]) -> usize {
    let k = combo.len();
    let mut rank = 0usize;
    let mut next_candidate = 0usize;

    for (i, &c) in combo.iter().enumerate() {
        // Count the combinations that would have placed a smaller value in
        // slot `i` while agreeing on all earlier slots.
        for skipped in next_candidate..c {
            rank += combinations_count((n - 1 - skipped) as i64, (k - 1 - i) as i64) as usize;
        }
        next_candidate = c + 1;
    }
    rank
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_values() {
        assert_eq!(combinations_count(4, 2), 6);
        assert_eq!(combinations_count(12, 4), 495);
        assert_eq!(combinations_count(14, 4), 1001);
        assert_eq!(combinations_count(52, 5), 2_598_960);
    }

    #[test]
    fn edges_return_one() {
        for n in 0..20 {
            assert_eq!(combinations_count(n, 0), 1);
            assert_eq!(combinations_count(n, n), 1);
        }
    }

    #[test]
    fn out_of_range_returns_zero() {
        assert_eq!(combinations_count(5, -1), 0);
        assert_eq!(combinations_count(5, 6), 0);
        assert_eq!(combinations_count(-3, 2), 0);
    }

    #[test]
    fn symmetry_holds() {
        for n in 0..40 {
            for k in 0..=n {
                assert_eq!(combinations_count(n, k), combinations_count(n, n - k));
            }
        }
    }

    #[test]
    fn large_values_are_exact() {
        // C(100, 50) = 100891344545564193334812497256
        assert_eq!(
            combinations_count(100, 50),
            100_891_344_545_564_193_334_812_497_256
        );
    }

    #[test]
    fn overflow_is_detected() {
        assert_eq!(checked_combinations_count(500, 250), None);
        assert_eq!(combinations_count(500, 250), u128::MAX);
    }

    #[test]
    fn enumeration_matches_count_and_order() {
        let combos = enumerate_combinations(5, 3);
        assert_eq!(combos.len() as u128, combinations_count(5, 3));
        assert_eq!(combos.first().unwrap(), &vec![0, 1, 2]);
        assert_eq!(combos.last().unwrap(), &vec![2, 3, 4]);
        assert!(combos.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn enumeration_of_zero_balls_is_single_empty_combination() {
        assert_eq!(enumerate_combinations(4, 0), vec![Vec::<usize>::new()]);
        assert!(enumerate_combinations(2, 3).is_empty());
    }

    #[test]
    fn rank_agrees_with_enumeration() {
        for (n, k) in [(4, 2), (6, 3), (12, 4), (7, 1), (5, 5)] {
            for (i, combo) in enumerate_combinations(n, k).iter().enumerate() {
                assert_eq!(combination_rank(n, combo), i, "n={n} k={k} combo={combo:?}");
            }
        }
    }
}
