//! Prime helpers used to size tables.

use crate::limits::{MAXPRIME, MINPRIME};

/// Trial division. Callers never pass `n < 2`.
pub fn is_prime(n: usize) -> bool {
    if n < 2 {
        return false;
    }
    let mut d = 2;
    while d * d <= n {
        if n % d == 0 {
            return false;
        }
        d += 1;
    }
    true
}

/// Smallest prime `p >= max(n, MINPRIME)`, or `MAXPRIME` if there is none
/// below it.
pub fn find_next_prime(n: usize) -> usize {
    (n.max(MINPRIME)..MAXPRIME)
        .find(|&p| is_prime(p))
        .unwrap_or(MAXPRIME)
}

/// Clamp a requested capacity into `[MINPRIME, MAXPRIME]` and round it up
/// to a prime.
pub fn normalize_capacity(requested: usize) -> usize {
    let clamped = requested.clamp(MINPRIME, MAXPRIME);
    if is_prime(clamped) {
        clamped
    } else {
        find_next_prime(clamped)
    }
}
