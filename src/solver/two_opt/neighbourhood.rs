use crate::domain::types::{DistanceMatrix, Route};
use crate::error::{TspError, TspResult};
use crate::evaluation::fitness::dist_between;
use crate::utils::{next_index, prev_index};

/// The 2-opt move: a copy of `route` with positions `m..=n` reversed.
///
/// Edges `(r[m-1], r[m])` and `(r[n], r[n+1])` (positions taken cyclically)
/// become `(r[m-1], r[n])` and `(r[m], r[n+1])`. Applying the same move twice
/// restores the original order.
pub fn two_opt_swap(route: &Route, m: usize, n: usize) -> TspResult<Route> {
    let mut swapped = route.clone();
    reverse_segment(&mut swapped.route, m, n)?;
    Ok(swapped)
}

/// In-place form of [`two_opt_swap`]. Requires `m < n < route.len()`.
pub fn reverse_segment(route: &mut [usize], m: usize, n: usize) -> TspResult<()> {
    let dim = route.len();
    if m >= n || n >= dim {
        return Err(TspError::IndexOutOfRange { m, n, dim });
    }
    route[m..=n].reverse();
    Ok(())
}

/// Change in tour length if positions `m..=n` were reversed.
///
/// Only the two removed and two added edges are read. Reversing the whole
/// tour leaves every edge in place, so that case is exactly zero.
/// Callers guarantee `m < n < route.len()`.
#[inline]
pub fn swap_delta(route: &[usize], m: usize, n: usize, dm: &DistanceMatrix) -> f64 {
    let dim = route.len();
    if m == 0 && n == dim - 1 {
        return 0.0;
    }

    let before = route[prev_index(m, dim)];
    let first = route[m];
    let last = route[n];
    let after = route[next_index(n, dim)];

    // Grouped so the reverse move's delta is the exact negation.
    let added = dist_between(before, last, dm) + dist_between(first, after, dm);
    let removed = dist_between(before, first, dm) + dist_between(last, after, dm);
    added - removed
}
