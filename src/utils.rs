/// Position after `pos` on a cyclic tour of `dim` cities.
#[inline]
pub fn next_index(pos: usize, dim: usize) -> usize {
    if pos + 1 >= dim {
        0
    } else {
        pos + 1
    }
}

/// Position before `pos` on a cyclic tour of `dim` cities.
#[inline]
pub fn prev_index(pos: usize, dim: usize) -> usize {
    if pos == 0 {
        dim - 1
    } else {
        pos - 1
    }
}

/// Short human-readable form of a route for log lines.
pub fn format_route(route: &[usize], max_shown: usize) -> String {
    if route.len() <= max_shown {
        return format!("{:?}", route);
    }
    format!("{:?} ... ({} cities)", &route[..max_shown], route.len())
}
