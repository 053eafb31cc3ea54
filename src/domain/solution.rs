use crate::domain::types::Route;
use crate::error::{TspError, TspResult};

impl Route {
    /// Identity tour `[0, 1, ..., dim - 1]`.
    pub fn identity(dim: usize) -> TspResult<Route> {
        let mut route = Vec::new();
        route
            .try_reserve_exact(dim)
            .map_err(|source| TspError::AllocationFailure {
                what: "route",
                dim,
                source,
            })?;
        route.extend(0..dim);
        Ok(Route { route })
    }

    pub fn len(&self) -> usize {
        self.route.len()
    }

    pub fn is_empty(&self) -> bool {
        self.route.is_empty()
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.route
    }

    /// Checks that the route is a permutation of `0..dim`.
    pub fn validate(&self, dim: usize) -> TspResult<()> {
        validate_permutation(&self.route, dim)
    }
}

impl From<Vec<usize>> for Route {
    fn from(route: Vec<usize>) -> Self {
        Route { route }
    }
}

pub fn validate_permutation(route: &[usize], dim: usize) -> TspResult<()> {
    if route.len() != dim {
        return Err(TspError::MalformedRoute {
            reason: format!("route has {} cities, expected {}", route.len(), dim),
        });
    }

    let mut seen = vec![false; dim];
    for (pos, &city) in route.iter().enumerate() {
        if city >= dim {
            return Err(TspError::MalformedRoute {
                reason: format!("city {} at position {} is outside 0..{}", city, pos, dim),
            });
        }
        if seen[city] {
            return Err(TspError::MalformedRoute {
                reason: format!("city {} appears more than once (position {})", city, pos),
            });
        }
        seen[city] = true;
    }

    Ok(())
}
