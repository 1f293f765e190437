// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use crate::{earth_distance, Coordinate, RouteError};

/// Finds the candidate closest to the given point, as measured by [earth_distance].
///
/// Ties are broken in favor of the first encountered candidate.
///
/// Returns [RouteError::EmptyInput] if there are no candidates.
pub fn find_nearest<I>(point: Coordinate, candidates: I) -> Result<Coordinate, RouteError>
where
    I: IntoIterator<Item = Coordinate>,
{
    let mut best: Option<(Coordinate, f64)> = None;

    for candidate in candidates {
        let dist = earth_distance(point, candidate);
        match best {
            Some((_, best_dist)) if dist >= best_dist => {}
            _ => best = Some((candidate, dist)),
        }
    }

    best.map(|(c, _)| c).ok_or(RouteError::EmptyInput)
}
