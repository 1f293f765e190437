// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};

use super::{Limits, RouteError};
use crate::{earth_distance, Coordinate, Graph, Route};

#[derive(Debug, Clone, Copy)]
struct QueueItem {
    at: Coordinate,
    cost: f64,
    seq: u64,
}

impl PartialEq for QueueItem {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for QueueItem {}

impl PartialOrd for QueueItem {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueueItem {
    fn cmp(&self, other: &Self) -> Ordering {
        // NOTE: We revert the order of comparison,
        // as lower costs (and earlier insertions on equal costs) are considered
        // better ("higher"), and Rust's BinaryHeap is a max-heap.
        other
            .cost
            .total_cmp(&self.cost)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

fn reconstruct_path(
    came_from: &HashMap<Coordinate, Coordinate>,
    mut last: Coordinate,
) -> Vec<Coordinate> {
    let mut path = vec![last];

    while let Some(&nd) = came_from.get(&last) {
        path.push(nd);
        last = nd;
    }

    path.reverse();
    path
}

/// Uses [Dijkstra's algorithm](https://en.wikipedia.org/wiki/Dijkstra%27s_algorithm)
/// to find the shortest route between two nodes of the provided graph,
/// with [earth_distance] between connected nodes as the edge weight.
///
/// The search is not limited; see [find_path_with_limits].
pub fn find_path(g: &Graph, start: Coordinate, end: Coordinate) -> Result<Route, RouteError> {
    find_path_with_limits(g, start, end, &Limits::default())
}

/// Uses [Dijkstra's algorithm](https://en.wikipedia.org/wiki/Dijkstra%27s_algorithm)
/// to find the shortest route between two nodes of the provided graph,
/// with [earth_distance] between connected nodes as the edge weight.
///
/// Searching from a node to itself always returns a single-element path,
/// even if the node is not in the graph. Returns [RouteError::Unreachable]
/// if no path connects the two nodes.
///
/// The search stops as soon as `end` is the closest unsettled node. Ties between
/// nodes with equal tentative distances are broken in favor of the node whose
/// tentative distance was set earlier.
///
/// `limits` bound the number of settled nodes and the wall-clock time of the search,
/// see [Limits].
pub fn find_path_with_limits(
    g: &Graph,
    start: Coordinate,
    end: Coordinate,
    limits: &Limits,
) -> Result<Route, RouteError> {
    if start != end && !g.contains(end) {
        log::debug!("{} is not a node of the graph, nothing to search", end);
        return Err(RouteError::Unreachable);
    }

    let mut queue: BinaryHeap<QueueItem> = BinaryHeap::default();
    let mut came_from: HashMap<Coordinate, Coordinate> = HashMap::default();
    let mut tentative: HashMap<Coordinate, f64> = HashMap::default();
    let mut settled: HashSet<Coordinate> = HashSet::default();
    let mut seq: u64 = 0;
    let mut steps: usize = 0;

    tentative.insert(start, 0.0);
    queue.push(QueueItem {
        at: start,
        cost: 0.0,
        seq,
    });

    while let Some(item) = queue.pop() {
        // Lazy deletion - a node may be present in the queue multiple times
        if settled.contains(&item.at)
            || item.cost > tentative.get(&item.at).copied().unwrap_or(f64::INFINITY)
        {
            continue;
        }

        if item.at == end {
            break;
        }

        steps += 1;
        limits.check(steps)?;

        settled.insert(item.at);
        log::trace!("settled {} at {:.3} m", item.at, item.cost);

        for &neighbor in g.neighbors(item.at) {
            if settled.contains(&neighbor) {
                continue;
            }

            // Only strictly better paths replace the known one
            let candidate = item.cost + earth_distance(item.at, neighbor);
            if candidate >= tentative.get(&neighbor).copied().unwrap_or(f64::INFINITY) {
                continue;
            }

            seq += 1;
            tentative.insert(neighbor, candidate);
            came_from.insert(neighbor, item.at);
            queue.push(QueueItem {
                at: neighbor,
                cost: candidate,
                seq,
            });
        }
    }

    if start == end {
        return Ok(Route {
            path: vec![start],
            distance: 0.0,
        });
    }

    match (came_from.contains_key(&end), tentative.get(&end)) {
        (true, Some(&distance)) => {
            let path = reconstruct_path(&came_from, end);
            log::debug!(
                "found route from {} to {}: {} nodes, {:.3} m, {} nodes settled",
                start,
                end,
                path.len(),
                distance,
                steps
            );
            Ok(Route { path, distance })
        }

        _ => {
            log::debug!(
                "no route from {} to {} after settling {} nodes",
                start,
                end,
                steps
            );
            Err(RouteError::Unreachable)
        }
    }
}
