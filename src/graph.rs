// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use crate::Coordinate;
use std::collections::BTreeMap;

/// Represents a road network as an undirected adjacency structure
/// over [Coordinates](Coordinate).
///
/// Connectivity is always symmetric: the only way to add an edge is [Graph::connect],
/// which inserts both directions at once. Duplicate connections are kept,
/// and nodes are iterated in [Coordinate] order.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Graph(BTreeMap<Coordinate, Vec<Coordinate>>);

/// Smallest longitude-latitude box containing a set of [Coordinates](Coordinate).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    /// Corner with the smallest longitude and latitude.
    pub min: Coordinate,

    /// Corner with the largest longitude and latitude.
    pub max: Coordinate,
}

impl Bounds {
    /// Computes the Bounds of the provided coordinates,
    /// or returns `None` if there are no coordinates.
    pub fn from_iter<I: IntoIterator<Item = Coordinate>>(coords: I) -> Option<Self> {
        let mut coords = coords.into_iter();
        let first = coords.next()?;
        let (mut min_lon, mut min_lat) = (first.lon_e7(), first.lat_e7());
        let (mut max_lon, mut max_lat) = (min_lon, min_lat);

        for c in coords {
            min_lon = min_lon.min(c.lon_e7());
            min_lat = min_lat.min(c.lat_e7());
            max_lon = max_lon.max(c.lon_e7());
            max_lat = max_lat.max(c.lat_e7());
        }

        Some(Self {
            min: Coordinate::from_e7(min_lon, min_lat),
            max: Coordinate::from_e7(max_lon, max_lat),
        })
    }

    /// Checks if a [Coordinate] lies within the box (edges inclusive).
    pub fn contains(&self, c: Coordinate) -> bool {
        c.lon_e7() >= self.min.lon_e7()
            && c.lon_e7() <= self.max.lon_e7()
            && c.lat_e7() >= self.min.lat_e7()
            && c.lat_e7() <= self.max.lat_e7()
    }
}

impl Graph {
    /// Returns the number of nodes in the graph.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if no connections were added to the graph.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the number of undirected edges in the graph, including duplicates.
    /// A self-loop counts as a single edge.
    pub fn edge_count(&self) -> usize {
        let (loops, others) = self
            .0
            .iter()
            .flat_map(|(from, neighbors)| neighbors.iter().map(move |to| from == to))
            .fold((0, 0), |(loops, others), is_loop| {
                if is_loop {
                    (loops + 1, others)
                } else {
                    (loops, others + 1)
                }
            });

        // Self-loops are stored twice in the same list, other edges once in both lists
        loops / 2 + others / 2
    }

    /// Returns an iterator over every node (a [Coordinate] with at least one connection),
    /// in [Coordinate] order.
    pub fn nodes(&self) -> impl Iterator<Item = Coordinate> + '_ {
        self.0.keys().copied()
    }

    /// Checks whether the provided [Coordinate] is a node of this graph.
    pub fn contains(&self, c: Coordinate) -> bool {
        self.0.contains_key(&c)
    }

    /// Gets all neighbors of the provided [Coordinate], in insertion order.
    /// Returns an empty slice if the coordinate was never connected.
    pub fn neighbors(&self, c: Coordinate) -> &[Coordinate] {
        self.0.get(&c).map(|n| n.as_slice()).unwrap_or_default()
    }

    /// Connects two [Coordinates](Coordinate) with an undirected edge.
    ///
    /// Duplicate connections and self-loops are stored as-is.
    pub fn connect(&mut self, a: Coordinate, b: Coordinate) {
        self.0.entry(a).or_default().push(b);
        self.0.entry(b).or_default().push(a);
    }

    /// Computes the [Bounds] of all nodes in the graph,
    /// or returns `None` if the graph is empty.
    pub fn bounds(&self) -> Option<Bounds> {
        Bounds::from_iter(self.nodes())
    }
}
