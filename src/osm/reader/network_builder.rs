// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::collections::{BTreeMap, HashMap};

use crate::{build_graph, Bounds, Coordinate, Graph, Segment};

use super::{model, Options};

/// Road segments extracted from OSM data, together with the positions of all nodes
/// used by at least one segment.
///
/// Every segment endpoint comes from [RoadNetwork::nodes], so a single OSM node
/// is always represented by exactly the same [Coordinate].
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RoadNetwork {
    /// Positions of OSM nodes, by node id.
    pub nodes: BTreeMap<i64, Coordinate>,

    /// Road segments between consecutive nodes of accepted ways.
    pub segments: Vec<Segment>,
}

impl RoadNetwork {
    /// Builds a [Graph] from all [segments](RoadNetwork::segments).
    pub fn to_graph(&self) -> Graph {
        build_graph(self.segments.iter().copied())
    }

    /// Computes the [Bounds] of all used nodes, or returns `None` if there are no nodes.
    pub fn bounds(&self) -> Option<Bounds> {
        Bounds::from_iter(self.nodes.values().copied())
    }
}

/// Helper object used for storing state related to converting [OSM features](model::Feature)
/// into a [RoadNetwork].
pub(super) struct NetworkBuilder<'a> {
    options: &'a Options<'a>,
    known_nodes: HashMap<i64, Coordinate>,
    network: RoadNetwork,
    ignore_bbox: bool,
    ways_accepted: usize,
    missing_references: usize,
}

impl<'a> NetworkBuilder<'a> {
    /// Create a new, empty network builder.
    pub(super) fn new(options: &'a Options<'a>) -> Self {
        let ignore_bbox =
            options.bbox.iter().all(|&x| x == 0.0) || options.bbox.iter().any(|x| !x.is_finite());

        if ignore_bbox && options.bbox.iter().any(|&x| x != 0.0) {
            log::warn!("ignoring invalid bounding box {:?}", options.bbox);
        }

        Self {
            options,
            known_nodes: HashMap::default(),
            network: RoadNetwork::default(),
            ignore_bbox,
            ways_accepted: 0,
            missing_references: 0,
        }
    }

    /// Add all features from the provided iterator.
    pub(super) fn add_features<F, E>(&mut self, features: F) -> Result<(), E>
    where
        F: IntoIterator<Item = Result<model::Feature, E>>,
    {
        for f in features {
            self.add_feature(f?);
        }
        Ok(())
    }

    /// Finishes the conversion, returning all collected road segments and used nodes.
    pub(super) fn finish(self) -> RoadNetwork {
        log::debug!(
            "extracted {} segments over {} nodes from {} ways ({} of {} nodes unused, {} missing node references)",
            self.network.segments.len(),
            self.network.nodes.len(),
            self.ways_accepted,
            self.known_nodes.len() - self.network.nodes.len(),
            self.known_nodes.len(),
            self.missing_references,
        );
        self.network
    }

    fn add_feature(&mut self, f: model::Feature) {
        match f {
            model::Feature::Node(n) => self.add_node(n),
            model::Feature::Way(w) => self.add_way(w),
        }
    }

    fn add_node(&mut self, n: model::Node) {
        if self.is_in_bbox(n.position) {
            self.known_nodes.insert(n.id, n.position);
        }
    }

    fn is_in_bbox(&self, c: Coordinate) -> bool {
        if self.ignore_bbox {
            return true;
        }
        let [min_lon, min_lat, max_lon, max_lat] = self.options.bbox;
        c.lat() >= min_lat && c.lat() <= max_lat && c.lon() >= min_lon && c.lon() <= max_lon
    }

    fn add_way(&mut self, w: model::Way) {
        let profile = self.options.profile;
        if w.nodes.is_empty() || !profile.accepts(&w.tags) {
            return;
        }
        if profile.skip_closed_ways && w.is_closed() {
            log::trace!("way {}: skipping closed way", w.id);
            return;
        }
        self.ways_accepted += 1;

        // Only pairs of consecutive, known nodes become segments. A reference to an unknown
        // node (missing from the data or outside of the bounding box) splits the way.
        for pair in w.nodes.windows(2) {
            let (Some(&start), Some(&end)) =
                (self.known_nodes.get(&pair[0]), self.known_nodes.get(&pair[1]))
            else {
                self.missing_references += 1;
                log::debug!("way {}: skipping {}-{}, unknown node", w.id, pair[0], pair[1]);
                continue;
            };

            self.network.nodes.insert(pair[0], start);
            self.network.nodes.insert(pair[1], end);
            self.network.segments.push(Segment { start, end });
        }
    }
}
