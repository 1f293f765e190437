// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

//! Shortest paths over road networks extracted from [OpenStreetMap](https://www.openstreetmap.org/) data.
//!
//! Road segments are turned into an undirected [Graph] keyed by geographic [Coordinate],
//! with the great-circle distance between two connected coordinates used as the edge weight.
//! Arbitrary query points are resolved to the closest graph node, and
//! [Dijkstra's algorithm](https://en.wikipedia.org/wiki/Dijkstra%27s_algorithm) finds the
//! shortest path between them.
//!
//! # Example
//!
//! ```no_run
//! let options = roadpath::osm::Options {
//!     profile: &roadpath::osm::ROAD_PROFILE,
//!     file_format: roadpath::osm::FileFormat::Unknown,
//!     bbox: [0.0; 4],
//! };
//! let network = roadpath::osm::read_from_file(&options, "path/to/poruba.osm")
//!     .expect("failed to load poruba.osm");
//! let g = network.to_graph();
//!
//! let start = roadpath::Coordinate::new(18.1601472, 49.8305753);
//! let end = roadpath::Coordinate::new(18.1941897, 49.8216433);
//! let route = roadpath::route(&g, start, end).expect("failed to find route");
//!
//! println!("Route ({:.0} m): {:?}", route.distance, route.path);
//! ```

mod dijkstra;
mod distance;
mod graph;
mod nearest;
pub mod osm;

use std::fmt;

pub use dijkstra::{find_path, find_path_with_limits, Limits, RouteError, DEFAULT_STEP_LIMIT};
pub use distance::earth_distance;
pub use graph::{Bounds, Graph};
pub use nearest::find_nearest;

/// Number of fixed-point units in one degree, see [Coordinate].
const UNITS_PER_DEGREE: f64 = 1e7;

/// Represents a (longitude, latitude) position, used as a node of the [Graph].
///
/// Positions are stored as fixed-point integers with a precision of 1e-7 degrees
/// (same as OpenStreetMap node positions), which makes equality, hashing and ordering
/// exact. Two coordinates constructed from floating-point values which round to the
/// same fixed-point position are considered equal.
///
/// Coordinates are ordered by longitude, then latitude.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Coordinate {
    lon_e7: i32,
    lat_e7: i32,
}

impl Coordinate {
    /// Creates a new Coordinate from a longitude and latitude, both in degrees.
    ///
    /// Both values must be finite. Longitude must be within ±180°, latitude within ±90°.
    pub fn new(lon: f64, lat: f64) -> Self {
        debug_assert!(lon.is_finite() && lon.abs() <= 180.0, "invalid longitude: {}", lon);
        debug_assert!(lat.is_finite() && lat.abs() <= 90.0, "invalid latitude: {}", lat);

        Self {
            lon_e7: (lon * UNITS_PER_DEGREE).round() as i32,
            lat_e7: (lat * UNITS_PER_DEGREE).round() as i32,
        }
    }

    /// Creates a new Coordinate directly from fixed-point values, in units of 1e-7 degrees.
    pub const fn from_e7(lon_e7: i32, lat_e7: i32) -> Self {
        Self { lon_e7, lat_e7 }
    }

    /// Longitude, in degrees.
    pub fn lon(&self) -> f64 {
        self.lon_e7 as f64 / UNITS_PER_DEGREE
    }

    /// Latitude, in degrees.
    pub fn lat(&self) -> f64 {
        self.lat_e7 as f64 / UNITS_PER_DEGREE
    }

    /// Longitude, in units of 1e-7 degrees.
    pub fn lon_e7(&self) -> i32 {
        self.lon_e7
    }

    /// Latitude, in units of 1e-7 degrees.
    pub fn lat_e7(&self) -> i32 {
        self.lat_e7
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.7}, {:.7})", self.lon(), self.lat())
    }
}

/// Represents a road segment between two [Coordinates](Coordinate).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Segment {
    pub start: Coordinate,
    pub end: Coordinate,
}

impl Segment {
    pub fn new(start: Coordinate, end: Coordinate) -> Self {
        Self { start, end }
    }
}

impl From<(Coordinate, Coordinate)> for Segment {
    fn from((start, end): (Coordinate, Coordinate)) -> Self {
        Self { start, end }
    }
}

/// Result of a shortest-path search.
///
/// `path` starts with the start node and ends with the end node, and every consecutive
/// pair of coordinates is connected by an edge in the [Graph]. `distance` is the total
/// length of the path, in meters.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    pub path: Vec<Coordinate>,
    pub distance: f64,
}

impl Route {
    /// Returns the number of coordinates on the path.
    pub fn len(&self) -> usize {
        self.path.len()
    }

    /// Returns `true` if the path has no coordinates.
    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }
}

/// Builds a [Graph] by [connecting](Graph::connect) both ends of every [Segment].
pub fn build_graph<I, S>(segments: I) -> Graph
where
    I: IntoIterator<Item = S>,
    S: Into<Segment>,
{
    let mut g = Graph::default();
    for segment in segments {
        let Segment { start, end } = segment.into();
        g.connect(start, end);
    }
    g
}

/// Finds the shortest [Route] between two arbitrary points.
///
/// Both points are first resolved to their closest graph nodes with [find_nearest],
/// then [find_path] runs between the resolved nodes. The search is not limited,
/// see [route_with_limits].
pub fn route(g: &Graph, start: Coordinate, end: Coordinate) -> Result<Route, RouteError> {
    route_with_limits(g, start, end, &Limits::default())
}

/// Finds the shortest [Route] between two arbitrary points, like [route], but
/// with the search constrained by the provided [Limits].
pub fn route_with_limits(
    g: &Graph,
    start: Coordinate,
    end: Coordinate,
    limits: &Limits,
) -> Result<Route, RouteError> {
    let start_node = find_nearest(start, g.nodes())?;
    let end_node = find_nearest(end, g.nodes())?;
    log::debug!(
        "resolved {} to node {} and {} to node {}",
        start,
        start_node,
        end,
        end_node
    );
    find_path_with_limits(g, start_node, end_node, limits)
}

#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! assert_almost_eq {
        ($a:expr, $b:expr) => {
            assert!(
                (($a - $b).abs() < 1e-6),
                "assertion failed: {} ≈ {}",
                $a,
                $b
            )
        };
    }

    const A: Coordinate = Coordinate::from_e7(181_600_000, 498_300_000);
    const B: Coordinate = Coordinate::from_e7(181_650_000, 498_310_000);
    const C: Coordinate = Coordinate::from_e7(181_700_000, 498_300_000);
    const D: Coordinate = Coordinate::from_e7(181_900_000, 498_200_000);
    const E: Coordinate = Coordinate::from_e7(181_950_000, 498_210_000);

    #[test]
    fn coordinate_quantization() {
        let c = Coordinate::new(18.1601472, 49.8305753);
        assert_eq!(c.lon_e7(), 181_601_472);
        assert_eq!(c.lat_e7(), 498_305_753);
        assert_almost_eq!(c.lon(), 18.1601472);
        assert_almost_eq!(c.lat(), 49.8305753);

        // Floating-point noise below the precision collapses into a single node
        assert_eq!(
            Coordinate::new(18.1601472, 49.8305753),
            Coordinate::new(18.160147200000004, 49.830575299999996),
        );
        assert_ne!(
            Coordinate::new(18.1601472, 49.8305753),
            Coordinate::new(18.1601473, 49.8305753),
        );
    }

    #[test]
    fn coordinate_display() {
        assert_eq!(
            Coordinate::new(-0.5, 51.25).to_string(),
            "(-0.5000000, 51.2500000)"
        );
    }

    #[test]
    fn build_graph_connects_segments() {
        let g = build_graph([(A, B), (B, C)]);
        assert_eq!(g.len(), 3);
        assert_eq!(g.neighbors(B), &[A, C]);
        assert_eq!(g.neighbors(A), &[B]);
    }

    #[test]
    fn route_prefers_shorter_chain() {
        // A-D-C is a long detour, A-B-C goes almost straight
        let g = build_graph([(A, D), (D, C), (A, B), (B, C)]);
        let r = route(&g, A, C).unwrap();
        assert_eq!(r.path, vec![A, B, C]);
        assert_almost_eq!(r.distance, earth_distance(A, B) + earth_distance(B, C));
    }

    #[test]
    fn route_uses_direct_edge() {
        let g = build_graph([(A, B), (B, C), (A, C)]);
        let r = route(&g, A, C).unwrap();
        assert_eq!(r.path, vec![A, C]);
        assert_eq!(r.distance, earth_distance(A, C));
    }

    #[test]
    fn route_resolves_nearest_nodes() {
        let g = build_graph([(A, B), (B, C)]);
        let near_a = Coordinate::from_e7(181_600_010, 498_299_990);
        let near_c = Coordinate::from_e7(181_700_020, 498_300_015);
        let r = route(&g, near_a, near_c).unwrap();
        assert_eq!(r.path, vec![A, B, C]);
        assert_almost_eq!(r.distance, earth_distance(A, B) + earth_distance(B, C));
    }

    #[test]
    fn route_same_point() {
        let g = build_graph([(A, B)]);
        let r = route(&g, A, A).unwrap();
        assert_eq!(r.path, vec![A]);
        assert_eq!(r.distance, 0.0);
    }

    #[test]
    fn route_between_components_is_unreachable() {
        let g = build_graph([(A, B), (B, C), (D, E)]);
        assert_eq!(route(&g, A, E), Err(RouteError::Unreachable));

        // The graph remains usable after a failed search
        assert_eq!(route(&g, A, C).unwrap().path, vec![A, B, C]);
    }

    #[test]
    fn route_on_empty_graph() {
        let g = Graph::default();
        assert_eq!(route(&g, A, C), Err(RouteError::EmptyInput));
    }

    #[test]
    fn route_with_step_limit() {
        let g = build_graph([(A, B), (B, C)]);
        let limits = Limits {
            step_limit: 1,
            deadline: None,
        };
        assert_eq!(
            route_with_limits(&g, A, C, &limits),
            Err(RouteError::StepLimitExceeded)
        );
    }
}
