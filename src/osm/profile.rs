// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::collections::HashMap;

/// Describes which OSM ways are turned into road [Segments](crate::Segment).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Profile<'a> {
    /// Human readable name of the profile. Not used for OSM data interpretation.
    pub name: &'a str,

    /// Values of the [highway](https://wiki.openstreetmap.org/wiki/Key:highway) tag
    /// of ways which are considered roads. Ways without a `highway` tag,
    /// or with a value not on this list, are ignored.
    pub highways: &'a [&'a str],

    /// Array of OSM [access tags](https://wiki.openstreetmap.org/wiki/Key:access#Land-based_transportation)
    /// (in order from least to most specific) to consider when checking for road prohibitions.
    /// The most specific tag present on a way decides; `no` and `private` exclude the way.
    ///
    /// An empty array disables access tag handling.
    pub access: &'a [&'a str],

    /// Ignore closed ways (ways whose first and last node are the same),
    /// which usually outline areas (like parking lots or pedestrian squares) rather than roads.
    pub skip_closed_ways: bool,
}

impl Profile<'_> {
    /// Checks if a way with the given tags is a road open to this profile.
    /// The shape of the way ([Profile::skip_closed_ways]) is checked separately.
    pub fn accepts(&self, tags: &HashMap<String, String>) -> bool {
        self.is_road(tags) && self.is_allowed(tags)
    }

    /// Checks if the `highway` tag matches any of [Profile::highways].
    pub fn is_road(&self, tags: &HashMap<String, String>) -> bool {
        tags.get("highway")
            .is_some_and(|highway| self.highways.contains(&highway.as_str()))
    }

    /// Checks if the way is not prohibited by the access tags ([Profile::access]).
    pub fn is_allowed(&self, tags: &HashMap<String, String>) -> bool {
        match self
            .access
            .iter()
            .rev()
            .find_map(|&mode| tags.get(mode).map(|v| v.as_str()))
        {
            Some("no") | Some("private") => false,
            _ => true,
        }
    }
}

/// Profile matching primary, secondary and residential roads, regardless of access tags.
/// Closed ways are skipped.
pub const ROAD_PROFILE: Profile = Profile {
    name: "road",
    highways: &["primary", "secondary", "residential"],
    access: &[],
    skip_closed_ways: true,
};

/// Profile for cars, matching all roads open to general motor traffic
/// and following the appropriate [access tags](https://wiki.openstreetmap.org/wiki/Key:access).
pub const CAR_PROFILE: Profile = Profile {
    name: "motorcar",
    highways: &[
        "motorway",
        "motorway_link",
        "trunk",
        "trunk_link",
        "primary",
        "primary_link",
        "secondary",
        "secondary_link",
        "tertiary",
        "tertiary_link",
        "unclassified",
        "residential",
        "living_street",
        "service",
    ],
    access: &["access", "vehicle", "motor_vehicle", "motorcar"],
    skip_closed_ways: false,
};

#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! tags {
        {} => { HashMap::default() };
        {$( $k:literal : $v:literal ),+} => {
            HashMap::from_iter([ $( ($k.to_string(), $v.to_string()) ),+ ])
        };
    }

    #[test]
    fn is_road() {
        assert!(ROAD_PROFILE.is_road(&tags! {"highway": "primary"}));
        assert!(ROAD_PROFILE.is_road(&tags! {"highway": "residential", "name": "Opavská"}));
        assert!(!ROAD_PROFILE.is_road(&tags! {"highway": "footway"}));
        assert!(!ROAD_PROFILE.is_road(&tags! {"railway": "rail"}));
        assert!(!ROAD_PROFILE.is_road(&tags! {}));
        assert!(CAR_PROFILE.is_road(&tags! {"highway": "motorway"}));
    }

    #[test]
    fn is_allowed() {
        assert!(CAR_PROFILE.is_allowed(&tags! {"highway": "primary"}));
        assert!(!CAR_PROFILE.is_allowed(&tags! {"highway": "primary", "access": "no"}));
        assert!(!CAR_PROFILE.is_allowed(&tags! {"highway": "primary", "access": "private"}));
        assert!(CAR_PROFILE.is_allowed(&tags! {"highway": "primary", "access": "destination"}));
        assert!(CAR_PROFILE
            .is_allowed(&tags! {"highway": "primary", "access": "no", "motorcar": "yes"}));
        assert!(!CAR_PROFILE
            .is_allowed(&tags! {"highway": "primary", "vehicle": "yes", "motor_vehicle": "no"}));

        // Access tags are not considered by the road profile
        assert!(ROAD_PROFILE.is_allowed(&tags! {"highway": "primary", "access": "no"}));
    }

    #[test]
    fn accepts() {
        assert!(ROAD_PROFILE.accepts(&tags! {"highway": "primary"}));
        assert!(ROAD_PROFILE.accepts(&tags! {"highway": "primary", "access": "no"}));
        assert!(!ROAD_PROFILE.accepts(&tags! {"highway": "footway"}));
        assert!(CAR_PROFILE.accepts(&tags! {"highway": "service"}));
        assert!(!CAR_PROFILE.accepts(&tags! {"highway": "primary", "access": "no"}));
    }
}
