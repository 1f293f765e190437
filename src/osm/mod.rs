// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

//! Extraction of road [Segments](crate::Segment) from OpenStreetMap data.

mod profile;
mod reader;

pub use profile::{Profile, CAR_PROFILE, ROAD_PROFILE};
pub use reader::{
    read_from_buffer, read_from_file, read_from_io, Error, FileFormat, Options, RoadNetwork,
};
