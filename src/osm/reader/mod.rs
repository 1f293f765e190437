// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::fs::File;
use std::io::{self, BufRead};
use std::path::Path;

use network_builder::NetworkBuilder;

use crate::osm::Profile;

mod model;
mod network_builder;
mod xml;

pub use network_builder::RoadNetwork;

/// Format of the input OSM file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    /// Unknown format - guess the format based on the content
    Unknown,

    /// Force uncompressed [OSM XML](https://wiki.openstreetmap.org/wiki/OSM_XML)
    Xml,

    /// Force [OSM XML](https://wiki.openstreetmap.org/wiki/OSM_XML)
    /// with [gzip](https://en.wikipedia.org/wiki/Gzip) compression
    XmlGz,

    /// Force [OSM XML](https://wiki.openstreetmap.org/wiki/OSM_XML)
    /// with [bzip2](https://en.wikipedia.org/wiki/Bzip2) compression
    XmlBz2,
}

impl FileFormat {
    /// Guesses the format of a file from its first few bytes.
    /// Anything not starting with a gzip or bzip2 signature is assumed to be plain XML.
    pub fn detect(prefix: &[u8]) -> Self {
        if prefix.starts_with(&[0x1F, 0x8B]) {
            Self::XmlGz
        } else if prefix.starts_with(b"BZh") {
            Self::XmlBz2
        } else {
            Self::Xml
        }
    }
}

/// Additional controls for extracting road segments from OSM data.
#[derive(Debug)]
pub struct Options<'a> {
    /// Which OSM ways should be turned into road segments.
    pub profile: &'a Profile<'a>,

    /// Format of the input data.
    pub file_format: FileFormat,

    /// Filter nodes by a specific bounding box. In order: left (min lon), bottom (min lat),
    /// right (max lon), top (max lat). Ignored if all values are set to zero, or at least one
    /// of them is not finite.
    pub bbox: [f64; 4],
}

/// Error which can occur when reading OSM data.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] io::Error),

    #[error("invalid OSM XML: {0}")]
    Xml(#[from] quick_xml::Error),
}

/// Parse OSM features from a reader into a [RoadNetwork] as per the provided [Options].
///
/// The provided stream will be automatically wrapped in a buffered reader when needed.
pub fn read_from_io<R: io::Read>(
    options: &Options<'_>,
    reader: R,
) -> Result<RoadNetwork, Error> {
    let mut b = io::BufReader::new(reader);

    let format = match options.file_format {
        FileFormat::Unknown => {
            let detected = FileFormat::detect(b.fill_buf()?);
            log::debug!("detected file format: {:?}", detected);
            detected
        }
        format => format,
    };

    let mut builder = NetworkBuilder::new(options);
    match format {
        FileFormat::Unknown | FileFormat::Xml => {
            builder.add_features(xml::Reader::from_io(b))?;
        }

        FileFormat::XmlGz => {
            let d = flate2::read::MultiGzDecoder::new(b);
            let b = io::BufReader::new(d);
            builder.add_features(xml::Reader::from_io(b))?;
        }

        FileFormat::XmlBz2 => {
            let d = bzip2::read::MultiBzDecoder::new(b);
            let b = io::BufReader::new(d);
            builder.add_features(xml::Reader::from_io(b))?;
        }
    }
    Ok(builder.finish())
}

/// Parse OSM features from a file at the provided path into a [RoadNetwork]
/// as per the provided [Options].
pub fn read_from_file<P: AsRef<Path>>(
    options: &Options<'_>,
    path: P,
) -> Result<RoadNetwork, Error> {
    let f = File::open(path)?;
    read_from_io(options, f)
}

/// Parse OSM features from a static buffer into a [RoadNetwork] as per the provided [Options].
pub fn read_from_buffer(options: &Options<'_>, data: &[u8]) -> Result<RoadNetwork, Error> {
    let format = match options.file_format {
        FileFormat::Unknown => FileFormat::detect(data),
        format => format,
    };

    if format == FileFormat::Xml {
        // Fast path is available for in-memory XML data
        let mut builder = NetworkBuilder::new(options);
        builder.add_features(xml::Reader::from_buffer(data))?;
        Ok(builder.finish())
    } else {
        // Wrap the buffer in a cursor and use the IO path
        read_from_io(options, io::Cursor::new(data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detect_format() {
        assert_eq!(FileFormat::detect(b"<?xml version"), FileFormat::Xml);
        assert_eq!(FileFormat::detect(&[0x1F, 0x8B, 0x08, 0x00]), FileFormat::XmlGz);
        assert_eq!(FileFormat::detect(b"BZh91AY&SY"), FileFormat::XmlBz2);
        assert_eq!(FileFormat::detect(b""), FileFormat::Xml);
    }
}
