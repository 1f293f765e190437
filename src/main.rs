use std::error::Error;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use clap::{Parser, ValueEnum};
use roadpath::osm;

#[derive(Debug, thiserror::Error)]
#[error("{0}: {1}")]
struct GraphLoadError(PathBuf, #[source] osm::Error);

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    Unknown,
    Xml,
    XmlGz,
    XmlBz2,
}

impl From<Format> for osm::FileFormat {
    fn from(f: Format) -> Self {
        match f {
            Format::Unknown => osm::FileFormat::Unknown,
            Format::Xml => osm::FileFormat::Xml,
            Format::XmlGz => osm::FileFormat::XmlGz,
            Format::XmlBz2 => osm::FileFormat::XmlBz2,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Profile {
    /// Primary, secondary and residential roads
    Road,

    /// All roads open to cars
    Car,
}

impl Profile {
    fn osm_profile(self) -> &'static osm::Profile<'static> {
        match self {
            Profile::Road => &osm::ROAD_PROFILE,
            Profile::Car => &osm::CAR_PROFILE,
        }
    }
}

#[derive(Parser)]
struct Cli {
    /// The path to the OSM file
    osm_file: PathBuf,

    /// Latitude of the start point
    start_lat: f64,

    /// Longitude of the start point
    start_lon: f64,

    /// Latitude of the end point
    end_lat: f64,

    /// Longitude of the end point
    end_lon: f64,

    /// Format of the OSM file
    #[arg(long, value_enum, default_value_t = Format::Unknown)]
    format: Format,

    /// Which roads to use for routing
    #[arg(long, value_enum, default_value_t = Profile::Road)]
    profile: Profile,

    /// Maximum number of nodes to settle before giving up
    #[arg(long, default_value_t = roadpath::DEFAULT_STEP_LIMIT)]
    step_limit: usize,

    /// Maximum time to spend on the search, in milliseconds
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

pub fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    colog::default_builder()
        .filter_level(match cli.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        })
        .init();

    let g = load_graph(&cli.osm_file, cli.format, cli.profile)?;
    log::debug!("loaded graph with {} nodes and {} edges", g.len(), g.edge_count());

    let start = to_coordinate(cli.start_lat, cli.start_lon)?;
    let end = to_coordinate(cli.end_lat, cli.end_lon)?;
    let limits = roadpath::Limits {
        step_limit: cli.step_limit,
        deadline: cli
            .timeout_ms
            .map(|ms| Instant::now() + Duration::from_millis(ms)),
    };

    let route = roadpath::route_with_limits(&g, start, end, &limits)?;

    println!("{{");
    println!("  \"type\": \"FeatureCollection\",");
    println!("  \"features\": [");
    println!("    {{");
    println!("      \"type\": \"Feature\",");
    println!("      \"properties\": {{");
    println!("        \"distance\": {:.3}", route.distance);
    println!("      }},");

    println!("      \"geometry\": {{");
    println!("        \"type\": \"LineString\",");
    println!("        \"coordinates\": [");

    let mut coords = route.path.iter().peekable();
    while let Some(c) = coords.next() {
        let suffix = if coords.peek().is_some() { "," } else { "" };
        println!("          [{:.7}, {:.7}]{}", c.lon(), c.lat(), suffix);
    }

    println!("        ]");
    println!("      }}");
    println!("    }}");
    println!("  ]");
    println!("}}");

    Ok(())
}

fn to_coordinate(lat: f64, lon: f64) -> Result<roadpath::Coordinate, String> {
    if lat.is_finite() && lon.is_finite() && lat.abs() <= 90.0 && lon.abs() <= 180.0 {
        Ok(roadpath::Coordinate::new(lon, lat))
    } else {
        Err(format!("invalid position: {}, {}", lat, lon))
    }
}

fn load_graph<P: AsRef<Path>>(
    path: P,
    format: Format,
    profile: Profile,
) -> Result<roadpath::Graph, GraphLoadError> {
    let options = osm::Options {
        profile: profile.osm_profile(),
        file_format: format.into(),
        bbox: [0.0; 4],
    };
    match osm::read_from_file(&options, path.as_ref()) {
        Ok(network) => Ok(network.to_graph()),
        Err(e) => Err(GraphLoadError(PathBuf::from(path.as_ref()), e)),
    }
}
