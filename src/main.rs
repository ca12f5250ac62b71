use std::path::PathBuf;

use clap::{Parser, Subcommand};
use log::info;

use maploc::snapshot;
use maploc::RoadMap;

#[derive(Parser)]
#[command(name = "maploc", version, about = "Map-aided vehicle localization toolkit")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Ingest the drivable road network from an OSM PBF extract and snapshot
    /// it as JSON
    Ingest {
        /// Path to the `.osm.pbf` extract
        input: PathBuf,

        /// Output name; writes `<out>.json`
        #[arg(long, default_value = "filtered")]
        out: String,
    },

    /// Reload a JSON snapshot and re-emit it as an OSM PBF file
    Export {
        /// Path to the `.json` snapshot
        snapshot: PathBuf,

        /// Output name; writes `<out>.osm.pbf`
        #[arg(long, default_value = "filtered")]
        out: String,
    },

    /// Print node and way counts plus bounds of a JSON snapshot
    Info {
        /// Path to the `.json` snapshot
        snapshot: PathBuf,
    },
}

fn main() -> maploc::Result<()> {
    env_logger::init();

    match Cli::parse().command {
        Command::Ingest { input, out } => {
            let map = RoadMap::from_pbf(&input)?;
            let path = snapshot::save_json(&map, &out)?;

            info!(
                "{} -> {}: {} nodes, {} ways",
                input.display(),
                path.display(),
                map.nodes.len(),
                map.ways.len()
            );
        }
        Command::Export { snapshot: source, out } => {
            let map = snapshot::load_json(&source)?;
            let path = snapshot::write_pbf(&map, &out)?;

            info!("{} -> {}", source.display(), path.display());
        }
        Command::Info { snapshot: source } => {
            let map = snapshot::load_json(&source)?;
            let bounds = map.bounds();

            println!("nodes: {}", map.nodes.len());
            println!("ways:  {}", map.ways.len());
            println!(
                "bounds: [{:.5}, {:.5}] x [{:.5}, {:.5}]",
                bounds.min_lat, bounds.max_lat, bounds.min_lon, bounds.max_lon
            );
        }
    }

    Ok(())
}
