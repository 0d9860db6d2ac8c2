//! check-network — connectivity report for a trail GeoJSON file.
//!
//! Loads the network the same way the map does, then prints one LineString
//! per directed compacted chain, tagged with the `"lon,lat"` ids of its end
//! vertices and the island both ends belong to.  Island count and sizes are
//! logged, so a healthy network reports exactly one island.
//!
//! ```text
//! check-network data/sample.geojson > chains.geojson
//! check-network data/sample.geojson --from 13.50,55.90 --to 13.58,55.93
//! ```

use std::fs;
use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use geojson::{Feature, FeatureCollection, GeoJson, JsonObject, JsonValue, Value};
use tracing::info;
use tracing_subscriber::EnvFilter;

use tn_core::{EdgeId, GeoPoint, IslandId, VertexId};
use tn_network::{NetworkConfig, RouteNetwork};
use tn_spatial::TrailGraph;

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
/// Report islands and compacted chains of a trail network.
struct Args {
    /// GeoJSON FeatureCollection of trail pieces.
    source: PathBuf,

    /// JSON network config; defaults to SWEREF99 TM with exact vertex keys.
    #[clap(long)]
    config: Option<PathBuf>,

    /// Write the chain collection here instead of stdout.
    #[clap(long, short)]
    output: Option<PathBuf>,

    /// Route start as `lon,lat`; needs `--to`.
    #[clap(long, value_parser = parse_point, requires = "to")]
    from: Option<GeoPoint>,

    /// Route end as `lon,lat`.
    #[clap(long, value_parser = parse_point, requires = "from")]
    to: Option<GeoPoint>,
}

fn parse_point(s: &str) -> Result<GeoPoint, String> {
    let (lon, lat) = s.split_once(',').ok_or_else(|| format!("expected lon,lat, got {s:?}"))?;
    let parse = |v: &str| v.trim().parse::<f64>().map_err(|e| format!("{v:?}: {e}"));
    Ok(GeoPoint::new(parse(lon)?, parse(lat)?))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => NetworkConfig::from_path(path)
            .with_context(|| format!("reading config {}", path.display()))?,
        None => NetworkConfig::default(),
    };
    let source = fs::read_to_string(&args.source)
        .with_context(|| format!("reading {}", args.source.display()))?;
    let network = RouteNetwork::initialize(&source, config)
        .with_context(|| format!("loading {}", args.source.display()))?;

    report_islands(&network);

    if let (Some(from), Some(to)) = (args.from, args.to) {
        match network.route(&[from, to])? {
            Some(route) => info!(
                start = %route.start,
                end = %route.end,
                km = route.distance_km(),
                points = route.geometry.len(),
                "route found"
            ),
            None => info!(%from, %to, "no route between the snapped endpoints"),
        }
    }

    let chains = GeoJson::from(chain_collection(&network));
    let json = serde_json::to_string_pretty(&chains)?;
    match &args.output {
        Some(path) => fs::write(path, json).with_context(|| format!("writing {}", path.display()))?,
        None => writeln!(std::io::stdout().lock(), "{json}")?,
    }
    Ok(())
}

fn report_islands(network: &RouteNetwork) {
    let islands = network.islands();
    info!(islands = islands.count(), "found islands");
    for i in (0..islands.count()).map(IslandId::from_index) {
        info!(island = %i, vertices = islands.size(i), "island");
    }
}

fn vertex_key(graph: &TrailGraph, v: VertexId) -> String {
    let p = graph.vertex_geo(v);
    format!("{},{}", p.lon, p.lat)
}

/// One feature per directed edge, like the path finder's compacted graph.
fn chain_collection(network: &RouteNetwork) -> FeatureCollection {
    let graph = network.graph();
    let islands = network.islands();

    let features = (0..graph.edge_count())
        .map(EdgeId::from_index)
        .map(|e| {
            let from = graph.edge_from[e.index()];
            let to = graph.edge_to[e.index()];
            let island = islands.island_of(from).map_or(JsonValue::Null, |i| JsonValue::from(i.0));

            let mut properties = JsonObject::new();
            properties.insert("startId".into(), vertex_key(graph, from).into());
            properties.insert("endId".into(), vertex_key(graph, to).into());
            properties.insert("islandId".into(), island);
            properties.insert("length_m".into(), graph.edge_length[e.index()].into());

            let coords = graph
                .edge_points(e)
                .map(|p| {
                    let g = graph.point_geo[p.index()];
                    vec![g.lon, g.lat]
                })
                .collect();

            Feature {
                bbox: None,
                geometry: Some(geojson::Geometry::new(Value::LineString(coords))),
                id: None,
                properties: Some(properties),
                foreign_members: None,
            }
        })
        .collect();

    FeatureCollection { bbox: None, features, foreign_members: None }
}
