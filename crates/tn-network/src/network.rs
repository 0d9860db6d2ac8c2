//! The route network façade.

use tracing::{debug, info, warn};

use tn_catalog::{
    Color, Geometry, HighlightObserver, HighlightState, NoopHighlightObserver, SegmentCatalog, SegmentInfo,
    StyleResolver, TrailFeature,
};
use tn_core::{FeatureId, GeoPoint, PointId, ProjectedPoint, Projection};
use tn_spatial::{DijkstraRouter, Islands, Router, TrailGraph, TrailGraphBuilder};

use crate::{parse_features, LoadError, NetworkConfig, NetworkError, NetworkResult};

// ── Route ─────────────────────────────────────────────────────────────────────

/// A planned route between the first and last waypoint.
#[derive(Clone, Debug, PartialEq)]
pub struct Route {
    /// Snapped start point, geodetic.
    pub start: GeoPoint,
    /// Snapped end point, geodetic.
    pub end: GeoPoint,
    /// Path geometry in the display frame.
    pub geometry: Vec<ProjectedPoint>,
    /// The same path as source geodetic coordinates.
    pub geographic: Vec<GeoPoint>,
    /// Length along the network, metres.
    pub distance_m: f64,
}

impl Route {
    pub fn distance_km(&self) -> f64 {
        self.distance_m / 1_000.0
    }
}

// ── RouteNetworkBuilder ───────────────────────────────────────────────────────

/// Fluent builder for [`RouteNetwork`].
///
/// | Method         | Default                   |
/// |----------------|---------------------------|
/// | `.router(r)`   | [`DijkstraRouter`]        |
/// | `.observer(o)` | [`NoopHighlightObserver`] |
pub struct RouteNetworkBuilder {
    config: NetworkConfig,
    router: Box<dyn Router>,
    observer: Box<dyn HighlightObserver>,
}

impl RouteNetworkBuilder {
    pub fn new(config: NetworkConfig) -> Self {
        Self {
            config,
            router: Box::new(DijkstraRouter),
            observer: Box::new(NoopHighlightObserver),
        }
    }

    pub fn router(mut self, router: impl Router + 'static) -> Self {
        self.router = Box::new(router);
        self
    }

    /// Receiver of the style-recomputation signal.
    pub fn observer(mut self, observer: impl HighlightObserver + 'static) -> Self {
        self.observer = Box::new(observer);
        self
    }

    /// Parse a GeoJSON FeatureCollection and build the network.
    pub fn from_geojson(self, source: &str) -> NetworkResult<RouteNetwork> {
        self.config.validate()?;
        let features = parse_features(source, &self.config.projection)?;
        self.from_features(features)
    }

    /// Build from already-parsed features (ids must be `0..n` in order).
    pub fn from_features(self, features: Vec<TrailFeature>) -> NetworkResult<RouteNetwork> {
        self.config.validate()?;
        let projection = self.config.projection;

        let mut builder = TrailGraphBuilder::with_keying(projection, self.config.vertex_keying);
        let mut lines = 0;
        for f in &features {
            // Only trail pieces are routable; markers never join the graph.
            match &f.geometry {
                Geometry::LineString(coords) => {
                    builder.add_line(coords);
                    lines += 1;
                }
                Geometry::Point(_) => {}
            }
        }
        if lines == 0 {
            return Err(LoadError::NoTrails.into());
        }

        let graph = builder.build();
        if graph.is_empty() {
            return Err(NetworkError::EmptyNetwork);
        }
        let islands = Islands::compute(&graph);
        let catalog = SegmentCatalog::new(features, projection).map_err(LoadError::from)?;

        info!(
            features = catalog.len(),
            connectors = catalog.connector_count(),
            vertices = graph.vertex_count(),
            chains = graph.chain_count(),
            islands = islands.count(),
            "route network initialized"
        );
        if islands.count() > 1 {
            warn!(islands = islands.count(), "trail network is not fully connected");
        }

        Ok(RouteNetwork {
            config: self.config,
            graph,
            islands,
            catalog,
            highlight: HighlightState::new(),
            router: self.router,
            observer: self.observer,
        })
    }
}

// ── RouteNetwork ──────────────────────────────────────────────────────────────

/// Snap, route, and highlight over an immutable trail network.
///
/// `Sync`: all queries take `&self`, and the highlight is behind a mutex.
pub struct RouteNetwork {
    config: NetworkConfig,
    graph: TrailGraph,
    islands: Islands,
    catalog: SegmentCatalog,
    highlight: HighlightState,
    router: Box<dyn Router>,
    observer: Box<dyn HighlightObserver>,
}

impl RouteNetwork {
    /// Parse `source` once and build everything with default collaborators.
    ///
    /// An error here means the bundled data is broken; hosts abort.
    pub fn initialize(source: &str, config: NetworkConfig) -> NetworkResult<Self> {
        RouteNetworkBuilder::new(config).from_geojson(source)
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn config(&self) -> &NetworkConfig {
        &self.config
    }

    pub fn projection(&self) -> Projection {
        self.config.projection
    }

    pub fn graph(&self) -> &TrailGraph {
        &self.graph
    }

    pub fn islands(&self) -> &Islands {
        &self.islands
    }

    pub fn catalog(&self) -> &SegmentCatalog {
        &self.catalog
    }

    // ── Frame boundary ────────────────────────────────────────────────────

    pub fn to_display(&self, p: GeoPoint) -> ProjectedPoint {
        self.config.projection.to_projected(p)
    }

    pub fn to_geographic(&self, p: ProjectedPoint) -> GeoPoint {
        self.config.projection.to_geographic(p)
    }

    // ── Snapping ──────────────────────────────────────────────────────────

    /// Nearest network point to a geodetic point, measured in the display
    /// frame.  Chain interiors count; snapping is not limited to junctions.
    ///
    /// A point that is not finite, out of range, or off the projection's
    /// grid is `Err(InvalidPoint)`.
    pub fn snap_point(&self, p: GeoPoint) -> NetworkResult<PointId> {
        let pos = self.config.projection.project(p)?;
        self.graph.nearest_point(pos).ok_or(NetworkError::EmptyNetwork)
    }

    /// The network point closest to `p`, as its exact source coordinate.
    pub fn snap_to_network(&self, p: GeoPoint) -> NetworkResult<GeoPoint> {
        Ok(self.graph.point_geo[self.snap_point(p)?.index()])
    }

    fn same_island(&self, a: PointId, b: PointId) -> bool {
        match (self.graph.anchor_vertex(a), self.graph.anchor_vertex(b)) {
            (Some(a), Some(b)) => self.islands.same_island(a, b),
            _ => false,
        }
    }

    // ── Routing ───────────────────────────────────────────────────────────

    /// Route between the first and last waypoint.
    ///
    /// Fewer than two waypoints is `Ok(None)`, as is a pair whose snapped
    /// endpoints lie on different islands.  Intermediate waypoints are
    /// ignored.
    pub fn route(&self, waypoints: &[GeoPoint]) -> NetworkResult<Option<Route>> {
        let [first, .., last] = waypoints else {
            return Ok(None);
        };
        let (from, to) = (self.snap_point(*first)?, self.snap_point(*last)?);

        if !self.same_island(from, to) {
            debug!(%from, %to, "endpoints on different islands");
            return Ok(None);
        }

        let Some(path) = self.router.point_path(&self.graph, from, to)? else {
            debug!(%from, %to, "no route");
            return Ok(None);
        };
        debug!(%from, %to, distance_m = path.weight, points = path.points.len(), "route found");

        Ok(Some(Route {
            start: self.graph.point_geo[from.index()],
            end: self.graph.point_geo[to.index()],
            geometry: path.projected(&self.graph),
            geographic: path.geographic(&self.graph),
            distance_m: path.weight,
        }))
    }

    /// Whether a route exists between the snapped points.
    pub fn path_exists(&self, a: GeoPoint, b: GeoPoint) -> NetworkResult<bool> {
        Ok(self.same_island(self.snap_point(a)?, self.snap_point(b)?))
    }

    // ── Segments & highlight ──────────────────────────────────────────────

    /// Metadata of a feature the renderer resolved from a pick.
    pub fn segment_at(&self, feature: FeatureId) -> Option<SegmentInfo> {
        self.catalog.segment_at(feature)
    }

    /// Geometric pick within `pick_tolerance_m` of a geodetic point.
    pub fn pick_segment(&self, p: GeoPoint) -> NetworkResult<Option<SegmentInfo>> {
        let pos = self.config.projection.project(p)?;
        Ok(self
            .catalog
            .pick(pos, self.config.pick_tolerance_m)
            .and_then(|id| self.catalog.segment_at(id)))
    }

    /// Handle a click: describe the picked feature (if any) and highlight its
    /// relation, or clear the highlight when nothing selectable was hit.
    pub fn select(&self, feature: Option<FeatureId>) -> Option<SegmentInfo> {
        let info = feature.and_then(|id| self.segment_at(id));
        self.set_highlighted(info.as_ref().and_then(|s| s.name()).map(str::to_string));
        info
    }

    /// Replace the highlighted relation name and signal the renderer.
    ///
    /// The observer hears every call; an unchanged revision means nothing
    /// needs repainting.
    pub fn set_highlighted(&self, name: Option<String>) -> bool {
        let changed = self.highlight.set(name.clone());
        self.observer
            .on_highlight_changed(name.as_deref(), self.highlight.revision());
        changed
    }

    pub fn highlighted(&self) -> Option<String> {
        self.highlight.get()
    }

    /// Current colour of one feature.
    pub fn style_for(&self, feature: FeatureId) -> Option<Color> {
        let resolver = self.style_resolver();
        self.catalog.feature(feature).map(|f| resolver.resolve(f))
    }

    /// Style callback for the renderer, bound to this network's highlight.
    pub fn style_resolver(&self) -> StyleResolver<'_> {
        StyleResolver::new(&self.highlight, self.config.palette)
    }
}
