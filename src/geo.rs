//! Geometry engine and the typed neighborhood dataset.
//!
//! Coordinates are decimal degrees. Segment/ring work happens in a local
//! equirectangular frame (longitude scaled by the cosine of the reference
//! latitude), which is accurate at city scale; distances use the haversine
//! formula in metres.

use serde::Deserialize;
use thiserror::Error;

pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeoError {
    #[error("polygon ring has {got} vertices, need at least 3")]
    RingTooSmall { got: usize },
}

#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("dataset is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("expected a FeatureCollection, got {0:?}")]
    NotACollection(String),
    #[error("dataset contains no usable features")]
    Empty,
    #[error("feature #{index} has no name property")]
    MissingName { index: usize },
    #[error("feature {name:?} has no polygon geometry")]
    MissingGeometry { name: String },
    #[error("feature {name:?}: {source}")]
    BadRing { name: String, source: GeoError },
    #[error("feature {name:?} has a malformed coordinate")]
    BadCoordinate { name: String },
}

/// Great-circle distance in metres. Symmetric; zero only for equal points.
pub fn distance_meters(a: LatLng, b: LatLng) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let dlat = (b.lat - a.lat).to_radians();
    let dlng = (b.lng - a.lng).to_radians();
    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlng / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_M * h.sqrt().min(1.0).asin()
}

/// Closest point to `p` on the closed segment `[a, b]`.
///
/// A degenerate segment (`a == b`) yields `a`.
pub fn closest_point_on_segment(p: LatLng, a: LatLng, b: LatLng) -> LatLng {
    // Project into a planar frame around the segment; longitude shrinks with
    // latitude, so scale it before measuring.
    let k = a.lat.to_radians().cos();
    let (px, py) = ((p.lng - a.lng) * k, p.lat - a.lat);
    let (bx, by) = ((b.lng - a.lng) * k, b.lat - a.lat);
    let len2 = bx * bx + by * by;
    if len2 <= f64::EPSILON {
        return a;
    }
    let t = ((px * bx + py * by) / len2).clamp(0.0, 1.0);
    LatLng {
        lat: a.lat + (b.lat - a.lat) * t,
        lng: a.lng + (b.lng - a.lng) * t,
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClosestPoint {
    pub point: LatLng,
    pub distance_m: f64,
}

/// Globally closest point on the ring boundary to `p`.
///
/// Ties go to the first minimal edge in ring order, so the result is
/// deterministic for a given ring.
pub fn closest_point_on_ring(p: LatLng, ring: &[LatLng]) -> Result<ClosestPoint, GeoError> {
    if ring.len() < 3 {
        return Err(GeoError::RingTooSmall { got: ring.len() });
    }
    let mut best = ClosestPoint {
        point: ring[0],
        distance_m: f64::INFINITY,
    };
    for i in 0..ring.len() {
        let a = ring[i];
        let b = ring[(i + 1) % ring.len()];
        let candidate = closest_point_on_segment(p, a, b);
        let d = distance_meters(p, candidate);
        if d < best.distance_m {
            best = ClosestPoint {
                point: candidate,
                distance_m: d,
            };
        }
    }
    Ok(best)
}

/// Ray-casting parity test.
///
/// A point exactly on an edge may resolve either way; callers treat the
/// boundary band via the near-border distance threshold instead.
pub fn point_in_ring(p: LatLng, ring: &[LatLng]) -> Result<bool, GeoError> {
    if ring.len() < 3 {
        return Err(GeoError::RingTooSmall { got: ring.len() });
    }
    let mut inside = false;
    let mut j = ring.len() - 1;
    for i in 0..ring.len() {
        let (a, b) = (ring[i], ring[j]);
        if (a.lat > p.lat) != (b.lat > p.lat) {
            let x = (b.lng - a.lng) * (p.lat - a.lat) / (b.lat - a.lat) + a.lng;
            if p.lng < x {
                inside = !inside;
            }
        }
        j = i;
    }
    Ok(inside)
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub min: LatLng,
    pub max: LatLng,
}

impl Bounds {
    fn around(p: LatLng) -> Self {
        Self { min: p, max: p }
    }

    fn extend(&mut self, p: LatLng) {
        self.min.lat = self.min.lat.min(p.lat);
        self.min.lng = self.min.lng.min(p.lng);
        self.max.lat = self.max.lat.max(p.lat);
        self.max.lng = self.max.lng.max(p.lng);
    }

    fn merge(&mut self, other: &Bounds) {
        self.extend(other.min);
        self.extend(other.max);
    }

    pub fn contains(&self, p: LatLng) -> bool {
        p.lat >= self.min.lat && p.lat <= self.max.lat && p.lng >= self.min.lng && p.lng <= self.max.lng
    }

    pub fn center(&self) -> LatLng {
        LatLng {
            lat: (self.min.lat + self.max.lat) / 2.0,
            lng: (self.min.lng + self.max.lng) / 2.0,
        }
    }

    pub fn span(&self) -> (f64, f64) {
        (self.max.lat - self.min.lat, self.max.lng - self.min.lng)
    }
}

/// One named neighborhood: the exterior ring plus its bounding box.
#[derive(Clone, Debug, PartialEq)]
pub struct Neighborhood {
    pub name: String,
    pub ring: Vec<LatLng>,
    pub bounds: Bounds,
}

impl Neighborhood {
    pub fn new(name: impl Into<String>, ring: Vec<LatLng>) -> Result<Self, GeoError> {
        if ring.len() < 3 {
            return Err(GeoError::RingTooSmall { got: ring.len() });
        }
        let mut bounds = Bounds::around(ring[0]);
        for p in &ring[1..] {
            bounds.extend(*p);
        }
        Ok(Self {
            name: name.into(),
            ring,
            bounds,
        })
    }

    pub fn contains(&self, p: LatLng) -> bool {
        self.bounds.contains(p) && matches!(point_in_ring(p, &self.ring), Ok(true))
    }
}

/// The full polygon dataset, validated at load time.
#[derive(Clone, Debug, PartialEq)]
pub struct NeighborhoodSet {
    neighborhoods: Vec<Neighborhood>,
    bounds: Bounds,
}

// Raw wire schema. GeoJSON positions may carry an altitude, hence Vec<f64>.
#[derive(Deserialize)]
struct RawCollection {
    #[serde(rename = "type")]
    kind: String,
    features: Vec<RawFeature>,
}

#[derive(Deserialize)]
struct RawFeature {
    properties: Option<RawProps>,
    geometry: Option<RawGeometry>,
}

#[derive(Deserialize)]
struct RawProps {
    #[serde(rename = "NOME")]
    nome: Option<String>,
}

#[derive(Deserialize)]
#[serde(tag = "type")]
enum RawGeometry {
    Polygon { coordinates: Vec<Vec<Vec<f64>>> },
    MultiPolygon { coordinates: Vec<Vec<Vec<Vec<f64>>>> },
}

impl NeighborhoodSet {
    pub fn new(neighborhoods: Vec<Neighborhood>) -> Result<Self, DatasetError> {
        let Some(first) = neighborhoods.first() else {
            return Err(DatasetError::Empty);
        };
        let mut bounds = first.bounds;
        for n in &neighborhoods[1..] {
            bounds.merge(&n.bounds);
        }
        Ok(Self {
            neighborhoods,
            bounds,
        })
    }

    /// Parse and validate a GeoJSON FeatureCollection.
    ///
    /// Every feature must carry a name and an exterior ring with at least 3
    /// vertices; anything else is a data-integrity error, reported up front
    /// rather than at click time.
    pub fn from_geojson(text: &str) -> Result<Self, DatasetError> {
        let raw: RawCollection = serde_json::from_str(text)?;
        if raw.kind != "FeatureCollection" {
            return Err(DatasetError::NotACollection(raw.kind));
        }
        let mut neighborhoods = Vec::with_capacity(raw.features.len());
        for (index, feature) in raw.features.into_iter().enumerate() {
            let name = feature
                .properties
                .and_then(|p| p.nome)
                .filter(|n| !n.is_empty())
                .ok_or(DatasetError::MissingName { index })?;
            let exterior = match feature.geometry {
                Some(RawGeometry::Polygon { coordinates }) => {
                    coordinates.into_iter().next()
                }
                Some(RawGeometry::MultiPolygon { coordinates }) => coordinates
                    .into_iter()
                    .filter_map(|part| part.into_iter().next())
                    .max_by_key(|ring| ring.len()),
                None => None,
            }
            .ok_or_else(|| DatasetError::MissingGeometry { name: name.clone() })?;

            let mut ring = Vec::with_capacity(exterior.len());
            for pos in &exterior {
                if pos.len() < 2 {
                    return Err(DatasetError::BadCoordinate { name });
                }
                // GeoJSON order is [lng, lat].
                ring.push(LatLng::new(pos[1], pos[0]));
            }
            if ring.len() > 1 && ring.first() == ring.last() {
                ring.pop();
            }
            let neighborhood = Neighborhood::new(name.clone(), ring)
                .map_err(|source| DatasetError::BadRing { name, source })?;
            neighborhoods.push(neighborhood);
        }
        Self::new(neighborhoods)
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn iter(&self) -> impl Iterator<Item = &Neighborhood> {
        self.neighborhoods.iter()
    }

    pub fn len(&self) -> usize {
        self.neighborhoods.len()
    }

    pub fn find(&self, name: &str) -> Option<&Neighborhood> {
        self.neighborhoods.iter().find(|n| n.name == name)
    }

    /// First neighborhood whose polygon contains `p`, in dataset order.
    pub fn containing(&self, p: LatLng) -> Option<&Neighborhood> {
        self.neighborhoods.iter().find(|n| n.contains(p))
    }

    /// Pick a target from `pool` (or the full set) with a pre-drawn roll in
    /// `[0, 1)`. An empty intersection falls back to the full set so a stale
    /// pool list can never stall the game.
    pub fn pick(&self, pool: Option<&[&str]>, roll: f64) -> &Neighborhood {
        let filtered: Vec<&Neighborhood> = match pool {
            Some(names) => self
                .neighborhoods
                .iter()
                .filter(|n| names.contains(&n.name.as_str()))
                .collect(),
            None => Vec::new(),
        };
        if filtered.is_empty() {
            &self.neighborhoods[index_for_roll(roll, self.neighborhoods.len())]
        } else {
            filtered[index_for_roll(roll, filtered.len())]
        }
    }
}

fn index_for_roll(roll: f64, len: usize) -> usize {
    debug_assert!(len > 0);
    let idx = (roll.clamp(0.0, 1.0) * len as f64).floor() as usize;
    idx.min(len - 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn square() -> Vec<LatLng> {
        vec![
            LatLng::new(0.0, 0.0),
            LatLng::new(0.0, 1.0),
            LatLng::new(1.0, 1.0),
            LatLng::new(1.0, 0.0),
        ]
    }

    #[test]
    fn distance_is_zero_only_for_equal_points() {
        let a = LatLng::new(-23.96, -46.33);
        let b = LatLng::new(-23.97, -46.32);
        assert_eq!(distance_meters(a, a), 0.0);
        assert!(distance_meters(a, b) > 0.0);
    }

    #[test]
    fn distance_roughly_matches_known_scale() {
        // One degree of latitude is ~111 km.
        let a = LatLng::new(0.0, 0.0);
        let b = LatLng::new(1.0, 0.0);
        let d = distance_meters(a, b);
        assert!((d - 111_195.0).abs() < 200.0, "got {d}");
    }

    #[test]
    fn degenerate_segment_returns_endpoint() {
        let s = LatLng::new(-23.9, -46.3);
        for p in [s, LatLng::new(10.0, 10.0), LatLng::new(-90.0, 0.0)] {
            assert_eq!(closest_point_on_segment(p, s, s), s);
        }
    }

    #[test]
    fn segment_projection_clamps_to_endpoints() {
        let a = LatLng::new(0.0, 0.0);
        let b = LatLng::new(0.0, 1.0);
        assert_eq!(closest_point_on_segment(LatLng::new(0.5, -2.0), a, b), a);
        assert_eq!(closest_point_on_segment(LatLng::new(0.5, 3.0), a, b), b);
        let mid = closest_point_on_segment(LatLng::new(1.0, 0.5), a, b);
        assert!((mid.lng - 0.5).abs() < 1e-9 && mid.lat.abs() < 1e-9);
    }

    #[test]
    fn ring_closest_point_rejects_small_rings() {
        let p = LatLng::new(0.0, 0.0);
        let two = [p, LatLng::new(1.0, 1.0)];
        assert_eq!(
            closest_point_on_ring(p, &two),
            Err(GeoError::RingTooSmall { got: 2 })
        );
        assert_eq!(point_in_ring(p, &two), Err(GeoError::RingTooSmall { got: 2 }));
    }

    #[test]
    fn ring_closest_point_finds_nearest_edge() {
        // Just east of the square's lng=1 edge.
        let hit = closest_point_on_ring(LatLng::new(0.5, 1.4), &square()).unwrap();
        assert!((hit.point.lng - 1.0).abs() < 1e-9);
        assert!((hit.point.lat - 0.5).abs() < 1e-6);
        assert!(hit.distance_m > 0.0);
    }

    #[test]
    fn ring_tie_break_is_stable() {
        // From the square's center the two longitude edges measure exactly
        // equal (and, off the equator, shorter than the latitude edges); the
        // first of them in ring order must win.
        let ring = square();
        let a = closest_point_on_ring(LatLng::new(0.5, 0.5), &ring).unwrap();
        let b = closest_point_on_ring(LatLng::new(0.5, 0.5), &ring).unwrap();
        assert_eq!(a, b);
        assert!((a.point.lat - 0.5).abs() < 1e-6 && (a.point.lng - 1.0).abs() < 1e-9);
    }

    #[test]
    fn point_in_ring_convex_cases() {
        let ring = square();
        assert!(point_in_ring(LatLng::new(0.5, 0.5), &ring).unwrap());
        assert!(point_in_ring(LatLng::new(0.01, 0.99), &ring).unwrap());
        // Strictly outside the bounding envelope.
        assert!(!point_in_ring(LatLng::new(2.0, 0.5), &ring).unwrap());
        assert!(!point_in_ring(LatLng::new(0.5, -1.0), &ring).unwrap());
    }

    #[test]
    fn neighborhood_containment_uses_bounds_precheck() {
        let n = Neighborhood::new("Centro", square()).unwrap();
        assert!(n.contains(LatLng::new(0.2, 0.7)));
        assert!(!n.contains(LatLng::new(5.0, 5.0)));
    }

    const SAMPLE: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "properties": {"NOME": "Gonzaga"},
                "geometry": {"type": "Polygon", "coordinates": [[
                    [-46.34, -23.97], [-46.33, -23.97], [-46.33, -23.96],
                    [-46.34, -23.96], [-46.34, -23.97]
                ]]}
            },
            {
                "properties": {"NOME": "Centro"},
                "geometry": {"type": "MultiPolygon", "coordinates": [
                    [[[-46.31, -23.94], [-46.30, -23.94], [-46.30, -23.93]]],
                    [[[-46.32, -23.95], [-46.31, -23.95], [-46.31, -23.94],
                      [-46.32, -23.94], [-46.32, -23.95]]]
                ]}
            }
        ]
    }"#;

    #[test]
    fn parses_and_validates_geojson() {
        let set = NeighborhoodSet::from_geojson(SAMPLE).unwrap();
        assert_eq!(set.len(), 2);
        let gonzaga = set.find("Gonzaga").unwrap();
        // Closing vertex dropped.
        assert_eq!(gonzaga.ring.len(), 4);
        // MultiPolygon keeps its largest part.
        assert_eq!(set.find("Centro").unwrap().ring.len(), 4);
        assert!(set.bounds().contains(LatLng::new(-23.95, -46.32)));
    }

    #[test]
    fn rejects_feature_without_name() {
        let text = r#"{"type":"FeatureCollection","features":[
            {"properties":{},"geometry":{"type":"Polygon","coordinates":[[[0,0],[1,0],[1,1]]]}}
        ]}"#;
        assert!(matches!(
            NeighborhoodSet::from_geojson(text),
            Err(DatasetError::MissingName { index: 0 })
        ));
    }

    #[test]
    fn rejects_degenerate_ring() {
        let text = r#"{"type":"FeatureCollection","features":[
            {"properties":{"NOME":"Ponta"},"geometry":{"type":"Polygon","coordinates":[[[0,0],[1,1],[0,0]]]}}
        ]}"#;
        // Closing-vertex removal leaves 2 points.
        assert!(matches!(
            NeighborhoodSet::from_geojson(text),
            Err(DatasetError::BadRing { .. })
        ));
    }

    #[test]
    fn pick_honors_pool_and_falls_back() {
        let set = NeighborhoodSet::from_geojson(SAMPLE).unwrap();
        let picked = set.pick(Some(&["Centro"]), 0.99);
        assert_eq!(picked.name, "Centro");
        // Pool with no dataset overlap falls back to the full set.
        let fallback = set.pick(Some(&["Nowhere"]), 0.0);
        assert_eq!(fallback.name, "Gonzaga");
        // No pool draws uniformly from everything.
        assert_eq!(set.pick(None, 0.99).name, "Centro");
    }

    #[test]
    fn containing_finds_first_match_in_dataset_order() {
        let set = NeighborhoodSet::from_geojson(SAMPLE).unwrap();
        let inside_gonzaga = LatLng::new(-23.965, -46.335);
        assert_eq!(set.containing(inside_gonzaga).unwrap().name, "Gonzaga");
        assert!(set.containing(LatLng::new(0.0, 0.0)).is_none());
    }

    proptest! {
        #[test]
        fn distance_is_symmetric_and_non_negative(
            lat1 in -80.0f64..80.0, lng1 in -179.0f64..179.0,
            lat2 in -80.0f64..80.0, lng2 in -179.0f64..179.0,
        ) {
            let a = LatLng::new(lat1, lng1);
            let b = LatLng::new(lat2, lng2);
            let ab = distance_meters(a, b);
            let ba = distance_meters(b, a);
            prop_assert!(ab >= 0.0);
            prop_assert!((ab - ba).abs() < 1e-6);
        }

        #[test]
        fn degenerate_segment_always_returns_endpoint(
            plat in -80.0f64..80.0, plng in -179.0f64..179.0,
            slat in -80.0f64..80.0, slng in -179.0f64..179.0,
        ) {
            let p = LatLng::new(plat, plng);
            let s = LatLng::new(slat, slng);
            prop_assert_eq!(closest_point_on_segment(p, s, s), s);
        }

        #[test]
        fn segment_point_is_no_farther_than_endpoints(
            plat in -0.2f64..0.2, plng in -0.2f64..0.2,
        ) {
            // City-scale coordinates; the metre of slack covers the planar
            // projection's distortion against the haversine metric.
            let p = LatLng::new(plat, plng);
            let a = LatLng::new(0.0, 0.0);
            let b = LatLng::new(0.1, 0.1);
            let c = closest_point_on_segment(p, a, b);
            let dc = distance_meters(p, c);
            prop_assert!(dc <= distance_meters(p, a) + 1.0);
            prop_assert!(dc <= distance_meters(p, b) + 1.0);
        }
    }
}
