//! Building boundary geometry
//!
//! This module contains the walkable area every asset is confined to. The area is
//! a union of polygons loaded once at startup from a GeoJSON file and then shared
//! read-only between all walkers.

use geo::{Area, BoundingRect, Contains, Coord, LineString, MultiPolygon, Point, Polygon, Rect};
use geojson::{GeoJson, Geometry, Value};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

use crate::simulation::{SimulationError, SimulationResult};

/// A 2D coordinate in the boundary's spatial reference
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Easting
    pub x: f64,
    /// Northing
    pub y: f64,
}

impl Position {
    /// Create a new position
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Position reached by moving `distance` along `heading` (radians)
    pub fn step(&self, heading: f64, distance: f64) -> Self {
        Self { x: self.x + distance * heading.cos(), y: self.y + distance * heading.sin() }
    }
}

impl From<Position> for Point<f64> {
    fn from(position: Position) -> Self {
        Point::new(position.x, position.y)
    }
}

/// Axis-aligned bounding rectangle of a boundary
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    /// Smallest x
    pub min_x: f64,
    /// Smallest y
    pub min_y: f64,
    /// Largest x
    pub max_x: f64,
    /// Largest y
    pub max_y: f64,
}

impl Bounds {
    /// Width of the rectangle
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    /// Height of the rectangle
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }
}

impl From<Rect<f64>> for Bounds {
    fn from(rect: Rect<f64>) -> Self {
        Self { min_x: rect.min().x, min_y: rect.min().y, max_x: rect.max().x, max_y: rect.max().y }
    }
}

/// Point-containment capability consumed by the sampler and the walkers
///
/// Implementations must be safe for concurrent reads: every walker holds the same
/// boundary behind an `Arc`.
pub trait Boundary: Send + Sync + std::fmt::Debug {
    /// Whether `point` lies strictly inside the walkable area
    fn contains(&self, point: Position) -> bool;

    /// Bounding rectangle, `None` when the area is empty
    fn bounds(&self) -> Option<Bounds>;
}

/// Walkable area made of one or more polygons
#[derive(Debug, Clone)]
pub struct BoundaryShape {
    shape: MultiPolygon<f64>,
}

impl BoundaryShape {
    /// Wrap an existing multi-polygon
    pub fn new(shape: MultiPolygon<f64>) -> Self {
        Self { shape }
    }

    /// Union of the given polygons
    pub fn from_polygons(polygons: Vec<Polygon<f64>>) -> Self {
        Self::new(MultiPolygon::new(polygons))
    }

    /// Axis-aligned rectangle, handy for tests and synthetic floors
    pub fn rectangle(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        let rect = Rect::new(Coord { x: min_x, y: min_y }, Coord { x: max_x, y: max_y });
        Self::from_polygons(vec![rect.to_polygon()])
    }

    /// Load a boundary from a GeoJSON file
    pub fn from_geojson_file<P: AsRef<Path>>(path: P) -> SimulationResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            SimulationError::boundary_error(format!("cannot read {}: {}", path.display(), e))
        })?;

        let shape = Self::from_geojson_str(&content)?;
        info!(
            path = %path.display(),
            polygons = shape.polygon_count(),
            area = shape.area(),
            "Loaded building boundary"
        );
        Ok(shape)
    }

    /// Parse a boundary from GeoJSON text
    ///
    /// Accepts a bare geometry, a Feature or a FeatureCollection. Every Polygon and
    /// MultiPolygon found is merged into the walkable area; other geometry kinds are
    /// skipped.
    pub fn from_geojson_str(content: &str) -> SimulationResult<Self> {
        let geojson: GeoJson = content
            .parse()
            .map_err(|e| SimulationError::boundary_error(format!("invalid GeoJSON: {}", e)))?;

        let mut polygons = Vec::new();
        match geojson {
            GeoJson::Geometry(geometry) => collect_polygons(&geometry, &mut polygons)?,
            GeoJson::Feature(feature) => {
                if let Some(geometry) = &feature.geometry {
                    collect_polygons(geometry, &mut polygons)?;
                }
            }
            GeoJson::FeatureCollection(collection) => {
                for feature in &collection.features {
                    if let Some(geometry) = &feature.geometry {
                        collect_polygons(geometry, &mut polygons)?;
                    }
                }
            }
        }

        if polygons.is_empty() {
            return Err(SimulationError::boundary_error(
                "GeoJSON contains no Polygon or MultiPolygon geometry",
            ));
        }

        Ok(Self::from_polygons(polygons))
    }

    /// Total area in squared boundary units
    pub fn area(&self) -> f64 {
        self.shape.unsigned_area()
    }

    /// Number of polygons making up the area
    pub fn polygon_count(&self) -> usize {
        self.shape.0.len()
    }

    /// Underlying geometry
    pub fn shape(&self) -> &MultiPolygon<f64> {
        &self.shape
    }

    /// Reject boundaries whose area is too small to sample or walk in
    ///
    /// Rejection sampling and wall reflection never terminate on a zero-area shape,
    /// so this runs before any walker is created.
    pub fn validate(&self, min_area: f64) -> SimulationResult<()> {
        let area = self.area();
        if self.polygon_count() == 0 || !area.is_finite() || area <= min_area {
            return Err(SimulationError::DegenerateBoundary { area });
        }
        Ok(())
    }
}

impl Boundary for BoundaryShape {
    fn contains(&self, point: Position) -> bool {
        self.shape.contains(&Point::from(point))
    }

    fn bounds(&self) -> Option<Bounds> {
        self.shape.bounding_rect().map(Bounds::from)
    }
}

fn collect_polygons(geometry: &Geometry, out: &mut Vec<Polygon<f64>>) -> SimulationResult<()> {
    match &geometry.value {
        Value::Polygon(rings) => out.push(polygon_from_rings(rings)?),
        Value::MultiPolygon(polygons) => {
            for rings in polygons {
                out.push(polygon_from_rings(rings)?);
            }
        }
        Value::GeometryCollection(geometries) => {
            for inner in geometries {
                collect_polygons(inner, out)?;
            }
        }
        other => debug!(kind = geometry_kind(other), "Skipping non-polygon geometry"),
    }
    Ok(())
}

fn geometry_kind(value: &Value) -> &'static str {
    match value {
        Value::Point(_) => "Point",
        Value::MultiPoint(_) => "MultiPoint",
        Value::LineString(_) => "LineString",
        Value::MultiLineString(_) => "MultiLineString",
        Value::Polygon(_) => "Polygon",
        Value::MultiPolygon(_) => "MultiPolygon",
        Value::GeometryCollection(_) => "GeometryCollection",
    }
}

fn polygon_from_rings(rings: &[Vec<Vec<f64>>]) -> SimulationResult<Polygon<f64>> {
    let mut line_strings = Vec::with_capacity(rings.len());
    for ring in rings {
        let mut coords = Vec::with_capacity(ring.len());
        for position in ring {
            match position.as_slice() {
                [x, y, ..] => coords.push(Coord { x: *x, y: *y }),
                _ => {
                    return Err(SimulationError::boundary_error(
                        "polygon position needs at least two coordinates",
                    ))
                }
            }
        }
        line_strings.push(LineString::new(coords));
    }

    let mut rings = line_strings.into_iter();
    let exterior = rings
        .next()
        .ok_or_else(|| SimulationError::boundary_error("polygon without exterior ring"))?;
    Ok(Polygon::new(exterior, rings.collect()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SQUARE_WITH_HOLE: &str = r#"{
        "type": "Polygon",
        "coordinates": [
            [[0.0, 0.0], [10.0, 0.0], [10.0, 10.0], [0.0, 10.0], [0.0, 0.0]],
            [[4.0, 4.0], [6.0, 4.0], [6.0, 6.0], [4.0, 6.0], [4.0, 4.0]]
        ]
    }"#;

    #[test]
    fn test_rectangle_contains() {
        let square = BoundaryShape::rectangle(0.0, 0.0, 1.0, 1.0);

        assert!(square.contains(Position::new(0.5, 0.5)));
        assert!(!square.contains(Position::new(1.3, 0.5)));
        assert!(!square.contains(Position::new(-0.1, 0.5)));
        assert!((square.area() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_bounds() {
        let shape = BoundaryShape::rectangle(-2.0, 1.0, 3.0, 4.0);
        let bounds = shape.bounds().unwrap();

        assert_eq!(bounds.min_x, -2.0);
        assert_eq!(bounds.max_y, 4.0);
        assert_eq!(bounds.width(), 5.0);
        assert_eq!(bounds.height(), 3.0);
    }

    #[test]
    fn test_geojson_polygon_with_hole() {
        let shape = BoundaryShape::from_geojson_str(SQUARE_WITH_HOLE).unwrap();

        assert_eq!(shape.polygon_count(), 1);
        assert!((shape.area() - 96.0).abs() < 1e-9);
        assert!(shape.contains(Position::new(1.0, 1.0)));
        assert!(!shape.contains(Position::new(5.0, 5.0)));
    }

    #[test]
    fn test_geojson_feature_collection_merges_polygons() {
        let content = r#"{
            "type": "FeatureCollection",
            "features": [
                {
                    "type": "Feature",
                    "properties": {"name": "hall A"},
                    "geometry": {
                        "type": "Polygon",
                        "coordinates": [[[0, 0], [2, 0], [2, 2], [0, 2], [0, 0]]]
                    }
                },
                {
                    "type": "Feature",
                    "properties": {"name": "entrance"},
                    "geometry": {"type": "Point", "coordinates": [1, 1]}
                },
                {
                    "type": "Feature",
                    "properties": {"name": "halls B and C"},
                    "geometry": {
                        "type": "MultiPolygon",
                        "coordinates": [
                            [[[5, 0], [6, 0], [6, 1], [5, 1], [5, 0]]],
                            [[[8, 0], [9, 0], [9, 1], [8, 1], [8, 0]]]
                        ]
                    }
                }
            ]
        }"#;

        let shape = BoundaryShape::from_geojson_str(content).unwrap();
        assert_eq!(shape.polygon_count(), 3);
        assert!(shape.contains(Position::new(8.5, 0.5)));
        assert!(!shape.contains(Position::new(4.0, 0.5)));
    }

    #[test]
    fn test_geojson_without_polygons_is_rejected() {
        let content = r#"{"type": "Point", "coordinates": [1.0, 2.0]}"#;
        let result = BoundaryShape::from_geojson_str(content);
        assert!(matches!(result, Err(SimulationError::BoundaryError(_))));

        assert!(BoundaryShape::from_geojson_str("not json").is_err());
    }

    #[test]
    fn test_geojson_file_loading() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("building.geojson");
        fs::write(&path, SQUARE_WITH_HOLE).unwrap();

        let shape = BoundaryShape::from_geojson_file(&path).unwrap();
        assert_eq!(shape.polygon_count(), 1);

        let missing = BoundaryShape::from_geojson_file(temp_dir.path().join("missing.geojson"));
        assert!(missing.is_err());
    }

    #[test]
    fn test_validate_rejects_degenerate_shapes() {
        let line = BoundaryShape::rectangle(0.0, 0.0, 1.0, 0.0);
        assert!(matches!(line.validate(1e-9), Err(SimulationError::DegenerateBoundary { .. })));

        let empty = BoundaryShape::from_polygons(Vec::new());
        assert!(empty.validate(0.0).is_err());
        assert!(empty.bounds().is_none());

        BoundaryShape::rectangle(0.0, 0.0, 1.0, 1.0).validate(1e-9).unwrap();
    }

    #[test]
    fn test_position_step() {
        let start = Position::new(0.5, 0.5);
        let moved = start.step(0.0, 0.8);
        assert!((moved.x - 1.3).abs() < 1e-12);
        assert!((moved.y - 0.5).abs() < 1e-12);

        let up = start.step(std::f64::consts::FRAC_PI_2, 0.25);
        assert!((up.x - 0.5).abs() < 1e-12);
        assert!((up.y - 0.75).abs() < 1e-12);
    }
}
