//! Uniform interior point sampling
//!
//! Starting positions are drawn uniformly over the boundary's bounding rectangle
//! and rejected until they land inside the walkable area.

use rand::Rng;
use std::fmt;
use tracing::debug;

use crate::facility::{Boundary, Position};
use crate::simulation::{SimulationError, SimulationResult};

/// Rejection sampler for interior starting points
pub struct UniformPointSampler {
    rng: Box<dyn rand::RngCore + Send>,
}

impl fmt::Debug for UniformPointSampler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UniformPointSampler").finish()
    }
}

impl Default for UniformPointSampler {
    fn default() -> Self {
        Self::new()
    }
}

impl UniformPointSampler {
    /// Create a sampler backed by OS entropy
    pub fn new() -> Self {
        use rand::SeedableRng;
        Self { rng: Box::new(rand::rngs::StdRng::from_entropy()) }
    }

    /// Create a sampler with a specific seed for reproducible results
    pub fn with_seed(seed: u64) -> Self {
        use rand::SeedableRng;
        Self { rng: Box::new(rand::rngs::StdRng::seed_from_u64(seed)) }
    }

    /// Draw `n` points uniformly distributed inside `boundary`
    ///
    /// There is no retry limit: a boundary whose area is zero never yields a point,
    /// so callers validate the shape first (see `BoundaryShape::validate`).
    pub fn sample<B: Boundary + ?Sized>(
        &mut self,
        boundary: &B,
        n: usize,
    ) -> SimulationResult<Vec<Position>> {
        if n == 0 {
            return Ok(Vec::new());
        }

        let bounds = boundary.bounds().ok_or(SimulationError::DegenerateBoundary { area: 0.0 })?;

        let mut points = Vec::with_capacity(n);
        let mut draws: u64 = 0;
        while points.len() < n {
            draws += 1;
            let candidate = Position::new(
                self.rng.gen_range(bounds.min_x..=bounds.max_x),
                self.rng.gen_range(bounds.min_y..=bounds.max_y),
            );
            if boundary.contains(candidate) {
                points.push(candidate);
            }
        }

        debug!(
            points = n,
            draws,
            acceptance = n as f64 / draws as f64,
            "Sampled interior starting points"
        );
        Ok(points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::facility::BoundaryShape;
    use geo::{Coord, LineString, Polygon};

    #[test]
    fn test_sample_exact_count_inside_square() {
        let square = BoundaryShape::rectangle(0.0, 0.0, 1.0, 1.0);
        let mut sampler = UniformPointSampler::with_seed(42);

        for n in [1, 7, 100] {
            let points = sampler.sample(&square, n).unwrap();
            assert_eq!(points.len(), n);
            assert!(points.iter().all(|p| square.contains(*p)));
        }
    }

    #[test]
    fn test_sample_zero_points() {
        let square = BoundaryShape::rectangle(0.0, 0.0, 1.0, 1.0);
        let mut sampler = UniformPointSampler::new();
        assert!(sampler.sample(&square, 0).unwrap().is_empty());
    }

    #[test]
    fn test_sample_concave_polygon() {
        // L-shaped hall: the upper-right quadrant of the bounding box is outside
        let exterior = LineString::new(vec![
            Coord { x: 0.0, y: 0.0 },
            Coord { x: 10.0, y: 0.0 },
            Coord { x: 10.0, y: 5.0 },
            Coord { x: 5.0, y: 5.0 },
            Coord { x: 5.0, y: 10.0 },
            Coord { x: 0.0, y: 10.0 },
        ]);
        let hall = BoundaryShape::from_polygons(vec![Polygon::new(exterior, vec![])]);
        let mut sampler = UniformPointSampler::with_seed(7);

        let points = sampler.sample(&hall, 500).unwrap();
        assert_eq!(points.len(), 500);
        for point in &points {
            assert!(hall.contains(*point));
            assert!(!(point.x > 5.0 && point.y > 5.0));
        }
    }

    #[test]
    fn test_sample_is_reproducible_with_seed() {
        let square = BoundaryShape::rectangle(0.0, 0.0, 4.0, 2.0);

        let a = UniformPointSampler::with_seed(99).sample(&square, 10).unwrap();
        let b = UniformPointSampler::with_seed(99).sample(&square, 10).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_sample_empty_boundary_is_an_error() {
        let empty = BoundaryShape::from_polygons(Vec::new());
        let mut sampler = UniformPointSampler::with_seed(1);

        assert!(matches!(
            sampler.sample(&empty, 3),
            Err(SimulationError::DegenerateBoundary { .. })
        ));
    }
}
