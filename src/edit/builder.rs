// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Control point accumulator for building curves and surfaces

use crate::geometry::nurbs::CUBIC;
use crate::geometry::{Mesh, NurbsCurve, NurbsSurface};
use crate::scene::CurveObject;
use nalgebra::Point3;
use tracing::{debug, warn};

/// Control points a bicubic patch consumes
pub const SURFACE_POINTS: usize = 16;

/// Fewest control points a cubic curve accepts
pub const CURVE_POINTS: usize = CUBIC + 1;

/// Collects picked points until enough exist for a curve or surface.
///
/// Building is all or nothing: with too few points nothing is built and
/// the accumulated points stay; a successful build clears them.
#[derive(Debug, Clone)]
pub struct CurveSurfaceBuilder {
    points: Vec<Point3<f64>>,
    curve_samples: usize,
    surface_resolution: usize,
}

impl CurveSurfaceBuilder {
    pub fn new(curve_samples: usize, surface_resolution: usize) -> Self {
        Self {
            points: Vec::new(),
            curve_samples,
            surface_resolution,
        }
    }

    /// Append a point; duplicates are kept
    pub fn add_control_point(&mut self, point: Point3<f64>) {
        self.points.push(point);
    }

    pub fn control_points(&self) -> &[Point3<f64>] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    /// Bicubic patch through a 4×4 grid of the first 16 points, tessellated
    /// into a triangle mesh.
    pub fn build_surface(&mut self) -> Option<Mesh> {
        let grid: [Point3<f64>; SURFACE_POINTS] = match self.points.get(..SURFACE_POINTS) {
            Some(first) => std::array::from_fn(|i| first[i]),
            None => {
                debug!(
                    "Surface needs {} control points, have {}",
                    SURFACE_POINTS,
                    self.points.len()
                );
                return None;
            }
        };

        if self.points.len() > SURFACE_POINTS {
            warn!(
                "Surface uses the first {} of {} control points; the rest are discarded",
                SURFACE_POINTS,
                self.points.len()
            );
        }

        let mesh = NurbsSurface::bicubic(grid).tessellate(self.surface_resolution);
        self.points.clear();
        debug!(
            "Built surface: {} vertices, {} triangles",
            mesh.vertex_count(),
            mesh.triangle_count()
        );
        Some(mesh)
    }

    /// Cubic curve through all accumulated points, sampled into a polyline
    pub fn build_curve(&mut self) -> Option<CurveObject> {
        if self.points.len() < CURVE_POINTS {
            debug!(
                "Curve needs {} control points, have {}",
                CURVE_POINTS,
                self.points.len()
            );
            return None;
        }

        let curve = NurbsCurve::clamped(self.points.clone(), CUBIC)?;
        let polyline = curve.sample(self.curve_samples);
        self.points.clear();
        debug!(
            "Built curve: {} control points, {} samples",
            curve.control_points().len(),
            polyline.len()
        );
        Some(CurveObject { curve, polyline })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fill(builder: &mut CurveSurfaceBuilder, count: usize) {
        for k in 0..count {
            builder.add_control_point(Point3::new((k / 4) as f64, (k % 4) as f64, (k % 3) as f64));
        }
    }

    #[test]
    fn test_surface_needs_sixteen_points() {
        let mut builder = CurveSurfaceBuilder::new(50, 20);
        fill(&mut builder, 15);
        assert!(builder.build_surface().is_none());
        assert_eq!(builder.len(), 15);

        fill(&mut builder, 1);
        let mesh = builder.build_surface().unwrap();
        assert_eq!(mesh.vertex_count(), 400);
        assert!(builder.is_empty());
    }

    #[test]
    fn test_surface_discards_extra_points() {
        let mut builder = CurveSurfaceBuilder::new(50, 8);
        fill(&mut builder, 20);
        let mesh = builder.build_surface().unwrap();
        assert_eq!(mesh.vertex_count(), 64);
        assert!(builder.is_empty());
    }

    #[test]
    fn test_curve_needs_four_points() {
        let mut builder = CurveSurfaceBuilder::new(50, 20);
        fill(&mut builder, 3);
        assert!(builder.build_curve().is_none());
        assert_eq!(builder.len(), 3);

        fill(&mut builder, 1);
        let built = builder.build_curve().unwrap();
        assert_eq!(built.curve.knots().len(), 8);
        assert_eq!(built.polyline.len(), 50);
        assert!(builder.is_empty());
    }

    #[test]
    fn test_curve_keeps_all_points() {
        let mut builder = CurveSurfaceBuilder::new(10, 20);
        fill(&mut builder, 7);
        let built = builder.build_curve().unwrap();
        assert_eq!(built.curve.control_points().len(), 7);
        assert_eq!(built.curve.knots().len(), 7 + 4);
        assert_eq!(built.polyline.len(), 10);
    }

    #[test]
    fn test_duplicate_points_kept() {
        let mut builder = CurveSurfaceBuilder::new(50, 20);
        builder.add_control_point(Point3::origin());
        builder.add_control_point(Point3::origin());
        assert_eq!(builder.control_points(), &[Point3::origin(); 2]);
    }
}
