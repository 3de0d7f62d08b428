// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! NURBS curves and surfaces
//!
//! Evaluation works in homogeneous coordinates: each control point is
//! scaled by its weight, the B-spline basis is applied, and the result is
//! projected back by dividing through the accumulated weight.

use super::{Mesh, Polyline, Triangle, Vertex};
use nalgebra::{Point3, Point4};
use serde::Serialize;

/// Degree used by the interactive builders
pub const CUBIC: usize = 3;

/// Non-decreasing knot vector for a fixed degree
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KnotVector {
    knots: Vec<f64>,
    degree: usize,
}

impl KnotVector {
    /// Clamped knot vector with uniform interior knots over `[0, 1]`.
    ///
    /// Length is `control_points + degree + 1`. Returns `None` when there are
    /// fewer than `degree + 1` control points.
    pub fn clamped_uniform(control_points: usize, degree: usize) -> Option<Self> {
        if control_points < degree + 1 {
            return None;
        }

        let mut knots = Vec::with_capacity(control_points + degree + 1);
        knots.extend(std::iter::repeat(0.0).take(degree + 1));

        let num_interior = control_points - degree - 1;
        for i in 1..=num_interior {
            knots.push(i as f64 / (num_interior + 1) as f64);
        }

        knots.extend(std::iter::repeat(1.0).take(degree + 1));

        Some(Self { knots, degree })
    }

    pub fn len(&self) -> usize {
        self.knots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.knots.is_empty()
    }

    pub fn degree(&self) -> usize {
        self.degree
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.knots
    }

    /// Number of control points this knot vector serves
    pub fn control_point_count(&self) -> usize {
        self.knots.len() - self.degree - 1
    }

    /// Valid parameter domain
    pub fn domain(&self) -> (f64, f64) {
        let p = self.degree;
        (self.knots[p], self.knots[self.knots.len() - p - 1])
    }

    /// Map `t` in `[0, 1]` onto the domain
    fn parameter(&self, t: f64) -> f64 {
        let (u_min, u_max) = self.domain();
        u_min + t.clamp(0.0, 1.0) * (u_max - u_min)
    }

    /// Knot span containing `u`
    fn find_span(&self, u: f64) -> usize {
        let n = self.control_point_count();
        let p = self.degree;

        if u >= self.knots[n] {
            return n - 1;
        }

        let mut low = p;
        let mut high = n;
        while low < high {
            let mid = (low + high) / 2;
            if self.knots[mid] > u {
                high = mid;
            } else {
                low = mid + 1;
            }
        }

        low - 1
    }

    /// The `degree + 1` non-zero basis functions on `span` at `u`
    fn basis_functions(&self, span: usize, u: f64) -> Vec<f64> {
        let p = self.degree;
        let mut basis = vec![0.0; p + 1];
        let mut left = vec![0.0; p + 1];
        let mut right = vec![0.0; p + 1];

        basis[0] = 1.0;

        for j in 1..=p {
            left[j] = u - self.knots[span + 1 - j];
            right[j] = self.knots[span + j] - u;

            let mut saved = 0.0;
            for r in 0..j {
                let denom = right[r + 1] + left[j - r];
                if denom.abs() > 1e-15 {
                    let temp = basis[r] / denom;
                    basis[r] = saved + right[r + 1] * temp;
                    saved = left[j - r] * temp;
                } else {
                    basis[r] = saved;
                    saved = 0.0;
                }
            }
            basis[j] = saved;
        }

        basis
    }

    /// Span and basis values at normalized parameter `t`
    fn evaluate(&self, t: f64) -> (usize, Vec<f64>) {
        let u = self.parameter(t);
        let span = self.find_span(u);
        (span, self.basis_functions(span, u))
    }
}

fn homogeneous(points: &[Point3<f64>], weights: &[f64]) -> Vec<Point4<f64>> {
    points
        .iter()
        .zip(weights)
        .map(|(p, &w)| Point4::new(p.x * w, p.y * w, p.z * w, w))
        .collect()
}

fn project(h: Point4<f64>) -> Point3<f64> {
    Point3::new(h.x / h.w, h.y / h.w, h.z / h.w)
}

fn valid_weights(weights: &[f64], expected: usize) -> bool {
    weights.len() == expected && weights.iter().all(|&w| w > 0.0 && w.is_finite())
}

/// Rational B-spline curve with a clamped knot vector
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NurbsCurve {
    control_points: Vec<Point3<f64>>,
    weights: Vec<f64>,
    knots: KnotVector,
    #[serde(skip)]
    homogeneous_points: Vec<Point4<f64>>,
}

impl NurbsCurve {
    /// Unit-weight curve; `None` with fewer than `degree + 1` points
    pub fn clamped(control_points: Vec<Point3<f64>>, degree: usize) -> Option<Self> {
        let weights = vec![1.0; control_points.len()];
        Self::new(control_points, weights, degree)
    }

    /// `None` with too few points or a missing or non-positive weight
    pub fn new(control_points: Vec<Point3<f64>>, weights: Vec<f64>, degree: usize) -> Option<Self> {
        if !valid_weights(&weights, control_points.len()) {
            return None;
        }
        let knots = KnotVector::clamped_uniform(control_points.len(), degree)?;
        let homogeneous_points = homogeneous(&control_points, &weights);

        Some(Self {
            control_points,
            weights,
            knots,
            homogeneous_points,
        })
    }

    pub fn degree(&self) -> usize {
        self.knots.degree()
    }

    pub fn knots(&self) -> &KnotVector {
        &self.knots
    }

    pub fn control_points(&self) -> &[Point3<f64>] {
        &self.control_points
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Point at normalized parameter `t` in `[0, 1]`
    pub fn point_at(&self, t: f64) -> Point3<f64> {
        let (span, basis) = self.knots.evaluate(t);
        let first = span - self.degree();

        let mut h = Point4::new(0.0, 0.0, 0.0, 0.0);
        for (i, b) in basis.iter().enumerate() {
            h.coords += self.homogeneous_points[first + i].coords * *b;
        }
        project(h)
    }

    /// `count` points at evenly spaced parameters, endpoints included
    pub fn sample(&self, count: usize) -> Polyline {
        let points = match count {
            0 => Vec::new(),
            1 => vec![self.point_at(0.0)],
            _ => (0..count)
                .map(|i| self.point_at(i as f64 / (count - 1) as f64))
                .collect(),
        };
        Polyline::new(points)
    }
}

/// Tensor-product rational B-spline surface.
///
/// Control points form a `rows × cols` grid stored row by row; rows follow
/// the `u` direction and columns the `v` direction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NurbsSurface {
    control_points: Vec<Point3<f64>>,
    weights: Vec<f64>,
    rows: usize,
    cols: usize,
    knots_u: KnotVector,
    knots_v: KnotVector,
    #[serde(skip)]
    homogeneous_points: Vec<Point4<f64>>,
}

impl NurbsSurface {
    /// Unit-weight surface over a row-major grid
    pub fn clamped(
        control_points: Vec<Point3<f64>>,
        rows: usize,
        cols: usize,
        degree_u: usize,
        degree_v: usize,
    ) -> Option<Self> {
        let weights = vec![1.0; control_points.len()];
        Self::new(control_points, weights, rows, cols, degree_u, degree_v)
    }

    pub fn new(
        control_points: Vec<Point3<f64>>,
        weights: Vec<f64>,
        rows: usize,
        cols: usize,
        degree_u: usize,
        degree_v: usize,
    ) -> Option<Self> {
        if control_points.len() != rows * cols || !valid_weights(&weights, control_points.len()) {
            return None;
        }
        let knots_u = KnotVector::clamped_uniform(rows, degree_u)?;
        let knots_v = KnotVector::clamped_uniform(cols, degree_v)?;
        let homogeneous_points = homogeneous(&control_points, &weights);

        Some(Self {
            control_points,
            weights,
            rows,
            cols,
            knots_u,
            knots_v,
            homogeneous_points,
        })
    }

    /// Bicubic patch over a 4×4 grid
    pub fn bicubic(control_points: [Point3<f64>; 16]) -> Self {
        let knots = KnotVector {
            knots: vec![0.0, 0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 1.0],
            degree: CUBIC,
        };
        let points = control_points.to_vec();
        let weights = vec![1.0; 16];
        let homogeneous_points = homogeneous(&points, &weights);

        Self {
            control_points: points,
            weights,
            rows: 4,
            cols: 4,
            knots_u: knots.clone(),
            knots_v: knots,
            homogeneous_points,
        }
    }

    pub fn grid_size(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn degrees(&self) -> (usize, usize) {
        (self.knots_u.degree(), self.knots_v.degree())
    }

    pub fn knots_u(&self) -> &KnotVector {
        &self.knots_u
    }

    pub fn knots_v(&self) -> &KnotVector {
        &self.knots_v
    }

    pub fn control_points(&self) -> &[Point3<f64>] {
        &self.control_points
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Point at normalized parameters `(u, v)` in `[0, 1]²`
    pub fn point_at(&self, u: f64, v: f64) -> Point3<f64> {
        let (span_u, basis_u) = self.knots_u.evaluate(u);
        let (span_v, basis_v) = self.knots_v.evaluate(v);
        let first_u = span_u - self.knots_u.degree();
        let first_v = span_v - self.knots_v.degree();

        let mut h = Point4::new(0.0, 0.0, 0.0, 0.0);
        for (i, bu) in basis_u.iter().enumerate() {
            let row = (first_u + i) * self.cols;
            for (j, bv) in basis_v.iter().enumerate() {
                h.coords += self.homogeneous_points[row + first_v + j].coords * (bu * bv);
            }
        }
        project(h)
    }

    /// Sample on a `resolution × resolution` parameter grid and triangulate.
    ///
    /// Vertex `(i, j)` sits at index `i * resolution + j`; each grid cell
    /// becomes two triangles. Resolutions below 2 are raised to 2.
    pub fn tessellate(&self, resolution: usize) -> Mesh {
        let res = resolution.max(2);
        let step = 1.0 / (res - 1) as f64;

        let mut vertices = Vec::with_capacity(res * res);
        for i in 0..res {
            for j in 0..res {
                vertices.push(Vertex::at(self.point_at(i as f64 * step, j as f64 * step)));
            }
        }

        let mut triangles = Vec::with_capacity(2 * (res - 1) * (res - 1));
        for i in 0..res - 1 {
            for j in 0..res - 1 {
                let a = i * res + j;
                let b = a + 1;
                let c = a + res;
                let d = c + 1;
                triangles.push(Triangle::new([a, c, b]));
                triangles.push(Triangle::new([b, c, d]));
            }
        }

        Mesh::from_parts(vertices, Some(triangles))
    }
}
