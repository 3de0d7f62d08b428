// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Renderable polyline

use super::BoundingBox;
use nalgebra::Point3;
use serde::{Deserialize, Serialize};

/// Open polyline through sampled curve points
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Polyline {
    pub points: Vec<Point3<f64>>,
}

impl Polyline {
    pub fn new(points: Vec<Point3<f64>>) -> Self {
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Sum of segment lengths
    pub fn length(&self) -> f64 {
        self.points.windows(2).map(|w| (w[1] - w[0]).norm()).sum()
    }

    pub fn bounds(&self) -> BoundingBox {
        BoundingBox::from_points(&self.points)
    }

    /// Segment endpoint pairs, as a line-list index buffer
    pub fn segment_indices(&self) -> Vec<[usize; 2]> {
        (1..self.points.len()).map(|i| [i - 1, i]).collect()
    }
}
