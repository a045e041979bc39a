//! Per-trajectory derived data: arc length, plate crossing, plate marker.

use serde::{Deserialize, Serialize};

use crate::physics::constants::config::MARKER_SEGMENTS;
use crate::physics::Point3;
use crate::simulator::{SimParams, StopReason};

/// One integrated pitch path and what is derived from it.
///
/// Replaced wholesale on rebuild; never edited in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trajectory {
    pub points: Vec<Point3>,
    /// Cumulative path length (m), same length as `points`
    pub arc_length: Vec<f32>,
    pub plate_crossing: Option<Point3>,
    pub marker: Option<PlateMarker>,
    pub step_s: f64,
    pub stop_reason: StopReason,
}

impl Trajectory {
    pub fn from_points(points: Vec<Point3>, params: &SimParams, stop_reason: StopReason) -> Self {
        let arc_length = cumulative_arc_length(&points);
        let plate_crossing = plate_crossing(&points, params.plate_distance_m);
        let marker = plate_crossing
            .map(|c| PlateMarker::disc(c, params.radius_m() as f32, MARKER_SEGMENTS));

        Self {
            points,
            arc_length,
            plate_crossing,
            marker,
            step_s: params.step_s,
            stop_reason,
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// `(len - 1) * step`, 0 below two points
    pub fn duration_s(&self) -> f64 {
        if self.points.len() < 2 {
            0.0
        } else {
            (self.points.len() - 1) as f64 * self.step_s
        }
    }

    pub fn total_length_m(&self) -> f32 {
        self.arc_length.last().copied().unwrap_or(0.0)
    }

    pub fn endpoint(&self) -> Option<Point3> {
        self.points.last().copied()
    }
}

/// Running sum of segment lengths; first entry is 0.
pub fn cumulative_arc_length(points: &[Point3]) -> Vec<f32> {
    let mut out = Vec::with_capacity(points.len());
    let mut total = 0.0f32;
    for (i, p) in points.iter().enumerate() {
        if i > 0 {
            total += points[i - 1].distance_to(p);
        }
        out.push(total);
    }
    out
}

/// Where the path first crosses `x = plate_distance_m`.
///
/// Located by sign change of `x - plate` between consecutive points and
/// linearly interpolated. `None` if the path never crosses.
pub fn plate_crossing(points: &[Point3], plate_distance_m: f64) -> Option<Point3> {
    let plate = plate_distance_m as f32;

    points.windows(2).find_map(|w| {
        let da = w[0].x - plate;
        let db = w[1].x - plate;
        if da < 0.0 && db >= 0.0 {
            let t = da / (da - db);
            Some(w[0].lerp(&w[1], t))
        } else {
            None
        }
    })
}

/// Flat disc in the plate (YZ) plane, triangulated as a fan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlateMarker {
    pub center: Point3,
    pub radius_m: f32,
    /// `vertices[0]` is the center, the rest is the rim
    pub vertices: Vec<Point3>,
    pub triangles: Vec<[u32; 3]>,
}

impl PlateMarker {
    pub fn disc(center: Point3, radius_m: f32, segments: usize) -> Self {
        let segments = segments.max(3);
        let mut vertices = Vec::with_capacity(segments + 1);
        vertices.push(center);

        for k in 0..segments {
            let a = std::f32::consts::TAU * k as f32 / segments as f32;
            vertices.push(Point3::new(
                center.x,
                center.y + radius_m * a.sin(),
                center.z + radius_m * a.cos(),
            ));
        }

        let triangles = (0..segments)
            .map(|k| {
                let a = 1 + k as u32;
                let b = 1 + ((k + 1) % segments) as u32;
                [0, a, b]
            })
            .collect();

        Self {
            center,
            radius_m,
            vertices,
            triangles,
        }
    }
}
