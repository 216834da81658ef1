//! Piecewise cubic Bezier trajectories for foe movement
//!
//! A trajectory is walked by distance, not by curve parameter. Each segment
//! keeps an arc-length table (a dense chord polyline of the curve) so a foe
//! moving at constant speed covers equal path length every tic.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::SEGMENT_SAMPLES;
use crate::error::LevelError;

/// One cubic Bezier segment
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[Vec2; 4]", into = "[Vec2; 4]")]
pub struct PathSegment {
    pub p0: Vec2,
    pub p1: Vec2,
    pub p2: Vec2,
    pub p3: Vec2,
}

impl PathSegment {
    pub const fn new(p0: Vec2, p1: Vec2, p2: Vec2, p3: Vec2) -> Self {
        Self { p0, p1, p2, p3 }
    }

    /// Evaluate the curve at parameter `t` in [0, 1]
    #[inline]
    pub fn point(&self, t: f32) -> Vec2 {
        let mt = 1.0 - t;
        self.p0 * (mt * mt * mt)
            + self.p1 * (3.0 * mt * mt * t)
            + self.p2 * (3.0 * mt * t * t)
            + self.p3 * (t * t * t)
    }
}

impl From<[Vec2; 4]> for PathSegment {
    fn from([p0, p1, p2, p3]: [Vec2; 4]) -> Self {
        Self::new(p0, p1, p2, p3)
    }
}

impl From<PathSegment> for [Vec2; 4] {
    fn from(segment: PathSegment) -> Self {
        [segment.p0, segment.p1, segment.p2, segment.p3]
    }
}

/// Cumulative chord lengths of one segment, sampled at evenly spaced `t`
#[derive(Debug, Clone)]
struct ArcTable {
    points: Vec<Vec2>,
    /// `lengths[i]` is the path length from the segment start to `points[i]`
    lengths: Vec<f32>,
}

impl ArcTable {
    fn new(segment: &PathSegment, samples: usize) -> Self {
        let mut points: Vec<Vec2> = Vec::with_capacity(samples + 1);
        let mut lengths = Vec::with_capacity(samples + 1);
        let mut total = 0.0;

        for i in 0..=samples {
            let point = segment.point(i as f32 / samples as f32);
            if let Some(prev) = points.last() {
                total += (point - *prev).length();
            }
            points.push(point);
            lengths.push(total);
        }

        Self { points, lengths }
    }

    #[inline]
    fn length(&self) -> f32 {
        self.lengths[self.lengths.len() - 1]
    }

    fn point_at(&self, distance: f32) -> Vec2 {
        let distance = distance.max(0.0);
        // First sample strictly beyond `distance`; lengths[0] == 0 so i >= 1
        let i = self.lengths.partition_point(|&l| l <= distance);
        if i >= self.lengths.len() {
            return self.points[self.points.len() - 1];
        }

        let (l0, l1) = (self.lengths[i - 1], self.lengths[i]);
        let t = (distance - l0) / (l1 - l0);
        self.points[i - 1].lerp(self.points[i], t)
    }
}

/// An ordered, non-empty sequence of path segments walked end to end
#[derive(Debug, Clone)]
pub struct Trajectory {
    path: Vec<PathSegment>,
    tables: Vec<ArcTable>,
    length: f32,
}

impl Trajectory {
    /// Build a trajectory, precomputing segment arc lengths.
    ///
    /// Fails with [`LevelError::EmptyTrajectory`] (index 0; callers loading a
    /// level rewrite the index) if `path` is empty.
    pub fn new(path: Vec<PathSegment>) -> Result<Self, LevelError> {
        if path.is_empty() {
            return Err(LevelError::EmptyTrajectory { trajectory: 0 });
        }

        let tables: Vec<ArcTable> = path
            .iter()
            .map(|segment| ArcTable::new(segment, SEGMENT_SAMPLES))
            .collect();
        let length = tables.iter().map(ArcTable::length).sum();

        Ok(Self {
            path,
            tables,
            length,
        })
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.path
    }

    /// Total path length (sum of per-segment approximations)
    #[inline]
    pub fn length(&self) -> f32 {
        self.length
    }

    /// Length of segment `index` alone
    pub fn segment_length(&self, index: usize) -> Option<f32> {
        self.tables.get(index).map(ArcTable::length)
    }

    /// Resolve a distance to `(segment index, distance into that segment)`.
    ///
    /// Distances are clamped to `[0, length]`; NaN counts as 0. A distance
    /// landing exactly on a segment boundary belongs to the later segment.
    pub fn locate(&self, distance: f32) -> (usize, f32) {
        let mut remaining = if distance > 0.0 {
            distance.min(self.length)
        } else {
            0.0
        };

        let last = self.tables.len() - 1;
        for (index, table) in self.tables[..last].iter().enumerate() {
            if remaining < table.length() {
                return (index, remaining);
            }
            remaining -= table.length();
        }
        (last, remaining)
    }

    /// Point reached after travelling `distance` from the start of the path
    pub fn point_at(&self, distance: f32) -> Vec2 {
        let (index, local) = self.locate(distance);
        self.tables[index].point_at(local)
    }

    /// Sample `num_points` points evenly spaced by distance (for debug drawing)
    pub fn sample_polyline(&self, num_points: usize) -> Vec<Vec2> {
        (0..num_points)
            .map(|i| {
                let t = i as f32 / (num_points - 1).max(1) as f32;
                self.point_at(t * self.length)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    /// Straight segment whose samples are exact in binary floating point
    fn exact_line(from: Vec2, to: Vec2) -> PathSegment {
        let step = (to - from) / 3.0;
        PathSegment::new(from, from + step, from + 2.0 * step, to)
    }

    #[test]
    fn test_straight_segment_length_and_points() {
        let trajectory = Trajectory::new(vec![exact_line(Vec2::ZERO, Vec2::new(96.0, 0.0))]).unwrap();
        assert_eq!(trajectory.length(), 96.0);
        assert_eq!(trajectory.point_at(0.0), Vec2::ZERO);
        assert_eq!(trajectory.point_at(48.0), Vec2::new(48.0, 0.0));
        assert_eq!(trajectory.point_at(96.0), Vec2::new(96.0, 0.0));
    }

    #[test]
    fn test_empty_path_rejected() {
        assert!(matches!(
            Trajectory::new(Vec::new()),
            Err(LevelError::EmptyTrajectory { .. })
        ));
    }

    #[test]
    fn test_boundary_resolves_to_later_segment() {
        let trajectory = Trajectory::new(vec![
            exact_line(Vec2::ZERO, Vec2::new(96.0, 0.0)),
            exact_line(Vec2::new(96.0, 0.0), Vec2::new(96.0, 96.0)),
        ])
        .unwrap();

        assert_eq!(trajectory.length(), 192.0);
        assert_eq!(trajectory.segment_length(1), Some(96.0));
        assert_eq!(trajectory.segment_length(2), None);
        assert_eq!(trajectory.locate(96.0), (1, 0.0));
        assert_eq!(trajectory.locate(95.0), (0, 95.0));
        assert_eq!(trajectory.point_at(96.0), Vec2::new(96.0, 0.0));
        assert_eq!(trajectory.point_at(144.0), Vec2::new(96.0, 48.0));
    }

    #[test]
    fn test_out_of_range_distances_clamp() {
        let trajectory = Trajectory::new(vec![
            exact_line(Vec2::ZERO, Vec2::new(96.0, 0.0)),
            exact_line(Vec2::new(96.0, 0.0), Vec2::new(96.0, 96.0)),
        ])
        .unwrap();

        assert_eq!(trajectory.point_at(-10.0), Vec2::ZERO);
        assert_eq!(trajectory.point_at(f32::NAN), Vec2::ZERO);
        assert_eq!(trajectory.point_at(1000.0), Vec2::new(96.0, 96.0));
        assert_eq!(trajectory.locate(1000.0), (1, 96.0));
    }

    #[test]
    fn test_curve_length_exceeds_chord() {
        // Quarter-circle-ish arc from (0,0) to (100,100)
        let segment = PathSegment::new(
            Vec2::ZERO,
            Vec2::new(55.0, 0.0),
            Vec2::new(100.0, 45.0),
            Vec2::new(100.0, 100.0),
        );
        let trajectory = Trajectory::new(vec![segment]).unwrap();
        let chord = Vec2::new(100.0, 100.0).length();
        assert!(trajectory.length() > chord);
        // Quarter circle of radius 100 is ~157.08
        assert!((trajectory.length() - 157.0).abs() < 2.0);
    }

    #[test]
    fn test_degenerate_segment() {
        let p = Vec2::new(10.0, 20.0);
        let trajectory = Trajectory::new(vec![PathSegment::new(p, p, p, p)]).unwrap();
        assert_eq!(trajectory.length(), 0.0);
        assert_eq!(trajectory.point_at(0.0), p);
        assert_eq!(trajectory.point_at(5.0), p);
    }

    #[test]
    fn test_sample_polyline_endpoints() {
        let trajectory = Trajectory::new(vec![exact_line(Vec2::ZERO, Vec2::new(96.0, 0.0))]).unwrap();
        let points = trajectory.sample_polyline(100);
        assert_eq!(points.len(), 100);
        assert_eq!(points[0], Vec2::ZERO);
        assert_eq!(points[99], Vec2::new(96.0, 0.0));
    }

    #[test]
    fn test_segment_serde_as_point_array() {
        let segment: PathSegment =
            serde_json::from_str("[[0, 0], [1, 2], [3, 4], [5, 6]]").unwrap();
        assert_eq!(segment.p1, Vec2::new(1.0, 2.0));
        assert_eq!(segment.p3, Vec2::new(5.0, 6.0));
    }

    fn arb_point() -> impl Strategy<Value = Vec2> {
        (-200.0f32..200.0, -200.0f32..200.0).prop_map(|(x, y)| Vec2::new(x, y))
    }

    /// Connected path: every segment starts where the previous one ends
    fn arb_path() -> impl Strategy<Value = Vec<PathSegment>> {
        (
            arb_point(),
            prop::collection::vec((arb_point(), arb_point(), arb_point()), 1..4),
        )
            .prop_map(|(start, controls)| {
                let mut p0 = start;
                controls
                    .into_iter()
                    .map(|(p1, p2, p3)| {
                        let segment = PathSegment::new(p0, p1, p2, p3);
                        p0 = p3;
                        segment
                    })
                    .collect()
            })
    }

    proptest! {
        #[test]
        fn prop_chord_never_exceeds_travelled_distance(
            path in arb_path(),
            a in 0.0f32..=1.0,
            b in 0.0f32..=1.0,
        ) {
            let trajectory = Trajectory::new(path).unwrap();
            let length = trajectory.length();
            prop_assert!(length >= 0.0);

            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            let (d1, d2) = (lo * length, hi * length);
            let chord = (trajectory.point_at(d2) - trajectory.point_at(d1)).length();
            let tolerance = 1e-3 * (1.0 + length);
            prop_assert!(chord <= (d2 - d1) + tolerance, "chord {} > travelled {}", chord, d2 - d1);
        }

        #[test]
        fn prop_straight_path_chord_equals_distance(
            from in arb_point(),
            to in arb_point(),
            a in 0.0f32..=1.0,
            b in 0.0f32..=1.0,
        ) {
            let trajectory = Trajectory::new(vec![exact_line(from, to)]).unwrap();
            let length = trajectory.length();
            let (d1, d2) = (a.min(b) * length, a.max(b) * length);
            let chord = (trajectory.point_at(d2) - trajectory.point_at(d1)).length();
            prop_assert!((chord - (d2 - d1)).abs() <= 1e-3 * (1.0 + length));
        }
    }
}
