use core::f64;

use nalgebra::geometry::Point2;
use nalgebra::Vector2;

use crate::JigsawError;

/// Number of straight segments used to approximate a full turn
pub const SEGMENTS_PER_TURN: f64 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineSegment {
    pub start: Point2<f64>,
    pub end: Point2<f64>,
}

impl LineSegment {
    pub fn new(start: Point2<f64>, end: Point2<f64>) -> Self {
        LineSegment { start, end }
    }

    pub fn length(&self) -> f64 {
        (self.end - self.start).norm()
    }

    /// Unit vector pointing from `start` to `end`
    pub fn direction(&self) -> Result<Vector2<f64>, JigsawError> {
        unit(&(self.end - self.start)).map_err(|_| JigsawError::DegenerateEdge {
            start: (self.start.x, self.start.y),
            end: (self.end.x, self.end.y),
        })
    }

    pub fn points(&self) -> Vec<Point2<f64>> {
        vec![self.start, self.end]
    }
}

/// Normalize `v`, refusing zero-length vectors instead of producing NaNs
pub fn unit(v: &Vector2<f64>) -> Result<Vector2<f64>, JigsawError> {
    let len = v.norm();
    if len == 0.0 || !len.is_finite() {
        return Err(JigsawError::DegenerateEdge {
            start: (0.0, 0.0),
            end: (v.x, v.y),
        });
    }
    Ok(v / len)
}

/// `v` rotated 90 degrees counter-clockwise. Callers flip the side with a sign multiplier.
pub fn reciprocal(v: &Vector2<f64>) -> Vector2<f64> {
    Vector2::new(-v.y, v.x)
}

/// Orthonormal basis an arc is measured in. Angle 0 is all `v`, a quarter turn is all `n`.
#[derive(Debug, Clone, Copy)]
pub struct ArcFrame {
    pub v: Vector2<f64>,
    pub n: Vector2<f64>,
}

impl ArcFrame {
    pub fn new(v: Vector2<f64>, n: Vector2<f64>) -> Self {
        ArcFrame { v, n }
    }

    /// The same frame with the tangent direction reversed, for mirrored arcs
    pub fn mirrored(&self) -> Self {
        ArcFrame {
            v: -self.v,
            n: self.n,
        }
    }

    pub fn at(&self, center: &Point2<f64>, radius: f64, angle: f64) -> Point2<f64> {
        center + self.v * (angle.cos() * radius) + self.n * (angle.sin() * radius)
    }
}

/// How many segments to use for an arc spanning `span` radians (sign ignored). Never less than one.
pub fn segment_count(span: f64) -> usize {
    let count = (SEGMENTS_PER_TURN * (span.abs() / f64::consts::TAU)).ceil() as usize;
    count.max(1)
}

/// Append a polyline approximation of an arc to `points`. Both endpoints are included,
/// so `segment_count + 1` points are pushed. `end_angle` may be less than `start_angle`.
pub fn append_arc(
    points: &mut Vec<Point2<f64>>,
    frame: &ArcFrame,
    center: &Point2<f64>,
    radius: f64,
    start_angle: f64,
    end_angle: f64,
) {
    let span = end_angle - start_angle;
    let segments = segment_count(span);
    points.reserve(segments + 1);
    for i in 0..=segments {
        let theta = start_angle + span * i as f64 / segments as f64;
        points.push(frame.at(center, radius, theta));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::geometry::Point2;

    const EPSILON: f64 = 1e-10;

    fn points_equal(p1: Point2<f64>, p2: Point2<f64>) -> bool {
        (p1 - p2).norm() < EPSILON
    }

    fn xy_frame() -> ArcFrame {
        ArcFrame::new(Vector2::new(1.0, 0.0), Vector2::new(0.0, 1.0))
    }

    #[test]
    fn test_reciprocal_is_counter_clockwise() {
        let r = reciprocal(&Vector2::new(1.0, 0.0));
        assert_eq!(r, Vector2::new(0.0, 1.0));
        let r = reciprocal(&Vector2::new(0.0, 1.0));
        assert_eq!(r, Vector2::new(-1.0, 0.0));
    }

    #[test]
    fn test_unit_vector() {
        let u = unit(&Vector2::new(3.0, 4.0)).unwrap();
        assert!((u.norm() - 1.0).abs() < EPSILON);
        assert!((u.x - 0.6).abs() < EPSILON);
        assert!((u.y - 0.8).abs() < EPSILON);
    }

    #[test]
    fn test_unit_of_zero_vector_fails() {
        let result = unit(&Vector2::new(0.0, 0.0));
        assert!(matches!(result, Err(JigsawError::DegenerateEdge { .. })));
    }

    #[test]
    fn test_segment_direction_reports_endpoints() {
        let seg = LineSegment::new(Point2::new(2.0, 3.0), Point2::new(2.0, 3.0));
        match seg.direction() {
            Err(JigsawError::DegenerateEdge { start, end }) => {
                assert_eq!(start, (2.0, 3.0));
                assert_eq!(end, (2.0, 3.0));
            }
            other => panic!("Expected degenerate edge, got {:?}", other),
        }
    }

    #[test]
    fn test_full_circle_has_21_points() {
        let mut points = Vec::new();
        append_arc(
            &mut points,
            &xy_frame(),
            &Point2::new(0.0, 0.0),
            1.0,
            0.0,
            f64::consts::TAU,
        );
        assert_eq!(points.len(), 21);
        // Closed loop
        assert!(points_equal(points[0], points[20]));
        assert!(points_equal(points[5], Point2::new(0.0, 1.0)));
    }

    #[test]
    fn test_zero_span_is_a_single_location() {
        let mut points = Vec::new();
        append_arc(
            &mut points,
            &xy_frame(),
            &Point2::new(1.0, 1.0),
            2.0,
            0.5,
            0.5,
        );
        assert_eq!(points.len(), 2);
        assert_eq!(points[0], points[1]);
    }

    #[test]
    fn test_partial_span_rounds_up() {
        // A quarter turn is exactly 5 segments, a hair more needs 6
        assert_eq!(segment_count(f64::consts::TAU / 4.0), 5);
        assert_eq!(segment_count(f64::consts::TAU / 4.0 + 0.01), 6);
        assert_eq!(segment_count(-f64::consts::TAU / 4.0), 5);
        assert_eq!(segment_count(0.001), 1);
    }

    #[test]
    fn test_negative_span_runs_clockwise() {
        let mut points = Vec::new();
        append_arc(
            &mut points,
            &xy_frame(),
            &Point2::new(0.0, 0.0),
            1.0,
            0.0,
            -f64::consts::FRAC_PI_2,
        );
        assert_eq!(points.len(), 6);
        assert!(points_equal(points[0], Point2::new(1.0, 0.0)));
        assert!(points_equal(points[5], Point2::new(0.0, -1.0)));
        // Second point is below the x axis
        assert!(points[1].y < 0.0);
    }

    #[test]
    fn test_arc_appends_without_clearing() {
        let mut points = vec![Point2::new(9.0, 9.0)];
        append_arc(
            &mut points,
            &xy_frame(),
            &Point2::new(0.0, 0.0),
            1.0,
            0.0,
            f64::consts::PI,
        );
        assert_eq!(points.len(), 12);
        assert_eq!(points[0], Point2::new(9.0, 9.0));
    }

    #[test]
    fn test_mirrored_frame() {
        let frame = xy_frame().mirrored();
        let p = frame.at(&Point2::new(0.0, 0.0), 2.0, 0.0);
        assert!(points_equal(p, Point2::new(-2.0, 0.0)));
        let p = frame.at(&Point2::new(0.0, 0.0), 2.0, f64::consts::FRAC_PI_2);
        assert!(points_equal(p, Point2::new(0.0, 2.0)));
    }
}
