//! Knob (tab and blank) curves for the internal edges of a puzzle.
//!
//! A knob is built from three mutually tangent circles: two small ones sitting on the edge
//! at either side of the knob base, and one large one further out that forms the bulge.
//! See http://www.teamten.com/lawrence/projects/jigsaw-puzzle-on-laser-cutter/ for a drawing.
use core::f64;

use nalgebra::geometry::Point2;
use nalgebra::Vector2;
use rand::Rng;

use crate::geometry::{append_arc, reciprocal, ArcFrame, LineSegment};
use crate::JigsawError;

/// Range the knob base center is placed in, as a fraction of the edge from `start`
pub const MID_FRACTION_MIN: f64 = 0.4;
pub const MID_FRACTION_SPREAD: f64 = 0.2;

/// Range of the small circle radius, as a fraction of the edge length
pub const RADIUS_FRACTION_MIN: f64 = 0.05;
pub const RADIUS_FRACTION_SPREAD: f64 = 0.01;

/// Half the width of the knob base, as a fraction of the edge length
pub const KNOB_HALF_WIDTH: f64 = 0.1;

/// Large circle radius relative to the small ones
pub const LARGE_RADIUS_RATIO: f64 = 1.8;

/// The random draws that shape a single knob. Drawn once per edge, so every piece
/// bordering the edge gets exactly the same curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KnobChoice {
    /// Where along the edge the knob sits, from `start`
    pub mid_fraction: f64,
    /// Which side of the edge the knob bulges toward: +1 is the counter-clockwise side
    pub direction: f64,
    /// Small circle radius, as a fraction of the edge length
    pub radius_fraction: f64,
}

impl KnobChoice {
    /// Draw a choice from `rng`. Always consumes three draws, in the order
    /// mid fraction, direction, radius.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mid_fraction = MID_FRACTION_MIN + rng.random::<f64>() * MID_FRACTION_SPREAD;
        let direction = if rng.random_bool(0.5) { 1.0 } else { -1.0 };
        let radius_fraction = RADIUS_FRACTION_MIN + rng.random::<f64>() * RADIUS_FRACTION_SPREAD;
        KnobChoice {
            mid_fraction,
            direction,
            radius_fraction,
        }
    }

    /// A knob dead in the middle of the edge, on the counter-clockwise side, with a mid-range radius
    pub fn centered() -> Self {
        KnobChoice {
            mid_fraction: 0.5,
            direction: 1.0,
            radius_fraction: RADIUS_FRACTION_MIN + RADIUS_FRACTION_SPREAD / 2.0,
        }
    }

    /// The choice that draws the same physical knob when the edge is walked from `end` to `start`
    pub fn reversed(&self) -> Self {
        KnobChoice {
            mid_fraction: 1.0 - self.mid_fraction,
            direction: -self.direction,
            radius_fraction: self.radius_fraction,
        }
    }

    fn validate(&self) -> Result<(), JigsawError> {
        if self.direction != 1.0 && self.direction != -1.0 {
            return Err(JigsawError::InvalidConfiguration(format!(
                "knob direction must be 1 or -1, got {}",
                self.direction
            )));
        }
        if !self.mid_fraction.is_finite() {
            return Err(JigsawError::InvalidConfiguration(format!(
                "knob position {} is not finite",
                self.mid_fraction
            )));
        }
        if !self.radius_fraction.is_finite() || self.radius_fraction <= 0.0 {
            return Err(JigsawError::InvalidConfiguration(format!(
                "knob radius fraction must be positive, got {}",
                self.radius_fraction
            )));
        }
        Ok(())
    }
}

/// The construction behind a knob curve, kept so callers can check it
#[derive(Debug, Clone, Copy)]
pub struct KnobGeometry {
    /// Unit vector along the edge
    pub v: Vector2<f64>,
    /// Unit normal pointing to the side the knob bulges toward
    pub n: Vector2<f64>,
    pub mid: Point2<f64>,
    pub knob_start: Point2<f64>,
    pub knob_end: Point2<f64>,
    pub small_radius: f64,
    pub large_radius: f64,
    /// Centers of the small circles, at the `knob_start` and `knob_end` sides
    pub small_centers: [Point2<f64>; 2],
    pub large_center: Point2<f64>,
}

#[derive(Debug, Clone)]
pub struct KnobCurve {
    /// The whole edge, from `start` to `end`, with the knob in the middle
    pub points: Vec<Point2<f64>>,
    pub geometry: KnobGeometry,
}

/// Build the knob curve for the edge from `start` to `end`. This is the entire side of a
/// piece, so a square piece is made from four of these laid corner to corner.
pub fn make_knob(
    start: Point2<f64>,
    end: Point2<f64>,
    choice: &KnobChoice,
) -> Result<KnobCurve, JigsawError> {
    choice.validate()?;
    let edge = LineSegment::new(start, end);
    let line_length = edge.length();
    let v = edge.direction()?;

    let mid = start + (end - start) * choice.mid_fraction;
    let n = reciprocal(&v) * choice.direction;

    let knob_start = mid - v * (line_length * KNOB_HALF_WIDTH);
    let knob_end = mid + v * (line_length * KNOB_HALF_WIDTH);

    let small_radius = line_length * choice.radius_fraction;
    let large_radius = small_radius * LARGE_RADIUS_RATIO;

    // The centers of one small circle and the large circle, plus the knob middle, form a
    // right triangle. The hypotenuse joins the two tangent centers.
    let tri_base = (knob_end - knob_start).norm() / 2.0;
    let tri_hyp = small_radius + large_radius;
    let radicand = tri_hyp * tri_hyp - tri_base * tri_base;
    if !(radicand >= 0.0) {
        return Err(JigsawError::Domain {
            hypotenuse: tri_hyp,
            base: tri_base,
        });
    }
    let tri_height = radicand.sqrt();
    let large_center_distance = small_radius + tri_height;

    let small_start_angle = -f64::consts::TAU / 4.0;
    let small_end_angle = (tri_height / tri_hyp).asin();
    let large_slice_angle = (tri_base / tri_hyp).asin();
    let large_start_angle = f64::consts::TAU * 3.0 / 4.0 - large_slice_angle;
    let large_end_angle = -f64::consts::TAU / 4.0 + large_slice_angle;

    let frame = ArcFrame::new(v, n);
    let small_centers = [knob_start + n * small_radius, knob_end + n * small_radius];
    let large_center = mid + n * large_center_distance;

    let mut points = vec![start, knob_start];
    append_arc(
        &mut points,
        &frame,
        &small_centers[0],
        small_radius,
        small_start_angle,
        small_end_angle,
    );
    append_arc(
        &mut points,
        &frame,
        &large_center,
        large_radius,
        large_start_angle,
        large_end_angle,
    );
    // Mirror image of the first small arc, walked backwards
    append_arc(
        &mut points,
        &frame.mirrored(),
        &small_centers[1],
        small_radius,
        small_end_angle,
        small_start_angle,
    );
    points.push(knob_end);
    points.push(end);

    Ok(KnobCurve {
        points,
        geometry: KnobGeometry {
            v,
            n,
            mid,
            knob_start,
            knob_end,
            small_radius,
            large_radius,
            small_centers,
            large_center,
        },
    })
}
