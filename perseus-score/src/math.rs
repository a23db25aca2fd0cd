//! Numeric and geometric helpers shared by the scorers.
//!
//! All comparisons are tolerant: two values are equal when they are
//! identical or differ by strictly less than the tolerance.

use std::f64::consts::PI;

use crate::types::Coord;

/// Default absolute tolerance for numeric and coordinate comparisons.
pub const DEFAULT_TOLERANCE: f64 = 1e-9;

/// Tolerant equality: `a == b` or `|a - b| < tolerance`.
///
/// The tolerance is absolute; it does not scale with the magnitude of the
/// values. Rubrics that need a wider margin set it through `maxError`.
pub fn approx_equal(a: f64, b: f64, tolerance: f64) -> bool {
    a == b || (a - b).abs() < tolerance
}

/// [`approx_equal`] with [`DEFAULT_TOLERANCE`].
pub fn approx_eq(a: f64, b: f64) -> bool {
    approx_equal(a, b, DEFAULT_TOLERANCE)
}

/// Componentwise tolerant equality of two points.
pub fn points_equal(a: &Coord, b: &Coord) -> bool {
    approx_eq(a[0], b[0]) && approx_eq(a[1], b[1])
}

/// Tolerant equality of two point lists, position by position.
pub fn coords_equal(a: &[Coord], b: &[Coord]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(p, q)| points_equal(p, q))
}

/// Whether every item of `a` pairs off with a distinct item of `b` under `eq`.
///
/// Each item of `a` claims the first unclaimed item of `b` it equals.
pub fn unordered_match<T>(a: &[T], b: &[T], eq: impl Fn(&T, &T) -> bool) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut claimed = vec![false; b.len()];
    a.iter().all(|item| {
        let found = b
            .iter()
            .enumerate()
            .position(|(index, other)| !claimed[index] && eq(item, other));
        match found {
            Some(index) => {
                claimed[index] = true;
                true
            }
            None => false,
        }
    })
}

/// Tolerant equality of two point lists regardless of order.
pub fn coord_sets_equal(a: &[Coord], b: &[Coord]) -> bool {
    unordered_match(a, b, points_equal)
}

/// Whether `p3` lies on the line through `p1` and `p2`.
pub fn collinear(p1: &Coord, p2: &Coord, p3: &Coord) -> bool {
    approx_eq(
        (p1[1] - p2[1]) * (p1[0] - p3[0]),
        (p1[1] - p3[1]) * (p1[0] - p2[0]),
    )
}

fn length(v: &Coord) -> f64 {
    (v[0] * v[0] + v[1] * v[1]).sqrt()
}

fn subtract(a: &Coord, b: &Coord) -> Coord {
    [a[0] - b[0], a[1] - b[1]]
}

/// Whether two vectors point the same way. A zero vector is codirectional
/// with everything.
pub fn codirectional(v1: &Coord, v2: &Coord) -> bool {
    let (len1, len2) = (length(v1), length(v2));
    if approx_eq(len1, 0.0) || approx_eq(len2, 0.0) {
        return true;
    }
    let unit1 = [v1[0] / len1, v1[1] / len1];
    let unit2 = [v2[0] / len2, v2[1] / len2];
    points_equal(&unit1, &unit2)
}

/// Whether the polygon traced by `points` winds clockwise.
pub fn is_clockwise(points: &[Coord]) -> bool {
    let n = points.len();
    let sum: f64 = (0..n)
        .map(|i| {
            let p1 = points[i];
            let p2 = points[(i + 1) % n];
            (p2[0] - p1[0]) * (p2[1] + p1[1])
        })
        .sum();
    sum > 0.0
}

/// Polar angle of `point` around `origin`, in degrees within `[0, 360)`.
pub fn polar_angle(point: &Coord, origin: &Coord) -> f64 {
    let x = point[0] - origin[0];
    let y = point[1] - origin[1];
    if x == 0.0 && y == 0.0 {
        return 0.0;
    }
    (180.0 + (-y).atan2(-x).to_degrees() + 360.0) % 360.0
}

/// Signed angle in degrees from the `point2` arm to the `point1` arm at `vertex`.
pub fn find_angle(point1: &Coord, point2: &Coord, vertex: &Coord) -> f64 {
    polar_angle(point1, vertex) - polar_angle(point2, vertex)
}

/// Measure in degrees of the angle `[arm, vertex, arm]`, swept
/// counterclockwise from the first arm to the second.
///
/// Without reflex angles, arms given in clockwise order are swapped first so
/// the measure never exceeds 180.
pub fn angle_measure(coords: &[Coord; 3], allow_reflex: bool) -> f64 {
    let are_clockwise = is_clockwise(&[coords[0], coords[2], coords[1]]);
    let mut ordered = *coords;
    if are_clockwise && !allow_reflex {
        ordered.reverse();
    }
    let angle = find_angle(&ordered[2], &ordered[0], &ordered[1]);
    if angle < 0.0 {
        angle + 360.0
    } else {
        angle
    }
}

/// Coefficients `[a, b, c]` of the parabola through three points, or `None`
/// when two points share an x coordinate.
pub fn quadratic_coefficients(coords: &[Coord; 3]) -> Option<[f64; 3]> {
    let [p1, p2, p3] = coords;
    let denom = (p1[0] - p2[0]) * (p1[0] - p3[0]) * (p2[0] - p3[0]);
    if denom == 0.0 {
        return None;
    }
    let a = (p3[0] * (p2[1] - p1[1]) + p2[0] * (p1[1] - p3[1]) + p1[0] * (p3[1] - p2[1])) / denom;
    let b = (p3[0] * p3[0] * (p1[1] - p2[1])
        + p2[0] * p2[0] * (p3[1] - p1[1])
        + p1[0] * p1[0] * (p2[1] - p3[1]))
        / denom;
    let c = (p2[0] * p3[0] * (p2[0] - p3[0]) * p1[1]
        + p3[0] * p1[0] * (p3[0] - p1[0]) * p2[1]
        + p1[0] * p2[0] * (p1[0] - p2[0]) * p3[1])
        / denom;
    Some([a, b, c])
}

/// Coefficients `[amplitude, angular frequency, phase, vertical offset]` of
/// the sine curve with a root at `coords[0]` and first peak at `coords[1]`.
pub fn sinusoid_coefficients(coords: &[Coord; 2]) -> Option<[f64; 4]> {
    let [p1, p2] = coords;
    if p2[0] == p1[0] {
        return None;
    }
    let amplitude = p2[1] - p1[1];
    let angular_frequency = PI / (2.0 * (p2[0] - p1[0]));
    let phase = p1[0] * angular_frequency;
    let vertical_offset = p1[1];
    Some([amplitude, angular_frequency, phase, vertical_offset])
}

/// Rewrite `a·sin(b·x - c) + d` so that `a > 0`, `b > 0` and `c` lies in
/// `[0, 2π)`. Equal curves then have equal coefficients.
pub fn canonical_sine_coefficients(coefficients: [f64; 4]) -> [f64; 4] {
    let [mut amplitude, mut angular_frequency, mut phase, vertical_offset] = coefficients;

    if amplitude < 0.0 {
        amplitude = -amplitude;
        angular_frequency = -angular_frequency;
        phase = -phase;
    }
    if angular_frequency < 0.0 {
        angular_frequency = -angular_frequency;
        phase = -phase + PI;
    }
    phase = phase.rem_euclid(2.0 * PI);

    [amplitude, angular_frequency, phase, vertical_offset]
}

fn rotate<T: Clone>(items: &[T], by: usize) -> Vec<T> {
    let n = items.len();
    (0..n).map(|i| items[(i + by) % n].clone()).collect()
}

/// Side lengths of a closed polygon; side `i` runs from vertex `i` to `i + 1`.
pub fn polygon_sides(coords: &[Coord]) -> Vec<f64> {
    let n = coords.len();
    (0..n)
        .map(|i| length(&subtract(&coords[(i + 1) % n], &coords[i])))
        .collect()
}

/// Interior-or-exterior angle magnitude at each vertex, folded into `[0, 180]`.
pub fn polygon_angles(coords: &[Coord]) -> Vec<f64> {
    let n = coords.len();
    (0..n)
        .map(|i| {
            let prev = coords[(i + n - 1) % n];
            let next = coords[(i + 1) % n];
            let angle = find_angle(&next, &prev, &coords[i]).rem_euclid(360.0);
            if angle > 180.0 {
                360.0 - angle
            } else {
                angle
            }
        })
        .collect()
}

/// Whether two polygons have the same shape, allowing rotation, reflection
/// and a uniform scale. `side_tolerance` bounds how far corresponding sides
/// may differ in absolute length: infinity for similarity, the default
/// tolerance for congruence.
pub fn polygons_similar(a: &[Coord], b: &[Coord], side_tolerance: f64) -> bool {
    if a.len() != b.len() || a.is_empty() {
        return false;
    }
    let n = a.len();
    let angles_a = polygon_angles(a);
    let sides_a = polygon_sides(a);
    let angles_b = polygon_angles(b);
    let sides_b = polygon_sides(b);

    // Angle tolerance absorbs the float noise of atan2 on lattice points.
    let angle_tolerance = 1e-6;

    (0..2 * n).any(|i| {
        let (angles, sides) = if i < n {
            (rotate(&angles_b, i), rotate(&sides_b, i))
        } else {
            let mut angles = angles_b.clone();
            let mut sides = sides_b.clone();
            angles.reverse();
            sides.reverse();
            let sides = rotate(&sides, 1);
            (rotate(&angles, i - n), rotate(&sides, i - n))
        };

        let angles_match = angles_a
            .iter()
            .zip(&angles)
            .all(|(x, y)| approx_equal(*x, *y, angle_tolerance));
        if !angles_match {
            return false;
        }

        if sides.iter().any(|side| *side == 0.0) {
            return false;
        }
        let factor = sides_a[0] / sides[0];
        let same_ratio = sides_a
            .iter()
            .zip(&sides)
            .all(|(x, y)| approx_equal(x / y, factor, angle_tolerance));
        let close_enough = sides_a
            .iter()
            .zip(&sides)
            .all(|(x, y)| approx_equal(*x, *y, side_tolerance));
        same_ratio && close_enough
    })
}
