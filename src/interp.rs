use crate::{
    cube::Corner,
    field::ScalarField,
    types::{Point, Value, Vector},
};

/// Tolerance for the corner/degenerate checks in [`interpolate_edge`].
pub const ISO_EPSILON: Value = 1e-5;

/// Finite-difference step used by [`estimate_normal`]. Kept separate from [`ISO_EPSILON`].
pub const NORMAL_STEP: Value = 1e-4;

/// Returned by [`estimate_normal`] when the field gradient vanishes.
pub const DEFAULT_NORMAL: Vector = Vector::new(0.0, 1.0, 0.0);

/// Tetrahedron sample directions for [`estimate_normal`].
const TETRAHEDRON: [[Value; 3]; 4] = [
    [1.0, -1.0, -1.0],
    [-1.0, -1.0, 1.0],
    [-1.0, 1.0, -1.0],
    [1.0, 1.0, 1.0],
];

// Return the interpolation factor t corresponding to iso_val
pub fn find_t(v0: Value, v1: Value, iso_val: Value) -> Value {
    (iso_val - v0) / (v1 - v0)
}

// Linear interpolation
pub fn lerp(a: Value, b: Value, t: Value) -> Value {
    a + (b - a) * t
}

// Linearly interpolate between two points by factor t
pub fn interpolate_points(p0: Point, p1: Point, t: Value) -> Point {
    Point::new(lerp(p0.x, p1.x, t), lerp(p0.y, p1.y, t), lerp(p0.z, p1.z, t))
}

/// Finds where the field crosses `iso_val` along the edge from `a` to `b`.
///
/// Checked in order:
/// 1. `a` is (nearly) on the surface: `a.position`, unchanged.
/// 2. `b` is (nearly) on the surface: `b.position`, unchanged.
/// 3. Both values (nearly) equal: `a.position`, avoiding a division by ~0.
/// 4. Otherwise linear interpolation by [`find_t`].
#[inline]
pub fn interpolate_edge(a: Corner, b: Corner, iso_val: Value) -> Point {
    if (iso_val - a.value).abs() < ISO_EPSILON {
        return a.position;
    }
    if (iso_val - b.value).abs() < ISO_EPSILON {
        return b.position;
    }
    if (a.value - b.value).abs() < ISO_EPSILON {
        return a.position;
    }
    interpolate_points(a.position, b.position, find_t(a.value, b.value, iso_val))
}

/// Estimates the unit surface normal at `p` from the field gradient.
///
/// Samples four points `NORMAL_STEP` away along the vertices of a tetrahedron and sums the
/// directions weighted by their samples (4 evaluations instead of 6 for central differences).
/// Falls back to [`DEFAULT_NORMAL`] only at critical points where the gradient vanishes;
/// shallow but nonzero gradients still give their own direction.
pub fn estimate_normal<F: ScalarField + ?Sized>(field: &F, p: Point) -> Vector {
    let sum = TETRAHEDRON
        .iter()
        .map(|&[x, y, z]| {
            let dir = Vector::new(x, y, z);
            dir * field.distance(p + dir * NORMAL_STEP)
        })
        .fold(Vector::zeros(), |acc, v| acc + v);
    // The sum approximates 4 * NORMAL_STEP * gradient.
    let gradient = sum / (4.0 * NORMAL_STEP);

    match gradient.try_normalize(Value::MIN_POSITIVE) {
        Some(n) => n,
        None => {
            log::trace!("degenerate gradient at {p:?}, using default normal");
            DEFAULT_NORMAL
        }
    }
}
