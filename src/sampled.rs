use std::sync::Arc;

use ndarray::Array3;

use crate::{
    error::{MarchingCubesError, Result},
    field::ScalarField,
    grid::Grid,
    interp::lerp,
    types::{Point, Value},
};

/// A scalar field stored as samples on the lattice of a [`Grid`].
///
/// The lattice has `(resolution + 1)` points per axis and values are indexed `[x, y, z]`.
/// Points between samples are trilinearly interpolated. Points outside the lattice are
/// clamped to its boundary, so the field stays total.
///
/// `values` is wrapped in an [`Arc`] so clones share the same samples, e.g. when the same
/// voxel data is extracted at several iso values.
#[derive(Debug, Clone)]
pub struct SampledField {
    grid: Grid,
    values: Arc<Array3<Value>>,
}

impl SampledField {
    /// Samples `field` at every lattice point of `grid`.
    pub fn from_field<F: ScalarField + ?Sized>(field: &F, grid: Grid) -> Self {
        let n = grid.cells_per_axis();
        let values = Array3::from_shape_fn((n, n, n), |(i, j, k)| {
            field.distance(grid.lattice_point(i, j, k))
        });
        Self {
            grid,
            values: Arc::new(values),
        }
    }

    /// Wraps previously sampled values.
    ///
    /// Returns [`MarchingCubesError::ShapeMismatch`] unless `values` has
    /// `grid.cells_per_axis()` entries along every axis.
    pub fn from_values(values: Array3<Value>, grid: Grid) -> Result<Self> {
        let n = grid.cells_per_axis();
        let shape = values.shape();
        if shape != [n, n, n] {
            return Err(MarchingCubesError::ShapeMismatch {
                expected: [n, n, n],
                found: [shape[0], shape[1], shape[2]],
            });
        }
        Ok(Self {
            grid,
            values: Arc::new(values),
        })
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn values(&self) -> &Array3<Value> {
        &self.values
    }

    /// Returns the sample at lattice point `(i, j, k)`.
    pub fn get(&self, i: usize, j: usize, k: usize) -> Value {
        self.values[[i, j, k]]
    }

    /// Sets the sample at lattice point `(i, j, k)`.
    ///
    /// If the samples are shared this will clone them first (copy-on-write).
    pub fn set(&mut self, i: usize, j: usize, k: usize, v: Value) {
        Arc::make_mut(&mut self.values)[[i, j, k]] = v
    }

    /// Splits one coordinate into a lattice cell index and the fraction within that cell.
    #[inline]
    fn locate(&self, coord: Value, min: Value, step: Value) -> (usize, Value) {
        let last = self.grid.resolution();
        let s = ((coord - min) / step).clamp(0.0, last as Value);
        let i = (s.floor() as usize).min(last - 1);
        (i, s - i as Value)
    }
}

impl ScalarField for SampledField {
    fn distance(&self, p: Point) -> Value {
        let min = self.grid.min();
        let step = self.grid.step();
        let (i, tx) = self.locate(p.x, min.x, step.x);
        let (j, ty) = self.locate(p.y, min.y, step.y);
        let (k, tz) = self.locate(p.z, min.z, step.z);

        let v = |di: usize, dj: usize, dk: usize| self.values[[i + di, j + dj, k + dk]];

        let x00 = lerp(v(0, 0, 0), v(1, 0, 0), tx);
        let x10 = lerp(v(0, 1, 0), v(1, 1, 0), tx);
        let x01 = lerp(v(0, 0, 1), v(1, 0, 1), tx);
        let x11 = lerp(v(0, 1, 1), v(1, 1, 1), tx);

        lerp(lerp(x00, x10, ty), lerp(x01, x11, ty), tz)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::Sphere;

    fn grid(resolution: usize) -> Grid {
        Grid::new(Point::new(-1.0, -1.0, -1.0), Point::new(1.0, 1.0, 1.0), resolution).unwrap()
    }

    #[test]
    fn reproduces_lattice_samples() {
        let sphere = Sphere::new(Point::origin(), 0.5);
        let sampled = SampledField::from_field(&sphere, grid(4));

        for (i, j, k) in [(0, 0, 0), (2, 2, 2), (4, 1, 3), (4, 4, 4)] {
            let p = sampled.grid().lattice_point(i, j, k);
            assert_eq!(sampled.get(i, j, k), sphere.distance(p));
            assert!((sampled.distance(p) - sphere.distance(p)).abs() < 1e-6);
        }
    }

    #[test]
    fn linear_fields_are_exact() {
        let plane = |p: Point| 0.5 * p.x - p.y + 2.0 * p.z;
        let sampled = SampledField::from_field(&plane, grid(3));

        for p in [
            Point::new(0.1, -0.7, 0.33),
            Point::new(-0.95, 0.5, 0.0),
            Point::new(0.99, 0.99, -0.99),
        ] {
            assert!((sampled.distance(p) - plane(p)).abs() < 1e-5, "{p:?}");
        }
    }

    #[test]
    fn clamps_outside_the_lattice() {
        let sampled = SampledField::from_field(&|p: Point| p.x, grid(2));
        assert!((sampled.distance(Point::new(5.0, 0.0, 0.0)) - 1.0).abs() < 1e-6);
        assert!((sampled.distance(Point::new(-5.0, 9.0, -9.0)) + 1.0).abs() < 1e-6);
    }

    #[test]
    fn shape_is_checked() {
        let err = SampledField::from_values(Array3::zeros((3, 3, 2)), grid(2)).unwrap_err();
        assert_eq!(
            err,
            MarchingCubesError::ShapeMismatch {
                expected: [3, 3, 3],
                found: [3, 3, 2],
            }
        );
        assert!(SampledField::from_values(Array3::zeros((3, 3, 3)), grid(2)).is_ok());
    }

    #[test]
    fn set_copies_shared_samples() {
        let original = SampledField::from_field(&|_p: Point| 1.0, grid(1));
        let mut edited = original.clone();
        edited.set(0, 0, 0, -1.0);
        assert_eq!(original.get(0, 0, 0), 1.0);
        assert_eq!(edited.get(0, 0, 0), -1.0);
    }
}
