use crate::{
    cube::Cube,
    error::{MarchingCubesError, Result},
    types::{Point, Value, Vector},
};

/// An axis-aligned region tiled into marching cubes cells.
///
/// Cells are centered on the `(resolution + 1)^3` lattice points from `min` to `max` inclusive,
/// each extending half a step along every axis:
///
/// ```text
///  step   = (max - min) / resolution
///  radius = step / 2
///  center(i, j, k) = min + step * (i, j, k),  0 <= i, j, k <= resolution
/// ```
///
/// So the cells cover `[min - radius, max + radius]` and there are `(resolution + 1)^3` of
/// them, not `resolution^3`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Grid {
    min: Point,
    max: Point,
    resolution: usize,
}

impl Grid {
    /// Returns [`MarchingCubesError::InvalidResolution`] for a zero resolution and
    /// [`MarchingCubesError::InvalidBounds`] unless `min < max` on every axis.
    pub fn new(min: Point, max: Point, resolution: usize) -> Result<Self> {
        if resolution == 0 {
            return Err(MarchingCubesError::InvalidResolution(resolution));
        }
        let finite = min.iter().chain(max.iter()).all(|v| v.is_finite());
        if !finite || (0..3).any(|axis| min[axis] >= max[axis]) {
            return Err(MarchingCubesError::InvalidBounds);
        }
        Ok(Self { min, max, resolution })
    }

    pub fn min(&self) -> Point {
        self.min
    }

    pub fn max(&self) -> Point {
        self.max
    }

    pub fn resolution(&self) -> usize {
        self.resolution
    }

    /// Distance between neighbouring cell centers along each axis.
    pub fn step(&self) -> Vector {
        (self.max - self.min) / self.resolution as Value
    }

    /// Half-extent of every cell.
    pub fn radius(&self) -> Vector {
        self.step() / 2.0
    }

    /// Cells (and lattice points) along each axis.
    pub fn cells_per_axis(&self) -> usize {
        self.resolution + 1
    }

    pub fn cell_count(&self) -> usize {
        self.cells_per_axis().pow(3)
    }

    /// The lattice point at index `(i, j, k)`.
    #[inline]
    pub fn lattice_point(&self, i: usize, j: usize, k: usize) -> Point {
        let step = self.step();
        Point::new(
            self.min.x + step.x * i as Value,
            self.min.y + step.y * j as Value,
            self.min.z + step.z * k as Value,
        )
    }

    /// The cell centered on lattice point `(i, j, k)`.
    #[inline]
    pub fn cell(&self, i: usize, j: usize, k: usize) -> Cube {
        Cube::new(self.lattice_point(i, j, k), self.radius())
    }

    /// All cells of the slice at outer index `i`, in (y, z) order.
    pub fn slice(&self, i: usize) -> impl Iterator<Item = Cube> + '_ {
        let n = self.cells_per_axis();
        (0..n).flat_map(move |j| (0..n).map(move |k| self.cell(i, j, k)))
    }

    /// All cells with x outermost and z innermost.
    pub fn cells(&self) -> impl Iterator<Item = Cube> + '_ {
        (0..self.cells_per_axis()).flat_map(move |i| self.slice(i))
    }
}
