#[cfg(feature = "parallel")]
use rayon::iter::{IntoParallelIterator, ParallelIterator};

use crate::{
    cube::polygonize,
    error::Result,
    field::ScalarField,
    grid::Grid,
    mesh::SurfaceMesh,
    types::{Point, Value},
};

/// Configuration for a marching cubes extraction.
///
/// ```rust,ignore
/// let mesh = MarchingCubes::default()
///     .with_resolution(64)
///     .with_iso_value(0.1)
///     .extract(&Torus::new(0.8, 0.2))?;
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarchingCubes {
    /// Lower corner of the sampled region.
    pub min: Point,
    /// Upper corner of the sampled region.
    pub max: Point,
    /// Steps between `min` and `max` along each axis. Must be at least `1`.
    ///
    /// The extractor evaluates `(resolution + 1)^3` cells. Default: `50`.
    pub resolution: usize,
    /// Field value of the extracted surface. Default: `0.0`.
    pub iso_value: Value,
}

impl Default for MarchingCubes {
    fn default() -> Self {
        Self {
            min: Point::new(-1.0, -1.0, -1.0),
            max: Point::new(1.0, 1.0, 1.0),
            resolution: 50,
            iso_value: 0.0,
        }
    }
}

impl MarchingCubes {
    /// Sets the sampled region.
    pub fn with_bounds(mut self, min: Point, max: Point) -> Self {
        self.min = min;
        self.max = max;
        self
    }

    /// Sets the number of steps per axis.
    pub fn with_resolution(mut self, resolution: usize) -> Self {
        self.resolution = resolution;
        self
    }

    /// Sets the iso value.
    pub fn with_iso_value(mut self, iso_value: Value) -> Self {
        self.iso_value = iso_value;
        self
    }

    /// Validates the bounds and resolution.
    pub fn grid(&self) -> Result<Grid> {
        Grid::new(self.min, self.max, self.resolution)
    }

    /// Runs marching cubes over every cell of the grid on the calling thread.
    ///
    /// Cells are visited with x outermost and z innermost; each samples the field at its own
    /// 8 corners (shared corners are not cached) plus 4 times per emitted vertex for normals.
    ///
    /// Returns [`MarchingCubesError::InvalidResolution`](crate::error::MarchingCubesError) or
    /// `InvalidBounds` for a malformed grid.
    pub fn extract<F: ScalarField + ?Sized>(&self, field: &F) -> Result<SurfaceMesh> {
        let grid = self.grid()?;
        let _span = tracing::debug_span!("marching_cubes", resolution = grid.resolution()).entered();

        let mut mesh = SurfaceMesh::new();
        for cube in grid.cells() {
            polygonize(field, &cube, self.iso_value, &mut mesh);
        }

        tracing::debug!(
            cells = grid.cell_count(),
            triangles = mesh.triangle_count(),
            "extracted surface"
        );
        Ok(mesh)
    }

    /// Like [`extract`](MarchingCubes::extract), but parallelised over X slices using Rayon.
    ///
    /// Slices are concatenated in index order, so the result is identical to `extract`.
    #[cfg(feature = "parallel")]
    pub fn extract_par<F: ScalarField + Sync + ?Sized>(&self, field: &F) -> Result<SurfaceMesh> {
        let grid = self.grid()?;
        let _span =
            tracing::debug_span!("marching_cubes_par", resolution = grid.resolution()).entered();
        let iso_value = self.iso_value;

        let per_x: Vec<SurfaceMesh> = (0..grid.cells_per_axis())
            .into_par_iter()
            .map(|i| {
                let mut local = SurfaceMesh::new();
                for cube in grid.slice(i) {
                    polygonize(field, &cube, iso_value, &mut local);
                }
                local
            })
            .collect();

        // Merge per-X slices into a single buffer
        let total: usize = per_x.iter().map(|m| m.triangle_count()).sum();
        let mut mesh = SurfaceMesh::with_capacity(total);
        for mut m in per_x {
            mesh.append(&mut m);
        }

        tracing::debug!(
            cells = grid.cell_count(),
            triangles = mesh.triangle_count(),
            "extracted surface"
        );
        Ok(mesh)
    }
}

/// Extracts the zero level set of `field` over `[min, max]`.
///
/// Shorthand for [`MarchingCubes`] with an iso value of `0.0`.
pub fn marching_cubes<F: ScalarField + ?Sized>(
    field: &F,
    min: Point,
    max: Point,
    resolution: usize,
) -> Result<SurfaceMesh> {
    MarchingCubes::default()
        .with_bounds(min, max)
        .with_resolution(resolution)
        .extract(field)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::MarchingCubesError,
        field::{Constant, Sphere},
    };

    #[test]
    fn zero_resolution_is_rejected() {
        let result = MarchingCubes::default()
            .with_resolution(0)
            .extract(&Constant(1.0));
        assert_eq!(result, Err(MarchingCubesError::InvalidResolution(0)));
    }

    #[test]
    fn iso_value_shifts_the_surface() {
        let sphere = Sphere::new(Point::origin(), 0.5);
        let mesh = MarchingCubes::default()
            .with_resolution(24)
            .with_iso_value(0.25)
            .extract(&sphere)
            .unwrap();

        assert!(!mesh.is_empty());
        for p in mesh.vertices() {
            assert!((p.coords.norm() - 0.75).abs() < 0.01, "{p:?}");
        }
    }

    #[test]
    fn free_function_matches_default_iso() {
        let sphere = Sphere::new(Point::origin(), 0.6);
        let min = Point::new(-1.0, -1.0, -1.0);
        let max = Point::new(1.0, 1.0, 1.0);
        let a = marching_cubes(&sphere, min, max, 8).unwrap();
        let b = MarchingCubes::default()
            .with_resolution(8)
            .extract(&sphere)
            .unwrap();
        assert_eq!(a, b);
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn parallel_matches_sequential() {
        let sphere = Sphere::new(Point::new(0.1, -0.2, 0.05), 0.7);
        let config = MarchingCubes::default().with_resolution(16);
        let seq = config.extract(&sphere).unwrap();
        let par = config.extract_par(&sphere).unwrap();
        assert_eq!(seq.len(), par.len());
        assert_eq!(seq, par);
    }
}
