use derive_more::Display;

pub type Result<T> = core::result::Result<T, MarchingCubesError>;

#[derive(Debug, Display, Clone, PartialEq)]
#[display("{self:?}")]
pub enum MarchingCubesError {
    /// The grid resolution must be at least one cell per axis.
    InvalidResolution(usize),
    /// `min` must be finite and strictly below `max` on every axis.
    InvalidBounds,
    /// Sampled values do not match the `(resolution + 1)^3` lattice of their grid.
    ShapeMismatch {
        expected: [usize; 3],
        found: [usize; 3],
    },
}

impl std::error::Error for MarchingCubesError {}
