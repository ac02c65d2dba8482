pub mod cube;
pub mod error;
pub mod extract;
pub mod field;
pub mod grid;
pub mod interp;
pub mod mesh;
pub mod sampled;
pub mod tables;
pub mod types;

#[cfg(feature = "bevy")]
pub mod bevy_mesh;

pub use error::{MarchingCubesError, Result};
pub use extract::{MarchingCubes, marching_cubes};
pub use field::{Constant, Cuboid, ScalarField, Shape, Sphere, Torus};
pub use mesh::{SurfaceMesh, Triangle};
pub use sampled::SampledField;
