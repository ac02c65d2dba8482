use crate::types::{Point, Value, Vector};

/// Vectors stored per vertex: position, then normal.
pub const VERTEX_STRIDE: usize = 2;

/// Vectors stored per triangle.
pub const TRIANGLE_STRIDE: usize = 3 * VERTEX_STRIDE;

/// Triangle soup produced by the marching cubes extractor.
///
/// Positions and normals are interleaved one-to-one, three vertices per triangle:
///
/// ```text
/// [v0, n0, v1, n1, v2, n2,  v0, n0, ...]
///  \_______ tri 0 _______/  \__ tri 1 ..
/// ```
///
/// The length is always a multiple of [`TRIANGLE_STRIDE`]. Vertices shared by adjacent cells
/// are not deduplicated.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SurfaceMesh {
    data: Vec<Vector>,
}

/// One triangle of a [`SurfaceMesh`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    pub positions: [Point; 3],
    pub normals: [Vector; 3],
}

impl Triangle {
    /// Computes the face normal from the winding order.
    ///
    /// Returns the zero vector if the triangle is degenerate.
    pub fn face_normal(&self) -> Vector {
        let [a, b, c] = self.positions;
        let cross = (b - a).cross(&(c - b));

        let nrm = cross.norm();
        if nrm == 0.0 { Vector::zeros() } else { cross / nrm }
    }
}

impl SurfaceMesh {
    /// Creates an empty mesh.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty mesh with room for `triangles` triangles.
    pub fn with_capacity(triangles: usize) -> Self {
        Self {
            data: Vec::with_capacity(triangles * TRIANGLE_STRIDE),
        }
    }

    /// Appends one triangle as `v0, n0, v1, n1, v2, n2`.
    pub fn push_triangle(&mut self, positions: [Point; 3], normals: [Vector; 3]) {
        for (p, n) in positions.into_iter().zip(normals) {
            self.data.push(p.coords);
            self.data.push(n);
        }
    }

    /// Appends all triangles of `other`, preserving their order.
    pub fn append(&mut self, other: &mut SurfaceMesh) {
        self.data.append(&mut other.data);
    }

    /// Number of stored vectors (positions plus normals).
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn vertex_count(&self) -> usize {
        self.data.len() / VERTEX_STRIDE
    }

    pub fn triangle_count(&self) -> usize {
        self.data.len() / TRIANGLE_STRIDE
    }

    /// The interleaved buffer.
    pub fn as_slice(&self) -> &[Vector] {
        &self.data
    }

    pub fn into_inner(self) -> Vec<Vector> {
        self.data
    }

    /// Vertex positions in emission order.
    pub fn vertices(&self) -> impl Iterator<Item = Point> + '_ {
        self.data.chunks_exact(VERTEX_STRIDE).map(|v| Point::from(v[0]))
    }

    /// Vertex normals, one per position.
    pub fn normals(&self) -> impl Iterator<Item = Vector> + '_ {
        self.data.chunks_exact(VERTEX_STRIDE).map(|v| v[1])
    }

    pub fn triangles(&self) -> impl Iterator<Item = Triangle> + '_ {
        self.data.chunks_exact(TRIANGLE_STRIDE).map(|t| Triangle {
            positions: [Point::from(t[0]), Point::from(t[2]), Point::from(t[4])],
            normals: [t[1], t[3], t[5]],
        })
    }

    /// Flattens the buffer to `[px, py, pz, nx, ny, nz, ...]` for direct vertex-buffer upload
    /// with a stride of six floats.
    pub fn to_flat(&self) -> Vec<Value> {
        self.data.iter().flat_map(|v| [v.x, v.y, v.z]).collect()
    }
}
