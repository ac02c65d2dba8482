use crate::{
    field::ScalarField,
    interp::{estimate_normal, interpolate_edge},
    mesh::SurfaceMesh,
    tables::{CORNER_OFFSETS, CORNER_POINT_INDICES, EDGE_TABLE, SENTINEL, TRI_TABLE},
    types::{Point, Value, Vector},
};

/// One corner of a [`Cube`] with its sampled field value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Corner {
    pub position: Point,
    pub value: Value,
}

/// A single grid cell, described by its center and per-axis half-extent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cube {
    pub center: Point,
    pub radius: Vector,
}

impl Cube {
    pub fn new(center: Point, radius: Vector) -> Self {
        Self { center, radius }
    }

    /// Returns the 8 corner positions, ordered as in [`CORNER_OFFSETS`].
    #[inline]
    pub fn corners(&self) -> [Point; 8] {
        CORNER_OFFSETS.map(|[x, y, z]| self.center + self.radius.component_mul(&Vector::new(x, y, z)))
    }

    /// Samples `field` once at each corner.
    #[inline]
    pub fn sample<F: ScalarField + ?Sized>(&self, field: &F) -> [Corner; 8] {
        self.corners().map(|position| Corner {
            position,
            value: field.distance(position),
        })
    }
}

/// Computes the marching cubes index for a cell.
///
/// Bit `i` is set when corner `i` is **strictly below** `iso_val` ("inside"). Corners exactly
/// on the iso value count as outside.
///
/// ```text
/// corner index:  7  6  5  4  3  2  1  0
/// index bits:   [_][_][_][_][_][_][_][_]
///                                      ^-- corner 0 inside?
/// ```
#[inline]
pub fn cube_index(corners: &[Corner; 8], iso_val: Value) -> u8 {
    corners
        .iter()
        .enumerate()
        .filter(|(_, c)| c.value < iso_val)
        .fold(0, |index, (i, _)| index | (1 << i))
}

/// Interpolates the crossing point on each edge set in `edges_mask`.
///
/// `edges_mask` is a 12-bit field from [`EDGE_TABLE`]. Edges whose bit is clear stay `None`;
/// the triangle table never references them.
#[inline]
pub fn edge_vertices(edges_mask: u16, corners: &[Corner; 8], iso_val: Value) -> [Option<Point>; 12] {
    let mut edge_points: [Option<Point>; 12] = [None; 12];

    for (i, [a, b]) in CORNER_POINT_INDICES.iter().enumerate() {
        if edges_mask & (1 << i) == 0 {
            continue;
        }
        edge_points[i] = Some(interpolate_edge(corners[*a as usize], corners[*b as usize], iso_val));
    }

    edge_points
}

/// Yields the triangles of configuration `index` as triples of edge indices.
///
/// `TRI_TABLE[index]` contains edge indices in groups of three, terminated by `-1`:
/// ```text
/// TRI_TABLE[index] = [e0, e1, e2,  e3, e4, e5,  -1, ...]
///                     \___tri0__/   \___tri1__/
/// ```
#[inline]
pub fn triangle_edges(index: u8) -> impl Iterator<Item = [usize; 3]> {
    TRI_TABLE[index as usize]
        .chunks_exact(3)
        .take_while(|tri| tri[0] != SENTINEL)
        .map(|tri| {
            debug_assert!(tri.iter().all(|&e| e != SENTINEL), "unterminated triangle");
            [tri[0] as usize, tri[1] as usize, tri[2] as usize]
        })
}

/// Polygonizes one cell, appending `v0, n0, v1, n1, v2, n2` for each triangle to `out`.
///
/// ```text
/// 1. Cube::sample      →  8 corners (position, value)
/// 2. cube_index        →  256-entry lookup key
/// 3. EDGE_TABLE[index] →  bitmask of crossed edges
/// 4. edge_vertices     →  up to 12 interpolated points
/// 5. triangle_edges    →  triangles from TRI_TABLE
/// 6. estimate_normal   →  one normal per emitted vertex
/// ```
///
/// Returns the number of triangles appended.
pub fn polygonize<F: ScalarField + ?Sized>(
    field: &F,
    cube: &Cube,
    iso_val: Value,
    out: &mut SurfaceMesh,
) -> usize {
    let corners = cube.sample(field);
    let index = cube_index(&corners, iso_val);

    let edges_mask = EDGE_TABLE[index as usize];
    if edges_mask == 0 {
        return 0;
    }

    let edge_points = edge_vertices(edges_mask, &corners, iso_val);

    let mut count = 0;
    for tri in triangle_edges(index) {
        let positions = tri.map(|e| edge_points[e].expect("edge vertex missing"));
        let normals = positions.map(|p| estimate_normal(field, p));
        out.push_triangle(positions, normals);
        count += 1;
    }
    count
}
