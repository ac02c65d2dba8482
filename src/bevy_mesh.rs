//! Conversion into a Bevy [`Mesh`] asset (`bevy` feature).
//!
//! Handing the mesh to Bevy is the boundary of this crate: windowing, GPU upload and drawing
//! stay with the application.

use bevy::{
    asset::RenderAssetUsages,
    mesh::{Indices, Mesh, PrimitiveTopology},
};

use crate::mesh::SurfaceMesh;

impl From<&SurfaceMesh> for Mesh {
    /// Builds a triangle-list mesh with positions, per-vertex normals and sequential `u32`
    /// indices (vertices are not shared between triangles).
    fn from(surface: &SurfaceMesh) -> Self {
        let positions: Vec<[f32; 3]> = surface.vertices().map(|p| [p.x, p.y, p.z]).collect();
        let normals: Vec<[f32; 3]> = surface.normals().map(|n| [n.x, n.y, n.z]).collect();
        let indices: Vec<u32> = (0..positions.len() as u32).collect();

        let mut mesh = Mesh::new(PrimitiveTopology::TriangleList, RenderAssetUsages::default());
        mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, positions);
        mesh.insert_attribute(Mesh::ATTRIBUTE_NORMAL, normals);
        mesh.insert_indices(Indices::U32(indices));
        mesh
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{extract::MarchingCubes, field::Sphere, types::Point};

    #[test]
    fn converts_every_vertex() {
        let surface = MarchingCubes::default()
            .with_resolution(10)
            .extract(&Sphere::new(Point::origin(), 0.5))
            .unwrap();
        let mesh = Mesh::from(&surface);

        assert_eq!(mesh.count_vertices(), surface.vertex_count());
        assert_eq!(mesh.indices().map(|i| i.len()), Some(surface.vertex_count()));
    }
}
