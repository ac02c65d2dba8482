use std::sync::atomic::{AtomicUsize, Ordering};

use sdf_marching_cubes::{
    Constant, Cuboid, MarchingCubes, MarchingCubesError, SampledField, ScalarField, Shape, Sphere,
    SurfaceMesh, Torus,
    grid::Grid,
    marching_cubes,
    mesh::TRIANGLE_STRIDE,
    types::{Point, Value, Vector},
};

/// Wraps a field and counts how often it is evaluated.
struct Counting<F> {
    inner: F,
    calls: AtomicUsize,
}

impl<F: ScalarField> Counting<F> {
    fn new(inner: F) -> Self {
        Self {
            inner,
            calls: AtomicUsize::new(0),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }
}

impl<F: ScalarField> ScalarField for Counting<F> {
    fn distance(&self, p: Point) -> Value {
        self.calls.fetch_add(1, Ordering::Relaxed);
        self.inner.distance(p)
    }
}

fn cube_bounds(half: Value) -> (Point, Point) {
    (Point::new(-half, -half, -half), Point::new(half, half, half))
}

#[test]
fn sphere_vertices_lie_on_the_sphere() {
    let radius = 0.5;
    let sphere = Sphere::new(Point::origin(), radius);
    let (min, max) = cube_bounds(2.0 * radius);
    let mesh = marching_cubes(&sphere, min, max, 20).unwrap();

    assert!(mesh.triangle_count() > 100);
    assert_eq!(mesh.len() % TRIANGLE_STRIDE, 0);

    for (p, n) in mesh.vertices().zip(mesh.normals()) {
        let r = p.coords.norm();
        assert!((r - radius).abs() < 0.02 * radius, "vertex {p:?} at radius {r}");
        assert!((n.norm() - 1.0).abs() < 1e-3);
        assert!(n.dot(&(p.coords / r)) > 0.95, "normal {n:?} at {p:?}");
    }
}

#[test]
fn field_without_crossing_yields_empty_mesh() {
    let (min, max) = cube_bounds(1.0);
    let mesh = marching_cubes(&Constant(1.0), min, max, 12).unwrap();
    assert!(mesh.is_empty());

    // Entirely inside is just as empty.
    let sphere = Sphere::new(Point::origin(), 10.0);
    assert!(marching_cubes(&sphere, min, max, 12).unwrap().is_empty());
}

#[test]
fn corners_are_sampled_once_per_cell() {
    let n = 5;
    let (min, max) = cube_bounds(1.0);

    let flat = Counting::new(Constant(3.0));
    marching_cubes(&flat, min, max, n).unwrap();
    assert_eq!(flat.calls(), 8 * (n + 1).pow(3));

    // Every emitted vertex adds four samples for its normal.
    let sphere = Counting::new(Sphere::new(Point::origin(), 0.7));
    let mesh = marching_cubes(&sphere, min, max, n).unwrap();
    assert!(!mesh.is_empty());
    assert_eq!(sphere.calls(), 8 * (n + 1).pow(3) + 4 * mesh.vertex_count());
}

#[test]
fn extraction_is_deterministic() {
    let torus = Torus::new(0.6, 0.25);
    let config = MarchingCubes::default().with_resolution(24);

    let bits = |mesh: SurfaceMesh| -> Vec<u32> {
        mesh.to_flat().into_iter().map(Value::to_bits).collect()
    };
    let first = bits(config.extract(&torus).unwrap());
    let second = bits(config.extract(&torus).unwrap());

    assert!(!first.is_empty());
    assert_eq!(first, second);
}

#[test]
fn box_faces_have_axis_aligned_normals() {
    let half = 0.8;
    let cuboid = Cuboid::new(Vector::new(half, half, half));
    let (min, max) = cube_bounds(1.0);
    let mesh = marching_cubes(&cuboid, min, max, 10).unwrap();

    let mut per_face = [0usize; 6];
    for (p, n) in mesh.vertices().zip(mesh.normals()) {
        for axis in 0..3 {
            let on_face = (p[axis].abs() - half).abs() < 0.01;
            let away_from_edges = (0..3)
                .filter(|&other| other != axis)
                .all(|other| p[other].abs() < 0.6);
            if !(on_face && away_from_edges) {
                continue;
            }

            let mut outward = Vector::zeros();
            outward[axis] = p[axis].signum();
            assert!(n.dot(&outward) > 0.9, "normal {n:?} at {p:?}");

            let face = 2 * axis + usize::from(p[axis] > 0.0);
            per_face[face] += 1;
        }
    }

    for (face, count) in per_face.iter().enumerate() {
        assert!(*count > 0, "no interior vertices on face {face}");
    }
}

#[test]
fn torus_surface_is_recovered() {
    let torus = Torus::new(0.8, 0.2);
    let mesh = MarchingCubes::default().extract(&torus).unwrap();

    assert!(!mesh.is_empty());
    for p in mesh.vertices() {
        assert!(torus.distance(p).abs() < 0.01, "{p:?}");
    }
    // Nothing in the hole.
    assert!(mesh.vertices().all(|p| p.x.hypot(p.z) > 0.55));
}

#[test]
fn runtime_selected_shapes() {
    let shapes: Vec<Box<dyn ScalarField + Sync>> = vec![
        Box::new(Shape::from(Sphere::new(Point::origin(), 1.0))),
        Box::new(Shape::from(Cuboid::new(Vector::new(0.8, 0.8, 0.8)))),
        Box::new(Shape::from(Torus::new(0.8, 0.2))),
        Box::new(|p: Point| p.y - 0.3 * p.x),
    ];
    let config = MarchingCubes::default().with_resolution(16);

    for shape in &shapes {
        let mesh = config.extract(shape.as_ref()).unwrap();
        assert!(!mesh.is_empty());
        assert_eq!(mesh.len() % TRIANGLE_STRIDE, 0);
    }
}

#[test]
fn sampled_field_extracts_like_its_source() {
    let sphere = Sphere::new(Point::new(0.1, 0.0, -0.1), 0.6);
    let (min, max) = cube_bounds(1.0);
    let grid = Grid::new(min, max, 40).unwrap();
    let sampled = SampledField::from_field(&sphere, grid);

    let mesh = marching_cubes(&sampled, min, max, 20).unwrap();
    assert!(!mesh.is_empty());
    for p in mesh.vertices() {
        assert!(sphere.distance(p).abs() < 0.02, "{p:?}");
    }
}

#[test]
fn invalid_input_is_rejected() {
    let (min, max) = cube_bounds(1.0);
    assert_eq!(
        marching_cubes(&Constant(1.0), min, max, 0),
        Err(MarchingCubesError::InvalidResolution(0))
    );
    assert_eq!(
        marching_cubes(&Constant(1.0), max, min, 4),
        Err(MarchingCubesError::InvalidBounds)
    );
}

#[cfg(feature = "parallel")]
#[test]
fn parallel_extraction_preserves_order() {
    let cuboid = Cuboid::new(Vector::new(0.5, 0.3, 0.7));
    let config = MarchingCubes::default().with_resolution(20);

    let seq = config.extract(&cuboid).unwrap();
    let par = config.extract_par(&cuboid).unwrap();
    assert_eq!(seq.as_slice(), par.as_slice());

    let counting = Counting::new(Constant(-1.0));
    config.extract_par(&counting).unwrap();
    assert_eq!(counting.calls(), 8 * 21usize.pow(3));
}

#[test]
fn shallow_fields_keep_their_normals() {
    // Only the sign matters for extraction, so a very gentle slope is valid input.
    let gentle = |p: Point| 1e-4 * (p.x - 0.05);
    let mesh = MarchingCubes::default()
        .with_resolution(8)
        .extract(&gentle)
        .unwrap();

    assert!(!mesh.is_empty());
    for n in mesh.normals() {
        assert!(n.dot(&Vector::x()) > 0.99, "normal {n:?}");
    }
}
