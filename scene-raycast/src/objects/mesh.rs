use log::warn;
use nalgebra_glm::{distance, Vec3};

use super::{local_ray, Geometry};
use crate::{
    math::{transform_vec3, triangle_ray},
    spatial::RayIntersectionTest,
    Face, Intersection, Intersections, Node, Raycast, RaycastContext,
};

/// The vertex indices of a single triangle.
pub type Triangle = [u32; 3];

/// An indexed triangle mesh. Both sides of the triangles are pickable.
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    geometry: Geometry,
    triangles: Vec<Triangle>,
}

impl Mesh {
    pub fn new(vertices: Vec<Vec3>, triangles: Vec<Triangle>) -> Self {
        Self {
            geometry: Geometry::new(vertices),
            triangles,
        }
    }

    #[inline]
    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    #[inline]
    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    /// Returns true if all triangles reference existing vertices.
    pub fn is_valid(&self) -> bool {
        let num_vertices = self.geometry.vertices().len();
        self.triangles
            .iter()
            .all(|t| t.iter().all(|i| (*i as usize) < num_vertices))
    }
}

impl Raycast for Mesh {
    fn raycast(&self, node: &Node, ctx: &RaycastContext<'_>, intersections: &mut Intersections) {
        let raycaster = ctx.raycaster;
        let ray = match local_ray(&self.geometry, node, raycaster, 0f32) {
            Some(ray) => ray,
            None => return,
        };

        if self.geometry.bounding_box().intersects_ray(&ray, None).is_none() {
            return;
        }

        let vertices = self.geometry.vertices();
        let world = node.transform().world();

        for (index, t) in self.triangles.iter().enumerate() {
            let (p0, p1, p2) = match (
                vertices.get(t[0] as usize),
                vertices.get(t[1] as usize),
                vertices.get(t[2] as usize),
            ) {
                (Some(p0), Some(p1), Some(p2)) => (p0, p1, p2),
                _ => {
                    warn!("Triangle {} of node {} is invalid", index, node.id());
                    continue;
                }
            };

            let hit = match triangle_ray(p0, p1, p2, &ray, None) {
                Some(hit) => hit,
                None => continue,
            };

            let point = transform_vec3(world, &ray.at(hit.t));
            let d = distance(&raycaster.ray.origin, &point);
            if !raycaster.accepts(d) {
                continue;
            }

            intersections.push(Intersection {
                distance: d,
                distance_to_ray: None,
                point,
                face: Some(Face {
                    a: t[0],
                    b: t[1],
                    c: t[2],
                    normal: hit.normal,
                }),
                index: Some(index),
                object: node.id(),
            });
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{NodeKind, Ray, Raycaster, Scene, Transform};

    /// Two parallel unit quads facing +z at z = 0 and z = -1.
    fn two_quads() -> Mesh {
        Mesh::new(
            vec![
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(1.0, 1.0, 0.0),
                Vec3::new(0.0, 1.0, 0.0),
                Vec3::new(0.0, 0.0, -1.0),
                Vec3::new(1.0, 0.0, -1.0),
                Vec3::new(1.0, 1.0, -1.0),
                Vec3::new(0.0, 1.0, -1.0),
            ],
            vec![[0, 1, 2], [0, 2, 3], [4, 5, 6], [4, 6, 7]],
        )
    }

    #[test]
    fn test_mesh_raycast() {
        let mesh = two_quads();
        assert!(mesh.is_valid());

        let mut scene = Scene::new();
        let id = scene.add_node(
            "mesh",
            NodeKind::Mesh(mesh),
            Transform::from_position_scale(&Vec3::new(0.0, 0.0, -2.0), &Vec3::new(2.0, 2.0, 2.0)),
        );

        let raycaster = Raycaster::new(Ray::new(
            Vec3::new(0.5, 1.5, 5.0),
            Vec3::new(0.0, 0.0, -1.0),
        ));

        let node = scene.node(id).unwrap();
        let mut hits = Intersections::new();
        node.kind
            .raycast(node, &RaycastContext::new(&scene, &raycaster), &mut hits);

        assert_eq!(hits.len(), 2);

        // the front quad sits at z = -2 and the back quad at z = -4 in world space
        assert!((hits[0].distance - 7.0).abs() < 1e-5);
        assert!((hits[0].point - Vec3::new(0.5, 1.5, -2.0)).norm() < 1e-5);
        assert_eq!(hits[0].index, Some(1));

        let face = hits[0].face.unwrap();
        assert_eq!((face.a, face.b, face.c), (0, 2, 3));
        assert!((face.normal - Vec3::new(0.0, 0.0, 1.0)).norm() < 1e-6);

        assert!((hits[1].distance - 9.0).abs() < 1e-5);
        assert_eq!(hits[1].index, Some(3));
    }

    #[test]
    fn test_invalid_triangles() {
        let mesh = Mesh::new(vec![Vec3::zeros()], vec![[0, 1, 2]]);
        assert!(!mesh.is_valid());

        let mut scene = Scene::new();
        let id = scene.add_node("mesh", NodeKind::Mesh(mesh), Transform::default());
        let raycaster = Raycaster::new(Ray::new(
            Vec3::new(0.0, 0.0, 5.0),
            Vec3::new(0.0, 0.0, -1.0),
        ));

        let node = scene.node(id).unwrap();
        let mut hits = Intersections::new();
        node.kind
            .raycast(node, &RaycastContext::new(&scene, &raycaster), &mut hits);
        assert!(hits.is_empty());
    }
}
