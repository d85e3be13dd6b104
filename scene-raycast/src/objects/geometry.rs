use std::cell::OnceCell;

use log::trace;
use nalgebra_glm::Vec3;

use crate::math::{Sphere, AABB};

/// Vertex positions in the local space of a node together with their lazily computed bounding
/// volumes.
#[derive(Debug, Clone, Default)]
pub struct Geometry {
    vertices: Vec<Vec3>,
    bounding_sphere: OnceCell<Sphere>,
    bounding_box: OnceCell<AABB>,
}

impl Geometry {
    pub fn new(vertices: Vec<Vec3>) -> Self {
        Self {
            vertices,
            bounding_sphere: OnceCell::new(),
            bounding_box: OnceCell::new(),
        }
    }

    #[inline]
    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    /// Replaces the vertices and drops the cached bounding volumes.
    pub fn set_vertices(&mut self, vertices: Vec<Vec3>) {
        self.vertices = vertices;
        self.bounding_sphere = OnceCell::new();
        self.bounding_box = OnceCell::new();
    }

    /// Returns the bounding sphere of the vertices, computed on first use.
    pub fn bounding_sphere(&self) -> &Sphere {
        self.bounding_sphere.get_or_init(|| {
            let sphere = Sphere::from_points(&self.vertices);
            trace!("Computed bounding sphere {:?}", sphere);
            sphere
        })
    }

    /// Returns true if the bounding sphere has already been computed.
    #[inline]
    pub fn has_bounding_sphere(&self) -> bool {
        self.bounding_sphere.get().is_some()
    }

    /// Returns the bounding box of the vertices, computed on first use.
    pub fn bounding_box(&self) -> &AABB {
        self.bounding_box.get_or_init(|| {
            let aabb = AABB::from_iter(self.vertices.iter().copied());
            trace!("Computed bounding box {}", aabb);
            aabb
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_cached_bounding_volumes() {
        let mut geometry = Geometry::new(vec![Vec3::new(-1.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0)]);
        assert!(!geometry.has_bounding_sphere());

        assert_eq!(geometry.bounding_sphere().radius, 1.0);
        assert!(geometry.has_bounding_sphere());
        assert_eq!(geometry.bounding_box().get_center(), Vec3::zeros());

        geometry.set_vertices(vec![Vec3::new(0.0, 0.0, 0.0), Vec3::new(4.0, 0.0, 0.0)]);
        assert!(!geometry.has_bounding_sphere());
        assert_eq!(geometry.bounding_sphere().center, Vec3::new(2.0, 0.0, 0.0));
        assert_eq!(geometry.bounding_box().max, Vec3::new(4.0, 0.0, 0.0));
    }
}
