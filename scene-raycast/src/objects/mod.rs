//! The raycastable node kinds.
//!
//! Each kind implements [`Raycast`](crate::Raycast) for the node it is attached to. Kinds with
//! geometry share the coarse rejection against the world-space bounding sphere of their
//! geometry and run their exact tests in the local space of the node.

mod geometry;
mod line;
mod lod;
mod mesh;
mod points;
mod sprite;

pub use geometry::*;
pub use line::*;
pub use lod::*;
pub use mesh::*;
pub use points::*;
pub use sprite::*;

use log::trace;

use crate::{math::Ray, spatial::RayIntersectionTest, Node, Raycaster};

/// Tests the ray of the raycaster against the bounding sphere of the geometry in world space and
/// returns the ray transformed into the local space of the node if the sphere is hit.
///
/// # Arguments
/// * `geometry` - The geometry of the node.
/// * `node` - The node providing the world transform.
/// * `raycaster` - The raycaster with the world space ray.
/// * `margin` - The world space pick tolerance the sphere is grown by.
pub(crate) fn local_ray(
    geometry: &Geometry,
    node: &Node,
    raycaster: &Raycaster,
    margin: f32,
) -> Option<Ray> {
    let transform = node.transform();
    let mut sphere = geometry.bounding_sphere().apply_matrix(transform.world());
    sphere.radius += margin;

    if sphere
        .intersects_ray(&raycaster.ray, Some(raycaster.far))
        .is_none()
    {
        trace!("Ray misses the bounding sphere of node {}", node.id());
        return None;
    }

    match transform.inverse() {
        Some(inverse) => Some(raycaster.ray.apply_matrix(inverse)),
        None => {
            trace!("Node {} has no invertible transform", node.id());
            None
        }
    }
}
