mod config;
mod error;
mod executor;
pub mod math;
pub mod objects;
pub mod raycaster;
mod scene;
pub mod spatial;
mod stats;

pub use config::*;
pub use error::*;
pub use executor::*;
pub use math::Ray;
use nalgebra_glm::Vec3;
pub use raycaster::{RaycastContext, RaycastParams, Raycaster, Roots};
pub use scene::*;
pub use stats::*;

/// The hits of a single query, sorted by their distance along the ray with the closest hit
/// first. Hits with equal distance keep the order in which they were discovered.
pub type Intersections = Vec<Intersection>;

/// A single hit of a ray with an object of the scene.
#[derive(Debug, Clone, PartialEq)]
pub struct Intersection {
    /// The distance between the ray origin and the hit point along the ray in world space.
    pub distance: f32,

    /// The perpendicular distance between the ray and the hit primitive, only reported for
    /// primitives without an area, i.e., line segments, sprites and points.
    pub distance_to_ray: Option<f32>,

    /// The hit point in world coordinates.
    pub point: Vec3,

    /// The hit triangle, only reported for meshes.
    pub face: Option<Face>,

    /// The index of the hit primitive, i.e., the first vertex of a line segment, the index of a
    /// point or the index of a triangle.
    pub index: Option<usize>,

    /// The node that has been hit.
    pub object: NodeId,
}

/// A triangle of a mesh referenced by an intersection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Face {
    /// The vertex indices of the triangle.
    pub a: u32,
    pub b: u32,
    pub c: u32,

    /// The unit normal of the triangle in the local space of the mesh.
    pub normal: Vec3,
}

/// The capability of a node to test itself against the ray of a query.
///
/// Implementations only report hits of the node itself. Visiting the children is left to the
/// traversal of the raycaster.
pub trait Raycast {
    /// Tests the node against the ray of the query and appends all hits to the intersections.
    ///
    /// # Arguments
    /// * `node` - The scene node carrying the raycastable object, provides the world transform.
    /// * `ctx` - The query context with the scene and the raycaster settings.
    /// * `intersections` - The hits of the running query.
    fn raycast(&self, node: &Node, ctx: &RaycastContext<'_>, intersections: &mut Intersections);
}
