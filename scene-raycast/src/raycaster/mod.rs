//! The raycaster dispatching queries over the scene hierarchy.

mod traversal;

pub use traversal::*;

use log::{debug, error};
use nalgebra_glm::Vec3;
use serde::{Deserialize, Serialize};

use crate::{math::Ray, Error, Intersections, NodeId, Result, Scene};

/// The pick settings for lines.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LineParams {
    /// The maximal distance between the ray and a segment in the local space of the line.
    pub precision: f32,
}

impl Default for LineParams {
    fn default() -> Self {
        Self { precision: 1.0 }
    }
}

/// The pick settings for point clouds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PointsParams {
    /// The maximal distance between the ray and a point in world units.
    pub threshold: f32,
}

impl Default for PointsParams {
    fn default() -> Self {
        Self { threshold: 1.0 }
    }
}

/// The per kind pick settings of a raycaster.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RaycastParams {
    pub line: LineParams,
    pub points: PointsParams,
}

/// The roots of a multi root query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Roots<'a> {
    /// An ordered list of roots.
    List(&'a [NodeId]),

    /// A single node that has not been wrapped into a list.
    Single(NodeId),
}

impl<'a> From<&'a [NodeId]> for Roots<'a> {
    fn from(roots: &'a [NodeId]) -> Self {
        Roots::List(roots)
    }
}

impl<'a> From<&'a Vec<NodeId>> for Roots<'a> {
    fn from(roots: &'a Vec<NodeId>) -> Self {
        Roots::List(roots.as_slice())
    }
}

impl<'a, const N: usize> From<&'a [NodeId; N]> for Roots<'a> {
    fn from(roots: &'a [NodeId; N]) -> Self {
        Roots::List(roots.as_slice())
    }
}

impl From<NodeId> for Roots<'_> {
    fn from(root: NodeId) -> Self {
        Roots::Single(root)
    }
}

/// The borrowed state every raycastable object sees during a query.
#[derive(Clone, Copy)]
pub struct RaycastContext<'a> {
    pub scene: &'a Scene,
    pub raycaster: &'a Raycaster,
}

impl<'a> RaycastContext<'a> {
    pub fn new(scene: &'a Scene, raycaster: &'a Raycaster) -> Self {
        Self { scene, raycaster }
    }
}

/// Casts a ray into a scene and collects the hit objects ordered by their distance.
#[derive(Debug, Clone, PartialEq)]
pub struct Raycaster {
    /// The query ray in world space.
    pub ray: Ray,

    /// Hits closer than near are ignored.
    pub near: f32,

    /// Hits further away than far are ignored.
    pub far: f32,

    pub params: RaycastParams,
}

impl Default for Raycaster {
    fn default() -> Self {
        Self::new(Ray::new(Vec3::zeros(), Vec3::new(0.0, 0.0, -1.0)))
    }
}

impl Raycaster {
    /// Creates a new raycaster for the given ray with an unbounded range.
    pub fn new(ray: Ray) -> Self {
        Self {
            ray,
            near: 0f32,
            far: f32::INFINITY,
            params: RaycastParams::default(),
        }
    }

    /// Creates a new raycaster that only accepts hits within [near, far].
    ///
    /// # Arguments
    /// * `ray` - The query ray in world space.
    /// * `near` - The minimal hit distance, negative values are raised to zero.
    /// * `far` - The maximal hit distance.
    pub fn with_range(ray: Ray, near: f32, far: f32) -> Self {
        Self {
            near: near.max(0f32),
            far,
            ..Self::new(ray)
        }
    }

    /// Returns true if a hit at the given distance lies within [near, far].
    #[inline]
    pub fn accepts(&self, distance: f32) -> bool {
        distance >= self.near && distance <= self.far
    }

    /// Casts the ray against the given node and, if recursive, against all of its descendants.
    /// Unknown nodes yield no hits.
    ///
    /// # Arguments
    /// * `scene` - The scene the node belongs to.
    /// * `root` - The node to test.
    /// * `recursive` - Whether the descendants are tested as well.
    pub fn intersect_object(&self, scene: &Scene, root: NodeId, recursive: bool) -> Intersections {
        let mut traversal = Traversal::new(scene, self, recursive);
        traversal.visit(root);

        traversal.finish()
    }

    /// Casts the ray against all given roots and pools their hits. Unknown roots are skipped.
    /// A single node that is not wrapped into a list is rejected with a diagnostic and yields
    /// no hits.
    ///
    /// # Arguments
    /// * `scene` - The scene the roots belong to.
    /// * `roots` - The ordered list of roots.
    /// * `recursive` - Whether the descendants are tested as well.
    pub fn intersect_objects<'a, R>(&self, scene: &Scene, roots: R, recursive: bool) -> Intersections
    where
        R: Into<Roots<'a>>,
    {
        let roots = match roots.into() {
            Roots::List(roots) => roots,
            Roots::Single(root) => {
                error!(
                    "intersect_objects: expected a list of roots, got the single node {}",
                    root
                );
                return Intersections::new();
            }
        };

        let mut traversal = Traversal::new(scene, self, recursive);
        for root in roots.iter() {
            traversal.visit(*root);
        }

        let intersections = traversal.finish();
        debug!(
            "Query over {} roots returned {} hits",
            roots.len(),
            intersections.len()
        );

        intersections
    }

    /// Same as [`Raycaster::intersect_objects`], but reports invalid roots as errors instead of
    /// logging them.
    pub fn try_intersect_objects<'a, R>(
        &self,
        scene: &Scene,
        roots: R,
        recursive: bool,
    ) -> Result<Intersections>
    where
        R: Into<Roots<'a>>,
    {
        let roots = match roots.into() {
            Roots::List(roots) => roots,
            Roots::Single(_) => return Err(Error::NotASequence),
        };

        for root in roots.iter() {
            scene.try_node(*root)?;
        }

        Ok(self.intersect_objects(scene, roots, recursive))
    }
}
