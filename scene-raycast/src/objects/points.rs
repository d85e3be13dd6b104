use nalgebra_glm::{distance, Vec3};

use super::{local_ray, Geometry};
use crate::{math::transform_vec3, Intersection, Intersections, Node, Raycast, RaycastContext};

/// A cloud of individual points. A point is hit if the ray passes it closer than the point
/// threshold of the raycaster.
#[derive(Debug, Clone, Default)]
pub struct Points {
    geometry: Geometry,
}

impl Points {
    pub fn new(vertices: Vec<Vec3>) -> Self {
        Self {
            geometry: Geometry::new(vertices),
        }
    }

    #[inline]
    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }
}

impl Raycast for Points {
    fn raycast(&self, node: &Node, ctx: &RaycastContext<'_>, intersections: &mut Intersections) {
        let raycaster = ctx.raycaster;
        let world_threshold = raycaster.params.points.threshold;
        let ray = match local_ray(&self.geometry, node, raycaster, world_threshold) {
            Some(ray) => ray,
            None => return,
        };

        let transform = node.transform();
        let mean_scale = (0..3).map(|i| transform.scale_on_axis(i)).sum::<f32>() / 3f32;
        let threshold = if mean_scale > 0f32 {
            world_threshold / mean_scale
        } else {
            world_threshold
        };
        let threshold_sq = threshold * threshold;

        for (index, vertex) in self.geometry.vertices().iter().enumerate() {
            if ray.distance_sq_to_point(vertex) >= threshold_sq {
                continue;
            }

            let point = transform_vec3(transform.world(), &ray.closest_point_to_point(vertex));
            let d = distance(&raycaster.ray.origin, &point);
            if !raycaster.accepts(d) {
                continue;
            }

            intersections.push(Intersection {
                distance: d,
                distance_to_ray: Some(distance(
                    &point,
                    &transform_vec3(transform.world(), vertex),
                )),
                point,
                face: None,
                index: Some(index),
                object: node.id(),
            });
        }
    }
}
