use crate::{Intersection, Intersections, Node, Raycast, RaycastContext};

/// A camera facing sprite. It is picked like a disc around the world position of its node with
/// the world scale along the local x-axis as radius.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Sprite;

impl Raycast for Sprite {
    fn raycast(&self, node: &Node, ctx: &RaycastContext<'_>, intersections: &mut Intersections) {
        let raycaster = ctx.raycaster;
        let ray = &raycaster.ray;

        let position = node.transform().position();
        let radius = node.transform().scale_on_axis(0);

        let distance_to_ray = ray.distance_to_point(&position);
        if distance_to_ray > radius {
            return;
        }

        // a center behind the origin is only reachable with the origin inside the pick radius
        let distance = ray.project(&position).max(0f32);
        if !raycaster.accepts(distance) {
            return;
        }

        intersections.push(Intersection {
            distance,
            distance_to_ray: Some(distance_to_ray),
            point: position,
            face: None,
            index: None,
            object: node.id(),
        });
    }
}
