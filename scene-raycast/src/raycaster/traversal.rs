use log::{trace, warn};

use super::{RaycastContext, Raycaster};
use crate::{Intersections, NodeId, Raycast, Scene};

/// The state of a single query walking the scene hierarchy in depth-first pre-order.
///
/// The hits are collected in a buffer owned by the traversal, so concurrent or nested queries
/// never share state.
pub struct Traversal<'a> {
    ctx: RaycastContext<'a>,
    recursive: bool,
    intersections: Intersections,
    num_visited: usize,
}

impl<'a> Traversal<'a> {
    /// Creates a new traversal.
    ///
    /// # Arguments
    /// * `scene` - The scene to traverse.
    /// * `raycaster` - The raycaster defining the query.
    /// * `recursive` - Whether the descendants of visited nodes are visited as well.
    pub fn new(scene: &'a Scene, raycaster: &'a Raycaster, recursive: bool) -> Self {
        Self {
            ctx: RaycastContext::new(scene, raycaster),
            recursive,
            intersections: Intersections::new(),
            num_visited: 0,
        }
    }

    /// Tests the given node and, for recursive traversals, its descendants.
    pub fn visit(&mut self, id: NodeId) {
        let scene = self.ctx.scene;
        let node = match scene.node(id) {
            Some(node) => node,
            None => {
                warn!("Skipping unknown node {}", id);
                return;
            }
        };

        self.num_visited += 1;
        trace!("Visit {} node {} '{}'", node.kind.name(), id, node.name);

        node.kind.raycast(node, &self.ctx, &mut self.intersections);

        if self.recursive {
            for child in node.children() {
                self.visit(*child);
            }
        }
    }

    /// Returns the number of visited nodes so far.
    #[inline]
    pub fn num_visited(&self) -> usize {
        self.num_visited
    }

    /// Finishes the traversal and returns the hits sorted by distance.
    pub fn finish(self) -> Intersections {
        let mut intersections = self.intersections;
        sort_by_distance(&mut intersections);

        trace!(
            "Visited {} nodes, found {} hits",
            self.num_visited,
            intersections.len()
        );

        intersections
    }
}

/// Sorts the hits ascending by their distance. The sort is stable, hits with equal distances
/// keep their order.
pub fn sort_by_distance(intersections: &mut Intersections) {
    intersections.sort_by(|a, b| a.distance.total_cmp(&b.distance));
}

#[cfg(test)]
mod test {
    use nalgebra_glm::Vec3;

    use super::*;
    use crate::{Intersection, NodeKind, Transform};

    fn hit(distance: f32, object: usize) -> Intersection {
        Intersection {
            distance,
            distance_to_ray: None,
            point: Vec3::zeros(),
            face: None,
            index: None,
            object: NodeId(object),
        }
    }

    #[test]
    fn test_sort_by_distance_is_stable() {
        let mut hits = vec![hit(2.0, 0), hit(1.0, 1), hit(2.0, 2), hit(1.0, 3), hit(0.5, 4)];
        sort_by_distance(&mut hits);

        let objects: Vec<usize> = hits.iter().map(|h| h.object.0).collect();
        assert_eq!(objects, vec![4, 1, 3, 0, 2]);
    }

    #[test]
    fn test_num_visited() {
        let mut scene = Scene::new();
        let root = scene.add_node("root", NodeKind::Group, Transform::default());
        let a = scene.add_node("a", NodeKind::Group, Transform::default());
        let b = scene.add_node("b", NodeKind::Group, Transform::default());
        scene.add_child(root, a).unwrap();
        scene.add_child(a, b).unwrap();

        let raycaster = Raycaster::default();

        let mut traversal = Traversal::new(&scene, &raycaster, true);
        traversal.visit(root);
        assert_eq!(traversal.num_visited(), 3);

        let mut traversal = Traversal::new(&scene, &raycaster, false);
        traversal.visit(root);
        traversal.visit(NodeId(17));
        assert_eq!(traversal.num_visited(), 1);
        assert!(traversal.finish().is_empty());
    }
}
