use log::{trace, warn};
use nalgebra_glm::distance;

use crate::{Intersections, Node, NodeId, Raycast, RaycastContext};

/// A single level of a level of detail node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Level {
    /// The distance from which on the level is used.
    pub threshold: f32,

    /// The node representing the level.
    pub node: NodeId,
}

/// A level of detail node that selects one of its levels based on the distance to the viewer.
///
/// The levels are kept sorted by their threshold in ascending order. Levels are added with
/// [`Scene::add_level`](crate::Scene::add_level), which also attaches the level node as an
/// ordinary child.
#[derive(Debug, Clone, Default)]
pub struct Lod {
    levels: Vec<Level>,
}

impl Lod {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the levels sorted ascending by their threshold.
    #[inline]
    pub fn levels(&self) -> &[Level] {
        &self.levels
    }

    /// Inserts a new level and returns its position. Negative thresholds are mirrored, levels
    /// with equal thresholds keep their insertion order.
    ///
    /// # Arguments
    /// * `node` - The node representing the level.
    /// * `threshold` - The distance from which on the level is used.
    pub(crate) fn insert_level(&mut self, node: NodeId, threshold: f32) -> usize {
        let threshold = if threshold.is_nan() {
            warn!("Level threshold for node {} is NaN, using 0", node);
            0f32
        } else {
            threshold.abs()
        };

        let index = self.levels.partition_point(|l| l.threshold <= threshold);
        self.levels.insert(index, Level { threshold, node });

        index
    }

    /// Returns the index of the level used at the given distance, i.e., the last level whose
    /// threshold does not exceed the distance. Distances below all thresholds select the first
    /// level.
    ///
    /// # Arguments
    /// * `d` - The distance to the viewer.
    pub fn level_index_for_distance(&self, d: f32) -> Option<usize> {
        if self.levels.is_empty() {
            return None;
        }

        Some(
            self.levels
                .partition_point(|l| l.threshold <= d)
                .saturating_sub(1),
        )
    }

    /// Returns the node of the level used at the given distance.
    pub fn object_for_distance(&self, d: f32) -> Option<NodeId> {
        self.level_index_for_distance(d)
            .map(|index| self.levels[index].node)
    }
}

impl Raycast for Lod {
    /// Picks with the level selected for the distance between the ray origin and the node, which
    /// is not necessarily the level currently visible for the camera.
    fn raycast(&self, node: &Node, ctx: &RaycastContext<'_>, intersections: &mut Intersections) {
        let d = distance(&ctx.raycaster.ray.origin, &node.transform().position());

        let selected = match self.object_for_distance(d) {
            Some(selected) => selected,
            None => return,
        };

        match ctx.scene.node(selected) {
            Some(level) => {
                trace!("LOD {} picks level {} at distance {}", node.id(), selected, d);
                level.kind.raycast(level, ctx, intersections);
            }
            None => warn!("LOD {} references unknown level {}", node.id(), selected),
        }
    }
}
