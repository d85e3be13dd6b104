use log::{debug, error, info};
use nalgebra_glm::Vec3;

use crate::{
    math::Ray, Intersections, NodeId, PickConfig, Raycaster, Result, Scene, StatsNode,
    StatsNodeTrait,
};

/// The outcome of a pick run.
pub struct PickResult {
    /// The scene built from the configuration.
    pub scene: Scene,

    /// The top level nodes of the scene.
    pub roots: Vec<NodeId>,

    /// The sorted hits for each probe ray of the configuration.
    pub hits: Vec<Intersections>,
}

impl PickResult {
    /// Returns the names of the hit nodes of the given probe ray in the order of the hits.
    pub fn hit_names(&self, ray_index: usize) -> Vec<&str> {
        self.hits
            .get(ray_index)
            .map(|hits| {
                hits.iter()
                    .filter_map(|h| self.scene.node(h.object))
                    .map(|n| n.name.as_str())
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Runs the probe rays of a pick configuration against its scene.
pub struct PickExecutor {
    config: PickConfig,
}

impl PickExecutor {
    /// Creates a new pick executor.
    ///
    /// # Arguments
    /// * `config` - The pick configuration.
    pub fn new(config: PickConfig) -> Self {
        Self { config }
    }

    /// Builds the scene, updates the level of detail visibility if a camera is configured and
    /// casts all probe rays.
    ///
    /// # Arguments
    /// * `s` - The stats node to write the timings to.
    pub fn run(&self, s: StatsNode) -> Result<PickResult> {
        info!("Num Scene Roots: {}", self.config.scene.len());
        info!("Num Rays: {}", self.config.rays.len());

        let (mut scene, roots) = {
            let _t = s.get_child("build_scene").register_timing();
            Scene::from_desc(&self.config.scene).map_err(|err| {
                error!("Failed to build the scene: {:?}", err);
                err
            })?
        };

        info!("Scene has {} nodes", scene.len());

        if let Some(camera) = self.config.camera {
            let _t = s.get_child("update_lods").register_timing();
            scene.update_lods(&Vec3::from(camera));
        }

        let mut hits = Vec::with_capacity(self.config.rays.len());
        for (ray_index, ray) in self.config.rays.iter().enumerate() {
            let mut raycaster = Raycaster::with_range(
                Ray::from(ray),
                self.config.near,
                self.config.far.unwrap_or(f32::INFINITY),
            );
            raycaster.params = self.config.params;

            let intersections = {
                let _t = s.get_child("raycast").register_timing();
                raycaster.intersect_objects(&scene, &roots, self.config.recursive)
            };

            info!(
                "Ray {}/{}: {} hits",
                ray_index + 1,
                self.config.rays.len(),
                intersections.len()
            );

            for hit in intersections.iter() {
                let name = scene
                    .node(hit.object)
                    .map(|n| n.name.as_str())
                    .unwrap_or_default();
                debug!(
                    "  - '{}' {} at distance {:.4}, point ({}, {}, {})",
                    name, hit.object, hit.distance, hit.point.x, hit.point.y, hit.point.z
                );
            }

            hits.push(intersections);
        }

        Ok(PickResult { scene, roots, hits })
    }
}
