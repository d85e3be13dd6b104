use log::error;
use nalgebra_glm::Vec3;
use serde::{Deserialize, Serialize};

use crate::{math::Ray, Error, NodeDesc, RaycastParams, Result};

fn default_recursive() -> bool {
    true
}

/// The configuration of a pick run.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PickConfig {
    /// The top level nodes of the scene to pick in.
    pub scene: Vec<NodeDesc>,

    /// The probe rays in world space.
    pub rays: Vec<RayDesc>,

    /// The minimal hit distance.
    #[serde(default)]
    pub near: f32,

    /// The maximal hit distance, unbounded if not given.
    #[serde(default)]
    pub far: Option<f32>,

    /// The per kind pick settings.
    #[serde(default)]
    pub params: RaycastParams,

    /// Should the descendants of the top level nodes be tested as well
    #[serde(default = "default_recursive")]
    pub recursive: bool,

    /// The camera position for updating the level of detail visibility before picking.
    #[serde(default)]
    pub camera: Option<[f32; 3]>,
}

impl PickConfig {
    /// Reads the configuration from the provided reader.
    ///
    /// # Arguments
    /// * `reader` - The reader to read the configuration from.
    pub fn read<R: std::io::Read>(reader: R) -> Result<Self> {
        let config: PickConfig = serde_yaml::from_reader(reader).map_err(|e| {
            error!("Failed to parse the configuration: {:?}", e);

            Error::DeserializationError(Box::new(e))
        })?;

        Ok(config)
    }

    /// Writes the configuration to the provided writer.
    ///
    /// # Arguments
    /// * `writer` - The writer to write the configuration to.
    pub fn write<W: std::io::Write>(&self, mut writer: W) -> Result<()> {
        let yaml = serde_yaml::to_string(&self).map_err(|e| {
            error!("Failed to serialize the configuration: {:?}", e);

            Error::SerializationError(Box::new(e))
        })?;

        writer.write_all(yaml.as_bytes())?;

        Ok(())
    }
}

/// A probe ray given by its origin and direction.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct RayDesc {
    pub origin: [f32; 3],
    pub direction: [f32; 3],
}

impl From<&RayDesc> for Ray {
    fn from(desc: &RayDesc) -> Self {
        Ray::new(Vec3::from(desc.origin), Vec3::from(desc.direction))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_loading_config() {
        let pick_config_data = include_bytes!("../../demos/configs/pick.yaml");
        let config = PickConfig::read(&pick_config_data[..]).unwrap();

        assert_eq!(config.scene.len(), 2);
        assert_eq!(config.rays.len(), 3);
        assert_eq!(config.near, 0.0);
        assert_eq!(config.far, Some(100.0));
        assert!(config.recursive);
        assert_eq!(config.camera, Some([0.0, 0.0, 30.0]));
        assert_eq!(config.params.line.precision, 0.5);
        assert_eq!(config.params.points.threshold, 1.0);

        let ray = Ray::from(&config.rays[0]);
        assert_eq!(ray.direction, Vec3::new(0.0, 0.0, -1.0));
    }

    #[test]
    fn test_write_and_read() {
        let config = PickConfig::read(&b"scene: []\nrays: []\n"[..]).unwrap();
        assert!(config.recursive);
        assert_eq!(config.far, None);

        let mut data = Vec::new();
        config.write(&mut data).unwrap();

        let config = PickConfig::read(&data[..]).unwrap();
        assert!(config.scene.is_empty());
        assert_eq!(config.params, RaycastParams::default());
    }

    #[test]
    fn test_invalid_config() {
        assert!(matches!(
            PickConfig::read(&b"scene: 3\n"[..]),
            Err(Error::DeserializationError(_))
        ));
    }
}
