use log::debug;
use nalgebra_glm::Vec3;
use serde::{Deserialize, Serialize};

use super::{NodeId, NodeKind, Scene, Transform};
use crate::{
    objects::{Line, LineMode, Lod, Mesh, Points, Sprite, Triangle},
    Error, Result,
};

fn default_scale() -> [f32; 3] {
    [1f32; 3]
}

/// The serializable description of a node and its subtree.
///
/// Position and scale are given in world space, i.e., they are not combined with the transform
/// of the parent.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct NodeDesc {
    pub name: String,

    /// The world position of the node.
    #[serde(default)]
    pub position: [f32; 3],

    /// The world scale of the node.
    #[serde(default = "default_scale")]
    pub scale: [f32; 3],

    #[serde(default)]
    pub kind: KindDesc,

    #[serde(default)]
    pub children: Vec<NodeDesc>,
}

/// The serializable kind specific content of a node.
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum KindDesc {
    #[default]
    Group,
    Line {
        vertices: Vec<[f32; 3]>,

        #[serde(default)]
        indices: Option<Vec<u32>>,

        #[serde(default)]
        mode: LineMode,
    },
    Points {
        vertices: Vec<[f32; 3]>,
    },
    Mesh {
        vertices: Vec<[f32; 3]>,
        triangles: Vec<Triangle>,
    },
    Sprite,
    Lod {
        levels: Vec<LevelDesc>,
    },
}

/// A single level of a level of detail node.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct LevelDesc {
    pub threshold: f32,
    pub node: NodeDesc,
}

fn to_vertices(vertices: &[[f32; 3]]) -> Vec<Vec3> {
    vertices.iter().map(|v| Vec3::new(v[0], v[1], v[2])).collect()
}

impl Scene {
    /// Builds a new scene from the given node descriptions and returns it together with the ids
    /// of the top level nodes.
    ///
    /// # Arguments
    /// * `desc` - The descriptions of the top level nodes.
    pub fn from_desc(desc: &[NodeDesc]) -> Result<(Scene, Vec<NodeId>)> {
        let mut scene = Scene::new();

        let roots = desc
            .iter()
            .map(|d| scene.add_desc(d))
            .collect::<Result<Vec<NodeId>>>()?;

        debug!(
            "Built scene with {} nodes and {} roots",
            scene.len(),
            roots.len()
        );

        Ok((scene, roots))
    }

    /// Adds the described subtree to the scene and returns the id of its top node.
    fn add_desc(&mut self, desc: &NodeDesc) -> Result<NodeId> {
        let transform = Transform::from_position_scale(
            &Vec3::from(desc.position),
            &Vec3::from(desc.scale),
        );

        let kind = match &desc.kind {
            KindDesc::Group => NodeKind::Group,
            KindDesc::Line {
                vertices,
                indices,
                mode,
            } => {
                let line = match indices {
                    Some(indices) => {
                        Line::with_indices(to_vertices(vertices), indices.clone(), *mode)
                    }
                    None => Line::new(to_vertices(vertices), *mode),
                };

                NodeKind::Line(line)
            }
            KindDesc::Points { vertices } => NodeKind::Points(Points::new(to_vertices(vertices))),
            KindDesc::Mesh {
                vertices,
                triangles,
            } => {
                let mesh = Mesh::new(to_vertices(vertices), triangles.clone());
                if !mesh.is_valid() {
                    return Err(Error::InvalidScene(format!(
                        "mesh '{}' references vertices out of range",
                        desc.name
                    )));
                }

                NodeKind::Mesh(mesh)
            }
            KindDesc::Sprite => NodeKind::Sprite(Sprite),
            KindDesc::Lod { .. } => NodeKind::Lod(Lod::new()),
        };

        let id = self.add_node(desc.name.as_str(), kind, transform);

        if let KindDesc::Lod { levels } = &desc.kind {
            for level in levels.iter() {
                let child = self.add_desc(&level.node)?;
                self.add_level(id, child, level.threshold)?;
            }
        }

        for child in desc.children.iter() {
            let child = self.add_desc(child)?;
            self.add_child(id, child)?;
        }

        Ok(id)
    }
}
