mod desc;

pub use desc::*;

use std::fmt;

use log::{trace, warn};
use nalgebra_glm::{distance, scale, translate, Mat4, Vec3};

use crate::{
    math::{matrix_position, scale_on_axis},
    objects::{Line, Lod, Mesh, Points, Sprite},
    Error, Intersections, Raycast, RaycastContext, Result,
};

/// The handle of a node inside of a scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The world transform of a node together with its cached inverse.
#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    world: Mat4,
    inverse: Option<Mat4>,
}

impl Transform {
    /// Creates a new transform from the given world matrix. The inverse is computed once, a
    /// singular matrix leaves the transform without an inverse.
    ///
    /// # Arguments
    /// * `world` - The local-to-world matrix.
    pub fn new(world: Mat4) -> Self {
        let inverse = world.try_inverse();
        if inverse.is_none() {
            warn!("World transform is not invertible, local space queries are disabled");
        }

        Self { world, inverse }
    }

    /// Creates a transform placing the local origin at the given position with the given scale.
    pub fn from_position_scale(position: &Vec3, scaling: &Vec3) -> Self {
        Self::new(scale(&translate(&Mat4::identity(), position), scaling))
    }

    /// Returns the local-to-world matrix.
    #[inline]
    pub fn world(&self) -> &Mat4 {
        &self.world
    }

    /// Returns the world-to-local matrix if the world matrix is invertible.
    #[inline]
    pub fn inverse(&self) -> Option<&Mat4> {
        self.inverse.as_ref()
    }

    /// Returns the world position of the local origin.
    #[inline]
    pub fn position(&self) -> Vec3 {
        matrix_position(&self.world)
    }

    /// Returns the world scale along the given local axis.
    #[inline]
    pub fn scale_on_axis(&self, axis: usize) -> f32 {
        scale_on_axis(&self.world, axis)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            world: Mat4::identity(),
            inverse: Some(Mat4::identity()),
        }
    }
}

/// The kind specific content of a node.
#[derive(Debug, Clone, Default)]
pub enum NodeKind {
    /// A plain container without own geometry.
    #[default]
    Group,
    Line(Line),
    Points(Points),
    Mesh(Mesh),
    Sprite(Sprite),
    Lod(Lod),
}

impl NodeKind {
    /// Returns a short name of the kind for diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            NodeKind::Group => "group",
            NodeKind::Line(_) => "line",
            NodeKind::Points(_) => "points",
            NodeKind::Mesh(_) => "mesh",
            NodeKind::Sprite(_) => "sprite",
            NodeKind::Lod(_) => "lod",
        }
    }
}

impl Raycast for NodeKind {
    fn raycast(&self, node: &Node, ctx: &RaycastContext<'_>, intersections: &mut Intersections) {
        match self {
            NodeKind::Group => {}
            NodeKind::Line(line) => line.raycast(node, ctx, intersections),
            NodeKind::Points(points) => points.raycast(node, ctx, intersections),
            NodeKind::Mesh(mesh) => mesh.raycast(node, ctx, intersections),
            NodeKind::Sprite(sprite) => sprite.raycast(node, ctx, intersections),
            NodeKind::Lod(lod) => lod.raycast(node, ctx, intersections),
        }
    }
}

/// A single node of the scene hierarchy.
#[derive(Debug, Clone)]
pub struct Node {
    id: NodeId,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    transform: Transform,

    /// The name of the node, only used for diagnostics.
    pub name: String,

    /// The visibility flag, maintained by the level of detail updates.
    pub visible: bool,

    pub kind: NodeKind,
}

impl Node {
    #[inline]
    pub fn id(&self) -> NodeId {
        self.id
    }

    #[inline]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Returns the children of the node in their insertion order.
    #[inline]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    #[inline]
    pub fn transform(&self) -> &Transform {
        &self.transform
    }
}

/// A scene hierarchy stored as an arena of nodes.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    nodes: Vec<Node>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of nodes of the scene.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Adds a new node without a parent to the scene and returns its id.
    ///
    /// # Arguments
    /// * `name` - The name of the node.
    /// * `kind` - The kind specific content of the node.
    /// * `transform` - The already computed world transform of the node.
    pub fn add_node<S: Into<String>>(
        &mut self,
        name: S,
        kind: NodeKind,
        transform: Transform,
    ) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            id,
            parent: None,
            children: Vec::new(),
            transform,
            name: name.into(),
            visible: true,
            kind,
        });

        id
    }

    #[inline]
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    #[inline]
    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0)
    }

    /// Returns the node with the given id or an error if the scene does not know it.
    pub fn try_node(&self, id: NodeId) -> Result<&Node> {
        self.node(id).ok_or(Error::UnknownNode(id))
    }

    /// Returns the children of the given node, empty for unknown nodes.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map(|n| n.children()).unwrap_or(&[])
    }

    /// Returns the ids of all nodes without a parent in the order they were added.
    pub fn roots(&self) -> Vec<NodeId> {
        self.nodes
            .iter()
            .filter(|n| n.parent.is_none())
            .map(|n| n.id)
            .collect()
    }

    /// Returns the first node with the given name.
    pub fn find_by_name(&self, name: &str) -> Option<NodeId> {
        self.nodes.iter().find(|n| n.name == name).map(|n| n.id)
    }

    /// Appends the child to the children of the parent. A child that already has a parent is
    /// moved away from its previous parent.
    ///
    /// # Arguments
    /// * `parent` - The new parent node.
    /// * `child` - The node to attach.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        self.try_node(parent)?;
        self.try_node(child)?;

        // walk up from the parent, the child must not be one of its ancestors
        let mut ancestor = Some(parent);
        while let Some(id) = ancestor {
            if id == child {
                return Err(Error::CyclicHierarchy { parent, child });
            }

            ancestor = self.nodes[id.0].parent;
        }

        if let Some(old_parent) = self.nodes[child.0].parent {
            self.nodes[old_parent.0].children.retain(|c| *c != child);
        }

        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);

        Ok(())
    }

    /// Replaces the world transform of the node and recomputes the cached inverse.
    pub fn set_world_transform(&mut self, id: NodeId, world: Mat4) -> Result<()> {
        let node = self.node_mut(id).ok_or(Error::UnknownNode(id))?;
        node.transform = Transform::new(world);

        Ok(())
    }

    /// Registers the child as a level of the level of detail node and attaches it as an ordinary
    /// child of the node.
    ///
    /// # Arguments
    /// * `lod` - The level of detail node.
    /// * `child` - The node representing the level.
    /// * `threshold` - The distance from which on the level is used, negative values are
    ///                 mirrored.
    pub fn add_level(&mut self, lod: NodeId, child: NodeId, threshold: f32) -> Result<()> {
        if !matches!(self.try_node(lod)?.kind, NodeKind::Lod(_)) {
            return Err(Error::NotALod(lod));
        }

        self.add_child(lod, child)?;

        if let NodeKind::Lod(l) = &mut self.nodes[lod.0].kind {
            let index = l.insert_level(child, threshold);
            trace!("Added level {} for node {} to LOD {}", index, child, lod);
        }

        Ok(())
    }

    /// Updates the visibility of the levels of the given level of detail node for the camera at
    /// the given world position. The level selected for the distance between camera and node
    /// becomes visible, all other levels invisible. Nodes with less than two levels are left
    /// untouched.
    ///
    /// # Arguments
    /// * `lod` - The level of detail node.
    /// * `camera_position` - The world position of the camera.
    pub fn update_lod(&mut self, lod: NodeId, camera_position: &Vec3) -> Result<()> {
        let node = self.try_node(lod)?;
        let NodeKind::Lod(l) = &node.kind else {
            return Err(Error::NotALod(lod));
        };

        if l.levels().len() < 2 {
            return Ok(());
        }

        let d = distance(&node.transform.position(), camera_position);
        let selected = l.object_for_distance(d);
        let levels: Vec<NodeId> = l.levels().iter().map(|level| level.node).collect();

        trace!("LOD {} at distance {} selects {:?}", lod, d, selected);

        for id in levels {
            if let Some(n) = self.nodes.get_mut(id.0) {
                n.visible = false;
            }
        }

        if let Some(n) = selected.and_then(|id| self.nodes.get_mut(id.0)) {
            n.visible = true;
        }

        Ok(())
    }

    /// Updates the level visibility of all level of detail nodes of the scene.
    ///
    /// # Arguments
    /// * `camera_position` - The world position of the camera.
    pub fn update_lods(&mut self, camera_position: &Vec3) {
        let lods: Vec<NodeId> = self
            .nodes
            .iter()
            .filter(|n| matches!(n.kind, NodeKind::Lod(_)))
            .map(|n| n.id)
            .collect();

        for lod in lods {
            if let Err(err) = self.update_lod(lod, camera_position) {
                warn!("Failed to update LOD {}: {}", lod, err);
            }
        }
    }
}
