//! Scene graph nodes
//!
//! A [`Node`] is either a group of children or a drawable leaf. All three
//! kinds share a name, a local [`Transform`] and a free-form [`UserData`]
//! slot, and are visited through the same traversal functions.

use std::sync::atomic::{AtomicU64, Ordering};

use cgmath::Matrix4;

use super::points::Points;
use super::transform::Transform;
use crate::gfx::geometry::Geometry;
use crate::gfx::resources::material::MaterialId;

static NEXT_NODE_ID: AtomicU64 = AtomicU64::new(1);

/// Process-wide unique node identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u64);

impl NodeId {
    fn next() -> Self {
        NodeId(NEXT_NODE_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Sway parameters read by an external animation loop
///
/// Nothing in this crate advances `time`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationDescriptor {
    pub time: f32,
    pub speed: f32,
    pub amplitude: f32,
}

impl AnimationDescriptor {
    pub fn new(speed: f32, amplitude: f32) -> Self {
        Self {
            time: 0.0,
            speed,
            amplitude,
        }
    }
}

/// Metadata attached to a node for consumers outside the renderer
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserData {
    pub animation: Option<AnimationDescriptor>,
}

/// Organizational node without geometry
#[derive(Debug, Default)]
pub struct Group {
    pub children: Vec<Node>,
}

impl Group {
    /// Appends a child and returns its id
    pub fn push(&mut self, child: Node) -> NodeId {
        let id = child.id;
        self.children.push(child);
        id
    }
}

/// Drawable leaf: geometry plus a material reference
#[derive(Debug, Clone)]
pub struct Mesh {
    pub geometry: Geometry,
    pub material: MaterialId,
    pub cast_shadow: bool,
    pub receive_shadow: bool,
}

impl Mesh {
    pub fn new(geometry: Geometry, material: impl Into<MaterialId>) -> Self {
        Self {
            geometry,
            material: material.into(),
            cast_shadow: false,
            receive_shadow: false,
        }
    }
}

#[derive(Debug)]
pub enum NodeKind {
    Group(Group),
    Mesh(Mesh),
    Points(Points),
}

/// Not `Clone`: every node keeps a unique id
#[derive(Debug)]
pub struct Node {
    id: NodeId,
    pub name: String,
    pub transform: Transform,
    pub user_data: UserData,
    pub kind: NodeKind,
}

impl Node {
    fn with_kind(name: &str, kind: NodeKind) -> Self {
        Self {
            id: NodeId::next(),
            name: name.to_owned(),
            transform: Transform::default(),
            user_data: UserData::default(),
            kind,
        }
    }

    pub fn group(name: &str) -> Self {
        Self::with_kind(name, NodeKind::Group(Group::default()))
    }

    pub fn mesh(name: &str, geometry: Geometry, material: impl Into<MaterialId>) -> Self {
        Self::with_kind(name, NodeKind::Mesh(Mesh::new(geometry, material)))
    }

    pub fn points(name: &str, points: Points) -> Self {
        Self::with_kind(name, NodeKind::Points(points))
    }

    /// Wraps an already populated group
    pub fn from_group(name: &str, group: Group) -> Self {
        Self::with_kind(name, NodeKind::Group(group))
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn with_position(mut self, x: f32, y: f32, z: f32) -> Self {
        self.transform.set_position(x, y, z);
        self
    }

    pub fn with_rotation(mut self, x: f32, y: f32, z: f32) -> Self {
        self.transform.set_rotation(x, y, z);
        self
    }

    pub fn is_group(&self) -> bool {
        matches!(self.kind, NodeKind::Group(_))
    }

    pub fn as_mesh(&self) -> Option<&Mesh> {
        match &self.kind {
            NodeKind::Mesh(mesh) => Some(mesh),
            _ => None,
        }
    }

    pub fn as_mesh_mut(&mut self) -> Option<&mut Mesh> {
        match &mut self.kind {
            NodeKind::Mesh(mesh) => Some(mesh),
            _ => None,
        }
    }

    pub fn children(&self) -> &[Node] {
        match &self.kind {
            NodeKind::Group(group) => &group.children,
            _ => &[],
        }
    }

    /// Appends a child and returns its id
    ///
    /// Only groups hold children; adding to a leaf hands the node back.
    pub fn add(&mut self, child: Node) -> Result<NodeId, Node> {
        match &mut self.kind {
            NodeKind::Group(group) => Ok(group.push(child)),
            _ => Err(child),
        }
    }

    /// Depth-first, pre-order visit of this node and all descendants
    pub fn traverse<'a>(&'a self, visit: &mut impl FnMut(&'a Node)) {
        visit(self);
        for child in self.children() {
            child.traverse(visit);
        }
    }

    pub fn traverse_mut(&mut self, visit: &mut impl FnMut(&mut Node)) {
        visit(self);
        if let NodeKind::Group(group) = &mut self.kind {
            for child in &mut group.children {
                child.traverse_mut(visit);
            }
        }
    }

    /// Like [`Node::traverse`], also passing each node's world matrix
    pub fn traverse_with_world<'a>(
        &'a self,
        parent: Matrix4<f32>,
        visit: &mut impl FnMut(&'a Node, Matrix4<f32>),
    ) {
        let world = parent * self.transform.matrix();
        visit(self, world);
        for child in self.children() {
            child.traverse_with_world(world, visit);
        }
    }

    /// First node in this subtree (self included) carrying `name`
    pub fn find_by_name(&self, name: &str) -> Option<&Node> {
        if self.name == name {
            return Some(self);
        }
        self.children().iter().find_map(|child| child.find_by_name(name))
    }

    pub fn find_by_id(&self, id: NodeId) -> Option<&Node> {
        if self.id == id {
            return Some(self);
        }
        self.children().iter().find_map(|child| child.find_by_id(id))
    }

    pub fn find_by_id_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        if self.id == id {
            return Some(self);
        }
        match &mut self.kind {
            NodeKind::Group(group) => group
                .children
                .iter_mut()
                .find_map(|child| child.find_by_id_mut(id)),
            _ => None,
        }
    }

    /// Number of mesh leaves in this subtree
    pub fn mesh_count(&self) -> usize {
        let mut count = 0;
        self.traverse(&mut |node| {
            if node.as_mesh().is_some() {
                count += 1;
            }
        });
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{SquareMatrix, Vector4};

    fn sample_tree() -> Node {
        let mut root = Node::group("Root").with_position(0.0, 1.0, 0.0);
        let mut inner = Node::group("Inner").with_position(0.0, 0.5, 0.0);
        inner
            .add(Node::mesh("Ball", Geometry::sphere(1.0, 8, 8), "ball").with_position(0.0, 1.0, 0.0))
            .ok();
        root.add(Node::mesh("Box", Geometry::cuboid(1.0, 1.0, 1.0), "box")).ok();
        root.add(inner).ok();
        root
    }

    #[test]
    fn test_ids_are_unique() {
        let a = Node::group("a");
        let b = Node::group("a");
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_leaf_rejects_children() {
        let mut leaf = Node::mesh("Leaf", Geometry::cuboid(1.0, 1.0, 1.0), "m");
        let child = Node::group("Child");
        let child_id = child.id();
        let rejected = leaf.add(child).unwrap_err();
        assert_eq!(rejected.id(), child_id);
    }

    #[test]
    fn test_traverse_is_depth_first() {
        let root = sample_tree();
        let mut names = Vec::new();
        root.traverse(&mut |node| names.push(node.name.clone()));
        assert_eq!(names, ["Root", "Box", "Inner", "Ball"]);
        assert_eq!(root.mesh_count(), 2);
    }

    #[test]
    fn test_traverse_mut_reaches_leaves() {
        let mut root = sample_tree();
        root.traverse_mut(&mut |node| {
            if let Some(mesh) = node.as_mesh_mut() {
                mesh.cast_shadow = true;
            }
        });
        let mut flags = Vec::new();
        root.traverse(&mut |node| {
            if let Some(mesh) = node.as_mesh() {
                flags.push(mesh.cast_shadow);
            }
        });
        assert_eq!(flags, [true, true]);
    }

    #[test]
    fn test_world_matrices_accumulate() {
        let root = sample_tree();
        let mut ball_world = None;
        root.traverse_with_world(Matrix4::identity(), &mut |node, world| {
            if node.name == "Ball" {
                ball_world = Some(world);
            }
        });
        let origin = ball_world.unwrap() * Vector4::new(0.0, 0.0, 0.0, 1.0);
        assert_eq!(origin, Vector4::new(0.0, 2.5, 0.0, 1.0));
    }

    #[test]
    fn test_find_by_name_and_id() {
        let root = sample_tree();
        let ball = root.find_by_name("Ball").unwrap();
        assert_eq!(root.find_by_id(ball.id()).unwrap().name, "Ball");
        assert!(root.find_by_name("Missing").is_none());
    }
}
