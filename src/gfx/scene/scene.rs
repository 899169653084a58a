use cgmath::{Matrix4, SquareMatrix};

use super::node::{Node, NodeId, NodeKind};
use crate::gfx::resources::material::{Material, MaterialId, MaterialManager};

/// Root of the drawable hierarchy
///
/// Owns the top-level nodes and the materials meshes refer to by id.
#[derive(Default)]
pub struct Scene {
    pub children: Vec<Node>,
    pub material_manager: MaterialManager,
}

/// Node counts of a scene, logged after construction
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SceneStatistics {
    pub groups: usize,
    pub meshes: usize,
    pub points: usize,
    pub point_count: usize,
    pub materials: usize,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a top-level node and returns its id
    pub fn add(&mut self, node: Node) -> NodeId {
        let id = node.id();
        log::debug!("Scene: added '{}' {}", node.name, id);
        self.children.push(node);
        id
    }

    /// Registers a material and returns the id meshes use to reference it
    pub fn add_material(&mut self, material: Material) -> MaterialId {
        self.material_manager.add_material(material)
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.children.iter().find_map(|child| child.find_by_id(id))
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.children
            .iter_mut()
            .find_map(|child| child.find_by_id_mut(id))
    }

    pub fn find_by_name(&self, name: &str) -> Option<&Node> {
        self.children.iter().find_map(|child| child.find_by_name(name))
    }

    /// Depth-first visit of every node in the scene
    pub fn traverse<'a>(&'a self, visit: &mut impl FnMut(&'a Node)) {
        for child in &self.children {
            child.traverse(visit);
        }
    }

    /// Depth-first visit with accumulated world matrices
    pub fn traverse_with_world<'a>(&'a self, visit: &mut impl FnMut(&'a Node, Matrix4<f32>)) {
        for child in &self.children {
            child.traverse_with_world(Matrix4::identity(), visit);
        }
    }

    pub fn statistics(&self) -> SceneStatistics {
        let mut stats = SceneStatistics {
            materials: self.material_manager.len(),
            ..Default::default()
        };
        self.traverse(&mut |node| match &node.kind {
            NodeKind::Group(_) => stats.groups += 1,
            NodeKind::Mesh(_) => stats.meshes += 1,
            NodeKind::Points(points) => {
                stats.points += 1;
                stats.point_count += points.len();
            }
        });
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::geometry::Geometry;
    use crate::gfx::resources::material::{Color, PointsMaterial};
    use crate::gfx::scene::points::Points;

    #[test]
    fn test_lookup_across_top_level_nodes() {
        let mut scene = Scene::new();
        let mut group = Node::group("Group");
        let leaf_id = group
            .add(Node::mesh("Leaf", Geometry::cuboid(1.0, 1.0, 1.0), "Default"))
            .unwrap();
        scene.add(Node::points(
            "Dust",
            Points::new(vec![0.0; 6], PointsMaterial::new(Color::WHITE, 1.0)),
        ));
        scene.add(group);

        assert_eq!(scene.find_by_name("Leaf").map(Node::id), Some(leaf_id));
        scene.node_mut(leaf_id).unwrap().name = "Renamed".into();
        assert_eq!(scene.node(leaf_id).unwrap().name, "Renamed");
    }

    #[test]
    fn test_statistics_count_every_kind() {
        let mut scene = Scene::new();
        scene.add_material(Material::new("Wood", Color::from_hex(0x8B4513), 0.1, 0.7));
        let mut group = Node::group("Group");
        group.add(Node::mesh("A", Geometry::cuboid(1.0, 1.0, 1.0), "Wood")).ok();
        group.add(Node::mesh("B", Geometry::sphere(1.0, 8, 8), "Wood")).ok();
        scene.add(group);
        scene.add(Node::points(
            "Dust",
            Points::new(vec![0.0; 9], PointsMaterial::new(Color::WHITE, 1.0)),
        ));

        let stats = scene.statistics();
        assert_eq!(
            stats,
            SceneStatistics {
                groups: 1,
                meshes: 2,
                points: 1,
                point_count: 3,
                materials: 1,
            }
        );
    }
}
