//! Product builder
//!
//! [`create_product`] assembles the showroom piece: a chair with a cushion
//! and a flower standing on the seat. Every part is a labeled mesh so it can
//! be looked up by name, and the root carries the sway parameters an
//! animation loop reads.

use std::f32::consts::{FRAC_PI_2, TAU};

use crate::gfx::{
    geometry::Geometry,
    resources::material::{Color, Material},
    scene::{
        node::{AnimationDescriptor, Group, Node, NodeId},
        scene::Scene,
    },
};

pub const PRODUCT_NAME: &str = "Product";
pub const PETAL_COUNT: usize = 8;

// Material ids live under their own prefix so caller materials are left alone
const CHAIR_WOOD: &str = "Product/Chair Wood";
const CHAIR_CUSHION: &str = "Product/Chair Cushion";
const FLOWER_STEM: &str = "Product/Flower Stem";
const FLOWER_CENTER: &str = "Product/Flower Center";
const FLOWER_PETAL: &str = "Product/Flower Petal";

/// Distance of the petals from the stem axis
const PETAL_RADIUS: f32 = 0.3;

/// Leg corners, in label order
const LEG_POSITIONS: [[f32; 3]; 4] = [
    [-0.8, 0.0, -0.8],
    [0.8, 0.0, -0.8],
    [-0.8, 0.0, 0.8],
    [0.8, 0.0, 0.8],
];

/// Placement angle of petal `index` around the stem, in radians
pub fn petal_angle(index: usize) -> f32 {
    index as f32 / PETAL_COUNT as f32 * TAU
}

fn register_materials(scene: &mut Scene) {
    let materials = [
        (CHAIR_WOOD, 0x8B4513, 0.1, 0.7),
        (CHAIR_CUSHION, 0xFF69B4, 0.1, 0.5),
        (FLOWER_STEM, 0x228B22, 0.1, 0.5),
        (FLOWER_CENTER, 0xFFD700, 0.2, 0.3),
        (FLOWER_PETAL, 0xFF69B4, 0.1, 0.4),
    ];
    for (name, hex, metallic, roughness) in materials {
        if scene.material_manager.get_material(name).is_some() {
            continue;
        }
        scene.add_material(Material::new(name, Color::from_hex(hex), metallic, roughness));
    }
}

fn build_chair(group: &mut Group) {
    group.push(
        Node::mesh("Chair Seat", Geometry::cuboid(2.0, 0.2, 2.0), CHAIR_WOOD)
            .with_position(0.0, 0.5, 0.0),
    );
    group.push(
        Node::mesh("Chair Back", Geometry::cuboid(2.0, 1.5, 0.2), CHAIR_WOOD)
            .with_position(0.0, 1.25, -0.9),
    );

    let leg = Geometry::cylinder(0.1, 0.1, 1.0, 8);
    for (i, [x, y, z]) in LEG_POSITIONS.into_iter().enumerate() {
        let label = format!("Chair Leg {}", i + 1);
        group.push(Node::mesh(&label, leg, CHAIR_WOOD).with_position(x, y, z));
    }

    group.push(
        Node::mesh("Chair Cushion", Geometry::cuboid(1.8, 0.1, 1.8), CHAIR_CUSHION)
            .with_position(0.0, 0.6, 0.0),
    );
}

fn build_flower() -> Node {
    let mut flower = Group::default();

    flower.push(
        Node::mesh("Flower Stem", Geometry::cylinder(0.05, 0.05, 1.0, 8), FLOWER_STEM)
            .with_position(0.0, 0.5, 0.0),
    );
    flower.push(
        Node::mesh("Flower Center", Geometry::sphere(0.2, 16, 16), FLOWER_CENTER)
            .with_position(0.0, 1.0, 0.0),
    );

    // Tipped onto their side, then turned to face away from the stem
    let petal = Geometry::cone(0.2, 0.4, 4);
    for i in 0..PETAL_COUNT {
        let angle = petal_angle(i);
        let label = format!("Flower Petal {}", i + 1);
        flower.push(
            Node::mesh(&label, petal, FLOWER_PETAL)
                .with_position(angle.cos() * PETAL_RADIUS, 1.0, angle.sin() * PETAL_RADIUS)
                .with_rotation(FRAC_PI_2, 0.0, angle),
        );
    }

    Node::from_group("Flower", flower).with_position(0.0, 0.5, 0.0)
}

/// Builds the chair and flower, adds them to `scene` and returns the root id
///
/// Every mesh under the root casts and receives shadows, and the root's
/// `user_data.animation` holds a fresh [`AnimationDescriptor`].
pub fn create_product(scene: &mut Scene) -> NodeId {
    register_materials(scene);

    let mut product = Group::default();
    build_chair(&mut product);
    product.push(build_flower());

    let mut root = Node::from_group(PRODUCT_NAME, product);
    root.traverse_mut(&mut |node| {
        if let Some(mesh) = node.as_mesh_mut() {
            mesh.cast_shadow = true;
            mesh.receive_shadow = true;
        }
    });
    root.user_data.animation = Some(AnimationDescriptor::new(1.0, 0.05));

    log::info!("Created product with {} meshes", root.mesh_count());
    scene.add(root)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::f32::consts::PI;

    fn product(scene: &mut Scene) -> &Node {
        let id = create_product(scene);
        scene.node(id).unwrap()
    }

    fn mesh_labels(root: &Node) -> Vec<String> {
        let mut labels = Vec::new();
        root.traverse(&mut |node| {
            if node.as_mesh().is_some() {
                labels.push(node.name.clone());
            }
        });
        labels
    }

    #[test]
    fn test_product_has_seventeen_uniquely_labeled_meshes() {
        let mut scene = Scene::new();
        let root = product(&mut scene);
        let labels = mesh_labels(root);

        assert_eq!(labels.len(), 17);
        assert!(labels.iter().all(|label| !label.is_empty()));
        assert_eq!(labels.iter().collect::<HashSet<_>>().len(), 17);

        let count = |prefix: &str| labels.iter().filter(|l| l.starts_with(prefix)).count();
        assert_eq!(count("Chair Leg "), 4);
        assert_eq!(count("Flower Petal "), 8);
        for name in ["Chair Seat", "Chair Back", "Chair Cushion", "Flower Stem", "Flower Center"] {
            assert!(root.find_by_name(name).is_some(), "missing {}", name);
        }
    }

    #[test]
    fn test_every_mesh_casts_and_receives_shadows() {
        let mut scene = Scene::new();
        let root = product(&mut scene);
        root.traverse(&mut |node| {
            if let Some(mesh) = node.as_mesh() {
                assert!(mesh.cast_shadow && mesh.receive_shadow, "{}", node.name);
            }
        });
    }

    #[test]
    fn test_petals_are_evenly_spaced() {
        let mut scene = Scene::new();
        let root = product(&mut scene);

        for i in 0..PETAL_COUNT {
            let petal = root.find_by_name(&format!("Flower Petal {}", i + 1)).unwrap();
            let expected = i as f32 / 8.0 * 2.0 * PI;
            let position = petal.transform.position;

            assert!((petal.transform.rotation.z - expected).abs() < 1e-6);
            assert!((petal.transform.rotation.x - PI / 2.0).abs() < 1e-6);
            assert!((position.x - expected.cos() * 0.3).abs() < 1e-6);
            assert!((position.z - expected.sin() * 0.3).abs() < 1e-6);
            assert_eq!(position.y, 1.0);
        }

        assert!((petal_angle(4) - petal_angle(0) - PI).abs() < 1e-6);
        let first = root.find_by_name("Flower Petal 1").unwrap().transform.position;
        let fifth = root.find_by_name("Flower Petal 5").unwrap().transform.position;
        assert!((first.x + fifth.x).abs() < 1e-6);
        assert!((first.z + fifth.z).abs() < 1e-6);
    }

    #[test]
    fn test_fresh_animation_descriptor() {
        let mut scene = Scene::new();
        let root = product(&mut scene);
        assert_eq!(
            root.user_data.animation,
            Some(AnimationDescriptor {
                time: 0.0,
                speed: 1.0,
                amplitude: 0.05,
            })
        );
    }

    #[test]
    fn test_chair_layout_and_materials() {
        let mut scene = Scene::new();
        let id = create_product(&mut scene);
        let root = scene.node(id).unwrap();

        let back = root.find_by_name("Chair Back").unwrap();
        assert_eq!(back.transform.position, cgmath::Vector3::new(0.0, 1.25, -0.9));
        assert_eq!(
            back.as_mesh().unwrap().geometry,
            Geometry::cuboid(2.0, 1.5, 0.2)
        );

        let leg = root.find_by_name("Chair Leg 2").unwrap();
        assert_eq!(leg.transform.position, cgmath::Vector3::new(0.8, 0.0, -0.8));
        assert_eq!(leg.as_mesh().unwrap().material, CHAIR_WOOD);

        let flower = root.find_by_name("Flower").unwrap();
        assert!(flower.is_group());
        assert_eq!(flower.transform.position.y, 0.5);

        let cushion = root.find_by_name("Chair Cushion").unwrap().as_mesh().unwrap();
        let material = scene.material_manager.get_material(&cushion.material).unwrap();
        assert_eq!(material.color, Color::from_hex(0xFF69B4));
        assert_eq!(material.roughness, 0.5);
        assert_eq!(scene.material_manager.len(), 5);
    }

    #[test]
    fn test_caller_materials_are_not_replaced() {
        let mut scene = Scene::new();
        let mine = Material::new("Chair Cushion", Color::from_hex(0x0000FF), 0.9, 0.1);
        scene.add_material(mine.clone());
        let tinted = Material::new(CHAIR_WOOD, Color::from_hex(0x123456), 0.0, 1.0);
        scene.add_material(tinted.clone());

        create_product(&mut scene);

        assert_eq!(scene.material_manager.get_material("Chair Cushion"), Some(&mine));
        assert_eq!(scene.material_manager.get_material(CHAIR_WOOD), Some(&tinted));
        assert_eq!(scene.material_manager.len(), 6);
    }

    #[test]
    fn test_two_products_are_independent() {
        let mut scene = Scene::new();
        let first = create_product(&mut scene);
        let second = create_product(&mut scene);

        assert_ne!(first, second);
        assert_eq!(scene.children.len(), 2);
        assert_eq!(scene.node(first).unwrap().mesh_count(), 17);
        assert_eq!(scene.node(second).unwrap().mesh_count(), 17);

        let mut ids = HashSet::new();
        scene.traverse(&mut |node| {
            assert!(ids.insert(node.id()));
        });
    }
}
