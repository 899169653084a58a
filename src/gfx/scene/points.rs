use rand::Rng;

use crate::config::StarfieldConfig;
use crate::gfx::resources::material::PointsMaterial;

/// Point cloud leaf: a flat `[x, y, z, x, y, z, ...]` position buffer
/// drawn as camera-facing squares
#[derive(Debug, Clone)]
pub struct Points {
    positions: Vec<f32>,
    pub material: PointsMaterial,
}

impl Points {
    /// Wraps a flat position buffer; a trailing partial triple is dropped
    pub fn new(mut positions: Vec<f32>, material: PointsMaterial) -> Self {
        let whole = positions.len() - positions.len() % 3;
        positions.truncate(whole);
        Self {
            positions,
            material,
        }
    }

    /// Uniformly scattered stars in a cube of side `config.extent` around the origin
    pub fn starfield(rng: &mut impl Rng, config: &StarfieldConfig) -> Self {
        let positions = (0..config.count * 3)
            .map(|_| (rng.random::<f32>() - 0.5) * config.extent)
            .collect();
        Self::new(positions, PointsMaterial::new(config.color, config.size))
    }

    pub fn positions(&self) -> &[f32] {
        &self.positions
    }

    pub fn len(&self) -> usize {
        self.positions.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = [f32; 3]> + '_ {
        self.positions.chunks_exact(3).map(|p| [p[0], p[1], p[2]])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::resources::material::Color;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn test_starfield_stays_inside_cube() {
        let mut rng = StdRng::seed_from_u64(7);
        let stars = Points::starfield(&mut rng, &StarfieldConfig::default());

        assert_eq!(stars.len(), 5000);
        assert_eq!(stars.positions().len(), 15000);
        assert!(stars.positions().iter().all(|c| (-100.0..=100.0).contains(c)));
        assert_eq!(stars.material, PointsMaterial::new(Color::WHITE, 0.1));
    }

    #[test]
    fn test_starfield_spreads_over_every_axis() {
        let mut rng = StdRng::seed_from_u64(42);
        let stars = Points::starfield(&mut rng, &StarfieldConfig::default());

        for axis in 0..3 {
            let (min, max) = stars
                .iter()
                .map(|p| p[axis])
                .fold((f32::MAX, f32::MIN), |(lo, hi), c| (lo.min(c), hi.max(c)));
            assert!(min < -90.0 && max > 90.0, "axis {} spans {}..{}", axis, min, max);
        }
    }

    #[test]
    fn test_partial_triples_are_dropped() {
        let points = Points::new(vec![1.0, 2.0, 3.0, 4.0], PointsMaterial::new(Color::WHITE, 1.0));
        assert_eq!(points.len(), 1);
        assert_eq!(points.iter().collect::<Vec<_>>(), [[1.0, 2.0, 3.0]]);
    }
}
