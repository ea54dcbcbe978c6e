//! # Decorative Layouts
//!
//! Client-only arrangements for ambient clusters. The shape is selected by
//! the first draw of the layout stream, a child stream of the cluster seed
//! at [`LAYOUT_STREAM_INDEX`]. The cluster planner consumes the cluster
//! stream itself, so the shape is independent of the drawn kind:
//!
//! | roll          | shape    |
//! |---------------|----------|
//! | `< 0.15`      | hex grid |
//! | `< 0.35`      | ring     |
//! | `< 0.50`      | arc      |
//! | otherwise     | scatter  |
//!
//! Layouts never affect gameplay, but two clients looking at the same region
//! must still see the same picture, so the thresholds are fixed.

use super::{Generator, Point, SpawnConfig};
use crate::{derive_child_stream, MorphogenError, MorphogenResult, RandomStream, SeedSource};
use log::debug;
use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_PI_3, TAU};

/// Child index of the layout stream under a cluster seed.
pub const LAYOUT_STREAM_INDEX: u32 = 0x4C41_594F;

/// Upper roll bound selecting a hex grid.
pub const HEX_GRID_THRESHOLD: f64 = 0.15;
/// Upper roll bound selecting a ring.
pub const RING_THRESHOLD: f64 = 0.35;
/// Upper roll bound selecting an arc.
pub const ARC_THRESHOLD: f64 = 0.50;

/// Axial hex directions in ring-walk order.
const HEX_DIRECTIONS: [(i32, i32); 6] = [(1, 0), (1, -1), (0, -1), (-1, 0), (-1, 1), (0, 1)];

/// Geometric arrangement of a decorative cluster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutShape {
    /// Center cell plus rings of six neighbours at a fixed spacing
    HexGrid,
    /// Evenly spaced points on one circle
    Ring,
    /// Points along a vertical bow
    Arc,
    /// Independent angle and distance per point
    Scatter,
}

impl LayoutShape {
    /// Maps a unit-interval roll to a shape.
    pub fn from_roll(roll: f64) -> Self {
        if roll < HEX_GRID_THRESHOLD {
            LayoutShape::HexGrid
        } else if roll < RING_THRESHOLD {
            LayoutShape::Ring
        } else if roll < ARC_THRESHOLD {
            LayoutShape::Arc
        } else {
            LayoutShape::Scatter
        }
    }
}

/// Resolved decorative geometry, as offsets from the cluster origin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutPlan {
    pub shape: LayoutShape,
    /// Number of points the caller asked for
    pub requested: u32,
    pub points: Vec<Point>,
}

impl LayoutPlan {
    /// Creates a layout with no points.
    pub fn empty() -> Self {
        Self {
            shape: LayoutShape::Scatter,
            requested: 0,
            points: Vec::new(),
        }
    }
}

/// Plans decorative client-side layouts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecorativeLayoutPlanner {
    /// Number of points requested
    pub count: u32,
}

impl DecorativeLayoutPlanner {
    /// Creates a planner for `count` points.
    pub fn new(count: u32) -> Self {
        Self { count }
    }

    fn hex_grid(&self, config: &SpawnConfig, stream: &mut RandomStream) -> Vec<Point> {
        let rotation = stream.next_f64() * FRAC_PI_3;
        let (sin, cos) = rotation.sin_cos();
        let count = self.count as usize;

        let mut cells = vec![(0, 0)];
        let mut ring = 1;
        while cells.len() < count {
            let (mut q, mut r) = (-ring, ring);
            for (dq, dr) in HEX_DIRECTIONS {
                for _ in 0..ring {
                    cells.push((q, r));
                    q += dq;
                    r += dr;
                }
            }
            ring += 1;
        }
        cells.truncate(count);

        cells
            .into_iter()
            .map(|(q, r)| {
                let x = (f64::from(q) + f64::from(r) * 0.5) * config.hex_spacing;
                let y = f64::from(r) * (3.0_f64.sqrt() * 0.5) * config.hex_spacing;
                Point::new(x * cos - y * sin, x * sin + y * cos)
            })
            .collect()
    }

    fn ring(&self, config: &SpawnConfig, stream: &mut RandomStream) -> Vec<Point> {
        let radius = config.ring_min_radius + stream.next_f64() * config.ring_radius_spread;
        let phase = stream.next_f64() * TAU;
        let step = TAU / f64::from(self.count);

        (0..self.count)
            .map(|index| Point::from_polar(phase + step * f64::from(index), radius))
            .collect()
    }

    fn arc(&self, config: &SpawnConfig, stream: &mut RandomStream) -> Vec<Point> {
        let count = self.count.max(config.arc_min_count);
        let bend = (stream.next_f64() * 2.0 - 1.0) * config.arc_max_bend;

        (0..count)
            .map(|index| {
                let t = if count > 1 {
                    f64::from(index) / f64::from(count - 1)
                } else {
                    0.5
                };
                let x = bend * 4.0 * t * (1.0 - t);
                let y = (t - 0.5) * config.arc_height;
                Point::new(x, y)
            })
            .collect()
    }

    fn scatter(&self, config: &SpawnConfig, stream: &mut RandomStream) -> Vec<Point> {
        (0..self.count)
            .map(|_| {
                let angle = stream.next_f64() * TAU;
                let distance = config.scatter_min + stream.next_f64() * config.scatter_radius;
                Point::from_polar(angle, distance)
            })
            .collect()
    }
}

impl Generator<LayoutPlan> for DecorativeLayoutPlanner {
    fn generate(&self, config: &SpawnConfig, stream: &mut RandomStream) -> LayoutPlan {
        if self.count == 0 {
            return LayoutPlan::empty();
        }

        let shape = LayoutShape::from_roll(stream.next_f64());
        let points = match shape {
            LayoutShape::HexGrid => self.hex_grid(config, stream),
            LayoutShape::Ring => self.ring(config, stream),
            LayoutShape::Arc => self.arc(config, stream),
            LayoutShape::Scatter => self.scatter(config, stream),
        };

        debug!(
            "Planned {:?} layout with {} points from seed {}",
            shape,
            points.len(),
            stream.seed()
        );

        LayoutPlan {
            shape,
            requested: self.count,
            points,
        }
    }

    fn validate(&self, layout: &LayoutPlan, config: &SpawnConfig) -> MorphogenResult<()> {
        let expected = match layout.shape {
            LayoutShape::Arc if self.count > 0 => self.count.max(config.arc_min_count),
            _ => self.count,
        };
        if layout.points.len() != expected as usize {
            return Err(MorphogenError::GenerationFailed(format!(
                "{:?} layout has {} points, expected {}",
                layout.shape,
                layout.points.len(),
                expected
            )));
        }

        if layout.shape == LayoutShape::Ring {
            // Allow for rounding in the polar conversion
            let floor = config.ring_min_radius - 1e-9;
            if let Some(point) = layout.points.iter().find(|point| point.length() < floor) {
                return Err(MorphogenError::GenerationFailed(format!(
                    "ring point {:?} is inside the minimum radius {}",
                    point, config.ring_min_radius
                )));
            }
        }

        Ok(())
    }

    fn generator_type(&self) -> &'static str {
        "DecorativeLayoutPlanner"
    }
}

/// Plans a decorative layout for `count` points from a cluster seed.
///
/// Draws from the layout child stream of `seed`, never from the stream the
/// cluster planner uses.
///
/// # Examples
///
/// ```
/// use morphogen::{plan_decorative_layout, SpawnConfig};
///
/// let config = SpawnConfig::default();
/// let a = plan_decorative_layout(99_u32, 6, &config);
/// let b = plan_decorative_layout(99_u32, 6, &config);
/// assert_eq!(a, b);
/// ```
pub fn plan_decorative_layout<S: SeedSource>(seed: S, count: u32, config: &SpawnConfig) -> LayoutPlan {
    let mut stream = derive_child_stream(seed, LAYOUT_STREAM_INDEX);
    DecorativeLayoutPlanner::new(count).generate(config, &mut stream)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{plan_organic_cluster, ClusterOptions, SpawnKind};
    use std::collections::HashSet;

    /// Finds a cluster seed whose layout roll selects the wanted shape.
    fn seed_for(shape: LayoutShape) -> u32 {
        (1..10_000_u32)
            .find(|&seed| {
                let roll = derive_child_stream(seed, LAYOUT_STREAM_INDEX).next_f64();
                LayoutShape::from_roll(roll) == shape
            })
            .expect("some seed selects every shape")
    }

    #[test]
    fn test_shape_thresholds() {
        assert_eq!(LayoutShape::from_roll(0.0), LayoutShape::HexGrid);
        assert_eq!(LayoutShape::from_roll(0.1499), LayoutShape::HexGrid);
        assert_eq!(LayoutShape::from_roll(0.15), LayoutShape::Ring);
        assert_eq!(LayoutShape::from_roll(0.35), LayoutShape::Arc);
        assert_eq!(LayoutShape::from_roll(0.5), LayoutShape::Scatter);
        assert_eq!(LayoutShape::from_roll(0.99), LayoutShape::Scatter);
    }

    #[test]
    fn test_shape_is_independent_of_cluster_kind() {
        let config = SpawnConfig::default();
        let options = ClusterOptions::new(10, 20.0, 70.0);
        let mut shapes = HashSet::new();

        for seed in 1..2_000_u32 {
            let plan = plan_organic_cluster(seed, &options, &config);
            if plan.entries[0].appearance.kind == SpawnKind::Mineral {
                shapes.insert(plan_decorative_layout(seed, plan.size, &config).shape);
            }
        }

        assert!(shapes.len() > 1, "mineral clusters only got {:?}", shapes);
        assert!(shapes.contains(&LayoutShape::HexGrid));
    }

    #[test]
    fn test_layout_stream_is_not_cluster_stream() {
        let seed = 1337_u32;
        let mut layout = derive_child_stream(seed, LAYOUT_STREAM_INDEX);
        let mut cluster = RandomStream::new(seed);
        assert_ne!(layout.next_u32(), cluster.next_u32());
    }

    #[test]
    fn test_zero_count_is_empty() {
        let layout = plan_decorative_layout(5_u32, 0, &SpawnConfig::default());
        assert!(layout.points.is_empty());
    }

    #[test]
    fn test_hex_grid_has_six_neighbours_at_spacing() {
        let config = SpawnConfig::default();
        let layout = plan_decorative_layout(seed_for(LayoutShape::HexGrid), 7, &config);

        assert_eq!(layout.shape, LayoutShape::HexGrid);
        assert_eq!(layout.points.len(), 7);
        assert_eq!(layout.points[0], Point::origin());
        for point in &layout.points[1..] {
            assert!((point.length() - config.hex_spacing).abs() < 1e-9);
        }
    }

    #[test]
    fn test_hex_grid_second_ring() {
        let config = SpawnConfig::default();
        let layout = plan_decorative_layout(seed_for(LayoutShape::HexGrid), 19, &config);
        assert_eq!(layout.points.len(), 19);
        assert!(layout.points[7..]
            .iter()
            .all(|point| point.length() > config.hex_spacing * 1.5));
    }

    #[test]
    fn test_ring_respects_radius_floor() {
        let config = SpawnConfig::default();
        let seed = seed_for(LayoutShape::Ring);
        let layout = plan_decorative_layout(seed, 8, &config);

        assert_eq!(layout.shape, LayoutShape::Ring);
        let radius = layout.points[0].length();
        assert!(radius >= config.ring_min_radius - 1e-9);
        assert!(radius <= config.ring_min_radius + config.ring_radius_spread + 1e-9);
        for point in &layout.points {
            assert!((point.length() - radius).abs() < 1e-9);
        }
        assert!(DecorativeLayoutPlanner::new(8).validate(&layout, &config).is_ok());
    }

    #[test]
    fn test_arc_enforces_minimum_count() {
        let config = SpawnConfig::default();
        let layout = plan_decorative_layout(seed_for(LayoutShape::Arc), 2, &config);

        assert_eq!(layout.shape, LayoutShape::Arc);
        assert_eq!(layout.requested, 2);
        assert_eq!(layout.points.len(), config.arc_min_count as usize);
        assert!(DecorativeLayoutPlanner::new(2).validate(&layout, &config).is_ok());

        let top = layout.points.first().unwrap();
        let bottom = layout.points.last().unwrap();
        assert_eq!(top.y, -config.arc_height / 2.0);
        assert_eq!(bottom.y, config.arc_height / 2.0);
    }

    #[test]
    fn test_scatter_stays_in_band() {
        let config = SpawnConfig::default();
        let layout = plan_decorative_layout(seed_for(LayoutShape::Scatter), 12, &config);
        for point in &layout.points {
            let length = point.length();
            assert!(length >= config.scatter_min - 1e-9);
            assert!(length <= config.scatter_min + config.scatter_radius + 1e-9);
        }
    }

    #[test]
    fn test_identical_seed_identical_geometry() {
        let config = SpawnConfig::dense();
        for seed in 1..100_u32 {
            assert_eq!(
                plan_decorative_layout(seed, 9, &config),
                plan_decorative_layout(seed, 9, &config)
            );
        }
    }

    #[test]
    fn test_validate_rejects_wrong_point_count() {
        let config = SpawnConfig::default();
        let mut layout = plan_decorative_layout(seed_for(LayoutShape::Scatter), 4, &config);
        layout.points.pop();
        assert!(DecorativeLayoutPlanner::new(4).validate(&layout, &config).is_err());
    }
}
