//! # Entity Materialization
//!
//! Turns a spawn kind plus a seed stream into concrete visual and physical
//! attributes.
//!
//! Attributes are drawn in a fixed order: size, velocity x, velocity y,
//! color, shape, rotation, rotation speed, pulse phase. An overridden
//! attribute is taken as given and its draw is skipped. On a shared stream
//! that shifts every later attribute relative to a caller without the
//! override, so callers that mix overridden and generated entities should
//! use [`EntityFactory::materialize_keyed`], which draws each attribute from
//! its own child stream.

use super::{Appearance, ClusterEntry, Point, Shape, SpawnKind};
use crate::{derive_child_stream, RandomStream};
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

/// Rotation speed bound, in radians per tick.
pub const DEFAULT_MAX_ROTATION_SPEED: f64 = 0.05;

/// Color used if a catalog palette were ever empty.
const FALLBACK_COLOR: &str = "#ffffff";

/// Drift velocity of a spawned entity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Velocity {
    pub x: f64,
    pub y: f64,
}

/// Attributes a caller may pin instead of generating.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EntityOverrides {
    pub size: Option<f64>,
    pub velocity: Option<Velocity>,
    pub color: Option<String>,
    pub shape: Option<Shape>,
    pub rotation: Option<f64>,
    pub rotation_speed: Option<f64>,
    pub pulse_phase: Option<f64>,
}

impl EntityOverrides {
    /// Creates an empty override set.
    pub fn none() -> Self {
        Self::default()
    }

    /// Pins the size.
    pub fn with_size(mut self, size: f64) -> Self {
        self.size = Some(size);
        self
    }

    /// Pins the color.
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Pins the velocity.
    pub fn with_velocity(mut self, x: f64, y: f64) -> Self {
        self.velocity = Some(Velocity { x, y });
        self
    }
}

/// A fully materialized entity ready for rendering and physics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterializedEntity {
    #[serde(rename = "type")]
    pub kind: SpawnKind,
    pub size: f64,
    pub velocity: Velocity,
    pub color: String,
    pub shape: Shape,
    pub rotation: f64,
    pub rotation_speed: f64,
    pub pulse_phase: f64,
}

impl MaterializedEntity {
    /// World position of this entity for a cluster spawned at `origin`.
    pub fn position(origin: Point, entry: &ClusterEntry) -> Point {
        origin + entry.offset()
    }
}

/// Attribute slots, in draw order. The discriminant is the child index used
/// by the keyed path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Attribute {
    Size = 1,
    Velocity = 2,
    Color = 3,
    Shape = 4,
    Rotation = 5,
    RotationSpeed = 6,
    PulsePhase = 7,
}

const ATTRIBUTE_COUNT: usize = 8;

/// Materializes entities from catalog descriptors.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityFactory {
    /// Largest spin in either direction
    pub max_rotation_speed: f64,
}

impl Default for EntityFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityFactory {
    /// Creates a factory with the default rotation bound.
    pub fn new() -> Self {
        Self {
            max_rotation_speed: DEFAULT_MAX_ROTATION_SPEED,
        }
    }

    /// Materializes one entity from a shared stream.
    ///
    /// # Examples
    ///
    /// ```
    /// use morphogen::{EntityFactory, EntityOverrides, RandomStream, SpawnKind};
    ///
    /// let factory = EntityFactory::new();
    /// let mut stream = RandomStream::new(42_u32);
    /// let entity = factory.materialize(SpawnKind::Protein, &mut stream, &EntityOverrides::none());
    ///
    /// let descriptor = SpawnKind::Protein.descriptor();
    /// assert!(entity.size >= descriptor.min_size && entity.size <= descriptor.max_size);
    /// ```
    pub fn materialize(
        &self,
        kind: SpawnKind,
        stream: &mut RandomStream,
        overrides: &EntityOverrides,
    ) -> MaterializedEntity {
        self.build(kind, overrides, |_| stream.next_f64())
    }

    /// Materializes the entity described by a broadcast appearance.
    pub fn materialize_appearance(
        &self,
        appearance: &Appearance,
        overrides: &EntityOverrides,
    ) -> MaterializedEntity {
        let mut stream = RandomStream::new(appearance.seed);
        self.materialize(appearance.kind, &mut stream, overrides)
    }

    /// Materializes one entity drawing every attribute from its own child
    /// stream of `seed`, so overrides never shift other attributes.
    pub fn materialize_keyed(
        &self,
        seed: u32,
        kind: SpawnKind,
        overrides: &EntityOverrides,
    ) -> MaterializedEntity {
        let mut streams: [Option<RandomStream>; ATTRIBUTE_COUNT] = Default::default();
        self.build(kind, overrides, |attribute| {
            let slot = attribute as usize;
            streams[slot]
                .get_or_insert_with(|| derive_child_stream(seed, slot as u32))
                .next_f64()
        })
    }

    /// Shared attribute pipeline. `draw` is only called for attributes that
    /// are not overridden.
    fn build<F>(&self, kind: SpawnKind, overrides: &EntityOverrides, mut draw: F) -> MaterializedEntity
    where
        F: FnMut(Attribute) -> f64,
    {
        let descriptor = kind.descriptor();

        let size = overrides.size.unwrap_or_else(|| {
            descriptor.min_size + draw(Attribute::Size) * (descriptor.max_size - descriptor.min_size)
        });

        let velocity = overrides.velocity.unwrap_or_else(|| {
            let x = (draw(Attribute::Velocity) * 2.0 - 1.0) * descriptor.max_speed;
            let y = (draw(Attribute::Velocity) * 2.0 - 1.0) * descriptor.max_speed;
            Velocity { x, y }
        });

        let color = match &overrides.color {
            Some(color) => color.clone(),
            None => pick(descriptor.colors, draw(Attribute::Color))
                .copied()
                .unwrap_or(FALLBACK_COLOR)
                .to_string(),
        };

        let shape = overrides.shape.unwrap_or_else(|| {
            pick(descriptor.shapes, draw(Attribute::Shape))
                .copied()
                .unwrap_or(Shape::Circle)
        });

        let rotation = overrides
            .rotation
            .unwrap_or_else(|| draw(Attribute::Rotation) * TAU);

        let rotation_speed = overrides.rotation_speed.unwrap_or_else(|| {
            (draw(Attribute::RotationSpeed) * 2.0 - 1.0) * self.max_rotation_speed
        });

        let pulse_phase = overrides
            .pulse_phase
            .unwrap_or_else(|| draw(Attribute::PulsePhase) * TAU);

        MaterializedEntity {
            kind,
            size,
            velocity,
            color,
            shape,
            rotation,
            rotation_speed,
            pulse_phase,
        }
    }
}

/// Picks an item with a pre-drawn unit roll.
fn pick<T>(items: &[T], roll: f64) -> Option<&T> {
    if items.is_empty() {
        return None;
    }
    let index = ((roll * items.len() as f64).floor() as usize).min(items.len() - 1);
    items.get(index)
}
