//! # Cluster Spawn Planning
//!
//! Turns a region seed and a capacity budget into a batch of placement and
//! appearance descriptors.
//!
//! The planner draws from one stream in a fixed order:
//! 1. The spawn kind, unless one is forced
//! 2. The raw cluster size, unless one is forced, clamped to the budget
//! 3. For every entry: scatter angle, scatter distance, delay factor and
//!    appearance seed
//!
//! Reordering any of these draws changes every plan already agreed on by
//! rooms and clients.

use super::{sanitize_distance, Generator, Point, SpawnConfig, SpawnKind, ORGANIC_MATTER};
use crate::{to_seed_value, MorphogenError, MorphogenResult, RandomStream, SeedSource};
use log::debug;
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

/// Caller-supplied inputs for one cluster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterOptions {
    /// Entities the room may still spawn
    pub remaining: u32,
    /// Inner scatter radius
    pub scatter_min: f64,
    /// Width of the scatter band beyond the inner radius
    pub scatter_radius: f64,
    /// Spawn this kind instead of drawing one
    #[serde(default)]
    pub forced_kind: Option<SpawnKind>,
    /// Spawn this many (still clamped to `remaining`) instead of drawing
    #[serde(default)]
    pub forced_size: Option<u32>,
    /// Kinds eligible for the kind draw
    #[serde(default = "default_allowed_kinds")]
    pub allowed_kinds: Vec<SpawnKind>,
}

fn default_allowed_kinds() -> Vec<SpawnKind> {
    ORGANIC_MATTER.to_vec()
}

impl ClusterOptions {
    /// Creates options with the given budget and scatter band.
    ///
    /// # Examples
    ///
    /// ```
    /// use morphogen::ClusterOptions;
    ///
    /// let options = ClusterOptions::new(10, 20.0, 70.0);
    /// assert_eq!(options.remaining, 10);
    /// assert!(options.forced_kind.is_none());
    /// ```
    pub fn new(remaining: u32, scatter_min: f64, scatter_radius: f64) -> Self {
        Self {
            remaining,
            scatter_min,
            scatter_radius,
            forced_kind: None,
            forced_size: None,
            allowed_kinds: default_allowed_kinds(),
        }
    }

    /// Creates options using the scatter band from a spawn configuration.
    pub fn from_config(remaining: u32, config: &SpawnConfig) -> Self {
        Self::new(remaining, config.scatter_min, config.scatter_radius)
    }

    /// Forces the spawn kind.
    pub fn with_kind(mut self, kind: SpawnKind) -> Self {
        self.forced_kind = Some(kind);
        self
    }

    /// Forces the cluster size.
    pub fn with_size(mut self, size: u32) -> Self {
        self.forced_size = Some(size);
        self
    }

    /// Restricts the kinds eligible for the kind draw.
    pub fn with_allowed_kinds(mut self, kinds: &[SpawnKind]) -> Self {
        self.allowed_kinds = kinds.to_vec();
        self
    }
}

/// Appearance descriptor broadcast for one planned entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appearance {
    /// Kind of entity to materialize
    #[serde(rename = "type")]
    pub kind: SpawnKind,
    /// Per-entity seed for materialization
    pub seed: u32,
    /// Normalized seed of the cluster this entity belongs to
    pub cluster_seed: u32,
    /// Position of this entity in its cluster
    pub cluster_index: u32,
}

/// Placement of one entity relative to the cluster origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterEntry {
    /// Direction from the origin, in `[0, 2π)`
    pub scatter_angle: f64,
    /// Distance from the origin, in `[scatterMin, scatterMin + scatterRadius]`
    pub scatter_distance: f64,
    /// Fraction of the spawn window to wait before appearing, in `[0, 1)`
    pub delay_factor: f64,
    pub appearance: Appearance,
}

impl ClusterEntry {
    /// Converts the scatter angle and distance to a cartesian offset.
    pub fn offset(&self) -> Point {
        Point::from_polar(self.scatter_angle, self.scatter_distance)
    }
}

/// A deterministic batch of spawn descriptors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterPlan {
    pub size: u32,
    pub entries: Vec<ClusterEntry>,
}

impl ClusterPlan {
    /// Creates a plan with nothing to spawn.
    pub fn empty() -> Self {
        Self {
            size: 0,
            entries: Vec::new(),
        }
    }

    /// Checks whether there is nothing to spawn.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Gets the normalized seed shared by every entry, if any.
    pub fn cluster_seed(&self) -> Option<u32> {
        self.entries.first().map(|entry| entry.appearance.cluster_seed)
    }
}

/// Plans organic-matter clusters.
#[derive(Debug, Clone)]
pub struct ClusterSpawnPlanner {
    pub options: ClusterOptions,
}

impl ClusterSpawnPlanner {
    /// Creates a planner for the given options.
    pub fn new(options: ClusterOptions) -> Self {
        Self { options }
    }

    /// Draws or applies the forced spawn kind.
    fn choose_kind(&self, stream: &mut RandomStream) -> Option<SpawnKind> {
        match self.options.forced_kind {
            Some(kind) => Some(kind),
            None => stream.pick(&self.options.allowed_kinds).copied(),
        }
    }

    /// Draws or applies the forced size, then clamps it to the budget.
    fn choose_size(&self, config: &SpawnConfig, stream: &mut RandomStream) -> u32 {
        let raw = match self.options.forced_size {
            Some(size) => size,
            None => {
                let min = config.cluster_min_size;
                let max = config.cluster_max_size.max(min);
                let span = f64::from(max - min) + 1.0;
                min + (stream.next_f64() * span).floor() as u32
            }
        };
        raw.clamp(1, self.options.remaining)
    }
}

impl Generator<ClusterPlan> for ClusterSpawnPlanner {
    fn generate(&self, config: &SpawnConfig, stream: &mut RandomStream) -> ClusterPlan {
        if self.options.remaining == 0 {
            return ClusterPlan::empty();
        }

        let kind = match self.choose_kind(stream) {
            Some(kind) => kind,
            None => return ClusterPlan::empty(),
        };
        let size = self.choose_size(config, stream);

        let scatter_min = sanitize_distance(self.options.scatter_min);
        let scatter_radius = sanitize_distance(self.options.scatter_radius);
        let cluster_seed = stream.seed();

        let entries = (0..size)
            .map(|index| {
                let scatter_angle = stream.next_f64() * TAU;
                let scatter_distance = scatter_min + stream.next_f64() * scatter_radius;
                let delay_factor = stream.next_f64();
                let seed = to_seed_value(stream.next_f64());

                ClusterEntry {
                    scatter_angle,
                    scatter_distance,
                    delay_factor,
                    appearance: Appearance {
                        kind,
                        seed,
                        cluster_seed,
                        cluster_index: index,
                    },
                }
            })
            .collect();

        debug!(
            "Planned cluster of {} {} from seed {} ({} draws)",
            size,
            kind,
            cluster_seed,
            stream.draws()
        );

        ClusterPlan { size, entries }
    }

    fn validate(&self, plan: &ClusterPlan, _config: &SpawnConfig) -> MorphogenResult<()> {
        let fail = |reason: String| Err(MorphogenError::GenerationFailed(reason));

        if plan.entries.len() != plan.size as usize {
            return fail(format!(
                "plan size {} does not match {} entries",
                plan.size,
                plan.entries.len()
            ));
        }
        if plan.size > self.options.remaining {
            return fail(format!(
                "plan size {} exceeds remaining capacity {}",
                plan.size, self.options.remaining
            ));
        }

        // Only zero capacity or an empty kind registry may produce nothing
        let can_spawn = self.options.remaining > 0
            && (self.options.forced_kind.is_some() || !self.options.allowed_kinds.is_empty());
        if can_spawn && plan.is_empty() {
            return fail(format!(
                "empty plan with remaining capacity {}",
                self.options.remaining
            ));
        }
        if let (Some(size), true) = (self.options.forced_size, can_spawn) {
            if plan.size != size.clamp(1, self.options.remaining) {
                return fail(format!("plan size {} ignores forced size {}", plan.size, size));
            }
        }

        let scatter_min = sanitize_distance(self.options.scatter_min);
        let scatter_max = scatter_min + sanitize_distance(self.options.scatter_radius);
        let cluster_seed = plan.cluster_seed();

        for (position, entry) in plan.entries.iter().enumerate() {
            let appearance = &entry.appearance;
            if appearance.cluster_index as usize != position {
                return fail(format!(
                    "entry {} carries cluster index {}",
                    position, appearance.cluster_index
                ));
            }
            if Some(appearance.cluster_seed) != cluster_seed {
                return fail(format!("entry {} has a foreign cluster seed", position));
            }
            if let Some(kind) = self.options.forced_kind {
                if appearance.kind != kind {
                    return fail(format!("entry {} is {} instead of {}", position, appearance.kind, kind));
                }
            } else if !self.options.allowed_kinds.contains(&appearance.kind) {
                return fail(format!("entry {} has disallowed kind {}", position, appearance.kind));
            }
            if !(0.0..TAU).contains(&entry.scatter_angle) {
                return fail(format!("entry {} angle {} out of range", position, entry.scatter_angle));
            }
            if !(scatter_min..=scatter_max).contains(&entry.scatter_distance) {
                return fail(format!(
                    "entry {} distance {} outside [{}, {}]",
                    position, entry.scatter_distance, scatter_min, scatter_max
                ));
            }
            if !(0.0..1.0).contains(&entry.delay_factor) {
                return fail(format!("entry {} delay {} out of range", position, entry.delay_factor));
            }
        }

        Ok(())
    }

    fn generator_type(&self) -> &'static str {
        "ClusterSpawnPlanner"
    }
}

/// Plans one organic-matter cluster from a region seed.
///
/// # Examples
///
/// ```
/// use morphogen::{normalize_seed, plan_organic_cluster, ClusterOptions, SpawnConfig};
///
/// let options = ClusterOptions::new(10, 20.0, 70.0);
/// let plan = plan_organic_cluster(1337_u32, &options, &SpawnConfig::default());
///
/// assert!(plan.size >= 1 && plan.size <= 10);
/// assert_eq!(plan.entries.len(), plan.size as usize);
/// assert_eq!(plan.cluster_seed(), Some(normalize_seed(1337_u32)));
/// ```
pub fn plan_organic_cluster<S: SeedSource>(
    seed: S,
    options: &ClusterOptions,
    config: &SpawnConfig,
) -> ClusterPlan {
    let mut stream = RandomStream::new(seed);
    ClusterSpawnPlanner::new(options.clone()).generate(config, &mut stream)
}
