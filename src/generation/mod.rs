//! # Generation Module
//!
//! Procedural world content: organic-matter clusters, decorative layouts and
//! per-entity materialization.
//!
//! The server plans clusters authoritatively and broadcasts only the region
//! seed. Clients replay the same plan (or the subset they can see) locally,
//! so everything here is a pure function of a seed and a [`SpawnConfig`].

pub mod catalog;
pub mod cluster;
pub mod entities;
pub mod layouts;

pub use catalog::*;
pub use cluster::*;
pub use entities::*;
pub use layouts::*;

use crate::config::{
    DEFAULT_CLUSTER_MAX_SIZE, DEFAULT_CLUSTER_MIN_SIZE, DEFAULT_SCATTER_MIN,
    DEFAULT_SCATTER_RADIUS,
};
use crate::{MorphogenError, MorphogenResult, RandomStream};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Tuning for cluster planning and decorative layouts.
///
/// Both sides of a room must agree on this configuration, exactly as they
/// agree on seeds. Rooms normally ship it once at join time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SpawnConfig {
    /// Smallest cluster drawn before capacity clamping
    pub cluster_min_size: u32,
    /// Largest cluster drawn before capacity clamping
    pub cluster_max_size: u32,
    /// Default inner scatter radius
    pub scatter_min: f64,
    /// Default width of the scatter band
    pub scatter_radius: f64,
    /// Distance between neighbouring cells of a hex-grid layout
    pub hex_spacing: f64,
    /// Smallest radius a ring layout may use
    pub ring_min_radius: f64,
    /// Random extra radius added on top of the ring floor
    pub ring_radius_spread: f64,
    /// Minimum number of points in an arc layout
    pub arc_min_count: u32,
    /// Vertical extent of an arc layout
    pub arc_height: f64,
    /// Largest horizontal bow of an arc layout
    pub arc_max_bend: f64,
}

impl SpawnConfig {
    /// Creates the default spawn configuration.
    ///
    /// # Examples
    ///
    /// ```
    /// use morphogen::SpawnConfig;
    ///
    /// let config = SpawnConfig::new();
    /// assert!(config.cluster_min_size >= 1);
    /// assert!(config.cluster_max_size >= config.cluster_min_size);
    /// assert!(config.validate().is_ok());
    /// ```
    pub fn new() -> Self {
        Self {
            cluster_min_size: DEFAULT_CLUSTER_MIN_SIZE,
            cluster_max_size: DEFAULT_CLUSTER_MAX_SIZE,
            scatter_min: DEFAULT_SCATTER_MIN,
            scatter_radius: DEFAULT_SCATTER_RADIUS,
            hex_spacing: 28.0,
            ring_min_radius: 40.0,
            ring_radius_spread: 60.0,
            arc_min_count: 5,
            arc_height: 160.0,
            arc_max_bend: 60.0,
        }
    }

    /// Creates a configuration for testing with small, tight clusters.
    pub fn for_testing() -> Self {
        Self {
            cluster_min_size: 2,
            cluster_max_size: 4,
            scatter_min: 5.0,
            scatter_radius: 10.0,
            hex_spacing: 10.0,
            ring_min_radius: 12.0,
            ring_radius_spread: 8.0,
            arc_min_count: 3,
            arc_height: 40.0,
            arc_max_bend: 10.0,
        }
    }

    /// Creates a configuration for food-rich rooms with large clusters.
    pub fn dense() -> Self {
        Self {
            cluster_min_size: 6,
            cluster_max_size: 14,
            scatter_min: 15.0,
            scatter_radius: 120.0,
            arc_min_count: 8,
            ..Self::new()
        }
    }

    /// Parses a configuration from JSON and validates it.
    pub fn from_json_str(json: &str) -> MorphogenResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads a configuration from a JSON file and validates it.
    pub fn load(path: impl AsRef<Path>) -> MorphogenResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Checks that every value is in range.
    pub fn validate(&self) -> MorphogenResult<()> {
        if self.cluster_min_size == 0 {
            return Err(MorphogenError::InvalidConfig(
                "clusterMinSize must be at least 1".to_string(),
            ));
        }
        if self.cluster_max_size < self.cluster_min_size {
            return Err(MorphogenError::InvalidConfig(format!(
                "clusterMaxSize {} is below clusterMinSize {}",
                self.cluster_max_size, self.cluster_min_size
            )));
        }

        let distances = [
            ("scatterMin", self.scatter_min),
            ("scatterRadius", self.scatter_radius),
            ("hexSpacing", self.hex_spacing),
            ("ringMinRadius", self.ring_min_radius),
            ("ringRadiusSpread", self.ring_radius_spread),
            ("arcHeight", self.arc_height),
            ("arcMaxBend", self.arc_max_bend),
        ];
        for (name, value) in distances {
            if !value.is_finite() || value < 0.0 {
                return Err(MorphogenError::InvalidConfig(format!(
                    "{} must be a finite, non-negative distance (got {})",
                    name, value
                )));
            }
        }

        Ok(())
    }
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// A point or offset in world space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// Creates a new point with the given coordinates.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Returns the origin point (0, 0).
    pub fn origin() -> Self {
        Self::new(0.0, 0.0)
    }

    /// Builds an offset from polar coordinates.
    pub fn from_polar(angle: f64, distance: f64) -> Self {
        Self::new(angle.cos() * distance, angle.sin() * distance)
    }

    /// Calculates the Euclidean length of this point as an offset.
    pub fn length(self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }
}

impl std::ops::Add for Point {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self::new(self.x + other.x, self.y + other.y)
    }
}

/// Trait for procedural generators.
///
/// A generator consumes one stream in a fixed order and produces pure data.
/// `validate` lets a room check content reported by an untrusted peer
/// against the invariants the generator guarantees.
pub trait Generator<T> {
    /// Generates content from the configuration and a fresh stream.
    fn generate(&self, config: &SpawnConfig, stream: &mut RandomStream) -> T;

    /// Validates that generated content meets its invariants.
    fn validate(&self, content: &T, config: &SpawnConfig) -> MorphogenResult<()>;

    /// Gets the generator type name for logging and debugging.
    fn generator_type(&self) -> &'static str;
}

/// Replaces non-finite or negative distances with zero.
pub(crate) fn sanitize_distance(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_spawn_config_presets_are_valid() {
        assert!(SpawnConfig::new().validate().is_ok());
        assert!(SpawnConfig::for_testing().validate().is_ok());
        assert!(SpawnConfig::dense().validate().is_ok());
        assert_eq!(SpawnConfig::default(), SpawnConfig::new());
    }

    #[test]
    fn test_spawn_config_rejects_bad_sizes() {
        let mut config = SpawnConfig::new();
        config.cluster_min_size = 0;
        assert!(matches!(
            config.validate(),
            Err(MorphogenError::InvalidConfig(_))
        ));

        let mut config = SpawnConfig::new();
        config.cluster_min_size = 9;
        config.cluster_max_size = 3;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_spawn_config_rejects_bad_distances() {
        let mut config = SpawnConfig::new();
        config.ring_min_radius = -1.0;
        assert!(config.validate().is_err());

        let mut config = SpawnConfig::new();
        config.scatter_radius = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_spawn_config_json_uses_defaults_for_missing_fields() {
        let config = SpawnConfig::from_json_str(r#"{"clusterMaxSize": 12}"#).unwrap();
        assert_eq!(config.cluster_max_size, 12);
        assert_eq!(config.cluster_min_size, DEFAULT_CLUSTER_MIN_SIZE);
    }

    #[test]
    fn test_spawn_config_json_validation_error() {
        let result = SpawnConfig::from_json_str(r#"{"clusterMinSize": 0}"#);
        assert!(matches!(result, Err(MorphogenError::InvalidConfig(_))));

        let result = SpawnConfig::from_json_str("not json");
        assert!(matches!(result, Err(MorphogenError::Serde(_))));
    }

    #[test]
    fn test_spawn_config_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{}", serde_json::to_string(&SpawnConfig::dense()).unwrap()).unwrap();

        let loaded = SpawnConfig::load(file.path()).unwrap();
        assert_eq!(loaded, SpawnConfig::dense());

        let missing = SpawnConfig::load("/definitely/not/here.json");
        assert!(matches!(missing, Err(MorphogenError::Io(_))));
    }

    #[test]
    fn test_point_helpers() {
        let offset = Point::from_polar(0.0, 10.0);
        assert_eq!(offset, Point::new(10.0, 0.0));
        assert_eq!(Point::new(3.0, 4.0).length(), 5.0);
        assert_eq!(Point::origin() + Point::new(1.0, 2.0), Point::new(1.0, 2.0));
    }

    #[test]
    fn test_sanitize_distance() {
        assert_eq!(sanitize_distance(12.5), 12.5);
        assert_eq!(sanitize_distance(-3.0), 0.0);
        assert_eq!(sanitize_distance(f64::NAN), 0.0);
        assert_eq!(sanitize_distance(f64::INFINITY), 0.0);
    }
}
