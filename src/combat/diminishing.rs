//! # Diminishing Returns
//!
//! Repeated upgrade purchases get progressively weaker. The n-th repeat of
//! a tier is scaled by `rate^n`, floored at the tier minimum.

use log::warn;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Upgrade tiers with distinct decay curves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpgradeTier {
    #[default]
    Small,
    Medium,
    Large,
}

impl UpgradeTier {
    /// Parses a tier name. Unknown tiers use the small curve.
    pub fn parse(name: &str) -> UpgradeTier {
        match name.trim().to_lowercase().as_str() {
            "medium" => UpgradeTier::Medium,
            "large" => UpgradeTier::Large,
            _ => UpgradeTier::Small,
        }
    }

    /// Returns the wire name of this tier.
    pub fn as_str(self) -> &'static str {
        match self {
            UpgradeTier::Small => "small",
            UpgradeTier::Medium => "medium",
            UpgradeTier::Large => "large",
        }
    }
}

impl fmt::Display for UpgradeTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decay rate and floor for one curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DiminishingConfig {
    /// Per-purchase decay, in `(0, 1]`
    pub rate: f64,
    /// Lowest multiplier ever returned, in `[0, 1]`
    pub minimum: f64,
}

impl DiminishingConfig {
    /// Default curve for a tier.
    pub fn for_tier(tier: UpgradeTier) -> Self {
        match tier {
            UpgradeTier::Small => Self {
                rate: 0.6,
                minimum: 0.2,
            },
            UpgradeTier::Medium => Self {
                rate: 0.7,
                minimum: 0.3,
            },
            UpgradeTier::Large => Self {
                rate: 0.8,
                minimum: 0.4,
            },
        }
    }

    /// Replaces rate and minimum where valid overrides are given.
    ///
    /// Out-of-range overrides are logged and ignored so a bad upgrade
    /// definition falls back to the tier curve.
    pub fn with_overrides(mut self, rate: Option<f64>, minimum: Option<f64>) -> Self {
        if let Some(rate) = rate {
            if rate.is_finite() && rate > 0.0 && rate <= 1.0 {
                self.rate = rate;
            } else {
                warn!("Ignoring diminishing rate override {}", rate);
            }
        }
        if let Some(minimum) = minimum {
            if minimum.is_finite() && (0.0..=1.0).contains(&minimum) {
                self.minimum = minimum;
            } else {
                warn!("Ignoring diminishing minimum override {}", minimum);
            }
        }
        self
    }

    /// Multiplier after `previous_purchases` earlier purchases.
    ///
    /// # Examples
    ///
    /// ```
    /// use morphogen::{DiminishingConfig, UpgradeTier};
    ///
    /// let small = DiminishingConfig::for_tier(UpgradeTier::Small);
    /// assert_eq!(small.multiplier(0), 1.0);
    /// assert_eq!(small.multiplier(1), 0.6);
    /// assert_eq!(small.multiplier(2), 0.36);
    /// assert_eq!(small.multiplier(50), 0.2);
    /// ```
    pub fn multiplier(&self, previous_purchases: u32) -> f64 {
        if previous_purchases == 0 {
            return 1.0;
        }
        pow_by_squaring(self.rate, previous_purchases).max(self.minimum)
    }
}

impl Default for DiminishingConfig {
    fn default() -> Self {
        Self::for_tier(UpgradeTier::Small)
    }
}

// Same multiplication sequence on every platform, unlike powi.
fn pow_by_squaring(base: f64, mut exponent: u32) -> f64 {
    let mut result = 1.0;
    let mut factor = base;
    while exponent > 0 {
        if exponent & 1 == 1 {
            result *= factor;
        }
        factor *= factor;
        exponent >>= 1;
    }
    result
}

/// Multiplier for the next purchase of an upgrade tier.
///
/// `tier` is matched by name and falls back to the small curve. Custom rate
/// and minimum replace the tier values when they are in range.
pub fn diminishing_multiplier(
    previous_purchases: u32,
    tier: &str,
    custom_rate: Option<f64>,
    custom_minimum: Option<f64>,
) -> f64 {
    DiminishingConfig::for_tier(UpgradeTier::parse(tier))
        .with_overrides(custom_rate, custom_minimum)
        .multiplier(previous_purchases)
}

/// Wire form of a diminishing-returns lookup.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DiminishingQuery {
    pub previous_purchases: u32,
    pub tier: String,
    pub custom_rate: Option<f64>,
    pub custom_minimum: Option<f64>,
}

impl DiminishingQuery {
    /// Runs the lookup through [`diminishing_multiplier`].
    pub fn resolve(&self) -> f64 {
        diminishing_multiplier(
            self.previous_purchases,
            &self.tier,
            self.custom_rate,
            self.custom_minimum,
        )
    }
}
