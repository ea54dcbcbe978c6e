//! # Resistance
//!
//! Defender resistance profiles. A profile is rebuilt from its sources on
//! every hit so that buffs and trait changes apply immediately.

use super::Element;
use crate::config::{MAX_DAMAGE_MULTIPLIER, MAX_RESISTANCE, MIN_DAMAGE_MULTIPLIER};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Where a resistance contribution comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceOrigin {
    /// Innate species resistance
    #[default]
    Base,
    /// Evolved trait
    Trait,
    /// Temporary status effect
    Buff,
}

/// One contribution to a defender's resistances.
///
/// Keys are element names. Unknown names are ignored and non-finite values
/// count as zero. Weaknesses are magnitudes in `[0, 0.95]` and subtract from
/// resistance.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ResistanceSource {
    pub origin: SourceOrigin,
    pub resistances: BTreeMap<String, f64>,
    pub weaknesses: BTreeMap<String, f64>,
}

impl ResistanceSource {
    /// Creates an empty source of the given origin.
    pub fn new(origin: SourceOrigin) -> Self {
        Self {
            origin,
            ..Self::default()
        }
    }

    /// Adds a resistance entry.
    pub fn resist(mut self, element: &str, value: f64) -> Self {
        self.resistances.insert(element.to_string(), value);
        self
    }

    /// Adds a weakness entry.
    pub fn weak_to(mut self, element: &str, magnitude: f64) -> Self {
        self.weaknesses.insert(element.to_string(), magnitude);
        self
    }
}

/// Clamped resistance per element. Missing elements resist nothing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResistanceProfile {
    values: BTreeMap<Element, f64>,
}

impl ResistanceProfile {
    /// Creates a profile with no resistances.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sums every source per element, then clamps each sum.
    ///
    /// Sources are applied in slice order so the floating-point sums are
    /// identical on every peer.
    ///
    /// # Examples
    ///
    /// ```
    /// use morphogen::{Element, ResistanceProfile, ResistanceSource, SourceOrigin};
    ///
    /// let sources = [
    ///     ResistanceSource::new(SourceOrigin::Base).resist("thermal", 0.5),
    ///     ResistanceSource::new(SourceOrigin::Buff).resist("thermal", 0.75),
    ///     ResistanceSource::new(SourceOrigin::Trait).weak_to("bio", 0.25),
    /// ];
    /// let profile = ResistanceProfile::assemble(&sources);
    ///
    /// assert_eq!(profile.get(Element::Thermal), 0.95);
    /// assert_eq!(profile.get(Element::Bio), -0.25);
    /// assert_eq!(profile.get(Element::Sonic), 0.0);
    /// ```
    pub fn assemble(sources: &[ResistanceSource]) -> Self {
        let mut sums: BTreeMap<Element, f64> = BTreeMap::new();

        for source in sources {
            for (name, value) in &source.resistances {
                if let Some(element) = Element::parse(name) {
                    *sums.entry(element).or_insert(0.0) += finite_or_zero(*value);
                }
            }
            for (name, magnitude) in &source.weaknesses {
                if let Some(element) = Element::parse(name) {
                    *sums.entry(element).or_insert(0.0) += weakness_to_resistance(*magnitude);
                }
            }
        }

        let values = sums
            .into_iter()
            .map(|(element, sum)| (element, clamp_resistance(sum)))
            .collect();
        Self { values }
    }

    /// Builds a profile from a wire map of element name to resistance.
    pub fn from_wire(map: &BTreeMap<String, f64>) -> Self {
        Self::assemble(&[ResistanceSource {
            origin: SourceOrigin::Base,
            resistances: map.clone(),
            weaknesses: BTreeMap::new(),
        }])
    }

    /// Converts back to the wire map.
    pub fn to_wire(&self) -> BTreeMap<String, f64> {
        self.values
            .iter()
            .map(|(element, value)| (element.as_str().to_string(), *value))
            .collect()
    }

    /// Gets the clamped resistance against an element.
    pub fn get(&self, element: Element) -> f64 {
        self.values.get(&element).copied().unwrap_or(0.0)
    }

    /// Sets one element's resistance, clamping it.
    pub fn set(&mut self, element: Element, value: f64) {
        self.values.insert(element, clamp_resistance(value));
    }

    /// Damage multiplier this profile applies to an attack element.
    pub fn multiplier_against(&self, element: Option<Element>) -> f64 {
        element.map_or(1.0, |element| resistance_multiplier(self.get(element)))
    }

    /// Iterates the elements with a recorded resistance.
    pub fn iter(&self) -> impl Iterator<Item = (Element, f64)> + '_ {
        self.values.iter().map(|(element, value)| (*element, *value))
    }
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// Clamps a resistance to `[-0.95, 0.95]`; non-finite values become zero.
pub fn clamp_resistance(value: f64) -> f64 {
    finite_or_zero(value).clamp(-MAX_RESISTANCE, MAX_RESISTANCE)
}

/// Converts a weakness magnitude to the equivalent (negative) resistance.
///
/// # Examples
///
/// ```
/// use morphogen::weakness_to_resistance;
///
/// assert_eq!(weakness_to_resistance(0.3), -0.3);
/// assert_eq!(weakness_to_resistance(2.0), -0.95);
/// assert_eq!(weakness_to_resistance(-1.0), 0.0);
/// ```
pub fn weakness_to_resistance(magnitude: f64) -> f64 {
    -finite_or_zero(magnitude).clamp(0.0, MAX_RESISTANCE)
}

/// Converts a resistance to the equivalent weakness magnitude.
pub fn resistance_to_weakness(resistance: f64) -> f64 {
    (-finite_or_zero(resistance)).clamp(0.0, MAX_RESISTANCE)
}

/// Damage multiplier for a raw resistance: `clamp(1 - r, 0.05, 5)`.
///
/// The raw value is not pre-clamped to ±0.95, so out-of-range inputs still
/// land inside the multiplier bounds. Non-finite resistance counts as zero.
pub fn resistance_multiplier(resistance: f64) -> f64 {
    (1.0 - finite_or_zero(resistance)).clamp(MIN_DAMAGE_MULTIPLIER, MAX_DAMAGE_MULTIPLIER)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resistance_multiplier_bounds() {
        assert_eq!(resistance_multiplier(0.0), 1.0);
        assert_eq!(resistance_multiplier(0.5), 0.5);
        assert_eq!(resistance_multiplier(10.0), 0.05);
        assert_eq!(resistance_multiplier(-10.0), 5.0);
        assert_eq!(resistance_multiplier(f64::NAN), 1.0);
        assert_eq!(resistance_multiplier(f64::NEG_INFINITY), 1.0);
    }

    #[test]
    fn test_clamp_resistance() {
        assert_eq!(clamp_resistance(1.5), 0.95);
        assert_eq!(clamp_resistance(-1.5), -0.95);
        assert_eq!(clamp_resistance(0.2), 0.2);
        assert_eq!(clamp_resistance(f64::INFINITY), 0.0);
    }

    #[test]
    fn test_weakness_conversion_both_ways() {
        assert_eq!(weakness_to_resistance(0.0), 0.0);
        assert_eq!(weakness_to_resistance(0.95), -0.95);
        assert_eq!(weakness_to_resistance(f64::NAN), 0.0);
        assert_eq!(resistance_to_weakness(-0.4), 0.4);
        assert_eq!(resistance_to_weakness(0.4), 0.0);
        assert_eq!(resistance_to_weakness(-3.0), 0.95);
    }

    #[test]
    fn test_assemble_sums_then_clamps() {
        let sources = [
            ResistanceSource::new(SourceOrigin::Base).resist("kinetic", 0.5),
            ResistanceSource::new(SourceOrigin::Trait).resist("Kinetic", 0.25),
            ResistanceSource::new(SourceOrigin::Buff).weak_to("kinetic", 0.5),
        ];
        let profile = ResistanceProfile::assemble(&sources);
        assert_eq!(profile.get(Element::Kinetic), 0.25);

        // Clamping happens on the sum, not on each source
        let sources = [
            ResistanceSource::new(SourceOrigin::Base).resist("sonic", 1.5),
            ResistanceSource::new(SourceOrigin::Buff).resist("sonic", -1.0),
        ];
        assert_eq!(ResistanceProfile::assemble(&sources).get(Element::Sonic), 0.5);
    }

    #[test]
    fn test_assemble_ignores_garbage() {
        let sources = [ResistanceSource::new(SourceOrigin::Base)
            .resist("plasma", 0.9)
            .resist("bio", f64::NAN)
            .weak_to("radiant", f64::INFINITY)];
        let profile = ResistanceProfile::assemble(&sources);

        assert_eq!(profile.get(Element::Bio), 0.0);
        assert_eq!(profile.get(Element::Radiant), 0.0);
        assert_eq!(profile.iter().count(), 2);
    }

    #[test]
    fn test_profile_is_rebuilt_not_cached() {
        let mut sources = vec![ResistanceSource::new(SourceOrigin::Base).resist("thermal", 0.2)];
        assert_eq!(ResistanceProfile::assemble(&sources).get(Element::Thermal), 0.2);

        sources.push(ResistanceSource::new(SourceOrigin::Buff).resist("thermal", 0.3));
        assert_eq!(ResistanceProfile::assemble(&sources).get(Element::Thermal), 0.5);
    }

    #[test]
    fn test_wire_round_trip() {
        let mut map = BTreeMap::new();
        map.insert("electric".to_string(), 2.0);
        map.insert("psionic".to_string(), -0.1);
        let profile = ResistanceProfile::from_wire(&map);

        let wire = profile.to_wire();
        assert_eq!(wire.get("electric"), Some(&0.95));
        assert_eq!(wire.get("psionic"), Some(&-0.1));
    }

    #[test]
    fn test_multiplier_against() {
        let mut profile = ResistanceProfile::new();
        profile.set(Element::Chemical, 0.6);
        assert!((profile.multiplier_against(Some(Element::Chemical)) - 0.4).abs() < 1e-12);
        assert_eq!(profile.multiplier_against(Some(Element::Bio)), 1.0);
        assert_eq!(profile.multiplier_against(None), 1.0);
    }
}
