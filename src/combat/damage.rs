//! # Damage Resolution
//!
//! The final damage multiplier. Operation order is fixed and both sides of
//! the wire must apply it identically:
//!
//! ```text
//! effective = elemental + affinity_bonus
//! final     = clamp(effective, 0.05, 5) * resistance_multiplier
//! ```

use super::{
    affinity_bonus, relation_between, resistance_multiplier, Affinity, Element, Relation,
    ResistanceProfile,
};
use crate::config::{MAX_DAMAGE_MULTIPLIER, MIN_DAMAGE_MULTIPLIER};
use log::trace;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Bounds a damage multiplier to `[0.05, 5]`. Non-finite input is treated
/// as a plain 1x hit.
pub fn clamp_damage_multiplier(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(MIN_DAMAGE_MULTIPLIER, MAX_DAMAGE_MULTIPLIER)
    } else {
        1.0
    }
}

/// Wire form of a combat lookup.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CombatQuery {
    pub attacking_element: String,
    pub defending_element: String,
    pub affinity: String,
    /// Attacker's innate element, enables the same-element bonus
    pub innate_element: Option<String>,
    pub resistance_profile: BTreeMap<String, f64>,
}

/// Result of a combat lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CombatOutcome {
    pub relation: Relation,
    pub multiplier: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub breakdown: Option<DamageBreakdown>,
}

/// Every intermediate value of one resolution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DamageBreakdown {
    pub relation: Relation,
    pub elemental_multiplier: f64,
    pub affinity_bonus: f64,
    pub effective_multiplier: f64,
    pub clamped_multiplier: f64,
    pub resistance: f64,
    pub resistance_multiplier: f64,
    pub final_multiplier: f64,
}

/// Elemental relation and multiplier for two element names.
///
/// # Examples
///
/// ```
/// use morphogen::{elemental_rps_multiplier, Relation};
///
/// let outcome = elemental_rps_multiplier("kinetic", "bio");
/// assert_eq!(outcome.relation, Relation::Advantage);
/// assert_eq!(outcome.multiplier, 1.15);
/// ```
pub fn elemental_rps_multiplier(attacker: &str, defender: &str) -> CombatOutcome {
    let relation = relation_between(Element::parse(attacker), Element::parse(defender));
    CombatOutcome {
        relation,
        multiplier: relation.multiplier(),
        breakdown: None,
    }
}

/// Runs the full pipeline over parsed inputs.
///
/// An unknown attack element (`None`) is neutral, gets no same-element bonus
/// and meets no resistance.
pub fn resolve_damage(
    attack: Option<Element>,
    defend: Option<Element>,
    affinity: Affinity,
    innate: Option<Element>,
    profile: &ResistanceProfile,
) -> DamageBreakdown {
    let relation = relation_between(attack, defend);
    let elemental_multiplier = relation.multiplier();
    let bonus = affinity_bonus(affinity, relation, attack, innate);

    let effective_multiplier = elemental_multiplier + bonus;
    let clamped_multiplier = clamp_damage_multiplier(effective_multiplier);

    let resistance = attack.map_or(0.0, |element| profile.get(element));
    let resistance_multiplier = resistance_multiplier(resistance);
    let final_multiplier = clamped_multiplier * resistance_multiplier;

    trace!(
        "Resolved {:?} vs {:?}: {} {} + {} -> {} x {} = {}",
        attack,
        defend,
        relation,
        elemental_multiplier,
        bonus,
        clamped_multiplier,
        resistance_multiplier,
        final_multiplier
    );

    DamageBreakdown {
        relation,
        elemental_multiplier,
        affinity_bonus: bonus,
        effective_multiplier,
        clamped_multiplier,
        resistance,
        resistance_multiplier,
        final_multiplier,
    }
}

impl CombatQuery {
    /// Creates a query with neutral affinity and no resistances.
    pub fn new(attacking_element: &str, defending_element: &str) -> Self {
        Self {
            attacking_element: attacking_element.to_string(),
            defending_element: defending_element.to_string(),
            ..Self::default()
        }
    }

    pub fn with_affinity(mut self, affinity: &str) -> Self {
        self.affinity = affinity.to_string();
        self
    }

    pub fn with_innate(mut self, element: &str) -> Self {
        self.innate_element = Some(element.to_string());
        self
    }

    pub fn with_resistance(mut self, element: &str, value: f64) -> Self {
        self.resistance_profile.insert(element.to_string(), value);
        self
    }

    /// Parses every string field and runs the pipeline.
    pub fn breakdown(&self) -> DamageBreakdown {
        let profile = ResistanceProfile::from_wire(&self.resistance_profile);
        resolve_damage(
            Element::parse(&self.attacking_element),
            Element::parse(&self.defending_element),
            Affinity::parse(&self.affinity),
            self.innate_element.as_deref().and_then(Element::parse),
            &profile,
        )
    }
}

/// Resolves a combat query to its relation and final multiplier.
///
/// # Examples
///
/// ```
/// use morphogen::{resolve_damage_multiplier, CombatQuery, Relation};
///
/// let query = CombatQuery::new("thermal", "kinetic")
///     .with_affinity("attuned")
///     .with_resistance("thermal", 0.5);
/// let outcome = resolve_damage_multiplier(&query);
///
/// assert_eq!(outcome.relation, Relation::Advantage);
/// assert!((outcome.multiplier - 0.6).abs() < 1e-12);
/// ```
pub fn resolve_damage_multiplier(query: &CombatQuery) -> CombatOutcome {
    let breakdown = query.breakdown();
    CombatOutcome {
        relation: breakdown.relation,
        multiplier: breakdown.final_multiplier,
        breakdown: None,
    }
}

/// Like [`resolve_damage_multiplier`] but keeps the intermediate values.
pub fn resolve_damage_with_breakdown(query: &CombatQuery) -> CombatOutcome {
    let breakdown = query.breakdown();
    CombatOutcome {
        relation: breakdown.relation,
        multiplier: breakdown.final_multiplier,
        breakdown: Some(breakdown),
    }
}
