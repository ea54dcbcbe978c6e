//! # Affinity
//!
//! Per-organism tuning layered on top of the element table. The bonus is
//! added to the elemental multiplier, never multiplied into it.

use super::{Element, Relation};
use serde::{Deserialize, Serialize};
use std::fmt;

/// How strongly an organism leans into its innate element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Affinity {
    #[default]
    Neutral,
    Attuned,
    Divergent,
}

/// Additive bonuses for one affinity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AffinityModifiers {
    /// Attack element equals the attacker's innate element
    pub same: f64,
    /// Attack has the elemental advantage
    pub advantage: f64,
    /// Attack is at an elemental disadvantage
    pub disadvantage: f64,
}

const NEUTRAL_MODIFIERS: AffinityModifiers = AffinityModifiers {
    same: 0.0,
    advantage: 0.0,
    disadvantage: 0.0,
};

const ATTUNED_MODIFIERS: AffinityModifiers = AffinityModifiers {
    same: 0.15,
    advantage: 0.05,
    disadvantage: 0.0,
};

const DIVERGENT_MODIFIERS: AffinityModifiers = AffinityModifiers {
    same: -0.10,
    advantage: 0.0,
    disadvantage: -0.15,
};

impl Affinity {
    /// Parses an affinity name; anything unrecognized is neutral.
    ///
    /// # Examples
    ///
    /// ```
    /// use morphogen::Affinity;
    ///
    /// assert_eq!(Affinity::parse(" ATTUNED"), Affinity::Attuned);
    /// assert_eq!(Affinity::parse("chaotic"), Affinity::Neutral);
    /// ```
    pub fn parse(name: &str) -> Affinity {
        match name.trim().to_lowercase().as_str() {
            "attuned" => Affinity::Attuned,
            "divergent" => Affinity::Divergent,
            _ => Affinity::Neutral,
        }
    }

    /// Returns the bonus table for this affinity.
    pub fn modifiers(self) -> &'static AffinityModifiers {
        match self {
            Affinity::Neutral => &NEUTRAL_MODIFIERS,
            Affinity::Attuned => &ATTUNED_MODIFIERS,
            Affinity::Divergent => &DIVERGENT_MODIFIERS,
        }
    }

    /// Returns the wire name of this affinity.
    pub fn as_str(self) -> &'static str {
        match self {
            Affinity::Neutral => "neutral",
            Affinity::Attuned => "attuned",
            Affinity::Divergent => "divergent",
        }
    }
}

impl fmt::Display for Affinity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Additive affinity bonus for one attack.
///
/// A same-element attack takes the `same` bonus regardless of the
/// relationship; otherwise the relationship selects the bonus, and mirror or
/// neutral matchups get nothing.
pub fn affinity_bonus(
    affinity: Affinity,
    relation: Relation,
    attack: Option<Element>,
    innate: Option<Element>,
) -> f64 {
    let modifiers = affinity.modifiers();
    let same_element = matches!((attack, innate), (Some(a), Some(b)) if a == b);

    if same_element {
        return modifiers.same;
    }
    match relation {
        Relation::Advantage => modifiers.advantage,
        Relation::Disadvantage => modifiers.disadvantage,
        Relation::Mirror | Relation::Neutral => 0.0,
    }
}
