//! # Combat Module
//!
//! Elemental combat resolution. Every hit runs the same fixed pipeline on
//! the server and on the attacking client:
//!
//! 1. Look up the attacker/defender relationship
//! 2. Map it to an elemental multiplier
//! 3. Add the attacker's affinity bonus
//! 4. Clamp, then scale by the defender's resistance against the attack
//!
//! Diminishing returns for repeated upgrade purchases live here as well
//! since they share the same clamped-multiplier conventions.
//!
//! None of these functions fail. Unknown element or affinity names resolve
//! to neutral and non-finite numbers fall back to neutral values, so a hit is
//! never dropped because of malformed status data.

pub mod affinity;
pub mod damage;
pub mod diminishing;
pub mod resistance;

pub use affinity::*;
pub use damage::*;
pub use diminishing::*;
pub use resistance::*;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Multiplier applied when the attacker has the advantage.
pub const ADVANTAGE_MULTIPLIER: f64 = 1.15;
/// Multiplier applied when the attacker is at a disadvantage.
pub const DISADVANTAGE_MULTIPLIER: f64 = 0.9;
/// Multiplier for mirror and neutral matchups.
pub const NEUTRAL_MULTIPLIER: f64 = 1.0;

/// The eight damage elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Element {
    Kinetic,
    Thermal,
    Electric,
    Chemical,
    Bio,
    Sonic,
    Psionic,
    Radiant,
}

/// How an attacking element fares against a defending one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Relation {
    Mirror,
    Advantage,
    Disadvantage,
    Neutral,
}

/// One row of the relationship table.
struct ElementRow {
    advantages: &'static [Element],
    disadvantages: &'static [Element],
}

// Rows are authored individually. Kinetic beating Bio does not make Bio weak
// to Kinetic, and Radiant has a single weakness.
const KINETIC: ElementRow = ElementRow {
    advantages: &[Element::Bio, Element::Chemical],
    disadvantages: &[Element::Thermal, Element::Electric],
};
const THERMAL: ElementRow = ElementRow {
    advantages: &[Element::Kinetic, Element::Bio],
    disadvantages: &[Element::Chemical, Element::Sonic],
};
const ELECTRIC: ElementRow = ElementRow {
    advantages: &[Element::Kinetic, Element::Sonic],
    disadvantages: &[Element::Bio, Element::Radiant],
};
const CHEMICAL: ElementRow = ElementRow {
    advantages: &[Element::Bio, Element::Thermal],
    disadvantages: &[Element::Kinetic, Element::Psionic],
};
const BIO: ElementRow = ElementRow {
    advantages: &[Element::Electric, Element::Psionic],
    disadvantages: &[Element::Thermal, Element::Chemical],
};
const SONIC: ElementRow = ElementRow {
    advantages: &[Element::Thermal, Element::Psionic],
    disadvantages: &[Element::Electric, Element::Radiant],
};
const PSIONIC: ElementRow = ElementRow {
    advantages: &[Element::Chemical, Element::Radiant],
    disadvantages: &[Element::Bio, Element::Sonic],
};
const RADIANT: ElementRow = ElementRow {
    advantages: &[Element::Sonic, Element::Electric],
    disadvantages: &[Element::Psionic],
};

impl Element {
    /// All elements in table order.
    pub const ALL: [Element; 8] = [
        Element::Kinetic,
        Element::Thermal,
        Element::Electric,
        Element::Chemical,
        Element::Bio,
        Element::Sonic,
        Element::Psionic,
        Element::Radiant,
    ];

    /// Parses an element name, ignoring surrounding whitespace and case.
    ///
    /// # Examples
    ///
    /// ```
    /// use morphogen::Element;
    ///
    /// assert_eq!(Element::parse("  Kinetic "), Some(Element::Kinetic));
    /// assert_eq!(Element::parse("plasma"), None);
    /// ```
    pub fn parse(name: &str) -> Option<Element> {
        let wanted = name.trim().to_lowercase();
        Element::ALL
            .iter()
            .copied()
            .find(|element| element.as_str() == wanted)
    }

    /// Returns the wire name of this element.
    pub fn as_str(self) -> &'static str {
        match self {
            Element::Kinetic => "kinetic",
            Element::Thermal => "thermal",
            Element::Electric => "electric",
            Element::Chemical => "chemical",
            Element::Bio => "bio",
            Element::Sonic => "sonic",
            Element::Psionic => "psionic",
            Element::Radiant => "radiant",
        }
    }

    fn row(self) -> &'static ElementRow {
        match self {
            Element::Kinetic => &KINETIC,
            Element::Thermal => &THERMAL,
            Element::Electric => &ELECTRIC,
            Element::Chemical => &CHEMICAL,
            Element::Bio => &BIO,
            Element::Sonic => &SONIC,
            Element::Psionic => &PSIONIC,
            Element::Radiant => &RADIANT,
        }
    }

    /// Elements this one deals bonus damage to.
    pub fn advantages(self) -> &'static [Element] {
        self.row().advantages
    }

    /// Elements this one deals reduced damage to.
    pub fn disadvantages(self) -> &'static [Element] {
        self.row().disadvantages
    }

    /// Looks up how this element fares attacking `defender`.
    pub fn relation_to(self, defender: Element) -> Relation {
        if self == defender {
            Relation::Mirror
        } else if self.advantages().contains(&defender) {
            Relation::Advantage
        } else if self.disadvantages().contains(&defender) {
            Relation::Disadvantage
        } else {
            Relation::Neutral
        }
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Element {
    type Err = crate::MorphogenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Element::parse(s)
            .ok_or_else(|| crate::MorphogenError::InvalidArgument(format!("unknown element '{}'", s)))
    }
}

impl Relation {
    /// Elemental damage multiplier for this relation.
    pub fn multiplier(self) -> f64 {
        match self {
            Relation::Advantage => ADVANTAGE_MULTIPLIER,
            Relation::Disadvantage => DISADVANTAGE_MULTIPLIER,
            Relation::Mirror | Relation::Neutral => NEUTRAL_MULTIPLIER,
        }
    }

    /// Returns the wire name of this relation.
    pub fn as_str(self) -> &'static str {
        match self {
            Relation::Mirror => "mirror",
            Relation::Advantage => "advantage",
            Relation::Disadvantage => "disadvantage",
            Relation::Neutral => "neutral",
        }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Relationship between two parsed elements; a missing side is neutral.
pub fn relation_between(attacker: Option<Element>, defender: Option<Element>) -> Relation {
    match (attacker, defender) {
        (Some(attacker), Some(defender)) => attacker.relation_to(defender),
        _ => Relation::Neutral,
    }
}

/// Relationship between two element names.
///
/// # Examples
///
/// ```
/// use morphogen::{relationship, Relation};
///
/// assert_eq!(relationship("kinetic", "bio"), Relation::Advantage);
/// assert_eq!(relationship("BIO", " bio"), Relation::Mirror);
/// assert_eq!(relationship("kinetic", "plasma"), Relation::Neutral);
/// ```
pub fn relationship(attacker: &str, defender: &str) -> Relation {
    relation_between(Element::parse(attacker), Element::parse(defender))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mirror_for_every_element() {
        for element in Element::ALL {
            assert_eq!(element.relation_to(element), Relation::Mirror);
            assert_eq!(relationship(element.as_str(), element.as_str()), Relation::Mirror);
        }
    }

    #[test]
    fn test_rows_never_list_self_or_overlap() {
        for element in Element::ALL {
            assert!(!element.advantages().contains(&element));
            assert!(!element.disadvantages().contains(&element));
            for target in element.advantages() {
                assert!(!element.disadvantages().contains(target));
            }
        }
    }

    #[test]
    fn test_table_is_not_symmetric() {
        // Kinetic beats Bio, but Bio is not weak against Kinetic
        assert_eq!(Element::Kinetic.relation_to(Element::Bio), Relation::Advantage);
        assert_eq!(Element::Bio.relation_to(Element::Kinetic), Relation::Neutral);

        let asymmetric = Element::ALL.iter().any(|&a| {
            Element::ALL.iter().any(|&b| {
                a.relation_to(b) == Relation::Advantage && b.relation_to(a) != Relation::Disadvantage
            })
        });
        assert!(asymmetric);
    }

    #[test]
    fn test_unknown_elements_are_neutral() {
        assert_eq!(relationship("plasma", "plasma"), Relation::Neutral);
        assert_eq!(relationship("", "bio"), Relation::Neutral);
        assert_eq!(relation_between(None, Some(Element::Bio)), Relation::Neutral);
    }

    #[test]
    fn test_relation_multipliers() {
        assert_eq!(Relation::Advantage.multiplier(), 1.15);
        assert_eq!(Relation::Disadvantage.multiplier(), 0.9);
        assert_eq!(Relation::Mirror.multiplier(), 1.0);
        assert_eq!(Relation::Neutral.multiplier(), 1.0);
    }

    #[test]
    fn test_element_wire_names() {
        for element in Element::ALL {
            assert_eq!(
                serde_json::to_string(&element).unwrap(),
                format!("\"{}\"", element)
            );
            assert_eq!(element.as_str().parse::<Element>().unwrap(), element);
        }
        assert_eq!(serde_json::to_string(&Relation::Advantage).unwrap(), "\"advantage\"");
    }
}
