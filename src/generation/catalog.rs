//! # Spawn Catalog
//!
//! Closed set of spawnable organic matter and power-ups with their static
//! appearance ranges.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Every kind of entity the world generator can spawn.
///
/// Serialized as its snake_case name on the wire (`"protein"`,
/// `"speed_boost"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpawnKind {
    // Organic matter
    Protein,
    Lipid,
    Carbohydrate,
    Nucleotide,
    Mineral,
    Enzyme,
    // Power-ups
    SpeedBoost,
    Shield,
    Regeneration,
    Magnet,
    Mutagen,
}

/// Broad family a spawn kind belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpawnCategory {
    OrganicMatter,
    PowerUp,
}

/// Outline drawn for a spawned entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Shape {
    Circle,
    Blob,
    Hexagon,
    Triangle,
    Diamond,
    Star,
    Cross,
}

/// Static appearance ranges for one spawn kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TypeDescriptor {
    /// Smallest rendered size
    pub min_size: f64,
    /// Largest rendered size
    pub max_size: f64,
    /// Largest drift speed along either axis
    pub max_speed: f64,
    /// Palette the color is picked from
    pub colors: &'static [&'static str],
    /// Outlines the shape is picked from
    pub shapes: &'static [Shape],
}

/// Kinds drawn for ordinary food clusters.
pub const ORGANIC_MATTER: [SpawnKind; 6] = [
    SpawnKind::Protein,
    SpawnKind::Lipid,
    SpawnKind::Carbohydrate,
    SpawnKind::Nucleotide,
    SpawnKind::Mineral,
    SpawnKind::Enzyme,
];

/// Kinds drawn for power-up drops.
pub const POWER_UPS: [SpawnKind; 5] = [
    SpawnKind::SpeedBoost,
    SpawnKind::Shield,
    SpawnKind::Regeneration,
    SpawnKind::Magnet,
    SpawnKind::Mutagen,
];

const PROTEIN: TypeDescriptor = TypeDescriptor {
    min_size: 6.0,
    max_size: 10.0,
    max_speed: 0.3,
    colors: &["#ff6b6b", "#ff8787", "#fa5252"],
    shapes: &[Shape::Blob, Shape::Circle],
};

const LIPID: TypeDescriptor = TypeDescriptor {
    min_size: 8.0,
    max_size: 14.0,
    max_speed: 0.2,
    colors: &["#ffd43b", "#fcc419", "#ffe066"],
    shapes: &[Shape::Circle],
};

const CARBOHYDRATE: TypeDescriptor = TypeDescriptor {
    min_size: 5.0,
    max_size: 9.0,
    max_speed: 0.4,
    colors: &["#69db7c", "#51cf66", "#8ce99a"],
    shapes: &[Shape::Hexagon, Shape::Blob],
};

const NUCLEOTIDE: TypeDescriptor = TypeDescriptor {
    min_size: 4.0,
    max_size: 7.0,
    max_speed: 0.5,
    colors: &["#74c0fc", "#4dabf7", "#a5d8ff"],
    shapes: &[Shape::Diamond, Shape::Triangle],
};

const MINERAL: TypeDescriptor = TypeDescriptor {
    min_size: 3.0,
    max_size: 6.0,
    max_speed: 0.1,
    colors: &["#ced4da", "#adb5bd", "#e9ecef"],
    shapes: &[Shape::Triangle, Shape::Diamond, Shape::Hexagon],
};

const ENZYME: TypeDescriptor = TypeDescriptor {
    min_size: 4.0,
    max_size: 8.0,
    max_speed: 0.6,
    colors: &["#da77f2", "#cc5de8", "#e599f7"],
    shapes: &[Shape::Star, Shape::Blob],
};

const SPEED_BOOST: TypeDescriptor = TypeDescriptor {
    min_size: 10.0,
    max_size: 12.0,
    max_speed: 0.0,
    colors: &["#22b8cf"],
    shapes: &[Shape::Triangle],
};

const SHIELD: TypeDescriptor = TypeDescriptor {
    min_size: 11.0,
    max_size: 13.0,
    max_speed: 0.0,
    colors: &["#5c7cfa"],
    shapes: &[Shape::Hexagon],
};

const REGENERATION: TypeDescriptor = TypeDescriptor {
    min_size: 10.0,
    max_size: 12.0,
    max_speed: 0.0,
    colors: &["#40c057"],
    shapes: &[Shape::Cross],
};

const MAGNET: TypeDescriptor = TypeDescriptor {
    min_size: 10.0,
    max_size: 12.0,
    max_speed: 0.0,
    colors: &["#f76707"],
    shapes: &[Shape::Diamond],
};

const MUTAGEN: TypeDescriptor = TypeDescriptor {
    min_size: 9.0,
    max_size: 13.0,
    max_speed: 0.05,
    colors: &["#be4bdb", "#f06595"],
    shapes: &[Shape::Star],
};

impl SpawnKind {
    /// Returns the static appearance ranges for this kind.
    pub fn descriptor(self) -> &'static TypeDescriptor {
        match self {
            SpawnKind::Protein => &PROTEIN,
            SpawnKind::Lipid => &LIPID,
            SpawnKind::Carbohydrate => &CARBOHYDRATE,
            SpawnKind::Nucleotide => &NUCLEOTIDE,
            SpawnKind::Mineral => &MINERAL,
            SpawnKind::Enzyme => &ENZYME,
            SpawnKind::SpeedBoost => &SPEED_BOOST,
            SpawnKind::Shield => &SHIELD,
            SpawnKind::Regeneration => &REGENERATION,
            SpawnKind::Magnet => &MAGNET,
            SpawnKind::Mutagen => &MUTAGEN,
        }
    }

    /// Returns the family this kind belongs to.
    pub fn category(self) -> SpawnCategory {
        match self {
            SpawnKind::Protein
            | SpawnKind::Lipid
            | SpawnKind::Carbohydrate
            | SpawnKind::Nucleotide
            | SpawnKind::Mineral
            | SpawnKind::Enzyme => SpawnCategory::OrganicMatter,
            SpawnKind::SpeedBoost
            | SpawnKind::Shield
            | SpawnKind::Regeneration
            | SpawnKind::Magnet
            | SpawnKind::Mutagen => SpawnCategory::PowerUp,
        }
    }

    /// Returns the wire name of this kind.
    pub fn as_str(self) -> &'static str {
        match self {
            SpawnKind::Protein => "protein",
            SpawnKind::Lipid => "lipid",
            SpawnKind::Carbohydrate => "carbohydrate",
            SpawnKind::Nucleotide => "nucleotide",
            SpawnKind::Mineral => "mineral",
            SpawnKind::Enzyme => "enzyme",
            SpawnKind::SpeedBoost => "speed_boost",
            SpawnKind::Shield => "shield",
            SpawnKind::Regeneration => "regeneration",
            SpawnKind::Magnet => "magnet",
            SpawnKind::Mutagen => "mutagen",
        }
    }

    /// Returns all kinds, organic matter first.
    pub fn all() -> Vec<SpawnKind> {
        ORGANIC_MATTER.iter().chain(POWER_UPS.iter()).copied().collect()
    }
}

impl fmt::Display for SpawnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SpawnKind {
    type Err = crate::MorphogenError;

    /// Parses a wire name; surrounding whitespace and case are ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        SpawnKind::all()
            .into_iter()
            .find(|kind| kind.as_str() == wanted)
            .ok_or_else(|| crate::MorphogenError::InvalidArgument(format!("unknown spawn kind '{}'", s)))
    }
}
