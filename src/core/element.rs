//! The five elements and their generating cycle

use crate::BattleError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Elemental affinity of a card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Element {
    Metal,
    Wood,
    Water,
    Fire,
    Earth,
}

/// Generating cycle as (generator, generated) edges.
///
/// Earth -> Metal -> Water -> Wood -> Fire -> Earth
pub const GENERATING_CYCLE: [(Element, Element); 5] = [
    (Element::Earth, Element::Metal),
    (Element::Metal, Element::Water),
    (Element::Water, Element::Wood),
    (Element::Wood, Element::Fire),
    (Element::Fire, Element::Earth),
];

impl Element {
    pub const ALL: [Element; 5] = [
        Element::Metal,
        Element::Wood,
        Element::Water,
        Element::Fire,
        Element::Earth,
    ];

    /// The element this one generates
    pub fn generates(self) -> Element {
        match self {
            Element::Earth => Element::Metal,
            Element::Metal => Element::Water,
            Element::Water => Element::Wood,
            Element::Wood => Element::Fire,
            Element::Fire => Element::Earth,
        }
    }

    /// The element that generates this one
    pub fn generated_by(self) -> Element {
        match self {
            Element::Metal => Element::Earth,
            Element::Water => Element::Metal,
            Element::Wood => Element::Water,
            Element::Fire => Element::Wood,
            Element::Earth => Element::Fire,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Element::Metal => "Metal",
            Element::Wood => "Wood",
            Element::Water => "Water",
            Element::Fire => "Fire",
            Element::Earth => "Earth",
        }
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Element {
    type Err = BattleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "metal" => Ok(Element::Metal),
            "wood" => Ok(Element::Wood),
            "water" => Ok(Element::Water),
            "fire" => Ok(Element::Fire),
            "earth" => Ok(Element::Earth),
            _ => Err(BattleError::ParseError(format!("unknown element '{s}'"))),
        }
    }
}
