//! Component storage as a kind-tagged union
//!
//! Each entity holds at most one component per [`ComponentKind`]. A component
//! records the entity it is attached to; that back-reference is set when the
//! component is attached and cleared when it is detached.

use crate::core::card::{CardInfo, CardStats};
use crate::core::element::Element;
use crate::core::entity::EntityId;
use serde::{Deserialize, Serialize};

/// Discriminant for every component payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ComponentKind {
    Card,
    Element,
    Stats,
    Health,
    Combatant,
    Selected,
}

/// Which side of the battle an entity fights for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Player,
    Enemy,
}

/// Hit points of a combatant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Health {
    pub current: i32,
    pub max: i32,
}

impl Health {
    pub fn new(max: i32) -> Self {
        Health { current: max, max }
    }

    pub fn is_depleted(&self) -> bool {
        self.current <= 0
    }
}

/// A participant in a battle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Combatant {
    pub name: String,
    pub side: Side,
}

/// Marks a card as chosen for the next resolution step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selected {
    /// Position in the selection order
    pub order: u32,
}

/// Component payloads
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ComponentValue {
    Card(CardInfo),
    Element(Element),
    Stats(CardStats),
    Health(Health),
    Combatant(Combatant),
    Selected(Selected),
}

impl ComponentValue {
    pub fn kind(&self) -> ComponentKind {
        match self {
            ComponentValue::Card(_) => ComponentKind::Card,
            ComponentValue::Element(_) => ComponentKind::Element,
            ComponentValue::Stats(_) => ComponentKind::Stats,
            ComponentValue::Health(_) => ComponentKind::Health,
            ComponentValue::Combatant(_) => ComponentKind::Combatant,
            ComponentValue::Selected(_) => ComponentKind::Selected,
        }
    }
}

/// A component instance plus the entity it is attached to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Component {
    owner: Option<EntityId>,
    value: ComponentValue,
}

impl Component {
    /// Create a detached component
    pub fn new(value: impl Into<ComponentValue>) -> Self {
        Component {
            owner: None,
            value: value.into(),
        }
    }

    pub fn kind(&self) -> ComponentKind {
        self.value.kind()
    }

    /// Entity currently holding this component, if attached
    pub fn owner(&self) -> Option<EntityId> {
        self.owner
    }

    pub fn value(&self) -> &ComponentValue {
        &self.value
    }

    pub fn value_mut(&mut self) -> &mut ComponentValue {
        &mut self.value
    }

    pub(crate) fn attach(&mut self, owner: EntityId) {
        self.owner = Some(owner);
    }

    pub(crate) fn detach(&mut self) {
        self.owner = None;
    }
}

/// Typed access to one variant of [`ComponentValue`]
pub trait ComponentData: Sized {
    const KIND: ComponentKind;

    fn from_value(value: &ComponentValue) -> Option<&Self>;

    fn from_value_mut(value: &mut ComponentValue) -> Option<&mut Self>;
}

macro_rules! component_data {
    ($ty:ty, $variant:ident) => {
        impl ComponentData for $ty {
            const KIND: ComponentKind = ComponentKind::$variant;

            fn from_value(value: &ComponentValue) -> Option<&Self> {
                match value {
                    ComponentValue::$variant(data) => Some(data),
                    _ => None,
                }
            }

            fn from_value_mut(value: &mut ComponentValue) -> Option<&mut Self> {
                match value {
                    ComponentValue::$variant(data) => Some(data),
                    _ => None,
                }
            }
        }

        impl From<$ty> for ComponentValue {
            fn from(data: $ty) -> Self {
                ComponentValue::$variant(data)
            }
        }
    };
}

component_data!(CardInfo, Card);
component_data!(Element, Element);
component_data!(CardStats, Stats);
component_data!(Health, Health);
component_data!(Combatant, Combatant);
component_data!(Selected, Selected);
