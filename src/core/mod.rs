//! Core entity, component and system types

pub mod card;
pub mod component;
pub mod element;
pub mod entity;
pub mod system;

pub use card::{CardInfo, CardKey, CardStats, CardType, Rarity};
pub use component::{
    Combatant, Component, ComponentData, ComponentKind, ComponentValue, Health, Selected, Side,
};
pub use element::{Element, GENERATING_CYCLE};
pub use entity::{Entity, EntityId, EntityStore};
pub use system::{DefeatCleanupSystem, FnSystem, System, SystemScheduler};
