//! Card catalog and starting-deck assembly

pub mod builder;
pub mod catalog;

pub use builder::{DeckBuilder, DeckStrategy};
pub use catalog::{CardCatalog, CardDefinition, InMemoryCatalog};
