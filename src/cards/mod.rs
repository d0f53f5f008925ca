//! Card system: templates, catalog, deck lists, and instances.
//!
//! ## Key Types
//!
//! - `TemplateId` / `CardRef`: template identity, tagged with its kind
//! - `CardTemplate`: authored card data (monster stats or spell effect)
//! - `CardCatalog`: read-only template lookup for the engine
//! - `DeckList`: template counts a participant brings to a match
//! - `CardInstance`: per-match card, with combat stats while on the field

pub mod template;
pub mod catalog;
pub mod deck;
pub mod instance;

pub use template::{CardBody, CardKind, CardRef, CardTemplate, TemplateId};
pub use catalog::CardCatalog;
pub use deck::{DeckEntry, DeckList};
pub use instance::{CardInstance, CombatStats};
