//! Zone system for card locations.
//!
//! Every player slot owns three zones: a deck (unordered bag, random draw),
//! a hand, and a field (both position-addressed and capacity-bounded).
//!
//! ## Key Types
//!
//! - `ZoneKind`: which of the three a zone is
//! - `CardZone`: the container and its invariants
//! - `ZoneIter`: `(position, card)` iteration in position order

pub mod zone;

pub use zone::{CardZone, ZoneIter, ZoneKind};
