//! Card templates - authored, immutable card data.
//!
//! `CardTemplate` holds what a card *is*: name, cost, and either creature
//! stats or a spell's effect text. Per-match mutable data lives on
//! `CardInstance`, which points back here through a `CardRef`.

use serde::{Deserialize, Serialize};

/// Unique identifier for a card template.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TemplateId(pub u32);

impl TemplateId {
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for TemplateId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Template({})", self.0)
    }
}

/// The kinds of card a catalog can publish.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardKind {
    Monster,
    Spell,
}

impl std::fmt::Display for CardKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CardKind::Monster => f.write_str("monster"),
            CardKind::Spell => f.write_str("spell"),
        }
    }
}

/// Tagged reference from an instance (or deck entry) to its template.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CardRef {
    pub kind: CardKind,
    pub template_id: TemplateId,
}

impl CardRef {
    #[must_use]
    pub const fn monster(id: u32) -> Self {
        Self {
            kind: CardKind::Monster,
            template_id: TemplateId::new(id),
        }
    }

    #[must_use]
    pub const fn spell(id: u32) -> Self {
        Self {
            kind: CardKind::Spell,
            template_id: TemplateId::new(id),
        }
    }
}

/// Kind-specific template data.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CardBody {
    Monster { attack: i32, hp: i32 },
    Spell { effect: String },
}

/// Static card template.
///
/// ## Example
///
/// ```
/// use ccg_arena::cards::{CardKind, CardTemplate, TemplateId};
///
/// let wolf = CardTemplate::monster(TemplateId::new(1), "Dire Wolf", 2, 3, 2)
///     .with_description("Hunts in packs.");
///
/// assert_eq!(wolf.kind(), CardKind::Monster);
/// assert_eq!(wolf.creature_stats(), Some((3, 2)));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardTemplate {
    pub id: TemplateId,
    pub name: String,
    pub description: String,
    pub cost: i32,
    /// Art reference for clients. `None` when the author omitted a picture.
    pub picture_url: Option<String>,
    pub body: CardBody,
}

impl CardTemplate {
    /// Create a creature template.
    #[must_use]
    pub fn monster(
        id: TemplateId,
        name: impl Into<String>,
        cost: i32,
        attack: i32,
        hp: i32,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            description: String::new(),
            cost,
            picture_url: None,
            body: CardBody::Monster { attack, hp },
        }
    }

    /// Create a spell template.
    #[must_use]
    pub fn spell(
        id: TemplateId,
        name: impl Into<String>,
        cost: i32,
        effect: impl Into<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            description: String::new(),
            cost,
            picture_url: None,
            body: CardBody::Spell {
                effect: effect.into(),
            },
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn with_picture(mut self, url: impl Into<String>) -> Self {
        self.picture_url = Some(url.into());
        self
    }

    #[must_use]
    pub fn kind(&self) -> CardKind {
        match self.body {
            CardBody::Monster { .. } => CardKind::Monster,
            CardBody::Spell { .. } => CardKind::Spell,
        }
    }

    /// The reference deck lists and instances use for this template.
    #[must_use]
    pub fn card_ref(&self) -> CardRef {
        CardRef {
            kind: self.kind(),
            template_id: self.id,
        }
    }

    /// `(attack, hp)` for creatures, `None` for spells.
    #[must_use]
    pub fn creature_stats(&self) -> Option<(i32, i32)> {
        match self.body {
            CardBody::Monster { attack, hp } => Some((attack, hp)),
            CardBody::Spell { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_id() {
        let id = TemplateId::new(42);
        assert_eq!(id.raw(), 42);
        assert_eq!(format!("{}", id), "Template(42)");
    }

    #[test]
    fn test_monster_builder() {
        let card = CardTemplate::monster(TemplateId::new(1), "Goblin", 1, 2, 1)
            .with_description("Small and angry.")
            .with_picture("/media/goblin.png");

        assert_eq!(card.name, "Goblin");
        assert_eq!(card.cost, 1);
        assert_eq!(card.picture_url.as_deref(), Some("/media/goblin.png"));
        assert_eq!(card.card_ref(), CardRef::monster(1));
    }

    #[test]
    fn test_spell_has_no_stats() {
        let bolt = CardTemplate::spell(TemplateId::new(2), "Bolt", 1, "Deal 3 damage");

        assert_eq!(bolt.kind(), CardKind::Spell);
        assert_eq!(bolt.creature_stats(), None);
        assert_eq!(bolt.card_ref(), CardRef::spell(2));
    }

    #[test]
    fn test_template_serialization() {
        let card = CardTemplate::monster(TemplateId::new(1), "Test", 2, 1, 1);

        let json = serde_json::to_string(&card).unwrap();
        let deserialized: CardTemplate = serde_json::from_str(&json).unwrap();

        assert_eq!(card, deserialized);
    }
}
