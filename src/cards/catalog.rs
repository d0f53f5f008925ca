//! Card catalog for template lookup.
//!
//! The catalog is authored outside the engine and read-only once a match is
//! running; sessions resolve every `CardRef` through it.

use rustc_hash::FxHashMap;

use super::template::{CardKind, CardRef, CardTemplate, TemplateId};
use crate::core::{GameError, Result};

/// Catalog of published card templates.
///
/// ## Example
///
/// ```
/// use ccg_arena::cards::{CardCatalog, CardRef, CardTemplate, TemplateId};
///
/// let mut catalog = CardCatalog::new();
/// catalog
///     .publish(CardTemplate::monster(TemplateId::new(1), "Goblin", 1, 2, 1))
///     .unwrap();
///
/// let goblin = catalog.resolve(CardRef::monster(1)).unwrap();
/// assert_eq!(goblin.name, "Goblin");
/// assert!(catalog.resolve(CardRef::spell(1)).is_err());
/// ```
#[derive(Clone, Debug, Default)]
pub struct CardCatalog {
    templates: FxHashMap<TemplateId, CardTemplate>,
}

impl CardCatalog {
    /// Create a new empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish a template.
    ///
    /// Fails with `InvalidCard` on a negative cost, a negative attack, a
    /// creature without hp, or a reused id; published templates never
    /// change.
    pub fn publish(&mut self, template: CardTemplate) -> Result<()> {
        if template.cost < 0 {
            return Err(GameError::InvalidCard(format!(
                "{} has negative cost {}",
                template.name, template.cost
            )));
        }
        if let Some((attack, hp)) = template.creature_stats() {
            if attack < 0 || hp <= 0 {
                return Err(GameError::InvalidCard(format!(
                    "{} has invalid stats {}/{}",
                    template.name, attack, hp
                )));
            }
        }
        if self.templates.contains_key(&template.id) {
            return Err(GameError::InvalidCard(format!(
                "{} is already published",
                template.id
            )));
        }
        self.templates.insert(template.id, template);
        Ok(())
    }

    /// Get a template by ID.
    #[must_use]
    pub fn get(&self, id: TemplateId) -> Option<&CardTemplate> {
        self.templates.get(&id)
    }

    /// Resolve a tagged reference, checking the kind tag matches.
    pub fn resolve(&self, card: CardRef) -> Result<&CardTemplate> {
        match self.templates.get(&card.template_id) {
            Some(template) if template.kind() == card.kind => Ok(template),
            Some(template) => Err(GameError::InvalidCard(format!(
                "{} is a {}, not a {}",
                card.template_id,
                template.kind(),
                card.kind
            ))),
            None => Err(GameError::InvalidCard(format!(
                "{} is not in the catalog",
                card.template_id
            ))),
        }
    }

    #[must_use]
    pub fn contains(&self, id: TemplateId) -> bool {
        self.templates.contains_key(&id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Iterate over all templates.
    pub fn iter(&self) -> impl Iterator<Item = &CardTemplate> {
        self.templates.values()
    }

    /// Find templates by kind.
    pub fn find_by_kind(&self, kind: CardKind) -> impl Iterator<Item = &CardTemplate> {
        self.templates.values().filter(move |t| t.kind() == kind)
    }
}
