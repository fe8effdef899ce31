//! Per-card flip state.
//!
//! The set of cards is fixed when the registry is built from the provider
//! catalog. Toggling an id outside that set is reported, never inserted.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCard(pub String);

impl fmt::Display for UnknownCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "no card with id {:?}", self.0)
    }
}

impl std::error::Error for UnknownCard {}

/// Which side of a card is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Face {
    Front,
    Back,
}

impl Face {
    pub fn from_flipped(flipped: bool) -> Self {
        if flipped {
            Face::Back
        } else {
            Face::Front
        }
    }

    /// Target Y rotation of the card body
    pub fn rotation_deg(self) -> u16 {
        match self {
            Face::Front => 0,
            Face::Back => 180,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlipRegistry {
    cards: BTreeMap<String, bool>,
}

impl FlipRegistry {
    /// Every known id starts unflipped.
    pub fn new<'a>(ids: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            cards: ids.into_iter().map(|id| (id.to_string(), false)).collect(),
        }
    }

    /// Flip one card. Returns its new state.
    pub fn toggle(&mut self, id: &str) -> Result<bool, UnknownCard> {
        match self.cards.get_mut(id) {
            Some(flipped) => {
                *flipped = !*flipped;
                Ok(*flipped)
            }
            None => Err(UnknownCard(id.to_string())),
        }
    }

    /// Unknown ids read as unflipped.
    pub fn is_flipped(&self, id: &str) -> bool {
        self.cards.get(id).copied().unwrap_or(false)
    }

    pub fn face(&self, id: &str) -> Face {
        Face::from_flipped(self.is_flipped(id))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.cards.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.cards.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> FlipRegistry {
        FlipRegistry::new(["OpenAI", "Anthropic", "Eden AI"])
    }

    #[test]
    fn test_all_start_front() {
        let r = registry();
        assert_eq!(r.len(), 3);
        assert!(r.iter().all(|(_, f)| !f));
        assert_eq!(r.face("OpenAI"), Face::Front);
    }

    #[test]
    fn test_toggle_pair_restores() {
        let mut r = registry();
        assert_eq!(r.toggle("OpenAI"), Ok(true));
        assert!(r.is_flipped("OpenAI"));
        assert_eq!(r.face("OpenAI").rotation_deg(), 180);
        assert_eq!(r.toggle("OpenAI"), Ok(false));
        assert!(!r.is_flipped("OpenAI"));
    }

    #[test]
    fn test_toggle_is_isolated() {
        let mut r = registry();
        r.toggle("Anthropic").unwrap();
        assert!(!r.is_flipped("OpenAI"));
        assert!(!r.is_flipped("Eden AI"));
        assert!(r.is_flipped("Anthropic"));
    }

    #[test]
    fn test_unknown_id_not_inserted() {
        let mut r = registry();
        assert_eq!(r.toggle("Mistral"), Err(UnknownCard("Mistral".to_string())));
        assert!(!r.contains("Mistral"));
        assert_eq!(r.len(), 3);
        assert!(!r.is_flipped("Mistral"));
    }
}
