//! Logo resources as explicit load states.
//!
//! A failed load is not an error anywhere above this module: the card simply
//! shows the placeholder reference instead.

use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadState {
    Loading,
    Loaded,
    Failed,
}

/// The image reference to paint for a logo in the given state.
pub fn display_ref<'a>(state: LoadState, logo_ref: &'a str, placeholder: &'a str) -> &'a str {
    match state {
        LoadState::Failed => placeholder,
        LoadState::Loading | LoadState::Loaded => logo_ref,
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogoRegistry {
    states: BTreeMap<String, LoadState>,
}

impl LogoRegistry {
    pub fn new<'a>(cards: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            states: cards
                .into_iter()
                .map(|id| (id.to_string(), LoadState::Loading))
                .collect(),
        }
    }

    /// Apply a load completion. Only the first completion for a card counts.
    /// Returns `None` for a card that does not exist.
    pub fn complete(&mut self, card: &str, ok: bool) -> Option<bool> {
        let state = self.states.get_mut(card)?;
        if *state != LoadState::Loading {
            return Some(false);
        }
        *state = if ok { LoadState::Loaded } else { LoadState::Failed };
        Some(true)
    }

    pub fn state(&self, card: &str) -> Option<LoadState> {
        self.states.get(card).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, LoadState)> {
        self.states.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLACEHOLDER: &str = "https://via.placeholder.com/80?text=Logo";

    #[test]
    fn test_failed_maps_to_placeholder() {
        assert_eq!(display_ref(LoadState::Failed, "/images/eden.png", PLACEHOLDER), PLACEHOLDER);
        assert_eq!(display_ref(LoadState::Loaded, "/images/eden.png", PLACEHOLDER), "/images/eden.png");
        assert_eq!(display_ref(LoadState::Loading, "/images/eden.png", PLACEHOLDER), "/images/eden.png");
    }

    #[test]
    fn test_first_completion_wins() {
        let mut r = LogoRegistry::new(["OpenAI"]);
        assert_eq!(r.state("OpenAI"), Some(LoadState::Loading));
        assert_eq!(r.complete("OpenAI", false), Some(true));
        assert_eq!(r.complete("OpenAI", true), Some(false));
        assert_eq!(r.state("OpenAI"), Some(LoadState::Failed));
    }

    #[test]
    fn test_unknown_card() {
        let mut r = LogoRegistry::new(["OpenAI"]);
        assert_eq!(r.complete("Mistral", true), None);
        assert_eq!(r.state("Mistral"), None);
    }
}
