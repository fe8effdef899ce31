//! Single, collapsible disclosure list for the write-up section.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Accordion {
    items: Vec<String>,
    open: Option<String>,
}

impl Accordion {
    /// All items start collapsed.
    pub fn new<'a>(items: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            items: items.into_iter().map(str::to_string).collect(),
            open: None,
        }
    }

    /// Open `item` (closing any other), or collapse it if it is already open.
    /// Returns the open item afterwards, or `Err` with the unknown key.
    pub fn activate(&mut self, item: &str) -> Result<Option<&str>, String> {
        if !self.items.iter().any(|i| i == item) {
            return Err(item.to_string());
        }
        if self.open.as_deref() == Some(item) {
            self.open = None;
        } else {
            self.open = Some(item.to_string());
        }
        Ok(self.open.as_deref())
    }

    pub fn is_open(&self, item: &str) -> bool {
        self.open.as_deref() == Some(item)
    }

    pub fn open_item(&self) -> Option<&str> {
        self.open.as_deref()
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_open() {
        let mut a = Accordion::new(["context", "focus", "goal"]);
        assert_eq!(a.open_item(), None);
        assert_eq!(a.activate("context"), Ok(Some("context")));
        assert_eq!(a.activate("goal"), Ok(Some("goal")));
        assert!(!a.is_open("context"));
        assert!(a.is_open("goal"));
    }

    #[test]
    fn test_collapsible() {
        let mut a = Accordion::new(["context", "focus"]);
        a.activate("focus").unwrap();
        assert_eq!(a.activate("focus"), Ok(None));
        assert_eq!(a.open_item(), None);
    }

    #[test]
    fn test_unknown_item_keeps_state() {
        let mut a = Accordion::new(["context"]);
        a.activate("context").unwrap();
        assert_eq!(a.activate("appendix"), Err("appendix".to_string()));
        assert!(a.is_open("context"));
    }
}
