//! Per-message emoji reactions

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use super::Reactor;

/// Emoji -> set of reactors
///
/// An emoji mapped to an empty set is indistinguishable from an absent
/// emoji: iteration, counts and equality all skip empty sets.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct Reactions(BTreeMap<String, BTreeSet<Reactor>>);

impl Reactions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reactors for an emoji, `None` when nobody reacted with it
    pub fn reactors(&self, emoji: &str) -> Option<&BTreeSet<Reactor>> {
        self.0.get(emoji).filter(|set| !set.is_empty())
    }

    pub fn contains(&self, emoji: &str, reactor: Reactor) -> bool {
        self.0
            .get(emoji)
            .map(|set| set.contains(&reactor))
            .unwrap_or(false)
    }

    pub fn count(&self, emoji: &str) -> usize {
        self.0.get(emoji).map(BTreeSet::len).unwrap_or(0)
    }

    /// Non-empty reactions in emoji order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &BTreeSet<Reactor>)> {
        self.0
            .iter()
            .filter(|(_, set)| !set.is_empty())
            .map(|(emoji, set)| (emoji.as_str(), set))
    }

    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }

    /// Flip `reactor`'s membership for `emoji`; returns whether it is now present
    pub(crate) fn toggle(&mut self, emoji: &str, reactor: Reactor) -> bool {
        let set = self.0.entry(emoji.to_string()).or_default();
        let added = if set.remove(&reactor) {
            false
        } else {
            set.insert(reactor);
            true
        };
        if set.is_empty() {
            self.0.remove(emoji);
        }
        added
    }

    /// Install a full set for an emoji (used when decoding storage)
    pub(crate) fn insert_set(&mut self, emoji: String, reactors: BTreeSet<Reactor>) {
        self.0.insert(emoji, reactors);
    }
}

impl PartialEq for Reactions {
    fn eq(&self, other: &Self) -> bool {
        self.iter().eq(other.iter())
    }
}

impl Eq for Reactions {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_on_then_off() {
        let mut reactions = Reactions::new();
        assert!(reactions.toggle("👍", Reactor::Me));
        assert!(reactions.contains("👍", Reactor::Me));
        assert_eq!(reactions.count("👍"), 1);

        assert!(!reactions.toggle("👍", Reactor::Me));
        assert!(!reactions.contains("👍", Reactor::Me));
        assert!(reactions.is_empty());
        assert_eq!(reactions, Reactions::new());
    }

    #[test]
    fn test_toggle_leaves_other_reactors() {
        let mut reactions = Reactions::new();
        reactions.toggle("❤️", Reactor::Other);
        reactions.toggle("❤️", Reactor::Me);
        reactions.toggle("❤️", Reactor::Me);

        let set = reactions.reactors("❤️").unwrap();
        assert_eq!(set.len(), 1);
        assert!(set.contains(&Reactor::Other));
    }

    #[test]
    fn test_empty_set_equals_absent() {
        let mut with_empty = Reactions::new();
        with_empty.insert_set("🎉".to_string(), BTreeSet::new());

        assert_eq!(with_empty, Reactions::new());
        assert!(with_empty.is_empty());
        assert!(with_empty.reactors("🎉").is_none());
        assert_eq!(with_empty.iter().count(), 0);
    }

    #[test]
    fn test_serializes_as_arrays() {
        let mut reactions = Reactions::new();
        reactions.toggle("👍", Reactor::Other);
        reactions.toggle("👍", Reactor::Me);

        let json = serde_json::to_string(&reactions).unwrap();
        assert_eq!(json, r#"{"👍":["me","other"]}"#);
    }
}
