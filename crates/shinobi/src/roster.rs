use chrono::{Local, NaiveDateTime};
use derive_more::{AsRef, Deref, Display, From, Into};
use serde::{Deserialize, Serialize};
use serde_with::{DeserializeFromStr, SerializeDisplay};
use std::collections::{HashMap, HashSet};
use strum::{Display as StrumDisplay, EnumIter, EnumString, IntoEnumIterator};
use thiserror::Error;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    SerializeDisplay,
    DeserializeFromStr,
    EnumString,
    EnumIter,
    StrumDisplay,
)]
#[strum(ascii_case_insensitive)]
pub enum Rank {
    S,
    A,
    B,
    C,
}

impl Rank {
    pub fn all() -> impl Iterator<Item = Rank> {
        Self::iter()
    }
}

#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, Deref, From, Into, AsRef,
)]
#[serde(transparent)]
pub struct NinjaName(String);

crate::impl_label_newtype!(NinjaName);

#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, Deref, From, Into, AsRef,
)]
#[serde(transparent)]
pub struct ScrollName(String);

crate::impl_label_newtype!(ScrollName);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ninja {
    pub name: NinjaName,
    pub rank: Rank,
    pub created_at: NaiveDateTime,
}

impl Ninja {
    pub fn new(name: NinjaName, rank: Rank) -> Self {
        Self {
            name,
            rank,
            created_at: Local::now().naive_local(),
        }
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum RosterError {
    #[error("Please enter a ninja name")]
    EmptyName,
    #[error("Ninja '{0}' is already banned")]
    Duplicate(NinjaName),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BatchReport {
    pub added: usize,
    pub duplicates: Vec<NinjaName>,
}

impl std::fmt::Display for BatchReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Added {} ninja(s)", self.added)?;
        if !self.duplicates.is_empty() {
            let names: Vec<_> = self.duplicates.iter().map(NinjaName::as_str).collect();
            write!(f, "; already present: {}", names.join(", "))?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchResult {
    Empty,
    Banned(String),
    Clear(String),
}

impl std::fmt::Display for SearchResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => Ok(()),
            Self::Banned(name) => write!(f, "Ninja「{name}」is banned"),
            Self::Clear(name) => write!(f, "Ninja「{name}」is not banned"),
        }
    }
}

/// Banned ninjas across the four ranks, in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Roster {
    ninjas: Vec<Ninja>,
}

impl Roster {
    pub fn new(ninjas: Vec<Ninja>) -> Self {
        Self { ninjas }
    }

    pub fn ninjas(&self) -> &[Ninja] {
        &self.ninjas
    }

    pub fn len(&self) -> usize {
        self.ninjas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ninjas.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        let lower = name.to_lowercase();
        self.ninjas.iter().any(|n| n.name.folded() == lower)
    }

    /// Returns the trimmed name that was stored.
    pub fn add(&mut self, name: &str, rank: Rank) -> Result<NinjaName, RosterError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(RosterError::EmptyName);
        }
        if self.contains(name) {
            return Err(RosterError::Duplicate(NinjaName::from(name)));
        }
        let ninja = Ninja::new(NinjaName::from(name), rank);
        let added = ninja.name.clone();
        self.ninjas.push(ninja);
        Ok(added)
    }

    /// Adds every whitespace-separated name in `text` that isn't already in
    /// the roster, including names repeated within the batch itself.
    pub fn add_batch(&mut self, text: &str, rank: Rank) -> Result<BatchReport, RosterError> {
        let names: Vec<&str> = text.split_whitespace().collect();
        if names.is_empty() {
            return Err(RosterError::EmptyName);
        }

        let mut report = BatchReport::default();
        for name in names {
            match self.add(name, rank) {
                Ok(_) => report.added += 1,
                Err(RosterError::Duplicate(dup)) => report.duplicates.push(dup),
                Err(RosterError::EmptyName) => {}
            }
        }
        Ok(report)
    }

    /// Removes every entry with exactly this name. Returns how many went.
    pub fn remove(&mut self, name: &str) -> usize {
        let before = self.ninjas.len();
        self.ninjas.retain(|n| n.name.as_str() != name);
        before - self.ninjas.len()
    }

    pub fn remove_many<'a>(&mut self, names: impl IntoIterator<Item = &'a NinjaName>) -> usize {
        let doomed: HashSet<&str> = names.into_iter().map(NinjaName::as_str).collect();
        let before = self.ninjas.len();
        self.ninjas.retain(|n| !doomed.contains(n.name.as_str()));
        before - self.ninjas.len()
    }

    pub fn by_rank(&self, rank: Rank) -> impl Iterator<Item = &Ninja> {
        self.ninjas.iter().filter(move |n| n.rank == rank)
    }

    pub fn grouped(&self) -> HashMap<Rank, Vec<&Ninja>> {
        Rank::all().map(|r| (r, self.by_rank(r).collect())).collect()
    }

    pub fn search(&self, text: &str) -> SearchResult {
        let text = text.trim();
        if text.is_empty() {
            SearchResult::Empty
        } else if self.contains(text) {
            SearchResult::Banned(text.to_string())
        } else {
            SearchResult::Clear(text.to_string())
        }
    }
}

/// Labels fed to the wheel. Names are unique by exact match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScrollList {
    items: Vec<ScrollName>,
}

impl ScrollList {
    pub fn new(items: Vec<ScrollName>) -> Self {
        Self { items }
    }

    pub fn items(&self) -> &[ScrollName] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns whether the list changed.
    pub fn add(&mut self, name: &str) -> bool {
        let name = name.trim();
        if name.is_empty() || self.items.iter().any(|s| s.as_str() == name) {
            return false;
        }
        self.items.push(ScrollName::from(name));
        true
    }

    pub fn remove(&mut self, name: &str) -> bool {
        match self.items.iter().position(|s| s.as_str() == name) {
            Some(idx) => {
                self.items.remove(idx);
                true
            }
            None => false,
        }
    }

    pub fn labels(&self) -> Vec<String> {
        self.items.iter().map(ToString::to_string).collect()
    }
}

/// Checkbox state for one rank section in batch-delete mode.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchSelection {
    active: bool,
    all_selected: bool,
    selected: HashSet<NinjaName>,
}

impl BatchSelection {
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_all_selected(&self) -> bool {
        self.all_selected
    }

    pub fn is_selected(&self, name: &NinjaName) -> bool {
        self.selected.contains(name)
    }

    pub fn selected_count(&self) -> usize {
        self.selected.len()
    }

    pub fn enter(&mut self) {
        self.active = true;
    }

    pub fn set_checked(&mut self, name: NinjaName, checked: bool) {
        if checked {
            self.selected.insert(name);
        } else {
            self.selected.remove(&name);
            self.all_selected = false;
        }
    }

    /// Flips between selecting every visible name and selecting none.
    pub fn toggle_all<'a>(&mut self, names: impl IntoIterator<Item = &'a NinjaName>) {
        self.all_selected = !self.all_selected;
        if self.all_selected {
            self.selected.extend(names.into_iter().cloned());
        } else {
            self.selected.clear();
        }
    }

    /// Hands over the selection and leaves batch mode.
    pub fn take(&mut self) -> Vec<NinjaName> {
        self.active = false;
        self.all_selected = false;
        self.selected.drain().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rank_parsing() {
        let cases = vec![
            ("\"S\"", Rank::S),
            ("\"s\"", Rank::S),
            ("\"A\"", Rank::A),
            ("\"b\"", Rank::B),
            ("\"C\"", Rank::C),
        ];

        for (json, expected) in cases {
            let deserialized: Rank = serde_json::from_str(json).unwrap();
            assert_eq!(deserialized, expected);
        }
        assert!(serde_json::from_str::<Rank>("\"D\"").is_err());
        assert_eq!(serde_json::to_string(&Rank::A).unwrap(), "\"A\"");
    }

    #[test]
    fn test_rank_order() {
        let ranks: Vec<_> = Rank::all().collect();
        assert_eq!(ranks, vec![Rank::S, Rank::A, Rank::B, Rank::C]);
    }

    #[test]
    fn test_add_rejects_empty_and_case_insensitive_duplicates() {
        let mut roster = Roster::default();
        assert_eq!(roster.add("  Itachi ", Rank::S), Ok(NinjaName::from("Itachi")));
        assert_eq!(roster.ninjas()[0].name.as_str(), "Itachi");
        assert_eq!(roster.ninjas()[0].rank, Rank::S);

        assert_eq!(roster.add("   ", Rank::A), Err(RosterError::EmptyName));
        assert_eq!(
            roster.add("ITACHI", Rank::A),
            Err(RosterError::Duplicate(NinjaName::from("ITACHI")))
        );
        assert_eq!(roster.len(), 1);
    }

    #[test]
    fn test_add_batch_reports_duplicates() {
        let mut roster = Roster::default();
        roster.add("Madara", Rank::S).unwrap();

        let report = roster
            .add_batch("Hashirama  madara\nTobirama hashirama", Rank::A)
            .unwrap();
        assert_eq!(report.added, 2);
        assert_eq!(
            report.duplicates,
            vec![NinjaName::from("madara"), NinjaName::from("hashirama")]
        );
        assert_eq!(roster.by_rank(Rank::A).count(), 2);
        assert_eq!(
            report.to_string(),
            "Added 2 ninja(s); already present: madara, hashirama"
        );

        assert_eq!(roster.add_batch(" \t ", Rank::A), Err(RosterError::EmptyName));
    }

    #[test]
    fn test_remove_is_exact_match() {
        let mut roster = Roster::new(vec![
            Ninja::new(NinjaName::from("Kakashi"), Rank::A),
            Ninja::new(NinjaName::from("Guy"), Rank::B),
        ]);
        assert_eq!(roster.remove("kakashi"), 0);
        assert_eq!(roster.remove("Kakashi"), 1);
        assert_eq!(roster.len(), 1);
    }

    #[test]
    fn test_remove_many() {
        let mut roster = Roster::default();
        roster.add_batch("a b c d", Rank::C).unwrap();
        let doomed = [NinjaName::from("b"), NinjaName::from("d")];
        assert_eq!(roster.remove_many(&doomed), 2);

        let left: Vec<_> = roster.ninjas().iter().map(|n| n.name.as_str()).collect();
        assert_eq!(left, vec!["a", "c"]);
    }

    #[test]
    fn test_grouped_by_rank() {
        let mut roster = Roster::default();
        roster.add("x", Rank::S).unwrap();
        roster.add("y", Rank::C).unwrap();
        roster.add("z", Rank::S).unwrap();

        let groups = roster.grouped();
        assert_eq!(groups.len(), 4);
        assert_eq!(groups[&Rank::S].len(), 2);
        assert!(groups[&Rank::A].is_empty());
        assert_eq!(groups[&Rank::C][0].name.as_str(), "y");
    }

    #[test]
    fn test_search() {
        let mut roster = Roster::default();
        roster.add("Naruto", Rank::S).unwrap();

        assert_eq!(roster.search("  "), SearchResult::Empty);
        assert_eq!(roster.search(" naruto "), SearchResult::Banned("naruto".into()));
        assert_eq!(roster.search("Sasuke"), SearchResult::Clear("Sasuke".into()));
        assert_eq!(roster.search("Sasuke").to_string(), "Ninja「Sasuke」is not banned");
    }

    #[test]
    fn test_scroll_list() {
        let mut scrolls = ScrollList::default();
        assert!(scrolls.add(" Fire "));
        assert!(scrolls.add("Water"));
        assert!(!scrolls.add("Fire"));
        assert!(!scrolls.add(""));
        // exact match only
        assert!(scrolls.add("fire"));
        assert_eq!(scrolls.labels(), vec!["Fire", "Water", "fire"]);

        assert!(scrolls.remove("Water"));
        assert!(!scrolls.remove("Water"));
        assert_eq!(scrolls.labels(), vec!["Fire", "fire"]);
    }

    #[test]
    fn test_batch_selection() {
        let names = [NinjaName::from("a"), NinjaName::from("b"), NinjaName::from("c")];
        let mut sel = BatchSelection::default();
        sel.enter();
        assert!(sel.is_active());

        sel.toggle_all(&names);
        assert!(sel.is_all_selected());
        assert_eq!(sel.selected_count(), 3);

        sel.set_checked(NinjaName::from("b"), false);
        assert!(!sel.is_all_selected());
        assert!(!sel.is_selected(&names[1]));

        let mut taken = sel.take();
        taken.sort_by(|x, y| x.as_str().cmp(y.as_str()));
        assert_eq!(taken, vec![NinjaName::from("a"), NinjaName::from("c")]);
        assert!(!sel.is_active());
        assert_eq!(sel.selected_count(), 0);
    }

    #[test]
    fn test_ninja_json_shape() {
        let json = r#"{"name":"Gaara","rank":"B","created_at":"2024-03-01T10:15:30.123456"}"#;
        let ninja: Ninja = serde_json::from_str(json).unwrap();
        assert_eq!(ninja.name.as_str(), "Gaara");
        assert_eq!(ninja.rank, Rank::B);
        assert_eq!(serde_json::to_string(&ninja).unwrap(), json);
    }
}
