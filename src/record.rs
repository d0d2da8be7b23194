use core::fmt;

use crate::config::BlackwoodConfig;
use crate::error::BlackwoodError;
use crate::tree::Blackwood;
use crate::validate::TreeStats;

/// A payload that carries its own orderable identifier.
///
/// The tree never looks inside a record beyond calling [`Record::key`].
pub trait Record {
    type Key: Ord;

    /// The identifier the record is stored under, or `None` if it has none yet.
    fn key(&self) -> Option<Self::Key>;
}

/// A tree of whole records, keyed by [`Record::key`].
pub struct RecordTree<R: Record> {
    tree: Blackwood<R::Key, R>,
}

impl<R: Record> RecordTree<R> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            tree: Blackwood::new(),
        }
    }

    #[must_use]
    pub fn with_config(config: BlackwoodConfig) -> Self {
        Self {
            tree: Blackwood::with_config(config),
        }
    }

    /// Stores `record` under its key. A record without a key is refused with
    /// [`BlackwoodError::InvalidInput`] and the tree is left as it was.
    pub fn insert(&mut self, record: R) -> Result<Option<R>, BlackwoodError> {
        let Some(key) = record.key() else {
            return Err(BlackwoodError::InvalidInput(
                "record carries no identifier".to_owned(),
            ));
        };

        self.tree.insert(key, record)
    }

    pub fn delete(&mut self, key: &R::Key) -> bool {
        self.tree.remove(key).is_some()
    }

    pub fn take(&mut self, key: &R::Key) -> Result<R, BlackwoodError> {
        self.tree.delete(key)
    }

    pub fn find(&self, key: &R::Key) -> Option<&R> {
        self.tree.find(key)
    }

    pub fn find_mut(&mut self, key: &R::Key) -> Option<&mut R> {
        self.tree.find_mut(key)
    }

    pub fn contains_key(&self, key: &R::Key) -> bool {
        self.tree.contains(key)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    /// Records in ascending key order.
    pub fn records(&self) -> impl Iterator<Item = &R> + '_ {
        self.tree.iter().map(|(_, record)| record)
    }

    pub fn validate(&self) -> Result<TreeStats, BlackwoodError> {
        self.tree.validate()
    }

    pub fn tree(&self) -> &Blackwood<R::Key, R> {
        &self.tree
    }
}

impl<R: Record> RecordTree<R>
where
    R::Key: fmt::Display,
{
    pub fn render(&self, mode: &str) -> String {
        self.tree.render(mode)
    }
}

impl<R: Record> Default for RecordTree<R> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DuplicatePolicy;

    #[derive(Debug, Clone, PartialEq)]
    struct Ticket {
        id: Option<u32>,
        name: String,
        items: Vec<(String, u32)>,
    }

    impl Ticket {
        fn new(id: u32, name: &str) -> Self {
            Self {
                id: Some(id),
                name: name.to_owned(),
                items: Vec::new(),
            }
        }

        fn with_item(mut self, item: &str, cents: u32) -> Self {
            self.items.push((item.to_owned(), cents));
            self
        }

        fn total_cents(&self) -> u32 {
            self.items.iter().map(|(_, cents)| cents).sum()
        }
    }

    impl Record for Ticket {
        type Key = u32;

        fn key(&self) -> Option<u32> {
            self.id
        }
    }

    #[test]
    pub fn tickets_by_id() {
        let mut tickets = RecordTree::new();
        for id in [3, 1, 2] {
            tickets
                .insert(Ticket::new(id, "lunch").with_item("soup", 450 + id))
                .unwrap();
        }

        assert_eq!(tickets.len(), 3);
        assert_eq!(tickets.render("in-order"), "1, 2, 3");
        assert_eq!(tickets.find(&2).map(Ticket::total_cents), Some(452));
        assert!(tickets.contains_key(&3));
        tickets.validate().unwrap();
    }

    #[test]
    pub fn record_without_id_is_rejected() {
        let mut tickets = RecordTree::new();
        tickets.insert(Ticket::new(1, "breakfast")).unwrap();

        let anonymous = Ticket {
            id: None,
            name: "walk-in".to_owned(),
            items: vec![("coffee".to_owned(), 250)],
        };

        assert!(matches!(
            tickets.insert(anonymous),
            Err(BlackwoodError::InvalidInput(_))
        ));
        assert_eq!(tickets.len(), 1);
        assert_eq!(tickets.render("pre-order"), "1");
    }

    #[test]
    pub fn delete_then_find() {
        let mut tickets = RecordTree::new();
        tickets.insert(Ticket::new(7, "dinner")).unwrap();

        assert!(tickets.delete(&7));
        assert!(!tickets.delete(&7));
        assert_eq!(tickets.find(&7), None);
        assert!(tickets.is_empty());
        assert_eq!(tickets.take(&7), Err(BlackwoodError::KeyNotFound));
    }

    #[test]
    pub fn replace_policy_swaps_record() {
        let mut tickets =
            RecordTree::with_config(BlackwoodConfig::new().duplicates(DuplicatePolicy::Replace));
        tickets.insert(Ticket::new(5, "first")).unwrap();

        let previous = tickets.insert(Ticket::new(5, "second")).unwrap();

        assert_eq!(previous.map(|t| t.name), Some("first".to_owned()));
        assert_eq!(tickets.find(&5).map(|t| t.name.as_str()), Some("second"));
        assert_eq!(tickets.records().count(), 1);
    }

    #[test]
    pub fn find_mut_edits_record() {
        let mut tickets = RecordTree::new();
        tickets.insert(Ticket::new(9, "snack")).unwrap();

        if let Some(ticket) = tickets.find_mut(&9) {
            ticket.items.push(("chips".to_owned(), 199));
        }

        assert_eq!(tickets.find(&9).map(Ticket::total_cents), Some(199));
    }
}
