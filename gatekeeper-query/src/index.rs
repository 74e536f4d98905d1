use crate::Record;
use std::collections::HashMap;
use std::collections::hash_map::Entry;

/// Maps each record id to its position in the collection.
/// Example: ["7": 0, "12": 1, "3": 2]
/// When an id repeats, the first occurrence keeps the slot.
#[derive(Debug, Default)]
pub(crate) struct IdIndex {
    positions: HashMap<String, usize>,
}

impl IdIndex {
    pub(crate) fn build<T: Record>(records: &[T]) -> Self {
        let mut positions = HashMap::with_capacity(records.len());
        for (position, record) in records.iter().enumerate() {
            match positions.entry(record.id().to_string()) {
                Entry::Occupied(existing) => {
                    tracing::warn!(
                        "Duplicate record id {:?} at position {}, keeping position {}",
                        existing.key(),
                        position,
                        existing.get()
                    );
                }
                Entry::Vacant(slot) => {
                    slot.insert(position);
                }
            }
        }
        Self { positions }
    }

    pub(crate) fn position(&self, id: &str) -> Option<usize> {
        self.positions.get(id).copied()
    }

    pub(crate) fn contains(&self, id: &str) -> bool {
        self.positions.contains_key(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::member;

    #[test]
    fn test_positions_follow_collection_order() {
        let records = vec![
            member(7, "Ada", "active", "user"),
            member(12, "Bo", "active", "user"),
        ];
        let index = IdIndex::build(&records);

        assert_eq!(index.position("7"), Some(0));
        assert_eq!(index.position("12"), Some(1));
        assert!(!index.contains("3"));
    }

    #[test]
    fn test_duplicate_id_keeps_first_position() {
        let records = vec![
            member(1, "Ada", "active", "user"),
            member(1, "Ada again", "inactive", "user"),
        ];
        let index = IdIndex::build(&records);

        assert_eq!(index.position("1"), Some(0));
    }
}
