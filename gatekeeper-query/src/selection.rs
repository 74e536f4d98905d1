use serde::Serialize;
use std::collections::BTreeSet;

/// Record ids picked by the user, independent of paging and filtering
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SelectionSet {
    ids: BTreeSet<String>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }

    /// Returns true when `id` was not selected before
    pub(crate) fn insert(&mut self, id: &str) -> bool {
        self.ids.insert(id.to_string())
    }

    pub(crate) fn remove(&mut self, id: &str) -> bool {
        self.ids.remove(id)
    }

    pub(crate) fn clear(&mut self) {
        self.ids.clear();
    }

    pub(crate) fn retain(&mut self, mut keep: impl FnMut(&str) -> bool) {
        self.ids.retain(|id| keep(id));
    }

    /// Replaces the whole selection
    pub(crate) fn reset_to<'a>(&mut self, ids: impl IntoIterator<Item = &'a str>) {
        self.ids = ids.into_iter().map(str::to_string).collect();
    }

    /// True when the selection holds exactly `ids`
    pub(crate) fn equals<'a>(&self, ids: impl IntoIterator<Item = &'a str>) -> bool {
        let other: BTreeSet<&str> = ids.into_iter().collect();
        other.len() == self.ids.len() && other.iter().all(|id| self.ids.contains(*id))
    }
}
