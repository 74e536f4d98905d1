use serde::{Deserialize, Serialize};
use shared::{Error, Result};

/// Reads one text field out of a record
pub type FieldAccessor<T> = fn(&T) -> &str;

/// Decides from the current filter values whether any record may be shown at all
pub type Gate = fn(&FilterState) -> bool;

/// Current value of a categorical filter
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterValue {
    /// The filter is inactive and matches every record
    #[default]
    Unset,
    Is(String),
}

impl FilterValue {
    /// Dropdown values that mean "no filter applied"
    pub const SENTINELS: [&'static str; 2] = ["all", "select"];

    /// Normalizes raw input: blank strings and sentinels become `Unset`
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty()
            || Self::SENTINELS
                .iter()
                .any(|sentinel| trimmed.eq_ignore_ascii_case(sentinel))
        {
            FilterValue::Unset
        } else {
            FilterValue::Is(trimmed.to_string())
        }
    }

    pub fn is_set(&self) -> bool {
        matches!(self, FilterValue::Is(_))
    }

    pub fn as_deref(&self) -> Option<&str> {
        match self {
            FilterValue::Unset => None,
            FilterValue::Is(value) => Some(value.as_str()),
        }
    }
}

impl From<&str> for FilterValue {
    fn from(raw: &str) -> Self {
        FilterValue::parse(raw)
    }
}

impl From<String> for FilterValue {
    fn from(raw: String) -> Self {
        FilterValue::parse(&raw)
    }
}

impl<V: Into<FilterValue>> From<Option<V>> for FilterValue {
    fn from(value: Option<V>) -> Self {
        value.map(Into::into).unwrap_or_default()
    }
}

/// How a categorical filter compares its value against the record field
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MatchMode {
    /// Exact, case-sensitive equality
    Equals,
    /// Case-insensitive substring
    Contains,
}

/// A named categorical filter over one record field.
///
/// A filter without a field is a *selector*: it never excludes records but
/// its dependents are reset whenever it changes.
pub struct CategoryFilter<T> {
    name: String,
    field: Option<FieldAccessor<T>>,
    mode: MatchMode,
    depends_on: Option<String>,
}

impl<T> CategoryFilter<T> {
    pub fn equals(name: impl Into<String>, field: FieldAccessor<T>) -> Self {
        Self {
            name: name.into(),
            field: Some(field),
            mode: MatchMode::Equals,
            depends_on: None,
        }
    }

    pub fn contains(name: impl Into<String>, field: FieldAccessor<T>) -> Self {
        Self {
            name: name.into(),
            field: Some(field),
            mode: MatchMode::Contains,
            depends_on: None,
        }
    }

    pub fn selector(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            field: None,
            mode: MatchMode::Equals,
            depends_on: None,
        }
    }

    /// Marks this filter as dependent on `parent`: changing the parent resets it
    pub fn depends_on(mut self, parent: impl Into<String>) -> Self {
        self.depends_on = Some(parent.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mode(&self) -> MatchMode {
        self.mode
    }

    pub fn parent(&self) -> Option<&str> {
        self.depends_on.as_deref()
    }

    pub fn is_selector(&self) -> bool {
        self.field.is_none()
    }

    pub(crate) fn field_value<'r>(&self, record: &'r T) -> Option<&'r str> {
        self.field.map(|field| field(record))
    }

    pub(crate) fn matches(&self, record: &T, value: &FilterValue) -> bool {
        let (Some(field), FilterValue::Is(wanted)) = (self.field, value) else {
            return true;
        };
        let actual = field(record);
        match self.mode {
            MatchMode::Equals => actual == wanted,
            MatchMode::Contains => actual.to_lowercase().contains(&wanted.to_lowercase()),
        }
    }
}

/// Declares how a collection of `T` can be searched and narrowed
pub struct FilterSpec<T> {
    search_fields: Vec<FieldAccessor<T>>,
    categories: Vec<CategoryFilter<T>>,
    gate: Option<Gate>,
}

impl<T> Default for FilterSpec<T> {
    fn default() -> Self {
        Self {
            search_fields: Vec::new(),
            categories: Vec::new(),
            gate: None,
        }
    }
}

impl<T> FilterSpec<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a text field covered by the free-text search term
    pub fn search(mut self, field: FieldAccessor<T>) -> Self {
        self.search_fields.push(field);
        self
    }

    pub fn category(mut self, filter: CategoryFilter<T>) -> Self {
        self.categories.push(filter);
        self
    }

    /// Hides every record while `gate` returns false
    pub fn gate(mut self, gate: Gate) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn categories(&self) -> &[CategoryFilter<T>] {
        &self.categories
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.categories.iter().position(|c| c.name == name)
    }

    /// Every dependency must name a filter declared earlier, which keeps the graph acyclic
    pub(crate) fn validate(&self) -> Result<()> {
        for (idx, filter) in self.categories.iter().enumerate() {
            if let Some(parent) = filter.parent() {
                match self.position(parent) {
                    Some(parent_idx) if parent_idx < idx => {}
                    _ => return Err(Error::UnknownFilter(parent.to_string())),
                }
            }
        }
        Ok(())
    }

    pub(crate) fn initial_state(&self) -> FilterState {
        FilterState {
            search: String::new(),
            needle: String::new(),
            values: self
                .categories
                .iter()
                .map(|c| (c.name.clone(), FilterValue::Unset))
                .collect(),
        }
    }

    /// Indices of every filter that depends on `idx`, directly or through another dependent
    pub(crate) fn dependents_of(&self, idx: usize) -> Vec<usize> {
        let mut found = Vec::new();
        let mut frontier = vec![idx];
        while let Some(current) = frontier.pop() {
            let parent_name = self.categories[current].name.as_str();
            for (child, filter) in self.categories.iter().enumerate() {
                if filter.parent() == Some(parent_name) && !found.contains(&child) {
                    found.push(child);
                    frontier.push(child);
                }
            }
        }
        found.sort_unstable();
        found
    }

    /// Indices of the filters `idx` depends on, nearest first
    pub(crate) fn ancestors_of(&self, idx: usize) -> Vec<usize> {
        let mut chain = Vec::new();
        let mut current = self.categories[idx].parent();
        while let Some(parent) = current {
            match self.position(parent) {
                Some(parent_idx) if !chain.contains(&parent_idx) => {
                    chain.push(parent_idx);
                    current = self.categories[parent_idx].parent();
                }
                _ => break,
            }
        }
        chain
    }

    pub(crate) fn is_open(&self, state: &FilterState) -> bool {
        self.gate.map_or(true, |gate| gate(state))
    }

    /// `needle` must already be lowercase
    pub(crate) fn matches_search(&self, record: &T, needle: &str) -> bool {
        needle.is_empty()
            || self.search_fields.is_empty()
            || self
                .search_fields
                .iter()
                .any(|field| field(record).to_lowercase().contains(needle))
    }

    /// Applies search first, then every category in declaration order
    pub(crate) fn matches(&self, record: &T, state: &FilterState) -> bool {
        self.matches_search(record, &state.needle)
            && self
                .categories
                .iter()
                .zip(state.values.iter())
                .all(|(filter, (_, value))| filter.matches(record, value))
    }
}

/// Current values of the search term and every declared filter
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct FilterState {
    search: String,
    #[serde(skip)]
    needle: String,
    values: Vec<(String, FilterValue)>,
}

impl FilterState {
    pub fn search_term(&self) -> &str {
        &self.search
    }

    /// The concrete value of `name`, or `None` when unset or undeclared
    pub fn value(&self, name: &str) -> Option<&str> {
        self.values
            .iter()
            .find(|(n, _)| n == name)
            .and_then(|(_, v)| v.as_deref())
    }

    pub fn is_set(&self, name: &str) -> bool {
        self.value(name).is_some()
    }

    /// True when neither the search term nor any filter narrows the collection
    pub fn is_pristine(&self) -> bool {
        self.search.is_empty() && self.values.iter().all(|(_, v)| !v.is_set())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FilterValue)> {
        self.values.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub(crate) fn set_search(&mut self, term: String) {
        self.needle = term.to_lowercase();
        self.search = term;
    }

    pub(crate) fn slot(&self, idx: usize) -> &FilterValue {
        &self.values[idx].1
    }

    pub(crate) fn set_slot(&mut self, idx: usize, value: FilterValue) {
        self.values[idx].1 = value;
    }
}
