use crate::Record;
use crate::filter::{FilterSpec, FilterState, FilterValue};
use crate::index::IdIndex;
use crate::page::{Page, PageEntry};
use crate::selection::SelectionSet;
use shared::{Error, Result};
use std::collections::HashSet;
use tracing::{debug, info};

/// Clamps a requested page into `[1, total_pages]`, or 1 when there are no pages
fn clamp_page(requested: usize, total_pages: usize) -> usize {
    if total_pages == 0 {
        1
    } else {
        requested.clamp(1, total_pages)
    }
}

/// Search, category filters, pagination and cross-page selection over one record snapshot.
///
/// The model never mutates the records it was given. Hosts apply their own
/// commands to the source collection and hand the new snapshot back through
/// [`FilteredPageModel::replace_records`].
pub struct FilteredPageModel<T: Record> {
    records: Vec<T>,
    index: IdIndex,
    spec: FilterSpec<T>,
    state: FilterState,
    page: usize,
    page_size: usize,
    selection: SelectionSet,
}

impl<T: Record> FilteredPageModel<T> {
    /// Fails with `InvalidPageSize` for a zero page size and with `UnknownFilter`
    /// when a filter depends on one that is not declared before it
    pub fn new(records: Vec<T>, spec: FilterSpec<T>, page_size: usize) -> Result<Self> {
        if page_size == 0 {
            return Err(Error::InvalidPageSize(page_size));
        }
        spec.validate()?;

        let index = IdIndex::build(&records);
        let state = spec.initial_state();
        debug!(
            "Listing created with {} records, page size {}",
            records.len(),
            page_size
        );

        Ok(Self {
            records,
            index,
            spec,
            state,
            page: 1,
            page_size,
            selection: SelectionSet::new(),
        })
    }

    pub fn records(&self) -> &[T] {
        &self.records
    }

    pub fn record(&self, id: &str) -> Option<&T> {
        self.index.position(id).map(|position| &self.records[position])
    }

    pub fn spec(&self) -> &FilterSpec<T> {
        &self.spec
    }

    pub fn filter_state(&self) -> &FilterState {
        &self.state
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    // ---- filters -------------------------------------------------------

    /// Case-insensitive; an empty term matches everything. Resets to page 1.
    pub fn set_search_term(&mut self, term: impl Into<String>) {
        let term = term.into();
        debug!("Search term set to {:?}", term);
        self.state.set_search(term);
        self.page = 1;
    }

    /// Sets one declared filter and resets to page 1.
    ///
    /// When the value actually changes, every filter depending on `name`
    /// (directly or transitively) goes back to unset.
    pub fn set_category_filter(&mut self, name: &str, value: impl Into<FilterValue>) -> Result<()> {
        let idx = self
            .spec
            .position(name)
            .ok_or_else(|| Error::UnknownFilter(name.to_string()))?;
        let value = value.into();

        if self.state.slot(idx) != &value {
            for child in self.spec.dependents_of(idx) {
                if self.state.slot(child).is_set() {
                    debug!(
                        "Resetting filter '{}' after '{}' changed",
                        self.spec.categories()[child].name(),
                        name
                    );
                }
                self.state.set_slot(child, FilterValue::Unset);
            }
        }

        debug!("Filter '{}' set to {:?}", name, value);
        self.state.set_slot(idx, value);
        self.page = 1;
        Ok(())
    }

    /// Clears the search term and every filter; the selection is kept
    pub fn reset_filters(&mut self) {
        self.state = self.spec.initial_state();
        self.page = 1;
    }

    /// False while the filter gate hides every record
    pub fn is_open(&self) -> bool {
        self.spec.is_open(&self.state)
    }

    /// Distinct non-empty values of a filter's field across the records that
    /// pass the filters it depends on, in collection order
    pub fn options(&self, name: &str) -> Result<Vec<String>> {
        let idx = self
            .spec
            .position(name)
            .ok_or_else(|| Error::UnknownFilter(name.to_string()))?;
        let categories = self.spec.categories();
        let filter = &categories[idx];
        let ancestors = self.spec.ancestors_of(idx);

        let mut seen = HashSet::new();
        let mut values = Vec::new();
        for record in &self.records {
            let in_scope = ancestors
                .iter()
                .all(|&a| categories[a].matches(record, self.state.slot(a)));
            if !in_scope {
                continue;
            }
            if let Some(value) = filter.field_value(record) {
                if !value.is_empty() && seen.insert(value) {
                    values.push(value.to_string());
                }
            }
        }
        Ok(values)
    }

    // ---- derived views -------------------------------------------------

    fn filtered_iter(&self) -> impl Iterator<Item = &T> + '_ {
        let open = self.is_open();
        self.records
            .iter()
            .filter(move |record| open && self.spec.matches(record, &self.state))
    }

    /// Every record passing the active filters, in collection order
    pub fn filtered(&self) -> Vec<&T> {
        self.filtered_iter().collect()
    }

    pub fn filtered_count(&self) -> usize {
        self.filtered_iter().count()
    }

    pub fn total_pages(&self) -> usize {
        self.filtered_count().div_ceil(self.page_size)
    }

    pub fn current_page(&self) -> usize {
        clamp_page(self.page, self.total_pages())
    }

    pub fn visible_page(&self) -> Page<'_, T> {
        let filtered = self.filtered();
        let total_items = filtered.len();
        let total_pages = total_items.div_ceil(self.page_size);
        let page_number = clamp_page(self.page, total_pages);
        let start = (page_number - 1) * self.page_size;

        let items = filtered
            .into_iter()
            .skip(start)
            .take(self.page_size)
            .map(|record| PageEntry {
                selected: self.selection.contains(record.id()),
                record,
            })
            .collect();

        Page {
            items,
            page_number,
            page_size: self.page_size,
            total_items,
            total_pages,
        }
    }

    // ---- navigation ----------------------------------------------------

    /// Moves to page `n`, clamped into range; returns the page actually shown
    pub fn go_to_page(&mut self, n: usize) -> usize {
        let target = clamp_page(n, self.total_pages());
        if target != n {
            debug!("Requested page {} clamped to {}", n, target);
        }
        self.page = target;
        target
    }

    pub fn next_page(&mut self) -> usize {
        self.go_to_page(self.current_page() + 1)
    }

    pub fn previous_page(&mut self) -> usize {
        self.go_to_page(self.current_page().saturating_sub(1))
    }

    // ---- selection -----------------------------------------------------

    fn filtered_ids(&self) -> Vec<String> {
        self.filtered_iter().map(|r| r.id().to_string()).collect()
    }

    fn page_ids(&self) -> Vec<String> {
        self.visible_page()
            .records()
            .map(|r| r.id().to_string())
            .collect()
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selection.contains(id)
    }

    /// Flips one record; returns whether it is selected afterwards.
    /// Ids that are not in the collection are ignored.
    pub fn toggle_select(&mut self, id: &str) -> bool {
        if !self.index.contains(id) {
            debug!("Ignoring selection of unknown record {:?}", id);
            return false;
        }
        if self.selection.remove(id) {
            false
        } else {
            self.selection.insert(id)
        }
    }

    /// Replaces the selection with every record passing the filters, on every page
    pub fn select_all_filtered(&mut self) -> usize {
        let ids = self.filtered_ids();
        self.selection.reset_to(ids.iter().map(String::as_str));
        info!("Selected all {} filtered records", ids.len());
        ids.len()
    }

    /// Adds the visible page to the selection; returns how many were newly added
    pub fn select_current_page(&mut self) -> usize {
        let ids = self.page_ids();
        ids.iter().filter(|id| self.selection.insert(id)).count()
    }

    pub fn clear_selection(&mut self) {
        if !self.selection.is_empty() {
            debug!("Clearing {} selected records", self.selection.len());
        }
        self.selection.clear();
    }

    /// True when the visible page has rows and all of them are selected
    pub fn is_page_selected(&self) -> bool {
        let page = self.visible_page();
        !page.is_empty() && page.items.iter().all(|entry| entry.selected)
    }

    /// True when the selection is exactly the non-empty filtered set
    pub fn is_all_filtered_selected(&self) -> bool {
        let ids = self.filtered_ids();
        !ids.is_empty() && self.selection.equals(ids.iter().map(String::as_str))
    }

    /// "Select page" / "Deselect page"
    pub fn toggle_current_page(&mut self) {
        let ids = self.page_ids();
        if !ids.is_empty() && ids.iter().all(|id| self.selection.contains(id)) {
            for id in &ids {
                self.selection.remove(id);
            }
        } else {
            for id in &ids {
                self.selection.insert(id);
            }
        }
    }

    /// "Select all" / "Deselect all"
    pub fn toggle_all_filtered(&mut self) {
        if self.is_all_filtered_selected() {
            self.clear_selection();
        } else {
            self.select_all_filtered();
        }
    }

    /// Selected records in collection order, whether or not they pass the filters
    pub fn selected_records(&self) -> Vec<&T> {
        self.records
            .iter()
            .filter(|r| self.selection.contains(r.id()))
            .collect()
    }

    /// Rows to export: every filtered row while nothing is selected, otherwise
    /// the filtered rows that are selected (possibly none)
    pub fn export_rows(&self) -> Vec<&T> {
        let filtered = self.filtered();
        if self.selection.is_empty() {
            return filtered;
        }
        filtered
            .into_iter()
            .filter(|r| self.selection.contains(r.id()))
            .collect()
    }

    // ---- re-supply -----------------------------------------------------

    /// Swaps in a new snapshot, dropping selections whose records vanished
    pub fn replace_records(&mut self, records: Vec<T>) {
        let index = IdIndex::build(&records);
        let before = self.selection.len();
        self.selection.retain(|id| index.contains(id));
        let pruned = before - self.selection.len();

        self.records = records;
        self.index = index;
        self.page = clamp_page(self.page, self.total_pages());

        info!(
            "Listing re-supplied with {} records ({} stale selections dropped)",
            self.records.len(),
            pruned
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CategoryFilter;
    use crate::fixtures::{Member, member, member_spec, numbered};

    fn model(records: Vec<Member>, page_size: usize) -> FilteredPageModel<Member> {
        FilteredPageModel::new(records, member_spec(), page_size).unwrap()
    }

    #[test]
    fn test_zero_page_size_is_rejected() {
        let result = FilteredPageModel::new(numbered(3), member_spec(), 0);
        assert!(matches!(result, Err(Error::InvalidPageSize(0))));
    }

    #[test]
    fn test_forty_five_records_in_pages_of_twenty() {
        let mut listing = model(numbered(45), 20);

        let first = listing.visible_page();
        assert_eq!(first.items.len(), 20);
        assert_eq!(first.total_pages, 3);
        assert_eq!(first.total_items, 45);

        assert_eq!(listing.go_to_page(3), 3);
        let last = listing.visible_page();
        assert_eq!(last.items.len(), 5);
        assert_eq!(last.records().next().map(|m| m.id.as_str()), Some("41"));
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let mut listing = model(
            vec![
                member(1, "John Anderson", "active", "admin"),
                member(2, "Michael Chen", "active", "user"),
                member(3, "Emily Davis", "inactive", "user"),
            ],
            20,
        );
        listing.set_search_term("chen");

        let page = listing.visible_page();
        assert_eq!(page.total_items, 1);
        assert_eq!(page.items[0].record.name, "Michael Chen");
    }

    #[test]
    fn test_empty_result_reports_page_one() {
        let mut listing = model(numbered(5), 2);
        listing.set_search_term("nobody");

        let page = listing.visible_page();
        assert!(page.items.is_empty());
        assert_eq!(page.total_pages, 0);
        assert_eq!(page.page_number, 1);
        assert_eq!(listing.go_to_page(4), 1);
    }

    #[test]
    fn test_go_to_page_clamps_both_ends() {
        let mut listing = model(numbered(45), 20);
        assert_eq!(listing.go_to_page(0), 1);
        assert_eq!(listing.go_to_page(99), 3);
        assert_eq!(listing.next_page(), 3);
        assert_eq!(listing.previous_page(), 2);
    }

    #[test]
    fn test_unknown_filter_is_an_error() {
        let mut listing = model(numbered(3), 20);
        let result = listing.set_category_filter("department", "SDE");
        assert_eq!(result, Err(Error::UnknownFilter("department".to_string())));
        assert!(matches!(listing.options("department"), Err(Error::UnknownFilter(_))));
    }

    #[test]
    fn test_changing_parent_resets_dependent_and_page() {
        let mut records = numbered(30);
        records.push(member(31, "Lisa Rodriguez", "inactive", "viewer"));
        let mut listing = model(records, 10);

        listing.set_category_filter("status", "active").unwrap();
        listing.set_category_filter("role", "user").unwrap();
        listing.go_to_page(2);
        assert_eq!(listing.current_page(), 2);

        listing.set_category_filter("status", "inactive").unwrap();
        assert!(!listing.filter_state().is_set("role"));
        assert_eq!(listing.current_page(), 1);
        assert_eq!(listing.filtered_count(), 1);
    }

    #[test]
    fn test_same_parent_value_keeps_dependent() {
        let mut listing = model(numbered(5), 10);
        listing.set_category_filter("status", "active").unwrap();
        listing.set_category_filter("role", "user").unwrap();
        listing.set_category_filter("status", "active").unwrap();

        assert_eq!(listing.filter_state().value("role"), Some("user"));
    }

    #[test]
    fn test_sentinel_value_turns_filter_off() {
        let mut listing = model(
            vec![
                member(1, "Ada", "active", "user"),
                member(2, "Bo", "inactive", "user"),
            ],
            10,
        );
        listing.set_category_filter("status", "inactive").unwrap();
        assert_eq!(listing.filtered_count(), 1);

        listing.set_category_filter("status", "all").unwrap();
        assert_eq!(listing.filtered_count(), 2);
    }

    #[test]
    fn test_select_all_covers_every_filtered_page() {
        let mut listing = model(numbered(45), 20);
        listing.go_to_page(2);

        assert_eq!(listing.select_all_filtered(), 45);
        assert_eq!(listing.selection().len(), 45);
        assert!(listing.is_all_filtered_selected());
    }

    #[test]
    fn test_select_all_replaces_off_filter_selection() {
        let mut listing = model(
            vec![
                member(1, "Ada", "active", "user"),
                member(2, "Bo", "inactive", "user"),
                member(3, "Cy", "active", "user"),
            ],
            10,
        );
        listing.toggle_select("2");
        listing.set_category_filter("status", "active").unwrap();
        listing.select_all_filtered();

        let ids: Vec<&str> = listing.selection().iter().collect();
        assert_eq!(ids, vec!["1", "3"]);
    }

    #[test]
    fn test_select_current_page_is_additive_and_idempotent() {
        let mut listing = model(numbered(45), 20);
        listing.toggle_select("45");

        assert_eq!(listing.select_current_page(), 20);
        let after_first = listing.selection().clone();
        assert_eq!(listing.select_current_page(), 0);

        assert_eq!(listing.selection(), &after_first);
        assert!(listing.is_selected("45"));
        assert_eq!(listing.selection().len(), 21);
    }

    #[test]
    fn test_filter_change_keeps_selection() {
        let mut listing = model(numbered(5), 10);
        listing.toggle_select("1");
        listing.set_search_term("Member 2");

        assert!(listing.is_selected("1"));
        assert_eq!(listing.selected_records().len(), 1);
    }

    #[test]
    fn test_toggle_unknown_id_is_ignored() {
        let mut listing = model(numbered(2), 10);
        assert!(!listing.toggle_select("404"));
        assert!(listing.selection().is_empty());

        assert!(listing.toggle_select("1"));
        assert!(!listing.toggle_select("1"));
        assert!(listing.selection().is_empty());
    }

    #[test]
    fn test_page_toggle_deselects_a_fully_selected_page() {
        let mut listing = model(numbered(25), 20);
        listing.toggle_current_page();
        assert!(listing.is_page_selected());

        listing.toggle_current_page();
        assert!(listing.selection().is_empty());
    }

    #[test]
    fn test_all_toggle_clears_when_everything_is_selected() {
        let mut listing = model(numbered(25), 20);
        listing.toggle_all_filtered();
        assert_eq!(listing.selection().len(), 25);

        listing.toggle_all_filtered();
        assert!(listing.selection().is_empty());
    }

    #[test]
    fn test_visible_page_marks_selected_rows() {
        let mut listing = model(numbered(3), 10);
        listing.toggle_select("2");

        let flags: Vec<bool> = listing.visible_page().items.iter().map(|e| e.selected).collect();
        assert_eq!(flags, vec![false, true, false]);
    }

    #[test]
    fn test_export_rows_prefers_selected() {
        let mut listing = model(numbered(4), 10);
        assert_eq!(listing.export_rows().len(), 4);

        listing.toggle_select("3");
        let rows: Vec<&str> = listing.export_rows().iter().map(|m| m.id.as_str()).collect();
        assert_eq!(rows, vec!["3"]);
    }

    #[test]
    fn test_export_rows_with_selection_hidden_by_search() {
        let mut listing = model(numbered(5), 10);
        listing.toggle_select("1");
        listing.set_search_term("Member 2");

        assert!(listing.export_rows().is_empty());

        listing.clear_selection();
        let rows: Vec<&str> = listing.export_rows().iter().map(|m| m.id.as_str()).collect();
        assert_eq!(rows, vec!["2"]);
    }

    #[test]
    fn test_replace_records_prunes_selection_and_clamps_page() {
        let mut listing = model(numbered(45), 20);
        listing.toggle_select("44");
        listing.toggle_select("2");
        listing.go_to_page(3);

        listing.replace_records(numbered(30));

        assert!(!listing.is_selected("44"));
        assert!(listing.is_selected("2"));
        assert_eq!(listing.current_page(), 2);
        assert_eq!(listing.record("30").map(|m| m.name.as_str()), Some("Member 30"));
    }

    #[test]
    fn test_options_follow_parent_filter() {
        let mut listing = model(
            vec![
                member(1, "Ada", "active", "admin"),
                member(2, "Bo", "active", "user"),
                member(3, "Cy", "inactive", "viewer"),
                member(4, "Di", "active", "user"),
            ],
            10,
        );
        assert_eq!(listing.options("role").unwrap(), vec!["admin", "user", "viewer"]);

        listing.set_category_filter("status", "active").unwrap();
        assert_eq!(listing.options("role").unwrap(), vec!["admin", "user"]);
        assert_eq!(listing.options("status").unwrap(), vec!["active", "inactive"]);
    }

    #[test]
    fn test_gate_hides_records_until_required_filter_is_chosen() {
        fn status_chosen(state: &FilterState) -> bool {
            state.is_set("status")
        }
        let spec = FilterSpec::new()
            .category(CategoryFilter::equals("status", |m: &Member| m.status.as_str()))
            .gate(status_chosen);
        let mut listing = FilteredPageModel::new(numbered(3), spec, 10).unwrap();

        assert!(!listing.is_open());
        assert_eq!(listing.visible_page().total_pages, 0);
        assert_eq!(listing.select_all_filtered(), 0);

        listing.set_category_filter("status", "active").unwrap();
        assert!(listing.is_open());
        assert_eq!(listing.visible_page().total_items, 3);
    }

    #[test]
    fn test_reset_filters_keeps_selection() {
        let mut listing = model(numbered(5), 2);
        listing.toggle_select("5");
        listing.set_search_term("Member 5");
        listing.reset_filters();

        assert!(listing.filter_state().is_pristine());
        assert_eq!(listing.filtered_count(), 5);
        assert!(listing.is_selected("5"));
    }
}
