use gatekeeper_query::{CategoryFilter, FilterSpec, FilteredPageModel, Record};
use proptest::prelude::*;
use std::collections::BTreeSet;

const NAMES: [&str; 4] = ["Alice Chen", "Bob Stone", "Carol Chen", "Dave Brown"];
const STATUSES: [&str; 2] = ["active", "inactive"];
const ROLES: [&str; 3] = ["admin", "user", "viewer"];

#[derive(Clone, Debug)]
struct Account {
    id: String,
    name: String,
    status: String,
    role: String,
}

impl Record for Account {
    fn id(&self) -> &str {
        &self.id
    }
}

fn spec() -> FilterSpec<Account> {
    FilterSpec::new()
        .search(|a: &Account| a.name.as_str())
        .category(CategoryFilter::equals("status", |a: &Account| a.status.as_str()))
        .category(CategoryFilter::equals("role", |a: &Account| a.role.as_str()).depends_on("status"))
}

fn accounts() -> impl Strategy<Value = Vec<Account>> {
    prop::collection::vec((0..NAMES.len(), 0..STATUSES.len(), 0..ROLES.len()), 0..60).prop_map(
        |rows| {
            rows.into_iter()
                .enumerate()
                .map(|(i, (n, s, r))| Account {
                    id: format!("acc-{}", i),
                    name: NAMES[n].to_string(),
                    status: STATUSES[s].to_string(),
                    role: ROLES[r].to_string(),
                })
                .collect()
        },
    )
}

fn filter_value() -> impl Strategy<Value = Option<usize>> {
    prop::option::of(0..STATUSES.len())
}

proptest! {
    #[test]
    fn visible_items_satisfy_every_active_predicate(
        records in accounts(),
        size in 1usize..25,
        term in "(chen|STONE|o|)",
        status in filter_value(),
        page in 0usize..8,
    ) {
        let mut listing = FilteredPageModel::new(records.clone(), spec(), size).unwrap();
        listing.set_search_term(term.clone());
        if let Some(s) = status {
            listing.set_category_filter("status", STATUSES[s]).unwrap();
        }
        listing.go_to_page(page);

        let visible = listing.visible_page();
        prop_assert!(visible.items.len() <= size);
        for account in visible.records() {
            prop_assert!(records.iter().any(|r| r.id == account.id));
            prop_assert!(account.name.to_lowercase().contains(&term.to_lowercase()));
            if let Some(s) = status {
                prop_assert_eq!(account.status.as_str(), STATUSES[s]);
            }
        }
    }

    #[test]
    fn total_pages_is_ceiling_of_filtered_count(
        records in accounts(),
        size in 1usize..25,
        status in filter_value(),
    ) {
        let mut listing = FilteredPageModel::new(records, spec(), size).unwrap();
        if let Some(s) = status {
            listing.set_category_filter("status", STATUSES[s]).unwrap();
        }

        let visible = listing.visible_page();
        let count = listing.filtered_count();
        prop_assert_eq!(visible.total_pages, count.div_ceil(size));
        if count == 0 {
            prop_assert_eq!(visible.total_pages, 0);
            prop_assert_eq!(visible.page_number, 1);
        }
    }

    #[test]
    fn changing_a_filter_resets_to_page_one(
        records in accounts(),
        size in 1usize..10,
        page in 1usize..8,
        status in 0..STATUSES.len(),
    ) {
        let mut listing = FilteredPageModel::new(records, spec(), size).unwrap();
        listing.go_to_page(page);

        listing.set_category_filter("status", STATUSES[status]).unwrap();
        prop_assert_eq!(listing.current_page(), 1);
        listing.set_category_filter("status", STATUSES[status]).unwrap();
        prop_assert_eq!(listing.current_page(), 1);

        listing.go_to_page(page);
        listing.set_search_term("c");
        prop_assert_eq!(listing.current_page(), 1);
    }

    #[test]
    fn select_all_equals_filtered_ids_on_any_page(
        records in accounts(),
        size in 1usize..10,
        page in 1usize..8,
        term in "(chen|b|)",
    ) {
        let mut listing = FilteredPageModel::new(records, spec(), size).unwrap();
        listing.set_search_term(term);
        listing.go_to_page(page);
        listing.select_all_filtered();

        let expected: BTreeSet<String> = listing.filtered().iter().map(|a| a.id.clone()).collect();
        let actual: BTreeSet<String> = listing.selection().iter().map(str::to_string).collect();
        prop_assert_eq!(actual, expected);
    }

    #[test]
    fn select_current_page_twice_is_idempotent(
        records in accounts(),
        size in 1usize..10,
        page in 1usize..8,
    ) {
        let mut listing = FilteredPageModel::new(records, spec(), size).unwrap();
        listing.go_to_page(page);

        listing.select_current_page();
        let once = listing.selection().clone();
        listing.select_current_page();
        prop_assert_eq!(listing.selection(), &once);
    }

    #[test]
    fn go_to_page_is_stable(
        records in accounts(),
        size in 1usize..10,
        n in 0usize..12,
    ) {
        let mut listing = FilteredPageModel::new(records, spec(), size).unwrap();

        let first = listing.go_to_page(n);
        let first_ids: Vec<String> = listing.visible_page().records().map(|a| a.id.clone()).collect();
        let second = listing.go_to_page(n);
        let second_ids: Vec<String> = listing.visible_page().records().map(|a| a.id.clone()).collect();

        prop_assert_eq!(first, second);
        prop_assert_eq!(first_ids, second_ids);
    }
}
