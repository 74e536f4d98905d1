//! Filtered, paginated and selectable views over an in-memory record collection.
//!
//! A [`FilteredPageModel`] owns a snapshot of records, the [`FilterSpec`] that
//! describes how they can be narrowed, the current [`FilterState`], the page
//! cursor and a [`SelectionSet`] that survives paging and filtering.

mod filter;
mod index;
mod model;
mod page;
mod selection;

pub use filter::{CategoryFilter, FieldAccessor, FilterSpec, FilterState, FilterValue, Gate, MatchMode};
pub use model::FilteredPageModel;
pub use page::{Page, PageEntry};
pub use selection::SelectionSet;

/// A record that can be listed, paged and selected.
///
/// The id must be stable for the lifetime of a snapshot; it is the key used
/// for selection and for pruning selections when records are re-supplied.
pub trait Record {
    fn id(&self) -> &str;
}

impl<R: Record + ?Sized> Record for &R {
    fn id(&self) -> &str {
        (**self).id()
    }
}
