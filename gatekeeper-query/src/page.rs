use serde::Serialize;

/// One row of a visible page, annotated with its selection status
#[derive(Debug, Serialize)]
pub struct PageEntry<'a, T> {
    pub record: &'a T,
    pub selected: bool,
}

/// The slice of the filtered collection a presentation layer renders.
///
/// Derived on demand, never stored. `page_number` is always at least 1, even
/// when `total_pages` is 0.
#[derive(Debug, Serialize)]
pub struct Page<'a, T> {
    pub items: Vec<PageEntry<'a, T>>,
    pub page_number: usize,
    pub page_size: usize,
    pub total_items: usize,
    pub total_pages: usize,
}

impl<'a, T> Page<'a, T> {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn records(&self) -> impl Iterator<Item = &'a T> + '_ {
        self.items.iter().map(|entry| entry.record)
    }

    pub fn has_previous(&self) -> bool {
        self.page_number > 1
    }

    pub fn has_next(&self) -> bool {
        self.page_number < self.total_pages
    }

    /// 1-based positions of the first and last item shown, for "Showing X to Y of Z"
    pub fn range(&self) -> Option<(usize, usize)> {
        if self.items.is_empty() {
            return None;
        }
        let start = (self.page_number - 1) * self.page_size + 1;
        Some((start, start + self.items.len() - 1))
    }

    /// Up to `max_buttons` consecutive page numbers, centred on the current page where possible
    pub fn window(&self, max_buttons: usize) -> Vec<usize> {
        let width = max_buttons.min(self.total_pages);
        if width == 0 {
            return Vec::new();
        }
        let mut start = self.page_number.saturating_sub(width / 2).max(1);
        let mut end = start + width - 1;
        if end > self.total_pages {
            end = self.total_pages;
            start = end + 1 - width;
        }
        (start..=end).collect()
    }
}
