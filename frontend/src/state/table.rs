//! Client-side search and pagination over a fetched record list.

use crate::config::DEFAULT_PAGE_SIZE;

/// Anything the table can search. Each returned string is matched
/// case-insensitively as a literal substring.
pub trait Searchable {
    fn search_fields(&self) -> Vec<String>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableState<T> {
    records: Vec<T>,
    query: String,
    filtered: Vec<usize>,
    current_page: usize,
    page_size: usize,
}

impl<T: Searchable> Default for TableState<T> {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl<T: Searchable> TableState<T> {
    pub fn new(page_size: usize) -> Self {
        Self {
            records: Vec::new(),
            query: String::new(),
            filtered: Vec::new(),
            current_page: 1,
            page_size: page_size.max(1),
        }
    }

    pub fn with_records(page_size: usize, records: Vec<T>) -> Self {
        let mut state = Self::new(page_size);
        state.replace_records(records);
        state
    }

    pub fn records(&self) -> &[T] {
        &self.records
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn filtered_len(&self) -> usize {
        self.filtered.len()
    }

    pub fn has_data(&self) -> bool {
        !self.records.is_empty()
    }

    /// Records matching the current query, in original order.
    pub fn filtered(&self) -> impl Iterator<Item = &T> + '_ {
        self.filtered.iter().map(|&i| &self.records[i])
    }

    /// Any query change lands back on page 1.
    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
        self.refilter();
        self.current_page = 1;
    }

    /// Swaps in a fresh record list. The query survives; the page does not.
    pub fn replace_records(&mut self, records: Vec<T>) {
        self.records = records;
        self.refilter();
        self.current_page = 1;
    }

    /// `ceil(filtered / page_size)`, or 0 when nothing matches.
    pub fn total_pages(&self) -> usize {
        self.filtered.len().div_ceil(self.page_size)
    }

    /// Moves to `page` when it lies in `1..=total_pages`; otherwise leaves the
    /// state untouched and returns false.
    pub fn go_to_page(&mut self, page: i64) -> bool {
        let total = self.total_pages() as i64;
        if page < 1 || page > total {
            return false;
        }
        self.current_page = page as usize;
        true
    }

    pub fn next_page(&mut self) -> bool {
        self.go_to_page(self.current_page as i64 + 1)
    }

    pub fn prev_page(&mut self) -> bool {
        self.go_to_page(self.current_page as i64 - 1)
    }

    pub fn has_prev(&self) -> bool {
        self.current_page > 1
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages()
    }

    /// Zero-based `[start, end)` slice of the filtered list for the current page.
    pub fn page_bounds(&self) -> (usize, usize) {
        let start = ((self.current_page - 1) * self.page_size).min(self.filtered.len());
        let end = (start + self.page_size).min(self.filtered.len());
        (start, end)
    }

    pub fn page_data(&self) -> Vec<&T> {
        let (start, end) = self.page_bounds();
        self.filtered[start..end]
            .iter()
            .map(|&i| &self.records[i])
            .collect()
    }

    fn refilter(&mut self) {
        let needle = self.query.to_lowercase();
        self.filtered = self
            .records
            .iter()
            .enumerate()
            .filter(|(_, record)| matches_query(*record, &needle))
            .map(|(i, _)| i)
            .collect();
    }
}

fn matches_query<T: Searchable>(record: &T, needle: &str) -> bool {
    needle.is_empty()
        || record
            .search_fields()
            .iter()
            .any(|field| field.to_lowercase().contains(needle))
}
