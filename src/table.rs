//! Client-side search and pagination over an already-fetched collection.
//!
//! The table itself performs no network I/O; edit and delete are delegated
//! back to the owning screen.

use crate::api::types::{CategorySummary, Media, PlaylistSummary, Teacher, User};

pub const PAGE_SIZE: usize = 10;

/// What a row exposes to the case-insensitive substring search.
pub trait Searchable {
    fn haystack(&self) -> Vec<&str>;
}

impl Searchable for User {
    fn haystack(&self) -> Vec<&str> {
        vec![&self.name, &self.bio]
    }
}

impl Searchable for Teacher {
    fn haystack(&self) -> Vec<&str> {
        vec![&self.name, &self.bio]
    }
}

impl Searchable for Media {
    fn haystack(&self) -> Vec<&str> {
        let mut fields = vec![self.name.as_str()];
        if let Some(name_ml) = &self.name_ml {
            fields.push(name_ml);
        }
        if let Some(teacher) = &self.teacher {
            fields.push(&teacher.name);
        }
        fields
    }
}

impl Searchable for PlaylistSummary {
    fn haystack(&self) -> Vec<&str> {
        let mut fields = vec![self.name.as_str()];
        if let Some(description) = &self.description {
            fields.push(description);
        }
        fields
    }
}

impl Searchable for CategorySummary {
    fn haystack(&self) -> Vec<&str> {
        vec![&self.name]
    }
}

pub fn matches<T: Searchable>(row: &T, term: &str) -> bool {
    if term.is_empty() {
        return true;
    }
    let needle = term.to_lowercase();
    row.haystack()
        .iter()
        .any(|field| field.to_lowercase().contains(&needle))
}

/// View state for one table screen: live search term, 1-based page and the
/// cursor within the visible page.
#[derive(Debug, Clone)]
pub struct TableView {
    pub search: String,
    pub page: usize,
    pub cursor: usize,
}

impl Default for TableView {
    fn default() -> Self {
        Self::new()
    }
}

impl TableView {
    pub fn new() -> Self {
        Self {
            search: String::new(),
            page: 1,
            cursor: 0,
        }
    }

    /// Any search change resets to page 1.
    pub fn push_search_char(&mut self, c: char) {
        self.search.push(c);
        self.page = 1;
        self.cursor = 0;
    }

    pub fn pop_search_char(&mut self) {
        self.search.pop();
        self.page = 1;
        self.cursor = 0;
    }

    pub fn filtered<'a, T: Searchable>(&self, rows: &'a [T]) -> Vec<&'a T> {
        rows.iter().filter(|row| matches(*row, &self.search)).collect()
    }

    pub fn total_pages(filtered_len: usize) -> usize {
        filtered_len.div_ceil(PAGE_SIZE).max(1)
    }

    /// The slice of filtered rows on the current page.
    pub fn page_rows<'a, T: Searchable>(&self, rows: &'a [T]) -> Vec<&'a T> {
        let filtered = self.filtered(rows);
        let start = (self.page.saturating_sub(1)) * PAGE_SIZE;
        filtered.into_iter().skip(start).take(PAGE_SIZE).collect()
    }

    pub fn next_page(&mut self, filtered_len: usize) {
        if self.page < Self::total_pages(filtered_len) {
            self.page += 1;
            self.cursor = 0;
        }
    }

    pub fn prev_page(&mut self) {
        if self.page > 1 {
            self.page -= 1;
            self.cursor = 0;
        }
    }

    pub fn cursor_down(&mut self, page_len: usize) {
        if page_len > 0 && self.cursor < page_len - 1 {
            self.cursor += 1;
        }
    }

    pub fn cursor_up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    /// Range label like "Showing 11 to 20 of 34"
    pub fn range_label(&self, filtered_len: usize) -> String {
        if filtered_len == 0 {
            return "No rows".to_string();
        }
        let start = (self.page - 1) * PAGE_SIZE + 1;
        let end = (start + PAGE_SIZE - 1).min(filtered_len);
        format!("Showing {} to {} of {}", start, end, filtered_len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn media(id: &str, name: &str, teacher_name: Option<&str>) -> Media {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "name": name,
            "duration": 60,
            "isActive": true,
            "teacher": teacher_name.map(|name| serde_json::json!({"id": "t1", "name": name})),
        }))
        .unwrap()
    }

    #[test]
    fn search_matches_name_case_insensitively() {
        let row = media("m1", "Piano Basics", None);
        assert!(matches(&row, "piano"));
        assert!(matches(&row, "PIANO"));
        assert!(!matches(&row, "violin"));
    }

    #[test]
    fn search_matches_teacher_name() {
        let row = media("m1", "Scale drills", Some("Anita Menon"));
        assert!(matches(&row, "menon"));
    }

    #[test]
    fn empty_search_matches_everything() {
        let row = media("m1", "Scale drills", None);
        assert!(matches(&row, ""));
    }

    #[test]
    fn search_change_resets_page() {
        let rows: Vec<Media> = (0..25)
            .map(|i| media(&format!("m{}", i), &format!("Track {}", i), None))
            .collect();
        let mut view = TableView::new();
        view.next_page(view.filtered(&rows).len());
        assert_eq!(view.page, 2);

        view.push_search_char('t');
        assert_eq!(view.page, 1);
        assert_eq!(view.cursor, 0);
    }

    #[test]
    fn pagination_is_fixed_size_pages() {
        let rows: Vec<Media> = (0..25)
            .map(|i| media(&format!("m{}", i), &format!("Track {:02}", i), None))
            .collect();
        let view = TableView::new();
        assert_eq!(view.page_rows(&rows).len(), PAGE_SIZE);
        assert_eq!(TableView::total_pages(25), 3);

        let mut last = TableView::new();
        last.page = 3;
        assert_eq!(last.page_rows(&rows).len(), 5);
        assert_eq!(last.range_label(25), "Showing 21 to 25 of 25");
    }

    #[test]
    fn next_page_stops_at_the_last_page() {
        let mut view = TableView::new();
        view.next_page(15);
        view.next_page(15);
        assert_eq!(view.page, 2);
    }
}
