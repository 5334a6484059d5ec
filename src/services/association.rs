//! The media-association editor: reconcile a playlist's or category's
//! current media set with operator intent across two panes.
//!
//! The candidate pane holds active media matching the current search that
//! the parent does not hold yet; the selected pane holds the parent's
//! current associations. The two are disjoint by construction.

use std::collections::HashSet;
use std::time::{Duration, Instant};

use crate::api::error::ApiError;
use crate::api::types::{AssociatedMediaSummary, Media};
use crate::ports::AdminApi;
use crate::services::debounce::Debouncer;

pub const CANDIDATE_PAGE: u32 = 1;
pub const CANDIDATE_LIMIT: u32 = 30;
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParentKind {
    Playlist,
    Category,
}

impl ParentKind {
    pub fn label(&self) -> &'static str {
        match self {
            ParentKind::Playlist => "playlist",
            ParentKind::Category => "category",
        }
    }
}

/// Parent detail reduced to what the editor needs.
#[derive(Debug, Clone)]
pub struct EditorDetail {
    pub name: String,
    pub associated: Vec<AssociatedMediaSummary>,
}

pub async fn load_detail(
    api: &dyn AdminApi,
    kind: ParentKind,
    parent_id: &str,
) -> Result<EditorDetail, ApiError> {
    match kind {
        ParentKind::Playlist => {
            let detail = api.playlist(parent_id).await?;
            Ok(EditorDetail {
                name: detail.name_en.clone(),
                associated: detail.associated_media(),
            })
        }
        ParentKind::Category => {
            let detail = api.category(parent_id).await?;
            Ok(EditorDetail {
                name: detail.name_en.clone(),
                associated: detail.associated_media(),
            })
        }
    }
}

/// Fetch one page of the candidate pool, server-side filtered by the
/// search term. Client-side filtering happens in [`filter_candidates`].
pub async fn fetch_candidates(api: &dyn AdminApi, search: &str) -> Result<Vec<Media>, ApiError> {
    api.media(CANDIDATE_PAGE, CANDIDATE_LIMIT, Some(search)).await
}

pub async fn attach(
    api: &dyn AdminApi,
    kind: ParentKind,
    parent_id: &str,
    media_id: &str,
) -> Result<(), ApiError> {
    match kind {
        ParentKind::Playlist => api.add_media_to_playlist(parent_id, media_id).await,
        ParentKind::Category => api.add_media_to_category(parent_id, media_id).await,
    }
}

pub async fn detach(
    api: &dyn AdminApi,
    kind: ParentKind,
    parent_id: &str,
    media_id: &str,
) -> Result<(), ApiError> {
    match kind {
        ParentKind::Playlist => api.remove_media_from_playlist(parent_id, media_id).await,
        ParentKind::Category => api.remove_media_from_category(parent_id, media_id).await,
    }
}

/// Keep only active media not already held by the parent.
pub fn filter_candidates(pool: Vec<Media>, selected_ids: &HashSet<String>) -> Vec<Media> {
    pool.into_iter()
        .filter(|media| media.is_active && !selected_ids.contains(&media.id))
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorPane {
    Candidates,
    Selected,
}

#[derive(Debug)]
pub struct AssociationEditor {
    pub kind: ParentKind,
    pub parent_id: String,
    pub parent_name: String,
    pub search: String,
    pub debounce: Debouncer,
    /// Monotonic id of the newest candidate fetch; results from older
    /// fetches are discarded even if their abort lost the race.
    generation: u64,
    pub loading_detail: bool,
    pub loading_candidates: bool,
    pub candidates: Vec<Media>,
    pub selected: Vec<AssociatedMediaSummary>,
    pub selected_ids: HashSet<String>,
    /// Media ids with an in-flight add/remove; that row's action is
    /// disabled while the rest stay operable.
    pub pending: HashSet<String>,
    pub pane: EditorPane,
    pub candidate_cursor: usize,
    pub selected_cursor: usize,
}

impl AssociationEditor {
    pub fn new(kind: ParentKind, parent_id: String) -> Self {
        Self {
            kind,
            parent_id,
            parent_name: String::new(),
            search: String::new(),
            debounce: Debouncer::new(SEARCH_DEBOUNCE),
            generation: 0,
            loading_detail: true,
            loading_candidates: false,
            candidates: Vec::new(),
            selected: Vec::new(),
            selected_ids: HashSet::new(),
            pending: HashSet::new(),
            pane: EditorPane::Candidates,
            candidate_cursor: 0,
            selected_cursor: 0,
        }
    }

    /// Apply a freshly fetched parent detail. Any candidate now held by the
    /// parent is dropped immediately so the panes never overlap while the
    /// follow-up candidate fetch is in flight.
    pub fn apply_detail(&mut self, detail: EditorDetail) {
        self.parent_name = detail.name;
        self.selected_ids = detail
            .associated
            .iter()
            .map(|media| media.id.clone())
            .collect();
        self.selected = detail.associated;
        self.loading_detail = false;
        self.candidates
            .retain(|media| !self.selected_ids.contains(&media.id));
        self.clamp_cursors();
    }

    /// Bump and return the generation for a new candidate fetch.
    pub fn next_generation(&mut self) -> u64 {
        self.generation += 1;
        self.loading_candidates = true;
        self.generation
    }

    pub fn current_generation(&self) -> u64 {
        self.generation
    }

    /// Apply a completed candidate fetch unless a newer one was issued.
    pub fn apply_candidates(&mut self, generation: u64, pool: Vec<Media>) {
        if generation != self.generation {
            return;
        }
        self.candidates = filter_candidates(pool, &self.selected_ids);
        self.loading_candidates = false;
        self.clamp_cursors();
    }

    pub fn push_search_char(&mut self, c: char, now: Instant) {
        self.search.push(c);
        self.debounce.touch(now);
    }

    pub fn pop_search_char(&mut self, now: Instant) {
        self.search.pop();
        self.debounce.touch(now);
    }

    /// Mark a row's mutation as in flight. False when that row already has
    /// one, so duplicate submissions for the same pair are dropped.
    pub fn begin_mutation(&mut self, media_id: &str) -> bool {
        self.pending.insert(media_id.to_string())
    }

    pub fn finish_mutation(&mut self, media_id: &str) {
        self.pending.remove(media_id);
    }

    pub fn is_pending(&self, media_id: &str) -> bool {
        self.pending.contains(media_id)
    }

    pub fn cursor_row_id(&self) -> Option<&str> {
        match self.pane {
            EditorPane::Candidates => self
                .candidates
                .get(self.candidate_cursor)
                .map(|media| media.id.as_str()),
            EditorPane::Selected => self
                .selected
                .get(self.selected_cursor)
                .map(|media| media.id.as_str()),
        }
    }

    pub fn toggle_pane(&mut self) {
        self.pane = match self.pane {
            EditorPane::Candidates => EditorPane::Selected,
            EditorPane::Selected => EditorPane::Candidates,
        };
    }

    pub fn cursor_down(&mut self) {
        match self.pane {
            EditorPane::Candidates => {
                if self.candidate_cursor + 1 < self.candidates.len() {
                    self.candidate_cursor += 1;
                }
            }
            EditorPane::Selected => {
                if self.selected_cursor + 1 < self.selected.len() {
                    self.selected_cursor += 1;
                }
            }
        }
    }

    pub fn cursor_up(&mut self) {
        match self.pane {
            EditorPane::Candidates => {
                self.candidate_cursor = self.candidate_cursor.saturating_sub(1)
            }
            EditorPane::Selected => self.selected_cursor = self.selected_cursor.saturating_sub(1),
        }
    }

    fn clamp_cursors(&mut self) {
        self.candidate_cursor = self
            .candidate_cursor
            .min(self.candidates.len().saturating_sub(1));
        self.selected_cursor = self
            .selected_cursor
            .min(self.selected.len().saturating_sub(1));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::MockAdminApi;

    fn media(id: &str, name: &str, active: bool) -> Media {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "name": name,
            "duration": 120,
            "isActive": active,
        }))
        .unwrap()
    }

    fn summary(id: &str, name: &str) -> AssociatedMediaSummary {
        AssociatedMediaSummary {
            id: id.to_string(),
            name: name.to_string(),
            duration: "2:00".to_string(),
            is_active: true,
            created_at: String::new(),
        }
    }

    fn detail(name: &str, associated: Vec<AssociatedMediaSummary>) -> EditorDetail {
        EditorDetail {
            name: name.to_string(),
            associated,
        }
    }

    #[test]
    fn candidate_and_selected_panes_stay_disjoint() {
        let mut editor = AssociationEditor::new(ParentKind::Playlist, "p1".into());
        editor.apply_detail(detail("Morning Ragas", vec![summary("m1", "Held")]));

        let generation = editor.next_generation();
        editor.apply_candidates(
            generation,
            vec![
                media("m1", "Held", true),
                media("m2", "Free", true),
                media("m3", "Inactive", false),
            ],
        );

        let candidate_ids: Vec<&str> =
            editor.candidates.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(candidate_ids, vec!["m2"]);
        for candidate in &editor.candidates {
            assert!(!editor.selected_ids.contains(&candidate.id));
        }
    }

    #[test]
    fn refreshed_detail_evicts_newly_held_candidates() {
        let mut editor = AssociationEditor::new(ParentKind::Playlist, "p1".into());
        editor.apply_detail(detail("Morning Ragas", vec![]));
        let generation = editor.next_generation();
        editor.apply_candidates(generation, vec![media("m7", "Piano Intro", true)]);
        assert_eq!(editor.candidates.len(), 1);

        // add succeeded on the backend; the refreshed detail now holds m7
        editor.apply_detail(detail("Morning Ragas", vec![summary("m7", "Piano Intro")]));
        assert!(editor.candidates.is_empty());
        assert!(editor.selected_ids.contains("m7"));
    }

    #[test]
    fn stale_candidate_results_are_discarded() {
        let mut editor = AssociationEditor::new(ParentKind::Playlist, "p1".into());
        editor.apply_detail(detail("Morning Ragas", vec![]));

        let stale = editor.next_generation();
        let fresh = editor.next_generation();
        editor.apply_candidates(fresh, vec![media("m2", "Fresh", true)]);
        editor.apply_candidates(stale, vec![media("m1", "Stale", true)]);

        let ids: Vec<&str> = editor.candidates.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["m2"]);
        assert!(!editor.loading_candidates);
    }

    #[test]
    fn duplicate_submissions_for_one_row_are_dropped() {
        let mut editor = AssociationEditor::new(ParentKind::Category, "c1".into());
        assert!(editor.begin_mutation("m1"));
        assert!(!editor.begin_mutation("m1"));
        // other rows stay operable
        assert!(editor.begin_mutation("m2"));

        editor.finish_mutation("m1");
        assert!(editor.begin_mutation("m1"));
    }

    #[test]
    fn search_edits_arm_the_debouncer() {
        let start = Instant::now();
        let mut editor = AssociationEditor::new(ParentKind::Playlist, "p1".into());
        editor.push_search_char('p', start);
        editor.push_search_char('i', start + Duration::from_millis(100));
        assert_eq!(editor.search, "pi");
        assert!(!editor.debounce.poll(start + Duration::from_millis(550)));
        assert!(editor.debounce.poll(start + Duration::from_millis(600)));
    }

    #[tokio::test]
    async fn load_detail_reduces_playlist_associations() {
        let mut api = MockAdminApi::new();
        api.expect_playlist().returning(|_| {
            Ok(serde_json::from_value(serde_json::json!({
                "id": "p1",
                "name_en": "Morning Ragas",
                "mediaToPlaylist": [
                    {"mediaId": {"id": "m7", "name_en": "Piano Intro", "duration": "3:05", "isActive": true}}
                ]
            }))
            .unwrap())
        });

        let detail = load_detail(&api, ParentKind::Playlist, "p1").await.unwrap();
        assert_eq!(detail.name, "Morning Ragas");
        assert_eq!(detail.associated.len(), 1);
        assert_eq!(detail.associated[0].id, "m7");
    }

    #[tokio::test]
    async fn detach_failure_leaves_the_selected_set_alone() {
        let mut api = MockAdminApi::new();
        api.expect_remove_media_from_playlist().returning(|_, _| {
            Err(ApiError::Status {
                status: reqwest::StatusCode::NOT_FOUND,
                message: "Failed to remove media from playlist".to_string(),
            })
        });

        let mut editor = AssociationEditor::new(ParentKind::Playlist, "p1".into());
        editor.apply_detail(detail("Morning Ragas", vec![summary("m1", "Held")]));

        assert!(editor.begin_mutation("m9"));
        let result = detach(&api, editor.kind, &editor.parent_id, "m9").await;
        assert!(result.is_err());
        editor.finish_mutation("m9");

        // the failed removal of a non-member never grows the selected set
        assert_eq!(editor.selected.len(), 1);
        assert!(!editor.selected_ids.contains("m9"));
        assert!(!editor.is_pending("m9"));
    }

    #[tokio::test]
    async fn add_flow_moves_media_between_panes_after_refresh() {
        let mut api = MockAdminApi::new();
        api.expect_media().returning(|_, _, _| {
            Ok(vec![
                media("m7", "Piano Intro", true),
                media("m8", "Piano Outro", true),
            ])
        });
        api.expect_add_media_to_playlist()
            .withf(|playlist_id, media_id| playlist_id == "p1" && media_id == "m7")
            .times(1)
            .returning(|_, _| Ok(()));
        let playlist_media = std::sync::Mutex::new(Vec::<String>::new());
        api.expect_playlist().returning(move |_| {
            let mut held_ids = playlist_media.lock().unwrap();
            let held: Vec<serde_json::Value> = held_ids
                .iter()
                .map(|id| {
                    serde_json::json!({"mediaId": {"id": id, "name_en": "Piano Intro", "isActive": true}})
                })
                .collect();
            // the next refresh sees the attach that happened in between
            held_ids.push("m7".to_string());
            drop(held_ids);
            Ok(serde_json::from_value(serde_json::json!({
                "id": "p1",
                "name_en": "Morning Ragas",
                "mediaToPlaylist": held,
            }))
            .unwrap())
        });

        let mut editor = AssociationEditor::new(ParentKind::Playlist, "p1".into());

        // initial load: no associations yet
        let initial = load_detail(&api, editor.kind, &editor.parent_id).await.unwrap();
        editor.apply_detail(initial);
        assert!(editor.selected.is_empty());

        // debounced search completes
        let generation = editor.next_generation();
        let pool = fetch_candidates(&api, "piano").await.unwrap();
        editor.apply_candidates(generation, pool);
        assert_eq!(editor.candidates.len(), 2);

        // operator adds m7; on success the editor re-fetches the detail
        assert!(editor.begin_mutation("m7"));
        attach(&api, editor.kind, &editor.parent_id, "m7").await.unwrap();
        editor.finish_mutation("m7");
        let refreshed = load_detail(&api, editor.kind, &editor.parent_id).await.unwrap();
        editor.apply_detail(refreshed);

        // and the follow-up candidate fetch excludes it
        let generation = editor.next_generation();
        let pool = fetch_candidates(&api, "piano").await.unwrap();
        editor.apply_candidates(generation, pool);

        assert!(editor.selected_ids.contains("m7"));
        let ids: Vec<&str> = editor.candidates.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["m8"]);
    }
}
