use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;

use color_eyre::Result;

use crate::api::types::{
    AdminProfile, CategorySummary, Media, PlaylistSummary, Teacher, User,
};
use crate::forms::{EditRecord, EntityForm, Resource};
use crate::ports::AdminApi;
use crate::services::association::{AssociationEditor, ParentKind};
use crate::services::dashboard::DashboardStats;
use crate::table::TableView;
use crate::tui::event::{
    AppEvent, BackgroundEvent, BackgroundRequest, Collection, Event, EventHandler,
};
use crate::tui::input::handle_key_event;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Dashboard,
    Collection(Resource),
    /// The media-association editor for one playlist or category.
    Editor,
}

#[derive(Debug, Clone)]
pub struct DeleteTarget {
    pub resource: Resource,
    pub id: String,
    pub label: String,
    pub submitting: bool,
}

pub struct App {
    pub profile: AdminProfile,
    pub screen: Screen,
    pub dashboard: Option<DashboardStats>,

    pub users: Vec<User>,
    pub teachers: Vec<Teacher>,
    pub media: Vec<Media>,
    pub playlists: Vec<PlaylistSummary>,
    pub categories: Vec<CategorySummary>,
    loading: HashSet<Resource>,

    pub table: TableView,
    pub search_active: bool,

    pub form: Option<EntityForm>,
    pub form_loading: bool,
    pub delete_target: Option<DeleteTarget>,
    pub editor: Option<AssociationEditor>,

    pub status_message: Option<String>,

    /// Event handler.
    pub running: bool,
    pub events: EventHandler,
}

impl App {
    pub fn new(api: Arc<dyn AdminApi>, profile: AdminProfile) -> Self {
        let mut app = Self {
            profile,
            screen: Screen::Dashboard,
            dashboard: None,
            users: Vec::new(),
            teachers: Vec::new(),
            media: Vec::new(),
            playlists: Vec::new(),
            categories: Vec::new(),
            loading: HashSet::new(),
            table: TableView::new(),
            search_active: false,
            form: None,
            form_loading: false,
            delete_target: None,
            editor: None,
            status_message: Some("Ready".to_string()),
            running: true,
            events: EventHandler::new(api),
        };
        app.events
            .send_background_request(BackgroundRequest::LoadDashboard);
        app
    }

    pub async fn run(
        &mut self,
        terminal: &mut ratatui::prelude::Terminal<
            ratatui::prelude::CrosstermBackend<std::io::Stdout>,
        >,
    ) -> Result<()> {
        while self.running {
            terminal.draw(|f| crate::tui::ui::render(f, self))?;
            self.handle_events()?;
        }

        Ok(())
    }

    fn handle_events(&mut self) -> Result<()> {
        match self.events.next()? {
            Event::Crossterm(event) => match event {
                crossterm::event::Event::Key(key_event)
                    if key_event.kind == crossterm::event::KeyEventKind::Press =>
                {
                    handle_key_event(self, key_event)?
                }
                _ => {}
            },
            Event::Tick => self.on_tick(),
            Event::App(app_event) => self.on_app_event(app_event),
            Event::Background(background_event) => self.on_background_event(background_event),
        }
        Ok(())
    }

    fn on_tick(&mut self) {
        let now = Instant::now();
        let fired = self
            .editor
            .as_mut()
            .is_some_and(|editor| editor.debounce.poll(now));
        if fired {
            self.events.send(AppEvent::StartCandidateSearch);
        }
    }

    fn on_app_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::OpenDashboard => {
                self.screen = Screen::Dashboard;
                self.editor = None;
                self.events
                    .send_background_request(BackgroundRequest::LoadDashboard);
            }
            AppEvent::OpenCollection(resource) => {
                self.screen = Screen::Collection(resource);
                self.editor = None;
                self.table = TableView::new();
                self.search_active = false;
                self.request_collection(resource);
            }
            AppEvent::OpenForm { resource, id } => {
                let mut form = EntityForm::new(resource, id.clone());
                self.form_loading = false;
                match (resource, id) {
                    // user rows already carry every editable field
                    (Resource::Users, Some(user_id)) => {
                        if let Some(user) = self.users.iter().find(|user| user.id == user_id) {
                            form.populate(&EditRecord::User(user.clone()));
                        }
                    }
                    (_, Some(entity_id)) => {
                        self.form_loading = true;
                        self.events.send_background_request(BackgroundRequest::LoadDetail {
                            resource,
                            id: entity_id,
                        });
                    }
                    (_, None) => {}
                }
                // the teacher select needs its options
                if matches!(resource, Resource::Media | Resource::Playlists)
                    && self.teachers.is_empty()
                {
                    self.events
                        .send_background_request(BackgroundRequest::LoadCollection(
                            Resource::Teachers,
                        ));
                }
                self.form = Some(form);
            }
            AppEvent::OpenEditor { kind, id } => {
                let mut editor = AssociationEditor::new(kind, id.clone());
                self.screen = Screen::Editor;
                self.events
                    .send_background_request(BackgroundRequest::LoadEditor { kind, id });
                let generation = editor.next_generation();
                self.events
                    .send_background_request(BackgroundRequest::SearchCandidates {
                        generation,
                        search: String::new(),
                    });
                self.editor = Some(editor);
            }
            AppEvent::SubmitForm => {
                if let Some(form) = &mut self.form {
                    if form.submitting || !form.validate() {
                        return;
                    }
                    form.submitting = true;
                    self.events.send_background_request(BackgroundRequest::Submit {
                        resource: form.resource,
                        id: form.id.clone(),
                        payload: form.payload(),
                    });
                }
            }
            AppEvent::ConfirmDelete => {
                if let Some(target) = &mut self.delete_target {
                    if target.submitting {
                        return;
                    }
                    target.submitting = true;
                    self.events.send_background_request(BackgroundRequest::Delete {
                        resource: target.resource,
                        id: target.id.clone(),
                    });
                }
            }
            AppEvent::StartCandidateSearch => {
                if let Some(editor) = &mut self.editor {
                    let generation = editor.next_generation();
                    self.events
                        .send_background_request(BackgroundRequest::SearchCandidates {
                            generation,
                            search: editor.search.clone(),
                        });
                }
            }
            AppEvent::Attach { media_id } => {
                if let Some(editor) = &mut self.editor {
                    if !editor.begin_mutation(&media_id) {
                        return;
                    }
                    self.events.send_background_request(BackgroundRequest::Attach {
                        kind: editor.kind,
                        parent_id: editor.parent_id.clone(),
                        media_id,
                    });
                }
            }
            AppEvent::Detach { media_id } => {
                if let Some(editor) = &mut self.editor {
                    if !editor.begin_mutation(&media_id) {
                        return;
                    }
                    self.events.send_background_request(BackgroundRequest::Detach {
                        kind: editor.kind,
                        parent_id: editor.parent_id.clone(),
                        media_id,
                    });
                }
            }
        }
    }

    fn on_background_event(&mut self, event: BackgroundEvent) {
        match event {
            BackgroundEvent::DashboardLoaded(stats) => {
                self.dashboard = Some(stats);
            }
            BackgroundEvent::CollectionLoaded {
                resource,
                collection,
            } => {
                self.loading.remove(&resource);
                match collection {
                    Collection::Users(rows) => self.users = rows,
                    Collection::Teachers(rows) => self.teachers = rows,
                    Collection::Media(rows) => self.media = rows,
                    Collection::Playlists(rows) => self.playlists = rows,
                    Collection::Categories(rows) => self.categories = rows,
                }
            }
            BackgroundEvent::DetailLoaded { resource, record } => {
                self.form_loading = false;
                if let (Some(form), Some(record)) = (&mut self.form, record) {
                    if form.resource == resource {
                        form.populate(&record);
                    }
                }
            }
            BackgroundEvent::EditorLoaded { detail } => {
                if let Some(editor) = &mut self.editor {
                    match detail {
                        Some(detail) => editor.apply_detail(detail),
                        None => editor.loading_detail = false,
                    }
                }
            }
            BackgroundEvent::CandidatesLoaded { generation, pool } => {
                if let Some(editor) = &mut self.editor {
                    match pool {
                        Some(pool) => editor.apply_candidates(generation, pool),
                        None if generation == editor.current_generation() => {
                            editor.loading_candidates = false;
                        }
                        None => {}
                    }
                }
            }
            BackgroundEvent::FormSubmitted { resource, outcome } => match outcome {
                Ok(created_id) => {
                    self.form = None;
                    self.status_message = Some(format!("Saved {}", resource.singular()));
                    self.request_collection(resource);
                    if let Some(id) = created_id {
                        let kind = match resource {
                            Resource::Categories => ParentKind::Category,
                            _ => ParentKind::Playlist,
                        };
                        self.events.send(AppEvent::OpenEditor { kind, id });
                    }
                }
                Err(_) => {
                    // already logged; the dialog stays open for a retry
                    if let Some(form) = &mut self.form {
                        form.submitting = false;
                    }
                }
            },
            BackgroundEvent::EntityDeleted { resource, ok } => {
                if ok {
                    self.delete_target = None;
                    self.status_message = Some(format!("Deleted {}", resource.singular()));
                    self.request_collection(resource);
                } else if let Some(target) = &mut self.delete_target {
                    target.submitting = false;
                }
            }
            BackgroundEvent::AssociationChanged { media_id, ok } => {
                if let Some(editor) = &mut self.editor {
                    editor.finish_mutation(&media_id);
                    if ok {
                        // targeted refresh instead of reloading the world:
                        // re-fetch the parent detail, then the candidates
                        // against the new selected set
                        editor.loading_detail = true;
                        self.events
                            .send_background_request(BackgroundRequest::LoadEditor {
                                kind: editor.kind,
                                id: editor.parent_id.clone(),
                            });
                        let generation = editor.next_generation();
                        self.events
                            .send_background_request(BackgroundRequest::SearchCandidates {
                                generation,
                                search: editor.search.clone(),
                            });
                    }
                }
            }
        }
    }

    fn request_collection(&mut self, resource: Resource) {
        self.loading.insert(resource);
        self.events
            .send_background_request(BackgroundRequest::LoadCollection(resource));
    }

    pub fn is_loading(&self, resource: Resource) -> bool {
        self.loading.contains(&resource)
    }

    /// (id, display label) of the row under the cursor on the current
    /// collection screen.
    pub fn current_row(&self) -> Option<(String, String)> {
        let Screen::Collection(resource) = self.screen else {
            return None;
        };
        let cursor = self.table.cursor;
        match resource {
            Resource::Users => self
                .table
                .page_rows(&self.users)
                .get(cursor)
                .map(|row| (row.id.clone(), row.name.clone())),
            Resource::Teachers => self
                .table
                .page_rows(&self.teachers)
                .get(cursor)
                .map(|row| (row.id.clone(), row.name.clone())),
            Resource::Media => self
                .table
                .page_rows(&self.media)
                .get(cursor)
                .map(|row| (row.id.clone(), row.name.clone())),
            Resource::Playlists => self
                .table
                .page_rows(&self.playlists)
                .get(cursor)
                .map(|row| (row.id.clone(), row.name.clone())),
            Resource::Categories => self
                .table
                .page_rows(&self.categories)
                .get(cursor)
                .map(|row| (row.id.clone(), row.name.clone())),
        }
    }

    pub fn filtered_len(&self) -> usize {
        let Screen::Collection(resource) = self.screen else {
            return 0;
        };
        match resource {
            Resource::Users => self.table.filtered(&self.users).len(),
            Resource::Teachers => self.table.filtered(&self.teachers).len(),
            Resource::Media => self.table.filtered(&self.media).len(),
            Resource::Playlists => self.table.filtered(&self.playlists).len(),
            Resource::Categories => self.table.filtered(&self.categories).len(),
        }
    }

    pub fn page_len(&self) -> usize {
        let Screen::Collection(resource) = self.screen else {
            return 0;
        };
        match resource {
            Resource::Users => self.table.page_rows(&self.users).len(),
            Resource::Teachers => self.table.page_rows(&self.teachers).len(),
            Resource::Media => self.table.page_rows(&self.media).len(),
            Resource::Playlists => self.table.page_rows(&self.playlists).len(),
            Resource::Categories => self.table.page_rows(&self.categories).len(),
        }
    }

    pub fn quit(&mut self) {
        self.running = false;
    }
}
