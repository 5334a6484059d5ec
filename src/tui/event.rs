/// This file is based on https://github.com/ratatui/templates/blob/main/event-driven/template/src/event.rs
use ratatui::crossterm::event::{self, Event as CrosstermEvent};
use std::{
    sync::{Arc, mpsc},
    thread,
    time::Duration,
};

use crate::api::types::{CategorySummary, Media, PlaylistSummary, Teacher, User};
use crate::forms::{EditRecord, FormPayload, Resource};
use crate::ports::AdminApi;
use crate::services::association::{self, EditorDetail, ParentKind};
use crate::services::dashboard::{self, DashboardStats};

const TIMEOUT: Duration = Duration::from_millis(100);

/// Representation of all possible events.
#[derive(Clone, Debug)]
pub enum Event {
    /// Crossterm events.
    ///
    /// These events are emitted by the terminal.
    Crossterm(CrosstermEvent),
    /// No terminal event arrived within the poll window.
    ///
    /// Ticks drive time-based state, i.e. the search debouncer.
    Tick,
    /// Application events.
    App(AppEvent),
    /// Background events.
    ///
    /// These events are emitted by the background thread.
    Background(BackgroundEvent),
}

/// Application events, emitted by input handling and processed on the next
/// loop iteration.
#[derive(Clone, Debug)]
pub enum AppEvent {
    OpenDashboard,
    OpenCollection(Resource),
    /// Open the create (id: None) or edit (id: Some) form.
    OpenForm {
        resource: Resource,
        id: Option<String>,
    },
    OpenEditor {
        kind: ParentKind,
        id: String,
    },
    SubmitForm,
    ConfirmDelete,
    /// The search debouncer fired; issue a candidate fetch.
    StartCandidateSearch,
    Attach {
        media_id: String,
    },
    Detach {
        media_id: String,
    },
}

/// One fetched collection, tagged by resource.
#[derive(Clone, Debug)]
pub enum Collection {
    Users(Vec<User>),
    Teachers(Vec<Teacher>),
    Media(Vec<Media>),
    Playlists(Vec<PlaylistSummary>),
    Categories(Vec<CategorySummary>),
}

/// Background events.
///
/// These events are emitted by the background thread.
#[derive(Clone, Debug)]
pub enum BackgroundEvent {
    DashboardLoaded(DashboardStats),
    /// Fetch failures degrade to an empty collection (already logged).
    CollectionLoaded {
        resource: Resource,
        collection: Collection,
    },
    /// None when the fetch failed; the form keeps its defaults.
    DetailLoaded {
        resource: Resource,
        record: Option<Box<EditRecord>>,
    },
    /// None when the fetch failed; the editor keeps its current panes.
    EditorLoaded {
        detail: Option<EditorDetail>,
    },
    /// None when the fetch failed; only the loading flag resets.
    CandidatesLoaded {
        generation: u64,
        pool: Option<Vec<Media>>,
    },
    /// Ok carries the created id on create, None on update.
    FormSubmitted {
        resource: Resource,
        outcome: Result<Option<String>, String>,
    },
    EntityDeleted {
        resource: Resource,
        ok: bool,
    },
    AssociationChanged {
        media_id: String,
        ok: bool,
    },
}

/// Work requests handed to the background thread.
#[derive(Clone, Debug)]
pub enum BackgroundRequest {
    LoadDashboard,
    LoadCollection(Resource),
    LoadDetail {
        resource: Resource,
        id: String,
    },
    LoadEditor {
        kind: ParentKind,
        id: String,
    },
    /// Cancels any candidate search still in flight: last request wins.
    SearchCandidates {
        generation: u64,
        search: String,
    },
    Submit {
        resource: Resource,
        id: Option<String>,
        payload: FormPayload,
    },
    Delete {
        resource: Resource,
        id: String,
    },
    Attach {
        kind: ParentKind,
        parent_id: String,
        media_id: String,
    },
    Detach {
        kind: ParentKind,
        parent_id: String,
        media_id: String,
    },
}

/// Terminal event handler.
#[derive(Debug)]
pub struct EventHandler {
    /// Event sender channel.
    sender: mpsc::Sender<Event>,
    /// Event receiver channel.
    receiver: mpsc::Receiver<Event>,
    /// Background sender channel.
    background_sender: mpsc::Sender<BackgroundRequest>,
}

impl EventHandler {
    /// Constructs a new instance of [`EventHandler`] and spawns the input
    /// and background threads.
    pub fn new(api: Arc<dyn AdminApi>) -> Self {
        let (sender, receiver) = mpsc::channel();

        let cross_term_actor = CrosstermEventThread::new(sender.clone());
        thread::spawn(|| cross_term_actor.run());

        let (background_sender, background_receiver) = mpsc::channel();
        let background_actor = BackgroundThread::new(background_receiver, sender.clone(), api);
        thread::spawn(|| {
            let rt = tokio::runtime::Runtime::new().expect("background runtime");
            rt.block_on(background_actor.run());
        });

        Self {
            sender,
            receiver,
            background_sender,
        }
    }

    /// Receives an event from the sender.
    ///
    /// This function blocks until an event is received.
    pub fn next(&self) -> color_eyre::Result<Event> {
        use color_eyre::eyre::Context;
        self.receiver.recv().wrap_err("failed to receive event")
    }

    /// Queue an app event to be processed on the next iteration of the
    /// application's event loop.
    pub fn send(&mut self, app_event: AppEvent) {
        // Ignore the result as the receiver cannot be dropped while this
        // struct still has a reference to it
        let _ = self.sender.send(Event::App(app_event));
    }

    /// Queue a work request for the background thread.
    pub fn send_background_request(&mut self, request: BackgroundRequest) {
        let _ = self.background_sender.send(request);
    }
}

/// A thread that handles reading crossterm events
struct CrosstermEventThread {
    /// Event sender channel.
    sender: mpsc::Sender<Event>,
}

impl CrosstermEventThread {
    fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    /// Polls for crossterm events, emitting a tick whenever the poll
    /// window passes quietly.
    fn run(self) -> color_eyre::Result<()> {
        use color_eyre::eyre::Context;
        loop {
            if event::poll(TIMEOUT).wrap_err("failed to poll for crossterm events")? {
                let event = event::read().wrap_err("failed to read crossterm event")?;
                self.send(Event::Crossterm(event));
            } else {
                self.send(Event::Tick);
            }
        }
    }

    /// Sends an event to the receiver.
    fn send(&self, event: Event) {
        // Ignores the result because shutting down the app drops the receiver,
        // which causes the send operation to fail. This is expected behavior.
        let _ = self.sender.send(event);
    }
}

struct BackgroundThread {
    /// Background request receiver channel.
    background_request_receiver: mpsc::Receiver<BackgroundRequest>,
    /// Event sender channel.
    sender: mpsc::Sender<Event>,
    /// Backend API handle shared by all request tasks.
    api: Arc<dyn AdminApi>,
}

impl BackgroundThread {
    fn new(
        background_request_receiver: mpsc::Receiver<BackgroundRequest>,
        sender: mpsc::Sender<Event>,
        api: Arc<dyn AdminApi>,
    ) -> Self {
        Self {
            background_request_receiver,
            sender,
            api,
        }
    }

    /// Runs the background thread.
    ///
    /// Requests spawn onto the runtime so independent mutations race
    /// freely; only the candidate search is single-flight, with the
    /// previous fetch aborted whenever a newer one is issued.
    async fn run(self) {
        let mut search_task: Option<tokio::task::JoinHandle<()>> = None;
        loop {
            let Ok(request) = self.background_request_receiver.recv() else {
                break;
            };
            let api = self.api.clone();
            let sender = self.sender.clone();
            match request {
                BackgroundRequest::SearchCandidates { generation, search } => {
                    if let Some(task) = search_task.take() {
                        task.abort();
                    }
                    search_task = Some(tokio::spawn(async move {
                        handle_search_candidates(api, sender, generation, search).await;
                    }));
                }
                other => {
                    tokio::spawn(async move {
                        handle_request(api, sender, other).await;
                    });
                }
            }
        }
    }
}

fn send_background(sender: &mpsc::Sender<Event>, event: BackgroundEvent) {
    let _ = sender.send(Event::Background(event));
}

async fn handle_search_candidates(
    api: Arc<dyn AdminApi>,
    sender: mpsc::Sender<Event>,
    generation: u64,
    search: String,
) {
    let pool = match association::fetch_candidates(api.as_ref(), &search).await {
        Ok(pool) => Some(pool),
        Err(error) => {
            log::error!("Failed to fetch candidate media: {}", error);
            None
        }
    };
    send_background(&sender, BackgroundEvent::CandidatesLoaded { generation, pool });
}

async fn handle_request(
    api: Arc<dyn AdminApi>,
    sender: mpsc::Sender<Event>,
    request: BackgroundRequest,
) {
    match request {
        BackgroundRequest::LoadDashboard => {
            let stats = dashboard::load(api.as_ref()).await;
            send_background(&sender, BackgroundEvent::DashboardLoaded(stats));
        }
        BackgroundRequest::LoadCollection(resource) => {
            let collection = load_collection(api.as_ref(), resource).await;
            send_background(
                &sender,
                BackgroundEvent::CollectionLoaded {
                    resource,
                    collection,
                },
            );
        }
        BackgroundRequest::LoadDetail { resource, id } => {
            let record = load_detail(api.as_ref(), resource, &id).await;
            send_background(
                &sender,
                BackgroundEvent::DetailLoaded {
                    resource,
                    record: record.map(Box::new),
                },
            );
        }
        BackgroundRequest::LoadEditor { kind, id } => {
            let detail = match association::load_detail(api.as_ref(), kind, &id).await {
                Ok(detail) => Some(detail),
                Err(error) => {
                    log::error!("Failed to fetch {} detail: {}", kind.label(), error);
                    None
                }
            };
            send_background(&sender, BackgroundEvent::EditorLoaded { detail });
        }
        BackgroundRequest::Submit {
            resource,
            id,
            payload,
        } => {
            let outcome = submit(api.as_ref(), id.as_deref(), payload).await;
            if let Err(error) = &outcome {
                log::error!("Failed to save {}: {}", resource.singular(), error);
            }
            send_background(&sender, BackgroundEvent::FormSubmitted { resource, outcome });
        }
        BackgroundRequest::Delete { resource, id } => {
            let result = match resource {
                Resource::Users => api.delete_user(&id).await,
                Resource::Teachers => api.delete_teacher(&id).await,
                Resource::Media => api.delete_media(&id).await,
                Resource::Playlists => api.delete_playlist(&id).await,
                Resource::Categories => api.delete_category(&id).await,
            };
            if let Err(error) = &result {
                log::error!("Failed to delete {}: {}", resource.singular(), error);
            }
            send_background(
                &sender,
                BackgroundEvent::EntityDeleted {
                    resource,
                    ok: result.is_ok(),
                },
            );
        }
        BackgroundRequest::Attach {
            kind,
            parent_id,
            media_id,
        } => {
            let result = association::attach(api.as_ref(), kind, &parent_id, &media_id).await;
            if let Err(error) = &result {
                log::error!("Failed to add media to {}: {}", kind.label(), error);
            }
            send_background(
                &sender,
                BackgroundEvent::AssociationChanged {
                    media_id,
                    ok: result.is_ok(),
                },
            );
        }
        BackgroundRequest::Detach {
            kind,
            parent_id,
            media_id,
        } => {
            let result = association::detach(api.as_ref(), kind, &parent_id, &media_id).await;
            if let Err(error) = &result {
                log::error!("Failed to remove media from {}: {}", kind.label(), error);
            }
            send_background(
                &sender,
                BackgroundEvent::AssociationChanged {
                    media_id,
                    ok: result.is_ok(),
                },
            );
        }
        BackgroundRequest::SearchCandidates { .. } => {
            // handled in the run loop so the previous fetch can be aborted
            unreachable!("search requests are dispatched by the run loop");
        }
    }
}

async fn load_collection(api: &dyn AdminApi, resource: Resource) -> Collection {
    match resource {
        Resource::Users => Collection::Users(api.users().await.unwrap_or_else(|error| {
            log::error!("Failed to fetch users: {}", error);
            Vec::new()
        })),
        Resource::Teachers => Collection::Teachers(api.teachers().await.unwrap_or_else(|error| {
            log::error!("Failed to fetch teachers: {}", error);
            Vec::new()
        })),
        Resource::Media => Collection::Media(
            api.media(1, 100, None).await.unwrap_or_else(|error| {
                log::error!("Failed to fetch media: {}", error);
                Vec::new()
            }),
        ),
        Resource::Playlists => {
            Collection::Playlists(api.playlists().await.unwrap_or_else(|error| {
                log::error!("Failed to fetch playlists: {}", error);
                Vec::new()
            }))
        }
        Resource::Categories => {
            Collection::Categories(api.categories().await.unwrap_or_else(|error| {
                log::error!("Failed to fetch categories: {}", error);
                Vec::new()
            }))
        }
    }
}

async fn load_detail(api: &dyn AdminApi, resource: Resource, id: &str) -> Option<EditRecord> {
    let record = match resource {
        // user rows already carry their full edit shape
        Resource::Users => return None,
        Resource::Teachers => api.teacher(id).await.map(EditRecord::Teacher),
        Resource::Media => api.media_by_id(id).await.map(EditRecord::Media),
        Resource::Playlists => api.playlist(id).await.map(EditRecord::Playlist),
        Resource::Categories => api.category(id).await.map(EditRecord::Category),
    };
    match record {
        Ok(record) => Some(record),
        Err(error) => {
            log::error!("Failed to fetch {} detail: {}", resource.singular(), error);
            None
        }
    }
}

async fn submit(
    api: &dyn AdminApi,
    id: Option<&str>,
    payload: FormPayload,
) -> Result<Option<String>, String> {
    let result = match (payload, id) {
        (FormPayload::User(payload), None) => api.create_user(payload).await.map(|_| None),
        (FormPayload::User(payload), Some(id)) => {
            api.update_user(id, payload).await.map(|_| None)
        }
        (FormPayload::Teacher(payload), None) => api.create_teacher(payload).await.map(|_| None),
        (FormPayload::Teacher(payload), Some(id)) => {
            api.update_teacher(id, payload).await.map(|_| None)
        }
        (FormPayload::Media(payload), None) => api.create_media(payload).await.map(|_| None),
        (FormPayload::Media(payload), Some(id)) => {
            api.update_media(id, payload).await.map(|_| None)
        }
        // creating a playlist or category opens its media editor, so the
        // new id is handed back
        (FormPayload::Playlist(payload), None) => {
            api.create_playlist(payload).await.map(|created| Some(created.id))
        }
        (FormPayload::Playlist(payload), Some(id)) => {
            api.update_playlist(id, payload).await.map(|_| None)
        }
        (FormPayload::Category(payload), None) => {
            api.create_category(payload).await.map(|created| Some(created.id))
        }
        (FormPayload::Category(payload), Some(id)) => {
            api.update_category(id, payload).await.map(|_| None)
        }
    };
    result.map_err(|error| error.to_string())
}
