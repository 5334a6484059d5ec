use std::time::Instant;

use color_eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::forms::{FieldKind, Resource};
use crate::services::association::{EditorPane, ParentKind};
use crate::tui::app::{App, DeleteTarget, Screen};
use crate::tui::event::AppEvent;

pub fn handle_key_event(app: &mut App, key: KeyEvent) -> Result<()> {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.quit();
        return Ok(());
    }

    // overlays swallow input before the screen underneath sees it
    if app.form.is_some() {
        handle_form_input(app, key);
        return Ok(());
    }
    if app.delete_target.is_some() {
        handle_delete_input(app, key);
        return Ok(());
    }

    match app.screen {
        Screen::Dashboard => handle_dashboard_input(app, key),
        Screen::Collection(resource) => handle_collection_input(app, key, resource),
        Screen::Editor => handle_editor_input(app, key),
    }
    Ok(())
}

fn screen_hotkey(app: &mut App, key: KeyEvent) -> bool {
    let event = match key.code {
        KeyCode::Char('1') => Some(AppEvent::OpenDashboard),
        KeyCode::Char('2') => Some(AppEvent::OpenCollection(Resource::Users)),
        KeyCode::Char('3') => Some(AppEvent::OpenCollection(Resource::Teachers)),
        KeyCode::Char('4') => Some(AppEvent::OpenCollection(Resource::Media)),
        KeyCode::Char('5') => Some(AppEvent::OpenCollection(Resource::Playlists)),
        KeyCode::Char('6') => Some(AppEvent::OpenCollection(Resource::Categories)),
        _ => None,
    };
    match event {
        Some(event) => {
            app.events.send(event);
            true
        }
        None => false,
    }
}

fn next_screen(screen: Screen) -> AppEvent {
    match screen {
        Screen::Dashboard => AppEvent::OpenCollection(Resource::Users),
        Screen::Collection(Resource::Users) => AppEvent::OpenCollection(Resource::Teachers),
        Screen::Collection(Resource::Teachers) => AppEvent::OpenCollection(Resource::Media),
        Screen::Collection(Resource::Media) => AppEvent::OpenCollection(Resource::Playlists),
        Screen::Collection(Resource::Playlists) => AppEvent::OpenCollection(Resource::Categories),
        Screen::Collection(Resource::Categories) | Screen::Editor => AppEvent::OpenDashboard,
    }
}

fn handle_dashboard_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.quit(),
        KeyCode::Char('r') => app.events.send(AppEvent::OpenDashboard),
        KeyCode::Tab => {
            let event = next_screen(app.screen);
            app.events.send(event);
        }
        _ => {
            screen_hotkey(app, key);
        }
    }
}

fn handle_collection_input(app: &mut App, key: KeyEvent, resource: Resource) {
    if app.search_active {
        match key.code {
            KeyCode::Esc | KeyCode::Enter => app.search_active = false,
            KeyCode::Char(c) => app.table.push_search_char(c),
            KeyCode::Backspace => app.table.pop_search_char(),
            _ => {}
        }
        return;
    }

    match key.code {
        KeyCode::Char('q') => app.quit(),
        KeyCode::Char('/') => app.search_active = true,
        KeyCode::Char('r') => app.events.send(AppEvent::OpenCollection(resource)),
        KeyCode::Tab => {
            let event = next_screen(app.screen);
            app.events.send(event);
        }
        KeyCode::Up | KeyCode::Char('k') => app.table.cursor_up(),
        KeyCode::Down | KeyCode::Char('j') => {
            let page_len = app.page_len();
            app.table.cursor_down(page_len);
        }
        KeyCode::Left => app.table.prev_page(),
        KeyCode::Right => {
            let filtered_len = app.filtered_len();
            app.table.next_page(filtered_len);
        }
        KeyCode::Char('n') => app.events.send(AppEvent::OpenForm { resource, id: None }),
        KeyCode::Char('e') | KeyCode::Enter => {
            if let Some((id, _)) = app.current_row() {
                app.events.send(AppEvent::OpenForm {
                    resource,
                    id: Some(id),
                });
            }
        }
        KeyCode::Char('d') => {
            if let Some((id, label)) = app.current_row() {
                app.delete_target = Some(DeleteTarget {
                    resource,
                    id,
                    label,
                    submitting: false,
                });
            }
        }
        KeyCode::Char('m') => {
            let kind = match resource {
                Resource::Playlists => Some(ParentKind::Playlist),
                Resource::Categories => Some(ParentKind::Category),
                _ => None,
            };
            if let (Some(kind), Some((id, _))) = (kind, app.current_row()) {
                app.events.send(AppEvent::OpenEditor { kind, id });
            }
        }
        _ => {
            screen_hotkey(app, key);
        }
    }
}

fn handle_editor_input(app: &mut App, key: KeyEvent) {
    let Some(editor) = &mut app.editor else {
        return;
    };
    match key.code {
        KeyCode::Esc => {
            // back to the owning collection, which re-fetches
            let resource = match editor.kind {
                ParentKind::Playlist => Resource::Playlists,
                ParentKind::Category => Resource::Categories,
            };
            app.editor = None;
            app.events.send(AppEvent::OpenCollection(resource));
        }
        KeyCode::Tab => editor.toggle_pane(),
        KeyCode::Up => editor.cursor_up(),
        KeyCode::Down => editor.cursor_down(),
        KeyCode::Enter => {
            let Some(media_id) = editor.cursor_row_id().map(str::to_string) else {
                return;
            };
            if editor.is_pending(&media_id) {
                return;
            }
            let event = match editor.pane {
                EditorPane::Candidates => AppEvent::Attach { media_id },
                EditorPane::Selected => AppEvent::Detach { media_id },
            };
            app.events.send(event);
        }
        // everything printable edits the candidate search
        KeyCode::Char(c) => editor.push_search_char(c, Instant::now()),
        KeyCode::Backspace => editor.pop_search_char(Instant::now()),
        _ => {}
    }
}

fn handle_form_input(app: &mut App, key: KeyEvent) {
    let Some(form) = &mut app.form else {
        return;
    };
    match key.code {
        KeyCode::Esc => {
            app.form = None;
            app.form_loading = false;
        }
        KeyCode::Enter => app.events.send(AppEvent::SubmitForm),
        KeyCode::Tab | KeyCode::Down => form.focus_next(),
        KeyCode::BackTab | KeyCode::Up => form.focus_prev(),
        KeyCode::Left | KeyCode::Right => {
            let forward = key.code == KeyCode::Right;
            form.cycle_teacher(&app.teachers, forward);
        }
        KeyCode::Char(' ') if form.focused_field().kind == FieldKind::Toggle => {
            form.toggle_focused();
        }
        KeyCode::Char(c) => form.input_char(c),
        KeyCode::Backspace => form.backspace(),
        _ => {}
    }
}

fn handle_delete_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('n') => {
            let submitting = app
                .delete_target
                .as_ref()
                .is_some_and(|target| target.submitting);
            if !submitting {
                app.delete_target = None;
            }
        }
        KeyCode::Enter | KeyCode::Char('y') => app.events.send(AppEvent::ConfirmDelete),
        _ => {}
    }
}
