use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, List, Paragraph, Row, Table, Wrap},
};

use crate::forms::{EntityForm, FieldKind, Resource};
use crate::services::association::{AssociationEditor, EditorPane};
use crate::table::TableView;
use crate::tui::app::{App, DeleteTarget, Screen};
use crate::tui::widgets::{
    active_badge, centered_rect, format_date, format_duration, render_candidate_item,
    render_input_field, render_selected_item,
};

pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Body
            Constraint::Length(3), // Status bar
            Constraint::Length(1), // Help text
        ])
        .split(area);

    render_header(frame, chunks[0], app);

    match app.screen {
        Screen::Dashboard => render_dashboard(frame, chunks[1], app),
        Screen::Collection(resource) => render_collection(frame, chunks[1], app, resource),
        Screen::Editor => render_editor(frame, chunks[1], app),
    }

    let status = app.status_message.as_deref().unwrap_or("Ready");
    let status_para =
        Paragraph::new(format!("Status: {}", status)).block(Block::default().borders(Borders::ALL));
    frame.render_widget(status_para, chunks[2]);

    let help = Paragraph::new(help_text(app)).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(help, chunks[3]);

    if let Some(form) = &app.form {
        render_form(frame, area, app, form);
    }
    if let Some(target) = &app.delete_target {
        render_delete(frame, area, target);
    }
}

fn help_text(app: &App) -> &'static str {
    if app.form.is_some() {
        return "[Enter: Save] [Tab: Next Field] [Space: Toggle] [←→: Select Teacher] [Esc: Cancel]";
    }
    if app.delete_target.is_some() {
        return "[Enter: Confirm] [Esc: Cancel]";
    }
    match app.screen {
        Screen::Dashboard => "[Tab/1-6: Navigate] [r: Refresh] [q: Quit]",
        Screen::Collection(_) if app.search_active => "[Type to filter] [Enter/Esc: Done]",
        Screen::Collection(Resource::Playlists) | Screen::Collection(Resource::Categories) => {
            "[/: Search] [n: New] [e: Edit] [d: Delete] [m: Manage Media] [←→: Page] [Tab: Next] [q: Quit]"
        }
        Screen::Collection(_) => {
            "[/: Search] [n: New] [e: Edit] [d: Delete] [←→: Page] [Tab: Next] [q: Quit]"
        }
        Screen::Editor => "[Type: Search] [Tab: Pane] [↑↓: Navigate] [Enter: Add/Remove] [Esc: Back]",
    }
}

fn render_header(frame: &mut Frame, area: Rect, app: &App) {
    let tabs = [
        ("1", "Dashboard", app.screen == Screen::Dashboard),
        (
            "2",
            "Users",
            app.screen == Screen::Collection(Resource::Users),
        ),
        (
            "3",
            "Teachers",
            app.screen == Screen::Collection(Resource::Teachers),
        ),
        (
            "4",
            "Media",
            app.screen == Screen::Collection(Resource::Media),
        ),
        (
            "5",
            "Playlists",
            app.screen == Screen::Collection(Resource::Playlists),
        ),
        (
            "6",
            "Categories",
            app.screen == Screen::Collection(Resource::Categories),
        ),
    ];

    let mut spans = Vec::new();
    for (key, label, current) in tabs {
        let style = if current {
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        spans.push(Span::styled(format!(" {}:{} ", key, label), style));
    }

    let title = format!("AudioAdmin — {}", app.profile.name);
    let header = Paragraph::new(Line::from(spans)).block(
        Block::default().borders(Borders::ALL).title(title).title_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
    );
    frame.render_widget(header, area);
}

fn render_dashboard(frame: &mut Frame, area: Rect, app: &App) {
    let Some(stats) = &app.dashboard else {
        let loading = Paragraph::new("Loading dashboard...")
            .block(Block::default().borders(Borders::ALL))
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(loading, area);
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5), // Stat cards
            Constraint::Min(0),    // Recent uploads
        ])
        .split(area);

    let cards = [
        ("Total Users", stats.users),
        ("Total Teachers", stats.teachers),
        ("Total Media", stats.media),
        ("Total Playlists", stats.playlists),
        ("Total Categories", stats.categories),
    ];
    let card_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(20); 5])
        .split(chunks[0]);
    for ((title, value), card_area) in cards.iter().zip(card_chunks.iter()) {
        let card = Paragraph::new(Line::from(Span::styled(
            value.to_string(),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )))
        .block(Block::default().borders(Borders::ALL).title(*title));
        frame.render_widget(card, *card_area);
    }

    let items: Vec<_> = stats
        .recent_media
        .iter()
        .map(|media| {
            let teacher = media
                .teacher
                .as_ref()
                .map(|teacher| teacher.name.as_str())
                .unwrap_or("Unknown");
            Line::from(vec![
                Span::raw(format!("{} ", media.name)),
                active_badge(media.is_active),
                Span::styled(
                    format!(
                        "  {} | {} | Added {}",
                        teacher,
                        format_duration(media.duration),
                        format_date(&media.created_at)
                    ),
                    Style::default().fg(Color::DarkGray),
                ),
            ])
        })
        .collect();
    let recent = Paragraph::new(items)
        .block(Block::default().borders(Borders::ALL).title("Recent Uploads"));
    frame.render_widget(recent, chunks[1]);
}

fn render_collection(frame: &mut Frame, area: Rect, app: &App, resource: Resource) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Search
            Constraint::Min(0),    // Table
            Constraint::Length(1), // Pagination
        ])
        .split(area);

    render_input_field(
        frame,
        chunks[0],
        "Search (/ to edit)",
        &app.table.search,
        app.search_active,
    );

    if app.is_loading(resource) {
        let loading = Paragraph::new(format!("Loading {}...", resource.title().to_lowercase()))
            .block(Block::default().borders(Borders::ALL))
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(loading, chunks[1]);
        return;
    }

    let (header, rows, widths) = collection_rows(app, resource);

    if rows.is_empty() {
        let message = if app.table.search.is_empty() {
            format!("No {} found.", resource.title().to_lowercase())
        } else {
            format!(
                "No {} found matching your search.",
                resource.title().to_lowercase()
            )
        };
        let empty = Paragraph::new(message)
            .block(Block::default().borders(Borders::ALL))
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, chunks[1]);
    } else {
        let table = Table::new(rows, widths)
            .header(
                Row::new(header).style(
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                ),
            )
            .block(Block::default().borders(Borders::ALL).title(resource.title()));
        frame.render_widget(table, chunks[1]);
    }

    let filtered_len = app.filtered_len();
    let footer = Paragraph::new(format!(
        "{} | Page {} of {}",
        app.table.range_label(filtered_len),
        app.table.page,
        TableView::total_pages(filtered_len)
    ))
    .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(footer, chunks[2]);
}

fn selected_style(is_selected: bool) -> Style {
    if is_selected {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    }
}

type TableParts = (Vec<&'static str>, Vec<Row<'static>>, Vec<Constraint>);

fn collection_rows(app: &App, resource: Resource) -> TableParts {
    let cursor = app.table.cursor;
    match resource {
        Resource::Users => (
            vec!["Name", "Bio", "Created"],
            app.table
                .page_rows(&app.users)
                .iter()
                .enumerate()
                .map(|(idx, user)| {
                    Row::new(vec![
                        user.name.clone(),
                        user.bio.clone(),
                        format_date(&user.created_at),
                    ])
                    .style(selected_style(idx == cursor))
                })
                .collect(),
            vec![
                Constraint::Percentage(30),
                Constraint::Percentage(50),
                Constraint::Percentage(20),
            ],
        ),
        Resource::Teachers => (
            vec!["Name", "Bio", "Created"],
            app.table
                .page_rows(&app.teachers)
                .iter()
                .enumerate()
                .map(|(idx, teacher)| {
                    Row::new(vec![
                        teacher.name.clone(),
                        teacher.bio.clone(),
                        format_date(&teacher.created_at),
                    ])
                    .style(selected_style(idx == cursor))
                })
                .collect(),
            vec![
                Constraint::Percentage(30),
                Constraint::Percentage(50),
                Constraint::Percentage(20),
            ],
        ),
        Resource::Media => (
            vec!["Name", "Teacher", "Duration", "Status", "Created"],
            app.table
                .page_rows(&app.media)
                .iter()
                .enumerate()
                .map(|(idx, media)| {
                    let teacher = media
                        .teacher
                        .as_ref()
                        .map(|teacher| teacher.name.clone())
                        .unwrap_or_else(|| "Unknown".to_string());
                    let status = if media.is_active { "Active" } else { "Inactive" };
                    Row::new(vec![
                        media.name.clone(),
                        teacher,
                        format_duration(media.duration),
                        status.to_string(),
                        format_date(&media.created_at),
                    ])
                    .style(selected_style(idx == cursor))
                })
                .collect(),
            vec![
                Constraint::Percentage(35),
                Constraint::Percentage(25),
                Constraint::Percentage(10),
                Constraint::Percentage(10),
                Constraint::Percentage(20),
            ],
        ),
        Resource::Playlists => (
            vec!["Name", "Description", "Media", "Created"],
            app.table
                .page_rows(&app.playlists)
                .iter()
                .enumerate()
                .map(|(idx, playlist)| {
                    Row::new(vec![
                        playlist.name.clone(),
                        playlist.description.clone().unwrap_or_default(),
                        format!("{} items", playlist.media_count),
                        format_date(&playlist.created_at),
                    ])
                    .style(selected_style(idx == cursor))
                })
                .collect(),
            vec![
                Constraint::Percentage(30),
                Constraint::Percentage(35),
                Constraint::Percentage(15),
                Constraint::Percentage(20),
            ],
        ),
        Resource::Categories => (
            vec!["Name", "Media", "Created"],
            app.table
                .page_rows(&app.categories)
                .iter()
                .enumerate()
                .map(|(idx, category)| {
                    Row::new(vec![
                        category.name.clone(),
                        format!("{} items", category.media_count),
                        format_date(&category.created_at),
                    ])
                    .style(selected_style(idx == cursor))
                })
                .collect(),
            vec![
                Constraint::Percentage(40),
                Constraint::Percentage(20),
                Constraint::Percentage(40),
            ],
        ),
    }
}

fn render_editor(frame: &mut Frame, area: Rect, app: &App) {
    let Some(editor) = &app.editor else {
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title
            Constraint::Min(0),    // Panes
        ])
        .split(area);

    let title = if editor.loading_detail {
        format!("Manage media — loading {}...", editor.kind.label())
    } else {
        format!(
            "Manage media — {} \"{}\" ({} items)",
            editor.kind.label(),
            editor.parent_name,
            editor.selected.len()
        )
    };
    let header = Block::default().borders(Borders::ALL).title(title).title_style(
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    );
    frame.render_widget(header, chunks[0]);

    let panes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[1]);

    render_candidate_pane(frame, panes[0], editor);
    render_selected_pane(frame, panes[1], editor);
}

fn visible_window(cursor: usize, len: usize, rows_per_item: usize, area: Rect) -> usize {
    let visible = (area.height.saturating_sub(2) as usize / rows_per_item).max(1);
    if cursor >= visible {
        (cursor + 1 - visible).min(len.saturating_sub(visible))
    } else {
        0
    }
}

fn render_candidate_pane(frame: &mut Frame, area: Rect, editor: &AssociationEditor) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Search
            Constraint::Min(0),    // Candidate list
        ])
        .split(area);

    render_input_field(
        frame,
        chunks[0],
        "Search medias...",
        &editor.search,
        editor.pane == EditorPane::Candidates,
    );

    let title = if editor.loading_candidates || editor.debounce.pending() {
        "Add Medias (searching...)".to_string()
    } else {
        format!("Add Medias ({})", editor.candidates.len())
    };

    if editor.candidates.is_empty() {
        let message = if editor.loading_candidates {
            "Searching..."
        } else {
            "No matching media available."
        };
        let empty = Paragraph::new(message)
            .block(Block::default().borders(Borders::ALL).title(title))
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, chunks[1]);
        return;
    }

    let focused = editor.pane == EditorPane::Candidates;
    let skip = visible_window(editor.candidate_cursor, editor.candidates.len(), 2, chunks[1]);
    let items: Vec<_> = editor
        .candidates
        .iter()
        .enumerate()
        .skip(skip)
        .map(|(idx, media)| {
            render_candidate_item(
                media,
                focused && idx == editor.candidate_cursor,
                editor.is_pending(&media.id),
            )
        })
        .collect();
    let list = List::new(items).block(Block::default().borders(Borders::ALL).title(title));
    frame.render_widget(list, chunks[1]);
}

fn render_selected_pane(frame: &mut Frame, area: Rect, editor: &AssociationEditor) {
    let title = format!("Selected Medias ({})", editor.selected.len());

    if editor.selected.is_empty() {
        let message = if editor.loading_detail {
            "Loading..."
        } else {
            "No media assigned yet."
        };
        let empty = Paragraph::new(message)
            .block(Block::default().borders(Borders::ALL).title(title))
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, area);
        return;
    }

    let focused = editor.pane == EditorPane::Selected;
    let skip = visible_window(editor.selected_cursor, editor.selected.len(), 2, area);
    let items: Vec<_> = editor
        .selected
        .iter()
        .enumerate()
        .skip(skip)
        .map(|(idx, media)| {
            render_selected_item(
                media,
                focused && idx == editor.selected_cursor,
                editor.is_pending(&media.id),
            )
        })
        .collect();
    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title(title)
            .border_style(if focused {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default()
            }),
    );
    frame.render_widget(list, area);
}

fn render_form(frame: &mut Frame, area: Rect, app: &App, form: &EntityForm) {
    let dialog = centered_rect(70, 80, area);
    frame.render_widget(Clear, dialog);

    let action = if form.id.is_some() { "Edit" } else { "New" };
    let title = format!("{} {}", action, form.resource.singular());

    let mut lines: Vec<Line> = Vec::new();
    if app.form_loading {
        lines.push(Line::from(Span::styled(
            "Loading record...",
            Style::default().fg(Color::DarkGray),
        )));
    }
    for (idx, field) in form.fields.iter().enumerate() {
        let focused = idx == form.focused;
        let label_style = if focused {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Cyan)
        };
        let prefix = if focused { "> " } else { "  " };

        let value = match field.kind {
            FieldKind::Toggle => {
                if field.is_on() {
                    "[x]".to_string()
                } else {
                    "[ ]".to_string()
                }
            }
            FieldKind::TeacherSelect => {
                if field.value.is_empty() {
                    "None".to_string()
                } else {
                    app.teachers
                        .iter()
                        .find(|teacher| teacher.id == field.value)
                        .map(|teacher| teacher.name.clone())
                        .unwrap_or_else(|| field.value.clone())
                }
            }
            _ => field.value.clone(),
        };

        lines.push(Line::from(vec![
            Span::styled(format!("{}{}: ", prefix, field.label), label_style),
            Span::raw(value),
        ]));
        if let Some(error) = &field.error {
            lines.push(Line::from(Span::styled(
                format!("    {}", error),
                Style::default().fg(Color::Red),
            )));
        }
    }
    lines.push(Line::from(""));
    let footer = if form.submitting {
        Span::styled("Saving...", Style::default().fg(Color::Green))
    } else {
        Span::styled(
            "[Enter: Save] [Esc: Cancel]",
            Style::default().fg(Color::DarkGray),
        )
    };
    lines.push(Line::from(footer));

    let body = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(title))
        .wrap(Wrap { trim: false });
    frame.render_widget(body, dialog);
}

fn delete_warning(resource: Resource) -> &'static str {
    match resource {
        Resource::Users => "This action cannot be undone.",
        Resource::Teachers => "Media assigned to this teacher will keep its teacher reference.",
        Resource::Media => "This may affect playlists and categories that reference this media.",
        Resource::Playlists | Resource::Categories => {
            "Its media associations will no longer be reachable from it."
        }
    }
}

fn render_delete(frame: &mut Frame, area: Rect, target: &DeleteTarget) {
    let dialog = centered_rect(50, 30, area);
    frame.render_widget(Clear, dialog);

    let footer = if target.submitting {
        Span::styled("Deleting...", Style::default().fg(Color::Red))
    } else {
        Span::styled(
            "[Enter: Confirm] [Esc: Cancel]",
            Style::default().fg(Color::DarkGray),
        )
    };
    let lines = vec![
        Line::from(format!("Delete \"{}\"?", target.label)),
        Line::from(Span::styled(
            delete_warning(target.resource),
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(""),
        Line::from(footer),
    ];

    let body = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("Delete {}", target.resource.singular()))
                .title_style(Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(body, dialog);
}
