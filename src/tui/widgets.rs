use ratatui::{
    prelude::*,
    widgets::{Block, Borders, ListItem, Paragraph},
};

use crate::api::types::{AssociatedMediaSummary, Media};

/// Format duration in seconds to M:SS format
pub fn format_duration(seconds: u32) -> String {
    let minutes = seconds / 60;
    let secs = seconds % 60;
    format!("{}:{:02}", minutes, secs)
}

/// Shorten a wire timestamp to "Jan 5, 2024"; unparseable values pass
/// through untouched.
pub fn format_date(wire: &str) -> String {
    if let Ok(date) = chrono::DateTime::parse_from_rfc3339(wire) {
        return date.format("%b %-d, %Y").to_string();
    }
    if let Some(prefix) = wire.get(..10) {
        if let Ok(date) = chrono::NaiveDate::parse_from_str(prefix, "%Y-%m-%d") {
            return date.format("%b %-d, %Y").to_string();
        }
    }
    wire.to_string()
}

pub fn active_badge(is_active: bool) -> Span<'static> {
    if is_active {
        Span::styled("[Active]", Style::default().fg(Color::Green))
    } else {
        Span::styled("[Inactive]", Style::default().fg(Color::DarkGray))
    }
}

/// Render an input field with focus indicator
pub fn render_input_field(
    frame: &mut Frame,
    area: Rect,
    label: &str,
    value: &str,
    is_focused: bool,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(label)
        .border_style(if is_focused {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        });

    let text = if value.is_empty() {
        " ".to_string()
    } else {
        value.to_string()
    };

    let paragraph = Paragraph::new(text).block(block).style(if is_focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    });

    frame.render_widget(paragraph, area);
}

/// Centered overlay area for dialogs
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

fn row_style(is_selected: bool) -> (&'static str, Style) {
    if is_selected {
        (
            "> ",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
    } else {
        ("  ", Style::default())
    }
}

/// Render a candidate-pane media row
pub fn render_candidate_item(
    media: &Media,
    is_selected: bool,
    is_pending: bool,
) -> ListItem<'static> {
    let (prefix, style) = row_style(is_selected);
    let marker = if is_pending { " ⟳" } else { "" };

    let mut lines = vec![Line::from(vec![
        Span::styled(prefix, style),
        Span::styled(media.name.clone(), style),
        Span::raw(" "),
        active_badge(media.is_active),
        Span::styled(marker.to_string(), Style::default().fg(Color::Green)),
    ])];

    let teacher = media
        .teacher
        .as_ref()
        .map(|teacher| teacher.name.as_str())
        .unwrap_or("Unknown");
    lines.push(Line::from(Span::styled(
        format!(
            "     {} | {} | Added {}",
            teacher,
            format_duration(media.duration),
            format_date(&media.created_at)
        ),
        Style::default().fg(Color::DarkGray),
    )));

    ListItem::new(lines)
}

/// Render a selected-pane media row
pub fn render_selected_item(
    media: &AssociatedMediaSummary,
    is_selected: bool,
    is_pending: bool,
) -> ListItem<'static> {
    let (prefix, style) = row_style(is_selected);
    let marker = if is_pending { " ⟳" } else { "" };

    let lines = vec![
        Line::from(vec![
            Span::styled(prefix, style),
            Span::styled(media.name.clone(), style),
            Span::raw(" "),
            active_badge(media.is_active),
            Span::styled(marker.to_string(), Style::default().fg(Color::Red)),
        ]),
        Line::from(Span::styled(
            format!(
                "     {} | Added {}",
                media.duration,
                format_date(&media.created_at)
            ),
            Style::default().fg(Color::DarkGray),
        )),
    ];

    ListItem::new(lines)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duration_pads_seconds_only() {
        assert_eq!(format_duration(185), "3:05");
        assert_eq!(format_duration(59), "0:59");
        assert_eq!(format_duration(600), "10:00");
    }

    #[test]
    fn date_formats_wire_timestamps() {
        assert_eq!(format_date("2024-01-05T10:00:00Z"), "Jan 5, 2024");
        assert_eq!(format_date("2024-01-05"), "Jan 5, 2024");
        assert_eq!(format_date("garbage"), "garbage");
    }
}
