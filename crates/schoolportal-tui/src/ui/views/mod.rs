//! Route-specific content rendering.

pub mod admin;
pub mod student;

use chrono::Local;
use ratatui::{
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use schoolportal_core::views::Loadable;
use schoolportal_core::Transport;

use crate::app::App;
use crate::ui::styles;

pub(crate) fn bordered(title: String, focused: bool) -> Block<'static> {
    Block::default()
        .title(title)
        .title_style(styles::muted_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(focused))
}

/// Render the loading/error placeholder and return the data once it is ready.
pub(crate) fn ready_or_placeholder<'a, T>(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    data: &'a Loadable<T>,
) -> Option<&'a T> {
    if let Some(value) = data.ready() {
        return Some(value);
    }
    let line = match data.error() {
        Some(message) => Line::from(vec![
            Span::styled(message.to_string(), styles::error_style()),
            Span::styled("  [r] retry", styles::muted_style()),
        ]),
        None => Line::from(Span::styled("Loading...", styles::muted_style())),
    };
    let paragraph = Paragraph::new(vec![Line::from(""), line])
        .alignment(Alignment::Center)
        .block(bordered(format!(" {} ", title), false));
    frame.render_widget(paragraph, area);
    None
}

/// Centered one-line message inside a bordered block
pub(crate) fn render_empty(frame: &mut Frame, area: Rect, title: &str, message: &str) {
    let paragraph = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(message.to_string(), styles::muted_style())),
    ])
    .alignment(Alignment::Center)
    .block(bordered(format!(" {} ", title), false));
    frame.render_widget(paragraph, area);
}

/// "Label: value" detail line
pub(crate) fn detail_line(label: &str, value: String) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!(" {:<16}", format!("{}:", label)), styles::muted_style()),
        Span::styled(value, styles::list_item_style()),
    ])
}

/// Welcome header plus the numbered quick links of the role menu
pub(crate) fn welcome_lines<T: Transport>(app: &App<T>) -> Vec<Line<'static>> {
    let Some(layout) = app.view().layout.as_ref() else {
        return Vec::new();
    };

    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!(" Welcome, {}", layout.display_name),
            styles::title_style(),
        )),
    ];
    if let Some(session) = app.session() {
        let since = session.signed_in_at.with_timezone(&Local);
        lines.push(Line::from(Span::styled(
            format!(" Signed in {}", since.format("%b %d, %H:%M")),
            styles::muted_style(),
        )));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(" Quick links", styles::highlight_style())));

    for (i, route) in layout.nav.iter().enumerate() {
        let style = if i == app.selection {
            styles::selected_style()
        } else {
            styles::list_item_style()
        };
        lines.push(Line::from(vec![
            Span::styled(format!("  [{}] ", i + 1), styles::help_key_style()),
            Span::styled(route.title(), style),
        ]));
    }
    lines
}
