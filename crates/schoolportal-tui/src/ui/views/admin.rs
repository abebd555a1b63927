use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Cell, Paragraph, Row, Table, TableState, Wrap},
    Frame,
};

use schoolportal_core::models::TcStatus;
use schoolportal_core::utils::{format_date, format_optional, truncate_string};
use schoolportal_core::views::StudentFilter;
use schoolportal_core::Transport;

use crate::app::{App, AppState};
use crate::ui::styles;

use super::{bordered, detail_line, ready_or_placeholder, render_empty, welcome_lines};

pub fn render_dashboard<T: Transport>(frame: &mut Frame, app: &App<T>, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(7), Constraint::Min(5)])
        .split(area);

    if let Some(summary) = ready_or_placeholder(frame, chunks[0], "Overview", &app.summary) {
        let cards = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(33),
                Constraint::Percentage(34),
                Constraint::Percentage(33),
            ])
            .split(chunks[0]);

        let stats = [
            ("Total Students", summary.total_students, styles::title_style()),
            ("Pending TC Requests", summary.pending_requests, styles::highlight_style()),
            ("Schools", summary.schools, styles::success_style()),
        ];
        for ((label, value, style), card) in stats.into_iter().zip(cards.iter()) {
            let lines = vec![
                Line::from(""),
                Line::from(Span::styled(format!(" {}", value), style)),
                Line::from(Span::styled(format!(" {}", label), styles::muted_style())),
            ];
            frame.render_widget(Paragraph::new(lines).block(bordered(String::new(), false)), *card);
        }
    }

    frame.render_widget(
        Paragraph::new(welcome_lines(app)).block(bordered(" Admin Dashboard ".to_string(), true)),
        chunks[1],
    );
}

// ============================================================================
// Students
// ============================================================================

pub fn render_students<T: Transport>(frame: &mut Frame, app: &App<T>, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    render_student_table(frame, app, chunks[0]);
    render_student_detail(frame, app, chunks[1]);
}

fn render_student_table<T: Transport>(frame: &mut Frame, app: &App<T>, area: Rect) {
    let Some(all) = ready_or_placeholder(frame, area, "Students", &app.students) else {
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(3)])
        .split(area);

    let searching = app.state == AppState::Searching;
    let cursor = if searching { "▌" } else { "" };
    let search = Paragraph::new(Line::from(vec![
        Span::styled(" Search: ", styles::muted_style()),
        Span::styled(format!("{}{}", app.student_filter.query, cursor), styles::search_style()),
    ]))
    .block(bordered(String::new(), searching));
    frame.render_widget(search, chunks[0]);

    let shown = app.filtered_students();
    let title = format!(" {} ", StudentFilter::summary_line(shown.len(), all.len()));
    if shown.is_empty() {
        render_empty(frame, chunks[1], title.trim(), "No students match the search");
        return;
    }

    let header = Row::new(vec![
        Cell::from("ID"),
        Cell::from("Name"),
        Cell::from("Date of Birth"),
        Cell::from("School"),
    ])
    .style(styles::title_style());

    let rows: Vec<Row> = shown
        .iter()
        .map(|s| {
            Row::new(vec![
                Cell::from(s.student_id.clone()),
                Cell::from(s.name.clone()),
                Cell::from(s.dob.as_deref().map(format_date).unwrap_or_default()),
                Cell::from(format_optional(&s.current_school_id, "-")),
            ])
        })
        .collect();

    let widths = [
        Constraint::Length(10),
        Constraint::Fill(3),
        Constraint::Length(14),
        Constraint::Fill(1),
    ];
    let table = Table::new(rows, widths)
        .header(header)
        .block(bordered(title, !searching))
        .row_highlight_style(styles::selected_style());

    let mut state = TableState::default();
    state.select(Some(app.selection));
    frame.render_stateful_widget(table, chunks[1], &mut state);
}

fn render_student_detail<T: Transport>(frame: &mut Frame, app: &App<T>, area: Rect) {
    let title = "Student Details";
    if app.student_details.is_idle() {
        render_empty(frame, area, title, "Press Enter to view a student");
        return;
    }
    let Some(profile) = ready_or_placeholder(frame, area, title, &app.student_details) else {
        return;
    };

    let dash = "-";
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(format!(" {}", profile.name), styles::title_style())),
        Line::from(""),
        detail_line("Student ID", profile.student_id.clone()),
        detail_line(
            "Date of Birth",
            profile.dob.as_deref().map(format_date).unwrap_or_else(|| dash.to_string()),
        ),
        detail_line("Aadhar ID", format_optional(&profile.aadhar_id, dash)),
        detail_line("Contact", format_optional(&profile.contact_info, dash)),
        detail_line("School", format_optional(&profile.school_name, dash)),
        detail_line(
            "Enrolled",
            profile
                .enrollment_date
                .as_deref()
                .map(format_date)
                .unwrap_or_else(|| dash.to_string()),
        ),
    ];
    frame.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .block(bordered(format!(" {} ", title), false)),
        area,
    );
}

// ============================================================================
// Transfer certificate requests
// ============================================================================

pub fn render_requests<T: Transport>(frame: &mut Frame, app: &App<T>, area: Rect) {
    let title = "Transfer Certificate Requests";
    let Some(queue) = ready_or_placeholder(frame, area, title, &app.requests) else {
        return;
    };
    if queue.is_empty() {
        render_empty(frame, area, title, "No transfer certificate requests");
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    let header = Row::new(vec![
        Cell::from("Student"),
        Cell::from("Applied"),
        Cell::from("Destination"),
        Cell::from("Status"),
    ])
    .style(styles::title_style());

    let rows: Vec<Row> = queue
        .requests()
        .iter()
        .map(|tc| {
            Row::new(vec![
                Cell::from(truncate_string(&tc.student_display(), 28)),
                Cell::from(tc.application_date.as_deref().map(format_date).unwrap_or_default()),
                Cell::from(truncate_string(&tc.destination_school, 24)),
                Cell::from(tc.status.label()).style(styles::status_style(tc.status)),
            ])
        })
        .collect();

    let widths = [
        Constraint::Fill(2),
        Constraint::Length(13),
        Constraint::Fill(2),
        Constraint::Length(9),
    ];
    let counts = format!(
        " {} - {} pending, {} approved, {} rejected ",
        title,
        queue.pending_count(),
        queue.count(TcStatus::Approved),
        queue.count(TcStatus::Rejected)
    );
    let table = Table::new(rows, widths)
        .header(header)
        .block(bordered(counts, true))
        .row_highlight_style(styles::selected_style());

    let mut state = TableState::default();
    state.select(Some(app.selection));
    frame.render_stateful_widget(table, chunks[0], &mut state);

    let detail = match app.selected_request() {
        Some(tc) => {
            let mut lines = vec![
                Line::from(""),
                detail_line("Student", tc.student_display()),
                detail_line("Destination", tc.destination_school.clone()),
                detail_line("Reason", tc.reason.clone()),
                detail_line("Status", tc.status.label().to_string()),
                detail_line("Comments", format_optional(&tc.comments, "-")),
            ];
            if let Some(ref by) = tc.processed_by {
                let when = tc.processed_date.as_deref().map(format_date).unwrap_or_default();
                lines.push(detail_line("Processed", format!("{} {}", by, when)));
            }
            if tc.status.is_pending() {
                lines.push(Line::from(""));
                lines.push(Line::from(vec![
                    Span::styled(" [a]", styles::help_key_style()),
                    Span::styled(" approve  ", styles::help_desc_style()),
                    Span::styled("[x]", styles::help_key_style()),
                    Span::styled(" reject", styles::help_desc_style()),
                ]));
            }
            lines
        }
        None => Vec::new(),
    };
    frame.render_widget(
        Paragraph::new(detail)
            .wrap(Wrap { trim: false })
            .block(bordered(" Request ".to_string(), false)),
        chunks[1],
    );
}

// ============================================================================
// Schools
// ============================================================================

pub fn render_schools<T: Transport>(frame: &mut Frame, app: &App<T>, area: Rect) {
    let title = "Schools";
    let Some(schools) = ready_or_placeholder(frame, area, title, &app.schools) else {
        return;
    };
    if schools.is_empty() {
        render_empty(frame, area, title, "No schools found");
        return;
    }

    let header = Row::new(vec![Cell::from("ID"), Cell::from("Name"), Cell::from("Location")])
        .style(styles::title_style());

    let rows: Vec<Row> = schools
        .iter()
        .map(|school| {
            Row::new(vec![
                Cell::from(school.school_id.clone()),
                Cell::from(school.name.clone()),
                Cell::from(school.location().unwrap_or_default()),
            ])
        })
        .collect();

    let widths = [Constraint::Length(10), Constraint::Fill(2), Constraint::Fill(2)];
    let table = Table::new(rows, widths)
        .header(header)
        .block(bordered(format!(" {} ({}) ", title, schools.len()), true))
        .row_highlight_style(styles::selected_style());

    let mut state = TableState::default();
    state.select(Some(app.selection));
    frame.render_stateful_widget(table, area, &mut state);
}
