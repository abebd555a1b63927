//! Student pages: dashboard, profile, academic records, transfer certificate,
//! document upload and scheme history.

use chrono::Local;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Cell, Paragraph, Row, Table, TableState, Wrap},
    Frame,
};

use schoolportal_core::forms::{Field, MAX_UPLOAD_BYTES};
use schoolportal_core::utils::{format_date, format_marks, format_optional, truncate_string};
use schoolportal_core::views::{group_by_year, GradeBand};
use schoolportal_core::Transport;

use crate::app::{App, AppState, TcField, UploadField};
use crate::ui::styles;

use super::{bordered, detail_line, ready_or_placeholder, render_empty, welcome_lines};

pub fn render_dashboard<T: Transport>(frame: &mut Frame, app: &App<T>, area: Rect) {
    frame.render_widget(
        Paragraph::new(welcome_lines(app)).block(bordered(" Student Dashboard ".to_string(), true)),
        area,
    );
}

pub fn render_profile<T: Transport>(frame: &mut Frame, app: &App<T>, area: Rect) {
    let Some(profile) = ready_or_placeholder(frame, area, "My Profile", &app.profile) else {
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
        Line::from(""),
        detail_line(
            "School",
            format_optional(&profile.school_name, &format_optional(&profile.current_school_id, dash)),
        ),
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
        Paragraph::new(lines).block(bordered(" My Profile ".to_string(), true)),
        area,
    );
}

/// Records grouped by year, with a per-year average row
pub fn render_records<T: Transport>(frame: &mut Frame, app: &App<T>, area: Rect) {
    let Some(records) = ready_or_placeholder(frame, area, "Academic Records", &app.records) else {
        return;
    };
    if records.is_empty() {
        render_empty(frame, area, "Academic Records", "No academic records found");
        return;
    }

    let header = Row::new(vec![
        Cell::from("Subject"),
        Cell::from("Semester"),
        Cell::from("Marks"),
        Cell::from("Grade"),
    ])
    .style(styles::title_style())
    .height(1);

    let mut rows = Vec::new();
    for group in group_by_year(records) {
        let average = group
            .average_marks()
            .map(|avg| format!("avg {}", format_marks(avg)))
            .unwrap_or_default();
        rows.push(
            Row::new(vec![
                Cell::from(format!("{}", group.year)),
                Cell::from(""),
                Cell::from(average),
                Cell::from(""),
            ])
            .style(styles::highlight_style()),
        );
        for record in &group.records {
            rows.push(Row::new(vec![
                Cell::from(format!("  {}", record.subject)),
                Cell::from(format!("{}", record.semester)),
                Cell::from(format_marks(record.marks)),
                Cell::from(record.grade.clone()).style(styles::grade_style(GradeBand::of(&record.grade))),
            ]));
        }
    }

    let widths = [
        Constraint::Fill(3),
        Constraint::Length(10),
        Constraint::Length(10),
        Constraint::Length(7),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(bordered(format!(" Academic Records ({}) ", records.len()), true));
    frame.render_widget(table, area);
}

// ============================================================================
// Transfer certificate
// ============================================================================

pub fn render_transfer_certificate<T: Transport>(frame: &mut Frame, app: &App<T>, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    render_tc_form(frame, app, chunks[0]);
    render_tc_history(frame, app, chunks[1]);
}

fn text_field<'a>(label: &str, value: &str, focused: bool, editing: bool) -> Line<'a> {
    let cursor = if focused && editing { "▌" } else { "" };
    Line::from(vec![
        Span::styled(format!(" {:<20}", label), styles::muted_style()),
        Span::styled(format!("[{}{}]", value, cursor), styles::field_style(focused)),
    ])
}

fn error_line<'a>(message: Option<&str>) -> Option<Line<'a>> {
    message.map(|m| Line::from(Span::styled(format!("   {}", m), styles::error_style())))
}

fn submit_button<'a>(label: &str, busy_label: &str, focused: bool, busy: bool) -> Line<'a> {
    let text = if busy { busy_label } else { label };
    Line::from(vec![
        Span::raw("   "),
        Span::styled(format!("[ {} ]", text), styles::field_style(focused)),
    ])
}

fn render_tc_form<T: Transport>(frame: &mut Frame, app: &App<T>, area: Rect) {
    let form = &app.tc_form;
    let errors = &app.tc_errors;
    let editing = app.state == AppState::Editing;
    let focus = app.tc_focus;

    let mut lines = vec![Line::from("")];
    let fields = [
        (TcField::Reason, "Reason for transfer", form.reason.as_str(), Some(Field::Reason)),
        (
            TcField::DestinationSchool,
            "Destination school",
            form.destination_school.as_str(),
            Some(Field::DestinationSchool),
        ),
        (
            TcField::TransferDate,
            "Transfer date",
            form.transfer_date.as_str(),
            Some(Field::TransferDate),
        ),
        (TcField::AdditionalInfo, "Additional info", form.additional_info.as_str(), None),
    ];
    for (field, label, value, error_field) in fields {
        lines.push(text_field(label, value, focus == field, editing));
        if let Some(line) = error_line(error_field.and_then(|f| errors.get(f))) {
            lines.push(line);
        }
    }
    lines.push(Line::from(Span::styled(
        "                      YYYY-MM-DD",
        styles::muted_style(),
    )));

    let check = if form.parent_consent { "[x]" } else { "[ ]" };
    lines.push(Line::from(vec![
        Span::raw(" "),
        Span::styled(
            format!("{} Parent/Guardian consent", check),
            styles::field_style(focus == TcField::ParentConsent),
        ),
    ]));
    if let Some(line) = error_line(errors.get(Field::ParentConsent)) {
        lines.push(line);
    }

    lines.push(Line::from(""));
    lines.push(submit_button(
        "Submit Application",
        "Submitting...",
        focus == TcField::Submit,
        app.tc_submitting,
    ));
    if let Some(ref error) = app.tc_error {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(format!(" {}", error), styles::error_style())));
    }

    frame.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .block(bordered(" Apply for Transfer Certificate ".to_string(), true)),
        area,
    );
}

fn render_tc_history<T: Transport>(frame: &mut Frame, app: &App<T>, area: Rect) {
    let title = "My Applications";
    let Some(certificates) = ready_or_placeholder(frame, area, title, &app.certificates) else {
        return;
    };
    if certificates.is_empty() {
        render_empty(frame, area, title, "No transfer certificate applications yet");
        return;
    }

    let header = Row::new(vec![
        Cell::from("Applied"),
        Cell::from("Destination"),
        Cell::from("Status"),
        Cell::from("Comments"),
    ])
    .style(styles::title_style());

    let rows: Vec<Row> = certificates
        .iter()
        .map(|tc| {
            Row::new(vec![
                Cell::from(tc.application_date.as_deref().map(format_date).unwrap_or_default()),
                Cell::from(truncate_string(&tc.destination_school, 24)),
                Cell::from(tc.status.label()).style(styles::status_style(tc.status)),
                Cell::from(format_optional(&tc.comments, "")),
            ])
        })
        .collect();

    let widths = [
        Constraint::Length(13),
        Constraint::Fill(2),
        Constraint::Length(9),
        Constraint::Fill(2),
    ];
    let table = Table::new(rows, widths)
        .header(header)
        .block(bordered(format!(" {} ({}) ", title, certificates.len()), false))
        .row_highlight_style(styles::selected_style());

    let mut state = TableState::default();
    state.select(Some(app.selection));
    frame.render_stateful_widget(table, area, &mut state);
}

// ============================================================================
// Documents
// ============================================================================

pub fn render_documents<T: Transport>(frame: &mut Frame, app: &App<T>, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    render_upload_form(frame, app, chunks[0]);
    render_document_list(frame, app, chunks[1]);
}

fn render_upload_form<T: Transport>(frame: &mut Frame, app: &App<T>, area: Rect) {
    let form = &app.upload_form;
    let errors = &app.upload_errors;
    let focus = app.upload_focus;

    let type_label = form
        .document_type
        .map(|t| t.label())
        .unwrap_or("Select document type");
    let mut lines = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled(format!(" {:<20}", "Document type"), styles::muted_style()),
            Span::styled(
                format!("◀ {} ▶", type_label),
                styles::field_style(focus == UploadField::DocumentType),
            ),
        ]),
    ];
    if let Some(line) = error_line(errors.get(Field::DocumentType)) {
        lines.push(line);
    }

    lines.push(text_field(
        "File path",
        &form.file_path,
        focus == UploadField::FilePath,
        app.state == AppState::Editing,
    ));
    if let Some(line) = error_line(errors.get(Field::File)) {
        lines.push(line);
    }
    lines.push(Line::from(Span::styled(
        format!(
            "                      PDF, JPG or PNG, up to {}MB",
            MAX_UPLOAD_BYTES / (1024 * 1024)
        ),
        styles::muted_style(),
    )));

    lines.push(Line::from(""));
    lines.push(submit_button(
        "Upload Document",
        "Uploading...",
        focus == UploadField::Submit,
        app.uploading,
    ));
    if let Some(ref error) = app.upload_error {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(format!(" {}", error), styles::error_style())));
    }

    frame.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .block(bordered(" Upload Document ".to_string(), true)),
        area,
    );
}

fn render_document_list<T: Transport>(frame: &mut Frame, app: &App<T>, area: Rect) {
    let title = "My Documents";
    let Some(documents) = ready_or_placeholder(frame, area, title, &app.documents) else {
        return;
    };
    if documents.is_empty() {
        render_empty(frame, area, title, "No documents uploaded yet");
        return;
    }

    let header = Row::new(vec![
        Cell::from(""),
        Cell::from("Type"),
        Cell::from("File"),
        Cell::from("Uploaded"),
    ])
    .style(styles::title_style());

    let rows: Vec<Row> = documents
        .iter()
        .map(|doc| {
            Row::new(vec![
                Cell::from(doc.file_kind().marker()).style(styles::muted_style()),
                Cell::from(doc.document_type.clone()),
                Cell::from(truncate_string(&doc.file_name, 28)),
                Cell::from(doc.upload_date.as_deref().map(format_date).unwrap_or_default()),
            ])
        })
        .collect();

    let widths = [
        Constraint::Length(4),
        Constraint::Fill(2),
        Constraint::Fill(2),
        Constraint::Length(13),
    ];
    let table = Table::new(rows, widths)
        .header(header)
        .block(bordered(format!(" {} ({}) ", title, documents.len()), false))
        .row_highlight_style(styles::selected_style());

    let mut state = TableState::default();
    state.select(Some(app.selection));
    frame.render_stateful_widget(table, area, &mut state);
}

// ============================================================================
// Schemes
// ============================================================================

pub fn render_schemes<T: Transport>(frame: &mut Frame, app: &App<T>, area: Rect) {
    let title = "Scheme History";
    let Some(schemes) = ready_or_placeholder(frame, area, title, &app.schemes) else {
        return;
    };
    if schemes.is_empty() {
        render_empty(frame, area, title, "Not enrolled in any schemes");
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    let today = Local::now().date_naive();
    let header = Row::new(vec![
        Cell::from("Scheme"),
        Cell::from("Start"),
        Cell::from("End"),
        Cell::from("Status"),
    ])
    .style(styles::title_style());

    let rows: Vec<Row> = schemes
        .iter()
        .map(|scheme| {
            let (status, style) = if scheme.is_active(today) {
                ("Active", styles::success_style())
            } else {
                ("Ended", styles::muted_style())
            };
            Row::new(vec![
                Cell::from(scheme.scheme_name.clone()),
                Cell::from(format_date(&scheme.start_date)),
                Cell::from(scheme.end_date.as_deref().map(format_date).unwrap_or_else(|| "Ongoing".to_string())),
                Cell::from(status).style(style),
            ])
        })
        .collect();

    let widths = [
        Constraint::Fill(3),
        Constraint::Length(13),
        Constraint::Length(13),
        Constraint::Length(7),
    ];
    let table = Table::new(rows, widths)
        .header(header)
        .block(bordered(format!(" {} ({}) ", title, schemes.len()), true))
        .row_highlight_style(styles::selected_style());

    let mut state = TableState::default();
    state.select(Some(app.selection));
    frame.render_stateful_widget(table, chunks[0], &mut state);

    let detail = match schemes.get(app.selection) {
        Some(scheme) => vec![
            Line::from(""),
            Line::from(Span::styled(format!(" {}", scheme.scheme_name), styles::title_style())),
            Line::from(""),
            Line::from(Span::styled(" Benefits", styles::highlight_style())),
            Line::from(format!(" {}", format_optional(&scheme.benefits, "-"))),
            Line::from(""),
            Line::from(Span::styled(" Details", styles::highlight_style())),
            Line::from(format!(" {}", format_optional(&scheme.details, "-"))),
        ],
        None => Vec::new(),
    };
    frame.render_widget(
        Paragraph::new(detail)
            .wrap(Wrap { trim: false })
            .block(bordered(" Details ".to_string(), false)),
        chunks[1],
    );
}
