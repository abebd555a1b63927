use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use schoolportal_core::models::{Role, TcStatus};
use schoolportal_core::utils::format_date;
use schoolportal_core::{Route, Transport};

use crate::app::{App, AppState, LoginFocus};

use super::styles;
use super::views::{admin, student};

const APP_TITLE: &str = "  School Portal";

pub fn render<T: Transport>(frame: &mut Frame, app: &App<T>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title bar
            Constraint::Length(3), // Navigation menu
            Constraint::Min(10),   // Main content
            Constraint::Length(2), // Status bar
        ])
        .split(frame.area());

    render_title_bar(frame, app, chunks[0]);
    render_nav_menu(frame, app, chunks[1]);
    render_main_content(frame, app, chunks[2]);
    render_status_bar(frame, app, chunks[3]);

    // Render overlays
    if app.route() == Route::Login {
        render_login_overlay(frame, app);
    }

    match app.state {
        AppState::ShowingHelp => render_help_overlay(frame, app),
        AppState::ConfirmingQuit => render_quit_overlay(frame),
        AppState::GoTo => render_goto_overlay(frame, app),
        AppState::Reviewing => render_review_overlay(frame, app),
        _ => {}
    }
}

fn render_title_bar<T: Transport>(frame: &mut Frame, app: &App<T>, area: Rect) {
    let user = match app.view().layout.as_ref() {
        Some(layout) => format!("{} ({})  [?] Help", layout.display_name, layout.role.display_name()),
        None => "[?] Help".to_string(),
    };

    let title_line = Line::from(vec![
        Span::styled(APP_TITLE, styles::title_style()),
        Span::styled(format!("  {}", app.view().title), styles::muted_style()),
        Span::raw(" ".repeat(
            (area.width as usize)
                .saturating_sub(APP_TITLE.len() + app.view().title.len() + user.chars().count() + 4),
        )),
        Span::styled(user, styles::muted_style()),
    ]);

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    let paragraph = Paragraph::new(title_line).block(block);
    frame.render_widget(paragraph, area);
}

fn render_nav_menu<T: Transport>(frame: &mut Frame, app: &App<T>, area: Rect) {
    let mut spans = vec![Span::raw(" ")];

    if let Some(layout) = app.view().layout.as_ref() {
        for (i, route) in layout.nav.iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled(" | ", styles::muted_style()));
            }
            let label = format!("[{}] {}", i + 1, route.title());
            if *route == app.route() {
                spans.push(Span::styled(label, styles::tab_style(true)));
            } else {
                spans.push(Span::styled(label, styles::muted_style()));
            }
        }
    }

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    let paragraph = Paragraph::new(Line::from(spans)).block(block);
    frame.render_widget(paragraph, area);
}

fn render_main_content<T: Transport>(frame: &mut Frame, app: &App<T>, area: Rect) {
    match app.route() {
        Route::Login => {}
        Route::StudentDashboard => student::render_dashboard(frame, app, area),
        Route::StudentProfile => student::render_profile(frame, app, area),
        Route::AcademicRecords => student::render_records(frame, app, area),
        Route::TransferCertificate => student::render_transfer_certificate(frame, app, area),
        Route::DocumentUpload => student::render_documents(frame, app, area),
        Route::SchemeHistory => student::render_schemes(frame, app, area),
        Route::AdminDashboard => admin::render_dashboard(frame, app, area),
        Route::AdminStudents => admin::render_students(frame, app, area),
        Route::AdminTransferCertificates => admin::render_requests(frame, app, area),
        Route::AdminSchools => admin::render_schools(frame, app, area),
    }
}

fn shortcuts<T: Transport>(app: &App<T>) -> &'static str {
    match app.route() {
        Route::Login => "[Tab] next field | [Enter] login | [Esc] quit",
        Route::TransferCertificate | Route::DocumentUpload => {
            "[Tab] field | [Enter] edit/submit | [:] go to | [l]ogout | [q]uit"
        }
        Route::AdminStudents => "[/] search | [Enter] details | [r]eload | [l]ogout | [q]uit",
        Route::AdminTransferCertificates => "[a]pprove | [x] reject | [r]eload | [l]ogout | [q]uit",
        _ => "[r]eload | [:] go to | [l]ogout | [q]uit",
    }
}

fn render_status_bar<T: Transport>(frame: &mut Frame, app: &App<T>, area: Rect) {
    let left_text = match (&app.status_message, app.state) {
        (_, AppState::Editing) => " Editing - [Enter] done ".to_string(),
        (Some(msg), _) => format!(" {} ", msg),
        (None, _) => format!(" {} ", app.route().path()),
    };
    let right_text = format!(" {} ", shortcuts(app));

    let width = area.width as usize;
    let padding_len = width
        .saturating_sub(left_text.chars().count())
        .saturating_sub(right_text.chars().count());
    let status_line = Line::from(vec![
        Span::styled(left_text, styles::muted_style()),
        Span::raw(" ".repeat(padding_len)),
        Span::styled(right_text, styles::muted_style()),
    ]);
    let paragraph = Paragraph::new(status_line).style(styles::status_bar_style());
    frame.render_widget(paragraph, area);
}

fn help_line(key: &'static str, desc: &'static str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {:<10}", key), styles::help_key_style()),
        Span::styled(desc, styles::help_desc_style()),
    ])
}

fn render_help_overlay<T: Transport>(frame: &mut Frame, app: &App<T>) {
    let area = centered_rect_fixed(56, 24, frame.area());

    // Clear the area
    frame.render_widget(Clear, area);

    let version = env!("CARGO_PKG_VERSION");

    let mut help_text = vec![
        Line::from(Span::styled("  School Portal", styles::title_style())),
        Line::from(Span::styled(format!("  version {}", version), styles::muted_style())),
        Line::from(""),
        Line::from(Span::styled(" Navigation", styles::highlight_style())),
        help_line("1-9", "Open menu entry"),
        help_line(":", "Go to a path (e.g. /student/profile)"),
        help_line("↑/↓", "Navigate list"),
        help_line("Enter", "Select / open"),
        help_line("Esc", "Cancel"),
        Line::from(""),
        Line::from(Span::styled(" Actions", styles::highlight_style())),
        help_line("r", "Reload the current view"),
        help_line("l", "Log out"),
        help_line("q", "Quit"),
        Line::from(""),
    ];

    match app.session().map(|s| s.role) {
        Some(Role::Student) => {
            help_text.push(Line::from(Span::styled(" Forms", styles::highlight_style())));
            help_text.push(help_line("Tab", "Next field"));
            help_text.push(help_line("Space", "Toggle parent consent"));
            help_text.push(help_line("←/→", "Choose document type"));
        }
        Some(Role::Admin) => {
            help_text.push(Line::from(Span::styled(" Admin", styles::highlight_style())));
            help_text.push(help_line("/", "Search students"));
            help_text.push(help_line("a / x", "Approve / reject a TC request"));
        }
        None => {}
    }

    help_text.push(Line::from(""));
    help_text.push(Line::from(vec![
        Span::styled("       Press ", styles::muted_style()),
        Span::styled("?", styles::help_key_style()),
        Span::styled(" or ", styles::muted_style()),
        Span::styled("Esc", styles::help_key_style()),
        Span::styled(" to close", styles::muted_style()),
    ]));

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    let paragraph = Paragraph::new(help_text).block(block);

    frame.render_widget(paragraph, area);
}

fn render_login_overlay<T: Transport>(frame: &mut Frame, app: &App<T>) {
    let messages = app.login_errors.len() + usize::from(app.login_error.is_some());
    let height = 14 + messages as u16;
    let area = centered_rect_fixed(50, height, frame.area());

    // Clear the area
    frame.render_widget(Clear, area);

    let mut lines = vec![
        Line::from(Span::styled("   School Management Portal", styles::title_style())),
        Line::from(Span::styled("   Sign in to continue", styles::muted_style())),
        Line::from(""),
    ];

    let focus = app.login_focus;
    let cursor = |focused: bool| if focused { "▌" } else { "" };

    let username_focused = focus == LoginFocus::Username;
    lines.push(Line::from(vec![
        Span::styled("   Username:  [", styles::muted_style()),
        Span::styled(
            format!("{:<20}{}", app.login_form.username, cursor(username_focused)),
            styles::field_style(username_focused),
        ),
        Span::styled("]", styles::muted_style()),
    ]));

    let password_focused = focus == LoginFocus::Password;
    let password_masked = "*".repeat(app.login_form.password.chars().count().min(20));
    lines.push(Line::from(vec![
        Span::styled("   Password:  [", styles::muted_style()),
        Span::styled(
            format!("{:<20}{}", password_masked, cursor(password_focused)),
            styles::field_style(password_focused),
        ),
        Span::styled("]", styles::muted_style()),
    ]));

    let role_focused = focus == LoginFocus::Role;
    let mut role_spans = vec![Span::styled("   User type: ", styles::muted_style())];
    for role in Role::ALL {
        let selected = app.login_form.role == Some(role);
        let label = if selected {
            format!("(•) {}  ", role.display_name())
        } else {
            format!("( ) {}  ", role.display_name())
        };
        let style = if selected && role_focused {
            styles::selected_style()
        } else if selected {
            styles::tab_style(true)
        } else {
            styles::muted_style()
        };
        role_spans.push(Span::styled(label, style));
    }
    lines.push(Line::from(role_spans));

    let remember_focused = focus == LoginFocus::Remember;
    let check = if app.remember_password { "[x]" } else { "[ ]" };
    lines.push(Line::from(vec![
        Span::raw("   "),
        Span::styled(
            format!("{} Remember password", check),
            styles::field_style(remember_focused),
        ),
    ]));

    lines.push(Line::from(""));
    let button_focused = focus == LoginFocus::Button;
    let button = if app.is_logging_in() {
        " Logging in... "
    } else if button_focused {
        "  ▶ Login ◀   "
    } else {
        "     Login     "
    };
    lines.push(Line::from(vec![
        Span::raw("              ["),
        Span::styled(button, styles::field_style(button_focused)),
        Span::raw("]"),
    ]));

    if !app.login_errors.is_empty() || app.login_error.is_some() {
        lines.push(Line::from(""));
    }
    for (_, message) in app.login_errors.iter() {
        lines.push(Line::from(Span::styled(format!("   {}", message), styles::error_style())));
    }
    if let Some(ref error) = app.login_error {
        lines.push(Line::from(Span::styled(format!("   {}", error), styles::error_style())));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    let paragraph = Paragraph::new(lines).block(block);

    frame.render_widget(paragraph, area);
}

fn render_goto_overlay<T: Transport>(frame: &mut Frame, app: &App<T>) {
    let area = centered_rect_fixed(50, 5, frame.area());
    frame.render_widget(Clear, area);

    let lines = vec![
        Line::from(vec![
            Span::styled(" Path: ", styles::muted_style()),
            Span::styled(format!("{}▌", app.goto_input), styles::search_style()),
        ]),
        Line::from(""),
        Line::from(Span::styled(" [Enter] go  [Esc] cancel", styles::muted_style())),
    ];

    let block = Block::default()
        .title(" Go to ")
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_review_overlay<T: Transport>(frame: &mut Frame, app: &App<T>) {
    let Some(review) = app.review.as_ref() else {
        return;
    };
    let area = centered_rect_fixed(60, 16, frame.area());
    frame.render_widget(Clear, area);

    let tc = &review.target;
    let mut lines = vec![
        Line::from(vec![
            Span::styled(" Student:     ", styles::muted_style()),
            Span::raw(tc.student_display()),
        ]),
        Line::from(vec![
            Span::styled(" Destination: ", styles::muted_style()),
            Span::raw(tc.destination_school.clone()),
        ]),
        Line::from(vec![
            Span::styled(" Applied:     ", styles::muted_style()),
            Span::raw(tc.application_date.as_deref().map(format_date).unwrap_or_else(|| "-".to_string())),
        ]),
        Line::from(vec![
            Span::styled(" Reason:      ", styles::muted_style()),
            Span::raw(tc.reason.clone()),
        ]),
        Line::from(""),
    ];

    let mut decision = vec![Span::styled(" Decision:    ", styles::muted_style())];
    for status in [TcStatus::Approved, TcStatus::Rejected] {
        let label = format!(" {} ", status.label());
        if review.form.status == Some(status) {
            decision.push(Span::styled(label, styles::status_style(status).patch(styles::selected_style())));
        } else {
            decision.push(Span::styled(label, styles::muted_style()));
        }
        decision.push(Span::raw(" "));
    }
    lines.push(Line::from(decision));
    lines.push(Line::from(vec![
        Span::styled(" Comments:    ", styles::muted_style()),
        Span::styled(format!("{}▌", review.form.comments), styles::search_style()),
    ]));
    lines.push(Line::from(""));

    for (_, message) in review.errors.iter() {
        lines.push(Line::from(Span::styled(format!(" {}", message), styles::error_style())));
    }
    if let Some(ref error) = review.error {
        lines.push(Line::from(Span::styled(format!(" {}", error), styles::error_style())));
    }
    let hint = if review.saving {
        " Saving..."
    } else {
        " [←/→] decision  [Enter] save  [Esc] cancel"
    };
    lines.push(Line::from(Span::styled(hint, styles::muted_style())));

    let block = Block::default()
        .title(format!(" Review request {} ", tc.tc_id))
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));
    frame.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: false }),
        area,
    );
}

/// Create a centered rectangle with fixed dimensions
fn centered_rect_fixed(width: u16, height: u16, r: Rect) -> Rect {
    let x = r.x + (r.width.saturating_sub(width)) / 2;
    let y = r.y + (r.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(r.width), height.min(r.height))
}

fn render_quit_overlay(frame: &mut Frame) {
    let area = centered_rect_fixed(46, 7, frame.area());

    // Clear the area
    frame.render_widget(Clear, area);

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "   Are you sure you want to quit?",
            styles::highlight_style(),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("   Press ", styles::muted_style()),
            Span::styled("[Y]", styles::help_key_style()),
            Span::styled(" to quit, ", styles::muted_style()),
            Span::styled("[N]", styles::help_key_style()),
            Span::styled(" to cancel", styles::muted_style()),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{backend::TestBackend, Terminal};

    use crate::app::tests::test_app;

    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[tokio::test]
    async fn test_login_screen_renders() {
        let dir = tempfile::tempdir().unwrap();
        let (app, _stub) = test_app(dir.path(), None);
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();

        terminal.draw(|f| render(f, &app)).unwrap();
        let text = screen_text(&terminal);
        assert!(text.contains("Username"));
        assert!(text.contains("Student"));
    }

    #[tokio::test]
    async fn test_admin_menu_renders() {
        let dir = tempfile::tempdir().unwrap();
        let (mut app, _stub) = test_app(dir.path(), Some(Role::Admin));
        app.navigate(Route::AdminSchools);

        let mut terminal = Terminal::new(TestBackend::new(120, 30)).unwrap();
        terminal.draw(|f| render(f, &app)).unwrap();
        let text = screen_text(&terminal);
        assert!(text.contains("[4] Schools"));
        assert!(text.contains("TC Requests"));
    }

    #[tokio::test]
    async fn test_dashboard_shows_welcome_and_quick_links() {
        let dir = tempfile::tempdir().unwrap();
        let (mut app, _stub) = test_app(dir.path(), Some(Role::Student));
        app.navigate(Route::StudentDashboard);

        let mut terminal = Terminal::new(TestBackend::new(120, 30)).unwrap();
        terminal.draw(|f| render(f, &app)).unwrap();
        let text = screen_text(&terminal);
        assert!(text.contains("Welcome, Rahul Kumar"));
        assert!(text.contains("Signed in"));
        assert!(text.contains("Quick links"));
    }
}
