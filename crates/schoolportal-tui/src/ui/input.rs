//! Keyboard input handling for the TUI.
//!
//! This module handles all keyboard events and translates them into
//! application state changes.

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};

use schoolportal_core::models::{DocumentType, Role, TcStatus};
use schoolportal_core::{Route, Transport};

use crate::app::{
    can_add_password_char, can_add_text_char, can_add_username_char, App, AppState, LoginFocus,
    TcField, UploadField, PAGE_SCROLL_SIZE,
};

/// Handle keyboard input. Returns true if the app should quit.
pub fn handle_input<T: Transport>(app: &mut App<T>, key: KeyEvent) -> Result<bool> {
    // Handle help overlay
    if matches!(app.state, AppState::ShowingHelp) {
        if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
            app.state = AppState::Normal;
        }
        return Ok(false);
    }

    // Handle quit confirmation
    if matches!(app.state, AppState::ConfirmingQuit) {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                app.state = AppState::Quitting;
                return Ok(true);
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                app.state = AppState::Normal;
            }
            _ => {}
        }
        return Ok(false);
    }

    match app.state {
        AppState::GoTo => return Ok(handle_goto_input(app, key)),
        AppState::Searching => return Ok(handle_search_input(app, key)),
        AppState::Reviewing => return Ok(handle_review_input(app, key)),
        AppState::Editing => return Ok(handle_editing_input(app, key)),
        _ => {}
    }

    if app.route() == Route::Login {
        return Ok(handle_login_input(app, key));
    }

    // Global keys
    match key.code {
        KeyCode::Char('q') => {
            app.state = AppState::ConfirmingQuit;
            return Ok(false);
        }
        KeyCode::Char('?') => {
            app.state = AppState::ShowingHelp;
            return Ok(false);
        }
        KeyCode::Char(':') => {
            app.goto_input.clear();
            app.state = AppState::GoTo;
            return Ok(false);
        }
        KeyCode::Char('l') => {
            app.logout();
            return Ok(false);
        }
        KeyCode::Char('r') => {
            app.reload();
            return Ok(false);
        }
        KeyCode::Char(c @ '1'..='9') => {
            app.navigate_menu(c as usize - '0' as usize);
            return Ok(false);
        }
        _ => {}
    }

    match app.route() {
        Route::TransferCertificate => handle_tc_form_input(app, key),
        Route::DocumentUpload => handle_upload_form_input(app, key),
        Route::AdminStudents => handle_students_input(app, key),
        Route::AdminTransferCertificates => handle_requests_input(app, key),
        Route::StudentDashboard | Route::AdminDashboard => handle_dashboard_input(app, key),
        _ => handle_list_navigation(app, key),
    }
    Ok(false)
}

/// Up/Down/Page/Home/End over the current view's list
fn handle_list_navigation<T: Transport>(app: &mut App<T>, key: KeyEvent) {
    let max_index = app.list_len().saturating_sub(1);
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => {
            app.selection = app.selection.saturating_sub(1);
        }
        KeyCode::Down | KeyCode::Char('j') => {
            app.selection = (app.selection + 1).min(max_index);
        }
        KeyCode::PageUp => {
            app.selection = app.selection.saturating_sub(PAGE_SCROLL_SIZE);
        }
        KeyCode::PageDown => {
            app.selection = (app.selection + PAGE_SCROLL_SIZE).min(max_index);
        }
        KeyCode::Home => app.selection = 0,
        KeyCode::End => app.selection = max_index,
        _ => {}
    }
}

fn handle_dashboard_input<T: Transport>(app: &mut App<T>, key: KeyEvent) {
    if key.code == KeyCode::Enter {
        app.navigate_menu(app.selection + 1);
    } else {
        handle_list_navigation(app, key);
    }
}

// ============================================================================
// Prompts
// ============================================================================

fn handle_goto_input<T: Transport>(app: &mut App<T>, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Esc => {
            app.state = AppState::Normal;
            app.goto_input.clear();
        }
        KeyCode::Enter => {
            let path = std::mem::take(&mut app.goto_input);
            app.navigate_path(&path);
        }
        KeyCode::Backspace => {
            app.goto_input.pop();
        }
        KeyCode::Char(c) => {
            if can_add_text_char(app.goto_input.len(), c) {
                app.goto_input.push(c);
            }
        }
        _ => {}
    }
    false
}

fn handle_search_input<T: Transport>(app: &mut App<T>, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Esc => {
            app.state = AppState::Normal;
            app.student_filter.query.clear();
            app.selection = 0;
        }
        KeyCode::Enter => {
            // Keep search query active
            app.state = AppState::Normal;
        }
        KeyCode::Backspace => {
            app.student_filter.query.pop();
            app.selection = 0;
        }
        KeyCode::Char(c) => {
            if can_add_text_char(app.student_filter.query.len(), c) {
                app.student_filter.query.push(c);
                // Reset selection when search changes
                app.selection = 0;
            }
        }
        _ => {}
    }
    false
}

// ============================================================================
// Login
// ============================================================================

fn handle_login_input<T: Transport>(app: &mut App<T>, key: KeyEvent) -> bool {
    if app.is_logging_in() {
        return false;
    }
    match key.code {
        KeyCode::Esc => {
            // Quit if on login screen
            app.state = AppState::Quitting;
            return true;
        }
        KeyCode::Down | KeyCode::Tab => {
            app.login_focus = app.login_focus.next();
        }
        KeyCode::Up | KeyCode::BackTab => {
            app.login_focus = app.login_focus.prev();
        }
        KeyCode::Left | KeyCode::Right if app.login_focus == LoginFocus::Role => {
            let role = app.login_form.role.unwrap_or(Role::Student);
            app.login_form.role = Some(role.toggle());
        }
        KeyCode::Enter => match app.login_focus {
            LoginFocus::Username => app.login_focus = LoginFocus::Password,
            LoginFocus::Password => app.submit_login(),
            LoginFocus::Role => app.login_focus = LoginFocus::Remember,
            LoginFocus::Remember => app.remember_password = !app.remember_password,
            LoginFocus::Button => app.submit_login(),
        },
        KeyCode::Backspace => match app.login_focus {
            LoginFocus::Username => {
                app.login_form.username.pop();
            }
            LoginFocus::Password => {
                app.login_form.password.pop();
            }
            _ => {}
        },
        KeyCode::Char(c) => match app.login_focus {
            LoginFocus::Username => {
                if can_add_username_char(app.login_form.username.len(), c) {
                    app.login_form.username.push(c);
                }
            }
            LoginFocus::Password => {
                if can_add_password_char(app.login_form.password.len(), c) {
                    app.login_form.password.push(c);
                }
            }
            LoginFocus::Role if c == ' ' => {
                let role = app.login_form.role.unwrap_or(Role::Student);
                app.login_form.role = Some(role.toggle());
            }
            LoginFocus::Remember if c == ' ' => {
                app.remember_password = !app.remember_password;
            }
            _ => {}
        },
        _ => {}
    }
    false
}

// ============================================================================
// Student forms
// ============================================================================

/// Text buffer of the focused form field, if it is a text field
fn focused_text<T: Transport>(app: &mut App<T>) -> Option<&mut String> {
    match app.route() {
        Route::TransferCertificate => match app.tc_focus {
            TcField::Reason => Some(&mut app.tc_form.reason),
            TcField::DestinationSchool => Some(&mut app.tc_form.destination_school),
            TcField::TransferDate => Some(&mut app.tc_form.transfer_date),
            TcField::AdditionalInfo => Some(&mut app.tc_form.additional_info),
            TcField::ParentConsent | TcField::Submit => None,
        },
        Route::DocumentUpload => match app.upload_focus {
            UploadField::FilePath => Some(&mut app.upload_form.file_path),
            UploadField::DocumentType | UploadField::Submit => None,
        },
        _ => None,
    }
}

fn handle_editing_input<T: Transport>(app: &mut App<T>, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Esc | KeyCode::Enter => {
            app.state = AppState::Normal;
        }
        KeyCode::Tab => {
            app.state = AppState::Normal;
            focus_next(app);
        }
        KeyCode::Backspace => {
            if let Some(text) = focused_text(app) {
                text.pop();
            }
        }
        KeyCode::Char(c) => {
            if let Some(text) = focused_text(app) {
                if can_add_text_char(text.len(), c) {
                    text.push(c);
                }
            }
        }
        _ => {}
    }
    false
}

fn focus_next<T: Transport>(app: &mut App<T>) {
    match app.route() {
        Route::TransferCertificate => app.tc_focus = app.tc_focus.next(),
        Route::DocumentUpload => app.upload_focus = app.upload_focus.next(),
        _ => {}
    }
}

fn focus_prev<T: Transport>(app: &mut App<T>) {
    match app.route() {
        Route::TransferCertificate => app.tc_focus = app.tc_focus.prev(),
        Route::DocumentUpload => app.upload_focus = app.upload_focus.prev(),
        _ => {}
    }
}

fn handle_tc_form_input<T: Transport>(app: &mut App<T>, key: KeyEvent) {
    match key.code {
        KeyCode::Tab => focus_next(app),
        KeyCode::BackTab => focus_prev(app),
        KeyCode::Enter => match app.tc_focus {
            field if field.is_text() => app.state = AppState::Editing,
            TcField::ParentConsent => app.tc_form.parent_consent = !app.tc_form.parent_consent,
            _ => app.submit_transfer_certificate(),
        },
        KeyCode::Char(' ') if app.tc_focus == TcField::ParentConsent => {
            app.tc_form.parent_consent = !app.tc_form.parent_consent;
        }
        _ => handle_list_navigation(app, key),
    }
}

fn handle_upload_form_input<T: Transport>(app: &mut App<T>, key: KeyEvent) {
    match key.code {
        KeyCode::Tab => focus_next(app),
        KeyCode::BackTab => focus_prev(app),
        KeyCode::Left | KeyCode::Right if app.upload_focus == UploadField::DocumentType => {
            let next = match (app.upload_form.document_type, key.code) {
                (None, KeyCode::Left) => DocumentType::Other,
                (None, _) => DocumentType::AadharCard,
                (Some(t), KeyCode::Left) => t.prev(),
                (Some(t), _) => t.next(),
            };
            app.upload_form.document_type = Some(next);
        }
        KeyCode::Enter => match app.upload_focus {
            UploadField::DocumentType => app.upload_focus = UploadField::FilePath,
            UploadField::FilePath => app.state = AppState::Editing,
            UploadField::Submit => app.submit_upload(),
        },
        _ => handle_list_navigation(app, key),
    }
}

// ============================================================================
// Admin views
// ============================================================================

fn handle_students_input<T: Transport>(app: &mut App<T>, key: KeyEvent) {
    match key.code {
        KeyCode::Char('/') => {
            app.state = AppState::Searching;
        }
        KeyCode::Enter => app.load_selected_student(),
        KeyCode::Esc => {
            app.student_filter.query.clear();
            app.selection = 0;
        }
        _ => handle_list_navigation(app, key),
    }
}

fn handle_requests_input<T: Transport>(app: &mut App<T>, key: KeyEvent) {
    match key.code {
        KeyCode::Char('a') => app.open_review(TcStatus::Approved),
        KeyCode::Char('x') => app.open_review(TcStatus::Rejected),
        _ => handle_list_navigation(app, key),
    }
}

fn handle_review_input<T: Transport>(app: &mut App<T>, key: KeyEvent) -> bool {
    let Some(review) = app.review.as_mut() else {
        app.state = AppState::Normal;
        return false;
    };
    if review.saving {
        return false;
    }
    match key.code {
        KeyCode::Esc => app.close_review(),
        KeyCode::Enter => app.submit_review(),
        KeyCode::Left | KeyCode::Right | KeyCode::Tab => {
            review.form.status = match review.form.status {
                Some(TcStatus::Approved) => Some(TcStatus::Rejected),
                _ => Some(TcStatus::Approved),
            };
        }
        KeyCode::Backspace => {
            review.form.comments.pop();
        }
        KeyCode::Char(c) => {
            if can_add_text_char(review.form.comments.len(), c) {
                review.form.comments.push(c);
            }
        }
        _ => {}
    }
    false
}
