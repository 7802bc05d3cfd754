//! Keyboard input handling for the TUI.
//!
//! This module handles all keyboard events and translates them into
//! application state changes. Overlay states consume every key.

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use rosterboard_core::StaffRole;

use crate::app::{App, AppState, Focus};

/// Handle keyboard input. Returns true if the app should quit.
pub fn handle_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    match app.state {
        AppState::ShowingHelp => {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
                app.state = AppState::Normal;
            }
            Ok(false)
        }
        AppState::ShowingNotice => {
            if matches!(key.code, KeyCode::Esc | KeyCode::Enter | KeyCode::Char(' ')) {
                app.dismiss_notice();
            }
            Ok(false)
        }
        AppState::ConfirmingQuit => {
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
            Ok(false)
        }
        AppState::ConfirmingReset => {
            match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') => app.confirm_reset(),
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                    app.state = AppState::Normal;
                }
                _ => {}
            }
            Ok(false)
        }
        // The board is frozen until the render comes back
        AppState::Exporting => Ok(false),
        AppState::ExportReady => {
            match key.code {
                KeyCode::Char('s') | KeyCode::Char('S') => app.save_export(),
                KeyCode::Esc | KeyCode::Enter => app.dismiss_export(),
                _ => {}
            }
            Ok(false)
        }
        AppState::ExportFailed => {
            match key.code {
                KeyCode::Char('r') | KeyCode::Char('R') => app.retry_export(),
                KeyCode::Esc | KeyCode::Enter => app.dismiss_export(),
                _ => {}
            }
            Ok(false)
        }
        AppState::Quitting => Ok(true),
        AppState::Normal => handle_normal_input(app, key),
    }
}

fn handle_normal_input(app: &mut App, key: KeyEvent) -> Result<bool> {
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
        KeyCode::Char('e') => {
            app.start_export();
            return Ok(false);
        }
        KeyCode::Char('R') => {
            app.request_reset();
            return Ok(false);
        }
        KeyCode::Char('1') => {
            app.set_role_filter(StaffRole::Pt);
            return Ok(false);
        }
        KeyCode::Char('2') => {
            app.set_role_filter(StaffRole::Support);
            return Ok(false);
        }
        KeyCode::Tab | KeyCode::BackTab => {
            app.toggle_focus();
            return Ok(false);
        }
        _ => {}
    }

    match app.focus {
        Focus::Pool => handle_pool_input(app, key),
        Focus::Board => handle_board_input(app, key),
    }
    Ok(false)
}

fn handle_pool_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => app.pool_up(),
        KeyCode::Down | KeyCode::Char('j') => app.pool_down(),
        KeyCode::Enter | KeyCode::Char(' ') => app.select_highlighted(),
        _ => {}
    }
}

fn handle_board_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => app.cursor.up(),
        KeyCode::Down | KeyCode::Char('j') => app.cursor.down(),
        KeyCode::Left | KeyCode::Char('h') => app.cursor.left(),
        KeyCode::Right | KeyCode::Char('l') => app.cursor.right(),
        KeyCode::Enter | KeyCode::Char(' ') => app.place_at_cursor(),
        KeyCode::Char('c') => app.stamp_cursor_column(),
        KeyCode::Esc => app.focus = Focus::Pool,
        _ => {}
    }
}
