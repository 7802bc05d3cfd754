use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};
use rosterboard_core::fte::format_fte;
use rosterboard_core::StaffRole;

use crate::app::{App, AppState};

use super::panels::{board, pool};
use super::styles;

/// Width of the staff pool panel
const POOL_WIDTH: u16 = 30;

pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title bar
            Constraint::Length(2), // Role tabs
            Constraint::Min(12),   // Pool + board
            Constraint::Length(2), // Status bar
        ])
        .split(frame.area());

    render_title_bar(frame, chunks[0]);
    render_tabs(frame, app, chunks[1]);
    render_main_content(frame, app, chunks[2]);
    render_status_bar(frame, app, chunks[3]);

    // Render overlays
    match app.state {
        AppState::ShowingHelp => render_help_overlay(frame),
        AppState::ShowingNotice => render_notice_overlay(frame, app),
        AppState::ConfirmingReset => render_reset_overlay(frame),
        AppState::ConfirmingQuit => render_quit_overlay(frame),
        AppState::Exporting => render_exporting_overlay(frame),
        AppState::ExportReady => render_export_ready_overlay(frame, app),
        AppState::ExportFailed => render_export_failed_overlay(frame, app),
        AppState::Normal | AppState::Quitting => {}
    }
}

fn render_title_bar(frame: &mut Frame, area: Rect) {
    let title = "  Daily Staff Roster";
    let help_hint = "[?] Help";

    let title_line = Line::from(vec![
        Span::styled(title, styles::title_style()),
        Span::raw(" ".repeat(
            area.width
                .saturating_sub(title.len() as u16 + help_hint.len() as u16 + 4)
                as usize,
        )),
        Span::styled(help_hint, styles::muted_style()),
    ]);

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    frame.render_widget(Paragraph::new(title_line).block(block), area);
}

fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let filter = app.board.role_filter();
    let tabs = [
        ("[1] Physiotherapist", filter == StaffRole::Pt),
        ("[2] Support / PCA", filter == StaffRole::Support),
    ];

    let mut spans = vec![Span::raw(" ")];
    for (i, (label, selected)) in tabs.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" | ", styles::muted_style()));
        }
        spans.push(Span::styled(*label, styles::tab_style(*selected)));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_main_content(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(POOL_WIDTH), Constraint::Min(40)])
        .split(area);

    pool::render(frame, app, chunks[0]);
    board::render(frame, app, chunks[1]);
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let placing = match app.board.armed_staff() {
        Some(member) => format!("Placing: {}", member.name),
        None => "Select a staff member".to_string(),
    };

    let left_text = match app.status_message {
        Some(ref msg) => format!(" {} | {} ", placing, msg),
        None => format!(" {} ", placing),
    };
    let right_text = format!(" Physio FTE: {} ", format_fte(app.board.physio_fte()));

    let width = area.width as usize;
    let padding_len = width
        .saturating_sub(left_text.chars().count())
        .saturating_sub(right_text.len());

    let left_style = if app.board.armed_staff().is_some() {
        styles::success_style()
    } else {
        styles::muted_style()
    };

    let status_line = Line::from(vec![
        Span::styled(left_text, left_style),
        Span::raw(" ".repeat(padding_len)),
        Span::styled(right_text, styles::highlight_style()),
    ]);
    frame.render_widget(
        Paragraph::new(status_line).style(styles::status_bar_style()),
        area,
    );
}

fn help_line(key: &'static str, desc: &'static str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {:<10}", key), styles::help_key_style()),
        Span::styled(desc, styles::help_desc_style()),
    ])
}

fn render_help_overlay(frame: &mut Frame) {
    let area = centered_rect_fixed(52, 24, frame.area());
    frame.render_widget(Clear, area);

    let version = env!("CARGO_PKG_VERSION");

    let help_text = vec![
        Line::from(Span::styled(
            format!("  Daily Staff Roster  v{}", version),
            styles::title_style(),
        )),
        Line::from(""),
        Line::from(Span::styled(" Staff pool", styles::highlight_style())),
        help_line("1 / 2", "Physiotherapists / support staff"),
        help_line("↑/↓", "Move through the list"),
        help_line("Enter", "Select staff member (again to clear)"),
        help_line("Tab", "Switch focus (pool ↔ board)"),
        Line::from(""),
        Line::from(Span::styled(" Board", styles::highlight_style())),
        help_line("←↑↓→", "Move the cursor"),
        help_line("Enter", "Place or remove in the cell"),
        help_line("", "On a column header: whole column"),
        help_line("c", "Place in every session of column"),
        help_line("Esc", "Back to the staff pool"),
        Line::from(""),
        Line::from(Span::styled(" Actions", styles::highlight_style())),
        help_line("e", "Export the board as an image"),
        help_line("R", "Clear the whole board"),
        help_line("q", "Quit"),
        Line::from(""),
        Line::from(vec![
            Span::styled("       Press ", styles::muted_style()),
            Span::styled("?", styles::help_key_style()),
            Span::styled(" or ", styles::muted_style()),
            Span::styled("Esc", styles::help_key_style()),
            Span::styled(" to close", styles::muted_style()),
        ]),
    ];

    render_dialog(frame, area, help_text);
}

fn render_notice_overlay(frame: &mut Frame, app: &App) {
    let area = centered_rect_fixed(50, 8, frame.area());
    frame.render_widget(Clear, area);

    let message = app.notice.clone().unwrap_or_default();
    let lines = vec![
        Line::from(Span::styled(" Cannot place here", styles::error_style())),
        Line::from(""),
        Line::from(Span::styled(format!(" {}", message), styles::help_desc_style())),
        Line::from(""),
        Line::from(vec![
            Span::styled(" Press ", styles::muted_style()),
            Span::styled("[Enter]", styles::help_key_style()),
            Span::styled(" to continue", styles::muted_style()),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::error_style());
    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

fn render_reset_overlay(frame: &mut Frame) {
    let area = centered_rect_fixed(46, 7, frame.area());
    frame.render_widget(Clear, area);

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "   Clear every placement on the board?",
            styles::highlight_style(),
        )),
        Line::from(""),
        confirm_line("clear"),
    ];
    render_dialog(frame, area, lines);
}

fn render_quit_overlay(frame: &mut Frame) {
    let area = centered_rect_fixed(46, 7, frame.area());
    frame.render_widget(Clear, area);

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "   Are you sure you want to quit?",
            styles::highlight_style(),
        )),
        Line::from(""),
        confirm_line("quit"),
    ];
    render_dialog(frame, area, lines);
}

fn confirm_line(action: &'static str) -> Line<'static> {
    Line::from(vec![
        Span::styled("   Press ", styles::muted_style()),
        Span::styled("[Y]", styles::help_key_style()),
        Span::styled(format!(" to {}, ", action), styles::muted_style()),
        Span::styled("[N]", styles::help_key_style()),
        Span::styled(" to cancel", styles::muted_style()),
    ])
}

fn render_exporting_overlay(frame: &mut Frame) {
    let area = centered_rect_fixed(36, 5, frame.area());
    frame.render_widget(Clear, area);

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled("     Processing Roster...", styles::title_style())),
    ];
    render_dialog(frame, area, lines);
}

fn render_export_ready_overlay(frame: &mut Frame, app: &App) {
    let area = centered_rect_fixed(52, 9, frame.area());
    frame.render_widget(Clear, area);

    let file_name = app.export_file_name().unwrap_or_default();
    let size = app
        .export_preview
        .as_ref()
        .map(|a| format!("{} x {} px, {} KB", a.width, a.height, a.bytes.len() / 1024))
        .unwrap_or_default();

    let lines = vec![
        Line::from(Span::styled(" Roster image ready", styles::success_style())),
        Line::from(""),
        Line::from(vec![
            Span::styled(" File: ", styles::muted_style()),
            Span::styled(file_name, styles::help_desc_style()),
        ]),
        Line::from(Span::styled(format!("       {}", size), styles::muted_style())),
        Line::from(vec![
            Span::styled(" To:   ", styles::muted_style()),
            Span::styled(app.export_dir.display().to_string(), styles::help_desc_style()),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled(" Press ", styles::muted_style()),
            Span::styled("[S]", styles::help_key_style()),
            Span::styled(" to save, ", styles::muted_style()),
            Span::styled("[Esc]", styles::help_key_style()),
            Span::styled(" to discard", styles::muted_style()),
        ]),
    ];
    render_dialog(frame, area, lines);
}

fn render_export_failed_overlay(frame: &mut Frame, app: &App) {
    let area = centered_rect_fixed(52, 8, frame.area());
    frame.render_widget(Clear, area);

    let error = app.export_error.clone().unwrap_or_default();
    let lines = vec![
        Line::from(Span::styled(" Export failed", styles::error_style())),
        Line::from(""),
        Line::from(Span::styled(format!(" {}", error), styles::help_desc_style())),
        Line::from(""),
        Line::from(vec![
            Span::styled(" Press ", styles::muted_style()),
            Span::styled("[R]", styles::help_key_style()),
            Span::styled(" to retry, ", styles::muted_style()),
            Span::styled("[Esc]", styles::help_key_style()),
            Span::styled(" to close", styles::muted_style()),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::error_style());
    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

fn render_dialog(frame: &mut Frame, area: Rect, lines: Vec<Line>) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn centered_rect_fixed(width: u16, height: u16, r: Rect) -> Rect {
    let x = r.x + (r.width.saturating_sub(width)) / 2;
    let y = r.y + (r.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(r.width), height.min(r.height))
}
