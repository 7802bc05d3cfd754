//! Board grid rendering: team bands, column headers and four session rows.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use rosterboard_core::{CellId, ColumnId, MagnetColor, Session, StaffMember};

use crate::app::{App, Focus};
use crate::ui::styles;

use super::truncate;

/// Width of the session label gutter
const LABEL_WIDTH: u16 = 6;

/// One line of a cell's contents
#[derive(Debug, Clone, PartialEq, Eq)]
enum CellEntry {
    Magnet(String, MagnetColor),
    /// Count of occupants that did not fit
    More(usize),
}

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let focused = matches!(app.focus, Focus::Board);
    let block = Block::default()
        .title(" Board ")
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(focused));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Team bands
            Constraint::Length(3), // Column headers
            Constraint::Ratio(1, 4),
            Constraint::Ratio(1, 4),
            Constraint::Ratio(1, 4),
            Constraint::Ratio(1, 4),
        ])
        .split(inner);

    render_team_bands(frame, rows[0]);
    render_headers(frame, app, rows[1]);
    for (session, row) in Session::ALL.iter().zip(rows[2..].iter()) {
        render_session_row(frame, app, *session, *row);
    }
}

fn column_constraints() -> Vec<Constraint> {
    let mut constraints = vec![Constraint::Length(LABEL_WIDTH)];
    constraints.extend(ColumnId::ALL.iter().map(|_| Constraint::Ratio(1, 5)));
    constraints
}

fn split_columns(area: Rect) -> std::rc::Rc<[Rect]> {
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints(column_constraints())
        .split(area)
}

fn render_team_bands(frame: &mut Frame, area: Rect) {
    let bands = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(LABEL_WIDTH),
            Constraint::Ratio(2, 5),
            Constraint::Ratio(2, 5),
            Constraint::Ratio(1, 5),
        ])
        .split(area);

    for (team, band) in ["Team 1", "Team 2"].iter().zip(bands[1..3].iter()) {
        let paragraph = Paragraph::new(Line::from(Span::styled(*team, styles::highlight_style())))
            .alignment(Alignment::Center);
        frame.render_widget(paragraph, *band);
    }
}

fn render_headers(frame: &mut Frame, app: &App, area: Rect) {
    let columns = split_columns(area);
    for (column, rect) in ColumnId::ALL.iter().zip(columns[1..].iter()) {
        let on_cursor = app.focus == Focus::Board
            && app.cursor.is_header()
            && app.cursor.column == *column;
        let style = if on_cursor {
            styles::cursor_style()
        } else {
            styles::title_style()
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border_for(on_cursor));
        let paragraph = Paragraph::new(Line::from(Span::styled(column.label(), style)))
            .alignment(Alignment::Center)
            .block(block);
        frame.render_widget(paragraph, *rect);
    }
}

fn render_session_row(frame: &mut Frame, app: &App, session: Session, area: Rect) {
    let columns = split_columns(area);

    let label = Paragraph::new(Line::from(Span::styled(session.as_str(), styles::highlight_style())))
        .alignment(Alignment::Center);
    frame.render_widget(label, columns[0]);

    for (column, rect) in ColumnId::ALL.iter().zip(columns[1..].iter()) {
        let cell = CellId::new(session, *column);
        let on_cursor = app.focus == Focus::Board && app.cursor.cell() == Some(cell);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border_for(on_cursor));
        let inner = block.inner(*rect);

        let members = app.board.staff_in_cell(&cell);
        let lines: Vec<Line> = cell_entries(&members, inner.width as usize, inner.height as usize)
            .into_iter()
            .map(|entry| match entry {
                CellEntry::Magnet(name, color) => {
                    Line::from(Span::styled(name, styles::magnet_style(color)))
                }
                CellEntry::More(n) => {
                    Line::from(Span::styled(format!("+{} more", n), styles::muted_style()))
                }
            })
            .collect();

        frame.render_widget(Paragraph::new(lines).block(block), *rect);
    }
}

fn border_for(on_cursor: bool) -> Style {
    if on_cursor {
        styles::highlight_style()
    } else {
        styles::muted_style()
    }
}

/// Lay out a cell's occupants in placement order, one per line.
///
/// When they do not all fit, the last line becomes a "+N more" marker.
fn cell_entries(members: &[&StaffMember], width: usize, rows: usize) -> Vec<CellEntry> {
    if rows == 0 || width == 0 {
        return Vec::new();
    }

    let magnet = |m: &StaffMember| CellEntry::Magnet(truncate(&m.name, width), m.default_color);

    if members.len() <= rows {
        return members.iter().map(|m| magnet(m)).collect();
    }

    let shown = rows - 1;
    let mut entries: Vec<CellEntry> = members[..shown].iter().map(|m| magnet(m)).collect();
    entries.push(CellEntry::More(members.len() - shown));
    entries
}
