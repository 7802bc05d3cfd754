use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState},
    Frame,
};

use crate::app::{App, Focus};
use crate::ui::styles;

use super::truncate;

const NAME_WIDTH: usize = 16;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let staff = app.visible_staff();
    let armed = app.board.selection().armed();

    let items: Vec<ListItem> = staff
        .iter()
        .enumerate()
        .map(|(i, member)| {
            let is_armed = armed == Some(member.id.as_str());
            let marker = if is_armed { "▶ " } else { "  " };

            let line = Line::from(vec![
                Span::styled(
                    marker,
                    if is_armed { styles::armed_style() } else { styles::muted_style() },
                ),
                Span::styled(
                    format!(" {:<width$} ", truncate(&member.name, NAME_WIDTH), width = NAME_WIDTH),
                    styles::magnet_style(member.default_color),
                ),
                Span::styled(format!(" {}", member.role.short_label()), styles::muted_style()),
            ]);

            let style = if i == app.pool_selection {
                styles::selected_style()
            } else {
                styles::list_item_style()
            };

            ListItem::new(line).style(style)
        })
        .collect();

    let focused = matches!(app.focus, Focus::Pool);
    let block = Block::default()
        .title(format!(" {} ({}) ", app.board.role_filter().label(), staff.len()))
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(focused));

    let list = List::new(items).block(block);

    let mut state = ListState::default();
    if !staff.is_empty() {
        state.select(Some(app.pool_selection));
    }

    frame.render_stateful_widget(list, area, &mut state);
}
