// Copyright (C) 2026  Caprica Software Limited
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Render the roster search line.
//!
//! Shows the current filter text and, while the search bar has focus, places
//! the terminal cursor inside it.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::App;

const PROMPT: &str = "/ ";

pub(super) fn draw_search(f: &mut Frame, area: Rect, app: &App) {
    let search = &app.search;
    let theme = &app.theme;

    let container = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(1)])
        .horizontal_margin(1)
        .split(area);

    let line = if !search.active() && search.value().is_empty() {
        Line::from(Span::styled(
            "Press / to search by name or code",
            Style::default().fg(theme.muted_colour),
        ))
    } else {
        Line::from(vec![
            Span::styled(PROMPT, Style::default().fg(theme.accent_colour)),
            Span::raw(search.value()),
        ])
    };

    f.render_widget(
        Paragraph::new(line).style(Style::default().fg(theme.search_colour).bg(theme.search_bg)),
        container[0],
    );

    if search.active() {
        let cursor_x = container[0].x + (PROMPT.len() + search.input.visual_cursor()) as u16;
        let cursor_y = container[0].y;
        f.set_cursor_position((cursor_x, cursor_y));
    }
}
