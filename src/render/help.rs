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

//! Render the keyboard shortcut overlay.
//!
//! The overlay is built from the shortcut table so it always lists exactly
//! the keys the router responds to.

use ratatui::{
    Frame,
    layout::{Constraint, Flex, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Padding, Paragraph},
};

use crate::{
    shortcuts::{ShortcutCategory, in_category},
    theme::Theme,
};

const KEYS_WIDTH: usize = 10;

pub(super) fn draw_help(f: &mut Frame, area: Rect, theme: &Theme) {
    let mut lines = Vec::new();

    for category in ShortcutCategory::ALL {
        if !lines.is_empty() {
            lines.push(Line::from(""));
        }
        lines.push(Line::from(Span::styled(
            category.title(),
            Style::default()
                .fg(theme.accent_colour)
                .add_modifier(Modifier::BOLD),
        )));

        for shortcut in in_category(category) {
            lines.push(Line::from(vec![
                Span::styled(
                    format!("  {:<KEYS_WIDTH$}", shortcut.keys),
                    Style::default().fg(theme.search_colour),
                ),
                Span::styled(shortcut.description, Style::default().fg(theme.text_colour)),
            ]));
        }
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Press any key to close",
        Style::default().fg(theme.muted_colour),
    )));

    let height = lines.len() as u16 + 4;
    let rect = centered(area, 56, height);

    f.render_widget(Clear, rect);
    f.render_widget(
        Paragraph::new(lines).block(
            Block::default()
                .title(" Keyboard shortcuts ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.accent_colour))
                .style(Style::default().bg(theme.background_colour))
                .padding(Padding::uniform(1)),
        ),
        rect,
    );
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let [row] = Layout::vertical([Constraint::Length(height.min(area.height))])
        .flex(Flex::Center)
        .areas(area);
    let [rect] = Layout::horizontal([Constraint::Length(width.min(area.width))])
        .flex(Flex::Center)
        .areas(row);
    rect
}
