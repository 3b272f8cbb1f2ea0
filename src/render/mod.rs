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

//! User interface rendering logic.
//!
//! This module handles the translation of the [`App`] state into visual
//! widgets using the `ratatui` framework. It is responsible for layout
//! management, widget styling, and terminal frame composition.
//!
//! # Rendering Pipeline
//!
//! The primary entry point is the [`draw`] function, which is called after
//! every processed event to provide a reactive user interface. Notifications
//! and the help overlay are drawn last so they sit above the roster.

mod help;
mod notifications;
mod roster;
mod search;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Paragraph},
};

use crate::{
    App,
    model::AttendanceStatus,
    render::{
        help::draw_help, notifications::draw_notifications, roster::draw_roster,
        search::draw_search,
    },
};

/// Renders the user interface to the terminal frame.
///
/// # Arguments
///
/// * `f` - The current terminal frame used for drawing.
/// * `app` - A mutable reference to the application state, the roster table
///   keeps its scroll position in a `TableState`.
pub(crate) fn draw(f: &mut Frame, app: &mut App) {
    let area = f.area();

    f.render_widget(
        Block::default().style(Style::default().bg(app.theme.background_colour)),
        area,
    );

    // Outer layout: header, roster, search, footer
    let outer = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(area);

    draw_header(f, outer[0], app);
    draw_roster(f, outer[1], app);
    draw_search(f, outer[2], app);
    draw_footer(f, outer[3], app);

    draw_notifications(f, outer[1], &app.notifications, &app.theme);

    if app.show_help {
        draw_help(f, area, &app.theme);
    }
}

fn draw_header(f: &mut Frame, area: Rect, app: &App) {
    let title = format!(" Roll call for {}", app.date.format("%A %-d %B %Y"));
    let style = Style::default()
        .fg(app.theme.accent_colour)
        .add_modifier(Modifier::BOLD);
    f.render_widget(Paragraph::new(title).style(style), area);
}

/// Status counts for the whole roster plus a pointer to the help overlay.
fn draw_footer(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let mut spans = vec![Span::raw(" ")];

    for status in AttendanceStatus::ALL {
        spans.push(Span::styled(
            format!("{} {}  ", status.label(), app.roster.count(Some(status))),
            Style::default().fg(theme.status_colour(Some(status))),
        ));
    }
    spans.push(Span::styled(
        format!("Unmarked {}  ", app.roster.count(None)),
        Style::default().fg(theme.muted_colour),
    ));
    if !app.roster.selection.is_empty() {
        spans.push(Span::styled(
            format!("{} selected  ", app.roster.selection.len()),
            Style::default().fg(theme.accent_colour),
        ));
    }
    if !app.ledger.is_empty() {
        spans.push(Span::styled(
            format!("{} to undo  ", app.ledger.len()),
            Style::default().fg(theme.muted_colour),
        ));
    }
    spans.push(Span::styled("? for help", Style::default().fg(theme.muted_colour)));

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}
