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

//! UI rendering logic for the roster table.
//!
//! Each visible student gets a row with a selection indicator, the student
//! code, the name and today's status coloured by the theme.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
};

use crate::App;

pub(super) fn draw_roster(f: &mut Frame, area: Rect, app: &mut App) {
    let theme = &app.theme;
    let roster = &mut app.roster;

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border_colour))
        .title(" Students ");

    if roster.visible_students().next().is_none() {
        let message = if roster.is_empty() {
            "Loading roster...".to_string()
        } else {
            format!("No students match '{}'", roster.filter())
        };
        f.render_widget(
            Paragraph::new(message)
                .style(Style::default().fg(theme.muted_colour))
                .alignment(Alignment::Center)
                .block(block),
            area,
        );
        return;
    }

    let rows: Vec<Row> = roster
        .visible_students()
        .map(|student| {
            let selection_indicator = if roster.selection.contains(&student.id) {
                Line::from("+").style(Style::default().fg(Color::Black).bg(theme.accent_colour))
            } else {
                Line::from("")
            };

            let mut status = student.status.map_or("-", |s| s.label()).to_string();
            if roster.is_saving(student.id) {
                status.push('…');
            }

            Row::new(vec![
                Cell::from(selection_indicator),
                Cell::from(Line::from(student.code.clone()).style(Style::default().fg(theme.muted_colour))),
                Cell::from(Line::from(student.name.clone()).style(Style::default().fg(theme.text_colour))),
                Cell::from(Line::from(status).style(Style::default().fg(theme.status_colour(student.status)))),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(1),
            Constraint::Length(8),
            Constraint::Min(20),
            Constraint::Length(10),
        ],
    )
    .header(
        Row::new(vec![
            Cell::from(""),
            Cell::from("Code"),
            Cell::from("Name"),
            Cell::from("Status"),
        ])
        .style(Style::default().add_modifier(Modifier::BOLD).fg(theme.accent_colour))
        .bottom_margin(1),
    )
    .row_highlight_style(Style::default().bg(Color::Blue).fg(Color::White))
    .block(block);

    f.render_stateful_widget(table, area, &mut roster.table_state);
}
