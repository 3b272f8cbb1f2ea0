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

//! Render the notification stack.
//!
//! Notifications are drawn as bordered boxes in the top-right corner of the
//! given area, oldest first, stopping when the area runs out of room.

use ratatui::{
    Frame,
    layout::Rect,
    style::Style,
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use crate::{notify::NotificationQueue, theme::Theme, timer::Scheduler};

const MAX_WIDTH: u16 = 48;

pub(super) fn draw_notifications<S: Scheduler>(
    f: &mut Frame,
    area: Rect,
    queue: &NotificationQueue<S>,
    theme: &Theme,
) {
    let width = MAX_WIDTH.min(area.width.saturating_sub(2));
    if width < 10 {
        return;
    }
    let x = area.right().saturating_sub(width + 1);
    let mut y = area.y.saturating_add(1);

    for notification in queue.notifications() {
        let height = box_height(&notification.message, width);
        if y.saturating_add(height) > area.bottom() {
            break;
        }

        let colour = theme.notification_colour(notification.kind);
        let mut block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(colour))
            .style(Style::default().bg(theme.background_colour));
        if let Some(title) = &notification.title {
            block = block.title(format!(" {title} "));
        }

        let rect = Rect::new(x, y, width, height);
        f.render_widget(Clear, rect);
        f.render_widget(
            Paragraph::new(notification.message.as_str())
                .style(Style::default().fg(theme.text_colour))
                .wrap(Wrap { trim: true })
                .block(block),
            rect,
        );

        y = y.saturating_add(height);
    }
}

/// Height of a bordered box wrapping `message` at `width` columns.
fn box_height(message: &str, width: u16) -> u16 {
    let inner_width = usize::from(width.saturating_sub(2).max(1));
    let lines = message.chars().count().div_ceil(inner_width).max(1);
    u16::try_from(lines).unwrap_or(u16::MAX).saturating_add(2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_message_takes_one_line() {
        assert_eq!(box_height("Saved", 48), 3);
        assert_eq!(box_height("", 48), 3);
    }

    #[test]
    fn message_wraps_at_inner_width() {
        assert_eq!(box_height(&"x".repeat(46), 48), 3);
        assert_eq!(box_height(&"x".repeat(47), 48), 4);
    }

    #[test]
    fn huge_message_saturates() {
        let message = "x".repeat(usize::from(u16::MAX) * 4);
        assert_eq!(box_height(&message, 3), u16::MAX);
    }
}
