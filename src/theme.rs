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

//! Visual styling and color configuration for the TUI.
//!
//! This module defines the application's color palette, including the
//! colours used for each attendance status and notification kind.

use ratatui::style::Color;

use crate::{model::AttendanceStatus, notify::NotificationKind};

#[derive(Clone, Copy)]
pub(crate) struct Theme {
    pub(crate) background_colour: Color,
    pub(crate) accent_colour: Color,
    pub(crate) border_colour: Color,
    pub(crate) text_colour: Color,
    pub(crate) muted_colour: Color,
    pub(crate) search_colour: Color,
    pub(crate) search_bg: Color,

    pub(crate) present_fg: Color,
    pub(crate) absent_fg: Color,
    pub(crate) late_fg: Color,
    pub(crate) excused_fg: Color,

    pub(crate) success_colour: Color,
    pub(crate) error_colour: Color,
    pub(crate) warning_colour: Color,
    pub(crate) info_colour: Color,
}

impl Default for Theme {
    // Returns the standard application theme.
    fn default() -> Self {
        Self::default_theme()
    }
}

impl Theme {
    // Constructs the default theme.
    pub(crate) const fn default_theme() -> Self {
        Self {
            background_colour: Color::Rgb(24, 28, 36),
            accent_colour: Color::Rgb(250, 189, 47),
            border_colour: Color::Rgb(102, 102, 102),
            text_colour: Color::Rgb(230, 230, 230),
            muted_colour: Color::Rgb(140, 140, 150),
            search_colour: Color::Rgb(255, 255, 255),
            search_bg: Color::Rgb(40, 46, 58),

            present_fg: Color::Rgb(120, 200, 120),
            absent_fg: Color::Rgb(230, 90, 90),
            late_fg: Color::Rgb(240, 180, 70),
            excused_fg: Color::Rgb(130, 170, 240),

            success_colour: Color::Rgb(120, 200, 120),
            error_colour: Color::Rgb(230, 90, 90),
            warning_colour: Color::Rgb(240, 180, 70),
            info_colour: Color::Rgb(130, 170, 240),
        }
    }

    pub(crate) fn status_colour(&self, status: Option<AttendanceStatus>) -> Color {
        match status {
            Some(AttendanceStatus::Present) => self.present_fg,
            Some(AttendanceStatus::Absent) => self.absent_fg,
            Some(AttendanceStatus::Late) => self.late_fg,
            Some(AttendanceStatus::Excused) => self.excused_fg,
            None => self.muted_colour,
        }
    }

    pub(crate) fn notification_colour(&self, kind: NotificationKind) -> Color {
        match kind {
            NotificationKind::Success => self.success_colour,
            NotificationKind::Error => self.error_colour,
            NotificationKind::Warning => self.warning_colour,
            NotificationKind::Info => self.info_colour,
        }
    }

    /// Formats an RGB colour as `#rrggbb`, other colours have no hex form.
    pub(crate) fn to_hex(colour: Color) -> Option<String> {
        match colour {
            Color::Rgb(r, g, b) => Some(format!("#{:02x}{:02x}{:02x}", r, g, b)),
            _ => None,
        }
    }
}
