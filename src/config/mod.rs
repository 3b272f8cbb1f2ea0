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

//! Application configuration.
//!
//! This module manages the application configuration file.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{notify::NOTIFICATION_TTL, undo::{UNDO_CAPACITY, UNDO_WINDOW}};

const CONFIG_NAME: &str = "rollcall";

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct AppConfig {
    pub version: u32,
    pub database_file: String,
    pub log_file: String,
    pub log_level: String,
    pub undo_window_ms: u64,
    pub undo_capacity: usize,
    pub notification_ttl_ms: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: 1,
            database_file: "rollcall.db".to_string(),
            log_file: "rollcall.log".to_string(),
            log_level: "info".to_string(),
            undo_window_ms: UNDO_WINDOW.as_millis() as u64,
            undo_capacity: UNDO_CAPACITY,
            notification_ttl_ms: NOTIFICATION_TTL.as_millis() as u64,
        }
    }
}

impl AppConfig {
    pub fn undo_window(&self) -> Duration {
        Duration::from_millis(self.undo_window_ms)
    }

    pub fn notification_ttl(&self) -> Duration {
        Duration::from_millis(self.notification_ttl_ms)
    }
}

pub fn load_config() -> AppConfig {
    confy::load(CONFIG_NAME, None).unwrap_or_default()
}
