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

//! Roster view state.
//!
//! Holds the day's students together with the table cursor, the set of
//! selected students and the active search filter. Navigation and selection
//! only ever act on students that match the filter.

use std::collections::{HashMap, HashSet};

use ratatui::widgets::TableState;

use crate::model::{AttendanceStatus, Student, SubjectId};

#[derive(Default)]
pub(crate) struct Roster {
    students: Vec<Student>,
    filter: String,
    visible: Vec<usize>,
    saving: HashMap<i64, usize>,
    pub(crate) selection: HashSet<i64>,
    pub(crate) table_state: TableState,
}

impl Roster {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn set_students(&mut self, students: Vec<Student>) {
        let current_id = self.current().map(|s| s.id);
        self.students = students;
        let ids: HashSet<i64> = self.students.iter().map(|s| s.id).collect();
        self.selection.retain(|id| ids.contains(id));
        self.refresh_visible(current_id);
    }

    pub(crate) fn set_filter(&mut self, filter: &str) {
        let filter = filter.trim().to_lowercase();
        if filter != self.filter {
            let current_id = self.current().map(|s| s.id);
            self.filter = filter;
            self.refresh_visible(current_id);
        }
    }

    pub(crate) fn filter(&self) -> &str {
        &self.filter
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.students.is_empty()
    }

    pub(crate) fn visible_students(&self) -> impl Iterator<Item = &Student> {
        self.visible.iter().map(|&i| &self.students[i])
    }

    pub(crate) fn current(&self) -> Option<&Student> {
        let row = self.table_state.selected()?;
        self.visible.get(row).map(|&i| &self.students[i])
    }

    pub(crate) fn student(&self, id: &SubjectId) -> Option<&Student> {
        let id = id.as_number()?;
        self.students.iter().find(|s| s.id == id)
    }

    pub(crate) fn next(&mut self) {
        let len = self.visible.len();
        if len == 0 {
            return;
        }
        let i = match self.table_state.selected() {
            Some(i) if i + 1 < len => i + 1,
            _ => 0,
        };
        self.table_state.select(Some(i));
    }

    pub(crate) fn previous(&mut self) {
        let len = self.visible.len();
        if len == 0 {
            return;
        }
        let i = match self.table_state.selected() {
            Some(0) => len - 1,
            Some(i) => i - 1,
            None => 0,
        };
        self.table_state.select(Some(i));
    }

    pub(crate) fn toggle_select_current(&mut self) {
        if let Some(id) = self.current().map(|s| s.id) {
            if !self.selection.insert(id) {
                self.selection.remove(&id);
            }
        }
    }

    pub(crate) fn select_all(&mut self) {
        let ids: Vec<i64> = self.visible_students().map(|s| s.id).collect();
        self.selection.extend(ids);
    }

    pub(crate) fn select_none(&mut self) {
        self.selection.clear();
    }

    /// Students a marking command applies to: the selection when there is
    /// one, otherwise the student under the cursor. Returned in roster order.
    pub(crate) fn mark_targets(&self) -> Vec<SubjectId> {
        if self.selection.is_empty() {
            return self.current().map(Student::subject_id).into_iter().collect();
        }

        self.students
            .iter()
            .filter(|s| self.selection.contains(&s.id))
            .map(Student::subject_id)
            .collect()
    }

    /// Sets a student's status, returning the status it replaced. Returns
    /// `None` when no such student is on the roster.
    pub(crate) fn set_status(
        &mut self,
        id: &SubjectId,
        status: Option<AttendanceStatus>,
    ) -> Option<Option<AttendanceStatus>> {
        let id = id.as_number()?;
        let student = self.students.iter_mut().find(|s| s.id == id)?;
        Some(std::mem::replace(&mut student.status, status))
    }

    /// Records a save sent to the store for `id`.
    pub(crate) fn begin_save(&mut self, id: i64) {
        *self.saving.entry(id).or_default() += 1;
    }

    /// Records that the store answered one save for `id`, returning whether
    /// any saves for that student are still outstanding.
    pub(crate) fn finish_save(&mut self, id: i64) -> bool {
        match self.saving.get_mut(&id) {
            Some(count) if *count > 1 => {
                *count -= 1;
                true
            }
            Some(_) => {
                self.saving.remove(&id);
                false
            }
            None => false,
        }
    }

    pub(crate) fn is_saving(&self, id: i64) -> bool {
        self.saving.contains_key(&id)
    }

    pub(crate) fn count(&self, status: Option<AttendanceStatus>) -> usize {
        self.students.iter().filter(|s| s.status == status).count()
    }

    fn refresh_visible(&mut self, current_id: Option<i64>) {
        self.visible = self
            .students
            .iter()
            .enumerate()
            .filter(|(_, s)| {
                self.filter.is_empty()
                    || s.name.to_lowercase().contains(&self.filter)
                    || s.code.to_lowercase().contains(&self.filter)
            })
            .map(|(i, _)| i)
            .collect();

        // Keep the cursor on the same student where possible
        let row = current_id
            .and_then(|id| self.visible.iter().position(|&i| self.students[i].id == id))
            .or_else(|| (!self.visible.is_empty()).then_some(0));
        self.table_state.select(row);
    }
}
