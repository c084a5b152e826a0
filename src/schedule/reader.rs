// Schedule cache reader.
// Answers header, week-count, and course-list queries from the cached documents in the store.

use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;

use crate::store::{KeyLayout, KeyValueStore};

use super::calendar::{date_text, monday_based_weekday, shift_days, week_text};
use super::course::CourseItem;
use super::types::{ScheduleDocument, non_blank};

/// Label shown in every widget title.
pub const SCHEDULE_NAME: &str = "课表";

/// Widget title line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Header {
    pub schedule_name: String,
    /// "M.d"
    pub date_text: String,
    /// "周三"
    pub week_text: String,
}

impl Header {
    fn for_date(date: NaiveDate) -> Self {
        Self {
            schedule_name: SCHEDULE_NAME.to_string(),
            date_text: date_text(date),
            week_text: week_text(i64::from(monday_based_weekday(date))),
        }
    }
}

/// Read-only query layer over the shared store.
///
/// Every query reads the store afresh and never fails: missing keys,
/// missing documents and malformed JSON all read as "no data".
#[derive(Clone)]
pub struct ScheduleReader {
    store: Arc<dyn KeyValueStore>,
    keys: KeyLayout,
}

impl ScheduleReader {
    pub fn new(store: Arc<dyn KeyValueStore>, keys: KeyLayout) -> Self {
        Self { store, keys }
    }

    pub fn keys(&self) -> &KeyLayout {
        &self.keys
    }

    /// Non-blank value at `key`.
    fn get_non_blank(&self, key: &str) -> Option<String> {
        self.store
            .get_string(key)
            .filter(|v| !v.trim().is_empty())
    }

    /// The logged-in user, if any.
    pub fn resolve_user(&self) -> Option<String> {
        self.get_non_blank(&self.keys.account())
    }

    /// Load and parse the document at a composite key.
    fn load_document(&self, user: &str, term: &str, week: &str) -> Option<ScheduleDocument> {
        let key = self.keys.schedule(user, term, week);
        let Some(raw) = self.store.get_string(&key) else {
            tracing::debug!(key = %key, "no cached schedule document");
            return None;
        };

        match ScheduleDocument::parse(&raw) {
            Ok(doc) => Some(doc),
            Err(e) => {
                tracing::debug!(key = %key, error = %e, "discarding unreadable schedule document");
                None
            }
        }
    }

    /// The document for the user's last-viewed term and week.
    pub fn load_latest_document(&self, user: &str) -> Option<ScheduleDocument> {
        let term = self.get_non_blank(&self.keys.last_term(user))?;
        let week = self.get_non_blank(&self.keys.last_week(user))?;
        self.load_document(user, &term, &week)
    }

    /// The document `offset_weeks` away from the last-viewed week.
    /// Requires the week pointer to be an integer.
    pub fn load_document_by_week_offset(
        &self,
        user: &str,
        offset_weeks: i64,
    ) -> Option<ScheduleDocument> {
        let term = self.get_non_blank(&self.keys.last_term(user))?;
        let week = self.get_non_blank(&self.keys.last_week(user))?;
        let week: i64 = week.trim().parse().ok()?;
        let target = week.checked_add(offset_weeks)?;
        self.load_document(user, &term, &target.to_string())
    }

    /// The current user's latest document.
    pub fn current_document(&self) -> Option<ScheduleDocument> {
        let user = self.resolve_user()?;
        self.load_latest_document(&user)
    }

    /// Header for today. Trusts the document's "today" entry only when its date matches.
    pub fn load_header(&self, today: NaiveDate) -> Header {
        let mut header = Header::for_date(today);

        let Some(doc) = self.current_document() else {
            return header;
        };

        let today_text = date_text(today);
        if let Some(entry) = doc.today_entry(&today_text) {
            header.date_text = today_text;
            if let Some(day) = non_blank(entry.week_day.as_deref()) {
                header.week_text = week_text(day.trim().parse().unwrap_or(1));
            }
        }

        header
    }

    /// Header for `today + offset` days, from the calendar alone.
    pub fn load_header_by_day_offset(&self, today: NaiveDate, offset: i32) -> Header {
        Header::for_date(shift_days(today, offset))
    }

    /// "第N周" when the cached week contains today, else empty.
    pub fn load_week_count_text(&self, today: NaiveDate) -> String {
        let Some(doc) = self.current_document() else {
            return String::new();
        };

        if !doc.contains_date(&date_text(today)) {
            return String::new();
        }

        doc.week_label()
            .map(|week| format!("第{}周", week))
            .unwrap_or_default()
    }

    /// Courses on `week_day` ("1".."7"), sorted by period text.
    pub fn load_courses_for_weekday(doc: &ScheduleDocument, week_day: &str) -> Vec<CourseItem> {
        let mut items: Vec<CourseItem> = doc
            .events
            .iter()
            .filter(|e| e.week_day.as_deref() == Some(week_day))
            .map(CourseItem::from_event)
            .collect();

        items.sort_by(|a, b| a.time.cmp(&b.time));
        items
    }

    /// Courses `offset` days from today, switching to the adjacent week's
    /// document when the target falls outside the cached week.
    pub fn load_courses_by_day_offset(&self, today: NaiveDate, offset: i32) -> Vec<CourseItem> {
        let Some(user) = self.resolve_user() else {
            return Vec::new();
        };
        let Some(doc) = self.load_latest_document(&user) else {
            return Vec::new();
        };

        let today_text = date_text(today);
        if !doc.contains_date(&today_text) {
            tracing::debug!(date = %today_text, "cached week does not contain today");
            return Vec::new();
        }

        let base = base_weekday(&doc, today);
        let raw_target = base.saturating_add(i64::from(offset));

        let (target, adjacent) = if raw_target > 7 && offset > 0 {
            (raw_target - 7, self.load_document_by_week_offset(&user, 1))
        } else if raw_target < 1 && offset < 0 {
            (raw_target + 7, self.load_document_by_week_offset(&user, -1))
        } else {
            (raw_target, None)
        };

        let target = target.clamp(1, 7).to_string();
        match adjacent {
            Some(adjacent) => Self::load_courses_for_weekday(&adjacent, &target),
            None => Self::load_courses_for_weekday(&doc, &target),
        }
    }
}

/// Weekday of the document's trusted "today" entry, else the calendar weekday.
fn base_weekday(doc: &ScheduleDocument, today: NaiveDate) -> i64 {
    doc.today_entry(&date_text(today))
        .and_then(|entry| non_blank(entry.week_day.as_deref()))
        .and_then(|day| day.trim().parse().ok())
        .unwrap_or_else(|| i64::from(monday_based_weekday(today)))
}
