// "Today" helpers for the compact widgets.
// Session time ranges, today's events, weekday names, grid lookups, and colour slots.

use chrono::NaiveDate;

use super::calendar::monday_based_weekday;
use super::course::string_hash;
use super::types::{Event, ScheduleDocument};

pub const WEEKDAY_NAMES: [&str; 7] = ["周一", "周二", "周三", "周四", "周五", "周六", "周日"];

/// Number of colour slots used by the grid widget.
pub const COLOR_SLOTS: usize = 8;

/// Long weekday name for `today`, e.g. "周四".
pub fn today_weekday_name(today: NaiveDate) -> &'static str {
    WEEKDAY_NAMES[(monday_based_weekday(today) - 1) as usize]
}

/// Whether an event's weekday names `weekday`, as a number ("4") or a name ("周四").
fn is_on_weekday(event: &Event, weekday: u32) -> bool {
    let Some(day) = event.week_day.as_deref().map(str::trim) else {
        return false;
    };
    day.parse::<u32>().ok() == Some(weekday)
        || (weekday as usize)
            .checked_sub(1)
            .and_then(|i| WEEKDAY_NAMES.get(i))
            == Some(&day)
}

/// Time range for display.
///
/// Session-list labels win ("08:00-09:40"); then the raw start and count
/// ("3-2"); then the start alone.
pub fn format_time_range(event: &Event) -> String {
    if let (Some(first), Some(last)) = (event.session_list.first(), event.session_list.last()) {
        let (first, last) = (first.trim(), last.trim());
        if !first.is_empty() && !last.is_empty() {
            return format!("{}-{}", first, last);
        }
    }

    match (event.session_start, event.session_last) {
        (Some(start), Some(last)) => format!("{}-{}", start, last),
        (Some(start), None) => start.to_string(),
        _ => String::new(),
    }
}

/// Events held today, ordered by first session label or start period.
pub fn today_events(doc: &ScheduleDocument, today: NaiveDate) -> Vec<&Event> {
    let weekday = monday_based_weekday(today);
    let mut events: Vec<&Event> = doc
        .events
        .iter()
        .filter(|e| is_on_weekday(e, weekday))
        .collect();
    events.sort_by_key(|e| sort_key(e));
    events
}

fn sort_key(event: &Event) -> String {
    event
        .session_list
        .first()
        .map(|s| s.trim().to_string())
        .or_else(|| event.session_start.map(|s| format!("{:04}", s)))
        .unwrap_or_default()
}

/// Weekday labels in list order, or the full week when the document has none.
pub fn week_day_names(doc: &ScheduleDocument) -> Vec<String> {
    let names: Vec<String> = doc
        .week_days
        .iter()
        .filter_map(|d| d.week_day.as_deref())
        .map(|day| match day.trim().parse::<usize>() {
            Ok(n @ 1..=7) => WEEKDAY_NAMES[n - 1].to_string(),
            _ => day.to_string(),
        })
        .collect();

    if names.is_empty() {
        WEEKDAY_NAMES.iter().map(|s| s.to_string()).collect()
    } else {
        names
    }
}

/// First event on `weekday` (1..7) occupying `slot` (a session label such as "09:00" or a period).
pub fn event_at<'a>(doc: &'a ScheduleDocument, weekday: u32, slot: &str) -> Option<&'a Event> {
    doc.events.iter().find(|e| {
        is_on_weekday(e, weekday)
            && (e
                .session_list
                .iter()
                .any(|s| s.trim() == slot)
                || e.session_start.map(|s| s.to_string()).as_deref() == Some(slot))
    })
}

/// Grid colour slot for a course name.
pub fn color_slot_for_event(name: Option<&str>) -> usize {
    (string_hash(name.unwrap_or_default()) & 0x7FFF) as usize % COLOR_SLOTS
}

/// "第1节 | -2节 | A101 | 王老师", skipping empty parts.
pub fn event_detail(event: &Event) -> String {
    let mut parts = Vec::new();
    if let Some(start) = event.session_start {
        parts.push(format!("第{}节", start));
    }
    if let Some(last) = event.session_last.filter(|l| Some(*l) != event.session_start) {
        parts.push(format!("-{}节", last));
    }
    if let Some(address) = event.address.as_deref().filter(|a| !a.is_empty()) {
        parts.push(address.to_string());
    }
    if let Some(teacher) = event.member_name.as_deref().filter(|m| !m.is_empty()) {
        parts.push(teacher.to_string());
    }
    parts.join(" | ")
}

#[cfg(test)]
mod tests {
    use super::*;

    // 2024-03-07 is a Thursday.
    fn thursday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 7).unwrap()
    }

    fn doc() -> ScheduleDocument {
        ScheduleDocument::parse(
            r#"{
                "weekDayList": [{"weekDay": "1"}, {"weekDay": "2"}, {"weekDay": "周三"}],
                "eventList": [
                    {"weekDay": "4", "eventName": "Late", "sessionList": ["14:00", "15:40"]},
                    {"weekDay": "周四", "eventName": "Early", "sessionList": ["08:00", "09:40"]},
                    {"weekDay": "5", "eventName": "Friday", "sessionStart": 1, "sessionLast": 2},
                    {"weekDay": "1", "eventName": "Grid", "sessionStart": 3, "sessionLast": 2}
                ]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_today_weekday_name() {
        assert_eq!(today_weekday_name(thursday()), "周四");
    }

    #[test]
    fn test_format_time_range() {
        let listed = Event {
            session_list: vec!["08:00".into(), "09:40".into()],
            ..Default::default()
        };
        assert_eq!(format_time_range(&listed), "08:00-09:40");

        let periods = Event {
            session_start: Some(3),
            session_last: Some(2),
            ..Default::default()
        };
        assert_eq!(format_time_range(&periods), "3-2");

        let start_only = Event {
            session_start: Some(3),
            ..Default::default()
        };
        assert_eq!(format_time_range(&start_only), "3");

        assert_eq!(format_time_range(&Event::default()), "");
    }

    #[test]
    fn test_today_events_match_numbers_and_names() {
        let doc = doc();
        let names: Vec<_> = today_events(&doc, thursday())
            .iter()
            .filter_map(|e| e.event_name.as_deref())
            .collect();
        assert_eq!(names, vec!["Early", "Late"]);
    }

    #[test]
    fn test_week_day_names() {
        assert_eq!(week_day_names(&doc()), vec!["周一", "周二", "周三"]);
        assert_eq!(week_day_names(&ScheduleDocument::default()).len(), 7);
    }

    #[test]
    fn test_event_at() {
        let doc = doc();
        assert_eq!(
            event_at(&doc, 4, "14:00").and_then(|e| e.event_name.as_deref()),
            Some("Late")
        );
        assert_eq!(
            event_at(&doc, 1, "3").and_then(|e| e.event_name.as_deref()),
            Some("Grid")
        );
        assert!(event_at(&doc, 2, "08:00").is_none());
    }

    #[test]
    fn test_event_at_needs_whole_label() {
        let doc = ScheduleDocument::parse(
            r#"{"eventList": [
                {"weekDay": "1", "eventName": "Ten", "sessionList": ["10", "11"]},
                {"weekDay": "1", "eventName": "Morning", "sessionList": [" 09:00 ", "09:45"]}
            ]}"#,
        )
        .unwrap();

        assert!(event_at(&doc, 1, "1").is_none());
        assert!(event_at(&doc, 1, "09").is_none());
        assert_eq!(
            event_at(&doc, 1, "09:00").and_then(|e| e.event_name.as_deref()),
            Some("Morning")
        );
        assert_eq!(
            event_at(&doc, 1, "11").and_then(|e| e.event_name.as_deref()),
            Some("Ten")
        );
    }

    #[test]
    fn test_color_slot_is_stable() {
        let slot = color_slot_for_event(Some("高等数学"));
        assert!(slot < COLOR_SLOTS);
        assert_eq!(slot, color_slot_for_event(Some("高等数学")));
        assert_eq!(color_slot_for_event(None), 0);
    }

    #[test]
    fn test_event_detail() {
        let e = Event {
            session_start: Some(1),
            session_last: Some(2),
            address: Some("A101".into()),
            member_name: Some("王老师".into()),
            ..Default::default()
        };
        assert_eq!(event_detail(&e), "第1节 | -2节 | A101 | 王老师");

        let same = Event {
            session_start: Some(2),
            session_last: Some(2),
            ..Default::default()
        };
        assert_eq!(event_detail(&same), "第2节");
    }
}
