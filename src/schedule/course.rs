// Course display items.
// Turns schedule events into display rows with period text and a stable indicator colour.

use serde::Serialize;

use super::types::{Event, non_blank};

/// Indicator palette (ARGB).
pub const INDICATOR_PALETTE: [u32; 6] = [
    0xFFE5_7373,
    0xFFF0_6292,
    0xFFBA_68C8,
    0xFF64_B5F6,
    0xFF4D_B6AC,
    0xFFFF_B74D,
];

const DEFAULT_NAME: &str = "课程";
const BLANK: &str = " ";

/// One row of a course list widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CourseItem {
    pub event_id: Option<String>,
    pub name: String,
    pub location: String,
    pub teacher: String,
    /// Period range such as "第3-4节", or empty when unknown.
    pub time: String,
    /// ARGB colour from [`INDICATOR_PALETTE`].
    pub indicator_color: u32,
}

impl CourseItem {
    pub fn from_event(event: &Event) -> Self {
        let name = non_blank(event.event_name.as_deref())
            .unwrap_or(DEFAULT_NAME)
            .to_string();

        Self {
            event_id: non_blank(event.event_id.as_deref()).map(str::to_string),
            location: non_blank(event.address.as_deref())
                .unwrap_or(BLANK)
                .to_string(),
            teacher: non_blank(event.member_name.as_deref())
                .unwrap_or(BLANK)
                .to_string(),
            time: period_text(event),
            indicator_color: indicator_color(&name),
            name,
        }
    }
}

/// Period text for an event.
///
/// Start/count wins when both are positive and the end period fits in an
/// `i64`; otherwise the positive integers of the session list are joined;
/// otherwise empty.
pub fn period_text(event: &Event) -> String {
    let range = match (event.session_start, event.session_last) {
        (Some(start), Some(count)) if start > 0 && count > 0 => start
            .checked_add(count - 1)
            .map(|end| format!("第{}-{}节", start, end)),
        _ => None,
    };
    if let Some(range) = range {
        return range;
    }

    if event.session_list.is_empty() {
        return String::new();
    }

    let periods: Vec<String> = event
        .session_list
        .iter()
        .filter_map(|s| s.trim().parse::<i64>().ok())
        .filter(|p| *p > 0)
        .map(|p| p.to_string())
        .collect();
    format!("第{}节", periods.join(","))
}

/// Palette colour for a course name. Same name, same colour.
pub fn indicator_color(name: &str) -> u32 {
    let index = ((string_hash(name) as u32) >> 1) as usize % INDICATOR_PALETTE.len();
    INDICATOR_PALETTE[index]
}

/// Polynomial hash over UTF-16 code units (`h = 31 * h + c`, wrapping).
pub fn string_hash(s: &str) -> i32 {
    s.encode_utf16()
        .fold(0i32, |h, c| h.wrapping_mul(31).wrapping_add(i32::from(c)))
}
