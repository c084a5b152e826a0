// Widget view models.
// Builds the display content of each widget family from the schedule reader.

use chrono::NaiveDate;

use crate::schedule::today::{
    color_slot_for_event, event_at, event_detail, format_time_range, today_events,
    today_weekday_name, week_day_names,
};
use crate::schedule::{CourseItem, Event, Header, ScheduleDocument, ScheduleReader};

/// Shown when there is no cached schedule to display.
pub const SYNC_PLACEHOLDER: &str = "请先打开应用同步课表";
/// Shown when today has no classes.
pub const NO_CLASSES_TODAY: &str = "今日无课";

/// Fixed session slots of the 4x4 grid rows.
pub const GRID_SLOTS: [&str; 4] = ["07:00", "09:00", "11:00", "14:00"];
const GRID_COLUMNS: usize = 4;

/// Widget families the host can place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum WidgetKind {
    /// Course list with a today/tomorrow toggle.
    TodayCourse,
    /// Today's and tomorrow's courses side by side.
    TodayAndNext,
    /// Today's courses.
    TodayList,
    Compact2x2,
    Compact4x2,
    List4x4,
    Grid4x4,
}

impl WidgetKind {
    pub const ALL: [WidgetKind; 7] = [
        WidgetKind::TodayCourse,
        WidgetKind::TodayAndNext,
        WidgetKind::TodayList,
        WidgetKind::Compact2x2,
        WidgetKind::Compact4x2,
        WidgetKind::List4x4,
        WidgetKind::Grid4x4,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            WidgetKind::TodayCourse => "Today",
            WidgetKind::TodayAndNext => "Today & Next",
            WidgetKind::TodayList => "Today List",
            WidgetKind::Compact2x2 => "2x2",
            WidgetKind::Compact4x2 => "4x2",
            WidgetKind::List4x4 => "4x4 List",
            WidgetKind::Grid4x4 => "4x4 Grid",
        }
    }

    /// Whether instances of this kind carry a day-offset toggle.
    pub fn has_day_toggle(&self) -> bool {
        matches!(self, WidgetKind::TodayCourse)
    }

    /// Course rows a compact widget shows.
    fn compact_rows(&self) -> usize {
        match self {
            WidgetKind::Compact2x2 => 1,
            WidgetKind::Compact4x2 => 2,
            WidgetKind::List4x4 => 4,
            _ => 0,
        }
    }
}

/// Which way the day toggle arrow points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleArrow {
    /// Showing today; pressing moves to tomorrow.
    Forward,
    /// Showing tomorrow; pressing returns to today.
    Back,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodayCourseView {
    pub header: Header,
    /// " | 第5周    " or " | ".
    pub week_count_part: String,
    pub day_offset: i32,
    pub arrow: ToggleArrow,
    pub courses: Vec<CourseItem>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodayAndNextView {
    pub header: Header,
    pub week_count: String,
    pub today: Vec<CourseItem>,
    pub next_day: Vec<CourseItem>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodayListView {
    pub header: Header,
    pub courses: Vec<CourseItem>,
}

/// One course row of a compact widget.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CompactRow {
    pub time_start: String,
    pub time_end: String,
    pub title: String,
    pub detail: String,
}

impl CompactRow {
    fn from_event(event: &Event) -> Self {
        let range = format_time_range(event);
        let mut parts = range.splitn(2, '-');
        Self {
            time_start: parts.next().unwrap_or_default().trim().to_string(),
            time_end: parts.next().unwrap_or_default().trim().to_string(),
            title: event.event_name.clone().unwrap_or_default(),
            detail: event_detail(event),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompactView {
    /// "今天 / 周四"
    pub header_left: String,
    /// "第5周", "第?周", or empty without data.
    pub week: String,
    pub rows: Vec<CompactRow>,
    /// Remaining-course count, the sync placeholder, or empty.
    pub footer: String,
    /// Text for an empty row area.
    pub empty_text: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridCell {
    /// Name, plus "\n@address" when known.
    pub text: String,
    pub color_slot: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridView {
    pub week: String,
    pub day_names: Vec<String>,
    /// Rows follow [`GRID_SLOTS`], columns Monday..Thursday.
    pub cells: Vec<Vec<Option<GridCell>>>,
}

/// Content of one widget instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WidgetView {
    TodayCourse(TodayCourseView),
    TodayAndNext(TodayAndNextView),
    TodayList(TodayListView),
    Compact(CompactView),
    Grid(GridView),
}

impl WidgetView {
    /// Build the view for `kind` as of `today`.
    pub fn build(
        kind: WidgetKind,
        reader: &ScheduleReader,
        today: NaiveDate,
        day_offset: i32,
    ) -> Self {
        match kind {
            WidgetKind::TodayCourse => {
                WidgetView::TodayCourse(today_course(reader, today, day_offset))
            }
            WidgetKind::TodayAndNext => WidgetView::TodayAndNext(TodayAndNextView {
                header: reader.load_header(today),
                week_count: reader.load_week_count_text(today),
                today: reader.load_courses_by_day_offset(today, 0),
                next_day: reader.load_courses_by_day_offset(today, 1),
            }),
            WidgetKind::TodayList => WidgetView::TodayList(TodayListView {
                header: reader.load_header(today),
                courses: reader.load_courses_by_day_offset(today, 0),
            }),
            WidgetKind::Compact2x2 | WidgetKind::Compact4x2 | WidgetKind::List4x4 => {
                WidgetView::Compact(compact(kind, reader.current_document().as_ref(), today))
            }
            WidgetKind::Grid4x4 => WidgetView::Grid(grid(reader.current_document().as_ref())),
        }
    }
}

fn today_course(reader: &ScheduleReader, today: NaiveDate, day_offset: i32) -> TodayCourseView {
    let week_count = reader.load_week_count_text(today);
    let week_count_part = if week_count.trim().is_empty() {
        " | ".to_string()
    } else {
        format!(" | {}    ", week_count)
    };

    TodayCourseView {
        header: reader.load_header_by_day_offset(today, day_offset),
        week_count_part,
        day_offset,
        arrow: if day_offset == 0 {
            ToggleArrow::Forward
        } else {
            ToggleArrow::Back
        },
        courses: reader.load_courses_by_day_offset(today, day_offset),
    }
}

fn week_label(doc: &ScheduleDocument) -> String {
    format!("第{}周", doc.week_label().unwrap_or("?"))
}

fn compact(kind: WidgetKind, doc: Option<&ScheduleDocument>, today: NaiveDate) -> CompactView {
    let header_left = format!("今天 / {}", today_weekday_name(today));

    let Some(doc) = doc else {
        return CompactView {
            header_left,
            week: String::new(),
            rows: Vec::new(),
            footer: SYNC_PLACEHOLDER.to_string(),
            empty_text: None,
        };
    };

    let capacity = kind.compact_rows();
    let events = today_events(doc, today);
    let rows: Vec<CompactRow> = events
        .iter()
        .take(capacity)
        .map(|e| CompactRow::from_event(e))
        .collect();

    let rest = events.len().saturating_sub(capacity);
    let footer = match (rest, kind) {
        (0, _) => String::new(),
        (n, WidgetKind::Compact2x2) => format!("其他{}节课程", n),
        (n, _) => format!("其他{}节课程・・・", n),
    };

    CompactView {
        header_left,
        week: week_label(doc),
        empty_text: rows.is_empty().then(|| NO_CLASSES_TODAY.to_string()),
        rows,
        footer,
    }
}

fn grid(doc: Option<&ScheduleDocument>) -> GridView {
    let Some(doc) = doc else {
        return GridView {
            week: SYNC_PLACEHOLDER.to_string(),
            day_names: Vec::new(),
            cells: Vec::new(),
        };
    };

    let cells = GRID_SLOTS
        .iter()
        .map(|slot| {
            (1..=GRID_COLUMNS as u32)
                .map(|weekday| {
                    event_at(doc, weekday, slot).map(|e| GridCell {
                        text: grid_text(e),
                        color_slot: color_slot_for_event(e.event_name.as_deref()),
                    })
                })
                .collect()
        })
        .collect();

    GridView {
        week: week_label(doc),
        day_names: week_day_names(doc).into_iter().take(GRID_COLUMNS).collect(),
        cells,
    }
}

fn grid_text(event: &Event) -> String {
    let name = event.event_name.clone().unwrap_or_default();
    match event.address.as_deref() {
        Some(address) => format!("{}\n@{}", name, address),
        None => name,
    }
}
