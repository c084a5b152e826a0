// Schedule module.
// Cached timetable documents and the queries widgets run against them.

pub mod calendar;
pub mod course;
pub mod reader;
pub mod today;
pub mod types;

pub use course::{CourseItem, INDICATOR_PALETTE};
pub use reader::{Header, SCHEDULE_NAME, ScheduleReader};
pub use types::{Event, ScheduleDocument, WeekDayEntry};
