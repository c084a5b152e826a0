// Widget module.
// Home-screen widget views, theme, per-instance toggles, and the host that refreshes them.

pub mod host;
pub mod theme;
pub mod toggle;
pub mod views;

pub use host::{RenderedWidget, WidgetHost, WidgetRefresher};
pub use theme::{ThemeMode, WidgetColors};
pub use toggle::DayOffsetToggles;
pub use views::{WidgetKind, WidgetView};
