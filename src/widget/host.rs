// Widget host.
// Tracks placed widget instances, rebuilds their views, and handles refresh and toggle signals.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{Local, NaiveDate};

use crate::error::Result;
use crate::schedule::ScheduleReader;
use crate::store::{KeyLayout, KeyValueStore};

use super::theme::{ThemeMode, WidgetColors};
use super::toggle::DayOffsetToggles;
use super::views::{WidgetKind, WidgetView};

/// Receiver of the "refresh all widgets now" signal.
pub trait WidgetRefresher {
    /// Rebuild every placed widget. Returns how many were refreshed.
    fn refresh_all_widgets(&mut self) -> usize;
}

/// Last render of a widget instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedWidget {
    pub kind: WidgetKind,
    pub day_offset: i32,
    pub colors: WidgetColors,
    pub view: WidgetView,
}

/// Placed widget instances and their current renders.
pub struct WidgetHost {
    schedule_store: Arc<dyn KeyValueStore>,
    reader: ScheduleReader,
    toggles: DayOffsetToggles,
    system_dark: bool,
    next_id: i32,
    instances: BTreeMap<i32, WidgetKind>,
    rendered: BTreeMap<i32, RenderedWidget>,
}

impl WidgetHost {
    /// Create a host over the shell's store and a separate widget prefs store.
    pub fn new(
        schedule_store: Arc<dyn KeyValueStore>,
        widget_store: Arc<dyn KeyValueStore>,
        keys: KeyLayout,
        system_dark: bool,
    ) -> Self {
        Self {
            reader: ScheduleReader::new(schedule_store.clone(), keys),
            schedule_store,
            toggles: DayOffsetToggles::new(widget_store),
            system_dark,
            next_id: 1,
            instances: BTreeMap::new(),
            rendered: BTreeMap::new(),
        }
    }

    pub fn reader(&self) -> &ScheduleReader {
        &self.reader
    }

    /// Place a widget and return its instance id.
    pub fn add(&mut self, kind: WidgetKind) -> i32 {
        let id = self.next_id;
        self.next_id += 1;
        self.instances.insert(id, kind);
        id
    }

    /// Remove a placed widget. Its toggle state stays in widget prefs.
    pub fn remove(&mut self, id: i32) -> bool {
        self.rendered.remove(&id);
        self.instances.remove(&id).is_some()
    }

    /// Placed instances in id order.
    pub fn instances(&self) -> impl Iterator<Item = (i32, WidgetKind)> + '_ {
        self.instances.iter().map(|(id, kind)| (*id, *kind))
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Current render of an instance, if it has been refreshed.
    pub fn rendered(&self, id: i32) -> Option<&RenderedWidget> {
        self.rendered.get(&id)
    }

    pub fn day_offset(&self, id: i32) -> i32 {
        self.toggles.get(id)
    }

    /// Colours for the current theme mode and system setting.
    pub fn colors(&self) -> WidgetColors {
        let mode = ThemeMode::load(self.schedule_store.as_ref(), self.reader.keys());
        WidgetColors::new(mode.is_dark(self.system_dark))
    }

    /// Rebuild one instance. Returns false for unknown ids.
    pub fn refresh(&mut self, id: i32, today: NaiveDate) -> bool {
        let Some(kind) = self.instances.get(&id).copied() else {
            return false;
        };

        let day_offset = if kind.has_day_toggle() {
            self.toggles.get(id)
        } else {
            0
        };

        let rendered = RenderedWidget {
            kind,
            day_offset,
            colors: self.colors(),
            view: WidgetView::build(kind, &self.reader, today, day_offset),
        };
        self.rendered.insert(id, rendered);
        true
    }

    /// Rebuild every instance.
    pub fn refresh_all(&mut self, today: NaiveDate) -> usize {
        let ids: Vec<i32> = self.instances.keys().copied().collect();
        let count = ids
            .into_iter()
            .filter(|id| self.refresh(*id, today))
            .count();
        tracing::info!(count, "refreshed widgets");
        count
    }

    /// Device configuration changed (e.g. dark mode): re-theme everything.
    pub fn on_configuration_changed(&mut self, system_dark: bool, today: NaiveDate) -> usize {
        self.system_dark = system_dark;
        self.refresh_all(today)
    }

    /// Flip the day toggle of `id` and refresh it.
    ///
    /// Missing or unknown ids, and kinds without a toggle, refresh everything instead.
    pub fn toggle_day(&mut self, id: Option<i32>, today: NaiveDate) -> Result<usize> {
        let target = id.filter(|id| {
            self.instances
                .get(id)
                .is_some_and(|kind| kind.has_day_toggle())
        });

        match target {
            Some(id) => {
                self.toggles.toggle(id)?;
                self.refresh(id, today);
                Ok(1)
            }
            None => Ok(self.refresh_all(today)),
        }
    }
}

impl WidgetRefresher for WidgetHost {
    fn refresh_all_widgets(&mut self) -> usize {
        self.refresh_all(Local::now().date_naive())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use crate::widget::views::ToggleArrow;

    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 4).unwrap()
    }

    fn host(entries: Vec<(String, String)>) -> WidgetHost {
        WidgetHost::new(
            Arc::new(MemoryStore::with_entries(entries)),
            Arc::new(MemoryStore::new()),
            KeyLayout::default(),
            false,
        )
    }

    #[test]
    fn test_add_and_remove() {
        let mut host = host(vec![]);
        let a = host.add(WidgetKind::TodayList);
        let b = host.add(WidgetKind::Grid4x4);

        assert_ne!(a, b);
        assert_eq!(host.len(), 2);
        assert!(host.remove(a));
        assert!(!host.remove(a));
        assert_eq!(
            host.instances().collect::<Vec<_>>(),
            vec![(b, WidgetKind::Grid4x4)]
        );
    }

    #[test]
    fn test_refresh_all_renders_every_instance() {
        let mut host = host(vec![]);
        let ids: Vec<i32> = WidgetKind::ALL.iter().map(|k| host.add(*k)).collect();

        assert_eq!(host.refresh_all(monday()), WidgetKind::ALL.len());
        for id in ids {
            assert!(host.rendered(id).is_some());
        }
        assert!(!host.refresh(999, monday()));
    }

    #[test]
    fn test_toggle_day_flips_only_that_instance() {
        let mut host = host(vec![]);
        let first = host.add(WidgetKind::TodayCourse);
        let second = host.add(WidgetKind::TodayCourse);
        host.refresh_all(monday());

        assert_eq!(host.toggle_day(Some(first), monday()).unwrap(), 1);
        assert_eq!(host.day_offset(first), 1);
        assert_eq!(host.day_offset(second), 0);

        let rendered = host.rendered(first).unwrap();
        assert_eq!(rendered.day_offset, 1);
        let WidgetView::TodayCourse(view) = &rendered.view else {
            panic!("expected today course view");
        };
        assert_eq!(view.arrow, ToggleArrow::Back);
        assert_eq!(view.header.date_text, "3.5");
    }

    #[test]
    fn test_toggle_day_without_target_refreshes_all() {
        let mut host = host(vec![]);
        let list = host.add(WidgetKind::TodayList);
        host.add(WidgetKind::TodayCourse);

        assert_eq!(host.toggle_day(None, monday()).unwrap(), 2);
        assert_eq!(host.toggle_day(Some(list), monday()).unwrap(), 2);
        assert_eq!(host.day_offset(list), 0);
    }

    #[test]
    fn test_configuration_change_rethemes() {
        let mut host = host(vec![]);
        let id = host.add(WidgetKind::TodayList);
        host.refresh_all(monday());
        assert!(!host.rendered(id).unwrap().colors.dark);

        host.on_configuration_changed(true, monday());
        assert!(host.rendered(id).unwrap().colors.dark);
    }

    #[test]
    fn test_explicit_theme_overrides_system() {
        let keys = KeyLayout::default();
        let mut host = host(vec![(keys.theme_mode(), "ThemeMode.light".to_string())]);
        let id = host.add(WidgetKind::TodayList);

        host.on_configuration_changed(true, monday());
        assert!(!host.rendered(id).unwrap().colors.dark);
    }
}
