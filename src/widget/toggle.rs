// Per-instance day-offset toggles.
// Each widget instance shows today (0) or tomorrow (1); the choice persists in widget prefs.

use std::sync::Arc;

use crate::error::Result;
use crate::store::{KeyValueStore, keys};

/// Persisted day offsets keyed by widget instance id.
#[derive(Clone)]
pub struct DayOffsetToggles {
    store: Arc<dyn KeyValueStore>,
}

impl DayOffsetToggles {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Current offset for an instance, clamped to 0..=1. Unset reads as 0.
    pub fn get(&self, widget_id: i32) -> i32 {
        self.store
            .get_string(&keys::day_offset(widget_id))
            .and_then(|v| v.trim().parse::<i32>().ok())
            .unwrap_or(0)
            .clamp(0, 1)
    }

    /// Flip an instance between today and tomorrow. Returns the new offset.
    pub fn toggle(&self, widget_id: i32) -> Result<i32> {
        let next = if self.get(widget_id) == 0 { 1 } else { 0 };
        self.store
            .set_string(&keys::day_offset(widget_id), &next.to_string())?;
        tracing::debug!(widget_id, day_offset = next, "toggled day offset");
        Ok(next)
    }
}
