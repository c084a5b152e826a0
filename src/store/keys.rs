// Key layout for the shared store.
// Builds namespaced keys for the account, last-viewed pointers, schedule documents, and theme.

/// Namespace the shell applies to every key it writes.
pub const DEFAULT_PREFIX: &str = "flutter.";

/// Builds store keys under a fixed namespace prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyLayout {
    prefix: String,
}

impl Default for KeyLayout {
    fn default() -> Self {
        Self::new(DEFAULT_PREFIX)
    }
}

impl KeyLayout {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// Apply the namespace to a logical key.
    pub fn key(&self, logical: &str) -> String {
        format!("{}{}", self.prefix, logical)
    }

    /// Key holding the current user id.
    pub fn account(&self) -> String {
        self.key("account")
    }

    /// Key holding a user's last-viewed term id.
    pub fn last_term(&self, user: &str) -> String {
        self.key(&format!("schedule_last_term_{}", user))
    }

    /// Key holding a user's last-viewed week id.
    pub fn last_week(&self, user: &str) -> String {
        self.key(&format!("schedule_last_week_{}", user))
    }

    /// Key of the cached document for (user, term, week).
    pub fn schedule(&self, user: &str, term: &str, week: &str) -> String {
        self.key(&format!("schedule_{}_{}_{}", user, term, week))
    }

    /// Key holding the app theme mode.
    pub fn theme_mode(&self) -> String {
        self.key("theme_mode")
    }
}

/// Key of a widget instance's day-offset toggle (widget prefs are not namespaced).
pub fn day_offset(widget_id: i32) -> String {
    format!("dayOffset_{}", widget_id)
}
