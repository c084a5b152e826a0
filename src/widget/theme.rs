// Widget theme.
// Resolves the app's theme mode from the store and maps it to widget text colours.

use crate::store::{KeyLayout, KeyValueStore};

/// Theme preference written by the shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThemeMode {
    #[default]
    System,
    Light,
    Dark,
}

impl ThemeMode {
    /// Parse the stored value; anything unrecognised follows the system.
    pub fn from_value(value: Option<&str>) -> Self {
        match value {
            Some("ThemeMode.dark") => ThemeMode::Dark,
            Some("ThemeMode.light") => ThemeMode::Light,
            _ => ThemeMode::System,
        }
    }

    pub fn load(store: &dyn KeyValueStore, keys: &KeyLayout) -> Self {
        Self::from_value(store.get_string(&keys.theme_mode()).as_deref())
    }

    pub fn is_dark(self, system_dark: bool) -> bool {
        match self {
            ThemeMode::Dark => true,
            ThemeMode::Light => false,
            ThemeMode::System => system_dark,
        }
    }
}

pub fn primary_text_color(dark: bool) -> u32 {
    if dark { 0xFFFF_FFFF } else { 0xFF11_1111 }
}

pub fn secondary_text_color(dark: bool) -> u32 {
    if dark { 0xFFB0_B0B0 } else { 0xFF66_6666 }
}

pub fn accent_color() -> u32 {
    0xFF3F_51B5
}

/// Resolved colours for one render pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WidgetColors {
    pub dark: bool,
    pub primary: u32,
    pub secondary: u32,
    pub accent: u32,
}

impl WidgetColors {
    pub fn new(dark: bool) -> Self {
        Self {
            dark,
            primary: primary_text_color(dark),
            secondary: secondary_text_color(dark),
            accent: accent_color(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[test]
    fn test_theme_mode_from_value() {
        assert_eq!(ThemeMode::from_value(Some("ThemeMode.dark")), ThemeMode::Dark);
        assert_eq!(ThemeMode::from_value(Some("ThemeMode.light")), ThemeMode::Light);
        assert_eq!(ThemeMode::from_value(Some("ThemeMode.system")), ThemeMode::System);
        assert_eq!(ThemeMode::from_value(None), ThemeMode::System);
    }

    #[test]
    fn test_theme_mode_load_from_store() {
        let keys = KeyLayout::default();
        let store = MemoryStore::with_entries([(keys.theme_mode(), "ThemeMode.dark")]);
        assert_eq!(ThemeMode::load(&store, &keys), ThemeMode::Dark);
    }

    #[test]
    fn test_is_dark_follows_system_only_in_system_mode() {
        assert!(ThemeMode::Dark.is_dark(false));
        assert!(!ThemeMode::Light.is_dark(true));
        assert!(ThemeMode::System.is_dark(true));
        assert!(!ThemeMode::System.is_dark(false));
    }

    #[test]
    fn test_colors() {
        let dark = WidgetColors::new(true);
        assert_eq!(dark.primary, 0xFFFFFFFF);
        assert_eq!(dark.secondary, 0xFFB0B0B0);

        let light = WidgetColors::new(false);
        assert_eq!(light.primary, 0xFF111111);
        assert_eq!(light.secondary, 0xFF666666);
        assert_eq!(light.accent, 0xFF3F51B5);
    }
}
