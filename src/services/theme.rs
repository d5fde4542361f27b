use std::sync::RwLock;

use crate::db::LocalStorage;
use crate::errors::AppError;
use crate::models::Theme;

pub const THEME_STORAGE_KEY: &str = "schedule_ai_theme";

pub struct ThemeStore {
    storage: LocalStorage,
    theme: RwLock<Theme>,
}

impl ThemeStore {
    /// Loads the saved preference, falling back to `default` for a missing or
    /// unknown value. The resolved theme is written back immediately.
    pub fn init(storage: LocalStorage, default: Theme) -> Result<Self, AppError> {
        let theme = storage
            .get_item(THEME_STORAGE_KEY)?
            .and_then(|raw| Theme::parse(&raw))
            .unwrap_or(default);
        storage.set_item(THEME_STORAGE_KEY, theme.as_str())?;

        Ok(Self {
            storage,
            theme: RwLock::new(theme),
        })
    }

    pub fn current(&self) -> Theme {
        *self.theme.read().unwrap()
    }

    pub fn toggle(&self) -> Result<Theme, AppError> {
        let mut theme = self.theme.write().unwrap();
        let next = theme.toggled();
        self.storage.set_item(THEME_STORAGE_KEY, next.as_str())?;
        *theme = next;
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;

    fn storage() -> LocalStorage {
        LocalStorage::new(db::init_db(":memory:").unwrap())
    }

    #[test]
    fn test_defaults_and_persists() {
        let storage = storage();
        let store = ThemeStore::init(storage.clone(), Theme::Dark).unwrap();
        assert_eq!(store.current(), Theme::Dark);
        assert_eq!(storage.get_item(THEME_STORAGE_KEY).unwrap().as_deref(), Some("dark"));
    }

    #[test]
    fn test_unknown_value_falls_back() {
        let storage = storage();
        storage.set_item(THEME_STORAGE_KEY, "sepia").unwrap();
        let store = ThemeStore::init(storage, Theme::Light).unwrap();
        assert_eq!(store.current(), Theme::Light);
    }

    #[test]
    fn test_toggle_survives_reload() {
        let storage = storage();
        let store = ThemeStore::init(storage.clone(), Theme::Dark).unwrap();
        assert_eq!(store.toggle().unwrap(), Theme::Light);

        let reloaded = ThemeStore::init(storage, Theme::Dark).unwrap();
        assert_eq!(reloaded.current(), Theme::Light);
    }
}
