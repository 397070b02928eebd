//! User preferences kept next to the history in the key-value store.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::store::{KeyValueStore, StoreError};

/// Key holding the theme preference.
pub const THEME_KEY: &str = "theme";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dark => "dark",
            Self::Light => "light",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dark" => Some(Self::Dark),
            "light" => Some(Self::Light),
            _ => None,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reads and writes the [`Theme`] under [`THEME_KEY`].
#[derive(Clone, Copy)]
pub struct ThemePreference<'a> {
    store: &'a dyn KeyValueStore,
}

impl<'a> ThemePreference<'a> {
    pub fn new(store: &'a dyn KeyValueStore) -> Self {
        Self { store }
    }

    /// The saved theme, or [`Theme::Dark`] when nothing usable is stored.
    pub async fn load(&self) -> Result<Theme, StoreError> {
        let saved = self.store.get(THEME_KEY).await?;
        let theme = saved.as_deref().and_then(Theme::parse).unwrap_or_default();
        debug!(?saved, %theme, "theme preference loaded");
        Ok(theme)
    }

    pub async fn save(
        &self,
        theme: Theme,
    ) -> Result<(), StoreError> {
        self.store.set(THEME_KEY, theme.as_str()).await
    }

    /// Flips the saved theme and returns the new one.
    pub async fn toggle(&self) -> Result<Theme, StoreError> {
        let theme = self.load().await?.toggled();
        self.save(theme).await?;
        Ok(theme)
    }
}
