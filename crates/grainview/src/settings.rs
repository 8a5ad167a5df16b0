//! User preferences and theme state.
//!
//! Both live in the local store. The theme flag uses its own `darkMode` key
//! holding a JSON boolean; everything else is one JSON document under
//! `settings`.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{Error, Result};
use crate::storage::Storage;

/// Local store key of the theme flag.
pub const DARK_MODE_KEY: &str = "darkMode";

/// Local store key of the settings document.
pub const SETTINGS_KEY: &str = "settings";

/// Application-wide theme state.
///
/// There is one writer: [`ThemeState::toggle`], which persists every change.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ThemeState {
    /// Whether the dark theme is active.
    pub dark_mode: bool,
}

impl ThemeState {
    /// Read the theme flag; absent means light.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn load(store: &Storage) -> Result<Self> {
        let dark_mode = store.get_json::<bool>(DARK_MODE_KEY)?.unwrap_or(false);
        Ok(Self { dark_mode })
    }

    /// Flip the theme and persist it.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    pub fn toggle(&mut self, store: &Storage) -> Result<()> {
        self.dark_mode = !self.dark_mode;
        store.set_json(DARK_MODE_KEY, &self.dark_mode)?;
        info!("Dark mode {}", if self.dark_mode { "on" } else { "off" });
        Ok(())
    }

    /// Name of the active theme.
    #[must_use]
    pub fn name(&self) -> &'static str {
        if self.dark_mode {
            "dark"
        } else {
            "light"
        }
    }
}

/// Notification channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Notifications {
    /// Email notifications.
    pub email: bool,
    /// Push notifications.
    pub push: bool,
    /// SMS notifications.
    pub sms: bool,
}

impl Default for Notifications {
    fn default() -> Self {
        Self {
            email: true,
            push: false,
            sms: false,
        }
    }
}

/// How long collected data is kept.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataRetention {
    /// Three months.
    #[serde(rename = "3months")]
    ThreeMonths,
    /// Six months.
    #[serde(rename = "6months")]
    SixMonths,
    /// One year.
    #[default]
    #[serde(rename = "1year")]
    OneYear,
    /// Two years.
    #[serde(rename = "2years")]
    TwoYears,
    /// Never expire.
    #[serde(rename = "forever")]
    Forever,
}

impl DataRetention {
    /// All retention options.
    pub const ALL: [Self; 5] = [
        Self::ThreeMonths,
        Self::SixMonths,
        Self::OneYear,
        Self::TwoYears,
        Self::Forever,
    ];

    /// Stored name of this option.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ThreeMonths => "3months",
            Self::SixMonths => "6months",
            Self::OneYear => "1year",
            Self::TwoYears => "2years",
            Self::Forever => "forever",
        }
    }
}

impl FromStr for DataRetention {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| {
                Error::invalid_setting("data_retention", format!("unknown retention '{s}'"))
            })
    }
}

impl std::fmt::Display for DataRetention {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Interface language.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// English.
    #[default]
    En,
    /// Hindi.
    Hi,
    /// Tamil.
    Ta,
    /// Telugu.
    Te,
}

impl Language {
    /// All supported languages.
    pub const ALL: [Self; 4] = [Self::En, Self::Hi, Self::Ta, Self::Te];

    /// Language code.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Hi => "hi",
            Self::Ta => "ta",
            Self::Te => "te",
        }
    }

    /// Display name.
    #[must_use]
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::En => "English",
            Self::Hi => "हिन्दी (Hindi)",
            Self::Ta => "தமிழ் (Tamil)",
            Self::Te => "తెలుగు (Telugu)",
        }
    }
}

impl FromStr for Language {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|l| l.code() == s)
            .ok_or_else(|| Error::invalid_setting("language", format!("unknown language '{s}'")))
    }
}

/// User preferences from the settings screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Notification channels.
    pub notifications: Notifications,
    /// Data retention period.
    pub data_retention: DataRetention,
    /// Synchronise data automatically.
    pub auto_sync: bool,
    /// Interface language.
    pub language: Language,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            notifications: Notifications::default(),
            data_retention: DataRetention::OneYear,
            auto_sync: true,
            language: Language::En,
        }
    }
}

impl Settings {
    /// Keys accepted by [`Settings::set`].
    pub const KEYS: [&'static str; 6] = [
        "notifications.email",
        "notifications.push",
        "notifications.sms",
        "data_retention",
        "auto_sync",
        "language",
    ];

    /// Load settings, falling back to defaults when none are stored.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn load(store: &Storage) -> Result<Self> {
        Ok(store.get_json(SETTINGS_KEY)?.unwrap_or_default())
    }

    /// Persist these settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    pub fn save(&self, store: &Storage) -> Result<()> {
        store.set_json(SETTINGS_KEY, self)?;
        info!("Settings saved");
        Ok(())
    }

    /// Remove stored settings so defaults apply again.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    pub fn reset(store: &Storage) -> Result<Self> {
        store.remove(SETTINGS_KEY)?;
        Ok(Self::default())
    }

    /// Update one setting by key.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSetting`] for an unknown key or a value that
    /// does not parse for that key.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "notifications.email" => self.notifications.email = parse_bool(key, value)?,
            "notifications.push" => self.notifications.push = parse_bool(key, value)?,
            "notifications.sms" => self.notifications.sms = parse_bool(key, value)?,
            "data_retention" => self.data_retention = value.parse()?,
            "auto_sync" => self.auto_sync = parse_bool(key, value)?,
            "language" => self.language = value.parse()?,
            _ => {
                return Err(Error::invalid_setting(
                    key,
                    format!("unknown key; expected one of {}", Self::KEYS.join(", ")),
                ))
            }
        }
        Ok(())
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "on" | "yes" | "1" => Ok(true),
        "false" | "off" | "no" | "0" => Ok(false),
        _ => Err(Error::invalid_setting(
            key,
            format!("expected a boolean, got '{value}'"),
        )),
    }
}
