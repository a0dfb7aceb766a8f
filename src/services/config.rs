//! Menu configuration: the JSON menu file and the runtime settings it carries.
//!
//! The loader checks structure (pages present, start page defined, labels non-blank, settings
//! in range) but deliberately leaves `next_page` targets and action identifiers alone; those
//! are resolved when the user selects the entry.

use crate::core::ConfigError;
use crate::input::acquisition::{AcquisitionConfig, DEFAULT_MAX_CONSECUTIVE_ERRORS};
use crate::input::DEFAULT_QUEUE_CAPACITY;
use crate::kernel::NavigationOptions;
use crate::models::{Entry, Menu, Page};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

const APP_DIR: &str = "termenu";
const LOG_DIR: &str = "logs";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeSettings {
    pub border: String,
    pub title: String,
    pub selected_bg: String,
    pub selected_fg: String,
}

impl Default for ThemeSettings {
    fn default() -> Self {
        Self {
            border: "lightcyan".to_string(),
            title: "white".to_string(),
            selected_bg: "lightcyan".to_string(),
            selected_fg: "black".to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MenuSettings {
    pub wrap_selection: bool,
    /// How long a lone ESC waits for the rest of a sequence.
    pub escape_timeout_ms: u64,
    pub poll_interval_ms: u64,
    pub queue_capacity: usize,
    pub min_width: u16,
    pub min_height: u16,
    pub theme: ThemeSettings,
}

impl Default for MenuSettings {
    fn default() -> Self {
        Self {
            wrap_selection: false,
            escape_timeout_ms: 5,
            poll_interval_ms: 1,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            min_width: 40,
            min_height: 10,
            theme: ThemeSettings::default(),
        }
    }
}

impl MenuSettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=100).contains(&self.escape_timeout_ms) {
            return Err(ConfigError::InvalidSetting {
                key: "escape_timeout_ms",
                reason: format!("{} is outside 1..=100", self.escape_timeout_ms),
            });
        }
        if !(1..=50).contains(&self.poll_interval_ms) {
            return Err(ConfigError::InvalidSetting {
                key: "poll_interval_ms",
                reason: format!("{} is outside 1..=50", self.poll_interval_ms),
            });
        }
        if self.queue_capacity == 0 {
            return Err(ConfigError::InvalidSetting {
                key: "queue_capacity",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    pub fn acquisition(&self) -> AcquisitionConfig {
        AcquisitionConfig {
            poll_interval: Duration::from_millis(self.poll_interval_ms),
            escape_timeout: Duration::from_millis(self.escape_timeout_ms),
            max_consecutive_errors: DEFAULT_MAX_CONSECUTIVE_ERRORS,
        }
    }

    pub fn navigation(&self) -> NavigationOptions {
        NavigationOptions {
            wrap_selection: self.wrap_selection,
        }
    }
}

#[derive(Debug, Deserialize)]
struct MenuFile {
    #[serde(default)]
    start_page: Option<String>,
    #[serde(default)]
    settings: MenuSettings,
    #[serde(default)]
    pages: BTreeMap<String, PageSpec>,
}

#[derive(Debug, Deserialize)]
struct PageSpec {
    #[serde(default)]
    title: String,
    #[serde(default)]
    entries: Vec<EntrySpec>,
}

#[derive(Debug, Deserialize)]
struct EntrySpec {
    #[serde(default)]
    label: String,
    #[serde(default)]
    action: Option<String>,
    #[serde(default)]
    next_page: Option<String>,
    #[serde(default)]
    key: Option<char>,
    #[serde(default = "default_enabled")]
    enabled: bool,
}

fn default_enabled() -> bool {
    true
}

/// A loaded menu file.
#[derive(Debug)]
pub struct MenuConfig {
    pub menu: Menu,
    pub settings: MenuSettings,
}

pub fn load_menu(path: &Path) -> Result<MenuConfig, ConfigError> {
    let text = std::fs::read_to_string(path)?;
    let config = parse_menu(&text)?;
    tracing::info!(
        path = %path.display(),
        pages = config.menu.page_count(),
        "menu config loaded"
    );
    Ok(config)
}

pub fn parse_menu(text: &str) -> Result<MenuConfig, ConfigError> {
    let file: MenuFile = serde_json::from_str(text)?;
    file.settings.validate()?;
    if file.pages.is_empty() {
        return Err(ConfigError::NoPages);
    }

    let mut menu = Menu::new();
    for (id, spec) in file.pages {
        let mut page = Page::new(id.clone(), spec.title);
        for raw in spec.entries {
            let label = raw.label.trim();
            if label.is_empty() {
                return Err(ConfigError::BlankLabel { page: id });
            }
            page.push(Entry {
                label: label.to_string(),
                action: raw.action.filter(|a| !a.is_empty()),
                next_page: raw.next_page.filter(|p| !p.is_empty()),
                accelerator: raw.key,
                enabled: raw.enabled,
            });
        }
        menu.add_page(page)?;
    }

    let start = file
        .start_page
        .filter(|s| !s.is_empty())
        .ok_or(ConfigError::MissingStartPage)?;
    menu.set_start_page(start)?;

    Ok(MenuConfig {
        menu,
        settings: file.settings,
    })
}

/// `$XDG_CACHE_HOME`, `~/Library/Caches` or `%LOCALAPPDATA%`, depending on the platform.
pub fn cache_dir() -> Option<PathBuf> {
    #[cfg(target_os = "macos")]
    {
        return std::env::var("HOME")
            .ok()
            .map(|home| PathBuf::from(home).join("Library/Caches"));
    }

    #[cfg(target_os = "windows")]
    {
        return std::env::var("LOCALAPPDATA").ok().map(PathBuf::from);
    }

    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    {
        if let Ok(xdg) = std::env::var("XDG_CACHE_HOME") {
            if !xdg.is_empty() {
                return Some(PathBuf::from(xdg));
            }
        }
        std::env::var("HOME")
            .ok()
            .map(|home| PathBuf::from(home).join(".cache"))
    }
}

pub fn ensure_log_dir() -> std::io::Result<PathBuf> {
    let dir = cache_dir()
        .ok_or_else(|| {
            std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "Cannot determine cache directory",
            )
        })?
        .join(APP_DIR)
        .join(LOG_DIR);
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

#[cfg(test)]
#[path = "../../tests/unit/services/config.rs"]
mod tests;
