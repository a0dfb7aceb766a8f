use crate::core::ConfigError;
use rustc_hash::FxHashMap;

/// A single selectable menu line.
///
/// When both `next_page` and `action` are set, selecting the entry navigates; the action is
/// only invoked for entries without a page transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub label: String,
    pub action: Option<String>,
    pub next_page: Option<String>,
    /// Character that selects and activates this entry directly.
    pub accelerator: Option<char>,
    pub enabled: bool,
}

impl Entry {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            action: None,
            next_page: None,
            accelerator: None,
            enabled: true,
        }
    }

    pub fn action(mut self, id: impl Into<String>) -> Self {
        self.action = Some(id.into());
        self
    }

    pub fn next_page(mut self, page: impl Into<String>) -> Self {
        self.next_page = Some(page.into());
        self
    }

    pub fn accelerator(mut self, key: char) -> Self {
        self.accelerator = Some(key);
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    pub fn is_noop(&self) -> bool {
        self.action.is_none() && self.next_page.is_none()
    }

    pub fn matches_accelerator(&self, key: char) -> bool {
        self.accelerator
            .is_some_and(|acc| acc.eq_ignore_ascii_case(&key))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub id: String,
    pub title: String,
    pub entries: Vec<Entry>,
}

impl Page {
    /// Creates an empty page; a blank title falls back to the page id.
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        let id = id.into();
        let mut title = title.into();
        if title.trim().is_empty() {
            title = id.clone();
        }
        Self {
            id,
            title,
            entries: Vec::new(),
        }
    }

    pub fn with_entry(mut self, entry: Entry) -> Self {
        self.entries.push(entry);
        self
    }

    pub fn push(&mut self, entry: Entry) -> &mut Self {
        self.entries.push(entry);
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entry(&self, index: usize) -> Option<&Entry> {
        self.entries.get(index)
    }

    /// Index of the first enabled entry bound to `key`.
    pub fn find_accelerator(&self, key: char) -> Option<usize> {
        self.entries
            .iter()
            .position(|entry| entry.enabled && entry.matches_accelerator(key))
    }
}

/// The immutable page graph handed to the navigation engine.
#[derive(Debug, Clone, Default)]
pub struct Menu {
    pages: FxHashMap<String, Page>,
    start_page: Option<String>,
}

impl Menu {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_page(&mut self, page: Page) -> Result<&mut Page, ConfigError> {
        if self.pages.contains_key(&page.id) {
            return Err(ConfigError::DuplicatePage(page.id));
        }
        let id = page.id.clone();
        Ok(self.pages.entry(id).or_insert(page))
    }

    pub fn with_page(mut self, page: Page) -> Result<Self, ConfigError> {
        self.add_page(page)?;
        Ok(self)
    }

    pub fn set_start_page(&mut self, id: impl Into<String>) -> Result<(), ConfigError> {
        let id = id.into();
        if !self.pages.contains_key(&id) {
            return Err(ConfigError::UnknownStartPage(id));
        }
        self.start_page = Some(id);
        Ok(())
    }

    pub fn start_page(&self) -> Option<&str> {
        self.start_page.as_deref()
    }

    pub fn page(&self, id: &str) -> Option<&Page> {
        self.pages.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.pages.contains_key(id)
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn page_ids(&self) -> impl Iterator<Item = &str> {
        self.pages.keys().map(String::as_str)
    }
}
