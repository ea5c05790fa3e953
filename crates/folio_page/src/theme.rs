//! Light/dark theme preference
//!
//! Read once at startup, written on every toggle. A failing store never
//! blocks the toggle: the class still flips and the failure is logged.

use folio_core::{DisplayTree, ElementId, KeyValueStore};
use tracing::{debug, warn};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ThemePreference {
    #[default]
    Light,
    Dark,
}

impl ThemePreference {
    pub fn as_str(&self) -> &'static str {
        match self {
            ThemePreference::Light => "light",
            ThemePreference::Dark => "dark",
        }
    }

    /// Parse a stored value; anything unrecognised is `None`
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "light" => Some(ThemePreference::Light),
            "dark" => Some(ThemePreference::Dark),
            _ => None,
        }
    }

    pub fn flipped(&self) -> Self {
        match self {
            ThemePreference::Light => ThemePreference::Dark,
            ThemePreference::Dark => ThemePreference::Light,
        }
    }

    /// Stored preference, `Light` when absent or unreadable
    pub fn load(store: &dyn KeyValueStore, key: &str) -> Self {
        match store.get(key) {
            Some(value) => Self::parse(&value).unwrap_or_else(|| {
                debug!("theme: unknown stored value {:?}, using light", value);
                ThemePreference::Light
            }),
            None => ThemePreference::Light,
        }
    }
}

/// Applies and persists the theme
#[derive(Clone, Debug)]
pub struct ThemeToggle {
    root: ElementId,
    key: String,
    dark_class: String,
    current: ThemePreference,
}

impl ThemeToggle {
    pub fn new(root: ElementId, key: impl Into<String>, dark_class: impl Into<String>) -> Self {
        Self {
            root,
            key: key.into(),
            dark_class: dark_class.into(),
            current: ThemePreference::Light,
        }
    }

    pub fn current(&self) -> ThemePreference {
        self.current
    }

    /// Load the stored preference and apply it
    pub fn init(&mut self, tree: &mut DisplayTree, store: &dyn KeyValueStore) -> ThemePreference {
        self.current = ThemePreference::load(store, &self.key);
        self.apply(tree);
        self.current
    }

    /// Flip, apply and persist
    pub fn toggle(&mut self, tree: &mut DisplayTree, store: &mut dyn KeyValueStore) -> ThemePreference {
        self.current = self.current.flipped();
        self.apply(tree);
        if let Err(e) = store.set(&self.key, self.current.as_str()) {
            warn!("theme: failed to persist preference: {}", e);
        }
        self.current
    }

    fn apply(&self, tree: &mut DisplayTree) {
        match self.current {
            ThemePreference::Dark => tree.add_class(self.root, &self.dark_class),
            ThemePreference::Light => tree.remove_class(self.root, &self.dark_class),
        }
    }
}
