//! Localization for text-bearing shell views.
//!
//! A flat key/value table with `{0}`-style placeholder formatting. The
//! `generation` counter is bumped on every language switch; the shell
//! compares it between renders to force text-bearing views to re-render.

use std::collections::HashMap;

use once_cell::sync::Lazy;

/// Built-in English strings. Keys the shell relies on are always present
/// here, so a partial translation never leaves a blank label.
static DEFAULT_TABLE: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("common.close", "Close"),
        ("exts.appNotFound.format", "Cannot find app \"{0}\""),
        ("exts.appNoView", "No view available"),
    ])
});

/// Localization table with a switch generation counter.
#[derive(Debug, Clone)]
pub struct Lang {
    name: String,
    table: HashMap<String, String>,
    generation: u64,
}

impl Lang {
    /// Creates the default English localization.
    pub fn new() -> Self {
        Self {
            name: "en".to_string(),
            table: HashMap::new(),
            generation: 0,
        }
    }

    /// The active language name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Bumped on every `switch` or `update`; compare across renders to
    /// detect a language change.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Looks up a display string. Falls back to the built-in English table
    /// and finally to the key itself, so a missing entry stays visible
    /// instead of vanishing.
    pub fn string(&self, key: &str) -> String {
        if let Some(value) = self.table.get(key) {
            return value.clone();
        }
        DEFAULT_TABLE
            .get(key)
            .map(|value| (*value).to_string())
            .unwrap_or_else(|| key.to_string())
    }

    /// Looks up a display string and substitutes `{0}`, `{1}`, ...
    /// placeholders with the given arguments.
    pub fn format(&self, key: &str, args: &[&str]) -> String {
        let mut text = self.string(key);
        for (index, arg) in args.iter().enumerate() {
            text = text.replace(&format!("{{{index}}}"), arg);
        }
        text
    }

    /// Switches to another language, replacing the whole table.
    pub fn switch(&mut self, name: impl Into<String>, table: HashMap<String, String>) {
        self.name = name.into();
        self.table = table;
        self.generation += 1;
        tracing::debug!(lang = %self.name, "language switched");
    }

    /// Merges entries into the active table (runtime config overlay).
    pub fn update(&mut self, entries: HashMap<String, String>) {
        self.table.extend(entries);
        self.generation += 1;
    }
}

impl Default for Lang {
    fn default() -> Self {
        Self::new()
    }
}
