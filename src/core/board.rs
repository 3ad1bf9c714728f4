//! Board data model
//!
//! A [`Board`] is an ordered list of named [`Column`]s, each holding an ordered
//! list of [`Item`]s, plus the [`Settings`] captured from the document's
//! metadata block. Order is significant everywhere and is never changed
//! implicitly.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Settings key that marks a document as a kanban board
pub const PLUGIN_KEY: &str = "kanban-plugin";

/// Rendering mode recorded under the `kanban-plugin` key
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PluginMode {
    #[default]
    Basic,
    Advanced,
}

impl PluginMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Advanced => "advanced",
        }
    }
}

impl fmt::Display for PluginMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PluginMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "basic" => Ok(Self::Basic),
            "advanced" => Ok(Self::Advanced),
            other => Err(format!("unknown kanban-plugin mode '{}'", other)),
        }
    }
}

/// Board-level settings
///
/// Only `kanban-plugin` carries meaning; every other key is kept verbatim in
/// `extra` and written back out on serialize.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(rename = "kanban-plugin", default)]
    pub plugin: PluginMode,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl Settings {
    /// Settings with the given mode and no extra keys
    pub fn with_mode(plugin: PluginMode) -> Self {
        Self {
            plugin,
            extra: BTreeMap::new(),
        }
    }

    /// Look up a settings value by key, including `kanban-plugin`
    pub fn get(&self, key: &str) -> Option<serde_json::Value> {
        if key == PLUGIN_KEY {
            Some(serde_json::Value::String(self.plugin.as_str().to_string()))
        } else {
            self.extra.get(key).cloned()
        }
    }
}

/// A single checkbox entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub text: String,
    #[serde(default)]
    pub completed: bool,
    /// In-memory annotations; the line format has nowhere to persist them
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<BTreeMap<String, serde_json::Value>>,
}

impl Item {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            completed: false,
            metadata: None,
        }
    }

    pub fn completed(text: impl Into<String>) -> Self {
        Self {
            completed: true,
            ..Self::new(text)
        }
    }
}

/// A named, ordered group of items
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    #[serde(default)]
    pub items: Vec<Item>,
}

impl Column {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            items: Vec::new(),
        }
    }

    /// Index of the first item whose text equals `text` exactly
    pub fn position_of(&self, text: &str) -> Option<usize> {
        self.items.iter().position(|item| item.text == text)
    }

    pub fn contains_text(&self, text: &str) -> bool {
        self.position_of(text).is_some()
    }

    pub fn item_texts(&self) -> Vec<String> {
        self.items.iter().map(|item| item.text.clone()).collect()
    }
}

/// One kanban board document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Board {
    /// Set by the store on read; not derived from content
    #[serde(default)]
    pub path: PathBuf,
    #[serde(default)]
    pub settings: Settings,
    #[serde(default)]
    pub columns: Vec<Column>,
}

impl Board {
    /// Create an empty board in basic mode
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            settings: Settings::default(),
            columns: Vec::new(),
        }
    }

    /// Create a board with empty columns in the given order
    pub fn with_columns<I, S>(path: impl Into<PathBuf>, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut board = Self::new(path);
        board.columns = names.into_iter().map(Column::new).collect();
        board
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Index of the first column named `name`
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column.name == name)
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|column| column.name == name)
    }

    pub fn column_mut(&mut self, name: &str) -> Option<&mut Column> {
        self.columns.iter_mut().find(|column| column.name == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|column| column.name.clone()).collect()
    }

    /// Total number of items across all columns
    pub fn item_count(&self) -> usize {
        self.columns.iter().map(|column| column.items.len()).sum()
    }
}
