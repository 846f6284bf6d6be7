use gramps_types::Category;
use serde::{Deserialize, Serialize};

/// Configuration for struct and database comparison.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiffConfig {
    /// Mapping keys skipped entirely when comparing structs.
    pub ignored_keys: Vec<String>,
    /// Mapping key whose values are compared with the date rules.
    pub date_key: String,
    /// Categories compared by a database diff, in comparison order.
    pub categories: Vec<Category>,
}

impl Default for DiffConfig {
    fn default() -> Self {
        Self {
            ignored_keys: vec!["change".to_string()],
            date_key: "date".to_string(),
            categories: Category::ALL.to_vec(),
        }
    }
}

impl DiffConfig {
    pub fn is_ignored(&self, key: &str) -> bool {
        self.ignored_keys.iter().any(|k| k == key)
    }

    pub fn is_date_key(&self, key: &str) -> bool {
        self.date_key == key
    }
}
