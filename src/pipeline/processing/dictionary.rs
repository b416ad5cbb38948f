use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

use crate::constants::{SUBTYPES_CATEGORY, TYPES_CATEGORY};
use crate::error::{Result, SyncError};

// Non-greedy so `<b>Unit</b>` loses both tags and keeps the text between them
static MARKUP_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<.*?>").expect("static regex"));

/// Removes every `<...>` markup tag from a raw label.
pub fn strip_tags(raw: &str) -> String {
    MARKUP_TAG.replace_all(raw, "").into_owned()
}

/// Maps one language's tag-decorated type labels to display names
#[derive(Debug, Clone, Default)]
pub struct LocalizationDictionary {
    language: String,
    types: HashMap<String, String>,
    subtypes: HashMap<String, String>,
}

impl LocalizationDictionary {
    pub fn new(
        language: impl Into<String>,
        types: HashMap<String, String>,
        subtypes: HashMap<String, String>,
    ) -> Self {
        Self {
            language: language.into(),
            types,
            subtypes,
        }
    }

    pub fn resolve_type(&self, raw: &str) -> Result<String> {
        self.resolve(TYPES_CATEGORY, &self.types, raw)
    }

    /// Like [`resolve_type`](Self::resolve_type), except that an empty label
    /// means "no supertype" and resolves to an empty string without a lookup.
    pub fn resolve_supertype(&self, raw: &str) -> Result<String> {
        if raw.is_empty() {
            return Ok(String::new());
        }
        self.resolve(TYPES_CATEGORY, &self.types, raw)
    }

    pub fn resolve_subtype(&self, raw: &str) -> Result<String> {
        self.resolve(SUBTYPES_CATEGORY, &self.subtypes, raw)
    }

    fn resolve(&self, category: &str, table: &HashMap<String, String>, raw: &str) -> Result<String> {
        let key = strip_tags(raw);
        table
            .get(&key)
            .cloned()
            .ok_or_else(|| SyncError::Dictionary {
                language: self.language.clone(),
                category: category.to_string(),
                key,
            })
    }
}
