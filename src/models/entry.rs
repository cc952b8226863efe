use serde::{Deserialize, Serialize};

use super::{DocTags, Meta};
use crate::core::{Kind, Scope};

/// A parsed `@example` block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Example {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    pub code: String,
}

/// Render-ready record for one documentable identifier.
///
/// Every field has a default, so JSON produced elsewhere (or trimmed by hand)
/// deserializes as long as it is an object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TemplateEntry {
    /// Unique identifier, `longname` plus a suffix for duplicates
    pub id: String,
    pub kind: Kind,
    pub name: String,
    pub longname: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memberof: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<Scope>,
    #[serde(flatten)]
    pub tags: DocTags,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub examples: Vec<Example>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub is_exported: bool,
    pub order: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
}

impl TemplateEntry {
    /// Create an entry with the given identity; `id` defaults to the longname.
    pub fn new(kind: Kind, name: impl Into<String>, longname: impl Into<String>) -> Self {
        let longname = longname.into();
        Self {
            id: longname.clone(),
            kind,
            name: name.into(),
            longname,
            ..Self::default()
        }
    }
}
