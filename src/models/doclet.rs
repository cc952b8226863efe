use serde::{Deserialize, Serialize};

use super::{DocTags, Meta};
use crate::core::{Kind, Scope};

/// Raw annotation record for one documented code entity.
///
/// The facade treats doclets as opaque and forwards them unchanged from the
/// extractor to the structurer (or to the caller of `get_raw_data`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Doclet {
    pub kind: Kind,
    pub name: String,
    /// Fully-qualified namepath, e.g. `module:shapes~Circle#area`
    pub longname: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memberof: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<Scope>,
    #[serde(flatten)]
    pub tags: DocTags,
    /// Raw `@example` bodies, caption markup included
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub examples: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
    /// The original comment text
    #[serde(skip_serializing_if = "String::is_empty")]
    pub comment: String,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub undocumented: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub ignore: bool,
    /// Input files, set on the trailing `package` doclet only
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub files: Vec<String>,
    /// Set when the code carried an `export` marker
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub exported: bool,
}

impl Doclet {
    /// Create a doclet with the given identity and empty tags.
    pub fn new(kind: Kind, name: impl Into<String>, longname: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            longname: longname.into(),
            ..Self::default()
        }
    }

    /// The `package` doclet jsdoc appends after all file doclets.
    pub fn package(files: Vec<String>) -> Self {
        Self {
            kind: Kind::Package,
            longname: "package:undefined".to_string(),
            files,
            ..Self::default()
        }
    }
}
