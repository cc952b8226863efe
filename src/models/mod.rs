//! Data model for extracted and structured documentation.
//!
//! Two record types flow through the pipeline:
//! - [`Doclet`] - a raw annotation record, one per documented code entity, as
//!   produced by the extractor
//! - [`TemplateEntry`] - a render-ready record produced by the structurer and
//!   consumed by the renderer and by `get_namepaths`
//!
//! Both carry the tag-derived fields in a flattened [`DocTags`], so their JSON
//! form is a single flat object. [`TemplateEntry`] is fully deserializable with
//! defaults for every missing field, which is what lets callers hand pre-built
//! template data straight to the renderer.

mod doclet;
mod entry;

pub use doclet::Doclet;
pub use entry::{Example, TemplateEntry};

use serde::{Deserialize, Serialize};

use crate::core::Access;

/// Type expression from a `{...}` annotation, split on top-level `|`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeExpr {
    pub names: Vec<String>,
}

impl TypeExpr {
    /// Build from a list of type names.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }
}

/// A `@param` or `@property` entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Param {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_: Option<TypeExpr>,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub optional: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub defaultvalue: Option<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub nullable: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub variable: bool,
}

/// A `@returns` or `@throws` entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Returns {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_: Option<TypeExpr>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Source location of a doclet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Meta {
    /// File name without directory
    pub filename: String,
    /// 1-based line of the code the comment documents
    pub lineno: usize,
    /// Directory containing the file
    pub path: String,
}

/// An unrecognised `@tag value` pair, kept verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CustomTag {
    pub tag: String,
    pub value: String,
}

/// Tag-derived fields shared by [`Doclet`] and [`TemplateEntry`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DocTags {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub classdesc: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub params: Vec<Param>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub properties: Vec<Param>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub returns: Vec<Returns>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub exceptions: Vec<Returns>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_: Option<TypeExpr>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access: Option<Access>,
    /// Deprecation note; empty when the tag had no text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub since: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub see: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub todo: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub author: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub augments: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub mixes: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fires: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub defaultvalue: Option<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub readonly: bool,
    #[serde(rename = "async", skip_serializing_if = "std::ops::Not::not")]
    pub is_async: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub generator: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub is_enum: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub hideconstructor: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub custom_tags: Vec<CustomTag>,
}
