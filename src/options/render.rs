use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;

use super::{Jsdoc2MdOptions, parse_choice};
use crate::core::DocError;

/// Root template used when the caller does not supply one.
pub const DEFAULT_TEMPLATE: &str = "{% include \"main\" %}";

/// Layout of the module and global indexes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexFormat {
    None,
    Grouped,
    Table,
    Dl,
}

/// Layout of the member index at the top of each container section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberIndexFormat {
    Grouped,
    List,
}

/// Layout of parameter and property lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListFormat {
    Table,
    List,
}

/// How identifier names are written in headings and indexes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NameFormat {
    #[default]
    Plain,
    #[serde(alias = "code")]
    Backticks,
}

impl FromStr for IndexFormat {
    type Err = DocError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_choice(
            s,
            &[
                ("none", IndexFormat::None),
                ("grouped", IndexFormat::Grouped),
                ("table", IndexFormat::Table),
                ("dl", IndexFormat::Dl),
            ],
            "index format",
        )
    }
}

impl FromStr for MemberIndexFormat {
    type Err = DocError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_choice(
            s,
            &[("grouped", MemberIndexFormat::Grouped), ("list", MemberIndexFormat::List)],
            "member index format",
        )
    }
}

impl FromStr for ListFormat {
    type Err = DocError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_choice(s, &[("table", ListFormat::Table), ("list", ListFormat::List)], "list format")
    }
}

impl FromStr for NameFormat {
    type Err = DocError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_choice(
            s,
            &[
                ("plain", NameFormat::Plain),
                ("backticks", NameFormat::Backticks),
                ("code", NameFormat::Backticks),
            ],
            "name format",
        )
    }
}

/// Renderer options with every default applied.
///
/// Serialized into the template context as `options`, so custom templates can
/// branch on any of these fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderOptions {
    pub template: String,
    pub heading_depth: usize,
    pub example_lang: String,
    pub plugin: Vec<PathBuf>,
    pub helper: Vec<PathBuf>,
    pub partial: Vec<PathBuf>,
    pub name_format: NameFormat,
    pub gfm: bool,
    pub separators: bool,
    pub module_index_format: IndexFormat,
    pub global_index_format: IndexFormat,
    pub member_index_format: MemberIndexFormat,
    pub param_list_format: ListFormat,
    pub property_list_format: ListFormat,
    pub cache: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self::from(&Jsdoc2MdOptions::default())
    }
}

impl From<&Jsdoc2MdOptions> for RenderOptions {
    fn from(options: &Jsdoc2MdOptions) -> Self {
        Self {
            template: options.template.clone().unwrap_or_else(|| DEFAULT_TEMPLATE.to_string()),
            heading_depth: options.heading_depth.unwrap_or(2),
            example_lang: options.example_lang.clone().unwrap_or_else(|| "js".to_string()),
            plugin: options.plugin.clone(),
            helper: options.helper.clone(),
            partial: options.partial.clone(),
            name_format: options.name_format.unwrap_or_default(),
            gfm: !options.no_gfm,
            separators: options.separators,
            module_index_format: options.module_index_format.unwrap_or(IndexFormat::Dl),
            global_index_format: options.global_index_format.unwrap_or(IndexFormat::Dl),
            member_index_format: options.member_index_format.unwrap_or(MemberIndexFormat::Grouped),
            param_list_format: options.param_list_format.unwrap_or(ListFormat::Table),
            property_list_format: options.property_list_format.unwrap_or(ListFormat::Table),
            cache: !options.no_cache,
        }
    }
}
