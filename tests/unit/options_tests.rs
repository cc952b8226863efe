use std::path::PathBuf;

use jsdoc2md::Jsdoc2MdOptions;
use jsdoc2md::options::{
    DEFAULT_TEMPLATE, ExtractOptions, IndexFormat, ListFormat, MemberIndexFormat, NameFormat,
    ParseOptions, RenderOptions,
};

#[test]
fn test_render_defaults() {
    let render = RenderOptions::from(&Jsdoc2MdOptions::default());
    assert_eq!(render.template, DEFAULT_TEMPLATE);
    assert_eq!(render.heading_depth, 2);
    assert_eq!(render.example_lang, "js");
    assert_eq!(render.name_format, NameFormat::Plain);
    assert!(render.gfm);
    assert!(!render.separators);
    assert_eq!(render.module_index_format, IndexFormat::Dl);
    assert_eq!(render.global_index_format, IndexFormat::Dl);
    assert_eq!(render.member_index_format, MemberIndexFormat::Grouped);
    assert_eq!(render.param_list_format, ListFormat::Table);
    assert_eq!(render.property_list_format, ListFormat::Table);
    assert!(render.cache);
}

#[test]
fn test_render_fields_are_remapped() {
    let options = Jsdoc2MdOptions {
        template: Some("{{ data | length }}".to_string()),
        heading_depth: Some(4),
        example_lang: Some("ts".to_string()),
        partial: vec![PathBuf::from("partials/")],
        no_gfm: true,
        no_cache: true,
        separators: true,
        global_index_format: Some(IndexFormat::None),
        ..Jsdoc2MdOptions::default()
    };

    let render = RenderOptions::from(&options);
    assert_eq!(render.template, "{{ data | length }}");
    assert_eq!(render.heading_depth, 4);
    assert_eq!(render.example_lang, "ts");
    assert_eq!(render.partial, vec![PathBuf::from("partials/")]);
    assert!(!render.gfm);
    assert!(!render.cache);
    assert!(render.separators);
    assert_eq!(render.global_index_format, IndexFormat::None);
}

#[test]
fn test_malformed_values_are_forwarded() {
    // Template problems surface when rendering, not when normalizing.
    let options = Jsdoc2MdOptions {
        template: Some("{% if %}".to_string()),
        heading_depth: Some(42),
        ..Jsdoc2MdOptions::default()
    };
    let render = RenderOptions::from(&options);
    assert_eq!(render.template, "{% if %}");
    assert_eq!(render.heading_depth, 42);
}

#[test]
fn test_extract_and_parse_options() {
    let options = Jsdoc2MdOptions {
        files: vec!["a.js".to_string(), "b/*.js".to_string()],
        configure: Some(PathBuf::from("jsdoc.json")),
        html: true,
        private: true,
        no_cache: true,
        ..Jsdoc2MdOptions::default()
    };

    let extract = ExtractOptions::from(&options);
    assert_eq!(extract.files, vec!["a.js", "b/*.js"]);
    assert_eq!(extract.configure, Some(PathBuf::from("jsdoc.json")));
    assert!(extract.html);
    assert!(!extract.cache);
    assert!(extract.source.is_none());

    assert!(ParseOptions::from(&options).private);
    assert!(!ParseOptions::from(&Jsdoc2MdOptions::default()).private);
}
