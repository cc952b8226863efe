use anyhow::Result;

use jsdoc2md::Jsdoc2MdOptions;
use jsdoc2md::core::DocError;
use jsdoc2md::models::TemplateEntry;
use jsdoc2md::options::ListFormat;
use jsdoc2md::test_utils::{SourceFixture, TestEnvironment};

fn math_options() -> Jsdoc2MdOptions {
    Jsdoc2MdOptions::with_files(["math.js"])
}

#[tokio::test]
async fn test_default_layout_for_global_functions() -> Result<()> {
    let env = TestEnvironment::with_sources(&[SourceFixture::math()])?;
    let markdown = env.facade().render(&math_options()).await?;

    assert!(markdown.contains("## Functions"), "{markdown}");
    assert!(markdown.contains("<dt><a href=\"#add\">add(a, b)</a> ⇒ <code>number</code></dt>"), "{markdown}");
    assert!(markdown.contains("<a name=\"add\"></a>"), "{markdown}");
    assert!(markdown.contains("## add(a, b) ⇒ <code>number</code>"), "{markdown}");
    assert!(markdown.contains("**Kind**: global function"), "{markdown}");
    assert!(markdown.contains("**Returns**: <code>number</code> - the sum"), "{markdown}");
    assert!(markdown.contains("| a | <code>number</code> | first operand |"), "{markdown}");
    assert!(markdown.contains("```js\nadd(1, 2) // 3\n```"), "{markdown}");
    assert!(markdown.ends_with('\n'));
    Ok(())
}

#[tokio::test]
async fn test_class_members_are_nested_in_module() -> Result<()> {
    let env = TestEnvironment::with_sources(&[SourceFixture::shapes()])?;
    let markdown = env.facade().render(&Jsdoc2MdOptions::with_files(["shapes.js"])).await?;

    assert!(markdown.contains("## shapes"), "{markdown}");
    assert!(markdown.contains("Geometry helpers."), "{markdown}");
    assert!(markdown.contains("new Circle(radius)"), "{markdown}");
    assert!(markdown.contains("circle.area() ⇒ <code>number</code>"), "{markdown}");
    assert!(markdown.contains("#module_shapes.Circle+area"), "{markdown}");
    Ok(())
}

#[tokio::test]
async fn test_sync_and_async_output_is_identical() -> Result<()> {
    let env = TestEnvironment::with_sources(&[SourceFixture::math(), SourceFixture::shapes()])?;
    let jsdoc2md = env.facade();
    let options = Jsdoc2MdOptions {
        no_cache: true,
        ..Jsdoc2MdOptions::with_files(["*.js"])
    };

    let async_out = jsdoc2md.render(&options).await?;
    let sync_out = jsdoc2md.render_sync(&options)?;
    assert_eq!(async_out.as_bytes(), sync_out.as_bytes());
    Ok(())
}

#[tokio::test]
async fn test_extreme_heading_depths_render_nested_members() -> Result<()> {
    let env = TestEnvironment::with_sources(&[SourceFixture::shapes()])?;
    let jsdoc2md = env.facade();

    let deep = Jsdoc2MdOptions {
        heading_depth: Some(usize::MAX),
        ..Jsdoc2MdOptions::with_files(["shapes.js"])
    };
    let markdown = jsdoc2md.render_sync(&deep)?;
    assert!(markdown.contains("###### circle.area()"), "{markdown}");
    assert!(!markdown.contains("#######"), "{markdown}");

    let shallow = Jsdoc2MdOptions {
        heading_depth: Some(0),
        ..Jsdoc2MdOptions::with_files(["shapes.js"])
    };
    let markdown = jsdoc2md.render(&shallow).await?;
    assert!(markdown.contains("\n# shapes"), "{markdown}");
    assert!(markdown.contains("### circle.area()"), "{markdown}");
    Ok(())
}

#[tokio::test]
async fn test_no_gfm_removes_tables_and_fences() -> Result<()> {
    let env = TestEnvironment::with_sources(&[SourceFixture::math()])?;
    let options = Jsdoc2MdOptions {
        no_gfm: true,
        ..math_options()
    };
    let markdown = env.facade().render(&options).await?;

    assert!(!markdown.contains("```"), "{markdown}");
    assert!(!markdown.contains("| --- |"), "{markdown}");
    assert!(markdown.contains("    add(1, 2) // 3"), "{markdown}");
    Ok(())
}

#[tokio::test]
async fn test_format_toggles() -> Result<()> {
    let env = TestEnvironment::with_sources(&[SourceFixture::math()])?;
    let options = Jsdoc2MdOptions {
        heading_depth: Some(3),
        param_list_format: Some(ListFormat::List),
        separators: true,
        example_lang: Some("javascript".to_string()),
        ..math_options()
    };
    let markdown = env.facade().render(&options).await?;

    assert!(markdown.contains("### add(a, b)"), "{markdown}");
    assert!(markdown.contains("**Params**"), "{markdown}");
    assert!(markdown.contains("- a <code>number</code> - first operand"), "{markdown}");
    assert!(markdown.contains("* * *"), "{markdown}");
    assert!(markdown.contains("```javascript"), "{markdown}");
    Ok(())
}

#[tokio::test]
async fn test_user_partial_overrides_builtin() -> Result<()> {
    let env = TestEnvironment::with_sources(&[SourceFixture::math()])?;
    let partial = env.write_file("partials/header.tera", "#### {{ section.id }} ####")?;
    let options = Jsdoc2MdOptions {
        partial: vec![partial],
        ..math_options()
    };
    let markdown = env.facade().render(&options).await?;

    assert!(markdown.contains("#### add ####"), "{markdown}");
    assert!(markdown.contains("#### subtract ####"), "{markdown}");
    assert!(!markdown.contains("## add(a, b)"), "{markdown}");
    Ok(())
}

#[tokio::test]
async fn test_plugin_directory_then_partial_precedence() -> Result<()> {
    let env = TestEnvironment::with_sources(&[SourceFixture::math()])?;
    env.write_file("plugin/partials/header.tera", "PLUGIN HEADER")?;
    env.write_file("plugin/partials/examples.tera", "PLUGIN EXAMPLES")?;
    let partial = env.write_file("mine/examples.tera", "MY EXAMPLES")?;

    let options = Jsdoc2MdOptions {
        plugin: vec![env.project_path("plugin")],
        partial: vec![partial],
        ..math_options()
    };
    let markdown = env.facade().render(&options).await?;

    assert!(markdown.contains("PLUGIN HEADER"), "{markdown}");
    assert!(markdown.contains("MY EXAMPLES"), "{markdown}");
    assert!(!markdown.contains("PLUGIN EXAMPLES"), "{markdown}");
    Ok(())
}

#[tokio::test]
async fn test_custom_template_and_helpers() -> Result<()> {
    let env = TestEnvironment::with_sources(&[SourceFixture::math()])?;
    let helper = env.write_file(
        "helpers.tera",
        "{% macro bullet(entry) %}- {{ entry.longname }} ({{ entry.kind }}){% endmacro bullet %}",
    )?;
    let options = Jsdoc2MdOptions {
        template: Some(
            "{% import \"helpers\" as h %}# API\n\n{% for e in data %}{{ h::bullet(entry=e) }}\n{% endfor %}"
                .to_string(),
        ),
        helper: vec![helper],
        ..math_options()
    };
    let markdown = env.facade().render(&options).await?;
    assert_eq!(markdown, "# API\n\n- add (function)\n- subtract (function)\n");
    Ok(())
}

#[tokio::test]
async fn test_prebuilt_data_renders_without_input_files() -> Result<()> {
    let env = TestEnvironment::new()?;
    let data: Vec<TemplateEntry> = serde_json::from_str(
        r#"[
            {"id": "greet", "kind": "function", "name": "greet", "longname": "greet",
             "description": "Say hello.", "params": [{"name": "who", "type": {"names": ["string"]}}]}
        ]"#,
    )?;
    let mut options = Jsdoc2MdOptions::with_data(data);
    options.files = vec!["does/not/exist/*.js".to_string()];

    let markdown = env.facade().render(&options).await?;
    assert!(markdown.contains("## greet(who)"), "{markdown}");
    assert!(markdown.contains("Say hello."), "{markdown}");
    assert!(env.explain_cache().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_template_errors_are_reported() -> Result<()> {
    let env = TestEnvironment::with_sources(&[SourceFixture::math()])?;
    let options = Jsdoc2MdOptions {
        template: Some("{% for %}".to_string()),
        ..math_options()
    };
    let err = env.facade().render(&options).await.unwrap_err();
    assert!(matches!(err.downcast_ref::<DocError>(), Some(DocError::Template { .. })), "{err:#}");

    let options = Jsdoc2MdOptions {
        partial: vec![env.project_path("missing.tera")],
        ..math_options()
    };
    let err = env.facade().render(&options).await.unwrap_err();
    assert!(matches!(err.downcast_ref::<DocError>(), Some(DocError::TemplateFile { .. })), "{err:#}");
    Ok(())
}

#[tokio::test]
async fn test_render_cache_tracks_template_files() -> Result<()> {
    let env = TestEnvironment::with_sources(&[SourceFixture::math()])?;
    let jsdoc2md = env.facade();
    let partial = env.write_file("header.tera", "v1 {{ section.id }}")?;
    let options = Jsdoc2MdOptions {
        partial: vec![partial.clone()],
        ..math_options()
    };

    assert!(jsdoc2md.render(&options).await?.contains("v1 add"));
    assert!(jsdoc2md.render(&options).await?.contains("v1 add"));
    assert_eq!(env.render_cache().len(), 1);

    std::fs::write(&partial, "v2 {{ section.id }}")?;
    assert!(jsdoc2md.render(&options).await?.contains("v2 add"));
    assert_eq!(env.render_cache().len(), 2);
    Ok(())
}

#[tokio::test]
async fn test_prebuilt_data_with_unrecognised_kind_renders() -> Result<()> {
    let env = TestEnvironment::new()?;
    let data: Vec<TemplateEntry> = serde_json::from_str(
        r#"[
            {"id": "w", "kind": "widget", "name": "w", "longname": "w", "description": "A widget."},
            {"id": "f", "kind": "function", "name": "f", "longname": "f"}
        ]"#,
    )?;
    let markdown = env.facade().render(&Jsdoc2MdOptions::with_data(data)).await?;
    assert!(markdown.contains("A widget."), "{markdown}");
    assert!(markdown.contains("## f()"), "{markdown}");
    Ok(())
}
