use anyhow::Result;

use jsdoc2md::Jsdoc2MdOptions;
use jsdoc2md::core::{DocError, Kind};
use jsdoc2md::test_utils::{SourceFixture, TestEnvironment};

#[tokio::test]
async fn test_source_snippet_template_data_longnames() -> Result<()> {
    let env = TestEnvironment::new()?;
    let options = Jsdoc2MdOptions::with_source(SourceFixture::shapes().content);

    let data = env.facade().get_template_data(&options).await?;
    let longnames: Vec<_> = data.iter().map(|e| e.longname.as_str()).collect();
    assert_eq!(
        longnames,
        vec![
            "module:shapes",
            "module:shapes.Circle",
            "module:shapes.Circle",
            "module:shapes.Circle#radius",
            "module:shapes.Circle#area",
            "module:shapes.Circle.unit",
            "module:shapes.PRECISION",
        ]
    );
    assert_eq!(data[2].kind, Kind::Constructor);
    assert!(data[1].is_exported);
    Ok(())
}

#[tokio::test]
async fn test_raw_data_ends_with_package_listing_files() -> Result<()> {
    let env = TestEnvironment::with_sources(&[SourceFixture::math(), SourceFixture::private()])?;
    let raw = env.facade().get_raw_data(&Jsdoc2MdOptions::with_files(["*.js"])).await?;

    let package = raw.last().unwrap();
    assert_eq!(package.kind, Kind::Package);
    assert_eq!(package.files.len(), 2);
    assert!(package.files.iter().any(|f| f.ends_with("math.js")));

    let names: Vec<_> = raw.iter().filter(|d| d.kind == Kind::Function).map(|d| d.name.as_str()).collect();
    assert_eq!(names, vec!["add", "subtract", "visible", "hidden"]);
    Ok(())
}

#[tokio::test]
async fn test_private_identifiers_are_opt_in() -> Result<()> {
    let env = TestEnvironment::with_sources(&[SourceFixture::private()])?;
    let jsdoc2md = env.facade();

    let mut options = Jsdoc2MdOptions::with_files(["private.js"]);
    let data = jsdoc2md.get_template_data(&options).await?;
    assert_eq!(data.iter().map(|e| e.name.as_str()).collect::<Vec<_>>(), vec!["visible"]);

    options.private = true;
    let data = jsdoc2md.get_template_data(&options).await?;
    assert_eq!(data.iter().map(|e| e.name.as_str()).collect::<Vec<_>>(), vec!["visible", "hidden"]);
    Ok(())
}

#[tokio::test]
async fn test_extraction_errors_propagate_unchanged() -> Result<()> {
    let env = TestEnvironment::with_sources(&[SourceFixture::unterminated()])?;
    let jsdoc2md = env.facade();

    let err = jsdoc2md.render(&Jsdoc2MdOptions::with_files(["broken.js"])).await.unwrap_err();
    match err.downcast_ref::<DocError>() {
        Some(DocError::Syntax {
            file,
            line,
            ..
        }) => {
            assert!(file.ends_with("broken.js"), "{file}");
            assert_eq!(*line, 1);
        }
        other => panic!("expected syntax error, got {other:?}"),
    }

    let err = jsdoc2md.render_sync(&Jsdoc2MdOptions::with_files(["nothing/*.js"])).unwrap_err();
    assert!(matches!(err.downcast_ref::<DocError>(), Some(DocError::FilesNotFound { .. })));

    let err = jsdoc2md.get_raw_data_sync(&Jsdoc2MdOptions::default()).unwrap_err();
    assert!(matches!(err.downcast_ref::<DocError>(), Some(DocError::NoInput)));
    Ok(())
}

#[tokio::test]
async fn test_extraction_cache_hits_and_misses() -> Result<()> {
    let env = TestEnvironment::with_sources(&[SourceFixture::math()])?;
    let jsdoc2md = env.facade();
    let options = Jsdoc2MdOptions::with_files(["math.js"]);

    let first = jsdoc2md.get_raw_data(&options).await?;
    let second = jsdoc2md.get_raw_data(&options).await?;
    assert_eq!(first, second);
    assert_eq!(env.explain_cache().len(), 1);

    env.write_file("math.js", "/** Only one now. */\nfunction only () {}\n")?;
    let third = jsdoc2md.get_raw_data(&options).await?;
    assert_eq!(third[0].name, "only");
    assert_eq!(env.explain_cache().len(), 2);
    Ok(())
}

#[tokio::test]
async fn test_clear_empties_both_caches() -> Result<()> {
    let env = TestEnvironment::with_sources(&[SourceFixture::math()])?;
    let jsdoc2md = env.facade();

    jsdoc2md.render(&Jsdoc2MdOptions::with_files(["math.js"])).await?;
    assert_eq!(env.explain_cache().len(), 1);
    assert_eq!(env.render_cache().len(), 1);

    jsdoc2md.clear().await?;
    assert!(env.explain_cache().is_empty());
    assert!(env.render_cache().is_empty());
    assert!(!env.explain_cache().dir().exists());
    Ok(())
}

#[tokio::test]
async fn test_no_cache_leaves_caches_untouched() -> Result<()> {
    let env = TestEnvironment::with_sources(&[SourceFixture::math()])?;
    let options = Jsdoc2MdOptions {
        no_cache: true,
        ..Jsdoc2MdOptions::with_files(["math.js"])
    };

    env.facade().render(&options).await?;
    assert!(env.explain_cache().is_empty());
    assert!(env.render_cache().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_configure_file_selects_inputs() -> Result<()> {
    let env = TestEnvironment::new()?;
    SourceFixture::math().write_to(&env.project_path("src"))?;
    env.write_file("src/_internal.js", "/** Skipped. */\nfunction skipped () {}\n")?;
    env.write_file("src/notes.txt", "/** Not JavaScript. */\n")?;
    let conf = env.write_file("jsdoc.json", r#"{ "source": { "include": ["src"] } }"#)?;

    let options = Jsdoc2MdOptions {
        configure: Some(conf),
        ..Jsdoc2MdOptions::default()
    };
    let data = env.facade().get_template_data(&options).await?;
    assert_eq!(data.iter().map(|e| e.name.as_str()).collect::<Vec<_>>(), vec!["add", "subtract"]);
    Ok(())
}

#[tokio::test]
async fn test_regex_literals_do_not_hide_or_break_docs() -> Result<()> {
    let env = TestEnvironment::new()?;
    let jsdoc2md = env.facade();

    for source in [
        "const re = /a\\/*/;\n/** Adds. */\nfunction add () {}\n",
        "const re = /`/;\n/** Adds. */\nfunction add () {}\n",
    ] {
        let data = jsdoc2md.get_template_data_sync(&Jsdoc2MdOptions::with_source(source))?;
        assert_eq!(data.iter().map(|e| e.longname.as_str()).collect::<Vec<_>>(), vec!["add"], "{source}");
    }
    Ok(())
}
