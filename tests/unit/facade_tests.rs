use anyhow::Result;
use std::sync::Arc;

use jsdoc2md::core::{DocError, Kind};
use jsdoc2md::models::{Doclet, TemplateEntry};
use jsdoc2md::usage::UsageStats;
use jsdoc2md::{Jsdoc2Md, Jsdoc2MdOptions};

use crate::common::{
    CallLog, RecordingExtractor, RecordingRenderer, RecordingStructurer, recording_facade,
};

fn doclets() -> Vec<Doclet> {
    vec![
        Doclet::new(Kind::Namespace, "foo", "foo"),
        Doclet::new(Kind::Function, "bar", "foo.bar"),
        Doclet::package(vec!["foo.js".to_string()]),
    ]
}

fn file_options() -> Jsdoc2MdOptions {
    Jsdoc2MdOptions::with_files(["lib/*.js"])
}

#[tokio::test]
async fn test_render_with_data_skips_extraction_and_structuring() -> Result<()> {
    let log = CallLog::new();
    let jsdoc2md = recording_facade(&log, doclets());

    let mut options = Jsdoc2MdOptions::with_data(vec![TemplateEntry::new(Kind::Function, "x", "x")]);
    options.files = vec!["ignored/*.js".to_string()];
    options.source = Some("/** ignored */ function y () {}".to_string());

    assert_eq!(jsdoc2md.render(&options).await?, "x");
    assert_eq!(jsdoc2md.render_sync(&options)?, "x");
    assert_eq!(log.calls(), vec!["render", "render_sync"]);
    Ok(())
}

#[tokio::test]
async fn test_render_without_data_runs_every_stage_in_order() -> Result<()> {
    let log = CallLog::new();
    let jsdoc2md = recording_facade(&log, doclets());

    assert_eq!(jsdoc2md.render(&file_options()).await?, "foo,foo.bar");
    assert_eq!(log.calls(), vec!["explain", "structure", "render"]);
    Ok(())
}

#[tokio::test]
async fn test_empty_configuration_surfaces_extractor_error() {
    let log = CallLog::new();
    let jsdoc2md = recording_facade(&log, doclets());
    let options = Jsdoc2MdOptions::default();

    let err = jsdoc2md.render(&options).await.unwrap_err();
    assert!(matches!(err.downcast_ref::<DocError>(), Some(DocError::NoInput)));
    let err = jsdoc2md.render_sync(&options).unwrap_err();
    assert!(matches!(err.downcast_ref::<DocError>(), Some(DocError::NoInput)));
    let err = jsdoc2md.get_namepaths(&options).await.unwrap_err();
    assert!(matches!(err.downcast_ref::<DocError>(), Some(DocError::NoInput)));

    assert_eq!(log.count("structure"), 0);
    assert_eq!(log.count("render"), 0);
}

#[tokio::test]
async fn test_namepaths_have_exactly_eleven_kinds() -> Result<()> {
    let log = CallLog::new();
    let jsdoc2md = recording_facade(&log, vec![Doclet::new(Kind::Function, "bar", "foo.bar")]);

    let namepaths = jsdoc2md.get_namepaths(&file_options()).await?;
    assert_eq!(namepaths.keys().copied().collect::<Vec<_>>(), Kind::NAMEPATH_KINDS.to_vec());
    for (kind, names) in &namepaths {
        let expected: Vec<String> = if *kind == Kind::Function { vec!["foo.bar".to_string()] } else { vec![] };
        assert_eq!(names, &expected, "kind {kind}");
    }
    assert_eq!(log.calls(), vec!["explain", "structure"]);
    Ok(())
}

#[tokio::test]
async fn test_sync_and_async_render_are_identical() -> Result<()> {
    let log = CallLog::new();
    let jsdoc2md = recording_facade(&log, doclets());

    let async_out = jsdoc2md.render(&file_options()).await?;
    let sync_out = jsdoc2md.render_sync(&file_options())?;
    assert_eq!(async_out.as_bytes(), sync_out.as_bytes());
    assert_eq!(log.calls(), vec!["explain", "structure", "render", "explain_sync", "structure", "render_sync"]);
    Ok(())
}

#[tokio::test]
async fn test_raw_and_template_data_variants() -> Result<()> {
    let log = CallLog::new();
    let jsdoc2md = recording_facade(&log, doclets());

    let raw = jsdoc2md.get_raw_data(&file_options()).await?;
    assert_eq!(raw.len(), 3);
    assert_eq!(raw[2].kind, Kind::Package);
    assert_eq!(jsdoc2md.get_raw_data_sync(&file_options())?, raw);

    let data = jsdoc2md.get_template_data(&file_options()).await?;
    assert_eq!(jsdoc2md.get_template_data_sync(&file_options())?, data);
    assert_eq!(data.iter().map(|e| e.longname.as_str()).collect::<Vec<_>>(), vec!["foo", "foo.bar"]);

    assert_eq!(
        log.calls(),
        vec!["explain", "explain_sync", "explain", "structure", "explain_sync", "structure"]
    );
    Ok(())
}

#[tokio::test]
async fn test_clear_waits_for_both_caches() -> Result<()> {
    let log = CallLog::new();
    let jsdoc2md = recording_facade(&log, doclets());

    jsdoc2md.clear().await?;
    // The extractor clear is the slower of the two, so a concurrent
    // implementation would log the renderer first.
    assert_eq!(log.calls(), vec!["extractor.clear", "renderer.clear"]);
    Ok(())
}

#[tokio::test]
async fn test_clear_propagates_extractor_failure() {
    let log = CallLog::new();
    let mut extractor = RecordingExtractor::new(Arc::clone(&log), doclets());
    extractor.fail_clear = true;
    let jsdoc2md = Jsdoc2Md::with_parts(
        extractor,
        RecordingStructurer {
            log: Arc::clone(&log),
        },
        RecordingRenderer {
            log: Arc::clone(&log),
        },
    );

    let err = jsdoc2md.clear().await.unwrap_err();
    assert!(err.to_string().contains("read-only"));
    assert_eq!(log.calls(), vec!["extractor.clear failed"]);
}

#[tokio::test]
async fn test_usage_is_recorded_per_public_call() -> Result<()> {
    let log = CallLog::new();
    let stats = Arc::new(UsageStats::new());
    let jsdoc2md = recording_facade(&log, doclets()).with_usage(stats.clone());

    jsdoc2md.render(&file_options()).await?;
    jsdoc2md.get_template_data_sync(&file_options())?;
    jsdoc2md.clear().await?;

    assert_eq!(stats.count("render"), 1);
    assert_eq!(stats.count("get_template_data_sync"), 1);
    assert_eq!(stats.count("clear"), 1);
    assert_eq!(stats.total(), 3);
    Ok(())
}

#[tokio::test]
async fn test_render_accepts_data_with_unrecognised_kind() -> Result<()> {
    let log = CallLog::new();
    let jsdoc2md = recording_facade(&log, doclets());

    let data: Vec<TemplateEntry> = serde_json::from_str(
        r#"[{"kind": "widget", "name": "w", "longname": "w"}, {"kind": "function", "name": "f", "longname": "f"}]"#,
    )?;
    assert_eq!(data[0].kind, Kind::Unknown);
    assert_eq!(jsdoc2md.render(&Jsdoc2MdOptions::with_data(data.clone())).await?, "w,f");

    let namepaths = jsdoc2md::facade::namepaths_of(&data);
    assert_eq!(namepaths.len(), 11);
    assert_eq!(namepaths[&Kind::Function], vec!["f"]);
    Ok(())
}
