use anyhow::Result;
use predicates::prelude::*;

use jsdoc2md::test_utils::{SourceFixture, TestEnvironment};

use crate::common::jsdoc2md_cmd;

fn math_env() -> Result<TestEnvironment> {
    TestEnvironment::with_sources(&[SourceFixture::math()])
}

#[test]
fn test_renders_markdown_to_stdout() -> Result<()> {
    let env = math_env()?;
    jsdoc2md_cmd(&env.project_dir, &env.cache_dir)
        .arg("math.js")
        .assert()
        .success()
        .stdout(predicate::str::contains("## add(a, b) ⇒ <code>number</code>"))
        .stdout(predicate::str::contains("## subtract(a, b)"));
    Ok(())
}

#[test]
fn test_json_prints_template_data() -> Result<()> {
    let env = math_env()?;
    let output = jsdoc2md_cmd(&env.project_dir, &env.cache_dir).args(["--json", "math.js"]).output()?;
    assert!(output.status.success());

    let data: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    let entries = data.as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["longname"], "add");
    assert_eq!(entries[0]["kind"], "function");
    Ok(())
}

#[test]
fn test_jsdoc_prints_raw_doclets_with_package() -> Result<()> {
    let env = math_env()?;
    let output = jsdoc2md_cmd(&env.project_dir, &env.cache_dir).args(["--jsdoc", "math.js"]).output()?;
    assert!(output.status.success());

    let raw: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    let doclets = raw.as_array().unwrap();
    assert_eq!(doclets.last().unwrap()["kind"], "package");
    Ok(())
}

#[test]
fn test_namepaths_lists_every_kind() -> Result<()> {
    let env = math_env()?;
    let output = jsdoc2md_cmd(&env.project_dir, &env.cache_dir).args(["--namepaths", "math.js"]).output()?;
    assert!(output.status.success());

    let namepaths: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(namepaths.as_object().unwrap().len(), 11);
    assert_eq!(namepaths["function"], serde_json::json!(["add", "subtract"]));
    assert_eq!(namepaths["class"], serde_json::json!([]));
    Ok(())
}

#[test]
fn test_print_config_merges_options_file() -> Result<()> {
    let env = math_env()?;
    env.write_file(".jsdoc2md.toml", "files = [\"math.js\"]\nheading-depth = 3\n")?;

    let output = jsdoc2md_cmd(&env.project_dir, &env.cache_dir)
        .args(["--print-config", "--separators"])
        .output()?;
    assert!(output.status.success());

    let config: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(config["files"], serde_json::json!(["math.js"]));
    assert_eq!(config["heading-depth"], 3);
    assert_eq!(config["separators"], true);
    Ok(())
}

#[test]
fn test_options_file_supplies_inputs() -> Result<()> {
    let env = math_env()?;
    env.write_file(".jsdoc2md.toml", "files = [\"math.js\"]\nheading-depth = 3\n")?;

    jsdoc2md_cmd(&env.project_dir, &env.cache_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("### add(a, b)"));
    Ok(())
}

#[test]
fn test_clear_removes_cached_results() -> Result<()> {
    let env = math_env()?;
    jsdoc2md_cmd(&env.project_dir, &env.cache_dir).arg("math.js").assert().success();
    assert_eq!(env.explain_cache().len(), 1);
    assert_eq!(env.render_cache().len(), 1);

    jsdoc2md_cmd(&env.project_dir, &env.cache_dir)
        .arg("--clear")
        .assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Cache cleared"));
    assert!(env.explain_cache().is_empty());
    assert!(env.render_cache().is_empty());
    Ok(())
}

#[test]
fn test_no_cache_flag_skips_cache_writes() -> Result<()> {
    let env = math_env()?;
    jsdoc2md_cmd(&env.project_dir, &env.cache_dir).args(["--no-cache", "math.js"]).assert().success();
    assert!(env.explain_cache().is_empty());
    assert!(env.render_cache().is_empty());
    Ok(())
}

#[test]
fn test_template_and_data_files() -> Result<()> {
    let env = TestEnvironment::new()?;
    env.write_file("api.tera", "{% for e in data %}{{ e.longname }};{% endfor %}")?;
    env.write_file(
        "data.json",
        r#"[{"kind": "function", "name": "a", "longname": "a"}, {"kind": "class", "name": "B", "longname": "B"}]"#,
    )?;

    jsdoc2md_cmd(&env.project_dir, &env.cache_dir)
        .args(["--data", "data.json", "--template", "api.tera"])
        .assert()
        .success()
        .stdout("a;B;\n");
    Ok(())
}

#[test]
fn test_missing_input_fails_with_message() -> Result<()> {
    let env = TestEnvironment::new()?;
    jsdoc2md_cmd(&env.project_dir, &env.cache_dir)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("error:"))
        .stderr(predicate::str::contains("suggestion:"));
    Ok(())
}

#[test]
fn test_unmatched_glob_fails() -> Result<()> {
    let env = TestEnvironment::new()?;
    jsdoc2md_cmd(&env.project_dir, &env.cache_dir)
        .arg("lib/*.js")
        .assert()
        .failure()
        .stderr(predicate::str::contains("lib/*.js"));
    Ok(())
}

#[test]
fn test_conflicting_modes_are_rejected() -> Result<()> {
    let env = math_env()?;
    jsdoc2md_cmd(&env.project_dir, &env.cache_dir)
        .args(["--json", "--namepaths", "math.js"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
    Ok(())
}
