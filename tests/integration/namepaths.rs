use anyhow::Result;

use jsdoc2md::Jsdoc2MdOptions;
use jsdoc2md::core::Kind;
use jsdoc2md::test_utils::{SourceFixture, TestEnvironment};

#[tokio::test]
async fn test_global_functions() -> Result<()> {
    let env = TestEnvironment::with_sources(&[SourceFixture::math()])?;
    let namepaths = env.facade().get_namepaths(&Jsdoc2MdOptions::with_files(["math.js"])).await?;

    assert_eq!(namepaths.len(), 11);
    assert_eq!(namepaths[&Kind::Function], vec!["add", "subtract"]);
    assert!(namepaths.iter().filter(|(kind, _)| **kind != Kind::Function).all(|(_, names)| names.is_empty()));
    Ok(())
}

#[tokio::test]
async fn test_module_members_are_grouped_by_kind() -> Result<()> {
    let env = TestEnvironment::with_sources(&[SourceFixture::shapes()])?;
    let namepaths = env.facade().get_namepaths(&Jsdoc2MdOptions::with_files(["shapes.js"])).await?;

    assert_eq!(namepaths.keys().copied().collect::<Vec<_>>(), Kind::NAMEPATH_KINDS.to_vec());
    assert_eq!(namepaths[&Kind::Module], vec!["module:shapes"]);
    assert_eq!(namepaths[&Kind::Class], vec!["module:shapes.Circle"]);
    assert_eq!(
        namepaths[&Kind::Function],
        vec!["module:shapes.Circle#area", "module:shapes.Circle.unit"]
    );
    assert_eq!(namepaths[&Kind::Member], vec!["module:shapes.Circle#radius"]);
    assert_eq!(namepaths[&Kind::Constant], vec!["module:shapes.PRECISION"]);
    assert!(namepaths[&Kind::Typedef].is_empty());
    Ok(())
}

#[tokio::test]
async fn test_namepaths_serialize_with_lowercase_keys() -> Result<()> {
    let env = TestEnvironment::new()?;
    let options = Jsdoc2MdOptions::with_source("/** Adds. */\nfunction add () {}\n");
    let namepaths = env.facade().get_namepaths(&options).await?;

    let json = serde_json::to_value(&namepaths)?;
    let object = json.as_object().unwrap();
    assert_eq!(object.len(), 11);
    assert_eq!(json["function"], serde_json::json!(["add"]));
    assert_eq!(json["external"], serde_json::json!([]));
    Ok(())
}
