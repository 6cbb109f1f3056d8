use anyhow::{Context, Result};
use serde_json::Value;

use crate::{CliTest, stderr, stdout};

/// Validates config file structure and default values.
fn assert_config_content(content: &str) -> Result<()> {
    let parsed: Value = serde_json::from_str(content).context("Config should be valid JSON")?;

    assert_eq!(parsed["tsConfig"], "tsconfig.json");
    assert_eq!(parsed["strictMode"], false);
    assert_eq!(parsed["componentOutputFile"], "component.class.metadata.json");
    assert_eq!(parsed["configOutputFile"], "component.config.metadata.json");
    assert!(
        parsed.get("name").is_none(),
        "Config should not pin a library name"
    );

    assert!(
        content.contains("  "),
        "Config should use 2-space indentation"
    );

    Ok(())
}

#[test]
fn test_init_creates_config() -> Result<()> {
    let test = CliTest::new()?;

    let output = test.command().arg("init").output()?;
    assert!(output.status.success());
    assert!(stdout(&output).contains("Created .compmetarc.json"));

    assert!(test.root().join(".compmetarc.json").exists());
    let content = test.read_file(".compmetarc.json")?;
    assert_config_content(&content)?;

    Ok(())
}

#[test]
fn test_init_fails_if_exists() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file(".compmetarc.json", "{}")?;

    let output = test.command().arg("init").output()?;
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains(".compmetarc.json already exists"));
    assert_eq!(test.read_file(".compmetarc.json")?, "{}");

    Ok(())
}
