use anyhow::Result;
use serde_json::json;

use crate::{CliTest, stderr, stdout};

const CONFIG: &str = r#"
import { Configuration } from '@o3r/core';

/**
 * Settings of the test block
 * @title Test block
 */
export interface TestConfig extends Configuration {
  /** Displayed title */
  title: string;
  itemCount: number;
}

export const TEST_DEFAULT_CONFIG: TestConfig = { title: 'Hello', itemCount: 3 };
"#;

const OPTIONAL_CONFIG: &str = r#"
import { Configuration } from '@o3r/core';

export interface TestConfig extends Configuration {
  title: string;
  subtitle?: string;
}

export const TEST_DEFAULT_CONFIG: TestConfig = { title: 'Hello', subtitle: 'World' };
"#;

const COMPONENT: &str = r#"
import { TestConfig } from './test.config';

@O3rComponent({ componentType: 'Block' })
@Component({ selector: 'o3r-test', templateUrl: './test.template.html' })
export class TestComponent implements DynamicConfigurable<TestConfig> {}
"#;

fn project_with(config: &str) -> Result<CliTest> {
    let test = CliTest::project()?;
    test.write_file("src/test.config.ts", config)?;
    test.write_file("src/test.component.ts", COMPONENT)?;
    Ok(test)
}

#[test]
fn test_extract_writes_both_documents() -> Result<()> {
    let test = project_with(CONFIG)?;

    let output = test.extract_command().output()?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("Extracted 1 component and 1 configuration"));

    let configurations = test.read_json("component.config.metadata.json")?;
    assert_eq!(
        configurations,
        json!([{
            "library": "@my/app",
            "name": "TestConfig",
            "title": "Test block",
            "description": "Settings of the test block",
            "path": "src/test.config.ts",
            "type": "BLOCK",
            "properties": [
                {
                    "name": "title",
                    "label": "title",
                    "description": "Displayed title",
                    "type": "string",
                    "value": "Hello"
                },
                {
                    "name": "itemCount",
                    "label": "item Count",
                    "description": "",
                    "type": "number",
                    "value": "3"
                }
            ]
        }])
    );

    let components = test.read_json("component.class.metadata.json")?;
    let component = &components[0];
    assert_eq!(component["library"], "@my/app");
    assert_eq!(component["name"], "TestComponent");
    assert_eq!(component["path"], "src/test.component.ts");
    assert_eq!(component["templatePath"], "src/test.template.html");
    assert_eq!(component["selector"], "o3r-test");
    assert_eq!(component["type"], "BLOCK");
    assert_eq!(
        component["config"],
        json!({ "library": "@my/app", "name": "TestConfig" })
    );

    Ok(())
}

#[test]
fn test_extract_lenient_reports_warnings() -> Result<()> {
    let test = project_with(OPTIONAL_CONFIG)?;

    let output = test.extract_command().output()?;
    assert!(output.status.success());
    let stderr = stderr(&output);
    assert!(stderr.contains(
        "warning: TestConfig.subtitle property has been identified as optional, which is not cms compliant. Will throw in strict mode."
    ));
    assert!(stdout(&output).contains("(1 warning)"));
    assert!(test.root().join("component.config.metadata.json").exists());

    Ok(())
}

#[test]
fn test_extract_strict_rejects_unsupported_constructs() -> Result<()> {
    let test = project_with(OPTIONAL_CONFIG)?;

    let output = test.extract_command().arg("--strict").output()?;
    assert_eq!(output.status.code(), Some(1));
    let stderr = stderr(&output);
    assert!(stderr.contains("error:"));
    assert!(stderr.contains("TestConfig.subtitle property has been identified as optional"));
    assert!(!test.root().join("component.config.metadata.json").exists());
    assert!(!test.root().join("component.class.metadata.json").exists());

    Ok(())
}

#[test]
fn test_extract_strict_mode_from_config_file() -> Result<()> {
    let test = project_with(OPTIONAL_CONFIG)?;
    test.write_file(".compmetarc.json", r#"{ "strictMode": true }"#)?;

    let output = test.extract_command().output()?;
    assert_eq!(output.status.code(), Some(1));

    Ok(())
}

#[test]
fn test_extract_output_overrides() -> Result<()> {
    let test = project_with(CONFIG)?;
    test.write_file(
        ".compmetarc.json",
        r#"{ "name": "@cfg/app", "componentOutputFile": "dist/components.json" }"#,
    )?;

    let output = test
        .extract_command()
        .args(["--config-output", "dist/configurations.json", "--inline"])
        .output()?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let content = test.read_file("dist/configurations.json")?;
    assert!(!content.contains('\n'));
    let configurations: serde_json::Value = serde_json::from_str(&content)?;
    assert_eq!(configurations[0]["library"], "@cfg/app");
    assert_eq!(test.read_json("dist/components.json")?[0]["library"], "@cfg/app");

    Ok(())
}

#[test]
fn test_extract_schema_validation() -> Result<()> {
    let test = project_with(CONFIG)?;
    test.write_file(
        "schemas/config.json",
        r#"{ "type": "array", "items": { "required": ["tags"] } }"#,
    )?;
    test.write_file(".compmetarc.json", r#"{ "configSchema": "schemas/config.json" }"#)?;

    let lenient = test.extract_command().output()?;
    assert!(lenient.status.success());
    assert!(stderr(&lenient).contains("Configuration metadata does not match its JSON schema"));

    let strict = test.extract_command().arg("--strict").output()?;
    assert_eq!(strict.status.code(), Some(1));
    assert!(stderr(&strict).contains("Configuration metadata is not valid against its JSON schema"));

    Ok(())
}

#[test]
fn test_extract_missing_manifest() -> Result<()> {
    let test = CliTest::project()?;

    let output = test
        .extract_command()
        .args(["--tsconfig", "tsconfig.missing.json"])
        .output()?;
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("Invalid project manifest"));

    Ok(())
}
