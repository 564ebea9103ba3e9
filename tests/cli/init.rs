use anyhow::{Context, Result};
use pretty_assertions::assert_eq;
use serde_json::Value;

use crate::{CliTest, run};

const CONFIG_FILE: &str = ".mgettextrc.json";

/// Validates config file structure and default values.
fn assert_config_content(content: &str) -> Result<()> {
    let parsed: Value = serde_json::from_str(content).context("Config should be valid JSON")?;

    assert_eq!(parsed["locales"], serde_json::json!(["en_US"]));
    assert_eq!(parsed["defaultLocale"], "en_US");
    assert_eq!(parsed["modules"], serde_json::json!(["."]));
    assert_eq!(parsed["markupAttribute"], "gettext");
    assert_eq!(parsed["batchSize"], 100);
    assert_eq!(parsed["tools"]["msgfmt"], "msgfmt");

    Ok(())
}

#[test]
fn test_init_creates_config() -> Result<()> {
    let test = CliTest::new()?;

    let output = run({
        let mut cmd = test.command();
        cmd.arg("init");
        cmd
    })?;

    assert_eq!(output.code, Some(0));
    assert_eq!(output.stdout, "Created .mgettextrc.json\n");
    assert!(test.root().join(CONFIG_FILE).exists());
    assert_config_content(&test.read_file(CONFIG_FILE)?)?;

    Ok(())
}

#[test]
fn test_init_fails_if_exists() -> Result<()> {
    let test = CliTest::with_file(CONFIG_FILE, "{}")?;

    let output = run({
        let mut cmd = test.command();
        cmd.arg("init");
        cmd
    })?;

    assert_eq!(output.code, Some(1));
    assert_eq!(output.stdout, "error: .mgettextrc.json already exists\n");
    assert_eq!(test.read_file(CONFIG_FILE)?, "{}");

    Ok(())
}

#[test]
fn test_init_config_is_immediately_usable() -> Result<()> {
    let test = CliTest::new()?;
    run({
        let mut cmd = test.command();
        cmd.arg("init");
        cmd
    })?;

    // The default module is the project itself, which has no locale/ yet.
    let output = run(test.extract_command())?;

    assert_eq!(output.code, Some(0), "stderr: {}", output.stderr);
    assert_eq!(output.stdout, "✓ Extracted 0 modules (1 skipped)\n");

    Ok(())
}

#[test]
fn test_no_command_prints_help() -> Result<()> {
    let test = CliTest::new()?;

    let output = run(test.command())?;

    assert_eq!(output.code, Some(0));
    assert!(output.stdout.contains("Usage: mgettext"));
    assert!(output.stdout.contains("extract"));
    assert!(output.stdout.contains("compile"));

    Ok(())
}
