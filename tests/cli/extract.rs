use anyhow::Result;
use pretty_assertions::assert_eq;

use crate::{CliTest, run};

fn site_project() -> Result<CliTest> {
    let test = CliTest::with_file(
        ".mgettextrc.json",
        r#"{ "locales": ["en_US", "cs_CZ"], "modules": ["site", "blog"] }"#,
    )?;
    test.create_dir("site/locale")?;
    test.create_dir("blog")?;
    test.write_file(
        "site/index.html",
        r#"<html><head><meta name="gettext" content="translate"></head><body><h1 gettext=".">Hello</h1></body></html>"#,
    )?;
    Ok(test)
}

#[test]
fn test_extract_without_gettext_tools_fails_module() -> Result<()> {
    let test = site_project()?;

    let output = run(test.extract_command())?;

    assert_eq!(output.code, Some(1));
    assert!(output.stdout.contains("error: ./site: The command xgettext is not found.\n"));
    assert!(output.stdout.contains("Skipped. No locale directory found: ./blog/locale\n"));
    assert!(
        output
            .stdout
            .ends_with("✘ Extracted 0 modules (2 skipped) finished with 1 error, 0 warnings\n")
    );
    // Nothing is prepared for a module that failed its checks.
    assert!(!test.root().join("site/locale/messages.pot").exists());

    Ok(())
}

#[test]
fn test_extract_single_module_without_locale_dir() -> Result<()> {
    let test = site_project()?;

    let mut cmd = test.extract_command();
    cmd.args(["--module", "blog"]);
    let output = run(cmd)?;

    assert_eq!(output.code, Some(0), "stderr: {}", output.stderr);
    assert_eq!(output.stdout, "✓ Extracted 0 modules (1 skipped)\n");

    Ok(())
}

#[test]
fn test_extract_verbose_prints_info_lines() -> Result<()> {
    let test = site_project()?;

    let mut cmd = test.extract_command();
    cmd.args(["--module", "blog", "--verbose"]);
    let output = run(cmd)?;

    assert_eq!(output.code, Some(0));
    assert!(
        output
            .stdout
            .starts_with("Extracting gettext strings from module folders...\n")
    );
    assert!(output.stdout.contains("Skipped. No locale directory found: ./blog/locale\n"));

    Ok(())
}

#[test]
fn test_extract_unknown_module_is_fatal() -> Result<()> {
    let test = site_project()?;

    let mut cmd = test.extract_command();
    cmd.args(["--module", "shop"]);
    let output = run(cmd)?;

    assert_eq!(output.code, Some(2));
    assert_eq!(output.stderr, "Error: No configured module is named 'shop'\n");

    Ok(())
}

#[test]
fn test_extract_with_root_option() -> Result<()> {
    let test = site_project()?;
    let elsewhere = tempfile::tempdir()?;

    let mut cmd = test.extract_command();
    cmd.current_dir(elsewhere.path());
    cmd.arg("--root").arg(test.root().join("blog"));
    cmd.args(["--module", "blog"]);
    let output = run(cmd)?;

    // The config is found above --root and module paths stay relative to it.
    assert_eq!(output.code, Some(0), "stderr: {}", output.stderr);
    assert_eq!(output.stdout, "✓ Extracted 0 modules (1 skipped)\n");

    Ok(())
}

#[test]
fn test_extract_invalid_config_is_fatal() -> Result<()> {
    let test = CliTest::with_file(".mgettextrc.json", r#"{ "batchSize": 0 }"#)?;

    let output = run(test.extract_command())?;

    assert_eq!(output.code, Some(2));
    assert!(output.stderr.contains("'batchSize' must be greater than 0"));

    Ok(())
}

#[test]
fn test_extract_invalid_locale_option_is_fatal() -> Result<()> {
    let test = site_project()?;

    let mut cmd = test.extract_command();
    cmd.args(["--locale", "klingon"]);
    let output = run(cmd)?;

    assert_eq!(output.code, Some(2));
    assert!(output.stderr.contains("Invalid locale in 'locales': \"klingon\""));

    Ok(())
}
