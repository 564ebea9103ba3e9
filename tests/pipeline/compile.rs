use anyhow::Result;
use pretty_assertions::assert_eq;

use super::*;

const CHERRY_PICKED: &str = r#"<html><head><meta name="gettext" content="cherry-pick"><meta charset="UTF-8"></head>
<body>
<h1 gettext=".#f7ff9e">Starý pozdrav</h1>
<aside class="extra">Ruční poznámka</aside>
<img gettext="alt#deadbe" alt="Starý text">
</body></html>
"#;

#[test]
fn test_compile_generates_translated_copy() -> Result<()> {
    let project = Project::with_site()?;
    let tools = FakeTools::new();

    let (summary, log) = compile(&project, &config(&["site"], &["en_US", "cs_CZ"]), &tools)?;

    assert!(!log.has_errors(), "{:?}", errors(&log));
    assert_eq!(summary.modules, 1);

    let html = project.read_file("site/index.cs-CZ.html")?;
    assert!(html.contains(r#"<h1 gettext=".#f7ff9e">Ahoj</h1>"#));
    assert!(html.contains(r#"gettext="placeholder#ab4229""#));
    assert!(html.contains(r#"placeholder="Vaše jméno""#));
    assert!(html.contains(r#"content="replace""#));
    assert!(html.contains(r#"<meta charset="UTF-8">"#));

    // The default locale gets no copy and the template is left alone.
    assert!(!project.exists("site/index.en-US.html"));
    assert_eq!(project.read_file("site/index.html")?, TEMPLATE);
    Ok(())
}

#[test]
fn test_compile_runs_msgfmt_per_locale() -> Result<()> {
    let project = Project::with_site()?;
    let tools = FakeTools::new();

    compile(&project, &config(&["site"], &["en_US", "cs_CZ"]), &tools)?;

    let msgfmt = tools.calls_to("msgfmt");
    assert_eq!(msgfmt.len(), 2);
    assert!(msgfmt[1].args.contains(&"--strict".to_string()));
    assert_eq!(
        msgfmt[1].option("-o").map(PathBuf::from),
        Some(project.path("site/locale/cs_CZ/LC_MESSAGES/site.mo"))
    );
    assert!(project.exists("site/locale/cs_CZ/LC_MESSAGES/site.mo"));
    assert!(project.exists("site/locale/en_US/LC_MESSAGES/site.mo"));
    Ok(())
}

#[test]
fn test_compile_twice_is_stable() -> Result<()> {
    let project = Project::with_site()?;
    let config = config(&["site"], &["en_US", "cs_CZ"]);

    compile(&project, &config, &FakeTools::new())?;
    let first = project.read_file("site/index.cs-CZ.html")?;
    compile(&project, &config, &FakeTools::new())?;
    let second = project.read_file("site/index.cs-CZ.html")?;

    assert_eq!(first, second);
    Ok(())
}

#[test]
fn test_compile_replace_discards_manual_edits() -> Result<()> {
    let project = Project::with_site()?;
    let config = config(&["site"], &["en_US", "cs_CZ"]);
    compile(&project, &config, &FakeTools::new())?;

    let edited = project
        .read_file("site/index.cs-CZ.html")?
        .replace("</h1>", "</h1><p>Ruční úprava</p>");
    project.write_file("site/index.cs-CZ.html", &edited)?;
    compile(&project, &config, &FakeTools::new())?;

    assert!(!project.read_file("site/index.cs-CZ.html")?.contains("Ruční úprava"));
    Ok(())
}

#[test]
fn test_compile_cherry_pick_keeps_manual_edits() -> Result<()> {
    let project = Project::with_site()?;
    project.write_file("site/index.cs-CZ.html", CHERRY_PICKED)?;

    let (_, log) = compile(&project, &config(&["site"], &["en_US", "cs_CZ"]), &FakeTools::new())?;

    let html = project.read_file("site/index.cs-CZ.html")?;
    assert!(html.contains(r#"<h1 gettext=".#f7ff9e">Ahoj</h1>"#));
    assert!(html.contains(r#"<aside class="extra">Ruční poznámka</aside>"#));
    assert!(html.contains(r#"content="cherry-pick""#));
    assert!(!html.contains("Your name"));

    // The removed source string stays visible in the copy and in the log.
    assert!(html.contains(r#"alt="Starý text""#));
    assert!(html.contains(r#"gettext="alt#deadbe""#));
    let errors = errors(&log);
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("alt#deadbe not found in dictionary"));
    Ok(())
}

#[test]
fn test_compile_invalid_mode_marker_skips_file() -> Result<()> {
    let project = Project::with_site()?;
    let manual = "<html><head></head><body><h1>Ručně</h1></body></html>";
    project.write_file("site/index.cs-CZ.html", manual)?;

    let (_, log) = compile(&project, &config(&["site"], &["en_US", "cs_CZ"]), &FakeTools::new())?;

    assert_eq!(project.read_file("site/index.cs-CZ.html")?, manual);
    let errors = errors(&log);
    assert_eq!(errors.len(), 1);
    assert!(errors[0].starts_with("./site/index.cs-CZ.html: invalid mode marker"));
    Ok(())
}

#[test]
fn test_compile_reports_fuzzy_entries() -> Result<()> {
    let project = Project::with_site()?;
    project.write_file(
        "site/locale/cs_CZ.po",
        &CS_CATALOG.replace("msgid \"Hello\"", "#, fuzzy\nmsgid \"Hello\""),
    )?;

    let (_, log) = compile(&project, &config(&["site"], &["en_US", "cs_CZ"]), &FakeTools::new())?;

    let errors = errors(&log);
    assert_eq!(errors.len(), 1);
    assert!(errors[0].starts_with("./site/locale/cs_CZ.po contains 1 fuzzy translation(s)."));
    // Fuzzy entries are not used as translations.
    let html = project.read_file("site/index.cs-CZ.html")?;
    assert!(html.contains(r#"<h1 gettext=".#f7ff9e">Hello</h1>"#));
    Ok(())
}

#[test]
fn test_compile_reports_failed_msgfmt() -> Result<()> {
    let project = Project::with_site()?;
    let tools = FakeTools::failing(&["msgfmt"]);

    let (_, log) = compile(&project, &config(&["site"], &["en_US", "cs_CZ"]), &tools)?;

    let errors = errors(&log);
    assert_eq!(errors.len(), 4);
    assert!(errors[0].starts_with("Command failed with status 1: msgfmt ./site/locale/en_US.po --strict -o"));
    assert_eq!(errors[1], "./site/locale/en_US/LC_MESSAGES/site.mo not created");
    // Markup is still translated from the .po files.
    assert!(project.exists("site/index.cs-CZ.html"));
    Ok(())
}

#[test]
fn test_compile_missing_po_file() -> Result<()> {
    let project = Project::new()?;
    project.write_file("site/index.html", TEMPLATE)?;
    project.write_file("site/locale/en_US.po", EN_CATALOG)?;
    let tools = FakeTools::new();

    let (_, log) = compile(&project, &config(&["site"], &["en_US", "cs_CZ"]), &tools)?;

    assert_eq!(errors(&log), vec!["./site/locale/cs_CZ.po not found. Run extraction first."]);
    assert_eq!(tools.calls_to("msgfmt").len(), 1);
    // Without a catalog the copy keeps the source strings.
    let html = project.read_file("site/index.cs-CZ.html")?;
    assert!(html.contains(r#"<h1 gettext=".#f7ff9e">Hello</h1>"#));
    Ok(())
}

#[test]
fn test_compile_explicit_domain_uses_other_module() -> Result<()> {
    let project = Project::with_site()?;
    project.write_file(
        "site/about.html",
        r#"<html><head><meta name="gettext" content="translate"></head><body><b gettext="shop:.">Cart</b></body></html>"#,
    )?;
    project.write_file(
        "shop/locale/cs_CZ.po",
        "msgid \"\"\nmsgstr \"\"\n\"Language: cs\\n\"\n\nmsgid \"Cart\"\nmsgstr \"Košík\"\n",
    )?;
    project.write_file("shop/locale/en_US.po", EN_CATALOG)?;

    let (summary, log) = compile(&project, &config(&["site", "shop"], &["en_US", "cs_CZ"]), &FakeTools::new())?;

    assert!(!log.has_errors(), "{:?}", errors(&log));
    assert_eq!(summary.modules, 2);
    let html = project.read_file("site/about.cs-CZ.html")?;
    assert!(html.contains(r#"<b gettext="shop:.#"#));
    assert!(html.contains(">Košík</b>"));
    Ok(())
}
