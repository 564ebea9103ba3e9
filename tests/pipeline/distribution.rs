use anyhow::Result;
use pretty_assertions::assert_eq;
use serde_json::{Value, json};

use super::*;

const CS_WITH_PLURAL: &str = r#"msgid ""
msgstr ""
"Language: cs\n"
"Plural-Forms: nplurals=3; plural=(n==1) ? 0 : (n>=2 && n<=4) ? 1 : 2;\n"

msgid "Hello"
msgstr "Ahoj"

msgid "1 apple"
msgid_plural "%1 apples"
msgstr[0] "1 jablko"
msgstr[1] "%1 jablka"
msgstr[2] "%1 jablek"
"#;

fn distribution_project() -> Result<Project> {
    let project = Project::new()?;
    project.write_file("site/locale/cs_CZ.po", CS_WITH_PLURAL)?;
    project.write_file("site/locale/en_US.po", EN_CATALOG)?;
    project.write_file("site/install/dist/app.js", "__('Hello');\n")?;
    project.create_dir("site/install/dist/locale")?;
    Ok(project)
}

#[test]
fn test_extract_distribution_template_only() -> Result<()> {
    let project = distribution_project()?;
    let tools = FakeTools::new();

    let (summary, log) = extract(&project, &config(&["site"], &["en_US", "cs_CZ"]), &tools)?;

    assert!(!log.has_errors(), "{:?}", errors(&log));
    assert_eq!(summary.distributions, 1);

    let dist_pot = project.path("site/install/dist/locale/messages.pot");
    let dist_calls: Vec<_> = tools
        .calls_to("xgettext")
        .into_iter()
        .filter(|c| c.option("-o").map(PathBuf::from).as_ref() == Some(&dist_pot))
        .collect();
    assert_eq!(dist_calls.len(), 1);
    assert_eq!(dist_calls[0].option("--package-name"), Some("site"));
    assert!(dist_calls[0].args.contains(&"app.js".to_string()));

    // Only the module's own .po files are merged.
    for call in tools.calls_to("msgmerge") {
        assert!(!call.args.iter().any(|a| a.contains("install/dist")));
    }
    assert!(!project.exists("site/install/dist/locale/cs_CZ.po"));

    let readme = project.read_file("site/install/dist/locale/README.txt")?;
    assert!(readme.contains("DO NOT EDIT THESE FILES MANUALLY"));
    Ok(())
}

#[test]
fn test_compile_distribution_writes_json_maps() -> Result<()> {
    let project = distribution_project()?;
    project.write_file("site/install/dist/locale/messages.pot", EN_CATALOG)?;
    let tools = FakeTools::new();

    let (summary, log) = compile(&project, &config(&["site"], &["en_US", "cs_CZ"]), &tools)?;

    assert!(!log.has_errors(), "{:?}", errors(&log));
    assert_eq!(summary.distributions, 1);

    let merge = tools
        .calls_to("msgmerge")
        .into_iter()
        .find(|c| c.args.iter().any(|a| a.ends_with("cs_CZ.po")))
        .unwrap();
    assert_eq!(merge.args[0], "--no-fuzzy-matching");

    let text = project.read_file("site/install/dist/locale/cs-CZ.json")?;
    assert!(text.contains("\n    \"Hello\": \"Ahoj\""));
    assert!(text.contains("(n>=2 && n<=4)"));

    let map: Value = serde_json::from_str(&text)?;
    assert_eq!(map["1 apple"], json!(["1 jablko", "%1 jablka", "%1 jablek"]));
    assert_eq!(map[""]["language"], json!("cs"));
    assert!(project.exists("site/install/dist/locale/en-US.json"));
    Ok(())
}

#[test]
fn test_compile_distribution_without_template() -> Result<()> {
    let project = distribution_project()?;

    let (_, log) = compile(&project, &config(&["site"], &["en_US", "cs_CZ"]), &FakeTools::new())?;

    assert_eq!(
        errors(&log),
        vec!["./site/install/dist/locale/messages.pot not found. Run extraction first."]
    );
    assert!(!project.exists("site/install/dist/locale/cs-CZ.json"));
    Ok(())
}
