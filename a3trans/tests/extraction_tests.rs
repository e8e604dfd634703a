use a3trans::{Extractor, LanguageCode, ORIGINAL, Project, WorkDir, XliffVersion};
use indoc::indoc;
use std::fs;
use tempfile::TempDir;

fn reference_with_greeting() -> Project {
    let mut reference = Project::new("Reference");
    reference.set_translation("Main", "mission", "greet", ORIGINAL, "Hello World");
    reference.set_translation("Main", "mission", "greet", "German", "Hallo Welt");
    reference
}

fn write_script(dir: &TempDir, name: &str, content: &[u8]) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn carry_forward_when_source_matches_ignoring_case() {
    let dir = TempDir::new().unwrap();
    let script = write_script(&dir, "mission.sqf", br#"// TR * * greet "hello world""#);
    let reference = reference_with_greeting();
    let mut output = Project::new(reference.name());

    let report = Extractor::new(&reference).extract_file(&script, &mut output).unwrap();

    let key = output.package("Main").unwrap().container("mission").unwrap().key("greet").unwrap();
    assert_eq!(key.original().unwrap().text(), "hello world");
    assert_eq!(key.translation("German").unwrap().text(), "Hallo Welt");
    assert_eq!(report.carried_forward, 1);
}

#[test]
fn changed_source_drops_translations() {
    let dir = TempDir::new().unwrap();
    let script = write_script(&dir, "mission.sqf", br#"// TR * * greet "Hello there""#);
    let reference = reference_with_greeting();
    let mut output = Project::new(reference.name());

    let report = Extractor::new(&reference).extract_file(&script, &mut output).unwrap();

    let translations = output.get_all_translations("Main", "mission", "greet");
    assert_eq!(translations.len(), 1);
    assert_eq!(translations[0].language(), ORIGINAL);
    assert_eq!(translations[0].text(), "Hello there");
    assert_eq!(report.carried_forward, 0);
}

#[test]
fn single_line_and_block_directives() {
    let dir = TempDir::new().unwrap();
    let script = write_script(
        &dir,
        "intro.sqf",
        indoc! {br#"
            titleText ["", "PLAIN"]; // TR * * myKey "Hi there"
            /* TR Mod_A UI_Group greet
            Hello
            World */
        "#},
    );
    let reference = Project::default();
    let mut output = Project::default();

    let report = Extractor::new(&reference).extract_file(&script, &mut output).unwrap();

    assert_eq!(report.directives, 2);
    assert_eq!(
        output.get_translation("Main", "intro", "myKey", ORIGINAL).unwrap().text(),
        "Hi there"
    );
    assert_eq!(
        output.get_translation("Mod A", "UI Group", "greet", ORIGINAL).unwrap().text(),
        "Hello World"
    );
}

#[test]
fn container_token_uses_name_before_first_dot() {
    let dir = TempDir::new().unwrap();
    let script = write_script(&dir, "fn_hint.local.sqf", br#"// TR * * k "v""#);
    let reference = Project::default();
    let mut output = Project::default();

    Extractor::new(&reference).extract_file(&script, &mut output).unwrap();

    assert!(output.get_translation("Main", "fn_hint", "k", ORIGINAL).is_some());
}

#[test]
fn byte_order_mark_is_ignored() {
    let dir = TempDir::new().unwrap();
    let mut content = vec![0xEF, 0xBB, 0xBF];
    content.extend_from_slice(br#"// TR * * k "with bom""#);
    let script = write_script(&dir, "init.sqf", &content);
    let reference = Project::default();
    let mut output = Project::default();

    Extractor::new(&reference).extract_file(&script, &mut output).unwrap();

    assert_eq!(
        output.get_translation("Main", "init", "k", ORIGINAL).unwrap().text(),
        "with bom"
    );
}

#[test]
fn invalid_utf8_does_not_lose_the_file() {
    let dir = TempDir::new().unwrap();
    let script = write_script(&dir, "init.sqf", b"// TR * * k \"Caf\xe9\"\n// TR * * k2 \"ok\"\n");
    let reference = Project::default();
    let mut output = Project::default();

    let report = Extractor::new(&reference).extract_file(&script, &mut output).unwrap();

    assert_eq!(report.directives, 2);
    assert_eq!(
        output.get_translation("Main", "init", "k", ORIGINAL).unwrap().text(),
        "Caf\u{FFFD}"
    );
    assert_eq!(output.get_translation("Main", "init", "k2", ORIGINAL).unwrap().text(), "ok");
}

#[test]
fn trailing_space_source_is_carried_forward_after_rewrite() {
    let dir = TempDir::new().unwrap();
    let workdir = WorkDir::new(dir.path());
    let mut reference = Project::new("Op Test");
    reference.set_translation("Main", "init", "score", ORIGINAL, "Score: ");
    reference.set_translation("Main", "init", "score", "German", "Punkte: ");
    workdir.write_stringtable(&reference, false).unwrap();
    let reference = workdir.read_stringtable().unwrap();

    let script = write_script(&dir, "init.sqf", br#"// TR * * score "Score: ""#);
    let mut output = Project::new(reference.name());
    let report = Extractor::new(&reference).extract_file(&script, &mut output).unwrap();

    assert_eq!(report.carried_forward, 1);
    assert_eq!(
        output.get_translation("Main", "init", "score", "German").unwrap().text(),
        "Punkte: "
    );
}

#[test]
fn orphan_identifier_is_reported_without_mutation() {
    let dir = TempDir::new().unwrap();
    let script = write_script(
        &dir,
        "init.sqf",
        indoc! {b"
            private _x = 1;
            hint localize \"str_unknownId\";
        "},
    );
    let reference = reference_with_greeting();
    let mut output = Project::new("Output");

    let report = Extractor::new(&reference).extract_file(&script, &mut output).unwrap();

    assert_eq!(report.orphans.len(), 1);
    assert_eq!(report.orphans[0].line, 2);
    assert_eq!(report.orphans[0].identifier, "str_unknownId");
    assert!(output.is_empty());
}

#[test]
fn identifier_known_to_reference_is_copied_under_its_own_path() {
    let mut reference = Project::new("Reference");
    reference.set_translation("Shared", "common", "STR_OK", ORIGINAL, "OK");
    reference.set_translation("Shared", "common", "STR_OK", "Polish", "Dobrze");
    let mut output = Project::new("Output");

    let report = Extractor::new(&reference).extract_str(
        "dialog",
        "ctrlSetText [1, localize \"str_ok\"];",
        &mut output,
    );

    assert!(report.orphans.is_empty());
    assert_eq!(report.resolved_from_reference, 1);
    let found = output.find_key_recursive("str_ok").unwrap();
    assert_eq!((found.package, found.container), ("Shared", "common"));
    assert_eq!(found.key.id(), "STR_OK");
    assert_eq!(found.key.translation("Polish").unwrap().text(), "Dobrze");
}

#[test]
fn output_is_shared_across_files() {
    let reference = Project::default();
    let mut output = Project::default();
    let extractor = Extractor::new(&reference);

    let mut report = extractor.extract_str("a", r#"// TR * * str_first "First""#, &mut output);
    report.absorb(extractor.extract_str("b", "hint localize \"STR_FIRST\";", &mut output));

    assert_eq!(report.directives, 1);
    assert!(report.orphans.is_empty());
    assert_eq!(output.key_count(), 1);
}

#[test]
fn extract_then_translate_then_import() {
    let dir = TempDir::new().unwrap();
    let workdir = WorkDir::new(dir.path());
    let script = write_script(
        &dir,
        "briefing.sqf",
        indoc! {br#"
            // TR * * str_title "Operation Sand"
            // TR Side_Ops radio str_call "Come in"
        "#},
    );

    let reference = workdir.read_stringtable().unwrap_or_default();
    let mut output = Project::new(reference.name());
    Extractor::new(&reference).extract_file(&script, &mut output).unwrap();
    workdir.write_stringtable(&output, false).unwrap();

    let project = workdir.read_stringtable().unwrap();
    workdir
        .write_xliff(&project, &[LanguageCode::German], LanguageCode::English, XliffVersion::V1_2)
        .unwrap();

    let german = workdir.xliff_path(Some(LanguageCode::German));
    let translated = fs::read_to_string(&german)
        .unwrap()
        .replace("<source>Operation Sand</source>", "<source>Operation Sand</source><target>Operation Sand DE</target>");
    fs::write(&german, translated).unwrap();

    let mut imported = workdir.read_stringtable().unwrap();
    let report = workdir.read_xliff(&mut imported).unwrap();
    assert_eq!(report.imported, vec![LanguageCode::German]);
    assert_eq!(
        imported.get_translation("Main", "briefing", "str_title", "German").unwrap().text(),
        "Operation Sand DE"
    );
    // ids are not converted back on import
    assert!(imported.package("Side_Ops").is_some());
    assert!(imported.package("Side Ops").is_some());
}
