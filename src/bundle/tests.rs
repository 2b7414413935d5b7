use super::*;
use crate::io::DefaultBundleWriter;
use tempfile::TempDir;

/// 核心片段 `a=1\nb=2`，插件片段 `b=99\nc=3`
fn create_test_bundle() -> MasterTranslationFile {
    let core = TextFragment::from_text("Core", "a=1\nb=2");
    let plugin = TextFragment::from_text("Plugin: Foo", "b=99\nc=3");
    MasterTranslationFile::new("messages_fr.properties", vec![core, plugin])
}

#[test]
fn test_compose_and_read() {
    let mtf = create_test_bundle();

    assert_eq!(mtf.get("a").unwrap(), "1");
    assert_eq!(mtf.get("b").unwrap(), "2");
    assert_eq!(mtf.get("c").unwrap(), "3");
    assert_eq!(mtf.len(), 3);
    assert_eq!(mtf.to_text(), "a=1\nb=2\n\nb=99\nc=3\n\n");
}

#[test]
fn test_first_writer_wins_across_three_fragments() {
    let mtf = MasterTranslationFile::new(
        "messages.properties",
        vec![
            TextFragment::from_text("Core", "# comment=ignored\nx=core"),
            TextFragment::from_text("Plugin: A", "x=a\ny=a"),
            TextFragment::from_text("Plugin: B", "x=b\ny=b\nz=b"),
        ],
    );

    assert_eq!(mtf.get("x").unwrap(), "core");
    assert_eq!(mtf.get("y").unwrap(), "a");
    assert_eq!(mtf.get("z").unwrap(), "b");
    assert!(!mtf.contains("# comment"));
}

#[test]
fn test_empty_fragment_list_gets_core() {
    let mut mtf = MasterTranslationFile::new("messages.properties", Vec::new());

    assert_eq!(mtf.fragments().len(), 1);
    assert_eq!(mtf.primary_fragment().description(), "Core");
    assert!(mtf.is_empty());

    mtf.add("k", "v");
    assert_eq!(mtf.primary_fragment().lines().collect::<Vec<_>>(), vec!["k=v"]);
}

#[test]
fn test_edit_existing_key_keeps_position() {
    let mut mtf = MasterTranslationFile::new(
        "messages_fr.properties",
        vec![TextFragment::from_text("Core", "# header\na=1\n\nb=2")],
    );

    mtf.add("a", "1-edited");

    assert_eq!(mtf.get("a").unwrap(), "1-edited");
    assert!(mtf.has_been_edited("a"));
    assert!(!mtf.has_been_edited("b"));

    let lines: Vec<_> = mtf.primary_fragment().lines().collect();
    assert_eq!(lines, vec!["# header", "a=1-edited", "", "b=2"]);
}

#[test]
fn test_edit_plugin_key_updates_plugin_fragment() {
    let mut mtf = create_test_bundle();

    mtf.add("c", "3-edited");

    assert_eq!(mtf.fragments()[1].get_line("c").unwrap(), "c=3-edited");
    assert!(!mtf.primary_fragment().contains_key("c"));
}

#[test]
fn test_add_new_key_appends_to_core() {
    let mut mtf = create_test_bundle();

    mtf.add("d", "4");

    assert_eq!(mtf.get("d").unwrap(), "4");
    assert_eq!(mtf.primary_fragment().lines().last(), Some("d=4"));
    assert_eq!(mtf.to_text(), "a=1\nb=2\nd=4\n\nb=99\nc=3\n\n");
    assert_eq!(mtf.changes().history()[0].kind, ChangeKind::Added);
}

#[test]
fn test_same_value_is_not_an_edit() {
    let mut mtf = create_test_bundle();

    mtf.add("a", "1");

    assert!(!mtf.has_been_edited("a"));
    assert!(mtf.changes().is_empty());
}

#[test]
fn test_delete_then_set_empty() {
    let mut mtf = create_test_bundle();

    mtf.delete("b").unwrap();

    assert!(matches!(mtf.get("b"), Err(MtfError::MissingResource(_))));
    assert_eq!(mtf.primary_fragment().lines().collect::<Vec<_>>(), vec!["a=1", "b="]);
    assert!(mtf.has_been_edited("b"));
    let history_len = mtf.changes().history().len();

    // 再次以空值设置不会追加新的记录
    mtf.add("b", "");

    assert_eq!(mtf.changes().history().len(), history_len);
    assert_eq!(mtf.changes().len(), 1);
    assert_eq!(mtf.primary_fragment().lines().collect::<Vec<_>>(), vec!["a=1", "b="]);
}

#[test]
fn test_edit_first_key_keeps_bom() {
    let mut mtf = MasterTranslationFile::new(
        "messages_fr.properties",
        vec![TextFragment::from_text("Core", "\u{FEFF}a=1\nb=2")],
    );

    mtf.add("a", "x");
    assert_eq!(mtf.to_text(), "\u{FEFF}a=x\nb=2\n\n");

    mtf.delete("a").unwrap();
    assert_eq!(mtf.to_text(), "\u{FEFF}a=\nb=2\n\n");
}

#[test]
fn test_tombstone_is_not_revived_by_plugin() {
    let mut mtf = create_test_bundle();

    mtf.delete("b").unwrap();

    // 插件片段中的 b=99 仍然存在于磁盘文本中，但视图不会回退到它
    assert!(mtf.get("b").is_err());
    assert!(mtf.fragments()[1].contains_key("b"));
}

#[test]
fn test_delete_missing_key() {
    let mut mtf = create_test_bundle();
    mtf.add("a", "changed");
    let before = mtf.changes().history().len();

    let result = mtf.delete("zz");

    assert!(matches!(result, Err(MtfError::KeyNotFound(ref k)) if k == "zz"));
    assert_eq!(mtf.changes().history().len(), before);
    assert!(!mtf.has_been_edited("zz"));
}

#[test]
fn test_set_empty_on_unknown_key_is_silent() {
    let mut mtf = create_test_bundle();

    mtf.add("unknown", "");

    assert!(!mtf.contains("unknown"));
    assert!(mtf.changes().is_empty());
}

#[test]
fn test_get_or_empty() {
    let mtf = create_test_bundle();

    assert_eq!(mtf.get_or_empty("a"), "1");
    assert_eq!(mtf.get_or_empty("missing"), "");
}

#[test]
fn test_reserved_setters() {
    let mut mtf = MasterTranslationFile::new(
        "messages_fr.properties",
        vec![TextFragment::from_text("Core", "bundle.language=fr\ngreeting=Bonjour")],
    );

    mtf.set_language_code("de");
    mtf.set_language_name("Deutsch");
    mtf.set_country("DE");

    assert_eq!(mtf.language_code(), Some("de"));
    assert_eq!(mtf.language_name(), Some("Deutsch"));
    assert_eq!(mtf.country(), Some("DE"));
    assert_eq!(
        mtf.primary_fragment().lines().collect::<Vec<_>>(),
        vec![
            "bundle.language=de",
            "greeting=Bonjour",
            "bundle.language.name=Deutsch",
            "bundle.language.country=DE",
        ]
    );
    assert!(mtf.changes().is_empty());
}

#[test]
fn test_language_font() {
    let mut mtf = create_test_bundle();
    assert!(mtf.language_font().is_empty());

    mtf.set_language_font("Noto Sans, Arial ,");
    assert_eq!(mtf.language_font(), vec!["Noto Sans", "Arial"]);

    mtf.set_language_font("");
    assert!(mtf.language_font().is_empty());
    assert!(!mtf.primary_fragment().contains_key(KEY_LANGUAGE_FONT));
    assert!(!mtf.contains(KEY_LANGUAGE_FONT));
}

#[test]
fn test_identifier_and_namespace() {
    let mtf = create_test_bundle();
    assert_eq!(mtf.identifier().to_string(), "master:messages_fr.properties");

    let mtf = create_test_bundle().with_namespace("ns");
    assert_eq!(mtf.namespace(), "ns");
    assert_eq!(mtf.identifier().to_string(), "ns:messages_fr.properties");
}

#[test]
fn test_cmp_by_language_name() {
    let mut french = MasterTranslationFile::new("messages_fr.properties", Vec::new());
    french.set_language_name("Français");
    let mut german = MasterTranslationFile::new("messages_de.properties", Vec::new());
    german.set_language_name("Deutsch");
    let unnamed = MasterTranslationFile::new("messages_xx.properties", Vec::new());

    let mut bundles = vec![french, german, unnamed];
    bundles.sort_by(|a, b| a.cmp_by_language_name(b));

    let names: Vec<_> = bundles.iter().map(|b| b.filename()).collect();
    assert_eq!(
        names,
        vec!["messages_xx.properties", "messages_de.properties", "messages_fr.properties"]
    );
}

#[test]
fn test_save_and_rename_on_disk() {
    let temp_dir = TempDir::new().unwrap();
    let mut mtf = create_test_bundle();
    let writer = DefaultBundleWriter::default();

    mtf.save_to_disk(&writer, temp_dir.path()).unwrap();
    mtf.rename_on_disk(temp_dir.path(), "messages_de.properties").unwrap();

    assert_eq!(mtf.filename(), "messages_de.properties");
    assert!(!temp_dir.path().join("messages_fr.properties").exists());
    assert!(temp_dir.path().join("messages_de.properties").exists());
}

#[test]
fn test_rename_failure_keeps_filename() {
    let temp_dir = TempDir::new().unwrap();
    let mut mtf = create_test_bundle();

    // 源文件不存在，重命名失败
    let result = mtf.rename_on_disk(temp_dir.path(), "messages_de.properties");

    assert!(matches!(result, Err(MtfError::IoFailure { .. })));
    assert_eq!(mtf.filename(), "messages_fr.properties");
}

#[test]
fn test_rename_refuses_existing_target() {
    let temp_dir = TempDir::new().unwrap();
    let mut mtf = create_test_bundle();
    mtf.save_to_disk(&DefaultBundleWriter::default(), temp_dir.path()).unwrap();
    std::fs::write(temp_dir.path().join("messages_de.properties"), "x=1\n").unwrap();

    assert!(mtf.rename_on_disk(temp_dir.path(), "messages_de.properties").is_err());
    assert_eq!(mtf.filename(), "messages_fr.properties");
    assert_eq!(
        std::fs::read_to_string(temp_dir.path().join("messages_de.properties")).unwrap(),
        "x=1\n"
    );
}
