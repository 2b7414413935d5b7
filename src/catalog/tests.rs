use super::*;
use crate::io::DefaultBundleWriter;
use crate::loader::{StaticPlugin, StaticPlugins};
use encoding_rs::UTF_8;
use std::collections::BTreeMap;
use tempfile::TempDir;

/// 创建包含三个语言文件的测试目录
fn create_test_catalog() -> (TempDir, Catalog) {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path().to_path_buf();

    std::fs::write(
        dir.join("app_fr.properties"),
        "bundle.language=fr\nbundle.language.name=Français\ngreeting=Bonjour\n",
    )
    .unwrap();
    std::fs::write(
        dir.join("app_de_DE.properties"),
        "bundle.language=de\nbundle.language.name=Deutsch\ngreeting=Hallo\n",
    )
    .unwrap();
    std::fs::write(dir.join("app_a_b_c_d.properties"), "ignored=1\n").unwrap();
    std::fs::write(dir.join("notes.txt"), "ignored=1\n").unwrap();

    let catalog = Catalog::new(
        Arc::new(dir),
        FilenamePattern::new("app", "properties"),
        BundleLoader::default().with_namespace("ns"),
        Arc::new(EmbeddedDefaultSource::new(b"greeting=Hello\nfarewell=Bye\n".to_vec())),
    );

    (temp_dir, catalog)
}

#[test]
fn test_list_sorted_by_language_name() {
    let (_temp_dir, catalog) = create_test_catalog();

    let bundles = catalog.list().unwrap();
    let names: Vec<_> = bundles.iter().map(|b| b.language_name().unwrap()).collect();

    assert_eq!(names, vec!["Deutsch", "Français"]);
    assert_eq!(bundles[0].identifier().to_string(), "ns:app_de_DE.properties");
}

#[test]
fn test_list_filenames_filters_pattern() {
    let (_temp_dir, catalog) = create_test_catalog();

    assert_eq!(
        catalog.list_filenames().unwrap(),
        vec!["app_de_DE.properties", "app_fr.properties"]
    );
}

#[test]
fn test_list_missing_directory() {
    let temp_dir = TempDir::new().unwrap();
    let catalog = Catalog::new(
        Arc::new(temp_dir.path().join("missing")),
        FilenamePattern::new("app", "properties"),
        BundleLoader::default(),
        Arc::new(EmbeddedDefaultSource::default()),
    );

    assert!(catalog.list().unwrap().is_empty());
}

#[test]
fn test_resolve_identifier() {
    let (_temp_dir, catalog) = create_test_catalog();

    let bundle = catalog.resolve("ns:app_fr.properties").unwrap();
    assert_eq!(bundle.get("greeting").unwrap(), "Bonjour");

    assert_eq!(
        catalog.locale_of("ns:app_de_DE.properties").unwrap(),
        BundleLocale::new("de").with_country("DE")
    );
}

#[test]
fn test_resolve_does_not_cache() {
    let (_temp_dir, catalog) = create_test_catalog();

    let mut first = catalog.resolve("ns:app_fr.properties").unwrap();
    first.add("greeting", "Salut");
    let second = catalog.resolve("ns:app_fr.properties").unwrap();

    assert_eq!(second.get("greeting").unwrap(), "Bonjour");
    assert!(!second.has_been_edited("greeting"));
}

#[test]
fn test_resolve_malformed_identifiers() {
    let (_temp_dir, catalog) = create_test_catalog();

    for bad in [
        "app_fr.properties",
        "other:app_fr.properties",
        "ns:app_a_b_c_d.properties",
        "ns:messages_fr.properties",
    ] {
        assert!(
            matches!(catalog.resolve(bad), Err(MtfError::MalformedIdentifier(_))),
            "{} 应该被拒绝",
            bad
        );
    }

    assert!(matches!(
        catalog.resolve("ns:app_it.properties"),
        Err(MtfError::IoFailure { .. })
    ));
}

#[test]
fn test_default_bundle() {
    let (_temp_dir, catalog) = create_test_catalog();

    let bundle = catalog.default_bundle().unwrap();

    assert_eq!(bundle.filename(), "app.properties");
    assert_eq!(bundle.get("farewell").unwrap(), "Bye");
    assert_eq!(catalog.identifier_for(bundle.filename()).to_string(), "ns:app.properties");
}

#[test]
fn test_catalog_with_plugins() {
    let temp_dir = TempDir::new().unwrap();
    std::fs::write(temp_dir.path().join("app_fr.properties"), "a=1\n").unwrap();

    let mut fr = BTreeMap::new();
    fr.insert("a".to_string(), "shadowed".to_string());
    fr.insert("plugin.key".to_string(), "valeur".to_string());
    let plugins = StaticPlugins::new().with_plugin(StaticPlugin::new("Forms").with_locale(BundleLocale::new("fr"), fr));

    let catalog = Catalog::new(
        Arc::new(temp_dir.path().to_path_buf()),
        FilenamePattern::new("app", "properties"),
        BundleLoader::new(UTF_8, Arc::new(plugins)),
        Arc::new(EmbeddedDefaultSource::default()),
    );

    let bundle = catalog.resolve("master:app_fr.properties").unwrap();
    assert_eq!(bundle.get("a").unwrap(), "1");
    assert_eq!(bundle.get("plugin.key").unwrap(), "valeur");
}

#[test]
fn test_from_config() {
    let temp_dir = TempDir::new().unwrap();
    let default_path = temp_dir.path().join("default.properties");
    std::fs::write(&default_path, "k=v\n").unwrap();

    let config = EditorConfig {
        language_dir: temp_dir.path().join("languages"),
        prefix: "app".to_string(),
        default_bundle: Some(default_path),
        ..EditorConfig::default()
    };
    let catalog = Catalog::from_config(&config).unwrap();

    assert_eq!(catalog.namespace(), "master");
    assert_eq!(catalog.default_bundle().unwrap().get("k").unwrap(), "v");
}

#[test]
fn test_create_language_file() {
    let (temp_dir, catalog) = create_test_catalog();

    let bundle = catalog.create_language_file("Español", " ES ", "es").unwrap();

    assert_eq!(bundle.filename(), "app_es.properties");
    assert_eq!(bundle.language_code(), Some("es"));
    assert_eq!(bundle.language_name(), Some("Español"));
    assert_eq!(bundle.country(), Some("es"));
    assert!(bundle.language_font().is_empty());

    let text = std::fs::read_to_string(temp_dir.path().join("app_es.properties")).unwrap();
    assert!(text.starts_with("# The 2-letter ISO-639-1 code"));
    assert!(text.contains("#font.name=Courier New,Arial\n"));
}

#[test]
fn test_create_language_file_rejections() {
    let (_temp_dir, catalog) = create_test_catalog();

    assert!(matches!(
        catalog.create_language_file("Français", "fra", "FR"),
        Err(MtfError::InvalidIsoCode(_))
    ));
    assert!(matches!(
        catalog.create_language_file("Français", "fr", "FR"),
        Err(MtfError::LanguageAlreadyTranslated(_))
    ));
    assert!(matches!(
        catalog.create_language_file("Italiano\nbundle.language=fr", "it", "IT"),
        Err(MtfError::LineBreakInValue(_))
    ));
    assert!(!catalog.language_dir().join("app_it.properties").exists());
}

#[test]
fn test_update_language_properties_renames() {
    let (temp_dir, catalog) = create_test_catalog();
    let writer = DefaultBundleWriter::default();
    let mut bundle = catalog.resolve("ns:app_fr.properties").unwrap();

    let path = catalog
        .update_language_properties(&mut bundle, &writer, "Italiano", "it", "IT")
        .unwrap();

    assert_eq!(path, temp_dir.path().join("app_it.properties"));
    assert_eq!(bundle.filename(), "app_it.properties");
    assert!(!temp_dir.path().join("app_fr.properties").exists());

    let reloaded = catalog.resolve("ns:app_it.properties").unwrap();
    assert_eq!(reloaded.language_code(), Some("it"));
    assert_eq!(reloaded.language_name(), Some("Italiano"));
    assert_eq!(reloaded.get("greeting").unwrap(), "Bonjour");
}

#[test]
fn test_update_language_properties_same_code() {
    let (temp_dir, catalog) = create_test_catalog();
    let writer = DefaultBundleWriter::default();
    let mut bundle = catalog.resolve("ns:app_fr.properties").unwrap();

    catalog
        .update_language_properties(&mut bundle, &writer, "French", "fr", "FR")
        .unwrap();

    assert_eq!(bundle.filename(), "app_fr.properties");
    let reloaded = catalog.resolve("ns:app_fr.properties").unwrap();
    assert_eq!(reloaded.language_name(), Some("French"));
    assert_eq!(reloaded.country(), Some("FR"));
    assert!(temp_dir.path().join("app_fr.properties").exists());
}

#[test]
fn test_update_language_properties_conflict() {
    let (_temp_dir, catalog) = create_test_catalog();
    let mut bundle = catalog.resolve("ns:app_fr.properties").unwrap();

    let result = catalog.update_language_properties(&mut bundle, &DefaultBundleWriter::default(), "Deutsch", "de", "DE");

    assert!(matches!(result, Err(MtfError::LanguageAlreadyTranslated(_))));
    assert_eq!(bundle.language_code(), Some("fr"));
}

#[test]
fn test_delete_language_file() {
    let (temp_dir, catalog) = create_test_catalog();

    catalog.delete_language_file("ns:app_fr.properties").unwrap();

    assert!(!temp_dir.path().join("app_fr.properties").exists());
    assert_eq!(catalog.list().unwrap().len(), 1);
}

#[test]
fn test_export_all() {
    let (_temp_dir, catalog) = create_test_catalog();
    let target = TempDir::new().unwrap();

    let written = catalog.export_all(&DefaultBundleWriter::default(), target.path()).unwrap();

    assert_eq!(written.len(), 3);
    assert_eq!(written[0], target.path().join("app.properties"));
    assert_eq!(
        std::fs::read_to_string(target.path().join("app.properties")).unwrap(),
        "greeting=Hello\nfarewell=Bye\n\n"
    );
}
