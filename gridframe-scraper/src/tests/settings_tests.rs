use super::*;

fn no_env(_: &str) -> Option<String> {
    None
}

#[test]
fn test_load_missing_file_gives_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let settings = Settings::load_from(&dir.path().join("settings.json"));
    assert_eq!(settings, Settings::default());
    assert_eq!(settings.console(), SELECT_CONSOLE);
}

#[test]
fn test_load_malformed_file_gives_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.json");
    std::fs::write(&path, "{ not json").unwrap();
    assert_eq!(Settings::load_from(&path), Settings::default());
}

#[test]
fn test_load_reference_keys() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.json");
    std::fs::write(
        &path,
        r#"{
  "api_key": " abc ",
  "selected_console": "NES",
  "output_folder": "/tmp/out",
  "overlays_folder": "/tmp/overlays"
}"#,
    )
    .unwrap();

    let settings = Settings::load_from(&path);
    assert_eq!(settings.api_key(), "abc");
    assert_eq!(settings.console(), "NES");
    assert_eq!(settings.output_root(), PathBuf::from("/tmp/out"));
    assert_eq!(settings.overlays_root(), PathBuf::from("/tmp/overlays"));
}

#[test]
fn test_save_then_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("settings.json");
    let settings = Settings {
        api_key: "key".to_string(),
        selected_console: "GBA".to_string(),
        output_folder: Some(PathBuf::from("out")),
        overlays_folder: None,
    };
    settings.save_to(&path).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.contains("\n  \"api_key\": \"key\""));
    assert!(!text.contains("overlays_folder"));
    assert!(!path.with_extension("json.tmp").exists());
    assert_eq!(Settings::load_from(&path), settings);
}

#[test]
fn test_env_overrides_file() {
    let file = Settings {
        api_key: "from-file".to_string(),
        output_folder: Some(PathBuf::from("file-out")),
        ..Default::default()
    };
    let env = |var: &str| match var {
        API_KEY_ENV => Some("from-env".to_string()),
        OVERLAYS_ENV => Some("env-overlays".to_string()),
        OUTPUT_ENV => Some("  ".to_string()),
        _ => None,
    };

    let effective = file.clone().with_env(env);
    assert_eq!(effective.api_key(), "from-env");
    assert_eq!(effective.output_root(), PathBuf::from("file-out"));
    assert_eq!(effective.overlays_root(), PathBuf::from("env-overlays"));

    let sources = sources_for(&file, env);
    assert_eq!(sources.api_key, SettingSource::EnvVar(API_KEY_ENV));
    assert_eq!(sources.output_folder, SettingSource::SettingsFile);
    assert_eq!(sources.overlays_folder, SettingSource::EnvVar(OVERLAYS_ENV));
    assert_eq!(sources.selected_console, SettingSource::Missing);
}

#[test]
fn test_sources_defaults() {
    let sources = sources_for(&Settings::default(), no_env);
    assert_eq!(sources.api_key, SettingSource::Missing);
    assert_eq!(sources.output_folder, SettingSource::Default);
    assert_eq!(sources.overlays_folder, SettingSource::Default);
}

#[test]
fn test_default_roots_are_relative_to_working_dir() {
    let settings = Settings::default();
    assert!(settings.output_root().ends_with(DEFAULT_OUTPUT_DIR));
    assert!(settings.overlays_root().ends_with(DEFAULT_OVERLAYS_DIR));
}
