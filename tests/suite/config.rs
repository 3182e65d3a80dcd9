//! Config loading and filter persistence.

use pairdeck_config::{PairdeckConfig, persist_filter_at};
use pairdeck_engine::{App, AppSettings};
use pairdeck_types::ConfidenceFilter;
use tempfile::tempdir;

use crate::common::{candidate_json, start_matcher, wait_until};

#[test]
fn settings_follow_config_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
[review]
filter = "low"
source_id = "cam-9"

[gesture]
pixels_per_column = 10.0

[app]
ascii_only = true
"#,
    )
    .unwrap();

    let config = PairdeckConfig::load_from(&path).unwrap().unwrap();
    let settings = AppSettings::from_config(Some(&config));
    assert_eq!(settings.filter, ConfidenceFilter::Low);
    assert_eq!(settings.source.source_id.as_deref(), Some("cam-9"));
    assert!((settings.pixels_per_column - 10.0).abs() < f32::EPSILON);
    assert!(settings.ui.ascii_only);
}

#[test]
fn persisted_filter_keeps_other_settings() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "# reviewer setup\n[server]\nbase_url = \"http://matcher:9000\"\n").unwrap();

    persist_filter_at(&path, ConfidenceFilter::High).unwrap();

    let raw = std::fs::read_to_string(&path).unwrap();
    assert!(raw.contains("# reviewer setup"));
    let config = PairdeckConfig::load_from(&path).unwrap().unwrap();
    assert_eq!(config.confidence_filter(), ConfidenceFilter::High);
    assert_eq!(
        config.server.as_ref().and_then(|s| s.base_url.as_deref()),
        Some("http://matcher:9000")
    );
}

#[tokio::test]
async fn filter_choice_survives_restart() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join("config.toml");
    let server = start_matcher(vec![candidate_json("m-1", 0.9), candidate_json("m-2", 0.2)]).await;

    let settings = AppSettings {
        config_path: Some(path.clone()),
        ..AppSettings::from_config(None)
    };
    let backend = pairdeck_backend::HttpBackend::new(&server.uri(), std::time::Duration::from_secs(5)).unwrap();
    let mut app = App::new(std::sync::Arc::new(backend), settings);
    app.reload();
    wait_until(&mut app, |app| !app.machine().is_loading()).await;
    app.select_filter(ConfidenceFilter::Low);

    let config = PairdeckConfig::load_from(&path).unwrap().unwrap();
    let restored = AppSettings::from_config(Some(&config));
    assert_eq!(restored.filter, ConfidenceFilter::Low);
}
