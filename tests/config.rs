use spectral_markers::config::*;
use spectral_markers::data::marker::Axis;
use spectral_markers::error::ConfigError;
use spectral_markers::session::AnalysisSession;

#[test]
fn yaml_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("config.yaml");

    let mut cfg = AnalysisConfig::default();
    cfg.marker_defaults.band_width = 8.0;
    cfg.limits.max_harmonics = 5;
    cfg.base_frequency = 60.0;
    cfg.save_to_path(&path).unwrap();

    let loaded = AnalysisConfig::load_from_path(&path).unwrap();
    assert_eq!(loaded, cfg);
}

#[test]
fn partial_yaml_fills_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.yaml");
    std::fs::write(&path, "base_frequency: 25\nmarker_defaults:\n  band_width: 4\n").unwrap();

    let cfg = AnalysisConfig::load_from_path(&path).unwrap();
    assert_eq!(cfg.base_frequency, 25.0);
    assert_eq!(cfg.marker_defaults.band_width, 4.0);
    assert_eq!(cfg.marker_defaults.side_band_count, 2);
    assert_eq!(cfg.limits, MarkerLimits::default());
}

#[test]
fn missing_file_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(
        AnalysisConfig::load_from_path(&dir.path().join("absent.yaml")),
        Err(ConfigError::Missing { .. })
    ));
}

#[test]
fn session_uses_configured_defaults() {
    let mut cfg = AnalysisConfig::default();
    cfg.marker_defaults.band_width = 3.0;
    cfg.base_frequency = 30.0;
    cfg.limits.max_analysis_name_len = 4;

    let mut s = AnalysisSession::new(cfg);
    let i = s.create_marker(10.0, Some(Axis::X), "").unwrap();
    assert_eq!(s.store().get(i).unwrap().band_width, 3.0);
    assert_eq!(s.view().base_frequency(), 30.0);
    s.set_analysis_name("turbine");
    assert_eq!(s.analysis_name(), "turb");
}
