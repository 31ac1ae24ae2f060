//! Config file loading tests

use veracity::config::{load_config, AnalysisConfig, EXAMPLE_CONFIG};
use veracity::text::StopWordPolicy;
use veracity::Analyzer;

#[test]
fn test_explicit_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("veracity.toml");
    std::fs::write(
        &path,
        "[vocabulary]\nstop_words = \"exclude\"\n\n[display]\ntop_words = 5\n",
    )
    .unwrap();

    let config = load_config(Some(&path)).unwrap();
    assert_eq!(config.vocabulary.stop_words, StopWordPolicy::Exclude);
    assert_eq!(config.display.top_words, 5);
    assert_eq!(config.overuse.ratio, 5.0);
}

#[test]
fn test_invalid_explicit_config_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("veracity.toml");
    std::fs::write(&path, "[overuse]\nratio = \"high\"\n").unwrap();
    assert!(load_config(Some(&path)).is_err());
}

#[test]
fn test_data_paths_resolve_next_to_config() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("ref.tsv"), "news\t10\nreport\t5\n").unwrap();
    std::fs::write(dir.path().join("terms.txt"), "outrage\n").unwrap();
    let path = dir.path().join("veracity.toml");
    std::fs::write(
        &path,
        "[reference]\npath = \"ref.tsv\"\n\n[lexicon]\npath = \"terms.txt\"\n",
    )
    .unwrap();

    let config = load_config(Some(&path)).unwrap();
    let analyzer = Analyzer::from_config(config).unwrap();
    assert_eq!(analyzer.extractor().reference().vocabulary_size(), 2);
    let result = analyzer
        .analyze_text("The news report caused outrage.")
        .unwrap();
    assert!(result.problematic_elements.suspicious_words.contains("outrage"));
}

#[test]
fn test_missing_data_file_fails_analyzer_construction() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = AnalysisConfig::default();
    config.reference.path = Some(dir.path().join("nope.tsv"));
    let err = Analyzer::from_config(config).err().unwrap();
    assert!(format!("{:#}", err).contains("nope.tsv"));
}

#[test]
fn test_example_config_is_valid() {
    let config = AnalysisConfig::from_toml(EXAMPLE_CONFIG).unwrap();
    assert!(config.validate().is_ok());
    assert_eq!(config.vocabulary.stop_words, StopWordPolicy::Include);
}
