use super::*;

#[test]
fn defaults_match_documented_values() {
    let settings = CompactionSettings::default();
    assert!(settings.enabled);
    assert_eq!(settings.reserve_tokens, 16_384);
    assert_eq!(settings.keep_recent_tokens, 20_000);
}

#[test]
fn config_should_compact_delegates_to_token_threshold() {
    let config = CompactionConfig { context_window: 100_000, mode: CompactionMode::Auto, settings: CompactionSettings::default() };
    assert!(!config.should_compact(50_000));
    assert!(config.should_compact(90_000));
}
