// =====
// TESTS: 2
// =====
//
// The configuration surface is the only state the engine persists.

use chatfill::config::{FillConfig, IndicatorMode, MeasureUnit};
use pretty_assertions::assert_eq;
use std::io::Write as _;

#[test]
fn config_round_trips_through_disk() {
    let cfg = FillConfig {
        indent: 33,
        max_indent: Some(48),
        margin: 10,
        merge: true,
        indicator: IndicatorMode::Post,
        unit: MeasureUnit::Chars,
        ..FillConfig::default()
    };

    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(serde_json::to_string_pretty(&cfg).unwrap().as_bytes()).unwrap();
    let raw = std::fs::read_to_string(file.path()).unwrap();
    let back: FillConfig = serde_json::from_str(&raw).unwrap();
    assert_eq!(back, cfg);
}

#[test]
fn stored_partial_config_upgrades_with_defaults() {
    // older on-disk configs may predate newer fields
    let back: FillConfig = serde_json::from_str(r#"{"indent": 24, "merge": false}"#).unwrap();
    assert_eq!(back.indent, 24);
    assert!(!back.merge);
    assert_eq!(back.indicator, IndicatorMode::None);
    assert_eq!(back.unit, MeasureUnit::Cells);
}
