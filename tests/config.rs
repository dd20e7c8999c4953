use std::io::Write;

use pixelstack::config::{Config, CropConfig, Rgb};
use pixelstack::error::Error;

#[test]
fn loads_partial_config_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, r#"{{ "crop": {{ "line_color": [255, 0, 255], "min_crop_px": 8 }}, "prompt": {{ "num_masks": 3 }} }}"#)
        .unwrap();

    let cfg = Config::load(file.path()).unwrap();
    assert_eq!(cfg.crop.line_color, Rgb(255, 0, 255));
    assert_eq!(cfg.crop.min_crop_px, 8);
    assert_eq!(cfg.crop.render_height, CropConfig::default().render_height);
    assert_eq!(cfg.prompt.num_masks, 3);
    assert_eq!(cfg.prompt.initial_mask, 1);
}

#[test]
fn bad_json_is_a_config_error() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "{{ not json").unwrap();
    assert!(matches!(Config::load(file.path()), Err(Error::Config(_))));
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(Config::load(dir.path().join("nope.json")), Err(Error::Io(_))));
}

#[test]
fn config_round_trips_through_json() {
    let cfg = Config::default();
    let text = serde_json::to_string(&cfg).unwrap();
    let back: Config = serde_json::from_str(&text).unwrap();
    assert_eq!(back, cfg);
}
