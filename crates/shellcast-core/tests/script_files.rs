//! Script loading from files on disk.

use std::io::Write;
use std::time::Duration;

use shellcast_core::{Marker, Phase, Script, ScriptError};

fn write_temp(suffix: &str, content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn toml_file_builds_a_playable_sequencer() {
    let file = write_temp(
        ".toml",
        r#"
typing_speed = 10
output_speed = 10
typed_to_output_delay = 0

[[steps]]
command = "npm test"
output = ["✓ 12 passing", "✗ 1 failing"]
post_delay = 0
"#,
    );
    let mut seq = Script::from_toml_file(file.path())
        .unwrap()
        .into_sequencer()
        .unwrap();
    seq.start();
    seq.advance(Duration::from_secs(1));
    assert_eq!(seq.phase(), Phase::Finished);
    let markers: Vec<Marker> = seq
        .snapshot()
        .active_output_lines
        .iter()
        .map(|l| l.marker)
        .collect();
    assert_eq!(markers, vec![Marker::Success, Marker::Failure]);
}

#[test]
fn json_file_with_loop_flag() {
    let file = write_temp(
        ".json",
        r#"{"loop": true, "auto_start": false, "steps": [{"command": "date"}]}"#,
    );
    let script = Script::from_json_file(file.path()).unwrap();
    let cfg = script.sequencer_config();
    assert!(cfg.looping);
    assert!(!cfg.auto_start);
}

#[test]
fn missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = Script::from_toml_file(dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, ScriptError::Io(_)));
}

#[test]
fn empty_command_in_file_is_config_error() {
    let file = write_temp(".toml", "[[steps]]\ncommand = \"\"\n");
    let err = Script::from_toml_file(file.path())
        .unwrap()
        .into_sequencer()
        .unwrap_err();
    assert_eq!(err.to_string(), "invalid script: step 0 has an empty command");
}
