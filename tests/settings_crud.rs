mod support;

use proxypal_lib::test_support;
use support::TestApp;

#[test]
fn missing_settings_file_yields_defaults() {
    let app = TestApp::new();
    let handle = app.handle();

    let settings = test_support::settings_read_json(&handle).expect("read settings");
    assert_eq!(settings["port"], 8317);
    assert_eq!(settings["autoStart"], true);
    assert_eq!(settings["closeToTray"], true);
    assert_eq!(settings["proxyApiKey"], "proxypal-local");
    assert_eq!(settings["proxyBinary"], "cli-proxy-api");
}

#[test]
fn settings_roundtrip_persists_to_config_json() {
    let app = TestApp::new();
    let handle = app.handle();

    let mut settings = test_support::settings_read_json(&handle).expect("read settings");
    settings["port"] = serde_json::json!(9000);
    settings["autoStart"] = serde_json::json!(false);
    settings["debug"] = serde_json::json!(true);

    let written = test_support::settings_write_json(&handle, settings).expect("write settings");
    assert_eq!(written["port"], 9000);
    assert_eq!(written["autoStart"], false);
    assert_eq!(written["debug"], true);

    let path = test_support::settings_path(&handle).expect("settings path");
    assert!(path.is_file());

    let reread = test_support::settings_read_json(&handle).expect("re-read settings");
    assert_eq!(reread, written);
}

#[test]
fn corrupt_settings_file_falls_back_to_defaults() {
    let app = TestApp::new();
    let handle = app.handle();

    let path = test_support::settings_path(&handle).expect("settings path");
    std::fs::write(&path, "{not json").expect("write corrupt settings");

    let settings = test_support::settings_read_json(&handle).expect("read settings");
    assert_eq!(settings["port"], 8317);
    assert_eq!(settings["autoStart"], true);
}

#[test]
fn settings_write_rejects_a_zero_port() {
    let app = TestApp::new();
    let handle = app.handle();

    let mut settings = test_support::settings_read_json(&handle).expect("read settings");
    settings["port"] = serde_json::json!(0);

    let err = test_support::settings_write_json(&handle, settings).unwrap_err();
    assert!(err.to_string().starts_with("SEC_INVALID_INPUT"));
}

#[test]
fn unknown_fields_are_ignored_on_read() {
    let app = TestApp::new();
    let handle = app.handle();

    let path = test_support::settings_path(&handle).expect("settings path");
    std::fs::write(
        &path,
        r#"{"port": 8400, "legacyField": {"nested": true}}"#,
    )
    .expect("write settings with extra fields");

    let settings = test_support::settings_read_json(&handle).expect("read settings");
    assert_eq!(settings["port"], 8400);
    // Untouched fields come back as defaults.
    assert_eq!(settings["proxyApiKey"], "proxypal-local");
}
