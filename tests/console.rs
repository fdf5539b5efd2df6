use assert_cmd::Command;
use httpmock::MockServer;
use predicates::str::contains;
use serde_json::json;
use tempfile::TempDir;

fn pixdeck(config_home: &TempDir) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("pixdeck"));
    cmd.env_remove("PIXDECK_URL")
        .env("HOME", config_home.path())
        .env("XDG_CONFIG_HOME", config_home.path())
        .env("APPDATA", config_home.path());
    cmd
}

#[test]
fn status_command_prints_formatted_stats() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method("GET").path("/api/status");
        then.status(200)
            .header("content-type", "application/json")
            .body(
                r#"{
                    "firmware_version": "2.1.0",
                    "mac": "aa:bb:cc:dd:ee:ff",
                    "free_heap": 115000,
                    "free_spiram": 2097152,
                    "min_free_heap": 98304,
                    "images_loaded": 7,
                    "diag_events_enabled": true,
                    "temperature_c": 41.25
                }"#,
            );
    });

    let home = TempDir::new().expect("tmp dir");
    pixdeck(&home)
        .args(["--url", server.base_url().as_str(), "status"])
        .assert()
        .success()
        .stdout(contains("2.1.0"))
        .stdout(contains("112.3 KB"))
        .stdout(contains("2.0 MB"))
        .stdout(contains("41.2 °C"));
    mock.assert();
}

#[test]
fn diag_command_formats_uptime() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method("GET").path("/api/diag");
        then.status(200)
            .header("content-type", "application/json")
            .body(
                r#"{
                    "heap_trend": [
                        {"uptime_ms": 90000, "internal_free": 118000, "internal_min": 109000}
                    ],
                    "recent_events": [],
                    "ota_history": []
                }"#,
            );
    });

    let home = TempDir::new().expect("tmp dir");
    pixdeck(&home)
        .args(["--url", server.base_url().as_str(), "diag"])
        .assert()
        .success()
        .stdout(contains("1m 30s"))
        .stdout(contains("No recent events"));
}

#[test]
fn config_set_posts_typed_fields() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method("POST")
            .path("/api/system/config")
            .header("content-type", "application/json")
            .json_body(json!({"hostname": "lobby", "auto_timezone": true}));
        then.status(200)
            .header("content-type", "application/json")
            .body(r#"{"ok":true}"#);
    });

    let home = TempDir::new().expect("tmp dir");
    pixdeck(&home)
        .args([
            "--url",
            server.base_url().as_str(),
            "config",
            "set",
            "hostname=lobby",
            "auto_timezone=true",
        ])
        .assert()
        .success()
        .stdout(contains("Config updated"));
    mock.assert();
}

#[test]
fn failed_request_surfaces_body_text() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method("GET").path("/api/status");
        then.status(404).body("not found");
    });

    let home = TempDir::new().expect("tmp dir");
    pixdeck(&home)
        .args(["--url", server.base_url().as_str(), "status"])
        .assert()
        .failure()
        .stderr(contains("not found"));
}

#[test]
fn use_command_persists_default_board() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method("GET").path("/api/about");
        then.status(200)
            .header("content-type", "application/json")
            .body(r#"{"model":"matrix-64","type":"tronbyt","version":"1.4.0"}"#);
    });

    let home = TempDir::new().expect("tmp dir");
    pixdeck(&home)
        .args(["use", server.base_url().as_str()])
        .assert()
        .success()
        .stdout(contains("Default board set"));

    // The saved URL is picked up without --url or the environment.
    pixdeck(&home)
        .arg("about")
        .assert()
        .success()
        .stdout(contains("matrix-64"));
}

#[test]
fn missing_board_url_fails_fast() {
    let home = TempDir::new().expect("tmp dir");
    pixdeck(&home)
        .arg("status")
        .assert()
        .code(2)
        .stderr(contains("No board URL configured"));
}
