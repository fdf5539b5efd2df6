use serde::{Deserialize, Serialize};

use crate::utils::format_uptime;

// ============================================================================
// BOARD PAYLOADS
// ============================================================================

/// `/api/status` — firmware identity and memory snapshot.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BoardStatus {
    pub firmware_version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mac: Option<String>,
    pub free_heap: u64,
    pub free_spiram: u64,
    pub min_free_heap: u64,
    pub images_loaded: u64,
    #[serde(default)]
    pub diag_events_enabled: bool,
    // null when the board has no usable temperature sensor
    #[serde(default)]
    pub temperature_c: Option<f64>,
}

/// `/api/health` — reboot cause and connectivity counters.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BoardHealth {
    pub reboot_reason: String,
    #[serde(default)]
    pub diag_events_enabled: bool,
    #[serde(default)]
    pub temperature_c: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wifi: Option<WifiHealth>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WifiHealth {
    pub connected: bool,
    #[serde(default)]
    pub connection_given_up: bool,
    #[serde(default)]
    pub reconnect_attempts: u64,
    #[serde(default)]
    pub disconnect_events: u64,
    #[serde(default)]
    pub health_disconnect_checks: u64,
}

/// `/api/about` — model identity.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BoardAbout {
    pub model: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub version: String,
}

/// `/api/system/config` — the adjustable board settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SystemConfig {
    pub auto_timezone: bool,
    pub timezone: String,
    pub ntp_server: String,
    pub hostname: String,
    #[serde(default)]
    pub diag_events_enabled: bool,
}

/// `/api/diag` — heap trend and recent event rings.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct DiagReport {
    #[serde(default)]
    pub heap_trend: Vec<HeapTrendPoint>,
    #[serde(default)]
    pub recent_events: Vec<DiagEvent>,
    #[serde(default)]
    pub ota_history: Vec<OtaEvent>,
}

impl DiagReport {
    /// Board uptime in milliseconds, taken from the newest trend sample.
    pub fn uptime_ms(&self) -> Option<u64> {
        self.heap_trend.last().map(|point| point.uptime_ms)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HeapTrendPoint {
    pub uptime_ms: u64,
    pub internal_free: u64,
    pub internal_min: u64,
    #[serde(default)]
    pub spiram_free: u64,
    #[serde(default)]
    pub spiram_min: u64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DiagEvent {
    pub seq: u64,
    pub uptime_ms: u64,
    pub level: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub code: i64,
    pub message: String,
}

impl DiagEvent {
    pub fn formatted_uptime(&self) -> String {
        format_uptime(self.uptime_ms)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OtaEvent {
    pub seq: u64,
    #[serde(rename = "type")]
    pub kind: String,
    pub code: i64,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_deserializes_with_null_temperature() {
        let json = r#"{
            "firmware_version": "2.1.0",
            "mac": "aa:bb:cc:dd:ee:ff",
            "free_heap": 115000,
            "free_spiram": 2097152,
            "min_free_heap": 98304,
            "images_loaded": 7,
            "diag_events_enabled": true,
            "temperature_c": null
        }"#;
        let status: BoardStatus = serde_json::from_str(json).unwrap();
        assert_eq!(status.firmware_version, "2.1.0");
        assert_eq!(status.free_heap, 115_000);
        assert!(status.temperature_c.is_none());
    }

    #[test]
    fn test_diag_uptime_uses_newest_trend_point() {
        let json = r#"{
            "heap_trend": [
                {"uptime_ms": 1000, "internal_free": 120000, "internal_min": 110000},
                {"uptime_ms": 90000, "internal_free": 118000, "internal_min": 109000}
            ],
            "recent_events": [
                {"seq": 1, "uptime_ms": 5000, "level": "warn", "type": "wifi", "code": 2, "message": "reconnect"}
            ]
        }"#;
        let diag: DiagReport = serde_json::from_str(json).unwrap();
        assert_eq!(diag.uptime_ms(), Some(90_000));
        assert_eq!(diag.recent_events[0].formatted_uptime(), "5s");
        assert!(diag.ota_history.is_empty());
    }
}
