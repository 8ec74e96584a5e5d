// src/metadata.rs

use serde::{Deserialize, Serialize};

/// Placeholder written for fields that could not be determined.
pub const NOT_AVAILABLE: &str = "N/A";

const SIZE_UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct GpsPosition {
    pub lat: f64,
    pub lon: f64,
}

/// One entry of the sidecar file. Key names are the French display labels
/// the gallery front-end reads.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ImageRecord {
    pub label: String,
    #[serde(rename = "largeur")]
    pub width: u32,
    #[serde(rename = "hauteur")]
    pub height: u32,
    #[serde(rename = "résolution")]
    pub resolution: String,
    #[serde(rename = "taille")]
    pub size: String,
    #[serde(rename = "position GPS")]
    pub gps_position: Option<GpsPosition>,
    #[serde(rename = "lieu")]
    pub place: Option<String>,
    #[serde(rename = "horodatage de création")]
    pub creation_timestamp: String,
    pub date: String,
    #[serde(rename = "heure")]
    pub time: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Renders a byte count with binary units, e.g. `1.50 KB`.
pub fn format_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 B".to_string();
    }
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < SIZE_UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{:.2} {}", value, SIZE_UNITS[unit])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_bytes_is_literal() {
        assert_eq!(format_size(0), "0 B");
    }

    #[test]
    fn picks_unit_by_repeated_division() {
        assert_eq!(format_size(1), "1.00 B");
        assert_eq!(format_size(1023), "1023.00 B");
        assert_eq!(format_size(1024), "1.00 KB");
        assert_eq!(format_size(1536), "1.50 KB");
        assert_eq!(format_size(5 * 1024 * 1024), "5.00 MB");
        assert_eq!(format_size(3 * 1024u64.pow(3)), "3.00 GB");
        assert_eq!(format_size(1024u64.pow(4)), "1.00 TB");
    }

    #[test]
    fn clamps_to_terabytes() {
        assert_eq!(format_size(2048 * 1024u64.pow(4)), "2048.00 TB");
    }

    #[test]
    fn value_stays_below_1024_until_largest_unit() {
        for bytes in [1u64, 999, 4096, 10_000_000, 123_456_789_012] {
            let rendered = format_size(bytes);
            let (value, unit) = rendered.split_once(' ').unwrap();
            let value: f64 = value.parse().unwrap();
            assert!(value < 1024.0, "{}", rendered);
            let expected = ((bytes as f64).ln() / 1024f64.ln()).floor() as usize;
            assert_eq!(unit, SIZE_UNITS[expected.min(4)]);
        }
    }

    #[test]
    fn serializes_with_display_labels() {
        let record = ImageRecord {
            label: "a.jpg".into(),
            width: 4,
            height: 3,
            resolution: NOT_AVAILABLE.into(),
            size: "1.00 KB".into(),
            gps_position: None,
            place: None,
            creation_timestamp: "2025:07:15 14:30:00".into(),
            date: "15/07/2025".into(),
            time: "14:30:00".into(),
            url: None,
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["largeur"], 4);
        assert_eq!(json["résolution"], "N/A");
        assert!(json["position GPS"].is_null());
        assert!(json["lieu"].is_null());
        assert_eq!(json["horodatage de création"], "2025:07:15 14:30:00");
        assert_eq!(json["heure"], "14:30:00");
        assert!(json.get("url").is_none());
    }
}
