use crate::decoder::DecodedExif;
use crate::metadata::NOT_AVAILABLE;
use chrono::{DateTime, Local};
use std::time::SystemTime;

/// EXIF timestamp layout, also used for filesystem fallbacks.
pub const EXIF_TIMESTAMP_FORMAT: &str = "%Y:%m:%d %H:%M:%S";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayDateTime {
    pub date: String,
    pub time: String,
}

/// `DateTimeOriginal`, then `DateTime`, then the filesystem fallback.
pub fn creation_timestamp<F>(exif: &DecodedExif, fallback: F) -> String
where
    F: FnOnce() -> Option<String>,
{
    exif.date_time_original
        .clone()
        .or_else(|| exif.date_time.clone())
        .or_else(fallback)
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

/// Creation time, or modification time where the platform has no birth time,
/// in local time.
pub fn filesystem_timestamp(created: Option<SystemTime>, modified: Option<SystemTime>) -> Option<String> {
    let time = created.or(modified)?;
    Some(format_system_time(time))
}

pub fn format_system_time(time: SystemTime) -> String {
    DateTime::<Local>::from(time).format(EXIF_TIMESTAMP_FORMAT).to_string()
}

/// Splits on the first space. `YYYY:MM:DD` dates become `DD/MM/YYYY`; other
/// date shapes pass through. `None` when there is no space to split on.
pub fn split_timestamp(timestamp: &str) -> Option<(String, String)> {
    let (raw_date, time) = timestamp.split_once(' ')?;
    let parts: Vec<&str> = raw_date.split(':').collect();
    let date = match parts.as_slice() {
        [year, month, day] => format!("{}/{}/{}", day, month, year),
        _ => raw_date.to_string(),
    };
    Some((date, time.to_string()))
}

pub fn display(timestamp: &str) -> DisplayDateTime {
    match split_timestamp(timestamp) {
        Some((date, time)) => DisplayDateTime { date, time },
        None => {
            log::debug!("Timestamp {:?} has no date/time separator", timestamp);
            DisplayDateTime {
                date: NOT_AVAILABLE.to_string(),
                time: NOT_AVAILABLE.to_string(),
            }
        }
    }
}
