use crate::config::AppConfig;
use crate::date;
use crate::error::AppError;
use crate::geocode::{GeocodeOutcome, ReverseGeocoder};
use crate::gps;
use crate::inspector;
use crate::metadata::{format_size, GpsPosition, ImageRecord, NOT_AVAILABLE};
use crate::walker;
use std::path::Path;
use url::Url;

/// Processes every image in the configured source directory, one at a time,
/// in scan order. Files that cannot be read as images are logged and skipped.
/// A missing source directory yields an empty collection.
pub fn start_processing(
    config: &AppConfig,
    geocoder: &dyn ReverseGeocoder,
) -> Vec<ImageRecord> {
    let source = Path::new(&config.source_directory);
    let paths = match walker::scan_directory(source, config.extension_set()) {
        Ok(paths) => paths,
        Err(e) => {
            log::warn!("{}", e);
            return Vec::new();
        }
    };

    let mut records = Vec::new();
    for path in paths {
        log::info!("Processing image started for: {:?}", path);
        match process_image(config, &path, geocoder) {
            Ok(record) => {
                log::trace!("Extracted metadata for {:?}: {:?}", path, record);
                records.push(record);
                log::info!("Processing image finished for: {:?}", path);
            }
            Err(e) => {
                log::warn!("Error processing {:?}: {}", path, e);
            }
        }
    }

    log::info!("All images processed: {} records.", records.len());
    records
}

pub fn process_image(
    config: &AppConfig,
    path: &Path,
    geocoder: &dyn ReverseGeocoder,
) -> Result<ImageRecord, AppError> {
    let label = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| AppError::Generic(format!("No file name in {:?}", path)))?;

    let inspected = inspector::inspect(path)?;

    let gps_position = gps::position(inspected.exif.gps.as_ref());
    let place = gps_position.and_then(|position| locate(geocoder, &label, position));

    let creation_timestamp = date::creation_timestamp(&inspected.exif, || {
        date::filesystem_timestamp(inspected.created, inspected.modified)
    });
    let shown = date::display(&creation_timestamp);

    let url = config
        .remote_base_url
        .as_deref()
        .and_then(|base| match remote_url(base, &label) {
            Ok(url) => Some(url),
            Err(e) => {
                log::warn!("Cannot build remote URL for {} from {:?}: {}", label, base, e);
                None
            }
        });

    Ok(ImageRecord {
        label,
        width: inspected.width,
        height: inspected.height,
        resolution: inspected
            .dpi
            .map(|dpi| dpi.label())
            .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        size: format_size(inspected.file_size),
        gps_position,
        place,
        creation_timestamp,
        date: shown.date,
        time: shown.time,
        url,
    })
}

fn locate(geocoder: &dyn ReverseGeocoder, label: &str, position: GpsPosition) -> Option<String> {
    log::debug!("GPS position for {}: {}, {}", label, position.lat, position.lon);
    match geocoder.reverse(position.lat, position.lon) {
        GeocodeOutcome::Found(name) => {
            log::debug!("Place for {}: {}", label, name);
            Some(name)
        }
        GeocodeOutcome::NotFound => {
            log::debug!("No place found for {}", label);
            None
        }
        GeocodeOutcome::TimedOut => {
            log::warn!("Geocoding error for {}: request timed out", label);
            None
        }
        GeocodeOutcome::Failed(cause) => {
            log::warn!("Geocoding error for {}: {}", label, cause);
            None
        }
    }
}

/// `base` joined with the file name; a trailing slash is assumed on `base`.
pub fn remote_url(base: &str, label: &str) -> Result<String, AppError> {
    let mut base = base.to_string();
    if !base.ends_with('/') {
        base.push('/');
    }
    Ok(Url::parse(&base)?.join(label)?.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_url_joins_and_encodes() {
        assert_eq!(
            remote_url("https://cdn.example.org/album", "IMG 001.jpg").unwrap(),
            "https://cdn.example.org/album/IMG%20001.jpg"
        );
        assert_eq!(
            remote_url("https://cdn.example.org/album/", "a.png").unwrap(),
            "https://cdn.example.org/album/a.png"
        );
        assert!(remote_url("not a url", "a.png").is_err());
    }

    #[test]
    fn missing_directory_gives_empty_collection() {
        let config = AppConfig {
            source_directory: "/nonexistent/photos".into(),
            ..AppConfig::default()
        };
        assert!(start_processing(&config, &crate::geocode::OfflineGeocoder).is_empty());
    }
}
