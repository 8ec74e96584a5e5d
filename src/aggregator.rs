use crate::config::AppConfig;
use crate::error::AppError;
use crate::geocode::ReverseGeocoder;
use crate::metadata::ImageRecord;
use crate::processor;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use std::path::{Path, PathBuf};

/// Serializes the records as one pretty-printed JSON array, replacing
/// whatever was at `path`. Non-ASCII text is written as-is.
pub fn write_records(records: &[ImageRecord], path: &Path) -> Result<(), AppError> {
    let mut buf = Vec::new();
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    records.serialize(&mut ser)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, buf)?;
    Ok(())
}

/// Full run: process the source directory, then write the output file once.
pub fn run_extraction(config: &AppConfig, geocoder: &dyn ReverseGeocoder) -> Result<PathBuf, AppError> {
    let records = processor::start_processing(config, geocoder);
    let output = PathBuf::from(&config.output_path);
    write_records(&records, &output)?;
    log::info!("Metadata extracted to {}", output.display());
    Ok(output)
}
