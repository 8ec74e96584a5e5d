use crate::decoder::{self, DecodedExif};
use crate::dpi::{self, Dpi};
use crate::error::AppError;
use exif::Reader;
use std::io::Cursor;
use std::path::Path;
use std::time::SystemTime;

/// Everything read from one image file before any interpretation.
#[derive(Debug, Clone)]
pub struct InspectedImage {
    pub width: u32,
    pub height: u32,
    pub file_size: u64,
    pub exif: DecodedExif,
    pub dpi: Option<Dpi>,
    pub created: Option<SystemTime>,
    pub modified: Option<SystemTime>,
}

/// Reads dimensions, EXIF and resolution from `path`.
///
/// The file is read once and released before this returns. Fails when the
/// content cannot be recognised as an image; missing EXIF is not an error.
pub fn inspect(path: &Path) -> Result<InspectedImage, AppError> {
    let fs_metadata = std::fs::metadata(path)?;
    let bytes = std::fs::read(path)?;

    log::trace!("Getting image dimensions for image: {:?}", path);
    let (width, height) = image::io::Reader::new(Cursor::new(&bytes))
        .with_guessed_format()?
        .into_dimensions()?;
    log::debug!("Dimensions for {:?}: {}x{}", path, width, height);

    log::trace!("Extracting EXIF data for image: {:?}", path);
    let exif = match Reader::new().read_from_container(&mut Cursor::new(&bytes)) {
        Ok(exif) => Some(decoder::decode(exif.fields())),
        Err(e) => {
            log::debug!("No EXIF data found for {:?}: {}", path, e);
            None
        }
    };

    let dpi = dpi::detect(&bytes, exif.as_ref());
    let exif = exif.unwrap_or_default();
    log::trace!("Decoded EXIF tags for {:?}: {:?}", path, exif.tags);
    log::debug!("Resolution hint for {:?}: {:?}", path, dpi);

    Ok(InspectedImage {
        width,
        height,
        file_size: fs_metadata.len(),
        exif,
        dpi,
        created: fs_metadata.created().ok(),
        modified: fs_metadata.modified().ok(),
    })
}
