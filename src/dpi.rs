//! Print-resolution hints stored in image containers.

use crate::decoder::DecodedExif;

const CM_PER_INCH: f64 = 2.54;
const METRES_PER_INCH: f64 = 0.0254;
const PNG_SIGNATURE: &[u8] = b"\x89PNG\r\n\x1a\n";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dpi {
    pub x: f64,
    pub y: f64,
}

impl Dpi {
    /// `"<x>x<y> dpi"` with fractional parts truncated.
    pub fn label(&self) -> String {
        format!("{}x{} dpi", self.x.trunc() as i64, self.y.trunc() as i64)
    }
}

const JPEG_DEFAULT_DPI: f64 = 72.0;

/// Resolution hint per container format. `exif` is `None` when the file has
/// no readable EXIF block.
///
/// JPEG without a JFIF density falls back to [`from_jpeg_exif`]; TIFF reads
/// its resolution tags; PNG and BMP only use their own headers.
pub fn detect(bytes: &[u8], exif: Option<&DecodedExif>) -> Option<Dpi> {
    if bytes.starts_with(&[0xFF, 0xD8]) {
        jfif(bytes).or_else(|| exif.map(from_jpeg_exif))
    } else if is_tiff(bytes) {
        exif.and_then(from_exif)
    } else {
        from_container(bytes)
    }
}

fn is_tiff(bytes: &[u8]) -> bool {
    bytes.starts_with(b"II*\0") || bytes.starts_with(b"MM\0*")
}

pub fn from_container(bytes: &[u8]) -> Option<Dpi> {
    if bytes.starts_with(&[0xFF, 0xD8]) {
        jfif(bytes)
    } else if bytes.starts_with(PNG_SIGNATURE) {
        png_phys(bytes)
    } else if bytes.starts_with(b"BM") {
        bmp(bytes)
    } else {
        None
    }
}

/// JPEG EXIF fallback: `XResolution` for both axes, centimetres converted,
/// and 72 dpi when the resolution or its unit is missing or unusable.
pub fn from_jpeg_exif(exif: &DecodedExif) -> Dpi {
    let value = match (exif.x_resolution, exif.resolution_unit) {
        (Some(x), Some(3)) if x.is_finite() => x * CM_PER_INCH,
        (Some(x), Some(_)) if x.is_finite() => x,
        _ => JPEG_DEFAULT_DPI,
    };
    Dpi { x: value, y: value }
}

/// TIFF resolution tags; the unit defaults to inches when absent.
pub fn from_exif(exif: &DecodedExif) -> Option<Dpi> {
    let (x, y) = (exif.x_resolution?, exif.y_resolution?);
    match exif.resolution_unit {
        None | Some(2) => Some(Dpi { x, y }),
        Some(3) => Some(Dpi {
            x: x * CM_PER_INCH,
            y: y * CM_PER_INCH,
        }),
        Some(_) => None,
    }
}

fn be_u16(b: &[u8]) -> u16 {
    u16::from_be_bytes([b[0], b[1]])
}

fn be_u32(b: &[u8]) -> u32 {
    u32::from_be_bytes([b[0], b[1], b[2], b[3]])
}

fn jfif(bytes: &[u8]) -> Option<Dpi> {
    let mut pos = 2;
    while pos + 4 <= bytes.len() {
        if bytes[pos] != 0xFF {
            return None;
        }
        let marker = bytes[pos + 1];
        // SOS or EOI: no more header segments.
        if marker == 0xDA || marker == 0xD9 {
            return None;
        }
        let len = be_u16(&bytes[pos + 2..]) as usize;
        let body = bytes.get(pos + 4..pos + 2 + len)?;
        if marker == 0xE0 && body.len() >= 12 && body.starts_with(b"JFIF\0") {
            let x = be_u16(&body[8..]) as f64;
            let y = be_u16(&body[10..]) as f64;
            return match body[7] {
                1 => Some(Dpi { x, y }),
                2 => Some(Dpi {
                    x: x * CM_PER_INCH,
                    y: y * CM_PER_INCH,
                }),
                _ => None,
            };
        }
        pos += 2 + len;
    }
    None
}

fn png_phys(bytes: &[u8]) -> Option<Dpi> {
    let mut pos = PNG_SIGNATURE.len();
    while pos + 8 <= bytes.len() {
        let len = be_u32(&bytes[pos..]) as usize;
        let kind = &bytes[pos + 4..pos + 8];
        if kind == b"IDAT" || kind == b"IEND" {
            return None;
        }
        let data = bytes.get(pos + 8..pos + 8 + len)?;
        if kind == b"pHYs" && data.len() >= 9 {
            if data[8] != 1 {
                return None;
            }
            return Some(Dpi {
                x: be_u32(&data[0..]) as f64 * METRES_PER_INCH,
                y: be_u32(&data[4..]) as f64 * METRES_PER_INCH,
            });
        }
        // length, type, data, crc
        pos += 12 + len;
    }
    None
}

fn bmp(bytes: &[u8]) -> Option<Dpi> {
    let header = bytes.get(14..46)?;
    let header_size = u32::from_le_bytes([header[0], header[1], header[2], header[3]]);
    if header_size < 40 {
        return None;
    }
    let x = i32::from_le_bytes([header[24], header[25], header[26], header[27]]);
    let y = i32::from_le_bytes([header[28], header[29], header[30], header[31]]);
    if x <= 0 || y <= 0 {
        return None;
    }
    Some(Dpi {
        x: x as f64 * METRES_PER_INCH,
        y: y as f64 * METRES_PER_INCH,
    })
}
