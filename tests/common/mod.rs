#![allow(dead_code)]

use image::{DynamicImage, ImageOutputFormat, RgbImage};
use image_metadata::geocode::{GeocodeOutcome, ReverseGeocoder};
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::io::Cursor;
use std::path::Path;

pub const TAG_DATE_TIME: u16 = 0x0132;
pub const TAG_GPS_IFD: u16 = 0x8825;
pub const GPS_LATITUDE_REF: u16 = 1;
pub const GPS_LATITUDE: u16 = 2;
pub const GPS_LONGITUDE_REF: u16 = 3;
pub const GPS_LONGITUDE: u16 = 4;

pub enum ExifValue {
    Ascii(&'static str),
    Rationals(Vec<(u32, u32)>),
}

/// Little-endian TIFF block with IFD0 entries and an optional GPS IFD.
/// Entries must be given in ascending tag order.
pub fn tiff(ifd0: Vec<(u16, ExifValue)>, gps: Option<Vec<(u16, ExifValue)>>) -> Vec<u8> {
    let ifd0_count = ifd0.len() + usize::from(gps.is_some());
    let ifd0_offset = 8u32;
    let ifd0_data_offset = ifd0_offset + ifd_size(ifd0_count);
    let (mut ifd0_entries, ifd0_data) = encode_entries(&ifd0, ifd0_data_offset);

    let gps_offset = ifd0_data_offset + ifd0_data.len() as u32;
    if gps.is_some() {
        ifd0_entries.push(entry(TAG_GPS_IFD, 4, 1, gps_offset.to_le_bytes()));
    }

    let mut out = Vec::new();
    out.extend_from_slice(b"II");
    out.extend_from_slice(&42u16.to_le_bytes());
    out.extend_from_slice(&ifd0_offset.to_le_bytes());
    write_ifd(&mut out, ifd0_entries, &ifd0_data);

    if let Some(gps) = gps {
        let gps_data_offset = gps_offset + ifd_size(gps.len());
        let (gps_entries, gps_data) = encode_entries(&gps, gps_data_offset);
        write_ifd(&mut out, gps_entries, &gps_data);
    }
    out
}

fn ifd_size(count: usize) -> u32 {
    (2 + 12 * count + 4) as u32
}

fn entry(tag: u16, kind: u16, count: u32, value: [u8; 4]) -> Vec<u8> {
    let mut e = Vec::with_capacity(12);
    e.extend_from_slice(&tag.to_le_bytes());
    e.extend_from_slice(&kind.to_le_bytes());
    e.extend_from_slice(&count.to_le_bytes());
    e.extend_from_slice(&value);
    e
}

fn encode_entries(entries: &[(u16, ExifValue)], data_offset: u32) -> (Vec<Vec<u8>>, Vec<u8>) {
    let mut encoded = Vec::new();
    let mut data = Vec::new();
    for (tag, value) in entries {
        match value {
            ExifValue::Ascii(s) => {
                let mut bytes = s.as_bytes().to_vec();
                bytes.push(0);
                let count = bytes.len() as u32;
                if bytes.len() <= 4 {
                    bytes.resize(4, 0);
                    encoded.push(entry(*tag, 2, count, [bytes[0], bytes[1], bytes[2], bytes[3]]));
                } else {
                    let offset = data_offset + data.len() as u32;
                    encoded.push(entry(*tag, 2, count, offset.to_le_bytes()));
                    data.extend_from_slice(&bytes);
                    if data.len() % 2 == 1 {
                        data.push(0);
                    }
                }
            }
            ExifValue::Rationals(values) => {
                let offset = data_offset + data.len() as u32;
                encoded.push(entry(*tag, 5, values.len() as u32, offset.to_le_bytes()));
                for (num, denom) in values {
                    data.extend_from_slice(&num.to_le_bytes());
                    data.extend_from_slice(&denom.to_le_bytes());
                }
            }
        }
    }
    (encoded, data)
}

fn write_ifd(out: &mut Vec<u8>, entries: Vec<Vec<u8>>, data: &[u8]) {
    out.extend_from_slice(&(entries.len() as u16).to_le_bytes());
    for e in entries {
        out.extend_from_slice(&e);
    }
    out.extend_from_slice(&0u32.to_le_bytes());
    out.extend_from_slice(data);
}

pub fn dms(degrees: u32, minutes: u32, seconds: u32) -> ExifValue {
    ExifValue::Rationals(vec![(degrees, 1), (minutes, 1), (seconds, 1)])
}

/// Writes a small JPEG, with the TIFF block spliced in as an APP1 Exif segment.
pub fn write_jpeg(path: &Path, width: u32, height: u32, exif_tiff: Option<Vec<u8>>) {
    let mut jpeg = Vec::new();
    DynamicImage::ImageRgb8(RgbImage::new(width, height))
        .write_to(&mut Cursor::new(&mut jpeg), ImageOutputFormat::Jpeg(90))
        .unwrap();

    if let Some(tiff) = exif_tiff {
        let mut segment = vec![0xFF, 0xE1];
        segment.extend_from_slice(&((2 + 6 + tiff.len()) as u16).to_be_bytes());
        segment.extend_from_slice(b"Exif\0\0");
        segment.extend_from_slice(&tiff);
        let rest = jpeg.split_off(2);
        jpeg.extend(segment);
        jpeg.extend(rest);
    }
    std::fs::write(path, jpeg).unwrap();
}

pub fn write_png(path: &Path, width: u32, height: u32) {
    RgbImage::new(width, height).save(path).unwrap();
}

/// Replays canned outcomes and counts calls.
pub struct ScriptedGeocoder {
    outcomes: RefCell<VecDeque<GeocodeOutcome>>,
    pub calls: Cell<usize>,
}

impl ScriptedGeocoder {
    pub fn new(outcomes: Vec<GeocodeOutcome>) -> Self {
        Self {
            outcomes: RefCell::new(outcomes.into()),
            calls: Cell::new(0),
        }
    }
}

impl ReverseGeocoder for ScriptedGeocoder {
    fn reverse(&self, _lat: f64, _lon: f64) -> GeocodeOutcome {
        self.calls.set(self.calls.get() + 1);
        self.outcomes
            .borrow_mut()
            .pop_front()
            .unwrap_or(GeocodeOutcome::NotFound)
    }
}
