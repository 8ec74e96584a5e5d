//! Turns kamadak-exif fields into a typed record keyed by canonical tag names.
//!
//! GPS tags live in their own context and are collected into a nested
//! [`GpsTags`] block, since their numeric ids overlap with the primary ones.

use exif::{Context, Field, In, Tag, Value};
use std::collections::BTreeMap;

#[derive(Debug, Default, Clone, PartialEq)]
pub struct DecodedExif {
    /// Display values of every primary-image tag, keyed by canonical name
    /// (or the numeric id for tags missing from the name table).
    pub tags: BTreeMap<String, String>,
    pub gps: Option<GpsTags>,
    pub date_time_original: Option<String>,
    pub date_time: Option<String>,
    pub x_resolution: Option<f64>,
    pub y_resolution: Option<f64>,
    pub resolution_unit: Option<u16>,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct GpsTags {
    pub tags: BTreeMap<String, String>,
    pub latitude: Option<Vec<f64>>,
    pub latitude_ref: Option<String>,
    pub longitude: Option<Vec<f64>>,
    pub longitude_ref: Option<String>,
}

/// Canonical name of a tag, or its numeric id when the tag is unknown.
pub fn tag_name(tag: Tag) -> String {
    if tag.description().is_some() {
        tag.to_string()
    } else {
        tag.number().to_string()
    }
}

pub fn decode<'a, I>(fields: I) -> DecodedExif
where
    I: IntoIterator<Item = &'a Field>,
{
    let mut decoded = DecodedExif::default();

    for field in fields {
        // IFD1 describes the embedded thumbnail.
        if field.ifd_num != In::PRIMARY {
            continue;
        }
        let name = tag_name(field.tag);
        let display = field.display_value().to_string();

        if field.tag.context() == Context::Gps {
            let gps = decoded.gps.get_or_insert_with(GpsTags::default);
            match field.tag {
                Tag::GPSLatitude => gps.latitude = numbers(&field.value),
                Tag::GPSLatitudeRef => gps.latitude_ref = ascii(&field.value),
                Tag::GPSLongitude => gps.longitude = numbers(&field.value),
                Tag::GPSLongitudeRef => gps.longitude_ref = ascii(&field.value),
                _ => {}
            }
            gps.tags.insert(name, display);
            continue;
        }

        match field.tag {
            Tag::DateTimeOriginal => decoded.date_time_original = ascii(&field.value),
            Tag::DateTime => decoded.date_time = ascii(&field.value),
            Tag::XResolution => decoded.x_resolution = numbers(&field.value).and_then(first),
            Tag::YResolution => decoded.y_resolution = numbers(&field.value).and_then(first),
            Tag::ResolutionUnit => decoded.resolution_unit = field.value.get_uint(0).map(|v| v as u16),
            Tag::GPSInfoIFDPointer => {
                decoded.gps.get_or_insert_with(GpsTags::default);
                continue;
            }
            _ => {}
        }
        decoded.tags.insert(name, display);
    }

    decoded
}

fn first(values: Vec<f64>) -> Option<f64> {
    values.first().copied()
}

/// First ASCII string of a value, padding kept; empty strings count as absent.
fn ascii(value: &Value) -> Option<String> {
    match value {
        Value::Ascii(vecs) => vecs
            .first()
            .map(|v| String::from_utf8_lossy(v).trim_end_matches('\0').to_string())
            .filter(|s| !s.is_empty()),
        _ => None,
    }
}

fn numbers(value: &Value) -> Option<Vec<f64>> {
    let values: Vec<f64> = match value {
        Value::Rational(v) => v.iter().map(|r| r.to_f64()).collect(),
        Value::SRational(v) => v.iter().map(|r| r.to_f64()).collect(),
        Value::Float(v) => v.iter().map(|f| *f as f64).collect(),
        Value::Double(v) => v.clone(),
        _ => return None,
    };
    if values.is_empty() {
        None
    } else {
        Some(values)
    }
}
