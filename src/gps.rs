use crate::decoder::GpsTags;
use crate::metadata::GpsPosition;

/// Degrees, minutes and seconds to decimal degrees.
pub fn dms_to_decimal(degrees: f64, minutes: f64, seconds: f64) -> f64 {
    degrees + minutes / 60.0 + seconds / 3600.0
}

/// Signed decimal degrees for one axis. Anything other than exactly
/// `positive_ref` ("N" or "E") puts the value in the negative hemisphere.
pub fn signed_coordinate(dms: &[f64], reference: &str, positive_ref: &str) -> Option<f64> {
    let [degrees, minutes, seconds] = match dms {
        [d, m, s, ..] => [*d, *m, *s],
        _ => return None,
    };
    let value = dms_to_decimal(degrees, minutes, seconds);
    Some(if reference == positive_ref { value } else { -value })
}

/// Builds a position only when latitude, longitude and both references are present.
pub fn position(gps: Option<&GpsTags>) -> Option<GpsPosition> {
    let gps = gps?;
    let latitude = gps.latitude.as_deref()?;
    let latitude_ref = gps.latitude_ref.as_deref()?;
    let longitude = gps.longitude.as_deref()?;
    let longitude_ref = gps.longitude_ref.as_deref()?;

    let lat = signed_coordinate(latitude, latitude_ref, "N");
    let lon = signed_coordinate(longitude, longitude_ref, "E");
    match (lat, lon) {
        (Some(lat), Some(lon)) => Some(GpsPosition { lat, lon }),
        _ => {
            log::warn!("Ignoring GPS block with malformed coordinates: {:?}", gps.tags);
            None
        }
    }
}
