//! EXIF capture details: original capture time and GPS position.

use chrono::{DateTime, FixedOffset, NaiveDate, TimeZone, Utc};
use exif::{Exif, In, Tag, Value};
use mediagate_core::GeoLocation;
use std::io::Cursor;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CaptureDetails {
    pub capture_time: Option<DateTime<Utc>>,
    pub geo_location: Option<GeoLocation>,
}

/// Read capture details from any container kamadak-exif understands
/// (JPEG, TIFF, HEIF, PNG, WebP). Missing or corrupt EXIF yields nothing.
pub fn read_capture_details(data: &[u8]) -> CaptureDetails {
    let exif = match exif::Reader::new().read_from_container(&mut Cursor::new(data)) {
        Ok(exif) => exif,
        Err(e) => {
            tracing::trace!(error = %e, "No readable EXIF block");
            return CaptureDetails::default();
        }
    };

    CaptureDetails {
        capture_time: capture_time(&exif),
        geo_location: geo_location(&exif),
    }
}

fn first_ascii(exif: &Exif, tag: Tag) -> Option<&[u8]> {
    match exif.get_field(tag, In::PRIMARY)?.value {
        Value::Ascii(ref parts) => parts.first().map(Vec::as_slice),
        _ => None,
    }
}

/// `DateTimeOriginal`, shifted by `OffsetTimeOriginal` when the camera
/// recorded one; otherwise interpreted as UTC.
fn capture_time(exif: &Exif) -> Option<DateTime<Utc>> {
    let mut taken = exif::DateTime::from_ascii(first_ascii(exif, Tag::DateTimeOriginal)?).ok()?;
    if let Some(offset) = first_ascii(exif, Tag::OffsetTimeOriginal) {
        if taken.parse_offset(offset).is_err() {
            taken.offset = None;
        }
    }

    let naive = NaiveDate::from_ymd_opt(
        i32::from(taken.year),
        u32::from(taken.month),
        u32::from(taken.day),
    )?
    .and_hms_opt(
        u32::from(taken.hour),
        u32::from(taken.minute),
        u32::from(taken.second),
    )?;

    let offset = FixedOffset::east_opt(i32::from(taken.offset.unwrap_or(0)) * 60)?;
    offset
        .from_local_datetime(&naive)
        .single()
        .map(|t| t.with_timezone(&Utc))
}

fn geo_location(exif: &Exif) -> Option<GeoLocation> {
    let latitude = coordinate(exif, Tag::GPSLatitude, Tag::GPSLatitudeRef, b'S')?;
    let longitude = coordinate(exif, Tag::GPSLongitude, Tag::GPSLongitudeRef, b'W')?;

    if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
        return None;
    }

    Some(GeoLocation {
        latitude,
        longitude,
    })
}

/// Degrees/minutes/seconds rationals to signed decimal degrees
fn coordinate(exif: &Exif, value_tag: Tag, ref_tag: Tag, negative_ref: u8) -> Option<f64> {
    let parts = match exif.get_field(value_tag, In::PRIMARY)?.value {
        Value::Rational(ref parts) if parts.len() >= 3 => parts,
        _ => return None,
    };

    let degrees = parts[0].to_f64() + parts[1].to_f64() / 60.0 + parts[2].to_f64() / 3600.0;
    if !degrees.is_finite() {
        return None;
    }

    let negative =
        first_ascii(exif, ref_tag).and_then(|r| r.first().copied()) == Some(negative_ref);
    Some(if negative { -degrees } else { degrees })
}
