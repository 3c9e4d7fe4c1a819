//! Media attribute extraction for uploads

use crate::capture::read_capture_details;
use crate::probes::{default_probes, FormatProbe};
use chrono::Utc;
use mediagate_core::{MediaAttributes, MediaKind};

/// Derives `MediaAttributes` from raw bytes and the declared content type.
///
/// Extraction never fails. Anything the probes cannot recognise keeps the
/// content-type derived minimum: kind from the MIME prefix, format from the
/// MIME subtype.
#[derive(Debug, Clone)]
pub struct MetadataExtractor {
    probes: Vec<FormatProbe>,
}

impl Default for MetadataExtractor {
    fn default() -> Self {
        Self::new(default_probes())
    }
}

impl MetadataExtractor {
    /// Extractor with a custom probe list, tried in order
    pub fn new(probes: Vec<FormatProbe>) -> Self {
        Self { probes }
    }

    pub fn extract(&self, data: &[u8], content_type: &str) -> MediaAttributes {
        let upload_time = Utc::now();
        let kind = MediaKind::from_content_type(content_type);

        let detected = self
            .probes
            .iter()
            .find_map(|probe| probe.run(data).map(|found| (probe.name, found)));

        let (format, dimensions) = match detected {
            Some((name, found)) => (name.to_string(), found.dimensions),
            None => (declared_subtype(content_type), None),
        };

        let capture = read_capture_details(data);

        tracing::debug!(
            content_type = %content_type,
            format = %format,
            size_bytes = data.len() as u64,
            detected = detected.is_some(),
            "Media attributes extracted"
        );

        MediaAttributes {
            kind,
            format,
            size_bytes: data.len() as u64,
            width: dimensions.map(|(w, _)| w),
            height: dimensions.map(|(_, h)| h),
            geo_location: capture.geo_location,
            capture_time: capture.capture_time,
            upload_time,
        }
    }
}

/// "image/jpeg; q=1" -> "jpeg"; a value without '/' is kept whole.
fn declared_subtype(content_type: &str) -> String {
    let essence = content_type.split(';').next().unwrap_or_default().trim();
    match essence.split_once('/') {
        Some((_, subtype)) => subtype.trim().to_ascii_lowercase(),
        None => essence.to_ascii_lowercase(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probes::ProbeMatch;
    use chrono::{TimeZone, Utc};
    use exif::experimental::Writer;
    use exif::{Field, In, Rational, Tag, Value};
    use image::{ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};
    use img_parts::jpeg::Jpeg;
    use img_parts::ImageEXIF;
    use std::io::Cursor;

    fn encode_rgba(width: u32, height: u32, format: ImageFormat) -> Vec<u8> {
        let img = RgbaImage::from_pixel(width, height, Rgba([255, 0, 0, 255]));
        let mut buffer = Vec::new();
        let mut cursor = Cursor::new(&mut buffer);
        img.write_to(&mut cursor, format).unwrap();
        buffer
    }

    fn create_test_jpeg(width: u32, height: u32) -> Vec<u8> {
        let img = RgbImage::from_pixel(width, height, Rgb([0, 128, 255]));
        let mut buffer = Vec::new();
        let mut cursor = Cursor::new(&mut buffer);
        img.write_to(&mut cursor, ImageFormat::Jpeg).unwrap();
        buffer
    }

    fn rational(num: u32, denom: u32) -> Rational {
        Rational { num, denom }
    }

    fn jpeg_with_exif(fields: &[Field]) -> Vec<u8> {
        let mut writer = Writer::new();
        for field in fields {
            writer.push_field(field);
        }
        let mut tiff = Cursor::new(Vec::new());
        writer.write(&mut tiff, false).unwrap();

        let mut jpeg = Jpeg::from_bytes(create_test_jpeg(8, 6).into()).unwrap();
        jpeg.set_exif(Some(tiff.into_inner().into()));
        jpeg.encoder().bytes().to_vec()
    }

    #[test]
    fn test_png_dimensions() {
        let data = encode_rgba(100, 40, ImageFormat::Png);
        let attributes = MetadataExtractor::default().extract(&data, "image/png");

        assert_eq!(attributes.kind, MediaKind::Image);
        assert_eq!(attributes.format, "PNG");
        assert_eq!(attributes.dimensions(), Some((100, 40)));
        assert_eq!(attributes.size_bytes, data.len() as u64);
        assert!(attributes.capture_time.is_none());
    }

    #[test]
    fn test_format_comes_from_bytes_not_declared_type() {
        let data = encode_rgba(3, 7, ImageFormat::Gif);
        let attributes = MetadataExtractor::default().extract(&data, "application/octet-stream");

        assert_eq!(attributes.kind, MediaKind::Generic);
        assert_eq!(attributes.format, "GIF");
        assert_eq!(attributes.dimensions(), Some((3, 7)));
    }

    #[test]
    fn test_jpeg_and_bmp() {
        let extractor = MetadataExtractor::default();

        let jpeg = extractor.extract(&create_test_jpeg(16, 9), "image/jpeg");
        assert_eq!(jpeg.format, "JPEG");
        assert_eq!(jpeg.dimensions(), Some((16, 9)));

        let bmp = extractor.extract(&encode_rgba(5, 5, ImageFormat::Bmp), "image/bmp");
        assert_eq!(bmp.format, "BMP");
        assert_eq!(bmp.dimensions(), Some((5, 5)));
    }

    #[test]
    fn test_plain_text_fallback() {
        let data = b"just some notes, nothing to see";
        let attributes = MetadataExtractor::default().extract(data, "text/plain");

        assert_eq!(attributes.kind, MediaKind::Generic);
        assert_eq!(attributes.format, "plain");
        assert_eq!(attributes.size_bytes, data.len() as u64);
        assert!(attributes.dimensions().is_none());
        assert!(attributes.capture_time.is_none());
        assert!(attributes.geo_location.is_none());
    }

    #[test]
    fn test_truncated_jpeg_fallback() {
        let data = [0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F'];
        let attributes = MetadataExtractor::default().extract(&data, "image/jpeg");

        assert_eq!(attributes.kind, MediaKind::Image);
        assert_eq!(attributes.format, "jpeg");
        assert_eq!(attributes.size_bytes, 10);
        assert!(attributes.dimensions().is_none());
    }

    #[test]
    fn test_video_kind() {
        let data = b"\x00\x00\x00\x18ftypmp42";
        let attributes = MetadataExtractor::default().extract(data, "video/mp4");
        assert_eq!(attributes.kind, MediaKind::Video);
        assert_eq!(attributes.format, "mp4");
    }

    #[test]
    fn test_exif_capture_time_and_gps() {
        let fields = vec![
            Field {
                tag: Tag::DateTimeOriginal,
                ifd_num: In::PRIMARY,
                value: Value::Ascii(vec![b"2023:06:15 14:30:00".to_vec()]),
            },
            Field {
                tag: Tag::OffsetTimeOriginal,
                ifd_num: In::PRIMARY,
                value: Value::Ascii(vec![b"+02:00".to_vec()]),
            },
            Field {
                tag: Tag::GPSLatitudeRef,
                ifd_num: In::PRIMARY,
                value: Value::Ascii(vec![b"N".to_vec()]),
            },
            Field {
                tag: Tag::GPSLatitude,
                ifd_num: In::PRIMARY,
                value: Value::Rational(vec![rational(46, 1), rational(3, 1), rational(0, 1)]),
            },
            Field {
                tag: Tag::GPSLongitudeRef,
                ifd_num: In::PRIMARY,
                value: Value::Ascii(vec![b"W".to_vec()]),
            },
            Field {
                tag: Tag::GPSLongitude,
                ifd_num: In::PRIMARY,
                value: Value::Rational(vec![rational(14, 1), rational(30, 1), rational(0, 1)]),
            },
        ];
        let data = jpeg_with_exif(&fields);

        let attributes = MetadataExtractor::default().extract(&data, "image/jpeg");

        assert_eq!(attributes.format, "JPEG");
        assert_eq!(attributes.dimensions(), Some((8, 6)));
        assert_eq!(
            attributes.capture_time,
            Some(Utc.with_ymd_and_hms(2023, 6, 15, 12, 30, 0).unwrap())
        );

        let geo = attributes.geo_location.unwrap();
        assert!((geo.latitude - 46.05).abs() < 1e-9);
        assert!((geo.longitude + 14.5).abs() < 1e-9);
    }

    #[test]
    fn test_custom_probe_after_defaults() {
        let mut probes = default_probes();
        probes.push(FormatProbe {
            name: "PDF",
            probe: |data| data.starts_with(b"%PDF-").then(ProbeMatch::default),
        });
        let extractor = MetadataExtractor::new(probes);

        let attributes = extractor.extract(b"%PDF-1.7\n%fake", "application/pdf");
        assert_eq!(attributes.format, "PDF");
        assert_eq!(attributes.kind, MediaKind::Generic);
        assert!(attributes.dimensions().is_none());

        let png = encode_rgba(5, 4, ImageFormat::Png);
        assert_eq!(extractor.extract(&png, "image/png").format, "PNG");
    }

    #[test]
    fn test_empty_probe_list_falls_back_to_declared_type() {
        let png = encode_rgba(5, 4, ImageFormat::Png);
        let attributes = MetadataExtractor::new(Vec::new()).extract(&png, "image/png");
        assert_eq!(attributes.format, "png");
        assert!(attributes.dimensions().is_none());
    }

    #[test]
    fn test_declared_subtype() {
        assert_eq!(declared_subtype("image/JPEG; charset=binary"), "jpeg");
        assert_eq!(declared_subtype("octet-stream"), "octet-stream");
    }
}
