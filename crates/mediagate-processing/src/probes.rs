//! Structural format probes.
//!
//! A probe recognises its format from the payload itself, never from the
//! declared content type. Signature bytes alone are not enough: the probe
//! only matches when the header parses, so a truncated or corrupt file falls
//! through to the next probe.

use image::{ImageFormat, ImageReader};
use std::io::Cursor;

/// What a matching probe learned about the payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProbeMatch {
    pub dimensions: Option<(u32, u32)>,
}

/// One entry of the ordered probe list
#[derive(Clone, Copy)]
pub struct FormatProbe {
    /// Format name reported in `MediaAttributes::format`
    pub name: &'static str,
    /// `None` when the payload is not this format
    pub probe: fn(&[u8]) -> Option<ProbeMatch>,
}

impl FormatProbe {
    pub fn run(&self, data: &[u8]) -> Option<ProbeMatch> {
        (self.probe)(data)
    }
}

impl std::fmt::Debug for FormatProbe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormatProbe").field("name", &self.name).finish()
    }
}

/// JPEG, PNG, HEIF, GIF, WebP, BMP; first match wins.
pub fn default_probes() -> Vec<FormatProbe> {
    vec![
        FormatProbe {
            name: "JPEG",
            probe: probe_jpeg,
        },
        FormatProbe {
            name: "PNG",
            probe: probe_png,
        },
        FormatProbe {
            name: "HEIF",
            probe: probe_heif,
        },
        FormatProbe {
            name: "GIF",
            probe: probe_gif,
        },
        FormatProbe {
            name: "WebP",
            probe: probe_webp,
        },
        FormatProbe {
            name: "BMP",
            probe: probe_bmp,
        },
    ]
}

fn header_dimensions(data: &[u8], format: ImageFormat) -> Option<(u32, u32)> {
    ImageReader::with_format(Cursor::new(data), format)
        .into_dimensions()
        .ok()
}

fn dimensioned(data: &[u8], format: ImageFormat) -> Option<ProbeMatch> {
    header_dimensions(data, format).map(|dimensions| ProbeMatch {
        dimensions: Some(dimensions),
    })
}

fn probe_jpeg(data: &[u8]) -> Option<ProbeMatch> {
    if !data.starts_with(&[0xFF, 0xD8, 0xFF]) {
        return None;
    }
    dimensioned(data, ImageFormat::Jpeg)
}

fn probe_png(data: &[u8]) -> Option<ProbeMatch> {
    if !data.starts_with(b"\x89PNG\r\n\x1a\n") {
        return None;
    }
    dimensioned(data, ImageFormat::Png)
}

const HEIF_BRANDS: [&[u8; 4]; 8] = [
    b"heic", b"heix", b"hevc", b"hevx", b"heim", b"heis", b"mif1", b"msf1",
];

/// HEIF is recognised from its `ftyp` box; dimensions are not read.
fn probe_heif(data: &[u8]) -> Option<ProbeMatch> {
    if data.len() < 16 || &data[4..8] != b"ftyp" {
        return None;
    }

    let box_size = u32::from_be_bytes([data[0], data[1], data[2], data[3]]) as usize;
    if box_size < 16 || box_size > data.len() {
        return None;
    }

    // major brand, minor version, then compatible brands
    let major = &data[8..12];
    let compatible = data[16..box_size].chunks_exact(4);

    std::iter::once(major)
        .chain(compatible)
        .any(|brand| HEIF_BRANDS.iter().any(|known| brand == known.as_slice()))
        .then(ProbeMatch::default)
}

fn probe_gif(data: &[u8]) -> Option<ProbeMatch> {
    if !(data.starts_with(b"GIF87a") || data.starts_with(b"GIF89a")) {
        return None;
    }
    dimensioned(data, ImageFormat::Gif)
}

fn probe_webp(data: &[u8]) -> Option<ProbeMatch> {
    if data.len() < 12 || !data.starts_with(b"RIFF") || &data[8..12] != b"WEBP" {
        return None;
    }
    dimensioned(data, ImageFormat::WebP)
}

fn probe_bmp(data: &[u8]) -> Option<ProbeMatch> {
    if !data.starts_with(b"BM") {
        return None;
    }
    dimensioned(data, ImageFormat::Bmp)
}
