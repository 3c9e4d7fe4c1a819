//! Mediagate Processing Library
//!
//! Media inspection for uploads: structural format probes and EXIF reading,
//! combined by [`MetadataExtractor`] into `MediaAttributes`.

pub mod capture;
pub mod extractor;
pub mod probes;

pub use extractor::MetadataExtractor;
pub use probes::{default_probes, FormatProbe, ProbeMatch};
