//! Entry points: format detection and metadata extraction
//!
//! These functions are the outer error boundary of the crate. Whatever the
//! input, they return a record (possibly empty) and never panic.

use crate::core::diagnostics::{Diagnostics, Stage, Warning};
use crate::core::error::{MetaError, MetaResult};
use crate::core::options::ParseOptions;
use crate::files::handler::FileHandler;
use crate::files::registry::{HandlerRegistry, ImageFormat};
use crate::types::record::MetadataRecord;
use std::io::Read;
use std::panic::{self, AssertUnwindSafe};

/// Result of [`extract_metadata_with`]
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Extraction {
    /// Everything that could be decoded
    pub metadata: MetadataRecord,
    /// Recoverable problems, in the order they were found
    pub warnings: Vec<Warning>,
    /// Detected container format
    pub format: ImageFormat,
}

/// Detect the container format of `data`
///
/// ```rust
/// use metakit::{sniff_format, ImageFormat};
///
/// assert_eq!(sniff_format(&[0xFF, 0xD8, 0xFF, 0xD9]), ImageFormat::Jpeg);
/// assert_eq!(sniff_format(b"GIF89a"), ImageFormat::Unsupported);
/// ```
pub fn sniff_format(data: &[u8]) -> ImageFormat {
    HandlerRegistry::new()
        .find_by_detection(data)
        .map_or(ImageFormat::Unsupported, |handler| handler.format())
}

/// Extract metadata with default options
///
/// Unsupported or broken input gives an empty record.
pub fn extract_metadata(data: &[u8]) -> MetadataRecord {
    extract_metadata_with(data, &ParseOptions::default()).metadata
}

/// Extract metadata and report every recoverable problem
pub fn extract_metadata_with(data: &[u8], options: &ParseOptions) -> Extraction {
    let registry = HandlerRegistry::new();
    let mut diag = Diagnostics::new();

    let Some(handler) = registry.find_by_detection(data) else {
        let error = MetaError::UnsupportedFormat(describe_prefix(data));
        diag.warn(Stage::Sniff, error.to_string());
        return Extraction {
            metadata: MetadataRecord::default(),
            warnings: diag.into_warnings(),
            format: ImageFormat::Unsupported,
        };
    };
    log::debug!("{} input, {} bytes", handler.format_name(), data.len());

    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        handler.read_metadata(data, options, &mut diag)
    }));
    let metadata = match outcome {
        Ok(Ok(record)) => record,
        Ok(Err(e)) => {
            diag.warn(Stage::Sniff, format!("{} decode failed: {e}", handler.format_name()));
            MetadataRecord::default()
        }
        Err(_) => {
            diag.warn(Stage::Sniff, format!("{} decoder panicked", handler.format_name()));
            MetadataRecord::default()
        }
    };

    Extraction {
        metadata,
        warnings: diag.into_warnings(),
        format: handler.format(),
    }
}

/// Read all of `reader` into memory, then extract
///
/// Only reading can fail; decoding problems end up in the warnings.
pub fn extract_metadata_from_reader<R: Read>(
    mut reader: R,
    options: &ParseOptions,
) -> MetaResult<Extraction> {
    let mut data = Vec::new();
    reader.read_to_end(&mut data)?;
    Ok(extract_metadata_with(&data, options))
}

fn describe_prefix(data: &[u8]) -> String {
    if data.is_empty() {
        return "empty input".to_string();
    }
    let head: Vec<String> = data.iter().take(4).map(|b| format!("{b:02X}")).collect();
    format!("unrecognised signature {} ({} bytes)", head.join(" "), data.len())
}
