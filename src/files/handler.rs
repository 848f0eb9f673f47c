//! File handler trait for metadata extraction
//!
//! This module defines the trait that all container format handlers must
//! implement, so the entry points can dispatch without knowing the format.

use crate::core::diagnostics::Diagnostics;
use crate::core::error::MetaResult;
use crate::core::options::ParseOptions;
use crate::types::record::MetadataRecord;

/// Trait for container format handlers
///
/// Handlers work on the complete file contents. They must not panic on any
/// input; recoverable problems go to the [`Diagnostics`] collector.
pub trait FileHandler: Send + Sync {
    /// Check if this handler can handle the given bytes
    ///
    /// This should only look at the signature, not decode anything.
    fn can_handle(&self, data: &[u8]) -> bool;

    /// Read metadata from the file contents
    ///
    /// # Arguments
    ///
    /// * `data` - The complete file contents
    /// * `options` - Options controlling which decoders run and their limits
    /// * `diag` - Collector for recoverable problems
    ///
    /// # Returns
    ///
    /// * `Ok(MetadataRecord)` with whatever could be decoded, possibly empty
    /// * `Err(MetaError)` if the container itself is unusable
    fn read_metadata(
        &self,
        data: &[u8],
        options: &ParseOptions,
        diag: &mut Diagnostics,
    ) -> MetaResult<MetadataRecord>;

    /// Get the name of the file format this handler supports
    fn format_name(&self) -> &'static str;

    /// Get the file extensions this handler supports
    ///
    /// A slice of file extensions (e.g., &["jpg", "jpeg"] for JPEG)
    fn extensions(&self) -> &'static [&'static str];
}
