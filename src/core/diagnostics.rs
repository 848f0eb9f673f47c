//! Structured warnings collected during a decode
//!
//! Decoders never abort a whole file because of one bad substructure. They
//! record a [`Warning`] here and carry on; every warning is also emitted
//! through the `log` facade.

use std::fmt;

/// The decoder stage a warning came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Stage {
    /// Format detection and the outer entry point
    Sniff,
    /// JPEG marker walk
    Jpeg,
    /// TIFF/EXIF directory decoding
    Exif,
    /// XMP packet and RDF graph decoding
    Xmp,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Sniff => "sniff",
            Stage::Jpeg => "jpeg",
            Stage::Exif => "exif",
            Stage::Xmp => "xmp",
        };
        f.write_str(name)
    }
}

/// A recoverable problem found while decoding
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Warning {
    /// Where the problem was found
    pub stage: Stage,
    /// Human readable description
    pub message: String,
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.stage, self.message)
    }
}

/// Collector for [`Warning`]s
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    warnings: Vec<Warning>,
}

impl Diagnostics {
    /// Create an empty collector
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a warning and log it
    pub fn warn(&mut self, stage: Stage, message: impl Into<String>) {
        let warning = Warning {
            stage,
            message: message.into(),
        };
        log::warn!("{warning}");
        self.warnings.push(warning);
    }

    /// Warnings recorded so far, in order
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    /// Whether nothing was recorded
    pub fn is_empty(&self) -> bool {
        self.warnings.is_empty()
    }

    /// Whether any warning message from `stage` contains `needle`
    pub fn contains(&self, stage: Stage, needle: &str) -> bool {
        self.warnings
            .iter()
            .any(|w| w.stage == stage && w.message.contains(needle))
    }

    /// Consume the collector
    pub fn into_warnings(self) -> Vec<Warning> {
        self.warnings
    }
}
