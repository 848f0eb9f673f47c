//! Public result types

pub mod record;

pub use record::MetadataRecord;
