//! Core module
//!
//! Shared building blocks for every decoder: the error type, the byte
//! cursor, the warning collector and the parse options.

pub mod cursor;
pub mod diagnostics;
pub mod error;
pub mod options;

pub use cursor::{ByteCursor, Endianness};
pub use diagnostics::{Diagnostics, Stage, Warning};
pub use error::{MetaError, MetaResult};
pub use options::ParseOptions;
