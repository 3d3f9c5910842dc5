//! Core beatmap types and structures

/// Document, section and record types
pub mod document;
/// Per-section record field accessors
pub mod record;

pub use document::{Document, KeyValueSection, Record, Section, SectionKind, SectionShape};
