use crate::core::SectionKind;
use std::io;
use thiserror::Error;

/// Result type for parsing
pub type ParseResult<T> = Result<T, ParseError>;

/// Result type for the rate transform
pub type TransformResult<T> = Result<T, TransformError>;

/// Result type for whole-file operations
pub type OsuResult<T> = Result<T, OsuError>;

/// Errors produced while turning beatmap text into a [`crate::Document`]
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    /// Header line that is not one of the recognized sections
    #[error("line {line}: unknown section header `{header}`")]
    UnknownSection {
        /// 1-based line number
        line: usize,
        /// Header text as found
        header: String,
    },

    /// Key-value line without the section's separator
    #[error("line {line}: expected `{separator}` in [{section}] entry `{content}`")]
    MalformedLine {
        /// 1-based line number
        line: usize,
        /// Section the line belongs to
        section: SectionKind,
        /// Separator that was expected
        separator: &'static str,
        /// Offending line
        content: String,
    },

    /// Data line found before the first header
    #[error("line {line}: `{content}` appears before any section header")]
    DataBeforeHeader {
        /// 1-based line number
        line: usize,
        /// Offending line
        content: String,
    },

    /// Same header seen twice
    #[error("line {line}: section [{section}] appears more than once")]
    DuplicateSection {
        /// 1-based line number
        line: usize,
        /// Repeated section
        section: SectionKind,
    },
}

/// Errors produced by the rate transform
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransformError {
    /// Rate is not a positive finite number
    #[error("Invalid rate: {0} (must be a positive finite number)")]
    InvalidRate(f64),

    /// A section the transform needs is absent
    #[error("Missing section [{0}]")]
    MissingSection(SectionKind),

    /// A key the transform needs is absent
    #[error("Missing required field {key} in [{section}]")]
    MissingRequiredField {
        /// Section that should hold the key
        section: SectionKind,
        /// Missing key
        key: String,
    },

    /// A record is shorter than a field index the transform rewrites
    #[error("[{section}] record {record} has no field {index}")]
    MissingRecordField {
        /// Section holding the record
        section: SectionKind,
        /// 0-based record position within the section
        record: usize,
        /// Field index that was expected
        index: usize,
    },

    /// Field text that should be numeric is not
    #[error("[{section}] {field}: `{value}` is not a number")]
    InvalidNumber {
        /// Section holding the field
        section: SectionKind,
        /// Key name or record/field position
        field: String,
        /// Offending text
        value: String,
    },
}

/// Top-level error for file conversion
#[derive(Error, Debug)]
pub enum OsuError {
    /// IO error (reading the beatmap, writing the result)
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// The beatmap text could not be parsed
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// The rate transform failed
    #[error("Transform error: {0}")]
    Transform(#[from] TransformError),

    /// The external audio tool failed
    #[error("Audio error: {0}")]
    Audio(String),
}
