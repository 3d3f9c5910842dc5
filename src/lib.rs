#![warn(missing_docs)]

//! # osu-rate: Beatmap Rate Changer
//!
//! Rescales the time axis of an osu! beatmap by a rate factor and adjusts the
//! approach rate and overall difficulty so the map plays the same at the new
//! speed.
//!
//! ## Pipeline
//!
//! - **Parse** - beatmap text into a [`Document`]
//! - **Transform** - rescale timestamps, invert difficulty formulas, derive the [`AudioJob`]
//! - **Serialize** - [`Document`] back to beatmap text
//! - **Process** - file-level conversion with an external tempo tool (ffmpeg)
//!
//! ## Quick Start
//!
//! ```ignore
//! use osu_rate::{parse, serialize, transform};
//!
//! let text = std::fs::read_to_string("map.osu")?;
//! let document = parse(&text)?;
//! let (rescaled, audio_job) = transform(&document, 1.3)?;
//! std::fs::write("map 1.3x.osu", serialize(&rescaled))?;
//! println!("audio: {} -> {}", audio_job.source, audio_job.destination);
//! ```

// Declare modules
/// Beatmap document types
pub mod core;
/// Error types for parsing, transforming and file conversion
pub mod error;
/// Beatmap text parser
pub mod parser;
/// Rate transform engine
pub mod transform;
/// Beatmap text serializer
pub mod serializer;
/// File-level conversion
pub mod processor;

// Export public types
pub use crate::core::{Document, KeyValueSection, Record, Section, SectionKind};
pub use crate::error::{
    OsuError, OsuResult, ParseError, ParseResult, TransformError, TransformResult,
};
pub use crate::parser::parse;
pub use crate::serializer::serialize;
pub use crate::transform::{AudioJob, RateChange, RateTransform, transform};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
