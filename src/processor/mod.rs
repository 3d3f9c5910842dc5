//! File-level conversion: read, parse, transform, run the audio tool, write.

pub mod stretch;

pub use stretch::{AudioStretcher, FfmpegStretcher};

use crate::core::{Document, SectionKind};
use crate::error::OsuResult;
use crate::parser::parse;
use crate::serializer::serialize;
use crate::transform::audio::format_rate;
use crate::transform::{AudioJob, RateTransform};
use log::{debug, info, warn};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Options for [`convert_file`]
#[derive(Debug, Clone, PartialEq)]
pub struct ConvertOptions {
    rate: f64,
    output: Option<PathBuf>,
    process_audio: bool,
}

impl ConvertOptions {
    /// Create options for a rate; the rate must be positive and finite
    pub fn new(rate: f64) -> OsuResult<Self> {
        RateTransform::new(rate)?;
        Ok(ConvertOptions {
            rate,
            output: None,
            process_audio: true,
        })
    }

    /// Write the result to this path instead of the derived one
    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = Some(output.into());
        self
    }

    /// Set whether the audio tool is run
    pub fn with_audio(mut self, process_audio: bool) -> Self {
        self.process_audio = process_audio;
        self
    }

    /// Get the requested rate
    pub fn rate(&self) -> f64 {
        self.rate
    }

    /// Get the explicit output path, if any
    pub fn output(&self) -> Option<&Path> {
        self.output.as_deref()
    }

    /// Whether the audio tool is run
    pub fn process_audio(&self) -> bool {
        self.process_audio
    }
}

/// What [`convert_file`] did
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionReport {
    /// Path of the written beatmap
    pub output: PathBuf,
    /// Audio job derived from the map
    pub audio_job: AudioJob,
    /// Whether the audio tool ran
    pub audio_processed: bool,
    /// Rate applied to timestamps
    pub effective_rate: f64,
    /// Number of hit objects rescaled
    pub hit_objects: usize,
    /// Number of timing points rescaled
    pub timing_points: usize,
}

/// Path for the rescaled map.
///
/// `Artist - Title (Mapper) [Hard].osu` becomes `... [Hard 1.3x].osu`; stems
/// without a difficulty bracket get ` 1.3x` appended.
pub fn output_path(input: &Path, rate: f64) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let extension = input
        .extension()
        .map(|e| e.to_string_lossy().into_owned())
        .unwrap_or_else(|| "osu".to_string());
    let rate = format_rate(rate);

    let new_stem = match stem.strip_suffix(']') {
        Some(head) => format!("{} {}x]", head, rate),
        None => format!("{} {}x", stem, rate),
    };
    input.with_file_name(format!("{}.{}", new_stem, extension))
}

/// Convert one beatmap file. Nothing is written if any step fails.
pub fn convert_file(
    input: &Path,
    options: &ConvertOptions,
    stretcher: &dyn AudioStretcher,
) -> OsuResult<ConversionReport> {
    info!("Reading {}", input.display());
    let text = fs::read_to_string(input)?;
    let document = parse(&text)?;
    debug!("Parsed {} sections", document.len());

    let change = RateTransform::new(options.rate())?.apply(&document)?;
    if change.effective_rate != change.requested_rate {
        warn!(
            "Difficulty would exceed 10 at {}x; timestamps scaled by {} instead",
            format_rate(change.requested_rate),
            format_rate(change.effective_rate)
        );
    }

    let base_dir = input.parent().unwrap_or_else(|| Path::new(""));
    if options.process_audio() {
        // the audio has to follow the timestamps, so it runs at the
        // compensated rate; the file name keeps the requested one
        let tempo_job = AudioJob {
            rate: change.effective_rate,
            ..change.audio_job.clone()
        };
        info!(
            "Stretching {} -> {} at {}x",
            tempo_job.source,
            tempo_job.destination,
            format_rate(tempo_job.rate)
        );
        stretcher.stretch(&tempo_job, base_dir)?;
    } else {
        info!("Skipping audio; map references {}", change.audio_job.destination);
    }

    let output = match options.output() {
        Some(path) => path.to_path_buf(),
        None => output_path(input, options.rate()),
    };
    fs::write(&output, serialize(&change.document))?;
    info!("Wrote {}", output.display());

    let count = |kind| change.document.records(kind).map_or(0, <[_]>::len);
    Ok(ConversionReport {
        hit_objects: count(SectionKind::HitObjects),
        timing_points: count(SectionKind::TimingPoints),
        output,
        audio_job: change.audio_job,
        audio_processed: options.process_audio(),
        effective_rate: change.effective_rate,
    })
}

/// Overview of a parsed beatmap
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentSummary {
    /// `Metadata.Version`
    pub version: Option<String>,
    /// `General.AudioFilename`
    pub audio_filename: Option<String>,
    /// `Difficulty.ApproachRate`
    pub approach_rate: Option<String>,
    /// `Difficulty.OverallDifficulty`
    pub overall_difficulty: Option<String>,
    /// Entry or record count per section, in parse order
    pub sections: Vec<(SectionKind, usize)>,
}

impl DocumentSummary {
    /// Summarize a document
    pub fn from_document(document: &Document) -> Self {
        let value = |kind, key| {
            document
                .key_value(kind)
                .and_then(|section| section.get(key))
                .map(str::to_string)
        };

        DocumentSummary {
            version: value(SectionKind::Metadata, "Version"),
            audio_filename: value(SectionKind::General, "AudioFilename"),
            approach_rate: value(SectionKind::Difficulty, "ApproachRate"),
            overall_difficulty: value(SectionKind::Difficulty, "OverallDifficulty"),
            sections: document
                .sections()
                .map(|(kind, section)| (kind, section.len()))
                .collect(),
        }
    }
}

impl fmt::Display for DocumentSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let show = |value: &Option<String>| value.clone().unwrap_or_else(|| "-".to_string());
        writeln!(f, "Version:           {}", show(&self.version))?;
        writeln!(f, "Audio:             {}", show(&self.audio_filename))?;
        writeln!(f, "ApproachRate:      {}", show(&self.approach_rate))?;
        writeln!(f, "OverallDifficulty: {}", show(&self.overall_difficulty))?;
        for (kind, count) in &self.sections {
            writeln!(f, "  [{}] {}", kind, count)?;
        }
        Ok(())
    }
}

/// Read and summarize a beatmap file
pub fn inspect_file(input: &Path) -> OsuResult<DocumentSummary> {
    let text = fs::read_to_string(input)?;
    let document = parse(&text)?;
    Ok(DocumentSummary::from_document(&document))
}
