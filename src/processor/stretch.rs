//! External audio tempo tool.
//!
//! The map only names the rate-changed audio file; producing it is delegated
//! to an [`AudioStretcher`]. [`FfmpegStretcher`] runs ffmpeg's `atempo` filter.

use crate::error::{OsuError, OsuResult};
use crate::transform::AudioJob;
use crate::transform::audio::format_rate;
use log::{debug, info};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Range a single ffmpeg `atempo` stage accepts on every ffmpeg version
const ATEMPO_MIN: f64 = 0.5;
const ATEMPO_MAX: f64 = 2.0;

/// Trait for the external audio tempo tool
pub trait AudioStretcher {
    /// Produce `job.destination` from `job.source`, both relative to `base_dir`
    fn stretch(&self, job: &AudioJob, base_dir: &Path) -> OsuResult<()>;
}

/// Tempo changes through an `ffmpeg` process
#[derive(Debug, Clone)]
pub struct FfmpegStretcher {
    program: PathBuf,
    overwrite: bool,
}

impl Default for FfmpegStretcher {
    fn default() -> Self {
        FfmpegStretcher {
            program: PathBuf::from("ffmpeg"),
            overwrite: true,
        }
    }
}

impl FfmpegStretcher {
    /// Use `ffmpeg` from `PATH`, overwriting existing output
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the ffmpeg executable
    pub fn with_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.program = program.into();
        self
    }

    /// Set whether an existing destination is replaced
    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    /// Build the ffmpeg invocation for a job
    pub fn command(&self, job: &AudioJob, base_dir: &Path) -> OsuResult<Command> {
        let mut command = Command::new(&self.program);
        command
            .args(["-hide_banner", "-loglevel", "error"])
            .arg(if self.overwrite { "-y" } else { "-n" })
            .arg("-i")
            .arg(base_dir.join(&job.source))
            .arg("-filter:a")
            .arg(atempo_filter(job.rate)?)
            .arg(base_dir.join(&job.destination))
            .stdin(Stdio::null());
        Ok(command)
    }
}

impl AudioStretcher for FfmpegStretcher {
    fn stretch(&self, job: &AudioJob, base_dir: &Path) -> OsuResult<()> {
        let source = base_dir.join(&job.source);
        if !source.is_file() {
            return Err(OsuError::Audio(format!(
                "source audio {} not found",
                source.display()
            )));
        }

        let destination = base_dir.join(&job.destination);
        if !self.overwrite && destination.is_file() {
            info!("Keeping existing {}", destination.display());
            return Ok(());
        }

        let mut command = self.command(job, base_dir)?;
        debug!("Running {:?}", command);

        let output = command.output().map_err(|e| {
            OsuError::Audio(format!("failed to run {}: {}", self.program.display(), e))
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(OsuError::Audio(format!(
                "{} exited with {}: {}",
                self.program.display(),
                output.status,
                stderr.trim()
            )));
        }

        Ok(())
    }
}

/// ffmpeg filter for a tempo factor, chaining stages for factors outside `[0.5, 2.0]`
pub fn atempo_filter(rate: f64) -> OsuResult<String> {
    if !rate.is_finite() || rate <= 0.0 {
        return Err(OsuError::Audio(format!("invalid tempo factor {}", rate)));
    }

    let mut stages = Vec::new();
    let mut remaining = rate;
    while remaining > ATEMPO_MAX {
        stages.push(ATEMPO_MAX);
        remaining /= ATEMPO_MAX;
    }
    while remaining < ATEMPO_MIN {
        stages.push(ATEMPO_MIN);
        remaining /= ATEMPO_MIN;
    }
    stages.push(remaining);

    Ok(stages
        .iter()
        .map(|stage| format!("atempo={}", format_rate(*stage)))
        .collect::<Vec<_>>()
        .join(","))
}
