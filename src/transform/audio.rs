/// Request for the external audio tool: tempo-shift `source` by `rate` into `destination`
#[derive(Debug, Clone, PartialEq)]
pub struct AudioJob {
    /// Audio file named by the input map
    pub source: String,
    /// Requested rate (not the compensated one)
    pub rate: f64,
    /// File the rescaled map will reference
    pub destination: String,
}

impl AudioJob {
    /// Build the job for an audio file and rate
    pub fn new(source: &str, rate: f64) -> Self {
        AudioJob {
            source: source.to_string(),
            rate,
            destination: rated_audio_name(source, rate),
        }
    }
}

/// Filename without its last extension
pub fn base_name(filename: &str) -> &str {
    match filename.rfind('.') {
        Some(dot) => &filename[..dot],
        None => filename,
    }
}

/// `{rate}-{base}.mp3`
pub fn rated_audio_name(filename: &str, rate: f64) -> String {
    format!("{}-{}.mp3", format_rate(rate), base_name(filename))
}

/// Shortest text form of a rate (`1.3`, `2`)
pub fn format_rate(rate: f64) -> String {
    rate.to_string()
}
