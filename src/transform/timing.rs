//! Time-axis rescaling of scalar fields and record sections.

use crate::core::record::{event, hit_object, timing_point};
use crate::core::{Record, SectionKind};
use crate::error::{TransformError, TransformResult};

/// Divides timestamps and durations by a rate
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeScale {
    rate: f64,
}

impl TimeScale {
    /// Create a scale for an already validated rate
    pub fn new(rate: f64) -> Self {
        TimeScale { rate }
    }

    /// Rescale a timestamp, rounding half away from zero
    pub fn time(&self, ms: f64) -> i64 {
        (ms / self.rate).round() as i64
    }

    /// Rescale a duration without rounding
    pub fn duration(&self, ms: f64) -> f64 {
        ms / self.rate
    }

    /// Rescale a timestamp held as text
    pub fn rescale_text(&self, section: SectionKind, field: &str, text: &str) -> TransformResult<String> {
        let value = parse_number(section, field, text)?;
        Ok(self.time(value).to_string())
    }

    /// `PreviewTime`; negative values mean "unset" and are kept
    pub fn rescale_preview_time(&self, text: &str) -> TransformResult<String> {
        let value = parse_number(SectionKind::General, "PreviewTime", text)?;
        if value < 0.0 {
            Ok(text.to_string())
        } else {
            Ok(self.time(value).to_string())
        }
    }

    /// Comma-separated editor bookmarks
    pub fn rescale_bookmarks(&self, text: &str) -> TransformResult<String> {
        if text.trim().is_empty() {
            return Ok(text.to_string());
        }
        let rescaled = text
            .split(',')
            .map(|mark| self.rescale_text(SectionKind::Editor, "Bookmarks", mark))
            .collect::<TransformResult<Vec<_>>>()?;
        Ok(rescaled.join(","))
    }

    /// Start times of all events, plus end times of breaks
    pub fn rescale_events(&self, records: &mut [Record]) -> TransformResult<()> {
        for (index, record) in records.iter_mut().enumerate() {
            self.rescale_field(SectionKind::Events, index, record, event::START_TIME)?;
            if event::is_break(record) {
                self.rescale_field(SectionKind::Events, index, record, event::END_TIME)?;
            }
        }
        Ok(())
    }

    /// Offsets of all timing points, plus beat lengths of uninherited ones
    pub fn rescale_timing_points(&self, records: &mut [Record]) -> TransformResult<()> {
        const SECTION: SectionKind = SectionKind::TimingPoints;

        for (index, record) in records.iter_mut().enumerate() {
            self.rescale_field(SECTION, index, record, timing_point::TIME)?;

            // inherited points hold a relative multiplier, not a duration
            if timing_point::is_uninherited(record) {
                let text = required_field(SECTION, index, record, timing_point::BEAT_LENGTH)?;
                let beat_length = parse_number(SECTION, &field_label(index, timing_point::BEAT_LENGTH), text)?;
                record.set_field(timing_point::BEAT_LENGTH, self.duration(beat_length).to_string());
            }
        }
        Ok(())
    }

    /// Start times of all hit objects, plus end times of spinners.
    ///
    /// Slider timing lives in the timing points and is not touched here.
    pub fn rescale_hit_objects(&self, records: &mut [Record]) -> TransformResult<()> {
        const SECTION: SectionKind = SectionKind::HitObjects;

        for (index, record) in records.iter_mut().enumerate() {
            self.rescale_field(SECTION, index, record, hit_object::TIME)?;

            let text = required_field(SECTION, index, record, hit_object::TYPE)?;
            let object_type: u32 = text.trim().parse().map_err(|_| TransformError::InvalidNumber {
                section: SECTION,
                field: field_label(index, hit_object::TYPE),
                value: text.to_string(),
            })?;

            if hit_object::is_spinner(object_type) {
                self.rescale_field(SECTION, index, record, hit_object::SPINNER_END_TIME)?;
            }
        }
        Ok(())
    }

    fn rescale_field(
        &self,
        section: SectionKind,
        index: usize,
        record: &mut Record,
        field: usize,
    ) -> TransformResult<()> {
        let text = required_field(section, index, record, field)?;
        let rescaled = self.rescale_text(section, &field_label(index, field), text)?;
        record.set_field(field, rescaled);
        Ok(())
    }
}

fn required_field(
    section: SectionKind,
    index: usize,
    record: &Record,
    field: usize,
) -> TransformResult<&str> {
    record.field(field).ok_or(TransformError::MissingRecordField {
        section,
        record: index,
        index: field,
    })
}

fn field_label(record: usize, field: usize) -> String {
    format!("record {record} field {field}")
}

/// Parse integer or decimal text as a finite number
pub fn parse_number(section: SectionKind, field: &str, text: &str) -> TransformResult<f64> {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| TransformError::InvalidNumber {
            section,
            field: field.to_string(),
            value: text.to_string(),
        })
}
