//! Rate transform: rescales a document's time axis and compensates the
//! difficulty parameters that depend on it.

/// Audio job for the external tempo tool
pub mod audio;
pub mod difficulty;
pub mod timing;

pub use audio::AudioJob;
pub use timing::TimeScale;

use crate::core::{Document, SectionKind};
use crate::error::{TransformError, TransformResult};
use audio::format_rate;
use timing::parse_number;

/// Result of applying a [`RateTransform`]
#[derive(Debug, Clone, PartialEq)]
pub struct RateChange {
    /// Rescaled document
    pub document: Document,
    /// Job for the external audio tool
    pub audio_job: AudioJob,
    /// Rate the caller asked for
    pub requested_rate: f64,
    /// Rate applied to timestamps after compensation
    pub effective_rate: f64,
}

/// Rescales a beatmap by a rate factor
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateTransform {
    rate: f64,
}

impl RateTransform {
    /// Create a transform; the rate must be positive and finite
    pub fn new(rate: f64) -> TransformResult<Self> {
        if !rate.is_finite() || rate <= 0.0 {
            return Err(TransformError::InvalidRate(rate));
        }
        Ok(RateTransform { rate })
    }

    /// Produce the rescaled document. The input is left untouched.
    pub fn apply(&self, source: &Document) -> TransformResult<RateChange> {
        let version = required(source, SectionKind::Metadata, "Version")?;
        let audio_filename = required(source, SectionKind::General, "AudioFilename")?;
        let approach_rate = required_number(source, SectionKind::Difficulty, "ApproachRate")?;
        let overall_difficulty = required_number(source, SectionKind::Difficulty, "OverallDifficulty")?;

        // decided on the requested rate, from the unmodified values
        let effective_rate = difficulty::effective_rate(approach_rate, overall_difficulty, self.rate);
        let scale = TimeScale::new(effective_rate);

        let mut document = source.clone();
        let audio_job = AudioJob::new(audio_filename, self.rate);

        if let Some(metadata) = document.key_value_mut(SectionKind::Metadata) {
            metadata.set("Version", format!("{} {}x", version, format_rate(self.rate)));
        }

        if let Some(general) = document.key_value_mut(SectionKind::General) {
            if let Some(lead_in) = general.get("AudioLeadIn") {
                let rescaled = scale.rescale_text(SectionKind::General, "AudioLeadIn", lead_in)?;
                general.set("AudioLeadIn", rescaled);
            }
            if let Some(preview) = general.get("PreviewTime") {
                let rescaled = scale.rescale_preview_time(preview)?;
                general.set("PreviewTime", rescaled);
            }
            general.set("AudioFilename", audio_job.destination.clone());
        }

        if let Some(editor) = document.key_value_mut(SectionKind::Editor) {
            if let Some(bookmarks) = editor.get("Bookmarks") {
                let rescaled = scale.rescale_bookmarks(bookmarks)?;
                editor.set("Bookmarks", rescaled);
            }
        }

        if let Some(section) = document.key_value_mut(SectionKind::Difficulty) {
            let ar = difficulty::scaled_approach_rate(approach_rate, effective_rate);
            let od = difficulty::scaled_overall_difficulty(overall_difficulty, effective_rate);
            section.set(
                "ApproachRate",
                difficulty::format_difficulty(difficulty::round_difficulty(ar)),
            );
            section.set(
                "OverallDifficulty",
                difficulty::format_difficulty(difficulty::round_difficulty(od)),
            );
        }

        if let Some(events) = document.records_mut(SectionKind::Events) {
            scale.rescale_events(events)?;
        }
        if let Some(points) = document.records_mut(SectionKind::TimingPoints) {
            scale.rescale_timing_points(points)?;
        }
        if let Some(objects) = document.records_mut(SectionKind::HitObjects) {
            scale.rescale_hit_objects(objects)?;
        }

        Ok(RateChange {
            document,
            audio_job,
            requested_rate: self.rate,
            effective_rate,
        })
    }
}

/// Rescale `document` by `rate`, returning the new document and its audio job
pub fn transform(document: &Document, rate: f64) -> TransformResult<(Document, AudioJob)> {
    let change = RateTransform::new(rate)?.apply(document)?;
    Ok((change.document, change.audio_job))
}

fn required<'a>(document: &'a Document, kind: SectionKind, key: &str) -> TransformResult<&'a str> {
    let section = document
        .key_value(kind)
        .ok_or(TransformError::MissingSection(kind))?;
    section
        .get(key)
        .ok_or_else(|| TransformError::MissingRequiredField {
            section: kind,
            key: key.to_string(),
        })
}

fn required_number(document: &Document, kind: SectionKind, key: &str) -> TransformResult<f64> {
    parse_number(kind, key, required(document, kind, key)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    const MAP: &str = "osu file format v14\n\
        \n\
        [General]\n\
        AudioFilename: audio.mp3\n\
        AudioLeadIn: 1000\n\
        PreviewTime: 26000\n\
        Mode: 0\n\
        \n\
        [Editor]\n\
        Bookmarks: 1300,2600\n\
        \n\
        [Metadata]\n\
        Title:Okaerinasai\n\
        Version:Collab\n\
        \n\
        [Difficulty]\n\
        HPDrainRate:5\n\
        OverallDifficulty:8\n\
        ApproachRate:9\n\
        \n\
        [Events]\n\
        0,0,\"bg.jpg\",0,0\n\
        2,13000,26000\n\
        \n\
        [TimingPoints]\n\
        1000,500.0,4,1,0,60,1,0\n\
        2000,-50,4,1,0,60,0,0\n\
        \n\
        [HitObjects]\n\
        256,192,1300,1,0,0:0:0:0:\n\
        256,192,2600,12,0,5200,0:0:0:0:";

    fn map() -> Document {
        parse(MAP).unwrap()
    }

    fn kv<'a>(doc: &'a Document, kind: SectionKind, key: &str) -> &'a str {
        doc.key_value(kind).unwrap().get(key).unwrap()
    }

    #[test]
    fn test_invalid_rate() {
        assert_eq!(RateTransform::new(0.0).unwrap_err(), TransformError::InvalidRate(0.0));
        assert!(RateTransform::new(-1.5).is_err());
        assert!(RateTransform::new(f64::NAN).is_err());
        assert!(RateTransform::new(f64::INFINITY).is_err());
        assert!(transform(&map(), 0.0).is_err());
    }

    #[test]
    fn test_transform_at_1_3() {
        let source = map();
        let (doc, job) = transform(&source, 1.3).unwrap();

        assert_eq!(kv(&doc, SectionKind::Metadata, "Version"), "Collab 1.3x");
        assert_eq!(kv(&doc, SectionKind::General, "AudioLeadIn"), "769");
        assert_eq!(kv(&doc, SectionKind::General, "PreviewTime"), "20000");
        assert_eq!(kv(&doc, SectionKind::General, "AudioFilename"), "1.3-audio.mp3");
        assert_eq!(kv(&doc, SectionKind::General, "Mode"), "0");
        assert_eq!(kv(&doc, SectionKind::Editor, "Bookmarks"), "1000,2000");
        assert_eq!(kv(&doc, SectionKind::Difficulty, "ApproachRate"), "9.9");
        // hw 32 / 1.3 = 24.6 -> OD 9.23
        assert_eq!(kv(&doc, SectionKind::Difficulty, "OverallDifficulty"), "9.2");
        assert_eq!(kv(&doc, SectionKind::Difficulty, "HPDrainRate"), "5");

        let points = doc.records(SectionKind::TimingPoints).unwrap();
        assert_eq!(points[0].field(0), Some("769"));
        let beat: f64 = points[0].field(1).unwrap().parse().unwrap();
        assert!((beat - 500.0 / 1.3).abs() < 1e-9);

        let events = doc.records(SectionKind::Events).unwrap();
        assert_eq!(events[1].to_line(), "2,10000,20000");

        let objects = doc.records(SectionKind::HitObjects).unwrap();
        assert_eq!(objects[0].field(2), Some("1000"));
        assert_eq!(objects[1].field(2), Some("2000"));
        assert_eq!(objects[1].field(5), Some("4000"));

        assert_eq!(
            job,
            AudioJob {
                source: "audio.mp3".to_string(),
                rate: 1.3,
                destination: "1.3-audio.mp3".to_string(),
            }
        );

        // input untouched
        assert_eq!(kv(&source, SectionKind::Metadata, "Version"), "Collab");
    }

    #[test]
    fn test_compensating_reduction() {
        let mut doc = map();
        let difficulty = doc.key_value_mut(SectionKind::Difficulty).unwrap();
        difficulty.set("ApproachRate", "10");
        difficulty.set("OverallDifficulty", "10");

        let change = RateTransform::new(2.0).unwrap().apply(&doc).unwrap();
        assert!((change.effective_rate - 2.0 / 1.5).abs() < 1e-12);
        assert_eq!(change.requested_rate, 2.0);

        let out = &change.document;
        assert_eq!(kv(out, SectionKind::Metadata, "Version"), "Collab 2x");
        assert_eq!(kv(out, SectionKind::Difficulty, "ApproachRate"), "10");
        assert_eq!(kv(out, SectionKind::Difficulty, "OverallDifficulty"), "10");
        // 1300 / 1.333 = 975
        assert_eq!(out.records(SectionKind::HitObjects).unwrap()[0].field(2), Some("975"));
        assert_eq!(kv(out, SectionKind::General, "AudioLeadIn"), "750");
        assert_eq!(change.audio_job.rate, 2.0);
        assert_eq!(change.audio_job.destination, "2-audio.mp3");
    }

    #[test]
    fn test_slowdown_expands_time() {
        let (doc, _) = transform(&map(), 0.5).unwrap();
        assert_eq!(kv(&doc, SectionKind::General, "AudioLeadIn"), "2000");
        assert_eq!(doc.records(SectionKind::HitObjects).unwrap()[0].field(2), Some("2600"));
        // AR 9 at half speed: preempt 1200 -> AR 5
        assert_eq!(kv(&doc, SectionKind::Difficulty, "ApproachRate"), "5");
    }

    #[test]
    fn test_difficulty_stays_in_range() {
        for rate in [0.25, 0.5, 0.75, 1.0, 1.5, 2.0, 3.0] {
            for (ar, od) in [("0", "0"), ("5", "5"), ("10", "10"), ("7.5", "3")] {
                let mut doc = map();
                let difficulty = doc.key_value_mut(SectionKind::Difficulty).unwrap();
                difficulty.set("ApproachRate", ar);
                difficulty.set("OverallDifficulty", od);

                let (out, _) = transform(&doc, rate).unwrap();
                for key in ["ApproachRate", "OverallDifficulty"] {
                    let value: f64 = kv(&out, SectionKind::Difficulty, key).parse().unwrap();
                    assert!((0.0..=10.0).contains(&value), "{key}={value} at rate {rate}");
                }
            }
        }
    }

    /// Every timestamp the transform rewrites, in document order
    fn timestamps(doc: &Document) -> Vec<i64> {
        use crate::core::record::{event, hit_object, timing_point};

        let number = |text: &str| text.trim().parse::<i64>().unwrap();
        let mut times = Vec::new();

        let general = doc.key_value(SectionKind::General).unwrap();
        times.push(number(general.get("AudioLeadIn").unwrap()));
        times.push(number(general.get("PreviewTime").unwrap()));

        let bookmarks = kv(doc, SectionKind::Editor, "Bookmarks");
        times.extend(bookmarks.split(',').map(number));

        for record in doc.records(SectionKind::Events).unwrap() {
            times.push(number(record.field(event::START_TIME).unwrap()));
            if event::is_break(record) {
                times.push(number(record.field(event::END_TIME).unwrap()));
            }
        }
        for record in doc.records(SectionKind::TimingPoints).unwrap() {
            times.push(number(record.field(timing_point::TIME).unwrap()));
        }
        for record in doc.records(SectionKind::HitObjects).unwrap() {
            times.push(number(record.field(hit_object::TIME).unwrap()));
            let object_type: u32 = record.field(hit_object::TYPE).unwrap().parse().unwrap();
            if hit_object::is_spinner(object_type) {
                times.push(number(record.field(hit_object::SPINNER_END_TIME).unwrap()));
            }
        }
        times
    }

    #[test]
    fn test_timestamps_move_with_rate() {
        let source = map();
        let before = timestamps(&source);
        // lead-in, preview, 2 bookmarks, bg start, break start/end,
        // 2 timing points, 2 objects, spinner end
        assert_eq!(before.len(), 12);

        for rate in [1.3, 1.7, 2.0, 3.0] {
            let (out, _) = transform(&source, rate).unwrap();
            let after = timestamps(&out);
            assert_eq!(after.len(), before.len());
            for (t0, t1) in before.iter().zip(&after) {
                assert!(t1 <= t0, "{t1} > {t0} at rate {rate}");
            }
            assert!(before.iter().zip(&after).any(|(t0, t1)| t1 < t0));
        }

        for rate in [0.5, 0.75, 0.9] {
            let (out, _) = transform(&source, rate).unwrap();
            let after = timestamps(&out);
            assert_eq!(after.len(), before.len());
            for (t0, t1) in before.iter().zip(&after) {
                assert!(t1 >= t0, "{t1} < {t0} at rate {rate}");
            }
            assert!(before.iter().zip(&after).any(|(t0, t1)| t1 > t0));
        }
    }

    #[test]
    fn test_missing_required_field() {
        let mut doc = map();
        let mut difficulty = crate::core::KeyValueSection::new();
        difficulty.set("OverallDifficulty", "8");
        doc.insert(SectionKind::Difficulty, crate::core::Section::KeyValue(difficulty));

        assert_eq!(
            transform(&doc, 1.5).unwrap_err(),
            TransformError::MissingRequiredField {
                section: SectionKind::Difficulty,
                key: "ApproachRate".to_string(),
            }
        );
    }

    #[test]
    fn test_missing_section() {
        let doc = parse("v14\n[Metadata]\nVersion:Hard\n").unwrap();
        assert_eq!(
            transform(&doc, 1.5).unwrap_err(),
            TransformError::MissingSection(SectionKind::General)
        );
    }

    #[test]
    fn test_optional_fields_absent() {
        let doc = parse(
            "v14\n[General]\nAudioFilename: a.ogg\n\n[Metadata]\nVersion:X\n\n[Difficulty]\nApproachRate:5\nOverallDifficulty:5\n",
        )
        .unwrap();
        let (out, job) = transform(&doc, 1.5).unwrap();
        assert!(!out.contains(SectionKind::HitObjects));
        assert!(!out.key_value(SectionKind::General).unwrap().contains_key("AudioLeadIn"));
        assert_eq!(job.destination, "1.5-a.mp3");
    }
}
