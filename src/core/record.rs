//! Field layout of the record sections.
//!
//! Records are kept as raw strings; these helpers name the positions the rate
//! transform rewrites and answer the per-kind questions (is this event a
//! break, is this timing point uninherited, is this object a spinner).

/// `[Events]` records: `type,startTime,...`
pub mod event {
    use crate::core::Record;

    /// Event start time
    pub const START_TIME: usize = 1;
    /// Break end time
    pub const END_TIME: usize = 2;

    /// Breaks are tagged `2` or `Break` and carry an end time
    pub fn is_break(record: &Record) -> bool {
        matches!(record.field(0), Some("2") | Some("Break"))
    }
}

/// `[TimingPoints]` records: `time,beatLength,meter,sampleSet,sampleIndex,volume,uninherited,effects`
pub mod timing_point {
    use crate::core::Record;

    /// Timing point offset
    pub const TIME: usize = 0;
    /// Milliseconds per beat, or a negative velocity multiplier when inherited
    pub const BEAT_LENGTH: usize = 1;
    /// `1` for uninherited points
    pub const UNINHERITED: usize = 6;

    /// Whether the beat length is an absolute duration.
    ///
    /// Older format versions omit the flag; there a positive beat length
    /// marks an uninherited point.
    pub fn is_uninherited(record: &Record) -> bool {
        match record.field(UNINHERITED) {
            Some(flag) => flag == "1",
            None => record
                .field(BEAT_LENGTH)
                .and_then(|v| v.parse::<f64>().ok())
                .is_some_and(|beat| beat > 0.0),
        }
    }
}

/// `[HitObjects]` records: `x,y,time,type,hitSound,...`
pub mod hit_object {
    /// Object start time
    pub const TIME: usize = 2;
    /// Type bitmask
    pub const TYPE: usize = 3;
    /// Spinner end time
    pub const SPINNER_END_TIME: usize = 5;
    /// Spinner bit in the type mask
    pub const SPINNER: u32 = 0x08;

    /// Whether the type mask marks a spinner
    pub fn is_spinner(object_type: u32) -> bool {
        object_type & SPINNER != 0
    }
}
