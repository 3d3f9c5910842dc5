//! Approach rate and overall difficulty under a rate change.
//!
//! Both parameters map to a duration (preempt, hit window). The duration is
//! divided by the rate and the mapping inverted to get the parameter a player
//! would see at normal speed.

/// Upper bound for stored difficulty values
pub const MAX_DIFFICULTY: f64 = 10.0;

/// Factor the rate is divided by when a simulated value would exceed the cap
pub const COMPENSATION_FACTOR: f64 = 1.5;

/// Preempt at approach rate 5
const PREEMPT_MID: f64 = 1200.0;

/// Approach time in milliseconds for an approach rate
pub fn preempt(approach_rate: f64) -> f64 {
    if approach_rate < 5.0 {
        PREEMPT_MID + 600.0 * (5.0 - approach_rate) / 5.0
    } else if approach_rate > 5.0 {
        PREEMPT_MID - 750.0 * (approach_rate - 5.0) / 5.0
    } else {
        PREEMPT_MID
    }
}

/// Approach rate for an approach time in milliseconds
pub fn approach_rate(preempt: f64) -> f64 {
    if preempt > PREEMPT_MID {
        (preempt - 1800.0) / -120.0
    } else if preempt < PREEMPT_MID {
        (preempt - 1950.0) / -150.0
    } else {
        5.0
    }
}

/// 300-judgement hit window in milliseconds
pub fn hit_window(overall_difficulty: f64) -> f64 {
    80.0 - 6.0 * overall_difficulty
}

/// Overall difficulty for a hit window in milliseconds
pub fn overall_difficulty(hit_window: f64) -> f64 {
    (hit_window - 80.0) / -6.0
}

/// Unrounded approach rate after playing at `rate`
pub fn scaled_approach_rate(approach_rate_value: f64, rate: f64) -> f64 {
    approach_rate(preempt(approach_rate_value) / rate)
}

/// Unrounded overall difficulty after playing at `rate`
pub fn scaled_overall_difficulty(overall_difficulty_value: f64, rate: f64) -> f64 {
    overall_difficulty(hit_window(overall_difficulty_value) / rate)
}

/// Rate actually applied to the map.
///
/// Simulates both parameters at the requested rate; if either would pass the
/// cap the rate is divided once by [`COMPENSATION_FACTOR`].
pub fn effective_rate(approach_rate_value: f64, overall_difficulty_value: f64, rate: f64) -> f64 {
    let simulated_ar = scaled_approach_rate(approach_rate_value, rate);
    let simulated_od = scaled_overall_difficulty(overall_difficulty_value, rate);

    if simulated_ar > MAX_DIFFICULTY || simulated_od > MAX_DIFFICULTY {
        rate / COMPENSATION_FACTOR
    } else {
        rate
    }
}

/// Round to one decimal (half away from zero) and clamp to `[0, 10]`
pub fn round_difficulty(value: f64) -> f64 {
    let rounded = (value * 10.0).round() / 10.0;
    // + 0.0 turns -0.0 into 0.0
    rounded.clamp(0.0, MAX_DIFFICULTY) + 0.0
}

/// Text form written back to the document (`9.9`, `10`)
pub fn format_difficulty(value: f64) -> String {
    value.to_string()
}
