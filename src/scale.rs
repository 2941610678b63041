//! Percentage, GPA and letter-grade conversions.
//!
//! The percent→GPA map is linear and capped at [`LINEAR_GPA_CAP`], while GPA
//! inputs and targets may go up to [`MAX_GPA`] (an A+). The two ceilings
//! differ on purpose; see [`gpa_to_percent`].

pub const MAX_GPA: f64 = 4.33;

pub const LINEAR_GPA_CAP: f64 = 4.0;

pub const MAX_PERCENT: f64 = 100.0;

const LETTER_BANDS: [(f64, &str); 10] = [
    (90.0, "A+"),
    (85.0, "A"),
    (80.0, "A-"),
    (77.0, "B+"),
    (73.0, "B"),
    (70.0, "B-"),
    (67.0, "C+"),
    (63.0, "C"),
    (60.0, "C-"),
    (50.0, "D"),
];

pub fn percent_to_gpa(percent: f64) -> f64 {
    (percent / MAX_PERCENT * LINEAR_GPA_CAP).clamp(0.0, LINEAR_GPA_CAP)
}

/// Inverse of [`percent_to_gpa`], clamped to 0..=100.
///
/// A GPA between 4.0 and 4.33 has no linear preimage and maps to 100%.
pub fn gpa_to_percent(gpa: f64) -> f64 {
    (gpa / LINEAR_GPA_CAP * MAX_PERCENT).clamp(0.0, MAX_PERCENT)
}

pub fn letter_for_percentage(percent: f64) -> Option<&'static str> {
    if !percent.is_finite() {
        return None;
    }

    let letter = LETTER_BANDS
        .iter()
        .find(|(floor, _)| percent >= *floor)
        .map_or("F", |(_, letter)| *letter);
    Some(letter)
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
