//! Cumulative GPA projection over hypothetical future courses.

use serde::Serialize;

use crate::course_forecast::TargetStatus;
use crate::error::{ensure_range, Result};
use crate::models::{GpaStanding, HypotheticalCourse};
use crate::required::{solve, Requirement};
use crate::scale::{gpa_to_percent, percent_to_gpa, round2, MAX_GPA};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CurrentStanding {
    pub gpa: f64,
    pub credits: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Projection {
    pub cumulative_gpa: f64,
    pub total_credits: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HypotheticalForecast {
    pub course_code: String,
    pub credits: f64,
    pub hypothetical: Option<f64>,
    pub gpa: Option<f64>,
    /// GPA this course alone must earn; `None` when its grade is already assumed.
    pub minimum_required: Option<Requirement>,
    pub minimum_required_percent: Option<Requirement>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GpaTargetAnalysis {
    pub target_gpa: f64,
    pub status: TargetStatus,
    pub required_avg_gpa: Requirement,
    pub estimated_percent: Requirement,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GpaForecast {
    pub current: CurrentStanding,
    pub projected: Projection,
    pub courses: Vec<HypotheticalForecast>,
    pub target_analysis: Option<GpaTargetAnalysis>,
}

struct Totals {
    known_points: f64,
    total_credits: f64,
    unknown_credits: f64,
}

fn totals(standing: &GpaStanding, courses: &[HypotheticalCourse]) -> Totals {
    courses.iter().fold(
        Totals {
            known_points: standing.grade_points(),
            total_credits: standing.total_credits(),
            unknown_credits: 0.0,
        },
        |mut acc, course| {
            match course.hypothetical() {
                Some(percent) => acc.known_points += percent_to_gpa(percent) * course.credits(),
                None => acc.unknown_credits += course.credits(),
            }
            acc.total_credits += course.credits();
            acc
        },
    )
}

/// Projects cumulative GPA and, given a target, the GPA each unknown course needs.
///
/// Unknown rows are solved one at a time with every other unknown counted
/// as zero points, mirroring the course-level forecast.
pub fn forecast_gpa(
    standing: &GpaStanding,
    courses: &[HypotheticalCourse],
    target_gpa: Option<f64>,
) -> Result<GpaForecast> {
    let target_gpa = target_gpa
        .map(|target| ensure_range("target_gpa", target, 0.0, MAX_GPA))
        .transpose()?;

    let Totals {
        known_points,
        total_credits,
        unknown_credits,
    } = totals(standing, courses);

    let cumulative_gpa = if total_credits > 0.0 {
        known_points / total_credits
    } else {
        0.0
    };

    let target_points = target_gpa.map(|target| target * total_credits);

    let rows = courses
        .iter()
        .map(|course| {
            let gpa = course.hypothetical().map(percent_to_gpa);
            let minimum_required = match (target_points, gpa) {
                (Some(needed), None) => Some(solve(needed, known_points, course.credits(), MAX_GPA)),
                _ => None,
            };

            HypotheticalForecast {
                course_code: course.code().to_string(),
                credits: course.credits(),
                hypothetical: course.hypothetical(),
                gpa: gpa.map(round2),
                minimum_required,
                minimum_required_percent: minimum_required
                    .map(|requirement| requirement.map_score(gpa_to_percent)),
            }
        })
        .collect();

    let target_analysis = target_gpa.zip(target_points).map(|(target, needed)| {
        let required_avg_gpa = solve(needed, known_points, unknown_credits, MAX_GPA);
        GpaTargetAnalysis {
            target_gpa: target,
            status: required_avg_gpa.into(),
            required_avg_gpa,
            estimated_percent: required_avg_gpa.map_score(gpa_to_percent),
        }
    });

    tracing::debug!(
        total_credits,
        unknown_credits,
        cumulative_gpa,
        "gpa forecast computed"
    );

    Ok(GpaForecast {
        current: CurrentStanding {
            gpa: standing.cumulative_gpa(),
            credits: standing.total_credits(),
        },
        projected: Projection {
            cumulative_gpa: round2(cumulative_gpa),
            total_credits,
        },
        courses: rows,
        target_analysis,
    })
}
