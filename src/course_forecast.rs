//! "What do I need on the rest of the course?"

use serde::Serialize;

use crate::aggregate::{course_percentage, known_progress};
use crate::config::ForecastConfig;
use crate::error::{ensure_range, GradeError, Result};
use crate::models::Assessment;
use crate::required::{minimum_required, Requirement};
use crate::scale::{round2, MAX_PERCENT};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TargetStatus {
    Satisfied,
    Impossible,
    Pending,
}

impl From<Requirement> for TargetStatus {
    fn from(requirement: Requirement) -> Self {
        match requirement {
            Requirement::Satisfied => TargetStatus::Satisfied,
            Requirement::Impossible => TargetStatus::Impossible,
            Requirement::Needed(_) => TargetStatus::Pending,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssessmentForecast {
    #[serde(flatten)]
    pub assessment: Assessment,
    pub score: Option<f64>,
    pub minimum_required: Option<Requirement>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CourseSummary {
    pub total_weight: f64,
    pub earned_weighted: f64,
    pub unknown_weight: f64,
    pub current_percentage: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CourseTargetAnalysis {
    pub target_grade: f64,
    pub status: TargetStatus,
    pub required_average: Requirement,
    /// Final grade if every ungraded item lands exactly on the required average.
    pub projected_grade: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CourseForecast {
    pub assessments: Vec<AssessmentForecast>,
    pub summary: CourseSummary,
    pub target_analysis: CourseTargetAnalysis,
}

/// Projects the scores needed to reach `target_grade`.
///
/// Each ungraded row is solved on its own: its weight is the only open
/// weight and every other ungraded item contributes nothing. The target
/// analysis instead spreads the gap across all ungraded weight.
pub fn forecast_course(
    assessments: &[Assessment],
    target_grade: f64,
    config: &ForecastConfig,
) -> Result<CourseForecast> {
    let target_grade = ensure_range("target_grade", target_grade, 0.0, MAX_PERCENT)?;

    let total_weight: f64 = assessments.iter().map(Assessment::weight).sum();
    if (total_weight - MAX_PERCENT).abs() > config.weight_tolerance {
        return Err(GradeError::IncompleteScheme {
            total_weight,
            tolerance: config.weight_tolerance,
        });
    }

    let progress = known_progress(assessments);
    let unknown_weight = total_weight - progress.completed_weight;

    let rows = assessments
        .iter()
        .map(|assessment| AssessmentForecast {
            assessment: assessment.clone(),
            score: assessment.score().map(round2),
            minimum_required: (!assessment.is_graded()).then(|| {
                minimum_required(target_grade, progress.weighted_sum, assessment.weight())
            }),
        })
        .collect();

    let required_average = minimum_required(target_grade, progress.weighted_sum, unknown_weight);
    let filled = required_average.score().unwrap_or(MAX_PERCENT);
    let projected_grade = progress.weighted_sum + filled * unknown_weight / MAX_PERCENT;

    tracing::debug!(
        target_grade,
        total_weight,
        unknown_weight,
        status = ?TargetStatus::from(required_average),
        "course forecast computed"
    );

    Ok(CourseForecast {
        assessments: rows,
        summary: CourseSummary {
            total_weight: round2(total_weight),
            earned_weighted: round2(progress.weighted_sum),
            unknown_weight: round2(unknown_weight),
            current_percentage: course_percentage(assessments).map(round2),
        },
        target_analysis: CourseTargetAnalysis {
            target_grade,
            status: required_average.into(),
            required_average,
            projected_grade: round2(projected_grade),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graded(name: &str, weight: f64, marks: f64, earned: f64) -> Assessment {
        Assessment::new(name, "Assignment", weight, marks, Some(earned)).unwrap()
    }

    fn pending(name: &str, weight: f64) -> Assessment {
        Assessment::new(name, "Final", weight, 100.0, None).unwrap()
    }

    fn config() -> ForecastConfig {
        ForecastConfig::default()
    }

    #[test]
    fn remaining_weight_needs_the_gap_rescaled() {
        let assessments = vec![graded("Midterm", 60.0, 50.0, 40.0), pending("Final", 40.0)];
        let forecast = forecast_course(&assessments, 80.0, &config()).unwrap();

        assert_eq!(forecast.target_analysis.status, TargetStatus::Pending);
        assert_eq!(forecast.assessments[0].minimum_required, None);
        match forecast.assessments[1].minimum_required {
            Some(Requirement::Needed(score)) => assert!((score - 80.0).abs() < 0.001),
            other => panic!("unexpected requirement {other:?}"),
        }
        assert!((forecast.target_analysis.projected_grade - 80.0).abs() < 0.001);
        assert!((forecast.summary.earned_weighted - 48.0).abs() < 0.001);
        assert_eq!(forecast.summary.current_percentage, Some(80.0));
    }

    #[test]
    fn rows_are_solved_independently() {
        let assessments = vec![
            graded("Midterm", 50.0, 100.0, 80.0),
            pending("Project", 20.0),
            pending("Final", 30.0),
        ];
        let forecast = forecast_course(&assessments, 70.0, &config()).unwrap();

        // gap is 30 points: a 20% item alone cannot cover it, a 30% item needs 100
        assert_eq!(
            forecast.assessments[1].minimum_required,
            Some(Requirement::Impossible)
        );
        assert_eq!(
            forecast.assessments[2].minimum_required,
            Some(Requirement::Needed(100.0))
        );
        assert_eq!(
            forecast.target_analysis.required_average,
            Requirement::Needed(60.0)
        );
        assert_eq!(forecast.target_analysis.status, TargetStatus::Pending);
    }

    #[test]
    fn fully_graded_course_reports_satisfied_or_impossible() {
        let assessments = vec![graded("A", 50.0, 10.0, 9.0), graded("B", 50.0, 10.0, 7.0)];

        let met = forecast_course(&assessments, 75.0, &config()).unwrap();
        assert_eq!(met.target_analysis.status, TargetStatus::Satisfied);

        let missed = forecast_course(&assessments, 90.0, &config()).unwrap();
        assert_eq!(missed.target_analysis.status, TargetStatus::Impossible);
        assert!((missed.target_analysis.projected_grade - 80.0).abs() < 0.001);
    }

    #[test]
    fn target_out_of_reach_is_impossible() {
        let assessments = vec![graded("Midterm", 80.0, 100.0, 25.0), pending("Final", 20.0)];
        let forecast = forecast_course(&assessments, 95.0, &config()).unwrap();
        assert_eq!(forecast.target_analysis.status, TargetStatus::Impossible);
        assert_eq!(
            forecast.assessments[1].minimum_required,
            Some(Requirement::Impossible)
        );
    }

    #[test]
    fn fractionally_unreachable_target_is_impossible() {
        // 59.999 earned leaves 40.001 points for a 40% final
        let assessments = vec![
            graded("Midterm", 60.0, 1000.0, 999.983_333_333),
            pending("Final", 40.0),
        ];
        let forecast = forecast_course(&assessments, 100.0, &config()).unwrap();
        assert_eq!(forecast.target_analysis.status, TargetStatus::Impossible);
        assert_eq!(
            forecast.assessments[1].minimum_required,
            Some(Requirement::Impossible)
        );
    }

    #[test]
    fn incomplete_scheme_is_rejected() {
        let assessments = vec![graded("Midterm", 50.0, 100.0, 80.0), pending("Final", 30.0)];
        let err = forecast_course(&assessments, 70.0, &config()).unwrap_err();
        assert!(matches!(err, GradeError::IncompleteScheme { .. }));
    }

    #[test]
    fn tolerance_comes_from_config() {
        let assessments = vec![graded("Midterm", 50.0, 100.0, 80.0), pending("Final", 49.5)];
        assert!(forecast_course(&assessments, 70.0, &config()).is_err());

        let loose = ForecastConfig {
            weight_tolerance: 1.0,
        };
        assert!(forecast_course(&assessments, 70.0, &loose).is_ok());
    }

    #[test]
    fn invalid_target_is_rejected() {
        let assessments = vec![pending("Final", 100.0)];
        assert!(forecast_course(&assessments, 120.0, &config()).is_err());
        assert!(forecast_course(&assessments, f64::NAN, &config()).is_err());
    }

    #[test]
    fn input_is_left_untouched() {
        let assessments = vec![graded("Midterm", 60.0, 50.0, 40.0), pending("Final", 40.0)];
        let before = assessments.clone();
        let first = forecast_course(&assessments, 80.0, &config()).unwrap();
        let second = forecast_course(&assessments, 80.0, &config()).unwrap();
        assert_eq!(assessments, before);
        assert_eq!(first, second);
    }
}
