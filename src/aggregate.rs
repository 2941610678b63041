use serde::Serialize;

use crate::models::Assessment;
use crate::scale::MAX_PERCENT;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct KnownProgress {
    pub weighted_sum: f64,
    pub completed_weight: f64,
}

pub fn known_progress(assessments: &[Assessment]) -> KnownProgress {
    assessments
        .iter()
        .filter_map(|assessment| {
            assessment
                .weighted_contribution()
                .map(|contribution| (contribution, assessment.weight()))
        })
        .fold(KnownProgress::default(), |mut acc, (contribution, weight)| {
            acc.weighted_sum += contribution;
            acc.completed_weight += weight;
            acc
        })
}

/// Current course percentage, or `None` when nothing has been graded.
///
/// A partially graded course is rescaled to the weight completed so far.
/// Totals at or above 100 are taken at face value.
pub fn course_percentage(assessments: &[Assessment]) -> Option<f64> {
    let progress = known_progress(assessments);

    if progress.completed_weight <= 0.0 {
        return None;
    }

    let percentage = if progress.completed_weight < MAX_PERCENT {
        progress.weighted_sum / progress.completed_weight * MAX_PERCENT
    } else {
        progress.weighted_sum
    };

    percentage.is_finite().then_some(percentage)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn graded(weight: f64, marks: f64, earned: f64) -> Assessment {
        Assessment::new("graded", "Assignment", weight, marks, Some(earned)).unwrap()
    }

    fn pending(weight: f64) -> Assessment {
        Assessment::new("pending", "Final", weight, 100.0, None).unwrap()
    }

    #[test]
    fn full_weight_is_a_plain_weighted_sum() {
        let assessments = vec![
            graded(40.0, 100.0, 80.0),
            graded(30.0, 50.0, 45.0),
            graded(30.0, 10.0, 7.0),
        ];
        let percentage = course_percentage(&assessments).unwrap();
        assert!((percentage - 80.0).abs() < 0.001);
    }

    #[test]
    fn partial_weight_is_rescaled() {
        let assessments = vec![graded(40.0, 40.0, 32.0), pending(60.0)];
        let percentage = course_percentage(&assessments).unwrap();
        assert!((percentage - 80.0).abs() < 0.001);
    }

    #[test]
    fn nothing_graded_yields_none() {
        assert_eq!(course_percentage(&[]), None);
        assert_eq!(course_percentage(&[pending(50.0), pending(50.0)]), None);
    }

    #[test]
    fn zero_weight_grades_do_not_count() {
        assert_eq!(course_percentage(&[graded(0.0, 10.0, 10.0)]), None);
    }

    #[test]
    fn overweight_schemes_are_not_capped() {
        let assessments = vec![graded(60.0, 100.0, 100.0), graded(60.0, 100.0, 100.0)];
        let percentage = course_percentage(&assessments).unwrap();
        assert!((percentage - 120.0).abs() < 0.001);
    }

    #[test]
    fn progress_counts_only_graded_weight() {
        let progress = known_progress(&[graded(60.0, 10.0, 8.0), pending(40.0)]);
        assert!((progress.weighted_sum - 48.0).abs() < 0.001);
        assert!((progress.completed_weight - 60.0).abs() < 0.001);
    }

    proptest! {
        #[test]
        fn aggregation_is_finite_and_repeatable(
            rows in prop::collection::vec((0.0f64..=100.0, 0.1f64..500.0, prop::option::of(0.0f64..=1.0)), 0..12)
        ) {
            let assessments: Vec<Assessment> = rows
                .iter()
                .map(|(weight, marks, fraction)| {
                    Assessment::new("a", "Quiz", *weight, *marks, fraction.map(|f| f * marks)).unwrap()
                })
                .collect();

            let first = course_percentage(&assessments);
            prop_assert_eq!(first, course_percentage(&assessments));
            if let Some(value) = first {
                prop_assert!(value.is_finite());
                prop_assert!(value >= 0.0);
            }
        }
    }
}
