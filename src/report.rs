use std::fmt::Write;

use chrono::NaiveDate;

use crate::grouping::{GpaBreakdown, TypeSummary};
use crate::scale::letter_for_percentage;

pub fn build_report(
    student: Option<&str>,
    generated_on: NaiveDate,
    breakdown: &GpaBreakdown,
    types: &[TypeSummary],
) -> String {
    let mut output = String::new();
    let student_label = student.unwrap_or("all courses");

    let _ = writeln!(output, "# Grade Forecast Report");
    let _ = writeln!(output, "Generated for {} on {}", student_label, generated_on);
    let _ = writeln!(output);
    let _ = writeln!(
        output,
        "Cumulative GPA: {:.2} across {} graded credits",
        breakdown.cumulative_gpa, breakdown.total_credits
    );
    let _ = writeln!(output);
    let _ = writeln!(output, "## Semesters");

    if breakdown.semesters.is_empty() {
        let _ = writeln!(output, "No courses recorded.");
    }

    for semester in &breakdown.semesters {
        let _ = writeln!(output);
        let _ = writeln!(
            output,
            "### {} (GPA {:.2}, {} credits)",
            semester.semester, semester.gpa, semester.credits
        );
        for course in &semester.courses {
            match (course.grade, course.gpa) {
                (Some(grade), Some(gpa)) => {
                    let _ = writeln!(
                        output,
                        "- {}: {:.2}% ({}) GPA {:.2}, {} credits",
                        course.course_code,
                        grade,
                        letter_for_percentage(grade).unwrap_or("-"),
                        gpa,
                        course.credits
                    );
                }
                _ => {
                    let _ = writeln!(
                        output,
                        "- {}: not graded yet, {} credits",
                        course.course_code, course.credits
                    );
                }
            }
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Assessment Mix");

    if types.is_empty() {
        let _ = writeln!(output, "No assessments recorded.");
    } else {
        for summary in types {
            let average = summary
                .average_score
                .map_or_else(|| "-".to_string(), |score| format!("{score:.2}%"));
            let _ = writeln!(
                output,
                "- {}: {} items ({} graded), {:.2}% total weight, average {}",
                summary.assessment_type,
                summary.count,
                summary.graded_count,
                summary.total_weight,
                average
            );
        }
    }

    output
}
