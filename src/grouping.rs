use std::cmp::Ordering;
use std::collections::HashMap;

use serde::Serialize;
use uuid::Uuid;

use crate::aggregate::{course_percentage, known_progress};
use crate::models::{Assessment, Course};
use crate::scale::{percent_to_gpa, round2};

pub const UNKNOWN_TERM_RANK: u32 = 999;

pub fn term_rank(term: &str) -> u32 {
    match term {
        "Spring" => 0,
        "Summer" => 1,
        "Fall" => 2,
        "Winter" => 3,
        _ => UNKNOWN_TERM_RANK,
    }
}

/// Sort key for a `"<Term> <Year>"` label. Labels are never parsed into dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SemesterKey {
    pub year: i32,
    pub term_rank: u32,
}

impl SemesterKey {
    pub fn parse(label: &str) -> Self {
        let mut parts = label.split_whitespace();
        let term = parts.next().unwrap_or_default();
        let year = parts.next().map_or(0, leading_year);

        Self {
            year,
            term_rank: term_rank(term),
        }
    }
}

// "2025," and "2025)" still carry a year
fn leading_year(token: &str) -> i32 {
    let end = token
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(token.len());
    token[..end].parse().unwrap_or(0)
}

pub fn compare_semesters(a: &str, b: &str) -> Ordering {
    SemesterKey::parse(a).cmp(&SemesterKey::parse(b))
}

pub fn sort_semesters<S: AsRef<str>>(labels: &mut [S]) {
    labels.sort_by(|a, b| compare_semesters(a.as_ref(), b.as_ref()));
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CourseGrade {
    pub course_code: String,
    pub credits: f64,
    pub grade: Option<f64>,
    pub gpa: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SemesterSummary {
    pub semester: String,
    pub gpa: f64,
    /// Credits that carry a grade; ungraded courses are listed but not counted.
    pub credits: f64,
    pub courses: Vec<CourseGrade>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GpaBreakdown {
    pub semesters: Vec<SemesterSummary>,
    pub cumulative_gpa: f64,
    pub total_credits: f64,
}

#[derive(Default)]
struct PointTally {
    points: f64,
    credits: f64,
}

impl PointTally {
    fn add(&mut self, gpa: f64, credits: f64) {
        self.points += gpa * credits;
        self.credits += credits;
    }

    fn gpa(&self) -> f64 {
        if self.credits > 0.0 {
            self.points / self.credits
        } else {
            0.0
        }
    }
}

/// Groups courses by their semester label and rolls up credit-weighted GPA.
///
/// `assessments` is keyed by course id; a course with no entry is treated as
/// ungraded. Blank labels are grouped under `"Unknown"`.
pub fn gpa_breakdown(courses: &[Course], assessments: &HashMap<Uuid, Vec<Assessment>>) -> GpaBreakdown {
    let mut groups: HashMap<String, (PointTally, Vec<CourseGrade>)> = HashMap::new();
    let mut overall = PointTally::default();

    for course in courses {
        let semester = if course.semester().trim().is_empty() {
            "Unknown".to_string()
        } else {
            course.semester().to_string()
        };
        let grade = assessments
            .get(&course.course_id())
            .and_then(|rows| course_percentage(rows));
        let gpa = grade.map(percent_to_gpa);

        let entry = groups.entry(semester).or_default();
        if let Some(gpa) = gpa {
            entry.0.add(gpa, course.credit_hours());
            overall.add(gpa, course.credit_hours());
        }
        entry.1.push(CourseGrade {
            course_code: course.course_code().to_string(),
            credits: course.credit_hours(),
            grade: grade.map(round2),
            gpa: gpa.map(round2),
        });
    }

    let mut semesters: Vec<SemesterSummary> = groups
        .into_iter()
        .map(|(semester, (tally, courses))| SemesterSummary {
            semester,
            gpa: round2(tally.gpa()),
            credits: tally.credits,
            courses,
        })
        .collect();

    // equal keys (two unrecognized terms in one year) fall back to the label
    semesters.sort_by(|a, b| {
        compare_semesters(&a.semester, &b.semester).then_with(|| a.semester.cmp(&b.semester))
    });

    GpaBreakdown {
        semesters,
        cumulative_gpa: round2(overall.gpa()),
        total_credits: overall.credits,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypeSummary {
    pub assessment_type: String,
    pub count: usize,
    pub graded_count: usize,
    pub total_weight: f64,
    pub average_score: Option<f64>,
}

pub fn summarize_by_type<'a>(assessments: impl IntoIterator<Item = &'a Assessment>) -> Vec<TypeSummary> {
    let mut map: HashMap<String, Vec<Assessment>> = HashMap::new();

    for assessment in assessments {
        map.entry(assessment.assessment_type().to_string())
            .or_default()
            .push(assessment.clone());
    }

    let mut summaries: Vec<TypeSummary> = map
        .into_iter()
        .map(|(assessment_type, rows)| {
            let progress = known_progress(&rows);
            TypeSummary {
                assessment_type,
                count: rows.len(),
                graded_count: rows.iter().filter(|a| a.is_graded()).count(),
                total_weight: round2(rows.iter().map(Assessment::weight).sum()),
                average_score: (progress.completed_weight > 0.0)
                    .then(|| round2(progress.weighted_sum / progress.completed_weight * 100.0)),
            }
        })
        .collect();

    summaries.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| a.assessment_type.cmp(&b.assessment_type))
    });
    summaries
}
