use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{ensure_finite, ensure_range, GradeError, Result};
use crate::scale::{MAX_GPA, MAX_PERCENT};

/// One graded (or not yet graded) piece of work inside a course.
///
/// Built only through [`Assessment::new`] or deserialization, both of which
/// validate, so every value in circulation has `marks > 0` and
/// `0 <= earned_marks <= marks`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "AssessmentRecord")]
pub struct Assessment {
    name: String,
    #[serde(rename = "type")]
    assessment_type: String,
    weight: f64,
    marks: f64,
    earned_marks: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AssessmentRecord {
    pub name: String,
    #[serde(rename = "type", default)]
    pub assessment_type: String,
    pub weight: f64,
    pub marks: f64,
    #[serde(default)]
    pub earned_marks: Option<f64>,
}

impl Assessment {
    pub fn new(
        name: impl Into<String>,
        assessment_type: impl Into<String>,
        weight: f64,
        marks: f64,
        earned_marks: Option<f64>,
    ) -> Result<Self> {
        let weight = ensure_range("weight", weight, 0.0, MAX_PERCENT)?;
        let marks = ensure_finite("marks", marks)?;
        if marks <= 0.0 {
            return Err(GradeError::invalid("marks", format!("{marks} must be greater than zero")));
        }
        let earned_marks = earned_marks
            .map(|earned| ensure_range("earned_marks", earned, 0.0, marks))
            .transpose()?;

        Ok(Self {
            name: name.into(),
            assessment_type: assessment_type.into(),
            weight,
            marks,
            earned_marks,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn assessment_type(&self) -> &str {
        &self.assessment_type
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub fn marks(&self) -> f64 {
        self.marks
    }

    pub fn earned_marks(&self) -> Option<f64> {
        self.earned_marks
    }

    pub fn is_graded(&self) -> bool {
        self.earned_marks.is_some()
    }

    pub fn score(&self) -> Option<f64> {
        self.earned_marks
            .map(|earned| earned / self.marks * MAX_PERCENT)
    }

    pub fn weighted_contribution(&self) -> Option<f64> {
        self.score().map(|score| score * self.weight / MAX_PERCENT)
    }
}

impl TryFrom<AssessmentRecord> for Assessment {
    type Error = GradeError;

    fn try_from(record: AssessmentRecord) -> Result<Self> {
        Assessment::new(
            record.name,
            record.assessment_type,
            record.weight,
            record.marks,
            record.earned_marks,
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "CourseRecord")]
pub struct Course {
    course_id: Uuid,
    course_code: String,
    course_name: String,
    credit_hours: f64,
    semester: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CourseRecord {
    #[serde(default)]
    pub course_id: Option<Uuid>,
    pub course_code: String,
    #[serde(default)]
    pub course_name: String,
    pub credit_hours: f64,
    #[serde(default)]
    pub semester: String,
}

impl Course {
    pub fn new(
        course_code: impl Into<String>,
        course_name: impl Into<String>,
        credit_hours: f64,
        semester: impl Into<String>,
    ) -> Result<Self> {
        Self::with_id(Uuid::new_v4(), course_code, course_name, credit_hours, semester)
    }

    pub fn with_id(
        course_id: Uuid,
        course_code: impl Into<String>,
        course_name: impl Into<String>,
        credit_hours: f64,
        semester: impl Into<String>,
    ) -> Result<Self> {
        let course_code = course_code.into();
        if course_code.trim().is_empty() {
            return Err(GradeError::invalid("course_code", "must not be empty"));
        }
        let credit_hours = ensure_finite("credit_hours", credit_hours)?;
        if credit_hours <= 0.0 {
            return Err(GradeError::invalid(
                "credit_hours",
                format!("{credit_hours} must be greater than zero"),
            ));
        }

        Ok(Self {
            course_id,
            course_code,
            course_name: course_name.into(),
            credit_hours,
            semester: semester.into(),
        })
    }

    pub fn course_id(&self) -> Uuid {
        self.course_id
    }

    pub fn course_code(&self) -> &str {
        &self.course_code
    }

    pub fn course_name(&self) -> &str {
        &self.course_name
    }

    pub fn credit_hours(&self) -> f64 {
        self.credit_hours
    }

    pub fn semester(&self) -> &str {
        &self.semester
    }
}

impl TryFrom<CourseRecord> for Course {
    type Error = GradeError;

    fn try_from(record: CourseRecord) -> Result<Self> {
        Course::with_id(
            record.course_id.unwrap_or_else(Uuid::new_v4),
            record.course_code,
            record.course_name,
            record.credit_hours,
            record.semester,
        )
    }
}

/// A future course in a what-if scenario. `hypothetical` is a percentage;
/// `None` marks the course as an unknown to solve for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "HypotheticalRecord")]
pub struct HypotheticalCourse {
    code: String,
    credits: f64,
    hypothetical: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HypotheticalRecord {
    pub code: String,
    pub credits: f64,
    #[serde(default)]
    pub hypothetical: Option<f64>,
}

impl HypotheticalCourse {
    pub fn new(code: impl Into<String>, credits: f64, hypothetical: Option<f64>) -> Result<Self> {
        let credits = ensure_finite("credits", credits)?;
        if credits <= 0.0 {
            return Err(GradeError::invalid("credits", format!("{credits} must be greater than zero")));
        }
        let hypothetical = hypothetical
            .map(|percent| ensure_range("hypothetical", percent, 0.0, MAX_PERCENT))
            .transpose()?;

        Ok(Self {
            code: code.into(),
            credits,
            hypothetical,
        })
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn credits(&self) -> f64 {
        self.credits
    }

    pub fn hypothetical(&self) -> Option<f64> {
        self.hypothetical
    }
}

impl TryFrom<HypotheticalRecord> for HypotheticalCourse {
    type Error = GradeError;

    fn try_from(record: HypotheticalRecord) -> Result<Self> {
        HypotheticalCourse::new(record.code, record.credits, record.hypothetical)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "StandingRecord")]
pub struct GpaStanding {
    cumulative_gpa: f64,
    total_credits: f64,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct StandingRecord {
    pub cumulative_gpa: f64,
    pub total_credits: f64,
}

impl GpaStanding {
    pub fn new(cumulative_gpa: f64, total_credits: f64) -> Result<Self> {
        let cumulative_gpa = ensure_range("cumulative_gpa", cumulative_gpa, 0.0, MAX_GPA)?;
        let total_credits = ensure_finite("total_credits", total_credits)?;
        if total_credits < 0.0 {
            return Err(GradeError::invalid(
                "total_credits",
                format!("{total_credits} must not be negative"),
            ));
        }

        Ok(Self {
            cumulative_gpa,
            total_credits,
        })
    }

    pub fn cumulative_gpa(&self) -> f64 {
        self.cumulative_gpa
    }

    pub fn total_credits(&self) -> f64 {
        self.total_credits
    }

    pub fn grade_points(&self) -> f64 {
        self.cumulative_gpa * self.total_credits
    }
}

impl TryFrom<StandingRecord> for GpaStanding {
    type Error = GradeError;

    fn try_from(record: StandingRecord) -> Result<Self> {
        GpaStanding::new(record.cumulative_gpa, record.total_credits)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GpaScenario {
    pub current: GpaStanding,
    #[serde(default)]
    pub courses: Vec<HypotheticalCourse>,
    #[serde(default)]
    pub target_gpa: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_marks_are_rejected() {
        let err = Assessment::new("Quiz 1", "Quiz", 10.0, 0.0, Some(0.0)).unwrap_err();
        assert!(matches!(err, GradeError::InvalidInput { field: "marks", .. }));
    }

    #[test]
    fn earned_marks_cannot_exceed_marks() {
        assert!(Assessment::new("Lab", "Lab", 10.0, 20.0, Some(21.0)).is_err());
        assert!(Assessment::new("Lab", "Lab", 10.0, 20.0, Some(20.0)).is_ok());
    }

    #[test]
    fn weight_must_be_a_percentage() {
        assert!(Assessment::new("Final", "Final", 101.0, 100.0, None).is_err());
        assert!(Assessment::new("Final", "Final", -1.0, 100.0, None).is_err());
        assert!(Assessment::new("Final", "Final", f64::NAN, 100.0, None).is_err());
    }

    #[test]
    fn score_and_contribution_follow_marks() {
        let midterm = Assessment::new("Midterm", "Midterm", 40.0, 40.0, Some(32.0)).unwrap();
        assert!((midterm.score().unwrap() - 80.0).abs() < 0.001);
        assert!((midterm.weighted_contribution().unwrap() - 32.0).abs() < 0.001);

        let ungraded = Assessment::new("Final", "Final", 60.0, 100.0, None).unwrap();
        assert_eq!(ungraded.score(), None);
        assert!(!ungraded.is_graded());
    }

    #[test]
    fn deserialization_runs_validation() {
        let ok: Assessment = serde_json::from_str(
            r#"{"name":"A1","type":"Assignment","weight":10,"marks":50,"earned_marks":45}"#,
        )
        .unwrap();
        assert_eq!(ok.assessment_type(), "Assignment");

        let bad = serde_json::from_str::<Assessment>(
            r#"{"name":"A1","type":"Assignment","weight":10,"marks":0,"earned_marks":null}"#,
        );
        assert!(bad.is_err());
    }

    #[test]
    fn courses_need_positive_credits_and_a_code() {
        assert!(Course::new("CPSC 1150", "Program Design", 0.0, "Fall 2025").is_err());
        assert!(Course::new("  ", "Program Design", 3.0, "Fall 2025").is_err());
        let course = Course::new("CPSC 1150", "Program Design", 3.0, "Fall 2025").unwrap();
        assert_eq!(course.semester(), "Fall 2025");
    }

    #[test]
    fn hypothetical_courses_validate_percentages() {
        assert!(HypotheticalCourse::new("MATH 1120", 3.0, Some(101.0)).is_err());
        assert!(HypotheticalCourse::new("MATH 1120", -3.0, None).is_err());
        let unknown = HypotheticalCourse::new("MATH 1120", 3.0, None).unwrap();
        assert_eq!(unknown.hypothetical(), None);
    }

    #[test]
    fn standing_allows_a_plus_gpa() {
        assert!(GpaStanding::new(4.33, 30.0).is_ok());
        assert!(GpaStanding::new(4.5, 30.0).is_err());
        assert!(GpaStanding::new(3.0, -1.0).is_err());
        let standing = GpaStanding::new(3.0, 30.0).unwrap();
        assert!((standing.grade_points() - 90.0).abs() < 0.001);
    }
}
