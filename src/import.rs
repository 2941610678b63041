//! Loads gradebooks and scenarios from local CSV/JSON files.

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::Context;
use uuid::Uuid;

use crate::models::{Assessment, Course, GpaScenario};

#[derive(Debug, Clone, Default)]
pub struct Gradebook {
    pub courses: Vec<Course>,
    pub assessments: HashMap<Uuid, Vec<Assessment>>,
    pub rejected: usize,
}

impl Gradebook {
    pub fn course(&self, course_code: &str) -> Option<&Course> {
        self.courses
            .iter()
            .find(|course| course.course_code() == course_code)
    }

    pub fn assessments_for(&self, course_code: &str) -> &[Assessment] {
        self.course(course_code)
            .and_then(|course| self.assessments.get(&course.course_id()))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn all_assessments(&self) -> impl Iterator<Item = &Assessment> {
        self.assessments.values().flatten()
    }

    pub fn load_summary(&self) -> String {
        let mut summary = format!(
            "Loaded {} courses and {} assessments",
            self.courses.len(),
            self.all_assessments().count()
        );
        if self.rejected > 0 {
            summary.push_str(&format!(" ({} rows skipped, see log for details)", self.rejected));
        }
        summary.push('.');
        summary
    }
}

#[derive(serde::Deserialize)]
struct CsvAssessmentRow {
    course_code: String,
    name: String,
    #[serde(rename = "type", default)]
    assessment_type: String,
    weight: f64,
    marks: f64,
    earned_marks: Option<f64>,
}

/// Reads `course_code,course_name,credit_hours,semester` rows.
///
/// Invalid rows and repeated course codes are skipped and counted; I/O
/// failures abort the load.
pub fn read_courses<R: Read>(reader: R) -> anyhow::Result<(Vec<Course>, usize)> {
    let mut reader = csv::Reader::from_reader(reader);
    let mut courses: Vec<Course> = Vec::new();
    let mut rejected = 0usize;

    for (index, result) in reader.deserialize::<Course>().enumerate() {
        let course = match result {
            Ok(course) => course,
            Err(err) if err.is_io_error() => return Err(err).context("failed to read courses"),
            Err(err) => {
                tracing::warn!(row = index + 1, error = %err, "rejected course row");
                rejected += 1;
                continue;
            }
        };

        if courses
            .iter()
            .any(|existing| existing.course_code() == course.course_code())
        {
            tracing::warn!(row = index + 1, course_code = course.course_code(), "duplicate course code");
            rejected += 1;
            continue;
        }

        courses.push(course);
    }

    Ok((courses, rejected))
}

/// Reads `course_code,name,type,weight,marks,earned_marks` rows and files each
/// assessment under the id of the course it names. An empty `earned_marks`
/// means ungraded.
pub fn read_assessments<R: Read>(
    reader: R,
    courses: &[Course],
) -> anyhow::Result<(HashMap<Uuid, Vec<Assessment>>, usize)> {
    let ids: HashMap<&str, Uuid> = courses
        .iter()
        .map(|course| (course.course_code(), course.course_id()))
        .collect();

    let mut reader = csv::Reader::from_reader(reader);
    let mut assessments: HashMap<Uuid, Vec<Assessment>> = HashMap::new();
    let mut rejected = 0usize;

    for (index, result) in reader.deserialize::<CsvAssessmentRow>().enumerate() {
        let row = match result {
            Ok(row) => row,
            Err(err) if err.is_io_error() => return Err(err).context("failed to read assessments"),
            Err(err) => {
                tracing::warn!(row = index + 1, error = %err, "rejected assessment row");
                rejected += 1;
                continue;
            }
        };

        let Some(course_id) = ids.get(row.course_code.as_str()).copied() else {
            tracing::warn!(row = index + 1, course_code = %row.course_code, "assessment for unknown course");
            rejected += 1;
            continue;
        };

        match Assessment::new(row.name, row.assessment_type, row.weight, row.marks, row.earned_marks) {
            Ok(assessment) => assessments.entry(course_id).or_default().push(assessment),
            Err(err) => {
                tracing::warn!(row = index + 1, error = %err, "rejected assessment row");
                rejected += 1;
            }
        }
    }

    Ok((assessments, rejected))
}

pub fn load_gradebook(courses_path: &Path, assessments_path: &Path) -> anyhow::Result<Gradebook> {
    let courses_file = File::open(courses_path)
        .with_context(|| format!("failed to open {}", courses_path.display()))?;
    let (courses, rejected_courses) = read_courses(courses_file)?;

    let assessments_file = File::open(assessments_path)
        .with_context(|| format!("failed to open {}", assessments_path.display()))?;
    let (assessments, rejected_assessments) = read_assessments(assessments_file, &courses)?;

    let rejected = rejected_courses + rejected_assessments;
    tracing::info!(
        courses = courses.len(),
        assessments = assessments.values().map(Vec::len).sum::<usize>(),
        rejected,
        "gradebook loaded"
    );

    Ok(Gradebook {
        courses,
        assessments,
        rejected,
    })
}

pub fn read_scenario<R: Read>(reader: R) -> anyhow::Result<GpaScenario> {
    serde_json::from_reader(reader).context("invalid GPA scenario")
}

pub fn load_scenario(path: &Path) -> anyhow::Result<GpaScenario> {
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    read_scenario(file)
}
