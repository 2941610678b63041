//! Grade and GPA forecasting for student course records.
//!
//! Every calculation is a pure function of its inputs: records go in, plain
//! result values come out, and nothing is cached between calls.

pub mod aggregate;
pub mod config;
pub mod course_forecast;
pub mod error;
pub mod gpa_forecast;
pub mod grouping;
pub mod import;
pub mod models;
pub mod report;
pub mod required;
pub mod scale;

pub use config::ForecastConfig;
pub use error::{GradeError, Result};
pub use models::{Assessment, Course, GpaScenario, GpaStanding, HypotheticalCourse};
pub use required::Requirement;
