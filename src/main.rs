use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use grade_forecast::config::{parse_tolerance, Settings};
use grade_forecast::course_forecast::{forecast_course, TargetStatus};
use grade_forecast::gpa_forecast::forecast_gpa;
use grade_forecast::grouping::{gpa_breakdown, summarize_by_type};
use grade_forecast::import::{load_gradebook, load_scenario, Gradebook};
use grade_forecast::report;
use grade_forecast::scale::letter_for_percentage;

#[derive(Parser)]
#[command(name = "grade-forecast")]
#[command(about = "Course grade and GPA forecasting for students", long_about = None)]
struct Cli {
    /// Allowed drift of assessment weights from 100% (overrides GRADE_FORECAST_WEIGHT_TOLERANCE)
    #[arg(long, global = true, value_parser = parse_tolerance)]
    weight_tolerance: Option<f64>,
    /// Print results as JSON instead of text
    #[arg(long, global = true)]
    json: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct GradebookArgs {
    /// CSV with course_code,course_name,credit_hours,semester
    #[arg(long)]
    courses: PathBuf,
    /// CSV with course_code,name,type,weight,marks,earned_marks
    #[arg(long)]
    assessments: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// Show GPA by semester and cumulative
    Breakdown {
        #[command(flatten)]
        gradebook: GradebookArgs,
    },
    /// Minimum scores needed on ungraded work to reach a target grade
    CourseForecast {
        #[command(flatten)]
        gradebook: GradebookArgs,
        #[arg(long)]
        course: String,
        #[arg(long)]
        target: f64,
    },
    /// Project cumulative GPA from a JSON what-if scenario
    GpaForecast {
        #[arg(long)]
        scenario: PathBuf,
        /// Overrides the scenario's target_gpa
        #[arg(long)]
        target: Option<f64>,
    },
    /// Generate a markdown report
    Report {
        #[command(flatten)]
        gradebook: GradebookArgs,
        #[arg(long)]
        student: Option<String>,
        #[arg(long, default_value = "report.md")]
        out: PathBuf,
    },
}

fn init_tracing(log_json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if log_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

// stdout stays clean for --json output
fn open_gradebook(args: &GradebookArgs) -> anyhow::Result<Gradebook> {
    let gradebook = load_gradebook(&args.courses, &args.assessments)?;
    eprintln!("{}", gradebook.load_summary());
    Ok(gradebook)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut settings = Settings::from_env()?;
    if let Some(tolerance) = cli.weight_tolerance {
        settings.forecast.weight_tolerance = tolerance;
    }
    init_tracing(settings.log_json);

    match cli.command {
        Commands::Breakdown { gradebook } => {
            let gradebook = open_gradebook(&gradebook)?;
            let breakdown = gpa_breakdown(&gradebook.courses, &gradebook.assessments);

            if cli.json {
                return print_json(&breakdown);
            }

            if breakdown.semesters.is_empty() {
                println!("No courses found.");
                return Ok(());
            }

            for semester in &breakdown.semesters {
                println!(
                    "{}: GPA {:.2} over {} credits",
                    semester.semester, semester.gpa, semester.credits
                );
                for course in &semester.courses {
                    match course.grade {
                        Some(grade) => println!(
                            "  - {} {:.2}% ({})",
                            course.course_code,
                            grade,
                            letter_for_percentage(grade).unwrap_or("-")
                        ),
                        None => println!("  - {} not graded yet", course.course_code),
                    }
                }
            }
            println!(
                "Cumulative GPA {:.2} over {} credits",
                breakdown.cumulative_gpa, breakdown.total_credits
            );
        }
        Commands::CourseForecast {
            gradebook,
            course,
            target,
        } => {
            let gradebook = open_gradebook(&gradebook)?;
            gradebook
                .course(&course)
                .with_context(|| format!("course {course} not found in gradebook"))?;
            let forecast = forecast_course(
                gradebook.assessments_for(&course),
                target,
                &settings.forecast,
            )?;

            if cli.json {
                return print_json(&forecast);
            }

            println!("Minimum required scores for {course} (target {target:.2}%):");
            for row in &forecast.assessments {
                let needed = row
                    .minimum_required
                    .map_or_else(|| "-".to_string(), |requirement| requirement.to_string());
                let earned = row
                    .score
                    .map_or_else(|| "-".to_string(), |score| format!("{score:.2}"));
                println!(
                    "- {} ({}, {}%): earned {} / needed {}",
                    row.assessment.name(),
                    row.assessment.assessment_type(),
                    row.assessment.weight(),
                    earned,
                    needed
                );
            }
            if forecast.target_analysis.status == TargetStatus::Impossible {
                println!("Target is out of reach with the marks recorded so far.");
            }
        }
        Commands::GpaForecast { scenario, target } => {
            let scenario = load_scenario(&scenario)?;
            let forecast = forecast_gpa(
                &scenario.current,
                &scenario.courses,
                target.or(scenario.target_gpa),
            )?;

            if cli.json {
                return print_json(&forecast);
            }

            println!(
                "Projected cumulative GPA {:.2} over {} credits (currently {:.2} over {})",
                forecast.projected.cumulative_gpa,
                forecast.projected.total_credits,
                forecast.current.gpa,
                forecast.current.credits
            );
            for course in &forecast.courses {
                match (course.gpa, course.minimum_required) {
                    (Some(gpa), _) => println!("- {}: assumed GPA {:.2}", course.course_code, gpa),
                    (None, Some(requirement)) if requirement.is_impossible() => {
                        println!("- {}: target out of reach", course.course_code)
                    }
                    (None, Some(requirement)) => println!(
                        "- {}: needs GPA {} (~{}%)",
                        course.course_code,
                        requirement,
                        course
                            .minimum_required_percent
                            .unwrap_or(requirement)
                    ),
                    (None, None) => println!("- {}: no target given", course.course_code),
                }
            }
            if let Some(analysis) = forecast.target_analysis {
                println!(
                    "Target {:.2}: {:?}, average GPA needed on unknowns {}",
                    analysis.target_gpa, analysis.status, analysis.required_avg_gpa
                );
            }
        }
        Commands::Report {
            gradebook,
            student,
            out,
        } => {
            let gradebook = open_gradebook(&gradebook)?;
            let breakdown = gpa_breakdown(&gradebook.courses, &gradebook.assessments);
            let types = summarize_by_type(gradebook.all_assessments());
            let report = report::build_report(
                student.as_deref(),
                chrono::Local::now().date_naive(),
                &breakdown,
                &types,
            );
            std::fs::write(&out, report)
                .with_context(|| format!("failed to write {}", out.display()))?;
            println!("Report written to {}.", out.display());
        }
    }

    Ok(())
}
