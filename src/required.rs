//! Minimum score needed on the remaining share of a total to reach a target.
//!
//! The same solver serves the percentage domain (course points, remaining
//! weight out of 100) and the GPA domain (grade points, remaining credit
//! hours).

use std::fmt;

use serde::Serialize;

use crate::scale::{round2, MAX_PERCENT};

const CEILING_SLACK: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "status", content = "score", rename_all = "snake_case")]
pub enum Requirement {
    Satisfied,
    Impossible,
    Needed(f64),
}

impl Requirement {
    pub fn is_impossible(&self) -> bool {
        matches!(self, Requirement::Impossible)
    }

    pub fn score(&self) -> Option<f64> {
        match self {
            Requirement::Satisfied => Some(0.0),
            Requirement::Impossible => None,
            Requirement::Needed(score) => Some(*score),
        }
    }

    pub fn map_score(self, f: impl FnOnce(f64) -> f64) -> Requirement {
        match self {
            Requirement::Needed(score) => Requirement::Needed(round2(f(score))),
            other => other,
        }
    }
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Requirement::Satisfied => write!(f, "0.00"),
            Requirement::Impossible => write!(f, "Impossible"),
            Requirement::Needed(score) => write!(f, "{score:.2}"),
        }
    }
}

/// Solves `known + share * x = target` for `x`.
///
/// `share` is the open part of the total: a weight fraction for course
/// grades, credit hours for grade points. `ceiling` is the best score
/// achievable on it.
pub fn solve(target: f64, known: f64, share: f64, ceiling: f64) -> Requirement {
    if !target.is_finite() || !known.is_finite() {
        return Requirement::Impossible;
    }

    if !share.is_finite() || share <= 0.0 {
        return if known >= target {
            Requirement::Satisfied
        } else {
            Requirement::Impossible
        };
    }

    let required = (target - known) / share;
    if !required.is_finite() {
        return Requirement::Impossible;
    }

    // relative slack only absorbs float noise such as 40.0 / 0.4
    if required > ceiling * (1.0 + CEILING_SLACK) {
        Requirement::Impossible
    } else if required <= 0.0 {
        Requirement::Satisfied
    } else {
        Requirement::Needed(round2(required).min(ceiling))
    }
}

pub fn minimum_required(target: f64, known_contribution: f64, remaining_weight: f64) -> Requirement {
    solve(
        target,
        known_contribution,
        remaining_weight / MAX_PERCENT,
        MAX_PERCENT,
    )
}
