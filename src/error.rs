use thiserror::Error;

pub type Result<T> = std::result::Result<T, GradeError>;

/// Faults the engine reports to its caller.
///
/// An unreachable target is not an error: it comes back as
/// [`Requirement::Impossible`](crate::required::Requirement::Impossible).
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GradeError {
    #[error("invalid {field}: {reason}")]
    InvalidInput { field: &'static str, reason: String },

    #[error("assessment weights total {total_weight:.2}%, expected 100% (tolerance {tolerance})")]
    IncompleteScheme { total_weight: f64, tolerance: f64 },
}

impl GradeError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        GradeError::InvalidInput {
            field,
            reason: reason.into(),
        }
    }
}

pub(crate) fn ensure_finite(field: &'static str, value: f64) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(GradeError::invalid(field, format!("{value} is not a finite number")))
    }
}

pub(crate) fn ensure_range(field: &'static str, value: f64, min: f64, max: f64) -> Result<f64> {
    let value = ensure_finite(field, value)?;
    if value < min || value > max {
        return Err(GradeError::invalid(
            field,
            format!("{value} is outside {min}..={max}"),
        ));
    }
    Ok(value)
}
