use chrono::NaiveDate;
use thiserror::Error;

/// Failures raised by the growth-model / alignment / projection core.
///
/// Every variant is a local, deterministic failure: retrying with the same input
/// yields the same error, so callers decide whether to skip or abort.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CurveError {
    #[error("invalid model parameter `{name}` = {value}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },

    #[error("invalid day offset {day}: growth curves are defined for days >= 1")]
    InvalidInput { day: f64 },

    #[error("no records to align")]
    NoData,

    #[error("onset threshold {threshold} never reached (max cumulative active count {max_cumulative})")]
    ThresholdNeverReached { threshold: i64, max_cumulative: i64 },

    #[error("records not sorted by date: {previous} is followed by {current} at index {index}")]
    UnsortedInput {
        index: usize,
        previous: NaiveDate,
        current: NaiveDate,
    },

    #[error("model horizon of {horizon} days is shorter than the {observed} observed days after onset")]
    ModelHorizonTooShort { horizon: u32, observed: usize },

    #[error("records skip days: {previous} is followed by {current} at index {index}")]
    MissingDays {
        index: usize,
        previous: NaiveDate,
        current: NaiveDate,
    },

    #[error("cumulative active count overflows at record {index}")]
    CountOverflow { index: usize },

    #[error("cannot extend {last} by {days} forecast days within the calendar range")]
    DateOutOfRange { last: NaiveDate, days: usize },
}

/// Failures raised while turning a projection bundle into a figure.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RenderError {
    #[error("nothing to draw: {0}")]
    EmptyFigure(String),

    #[error("render backend failed: {0}")]
    Backend(String),
}

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl From<CurveError> for AppError {
    fn from(err: CurveError) -> Self {
        AppError::new(3, err.to_string())
    }
}

impl From<RenderError> for AppError {
    fn from(err: RenderError) -> Self {
        AppError::new(4, err.to_string())
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn curve_errors_map_to_exit_code_three() {
        let err: AppError = CurveError::NoData.into();
        assert_eq!(err.exit_code(), 3);
        assert_eq!(err.to_string(), "no records to align");
    }

    #[test]
    fn render_errors_map_to_exit_code_four() {
        let err: AppError = RenderError::Backend("boom".to_string()).into();
        assert_eq!(err.exit_code(), 4);
    }
}
