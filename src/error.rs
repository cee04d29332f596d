use thiserror::Error;

pub type Result<T> = std::result::Result<T, AssessmentError>;

#[derive(Debug, Error)]
pub enum AssessmentError {
    /// Caller-side data outside the function's domain (negative elapsed time,
    /// NaN score, ...). Never clamped silently.
    #[error("domain input error: {field} = {value}")]
    DomainInput { field: &'static str, value: f64 },
    #[error("unknown skill update channel: {0}")]
    UnknownChannel(String),
    #[error("config error: {0}")]
    Config(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl AssessmentError {
    pub fn domain(field: &'static str, value: f64) -> Self {
        Self::DomainInput { field, value }
    }

    pub fn is_domain_input(&self) -> bool {
        matches!(self, Self::DomainInput { .. })
    }
}
