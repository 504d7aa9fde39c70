use chrono::NaiveDate;

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("Invalid LDC: {0} (supported: CND, CNM)")]
    InvalidLdc(String),
    #[error("No data available for {ldc} on {date} (last status {status})")]
    NoDataAvailable {
        ldc: String,
        date: NaiveDate,
        status: u16,
    },
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Failed to build HTTP client: {0}")]
    Client(String),
}

impl FetchError {
    /// Connection and timeout failures, as opposed to a clean non-200 answer
    pub fn is_transient(&self) -> bool {
        match self {
            FetchError::Request(e) => is_transient_request_error(e),
            _ => false,
        }
    }
}

pub(crate) fn is_transient_request_error(e: &reqwest::Error) -> bool {
    e.is_connect() || e.is_timeout()
}
