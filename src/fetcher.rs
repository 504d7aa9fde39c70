use backon::{ExponentialBuilder, Retryable};
use chrono::{Datelike, NaiveDate};
use reqwest::StatusCode;
use std::time::Duration;
use tracing::{debug, instrument, warn};

use crate::fetch_error::{is_transient_request_error, FetchError};
use crate::ldc::Ldc;

pub const DEFAULT_ARCHIVE_BASE_URL: &str = "http://www2.conectiv.com/cpd/tps/archives";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_TRANSIENT_RETRIES: usize = 3;

/// Revision of a day's file on the archive. Updated files are preferred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Revision {
    Updated,
    Original,
}

impl Revision {
    /// Lookup order: most recent revision first
    pub const FALLBACK_ORDER: [Revision; 2] = [Revision::Updated, Revision::Original];

    pub fn index(&self) -> u8 {
        match self {
            Revision::Updated => 2,
            Revision::Original => 1,
        }
    }
}

/// Downloads raw daily load-profile text files from the vendor archive
#[derive(Clone)]
pub struct LoadProfileFetcher {
    client: reqwest::Client,
    base_url: String,
    backoff: ExponentialBuilder,
}

impl LoadProfileFetcher {
    /// Fetcher against the public archive with default timeout and retries
    pub fn new() -> Result<Self, FetchError> {
        Self::with_options(
            DEFAULT_ARCHIVE_BASE_URL,
            Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            DEFAULT_TRANSIENT_RETRIES,
        )
    }

    /// Fetcher against another archive root (mirrors, test servers)
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, FetchError> {
        Self::with_options(
            base_url,
            Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            DEFAULT_TRANSIENT_RETRIES,
        )
    }

    pub fn with_options(
        base_url: impl Into<String>,
        timeout: Duration,
        transient_retries: usize,
    ) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::Client(e.to_string()))?;

        let backoff = ExponentialBuilder::default()
            .with_min_delay(Duration::from_millis(500))
            .with_max_delay(Duration::from_secs(10))
            .with_max_times(transient_retries);

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            backoff,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Archive URL of one day's file for an LDC and revision
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use delmarva_lp::fetcher::{LoadProfileFetcher, Revision};
    /// use delmarva_lp::ldc::Ldc;
    ///
    /// let fetcher = LoadProfileFetcher::with_base_url("http://host/archives").unwrap();
    /// let date = NaiveDate::from_ymd_opt(2017, 1, 5).unwrap();
    /// assert_eq!(
    ///     fetcher.build_url(date, Ldc::Cnm, Revision::Updated),
    ///     "http://host/archives/md/2017/01/20170105MDA2.txt"
    /// );
    /// ```
    pub fn build_url(&self, date: NaiveDate, ldc: Ldc, revision: Revision) -> String {
        let state = ldc.state();
        format!(
            "{}/{}/{}/{:02}/{}{}A{}.txt",
            self.base_url,
            state.to_lowercase(),
            date.year(),
            date.month(),
            date.format("%Y%m%d"),
            state.to_uppercase(),
            revision.index()
        )
    }

    /// Download the raw text for one day and LDC.
    ///
    /// Tries the updated revision first and falls back to the original one.
    /// A non-200 answer on both is `NoDataAvailable`; connection failures and
    /// timeouts are retried with backoff and surface as `Request`.
    #[instrument(skip(self), fields(ldc = %ldc, date = %date))]
    pub async fn fetch_raw(&self, date: NaiveDate, ldc: Ldc) -> Result<String, FetchError> {
        let ldc = ldc.ensure_supported()?;

        let mut last_status = StatusCode::NOT_FOUND;
        for revision in Revision::FALLBACK_ORDER {
            let url = self.build_url(date, ldc, revision);
            debug!("Requesting {}", url);

            let send = || self.client.get(&url).send();
            let response = send
                .retry(self.backoff.clone())
                .when(is_transient_request_error)
                .notify(|e: &reqwest::Error, delay: Duration| {
                    warn!("Transient error fetching {}: {} (retrying in {:?})", url, e, delay);
                })
                .await?;

            let status = response.status();
            debug!("Received HTTP response with status: {}", status);

            if status == StatusCode::OK {
                let text = response.text().await?;
                debug!(
                    "Retrieved revision {} content, size: {} bytes",
                    revision.index(),
                    text.len()
                );
                return Ok(text);
            }

            last_status = status;
        }

        Err(FetchError::NoDataAvailable {
            ldc: ldc.code().to_string(),
            date,
            status: last_status.as_u16(),
        })
    }
}
