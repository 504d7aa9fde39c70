use chrono::NaiveDate;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use crate::config::Config;
use crate::fetch_error::FetchError;
use crate::fetcher::LoadProfileFetcher;
use crate::ldc::{Ldc, SUPPORTED_LDCS};
use crate::profile::{parse_day, LoadProfileTable, ParseError, ParseOptions};
use crate::utils::{days_inclusive, parse_target_date, InvalidDateType};

#[derive(Error, Debug)]
pub enum LoadProfileError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("Failed to parse {ldc} data for {date}: {source}")]
    Parse {
        ldc: Ldc,
        date: NaiveDate,
        #[source]
        source: ParseError,
    },

    #[error(transparent)]
    InvalidDateType(#[from] InvalidDateType),
}

/// Downloads and parses vendor load profile files, one day or a whole range
#[derive(Clone)]
pub struct LoadProfileService {
    fetcher: LoadProfileFetcher,
    options: ParseOptions,
}

impl LoadProfileService {
    pub fn new(fetcher: LoadProfileFetcher, options: ParseOptions) -> Self {
        Self { fetcher, options }
    }

    pub fn from_config(config: &Config) -> Result<Self, FetchError> {
        let fetcher = LoadProfileFetcher::with_options(
            config.archive_base_url.clone(),
            config.http_timeout(),
            config.transient_retries,
        )?;
        Ok(Self::new(fetcher, config.parse_options()))
    }

    pub fn with_options(mut self, options: ParseOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    /// One day of data for one LDC
    ///
    /// Returns `Ok(None)` when the archive has no file for the day. Any other
    /// fetch or parse failure is an error.
    #[instrument(skip(self), fields(ldc = %ldc, date = %date))]
    pub async fn get_lp_series(
        &self,
        date: NaiveDate,
        ldc: Ldc,
        aggregate_dst_hour: bool,
    ) -> Result<Option<LoadProfileTable>, LoadProfileError> {
        let raw = match self.fetcher.fetch_raw(date, ldc).await {
            Ok(raw) => raw,
            Err(FetchError::NoDataAvailable { status, .. }) => {
                warn!(
                    "No data available for {} on {} (status {})",
                    ldc,
                    date.format("%b %d, %Y"),
                    status
                );
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        let options = ParseOptions {
            aggregate_dst_hour,
            ..self.options
        };
        let table = parse_day(&raw, &options)
            .map_err(|source| LoadProfileError::Parse { ldc, date, source })?;

        debug!("Parsed {} rows for {} on {}", table.len(), ldc, date);
        Ok(Some(table))
    }

    /// All available data for the supported LDCs over `[from, to]`
    pub async fn get_lp_data(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<LoadProfileTable, LoadProfileError> {
        self.get_lp_data_with_progress(from, to, |_, _| {}).await
    }

    /// `get_lp_data` for caller-supplied date strings
    pub async fn get_lp_data_str(
        &self,
        from: &str,
        to: &str,
    ) -> Result<LoadProfileTable, LoadProfileError> {
        let from = parse_target_date(from)?;
        let to = parse_target_date(to)?;
        self.get_lp_data(from, to).await
    }

    /// Number of (date, LDC) pairs a range run will request
    pub fn pair_count(from: NaiveDate, to: NaiveDate) -> usize {
        days_inclusive(from, to).count() * SUPPORTED_LDCS.len()
    }

    /// `get_lp_data`, calling `on_pair` after each (date, LDC) pair
    pub async fn get_lp_data_with_progress<F>(
        &self,
        from: NaiveDate,
        to: NaiveDate,
        on_pair: F,
    ) -> Result<LoadProfileTable, LoadProfileError>
    where
        F: FnMut(NaiveDate, Ldc),
    {
        self.collect_range(from, to, true, on_pair).await
    }

    /// Fetch and concatenate every (date, LDC) pair in `[from, to]`
    ///
    /// Days the archive has no file for are skipped. With
    /// `aggregate_dst_hour` off, the fall DST day keeps its H02X column and
    /// the combined table carries it for every row.
    #[instrument(skip(self, on_pair))]
    pub async fn collect_range<F>(
        &self,
        from: NaiveDate,
        to: NaiveDate,
        aggregate_dst_hour: bool,
        mut on_pair: F,
    ) -> Result<LoadProfileTable, LoadProfileError>
    where
        F: FnMut(NaiveDate, Ldc),
    {
        let mut combined = LoadProfileTable::new();
        let mut skipped = 0;

        for date in days_inclusive(from, to) {
            for ldc in SUPPORTED_LDCS {
                match self.get_lp_series(date, ldc, aggregate_dst_hour).await? {
                    Some(table) => combined.append(table),
                    None => skipped += 1,
                }
                on_pair(date, ldc);
            }
        }

        info!(
            "Collected {} load profile rows from {} to {} ({} files unavailable)",
            combined.len(),
            from,
            to,
            skipped
        );
        Ok(combined)
    }
}
