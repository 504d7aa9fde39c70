//! Shared helpers for dates and segment codes

use chrono::{Duration, NaiveDate};

/// Number of leading characters in a raw segment token before the segment code
pub const SEGMENT_PREFIX_LEN: usize = 8;

const ACCEPTED_DATE_FORMATS: [&str; 3] = ["%m/%d/%Y", "%Y-%m-%d", "%Y%m%d"];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid date: '{0}'. Expected MM/DD/YYYY, YYYY-MM-DD or YYYYMMDD")]
pub struct InvalidDateType(pub String);

/// Parse a caller-supplied date string into a calendar day
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use delmarva_lp::utils::parse_target_date;
///
/// let expected = NaiveDate::from_ymd_opt(2017, 1, 10).unwrap();
/// assert_eq!(parse_target_date("1/10/2017").unwrap(), expected);
/// assert_eq!(parse_target_date("2017-01-10").unwrap(), expected);
/// assert_eq!(parse_target_date("20170110").unwrap(), expected);
/// assert!(parse_target_date("January").is_err());
/// ```
pub fn parse_target_date(value: &str) -> Result<NaiveDate, InvalidDateType> {
    let trimmed = value.trim();
    ACCEPTED_DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
        .ok_or_else(|| InvalidDateType(value.to_string()))
}

/// Every calendar day in `[from, to]`. Empty when `from > to`.
pub fn days_inclusive(from: NaiveDate, to: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    let len = (to - from).num_days().max(-1) + 1;
    (0..len).map(move |offset| from + Duration::days(offset))
}

/// Segment code embedded in a raw segment token
///
/// The token is trimmed and its fixed-length prefix dropped. Tokens shorter
/// than the prefix yield an empty code.
///
/// ```
/// use delmarva_lp::utils::segment_from_token;
///
/// assert_eq!(segment_from_token("DPLMDLP_MDDGL"), "MDDGL");
/// assert_eq!(segment_from_token("  DPLDELP_RSH "), "RSH");
/// assert_eq!(segment_from_token("SHORT"), "");
/// ```
pub fn segment_from_token(token: &str) -> String {
    token.trim().chars().skip(SEGMENT_PREFIX_LEN).collect()
}
