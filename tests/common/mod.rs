// Shared fixtures for the integration tests: vendor-style raw day files
#![allow(dead_code)]

use chrono::NaiveDate;
use delmarva_lp::fetcher::{LoadProfileFetcher, Revision};
use delmarva_lp::ldc::Ldc;
use std::time::Duration;

pub const HEADER: &str = "CONECTIV POWER DELIVERY\r\n\
DAILY LOAD PROFILE DATA\r\n\
PROFILE      DATE        HOUR ENDING 1 - 24\r\n\
---------------------------------------------\r\n";

/// Repeated hour 2 reading used on fall DST fixtures
pub const DST_EXTRA: f64 = 7.125;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Reading for a segment (by position in the fixture) and hour (1-based)
pub fn hour_value(segment_idx: usize, hour: usize) -> f64 {
    (segment_idx as f64 + 1.0) * 100.0 + hour as f64 * 0.5
}

/// Raw segment token as the vendor prints it: an 8-character prefix then the code
pub fn segment_token(ldc: Ldc, segment: &str) -> String {
    let prefix = match ldc {
        Ldc::Cnd => "DPLDELP_",
        Ldc::Cnm => "DPLMDLP_",
        Ldc::Cnv => "DPLVALP_",
    };
    format!("{prefix}{segment}")
}

pub fn data_line(ldc: Ldc, segment: &str, day: NaiveDate, segment_idx: usize, dst: bool) -> String {
    let mut tokens = vec![
        format!("  {}", segment_token(ldc, segment)),
        day.format("%m/%d/%Y").to_string(),
    ];
    for hour in 1..=24 {
        tokens.push(format!("{:.3}", hour_value(segment_idx, hour)));
        if hour == 2 && dst {
            tokens.push(format!("{DST_EXTRA:.3}"));
        }
    }
    tokens.join("    ")
}

/// A full raw day file with CRLF line endings and a trailing blank line
pub fn raw_day(ldc: Ldc, day: NaiveDate, segments: &[&str], dst: bool) -> String {
    let mut raw = HEADER.to_string();
    for (idx, segment) in segments.iter().enumerate() {
        raw.push_str(&data_line(ldc, segment, day, idx, dst));
        raw.push_str("\r\n");
    }
    raw.push_str("\r\n");
    raw
}

/// Archive path of a day's file relative to the server root
pub fn archive_path(ldc: Ldc, day: NaiveDate, revision: Revision) -> String {
    let fetcher = LoadProfileFetcher::with_base_url("").unwrap();
    fetcher.build_url(day, ldc, revision)
}

/// Fetcher pointed at a mock server, without transient retries
pub fn test_fetcher(base_url: String) -> LoadProfileFetcher {
    LoadProfileFetcher::with_options(base_url, Duration::from_secs(5), 0).unwrap()
}
