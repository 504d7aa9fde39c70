/// Vendor Daily Load Profile Parser
///
/// Parses one day's raw text file for one LDC into a `LoadProfileTable`.
/// Files open with four header lines, followed by one whitespace-separated
/// line per load-profile segment.
use chrono::NaiveDate;
use std::num::ParseFloatError;
use thiserror::Error;
use tracing::{debug, instrument, warn};

use crate::profile::schema::{DaySchema, FieldKind};
use crate::profile::table::{LoadProfileRecord, LoadProfileTable};
use crate::utils::segment_from_token;

pub const HEADER_LINES: usize = 4;
pub const DEFAULT_EXPECTED_ROWS: usize = 2;
const DATE_FORMAT: &str = "%m/%d/%Y";

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Did not receive any valid data")]
    NoValidData,

    #[error("Did not receive data for all load profiles ({found} of {expected} expected rows)")]
    PartialData { found: usize, expected: usize },

    #[error("Invalid data structure at line {line}: {found} columns, expected 26 or 27")]
    InvalidDataStructure { line: usize, found: usize },

    #[error("Invalid number '{value}' in column {column} at line {line}: {source}")]
    NumericParse {
        line: usize,
        column: &'static str,
        value: String,
        #[source]
        source: ParseFloatError,
    },

    #[error("Invalid date '{value}' at line {line}")]
    InvalidDate { line: usize, value: String },
}

/// What to do when a file holds some, but not all, expected profile rows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PartialDataPolicy {
    /// Warn and keep the rows that are present
    #[default]
    Lenient,
    /// Fail with `ParseError::PartialData`
    Strict,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Fold the repeated DST hour 2 into H02
    pub aggregate_dst_hour: bool,
    /// Row count below which a file is considered partial
    pub expected_rows: usize,
    pub partial_policy: PartialDataPolicy,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            aggregate_dst_hour: true,
            expected_rows: DEFAULT_EXPECTED_ROWS,
            partial_policy: PartialDataPolicy::Lenient,
        }
    }
}

/// Data lines of a raw file as (1-based line number, tokens)
///
/// Carriage returns are discarded, the header block is skipped and blank
/// lines are dropped.
pub fn data_lines(raw: &str) -> Vec<(usize, Vec<&str>)> {
    raw.split('\n')
        .enumerate()
        .skip(HEADER_LINES)
        .filter_map(|(idx, line)| {
            let line = line.trim_end_matches('\r');
            let tokens: Vec<&str> = line.split_whitespace().collect();
            if line.len() <= 1 || tokens.is_empty() {
                None
            } else {
                Some((idx + 1, tokens))
            }
        })
        .collect()
}

/// Parse one day's raw vendor text into a table
#[instrument(skip(raw), fields(raw_size = raw.len()))]
pub fn parse_day(raw: &str, options: &ParseOptions) -> Result<LoadProfileTable, ParseError> {
    let raw = raw.replace('\r', "");
    let lines = data_lines(&raw);

    if lines.is_empty() {
        return Err(ParseError::NoValidData);
    }

    if lines.len() < options.expected_rows {
        match options.partial_policy {
            PartialDataPolicy::Lenient => warn!(
                "Did not receive data for all load profiles ({} of {} expected rows)",
                lines.len(),
                options.expected_rows
            ),
            PartialDataPolicy::Strict => {
                return Err(ParseError::PartialData {
                    found: lines.len(),
                    expected: options.expected_rows,
                })
            }
        }
    }

    // The first data line decides the layout for the whole file
    let (first_line, first_tokens) = &lines[0];
    let schema = DaySchema::from_field_count(first_tokens.len()).ok_or(
        ParseError::InvalidDataStructure {
            line: *first_line,
            found: first_tokens.len(),
        },
    )?;
    debug!("Detected {:?} layout from {} columns", schema, first_tokens.len());

    let fields = schema.fields();
    let mut table = LoadProfileTable::new();

    for (line_no, tokens) in &lines {
        if tokens.len() != schema.field_count() {
            return Err(ParseError::InvalidDataStructure {
                line: *line_no,
                found: tokens.len(),
            });
        }

        let mut segment = String::new();
        let mut date = None;
        let mut hours = [0.0; 24];
        let mut extra_hour = None;

        for field in &fields {
            let token = tokens[field.position];
            match field.kind {
                FieldKind::Segment => segment = segment_from_token(token),
                FieldKind::Date => {
                    date = Some(NaiveDate::parse_from_str(token, DATE_FORMAT).map_err(|_| {
                        ParseError::InvalidDate {
                            line: *line_no,
                            value: token.to_string(),
                        }
                    })?)
                }
                FieldKind::Hour(idx) => hours[idx] = parse_reading(token, field.name, *line_no)?,
                FieldKind::ExtraHour => {
                    extra_hour = Some(parse_reading(token, field.name, *line_no)?)
                }
            }
        }

        let Some(date) = date else {
            return Err(ParseError::InvalidDataStructure {
                line: *line_no,
                found: tokens.len(),
            });
        };

        let mut record = LoadProfileRecord {
            segment,
            date,
            hours,
            extra_hour,
        };
        if options.aggregate_dst_hour {
            record.aggregate_extra_hour();
        }
        table.push(record);
    }

    debug!("Parsed {} load profile rows", table.len());
    Ok(table)
}

fn parse_reading(token: &str, column: &'static str, line: usize) -> Result<f64, ParseError> {
    token
        .parse::<f64>()
        .map_err(|source| ParseError::NumericParse {
            line,
            column,
            value: token.to_string(),
            source,
        })
}
