use chrono::NaiveDate;
use serde::Serialize;

use crate::profile::schema::{
    DaySchema, DATE_COLUMN, EXTRA_HOUR_COLUMN, HOUR_COLUMNS, SEGMENT_COLUMN,
};

/// Hourly load readings for one segment on one day
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoadProfileRecord {
    pub segment: String,
    pub date: NaiveDate,
    /// H01..H24
    pub hours: [f64; 24],
    /// Repeated hour 2 on the fall DST day, when kept unaggregated
    pub extra_hour: Option<f64>,
}

impl LoadProfileRecord {
    /// Fold the repeated DST hour into H02
    pub fn aggregate_extra_hour(&mut self) {
        if let Some(extra) = self.extra_hour.take() {
            self.hours[1] += extra;
        }
    }

    /// Reading for an hour column name (`H01`..`H24`, `H02X`)
    pub fn hour_value(&self, column: &str) -> Option<f64> {
        if column == EXTRA_HOUR_COLUMN {
            return self.extra_hour;
        }
        HOUR_COLUMNS
            .iter()
            .position(|c| *c == column)
            .map(|idx| self.hours[idx])
    }

    pub fn daily_total(&self) -> f64 {
        self.hours.iter().sum::<f64>() + self.extra_hour.unwrap_or(0.0)
    }
}

/// Ordered collection of day records: one vendor file, or a whole range
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LoadProfileTable {
    records: Vec<LoadProfileRecord>,
}

impl LoadProfileTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[LoadProfileRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<LoadProfileRecord> {
        self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn push(&mut self, record: LoadProfileRecord) {
        self.records.push(record);
    }

    /// Concatenate another table after this one
    pub fn append(&mut self, other: LoadProfileTable) {
        self.records.extend(other.records);
    }

    /// True when any record still carries the repeated DST hour
    pub fn has_extra_hour(&self) -> bool {
        self.records.iter().any(|r| r.extra_hour.is_some())
    }

    /// Hour column names for this table, in output order
    pub fn hour_columns(&self) -> Vec<&'static str> {
        if self.has_extra_hour() {
            DaySchema::DaylightSaving.hour_columns()
        } else {
            DaySchema::Standard.hour_columns()
        }
    }

    /// All column names: segment, date, then hours
    pub fn columns(&self) -> Vec<&'static str> {
        let mut columns = vec![SEGMENT_COLUMN, DATE_COLUMN];
        columns.extend(self.hour_columns());
        columns
    }

    /// Earliest and latest dates in the table
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        let min = self.records.iter().map(|r| r.date).min()?;
        let max = self.records.iter().map(|r| r.date).max()?;
        Some((min, max))
    }
}

impl From<Vec<LoadProfileRecord>> for LoadProfileTable {
    fn from(records: Vec<LoadProfileRecord>) -> Self {
        Self { records }
    }
}

impl FromIterator<LoadProfileTable> for LoadProfileTable {
    fn from_iter<I: IntoIterator<Item = LoadProfileTable>>(iter: I) -> Self {
        let mut combined = LoadProfileTable::new();
        for table in iter {
            combined.append(table);
        }
        combined
    }
}
