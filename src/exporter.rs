use chrono::NaiveDate;
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use crate::codes::CodeMapping;
use crate::profile::table::{LoadProfileRecord, LoadProfileTable};

pub const ARCHIVE_DIR: &str = "Archive";
const FILE_PREFIX: &str = "Conectiv_";
const DATE_FORMAT: &str = "%m/%d/%Y";

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("File '{file_name}' already in {}. Choose another file name for the upload", .archive_dir.display())]
    FileAlreadyArchived {
        file_name: String,
        archive_dir: PathBuf,
    },

    #[error("No load profile data to export and no file name given")]
    EmptyTable,

    #[error("Segments missing from code mapping: {}", .0.join(", "))]
    UnmappedSegments(Vec<String>),

    #[error("Failed to write export file: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to write export file: {0}")]
    Csv(#[from] csv::Error),
}

/// How to treat data rows whose segment has no code mapping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MappingMode {
    /// Drop them with a warning
    #[default]
    Lenient,
    /// Refuse to export
    Strict,
}

/// One output row: a mapped code and its data, if any matched
#[derive(Debug, Clone, PartialEq)]
pub struct ExportRow<'a> {
    pub code: &'a str,
    pub record: Option<&'a LoadProfileRecord>,
}

impl ExportRow<'_> {
    fn date(&self) -> Option<NaiveDate> {
        self.record.map(|r| r.date)
    }

    /// Tab-separated fields: code, date, hours, empty placeholder
    fn fields(&self, hour_columns: &[&str]) -> Vec<String> {
        let mut fields = Vec::with_capacity(hour_columns.len() + 3);
        fields.push(self.code.to_string());
        fields.push(
            self.date()
                .map(|d| d.format(DATE_FORMAT).to_string())
                .unwrap_or_default(),
        );
        for column in hour_columns {
            let value = self.record.and_then(|r| r.hour_value(column));
            fields.push(value.map(|v| format!("{v:.3}")).unwrap_or_default());
        }
        fields.push(String::new());
        fields
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExportSummary {
    pub path: PathBuf,
    pub rows_written: usize,
    pub date_range: Option<(NaiveDate, NaiveDate)>,
}

/// Writes load profile tables in the tab-delimited upload format
#[derive(Debug, Clone)]
pub struct LoadProfileExporter {
    codes: CodeMapping,
    dest_dir: PathBuf,
    mapping_mode: MappingMode,
}

impl LoadProfileExporter {
    pub fn new(codes: CodeMapping, dest_dir: impl Into<PathBuf>) -> Self {
        Self {
            codes,
            dest_dir: dest_dir.into(),
            mapping_mode: MappingMode::default(),
        }
    }

    pub fn with_mapping_mode(mut self, mapping_mode: MappingMode) -> Self {
        self.mapping_mode = mapping_mode;
        self
    }

    pub fn codes(&self) -> &CodeMapping {
        &self.codes
    }

    pub fn dest_dir(&self) -> &Path {
        &self.dest_dir
    }

    /// `Conectiv_<yyyymmdd>.txt` for the earliest date in the table
    pub fn default_file_name(table: &LoadProfileTable) -> Result<String, ExportError> {
        let (from, _) = table.date_range().ok_or(ExportError::EmptyTable)?;
        Ok(format!("{FILE_PREFIX}{}.txt", from.format("%Y%m%d")))
    }

    pub fn archived_path(dir: &Path, file_name: &str) -> PathBuf {
        dir.join(ARCHIVE_DIR).join(file_name)
    }

    /// Distinct data segments with no code mapping, sorted
    pub fn unmapped_segments(&self, table: &LoadProfileTable) -> Vec<String> {
        table
            .records()
            .iter()
            .filter(|r| !self.codes.contains(&r.segment))
            .map(|r| r.segment.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Join the table onto the code mapping and order rows for output
    ///
    /// Every mapping entry yields a row per matching record, or one empty row
    /// when nothing matches. Records without a mapping entry are dropped.
    /// Rows are sorted by date (empty dates last), then by code.
    pub fn join_rows<'a>(&'a self, table: &'a LoadProfileTable) -> Vec<ExportRow<'a>> {
        let mut rows = Vec::new();
        for entry in self.codes.entries() {
            let before = rows.len();
            rows.extend(
                table
                    .records()
                    .iter()
                    .filter(|r| r.segment == entry.source)
                    .map(|r| ExportRow {
                        code: entry.destination.as_str(),
                        record: Some(r),
                    }),
            );
            if rows.len() == before {
                rows.push(ExportRow {
                    code: entry.destination.as_str(),
                    record: None,
                });
            }
        }

        rows.sort_by(|a, b| match (a.date(), b.date()) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        });
        rows.sort_by(|a, b| a.code.cmp(b.code));
        rows
    }

    /// Export a table for upload
    ///
    /// `path` defaults to the configured destination directory and
    /// `file_name` to the name derived from the earliest date. Fails without
    /// writing if the file name is already present in the `Archive`
    /// subdirectory.
    #[instrument(skip(self, table), fields(records = table.len()))]
    pub fn export(
        &self,
        table: &LoadProfileTable,
        path: Option<&Path>,
        file_name: Option<&str>,
    ) -> Result<ExportSummary, ExportError> {
        let dir = path.unwrap_or(self.dest_dir.as_path());
        let file_name = match file_name {
            Some(name) => name.to_string(),
            None => Self::default_file_name(table)?,
        };

        let archived = Self::archived_path(dir, &file_name);
        if archived.exists() {
            return Err(ExportError::FileAlreadyArchived {
                file_name,
                archive_dir: dir.join(ARCHIVE_DIR),
            });
        }

        let unmapped = self.unmapped_segments(table);
        if !unmapped.is_empty() {
            match self.mapping_mode {
                MappingMode::Strict => return Err(ExportError::UnmappedSegments(unmapped)),
                MappingMode::Lenient => warn!(
                    "Dropping {} segments with no code mapping: {:?}",
                    unmapped.len(),
                    unmapped
                ),
            }
        }

        let rows = self.join_rows(table);
        let hour_columns = table.hour_columns();
        let out_path = dir.join(&file_name);
        debug!("Writing {} rows to {}", rows.len(), out_path.display());

        let mut wtr = csv::WriterBuilder::new()
            .delimiter(b'\t')
            .has_headers(false)
            .from_path(&out_path)?;
        for row in &rows {
            wtr.write_record(row.fields(&hour_columns))?;
        }
        wtr.flush()?;

        let date_range = table.date_range();
        match date_range {
            Some((from, to)) => info!(
                "Delmarva load profile data for {} to {} has been downloaded to {}",
                from.format("%b %d, %Y"),
                to.format("%b %d, %Y"),
                out_path.display()
            ),
            None => info!("No load profile data; wrote mapping rows to {}", out_path.display()),
        }

        Ok(ExportSummary {
            path: out_path,
            rows_written: rows.len(),
            date_range,
        })
    }
}
