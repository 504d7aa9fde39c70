use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::codes::DEFAULT_CODES_FILE_NAME;
use crate::exporter::MappingMode;
use crate::fetcher::{DEFAULT_ARCHIVE_BASE_URL, DEFAULT_TIMEOUT_SECS, DEFAULT_TRANSIENT_RETRIES};
use crate::profile::day_parser::DEFAULT_EXPECTED_ROWS;
use crate::profile::{ParseOptions, PartialDataPolicy};

#[derive(Debug, Clone)]
pub struct Config {
    pub codes_dir: PathBuf,
    pub codes_file_name: String,
    pub dest_dir: PathBuf,
    pub archive_base_url: String,
    pub http_timeout_secs: u64,
    pub transient_retries: usize,
    pub expected_rows: usize,
    pub strict_partial: bool,
    pub strict_mapping: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, env::VarError> {
        let cwd = env::current_dir().unwrap_or_else(|_| PathBuf::from("."));

        Ok(Config {
            codes_dir: env::var("LP_CODES_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| cwd.clone()),
            codes_file_name: env::var("LP_CODES_FILE")
                .unwrap_or_else(|_| DEFAULT_CODES_FILE_NAME.to_string()),
            dest_dir: env::var("LP_DEST_DIR")
                .map(PathBuf::from)
                .unwrap_or(cwd),
            archive_base_url: env::var("LP_ARCHIVE_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_ARCHIVE_BASE_URL.to_string()),
            http_timeout_secs: env::var("LP_HTTP_TIMEOUT_SECS")
                .unwrap_or_else(|_| DEFAULT_TIMEOUT_SECS.to_string())
                .parse()
                .unwrap_or(DEFAULT_TIMEOUT_SECS),
            transient_retries: env::var("LP_TRANSIENT_RETRIES")
                .unwrap_or_else(|_| DEFAULT_TRANSIENT_RETRIES.to_string())
                .parse()
                .unwrap_or(DEFAULT_TRANSIENT_RETRIES),
            expected_rows: env::var("LP_EXPECTED_ROWS")
                .unwrap_or_else(|_| DEFAULT_EXPECTED_ROWS.to_string())
                .parse()
                .unwrap_or(DEFAULT_EXPECTED_ROWS),
            strict_partial: env_flag("LP_STRICT_PARTIAL"),
            strict_mapping: env_flag("LP_STRICT_MAPPING"),
        })
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions {
            aggregate_dst_hour: true,
            expected_rows: self.expected_rows,
            partial_policy: if self.strict_partial {
                PartialDataPolicy::Strict
            } else {
                PartialDataPolicy::Lenient
            },
        }
    }

    pub fn mapping_mode(&self) -> MappingMode {
        if self.strict_mapping {
            MappingMode::Strict
        } else {
            MappingMode::Lenient
        }
    }
}

fn env_flag(name: &str) -> bool {
    env::var(name)
        .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}
