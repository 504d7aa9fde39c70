use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info, warn};

pub const DEFAULT_CODES_FILE_NAME: &str = "delmarva_lp_code_mapping.csv";

#[derive(Error, Debug)]
pub enum CodesError {
    #[error("Failed to read codes file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid codes file: {0}")]
    Csv(#[from] csv::Error),
}

/// Vendor segment code and the load profile code used downstream
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CodeMappingEntry {
    #[serde(rename = "T_DMS_LOAD_PROFILE")]
    pub source: String,
    #[serde(rename = "C_LOAD_PROFILE")]
    pub destination: String,
}

/// Segment code mapping, in file order
#[derive(Debug, Clone, Default)]
pub struct CodeMapping {
    entries: Vec<CodeMappingEntry>,
    index: HashMap<String, usize>,
}

impl CodeMapping {
    pub fn new(entries: Vec<CodeMappingEntry>) -> Self {
        let mut index = HashMap::new();
        let mut duplicates = HashSet::new();
        for (pos, entry) in entries.iter().enumerate() {
            if index.contains_key(&entry.source) {
                duplicates.insert(entry.source.clone());
            } else {
                index.insert(entry.source.clone(), pos);
            }
        }

        if !duplicates.is_empty() {
            let mut duplicates: Vec<String> = duplicates.into_iter().collect();
            duplicates.sort();
            warn!(
                "Code mapping has duplicate source codes, each will produce repeated rows: {:?}",
                duplicates
            );
        }

        Self { entries, index }
    }

    /// Load `codes_dir/file_name`. A missing file yields an empty mapping.
    pub fn load(codes_dir: impl AsRef<Path>, file_name: &str) -> Result<Self, CodesError> {
        let file_path = codes_dir.as_ref().join(file_name);
        if !file_path.exists() {
            warn!("Codes file not found: {}", file_path.display());
            return Ok(Self::default());
        }

        debug!("Loading code mapping from {}", file_path.display());
        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_path(&file_path)?;

        let mut entries = Vec::new();
        for result in rdr.deserialize() {
            let entry: CodeMappingEntry = result?;
            entries.push(entry);
        }

        info!("Loaded {} code mappings from {}", entries.len(), file_path.display());
        Ok(Self::new(entries))
    }

    pub fn entries(&self) -> &[CodeMappingEntry] {
        &self.entries
    }

    /// Destination code of the first entry for a source code
    pub fn lookup(&self, source: &str) -> Option<&str> {
        self.index
            .get(source)
            .map(|pos| self.entries[*pos].destination.as_str())
    }

    pub fn contains(&self, source: &str) -> bool {
        self.index.contains_key(source)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
