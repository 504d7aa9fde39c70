use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::fetch_error::FetchError;

/// Load-distribution company served by the Delmarva/Conectiv archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Ldc {
    /// Delmarva Power Delaware
    #[serde(rename = "CND")]
    Cnd,
    /// Delmarva Power Maryland
    #[serde(rename = "CNM")]
    Cnm,
    /// Virginia territory. Known to the archive but no longer published.
    #[serde(rename = "CNV")]
    Cnv,
}

/// LDCs pulled by a range run, in enumeration order.
pub const SUPPORTED_LDCS: [Ldc; 2] = [Ldc::Cnd, Ldc::Cnm];

impl Ldc {
    pub fn code(&self) -> &'static str {
        match self {
            Ldc::Cnd => "CND",
            Ldc::Cnm => "CNM",
            Ldc::Cnv => "CNV",
        }
    }

    /// Two-letter state used in the archive path
    pub fn state(&self) -> &'static str {
        match self {
            Ldc::Cnd => "DE",
            Ldc::Cnm => "MD",
            Ldc::Cnv => "VA",
        }
    }

    pub fn is_supported(&self) -> bool {
        SUPPORTED_LDCS.contains(self)
    }

    /// Fails with `InvalidLdc` unless this LDC may be fetched
    pub fn ensure_supported(self) -> Result<Self, FetchError> {
        if self.is_supported() {
            Ok(self)
        } else {
            Err(FetchError::InvalidLdc(self.code().to_string()))
        }
    }
}

impl fmt::Display for Ldc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Ldc {
    type Err = FetchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "CND" => Ok(Ldc::Cnd),
            "CNM" => Ok(Ldc::Cnm),
            "CNV" => Ok(Ldc::Cnv),
            _ => Err(FetchError::InvalidLdc(s.to_string())),
        }
    }
}
