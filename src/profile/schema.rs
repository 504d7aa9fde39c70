//! Positional layout of a vendor load-profile data line.
//!
//! Standard days carry 26 whitespace-separated fields: segment, date and 24
//! hourly readings. The fall daylight-saving day repeats hour 2, so its
//! lines carry 27 fields with the repeated reading (`H02X`) right after
//! `H02`.

pub const HOUR_COLUMNS: [&str; 24] = [
    "H01", "H02", "H03", "H04", "H05", "H06", "H07", "H08", "H09", "H10", "H11", "H12", "H13",
    "H14", "H15", "H16", "H17", "H18", "H19", "H20", "H21", "H22", "H23", "H24",
];

pub const EXTRA_HOUR_COLUMN: &str = "H02X";
pub const SEGMENT_COLUMN: &str = "segment";
pub const DATE_COLUMN: &str = "date";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Segment,
    Date,
    /// Index into the 24 regular hours
    Hour(usize),
    ExtraHour,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub position: usize,
    pub kind: FieldKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DaySchema {
    Standard,
    DaylightSaving,
}

impl DaySchema {
    pub const STANDARD_FIELD_COUNT: usize = 26;
    pub const DAYLIGHT_SAVING_FIELD_COUNT: usize = 27;

    /// Schema implied by the number of fields on a line, if any
    pub fn from_field_count(count: usize) -> Option<Self> {
        match count {
            Self::STANDARD_FIELD_COUNT => Some(DaySchema::Standard),
            Self::DAYLIGHT_SAVING_FIELD_COUNT => Some(DaySchema::DaylightSaving),
            _ => None,
        }
    }

    pub fn field_count(&self) -> usize {
        match self {
            DaySchema::Standard => Self::STANDARD_FIELD_COUNT,
            DaySchema::DaylightSaving => Self::DAYLIGHT_SAVING_FIELD_COUNT,
        }
    }

    pub fn has_extra_hour(&self) -> bool {
        matches!(self, DaySchema::DaylightSaving)
    }

    /// Ordered field list for this schema
    pub fn fields(&self) -> Vec<FieldSpec> {
        let mut fields = vec![
            FieldSpec {
                name: SEGMENT_COLUMN,
                position: 0,
                kind: FieldKind::Segment,
            },
            FieldSpec {
                name: DATE_COLUMN,
                position: 1,
                kind: FieldKind::Date,
            },
        ];

        for (idx, name) in HOUR_COLUMNS.into_iter().enumerate() {
            fields.push(FieldSpec {
                name,
                position: 0,
                kind: FieldKind::Hour(idx),
            });
            if idx == 1 && self.has_extra_hour() {
                fields.push(FieldSpec {
                    name: EXTRA_HOUR_COLUMN,
                    position: 0,
                    kind: FieldKind::ExtraHour,
                });
            }
        }

        for (position, field) in fields.iter_mut().enumerate() {
            field.position = position;
        }
        fields
    }

    /// Hour column names in layout order
    pub fn hour_columns(&self) -> Vec<&'static str> {
        self.fields()
            .into_iter()
            .filter(|f| matches!(f.kind, FieldKind::Hour(_) | FieldKind::ExtraHour))
            .map(|f| f.name)
            .collect()
    }
}
