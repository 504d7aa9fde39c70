// Load profile module
//
// Parses the vendor's daily load-profile text files:
// - schema: positional field layout (standard and fall DST days)
// - day_parser: raw text -> LoadProfileTable
// - table: records and the combined table handed to the exporter

pub mod day_parser;
pub mod schema;
pub mod table;

pub use day_parser::{parse_day, ParseError, ParseOptions, PartialDataPolicy};
pub use schema::DaySchema;
pub use table::{LoadProfileRecord, LoadProfileTable};
