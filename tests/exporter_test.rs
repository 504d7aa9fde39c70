// Tests for LoadProfileExporter: join, ordering, file format and archive guard

mod common;

use chrono::NaiveDate;
use common::{date, raw_day, DST_EXTRA};
use delmarva_lp::codes::{CodeMapping, CodeMappingEntry};
use delmarva_lp::exporter::{ExportError, LoadProfileExporter, MappingMode, ARCHIVE_DIR};
use delmarva_lp::ldc::Ldc;
use delmarva_lp::profile::{parse_day, LoadProfileTable, ParseOptions};
use std::fs;
use std::path::Path;

fn mapping(pairs: &[(&str, &str)]) -> CodeMapping {
    CodeMapping::new(
        pairs
            .iter()
            .map(|(source, destination)| CodeMappingEntry {
                source: source.to_string(),
                destination: destination.to_string(),
            })
            .collect(),
    )
}

fn parsed(ldc: Ldc, day: NaiveDate, segments: &[&str], dst: bool, aggregate: bool) -> LoadProfileTable {
    let options = ParseOptions {
        aggregate_dst_hour: aggregate,
        ..ParseOptions::default()
    };
    parse_day(&raw_day(ldc, day, segments, dst), &options).unwrap()
}

fn read_rows(path: &Path) -> Vec<Vec<String>> {
    fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(|line| line.split('\t').map(|f| f.to_string()).collect())
        .collect()
}

#[test]
fn test_export_writes_tab_delimited_rows() {
    let dir = tempfile::tempdir().unwrap();
    let mut table = parsed(Ldc::Cnm, date(2017, 1, 6), &["RSH", "GS"], false, true);
    table.append(parsed(Ldc::Cnm, date(2017, 1, 5), &["RSH", "GS"], false, true));

    let exporter =
        LoadProfileExporter::new(mapping(&[("RSH", "MDRSH"), ("GS", "MDGS")]), dir.path());
    let summary = exporter.export(&table, None, None).unwrap();

    assert_eq!(summary.path, dir.path().join("Conectiv_20170105.txt"));
    assert_eq!(summary.rows_written, 4);
    assert_eq!(summary.date_range, Some((date(2017, 1, 5), date(2017, 1, 6))));

    let rows = read_rows(&summary.path);
    assert_eq!(rows.len(), 4);
    assert!(rows.iter().all(|r| r.len() == 27));

    let keys: Vec<(&str, &str)> = rows.iter().map(|r| (r[0].as_str(), r[1].as_str())).collect();
    assert_eq!(
        keys,
        vec![
            ("MDGS", "01/05/2017"),
            ("MDGS", "01/06/2017"),
            ("MDRSH", "01/05/2017"),
            ("MDRSH", "01/06/2017"),
        ]
    );

    // GS is the second segment in the fixture: 200 + 0.5 * hour
    assert_eq!(rows[0][2], "200.500");
    assert_eq!(rows[0][25], "212.000");
    assert_eq!(rows[0][26], "");
}

#[test]
fn test_export_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let table = parsed(Ldc::Cnd, date(2017, 3, 1), &["RSH", "GS", "LGS"], false, true);
    let codes = mapping(&[("RSH", "DERSH"), ("GS", "DEGS"), ("LGS", "DELGS")]);
    let exporter = LoadProfileExporter::new(codes.clone(), dir.path());

    let summary = exporter.export(&table, None, Some("upload.txt")).unwrap();

    for row in read_rows(&summary.path) {
        let record = table
            .records()
            .iter()
            .find(|r| codes.lookup(&r.segment) == Some(row[0].as_str()))
            .expect("exported code maps back to a record");
        let row_date = NaiveDate::parse_from_str(&row[1], "%m/%d/%Y").unwrap();
        assert_eq!(row_date, record.date);
        for (idx, field) in row[2..26].iter().enumerate() {
            let value: f64 = field.parse().unwrap();
            assert!((value - record.hours[idx]).abs() < 0.0005);
        }
    }
}

#[test]
fn test_export_drops_unmapped_and_keeps_unmatched_codes() {
    let dir = tempfile::tempdir().unwrap();
    let table = parsed(Ldc::Cnm, date(2017, 1, 5), &["RSH", "XYZ"], false, true);
    let exporter = LoadProfileExporter::new(mapping(&[("RSH", "MDRSH"), ("GS", "MDGS")]), dir.path());

    let summary = exporter.export(&table, None, None).unwrap();
    let rows = read_rows(&summary.path);

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0][0], "MDGS");
    assert!(rows[0][1..].iter().all(|f| f.is_empty()));
    assert_eq!(rows[1][0], "MDRSH");
    assert_eq!(rows[1][1], "01/05/2017");
    assert!(!rows.iter().any(|r| r[0] == "XYZ"));
}

#[test]
fn test_export_strict_mapping_refuses_unmapped() {
    let dir = tempfile::tempdir().unwrap();
    let table = parsed(Ldc::Cnm, date(2017, 1, 5), &["RSH", "XYZ"], false, true);
    let exporter = LoadProfileExporter::new(mapping(&[("RSH", "MDRSH")]), dir.path())
        .with_mapping_mode(MappingMode::Strict);

    let result = exporter.export(&table, None, None);
    match result {
        Err(ExportError::UnmappedSegments(segments)) => assert_eq!(segments, vec!["XYZ"]),
        other => panic!("Expected UnmappedSegments, got {other:?}"),
    }
    assert!(!dir.path().join("Conectiv_20170105.txt").exists());
}

#[test]
fn test_export_refuses_archived_file_name() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir(dir.path().join(ARCHIVE_DIR)).unwrap();
    fs::write(dir.path().join(ARCHIVE_DIR).join("Conectiv_20170105.txt"), "old").unwrap();

    let table = parsed(Ldc::Cnm, date(2017, 1, 5), &["RSH", "GS"], false, true);
    let exporter = LoadProfileExporter::new(mapping(&[("RSH", "MDRSH")]), dir.path());

    let result = exporter.export(&table, None, None);
    match result {
        Err(ExportError::FileAlreadyArchived { file_name, .. }) => {
            assert_eq!(file_name, "Conectiv_20170105.txt")
        }
        other => panic!("Expected FileAlreadyArchived, got {other:?}"),
    }
    assert!(!dir.path().join("Conectiv_20170105.txt").exists());

    // Another name goes through
    let summary = exporter.export(&table, None, Some("Conectiv_20170105b.txt")).unwrap();
    assert!(summary.path.exists());
}

#[test]
fn test_export_explicit_path_overrides_destination() {
    let dest = tempfile::tempdir().unwrap();
    let other = tempfile::tempdir().unwrap();
    let table = parsed(Ldc::Cnm, date(2017, 1, 5), &["RSH", "GS"], false, true);
    let exporter = LoadProfileExporter::new(mapping(&[("RSH", "MDRSH")]), dest.path());

    let summary = exporter.export(&table, Some(other.path()), None).unwrap();
    assert_eq!(summary.path, other.path().join("Conectiv_20170105.txt"));
    assert!(!dest.path().join("Conectiv_20170105.txt").exists());
}

#[test]
fn test_export_unaggregated_dst_column() {
    let dir = tempfile::tempdir().unwrap();
    let mut table = parsed(Ldc::Cnm, date(2016, 11, 5), &["RSH"], false, false);
    table.append(parsed(Ldc::Cnm, date(2016, 11, 6), &["RSH"], true, false));

    let exporter = LoadProfileExporter::new(mapping(&[("RSH", "MDRSH")]), dir.path());
    let summary = exporter.export(&table, None, None).unwrap();
    let rows = read_rows(&summary.path);

    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|r| r.len() == 28));
    // H01, H02, H02X, H03
    assert_eq!(&rows[0][2..6], &["100.500", "101.000", "", "101.500"]);
    assert_eq!(rows[1][4], format!("{DST_EXTRA:.3}"));
}

#[test]
fn test_export_empty_table_needs_file_name() {
    let dir = tempfile::tempdir().unwrap();
    let exporter = LoadProfileExporter::new(mapping(&[("RSH", "MDRSH")]), dir.path());

    let result = exporter.export(&LoadProfileTable::new(), None, None);
    assert!(matches!(result, Err(ExportError::EmptyTable)));
}
