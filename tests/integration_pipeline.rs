/*!
 * End-to-end normalization tests
 *
 * Drives the full classify -> extract -> filter/group -> emit path over
 * in-memory workbooks and checks the CSV files that land on disk. Real
 * `.xlsx` ingestion is covered by the reader; everything downstream of the
 * `TabularSource` trait is exercised here exactly as the batch pipeline
 * runs it.
 */

use claimnorm::prelude::*;
use chrono::NaiveDate;
use tempfile::TempDir;

fn text(s: &str) -> Cell {
    Cell::Text(s.to_string())
}

/// A PRACTICE-format sheet with rows for two claimants and one row
/// missing its claim number
fn practice_workbook() -> VecSource {
    let header = vec![
        text("MEMBER ID"),
        text("FIRST NAME"),
        text("LAST NAME"),
        text("CLAIM NUMBER"),
        text("Dx Code"),
        text("Procedure"),
        text("CHECK NUMBER"),
        text("BEGINNING SERVICE"),
        text("END SERVICE"),
        text("DATE PAID"),
        text("Provider Name"),
        text("BILLED"),
        text("PAID"),
        text("PROVIDER TIN"),
    ];
    let row = |first: &str, last: &str, claim: &str| {
        vec![
            text("123-45-6789"),
            text(first),
            text(last),
            text(claim),
            text("250.0"),
            text("99213"),
            text("CHK1"),
            Cell::Date(NaiveDate::from_ymd_opt(2023, 1, 2).unwrap()),
            Cell::Date(NaiveDate::from_ymd_opt(2023, 1, 3).unwrap()),
            Cell::Date(NaiveDate::from_ymd_opt(2023, 2, 1).unwrap()),
            text("Dr. Adams"),
            Cell::Number(50.5),
            Cell::Number(40.0),
            text("11-1111111"),
        ]
    };
    let mut blank = row("Jane", "Doe", "");
    blank[3] = Cell::Empty;

    VecSource::new().with_sheet(
        "MEDICAL",
        vec![
            header,
            row("Jane", "Doe", "C100"),
            row("John", "Roe", "C200"),
            blank,
            row("Jane", "Doe", "C101"),
        ],
    )
}

fn bcbs_workbook(name_cell: &str) -> VecSource {
    let header = vec![
        text("SUBSCRIBER#"),
        text("CLAIM#"),
        text("DIAGCODE"),
        text("PROCEDURECODE"),
        text("CHECK#"),
        text("FIRSTDOS"),
        text("PAIDDATE"),
        text("PROVIDER NAME / TYPE"),
        text("TOTALCHARGES"),
        text("TOTALPAYMENT"),
    ];
    let row = |claim: &str| {
        vec![
            text("999-99-9999"),
            text(claim),
            text("V70.0"),
            text("80050"),
            text("77"),
            Cell::Date(NaiveDate::from_ymd_opt(2023, 3, 10).unwrap()),
            Cell::Date(NaiveDate::from_ymd_opt(2023, 4, 1).unwrap()),
            text("LabCorp / LAB"),
            Cell::Number(120.0),
            Cell::Number(96.5),
        ]
    };

    let mut grid: Vec<Vec<Cell>> = vec![vec![Cell::Empty]; 9];
    grid[0] = vec![text("Blue Cross Blue Shield")];
    grid[3] = vec![text(name_cell)];
    grid.push(header);
    grid.push(row("B1"));
    grid.push(row("B2"));
    VecSource::new().with_sheet("Sheet1", grid)
}

/// Normalize one in-memory workbook the way the pipeline does and write
/// the resulting claimant files into `out_dir`
fn normalize(
    source: &mut dyn TabularSource,
    profile: &ProviderProfile,
    out_dir: &std::path::Path,
) -> Vec<std::path::PathBuf> {
    let records = FieldExtractor::new()
        .extract(source, profile)
        .expect("extraction should succeed");
    let groups = group_by_claimant(filter_claims(records), &profile.provider_name);

    let sink = CsvSink::new();
    groups
        .iter()
        .map(|group| {
            claimnorm::export::emit(
                &sink,
                out_dir,
                &group.identity,
                &profile.sheet_name,
                &group.records,
            )
            .expect("emit should succeed")
        })
        .collect()
}

#[test]
fn practice_file_yields_one_output_per_claimant() {
    let dir = TempDir::new().unwrap();
    let registry = ProfileRegistry::standard().unwrap();
    let profile = registry.lookup("DOE_2023.xlsx").unwrap();

    let outputs = normalize(&mut practice_workbook(), profile, dir.path());

    let names: Vec<_> = outputs
        .iter()
        .filter_map(|p| p.file_name().and_then(|n| n.to_str()).map(str::to_string))
        .collect();
    assert_eq!(names, vec!["PRACTICE_Jane_Doe.csv", "PRACTICE_John_Roe.csv"]);

    // The row without a claim number was dropped; Jane keeps two rows.
    let jane = std::fs::read_to_string(&outputs[0]).unwrap();
    let jane_rows: Vec<&str> = jane.lines().skip(1).collect();
    assert_eq!(jane_rows.len(), 2);
    assert!(jane_rows[0].contains("C100"));
    assert!(jane_rows[1].contains("C101"));

    let john = std::fs::read_to_string(&outputs[1]).unwrap();
    assert_eq!(john.lines().count(), 2);
}

#[test]
fn outputs_always_carry_the_canonical_header() {
    let dir = TempDir::new().unwrap();
    let registry = ProfileRegistry::standard().unwrap();

    let practice = registry.lookup("DOE_2023.xlsx").unwrap();
    let bcbs = registry.lookup("BCBS_jan.xlsx").unwrap();

    let mut outputs = normalize(&mut practice_workbook(), practice, dir.path());
    outputs.extend(normalize(&mut bcbs_workbook("John Smith"), bcbs, dir.path()));

    let expected = CanonicalSchema::column_names().join(",");
    for output in outputs {
        let contents = std::fs::read_to_string(output).unwrap();
        assert_eq!(contents.lines().next(), Some(expected.as_str()));
    }
}

#[test]
fn bcbs_file_broadcasts_the_name_cell() {
    let dir = TempDir::new().unwrap();
    let registry = ProfileRegistry::standard().unwrap();
    let profile = registry.lookup("BCBS_jan.xlsx").unwrap();

    let outputs = normalize(&mut bcbs_workbook("John Smith"), profile, dir.path());
    assert_eq!(outputs.len(), 1);
    assert!(outputs[0].ends_with("BCBS_John_Smith.csv"));

    let contents = std::fs::read_to_string(&outputs[0]).unwrap();
    let rows: Vec<&str> = contents.lines().skip(1).collect();
    assert_eq!(rows.len(), 2);
    for row in rows {
        assert!(row.contains("John,Smith"));
        assert!(row.contains("22-2222222"));
        // FIRSTDOS feeds ServiceDate and ClaimReceiptDate alike.
        assert_eq!(row.matches("2023-03-10").count(), 2);
        assert!(row.contains("120.00"));
        assert!(row.contains("96.50"));
    }
}

#[test]
fn absent_fields_render_as_nan() {
    let dir = TempDir::new().unwrap();
    let registry = ProfileRegistry::standard().unwrap();
    let profile = registry.lookup("BCBS_jan.xlsx").unwrap();

    // BCBS has no per-row name columns and no mapped PaidDate gap here, but
    // a blank check number must come through as NAN.
    let mut workbook = bcbs_workbook("John Smith");
    let outputs = normalize(&mut workbook, profile, dir.path());
    let contents = std::fs::read_to_string(&outputs[0]).unwrap();
    assert!(!contents.contains("NAN,NAN,NAN,NAN"));

    let mut sparse = bcbs_workbook("John Smith");
    let mut table = sparse.read_sheet("Sheet1", 9).unwrap();
    for row in &mut table.rows {
        row[4] = Cell::Empty;
    }
    let mut grid: Vec<Vec<Cell>> = vec![vec![Cell::Empty]; 9];
    grid[3] = vec![text("John Smith")];
    grid.push(table.headers.iter().map(|h| text(h)).collect());
    grid.append(&mut table.rows);
    let mut sparse = VecSource::new().with_sheet("Sheet1", grid);

    let outputs = normalize(&mut sparse, profile, dir.path());
    let contents = std::fs::read_to_string(&outputs[0]).unwrap();
    for row in contents.lines().skip(1) {
        let cells: Vec<&str> = row.split(',').collect();
        // CheckNo is the last canonical column.
        assert_eq!(cells[14], "NAN");
    }
}

#[test]
fn classification_routes_and_skips_by_file_name() {
    let registry = ProfileRegistry::standard().unwrap();

    let cases = [
        ("2023_DOE_claims.xlsx", Some("PRACTICE")),
        ("HEALTHGRAM_q2.xlsx", Some("HEALTHGRAM")),
        ("BCBS_smith.xlsx", Some("BCBS")),
        ("aetna_export.xlsx", None),
        ("summary.xlsx", None),
    ];
    for (file_name, expected) in cases {
        match registry.classify(file_name) {
            Classification::Matched(profile) => {
                assert_eq!(Some(profile.provider_name.as_str()), expected, "{}", file_name);
            }
            Classification::Skip => assert_eq!(expected, None, "{}", file_name),
        }
    }
}

#[test]
fn malformed_name_cell_is_recoverable() {
    let registry = ProfileRegistry::standard().unwrap();
    let profile = registry.lookup("BCBS_jan.xlsx").unwrap();

    let err = FieldExtractor::new()
        .extract(&mut bcbs_workbook("Madonna"), profile)
        .unwrap_err();
    assert!(err.is_recoverable());
    assert!(err.user_message().contains("Madonna"));
}
