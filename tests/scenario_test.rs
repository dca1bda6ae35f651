//! Degradation Scenario Tests for olxbank
//!
//! This module exercises the recoverable-failure paths of the import
//! pipeline: missing sheets, blank rows, empty banks and configuration
//! overrides.

use flate2::read::GzDecoder;
use olxbank::{ImportError, ImporterBuilder};
use rust_xlsxwriter::{Workbook, Worksheet, XlsxError};
use std::fs::File;
use std::path::Path;

mod fixtures {
    use super::*;

    pub fn add_library_description(
        workbook: &mut Workbook,
        name: &str,
        org: &str,
        code: &str,
    ) -> Result<(), XlsxError> {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Library Description")?;
        sheet.write_string(0, 0, name)?;
        sheet.write_string(1, 0, org)?;
        sheet.write_string(2, 0, code)?;
        Ok(())
    }

    pub fn add_header_only_sheet(workbook: &mut Workbook, name: &str) -> Result<(), XlsxError> {
        let sheet = workbook.add_worksheet();
        sheet.set_name(name)?;
        sheet.write_string(0, 1, "Title")?;
        Ok(())
    }

    /// Checkbox/Multiple Choice layout row with the minimum valid fields
    pub fn write_choice_row(
        sheet: &mut Worksheet,
        row: u32,
        title: &str,
        lesson: &str,
        difficulty: &str,
        answer: &str,
    ) -> Result<(), XlsxError> {
        sheet.write_string(row, 1, title)?;
        sheet.write_string(row, 2, "CS101")?;
        sheet.write_string(row, 3, lesson)?;
        sheet.write_string(row, 5, &format!("Prompt for {}", title))?;
        sheet.write_string(row, 6, difficulty)?;
        sheet.write_string(row, 7, "alpha")?;
        sheet.write_string(row, 8, "beta")?;
        sheet.write_string(row, 12, answer)?;
        Ok(())
    }

    /// Numerical/Text Input layout row with the minimum valid fields
    pub fn write_plain_row(
        sheet: &mut Worksheet,
        row: u32,
        title: &str,
        lesson: &str,
        difficulty: &str,
        answer: &str,
    ) -> Result<(), XlsxError> {
        sheet.write_string(row, 1, title)?;
        sheet.write_string(row, 2, "CS101")?;
        sheet.write_string(row, 3, lesson)?;
        sheet.write_string(row, 5, &format!("Prompt for {}", title))?;
        sheet.write_string(row, 6, difficulty)?;
        sheet.write_string(row, 7, answer)?;
        Ok(())
    }
}

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn entry_names(archive_path: &Path) -> Vec<String> {
    let file = File::open(archive_path).unwrap();
    let mut archive = tar::Archive::new(GzDecoder::new(file));
    let mut names: Vec<String> = archive
        .entries()
        .unwrap()
        .map(|entry| {
            entry
                .unwrap()
                .path()
                .unwrap()
                .to_string_lossy()
                .into_owned()
        })
        .collect();
    names.sort();
    names
}

fn unpack(archive_path: &Path, dest: &Path) {
    let file = File::open(archive_path).unwrap();
    let mut archive = tar::Archive::new(GzDecoder::new(file));
    archive.unpack(dest).unwrap();
}

#[test]
fn missing_sheets_degrade_to_error_lines_in_scan_order() {
    init_logging();
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("bank.xlsx");

    // Only the Checkboxes sheet is present
    let mut workbook = Workbook::new();
    let checkboxes = workbook.add_worksheet();
    checkboxes.set_name("Checkboxes").unwrap();
    checkboxes.write_string(0, 1, "Title").unwrap();
    fixtures::write_choice_row(checkboxes, 1, "CQ1", "1", "E", "1").unwrap();
    workbook.save(&input).unwrap();

    let importer = ImporterBuilder::new()
        .with_output_dir(dir.path().join("out"))
        .build()
        .unwrap();
    let outcome = importer.import(&input).unwrap();

    assert_eq!(
        outcome.error_lines,
        vec![
            "missing sheet: Library Description".to_string(),
            "missing sheet: Multiple Choice-Drop Down".to_string(),
            "missing sheet: Numerical Input".to_string(),
            "missing sheet: Text Input".to_string(),
        ]
    );

    // The surviving checkbox question is still packaged
    let names = entry_names(&outcome.archive_path);
    assert!(names.contains(&"question_banks/1_E.tar.gz".to_string()));
    assert!(names.contains(&"question_banks/errors.txt".to_string()));
}

#[test]
fn missing_description_sheet_falls_back_to_default_library_name() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("bank.xlsx");

    let mut workbook = Workbook::new();
    let checkboxes = workbook.add_worksheet();
    checkboxes.set_name("Checkboxes").unwrap();
    checkboxes.write_string(0, 1, "Title").unwrap();
    fixtures::write_choice_row(checkboxes, 1, "CQ1", "1", "E", "1").unwrap();
    workbook.save(&input).unwrap();

    let outcome = ImporterBuilder::new()
        .with_output_dir(dir.path().join("out"))
        .build()
        .unwrap()
        .import(&input)
        .unwrap();

    let unpacked = dir.path().join("unpacked");
    unpack(&outcome.archive_path, &unpacked);
    let bundle = dir.path().join("bundle");
    unpack(&unpacked.join("question_banks").join("1_E.tar.gz"), &bundle);

    let manifest = std::fs::read_to_string(bundle.join("1_E").join("library.xml")).unwrap();
    assert!(manifest.contains("display_name=\"library_1E\""));
}

#[test]
fn empty_bank_produces_archive_with_no_partitions_and_no_report() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("bank.xlsx");

    let mut workbook = Workbook::new();
    fixtures::add_library_description(&mut workbook, "Bank", "Org", "BNK").unwrap();
    fixtures::add_header_only_sheet(&mut workbook, "Checkboxes").unwrap();
    fixtures::add_header_only_sheet(&mut workbook, "Multiple Choice-Drop Down").unwrap();
    fixtures::add_header_only_sheet(&mut workbook, "Numerical Input").unwrap();
    fixtures::add_header_only_sheet(&mut workbook, "Text Input").unwrap();
    workbook.save(&input).unwrap();

    let outcome = ImporterBuilder::new()
        .with_output_dir(dir.path().join("out"))
        .build()
        .unwrap()
        .import(&input)
        .unwrap();

    assert!(outcome.is_success());
    assert!(outcome.archive_path.exists());

    let names = entry_names(&outcome.archive_path);
    assert!(!names.iter().any(|name| name.ends_with(".tar.gz")));
    assert!(!names.iter().any(|name| name.ends_with("errors.txt")));
}

#[test]
fn blank_title_rows_are_skipped_without_error() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("bank.xlsx");

    let mut workbook = Workbook::new();
    fixtures::add_library_description(&mut workbook, "Bank", "Org", "BNK").unwrap();

    let numerical = workbook.add_worksheet();
    numerical.set_name("Numerical Input").unwrap();
    numerical.write_string(0, 1, "Title").unwrap();
    fixtures::write_plain_row(numerical, 1, "NQ1", "1", "E", "42").unwrap();
    // Row 2 has data but no title: silently skipped, not reported
    numerical.write_string(2, 2, "CS101").unwrap();
    numerical.write_string(2, 7, "17").unwrap();
    fixtures::write_plain_row(numerical, 3, "NQ2", "1", "E", "7").unwrap();

    fixtures::add_header_only_sheet(&mut workbook, "Checkboxes").unwrap();
    fixtures::add_header_only_sheet(&mut workbook, "Multiple Choice-Drop Down").unwrap();
    fixtures::add_header_only_sheet(&mut workbook, "Text Input").unwrap();
    workbook.save(&input).unwrap();

    let outcome = ImporterBuilder::new()
        .with_output_dir(dir.path().join("out"))
        .build()
        .unwrap()
        .import(&input)
        .unwrap();

    assert!(outcome.is_success());

    let unpacked = dir.path().join("unpacked");
    unpack(&outcome.archive_path, &unpacked);
    let bundle = dir.path().join("bundle");
    unpack(&unpacked.join("question_banks").join("1_E.tar.gz"), &bundle);

    let problems: Vec<String> = std::fs::read_dir(bundle.join("1_E").join("problem"))
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(problems.len(), 2);
    assert!(problems.contains(&"ENQ1.xml".to_string()));
    assert!(problems.contains(&"ENQ2.xml".to_string()));
}

#[test]
fn tolerance_override_is_applied_to_numerical_problems() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("bank.xlsx");

    let mut workbook = Workbook::new();
    fixtures::add_library_description(&mut workbook, "Bank", "Org", "BNK").unwrap();
    let numerical = workbook.add_worksheet();
    numerical.set_name("Numerical Input").unwrap();
    numerical.write_string(0, 1, "Title").unwrap();
    fixtures::write_plain_row(numerical, 1, "NQ1", "1", "E", "3.14").unwrap();
    fixtures::add_header_only_sheet(&mut workbook, "Checkboxes").unwrap();
    fixtures::add_header_only_sheet(&mut workbook, "Multiple Choice-Drop Down").unwrap();
    fixtures::add_header_only_sheet(&mut workbook, "Text Input").unwrap();
    workbook.save(&input).unwrap();

    let outcome = ImporterBuilder::new()
        .with_output_dir(dir.path().join("out"))
        .with_tolerance("1%")
        .build()
        .unwrap()
        .import(&input)
        .unwrap();

    let unpacked = dir.path().join("unpacked");
    unpack(&outcome.archive_path, &unpacked);
    let bundle = dir.path().join("bundle");
    unpack(&unpacked.join("question_banks").join("1_E.tar.gz"), &bundle);

    let problem =
        std::fs::read_to_string(bundle.join("1_E").join("problem").join("ENQ1.xml")).unwrap();
    assert!(problem.contains("<responseparam type=\"tolerance\" default=\"1%\"/>"));
    assert!(problem.contains("answer=\"3.14\""));
}

#[test]
fn unknown_difficulty_is_bucketed_as_hard() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("bank.xlsx");

    let mut workbook = Workbook::new();
    fixtures::add_library_description(&mut workbook, "Bank", "Org", "BNK").unwrap();
    let text_input = workbook.add_worksheet();
    text_input.set_name("Text Input").unwrap();
    text_input.write_string(0, 1, "Title").unwrap();
    fixtures::write_plain_row(text_input, 1, "TQ1", "5", "tricky", "Rust").unwrap();
    fixtures::add_header_only_sheet(&mut workbook, "Checkboxes").unwrap();
    fixtures::add_header_only_sheet(&mut workbook, "Multiple Choice-Drop Down").unwrap();
    fixtures::add_header_only_sheet(&mut workbook, "Numerical Input").unwrap();
    workbook.save(&input).unwrap();

    let outcome = ImporterBuilder::new()
        .with_output_dir(dir.path().join("out"))
        .build()
        .unwrap()
        .import(&input)
        .unwrap();

    assert!(outcome.is_success());
    let names = entry_names(&outcome.archive_path);
    assert!(names.contains(&"question_banks/5_H.tar.gz".to_string()));
}

#[test]
fn unsupported_extension_is_a_fatal_error() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("bank.ods");
    std::fs::write(&input, b"not a question bank").unwrap();

    let importer = ImporterBuilder::new().build().unwrap();
    let result = importer.import(&input);

    match result {
        Err(ImportError::UnsupportedFormat { extension }) => assert_eq!(extension, "ods"),
        other => panic!("expected UnsupportedFormat, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn archive_lands_next_to_input_when_no_output_dir_is_set() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("bank.xlsx");

    let mut workbook = Workbook::new();
    fixtures::add_library_description(&mut workbook, "Bank", "Org", "BNK").unwrap();
    fixtures::add_header_only_sheet(&mut workbook, "Checkboxes").unwrap();
    fixtures::add_header_only_sheet(&mut workbook, "Multiple Choice-Drop Down").unwrap();
    fixtures::add_header_only_sheet(&mut workbook, "Numerical Input").unwrap();
    fixtures::add_header_only_sheet(&mut workbook, "Text Input").unwrap();
    workbook.save(&input).unwrap();

    let outcome = ImporterBuilder::new()
        .build()
        .unwrap()
        .import(&input)
        .unwrap();

    assert_eq!(outcome.archive_path, dir.path().join("bank_library.tar.gz"));
    assert!(outcome.archive_path.exists());
}
