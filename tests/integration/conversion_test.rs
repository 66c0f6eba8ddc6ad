// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use schedule_scout::domain::models::{CancellationSignal, ColumnLayout, NullSink, RunContext};
use schedule_scout::infrastructure::sheet_converter::{SheetConverter, SheetOutcome};
use schedule_scout::infrastructure::table_store::load_table;
use std::sync::Arc;

use crate::helpers::file_names;
use crate::helpers::workbook::{header_row, schedule_row, write_xlsx};

fn sample_document(dir: &std::path::Path) -> std::path::PathBuf {
    let path = dir.join("ivt-21.xlsx");
    write_xlsx(
        &path,
        &[
            (
                "Неделя",
                vec![
                    header_row(),
                    schedule_row(
                        "Пн",
                        ["9:00", "204", "лек", "Петров А.Б.", "Физика"],
                        ["Химия", "Сидоров В.Г.", "пр", "305", "10:40"],
                        "Вт",
                    ),
                ],
            ),
            ("Пусто", vec![]),
            ("Только шапка", vec![header_row()]),
        ],
    );
    path
}

#[test]
fn test_sheets_become_tables_and_empty_sheets_are_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let document = sample_document(dir.path());

    let report = SheetConverter::new(false)
        .convert(&document, &RunContext::detached())
        .unwrap();

    let outcomes: Vec<(&str, &SheetOutcome)> = report
        .sheets
        .iter()
        .map(|s| (s.sheet.as_str(), &s.outcome))
        .collect();
    assert_eq!(outcomes.len(), 3);
    assert!(matches!(outcomes[0], ("Неделя", SheetOutcome::Written(_))));
    assert!(matches!(outcomes[1], ("Пусто", SheetOutcome::Empty)));
    assert!(matches!(outcomes[2], ("Только шапка", SheetOutcome::Empty)));
    assert_eq!(
        file_names(dir.path()),
        vec!["ivt-21.xlsx", "ivt-21_Неделя.csv"]
    );

    let table = load_table(&report.tables()[0], &ColumnLayout::STANDARD).unwrap();
    assert_eq!(table.group(), "ivt-21");
    assert_eq!(table.rows.len(), 1);
    assert_eq!(table.rows[0].even.teacher_text, "Петров А.Б.");
    assert_eq!(table.rows[0].odd.time, "10:40");
    assert_eq!(table.rows[0].odd.day, "Вт");
}

#[test]
fn test_rerun_without_overwrite_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let document = sample_document(dir.path());
    let converter = SheetConverter::new(false);

    let first = converter.convert(&document, &RunContext::detached()).unwrap();
    assert_eq!(first.written(), 1);
    let table = &first.tables()[0];
    std::fs::write(table, "marker\n").unwrap();

    let second = converter.convert(&document, &RunContext::detached()).unwrap();
    assert_eq!(second.written(), 0);
    assert!(matches!(
        second.sheets[0].outcome,
        SheetOutcome::AlreadyAvailable(_)
    ));
    assert_eq!(std::fs::read_to_string(table).unwrap(), "marker\n");
}

#[test]
fn test_rerun_with_overwrite_writes_again() {
    let dir = tempfile::tempdir().unwrap();
    let document = sample_document(dir.path());
    let converter = SheetConverter::new(true);

    let first = converter.convert(&document, &RunContext::detached()).unwrap();
    let table = first.tables()[0].clone();
    std::fs::write(&table, "marker\n").unwrap();

    let second = converter.convert(&document, &RunContext::detached()).unwrap();
    assert_eq!(first.written(), 1);
    assert_eq!(second.written(), 1);
    assert_ne!(std::fs::read_to_string(&table).unwrap(), "marker\n");
}

#[test]
fn test_cancelled_conversion_stops_before_first_sheet() {
    let dir = tempfile::tempdir().unwrap();
    let document = sample_document(dir.path());
    let cancel = CancellationSignal::new();
    cancel.cancel();
    let ctx = RunContext::new(cancel, Arc::new(NullSink));

    let report = SheetConverter::new(false).convert(&document, &ctx).unwrap();
    assert!(report.cancelled);
    assert!(report.sheets.is_empty());
    assert_eq!(file_names(dir.path()), vec!["ivt-21.xlsx"]);
}

#[test]
fn test_broken_document_does_not_stop_siblings() {
    let dir = tempfile::tempdir().unwrap();
    let good = sample_document(dir.path());
    let broken = dir.path().join("aaa.xlsx");
    std::fs::write(&broken, b"not a zip").unwrap();

    let summary = SheetConverter::new(false)
        .convert_all(&[broken.clone(), good], &RunContext::detached());
    assert_eq!(summary.failed_documents.len(), 1);
    assert_eq!(summary.failed_documents[0].0, broken);
    assert_eq!(summary.tables().len(), 1);
}
