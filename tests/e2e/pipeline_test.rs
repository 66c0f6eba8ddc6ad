// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use schedule_scout::application::dto::RunStatus;
use schedule_scout::application::usecases::{DownloadSchedulesUseCase, SearchTeachersUseCase};
use schedule_scout::config::settings::XLSX_CONTENT_TYPE;
use schedule_scout::domain::models::{RunContext, TeacherRoster};
use schedule_scout::domain::repositories::RosterRepository;
use schedule_scout::engines::reqwest_engine::ReqwestEngine;
use schedule_scout::infrastructure::repositories::RosterRepositoryImpl;
use std::sync::Arc;
use url::Url;
use wiremock::MockServer;

use crate::helpers::workbook::{header_row, schedule_row, xlsx_bytes};
use crate::helpers::{downloader, file_names, http_settings, mount_file, mount_page};

#[tokio::test]
async fn test_index_pages_to_result_file() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/raspisanie/ochnoe",
        r#"<html><body><a href="/files/ivt-21.xlsx">ИВТ-21</a></body></html>"#,
    )
    .await;
    mount_page(
        &server,
        "/raspisanie/zaochnoe",
        r#"<html><body><a href="/files/ek-11.xlsx">ЭК-11</a></body></html>"#,
    )
    .await;

    let matching = xlsx_bytes(&[
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
    ]);
    let other = xlsx_bytes(&[(
        "Лист1",
        vec![
            header_row(),
            schedule_row(
                "Ср",
                ["11:00", "12", "пр", "Иванов И.И.", "Право"],
                ["", "", "", "", ""],
                "",
            ),
        ],
    )]);
    mount_file(&server, "/files/ivt-21.xlsx", &matching, XLSX_CONTENT_TYPE).await;
    mount_file(&server, "/files/ek-11.xlsx", &other, XLSX_CONTENT_TYPE).await;

    let bases = vec![
        Url::parse(&format!("{}/raspisanie/ochnoe", server.uri())).unwrap(),
        Url::parse(&format!("{}/raspisanie/zaochnoe", server.uri())).unwrap(),
    ];
    let folder = tempfile::tempdir().unwrap();
    let config = tempfile::tempdir().unwrap();

    let download = DownloadSchedulesUseCase::new(
        Arc::new(ReqwestEngine::new(&http_settings()).unwrap()),
        downloader(),
        4,
        bases,
    );
    let report = download
        .execute(folder.path(), &RunContext::detached())
        .await
        .unwrap();
    assert_eq!(report.status, RunStatus::Done);
    assert_eq!(report.links_found, 2);
    assert_eq!(report.summary.downloaded(), 2);

    let roster = Arc::new(RosterRepositoryImpl::new(config.path().join("teachers.json")));
    roster
        .save(&TeacherRoster::new(vec!["Петров А.Б.".to_string()]))
        .unwrap();
    let search = SearchTeachersUseCase::new(roster);
    let report = search
        .execute(folder.path(), false, &RunContext::detached())
        .await
        .unwrap();

    assert_eq!(report.status, RunStatus::Done);
    assert_eq!(report.documents, 2);
    assert_eq!(report.records.len(), 1);
    let record = &report.records[0];
    assert_eq!(record.teacher_name, "Петров А.Б.");
    assert_eq!(record.group, "ivt-21");
    assert_eq!(record.even_week.subject, "Физика");
    assert_eq!(record.odd_week.subject, "Химия");
    assert_eq!(record.odd_week.day, "Вт");

    let result = report.result_path.expect("result file");
    assert!(result.exists());
    let names = file_names(folder.path());
    assert!(names.contains(&"ivt-21_Неделя.csv".to_string()));
    assert!(names.contains(&"ek-11_Лист1.csv".to_string()));
    assert!(names.iter().all(|n| !n.contains("Пусто")));

    let content = std::fs::read_to_string(&result).unwrap();
    assert_eq!(content.lines().count(), 2);
    assert!(content.contains("Физика"));
}
