// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use schedule_scout::config::settings::XLSX_CONTENT_TYPE;
use schedule_scout::domain::models::{
    CancellationSignal, ChannelSink, DownloadOutcome, FailureKind, Link, NullSink, RunContext,
    RunEvent, Stage,
};
use schedule_scout::workers::DownloadPool;
use std::sync::Arc;
use std::time::{Duration, Instant};
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::helpers::{downloader, file_names, mount_file, mount_head, stalled_body_server};

fn link(server: &MockServer, route: &str) -> Link {
    Link::spreadsheet(Url::parse(&format!("{}{}", server.uri(), route)).unwrap()).unwrap()
}

fn pool() -> DownloadPool {
    DownloadPool::new(Arc::new(downloader()), 4)
}

#[tokio::test]
async fn test_second_run_skips_unchanged_files() {
    let server = MockServer::start().await;
    let body_a = vec![7u8; 5000];
    let body_b = vec![9u8; 300];
    mount_file(&server, "/files/a.xlsx", &body_a, XLSX_CONTENT_TYPE).await;
    mount_file(&server, "/files/b.xlsx", &body_b, XLSX_CONTENT_TYPE).await;
    let links = vec![link(&server, "/files/a.xlsx"), link(&server, "/files/b.xlsx")];
    let dir = tempfile::tempdir().unwrap();

    let first = pool().run(&links, dir.path(), &RunContext::detached()).await;
    assert_eq!(first.downloaded(), 2);
    assert_eq!(std::fs::read(dir.path().join("a.xlsx")).unwrap(), body_a);
    assert_eq!(std::fs::read(dir.path().join("b.xlsx")).unwrap(), body_b);

    let second = pool().run(&links, dir.path(), &RunContext::detached()).await;
    assert_eq!(second.skipped(), 2);
    assert_eq!(second.downloaded(), 0);
    assert_eq!(file_names(dir.path()), vec!["a.xlsx", "b.xlsx"]);
}

#[tokio::test]
async fn test_size_mismatch_fails_and_leaves_no_file() {
    let server = MockServer::start().await;
    mount_head(&server, "/files/short.xlsx", 4096, XLSX_CONTENT_TYPE).await;
    Mock::given(method("GET"))
        .and(path("/files/short.xlsx"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(vec![1u8; 1000], XLSX_CONTENT_TYPE))
        .mount(&server)
        .await;
    let dir = tempfile::tempdir().unwrap();

    let summary = pool()
        .run(&[link(&server, "/files/short.xlsx")], dir.path(), &RunContext::detached())
        .await;

    assert!(matches!(
        summary.results[0].outcome,
        DownloadOutcome::Failed {
            kind: FailureKind::SizeMismatch,
            ..
        }
    ));
    assert!(file_names(dir.path()).is_empty());
}

#[tokio::test]
async fn test_html_error_page_is_rejected_with_title() {
    let server = MockServer::start().await;
    let page = "<html><head><title>Доступ запрещен</title></head><body></body></html>";
    mount_file(&server, "/files/hidden.xlsx", page.as_bytes(), "text/html; charset=utf-8").await;
    let dir = tempfile::tempdir().unwrap();

    let summary = pool()
        .run(&[link(&server, "/files/hidden.xlsx")], dir.path(), &RunContext::detached())
        .await;

    match &summary.results[0].outcome {
        DownloadOutcome::Failed { kind, detail } => {
            assert_eq!(*kind, FailureKind::ContentType);
            assert!(detail.contains("text/html"));
            assert!(detail.contains("Доступ запрещен"));
        }
        other => panic!("unexpected outcome {other:?}"),
    }
    assert!(file_names(dir.path()).is_empty());
}

#[tokio::test]
async fn test_redirect_is_not_followed() {
    let server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .and(path("/files/moved.xlsx"))
        .respond_with(
            ResponseTemplate::new(302).insert_header("location", "/login?next=/files/moved.xlsx"),
        )
        .mount(&server)
        .await;
    let dir = tempfile::tempdir().unwrap();

    let summary = pool()
        .run(&[link(&server, "/files/moved.xlsx")], dir.path(), &RunContext::detached())
        .await;

    match &summary.results[0].outcome {
        DownloadOutcome::Failed { kind, detail } => {
            assert_eq!(*kind, FailureKind::Redirect);
            assert!(detail.contains("/login"));
        }
        other => panic!("unexpected outcome {other:?}"),
    }
}

#[tokio::test]
async fn test_cancellation_returns_promptly_without_partial_files() {
    let server = MockServer::start().await;
    mount_head(&server, "/files/slow.xlsx", 2048, XLSX_CONTENT_TYPE).await;
    Mock::given(method("GET"))
        .and(path("/files/slow.xlsx"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(vec![3u8; 2048], XLSX_CONTENT_TYPE)
                .set_delay(Duration::from_secs(8)),
        )
        .mount(&server)
        .await;
    let dir = tempfile::tempdir().unwrap();

    let cancel = CancellationSignal::new();
    let (sink, _rx) = ChannelSink::new();
    let ctx = RunContext::new(cancel.clone(), Arc::new(sink));
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(300)).await;
        cancel.cancel();
    });

    let started = Instant::now();
    let summary = pool()
        .run(&[link(&server, "/files/slow.xlsx")], dir.path(), &ctx)
        .await;

    assert!(started.elapsed() < Duration::from_secs(4));
    assert_eq!(summary.cancelled(), 1);
    assert!(file_names(dir.path()).is_empty());
}

#[tokio::test]
async fn test_cancellation_mid_stream_removes_partial_file() {
    let base = stalled_body_server(64 * 1024, 4096).await;
    let link = Link::spreadsheet(Url::parse(&format!("{base}/files/stalled.xlsx")).unwrap()).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let part = dir.path().join(".stalled.xlsx.part");

    let cancel = CancellationSignal::new();
    let ctx = RunContext::new(cancel.clone(), Arc::new(NullSink));
    let watcher = tokio::spawn(async move {
        let deadline = Instant::now() + Duration::from_secs(5);
        while !part.exists() && Instant::now() < deadline {
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        let started = part.exists();
        // Give the first bytes time to reach the part file
        tokio::time::sleep(Duration::from_millis(200)).await;
        cancel.cancel();
        started
    });

    let started = Instant::now();
    let summary = pool().run(&[link], dir.path(), &ctx).await;

    assert!(watcher.await.unwrap(), "part file was never created");
    assert!(started.elapsed() < Duration::from_secs(8));
    assert!(matches!(summary.results[0].outcome, DownloadOutcome::Cancelled));
    assert!(file_names(dir.path()).is_empty());
}

#[tokio::test]
async fn test_every_link_gets_one_outcome_and_progress_event() {
    let server = MockServer::start().await;
    mount_file(&server, "/files/ok.xlsx", &[1u8; 64], XLSX_CONTENT_TYPE).await;
    Mock::given(method("HEAD"))
        .and(path("/files/missing.xlsx"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    let links = vec![link(&server, "/files/ok.xlsx"), link(&server, "/files/missing.xlsx")];
    let dir = tempfile::tempdir().unwrap();

    let (sink, mut rx) = ChannelSink::new();
    let ctx = RunContext::new(CancellationSignal::new(), Arc::new(sink));
    let summary = pool().run(&links, dir.path(), &ctx).await;
    drop(ctx);

    assert_eq!(summary.results.len(), 2);
    assert_eq!(summary.downloaded(), 1);
    assert!(matches!(
        summary.outcome_for(links[1].as_str()),
        Some(DownloadOutcome::Failed {
            kind: FailureKind::HttpStatus,
            ..
        })
    ));

    let mut progress = Vec::new();
    while let Some(event) = rx.recv().await {
        if let RunEvent::Progress {
            stage: Stage::Download,
            current,
            total,
        } = event
        {
            progress.push((current, total));
        }
    }
    // One event per finished link; the count only moves on a successful download
    assert_eq!(progress.len(), 2);
    assert!(progress.iter().all(|(_, total)| *total == 2));
    assert!(progress[0].0 <= 1);
    assert_eq!(progress[1], (1, 2));
}
