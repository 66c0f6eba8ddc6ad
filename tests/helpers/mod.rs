// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

pub mod workbook;

use schedule_scout::config::settings::{
    DownloadSettings, HttpSettings, XLSX_CONTENT_TYPE, XLS_CONTENT_TYPE,
};
use schedule_scout::engines::downloader::VerifiedDownloader;
use schedule_scout::engines::reqwest_engine::download_client;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub fn http_settings() -> HttpSettings {
    HttpSettings {
        user_agent: "Mozilla/5.0".to_string(),
        timeout_secs: 10,
        connect_timeout_secs: 5,
    }
}

pub fn download_settings() -> DownloadSettings {
    DownloadSettings {
        max_workers: 4,
        chunk_size: 1024,
        allowed_content_types: vec![XLSX_CONTENT_TYPE.to_string(), XLS_CONTENT_TYPE.to_string()],
        diagnostic_body_limit: 65536,
    }
}

pub fn downloader() -> VerifiedDownloader {
    VerifiedDownloader::new(download_client(&http_settings()).unwrap(), download_settings())
}

/// HEAD 与 GET 都返回同一份内容
pub async fn mount_file(server: &MockServer, route: &str, body: &[u8], content_type: &str) {
    mount_head(server, route, body.len(), content_type).await;
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body.to_vec(), content_type))
        .mount(server)
        .await;
}

/// HEAD 声明 `length` 字节
pub async fn mount_head(server: &MockServer, route: &str, length: usize, content_type: &str) {
    Mock::given(method("HEAD"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(vec![b'x'; length], content_type)
                .insert_header("content-length", length.to_string().as_str()),
        )
        .mount(server)
        .await;
}

pub async fn mount_page(server: &MockServer, route: &str, html: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(html.as_bytes().to_vec(), "text/html"),
        )
        .mount(server)
        .await;
}

/// 目录中的文件名（排序后）
pub fn file_names(dir: &std::path::Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .filter_map(|e| e.ok())
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

/// 声明 `length` 字节的电子表格，GET 只发送前 `sent` 字节后停住
///
/// 返回服务器根地址，任意路径均可
pub async fn stalled_body_server(length: usize, sent: usize) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            tokio::spawn(async move {
                let mut request = Vec::new();
                let mut buf = [0u8; 1024];
                while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                    match socket.read(&mut buf).await {
                        Ok(0) | Err(_) => return,
                        Ok(n) => request.extend_from_slice(&buf[..n]),
                    }
                }
                let head = format!(
                    "HTTP/1.1 200 OK\r\ncontent-type: {XLSX_CONTENT_TYPE}\r\ncontent-length: {length}\r\nconnection: close\r\n\r\n"
                );
                if socket.write_all(head.as_bytes()).await.is_err() {
                    return;
                }
                if request.starts_with(b"GET") {
                    let _ = socket.write_all(&vec![5u8; sent]).await;
                    let _ = socket.flush().await;
                    tokio::time::sleep(Duration::from_secs(30)).await;
                }
            });
        }
    });
    format!("http://{addr}")
}
