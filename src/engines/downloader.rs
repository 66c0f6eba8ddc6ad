// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use futures::{Stream, StreamExt};
use reqwest::header::{HeaderMap, CONTENT_LENGTH, CONTENT_TYPE, LOCATION};
use reqwest::{Response, StatusCode};
use scraper::{Html, Selector};
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, instrument, warn};

use crate::config::settings::DownloadSettings;
use crate::domain::models::{CancellationSignal, DownloadOutcome, FailureKind, Link};
use crate::engines::traits::EngineError;

/// 单步结果：`Err` 即为该链接的最终结果
type Step<T> = Result<T, DownloadOutcome>;

/// 远端文件的元数据
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemoteMeta {
    pub content_type: Option<String>,
    /// 声明的长度；缺失或为 0 时视为未知
    pub length: Option<u64>,
}

impl RemoteMeta {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let content_type = headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.to_string());
        // HEAD responses carry no body, so the header is read directly
        let length = headers
            .get(CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok())
            .filter(|n| *n > 0);
        Self {
            content_type,
            length,
        }
    }

    /// 去掉参数后的 MIME 类型（小写）
    pub fn mime(&self) -> Option<String> {
        self.content_type
            .as_deref()
            .and_then(|ct| ct.split(';').next())
            .map(|m| m.trim().to_ascii_lowercase())
            .filter(|m| !m.is_empty())
    }
}

/// 写入中的临时文件，未提交时在析构时删除
struct PartFile {
    path: PathBuf,
    committed: bool,
}

impl PartFile {
    fn new(path: PathBuf) -> Self {
        Self {
            path,
            committed: false,
        }
    }

    fn commit(mut self) {
        self.committed = true;
    }
}

impl Drop for PartFile {
    fn drop(&mut self) {
        if !self.committed {
            if let Err(e) = std::fs::remove_file(&self.path) {
                if e.kind() != std::io::ErrorKind::NotFound {
                    warn!("Failed to remove partial file {}: {}", self.path.display(), e);
                }
            }
        }
    }
}

/// 校验下载器
///
/// 先发元数据请求：3xx 失败、内容类型不是电子表格则失败、本地同名文件大小一致则跳过；
/// 否则分块流式写入临时文件，写完后核对长度再重命名到目标位置。
/// 每个数据块写入前检查取消信号。
pub struct VerifiedDownloader {
    client: reqwest::Client,
    settings: DownloadSettings,
}

impl VerifiedDownloader {
    /// 创建下载器
    ///
    /// `client` 必须关闭自动跳转，见 [`crate::engines::reqwest_engine::download_client`]
    pub fn new(client: reqwest::Client, settings: DownloadSettings) -> Self {
        Self { client, settings }
    }

    /// 下载单个链接
    ///
    /// # 参数
    ///
    /// * `link` - 文档链接
    /// * `file_name` - 本地文件名（在目标目录内唯一）
    /// * `dest` - 已验证可写的目标目录
    /// * `cancel` - 取消信号
    ///
    /// # 返回值
    ///
    /// 该链接的最终结果，从不返回错误
    #[instrument(skip_all, fields(url = %link, file = %file_name))]
    pub async fn download_one(
        &self,
        link: &Link,
        file_name: &str,
        dest: &Path,
        cancel: &CancellationSignal,
    ) -> DownloadOutcome {
        if cancel.is_cancelled() {
            return DownloadOutcome::Cancelled;
        }
        match self.fetch(link, file_name, dest, cancel).await {
            Ok(outcome) | Err(outcome) => outcome,
        }
    }

    async fn fetch(
        &self,
        link: &Link,
        file_name: &str,
        dest: &Path,
        cancel: &CancellationSignal,
    ) -> Step<DownloadOutcome> {
        let target = dest.join(file_name);

        let head = self.send(self.client.head(link.url().clone()), cancel).await?;
        // Servers that refuse HEAD are checked on the GET response instead
        let head_meta = if matches!(
            head.status(),
            StatusCode::METHOD_NOT_ALLOWED | StatusCode::NOT_IMPLEMENTED
        ) {
            debug!("HEAD not supported ({}), using GET headers", head.status());
            None
        } else {
            check_status(&head)?;
            let meta = RemoteMeta::from_headers(head.headers());
            if let Err(failure) = self.check_content_type(&meta) {
                return Err(self.with_diagnostic(link, failure, cancel).await);
            }
            if let Some(skip) = already_present(&target, &meta).await {
                return Ok(skip);
            }
            Some(meta)
        };

        let response = self.send(self.client.get(link.url().clone()), cancel).await?;
        check_status(&response)?;
        let get_meta = RemoteMeta::from_headers(response.headers());

        let expected = match head_meta {
            Some(meta) => meta.length.or(get_meta.length),
            None => {
                if let Err(failure) = self.check_content_type(&get_meta) {
                    let detail = self.diagnose_response(response, cancel).await;
                    return Err(append_detail(failure, detail));
                }
                if let Some(skip) = already_present(&target, &get_meta).await {
                    return Ok(skip);
                }
                get_meta.length
            }
        };

        let written = self
            .stream_to_file(response.bytes_stream(), &target, file_name, expected, cancel)
            .await?;
        info!("Downloaded {} ({} bytes)", file_name, written);
        Ok(DownloadOutcome::Downloaded {
            path: target,
            bytes: written,
        })
    }

    /// 发送请求，等待期间响应取消信号
    async fn send(
        &self,
        request: reqwest::RequestBuilder,
        cancel: &CancellationSignal,
    ) -> Step<Response> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(DownloadOutcome::Cancelled),
            result = request.send() => result.map_err(|e| {
                let e = EngineError::from(e);
                DownloadOutcome::failed(e.failure_kind(), e.to_string())
            }),
        }
    }

    fn check_content_type(&self, meta: &RemoteMeta) -> Step<()> {
        let Some(mime) = meta.mime() else {
            return Err(DownloadOutcome::failed(
                FailureKind::ContentType,
                "missing content type",
            ));
        };
        let allowed = self
            .settings
            .allowed_content_types
            .iter()
            .any(|t| t.eq_ignore_ascii_case(&mime));
        if allowed {
            Ok(())
        } else {
            Err(DownloadOutcome::failed(
                FailureKind::ContentType,
                format!("unexpected content type {mime}"),
            ))
        }
    }

    /// 为内容类型失败补充错误页面的标题
    async fn with_diagnostic(
        &self,
        link: &Link,
        failure: DownloadOutcome,
        cancel: &CancellationSignal,
    ) -> DownloadOutcome {
        match self.send(self.client.get(link.url().clone()), cancel).await {
            Ok(response) => {
                let detail = self.diagnose_response(response, cancel).await;
                append_detail(failure, detail)
            }
            Err(DownloadOutcome::Cancelled) => DownloadOutcome::Cancelled,
            Err(_) => failure,
        }
    }

    /// 读取有限长度的响应体并提取页面标题
    async fn diagnose_response(
        &self,
        response: Response,
        cancel: &CancellationSignal,
    ) -> Option<String> {
        let limit = self.settings.diagnostic_body_limit;
        let mut body = Vec::new();
        let mut stream = response.bytes_stream();
        while body.len() < limit {
            let next = tokio::select! {
                biased;
                _ = cancel.cancelled() => return None,
                next = stream.next() => next,
            };
            match next {
                Some(Ok(chunk)) => body.extend_from_slice(&chunk),
                _ => break,
            }
        }
        body.truncate(limit);
        page_title(&String::from_utf8_lossy(&body))
    }

    /// 分块写入 `.<name>.part`，核对长度后重命名为目标文件
    async fn stream_to_file<S, B, E>(
        &self,
        mut stream: S,
        target: &Path,
        file_name: &str,
        expected: Option<u64>,
        cancel: &CancellationSignal,
    ) -> Step<u64>
    where
        S: Stream<Item = Result<B, E>> + Unpin,
        B: AsRef<[u8]>,
        E: std::fmt::Display,
    {
        let part = PartFile::new(target.with_file_name(format!(".{file_name}.part")));
        let mut file = tokio::fs::File::create(&part.path)
            .await
            .map_err(|e| fs_failure(&part.path, e))?;

        let chunk_size = self.settings.chunk_size.max(1);
        let mut written: u64 = 0;
        loop {
            let next = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(DownloadOutcome::Cancelled),
                next = stream.next() => next,
            };
            let Some(chunk) = next else { break };
            let chunk = chunk
                .map_err(|e| DownloadOutcome::failed(FailureKind::Network, e.to_string()))?;
            for piece in chunk.as_ref().chunks(chunk_size) {
                if cancel.is_cancelled() {
                    return Err(DownloadOutcome::Cancelled);
                }
                file.write_all(piece)
                    .await
                    .map_err(|e| fs_failure(&part.path, e))?;
                written += piece.len() as u64;
            }
        }
        file.flush().await.map_err(|e| fs_failure(&part.path, e))?;
        drop(file);

        if let Some(expected) = expected {
            if written != expected {
                return Err(DownloadOutcome::failed(
                    FailureKind::SizeMismatch,
                    format!("expected {expected} bytes, received {written}"),
                ));
            }
        }

        tokio::fs::rename(&part.path, target)
            .await
            .map_err(|e| fs_failure(target, e))?;
        part.commit();
        Ok(written)
    }
}

fn check_status(response: &Response) -> Step<()> {
    let status = response.status();
    if status.is_redirection() {
        let location = response
            .headers()
            .get(LOCATION)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("?");
        return Err(DownloadOutcome::failed(
            FailureKind::Redirect,
            format!("HTTP {} -> {}", status.as_u16(), location),
        ));
    }
    if !status.is_success() {
        return Err(DownloadOutcome::failed(
            FailureKind::HttpStatus,
            format!("HTTP {}", status.as_u16()),
        ));
    }
    Ok(())
}

/// 本地文件与远端长度一致时返回跳过结果
async fn already_present(target: &Path, meta: &RemoteMeta) -> Option<DownloadOutcome> {
    let remote = meta.length?;
    let local = tokio::fs::metadata(target).await.ok()?;
    (local.is_file() && local.len() == remote).then(|| DownloadOutcome::Skipped {
        reason: format!("already downloaded ({remote} bytes)"),
    })
}

fn fs_failure(path: &Path, e: std::io::Error) -> DownloadOutcome {
    DownloadOutcome::failed(FailureKind::FileSystem, format!("{}: {}", path.display(), e))
}

fn append_detail(outcome: DownloadOutcome, extra: Option<String>) -> DownloadOutcome {
    match (outcome, extra) {
        (DownloadOutcome::Failed { kind, detail }, Some(extra)) => DownloadOutcome::Failed {
            kind,
            detail: format!("{detail}: {extra}"),
        },
        (outcome, _) => outcome,
    }
}

/// 错误页面的可读标题：优先 `<title>`，其次第一个 `<h1>`
pub fn page_title(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    ["title", "h1"].iter().find_map(|tag| {
        let selector = Selector::parse(tag).ok()?;
        let element = document.select(&selector).next()?;
        let text = element
            .text()
            .flat_map(|t| t.split_whitespace())
            .collect::<Vec<_>>()
            .join(" ");
        (!text.is_empty()).then_some(text)
    })
}
