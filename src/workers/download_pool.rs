// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{error, info, warn};

use crate::domain::models::{
    DownloadOutcome, DownloadSummary, FailureKind, Link, LinkResult, RunContext, Stage,
};
use crate::engines::downloader::VerifiedDownloader;
use crate::utils::file_names;

/// 下载工作池
///
/// 最多 `max_workers` 个链接同时下载；协调者是唯一的汇总者，
/// 按完成顺序收集结果。每个工作者结束后报告一次进度（已下载数 / 链接总数），
/// 失败与跳过也会触发一次报告
pub struct DownloadPool {
    downloader: Arc<VerifiedDownloader>,
    max_workers: usize,
}

impl DownloadPool {
    pub fn new(downloader: Arc<VerifiedDownloader>, max_workers: usize) -> Self {
        Self {
            downloader,
            max_workers: max_workers.max(1),
        }
    }

    /// 下载全部链接
    ///
    /// # 参数
    ///
    /// * `links` - 去重后的链接
    /// * `dest` - 已验证可写的目标目录
    /// * `ctx` - 运行上下文
    ///
    /// # 返回值
    ///
    /// 每个链接恰好一个结果；取消后尚未开始的链接记为 `Cancelled`
    pub async fn run(&self, links: &[Link], dest: &Path, ctx: &RunContext) -> DownloadSummary {
        let total = links.len();
        let semaphore = Arc::new(Semaphore::new(self.max_workers));
        let mut tasks = JoinSet::new();
        let mut seen_names = HashMap::new();

        for link in links {
            let file_name = match link.file_name() {
                Some(name) => file_names::unique_file_name(&name, &mut seen_names),
                None => {
                    warn!("Link has no file name: {}", link);
                    file_names::unique_file_name("download.xlsx", &mut seen_names)
                }
            };

            let downloader = self.downloader.clone();
            let semaphore = semaphore.clone();
            let cancel = ctx.cancel.clone();
            let link = link.clone();
            let dest: PathBuf = dest.to_path_buf();

            tasks.spawn(async move {
                // The semaphore is never closed; an error is treated like cancellation
                let outcome = match semaphore.acquire_owned().await {
                    Ok(_permit) => {
                        if cancel.is_cancelled() {
                            DownloadOutcome::Cancelled
                        } else {
                            downloader
                                .download_one(&link, &file_name, &dest, &cancel)
                                .await
                        }
                    }
                    Err(_) => DownloadOutcome::Cancelled,
                };
                LinkResult {
                    link,
                    file_name,
                    outcome,
                }
            });
        }

        let mut summary = DownloadSummary::default();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(result) => {
                    log_result(ctx, &result);
                    summary.results.push(result);
                }
                Err(e) => error!("Download task failed: {}", e),
            }
            ctx.progress(Stage::Download, summary.downloaded(), total);
        }

        // A panicked task still owes its link an outcome
        if summary.results.len() < total {
            for link in links {
                if summary.outcome_for(link.as_str()).is_none() {
                    summary.results.push(LinkResult {
                        link: link.clone(),
                        file_name: link.file_name().unwrap_or_default(),
                        outcome: DownloadOutcome::failed(FailureKind::Network, "task aborted"),
                    });
                }
            }
        }

        info!(
            "Downloads finished: {} downloaded, {} skipped, {} failed, {} cancelled",
            summary.downloaded(),
            summary.skipped(),
            summary.failed(),
            summary.cancelled()
        );
        summary
    }
}

fn log_result(ctx: &RunContext, result: &LinkResult) {
    let line = match &result.outcome {
        DownloadOutcome::Downloaded { bytes, .. } => {
            format!("[downloaded] {} ({} bytes)", result.file_name, bytes)
        }
        DownloadOutcome::Skipped { reason } => {
            format!("[skipped] {}: {}", result.file_name, reason)
        }
        DownloadOutcome::Failed { kind, detail } => {
            warn!("Download of {} failed ({}): {}", result.link, kind, detail);
            format!("[{} error] {}: {}", kind, result.file_name, detail)
        }
        DownloadOutcome::Cancelled => format!("[cancelled] {}", result.file_name),
    };
    ctx.log(Stage::Download, line);
}
