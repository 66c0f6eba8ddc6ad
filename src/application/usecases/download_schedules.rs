// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::path::Path;
use std::sync::Arc;
use tracing::{info, instrument, warn};
use url::Url;

use crate::application::dto::{DownloadReport, RunStatus};
use crate::config::settings::Settings;
use crate::domain::models::{RunContext, Stage};
use crate::engines::downloader::VerifiedDownloader;
use crate::engines::link_discoverer::LinkDiscoverer;
use crate::engines::reqwest_engine::{download_client, ReqwestEngine};
use crate::engines::traits::PageSource;
use crate::infrastructure::workspace;
use crate::utils::errors::ScheduleError;
use crate::workers::DownloadPool;

/// 下载用例：发现链接后交给下载池
pub struct DownloadSchedulesUseCase {
    discoverer: LinkDiscoverer,
    pool: DownloadPool,
    base_urls: Vec<Url>,
}

impl DownloadSchedulesUseCase {
    pub fn new(
        source: Arc<dyn PageSource>,
        downloader: VerifiedDownloader,
        max_workers: usize,
        base_urls: Vec<Url>,
    ) -> Self {
        Self {
            discoverer: LinkDiscoverer::new(source),
            pool: DownloadPool::new(Arc::new(downloader), max_workers),
            base_urls,
        }
    }

    /// 根据配置组装引擎、下载器与工作池
    pub fn from_settings(settings: &Settings) -> Result<Self, ScheduleError> {
        let base_urls = settings
            .sources
            .base_urls
            .iter()
            .map(|raw| {
                Url::parse(raw.trim())
                    .map_err(|e| ScheduleError::Parse(format!("invalid base url {raw}: {e}")))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let engine = ReqwestEngine::new(&settings.http)?;
        let downloader =
            VerifiedDownloader::new(download_client(&settings.http)?, settings.download.clone());

        Ok(Self::new(
            Arc::new(engine),
            downloader,
            settings.download.max_workers,
            base_urls,
        ))
    }

    /// 执行下载
    ///
    /// # 参数
    ///
    /// * `folder` - 下载目录，开始前做写入探测
    /// * `ctx` - 运行上下文
    ///
    /// # 返回值
    ///
    /// * `Ok(DownloadReport)` - 运行报告，状态为完成或已取消
    /// * `Err(ScheduleError::FolderNotWritable)` - 目录不可写，未开始任何工作
    #[instrument(skip_all, fields(folder = %folder.display()))]
    pub async fn execute(
        &self,
        folder: &Path,
        ctx: &RunContext,
    ) -> Result<DownloadReport, ScheduleError> {
        workspace::validate_folder(folder)?;

        let links = self.discoverer.discover(&self.base_urls, ctx).await;
        ctx.log(
            Stage::Discover,
            format!("[discover] {} document link(s)", links.len()),
        );
        if links.is_empty() {
            warn!("No spreadsheet links found");
        }

        let summary = self.pool.run(&links, folder, ctx).await;
        let status = RunStatus::from_cancelled(ctx.is_cancelled());
        info!(
            "Download run {}: {}/{} downloaded",
            status,
            summary.downloaded(),
            links.len()
        );

        Ok(DownloadReport {
            links_found: links.len(),
            summary,
            status,
        })
    }
}
