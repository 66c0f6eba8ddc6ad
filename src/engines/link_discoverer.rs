// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{info, instrument, warn};
use url::Url;

use crate::domain::models::{Link, RunContext, Stage};
use crate::engines::traits::PageSource;
use crate::utils::url_utils;

/// 链接发现器
///
/// 抓取索引页，提取指向电子表格的链接（包括查看器跳转链接中的内部地址），
/// 并在所有页面间按首次出现顺序去重
pub struct LinkDiscoverer {
    source: Arc<dyn PageSource>,
}

impl LinkDiscoverer {
    pub fn new(source: Arc<dyn PageSource>) -> Self {
        Self { source }
    }

    /// 发现所有索引页中的文档链接
    ///
    /// 单个页面失败只记录日志，不影响其余页面
    #[instrument(skip_all, fields(pages = base_urls.len()))]
    pub async fn discover(&self, base_urls: &[Url], ctx: &RunContext) -> Vec<Link> {
        let mut seen = HashSet::new();
        let mut links = Vec::new();

        for (i, base) in base_urls.iter().enumerate() {
            if ctx.is_cancelled() {
                break;
            }

            match self.source.fetch_page(base).await {
                Ok(html) => {
                    let found = extract_links(base, &html);
                    info!("Found {} spreadsheet link(s) on {}", found.len(), base);
                    ctx.log(
                        Stage::Discover,
                        format!("[discover] {}: {} link(s)", base, found.len()),
                    );
                    for link in found {
                        if seen.insert(link.clone()) {
                            links.push(link);
                        }
                    }
                }
                Err(e) => {
                    warn!("Failed to fetch index page {}: {}", base, e);
                    ctx.log(Stage::Discover, format!("[page error] {}: {}", base, e));
                }
            }

            ctx.progress(Stage::Discover, i + 1, base_urls.len());
        }

        info!("Discovered {} unique link(s)", links.len());
        links
    }
}

static ANCHORS: Lazy<Option<Selector>> = Lazy::new(|| Selector::parse("a[href]").ok());

/// 从单个页面中提取电子表格链接
///
/// 查看器链接本身不会出现在结果中，只保留其 `src` 指向的文档
pub fn extract_links(base: &Url, html: &str) -> Vec<Link> {
    let document = Html::parse_document(html);
    let Some(selector) = ANCHORS.as_ref() else {
        return Vec::new();
    };

    let mut seen = HashSet::new();
    let mut links = Vec::new();
    for element in document.select(selector) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };
        let Ok(resolved) = url_utils::resolve_url(base, href.trim()) else {
            continue;
        };

        // A direct document link is kept as is, even with a `src` parameter
        let link = if url_utils::has_spreadsheet_extension(&resolved) {
            Link::spreadsheet(resolved)
        } else {
            url_utils::viewer_target(base, &resolved).and_then(Link::spreadsheet)
        };
        if let Some(link) = link {
            if seen.insert(link.clone()) {
                links.push(link);
            }
        }
    }
    links
}
