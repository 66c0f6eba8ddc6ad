// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::fmt;
use std::path::PathBuf;

use crate::domain::models::link::Link;

/// 单个链接下载失败的原因分类
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// 传输层错误
    Network,
    /// 非 2xx 状态码
    HttpStatus,
    /// 3xx 跳转（从不自动跟随）
    Redirect,
    /// 内容类型不是电子表格
    ContentType,
    /// 写入字节数与声明长度不一致
    SizeMismatch,
    /// 本地文件无法创建或写入
    FileSystem,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FailureKind::Network => "network",
            FailureKind::HttpStatus => "http-status",
            FailureKind::Redirect => "redirect",
            FailureKind::ContentType => "content-type",
            FailureKind::SizeMismatch => "size-mismatch",
            FailureKind::FileSystem => "file-system",
        };
        f.write_str(s)
    }
}

/// 单个链接在一次运行中的最终结果
///
/// 每个链接每次运行只产生一个结果，运行内不重试
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadOutcome {
    Downloaded { path: PathBuf, bytes: u64 },
    Skipped { reason: String },
    Failed { kind: FailureKind, detail: String },
    Cancelled,
}

impl DownloadOutcome {
    pub fn failed(kind: FailureKind, detail: impl Into<String>) -> Self {
        DownloadOutcome::Failed {
            kind,
            detail: detail.into(),
        }
    }

    pub fn is_downloaded(&self) -> bool {
        matches!(self, DownloadOutcome::Downloaded { .. })
    }
}

/// 链接与其结果
#[derive(Debug, Clone)]
pub struct LinkResult {
    pub link: Link,
    pub file_name: String,
    pub outcome: DownloadOutcome,
}

/// 下载阶段汇总
#[derive(Debug, Default, Clone)]
pub struct DownloadSummary {
    pub results: Vec<LinkResult>,
}

impl DownloadSummary {
    pub fn downloaded(&self) -> usize {
        self.count(DownloadOutcome::is_downloaded)
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, DownloadOutcome::Skipped { .. }))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, DownloadOutcome::Failed { .. }))
    }

    pub fn cancelled(&self) -> usize {
        self.count(|o| matches!(o, DownloadOutcome::Cancelled))
    }

    pub fn outcome_for(&self, url: &str) -> Option<&DownloadOutcome> {
        self.results
            .iter()
            .find(|r| r.link.as_str() == url)
            .map(|r| &r.outcome)
    }

    fn count(&self, pred: impl Fn(&DownloadOutcome) -> bool) -> usize {
        self.results.iter().filter(|r| pred(&r.outcome)).count()
    }
}
