// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::fmt;
use std::path::PathBuf;

use crate::domain::models::{DownloadSummary, MatchRecord};

/// 一次运行的终止状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Done,
    Cancelled,
}

impl RunStatus {
    pub fn from_cancelled(cancelled: bool) -> Self {
        if cancelled {
            RunStatus::Cancelled
        } else {
            RunStatus::Done
        }
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunStatus::Done => f.write_str("done"),
            RunStatus::Cancelled => f.write_str("cancelled"),
        }
    }
}

/// 下载运行报告
#[derive(Debug, Clone)]
pub struct DownloadReport {
    pub links_found: usize,
    pub summary: DownloadSummary,
    pub status: RunStatus,
}

/// 搜索运行报告
#[derive(Debug, Clone)]
pub struct SearchReport {
    pub documents: usize,
    /// 本次新写出的表格数
    pub tables_written: usize,
    /// 参与匹配的表格数
    pub tables_scanned: usize,
    pub records: Vec<MatchRecord>,
    /// 结果文件；没有匹配或运行被取消时为空
    pub result_path: Option<PathBuf>,
    pub status: RunStatus,
}
